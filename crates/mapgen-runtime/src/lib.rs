//! # mapgen-runtime
//!
//! Contracts implemented by converters that `mapgen-codegen` generates, plus the
//! declaration sink the generated registration module is written against.
//!
//! ```
//! use mapgen_runtime::{Mapper, MappingError};
//!
//! struct Celsius(f64);
//! struct Fahrenheit(f64);
//!
//! struct CelsiusToFahrenheit;
//!
//! impl Mapper<Celsius, Fahrenheit> for CelsiusToFahrenheit {
//!     fn convert(&self, input: Celsius) -> Result<Fahrenheit, MappingError> {
//!         Ok(Fahrenheit(input.0 * 9.0 / 5.0 + 32.0))
//!     }
//! }
//!
//! let f = CelsiusToFahrenheit.convert(Celsius(100.0)).unwrap();
//! assert_eq!(f.0, 212.0);
//! ```

use std::marker::PhantomData;

use thiserror::Error;

pub mod di;

/// Blocks the current thread until the future resolves.
///
/// Used by generated `*_blocking` adapters. Never call it from inside an async
/// context that is itself driving the same converter; it will deadlock.
pub use futures::executor::block_on;

/// Failure raised by generated converters at call time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// A non-nullable target received a `None` source.
    #[error("missing required mapping input")]
    MissingInput,
}

/// Synchronous converter from `I` to `O`.
pub trait Mapper<I, O> {
    fn convert(&self, input: I) -> Result<O, MappingError>;
}

/// Asynchronous converter from `I` to `O` with one suspension point.
#[allow(async_fn_in_trait)]
pub trait AsyncMapper<I, O> {
    async fn convert(&self, input: I) -> Result<O, MappingError>;
}

/// Guard deciding whether a source value is carried over or replaced.
///
/// Generated code instantiates guards through `Default`, so implementors
/// should be cheap, stateless types.
pub trait Condition<T> {
    /// Returns `true` when `value` should be mapped as-is.
    fn decide(&self, value: &T) -> bool;

    /// Value used in place of a rejected source value.
    fn default_value(&self) -> T;
}

/// Marker naming the `Mapper<I, O>` contract in registration bindings.
pub struct MapperContract<I, O>(PhantomData<fn(I) -> O>);

/// Marker naming the `AsyncMapper<I, O>` contract in registration bindings.
pub struct AsyncMapperContract<I, O>(PhantomData<fn(I) -> O>);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct NonEmpty;

    impl Condition<String> for NonEmpty {
        fn decide(&self, value: &String) -> bool {
            !value.is_empty()
        }

        fn default_value(&self) -> String {
            "unknown".to_string()
        }
    }

    struct Doubler;

    impl AsyncMapper<u32, u64> for Doubler {
        async fn convert(&self, input: u32) -> Result<u64, MappingError> {
            Ok(u64::from(input) * 2)
        }
    }

    #[test]
    fn test_missing_input_message() {
        assert_eq!(
            MappingError::MissingInput.to_string(),
            "missing required mapping input"
        );
    }

    #[test]
    fn test_condition_contract() {
        let guard = NonEmpty;
        assert!(guard.decide(&"x".to_string()));
        assert!(!guard.decide(&String::new()));
        assert_eq!(guard.default_value(), "unknown");
    }

    #[test]
    fn test_block_on_async_mapper() {
        let result = block_on(Doubler.convert(21));
        assert_eq!(result, Ok(42));
    }
}
