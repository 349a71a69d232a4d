//! Example crate demonstrating mapgen-codegen usage.
//!
//! The types in [`model`] carry `#[map_to]` and `#[register]` directives.
//! The `#[derive(MapTo)]` macro is a no-op annotation; the converters are
//! generated by `CodeGenerator` in build.rs and included into [`mappers`].

pub mod model;

/// Converters, extension traits and the registration module generated from
/// [`model`].
pub mod mappers {
    include!(concat!(env!("OUT_DIR"), "/mappers.rs"));
}
