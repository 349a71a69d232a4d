//! Proc-macro providing the `#[derive(MapTo)]` attribute.
//!
//! This macro is a **no-op annotation** - it doesn't generate any code.
//! It declares the `map_to`, `property_map` and `register` helper attributes
//! so they can be written on a type. The converters themselves are generated
//! by `mapgen-codegen` in your build.rs.
//!
//! # Usage
//!
//! 1. Annotate your types with `#[derive(MapTo)]` and a `#[map_to(...)]` directive
//! 2. Use `CodeGenerator` in your build.rs to generate the converters
//!
//! # Example
//!
//! ```rust,ignore
//! use mapgen_codegen::MapTo;
//!
//! #[derive(MapTo)]
//! #[map_to(target = Profile, is_async = false)]
//! #[property_map(from = "name", to = "display_name")]
//! #[register(singleton = true, named = "people")]
//! pub struct Person {
//!     pub name: String,
//!     pub age: u32,
//! }
//! ```
//!
//! Then in your build.rs:
//!
//! ```rust,ignore
//! use mapgen_codegen::CodeGenerator;
//!
//! fn main() {
//!     let generation = CodeGenerator::new()
//!         .add_source_file("src/model.rs")
//!         .unwrap()
//!         .generate()
//!         .unwrap();
//!     generation.write_to_file("src/mappers.rs").unwrap();
//! }
//! ```

use proc_macro::TokenStream;

/// Marker derive macro for mapper generation.
///
/// This macro is a no-op - it doesn't generate any code at compile time.
/// The actual converters are produced by `CodeGenerator` in your build.rs.
#[proc_macro_derive(MapTo, attributes(map_to, property_map, register))]
pub fn derive_map_to(_input: TokenStream) -> TokenStream {
    // No-op: actual code generation happens in build.rs
    TokenStream::new()
}
