//! # mapgen-codegen
//!
//! Build-time generator for declarative type-to-type mappers. From types
//! annotated with mapping directives it emits converter structs, optional
//! reverse converters, extension traits and one aggregated registration
//! module, all targeting the `mapgen-runtime` crate.
//!
//! ## Usage
//!
//! ### 1. Annotate your types with `#[derive(MapTo)]`
//!
//! ```rust,ignore
//! use mapgen_codegen::MapTo;
//!
//! #[derive(MapTo)]
//! #[map_to(
//!     target = Profile,
//!     generate_reverse = true,
//!     property_map(from = "age", to = "age", condition = AdultOnly),
//! )]
//! #[register(named = "people", bind_interfaces = true)]
//! pub struct Person {
//!     pub name: String,
//!     pub age: u32,
//! }
//!
//! pub struct Profile {
//!     pub name: String,
//!     pub age: u32,
//! }
//! ```
//!
//! ### 2. Generate the mappers in build.rs
//!
//! ```rust,ignore
//! // build.rs
//! use mapgen_codegen::CodeGenerator;
//!
//! fn main() {
//!     let out_dir = std::env::var("OUT_DIR").unwrap();
//!     let mut generator = CodeGenerator::new();
//!     generator
//!         .set_module_path("crate::model")
//!         .add_source_file("src/model.rs")
//!         .unwrap();
//!
//!     let generation = generator
//!         .write_to_file(format!("{out_dir}/mappers.rs"))
//!         .unwrap();
//!     for diagnostic in generation.diagnostics() {
//!         println!("cargo:warning={diagnostic}");
//!     }
//!     println!("cargo:rerun-if-changed=src/model.rs");
//! }
//! ```
//!
//! ### 3. Include them
//!
//! ```rust,ignore
//! pub mod mappers {
//!     include!(concat!(env!("OUT_DIR"), "/mappers.rs"));
//! }
//! ```
//!
//! Problems tied to a single type are reported as [`Diagnostic`]s and only
//! skip the affected unit. A `register` directive on a type without a usable
//! `map_to` fails the whole pass.

mod catalog;
mod config;
mod converter;
mod error;
mod extensions;
mod extractor;
mod generator;
mod naming;
mod registration;
mod resolver;
mod reverse;
mod rules;
mod types;

pub use catalog::{LookupError, TypeCatalog};
pub use config::GeneratorConfig;
pub use converter::{synthesize_converter, GeneratedUnit, UnitKind};
pub use error::{Diagnostic, GenerationError, Severity};
pub use extensions::synthesize_extensions;
pub use generator::{CodeGenerator, Generation};
pub use naming::{simple_name, to_snake_case};
pub use registration::{
    collect_registration, synthesize_module, CollectedRegistration, RegistrationAccumulator,
    MODULE_FN_NAME, MODULE_UNIT_NAME,
};
pub use resolver::{resolve_mapper_spec, ResolvedMapper, MAP_TO, PROPERTY_MAP, REGISTER};
pub use reverse::derive_reverse;
pub use rules::{PropertyRules, ResolvedProperty};
pub use types::{
    Directive, DirectiveValue, Lifecycle, MapperRef, MapperSpec, PropertyRule, Qualifier,
    RegistrationSpec, RegistrationStyle, TypeInfo, TypeRef, TypeShape,
};

#[cfg(feature = "derive")]
pub use mapgen_derive::MapTo;
