use mapgen_codegen::CodeGenerator;
use std::env;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let mut codegen = CodeGenerator::new();

    codegen
        .set_header(
            "Generated mappers for mapgen-example\n\
             These converters match the types in src/model.rs",
        )
        .set_module_path("crate::model")
        .set_mapper_module_path("crate::mappers");

    codegen
        .add_source_file(manifest_dir.join("src/model.rs"))
        .expect("Failed to parse source file");

    // Write to OUT_DIR, included by src/lib.rs
    let generation = codegen
        .write_to_file(out_dir.join("mappers.rs"))
        .expect("Failed to generate mappers");

    for diagnostic in generation.diagnostics() {
        println!("cargo:warning={diagnostic}");
    }

    println!("cargo:rerun-if-changed=src/model.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
