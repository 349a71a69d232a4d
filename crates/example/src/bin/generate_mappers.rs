//! Generates mapper sources into a module directory.
//!
//! Usage: `generate-mappers [SOURCE_DIR] [OUT_DIR] [CONFIG]`
//!
//! Defaults to `src`, `generated` and no config file. Set `RUST_LOG=debug`
//! to see every emitted unit.

use anyhow::{bail, Context, Result};
use mapgen_codegen::{CodeGenerator, GeneratorConfig};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let source_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("src"));
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("generated"));
    let config = match args.next() {
        Some(path) => GeneratorConfig::load(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => GeneratorConfig::default(),
    };

    let mut generator = CodeGenerator::with_config(config);
    generator
        .add_source_dir(&source_dir)
        .with_context(|| format!("failed to read sources from {}", source_dir.display()))?;

    let generation = generator
        .write_to_dir(&out_dir)
        .context("generation pass failed")?;

    tracing::info!(
        out_dir = %out_dir.display(),
        units = generation.units().len(),
        "mappers written"
    );

    if generation.has_errors() {
        let skipped = generation
            .diagnostics()
            .iter()
            .filter(|d| d.is_error())
            .count();
        bail!("{skipped} unit(s) were skipped, see the warnings above");
    }

    Ok(())
}
