//! Generation pass driver.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::catalog::TypeCatalog;
use crate::config::GeneratorConfig;
use crate::converter::{synthesize_converter, GeneratedUnit, UnitKind};
use crate::error::{Diagnostic, GenerationError};
use crate::extensions::synthesize_extensions;
use crate::naming::to_snake_case;
use crate::registration::{collect_registration, synthesize_module, RegistrationAccumulator};
use crate::resolver::{resolve_mapper_spec, MAP_TO, REGISTER};
use crate::reverse::derive_reverse;
use crate::types::{MapperSpec, RegistrationSpec, TypeInfo};

/// Code generator that collects candidate types and emits mapper source.
#[derive(Debug, Default)]
pub struct CodeGenerator {
    catalog: TypeCatalog,
    config: GeneratorConfig,
}

impl CodeGenerator {
    /// Create a new code generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator with a loaded configuration.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            catalog: TypeCatalog::new(),
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Set a custom header comment for the generated files.
    pub fn set_header(&mut self, header: impl Into<String>) -> &mut Self {
        self.config.header = Some(header.into());
        self
    }

    /// Set the module path that types parsed from source strings and single
    /// files are qualified with.
    pub fn set_module_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.config.module_path = path.into();
        self
    }

    /// Set the module path the generated units are placed under.
    pub fn set_mapper_module_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.config.mapper_module_path = path.into();
        self
    }

    /// Set the path of the runtime crate used by generated code.
    pub fn set_runtime_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.config.runtime_path = path.into();
        self
    }

    pub fn set_one_line_default(&mut self, one_line: bool) -> &mut Self {
        self.config.one_line_default = one_line;
        self
    }

    pub fn set_strict(&mut self, strict: bool) -> &mut Self {
        self.config.strict = strict;
        self
    }

    /// Add a candidate type.
    ///
    /// # Example
    ///
    /// ```
    /// use mapgen_codegen::{CodeGenerator, Directive, DirectiveValue, TypeInfo};
    ///
    /// let mut generator = CodeGenerator::new();
    /// generator
    ///     .add_type(TypeInfo::new("crate::model::Profile", &["name", "age"]))
    ///     .add_type(
    ///         TypeInfo::new("crate::model::Person", &["name", "age"]).with_directive(
    ///             Directive::new("map_to").with("target", DirectiveValue::Type("Profile".into())),
    ///         ),
    ///     );
    ///
    /// let generation = generator.generate().unwrap();
    /// assert!(generation.unit("PersonToProfileMapper").is_some());
    /// ```
    pub fn add_type(&mut self, info: TypeInfo) -> &mut Self {
        self.catalog.insert(info);
        self
    }

    /// Run one generation pass over the catalog.
    ///
    /// Unit-local problems end up in [`Generation::diagnostics`]. A unit whose
    /// name is already taken by an earlier unit of the pass is skipped; when
    /// that is a forward mapper the type counts as unmapped. A `register`
    /// directive without a usable mapping fails the whole pass.
    pub fn generate(&self) -> Result<Generation, GenerationError> {
        let mut generation = Generation {
            header: self.config.header_comment(),
            units: Vec::new(),
            diagnostics: Vec::new(),
            registrations: Vec::new(),
        };
        let mut mappings: Vec<(String, MapperSpec)> = Vec::new();
        let mut stems = BTreeSet::new();

        for info in self.catalog.iter().filter(|info| info.directive(MAP_TO).is_some()) {
            let type_name = info.qualified_name.as_str();
            let resolved = match resolve_mapper_spec(info, &self.catalog, &self.config) {
                Ok(resolved) => resolved,
                Err(err) => {
                    generation.report(Diagnostic::error(type_name, err));
                    continue;
                }
            };
            for warning in resolved.warnings {
                generation.report(Diagnostic::warning(type_name, warning));
            }

            let spec = resolved.spec;
            let forward = match synthesize_converter(&spec, UnitKind::Mapper, &self.config) {
                Ok(unit) => unit,
                Err(err) => {
                    generation.report(Diagnostic::error(type_name, err));
                    continue;
                }
            };
            if !generation.claim(&mut stems, type_name, forward) {
                continue;
            }
            if spec.generate_extensions {
                generation.claim(&mut stems, type_name, synthesize_extensions(&spec, &self.config));
            }

            if spec.generate_reverse {
                let reverse = derive_reverse(&spec).and_then(|reverse| {
                    synthesize_converter(&reverse, UnitKind::ReverseMapper, &self.config)
                        .map(|unit| (reverse, unit))
                });
                match reverse {
                    Ok((reverse, unit)) => {
                        let claimed = generation.claim(&mut stems, type_name, unit);
                        if claimed && reverse.generate_extensions {
                            let extensions = synthesize_extensions(&reverse, &self.config);
                            generation.claim(&mut stems, type_name, extensions);
                        }
                    }
                    Err(err) => generation.report(Diagnostic::error(type_name, err)),
                }
            }

            mappings.push((type_name.to_string(), spec));
        }

        let mut accumulator = RegistrationAccumulator::new();
        for info in self.catalog.iter() {
            let type_name = info.qualified_name.as_str();
            let mapping = mappings
                .iter()
                .find(|(owner, _)| owner == type_name)
                .map(|(_, spec)| spec);

            for directive in info.directives_named(REGISTER) {
                let collected =
                    collect_registration(info, directive, mapping, &self.catalog, &self.config)?;
                for warning in collected.warnings {
                    generation.report(Diagnostic::warning(type_name, warning));
                }
                if !accumulator.record(type_name, collected.spec) {
                    tracing::warn!(type_name = %type_name, "ignoring repeated `register` directive");
                }
            }
        }

        generation.registrations = accumulator.finish();
        if let Some(unit) = synthesize_module(&generation.registrations, &self.config) {
            generation.units.push(unit);
        }

        tracing::info!(
            units = generation.units.len(),
            registrations = generation.registrations.len(),
            diagnostics = generation.diagnostics.len(),
            "generation pass finished"
        );
        Ok(generation)
    }

    /// Generate and write every unit into one file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<Generation, GenerationError> {
        let generation = self.generate()?;
        generation.write_to_file(path)?;
        Ok(generation)
    }

    /// Generate and write one file per unit plus a `mod.rs` into `dir`.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<Generation, GenerationError> {
        let generation = self.generate()?;
        generation.write_to_dir(dir)?;
        Ok(generation)
    }
}

impl GeneratedUnit {
    /// File and module name of the unit, e.g. `person_to_profile_mapper`.
    pub fn file_stem(&self) -> String {
        to_snake_case(&self.name)
    }
}

/// The outcome of one generation pass.
#[derive(Debug)]
pub struct Generation {
    header: String,
    units: Vec<GeneratedUnit>,
    diagnostics: Vec<Diagnostic>,
    registrations: Vec<RegistrationSpec>,
}

impl Generation {
    /// Generated units in emission order.
    pub fn units(&self) -> &[GeneratedUnit] {
        &self.units
    }

    pub fn unit(&self, name: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|unit| unit.name == name)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Registration entries in first-discovery order.
    pub fn registrations(&self) -> &[RegistrationSpec] {
        &self.registrations
    }

    /// A unit's code preceded by the header comment.
    pub fn render_unit(&self, unit: &GeneratedUnit) -> String {
        let mut output = self.header.clone();
        output.push_str(&unit.code);
        output
    }

    /// Every unit in one source text.
    ///
    /// Each unit is wrapped in `pub mod <file_stem>` and its item re-exported,
    /// so the text can be `include!`d as the body of the mapper module.
    pub fn bundle(&self) -> String {
        let mut output = self.header.clone();
        for unit in &self.units {
            let stem = unit.file_stem();
            output.push_str(&format!("pub mod {stem} {{\n"));
            for line in unit.code.lines() {
                if !line.is_empty() {
                    output.push_str("    ");
                    output.push_str(line);
                }
                output.push('\n');
            }
            output.push_str("}\n");
            output.push_str(&format!("pub use {stem}::{};\n\n", unit.item));
        }
        output
    }

    /// Write [`Generation::bundle`] to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), GenerationError> {
        write_file(path.as_ref(), &self.bundle())
    }

    /// Write [`Generation::bundle`] to a writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.bundle().as_bytes())
    }

    /// Write one `<file_stem>.rs` per unit and a `mod.rs` declaring them.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<(), GenerationError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut mod_rs = self.header.clone();
        for unit in &self.units {
            let stem = unit.file_stem();
            write_file(&dir.join(format!("{stem}.rs")), &self.render_unit(unit))?;
            mod_rs.push_str(&format!("pub mod {stem};\n"));
        }
        if !self.units.is_empty() {
            mod_rs.push('\n');
        }
        for unit in &self.units {
            mod_rs.push_str(&format!("pub use {}::{};\n", unit.file_stem(), unit.item));
        }
        write_file(&dir.join("mod.rs"), &mod_rs)?;

        tracing::debug!(dir = %dir.display(), units = self.units.len(), "wrote generated units");
        Ok(())
    }

    /// Add `unit` unless an earlier unit of the pass owns its file stem.
    fn claim(&mut self, stems: &mut BTreeSet<String>, type_name: &str, unit: GeneratedUnit) -> bool {
        if !stems.insert(unit.file_stem()) {
            self.report(Diagnostic::error(
                type_name,
                GenerationError::UnitNameCollision {
                    type_name: type_name.to_string(),
                    unit: unit.name,
                },
            ));
            return false;
        }
        self.units.push(unit);
        true
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(type_name = %diagnostic.type_name, "{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), GenerationError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()?;
    Ok(())
}
