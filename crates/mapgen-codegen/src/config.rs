//! Generator configuration, loadable from TOML.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::GenerationError;

/// Options that shape every unit of a generation pass.
///
/// ```
/// use mapgen_codegen::GeneratorConfig;
///
/// let config = GeneratorConfig::from_toml_str(r#"
///     mapper_module_path = "crate::generated"
///     strict = true
/// "#).unwrap();
/// assert_eq!(config.mapper_module_path, "crate::generated");
/// assert_eq!(config.module_path, "crate");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Custom header comment. Defaults to an auto-generated notice.
    pub header: Option<String>,
    /// Module path prefixed to types parsed by `add_source_str`/`add_source_file`.
    pub module_path: String,
    /// Module the generated units end up in; used to reference converters
    /// from extension and registration units.
    pub mapper_module_path: String,
    /// Path of the runtime crate in the generated code.
    pub runtime_path: String,
    /// Default for `one_line` when a `map_to` directive omits it.
    pub one_line_default: bool,
    /// Promote unknown rule properties and eager-start factories to errors.
    pub strict: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            header: None,
            module_path: "crate".to_string(),
            mapper_module_path: "crate::mappers".to_string(),
            runtime_path: "::mapgen_runtime".to_string(),
            one_line_default: false,
            strict: false,
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, GenerationError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GenerationError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Header comment lines, `//`-prefixed, followed by a blank line.
    pub(crate) fn header_comment(&self) -> String {
        let mut output = String::new();
        match &self.header {
            Some(header) => {
                for line in header.lines() {
                    output.push_str("// ");
                    output.push_str(line);
                    output.push('\n');
                }
            }
            None => {
                output.push_str("// Auto-generated by mapgen-codegen\n");
                output.push_str("// DO NOT EDIT MANUALLY\n");
            }
        }
        output.push('\n');
        output
    }

    pub(crate) fn mapper_path(&self, mapper_name: &str) -> String {
        format!("{}::{}", self.mapper_module_path, mapper_name)
    }
}
