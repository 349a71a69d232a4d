//! Extension traits forwarding to a generated converter.

use crate::config::GeneratorConfig;
use crate::converter::{side_type, GeneratedUnit, UnitKind};
use crate::naming::Imports;
use crate::types::MapperSpec;

/// Render the `<Source>To<Target>Extensions` unit for `spec`.
///
/// The trait is implemented for the converter's input type and forwards to
/// the converter in its native form. Asynchronous converters also get a
/// `_blocking` adapter built on the runtime's `block_on`.
pub fn synthesize_extensions(spec: &MapperSpec, config: &GeneratorConfig) -> GeneratedUnit {
    let runtime = config.runtime_path.as_str();
    let name = spec.extensions_name();
    let method = spec.extension_method();

    let mut imports = Imports::new();
    let source = imports.reference(&spec.source.qualified_name);
    let target = imports.reference(&spec.target.qualified_name);
    let mapper = imports.reference(&config.mapper_path(&spec.mapper_name()));

    let input_type = side_type(&source, spec.source_nullable);
    let output_type = side_type(&target, spec.target_nullable);
    let result_type = format!("Result<{output_type}, {runtime}::MappingError>");
    let receiver = if spec.singleton {
        format!("{mapper}::instance()")
    } else {
        format!("&{mapper}::new()")
    };

    let mut output = imports.render();
    if !imports.is_empty() {
        output.push('\n');
    }

    output.push_str(&format!("/// Conversions from [`{source}`] into [`{target}`].\n"));
    if spec.is_async {
        output.push_str("#[allow(async_fn_in_trait)]\n");
    }
    output.push_str(&format!("pub trait {name} {{\n"));
    if spec.is_async {
        output.push_str(&format!("    async fn {method}(self) -> {result_type};\n\n"));
        output.push_str(&format!(
            "    /// Blocking form of [`{name}::{method}`].\n"
        ));
        output.push_str("    ///\n");
        output.push_str(
            "    /// Must not be called from inside an async context: it blocks the current\n",
        );
        output.push_str("    /// thread until the conversion completes.\n");
        output.push_str(&format!("    fn {method}_blocking(self) -> {result_type};\n"));
    } else {
        output.push_str(&format!("    fn {method}(self) -> {result_type};\n"));
    }
    output.push_str("}\n\n");

    output.push_str(&format!("impl {name} for {input_type} {{\n"));
    if spec.is_async {
        output.push_str(&format!("    async fn {method}(self) -> {result_type} {{\n"));
        output.push_str(&format!(
            "        {runtime}::AsyncMapper::convert({receiver}, self).await\n"
        ));
        output.push_str("    }\n\n");
        output.push_str(&format!("    fn {method}_blocking(self) -> {result_type} {{\n"));
        output.push_str(&format!("        {runtime}::block_on(self.{method}())\n"));
        output.push_str("    }\n");
    } else {
        output.push_str(&format!("    fn {method}(self) -> {result_type} {{\n"));
        output.push_str(&format!(
            "        {runtime}::Mapper::convert({receiver}, self)\n"
        ));
        output.push_str("    }\n");
    }
    output.push_str("}\n");

    tracing::debug!(extensions = %name, "synthesized extensions");
    GeneratedUnit {
        item: name.clone(),
        name,
        kind: UnitKind::Extensions,
        owner: spec.source.qualified_name.clone(),
        code: output,
    }
}
