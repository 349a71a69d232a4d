//! Forward converter synthesis.
//!
//! The body of `convert` is picked from [`BODY_SHAPES`], a table keyed by
//! `(source_nullable, target_nullable, one_line)`. The one-line and block
//! entries of each nullability regime differ only in layout: they produce the
//! same value, or the same `MappingError`, for every input.

use std::collections::BTreeSet;

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::naming::Imports;
use crate::types::MapperSpec;

/// A unit of generated source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Unit name, e.g. `PersonToProfileMapper`.
    pub name: String,
    /// The item the unit exports (re-exported by bundles and `mod.rs`).
    pub item: String,
    pub kind: UnitKind,
    /// Qualified name of the type whose directives produced the unit.
    pub owner: String,
    /// Source text without the header comment.
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Mapper,
    ReverseMapper,
    Extensions,
    RegistrationModule,
}

/// One `field: value` pair of the constructor expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldInit {
    pub target: String,
    pub source: String,
    /// Spelling of the guard type, when the property is guarded.
    pub guard: Option<String>,
}

impl FieldInit {
    fn value_expr(&self) -> String {
        match &self.guard {
            None => format!("input.{}", self.source),
            Some(guard) => format!(
                "if {guard}::default().decide(&input.{src}) {{ input.{src} }} else {{ {guard}::default().default_value() }}",
                src = self.source,
            ),
        }
    }
}

/// The target constructor expression a body wraps.
pub(crate) struct Construction<'a> {
    pub target: &'a str,
    pub fields: &'a [FieldInit],
    pub runtime: &'a str,
}

impl Construction<'_> {
    /// `Target { a: input.a, b: input.b }`
    fn inline(&self) -> String {
        if self.fields.is_empty() {
            return format!("{} {{}}", self.target);
        }
        let fields: Vec<_> = self
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.target, f.value_expr()))
            .collect();
        format!("{} {{ {} }}", self.target, fields.join(", "))
    }

    /// `let output = Target { ... };` spread over lines.
    fn let_output(&self) -> Vec<String> {
        let mut lines = vec![format!("let output = {} {{", self.target)];
        for field in self.fields {
            lines.push(format!("    {}: {},", field.target, field.value_expr()));
        }
        lines.push("};".to_string());
        lines
    }

    fn missing_input(&self) -> String {
        format!("{}::MappingError::MissingInput", self.runtime)
    }
}

type BodyRenderer = fn(&Construction<'_>) -> Vec<String>;

/// One entry of the body table.
pub(crate) struct BodyShape {
    pub source_nullable: bool,
    pub target_nullable: bool,
    pub one_line: bool,
    render: BodyRenderer,
}

impl BodyShape {
    pub(crate) fn render(&self, construction: &Construction<'_>) -> Vec<String> {
        (self.render)(construction)
    }
}

/// Indexed by `source_nullable << 2 | target_nullable << 1 | one_line`.
pub(crate) static BODY_SHAPES: [BodyShape; 8] = [
    BodyShape {
        source_nullable: false,
        target_nullable: false,
        one_line: false,
        render: |c| {
            let mut lines = c.let_output();
            lines.push("Ok(output)".to_string());
            lines
        },
    },
    BodyShape {
        source_nullable: false,
        target_nullable: false,
        one_line: true,
        render: |c| vec![format!("Ok({})", c.inline())],
    },
    BodyShape {
        source_nullable: false,
        target_nullable: true,
        one_line: false,
        render: |c| {
            let mut lines = c.let_output();
            lines.push("Ok(Some(output))".to_string());
            lines
        },
    },
    BodyShape {
        source_nullable: false,
        target_nullable: true,
        one_line: true,
        render: |c| vec![format!("Ok(Some({}))", c.inline())],
    },
    BodyShape {
        source_nullable: true,
        target_nullable: false,
        one_line: false,
        render: |c| {
            let mut lines = vec![
                "let Some(input) = input else {".to_string(),
                format!("    return Err({});", c.missing_input()),
                "};".to_string(),
            ];
            lines.extend(c.let_output());
            lines.push("Ok(output)".to_string());
            lines
        },
    },
    BodyShape {
        source_nullable: true,
        target_nullable: false,
        one_line: true,
        render: |c| {
            vec![format!(
                "input.map(|input| {}).ok_or({})",
                c.inline(),
                c.missing_input()
            )]
        },
    },
    BodyShape {
        source_nullable: true,
        target_nullable: true,
        one_line: false,
        render: |c| {
            let mut lines = vec![
                "let Some(input) = input else {".to_string(),
                "    return Ok(None);".to_string(),
                "};".to_string(),
            ];
            lines.extend(c.let_output());
            lines.push("Ok(Some(output))".to_string());
            lines
        },
    },
    BodyShape {
        source_nullable: true,
        target_nullable: true,
        one_line: true,
        render: |c| vec![format!("Ok(input.map(|input| {}))", c.inline())],
    },
];

pub(crate) fn body_shape(source_nullable: bool, target_nullable: bool, one_line: bool) -> &'static BodyShape {
    let index = (usize::from(source_nullable) << 2)
        | (usize::from(target_nullable) << 1)
        | usize::from(one_line);
    let shape = &BODY_SHAPES[index];
    debug_assert!(
        shape.source_nullable == source_nullable
            && shape.target_nullable == target_nullable
            && shape.one_line == one_line
    );
    shape
}

/// `T` or `Option<T>`.
pub(crate) fn side_type(name: &str, nullable: bool) -> String {
    if nullable {
        format!("Option<{name}>")
    } else {
        name.to_string()
    }
}

/// Field assignments in source catalog order.
///
/// The source's properties must be known. When the target's properties are
/// known too, every target field must be assigned exactly once and only
/// existing fields may be assigned.
pub(crate) fn plan_fields(
    spec: &MapperSpec,
    imports: &mut Imports,
) -> Result<Vec<FieldInit>, GenerationError> {
    let source_properties = spec.source.properties.as_deref().ok_or_else(|| {
        GenerationError::SourceNotRecord {
            type_name: spec.source.qualified_name.clone(),
        }
    })?;

    let mut fields = Vec::with_capacity(source_properties.len());
    for property in source_properties {
        let resolved = spec.rules.evaluate(property);
        fields.push(FieldInit {
            target: resolved.target.to_string(),
            source: resolved.source.to_string(),
            guard: resolved.condition.map(|guard| imports.reference(guard)),
        });
    }

    let mut seen = BTreeSet::new();
    let mut duplicated = BTreeSet::new();
    for field in &fields {
        if !seen.insert(field.target.as_str()) {
            duplicated.insert(field.target.clone());
        }
    }

    let (missing, unknown) = match &spec.target.properties {
        Some(target_properties) => {
            let missing: Vec<String> = target_properties
                .iter()
                .filter(|p| !seen.contains(p.as_str()))
                .cloned()
                .collect();
            let unknown: Vec<String> = fields
                .iter()
                .filter(|f| !target_properties.contains(&f.target))
                .map(|f| f.target.clone())
                .collect();
            (missing, unknown)
        }
        None => (Vec::new(), Vec::new()),
    };

    if missing.is_empty() && unknown.is_empty() && duplicated.is_empty() {
        Ok(fields)
    } else {
        Err(GenerationError::TargetFieldMismatch {
            mapper: spec.mapper_name(),
            target: spec.target.qualified_name.clone(),
            missing,
            unknown,
            duplicated: duplicated.into_iter().collect(),
        })
    }
}

/// Render the converter unit for `spec`.
pub fn synthesize_converter(
    spec: &MapperSpec,
    kind: UnitKind,
    config: &GeneratorConfig,
) -> Result<GeneratedUnit, GenerationError> {
    let runtime = config.runtime_path.as_str();
    let mapper = spec.mapper_name();

    let mut imports = Imports::new();
    let source = imports.reference(&spec.source.qualified_name);
    let target = imports.reference(&spec.target.qualified_name);
    let fields = plan_fields(spec, &mut imports)?;
    if fields.iter().any(|f| f.guard.is_some()) {
        imports.add_raw(format!("{runtime}::Condition as _"));
    }

    let input_type = side_type(&source, spec.source_nullable);
    let output_type = side_type(&target, spec.target_nullable);
    let construction = Construction {
        target: &target,
        fields: &fields,
        runtime,
    };
    let body = body_shape(spec.source_nullable, spec.target_nullable, spec.one_line)
        .render(&construction);

    let mut output = imports.render();
    if !imports.is_empty() {
        output.push('\n');
    }

    if spec.singleton {
        output.push_str(&format!(
            "/// Converts [`{source}`] into [`{target}`]. Shared through [`{mapper}::instance`].\n"
        ));
        output.push_str("#[derive(Debug)]\n");
        output.push_str(&format!("pub struct {mapper} {{\n    _private: (),\n}}\n\n"));
        output.push_str(&format!("impl {mapper} {{\n"));
        output.push_str("    pub fn instance() -> &'static Self {\n");
        output.push_str(&format!(
            "        static INSTANCE: {mapper} = {mapper} {{ _private: () }};\n"
        ));
        output.push_str("        &INSTANCE\n");
        output.push_str("    }\n}\n\n");
    } else {
        output.push_str(&format!("/// Converts [`{source}`] into [`{target}`].\n"));
        output.push_str("#[derive(Debug, Clone, Copy, Default)]\n");
        output.push_str(&format!("pub struct {mapper};\n\n"));
        output.push_str(&format!("impl {mapper} {{\n"));
        output.push_str("    pub const fn new() -> Self {\n        Self\n    }\n}\n\n");
    }

    let (contract, fn_keyword) = if spec.is_async {
        ("AsyncMapper", "async fn")
    } else {
        ("Mapper", "fn")
    };
    output.push_str(&format!(
        "impl {runtime}::{contract}<{input_type}, {output_type}> for {mapper} {{\n"
    ));
    output.push_str(&format!(
        "    {fn_keyword} convert(&self, input: {input_type}) -> Result<{output_type}, {runtime}::MappingError> {{\n"
    ));
    for line in body {
        output.push_str("        ");
        output.push_str(&line);
        output.push('\n');
    }
    output.push_str("    }\n}\n");

    tracing::debug!(mapper = %mapper, ?kind, "synthesized converter");
    Ok(GeneratedUnit {
        item: mapper.clone(),
        name: mapper,
        kind,
        owner: spec.source.qualified_name.clone(),
        code: output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PropertyRule, TypeInfo};

    fn person_to_profile() -> MapperSpec {
        MapperSpec::new(
            TypeInfo::new("crate::model::Person", &["name", "age"]).type_ref(),
            TypeInfo::new("crate::model::Profile", &["name", "age"]).type_ref(),
        )
    }

    fn fields() -> Vec<FieldInit> {
        vec![
            FieldInit {
                target: "name".to_string(),
                source: "name".to_string(),
                guard: None,
            },
            FieldInit {
                target: "years".to_string(),
                source: "age".to_string(),
                guard: Some("AdultOnly".to_string()),
            },
        ]
    }

    fn render(source_nullable: bool, target_nullable: bool, one_line: bool) -> String {
        let fields = fields();
        let construction = Construction {
            target: "Profile",
            fields: &fields,
            runtime: "::mapgen_runtime",
        };
        body_shape(source_nullable, target_nullable, one_line)
            .render(&construction)
            .join("\n")
    }

    const GUARDED_AGE: &str = "if AdultOnly::default().decide(&input.age) { input.age } else { AdultOnly::default().default_value() }";

    #[test]
    fn test_table_is_keyed_by_index() {
        for (index, shape) in BODY_SHAPES.iter().enumerate() {
            let found = body_shape(shape.source_nullable, shape.target_nullable, shape.one_line);
            assert!(std::ptr::eq(found, shape), "entry {index} is out of place");
        }
    }

    #[test]
    fn test_body_direct_one_line() {
        assert_eq!(
            render(false, false, true),
            format!("Ok(Profile {{ name: input.name, years: {GUARDED_AGE} }})")
        );
    }

    #[test]
    fn test_body_direct_block() {
        assert_eq!(
            render(false, false, false),
            format!(
                "let output = Profile {{\n    name: input.name,\n    years: {GUARDED_AGE},\n}};\nOk(output)"
            )
        );
    }

    #[test]
    fn test_body_widened_one_line() {
        assert_eq!(
            render(false, true, true),
            format!("Ok(Some(Profile {{ name: input.name, years: {GUARDED_AGE} }}))")
        );
    }

    #[test]
    fn test_body_widened_block() {
        let body = render(false, true, false);
        assert!(body.starts_with("let output = Profile {\n"));
        assert!(body.ends_with("};\nOk(Some(output))"));
    }

    #[test]
    fn test_body_required_one_line() {
        assert_eq!(
            render(true, false, true),
            format!(
                "input.map(|input| Profile {{ name: input.name, years: {GUARDED_AGE} }}).ok_or(::mapgen_runtime::MappingError::MissingInput)"
            )
        );
    }

    #[test]
    fn test_body_required_block() {
        let body = render(true, false, false);
        assert!(body.starts_with(
            "let Some(input) = input else {\n    return Err(::mapgen_runtime::MappingError::MissingInput);\n};\n"
        ));
        assert!(body.ends_with("};\nOk(output)"));
    }

    #[test]
    fn test_body_optional_one_line() {
        assert_eq!(
            render(true, true, true),
            format!("Ok(input.map(|input| Profile {{ name: input.name, years: {GUARDED_AGE} }}))")
        );
    }

    #[test]
    fn test_body_optional_block() {
        let body = render(true, true, false);
        assert!(body.starts_with("let Some(input) = input else {\n    return Ok(None);\n};\n"));
        assert!(body.ends_with("};\nOk(Some(output))"));
    }

    #[test]
    fn test_person_to_profile_defaults() {
        let unit =
            synthesize_converter(&person_to_profile(), UnitKind::Mapper, &GeneratorConfig::default())
                .unwrap();

        assert_eq!(unit.name, "PersonToProfileMapper");
        assert_eq!(unit.owner, "crate::model::Person");
        assert!(unit.code.starts_with("use crate::model::Person;\nuse crate::model::Profile;\n\n"));
        assert!(unit.code.contains("#[derive(Debug, Clone, Copy, Default)]\npub struct PersonToProfileMapper;"));
        assert!(unit.code.contains(
            "impl ::mapgen_runtime::AsyncMapper<Person, Profile> for PersonToProfileMapper {"
        ));
        assert!(unit.code.contains(
            "    async fn convert(&self, input: Person) -> Result<Profile, ::mapgen_runtime::MappingError> {"
        ));
        assert!(unit.code.contains("        let output = Profile {\n            name: input.name,\n            age: input.age,\n        };\n        Ok(output)\n"));
    }

    #[test]
    fn test_sync_singleton_nullable() {
        let mut spec = person_to_profile();
        spec.is_async = false;
        spec.singleton = true;
        spec.source_nullable = true;
        spec.one_line = true;

        let unit = synthesize_converter(&spec, UnitKind::Mapper, &GeneratorConfig::default()).unwrap();
        assert!(unit.code.contains("pub struct PersonToProfileMapper {\n    _private: (),\n}"));
        assert!(unit.code.contains("pub fn instance() -> &'static Self {"));
        assert!(unit.code.contains(
            "impl ::mapgen_runtime::Mapper<Option<Person>, Profile> for PersonToProfileMapper {"
        ));
        assert!(unit.code.contains("    fn convert(&self, input: Option<Person>)"));
        assert!(!unit.code.contains("async fn"));
    }

    #[test]
    fn test_guard_imports_condition_trait() {
        let mut spec = person_to_profile();
        spec.rules
            .insert(PropertyRule::new("age", "age").with_condition("crate::guards::AdultOnly"));

        let unit = synthesize_converter(&spec, UnitKind::Mapper, &GeneratorConfig::default()).unwrap();
        assert!(unit.code.contains("use ::mapgen_runtime::Condition as _;\n"));
        assert!(unit.code.contains("use crate::guards::AdultOnly;\n"));
        assert!(unit.code.contains("age: if AdultOnly::default().decide(&input.age)"));
    }

    #[test]
    fn test_rename_is_applied() {
        let mut spec = person_to_profile();
        spec.target = TypeInfo::new("crate::model::Profile", &["display_name", "age"]).type_ref();
        spec.rules.insert(PropertyRule::new("name", "display_name"));
        spec.one_line = true;

        let unit = synthesize_converter(&spec, UnitKind::Mapper, &GeneratorConfig::default()).unwrap();
        assert!(unit
            .code
            .contains("Ok(Profile { display_name: input.name, age: input.age })"));
    }

    #[test]
    fn test_field_mismatch_rejected() {
        let mut spec = person_to_profile();
        spec.target = TypeInfo::new("crate::model::Profile", &["name", "email"]).type_ref();

        let err = synthesize_converter(&spec, UnitKind::Mapper, &GeneratorConfig::default())
            .unwrap_err();
        match err {
            GenerationError::TargetFieldMismatch {
                missing, unknown, ..
            } => {
                assert_eq!(missing, ["email"]);
                assert_eq!(unknown, ["age"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let mut spec = person_to_profile();
        spec.target = TypeInfo::opaque("crate::model::Profile").type_ref();
        spec.rules.insert(PropertyRule::new("age", "name"));

        let err = synthesize_converter(&spec, UnitKind::Mapper, &GeneratorConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::TargetFieldMismatch { ref duplicated, .. } if duplicated == &["name"]
        ));
    }

    #[test]
    fn test_opaque_target_is_trusted() {
        let mut spec = person_to_profile();
        spec.target = TypeInfo::opaque("crate::model::Profile").type_ref();
        assert!(synthesize_converter(&spec, UnitKind::Mapper, &GeneratorConfig::default()).is_ok());
    }

    #[test]
    fn test_source_without_fields_rejected() {
        let mut spec = person_to_profile();
        spec.source = TypeInfo::non_record("crate::model::Kind").type_ref();

        let err = synthesize_converter(&spec, UnitKind::Mapper, &GeneratorConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::SourceNotRecord { ref type_name } if type_name == "crate::model::Kind"
        ));
    }

    #[test]
    fn test_output_is_deterministic() {
        let config = GeneratorConfig::default();
        let first = synthesize_converter(&person_to_profile(), UnitKind::Mapper, &config).unwrap();
        let second = synthesize_converter(&person_to_profile(), UnitKind::Mapper, &config).unwrap();
        assert_eq!(first, second);
    }
}
