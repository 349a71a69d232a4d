//! Normalizes a `map_to` directive into a [`MapperSpec`].

use crate::catalog::{LookupError, TypeCatalog};
use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::rules::PropertyRules;
use crate::types::{Directive, DirectiveValue, MapperSpec, PropertyRule, TypeInfo, TypeShape};

pub const MAP_TO: &str = "map_to";
pub const PROPERTY_MAP: &str = "property_map";
pub const REGISTER: &str = "register";

/// A resolved spec plus the non-fatal findings made while resolving it.
#[derive(Debug)]
pub struct ResolvedMapper {
    pub spec: MapperSpec,
    pub warnings: Vec<GenerationError>,
}

/// Reads typed arguments out of one directive, reporting type mismatches
/// against the owning type.
pub(crate) struct ArgReader<'a> {
    type_name: &'a str,
    directive: &'a Directive,
}

impl<'a> ArgReader<'a> {
    pub(crate) fn new(type_name: &'a str, directive: &'a Directive) -> Self {
        Self {
            type_name,
            directive,
        }
    }

    pub(crate) fn bool_or(&self, key: &str, default: bool) -> Result<bool, GenerationError> {
        match self.directive.arg(key) {
            None => Ok(default),
            Some(DirectiveValue::Bool(value)) => Ok(*value),
            Some(other) => Err(self.invalid(key, "a boolean", other)),
        }
    }

    /// A string argument. Empty strings count as absent.
    pub(crate) fn string(&self, key: &str) -> Result<Option<&'a str>, GenerationError> {
        match self.directive.arg(key) {
            None => Ok(None),
            Some(DirectiveValue::Str(value)) if value.is_empty() => Ok(None),
            Some(DirectiveValue::Str(value)) => Ok(Some(value.as_str())),
            Some(other) => Err(self.invalid(key, "a string", other)),
        }
    }

    pub(crate) fn type_ref(&self, key: &str) -> Result<Option<&'a str>, GenerationError> {
        match self.directive.arg(key) {
            None => Ok(None),
            Some(DirectiveValue::Type(value)) => Ok(Some(value.as_str())),
            Some(other) => Err(self.invalid(key, "a type", other)),
        }
    }

    pub(crate) fn invalid(
        &self,
        key: &str,
        expected: &'static str,
        found: &DirectiveValue,
    ) -> GenerationError {
        GenerationError::InvalidArgument {
            type_name: self.type_name.to_string(),
            directive: self.directive.name.clone(),
            argument: key.to_string(),
            expected,
            found: found.kind(),
        }
    }
}

/// Build the canonical spec for `info`. Pure: reads only its arguments.
///
/// Fails with [`GenerationError::DirectiveMissingTarget`] when the type has
/// no `map_to` directive or its `target` is absent, not a type, not in the
/// catalog or catalogued as an enum or tuple struct. A source whose fields
/// cannot be enumerated fails with [`GenerationError::SourceNotRecord`].
/// Rules naming unknown source properties and bare condition names missing
/// from the catalog are reported as warnings unless `config.strict` is set.
pub fn resolve_mapper_spec(
    info: &TypeInfo,
    catalog: &TypeCatalog,
    config: &GeneratorConfig,
) -> Result<ResolvedMapper, GenerationError> {
    let type_name = info.qualified_name.as_str();
    let missing_target = |reason: String| GenerationError::DirectiveMissingTarget {
        type_name: type_name.to_string(),
        reason,
    };

    let directive = info
        .directive(MAP_TO)
        .ok_or_else(|| missing_target("no `map_to` directive".to_string()))?;
    let args = ArgReader::new(type_name, directive);

    let target_ref = match directive.arg("target") {
        None => return Err(missing_target("`target` is absent".to_string())),
        Some(DirectiveValue::Type(reference)) => reference,
        Some(other) => {
            return Err(missing_target(format!(
                "`target` must be a type, found {}",
                other.kind()
            )))
        }
    };
    let target = catalog.resolve(target_ref).map_err(|err| match err {
        LookupError::Unknown => missing_target(format!("`{target_ref}` is not a known type")),
        LookupError::Ambiguous(candidates) => missing_target(format!(
            "`{target_ref}` is ambiguous: {}",
            candidates.join(", ")
        )),
    })?;
    if target.shape == TypeShape::NonRecord {
        return Err(missing_target(format!(
            "`{}` is not a record type",
            target.qualified_name
        )));
    }
    if info.properties.is_none() {
        return Err(GenerationError::SourceNotRecord {
            type_name: type_name.to_string(),
        });
    }

    let mut warnings = Vec::new();
    let rules = collect_rules(info, directive, catalog, config, &mut warnings)?;

    if let Some(properties) = &info.properties {
        for rule in rules.iter() {
            if properties.iter().any(|p| *p == rule.from) {
                continue;
            }
            let finding = GenerationError::UnknownRuleProperty {
                type_name: type_name.to_string(),
                property: rule.from.clone(),
            };
            if config.strict {
                return Err(finding);
            }
            warnings.push(finding);
        }
    }

    let mut spec = MapperSpec::new(info.type_ref(), target.type_ref());
    spec.is_async = args.bool_or("is_async", true)?;
    spec.one_line = args.bool_or("one_line", config.one_line_default)?;
    spec.source_nullable = args.bool_or("source_nullable", false)?;
    spec.target_nullable = args.bool_or("target_nullable", false)?;
    spec.singleton = args.bool_or("singleton", false)?;
    spec.generate_reverse = args.bool_or("generate_reverse", false)?;
    spec.generate_extensions = args.bool_or("generate_extensions", false)?;
    spec.rules = rules;

    Ok(ResolvedMapper { spec, warnings })
}

/// Nested `property_map(...)` entries first, then standalone `property_map`
/// directives, in written order.
fn collect_rules(
    info: &TypeInfo,
    map_to: &Directive,
    catalog: &TypeCatalog,
    config: &GeneratorConfig,
    warnings: &mut Vec<GenerationError>,
) -> Result<PropertyRules, GenerationError> {
    let type_name = info.qualified_name.as_str();
    let mut entries: Vec<&Directive> = Vec::new();

    for value in map_to.args_named(PROPERTY_MAP) {
        match value {
            DirectiveValue::Nested(entry) => entries.push(entry),
            other => {
                return Err(ArgReader::new(type_name, map_to).invalid(
                    PROPERTY_MAP,
                    "a nested directive",
                    other,
                ))
            }
        }
    }
    entries.extend(info.directives_named(PROPERTY_MAP));

    let mut rules = PropertyRules::new();
    for entry in entries {
        let args = ArgReader::new(type_name, entry);
        let (Some(from), Some(to)) = (args.string("from")?, args.string("to")?) else {
            tracing::warn!(type_name = %type_name, "ignoring `property_map` without `from` and `to`");
            continue;
        };

        let mut rule = PropertyRule::new(from, to);
        if let Some(condition) = args.type_ref("condition")? {
            let resolved = match catalog.resolve(condition) {
                Ok(info) => info.qualified_name.clone(),
                Err(_) => {
                    // A bare name would be out of scope inside the generated unit.
                    if !condition.contains("::") {
                        let finding = GenerationError::UnknownCondition {
                            type_name: type_name.to_string(),
                            condition: condition.to_string(),
                        };
                        if config.strict {
                            return Err(finding);
                        }
                        warnings.push(finding);
                    }
                    condition.to_string()
                }
            };
            rule = rule.with_condition(resolved);
        }

        if rules.insert(rule).is_some() {
            warnings.push(GenerationError::DuplicateRule {
                type_name: type_name.to_string(),
                property: from.to_string(),
            });
        }
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(map_to: Directive) -> TypeInfo {
        TypeInfo::new("crate::model::Person", &["name", "age"]).with_directive(map_to)
    }

    fn catalog() -> TypeCatalog {
        [
            TypeInfo::new("crate::model::Profile", &["name", "age"]),
            TypeInfo::opaque("crate::guards::AdultOnly"),
        ]
        .into_iter()
        .collect()
    }

    fn map_to_profile() -> Directive {
        Directive::new(MAP_TO).with("target", DirectiveValue::Type("Profile".to_string()))
    }

    fn rule(from: &str, to: &str) -> DirectiveValue {
        DirectiveValue::Nested(
            Directive::new(PROPERTY_MAP)
                .with("from", DirectiveValue::Str(from.to_string()))
                .with("to", DirectiveValue::Str(to.to_string())),
        )
    }

    #[test]
    fn test_defaults() {
        let resolved =
            resolve_mapper_spec(&person(map_to_profile()), &catalog(), &GeneratorConfig::default())
                .unwrap();
        let spec = resolved.spec;

        assert_eq!(spec.source.qualified_name, "crate::model::Person");
        assert_eq!(spec.target.qualified_name, "crate::model::Profile");
        assert!(spec.is_async);
        assert!(!spec.one_line);
        assert!(!spec.source_nullable);
        assert!(!spec.target_nullable);
        assert!(!spec.singleton);
        assert!(!spec.generate_reverse);
        assert!(!spec.generate_extensions);
        assert!(spec.rules.is_empty());
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_one_line_default_follows_config() {
        let config = GeneratorConfig {
            one_line_default: true,
            ..GeneratorConfig::default()
        };
        let spec = resolve_mapper_spec(&person(map_to_profile()), &catalog(), &config)
            .unwrap()
            .spec;
        assert!(spec.one_line);

        let explicit = map_to_profile().with("one_line", DirectiveValue::Bool(false));
        let spec = resolve_mapper_spec(&person(explicit), &catalog(), &config)
            .unwrap()
            .spec;
        assert!(!spec.one_line);
    }

    #[test]
    fn test_missing_target() {
        let err = resolve_mapper_spec(
            &person(Directive::new(MAP_TO)),
            &catalog(),
            &GeneratorConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::DirectiveMissingTarget { .. }));
    }

    #[test]
    fn test_target_not_a_type() {
        let directive =
            Directive::new(MAP_TO).with("target", DirectiveValue::Str("Profile".to_string()));
        let err = resolve_mapper_spec(&person(directive), &catalog(), &GeneratorConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("must be a type"));
    }

    #[test]
    fn test_unknown_target() {
        let directive =
            Directive::new(MAP_TO).with("target", DirectiveValue::Type("Film".to_string()));
        let err = resolve_mapper_spec(&person(directive), &catalog(), &GeneratorConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("`Film` is not a known type"));
    }

    #[test]
    fn test_nested_and_standalone_rules() {
        let directive = map_to_profile().with("property_map", rule("name", "display_name"));
        let standalone = Directive::new(PROPERTY_MAP)
            .with("from", DirectiveValue::Str("age".to_string()))
            .with("to", DirectiveValue::Str("years".to_string()))
            .with("condition", DirectiveValue::Type("AdultOnly".to_string()));
        let info = person(directive).with_directive(standalone);

        let spec = resolve_mapper_spec(&info, &catalog(), &GeneratorConfig::default())
            .unwrap()
            .spec;
        assert_eq!(spec.rules.evaluate("name").target, "display_name");
        let age = spec.rules.evaluate("age");
        assert_eq!(age.target, "years");
        assert_eq!(age.condition, Some("crate::guards::AdultOnly"));
    }

    #[test]
    fn test_uncatalogued_condition_kept_as_written() {
        let nested = Directive::new(PROPERTY_MAP)
            .with("from", DirectiveValue::Str("age".to_string()))
            .with("to", DirectiveValue::Str("age".to_string()))
            .with("condition", DirectiveValue::Type("crate::other::Positive".to_string()));
        let directive = map_to_profile().with("property_map", DirectiveValue::Nested(nested));

        let spec = resolve_mapper_spec(&person(directive), &catalog(), &GeneratorConfig::default())
            .unwrap()
            .spec;
        assert_eq!(
            spec.rules.evaluate("age").condition,
            Some("crate::other::Positive")
        );
    }

    #[test]
    fn test_bare_uncatalogued_condition_warns() {
        let nested = Directive::new(PROPERTY_MAP)
            .with("from", DirectiveValue::Str("age".to_string()))
            .with("to", DirectiveValue::Str("age".to_string()))
            .with("condition", DirectiveValue::Type("Positive".to_string()));
        let directive = map_to_profile().with("property_map", DirectiveValue::Nested(nested));

        let resolved =
            resolve_mapper_spec(&person(directive.clone()), &catalog(), &GeneratorConfig::default())
                .unwrap();
        assert!(matches!(
            resolved.warnings.as_slice(),
            [GenerationError::UnknownCondition { condition, .. }] if condition == "Positive"
        ));

        let config = GeneratorConfig {
            strict: true,
            ..GeneratorConfig::default()
        };
        let err = resolve_mapper_spec(&person(directive), &catalog(), &config).unwrap_err();
        assert!(matches!(err, GenerationError::UnknownCondition { .. }));
    }

    #[test]
    fn test_enum_target_rejected() {
        let catalog: TypeCatalog = [TypeInfo::non_record("crate::model::Status")].into_iter().collect();
        let directive =
            Directive::new(MAP_TO).with("target", DirectiveValue::Type("Status".to_string()));

        let err = resolve_mapper_spec(&person(directive), &catalog, &GeneratorConfig::default())
            .unwrap_err();
        assert!(matches!(err, GenerationError::DirectiveMissingTarget { .. }));
        assert!(err.to_string().contains("`crate::model::Status` is not a record type"));
    }

    #[test]
    fn test_external_target_accepted() {
        let catalog: TypeCatalog = [TypeInfo::opaque("crate::external::Profile")].into_iter().collect();
        let spec = resolve_mapper_spec(&person(map_to_profile()), &catalog, &GeneratorConfig::default())
            .unwrap()
            .spec;
        assert!(spec.target.properties.is_none());
    }

    #[test]
    fn test_source_without_fields_rejected() {
        let kind = TypeInfo::non_record("crate::model::Kind").with_directive(map_to_profile());
        let err = resolve_mapper_spec(&kind, &catalog(), &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::SourceNotRecord { ref type_name } if type_name == "crate::model::Kind"
        ));
    }

    #[test]
    fn test_unknown_rule_property_warns() {
        let directive = map_to_profile().with("property_map", rule("nickname", "name"));
        let resolved =
            resolve_mapper_spec(&person(directive), &catalog(), &GeneratorConfig::default())
                .unwrap();
        assert!(matches!(
            resolved.warnings.as_slice(),
            [GenerationError::UnknownRuleProperty { property, .. }] if property == "nickname"
        ));
    }

    #[test]
    fn test_unknown_rule_property_fails_when_strict() {
        let directive = map_to_profile().with("property_map", rule("nickname", "name"));
        let config = GeneratorConfig {
            strict: true,
            ..GeneratorConfig::default()
        };
        let err = resolve_mapper_spec(&person(directive), &catalog(), &config).unwrap_err();
        assert!(matches!(err, GenerationError::UnknownRuleProperty { .. }));
    }

    #[test]
    fn test_duplicate_rule_warns_and_last_wins() {
        let directive = map_to_profile()
            .with("property_map", rule("name", "first"))
            .with("property_map", rule("name", "second"));
        let resolved =
            resolve_mapper_spec(&person(directive), &catalog(), &GeneratorConfig::default())
                .unwrap();
        assert_eq!(resolved.spec.rules.evaluate("name").target, "second");
        assert!(matches!(
            resolved.warnings.as_slice(),
            [GenerationError::DuplicateRule { .. }]
        ));
    }

    #[test]
    fn test_wrong_argument_kind() {
        let directive = map_to_profile().with("is_async", DirectiveValue::Str("no".to_string()));
        let err = resolve_mapper_spec(&person(directive), &catalog(), &GeneratorConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidArgument { expected: "a boolean", found: "a string", .. }
        ));
    }
}
