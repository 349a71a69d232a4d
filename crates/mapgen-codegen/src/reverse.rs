//! Reverse mapping specs.

use crate::error::GenerationError;
use crate::types::MapperSpec;

/// Derive the `Target -> Source` spec from a forward spec.
///
/// Source and target swap along with their nullability, every rule is
/// inverted, and guards are dropped. The derived spec never asks for a
/// reverse of its own.
pub fn derive_reverse(spec: &MapperSpec) -> Result<MapperSpec, GenerationError> {
    if spec.target.properties.is_none() {
        return Err(GenerationError::UnresolvedReverseTarget {
            type_name: spec.source.qualified_name.clone(),
            target: spec.target.qualified_name.clone(),
        });
    }

    Ok(MapperSpec {
        source: spec.target.clone(),
        target: spec.source.clone(),
        is_async: spec.is_async,
        one_line: spec.one_line,
        source_nullable: spec.target_nullable,
        target_nullable: spec.source_nullable,
        singleton: spec.singleton,
        generate_reverse: false,
        generate_extensions: spec.generate_extensions,
        rules: spec.rules.inverted(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PropertyRule, TypeInfo};

    fn forward() -> MapperSpec {
        let mut spec = MapperSpec::new(
            TypeInfo::new("crate::model::UserDto", &["name", "age"]).type_ref(),
            TypeInfo::new("crate::model::User", &["full_name", "age"]).type_ref(),
        );
        spec.rules.insert(PropertyRule::new("name", "full_name"));
        spec.rules
            .insert(PropertyRule::new("age", "age").with_condition("crate::guards::Positive"));
        spec.source_nullable = true;
        spec.generate_reverse = true;
        spec.one_line = true;
        spec
    }

    #[test]
    fn test_reverse_swaps_sides() {
        let reverse = derive_reverse(&forward()).unwrap();

        assert_eq!(reverse.source.qualified_name, "crate::model::User");
        assert_eq!(reverse.target.qualified_name, "crate::model::UserDto");
        assert_eq!(reverse.mapper_name(), "UserToUserDtoMapper");
        assert!(!reverse.source_nullable);
        assert!(reverse.target_nullable);
        assert!(reverse.one_line);
        assert!(!reverse.generate_reverse);
    }

    #[test]
    fn test_reverse_inverts_rules_without_guards() {
        let reverse = derive_reverse(&forward()).unwrap();

        assert_eq!(reverse.rules.evaluate("full_name").target, "name");
        assert_eq!(reverse.rules.evaluate("age").condition, None);
    }

    #[test]
    fn test_reverse_requires_target_properties() {
        let mut spec = forward();
        spec.target = TypeInfo::opaque("crate::external::User").type_ref();

        let err = derive_reverse(&spec).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::UnresolvedReverseTarget { ref target, .. } if target == "crate::external::User"
        ));
    }

    #[test]
    fn test_reverse_of_reverse_is_forward_shape() {
        let forward = forward();
        let mut back = derive_reverse(&derive_reverse(&forward).unwrap()).unwrap();
        back.generate_reverse = true;

        assert_eq!(back.source, forward.source);
        assert_eq!(back.target, forward.target);
        assert_eq!(back.source_nullable, forward.source_nullable);
        assert_eq!(back.rules.evaluate("name").target, "full_name");
    }
}
