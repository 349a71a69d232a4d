//! The generated registration module.

use std::any::TypeId;

use mapgen_example::mappers::*;
use mapgen_example::model::*;
use mapgen_runtime::di::{Lifecycle, Qualifier};
use mapgen_runtime::{AsyncMapperContract, MapperContract};

#[test]
fn test_entries_in_declaration_order() {
    let module = mappers_module();
    assert_eq!(module.len(), 3);

    let defs = module.definitions();
    assert!(defs[0].provides::<PersonToProfileMapper>());
    assert!(defs[1].provides::<&'static UserDtoToUserMapper>());
    assert!(defs[2].provides::<FilmToFilmViewMapper>());
}

#[test]
fn test_named_eager_bound_singleton() {
    let module = mappers_module();
    let person = module.find::<PersonToProfileMapper>().unwrap();

    assert_eq!(person.lifecycle(), Lifecycle::Singleton);
    assert_eq!(
        person.qualifier(),
        Some(&Qualifier::Named("profiles".to_string()))
    );
    assert!(person.is_created_at_start());
    assert!(person.is_bound_to::<AsyncMapperContract<Person, Profile>>());
    assert!(!person.is_bound_to::<MapperContract<Person, Profile>>());
    assert!(person.instantiate::<PersonToProfileMapper>().is_some());
}

#[test]
fn test_lambda_factory_of_singleton_mapper() {
    let module = mappers_module();
    let user = module.find::<&'static UserDtoToUserMapper>().unwrap();

    assert_eq!(user.lifecycle(), Lifecycle::Factory);
    assert_eq!(user.qualifier(), None);
    assert!(!user.is_created_at_start());
    assert!(user.bindings().is_empty());

    let instance = user.instantiate::<&'static UserDtoToUserMapper>().unwrap();
    assert!(std::ptr::eq(instance, UserDtoToUserMapper::instance()));
}

#[test]
fn test_type_qualifier() {
    let module = mappers_module();
    let film = module.find::<FilmToFilmViewMapper>().unwrap();

    assert_eq!(film.lifecycle(), Lifecycle::Singleton);
    match film.qualifier() {
        Some(Qualifier::Type { id, .. }) => assert_eq!(*id, TypeId::of::<Primary>()),
        other => panic!("expected a type qualifier, got {other:?}"),
    }
}
