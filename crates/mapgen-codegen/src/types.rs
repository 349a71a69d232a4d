//! Type definitions for the code generator.

use crate::naming::{simple_name, to_snake_case};
use crate::rules::PropertyRules;

/// A directive argument value after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveValue {
    Bool(bool),
    Str(String),
    /// A type reference as written, e.g. `Profile` or `crate::model::Profile`.
    Type(String),
    /// A nested directive such as `property_map(from = "a", to = "b")`.
    Nested(Directive),
}

impl DirectiveValue {
    pub fn kind(&self) -> &'static str {
        match self {
            DirectiveValue::Bool(_) => "a boolean",
            DirectiveValue::Str(_) => "a string",
            DirectiveValue::Type(_) => "a type",
            DirectiveValue::Nested(_) => "a nested directive",
        }
    }
}

/// A named set of options attached to a type, e.g. `#[map_to(...)]`.
///
/// Arguments keep their written order; a key may repeat (nested
/// `property_map` entries do).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub args: Vec<(String, DirectiveValue)>,
}

impl Directive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument, builder style.
    ///
    /// ```
    /// use mapgen_codegen::{Directive, DirectiveValue};
    ///
    /// let directive = Directive::new("map_to")
    ///     .with("target", DirectiveValue::Type("Profile".into()))
    ///     .with("is_async", DirectiveValue::Bool(false));
    /// assert_eq!(directive.args.len(), 2);
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: DirectiveValue) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: DirectiveValue) {
        self.args.push((key.into(), value));
    }

    /// The last value written for `key`.
    pub fn arg(&self, key: &str) -> Option<&DirectiveValue> {
        self.args
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Every value written for `key`, in order.
    pub fn args_named<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a DirectiveValue> + 'a {
        self.args.iter().filter(move |(k, _)| k == key).map(|(_, v)| v)
    }
}

/// What is known about the shape of a catalogued type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    /// A struct with named fields.
    Record,
    /// An enum, tuple struct or unit struct. It cannot be built from a
    /// field list.
    NonRecord,
    /// Known by name only, e.g. a type declared outside the scanned sources.
    External,
}

/// One entry of the type catalog: a candidate type and its directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub qualified_name: String,
    pub shape: TypeShape,
    /// Ordered property names, or `None` when they cannot be enumerated
    /// (enums, tuple structs, externally declared types).
    pub properties: Option<Vec<String>>,
    pub directives: Vec<Directive>,
}

impl TypeInfo {
    /// A record type with named properties.
    pub fn new(qualified_name: impl Into<String>, properties: &[impl AsRef<str>]) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            shape: TypeShape::Record,
            properties: Some(properties.iter().map(|p| p.as_ref().to_string()).collect()),
            directives: Vec::new(),
        }
    }

    /// A type known by name only.
    pub fn opaque(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            shape: TypeShape::External,
            properties: None,
            directives: Vec::new(),
        }
    }

    /// An enum, tuple struct or unit struct.
    pub fn non_record(qualified_name: impl Into<String>) -> Self {
        Self {
            shape: TypeShape::NonRecord,
            ..Self::opaque(qualified_name)
        }
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    /// The first directive called `name`.
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    pub fn directives_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Directive> + 'a {
        self.directives.iter().filter(move |d| d.name == name)
    }

    pub fn type_ref(&self) -> TypeRef {
        TypeRef {
            qualified_name: self.qualified_name.clone(),
            properties: self.properties.clone(),
        }
    }
}

/// Source or target side of a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub qualified_name: String,
    pub properties: Option<Vec<String>>,
}

impl TypeRef {
    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }
}

/// A per-property mapping rule keyed by `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRule {
    pub from: String,
    pub to: String,
    /// Path of a type implementing `Condition<T>` for the property type.
    pub condition: Option<String>,
}

impl PropertyRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Canonical mapping specification for one source type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperSpec {
    pub source: TypeRef,
    pub target: TypeRef,
    pub is_async: bool,
    pub one_line: bool,
    pub source_nullable: bool,
    pub target_nullable: bool,
    pub singleton: bool,
    pub generate_reverse: bool,
    pub generate_extensions: bool,
    pub rules: PropertyRules,
}

impl MapperSpec {
    /// A spec with every option at its default.
    pub fn new(source: TypeRef, target: TypeRef) -> Self {
        Self {
            source,
            target,
            is_async: true,
            one_line: false,
            source_nullable: false,
            target_nullable: false,
            singleton: false,
            generate_reverse: false,
            generate_extensions: false,
            rules: PropertyRules::default(),
        }
    }

    /// `<Source>To<Target>Mapper`
    pub fn mapper_name(&self) -> String {
        format!(
            "{}To{}Mapper",
            self.source.simple_name(),
            self.target.simple_name()
        )
    }

    /// `<Source>To<Target>Extensions`
    pub fn extensions_name(&self) -> String {
        format!(
            "{}To{}Extensions",
            self.source.simple_name(),
            self.target.simple_name()
        )
    }

    /// `to_<target>` extension method name.
    pub fn extension_method(&self) -> String {
        format!("to_{}", to_snake_case(self.target.simple_name()))
    }
}

/// Registration lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Singleton,
    Factory,
}

/// Registration qualifier. A name always wins over a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    Named(String),
    /// Qualified path of the qualifier type.
    Type(String),
}

/// Shape of an emitted registration statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStyle {
    /// `single_of(Mapper::new)`
    Constructor,
    /// `single(|| Mapper::new())`
    Lambda,
}

/// What a registration entry needs to know about its converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperRef {
    pub mapper_name: String,
    pub source_type: String,
    pub target_type: String,
    pub is_async: bool,
    pub source_nullable: bool,
    pub target_nullable: bool,
    pub singleton: bool,
}

impl From<&MapperSpec> for MapperRef {
    fn from(spec: &MapperSpec) -> Self {
        Self {
            mapper_name: spec.mapper_name(),
            source_type: spec.source.qualified_name.clone(),
            target_type: spec.target.qualified_name.clone(),
            is_async: spec.is_async,
            source_nullable: spec.source_nullable,
            target_nullable: spec.target_nullable,
            singleton: spec.singleton,
        }
    }
}

/// One registration entry of the aggregated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationSpec {
    pub mapper: MapperRef,
    pub lifecycle: Lifecycle,
    pub eager_start: bool,
    pub qualifier: Option<Qualifier>,
    pub bind_interfaces: bool,
    pub style: RegistrationStyle,
}
