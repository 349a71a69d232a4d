//! Declaration sink for generated registration modules.
//!
//! A [`Module`] only records what the generated code declares: which type is
//! provided, with which lifecycle, qualifier, eager-start flag and bound
//! contracts. Turning those declarations into live instances is left to the
//! container that consumes the module.

use std::any::{type_name, Any, TypeId};
use std::fmt;

/// How often the container should invoke a definition's factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// One shared instance.
    Singleton,
    /// A fresh instance per lookup.
    Factory,
}

/// Disambiguates several definitions of the same contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    Named(String),
    Type { id: TypeId, name: &'static str },
}

/// A contract a definition is additionally reachable through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub id: TypeId,
    pub name: &'static str,
}

type Factory = Box<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// One registration declaration.
pub struct Definition {
    type_id: TypeId,
    type_name: &'static str,
    lifecycle: Lifecycle,
    qualifier: Option<Qualifier>,
    created_at_start: bool,
    bindings: Vec<Binding>,
    factory: Factory,
}

impl Definition {
    fn new<T, F>(lifecycle: Lifecycle, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            lifecycle,
            qualifier: None,
            created_at_start: false,
            bindings: Vec::new(),
            factory: Box::new(move || Box::new(factory()) as Box<dyn Any + Send + Sync>),
        }
    }

    /// Qualify this definition by name.
    pub fn named(&mut self, name: impl Into<String>) -> &mut Self {
        self.qualifier = Some(Qualifier::Named(name.into()));
        self
    }

    /// Qualify this definition by a type.
    pub fn qualified_by<Q: ?Sized + 'static>(&mut self) -> &mut Self {
        self.qualifier = Some(Qualifier::Type {
            id: TypeId::of::<Q>(),
            name: type_name::<Q>(),
        });
        self
    }

    /// Ask the container to create the instance when it starts.
    pub fn created_at_start(&mut self) -> &mut Self {
        self.created_at_start = true;
        self
    }

    /// Make the definition reachable through contract `C`.
    pub fn bind<C: ?Sized + 'static>(&mut self) -> &mut Self {
        let binding = Binding {
            id: TypeId::of::<C>(),
            name: type_name::<C>(),
        };
        if !self.bindings.contains(&binding) {
            self.bindings.push(binding);
        }
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    pub fn is_created_at_start(&self) -> bool {
        self.created_at_start
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Whether the definition provides `T` directly.
    pub fn provides<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Whether the definition was bound to contract `C`.
    pub fn is_bound_to<C: ?Sized + 'static>(&self) -> bool {
        let id = TypeId::of::<C>();
        self.bindings.iter().any(|b| b.id == id)
    }

    /// Invoke the factory. Returns `None` when `T` is not the provided type.
    pub fn instantiate<T: 'static>(&self) -> Option<T> {
        (self.factory)().downcast::<T>().ok().map(|boxed| *boxed)
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("type_name", &self.type_name)
            .field("lifecycle", &self.lifecycle)
            .field("qualifier", &self.qualifier)
            .field("created_at_start", &self.created_at_start)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

/// An ordered list of registration declarations.
#[derive(Debug, Default)]
pub struct Module {
    definitions: Vec<Definition>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a singleton built by a constructor function.
    pub fn single_of<T: Any + Send + Sync>(&mut self, constructor: fn() -> T) -> &mut Definition {
        self.push(Definition::new(Lifecycle::Singleton, constructor))
    }

    /// Declare a factory built by a constructor function.
    pub fn factory_of<T: Any + Send + Sync>(&mut self, constructor: fn() -> T) -> &mut Definition {
        self.push(Definition::new(Lifecycle::Factory, constructor))
    }

    /// Declare a singleton built by a closure.
    pub fn single<T, F>(&mut self, factory: F) -> &mut Definition
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.push(Definition::new(Lifecycle::Singleton, factory))
    }

    /// Declare a factory built by a closure.
    pub fn factory<T, F>(&mut self, factory: F) -> &mut Definition
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.push(Definition::new(Lifecycle::Factory, factory))
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// First definition providing `T`.
    pub fn find<T: 'static>(&self) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.provides::<T>())
    }

    fn push(&mut self, definition: Definition) -> &mut Definition {
        let index = self.definitions.len();
        self.definitions.push(definition);
        &mut self.definitions[index]
    }
}
