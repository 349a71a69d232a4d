//! The type catalog a generation pass runs over.

use indexmap::IndexMap;

use crate::types::TypeInfo;

/// Candidate types keyed by qualified name, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: IndexMap<String, TypeInfo>,
}

/// Why a type reference did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    Unknown,
    Ambiguous(Vec<String>),
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a type. A replaced type keeps its discovery position.
    pub fn insert(&mut self, info: TypeInfo) {
        self.types.insert(info.qualified_name.clone(), info);
    }

    pub fn get(&self, qualified_name: &str) -> Option<&TypeInfo> {
        self.types.get(qualified_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolve a type reference as written in a directive.
    ///
    /// An exact qualified name wins; otherwise the reference must be a unique
    /// `::`-suffix of a catalogued name.
    pub fn resolve(&self, reference: &str) -> Result<&TypeInfo, LookupError> {
        let reference = reference.trim_start_matches("::");
        if let Some(info) = self.types.get(reference) {
            return Ok(info);
        }

        let suffix = format!("::{reference}");
        let mut matches = self
            .types
            .values()
            .filter(|info| info.qualified_name.ends_with(&suffix));

        match (matches.next(), matches.next()) {
            (Some(info), None) => Ok(info),
            (None, _) => Err(LookupError::Unknown),
            (Some(first), Some(second)) => {
                let mut candidates = vec![first.qualified_name.clone(), second.qualified_name.clone()];
                candidates.extend(matches.map(|info| info.qualified_name.clone()));
                Err(LookupError::Ambiguous(candidates))
            }
        }
    }
}

impl FromIterator<TypeInfo> for TypeCatalog {
    fn from_iter<I: IntoIterator<Item = TypeInfo>>(iter: I) -> Self {
        let mut catalog = TypeCatalog::new();
        for info in iter {
            catalog.insert(info);
        }
        catalog
    }
}
