//! Name helpers shared by the synthesizers.

use std::collections::{BTreeMap, BTreeSet};

/// Last `::` segment of a path.
pub fn simple_name(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Convert PascalCase or camelCase to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            result.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    result
}

/// `use` lines for one emitted unit.
///
/// The first path claiming a simple name is imported under it; later paths
/// with the same simple name are written fully qualified instead.
#[derive(Debug, Default)]
pub(crate) struct Imports {
    uses: BTreeSet<String>,
    claimed: BTreeMap<String, String>,
}

impl Imports {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the spelling to use for `path` in the unit body.
    pub(crate) fn reference(&mut self, path: &str) -> String {
        let name = simple_name(path);
        if name == path {
            return path.to_string();
        }
        match self.claimed.get(name) {
            Some(owner) if owner == path => name.to_string(),
            Some(_) => path.to_string(),
            None => {
                self.claimed.insert(name.to_string(), path.to_string());
                self.uses.insert(path.to_string());
                name.to_string()
            }
        }
    }

    /// Add a raw `use` item, e.g. `::mapgen_runtime::Condition as _`.
    pub(crate) fn add_raw(&mut self, item: impl Into<String>) {
        self.uses.insert(item.into());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.uses.is_empty()
    }

    pub(crate) fn render(&self) -> String {
        let mut output = String::new();
        for item in &self.uses {
            output.push_str("use ");
            output.push_str(item);
            output.push_str(";\n");
        }
        output
    }
}
