//! Property rules and their per-property evaluation.

use indexmap::IndexMap;

use crate::types::PropertyRule;

/// Rules keyed by source property name, in first-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyRules {
    rules: IndexMap<String, PropertyRule>,
}

impl PropertyRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule. A rule for the same `from` replaces the earlier one in
    /// place and the replaced rule is returned.
    pub fn insert(&mut self, rule: PropertyRule) -> Option<PropertyRule> {
        self.rules.insert(rule.from.clone(), rule)
    }

    pub fn get(&self, from: &str) -> Option<&PropertyRule> {
        self.rules.get(from)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyRule> {
        self.rules.values()
    }

    /// Resolve one source property.
    pub fn evaluate<'a>(&'a self, property: &'a str) -> ResolvedProperty<'a> {
        match self.rules.get(property) {
            Some(rule) => ResolvedProperty {
                source: property,
                target: &rule.to,
                condition: rule.condition.as_deref(),
            },
            None => ResolvedProperty {
                source: property,
                target: property,
                condition: None,
            },
        }
    }

    /// Rules with `to` and `from` swapped. Guards do not carry over.
    pub fn inverted(&self) -> PropertyRules {
        let mut inverted = PropertyRules::new();
        for rule in self.rules.values() {
            inverted.insert(PropertyRule::new(&rule.to, &rule.from));
        }
        inverted
    }
}

impl FromIterator<PropertyRule> for PropertyRules {
    fn from_iter<I: IntoIterator<Item = PropertyRule>>(iter: I) -> Self {
        let mut rules = PropertyRules::new();
        for rule in iter {
            rules.insert(rule);
        }
        rules
    }
}

/// Where one source property lands in the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedProperty<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub condition: Option<&'a str>,
}
