//! Generation-time errors and diagnostics.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("`{type_name}`: mapping directive has no resolvable target ({reason})")]
    DirectiveMissingTarget { type_name: String, reason: String },

    #[error("`{type_name}`: source fields cannot be enumerated, only structs with named fields can be mapped")]
    SourceNotRecord { type_name: String },

    #[error("`{type_name}`: generated unit `{unit}` is already emitted for another mapping")]
    UnitNameCollision { type_name: String, unit: String },

    #[error("`{type_name}`: reverse mapper requested but the properties of `{target}` are not available")]
    UnresolvedReverseTarget { type_name: String, target: String },

    #[error("`{type_name}`: `register` can be used only together with a resolvable `map_to` directive")]
    RegistrationWithoutMapping { type_name: String },

    #[error(
        "`{mapper}`: assignments do not match the fields of `{target}` \
         (missing: {missing:?}, unknown: {unknown:?}, duplicated: {duplicated:?})"
    )]
    TargetFieldMismatch {
        mapper: String,
        target: String,
        missing: Vec<String>,
        unknown: Vec<String>,
        duplicated: Vec<String>,
    },

    #[error("`{type_name}`: property rule refers to unknown property `{property}`")]
    UnknownRuleProperty { type_name: String, property: String },

    #[error("`{type_name}`: more than one property rule for `{property}`, the last one is used")]
    DuplicateRule { type_name: String, property: String },

    #[error("`{type_name}`: condition `{condition}` is not a known type, write it as a full path")]
    UnknownCondition { type_name: String, condition: String },

    #[error("`{type_name}`: `created_at_start` has no effect on a factory registration")]
    EagerStartWithoutSingleton { type_name: String },

    #[error("`{type_name}`: argument `{argument}` of `{directive}` must be {expected}, found {found}")]
    InvalidArgument {
        type_name: String,
        directive: String,
        argument: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl GenerationError {
    /// The type a generation-time error is tied to.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            GenerationError::DirectiveMissingTarget { type_name, .. }
            | GenerationError::SourceNotRecord { type_name }
            | GenerationError::UnitNameCollision { type_name, .. }
            | GenerationError::UnknownCondition { type_name, .. }
            | GenerationError::UnresolvedReverseTarget { type_name, .. }
            | GenerationError::RegistrationWithoutMapping { type_name }
            | GenerationError::UnknownRuleProperty { type_name, .. }
            | GenerationError::DuplicateRule { type_name, .. }
            | GenerationError::EagerStartWithoutSingleton { type_name }
            | GenerationError::InvalidArgument { type_name, .. } => Some(type_name),
            GenerationError::TargetFieldMismatch { mapper, .. } => Some(mapper),
            GenerationError::Io(_) | GenerationError::Config(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The unit was generated; something looks off.
    Warning,
    /// The unit was skipped.
    Error,
}

/// A generation-time condition tied to the type that caused it.
#[derive(Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub type_name: String,
    pub error: GenerationError,
}

impl Diagnostic {
    pub fn warning(type_name: impl Into<String>, error: GenerationError) -> Self {
        Self {
            severity: Severity::Warning,
            type_name: type_name.into(),
            error,
        }
    }

    pub fn error(type_name: impl Into<String>, error: GenerationError) -> Self {
        Self {
            severity: Severity::Error,
            type_name: type_name.into(),
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level}: {}", self.error)
    }
}
