#![forbid(unsafe_code)]
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

use crate::query::ast::OperatorType;

/// Result alias used throughout the derived-query pipeline.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Structured errors emitted while compiling a derived query.
///
/// Every variant aborts the compile pass. Non-fatal conditions (distinct
/// without a count projection, a missing sort, meaningless ignore-case
/// requests) are reported as `tracing` events instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Operator belongs to the parser vocabulary but has no clause template.
    #[error("operator '{operator}' is not supported by derived queries")]
    UnsupportedOperator { operator: OperatorType },
    /// The argument stream ran dry before the operator's arity was satisfied.
    #[error("'{operator}' needs {needed} argument(s) but only {supplied} remained")]
    InsufficientArguments {
        operator: OperatorType,
        needed: usize,
        supplied: usize,
    },
    /// A geo range was supplied somewhere other than right after a point in a
    /// `within` part.
    #[error("geo range for '{operator}' must follow a point argument of a within part")]
    MisplacedGeoRange { operator: OperatorType },
    /// Argument shape is incompatible with the operator.
    #[error("invalid argument for '{operator}': {reason}")]
    InvalidArgument {
        operator: OperatorType,
        reason: &'static str,
    },
    /// More than one near/within part tried to replace the iteration source.
    #[error("query combines more than one geo iteration source")]
    MultipleGeoSources,
    /// Metadata has no entity registered under this name.
    #[error("unknown entity '{entity}'")]
    UnknownEntity { entity: String },
    /// Metadata has no property registered under this path.
    #[error("unknown property '{path}' on entity '{entity}'")]
    UnknownProperty { entity: String, path: String },
}

impl CompileError {
    /// Builds an [`CompileError::UnknownProperty`] from display-able parts.
    pub fn unknown_property(entity: impl Into<String>, path: impl fmt::Display) -> Self {
        CompileError::UnknownProperty {
            entity: entity.into(),
            path: path.to_string(),
        }
    }

    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::UnsupportedOperator { .. } => "UnsupportedOperator",
            CompileError::InsufficientArguments { .. } => "InsufficientArguments",
            CompileError::MisplacedGeoRange { .. } => "MisplacedGeoRange",
            CompileError::InvalidArgument { .. } => "InvalidArgument",
            CompileError::MultipleGeoSources => "MultipleGeoSources",
            CompileError::UnknownEntity { .. } => "UnknownEntity",
            CompileError::UnknownProperty { .. } => "UnknownProperty",
        }
    }
}

/// Convenience wrapper that formats compile errors with their codes.
pub struct CompileErrorWithCode<'a>(pub &'a CompileError);

impl fmt::Display for CompileErrorWithCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.0.code(), self.0)
    }
}
