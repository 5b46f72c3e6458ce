use swatch_core::Interrupted;
use thiserror::Error;

use crate::ast::CompareOp;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConditionError {
    #[error("condition expression is empty")]
    Empty,

    #[error("invalid condition expression '{expression}': {message}")]
    Parse { expression: String, message: String },

    #[error("condition expression is too complex: {0}")]
    TooComplex(String),

    #[error("cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: CompareOp,
        left: &'static str,
        right: &'static str,
    },

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl ConditionError {
    /// Stable snake_case error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty_expression",
            Self::Parse { .. } => "parse_error",
            Self::TooComplex(_) => "too_complex",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::Interrupted(inner) => inner.code(),
        }
    }
}
