use swatch_core::Interrupted;
use thiserror::Error;

use crate::store::Tier;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token reference cannot be empty")]
    EmptyReference,

    #[error("invalid token path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("empty segment at position {position} in token path '{path}'")]
    EmptySegment { path: String, position: usize },

    #[error("invalid segment '{segment}' at position {position} in token path '{path}'")]
    InvalidSegment {
        path: String,
        segment: String,
        position: usize,
    },

    #[error("design tokens are missing")]
    NilTokens,

    #[error("{tier} category '{category}' cannot be empty")]
    EmptyCategory { tier: Tier, category: String },

    #[error("variant '{component}.{variant}' has no properties")]
    EmptyVariant { component: String, variant: String },

    #[error("property '{path}' has an empty value")]
    EmptyPropertyValue { path: String },

    #[error("primitive token '{path}' contains reference '{value}' (primitives must be literal values)")]
    PrimitiveReference { path: String, value: String },

    #[error("unknown token tier '{0}' (expected primitives, semantic or components)")]
    InvalidTier(String),

    #[error("{0} tier is not defined")]
    NilTier(Tier),

    #[error("unknown {tier} category '{category}'")]
    InvalidCategory { tier: Tier, category: String },

    #[error("token not found: {0}")]
    NotFound(String),

    #[error("circular token reference: {}", .chain.join(" -> "))]
    Circular { chain: Vec<String> },

    #[error("reference chain from '{path}' exceeds the maximum depth of {max_depth}")]
    MaxDepthExceeded { path: String, max_depth: usize },

    #[error(transparent)]
    Interrupted(#[from] Interrupted),

    #[error("invalid token document: {0}")]
    Parse(String),

    #[error("{path}: {source}")]
    At {
        path: String,
        #[source]
        source: Box<TokenError>,
    },
}

impl TokenError {
    /// Stable snake_case error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyReference => "empty_token_reference",
            Self::InvalidPath { .. } => "invalid_token_path",
            Self::EmptySegment { .. } => "empty_token_segment",
            Self::InvalidSegment { .. } => "invalid_token_segment",
            Self::NilTokens => "nil_tokens",
            Self::EmptyCategory { .. } => "empty_category",
            Self::EmptyVariant { .. } => "empty_variant",
            Self::EmptyPropertyValue { .. } => "empty_property_value",
            Self::PrimitiveReference { .. } => "primitive_reference",
            Self::InvalidTier(_) => "invalid_tier",
            Self::NilTier(_) => "nil_tier",
            Self::InvalidCategory { .. } => "invalid_category",
            Self::NotFound(_) => "token_not_found",
            Self::Circular { .. } => "circular_reference",
            Self::MaxDepthExceeded { .. } => "max_depth_exceeded",
            Self::Interrupted(inner) => inner.code(),
            Self::Parse(_) => "invalid_document",
            Self::At { source, .. } => source.code(),
        }
    }

    /// Attach the token path a nested failure occurred at
    pub fn at(self, path: impl Into<String>) -> Self {
        Self::At {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping location wrappers
    pub fn root(&self) -> &TokenError {
        match self {
            Self::At { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_wrapper_keeps_the_inner_code() {
        let err = TokenError::NotFound("semantic.colors.x".into()).at("components.button.base.color");
        assert_eq!(err.code(), "token_not_found");
        assert_eq!(err.root(), &TokenError::NotFound("semantic.colors.x".into()));
        assert!(err.to_string().starts_with("components.button.base.color: "));
    }

    #[test]
    fn circular_message_lists_the_chain() {
        let err = TokenError::Circular {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "circular token reference: a -> b -> a");
    }
}
