//! Token references
//!
//! A token value is either a literal style value (`#3b82f6`, `1rem`,
//! `calc(100% - 2rem)`, `transparent`) or a dotted path to another token
//! (`semantic.colors.primary`). Literal heuristics always win: a value is only
//! treated as a reference once every literal check has failed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Keywords recognised as literal CSS values (compared case-insensitively)
const CSS_KEYWORDS: &[&str] = &[
    // Global
    "inherit", "initial", "unset", "revert", "revert-layer",
    // General
    "auto", "none", "normal", "transparent", "currentcolor",
    // Font
    "bold", "bolder", "lighter", "italic", "oblique", "uppercase", "lowercase", "capitalize",
    "underline", "overline", "line-through", "nowrap", "pre", "pre-wrap", "break-word",
    // Generic font families
    "serif", "sans-serif", "monospace", "cursive", "fantasy", "system-ui", "ui-sans-serif",
    "ui-serif", "ui-monospace", "emoji", "math",
    // Border styles
    "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
    // Display and visibility
    "hidden", "visible", "collapse", "block", "inline", "inline-block", "flex", "inline-flex",
    "grid", "inline-grid", "flow-root", "contents", "scroll", "clip",
    // Easing
    "linear", "ease", "ease-in", "ease-out", "ease-in-out", "step-start", "step-end",
    // Position
    "relative", "absolute", "fixed", "sticky", "static",
    // Sizing
    "fit-content", "max-content", "min-content", "cover", "contain",
    // Alignment
    "left", "right", "center", "justify", "top", "bottom", "start", "end", "stretch",
    "baseline", "space-between", "space-around", "space-evenly",
    // Cursors
    "pointer", "default", "not-allowed", "text", "move", "grab",
    // Named colors
    "black", "white", "red", "green", "blue", "yellow", "orange", "purple", "pink", "gray",
    "grey", "silver", "maroon", "olive", "lime", "aqua", "teal", "navy", "fuchsia", "brown",
    "cyan", "magenta", "gold", "indigo", "violet", "crimson", "coral", "salmon", "khaki",
    "tomato", "turquoise", "beige", "ivory", "lavender", "tan", "chocolate", "orchid",
];

/// A token value: either a literal style value or a dotted token path
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenReference(String);

impl TokenReference {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The value exactly as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The trimmed value; for references this is the token path
    pub fn path(&self) -> &str {
        self.0.trim()
    }

    pub fn is_reference(&self) -> bool {
        is_reference(&self.0)
    }

    pub fn validate(&self) -> Result<(), TokenError> {
        validate(&self.0)
    }

    /// Path segments (only meaningful for references)
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path().split('.')
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TokenReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl From<&str> for TokenReference {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for TokenReference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for TokenReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether `value` is a dotted token path rather than a literal
pub fn is_reference(value: &str) -> bool {
    let value = value.trim();
    if is_literal(value) {
        return false;
    }
    let mut segments = 0usize;
    for segment in value.split('.') {
        if segment.is_empty() || !is_valid_segment(segment) {
            return false;
        }
        segments += 1;
    }
    segments >= 2
}

/// Validate a token value.
///
/// Literals always pass. References, and values that look like an attempted
/// reference, must be well-formed dotted paths.
pub fn validate(value: &str) -> Result<(), TokenError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TokenError::EmptyReference);
    }
    if is_reference(value) {
        return Ok(());
    }
    if looks_like_reference(value) {
        return validate_path(value);
    }
    Ok(())
}

/// Check a value strictly as a dotted path
pub fn validate_path(path: &str) -> Result<(), TokenError> {
    if !path.contains('.') {
        return Err(TokenError::InvalidPath {
            path: path.to_owned(),
            reason: "token path must contain at least one dot",
        });
    }
    for (position, segment) in path.split('.').enumerate() {
        if segment.is_empty() {
            return Err(TokenError::EmptySegment {
                path: path.to_owned(),
                position,
            });
        }
        if !is_valid_segment(segment) {
            return Err(TokenError::InvalidSegment {
                path: path.to_owned(),
                segment: segment.to_owned(),
                position,
            });
        }
    }
    Ok(())
}

/// Literal heuristics, in evaluation order
fn is_literal(value: &str) -> bool {
    value.is_empty()
        || value.chars().any(char::is_whitespace)
        || value.starts_with('#')
        || is_css_function(value)
        || is_numeric(value)
        || is_css_keyword(value)
        || value.starts_with(['"', '\''])
        || value.contains(',')
}

/// A value that fails reference classification but was probably meant as one
fn looks_like_reference(value: &str) -> bool {
    if value.contains('.') {
        if value.contains('(') && value.contains(')') {
            return false;
        }
        if value.chars().any(char::is_whitespace) {
            let first = value.split_whitespace().next().unwrap_or_default();
            return first.split('.').count() >= 2;
        }
        return !(value.starts_with('#')
            || is_numeric(value)
            || value.starts_with(['"', '\''])
            || value.contains(','));
    }

    if value.chars().any(char::is_whitespace)
        || value.starts_with('#')
        || is_css_function(value)
        || is_numeric(value)
        || is_css_keyword(value)
        || value.len() <= 2
    {
        return false;
    }
    value.bytes().all(is_segment_byte) && value.bytes().any(|b| b.is_ascii_alphabetic())
}

fn is_segment_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_valid_segment(segment: &str) -> bool {
    segment.bytes().all(is_segment_byte)
}

/// `name(...)`: calc, var, url, rgb, hsl, gradients, cubic-bezier and friends
fn is_css_function(value: &str) -> bool {
    let Some(open) = value.find('(') else {
        return false;
    };
    open > 0
        && value.ends_with(')')
        && value[..open]
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// Number with optional sign, fraction, exponent and unit (`-10px`, `.5rem`, `1e10`, `50%`)
fn is_numeric(value: &str) -> bool {
    let s = value.strip_prefix(['+', '-']).unwrap_or(value);
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut digits = 0;

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exponent_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exponent_start {
            i = j;
        }
    }

    let unit = &s[i..];
    unit.is_empty() || unit == "%" || unit.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_css_keyword(value: &str) -> bool {
    CSS_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn literals_are_not_references() {
        for value in [
            "#3b82f6",
            "hsl(217, 91%, 60%)",
            "1rem",
            "16px",
            "calc(100% - 2rem)",
            "transparent",
            "0.5",
            "-10px",
            ".5rem",
            "1e10",
            "50%",
            "rgba(0,0,0,0.5)",
            "cubic-bezier(0.4,0,0.2,1)",
            "'Segoe UI'",
            "Georgia,serif",
            "0 1px 2px rgba(0, 0, 0, 0.05)",
            "",
            "   ",
        ] {
            assert!(!is_reference(value), "{value:?} classified as a reference");
        }
    }

    #[test]
    fn dotted_paths_are_references() {
        for value in [
            "primitives.colors.primary",
            "components.button.primary.background-color",
            "semantic.spacing.2xl",
            "  semantic.colors.background  ",
            "a.b",
            "font_sizes.base",
        ] {
            assert!(is_reference(value), "{value:?} not classified as a reference");
        }
    }

    #[test]
    fn malformed_paths_are_not_references() {
        assert!(!is_reference("primitives..primary"));
        assert!(!is_reference(".colors.primary"));
        assert!(!is_reference("colors.primary."));
        assert!(!is_reference("colors"));
    }

    #[test]
    fn empty_value_fails_validation() {
        assert_eq!(validate("  "), Err(TokenError::EmptyReference));
        assert_eq!(validate("").unwrap_err().code(), "empty_token_reference");
    }

    #[test]
    fn literals_and_references_validate() {
        for value in ["#fff", "1rem", "solid", "semantic.colors.primary", "0.5", "ab"] {
            assert_eq!(validate(value), Ok(()), "{value:?}");
        }
    }

    #[test]
    fn malformed_references_are_reported() {
        assert_eq!(
            validate("primitives..primary").unwrap_err().code(),
            "empty_token_segment"
        );
        assert_eq!(
            validate("colors.primary.").unwrap_err(),
            TokenError::EmptySegment {
                path: "colors.primary.".into(),
                position: 2,
            }
        );
        assert_eq!(
            validate("colors.pri$mary").unwrap_err().code(),
            "invalid_token_segment"
        );
        assert_eq!(
            validate("colors.primary color").unwrap_err().code(),
            "invalid_token_segment"
        );
    }

    #[test]
    fn bare_identifiers_need_a_tier() {
        assert_eq!(validate("primary").unwrap_err().code(), "invalid_token_path");
        assert_eq!(validate("Bold"), Ok(()));
        assert_eq!(validate("sans-serif"), Ok(()));
    }

    #[test]
    fn compound_literals_validate() {
        assert_eq!(validate("1px solid #ccc"), Ok(()));
        assert_eq!(validate("rgba(0, 0, 0, 0.5)"), Ok(()));
    }

    #[test]
    fn path_is_trimmed() {
        let reference = TokenReference::from(" semantic.colors.primary ");
        assert_eq!(reference.path(), "semantic.colors.primary");
        assert_eq!(reference.to_string(), "semantic.colors.primary");
        assert_eq!(
            reference.segments().collect::<Vec<_>>(),
            vec!["semantic", "colors", "primary"]
        );
    }

    #[test]
    fn validate_path_requires_a_dot() {
        assert_eq!(
            validate_path("colors").unwrap_err().code(),
            "invalid_token_path"
        );
    }
}
