//! CSS custom property export
//!
//! Token paths flatten to variable names by replacing dots with dashes:
//! `semantic.colors.background` becomes `--semantic-colors-background`.

use std::collections::BTreeMap;
use std::fmt::Write;

use swatch_core::CallContext;

use crate::error::TokenError;
use crate::resolver::TokenResolver;
use crate::store::DesignTokens;

/// `--tier-category-key` for a dotted token path
pub fn css_variable_name(path: &str) -> String {
    let mut name = String::with_capacity(path.len() + 2);
    name.push_str("--");
    name.extend(path.chars().map(|c| if c == '.' { '-' } else { c }));
    name
}

/// Flatten every token to `variable name -> value`, values as stored
pub fn to_css_variable_map(tokens: &DesignTokens) -> BTreeMap<String, String> {
    tokens
        .iter()
        .map(|(path, value)| (css_variable_name(&path), value.to_owned()))
        .collect()
}

/// Render variables as a CSS rule block
pub fn to_css_block(vars: &BTreeMap<String, String>, selector: &str) -> String {
    let mut css = String::with_capacity(vars.len() * 40);
    let _ = writeln!(css, "{selector} {{");
    for (name, value) in vars {
        let _ = writeln!(css, "  {name}: {value};");
    }
    css.push_str("}\n");
    css
}

impl TokenResolver {
    /// Fully resolve the token set and flatten it to CSS variables
    pub fn export_css_variables(&self, ctx: &CallContext) -> Result<BTreeMap<String, String>, TokenError> {
        let resolved = self.resolve_all(ctx)?;
        Ok(to_css_variable_map(&resolved))
    }
}
