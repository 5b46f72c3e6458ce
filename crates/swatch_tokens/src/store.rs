//! The three-tier token store
//!
//! - **Primitives**: `category -> name -> literal`. Never references.
//! - **Semantic**: `category -> name -> literal or reference`, usually into
//!   primitives.
//! - **Components**: `component -> variant -> property -> literal or reference`,
//!   usually into semantic or primitives.
//!
//! Every tier is optional so that partial fragments (dark mode overlays) can be
//! represented with the same type. Maps are ordered, which keeps validation,
//! export and serialization deterministic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::reference::{is_reference, validate};

/// `name -> value`
pub type TokenMap = BTreeMap<String, String>;
/// `category -> name -> value`
pub type TokenCategories = BTreeMap<String, TokenMap>;
/// `property -> value`
pub type StyleProperties = BTreeMap<String, String>;
/// `variant -> property -> value`
pub type ComponentVariants = BTreeMap<String, StyleProperties>;
/// `component -> variant -> property -> value`
pub type ComponentTokens = BTreeMap<String, ComponentVariants>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Primitives,
    Semantic,
    Components,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Primitives, Tier::Semantic, Tier::Components];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Primitives => "primitives",
            Tier::Semantic => "semantic",
            Tier::Components => "components",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.as_str() == name)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token path split into its addressing parts
#[derive(Debug, PartialEq, Eq)]
enum TokenPath<'a> {
    Flat {
        tier: Tier,
        category: &'a str,
        key: &'a str,
    },
    Component {
        component: &'a str,
        variant: &'a str,
        property: &'a str,
    },
}

impl<'a> TokenPath<'a> {
    /// `tier.category.key...` or `components.component.variant.property...`.
    /// Trailing segments are kept joined as the key.
    fn parse(path: &'a str) -> Result<Self, TokenError> {
        let mut parts = path.splitn(3, '.');
        let (Some(tier), Some(category), Some(rest)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::InvalidPath {
                path: path.to_owned(),
                reason: "token path must have at least 3 segments (tier.category.key)",
            });
        };

        let tier = Tier::from_name(tier).ok_or_else(|| TokenError::InvalidTier(tier.to_owned()))?;
        if tier != Tier::Components {
            return Ok(TokenPath::Flat {
                tier,
                category,
                key: rest,
            });
        }

        let Some((variant, property)) = rest.split_once('.') else {
            return Err(TokenError::InvalidPath {
                path: path.to_owned(),
                reason: "component path must have at least 4 segments (components.name.variant.property)",
            });
        };
        Ok(TokenPath::Component {
            component: category,
            variant,
            property,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primitives: Option<TokenCategories>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<TokenCategories>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentTokens>,
}

/// Validate a possibly-absent token set
pub fn validate_tokens(tokens: Option<&DesignTokens>) -> Result<(), TokenError> {
    tokens.ok_or(TokenError::NilTokens)?.validate()
}

impl DesignTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check structural invariants and every token value.
    ///
    /// Primitive categories must be non-empty and may only hold literals.
    /// Semantic and component values may reference other tokens but must be
    /// well-formed.
    pub fn validate(&self) -> Result<(), TokenError> {
        if let Some(primitives) = &self.primitives {
            for (category, tokens) in primitives {
                if tokens.is_empty() {
                    return Err(TokenError::EmptyCategory {
                        tier: Tier::Primitives,
                        category: category.clone(),
                    });
                }
                for (key, value) in tokens {
                    let path = || format!("primitives.{category}.{key}");
                    validate(value).map_err(|e| e.at(path()))?;
                    if is_reference(value) {
                        return Err(TokenError::PrimitiveReference {
                            path: path(),
                            value: value.clone(),
                        });
                    }
                }
            }
        }

        if let Some(semantic) = &self.semantic {
            for (category, tokens) in semantic {
                for (key, value) in tokens {
                    validate(value).map_err(|e| e.at(format!("semantic.{category}.{key}")))?;
                }
            }
        }

        if let Some(components) = &self.components {
            for (component, variants) in components {
                for (variant, props) in variants {
                    if props.is_empty() {
                        return Err(TokenError::EmptyVariant {
                            component: component.clone(),
                            variant: variant.clone(),
                        });
                    }
                    for (property, value) in props {
                        let path = format!("components.{component}.{variant}.{property}");
                        validate_component_value(&path, value)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Look up the raw (unresolved) value at `path`
    pub fn get_token(&self, path: &str) -> Result<&str, TokenError> {
        let not_found = || TokenError::NotFound(path.to_owned());

        match TokenPath::parse(path)? {
            TokenPath::Flat {
                tier,
                category,
                key,
            } => {
                let categories = self.tier(tier).ok_or(TokenError::NilTier(tier))?;
                let tokens = categories
                    .get(category)
                    .ok_or_else(|| TokenError::InvalidCategory {
                        tier,
                        category: category.to_owned(),
                    })?;
                tokens.get(key).map(String::as_str).ok_or_else(not_found)
            }
            TokenPath::Component {
                component,
                variant,
                property,
            } => self
                .components
                .as_ref()
                .ok_or(TokenError::NilTier(Tier::Components))?
                .get(component)
                .and_then(|variants| variants.get(variant))
                .and_then(|props| props.get(property))
                .map(String::as_str)
                .ok_or_else(not_found),
        }
    }

    /// Overwrite (or add) the value at `path`.
    ///
    /// Primitive and semantic writes need the tier and category to exist
    /// already, and primitives only accept literals. Components and variants
    /// are created on demand.
    pub fn set_token(&mut self, path: &str, value: impl Into<String>) -> Result<(), TokenError> {
        let value = value.into();

        match TokenPath::parse(path)? {
            TokenPath::Flat {
                tier,
                category,
                key,
            } => {
                if tier == Tier::Primitives && is_reference(&value) {
                    return Err(TokenError::PrimitiveReference {
                        path: path.to_owned(),
                        value,
                    });
                }
                let categories = self.tier_mut(tier).ok_or(TokenError::NilTier(tier))?;
                let tokens = categories
                    .get_mut(category)
                    .ok_or_else(|| TokenError::InvalidCategory {
                        tier,
                        category: category.to_owned(),
                    })?;
                tokens.insert(key.to_owned(), value);
            }
            TokenPath::Component {
                component,
                variant,
                property,
            } => {
                self.components
                    .get_or_insert_with(ComponentTokens::new)
                    .entry(component.to_owned())
                    .or_default()
                    .entry(variant.to_owned())
                    .or_default()
                    .insert(property.to_owned(), value);
            }
        }
        Ok(())
    }

    /// Merge `other` over `self` key by key.
    ///
    /// Every leaf in `other` replaces or adds the matching leaf here; nothing
    /// is removed. Empty categories and variants in `other` are ignored.
    pub fn overlay(&mut self, other: &DesignTokens) {
        if let Some(src) = &other.primitives {
            merge_categories(self.primitives.get_or_insert_with(TokenCategories::new), src);
        }
        if let Some(src) = &other.semantic {
            merge_categories(self.semantic.get_or_insert_with(TokenCategories::new), src);
        }
        if let Some(src) = &other.components {
            let dst = self.components.get_or_insert_with(ComponentTokens::new);
            for (component, variants) in src {
                for (variant, props) in variants.iter().filter(|(_, p)| !p.is_empty()) {
                    dst.entry(component.clone())
                        .or_default()
                        .entry(variant.clone())
                        .or_default()
                        .extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }
    }

    /// A copy of `self` with `other` merged over it
    pub fn overlaid(&self, other: &DesignTokens) -> DesignTokens {
        let mut merged = self.clone();
        merged.overlay(other);
        merged
    }

    pub fn tier(&self, tier: Tier) -> Option<&TokenCategories> {
        match tier {
            Tier::Primitives => self.primitives.as_ref(),
            Tier::Semantic => self.semantic.as_ref(),
            Tier::Components => None,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> Option<&mut TokenCategories> {
        match tier {
            Tier::Primitives => self.primitives.as_mut(),
            Tier::Semantic => self.semantic.as_mut(),
            Tier::Components => None,
        }
    }

    /// Every leaf as `(full.dotted.path, value)`, in tier then key order
    pub fn iter(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        flat_leaves(Tier::Primitives, self.primitives.as_ref())
            .chain(flat_leaves(Tier::Semantic, self.semantic.as_ref()))
            .chain(component_leaves(self.components.as_ref()))
    }

    pub fn token_count(&self) -> usize {
        let flat = |tier: &Option<TokenCategories>| {
            tier.iter()
                .flat_map(|categories| categories.values())
                .map(TokenMap::len)
                .sum::<usize>()
        };
        let components: usize = self
            .components
            .iter()
            .flat_map(|components| components.values())
            .flat_map(|variants| variants.values())
            .map(StyleProperties::len)
            .sum();
        flat(&self.primitives) + flat(&self.semantic) + components
    }

    pub fn is_empty(&self) -> bool {
        self.token_count() == 0
    }

    pub fn to_json(&self) -> Result<String, TokenError> {
        serde_json::to_string_pretty(self).map_err(|e| TokenError::Parse(e.to_string()))
    }

    /// Parse and validate a JSON token document
    pub fn from_json(json: &str) -> Result<Self, TokenError> {
        let tokens: Self =
            serde_json::from_str(json).map_err(|e| TokenError::Parse(e.to_string()))?;
        tokens.validate()?;
        Ok(tokens)
    }
}

fn merge_categories(dst: &mut TokenCategories, src: &TokenCategories) {
    for (category, tokens) in src.iter().filter(|(_, t)| !t.is_empty()) {
        dst.entry(category.clone())
            .or_default()
            .extend(tokens.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

/// Component values may be compound (`1px solid semantic.colors.border`);
/// each dotted word outside a CSS function is checked on its own.
fn validate_component_value(path: &str, value: &str) -> Result<(), TokenError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TokenError::EmptyPropertyValue {
            path: path.to_owned(),
        });
    }
    if !value.chars().any(char::is_whitespace) {
        return validate(value).map_err(|e| e.at(path));
    }
    if value.contains('(') {
        return Ok(());
    }
    for word in value.split_whitespace().filter(|w| w.contains('.')) {
        validate(word).map_err(|e| e.at(path))?;
    }
    Ok(())
}

fn flat_leaves<'a>(
    tier: Tier,
    categories: Option<&'a TokenCategories>,
) -> impl Iterator<Item = (String, &'a str)> + 'a {
    categories.into_iter().flat_map(move |categories| {
        categories.iter().flat_map(move |(category, tokens)| {
            tokens
                .iter()
                .map(move |(key, value)| (format!("{tier}.{category}.{key}"), value.as_str()))
        })
    })
}

fn component_leaves<'a>(
    components: Option<&'a ComponentTokens>,
) -> impl Iterator<Item = (String, &'a str)> + 'a {
    components.into_iter().flat_map(|components| {
        components.iter().flat_map(|(component, variants)| {
            variants.iter().flat_map(move |(variant, props)| {
                props.iter().map(move |(property, value)| {
                    (
                        format!("components.{component}.{variant}.{property}"),
                        value.as_str(),
                    )
                })
            })
        })
    })
}
