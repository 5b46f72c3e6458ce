//! Built-in default theme

use swatch_tokens::{default_tokens, DesignTokens, TokenCategories, TokenMap};

use crate::theme::{AccessibilityConfig, DarkModeConfig, Theme, ThemeCondition, ThemeMeta};

/// Id of [`default_theme`]
pub const DEFAULT_THEME_ID: &str = "default";

fn map(entries: &[(&str, &str)]) -> TokenMap {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

fn single(category: &str, tokens: TokenMap) -> TokenCategories {
    TokenCategories::from([(category.to_owned(), tokens)])
}

/// Dark palette: the gray ramp inverted, with semantic surfaces remapped
fn dark_tokens() -> DesignTokens {
    DesignTokens {
        primitives: Some(single(
            "colors",
            map(&[
                ("white", "#ffffff"),
                ("black", "#000000"),
                ("gray-50", "#18181b"),
                ("gray-100", "#27272a"),
                ("gray-200", "#3f3f46"),
                ("gray-300", "#52525b"),
                ("gray-400", "#71717a"),
                ("gray-500", "#a1a1aa"),
                ("gray-600", "#d4d4d8"),
                ("gray-700", "#e4e4e7"),
                ("gray-800", "#f4f4f5"),
                ("gray-900", "#fafafa"),
            ]),
        )),
        semantic: Some(single(
            "colors",
            map(&[
                ("background", "primitives.colors.gray-50"),
                ("background-subtle", "primitives.colors.gray-100"),
                ("background-muted", "primitives.colors.gray-200"),
                ("foreground", "primitives.colors.gray-900"),
                ("foreground-subtle", "primitives.colors.gray-600"),
                ("border", "primitives.colors.gray-300"),
            ]),
        )),
        components: None,
    }
}

/// The production default theme: default tokens, a dark overlay,
/// accessibility settings and a high-contrast condition
pub fn default_theme() -> Theme {
    let high_contrast = ThemeCondition {
        description: "High contrast colors for users with visual impairments".into(),
        ..ThemeCondition::new(
            "high-contrast-mode",
            "user.preferences.highContrast == true",
            100,
        )
    }
    .with_override("semantic.colors.border", "primitives.colors.black")
    .with_override("semantic.colors.foreground", "primitives.colors.black")
    .with_override("semantic.colors.background", "primitives.colors.white")
    .with_override("semantic.colors.primary", "primitives.colors.black")
    .with_override("semantic.colors.primary-foreground", "primitives.colors.white");

    let mut theme = Theme::new(DEFAULT_THEME_ID, "Default Theme", default_tokens());
    theme.description = "Default theme with complete token coverage".into();
    theme.version = "1.0.0".into();
    theme.author = "swatch".into();
    theme.dark_mode = Some(DarkModeConfig {
        enabled: true,
        default: false,
        strategy: "class".into(),
        dark_tokens: Some(dark_tokens()),
    });
    theme.conditions = vec![high_contrast];
    theme.accessibility = Some(AccessibilityConfig {
        high_contrast: false,
        min_contrast_ratio: 4.5,
        focus_indicator: true,
        focus_outline_color: "primitives.colors.primary".into(),
        focus_outline_width: "2px".into(),
        keyboard_nav: true,
        reduced_motion: false,
        screen_reader_optimized: true,
        aria_live: "polite".into(),
    });
    theme.meta = Some(ThemeMeta {
        tags: vec!["default".into(), "light".into(), "accessible".into()],
        license: "MIT".into(),
        ..ThemeMeta::default()
    });
    theme
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ColorScheme;
    use pretty_assertions::assert_eq;
    use swatch_core::CallContext;
    use swatch_tokens::{TokenReference, TokenResolver};

    #[test]
    fn default_theme_is_valid() {
        default_theme().validate().unwrap();
    }

    #[test]
    fn dark_scheme_resolves() {
        let tokens = default_theme().tokens_for_scheme(ColorScheme::Dark).unwrap();
        let resolver = TokenResolver::new(tokens).unwrap();
        let ctx = CallContext::new();
        assert_eq!(
            resolver
                .resolve(&ctx, &TokenReference::new("semantic.colors.background"))
                .unwrap(),
            "#18181b"
        );
        resolver.resolve_all(&ctx).unwrap();
    }

    #[test]
    fn high_contrast_overrides_target_existing_tokens() {
        let mut theme = default_theme();
        let overrides = theme.conditions[0].token_overrides.clone();
        for (path, value) in &overrides {
            theme.apply_override(path, value).unwrap();
        }
        TokenResolver::new(theme.tokens.unwrap()).unwrap();
    }
}
