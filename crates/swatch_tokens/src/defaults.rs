//! Built-in default token set
//!
//! A complete light palette with spacing, radius, typography, borders,
//! shadows, effects, animation, z-index and breakpoint scales, semantic
//! assignments over them, and styling for common components.

use crate::store::{ComponentTokens, ComponentVariants, DesignTokens, TokenCategories, TokenMap};

fn map(entries: &[(&str, &str)]) -> TokenMap {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

fn categories(entries: Vec<(&str, TokenMap)>) -> TokenCategories {
    entries
        .into_iter()
        .map(|(name, tokens)| (name.to_owned(), tokens))
        .collect()
}

fn component(variants: Vec<(&str, TokenMap)>) -> ComponentVariants {
    variants
        .into_iter()
        .map(|(name, props)| (name.to_owned(), props))
        .collect()
}

/// The default design token set
pub fn default_tokens() -> DesignTokens {
    DesignTokens {
        primitives: Some(primitives()),
        semantic: Some(semantic()),
        components: Some(components()),
    }
}

fn primitives() -> TokenCategories {
    categories(vec![
        (
            "colors",
            map(&[
                ("primary", "hsl(217, 91%, 60%)"),
                ("secondary", "hsl(270, 50%, 60%)"),
                ("accent", "hsl(190, 90%, 56%)"),
                ("white", "hsl(0, 0%, 100%)"),
                ("black", "hsl(0, 0%, 0%)"),
                ("gray-50", "hsl(210, 20%, 98%)"),
                ("gray-100", "hsl(210, 20%, 95%)"),
                ("gray-200", "hsl(210, 16%, 93%)"),
                ("gray-300", "hsl(210, 14%, 89%)"),
                ("gray-400", "hsl(210, 12%, 78%)"),
                ("gray-500", "hsl(210, 10%, 64%)"),
                ("gray-600", "hsl(210, 10%, 48%)"),
                ("gray-700", "hsl(210, 12%, 36%)"),
                ("gray-800", "hsl(210, 16%, 24%)"),
                ("gray-900", "hsl(210, 20%, 14%)"),
                ("success", "hsl(142, 71%, 45%)"),
                ("warning", "hsl(45, 93%, 47%)"),
                ("error", "hsl(0, 84%, 60%)"),
                ("info", "hsl(200, 100%, 56%)"),
            ]),
        ),
        (
            "spacing",
            map(&[
                ("xs", "0.5rem"),
                ("sm", "0.75rem"),
                ("md", "1rem"),
                ("lg", "1.5rem"),
                ("xl", "2rem"),
                ("2xl", "3rem"),
                ("3xl", "4rem"),
            ]),
        ),
        (
            "radius",
            map(&[
                ("none", "0"),
                ("sm", "0.25rem"),
                ("md", "0.5rem"),
                ("lg", "0.75rem"),
                ("xl", "1rem"),
                ("full", "9999px"),
            ]),
        ),
        (
            "typography",
            map(&[
                ("font-size-xs", "0.75rem"),
                ("font-size-sm", "0.875rem"),
                ("font-size-base", "1rem"),
                ("font-size-lg", "1.125rem"),
                ("font-size-xl", "1.25rem"),
                ("font-size-2xl", "1.5rem"),
                ("font-size-3xl", "1.875rem"),
                ("font-size-4xl", "2.25rem"),
                ("font-weight-normal", "400"),
                ("font-weight-medium", "500"),
                ("font-weight-semibold", "600"),
                ("font-weight-bold", "700"),
                ("font-weight-extrabold", "800"),
                ("line-height-none", "1"),
                ("line-height-tight", "1.25"),
                ("line-height-snug", "1.375"),
                ("line-height-normal", "1.5"),
                ("line-height-relaxed", "1.75"),
                ("line-height-loose", "2"),
                (
                    "font-family-sans",
                    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif",
                ),
                ("font-family-serif", "Georgia, Cambria, 'Times New Roman', Times, serif"),
                (
                    "font-family-mono",
                    "'SF Mono', Monaco, Consolas, 'Liberation Mono', 'Courier New', monospace",
                ),
                ("letter-spacing-tighter", "-0.05em"),
                ("letter-spacing-tight", "-0.025em"),
                ("letter-spacing-normal", "0em"),
                ("letter-spacing-wide", "0.025em"),
                ("letter-spacing-wider", "0.05em"),
            ]),
        ),
        (
            "borders",
            map(&[
                ("border-width-none", "0"),
                ("border-width-thin", "1px"),
                ("border-width-medium", "2px"),
                ("border-width-thick", "4px"),
                ("border-style-solid", "solid"),
                ("border-style-dashed", "dashed"),
                ("border-style-dotted", "dotted"),
                ("border-style-double", "double"),
                ("border-style-none", "none"),
            ]),
        ),
        (
            "shadows",
            map(&[
                ("none", "none"),
                ("sm", "0 1px 2px 0 rgba(0, 0, 0, 0.05)"),
                (
                    "md",
                    "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -1px rgba(0, 0, 0, 0.06)",
                ),
                (
                    "lg",
                    "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -2px rgba(0, 0, 0, 0.05)",
                ),
                (
                    "xl",
                    "0 20px 25px -5px rgba(0, 0, 0, 0.1), 0 10px 10px -5px rgba(0, 0, 0, 0.04)",
                ),
                ("2xl", "0 25px 50px -12px rgba(0, 0, 0, 0.25)"),
                ("inner", "inset 0 2px 4px 0 rgba(0, 0, 0, 0.06)"),
            ]),
        ),
        (
            "effects",
            map(&[
                ("opacity-0", "0"),
                ("opacity-25", "0.25"),
                ("opacity-50", "0.5"),
                ("opacity-75", "0.75"),
                ("opacity-100", "1"),
                ("blur-none", "0"),
                ("blur-sm", "4px"),
                ("blur-md", "8px"),
                ("blur-lg", "12px"),
                ("blur-xl", "16px"),
            ]),
        ),
        (
            "animation",
            map(&[
                ("duration-fast", "150ms"),
                ("duration-normal", "200ms"),
                ("duration-slow", "300ms"),
                ("duration-slower", "500ms"),
                ("easing-linear", "linear"),
                ("easing-in", "cubic-bezier(0.4, 0, 1, 1)"),
                ("easing-out", "cubic-bezier(0, 0, 0.2, 1)"),
                ("easing-in-out", "cubic-bezier(0.4, 0, 0.2, 1)"),
                ("easing-sharp", "cubic-bezier(0.4, 0, 0.6, 1)"),
                ("easing-emphasized", "cubic-bezier(0.2, 0, 0, 1)"),
            ]),
        ),
        (
            "z-index",
            map(&[
                ("base", "1"),
                ("dropdown", "10"),
                ("sticky", "20"),
                ("fixed", "30"),
                ("modal", "40"),
                ("popover", "50"),
                ("tooltip", "60"),
            ]),
        ),
        (
            "breakpoints",
            map(&[
                ("sm", "640px"),
                ("md", "768px"),
                ("lg", "1024px"),
                ("xl", "1280px"),
                ("2xl", "1536px"),
            ]),
        ),
    ])
}

fn semantic() -> TokenCategories {
    categories(vec![
        (
            "colors",
            map(&[
                ("background", "primitives.colors.white"),
                ("background-subtle", "primitives.colors.gray-50"),
                ("background-muted", "primitives.colors.gray-100"),
                ("background-emphasis", "primitives.colors.gray-200"),
                ("foreground", "primitives.colors.gray-900"),
                ("foreground-subtle", "primitives.colors.gray-600"),
                ("foreground-muted", "primitives.colors.gray-500"),
                ("foreground-emphasis", "primitives.colors.black"),
                ("primary", "primitives.colors.primary"),
                ("primary-foreground", "primitives.colors.white"),
                ("secondary", "primitives.colors.gray-100"),
                ("secondary-foreground", "primitives.colors.gray-900"),
                ("accent", "primitives.colors.accent"),
                ("accent-foreground", "primitives.colors.white"),
                ("border", "primitives.colors.gray-300"),
                ("border-subtle", "primitives.colors.gray-200"),
                ("border-emphasis", "primitives.colors.gray-400"),
                ("ring", "primitives.colors.primary"),
                ("selection", "primitives.colors.primary"),
                ("success", "primitives.colors.success"),
                ("success-foreground", "primitives.colors.white"),
                ("warning", "primitives.colors.warning"),
                ("warning-foreground", "primitives.colors.white"),
                ("error", "primitives.colors.error"),
                ("error-foreground", "primitives.colors.white"),
                ("info", "primitives.colors.info"),
                ("info-foreground", "primitives.colors.white"),
            ]),
        ),
        (
            "spacing",
            map(&[
                ("component-tight", "primitives.spacing.xs"),
                ("component-default", "primitives.spacing.sm"),
                ("component-loose", "primitives.spacing.md"),
                ("layout-section", "primitives.spacing.2xl"),
                ("layout-page", "primitives.spacing.3xl"),
                ("stack-tight", "primitives.spacing.xs"),
                ("stack-default", "primitives.spacing.md"),
                ("stack-loose", "primitives.spacing.lg"),
            ]),
        ),
        (
            "typography",
            map(&[
                ("heading-font-size", "primitives.typography.font-size-2xl"),
                ("heading-font-weight", "primitives.typography.font-weight-bold"),
                ("heading-line-height", "primitives.typography.line-height-tight"),
                ("body-font-size", "primitives.typography.font-size-base"),
                ("body-font-weight", "primitives.typography.font-weight-normal"),
                ("body-line-height", "primitives.typography.line-height-normal"),
                ("body-font-family", "primitives.typography.font-family-sans"),
                ("label-font-size", "primitives.typography.font-size-sm"),
                ("label-font-weight", "primitives.typography.font-weight-medium"),
                ("caption-font-size", "primitives.typography.font-size-xs"),
                ("caption-font-weight", "primitives.typography.font-weight-normal"),
                ("code-font-size", "primitives.typography.font-size-sm"),
                ("code-font-family", "primitives.typography.font-family-mono"),
            ]),
        ),
        (
            "interactive",
            map(&[
                ("border-radius-sm", "primitives.radius.sm"),
                ("border-radius-md", "primitives.radius.md"),
                ("border-radius-lg", "primitives.radius.lg"),
                ("shadow-sm", "primitives.shadows.sm"),
                ("shadow-md", "primitives.shadows.md"),
                ("shadow-lg", "primitives.shadows.lg"),
                ("transition-fast", "primitives.animation.duration-fast"),
                ("transition-normal", "primitives.animation.duration-normal"),
                ("transition-slow", "primitives.animation.duration-slow"),
            ]),
        ),
    ])
}

fn components() -> ComponentTokens {
    const BUTTON_BASE: &[(&str, &str)] = &[
        ("border-radius", "semantic.interactive.border-radius-md"),
        ("padding", "primitives.spacing.sm primitives.spacing.md"),
        ("font-size", "semantic.typography.body-font-size"),
        ("font-weight", "primitives.typography.font-weight-medium"),
    ];
    fn button(extra: &[(&str, &str)]) -> TokenMap {
        let mut props = map(BUTTON_BASE);
        props.extend(map(extra));
        props
    }

    [
        (
            "button",
            component(vec![
                (
                    "primary",
                    button(&[
                        ("background-color", "semantic.colors.primary"),
                        ("color", "semantic.colors.primary-foreground"),
                        ("border", "none"),
                        ("box-shadow", "none"),
                        (
                            "transition",
                            "all semantic.interactive.transition-fast primitives.animation.easing-in-out",
                        ),
                    ]),
                ),
                (
                    "secondary",
                    button(&[
                        ("background-color", "semantic.colors.secondary"),
                        ("color", "semantic.colors.secondary-foreground"),
                        (
                            "border",
                            "primitives.borders.border-width-thin solid semantic.colors.border",
                        ),
                    ]),
                ),
                (
                    "outline",
                    button(&[
                        ("background-color", "transparent"),
                        ("color", "semantic.colors.primary"),
                        (
                            "border",
                            "primitives.borders.border-width-thin solid semantic.colors.primary",
                        ),
                    ]),
                ),
                (
                    "ghost",
                    button(&[
                        ("background-color", "transparent"),
                        ("color", "semantic.colors.primary"),
                        ("border", "none"),
                    ]),
                ),
            ]),
        ),
        (
            "input",
            component(vec![
                (
                    "base",
                    map(&[
                        ("background-color", "semantic.colors.background"),
                        (
                            "border",
                            "primitives.borders.border-width-thin solid semantic.colors.border",
                        ),
                        ("border-radius", "semantic.interactive.border-radius-md"),
                        ("padding", "primitives.spacing.sm primitives.spacing.sm"),
                        ("color", "semantic.colors.foreground"),
                        ("font-size", "semantic.typography.body-font-size"),
                    ]),
                ),
                (
                    "focus",
                    map(&[
                        ("border-color", "semantic.colors.ring"),
                        ("outline", "2px solid semantic.colors.ring"),
                        ("outline-offset", "2px"),
                    ]),
                ),
                ("error", map(&[("border-color", "semantic.colors.error")])),
            ]),
        ),
        (
            "badge",
            component(vec![
                (
                    "default",
                    map(&[
                        ("background-color", "semantic.colors.background-muted"),
                        ("color", "semantic.colors.foreground-muted"),
                        ("padding", "0.125rem primitives.spacing.xs"),
                        ("border-radius", "primitives.radius.sm"),
                        ("font-size", "semantic.typography.caption-font-size"),
                        ("font-weight", "primitives.typography.font-weight-medium"),
                    ]),
                ),
                (
                    "success",
                    map(&[
                        ("background-color", "semantic.colors.success"),
                        ("color", "semantic.colors.success-foreground"),
                    ]),
                ),
                (
                    "warning",
                    map(&[
                        ("background-color", "semantic.colors.warning"),
                        ("color", "semantic.colors.warning-foreground"),
                    ]),
                ),
                (
                    "error",
                    map(&[
                        ("background-color", "semantic.colors.error"),
                        ("color", "semantic.colors.error-foreground"),
                    ]),
                ),
            ]),
        ),
        (
            "card",
            component(vec![(
                "base",
                map(&[
                    ("background-color", "semantic.colors.background"),
                    (
                        "border",
                        "primitives.borders.border-width-thin solid semantic.colors.border",
                    ),
                    ("border-radius", "semantic.interactive.border-radius-lg"),
                    ("padding", "primitives.spacing.lg"),
                    ("box-shadow", "semantic.interactive.shadow-sm"),
                ]),
            )]),
        ),
        (
            "modal",
            component(vec![
                (
                    "base",
                    map(&[
                        ("background-color", "semantic.colors.background"),
                        (
                            "border",
                            "primitives.borders.border-width-thin solid semantic.colors.border",
                        ),
                        ("border-radius", "semantic.interactive.border-radius-lg"),
                        ("padding", "primitives.spacing.xl"),
                        ("box-shadow", "semantic.interactive.shadow-lg"),
                    ]),
                ),
                ("overlay", map(&[("background-color", "rgba(0, 0, 0, 0.5)")])),
            ]),
        ),
    ]
    .into_iter()
    .map(|(name, variants)| (name.to_owned(), variants))
    .collect()
}
