//! Subcommand implementations

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use swatch_core::CallContext;
use swatch_theme::{ColorScheme, SwatchConfig, TenantId, Theme, ThemeManager};
use swatch_tokens::{to_css_block, ResolverConfig};
use tracing::{debug, warn};

use crate::ExportFormat;

/// Parse a theme document, choosing YAML or JSON from the file extension
pub fn parse_theme(path: &Path, content: &str) -> Result<Theme> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let theme = if is_yaml {
        Theme::from_yaml(content)
    } else {
        Theme::from_json(content)
    };
    theme.with_context(|| format!("failed to parse {}", path.display()))
}

fn load_theme(path: &Path) -> Result<Theme> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_theme(path, &content)
}

fn scheme(dark: bool) -> ColorScheme {
    if dark {
        ColorScheme::Dark
    } else {
        ColorScheme::Light
    }
}

pub fn validate(files: &[std::path::PathBuf]) -> Result<()> {
    let mut failures = 0;

    for path in files {
        match load_theme(path).and_then(|theme| {
            theme.validate()?;
            Ok(theme)
        }) {
            Ok(theme) => {
                let count = theme.tokens.as_ref().map_or(0, |t| t.token_count());
                println!("ok    {} ({}, {count} tokens)", path.display(), theme.id);
            }
            Err(err) => {
                failures += 1;
                println!("FAIL  {}: {err:#}", path.display());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} theme files failed validation", files.len());
    }
    Ok(())
}

/// Resolve each token against `theme`, returning `(input, value)` pairs
pub fn resolve_tokens(
    theme: &Theme,
    tokens: &[String],
    dark: bool,
    config: &ResolverConfig,
) -> Result<Vec<(String, String)>> {
    let ctx = CallContext::new();
    let resolver = theme.resolver(scheme(dark), config.clone())?;

    tokens
        .iter()
        .map(|token| {
            let value = resolver
                .resolve_value(&ctx, token)
                .with_context(|| format!("failed to resolve {token}"))?;
            Ok((token.clone(), value))
        })
        .collect()
}

pub fn resolve(config: &SwatchConfig, file: &Path, tokens: &[String], dark: bool) -> Result<()> {
    let theme = load_theme(file)?;
    for (token, value) in resolve_tokens(&theme, tokens, dark, &config.resolver)? {
        println!("{token} = {value}");
    }
    Ok(())
}

/// Render the fully resolved token set of `theme`
pub fn render_export(
    theme: &Theme,
    dark: bool,
    format: ExportFormat,
    selector: &str,
    config: &ResolverConfig,
) -> Result<String> {
    let ctx = CallContext::new();
    let resolver = theme.resolver(scheme(dark), config.clone())?;

    let rendered = match format {
        ExportFormat::Css => {
            let vars = resolver.export_css_variables(&ctx)?;
            let mut css = to_css_block(&vars, selector);
            if !theme.custom_css.is_empty() {
                css.push('\n');
                css.push_str(&theme.custom_css);
                if !css.ends_with('\n') {
                    css.push('\n');
                }
            }
            css
        }
        ExportFormat::Json => resolver.resolve_all(&ctx)?.to_json()?,
    };
    Ok(rendered)
}

pub fn export(
    config: &SwatchConfig,
    file: &Path,
    dark: bool,
    format: ExportFormat,
    selector: &str,
    output: Option<&Path>,
) -> Result<()> {
    let theme = load_theme(file)?;
    let rendered = render_export(&theme, dark, format, selector, &config.resolver)?;

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            debug!(path = %path.display(), "export written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Register `theme` with a fresh manager and fetch it back for `data`
pub async fn inspect_theme(
    config: &SwatchConfig,
    theme: Theme,
    data: Option<&Value>,
    tenant: Option<&str>,
) -> Result<Theme> {
    let ctx = CallContext::new();
    let manager = ThemeManager::new(config.manager.clone());
    let tenant = tenant.map(TenantId::new);
    let theme_id = theme.id.clone();

    manager.register_theme(&ctx, tenant.as_ref(), theme).await?;
    let resolved = manager
        .get_theme(&ctx, tenant.as_ref(), &theme_id, data)
        .await?;
    manager.close();
    Ok(resolved)
}

pub async fn inspect(
    config: &SwatchConfig,
    file: &Path,
    data: Option<&str>,
    tenant: Option<&str>,
) -> Result<()> {
    let theme = load_theme(file)?;
    let data: Option<Value> = data
        .map(serde_json::from_str)
        .transpose()
        .context("--data is not valid JSON")?;
    if data.as_ref().is_some_and(|d| !d.is_object()) {
        warn!("evaluation data is not a JSON object; conditions will see no fields");
    }

    let resolved = inspect_theme(config, theme, data.as_ref(), tenant).await?;
    println!("{}", resolved.to_json()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use swatch_theme::default_theme;

    #[test]
    fn extension_selects_the_format() {
        let yaml = default_theme().to_yaml().unwrap();
        let json = default_theme().to_json().unwrap();

        assert_eq!(parse_theme(Path::new("a.yaml"), &yaml).unwrap().id, "default");
        assert_eq!(parse_theme(Path::new("a.YML"), &yaml).unwrap().id, "default");
        assert_eq!(parse_theme(Path::new("a.json"), &json).unwrap().id, "default");
        assert_eq!(parse_theme(Path::new("theme"), &json).unwrap().id, "default");
        assert!(parse_theme(Path::new("a.json"), &yaml).is_err());
    }

    #[test]
    fn resolves_paths_and_compound_values() {
        let resolved = resolve_tokens(
            &default_theme(),
            &[
                "semantic.colors.background".into(),
                "1px solid semantic.colors.border".into(),
            ],
            true,
            &ResolverConfig::default(),
        )
        .unwrap();

        assert_eq!(resolved[0].1, "#18181b");
        assert_eq!(resolved[1].1, "1px solid #52525b");
    }

    #[test]
    fn unknown_token_fails_with_its_name() {
        let err = resolve_tokens(
            &default_theme(),
            &["semantic.colors.nope".into()],
            false,
            &ResolverConfig::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("semantic.colors.nope"));
    }

    #[test]
    fn css_export_uses_selector_and_appends_custom_css() {
        let mut theme = default_theme();
        theme.custom_css = ".brand { color: red; }".into();

        let css = render_export(
            &theme,
            true,
            ExportFormat::Css,
            "[data-theme=dark]",
            &ResolverConfig::default(),
        )
        .unwrap();

        assert!(css.starts_with("[data-theme=dark] {\n"));
        assert!(css.contains("  --semantic-colors-background: #18181b;\n"));
        assert!(css.ends_with(".brand { color: red; }\n"));
    }

    #[test]
    fn json_export_has_no_references_left() {
        let json = render_export(
            &default_theme(),
            false,
            ExportFormat::Json,
            ":root",
            &ResolverConfig::default(),
        )
        .unwrap();
        let tokens: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(tokens["semantic"]["colors"]["background"], json!("hsl(0, 0%, 100%)"));

        let semantic = tokens["semantic"].as_object().unwrap();
        for (category, values) in semantic {
            for (key, value) in values.as_object().unwrap() {
                let value = value.as_str().unwrap();
                assert!(
                    !value.split_whitespace().any(swatch_tokens::is_reference),
                    "semantic.{category}.{key} = {value}"
                );
            }
        }
    }

    #[tokio::test]
    async fn inspect_applies_matching_conditions() {
        let config = SwatchConfig::default();
        let data = json!({ "user": { "preferences": { "highContrast": true } } });

        let plain = inspect_theme(&config, default_theme(), None, None).await.unwrap();
        let contrast = inspect_theme(&config, default_theme(), Some(&data), Some("acme"))
            .await
            .unwrap();

        let tokens = contrast.tokens.unwrap();
        assert_eq!(
            tokens.get_token("semantic.colors.border").unwrap(),
            "primitives.colors.black"
        );
        assert_eq!(
            plain.tokens.unwrap().get_token("semantic.colors.border").unwrap(),
            "primitives.colors.gray-300"
        );
    }
}
