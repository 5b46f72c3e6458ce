//! Swatch command line tool.
//!
//! Works on theme documents (JSON or YAML) without a running service:
//! validation, token resolution, CSS export and conditional inspection.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use swatch_theme::SwatchConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "swatch.toml";

#[derive(Parser, Debug)]
#[command(name = "swatch")]
#[command(version, about = "Design token theme tooling")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to swatch.toml
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check theme documents for structural and reference errors
    Validate {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Resolve token paths or compound values against a theme
    Resolve {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(required = true, value_name = "TOKEN")]
        tokens: Vec<String>,

        /// Use the dark token set
        #[arg(long)]
        dark: bool,
    },

    /// Export the fully resolved token set
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Use the dark token set
        #[arg(long)]
        dark: bool,

        #[arg(long, value_enum, default_value_t = ExportFormat::Css)]
        format: ExportFormat,

        /// CSS selector wrapping the variables
        #[arg(long, default_value = ":root")]
        selector: String,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Show the theme produced for a given evaluation context
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Evaluation data as a JSON object
        #[arg(long, value_name = "JSON")]
        data: Option<String>,

        /// Register and fetch the theme under this tenant
        #[arg(long, value_name = "ID")]
        tenant: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Css,
    Json,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<SwatchConfig> {
    if let Some(path) = explicit {
        return SwatchConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }

    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    if fallback.is_file() {
        debug!(path = DEFAULT_CONFIG_FILE, "using config from working directory");
        return SwatchConfig::load(fallback)
            .with_context(|| format!("failed to load config {DEFAULT_CONFIG_FILE}"));
    }

    Ok(SwatchConfig::default())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Validate { files } => commands::validate(&files),
        Command::Resolve { file, tokens, dark } => commands::resolve(&config, &file, &tokens, dark),
        Command::Export {
            file,
            dark,
            format,
            selector,
            output,
        } => commands::export(&config, &file, dark, format, &selector, output.as_deref()),
        Command::Inspect { file, data, tenant } => {
            commands::inspect(&config, &file, data.as_deref(), tenant.as_deref()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_defaults() {
        let cli = Cli::try_parse_from(["swatch", "export", "theme.json"]).unwrap();
        match cli.command {
            Command::Export {
                format,
                selector,
                dark,
                output,
                ..
            } => {
                assert_eq!(format, ExportFormat::Css);
                assert_eq!(selector, ":root");
                assert!(!dark);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "swatch",
            "resolve",
            "theme.yaml",
            "semantic.colors.primary",
            "--dark",
            "--verbose",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn resolve_requires_a_token() {
        assert!(Cli::try_parse_from(["swatch", "resolve", "theme.json"]).is_err());
    }

    #[test]
    fn validate_requires_a_file() {
        assert!(Cli::try_parse_from(["swatch", "validate"]).is_err());
    }
}
