//! Command-line interface for bundlejam.
//!
//! The binary is a development aid around the library: it validates an asset
//! configuration and shows what a page referencing a given set of bundles
//! would emit.
//!
//! # Available Commands
//!
//! - `check` - Validate the configuration, dangling dependencies and cycles
//! - `order` - Print bundle names per namespace in emission order
//! - `render` - Print the fragments a set of references produces
//! - `page` - Render a Tera page template with its assets
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress everything except errors
//! - `--config` - Asset configuration file (default `bundles.toml`,
//!   or `BUNDLEJAM_CONFIG`)
//!
//! Logs go to stderr; stdout carries only command output.
//!
//! # Examples
//!
//! ```bash
//! bundlejam check
//! bundlejam order angular-resource css:style1
//! bundlejam -c site/bundles.toml render angular-resource --namespace js
//! bundlejam page index.html --templates 'templates/**/*.html' --context ctx.json
//! ```

mod check;
mod common;
mod order;
mod page;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use check::CheckCommand;
pub use order::OrderCommand;
pub use page::PageCommand;
pub use render::RenderCommand;

/// Configuration file used when neither `--config` nor `BUNDLEJAM_CONFIG` is set.
pub const DEFAULT_CONFIG_FILE: &str = "bundles.toml";

/// Output format for commands that print structured results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON for scripts
    Json,
}

/// Runtime configuration derived from the global flags.
///
/// Kept separate from [`Cli`] so tests and embedders can run commands without
/// going through argument parsing.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Asset configuration file.
    pub config_path: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }
}

impl CliConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the asset configuration file.
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Install the stderr log subscriber.
    ///
    /// `RUST_LOG` takes precedence over [`log_level`](Self::log_level). A
    /// second call, or a subscriber installed by the host, is left in place.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(&self.log_level)
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Asset bundle dependency registry and renderer.
#[derive(Parser)]
#[command(
    name = "bundlejam",
    about = "Resolve and render static asset bundles in dependency order",
    version,
    author
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging).
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the asset configuration file.
    #[arg(
        short,
        long,
        global = true,
        env = "BUNDLEJAM_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    config: PathBuf,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate the asset configuration.
    ///
    /// Reports dangling dependencies and dependency cycles; exits non-zero
    /// when anything is wrong.
    Check(CheckCommand),

    /// Print bundle names per namespace in emission order.
    Order(OrderCommand),

    /// Print the fragments the given references produce.
    Render(RenderCommand),

    /// Render a page template together with its assets.
    Page(PageCommand),
}

impl Cli {
    /// Execute the parsed command line.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(&config)
    }

    /// Build a [`CliConfig`] from the parsed flags.
    ///
    /// - `--verbose`: debug
    /// - `--quiet`: error
    /// - otherwise: warn
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig::new().with_log_level(log_level).with_config_path(self.config.clone())
    }

    /// Execute with an explicit configuration.
    pub fn execute_with_config(self, config: &CliConfig) -> Result<()> {
        match self.command {
            Commands::Check(cmd) => cmd.execute(config),
            Commands::Order(cmd) => cmd.execute(config),
            Commands::Render(cmd) => cmd.execute(config),
            Commands::Page(cmd) => cmd.execute(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_log_levels() {
        let cli = Cli::parse_from(["bundlejam", "--verbose", "check"]);
        assert_eq!(cli.build_config().log_level, "debug");

        let cli = Cli::parse_from(["bundlejam", "-q", "check"]);
        assert_eq!(cli.build_config().log_level, "error");

        let cli = Cli::parse_from(["bundlejam", "check"]);
        assert_eq!(cli.build_config().log_level, "warn");
    }

    #[test]
    fn test_config_path_flag() {
        let cli = Cli::parse_from(["bundlejam", "order", "app", "-c", "site/assets.toml"]);
        assert_eq!(cli.build_config().config_path, PathBuf::from("site/assets.toml"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["bundlejam", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
