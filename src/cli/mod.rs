//! Command-line interface for layer-manager.
//!
//! The host framework runs one subcommand per lifecycle hook, from the service
//! directory:
//!
//! ```bash
//! # package:initialize
//! layer-manager install
//!
//! # before:deploy:deploy
//! layer-manager transform
//!
//! # Either hook by its host name
//! layer-manager hook before:deploy:deploy --template build/template.json
//!
//! # Inspect the merged configuration
//! layer-manager config
//! ```
//!
//! # Global Options
//!
//! - `--service <path>` - service definition (default `serverless.yml`)
//! - `--verbose` / `--quiet` - override `LOG_LEVEL`
//!
//! `install` and `hook` take `--timeout <SECS>` to kill a hung package manager.

mod config;
mod hook;
mod install;
mod transform;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::logging::{LOG_LEVEL_ENV, LogLevel, init_logging};
use crate::service::{DEFAULT_SERVICE_FILE, ServiceDefinition};
use crate::template::DEFAULT_TEMPLATE_PATH;

/// Lambda layer manager for serverless deployments.
#[derive(Parser, Debug)]
#[command(
    name = "layer-manager",
    about = "Install Lambda layer dependencies and upgrade layer references in compiled templates",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show per-layer and per-reference detail (same as LOG_LEVEL=verbose)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors (same as LOG_LEVEL=none)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the service definition (YAML, or JSON with a .json extension)
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_SERVICE_FILE)]
    service: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install layer dependencies (package:initialize)
    Install(install::InstallCommand),

    /// Export layers and upgrade layer references in the compiled template (before:deploy:deploy)
    Transform(transform::TransformCommand),

    /// Run a lifecycle hook by its host event name
    Hook(hook::HookCommand),

    /// Print the effective layer manager configuration
    Config(config::ConfigCommand),
}

impl Cli {
    /// Effective log level from the flags and `LOG_LEVEL`.
    #[must_use]
    pub fn log_level(&self) -> LogLevel {
        let env_value = std::env::var(LOG_LEVEL_ENV).ok();
        LogLevel::resolve(self.verbose, self.quiet, env_value.as_deref())
    }

    /// Initialize logging and run the selected command.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.log_level());
        tracing::debug!("Invoking layer-manager plugin");

        let service = ServiceDefinition::load(&self.service)?;

        match self.command {
            Commands::Install(cmd) => cmd.execute(&service).await,
            Commands::Transform(cmd) => cmd.execute(&service),
            Commands::Hook(cmd) => cmd.execute(&service).await,
            Commands::Config(cmd) => cmd.execute(&service),
        }
    }
}

/// Template path: the explicit one, or the host default under the service directory.
fn resolve_template_path(service: &ServiceDefinition, explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(
        || service.service_dir().join(DEFAULT_TEMPLATE_PATH),
        Path::to_path_buf,
    )
}

/// Print a summary as pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
