//! Builder for package manager invocations.
//!
//! Installs stream straight to the terminal: the child inherits stdout and
//! stderr, and only the exit status is consumed. Without a timeout a hung
//! install blocks packaging until it is interrupted; with one, the child is
//! killed once it expires.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use super::{InstallOptions, PackageInstaller};
use crate::config::Packager;
use crate::core::LayerManagerError;
use crate::utils::{command_exists, packager_command};

/// Fluent builder for one package manager process.
///
/// ```rust,no_run
/// use layer_manager::config::Packager;
/// use layer_manager::installer::PackagerCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// PackagerCommand::for_packager(Packager::Npm)
///     .arg("install")
///     .current_dir("layers/foo/nodejs")
///     .with_context("foo")
///     .execute_success()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PackagerCommand {
    /// Executable to spawn
    program: String,

    /// Arguments passed to the executable
    args: Vec<String>,

    /// Working directory (defaults to the current process directory)
    current_dir: Option<PathBuf>,

    /// Maximum duration to wait for the child (None = wait indefinitely)
    timeout_duration: Option<Duration>,

    /// Identifier included in log lines, typically the layer name
    context: Option<String>,
}

impl PackagerCommand {
    /// Create a command for an arbitrary executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            timeout_duration: None,
            context: None,
        }
    }

    /// Create a command for a package manager, using the platform's executable name.
    pub fn for_packager(packager: Packager) -> Self {
        Self::new(packager_command(packager))
    }

    /// Sets the working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Kill the child and fail if it runs longer than `duration` (None for no limit).
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Set a context for logging (e.g. layer name)
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn display_command(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Run the command to completion with inherited stdio.
    ///
    /// Fails with [`LayerManagerError::PackagerNotFound`] when the executable
    /// does not exist and [`LayerManagerError::InstallerFailed`] on a non-zero
    /// exit. When the timeout expires the child is killed and
    /// [`LayerManagerError::InstallerTimedOut`] is returned.
    pub async fn execute_success(self) -> Result<()> {
        let start = std::time::Instant::now();
        let command_line = self.display_command();
        let dir_display = self
            .current_dir
            .as_ref()
            .map_or_else(|| ".".to_string(), |dir| dir.display().to_string());

        match &self.context {
            Some(ctx) => tracing::debug!(
                target: "installer",
                "({}) Executing command: {} in {}",
                ctx,
                command_line,
                dir_display
            ),
            None => tracing::debug!(
                target: "installer",
                "Executing command: {} in {}",
                command_line,
                dir_display
            ),
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        cmd.kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LayerManagerError::PackagerNotFound {
                    packager: self.program,
                }
                .into());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to execute {command_line} in {dir_display}")));
            }
        };

        let status = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, child.wait()).await {
                result.with_context(|| format!("Failed to wait for {command_line}"))?
            } else {
                tracing::warn!(
                    target: "installer",
                    "Command timed out after {} seconds: {}",
                    duration.as_secs(),
                    command_line
                );
                if let Err(e) = child.kill().await {
                    tracing::debug!(target: "installer", "Failed to kill {}: {}", command_line, e);
                }
                return Err(LayerManagerError::InstallerTimedOut {
                    packager: self.program,
                    path: dir_display,
                    seconds: duration.as_secs(),
                }
                .into());
            }
        } else {
            child.wait().await.with_context(|| format!("Failed to wait for {command_line}"))?
        };

        if !status.success() {
            tracing::debug!(
                target: "installer",
                "Command failed with exit code: {:?}",
                status.code()
            );
            return Err(LayerManagerError::InstallerFailed {
                packager: self.program,
                path: dir_display,
                code: status.code().map_or_else(|| "signal".to_string(), |code| code.to_string()),
            }
            .into());
        }

        let elapsed = start.elapsed();
        match &self.context {
            Some(ctx) => tracing::debug!(
                target: "installer",
                "({}) {} finished in {:.2}s",
                ctx,
                command_line,
                elapsed.as_secs_f64()
            ),
            None => tracing::debug!(
                target: "installer",
                "{} finished in {:.2}s",
                command_line,
                elapsed.as_secs_f64()
            ),
        }

        Ok(())
    }
}

/// [`PackageInstaller`] that spawns the real package manager.
///
/// No timeout by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandInstaller {
    timeout: Option<Duration>,
}

impl CommandInstaller {
    /// Limit each package manager run to `timeout` (None for no limit).
    pub const fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
        }
    }
}

impl PackageInstaller for CommandInstaller {
    async fn install(&self, dir: &Path, options: &InstallOptions) -> Result<()> {
        let program = packager_command(options.packager);
        if !command_exists(program) {
            return Err(LayerManagerError::PackagerNotFound {
                packager: program.to_string(),
            }
            .into());
        }

        PackagerCommand::for_packager(options.packager)
            .args(options.args())
            .current_dir(dir)
            .with_context(options.layer.clone())
            .with_timeout(self.timeout)
            .execute_success()
            .await
    }
}
