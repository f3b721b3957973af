//! Test utilities for layer-manager
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration suite.
//!
//! - [`init_test_logging`] - once-only tracing setup with a test writer
//! - [`FakeInstaller`] - a [`PackageInstaller`] that records calls instead of
//!   spawning processes
//! - [`fixtures`] - the foo/bar/hello template and service definitions

pub mod fixtures;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::LayerManagerError;
use crate::installer::{InstallOptions, PackageInstaller};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG` when set; with neither, no
/// subscriber is installed.
///
/// ```bash
/// RUST_LOG=transform=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_ansi(true)
            .try_init();
    });
}

/// Records every install request; optionally fails for one layer.
#[derive(Debug, Default)]
pub struct FakeInstaller {
    calls: Mutex<Vec<(PathBuf, InstallOptions)>>,
    fail_layer: Option<String>,
}

impl FakeInstaller {
    /// An installer that reports a non-zero exit for `layer`.
    pub fn failing_for(layer: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_layer: Some(layer.into()),
        }
    }

    /// Directories and options of every install request so far, in order.
    pub fn calls(&self) -> Vec<(PathBuf, InstallOptions)> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl PackageInstaller for FakeInstaller {
    async fn install(&self, dir: &Path, options: &InstallOptions) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((dir.to_path_buf(), options.clone()));
        }

        if self.fail_layer.as_deref() == Some(options.layer.as_str()) {
            return Err(LayerManagerError::InstallerFailed {
                packager: options.packager.to_string(),
                path: dir.display().to_string(),
                code: "1".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
