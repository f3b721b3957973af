//! Layer dependency installation.
//!
//! A layer whose directory contains a `nodejs` subdirectory carries its own
//! Node.js dependency tree; during package initialization the configured
//! package manager is run in that subdirectory so the dependencies end up in
//! the packaged layer. Layers without it are treated as prebuilt and skipped.
//!
//! Layers are installed one at a time, in layer name order, so installer output
//! never interleaves. The first failure aborts the whole step. Every run
//! reinstalls; nothing is cached.
//!
//! Process execution sits behind [`PackageInstaller`]. [`CommandInstaller`]
//! spawns the real package manager; tests substitute a recording fake.

mod command_builder;

pub use command_builder::{CommandInstaller, PackagerCommand};

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::config::{LayerConfig, LayerOverrides, Packager};
use crate::service::{LayerDeclaration, ServiceDefinition};

/// Subdirectory of a layer that marks an installable Node.js dependency tree.
pub const NODEJS_DIR: &str = "nodejs";

/// Parameters of one install invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    /// Declared name of the layer being installed
    pub layer: String,
    /// Package manager to run
    pub packager: Packager,
    /// Pass `--unsafe-perm` (npm only)
    pub unsafe_permissions: bool,
}

impl InstallOptions {
    /// Arguments for the package manager.
    pub fn args(&self) -> Vec<&'static str> {
        match self.packager {
            Packager::Npm if self.unsafe_permissions => vec!["install", "--unsafe-perm"],
            Packager::Npm | Packager::Yarn => vec!["install"],
        }
    }
}

/// Capability to install dependencies in a directory.
///
/// Implementations must run to completion before returning and report any
/// failure as an error; the installer never retries.
#[allow(async_fn_in_trait)]
pub trait PackageInstaller {
    /// Install dependencies in `dir`.
    async fn install(&self, dir: &Path, options: &InstallOptions) -> Result<()>;
}

/// Result of [`install_layers`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallSummary {
    /// Names of the layers whose dependencies were installed
    pub installed_layers: Vec<String>,
}

/// Install one layer's dependencies if it has a `nodejs` subdirectory.
///
/// Returns `Ok(false)` when there is nothing to install.
pub async fn install_layer<I: PackageInstaller>(
    layer: &LayerDeclaration,
    overrides: &LayerOverrides,
    config: &LayerConfig,
    installer: &I,
) -> Result<bool> {
    let Some(path) = &layer.path else {
        tracing::debug!(target: "installer", "Layer '{}' has no path; nothing to install", layer.name);
        return Ok(false);
    };

    let nodejs_dir = path.join(NODEJS_DIR);
    if !nodejs_dir.is_dir() {
        tracing::debug!(
            target: "installer",
            "Layer '{}' has no {} directory; nothing to install",
            layer.name,
            NODEJS_DIR
        );
        return Ok(false);
    }

    if overrides.unsafe_permissions && config.packager == Packager::Yarn {
        tracing::debug!(
            target: "installer",
            "Ignoring unSafePermissions for layer '{}': yarn has no --unsafe-perm",
            layer.name
        );
    }

    let options = InstallOptions {
        layer: layer.name.clone(),
        packager: config.packager,
        unsafe_permissions: overrides.unsafe_permissions,
    };

    tracing::debug!(
        target: "installer",
        "Installing nodejs layer {} using {} {}",
        path.display(),
        config.packager,
        options.args().join(" ")
    );

    installer
        .install(&nodejs_dir, &options)
        .await
        .with_context(|| format!("Failed to install dependencies for layer '{}'", layer.name))?;

    Ok(true)
}

/// Install the dependencies of every declared layer.
///
/// With `install_layers` disabled nothing is attempted and the summary is empty.
pub async fn install_layers<I: PackageInstaller>(
    service: &ServiceDefinition,
    config: &LayerConfig,
    installer: &I,
) -> Result<InstallSummary> {
    if !config.install_layers {
        tracing::debug!(target: "installer", "Skipping installation of layers as per config");
        return Ok(InstallSummary::default());
    }

    let overrides = service.layer_overrides()?;
    let default_overrides = LayerOverrides::default();
    let mut summary = InstallSummary::default();

    for (name, layer) in service.layers() {
        let layer_overrides = overrides.get(name).unwrap_or(&default_overrides);
        if install_layer(layer, layer_overrides, config, installer).await? {
            summary.installed_layers.push(name.clone());
        }
    }

    tracing::info!(target: "installer", "Installed {} layers", summary.installed_layers.len());

    Ok(summary)
}
