//! Lifecycle hooks exposed to the host framework.
//!
//! The host calls the layer manager at two fixed points of its pipeline:
//!
//! | Event | When | Work |
//! |-------|------|------|
//! | `package:initialize` | before the template is compiled | load config, install layer dependencies |
//! | `before:deploy:deploy` | after compilation, before submission | load config, export layers and upgrade references |
//!
//! Both hooks load the configuration from the service definition themselves and
//! pass it down explicitly, so neither depends on the other having run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::LayerConfig;
use crate::core::LayerManagerError;
use crate::installer::{InstallSummary, PackageInstaller, install_layers};
use crate::service::ServiceDefinition;
use crate::template::{CompiledTemplate, TransformSummary, transform_layer_resources};

/// Host lifecycle events the layer manager handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookEvent {
    /// Package initialization, before template compilation
    #[serde(rename = "package:initialize")]
    PackageInitialize,
    /// Immediately before the compiled template is deployed
    #[serde(rename = "before:deploy:deploy")]
    BeforeDeployDeploy,
}

impl HookEvent {
    /// Every handled event, in pipeline order.
    pub const ALL: [Self; 2] = [Self::PackageInitialize, Self::BeforeDeployDeploy];

    /// The host's name for this event.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PackageInitialize => "package:initialize",
            Self::BeforeDeployDeploy => "before:deploy:deploy",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HookEvent {
    type Err = LayerManagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|event| event.name() == s).ok_or_else(|| {
            LayerManagerError::UnknownHook {
                name: s.to_string(),
            }
        })
    }
}

/// What a hook did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HookOutcome {
    /// Result of `package:initialize`
    Installed(InstallSummary),
    /// Result of `before:deploy:deploy`
    Transformed(TransformSummary),
}

/// Load and log the effective configuration for one hook invocation.
pub fn load_config(service: &ServiceDefinition) -> Result<LayerConfig> {
    let config = service.layer_config()?;
    tracing::debug!(
        target: "config",
        "Config: {}",
        serde_json::to_string(&config).unwrap_or_else(|_| format!("{config:?}"))
    );
    Ok(config)
}

/// `package:initialize`: install the dependencies of every declared layer.
pub async fn package_initialize<I: PackageInstaller>(
    service: &ServiceDefinition,
    installer: &I,
) -> Result<InstallSummary> {
    let config = load_config(service)?;
    install_layers(service, &config, installer).await
}

/// `before:deploy:deploy`: transform an in-memory template.
pub fn before_deploy(
    service: &ServiceDefinition,
    template: &mut CompiledTemplate,
) -> Result<TransformSummary> {
    let config = load_config(service)?;
    Ok(transform_layer_resources(template, service.layers(), &config))
}

/// Run a hook by event, reading and rewriting the template file for
/// `before:deploy:deploy`.
pub async fn run_hook<I: PackageInstaller>(
    event: HookEvent,
    service: &ServiceDefinition,
    template_path: &Path,
    installer: &I,
) -> Result<HookOutcome> {
    tracing::debug!("Invoking layer-manager hook {}", event);

    match event {
        HookEvent::PackageInitialize => package_initialize(service, installer)
            .await
            .map(HookOutcome::Installed)
            .with_context(|| format!("{event} failed")),
        HookEvent::BeforeDeployDeploy => {
            let mut template = CompiledTemplate::load(template_path)?;
            let summary = before_deploy(service, &mut template)?;
            template.save(template_path)?;
            Ok(HookOutcome::Transformed(summary))
        }
    }
}
