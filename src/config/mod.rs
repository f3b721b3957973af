//! Configuration for the layer manager.
//!
//! Options live in the service definition under `custom.layerConfig` and are
//! merged over defaults one key at a time:
//!
//! ```yaml
//! custom:
//!   layerConfig:
//!     installLayers: true
//!     exportLayers: true
//!     upgradeLayerReferences: true
//!     exportPrefix: ${AWS::StackName}-
//!     packager: npm
//!   plugin:
//!     layerManager:
//!       foo:
//!         unSafePermissions: true
//! ```
//!
//! Every omitted key keeps its default and unknown keys are ignored. A value of
//! the wrong type is rejected when the configuration is loaded.
//!
//! The resulting [`LayerConfig`] is immutable and passed explicitly to both the
//! installer and the transformer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::LayerManagerError;

/// Default export prefix. `${AWS::StackName}` is substituted by CloudFormation
/// through `Fn::Sub`, never by this tool.
pub const DEFAULT_EXPORT_PREFIX: &str = "${AWS::StackName}-";

/// Package manager used to install layer dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packager {
    /// `npm install`
    #[default]
    Npm,
    /// `yarn install`
    Yarn,
}

impl Packager {
    /// Executable name without platform suffix.
    pub const fn program(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
        }
    }
}

impl fmt::Display for Packager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Effective layer manager options after merging user overrides over defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerConfig {
    /// Install `nodejs` dependencies of each layer during package initialization
    pub install_layers: bool,
    /// Attach a stack export to each layer's qualified ARN output
    pub export_layers: bool,
    /// Rewrite function layer references to the versioned layer resource
    pub upgrade_layer_references: bool,
    /// Prefix prepended to each export name (an `Fn::Sub` template)
    pub export_prefix: String,
    /// Package manager to install dependencies with
    pub packager: Packager,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            install_layers: true,
            export_layers: true,
            upgrade_layer_references: true,
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            packager: Packager::default(),
        }
    }
}

impl LayerConfig {
    /// Merge the user's `custom.layerConfig` value over the defaults.
    ///
    /// `None` and `null` yield the defaults. Anything that is not a mapping, or
    /// a known key with a value of the wrong type, is a
    /// [`LayerManagerError::ConfigError`].
    pub fn from_custom(value: Option<&serde_json::Value>) -> Result<Self, LayerManagerError> {
        match value {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                LayerManagerError::ConfigError {
                    message: format!("custom.layerConfig: {e}"),
                }
            }),
        }
    }
}

/// Per-layer settings from `custom.plugin.layerManager.<layer>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerOverrides {
    /// Pass `--unsafe-perm` to npm (for installs running as root)
    #[serde(rename = "unSafePermissions")]
    pub unsafe_permissions: bool,
}

impl LayerOverrides {
    /// Parse the `custom.plugin.layerManager` mapping into per-layer overrides.
    pub fn map_from_custom(
        value: Option<&serde_json::Value>,
    ) -> Result<BTreeMap<String, Self>, LayerManagerError> {
        match value {
            None | Some(serde_json::Value::Null) => Ok(BTreeMap::new()),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                LayerManagerError::ConfigError {
                    message: format!("custom.plugin.layerManager: {e}"),
                }
            }),
        }
    }
}
