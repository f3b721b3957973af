//! Service definition loading.
//!
//! The host framework's service definition (`serverless.yml` or
//! `serverless.json`) declares the layers and carries the layer manager's
//! settings. Only three parts are read:
//!
//! ```yaml
//! layers:
//!   foo:
//!     path: layers/foo
//! custom:
//!   layerConfig: { ... }          # see crate::config::LayerConfig
//!   plugin:
//!     layerManager:
//!       foo: { unSafePermissions: true }
//! ```
//!
//! Everything else in the file is ignored. Relative layer paths are resolved
//! against the directory containing the service definition.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{LayerConfig, LayerOverrides};
use crate::core::LayerManagerError;

/// Default service definition file name.
pub const DEFAULT_SERVICE_FILE: &str = "serverless.yml";

/// One declared layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDeclaration {
    /// Declared layer name (the key under `layers`)
    pub name: String,
    /// Layer directory, resolved against the service directory. Layers that
    /// point at a prebuilt artifact have no path.
    pub path: Option<PathBuf>,
}

/// The parts of a service definition the layer manager consumes.
#[derive(Debug, Clone)]
pub struct ServiceDefinition {
    service_dir: PathBuf,
    layers: BTreeMap<String, LayerDeclaration>,
    custom: serde_json::Value,
}

impl ServiceDefinition {
    /// Load a service definition from disk.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LayerManagerError::ServiceDefinitionNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read service definition: {}", path.display()))?;

        let parse_error = |reason: String| LayerManagerError::ServiceDefinitionParseError {
            file: path.display().to_string(),
            reason,
        };

        let value = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        } else {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
            consumed_sections(yaml).map_err(|e| parse_error(e.to_string()))?
        };

        let service_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        tracing::debug!(target: "config", "Loaded service definition {}", path.display());

        Ok(Self::from_value(value, &service_dir)?)
    }

    /// Build a service definition from an already parsed document.
    pub fn from_value(
        value: serde_json::Value,
        service_dir: &Path,
    ) -> Result<Self, LayerManagerError> {
        let serde_json::Value::Object(mut root) = value else {
            return Err(LayerManagerError::ServiceDefinitionParseError {
                file: service_dir.display().to_string(),
                reason: "service definition must be a mapping".to_string(),
            });
        };

        let layers = match root.remove("layers") {
            None | Some(serde_json::Value::Null) => BTreeMap::new(),
            Some(serde_json::Value::Object(layers)) => layers
                .into_iter()
                .map(|(name, definition)| {
                    let path = definition
                        .get("path")
                        .and_then(serde_json::Value::as_str)
                        .map(|p| resolve_layer_path(service_dir, p));
                    let declaration = LayerDeclaration {
                        name: name.clone(),
                        path,
                    };
                    (name, declaration)
                })
                .collect(),
            Some(other) => {
                return Err(LayerManagerError::ServiceDefinitionParseError {
                    file: service_dir.display().to_string(),
                    reason: format!("'layers' must be a mapping, found {other}"),
                });
            }
        };

        let custom = root.remove("custom").unwrap_or(serde_json::Value::Null);

        Ok(Self {
            service_dir: service_dir.to_path_buf(),
            layers,
            custom,
        })
    }

    /// Directory containing the service definition.
    pub fn service_dir(&self) -> &Path {
        &self.service_dir
    }

    /// Declared layers, keyed and ordered by name.
    pub fn layers(&self) -> &BTreeMap<String, LayerDeclaration> {
        &self.layers
    }

    /// Effective configuration: `custom.layerConfig` merged over the defaults.
    pub fn layer_config(&self) -> Result<LayerConfig, LayerManagerError> {
        LayerConfig::from_custom(self.custom.get("layerConfig"))
    }

    /// Per-layer overrides from `custom.plugin.layerManager`.
    pub fn layer_overrides(&self) -> Result<BTreeMap<String, LayerOverrides>, LayerManagerError> {
        LayerOverrides::map_from_custom(
            self.custom.get("plugin").and_then(|plugin| plugin.get("layerManager")),
        )
    }
}

/// Convert the `layers` and `custom` sections of a YAML document to JSON.
///
/// The rest of the document is dropped unconverted, so YAML-only constructs
/// elsewhere (null or sequence mapping keys under `resources`) do not matter.
fn consumed_sections(yaml: serde_yaml::Value) -> Result<serde_json::Value, serde_json::Error> {
    let serde_yaml::Value::Mapping(mut root) = yaml else {
        return serde_json::to_value(yaml);
    };

    let mut sections = serde_json::Map::new();
    for key in ["layers", "custom"] {
        if let Some(section) = root.remove(key) {
            sections.insert(key.to_string(), serde_json::to_value(section)?);
        }
    }
    Ok(serde_json::Value::Object(sections))
}

fn resolve_layer_path(service_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        service_dir.join(path)
    }
}
