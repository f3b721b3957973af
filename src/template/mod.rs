//! Compiled CloudFormation template handling.
//!
//! The host compiles the service into a JSON template with two top-level
//! mappings this crate cares about:
//!
//! ```json
//! {
//!   "Resources": {
//!     "FooLambdaLayer3ed25b0e...": { "Type": "AWS::Lambda::LayerVersion", ... },
//!     "HelloLambdaFunction": {
//!       "Type": "AWS::Lambda::Function",
//!       "Properties": { "Layers": [{ "Ref": "FooLambdaLayer" }] }
//!     }
//!   },
//!   "Outputs": {
//!     "FooLambdaLayerQualifiedArn": { "Value": { "Ref": "FooLambdaLayer3ed25b0e..." } }
//!   }
//! }
//! ```
//!
//! [`CompiledTemplate`] wraps the whole document so that everything it does not
//! understand round-trips untouched, in its original key order.
//! [`transform_layer_resources`] performs the export and reference upgrade.

mod transform;

pub use transform::{ExportedLayer, TransformSummary, UpgradedReference, transform_layer_resources};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

use crate::core::LayerManagerError;
use crate::utils::atomic_write;

/// Resource type of functions whose `Layers` are rewritten.
pub const FUNCTION_TYPE: &str = "AWS::Lambda::Function";

/// Resource type the host emits for each declared layer.
pub const LAYER_VERSION_TYPE: &str = "AWS::Lambda::LayerVersion";

/// Default location of the compiled template, relative to the service directory.
pub const DEFAULT_TEMPLATE_PATH: &str = ".serverless/cloudformation-template-update-stack.json";

/// A compiled template document, mutated in place by the transformer.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    document: Value,
}

impl CompiledTemplate {
    /// Wrap a parsed document.
    ///
    /// The document must be an object; `Resources` and `Outputs` may be absent
    /// but must be objects when present.
    pub fn from_value(document: Value) -> Result<Self, LayerManagerError> {
        let Some(root) = document.as_object() else {
            return Err(LayerManagerError::InvalidTemplate {
                reason: "template root is not an object".to_string(),
            });
        };

        for section in ["Resources", "Outputs"] {
            if root.get(section).is_some_and(|value| !value.is_object()) {
                return Err(LayerManagerError::InvalidTemplate {
                    reason: format!("'{section}' is not a mapping"),
                });
            }
        }

        Ok(Self {
            document,
        })
    }

    /// Read and parse a template file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LayerManagerError::TemplateNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read compiled template: {}", path.display()))?;

        let document: Value =
            serde_json::from_str(&content).map_err(|e| LayerManagerError::TemplateParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self::from_value(document)?)
    }

    /// Write the template back as pretty-printed JSON, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut content = serde_json::to_vec_pretty(&self.document)?;
        content.push(b'\n');
        atomic_write(path, &content)
            .with_context(|| format!("Failed to save compiled template: {}", path.display()))
    }

    /// The underlying document.
    pub fn as_value(&self) -> &Value {
        &self.document
    }

    /// Look up a resource by logical id.
    pub fn resource(&self, id: &str) -> Option<&Value> {
        self.document.get("Resources")?.get(id)
    }

    /// Whether `id` names an `AWS::Lambda::LayerVersion` resource.
    pub fn is_layer_version(&self, id: &str) -> bool {
        self.resource(id).and_then(|resource| resource.get("Type")).and_then(Value::as_str)
            == Some(LAYER_VERSION_TYPE)
    }

    /// Look up an output by id.
    pub fn output(&self, id: &str) -> Option<&Value> {
        self.document.get("Outputs")?.get(id)
    }

    pub(crate) fn output_mut(&mut self, id: &str) -> Option<&mut Map<String, Value>> {
        self.document.get_mut("Outputs")?.get_mut(id)?.as_object_mut()
    }

    /// Layer reference lists of every function resource, with the function's id.
    pub(crate) fn function_layers_mut(
        &mut self,
    ) -> impl Iterator<Item = (&String, &mut Vec<Value>)> {
        self.document
            .get_mut("Resources")
            .and_then(Value::as_object_mut)
            .into_iter()
            .flat_map(|resources| resources.iter_mut())
            .filter(|(_, resource)| {
                resource.get("Type").and_then(Value::as_str) == Some(FUNCTION_TYPE)
            })
            .filter_map(|(id, resource)| {
                let layers = resource.get_mut("Properties")?.get_mut("Layers")?.as_array_mut()?;
                Some((id, layers))
            })
    }
}
