//! Layer export and reference upgrade.
//!
//! CloudFormation gives each layer version resource a content-hash suffixed id
//! that changes whenever the layer changes. Functions compiled against the
//! logical id (`FooLambdaLayer`) would keep pointing at a stale version, so
//! right before deployment every such reference is rewritten to the versioned id
//! found in the layer's `QualifiedArn` output.

use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

use super::{CompiledTemplate, LAYER_VERSION_TYPE};
use crate::config::LayerConfig;
use crate::core::LayerNames;
use crate::service::LayerDeclaration;

/// An output that received a stack export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedLayer {
    /// Declared layer name
    pub layer: String,
    /// Id of the output that was exported
    pub output_id: String,
    /// Export name template (`exportPrefix` + output id)
    pub export_name: String,
    /// The output as it stands after the export was attached
    pub output: Value,
}

/// A function layer reference rewritten to a versioned layer resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradedReference {
    /// Id of the function resource that holds the reference
    pub function: String,
    /// Logical layer id the reference pointed at
    pub from: String,
    /// Versioned layer id it points at now
    pub to: String,
}

/// Result of [`transform_layer_resources`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformSummary {
    /// Outputs that received an `Export` block
    pub exported_layers: Vec<ExportedLayer>,
    /// Every rewritten function layer reference
    pub upgraded_layer_references: Vec<UpgradedReference>,
    /// Declared layers with no matching compiled output
    pub skipped_layers: Vec<String>,
}

/// Export layer outputs and upgrade function layer references in place.
///
/// For every declared layer the matching `{Name}LambdaLayerQualifiedArn` output
/// is looked up. Layers without one are skipped with a warning; that is never an
/// error. Otherwise:
///
/// - with `export_layers`, the output gets
///   `Export: { Name: { "Fn::Sub": export_prefix + output_id } }`, replacing any
///   existing export;
/// - with `upgrade_layer_references`, every `{ "Ref": "{Name}LambdaLayer" }`
///   entry in a function's `Layers` is pointed at the output's `Value.Ref`,
///   unless the two ids are already equal.
///
/// Running it again on a transformed template upgrades nothing, since no
/// function references the logical id anymore.
pub fn transform_layer_resources(
    template: &mut CompiledTemplate,
    layers: &BTreeMap<String, LayerDeclaration>,
    config: &LayerConfig,
) -> TransformSummary {
    let mut summary = TransformSummary::default();

    for layer in layers.keys() {
        let names = LayerNames::for_layer(layer);

        let Some(output) = template.output_mut(&names.output_id) else {
            tracing::warn!(
                target: "transform",
                "Layer '{}' has no compiled output {}; skipping export and reference upgrade",
                layer,
                names.output_id
            );
            summary.skipped_layers.push(layer.clone());
            continue;
        };

        if config.export_layers {
            let export_name = format!("{}{}", config.export_prefix, names.output_id);
            output.insert(
                "Export".to_string(),
                json!({
                    "Name": {
                        "Fn::Sub": export_name
                    }
                }),
            );
            tracing::debug!(target: "transform", "Exporting {} as {}", names.output_id, export_name);

            summary.exported_layers.push(ExportedLayer {
                layer: layer.clone(),
                output_id: names.output_id.clone(),
                export_name,
                output: Value::Object(output.clone()),
            });
        }

        if !config.upgrade_layer_references {
            continue;
        }

        let versioned = template
            .output(&names.output_id)
            .and_then(|output| output.get("Value"))
            .and_then(|value| value.get("Ref"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        match versioned {
            None => {
                tracing::debug!(
                    target: "transform",
                    "Output {} has no Ref value; leaving references to {} unchanged",
                    names.output_id,
                    names.logical_id
                );
            }
            Some(versioned) if versioned == names.logical_id => {
                tracing::debug!(
                    target: "transform",
                    "{} is already versioned; nothing to upgrade",
                    names.logical_id
                );
            }
            Some(versioned) => {
                if !template.is_layer_version(&versioned) {
                    tracing::warn!(
                        target: "transform",
                        "Output {} references {}, which is not a {} resource in this template",
                        names.output_id,
                        versioned,
                        LAYER_VERSION_TYPE
                    );
                }
                tracing::info!(
                    target: "transform",
                    "Replacing references to {} with {}",
                    names.logical_id,
                    versioned
                );
                summary.upgraded_layer_references.extend(upgrade_references(
                    template,
                    &names.logical_id,
                    &versioned,
                ));
            }
        }
    }

    if tracing::enabled!(target: "transform", tracing::Level::TRACE) {
        match serde_json::to_string_pretty(template.as_value()) {
            Ok(rendered) => {
                tracing::trace!(target: "transform", "Template after transformation:\n{}", rendered);
            }
            Err(e) => tracing::trace!(target: "transform", "Could not render template: {}", e),
        }
    }

    summary
}

fn upgrade_references(
    template: &mut CompiledTemplate,
    logical_id: &str,
    versioned_id: &str,
) -> Vec<UpgradedReference> {
    let mut upgraded = Vec::new();

    for (function, layers) in template.function_layers_mut() {
        for reference in layers.iter_mut() {
            let Some(target) = reference.get_mut("Ref") else {
                continue;
            };
            if target.as_str() != Some(logical_id) {
                continue;
            }

            tracing::debug!(
                target: "transform",
                "{}: Updating reference to layer version {}",
                function,
                versioned_id
            );
            *target = Value::String(versioned_id.to_string());
            upgraded.push(UpgradedReference {
                function: function.clone(),
                from: logical_id.to_string(),
                to: versioned_id.to_string(),
            });
        }
    }

    upgraded
}
