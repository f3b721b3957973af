//! Test fixtures for templates and service definitions
//!
//! The sample template mirrors what the host compiler produces for a service
//! with two layers (`foo`, `bar`) and one function (`hello`) that uses `foo`.

use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::installer::NODEJS_DIR;
use crate::service::{LayerDeclaration, ServiceDefinition};
use crate::template::CompiledTemplate;

/// Versioned id the compiler gave the `foo` layer.
pub const FOO_VERSIONED: &str = "FooLambdaLayer3ed25b0e140bd1e41c1e324ac4792fd38d3757af";

/// Versioned id the compiler gave the `bar` layer.
pub const BAR_VERSIONED: &str = "BarLambdaLayer9d80ae7472d5ab9ca001e6a13cdca0aba66c372f";

/// The compiled template document for the foo/bar/hello service.
pub fn sample_template_value() -> Value {
    json!({
        "AWSTemplateFormatVersion": "2010-09-09",
        "Resources": {
            FOO_VERSIONED: {
                "Type": "AWS::Lambda::LayerVersion",
                "Properties": {
                    "LayerName": "Foo"
                },
                "DeletionPolicy": "Retain"
            },
            BAR_VERSIONED: {
                "Type": "AWS::Lambda::LayerVersion",
                "Properties": {
                    "LayerName": "Bar"
                },
                "DeletionPolicy": "Retain"
            },
            "HelloLambdaFunction": {
                "Type": "AWS::Lambda::Function",
                "Properties": {
                    "FunctionName": "hello",
                    "Layers": [
                        { "Ref": "FooLambdaLayer" }
                    ]
                }
            }
        },
        "Outputs": {
            "FooLambdaLayerQualifiedArn": {
                "Value": { "Ref": FOO_VERSIONED }
            },
            "BarLambdaLayerQualifiedArn": {
                "Value": { "Ref": BAR_VERSIONED }
            }
        }
    })
}

/// [`sample_template_value`] wrapped as a [`CompiledTemplate`].
pub fn sample_template() -> CompiledTemplate {
    CompiledTemplate::from_value(sample_template_value())
        .unwrap_or_else(|e| panic!("sample template is invalid: {e}"))
}

/// The `foo` and `bar` layer declarations.
pub fn sample_layers() -> BTreeMap<String, LayerDeclaration> {
    sample_service().layers().clone()
}

/// Service definition declaring `foo` (path `Foo`) and `bar` (path `Bar`).
pub fn sample_service() -> ServiceDefinition {
    sample_service_with_config(Value::Null)
}

/// Sample service with `custom.layerConfig` set to `layer_config`.
pub fn sample_service_with_config(layer_config: Value) -> ServiceDefinition {
    ServiceDefinition::from_value(
        json!({
            "service": "sample",
            "custom": { "layerConfig": layer_config },
            "functions": {
                "hello": { "layers": [{ "Ref": "FooLambdaLayer" }] }
            },
            "layers": {
                "foo": { "path": "Foo" },
                "bar": { "path": "Bar" }
            }
        }),
        Path::new(""),
    )
    .unwrap_or_else(|e| panic!("sample service is invalid: {e}"))
}

/// Service rooted at `root` whose layers live in `root/<name>`.
///
/// Each entry is `(layer name, has nodejs subdirectory)`; the directories are
/// created on disk.
pub fn service_with_layer_dirs(root: &Path, layers: &[(&str, bool)]) -> ServiceDefinition {
    let mut declared = serde_json::Map::new();

    for (name, with_nodejs) in layers {
        let layer_dir = root.join(name);
        let dir = if *with_nodejs {
            layer_dir.join(NODEJS_DIR)
        } else {
            layer_dir.clone()
        };
        fs::create_dir_all(&dir)
            .unwrap_or_else(|e| panic!("failed to create {}: {e}", dir.display()));
        declared.insert((*name).to_string(), json!({ "path": *name }));
    }

    ServiceDefinition::from_value(json!({ "layers": declared }), root)
        .unwrap_or_else(|e| panic!("layer service is invalid: {e}"))
}
