//! Template transformation through the CLI.

use layer_manager::test_utils::fixtures::{BAR_VERSIONED, FOO_VERSIONED};
use predicates::prelude::*;
use serde_json::json;

use crate::common::SampleProject;

#[test]
fn test_transform_default_config() {
    let project = SampleProject::new(None);

    project
        .command()
        .arg("transform")
        .assert()
        .success()
        .stderr(predicate::str::contains(format!(
            "Replacing references to FooLambdaLayer with {FOO_VERSIONED}"
        )));

    let template = project.template();
    assert_eq!(
        template["Resources"]["HelloLambdaFunction"]["Properties"]["Layers"],
        json!([{ "Ref": FOO_VERSIONED }])
    );
    assert_eq!(
        template["Outputs"]["FooLambdaLayerQualifiedArn"]["Export"],
        json!({ "Name": { "Fn::Sub": "${AWS::StackName}-FooLambdaLayerQualifiedArn" } })
    );
    assert_eq!(
        template["Outputs"]["BarLambdaLayerQualifiedArn"]["Value"],
        json!({ "Ref": BAR_VERSIONED })
    );
}

#[test]
fn test_transform_json_summary() {
    let project = SampleProject::new(None);

    let output = project.command().args(["transform", "--json"]).output().unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["exported_layers"].as_array().unwrap().len(), 2);
    assert_eq!(
        summary["upgraded_layer_references"],
        json!([{
            "function": "HelloLambdaFunction",
            "from": "FooLambdaLayer",
            "to": FOO_VERSIONED
        }])
    );
}

#[test]
fn test_transform_export_only() {
    let project = SampleProject::new(Some(
        "    exportLayers: true\n    upgradeLayerReferences: false\n    exportPrefix: shared-",
    ));

    project.command().arg("transform").assert().success();

    let template = project.template();
    assert_eq!(
        template["Resources"]["HelloLambdaFunction"]["Properties"]["Layers"],
        json!([{ "Ref": "FooLambdaLayer" }])
    );
    assert_eq!(
        template["Outputs"]["BarLambdaLayerQualifiedArn"]["Export"]["Name"]["Fn::Sub"],
        json!("shared-BarLambdaLayerQualifiedArn")
    );
}

#[test]
fn test_transform_twice_is_stable() {
    let project = SampleProject::new(None);

    project.command().arg("transform").assert().success();
    let first = project.template();

    let output = project.command().args(["transform", "--json"]).output().unwrap();
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["upgraded_layer_references"], json!([]));
    assert_eq!(project.template(), first);
}

#[test]
fn test_hook_before_deploy_with_explicit_template() {
    let project = SampleProject::new(None);
    let moved = project.path().join("compiled.json");
    std::fs::rename(project.template_path(), &moved).unwrap();

    project
        .command()
        .args(["hook", "before:deploy:deploy", "--template"])
        .arg(&moved)
        .assert()
        .success();

    let template: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&moved).unwrap()).unwrap();
    assert_eq!(
        template["Resources"]["HelloLambdaFunction"]["Properties"]["Layers"][0]["Ref"],
        json!(FOO_VERSIONED)
    );
}

#[test]
fn test_transform_missing_template() {
    let project = SampleProject::new(None);
    std::fs::remove_file(project.template_path()).unwrap();

    project
        .command()
        .arg("transform")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Compiled template not found"));
}

#[test]
fn test_transform_warns_about_undeclared_output() {
    let project = SampleProject::new(None);
    let service = std::fs::read_to_string(project.path().join("serverless.yml")).unwrap();
    std::fs::write(
        project.path().join("serverless.yml"),
        service.replace("  bar:\n    path: Bar\n", "  bar:\n    path: Bar\n  ghost:\n    path: Ghost\n"),
    )
    .unwrap();

    project
        .command()
        .arg("transform")
        .assert()
        .success()
        .stderr(predicate::str::contains("Layer 'ghost' has no compiled output"));
}
