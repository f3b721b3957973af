//! Configuration output and error reporting.

use predicates::prelude::*;
use serde_json::json;

use crate::common::SampleProject;

#[test]
fn test_config_defaults() {
    let project = SampleProject::new(None);

    let output = project.command().arg("config").output().unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        config,
        json!({
            "installLayers": true,
            "exportLayers": true,
            "upgradeLayerReferences": true,
            "exportPrefix": "${AWS::StackName}-",
            "packager": "npm"
        })
    );
}

#[test]
fn test_config_shallow_merge() {
    let project = SampleProject::new(Some("    exportLayers: false\n    packager: yarn"));

    let output = project.command().arg("config").output().unwrap();
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(config["exportLayers"], json!(false));
    assert_eq!(config["packager"], json!("yarn"));
    assert_eq!(config["upgradeLayerReferences"], json!(true));
    assert_eq!(config["exportPrefix"], json!("${AWS::StackName}-"));
}

#[test]
fn test_invalid_config_type() {
    let project = SampleProject::new(Some("    exportLayers: sometimes"));

    project
        .command()
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_missing_service_definition() {
    let project = SampleProject::new(None);

    project
        .command()
        .args(["--service", "missing.yml", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Service definition not found"));
}

#[test]
fn test_unknown_hook() {
    let project = SampleProject::new(None);

    project
        .command()
        .args(["hook", "after:deploy:deploy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown lifecycle hook 'after:deploy:deploy'"));
}

#[test]
fn test_verbose_logs_config() {
    let project = SampleProject::new(None);

    project
        .command()
        .args(["--verbose", "install"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Config:"));
}

#[test]
fn test_log_level_none_is_silent() {
    let project = SampleProject::new(None);

    project
        .command()
        .env("LOG_LEVEL", "none")
        .arg("install")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
