//! Layer installation through the CLI.
//!
//! No real package manager is needed: `PATH` points either at an empty
//! directory or at shell-script stand-ins for npm and yarn.

use predicates::prelude::*;
use std::fs;

use crate::common::SampleProject;

#[test]
fn test_install_without_nodejs_dirs() {
    let project = SampleProject::new(None);
    fs::create_dir_all(project.path().join("Foo")).unwrap();

    project
        .command()
        .arg("install")
        .assert()
        .success()
        .stderr(predicate::str::contains("Installed 0 layers"));
}

#[test]
fn test_install_json_summary() {
    let project = SampleProject::new(None);

    let output = project.command().args(["--quiet", "install", "--json"]).output().unwrap();
    assert!(output.status.success());
    assert!(output.stderr.is_empty());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary, serde_json::json!({ "installed_layers": [] }));
}

#[test]
fn test_install_disabled_skips_layers() {
    let project = SampleProject::new(Some("    installLayers: false"));
    fs::create_dir_all(project.path().join("Foo").join("nodejs")).unwrap();
    let empty_path = tempfile::TempDir::new().unwrap();

    // Would fail to find npm if an install were attempted
    project
        .command()
        .env("PATH", empty_path.path())
        .arg("install")
        .assert()
        .success()
        .stderr(predicate::str::contains("Installed").not());
}

#[test]
fn test_install_missing_packager_fails() {
    let project = SampleProject::new(Some("    packager: yarn"));
    fs::create_dir_all(project.path().join("Foo").join("nodejs")).unwrap();
    let empty_path = tempfile::TempDir::new().unwrap();

    project
        .command()
        .env("PATH", empty_path.path())
        .args(["hook", "package:initialize"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in PATH"));
}

#[cfg(unix)]
mod with_packager {
    use super::*;
    use crate::common::{stub_log_lines, write_packager_stub};
    use serde_json::json;
    use tempfile::TempDir;

    /// Project with `Foo/nodejs` and `Bar/nodejs`, a stub directory and a log path.
    fn project_with_nodejs_layers(custom: Option<&str>) -> (SampleProject, TempDir) {
        let project = SampleProject::with_custom(custom);
        for layer in ["Foo", "Bar"] {
            fs::create_dir_all(project.path().join(layer).join("nodejs")).unwrap();
        }
        (project, TempDir::new().unwrap())
    }

    #[test]
    fn test_npm_runs_in_each_nodejs_dir() {
        let (project, bin) = project_with_nodejs_layers(Some(
            "  plugin:\n    layerManager:\n      foo:\n        unSafePermissions: true",
        ));
        write_packager_stub(bin.path(), "npm", "exit 0");
        let log = bin.path().join("calls.log");

        let output = project
            .command()
            .env("PATH", bin.path())
            .env("STUB_LOG", &log)
            .args(["install", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

        // Layers run in name order; only foo asked for --unsafe-perm
        let calls = stub_log_lines(&log);
        assert_eq!(calls.len(), 2);
        assert!(calls[0].ends_with("/Bar/nodejs install"), "{calls:?}");
        assert!(calls[1].ends_with("/Foo/nodejs install --unsafe-perm"), "{calls:?}");

        let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(summary, json!({ "installed_layers": ["bar", "foo"] }));
        assert!(String::from_utf8_lossy(&output.stderr).contains("Installed 2 layers"));
    }

    #[test]
    fn test_yarn_ignores_unsafe_permissions() {
        let (project, bin) = project_with_nodejs_layers(Some(
            "  layerConfig:\n    packager: yarn\n  plugin:\n    layerManager:\n      foo:\n        unSafePermissions: true",
        ));
        write_packager_stub(bin.path(), "yarn", "exit 0");
        let log = bin.path().join("calls.log");

        project
            .command()
            .env("PATH", bin.path())
            .env("STUB_LOG", &log)
            .args(["hook", "package:initialize"])
            .assert()
            .success();

        let calls = stub_log_lines(&log);
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|call| call.ends_with("/nodejs install")), "{calls:?}");
    }

    #[test]
    fn test_failing_install_stops_remaining_layers() {
        let (project, bin) = project_with_nodejs_layers(None);
        write_packager_stub(bin.path(), "npm", "exit 1");
        let log = bin.path().join("calls.log");

        project
            .command()
            .env("PATH", bin.path())
            .env("STUB_LOG", &log)
            .arg("install")
            .assert()
            .failure()
            .stderr(predicate::str::contains("npm install failed"))
            .stderr(predicate::str::contains("exit code: 1"))
            .stderr(predicate::str::contains("layer 'bar'"));

        // foo is never attempted after bar fails
        let calls = stub_log_lines(&log);
        assert_eq!(calls.len(), 1);
        assert!(calls[0].ends_with("/Bar/nodejs install"), "{calls:?}");
    }

    #[test]
    fn test_hung_install_times_out() {
        let (project, bin) = project_with_nodejs_layers(None);
        write_packager_stub(bin.path(), "npm", "while :; do :; done");
        let log = bin.path().join("calls.log");

        project
            .command()
            .env("PATH", bin.path())
            .env("STUB_LOG", &log)
            .args(["install", "--timeout", "1"])
            .timeout(std::time::Duration::from_secs(30))
            .assert()
            .failure()
            .stderr(predicate::str::contains("timed out after 1s"));

        assert_eq!(stub_log_lines(&log).len(), 1);
    }
}
