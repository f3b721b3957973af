//! Shared helpers for the integration suite.

use assert_cmd::Command;
use layer_manager::template::DEFAULT_TEMPLATE_PATH;
use layer_manager::test_utils::fixtures::sample_template_value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Service definition for the foo/bar/hello sample, with an optional `custom`
/// YAML body (already indented by two spaces).
pub fn sample_service_yaml(custom: Option<&str>) -> String {
    let mut yaml = String::from(
        r#"service: sample
provider:
  name: aws
  runtime: nodejs18.x
functions:
  hello:
    handler: handler.hello
    layers:
      - Ref: FooLambdaLayer
layers:
  foo:
    path: Foo
  bar:
    path: Bar
"#,
    );

    if let Some(custom) = custom {
        yaml.push_str("custom:\n");
        yaml.push_str(custom);
        yaml.push('\n');
    }
    yaml
}

/// A service directory containing `serverless.yml` and the compiled sample template.
pub struct SampleProject {
    pub dir: TempDir,
}

impl SampleProject {
    /// Project with an optional `custom.layerConfig` body (indented by four spaces).
    pub fn new(layer_config: Option<&str>) -> Self {
        let custom = layer_config.map(|config| format!("  layerConfig:\n{config}"));
        Self::with_custom(custom.as_deref())
    }

    /// Project with an arbitrary `custom` section body.
    pub fn with_custom(custom: Option<&str>) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("serverless.yml"), sample_service_yaml(custom)).unwrap();

        let template = dir.path().join(DEFAULT_TEMPLATE_PATH);
        fs::create_dir_all(template.parent().unwrap()).unwrap();
        fs::write(&template, serde_json::to_string_pretty(&sample_template_value()).unwrap())
            .unwrap();

        Self {
            dir,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn template_path(&self) -> PathBuf {
        self.path().join(DEFAULT_TEMPLATE_PATH)
    }

    pub fn template(&self) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(self.template_path()).unwrap()).unwrap()
    }

    /// The binary, run from the project directory with a clean log environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("layer-manager").unwrap();
        cmd.current_dir(self.path()).env_remove("RUST_LOG").env_remove("LOG_LEVEL");
        cmd
    }
}

/// Write an executable package manager stand-in named `name` into `dir`.
///
/// Each run appends `<working dir> <args>` to the file named by `STUB_LOG`,
/// then runs `body` (e.g. `exit 1`). Only shell builtins are used, so `PATH`
/// can point at `dir` alone.
#[cfg(unix)]
pub fn write_packager_stub(dir: &Path, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\necho \"$(pwd) $*\" >> \"$STUB_LOG\"\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Lines recorded by [`write_packager_stub`] runs.
#[cfg(unix)]
pub fn stub_log_lines(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .map(|content| content.lines().map(str::to_owned).collect())
        .unwrap_or_default()
}
