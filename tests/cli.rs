use assert_cmd::Command;
use predicates::str::contains;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SAMPLE_SCHEMA: &str = r#"
foo:
  constraints:
    not_null:
      - id
      - email
      - favorite_color
    unique:
      - id
      - email
    accepted_values:
      - { field: favorite_color, values: ['blue', 'green'] }
      - { field: likes_puppies, values: ['yes'] }

bar:
  constraints:
    not_null:
      - id
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn with_schema(contents: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        fs::write(dir.path().join("schema.yml"), contents).expect("write schema");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("dbt-schema-upgrade").unwrap();
        cmd.arg("--logfile-path").arg(self.path("convert.log"));
        cmd
    }
}

fn load(path: &Path) -> Value {
    serde_yaml::from_str(&fs::read_to_string(path).expect("read output")).expect("valid yaml")
}

#[test]
fn converts_sample_schema_to_dot_new() {
    let ws = Workspace::with_schema(SAMPLE_SCHEMA);

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .assert()
        .success()
        .stdout(contains("Conversion Complete"))
        .stdout(contains("Models Converted: 2"));

    let output = load(&ws.path("schema.yml.new"));
    assert_eq!(output["version"].as_i64(), Some(2));

    let foo = &output["models"][0];
    assert_eq!(foo["name"].as_str(), Some("foo"));
    let columns: Vec<_> = foo["columns"]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(columns, vec!["email", "favorite_color", "id", "likes_puppies"]);
    assert_eq!(
        foo["columns"][1]["tests"][0]["accepted_values"]["values"][0].as_str(),
        Some("blue")
    );
    assert_eq!(foo["columns"][1]["tests"][1].as_str(), Some("not_null"));

    // the input is left alone
    assert_eq!(fs::read_to_string(ws.path("schema.yml")).unwrap(), SAMPLE_SCHEMA);
}

#[test]
fn logs_success_to_logfile() {
    let ws = Workspace::with_schema(SAMPLE_SCHEMA);

    ws.cmd().arg(ws.path("schema.yml")).assert().success();

    let log = fs::read_to_string(ws.path("convert.log")).unwrap();
    assert!(log.contains("successfully converted existing"));
}

#[test]
fn unknown_test_kind_fails_without_output() {
    let ws = Workspace::with_schema("foo:\n  constraints:\n    foo_bar_test: [id]\n");

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .assert()
        .code(1)
        .stderr(contains("foo_bar_test"));

    assert!(!ws.path("schema.yml.new").exists());
}

#[test]
fn missing_field_names_model_and_kind() {
    let ws = Workspace::with_schema(
        "foo:\n  constraints:\n    accepted_values:\n      - {values: [1]}\n",
    );

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .assert()
        .code(1)
        .stderr(contains("accepted_values"))
        .stderr(contains("model foo"));
}

#[test]
fn version_two_input_is_skipped() {
    let ws = Workspace::with_schema("version: 2\nmodels: []\n");

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .assert()
        .code(3)
        .stderr(contains("not a version 1 schema"));

    assert!(!ws.path("schema.yml.new").exists());
}

#[test]
fn missing_input_fails() {
    let ws = Workspace::with_schema(SAMPLE_SCHEMA);

    ws.cmd()
        .arg(ws.path("nope.yml"))
        .assert()
        .code(1)
        .stderr(contains("does not exist"));
}

#[test]
fn existing_output_requires_overwrite() {
    let ws = Workspace::with_schema(SAMPLE_SCHEMA);
    fs::write(ws.path("schema.yml.new"), "old").unwrap();

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .assert()
        .code(1)
        .stderr(contains("--overwrite was not passed"));
    assert_eq!(fs::read_to_string(ws.path("schema.yml.new")).unwrap(), "old");

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .arg("--overwrite")
        .assert()
        .success();
    assert_eq!(load(&ws.path("schema.yml.new"))["version"].as_i64(), Some(2));
}

#[test]
fn in_place_rewrites_input_and_keeps_backup() {
    let ws = Workspace::with_schema(SAMPLE_SCHEMA);

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .arg("--in-place")
        .assert()
        .success()
        .stdout(contains("Backup:"));

    assert_eq!(fs::read_to_string(ws.path("schema.yml.bak")).unwrap(), SAMPLE_SCHEMA);
    assert_eq!(load(&ws.path("schema.yml"))["version"].as_i64(), Some(2));
    assert!(!ws.path("schema.yml.new").exists());
}

#[test]
fn explicit_output_and_json_report() {
    let ws = Workspace::with_schema(SAMPLE_SCHEMA);

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .arg("--output-path")
        .arg(ws.path("v2.yml"))
        .args(["--report-format", "json"])
        .assert()
        .success()
        .stdout(contains("\"models_converted\": 2"));

    assert!(ws.path("v2.yml").exists());
}

#[test]
fn in_place_conflicts_with_output_path() {
    let ws = Workspace::with_schema(SAMPLE_SCHEMA);

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .arg("--in-place")
        .arg("--output-path")
        .arg(ws.path("v2.yml"))
        .assert()
        .failure();
}

#[test]
fn in_place_conflicts_with_backup_path() {
    let ws = Workspace::with_schema(SAMPLE_SCHEMA);

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .arg("--in-place")
        .arg("--backup-path")
        .arg(ws.path("elsewhere.yml"))
        .assert()
        .code(2);

    assert_eq!(fs::read_to_string(ws.path("schema.yml")).unwrap(), SAMPLE_SCHEMA);
    assert!(!ws.path("elsewhere.yml").exists());
}

#[test]
fn repeated_constraint_kind_is_converted() {
    let ws = Workspace::with_schema(
        "foo:\n  constraints:\n    unique: [id]\n    not_null: [id]\n    unique: [email]\n",
    );

    ws.cmd().arg(ws.path("schema.yml")).assert().success();

    let output = load(&ws.path("schema.yml.new"));
    let columns = &output["models"][0]["columns"];
    assert_eq!(columns[0]["name"].as_str(), Some("email"));
    assert_eq!(columns[0]["tests"][0].as_str(), Some("unique"));
    assert_eq!(columns[1]["name"].as_str(), Some("id"));
    assert_eq!(columns[1]["tests"][0].as_str(), Some("not_null"));
    assert_eq!(columns[1]["tests"][1].as_str(), Some("unique"));
}

#[test]
fn non_string_model_without_constraints_is_skipped() {
    let ws = Workspace::with_schema("2019:\n  description: legacy\nbar:\n  constraints:\n    unique: [id]\n");

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .assert()
        .success()
        .stdout(contains("Models Converted: 1"));

    let output = load(&ws.path("schema.yml.new"));
    assert_eq!(output["models"][0]["name"].as_str(), Some("bar"));
}

#[test]
fn huge_version_is_skipped() {
    let ws = Workspace::with_schema("version: 18446744073709551615\nfoo:\n  constraints:\n    unique: [id]\n");

    ws.cmd()
        .arg(ws.path("schema.yml"))
        .assert()
        .code(3)
        .stderr(contains("18446744073709551615"));

    assert!(!ws.path("schema.yml.new").exists());
}
