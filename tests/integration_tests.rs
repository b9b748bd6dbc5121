//! Integration tests for the xsdr CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get an xsdr command isolated from user configuration
fn xsdr(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("xsdr").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join(".config"))
        .env_remove("XSDR_CLASSPATH")
        .env_remove("XSDR_ROOTS")
        .env_remove("XSDR_LOG");
    cmd
}

/// Helper to create a classpath directory holding `common.xsd` at its root
fn setup_classpath(tmp: &TempDir) -> std::path::PathBuf {
    let dir = tmp.path().join("schemas");
    fs::create_dir_all(dir.join("order")).unwrap();
    fs::write(
        dir.join("common.xsd"),
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:local:common"/>"#,
    )
    .unwrap();
    fs::write(
        dir.join("order/order.xsd"),
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:local:order">
  <xs:import namespace="urn:local:common" schemaLocation="../common.xsd"/>
</xs:schema>"#,
    )
    .unwrap();
    dir
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    xsdr(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("collect"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    xsdr(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xsdr"));
}

// ============================================================================
// Resolve Tests
// ============================================================================

#[test]
fn test_resolve_bundled_schema_directly() {
    let tmp = TempDir::new().unwrap();
    xsdr(&tmp)
        .args(["resolve", "xsd/common.xsd", "-q"])
        .assert()
        .success()
        .stdout("classpath:/xsd/common.xsd\n");
}

#[test]
fn test_resolve_escaping_location_via_classpath_prefix() {
    let tmp = TempDir::new().unwrap();
    let classpath = setup_classpath(&tmp);
    xsdr(&tmp)
        .args(["resolve", "../common.xsd", "--explain", "-f", "tsv", "--classpath"])
        .arg(&classpath)
        .assert()
        .success()
        .stdout(predicate::str::contains("direct\tmissing"))
        .stdout(predicate::str::contains("base-relative\tskipped"))
        .stdout(predicate::str::contains("classpath-prefixed\tfound"));
}

#[test]
fn test_resolve_relative_to_base() {
    let tmp = TempDir::new().unwrap();
    xsdr(&tmp)
        .args([
            "resolve",
            "../common.xsd",
            "--base",
            "classpath:/xsd/order/order-webservice.xsd",
            "--print",
            "-q",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("classpath:/xsd/common.xsd"))
        .stdout(predicate::str::contains("OrderData"));
}

#[test]
fn test_resolve_json_output() {
    let tmp = TempDir::new().unwrap();
    let output = xsdr(&tmp)
        .args(["resolve", "xsd/common.xsd", "--explain", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["system_id"], "classpath:/xsd/common.xsd");
    assert_eq!(value["trace"][0]["strategy"], "direct");
}

#[test]
fn test_resolve_unknown_location_fails() {
    let tmp = TempDir::new().unwrap();
    xsdr(&tmp)
        .args(["resolve", "nowhere.xsd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere.xsd"));
}

// ============================================================================
// Collect Tests
// ============================================================================

#[test]
fn test_collect_default_roots() {
    let tmp = TempDir::new().unwrap();
    xsdr(&tmp)
        .args(["collect", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("classpath:/xsd/order/order-webservice.xsd"))
        .stdout(predicate::str::contains("classpath:/xsd/common.xsd"));
}

#[test]
fn test_collect_no_inline() {
    let tmp = TempDir::new().unwrap();
    xsdr(&tmp)
        .args(["collect", "--no-inline", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("order-webservice.xsd"))
        .stdout(predicate::str::contains("classpath:/xsd/common.xsd").not());
}

#[test]
fn test_collect_from_classpath_directory_json() {
    let tmp = TempDir::new().unwrap();
    let classpath = setup_classpath(&tmp);
    let output = xsdr(&tmp)
        .args(["collect", "order/order.xsd", "-f", "json", "--classpath"])
        .arg(&classpath)
        .output()
        .unwrap();
    assert!(output.status.success());

    let docs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let docs = docs.as_array().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["target_namespace"], "urn:local:order");
    assert_eq!(docs[1]["target_namespace"], "urn:local:common");
    assert_eq!(docs[0]["references"][0]["kind"], "import");
}

#[test]
fn test_collect_uses_project_config() {
    let tmp = TempDir::new().unwrap();
    setup_classpath(&tmp);
    fs::create_dir_all(tmp.path().join(".xsdr")).unwrap();
    fs::write(
        tmp.path().join(".xsdr/config.yaml"),
        "classpath:\n  - schemas\nroots:\n  - order/order.xsd\n",
    )
    .unwrap();

    xsdr(&tmp)
        .args(["collect", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("urn:local:order"))
        .stdout(predicate::str::contains("urn:local:common"));
}

#[test]
fn test_collect_missing_root_fails() {
    let tmp = TempDir::new().unwrap();
    xsdr(&tmp)
        .args(["collect", "xsd/missing.xsd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xsd/missing.xsd"));
}

// ============================================================================
// Normalize / List / Config Tests
// ============================================================================

#[test]
fn test_normalize() {
    let tmp = TempDir::new().unwrap();
    xsdr(&tmp)
        .args(["normalize", "/my/sample/./path", "/my/sample/../path", "/../my/path", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/my/sample/./path\t/my/sample/path\t/my/sample/path"))
        .stdout(predicate::str::contains("/my/sample/../path\t/my/path\t/my/path"))
        .stdout(predicate::str::contains("/../my/path\t<invalid>\t/my/path"));
}

#[test]
fn test_list_shows_bundled_and_directory_resources() {
    let tmp = TempDir::new().unwrap();
    let classpath = setup_classpath(&tmp);
    xsdr(&tmp)
        .args(["list", "-f", "tsv", "--classpath"])
        .arg(&classpath)
        .assert()
        .success()
        .stdout(predicate::str::contains("xsd/order/order-webservice.xsd\t<bundled>"))
        .stdout(predicate::str::contains("order/order.xsd"));
}

#[test]
fn test_config_show_json() {
    let tmp = TempDir::new().unwrap();
    let output = xsdr(&tmp).args(["config", "show", "-f", "json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["inline"], true);
    assert_eq!(value["roots"][0], "xsd/order/order-webservice.xsd");
    assert_eq!(value["classpath"][0], "<bundled>");
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    xsdr(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("xsdr"));
}
