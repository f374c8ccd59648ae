//! End-to-end tests of the `dandisets-linkml-status` binary

use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dandisets-linkml-status"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should start")
}

fn compare_args(extra: &[&str]) -> Vec<String> {
    let mut args = vec![
        "compare".to_string(),
        "--source".to_string(),
        fixture("dandiset_pydantic.json").display().to_string(),
        "--target".to_string(),
        fixture("dandiset_linkml.yaml").display().to_string(),
    ];
    args.extend(extra.iter().map(ToString::to_string));
    args
}

fn run_owned(args: &[String]) -> Output {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run(&args)
}

#[test]
fn test_compare_prints_text_report() {
    let output = run_owned(&compare_args(&[]));
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "added-class, Contributor",
            "added-class, DandiBaseModel",
            "added-field, Dandiset.schemaKey",
            "added-field, Organization.email",
            "cardinality-mismatch, Organization.name (source: 1, target: 0..1)",
            "missing-permissible-value, RoleType.dcite:ContactPerson",
            "6 discrepancies across 5 shared classes (added-class: 2, added-field: 2, \
             cardinality-mismatch: 1, missing-permissible-value: 1)",
        ]
    );
}

#[test]
fn test_compare_json_output() {
    let output = run_owned(&compare_args(&["--format", "json"]));
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON report");
    assert_eq!(report["summary"]["total"], 6);
    assert_eq!(report["source"]["origin"], "pydantic");
    assert_eq!(report["records"][0]["kind"], "added-class");
}

#[test]
fn test_compare_writes_output_dir() {
    let dir = TempDir::new().expect("temp dir");
    let out = dir.path().display().to_string();
    let output = run_owned(&compare_args(&["-o", &out]));
    assert!(output.status.success());

    let status_dir = dir.path().join("linkml_status");
    for name in ["status_report.json", "status_report.yaml", "summary.md"] {
        assert!(status_dir.join(name).is_file(), "{name} should be written");
    }
    let summary = std::fs::read_to_string(status_dir.join("summary.md")).expect("summary");
    assert!(summary.starts_with("# LinkML status"));
}

#[test]
fn test_missing_schema_file_fails() {
    let output = run(&[
        "compare",
        "--source",
        "/nonexistent/dandiset.json",
        "--target",
        "/nonexistent/dandiset.yaml",
    ]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Failed to parse schema"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_diff_errs() {
    let dir = TempDir::new().expect("temp dir");
    let first = dir.path().join("errs1.json");
    let second = dir.path().join("errs2.json");
    std::fs::write(
        &first,
        r#"[{"type": "missing", "msg": "Field required", "loc": ["contributor", 0, "name"]},
            {"type": "missing", "msg": "Field required", "loc": ["contributor", 1, "name"]}]"#,
    )
    .expect("write errs1");
    std::fs::write(
        &second,
        r#"[{"type": "missing", "msg": "Field required", "loc": ["contributor", 3, "name"]}]"#,
    )
    .expect("write errs2");

    let out = dir.path().join("out");
    let output = run(&[
        "diff-errs",
        &first.display().to_string(),
        &second.display().to_string(),
        "--compress",
        "-o",
        &out.display().to_string(),
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.starts_with("# Validation error differences"));
    assert!(stdout.contains("Errors: 2 → 1"));
    assert!(stdout.contains(r"|missing \(contributor, \[\*\], name\)|1|0|"));

    let written = std::fs::read_to_string(out.join("errs_diff").join("errs_diff.md"))
        .expect("diff written");
    assert_eq!(written, stdout);
}

#[test]
fn test_diff_errs_rejects_malformed_input() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("errs.json");
    std::fs::write(&path, r#"{"not": "a list"}"#).expect("write");
    let path = path.display().to_string();

    let output = run(&["diff-errs", &path, &path]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_invalid_log_level_rejected() {
    let output = run(&["-l", "verbose", "diff-errs", "a.json", "b.json"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_failed_output_write_prints_no_report() {
    let dir = TempDir::new().expect("temp dir");
    let blocker = dir.path().join("reports");
    std::fs::write(&blocker, "not a directory").expect("write");
    let blocker = blocker.display().to_string();

    let output = run_owned(&compare_args(&["-o", &blocker]));
    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "stdout: {}", String::from_utf8_lossy(&output.stdout));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));

    let errs = dir.path().join("errs.json");
    std::fs::write(&errs, "[]").expect("write errs");
    let errs = errs.display().to_string();
    let output = run(&["diff-errs", &errs, &errs, "-o", &blocker]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

fn manifest_fixture(name: &str) -> String {
    fixture("manifests").join(name).display().to_string()
}

fn write_manifest(root: &Path, dandiset: &str, contributor: &str) {
    let dir = root.join(dandiset).join("draft");
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(
        dir.join("dandiset.jsonld"),
        format!(
            r#"{{"id": "DANDI:{dandiset}/draft", "name": "A dandiset", "contributor": [{contributor}]}}"#
        ),
    )
    .expect("write dandiset");
}

fn run_manifests(manifest_dir: &Path, out: &Path) -> Output {
    run(&[
        "-o",
        &out.display().to_string(),
        "manifests",
        &manifest_dir.display().to_string(),
        "--dandiset-schema",
        &manifest_fixture("dandiset_schema.json"),
        "--asset-schema",
        &manifest_fixture("asset_schema.json"),
    ])
}

#[test]
fn test_manifests_and_diff_manifests_reports() {
    let dir = TempDir::new().expect("temp dir");
    let manifests = dir.path().join("dandisets");
    write_manifest(&manifests, "000003", r#"{"name": "Tester, Tess"}"#);
    write_manifest(&manifests, "000027", r#"{"email": "someone@example.org"}"#);

    let before = dir.path().join("before");
    let output = run_manifests(&manifests, &before);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("1 dandiset versions and 0 assets"));

    let reports: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(before.join("manifests").join("dandiset_validation_reports.json"))
            .expect("reports written"),
    )
    .expect("JSON reports");
    assert_eq!(
        reports["000027"]["draft"]["jsonschema_validation_errs"][0]["absolute_path"],
        serde_json::json!(["contributor", 0])
    );
    assert!(before.join("manifests").join("asset_validation_reports.json").is_file());

    write_manifest(&manifests, "000027", r#"{"name": "Doe, Jane"}"#);
    let after = dir.path().join("after");
    assert!(run_manifests(&manifests, &after).status.success());

    let diff_out = dir.path().join("diff");
    let output = run(&[
        "diff-manifests-reports",
        &before.display().to_string(),
        &after.display().to_string(),
        "-o",
        &diff_out.display().to_string(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.starts_with("# Manifests validation report differences"));
    assert!(stdout.contains("Failing dandiset versions: 1 → 0"));
    assert!(stdout.contains(r"|required \(contributor, 0\)|1|0|"));

    let written = std::fs::read_to_string(diff_out.join("diff_manifests_reports").join("diff.md"))
        .expect("diff written");
    assert_eq!(written, stdout);
}

#[test]
fn test_diff_manifests_reports_needs_report_files() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().display().to_string();
    let output = run(&["diff-manifests-reports", &path, &path]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error: Failed to parse schema"));
}
