//! Manifest validation tests over a manifest tree on disk

use linkml_status::manifests::{
    ManifestReports, ManifestSchemaPaths, ManifestValidators, manifests_reports_diff_markdown,
    validate_manifests,
};
use linkml_status::output::write_manifest_reports;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("manifests")
        .join(name)
}

fn schema_paths() -> ManifestSchemaPaths {
    ManifestSchemaPaths {
        dandiset: fixture("dandiset_schema.json"),
        asset: fixture("asset_schema.json"),
        published_dandiset: Some(fixture("published_dandiset_schema.json")),
        published_asset: None,
    }
}

fn write_json(path: &Path, value: &Value) {
    std::fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
    std::fs::write(path, serde_json::to_string_pretty(value).expect("serializes")).expect("write");
}

fn dandiset(id: &str, contributor: Value) -> Value {
    json!({
        "id": format!("DANDI:{id}/draft"),
        "name": "A dandiset",
        "contributor": contributor,
        "schemaVersion": "0.6.4"
    })
}

/// Two dandisets: a clean draft with one bad asset, a published version
/// lacking its DOI, and a draft with a bad contributor
fn manifest_tree() -> TempDir {
    let tree = TempDir::new().expect("temp dir");
    let root = tree.path();

    write_json(
        &root.join("000003/draft/dandiset.jsonld"),
        &dandiset("000003", json!([{"name": "Tester, Tess"}])),
    );
    write_json(
        &root.join("000003/draft/assets.jsonld"),
        &json!([
            {"id": "a1", "path": "sub-1/sub-1.nwb", "contentSize": 10, "encodingFormat": "application/x-nwb"},
            {"id": "a2", "path": "sub-2/sub-2.nwb", "encodingFormat": "application/x-nwb"}
        ]),
    );
    write_json(
        &root.join("000003/0.230629.1955/dandiset.jsonld"),
        &dandiset("000003", json!([{"name": "Tester, Tess"}])),
    );
    write_json(
        &root.join("000027/draft/dandiset.jsonld"),
        &dandiset("000027", json!([{"email": "nope"}])),
    );
    std::fs::write(root.join("000027/draft/notes.txt"), "not metadata").expect("write");

    std::fs::create_dir_all(root.join(".git/objects")).expect("mkdir");
    std::fs::write(root.join(".git/objects/dandiset.jsonld"), "not json").expect("write");
    tree
}

async fn validators() -> ManifestValidators {
    ManifestValidators::from_files(&schema_paths())
        .await
        .expect("schemas compile")
}

#[tokio::test]
async fn test_only_failing_metadata_is_reported() {
    let tree = manifest_tree();
    let reports = validate_manifests(tree.path(), &validators().await)
        .await
        .expect("validates");

    assert_eq!(reports.dandiset_count(), 2);
    assert_eq!(
        reports.dandisets["000003"].keys().collect::<Vec<_>>(),
        vec!["0.230629.1955"]
    );

    // the published version is held to the published schema
    let published = &reports.dandisets["000003"]["0.230629.1955"];
    assert_eq!(published.jsonschema_validation_errs.len(), 1);
    assert_eq!(published.jsonschema_validation_errs[0].keyword(), "required");

    let draft_errs: BTreeSet<(String, String)> = reports.dandisets["000027"]["draft"]
        .jsonschema_validation_errs
        .iter()
        .map(|err| {
            let shaped = err.to_err();
            let loc: Vec<String> = shaped.loc.iter().map(ToString::to_string).collect();
            (shaped.err_type, loc.join("."))
        })
        .collect();
    assert_eq!(
        draft_errs,
        BTreeSet::from([
            ("format".to_string(), "contributor.0.email".to_string()),
            ("required".to_string(), "contributor.0".to_string()),
        ])
    );

    assert_eq!(reports.asset_count(), 1);
    let asset = &reports.assets["000003"]["draft"][0];
    assert_eq!(asset.asset_idx, 1);
    assert_eq!(asset.asset_id.as_deref(), Some("a2"));
    assert_eq!(asset.asset_path.as_deref(), Some("sub-2/sub-2.nwb"));
}

#[tokio::test]
async fn test_reports_round_trip_and_diff() {
    let tree = manifest_tree();
    let validators = validators().await;
    let out = TempDir::new().expect("temp dir");

    let before = validate_manifests(tree.path(), &validators).await.expect("validates");
    write_manifest_reports(&out.path().join("before"), &before)
        .await
        .expect("writes");

    // fix the contributor of 000027
    write_json(
        &tree.path().join("000027/draft/dandiset.jsonld"),
        &dandiset("000027", json!([{"name": "Doe, Jane", "email": "jane@example.org"}])),
    );
    let after = validate_manifests(tree.path(), &validators).await.expect("validates");
    write_manifest_reports(&out.path().join("after"), &after)
        .await
        .expect("writes");

    let first = ManifestReports::read(&out.path().join("before")).await.expect("reads");
    let second = ManifestReports::read(&out.path().join("after")).await.expect("reads");
    assert_eq!(first, before);

    let markdown = manifests_reports_diff_markdown(&first, &second, true);
    assert!(markdown.contains("Failing dandiset versions: 2 → 1"));
    assert!(markdown.contains(r"|format \(contributor, \[\*\], email\)|1|0|"));
    assert!(markdown.contains(r"|required \(contributor, \[\*\]\)|1|0|"));
    assert!(markdown.contains("Failing assets: 1 → 1"));
    assert!(markdown.ends_with("No differences.\n"));
}

#[tokio::test]
async fn test_malformed_assets_file_is_parse_error() {
    let tree = TempDir::new().expect("temp dir");
    write_json(
        &tree.path().join("000003/draft/assets.jsonld"),
        &json!({"path": "not a list"}),
    );

    let err = validate_manifests(tree.path(), &validators().await)
        .await
        .unwrap_err();
    assert!(err.is_parse_error());
    assert!(err.to_string().contains("000003:draft"));
}

#[tokio::test]
async fn test_missing_report_files_are_parse_errors() {
    let dir = TempDir::new().expect("temp dir");
    let err = ManifestReports::read(dir.path()).await.unwrap_err();
    assert!(err.is_parse_error());
    assert!(err.to_string().contains("validation_reports.json"));
}
