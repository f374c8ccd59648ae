//! Loader tests reading schema files from disk

use linkml_status::compare_schema_files;
use linkml_status::diff::DiffOptions;
use linkml_status::loader::{
    LinkmlSchemaLoader, NativeSchemaLoader, SchemaFormat, SchemaLoader, load_schema_file,
};
use pretty_assertions::assert_eq;
use status_core::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[tokio::test]
async fn test_load_pydantic_fixture() {
    let model = load_schema_file(&fixture("dandiset_pydantic.json"), SchemaFormat::Pydantic)
        .await
        .expect("should load");

    assert_eq!(model.name, "Dandiset");
    assert_eq!(model.origin, SchemaOrigin::Pydantic);
    assert_eq!(model.version.as_deref(), Some("0.6.4"));

    let classes: Vec<&str> = model.classes.keys().map(String::as_str).collect();
    assert_eq!(
        classes,
        vec!["Dandiset", "AccessRequirements", "ContactPoint", "Organization", "Person"]
    );

    let contributor = model.field("Dandiset", "contributor").expect("contributor");
    assert_eq!(contributor.field_type, "Person | Organization");
    assert_eq!(contributor.cardinality.to_string(), "1..*");

    let status = model.field("AccessRequirements", "status").expect("status");
    assert_eq!(status.field_type, "AccessType");
    assert!(status.cardinality.required);

    let embargo = model
        .field("AccessRequirements", "embargoedUntil")
        .expect("embargoedUntil");
    assert_eq!(embargo.field_type, "date");
    assert_eq!(embargo.cardinality.to_string(), "0..1");

    assert_eq!(
        model.enums["RoleType"].permissible_values,
        vec!["dcite:Author", "dcite:Conceptualization", "dcite:ContactPerson"]
    );
}

#[tokio::test]
async fn test_load_linkml_fixture() {
    let model = load_schema_file(&fixture("dandiset_linkml.yaml"), SchemaFormat::Linkml)
        .await
        .expect("should load");

    assert_eq!(model.name, "dandi-schema");
    assert_eq!(model.origin, SchemaOrigin::Linkml);
    assert_eq!(model.classes.len(), 7);

    let person: Vec<&str> = model.classes["Person"]
        .fields
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(person, vec!["schemaKey", "identifier", "name", "email", "roleName"]);

    // slot_usage refines only the class that declares it
    assert!(model.field("Person", "name").expect("name").cardinality.required);
    assert!(!model.field("Organization", "name").expect("name").cardinality.required);

    // custom types resolve through `typeof` chains
    assert_eq!(
        model.field("Organization", "identifier").expect("identifier").field_type,
        "string"
    );

    let id = model.field("Dandiset", "id").expect("id");
    assert!(id.cardinality.required);

    let role = model.field("Person", "roleName").expect("roleName");
    assert_eq!(role.field_type, "RoleType");
    assert_eq!(role.cardinality.to_string(), "0..*");
}

#[tokio::test]
async fn test_missing_file_is_parse_error() {
    let err = load_schema_file(Path::new("/nonexistent/dandiset.json"), SchemaFormat::Pydantic)
        .await
        .unwrap_err();
    assert!(err.is_parse_error());
    assert!(err.to_string().contains("/nonexistent/dandiset.json"));
}

#[tokio::test]
async fn test_malformed_linkml_is_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("broken.yaml");
    tokio::fs::write(&path, "classes:\n  Person:\n    is_a: Agent\n")
        .await
        .expect("write");

    let err = LinkmlSchemaLoader::new().load_file(&path).await.unwrap_err();
    assert!(err.is_parse_error());
    assert!(err.to_string().contains("unknown class 'Agent'"));
}

#[tokio::test]
async fn test_native_model_written_and_read_back() {
    let model = SchemaModel::new("subjects", SchemaOrigin::Native)
        .with_version("1.0.0")
        .with_class(
            ClassModel::new("Subject")
                .with_field(FieldModel::new("id", "str").required())
                .with_field(FieldModel::new("species", "str").multivalued()),
        );

    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("subjects.json");
    tokio::fs::write(&path, serde_json::to_string(&model).expect("serializes"))
        .await
        .expect("write");

    let loaded = NativeSchemaLoader::new().load_file(&path).await.expect("loads");
    assert_eq!(loaded, model);
}

#[tokio::test]
async fn test_compare_schema_files() {
    let options = DiffOptions::default().with_equivalence(TypeEquivalence::pydantic_linkml());
    let report = compare_schema_files(
        (&fixture("dandiset_pydantic.json"), SchemaFormat::Pydantic),
        (&fixture("dandiset_linkml.yaml"), SchemaFormat::Linkml),
        options,
    )
    .await
    .expect("should compare");

    assert_eq!(report.summary().total, 6);
    assert_eq!(report.source().name, "Dandiset");
    assert_eq!(report.target().name, "dandi-schema");
}

#[tokio::test]
async fn test_compare_reports_unreadable_side() {
    let err = compare_schema_files(
        (&fixture("dandiset_pydantic.json"), SchemaFormat::Pydantic),
        (Path::new("/nonexistent/schema.yaml"), SchemaFormat::Linkml),
        DiffOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(err.is_parse_error());
}
