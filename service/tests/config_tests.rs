//! Configuration file tests

use linkml_status::config::{StatusConfig, load_config, substitute_env_vars};
use linkml_status::render::ReportFormat;
use pretty_assertions::assert_eq;
use status_core::StatusError;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn test_full_configuration() {
    let file = config_file(
        r"
comparison:
  compare_cardinality: false
  require_compatible_versions: false
  ignore_classes: [DandiBaseModel]
  ignore_fields: [Dandiset.schemaKey]
type_equivalence:
  use_builtin: false
  pairs:
    - [EmailStr, string]
output:
  format: markdown
  dir: reports
",
    );

    let config = StatusConfig::from_file(file.path()).expect("should load");
    assert!(!config.comparison.compare_cardinality);
    assert!(config.comparison.compare_enums);
    assert_eq!(config.output.format, ReportFormat::Markdown);
    assert_eq!(config.output.dir, Some(PathBuf::from("reports")));

    let options = config.diff_options();
    assert!(!options.require_compatible_versions);
    assert!(options.ignore_classes.contains("DandiBaseModel"));
    assert!(options.ignore_fields.contains("Dandiset.schemaKey"));
    assert!(options.equivalence.compatible("string", "EmailStr"));
    assert!(!options.equivalence.compatible("str", "string"));
}

#[test]
fn test_empty_file_gives_defaults() {
    let file = config_file("{}\n");
    let config = StatusConfig::from_file(file.path()).expect("should load");
    assert_eq!(config, StatusConfig::default());
}

#[test]
fn test_environment_substitution() {
    // SAFETY: the variable name is unique to this test
    unsafe {
        env::set_var("DANDISETS_STATUS_TEST_REPORT_DIR", "/data/status");
    }

    let file = config_file(
        "output:\n  dir: ${DANDISETS_STATUS_TEST_REPORT_DIR}\n  format: ${DANDISETS_STATUS_TEST_UNSET_FORMAT:-json}\n",
    );
    let config = StatusConfig::from_file(file.path()).expect("should load");
    assert_eq!(config.output.dir, Some(PathBuf::from("/data/status")));
    assert_eq!(config.output.format, ReportFormat::Json);

    assert_eq!(
        substitute_env_vars("a${DANDISETS_STATUS_TEST_UNSET_OTHER}b").expect("substitutes"),
        "ab"
    );
}

#[test]
fn test_unknown_keys_rejected() {
    let file = config_file("comparison:\n  compare_types: false\n");
    let err = StatusConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, StatusError::ConfigError(_)));
}

#[test]
fn test_malformed_ignore_field_rejected() {
    let file = config_file("comparison:\n  ignore_fields: [schemaKey]\n");
    let err = StatusConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Class.field"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_config::<StatusConfig>(std::path::Path::new("/nonexistent/status.yaml"))
        .unwrap_err();
    assert!(matches!(err, StatusError::IoError(_)));
}
