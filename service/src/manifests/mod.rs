//! Dandiset manifest validation and report comparison

pub mod diff;
pub mod reports;
pub mod validate;

pub use diff::manifests_reports_diff_markdown;
pub use reports::{
    AssetValidationReport, AssetValidationReports, DandisetValidationReport,
    DandisetValidationReports, JsonschemaValidationErr, ManifestReports,
};
pub use validate::{ManifestSchemaPaths, ManifestValidators, err_lst, validate_manifests};
