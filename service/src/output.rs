//! Writing report files to an output directory

use crate::manifests::ManifestReports;
use crate::manifests::reports::{ASSET_REPORTS_FILE, DANDISET_REPORTS_FILE, MANIFESTS_SUBDIR};
use crate::render::{render_json, render_markdown, render_yaml};
use status_core::prelude::*;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Subdirectory receiving status reports
pub const STATUS_SUBDIR: &str = "linkml_status";

/// Subdirectory receiving validation error diffs
pub const ERRS_DIFF_SUBDIR: &str = "errs_diff";

/// Subdirectory receiving manifest report diffs
pub const MANIFESTS_DIFF_SUBDIR: &str = "diff_manifests_reports";

/// Create a directory, removing any existing directory at the same path
///
/// # Errors
///
/// Returns `StatusError::Other` if a non-directory exists at `dir` and
/// `StatusError::IoError` if the filesystem operations fail.
pub async fn create_or_replace_dir(dir: &Path) -> Result<()> {
    match fs::symlink_metadata(dir).await {
        Ok(meta) if meta.is_dir() => {
            debug!("Removing existing directory {}", dir.display());
            fs::remove_dir_all(dir).await?;
        }
        Ok(_) => {
            return Err(StatusError::other(format!(
                "{} exists and is not a directory",
                dir.display()
            )));
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    fs::create_dir_all(dir).await?;
    Ok(())
}

/// Write a status report as JSON, YAML and a Markdown summary
///
/// The files go to `<output_dir>/linkml_status/`, which is replaced.
///
/// # Errors
///
/// Returns an error if the directory cannot be replaced or a file cannot be
/// rendered or written.
pub async fn write_status_reports(output_dir: &Path, report: &StatusReport) -> Result<PathBuf> {
    let dir = output_dir.join(STATUS_SUBDIR);
    create_or_replace_dir(&dir).await?;

    fs::write(dir.join("status_report.json"), render_json(report)?).await?;
    fs::write(dir.join("status_report.yaml"), render_yaml(report)?).await?;
    fs::write(dir.join("summary.md"), render_markdown(report)).await?;

    info!("Wrote status reports to {}", dir.display());
    Ok(dir)
}

/// Write a validation error diff to `<output_dir>/errs_diff/errs_diff.md`
///
/// # Errors
///
/// Returns an error if the directory cannot be replaced or the file cannot
/// be written.
pub async fn write_errs_diff(output_dir: &Path, markdown: &str) -> Result<PathBuf> {
    let dir = output_dir.join(ERRS_DIFF_SUBDIR);
    create_or_replace_dir(&dir).await?;

    let file = dir.join("errs_diff.md");
    fs::write(&file, markdown).await?;
    info!("Wrote validation error diff to {}", file.display());
    Ok(file)
}

/// Write manifest validation reports to `<output_dir>/manifests/`
///
/// The directory is replaced. Both report files are written even when
/// nothing failed validation.
///
/// # Errors
///
/// Returns an error if the directory cannot be replaced or a file cannot be
/// serialized or written.
pub async fn write_manifest_reports(output_dir: &Path, reports: &ManifestReports) -> Result<PathBuf> {
    let dir = output_dir.join(MANIFESTS_SUBDIR);
    create_or_replace_dir(&dir).await?;

    let dandisets = dir.join(DANDISET_REPORTS_FILE);
    fs::write(&dandisets, serde_json::to_string_pretty(&reports.dandisets)?).await?;
    info!("Wrote dandiset validation reports to {}", dandisets.display());

    let assets = dir.join(ASSET_REPORTS_FILE);
    fs::write(&assets, serde_json::to_string_pretty(&reports.assets)?).await?;
    info!("Wrote asset validation reports to {}", assets.display());
    Ok(dir)
}

/// Write a manifest report diff to
/// `<output_dir>/diff_manifests_reports/diff.md`
///
/// # Errors
///
/// Returns an error if the directory cannot be replaced or the file cannot
/// be written.
pub async fn write_manifests_reports_diff(output_dir: &Path, markdown: &str) -> Result<PathBuf> {
    let dir = output_dir.join(MANIFESTS_DIFF_SUBDIR);
    create_or_replace_dir(&dir).await?;

    let file = dir.join("diff.md");
    fs::write(&file, markdown).await?;
    info!("Wrote manifest report diff to {}", file.display());
    Ok(file)
}
