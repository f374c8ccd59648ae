//! Differences between two sets of manifest validation reports

use super::reports::ManifestReports;
use crate::validation::errs_diff_sections;

/// Markdown report of the differences between two sets of reports on the
/// same manifests
///
/// Errors are counted by schema keyword and instance location across all
/// dandisets, so a change in how many records hit the same problem shows up
/// in one category.
#[must_use]
pub fn manifests_reports_diff_markdown(
    first: &ManifestReports,
    second: &ManifestReports,
    compress: bool,
) -> String {
    let mut doc = String::from("# Manifests validation report differences\n\n");

    doc.push_str("## Dandiset metadata\n\n");
    doc.push_str(&format!(
        "Failing dandiset versions: {} → {}\n\n",
        first.dandiset_count(),
        second.dandiset_count()
    ));
    doc.push_str(&errs_diff_sections(
        &first.dandiset_errs(),
        &second.dandiset_errs(),
        compress,
        3,
    ));

    doc.push_str("\n## Asset metadata\n\n");
    doc.push_str(&format!(
        "Failing assets: {} → {}\n\n",
        first.asset_count(),
        second.asset_count()
    ));
    doc.push_str(&errs_diff_sections(
        &first.asset_errs(),
        &second.asset_errs(),
        compress,
        3,
    ));
    doc
}
