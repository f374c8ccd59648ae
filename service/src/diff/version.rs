//! Version compatibility between compared schemas

use semver::Version;
use status_core::prelude::*;

/// Parse a declared schema version
///
/// A leading `v` is accepted and missing minor or patch components are
/// taken as zero, so `0.6` reads as `0.6.0`.
///
/// # Errors
///
/// Returns `StatusError::ParseError` if the text is not a version.
pub fn parse_version(text: &str) -> Result<Version> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let core_len = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let padding = match trimmed[..core_len].matches('.').count() {
        0 => ".0.0",
        1 => ".0",
        _ => "",
    };
    let padded = format!("{}{padding}{}", &trimmed[..core_len], &trimmed[core_len..]);
    Version::parse(&padded)
        .map_err(|err| StatusError::parse(format!("invalid schema version '{text}': {err}")))
}

/// Whether two versions describe compatible schemas
///
/// Compatible versions share the major component, and the minor component
/// too while the major is `0`.
#[must_use]
pub fn versions_compatible(a: &Version, b: &Version) -> bool {
    a.major == b.major && (a.major != 0 || a.minor == b.minor)
}

/// Check the declared versions of two schemas
///
/// A schema that declares no version is compatible with anything.
///
/// # Errors
///
/// Returns `StatusError::ParseError` for an unparseable version and
/// `StatusError::ComparisonError` for incompatible versions.
pub fn check_versions(source: Option<&str>, target: Option<&str>) -> Result<()> {
    let (Some(source), Some(target)) = (source, target) else {
        return Ok(());
    };
    let source_version = parse_version(source)?;
    let target_version = parse_version(target)?;
    if versions_compatible(&source_version, &target_version) {
        Ok(())
    } else {
        Err(StatusError::incompatible_versions(source, target))
    }
}
