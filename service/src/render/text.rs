//! Plain and colored line-oriented rendering

use colored::{ColoredString, Colorize};
use status_core::prelude::*;
use std::fmt::Write;

fn detail_suffix(record: &DiffRecord) -> String {
    match record.kind {
        DiffKind::TypeMismatch | DiffKind::CardinalityMismatch => format!(
            " (source: {}, target: {})",
            record.source.as_deref().unwrap_or("-"),
            record.target.as_deref().unwrap_or("-")
        ),
        _ => String::new(),
    }
}

/// Closing line of a text report
#[must_use]
pub fn summary_line(report: &StatusReport) -> String {
    let summary = report.summary();
    if report.is_clean() {
        return format!(
            "No discrepancies across {} shared classes",
            summary.classes_compared
        );
    }
    let by_kind: Vec<String> = summary
        .by_kind
        .iter()
        .map(|kc| format!("{}: {}", kc.kind, kc.count))
        .collect();
    format!(
        "{} discrepancies across {} shared classes ({})",
        summary.total,
        summary.classes_compared,
        by_kind.join(", ")
    )
}

/// One line per record followed by a summary line
#[must_use]
pub fn render_text(report: &StatusReport) -> String {
    let mut buffer = String::new();
    for record in report.records() {
        let _ = writeln!(buffer, "{record}{}", detail_suffix(record));
    }
    let _ = writeln!(buffer, "{}", summary_line(report));
    buffer
}

fn paint(kind: DiffKind, text: &str) -> ColoredString {
    if kind.is_missing() {
        text.red()
    } else if kind.is_added() {
        text.green()
    } else {
        text.yellow()
    }
}

/// Text rendering with terminal colors
#[must_use]
pub fn render_pretty(report: &StatusReport) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{} {} → {}",
        "Schema status".bold().blue(),
        describe(report.source()),
        describe(report.target())
    );
    for record in report.records() {
        let _ = writeln!(
            buffer,
            "  {} {}{}",
            paint(record.kind, record.kind.as_str()),
            record.path.to_string().bold(),
            detail_suffix(record).dimmed()
        );
    }
    let summary = summary_line(report);
    if report.is_clean() {
        let _ = writeln!(buffer, "{}", summary.green().bold());
    } else {
        let _ = writeln!(buffer, "{}", summary.bold());
    }
    buffer
}

fn describe(identity: &SchemaIdentity) -> String {
    match &identity.version {
        Some(version) => format!("{} {} ({})", identity.name, version, identity.origin),
        None => format!("{} ({})", identity.name, identity.origin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identity(name: &str) -> SchemaIdentity {
        SchemaIdentity {
            name: name.to_string(),
            origin: SchemaOrigin::Native,
            version: None,
        }
    }

    #[test]
    fn test_text_lines() {
        let report = StatusReport::new(
            identity("a"),
            identity("b"),
            vec![
                DiffRecord::new(DiffKind::MissingField, ElementPath::member("Subject", "age")),
                DiffRecord::new(DiffKind::TypeMismatch, ElementPath::member("Subject", "id"))
                    .with_details(Some("int".into()), Some("string".into())),
            ],
            1,
        );
        assert_eq!(
            render_text(&report),
            "missing-field, Subject.age\n\
             type-mismatch, Subject.id (source: int, target: string)\n\
             2 discrepancies across 1 shared classes (missing-field: 1, type-mismatch: 1)\n"
        );
    }

    #[test]
    fn test_clean_report() {
        let report = StatusReport::new(identity("a"), identity("b"), Vec::new(), 3);
        assert_eq!(render_text(&report), "No discrepancies across 3 shared classes\n");
    }

    #[test]
    fn test_pretty_plain_when_colors_disabled() {
        colored::control::set_override(false);
        let report = StatusReport::new(identity("a"), identity("b"), Vec::new(), 0);
        let pretty = render_pretty(&report);
        assert!(pretty.starts_with("Schema status a (native) → b (native)\n"));
        colored::control::unset_override();
    }
}
