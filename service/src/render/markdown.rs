//! Markdown rendering of status reports

use crate::md::{escape, gen_header_and_alignment_rows, gen_row};
use status_core::prelude::*;

fn cell(value: Option<&str>) -> String {
    value.map_or_else(String::new, escape)
}

/// Markdown document with schema, summary and discrepancy tables
#[must_use]
pub fn render_markdown(report: &StatusReport) -> String {
    let mut doc = String::from("# LinkML status\n\n");

    doc.push_str(&gen_header_and_alignment_rows(["Side", "Schema", "Origin", "Version"]));
    for (side, identity) in [("source", report.source()), ("target", report.target())] {
        doc.push_str(&gen_row([
            side.to_string(),
            escape(&identity.name),
            identity.origin.to_string(),
            cell(identity.version.as_deref()),
        ]));
    }

    let summary = report.summary();
    doc.push_str("\n## Summary\n\n");
    doc.push_str(&gen_header_and_alignment_rows(["Kind", "Count"]));
    for kc in &summary.by_kind {
        doc.push_str(&gen_row([kc.kind.as_str().to_string(), kc.count.to_string()]));
    }
    doc.push_str(&gen_row(["total".to_string(), summary.total.to_string()]));
    doc.push_str(&gen_row([
        "classes compared".to_string(),
        summary.classes_compared.to_string(),
    ]));

    doc.push_str("\n## Discrepancies\n\n");
    if report.is_clean() {
        doc.push_str("None.\n");
        return doc;
    }
    doc.push_str(&gen_header_and_alignment_rows([
        "Kind", "Element", "Member", "Source", "Target",
    ]));
    for record in report.records() {
        doc.push_str(&gen_row([
            record.kind.as_str().to_string(),
            escape(&record.path.element),
            cell(record.path.member.as_deref()),
            cell(record.source.as_deref()),
            cell(record.target.as_deref()),
        ]));
    }
    doc
}
