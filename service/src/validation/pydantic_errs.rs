//! Pydantic validation errors and their Markdown reports
//!
//! Errors are read in the shape Pydantic's `ValidationError.json()` emits:
//! objects with `type`, `msg` and `loc` plus extra keys that are ignored.

use super::err_counter::{CategoryDiff, ErrCounter, ValidationErrCounter, validation_err_diff};
use crate::md::{escape, gen_header_and_alignment_rows, gen_row};
use serde::{Deserialize, Serialize};
use status_core::prelude::*;
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder replacing list indices in compressed locations
pub const INDEX_WILDCARD: &str = "[*]";

/// One Pydantic validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PydanticValidationErr {
    /// Error type, such as `missing` or `string_type`
    #[serde(rename = "type")]
    pub err_type: String,
    /// Human readable message
    pub msg: String,
    /// Location of the offending value
    pub loc: Vec<LocItem>,
}

/// Item of an error location: a field name or a list index
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocItem {
    /// List index
    Index(i64),
    /// Field name or dictionary key
    Key(String),
}

impl fmt::Display for LocItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(key) => f.write_str(key),
        }
    }
}

/// Location of an error
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Loc(pub Vec<LocItem>);

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "({})", items.join(", "))
    }
}

/// Distinct representation of an error used for counting
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PydanticErrRep {
    /// Error type
    pub err_type: String,
    /// Message
    pub msg: String,
    /// Location, possibly compressed
    pub loc: Loc,
}

/// Category of an error: its type and location
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrCategory {
    /// Error type
    pub err_type: String,
    /// Location, possibly compressed
    pub loc: Loc,
}

impl fmt::Display for ErrCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.err_type, self.loc)
    }
}

/// Categorize an error by its type and location
#[must_use]
pub fn type_and_loc(rep: &PydanticErrRep) -> ErrCategory {
    ErrCategory {
        err_type: rep.err_type.clone(),
        loc: rep.loc.clone(),
    }
}

/// Parse a JSON array of Pydantic validation errors
///
/// # Errors
///
/// Returns `StatusError::ParseError` if the content is not such an array.
pub fn parse_pydantic_errs(content: &str, location: &str) -> Result<Vec<PydanticValidationErr>> {
    serde_json::from_str(content).map_err(|err| {
        StatusError::parse_at(format!("invalid validation error list: {err}"), location)
    })
}

/// Count errors by type, message and location
///
/// With `compress`, list indices in locations are replaced by `[*]` so
/// errors at different positions of the same list count together.
#[must_use]
pub fn count_pydantic_validation_errs(
    errs: &[PydanticValidationErr],
    compress: bool,
) -> ErrCounter<PydanticErrRep> {
    errs.iter()
        .map(|err| {
            let loc = err
                .loc
                .iter()
                .map(|item| match item {
                    LocItem::Index(_) if compress => LocItem::Key(INDEX_WILDCARD.to_string()),
                    other => other.clone(),
                })
                .collect();
            PydanticErrRep {
                err_type: err.err_type.clone(),
                msg: err.msg.clone(),
                loc: Loc(loc),
            }
        })
        .collect()
}

/// Count errors into `(type, loc)` categories
#[must_use]
pub fn categorized(
    errs: &[PydanticValidationErr],
    compress: bool,
) -> ValidationErrCounter<PydanticErrRep, ErrCategory> {
    let mut counter = ValidationErrCounter::new(type_and_loc);
    counter.count_counter(&count_pydantic_validation_errs(errs, compress));
    counter
}

/// Table of error counts per category
pub fn validation_err_count_table<C: fmt::Display>(counts: &BTreeMap<C, usize>) -> String {
    let mut table = gen_header_and_alignment_rows(["Error category", "Count"]);
    for (cat, count) in counts {
        table.push_str(&gen_row([escape(&cat.to_string()), count.to_string()]));
    }
    table
}

/// Table of removed and gained error counts per category
pub fn validation_err_diff_table<C: fmt::Display, E: Ord + Clone>(
    diff: &BTreeMap<C, CategoryDiff<E>>,
) -> String {
    let mut table = gen_header_and_alignment_rows(["Error category", "Removed", "Gained"]);
    for (cat, cat_diff) in diff {
        table.push_str(&gen_row([
            escape(&cat.to_string()),
            cat_diff.removed.total().to_string(),
            cat_diff.gained.total().to_string(),
        ]));
    }
    table
}

fn detailed_table(
    cat: &ErrCategory,
    errs: &ErrCounter<PydanticErrRep>,
    removed: bool,
    depth: usize,
) -> String {
    let count_header = if removed { "Removed" } else { "Gained" };
    let mut table = format!("{} {}\n\n", "#".repeat(depth + 1), escape(&cat.to_string()));
    table.push_str(&gen_header_and_alignment_rows([
        "type",
        "msg",
        "loc",
        count_header,
    ]));
    for (rep, count) in errs.iter() {
        table.push_str(&gen_row([
            escape(&rep.err_type),
            escape(&rep.msg),
            escape(&rep.loc.to_string()),
            count.to_string(),
        ]));
    }
    table
}

fn detailed_tables(
    diff: &BTreeMap<ErrCategory, CategoryDiff<PydanticErrRep>>,
    depth: usize,
) -> String {
    let mut tables = Vec::new();
    for (cat, cat_diff) in diff {
        if !cat_diff.removed.is_empty() {
            tables.push(detailed_table(cat, &cat_diff.removed, true, depth));
        }
        if !cat_diff.gained.is_empty() {
            tables.push(detailed_table(cat, &cat_diff.gained, false, depth));
        }
    }
    tables.join("\n")
}

/// Tables listing the removed and gained errors of each category
#[must_use]
pub fn validation_err_diff_detailed_tables(
    diff: &BTreeMap<ErrCategory, CategoryDiff<PydanticErrRep>>,
) -> String {
    detailed_tables(diff, 2)
}

/// Error totals, a summary table and detailed tables of two error sets
///
/// Section headings are written at `depth`, detail headings one level below.
#[must_use]
pub fn errs_diff_sections(
    errs1: &[PydanticValidationErr],
    errs2: &[PydanticValidationErr],
    compress: bool,
    depth: usize,
) -> String {
    let first = categorized(errs1, compress);
    let second = categorized(errs2, compress);
    let diff = validation_err_diff(&first, &second);
    let heading = "#".repeat(depth);

    let mut doc = format!(
        "Errors: {} → {}\n\n",
        first.counts_by_cat().values().sum::<usize>(),
        second.counts_by_cat().values().sum::<usize>()
    );
    if diff.is_empty() {
        doc.push_str("No differences.\n");
        return doc;
    }
    doc.push_str(&format!("{heading} Summary\n\n"));
    doc.push_str(&validation_err_diff_table(&diff));
    doc.push_str(&format!("\n{heading} Details\n\n"));
    doc.push_str(&detailed_tables(&diff, depth));
    doc
}

/// Markdown report of the differences between two error sets
#[must_use]
pub fn errs_diff_markdown(
    errs1: &[PydanticValidationErr],
    errs2: &[PydanticValidationErr],
    compress: bool,
) -> String {
    let mut doc = String::from("# Validation error differences\n\n");
    doc.push_str(&errs_diff_sections(errs1, errs2, compress, 2));
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn errs(json: &str) -> Vec<PydanticValidationErr> {
        parse_pydantic_errs(json, "errs.json").expect("parses")
    }

    #[test]
    fn test_loc_items_keep_kind() {
        let parsed = errs(r#"[{"type": "missing", "msg": "Field required", "loc": ["contributor", 0, "name"], "url": "x"}]"#);
        assert_eq!(
            parsed[0].loc,
            vec![
                LocItem::Key("contributor".into()),
                LocItem::Index(0),
                LocItem::Key("name".into())
            ]
        );
        assert_eq!(Loc(parsed[0].loc.clone()).to_string(), "(contributor, 0, name)");
    }

    #[test]
    fn test_count_table() {
        let mut counts = BTreeMap::new();
        counts.insert("missing (a)", 2);
        assert_eq!(
            validation_err_count_table(&counts),
            "| Error category | Count |\n|----------------|-------|\n|missing \\(a\\)|2|\n"
        );
    }

    #[test]
    fn test_diff_markdown_without_changes() {
        let set = errs(r#"[{"type": "missing", "msg": "Field required", "loc": ["id"]}]"#);
        let doc = errs_diff_markdown(&set, &set, false);
        assert!(doc.contains("No differences."));
    }
}
