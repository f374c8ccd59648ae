//! Helpers for writing Markdown documents

use std::fmt::Display;

/// Characters escaped with a backslash
const BACKSLASH_ESCAPED: &str = r"\`*_{}[]()#+-.!";

/// Escape text for use inside Markdown
///
/// Markdown punctuation is escaped with a backslash. `<`, `>` and `|` are
/// written as HTML entities so the text can sit inside a table cell.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '|' => escaped.push_str("&#124;"),
            c if BACKSLASH_ESCAPED.contains(c) => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }
    escaped
}

/// One row of a Markdown table, terminated by a newline
pub fn gen_row<I>(cells: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut row = String::from("|");
    for cell in cells {
        row.push_str(&cell.to_string());
        row.push('|');
    }
    row.push('\n');
    row
}

/// Header row followed by the alignment row of a Markdown table
pub fn gen_header_and_alignment_rows<I>(headers: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let headers: Vec<I::Item> = headers.into_iter().collect();
    let header_row = gen_row(headers.iter().map(|h| format!(" {} ", h.as_ref())));
    let alignment_row = gen_row(
        headers
            .iter()
            .map(|h| "-".repeat(h.as_ref().chars().count() + 2)),
    );
    header_row + &alignment_row
}
