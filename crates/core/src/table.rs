//! Pipe table stage.
//!
//! A table is a header row, a separator row of dashes and colons, then at
//! least one data row. Anything short of that stays literal text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

static TABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\|(.+)\|\s*\n\|\s*[-:|\s]+\|\s*\n((?:\|.+\|\s*(?:\n|\z))+)")
        .expect("table pattern")
});

/// Stage 9: convert every table block into a `<table>` element.
pub fn convert_tables(text: &str) -> Cow<'_, str> {
    TABLE.replace_all(text, |caps: &Captures<'_>| table_to_html(&caps[0]))
}

/// Build the HTML for one matched table block.
///
/// The first non-blank row is the header, the second is the separator and is
/// dropped, every later row is data.
fn table_to_html(block: &str) -> String {
    let rows: Vec<&str> = block
        .split('\n')
        .filter(|row| !row.trim().is_empty())
        .collect();

    let mut html = String::from("<table><thead><tr>");
    if let Some(header) = rows.first() {
        for cell in split_cells(header) {
            html.push_str("<th>");
            html.push_str(cell);
            html.push_str("</th>");
        }
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows.iter().skip(2) {
        html.push_str("<tr>");
        for cell in split_cells(row) {
            html.push_str("<td>");
            html.push_str(cell);
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// Split a row on `|`, trimming cells and dropping the empty edge cells that
/// boundary pipes produce. Empty cells in the middle are kept.
fn split_cells(row: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = row.trim().split('|').map(str::trim).collect();
    if cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    if cells.first().is_some_and(|cell| cell.is_empty()) {
        cells.remove(0);
    }
    cells
}
