//! Line-anchored stages: headers, lists, blockquotes, and line breaks.
//!
//! Ordered (`1.`) and unordered (`*`, `-`) markers both become a plain `<li>`
//! inside a `<ul>`. The distinction is intentionally dropped; readers of the
//! rendered replies expect the merged form.
//!
//! Line anchors accept `\r\n` endings, so a carriage return never ends up
//! inside an element; the `\r` itself stays in the text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static H3: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mR)^### (.+)$").expect("h3 pattern"));
static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mR)^## (.+)$").expect("h2 pattern"));
static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mR)^# (.+)$").expect("h1 pattern"));

static STAR_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mR)^\* (.+)$").expect("star item pattern"));
static DASH_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mR)^- (.+)$").expect("dash item pattern"));
static NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mR)^\d+\. (.+)$").expect("numbered item pattern"));

static ITEM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:<li>.+</li>\s*)+").expect("item run pattern"));

static BLOCKQUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mR)^> (.+)$").expect("blockquote pattern"));

/// Apply each pattern in turn, keeping the text borrowed while nothing matches.
fn replace_each<'a>(text: &'a str, rules: &[(&Lazy<Regex>, &str)]) -> Cow<'a, str> {
    let mut out = Cow::Borrowed(text);
    for (pattern, replacement) in rules {
        let changed = match pattern.replace_all(&out, *replacement) {
            Cow::Borrowed(_) => None,
            Cow::Owned(changed) => Some(changed),
        };
        if let Some(changed) = changed {
            out = Cow::Owned(changed);
        }
    }
    out
}

/// Stage 4: `### `, `## `, `# ` lines to `<h3>`, `<h2>`, `<h1>`.
pub fn convert_headers(text: &str) -> Cow<'_, str> {
    replace_each(
        text,
        &[
            (&H3, "<h3>${1}</h3>"),
            (&H2, "<h2>${1}</h2>"),
            (&H1, "<h1>${1}</h1>"),
        ],
    )
}

/// Stage 7: bullet and numbered lines to `<li>`.
pub fn convert_list_items(text: &str) -> Cow<'_, str> {
    replace_each(
        text,
        &[
            (&STAR_ITEM, "<li>${1}</li>"),
            (&DASH_ITEM, "<li>${1}</li>"),
            (&NUMBERED_ITEM, "<li>${1}</li>"),
        ],
    )
}

/// Stage 8: wrap each run of adjacent `<li>` elements in one `<ul>`.
///
/// Whitespace between items, blank lines included, stays inside the run.
pub fn group_list_items(text: &str) -> Cow<'_, str> {
    ITEM_RUN.replace_all(text, "<ul>${0}</ul>")
}

/// Stage 10: `> ` lines to `<blockquote>`.
pub fn convert_blockquotes(text: &str) -> Cow<'_, str> {
    BLOCKQUOTE.replace_all(text, "<blockquote>${1}</blockquote>")
}

/// Stage 11: every newline to `<br>`.
pub fn convert_line_breaks(text: &str) -> Cow<'_, str> {
    if text.contains('\n') {
        Cow::Owned(text.replace('\n', "<br>"))
    } else {
        Cow::Borrowed(text)
    }
}
