//! Inline stages: links and emphasis.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern"));

// Emphasis never crosses a line break, and an italic opener must touch its
// text. Otherwise the markers of `* a\n* b` pair up before list items exist.
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").expect("bold pattern"));
static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\s][^*\n]*)\*").expect("italic pattern"));

/// Stage 3: `[label](url)` to an anchor.
///
/// `target` becomes the anchor's `target` attribute when present.
pub fn convert_links<'a>(text: &'a str, target: Option<&str>) -> Cow<'a, str> {
    LINK.replace_all(text, |caps: &Captures<'_>| match target {
        Some(target) => format!(
            r#"<a href="{}" target="{}">{}</a>"#,
            &caps[2], target, &caps[1]
        ),
        None => format!(r#"<a href="{}">{}</a>"#, &caps[2], &caps[1]),
    })
}

/// Stage 5: `**text**` to `<strong>`.
pub fn convert_bold(text: &str) -> Cow<'_, str> {
    BOLD.replace_all(text, "<strong>${1}</strong>")
}

/// Stage 6: `*text*` to `<em>`.
pub fn convert_italic(text: &str) -> Cow<'_, str> {
    ITALIC.replace_all(text, "<em>${1}</em>")
}
