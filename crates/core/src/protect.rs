//! Code span protection.
//!
//! Fenced and inline code are carved out of the text before any other stage
//! runs and replaced by placeholder tokens. The tokens are built from a
//! sentinel that does not occur in the source, so no later stage can match
//! them and no source text can forge them. [`ProtectedSpans::restore`]
//! swaps them back as the final substitution.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::HashSet;

/// Fenced code: triple backticks, shortest body, may span lines.
pub(crate) static FENCED_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```([\s\S]+?)```").expect("fenced code pattern"));

/// Inline code: single backticks around a backtick-free body.
pub(crate) static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("inline code pattern"));

/// Which pattern produced a protected span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Fenced code block.
    Block,
    /// Inline code span.
    Inline,
}

impl SpanKind {
    fn tag(self) -> char {
        match self {
            SpanKind::Block => 'B',
            SpanKind::Inline => 'I',
        }
    }
}

/// A span lifted out of the text, kept verbatim including its delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedSpan {
    /// Pattern that matched the span.
    pub kind: SpanKind,
    /// Original literal text, delimiters included.
    pub literal: String,
}

impl ProtectedSpan {
    /// Delimiter-stripped content.
    ///
    /// Block content is trimmed; inline content is kept as written.
    pub fn content(&self) -> &str {
        match self.kind {
            SpanKind::Block => strip_delimiters(&self.literal, "```").trim(),
            SpanKind::Inline => strip_delimiters(&self.literal, "`"),
        }
    }

    /// HTML element the span is restored as.
    pub fn to_html(&self) -> String {
        match self.kind {
            SpanKind::Block => format!("<pre><code>{}</code></pre>", self.content()),
            SpanKind::Inline => format!("<code>{}</code>", self.content()),
        }
    }
}

fn strip_delimiters<'a>(literal: &'a str, delimiter: &str) -> &'a str {
    literal
        .strip_prefix(delimiter)
        .and_then(|rest| rest.strip_suffix(delimiter))
        .unwrap_or(literal)
}

/// Per-render bookkeeping of protected spans, one sequence per kind.
#[derive(Debug, Clone)]
pub struct ProtectedSpans {
    sentinel: String,
    blocks: Vec<ProtectedSpan>,
    inline: Vec<ProtectedSpan>,
}

impl ProtectedSpans {
    /// Start empty sequences for one render of `source`.
    pub fn for_source(source: &str) -> Self {
        Self {
            sentinel: pick_sentinel(source),
            blocks: Vec::new(),
            inline: Vec::new(),
        }
    }

    /// Record a span and return the placeholder that stands in for it.
    pub fn protect(&mut self, kind: SpanKind, literal: &str) -> String {
        let spans = match kind {
            SpanKind::Block => &mut self.blocks,
            SpanKind::Inline => &mut self.inline,
        };
        spans.push(ProtectedSpan {
            kind,
            literal: literal.to_string(),
        });
        let index = spans.len() - 1;
        self.placeholder(kind, index)
    }

    /// Placeholder token for the span at `index` of the given kind.
    pub fn placeholder(&self, kind: SpanKind, index: usize) -> String {
        format!("{0}{1}{2}{0}", self.sentinel, kind.tag(), index)
    }

    /// Spans of one kind, in order of appearance.
    pub fn spans(&self, kind: SpanKind) -> &[ProtectedSpan] {
        match kind {
            SpanKind::Block => &self.blocks,
            SpanKind::Inline => &self.inline,
        }
    }

    /// Total number of protected spans.
    pub fn len(&self) -> usize {
        self.blocks.len() + self.inline.len()
    }

    /// Whether nothing was protected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace every placeholder with its span's HTML in a single pass.
    ///
    /// Each placeholder occurs once, so each span is restored exactly once.
    /// A sentinel that does not start a well-formed placeholder is copied as is.
    pub fn restore(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(self.sentinel.as_str()) {
            out.push_str(&rest[..start]);
            let candidate = &rest[start..];
            match self.resolve(candidate) {
                Some((span, len)) => {
                    out.push_str(&span.to_html());
                    rest = &candidate[len..];
                }
                None => {
                    let skip = candidate.chars().next().map_or(candidate.len(), char::len_utf8);
                    out.push_str(&candidate[..skip]);
                    rest = &candidate[skip..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// Span named by the placeholder at the start of `text`, with the
    /// placeholder's byte length.
    fn resolve(&self, text: &str) -> Option<(&ProtectedSpan, usize)> {
        let body = text.strip_prefix(self.sentinel.as_str())?;
        let kind = match body.chars().next()? {
            'B' => SpanKind::Block,
            'I' => SpanKind::Inline,
            _ => return None,
        };
        let digits = &body[1..];
        let digit_len = digits.bytes().take_while(u8::is_ascii_digit).count();
        let index: usize = digits[..digit_len].parse().ok()?;
        digits[digit_len..].strip_prefix(self.sentinel.as_str())?;
        let span = self.spans(kind).get(index)?;
        Some((span, 2 * self.sentinel.len() + 1 + digit_len))
    }
}

fn private_use_chars() -> impl Iterator<Item = char> {
    ('\u{E000}'..='\u{F8FF}')
        .chain('\u{F0000}'..='\u{FFFFD}')
        .chain('\u{100000}'..='\u{10FFFD}')
}

fn is_private_use(c: char) -> bool {
    matches!(c, '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}')
}

/// Sentinel absent from `source`, found in one pass over it.
///
/// Normally the first private-use character the source lacks. When every one
/// is present, a run of `U+E000` one longer than the longest run in the source.
fn pick_sentinel(source: &str) -> String {
    let mut present = HashSet::new();
    let mut longest_run = 0;
    let mut run = 0;
    for c in source.chars() {
        if is_private_use(c) {
            present.insert(c);
        }
        run = if c == '\u{E000}' { run + 1 } else { 0 };
        longest_run = longest_run.max(run);
    }
    match private_use_chars().find(|c| !present.contains(c)) {
        Some(c) => c.to_string(),
        None => "\u{E000}".repeat(longest_run + 1),
    }
}

/// Stage 1: lift fenced code blocks out of the text.
pub fn extract_fenced_code<'a>(text: &'a str, spans: &mut ProtectedSpans) -> Cow<'a, str> {
    FENCED_CODE.replace_all(text, |caps: &Captures<'_>| {
        spans.protect(SpanKind::Block, &caps[0])
    })
}

/// Stage 2: lift inline code spans out of the text.
pub fn extract_inline_code<'a>(text: &'a str, spans: &mut ProtectedSpans) -> Cow<'a, str> {
    INLINE_CODE.replace_all(text, |caps: &Captures<'_>| {
        spans.protect(SpanKind::Inline, &caps[0])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_blocks_are_indexed_in_order() {
        let source = "a ```one``` b ```two```";
        let mut spans = ProtectedSpans::for_source(source);
        let text = extract_fenced_code(source, &mut spans);

        assert_eq!(spans.spans(SpanKind::Block).len(), 2);
        assert_eq!(spans.spans(SpanKind::Block)[0].literal, "```one```");
        assert_eq!(spans.spans(SpanKind::Block)[1].literal, "```two```");
        assert_eq!(
            text,
            format!(
                "a {} b {}",
                spans.placeholder(SpanKind::Block, 0),
                spans.placeholder(SpanKind::Block, 1)
            )
        );
    }

    #[test]
    fn fences_match_the_nearest_closer_across_lines() {
        let source = "```\nx\n```\nmid\n```\ny\n```";
        let mut spans = ProtectedSpans::for_source(source);
        let text = extract_fenced_code(source, &mut spans);

        assert_eq!(spans.spans(SpanKind::Block).len(), 2);
        assert!(text.contains("\nmid\n"));
    }

    #[test]
    fn inline_code_skips_already_protected_fences() {
        let source = "```\nlet `x` = 1;\n``` and `y`";
        let mut spans = ProtectedSpans::for_source(source);
        let text = extract_fenced_code(source, &mut spans).into_owned();
        let text = extract_inline_code(&text, &mut spans);

        assert_eq!(spans.spans(SpanKind::Inline).len(), 1);
        assert_eq!(spans.spans(SpanKind::Inline)[0].literal, "`y`");
        assert!(!text.contains('`'));
    }

    #[test]
    fn unterminated_fence_is_left_alone() {
        let source = "```\nnever closed";
        let mut spans = ProtectedSpans::for_source(source);
        let text = extract_fenced_code(source, &mut spans);

        assert!(spans.is_empty());
        assert_eq!(text, source);
    }

    #[test]
    fn block_content_is_stripped_and_trimmed() {
        let span = ProtectedSpan {
            kind: SpanKind::Block,
            literal: "```\n  line1\nline2\n```".to_string(),
        };
        assert_eq!(span.content(), "line1\nline2");
        assert_eq!(span.to_html(), "<pre><code>line1\nline2</code></pre>");
    }

    #[test]
    fn inline_content_keeps_inner_whitespace() {
        let span = ProtectedSpan {
            kind: SpanKind::Inline,
            literal: "` a `".to_string(),
        };
        assert_eq!(span.to_html(), "<code> a </code>");
    }

    #[test]
    fn sentinel_avoids_characters_in_source() {
        let source = "\u{E000}\u{E001} text";
        let spans = ProtectedSpans::for_source(source);
        let token = spans.placeholder(SpanKind::Inline, 0);
        assert!(token.starts_with('\u{E002}'));
    }

    #[test]
    fn restore_replaces_each_placeholder_once() {
        let source = "`a` and `b`";
        let mut spans = ProtectedSpans::for_source(source);
        let text = extract_inline_code(source, &mut spans);
        assert_eq!(spans.restore(&text), "<code>a</code> and <code>b</code>");
    }

    #[test]
    fn restore_handles_many_spans_in_one_pass() {
        let source = "`x` ".repeat(20_000);
        let mut spans = ProtectedSpans::for_source(&source);
        let text = extract_inline_code(&source, &mut spans);
        assert_eq!(spans.len(), 20_000);

        let html = spans.restore(&text);
        assert_eq!(html.matches("<code>x</code>").count(), 20_000);
        assert_eq!(html, "<code>x</code> ".repeat(20_000));
    }

    #[test]
    fn restore_resolves_high_indices() {
        let source = (0..120).map(|i| format!("`{i}`")).collect::<Vec<_>>().join(",");
        let mut spans = ProtectedSpans::for_source(&source);
        let text = extract_inline_code(&source, &mut spans);
        let expected = (0..120)
            .map(|i| format!("<code>{i}</code>"))
            .collect::<Vec<_>>()
            .join(",");
        assert_eq!(spans.restore(&text), expected);
    }

    #[test]
    fn sentinel_is_picked_from_present_characters_in_one_pass() {
        let source: String = ('\u{E000}'..='\u{F8FF}').collect();
        assert_eq!(pick_sentinel(&source), "\u{F0000}");
    }

    #[test]
    fn exhausted_private_use_area_falls_back_to_a_longer_sentinel() {
        let every: String = private_use_chars().collect();
        let forged = format!("{every}\u{E000}\u{E000}I0\u{E000}");
        let sentinel = pick_sentinel(&forged);
        assert_eq!(sentinel, "\u{E000}".repeat(3));
        assert!(!forged.contains(&sentinel));

        let source = format!("{every} \u{E000}I0\u{E000} `x`");
        let mut spans = ProtectedSpans::for_source(&source);
        let text = extract_inline_code(&source, &mut spans);
        assert_eq!(
            spans.restore(&text),
            format!("{every} \u{E000}I0\u{E000} <code>x</code>")
        );
    }

    #[test]
    fn sentinel_next_to_a_placeholder_is_copied_through() {
        let mut spans = ProtectedSpans::for_source("");
        let token = spans.protect(SpanKind::Inline, "`x`");
        let sentinel = token.chars().next().unwrap();
        let text = format!("{sentinel}{token}{sentinel}I9{sentinel}");
        assert_eq!(
            spans.restore(&text),
            format!("{sentinel}<code>x</code>{sentinel}I9{sentinel}")
        );
    }

    #[test]
    fn placeholders_carry_no_markup_characters() {
        let spans = ProtectedSpans::for_source("");
        let token = spans.placeholder(SpanKind::Block, 12);
        assert!(!token.contains(['*', '#', '|', '>', '-', '[', '`', '\n', '.']));
    }
}
