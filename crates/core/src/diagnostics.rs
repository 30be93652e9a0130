//! Reports markup that the renderer will emit as literal text.
//!
//! Uses the same code patterns as the renderer, so a warning here means the
//! rendered output really contains the stray delimiter. Inspecting never
//! changes what gets rendered.

use crate::protect::{FENCED_CODE, INLINE_CODE};
use crate::{RenderDiagnostics, RenderWarning, SourceLocation};
use std::ops::Range;

/// Find unclosed fences and unmatched backticks in `source`.
///
/// Warnings are returned in source order.
pub fn inspect(source: &str) -> RenderDiagnostics {
    let mut diagnostics = RenderDiagnostics::new();
    if !source.contains('`') {
        return diagnostics;
    }

    // Blank out what stage 1 lifts so stage 2 pairs backticks the same way.
    let outside_fences = blank_ranges(source, FENCED_CODE.find_iter(source).map(|m| m.range()));

    let mut fence_runs: Vec<Range<usize>> = Vec::new();
    let mut from = 0;
    while let Some(found) = outside_fences[from..].find("```") {
        let start = from + found;
        let run = &outside_fences[start..];
        let end = start + run.len() - run.trim_start_matches('`').len();
        diagnostics.add_warning(RenderWarning::UnclosedCodeFence {
            location: SourceLocation::from_offset(source, start),
        });
        fence_runs.push(start..end);
        from = end;
    }

    let outside_code = blank_ranges(
        &outside_fences,
        INLINE_CODE.find_iter(&outside_fences).map(|m| m.range()),
    );
    for (offset, _) in outside_code.match_indices('`') {
        if fence_runs.iter().any(|run| run.contains(&offset)) {
            continue;
        }
        diagnostics.add_warning(RenderWarning::UnmatchedBacktick {
            location: SourceLocation::from_offset(source, offset),
        });
    }

    diagnostics
        .warnings
        .sort_by_key(|warning| (warning.location().line, warning.location().column));
    if diagnostics.has_warnings() {
        log::debug!(
            "{} markup warning(s) in {} byte reply",
            diagnostics.count(),
            source.len()
        );
    }
    diagnostics
}

/// Replace the given byte ranges with spaces, keeping newlines and byte offsets.
fn blank_ranges(text: &str, ranges: impl Iterator<Item = Range<usize>>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for range in ranges {
        out.push_str(&text[last..range.start]);
        for c in text[range.clone()].chars() {
            if c == '\n' {
                out.push('\n');
            } else {
                out.extend(std::iter::repeat_n(' ', c.len_utf8()));
            }
        }
        last = range.end;
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_markup_has_no_warnings() {
        let diagnostics = inspect("```\ncode\n``` and `inline` text");
        assert!(!diagnostics.has_warnings());
    }

    #[test]
    fn reports_unclosed_fence_once() {
        let diagnostics = inspect("intro\n```rust\nfn main() {}");
        assert_eq!(
            diagnostics.warnings,
            vec![RenderWarning::UnclosedCodeFence {
                location: SourceLocation::new(2, 1),
            }]
        );
    }

    #[test]
    fn reports_lone_backtick() {
        let diagnostics = inspect("use `a` and ` here");
        assert_eq!(
            diagnostics.warnings,
            vec![RenderWarning::UnmatchedBacktick {
                location: SourceLocation::new(1, 13),
            }]
        );
    }

    #[test]
    fn backticks_inside_closed_fences_are_fine() {
        let diagnostics = inspect("```\na ` b\n```");
        assert!(!diagnostics.has_warnings());
    }

    #[test]
    fn backtick_after_unclosed_fence_pairs_with_the_opener() {
        // The opener's third backtick and the first lone one form inline code.
        let diagnostics = inspect("```a ` b ` c");
        let kinds: Vec<_> = diagnostics.warnings.iter().map(|w| w.kind()).collect();
        assert_eq!(kinds, vec!["unclosed-code-fence", "unmatched-backtick"]);
        assert_eq!(diagnostics.warnings[1].location(), &SourceLocation::new(1, 10));
    }

    #[test]
    fn blanking_keeps_offsets_and_newlines() {
        let blanked = blank_ranges("aé\nb`c", std::iter::once(1..5));
        assert_eq!(blanked.len(), "aé\nb`c".len());
        assert_eq!(blanked, "a  \n `c");
    }
}
