//! The rendering pipeline.
//!
//! Text flows through [`Stage::ALL`] in order. Code is lifted out first and
//! put back last, so no stage in between ever sees code content, and the
//! line-anchored stages all run before newlines turn into `<br>`.

use crate::block::{
    convert_blockquotes, convert_headers, convert_line_breaks, convert_list_items,
    group_list_items,
};
use crate::inline::{convert_bold, convert_italic, convert_links};
use crate::protect::{ProtectedSpans, extract_fenced_code, extract_inline_code};
use crate::table::convert_tables;
use crate::{ChatmarkError, RenderDiagnostics, RenderOptions, inspect};
use std::borrow::Cow;

/// One step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Lift triple-backtick blocks into placeholders.
    FencedCode,
    /// Lift single-backtick spans into placeholders.
    InlineCode,
    /// `[label](url)` to anchors.
    Links,
    /// `#`, `##`, `###` lines to headings.
    Headers,
    /// `**text**` to `<strong>`.
    Bold,
    /// `*text*` to `<em>`.
    Italic,
    /// Bullet and numbered lines to `<li>`.
    ListItems,
    /// Runs of `<li>` to `<ul>`.
    ListGroups,
    /// Pipe tables to `<table>`.
    Tables,
    /// `> ` lines to `<blockquote>`.
    Blockquotes,
    /// Newlines to `<br>`.
    LineBreaks,
    /// Placeholders back to code elements.
    RestoreCode,
}

impl Stage {
    /// Every stage, in the order the renderer applies them.
    pub const ALL: [Stage; 12] = [
        Stage::FencedCode,
        Stage::InlineCode,
        Stage::Links,
        Stage::Headers,
        Stage::Bold,
        Stage::Italic,
        Stage::ListItems,
        Stage::ListGroups,
        Stage::Tables,
        Stage::Blockquotes,
        Stage::LineBreaks,
        Stage::RestoreCode,
    ];
}

/// Rendered HTML together with warnings about literal leftovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// HTML fragment for a message container.
    pub html: String,
    /// Markup that fell through as literal text.
    pub diagnostics: RenderDiagnostics,
}

/// Renders chat-reply markup to HTML with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Create a renderer after validating `options`.
    pub fn new(options: RenderOptions) -> Result<Self, ChatmarkError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Options this renderer was built with.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `source` to an HTML fragment.
    ///
    /// Never fails: markup that does not match is emitted as written.
    /// HTML already present in `source` is passed through unescaped.
    pub fn render(&self, source: &str) -> String {
        let mut spans = ProtectedSpans::for_source(source);
        let mut text = source.to_string();
        for stage in Stage::ALL {
            let changed = match self.apply(stage, &text, &mut spans) {
                Cow::Borrowed(_) => None,
                Cow::Owned(changed) => Some(changed),
            };
            if let Some(changed) = changed {
                text = changed;
            }
            log::trace!("{:?} -> {} bytes", stage, text.len());
        }
        log::debug!(
            "rendered {} byte reply with {} protected code span(s)",
            source.len(),
            spans.len()
        );
        text
    }

    /// Render `source` and report literal leftovers alongside the HTML.
    pub fn render_with_diagnostics(&self, source: &str) -> RenderOutput {
        RenderOutput {
            html: self.render(source),
            diagnostics: inspect(source),
        }
    }

    /// Run a single stage over `text`.
    pub fn apply<'a>(
        &self,
        stage: Stage,
        text: &'a str,
        spans: &mut ProtectedSpans,
    ) -> Cow<'a, str> {
        match stage {
            Stage::FencedCode => extract_fenced_code(text, spans),
            Stage::InlineCode => extract_inline_code(text, spans),
            Stage::Links => convert_links(text, self.options.link_target.as_deref()),
            Stage::Headers => convert_headers(text),
            Stage::Bold => convert_bold(text),
            Stage::Italic => convert_italic(text),
            Stage::ListItems => convert_list_items(text),
            Stage::ListGroups => group_list_items(text),
            Stage::Tables => convert_tables(text),
            Stage::Blockquotes => convert_blockquotes(text),
            Stage::LineBreaks if self.options.hard_breaks => convert_line_breaks(text),
            Stage::LineBreaks => Cow::Borrowed(text),
            Stage::RestoreCode if spans.is_empty() => Cow::Borrowed(text),
            Stage::RestoreCode => Cow::Owned(spans.restore(text)),
        }
    }
}

/// Render `source` with the default chat options.
///
/// ```
/// use chatmark_core::render;
///
/// assert_eq!(render("**Hello** *world*"), "<strong>Hello</strong> <em>world</em>");
/// assert_eq!(render("# Title\nSome text"), "<h1>Title</h1><br>Some text");
/// ```
pub fn render(source: &str) -> String {
    Renderer::default().render(source)
}
