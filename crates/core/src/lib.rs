#![deny(missing_docs)]
//! chatmark core: renders the lightweight markup of chat replies to HTML.

/// Line-anchored stages (headers, lists, blockquotes, line breaks).
pub mod block;
/// Markup leftovers reported as warnings.
pub mod diagnostics;
/// Core error and diagnostic types.
pub mod error;
/// Inline stages (links, bold, italic).
pub mod inline;
/// Renderer options.
pub mod options;
/// Code span extraction and placeholder restoration.
pub mod protect;
/// The ordered rendering pipeline.
pub mod render;
/// Pipe table conversion.
pub mod table;

pub use diagnostics::inspect;
pub use error::{ChatmarkError, RenderDiagnostics, RenderWarning, SourceLocation};
pub use options::{DEFAULT_LINK_TARGET, RenderOptions};
pub use protect::{ProtectedSpan, ProtectedSpans, SpanKind};
pub use render::{RenderOutput, Renderer, Stage, render};
