use thiserror::Error;

/// Source location information for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, counted in characters)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Locate a byte offset within `source`.
    ///
    /// Offsets past the end of `source` are clamped to its end.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut end = offset.min(source.len());
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        let before = &source[..end];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors raised while configuring the renderer.
///
/// Rendering itself never fails; these only surface at the options seam.
#[derive(Debug, Error)]
pub enum ChatmarkError {
    /// Options JSON could not be decoded.
    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
    /// Link target cannot be placed inside an HTML attribute.
    #[error("Invalid link target: {target:?}")]
    InvalidLinkTarget {
        /// The rejected target value
        target: String,
    },
}

impl ChatmarkError {
    /// Create an invalid link target error
    pub fn invalid_link_target(target: impl Into<String>) -> Self {
        Self::InvalidLinkTarget {
            target: target.into(),
        }
    }
}

/// Non-fatal warnings about markup that fell through as literal text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    /// Triple-backtick fence opened but never closed
    UnclosedCodeFence {
        /// Source location of the opening fence
        location: SourceLocation,
    },
    /// Backtick with no partner to form an inline code span
    UnmatchedBacktick {
        /// Source location of the backtick
        location: SourceLocation,
    },
}

impl RenderWarning {
    /// Get the location of this warning
    pub fn location(&self) -> &SourceLocation {
        match self {
            RenderWarning::UnclosedCodeFence { location } => location,
            RenderWarning::UnmatchedBacktick { location } => location,
        }
    }

    /// Short machine-readable name of the warning kind
    pub fn kind(&self) -> &'static str {
        match self {
            RenderWarning::UnclosedCodeFence { .. } => "unclosed-code-fence",
            RenderWarning::UnmatchedBacktick { .. } => "unmatched-backtick",
        }
    }
}

impl std::fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderWarning::UnclosedCodeFence { location } => {
                write!(f, "Unclosed code fence at {}", location)
            }
            RenderWarning::UnmatchedBacktick { location } => {
                write!(f, "Unmatched backtick at {}", location)
            }
        }
    }
}

/// Collection of render diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderDiagnostics {
    /// List of non-fatal warnings, in source order
    pub warnings: Vec<RenderWarning>,
}

impl RenderDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the diagnostics collection
    pub fn add_warning(&mut self, warning: RenderWarning) {
        self.warnings.push(warning);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}
