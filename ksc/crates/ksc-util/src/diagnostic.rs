//! Diagnostic values rendered on the error stream.
//!
//! Pipeline stages return typed errors; the driver converts them into
//! [`Diagnostic`]s and prints one per top-level failure.

use crate::span::Span;
use std::fmt;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A failure that aborts the current pipeline stage.
    Error,
    /// A condition worth reporting that does not abort anything.
    Warning,
    /// Additional context attached to another diagnostic.
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A renderable message with severity and source position.
///
/// # Examples
///
/// ```
/// use ksc_util::{Diagnostic, Span};
///
/// let diag = Diagnostic::error("unexpected character '@'", Span::new(4, 5, 1, 5));
/// assert_eq!(diag.to_string(), "[line 1:5] error: unexpected character '@'");
/// ```
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Severity.
    pub level: Level,
    /// Main message.
    pub message: String,
    /// Source location; [`Span::DUMMY`] when the position is unknown.
    pub span: Span,
    /// Extra context lines.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with the given severity.
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            notes: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }

    /// Attaches a note line.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.line > 0 && self.span.column > 0 {
            write!(f, "[line {}:{}] ", self.span.line, self.span.column)?;
        } else if self.span.line > 0 {
            write!(f, "[line {}] ", self.span.line)?;
        }
        write!(f, "{}: {}", self.level, self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Error.to_string(), "error");
        assert_eq!(Level::Warning.to_string(), "warning");
        assert_eq!(Level::Note.to_string(), "note");
    }

    #[test]
    fn test_error_with_position() {
        let diag = Diagnostic::error("expected ';'", Span::new(0, 1, 3, 14));
        assert_eq!(diag.to_string(), "[line 3:14] error: expected ';'");
    }

    #[test]
    fn test_error_with_line_only() {
        let diag = Diagnostic::error("Invalid assignment target", Span::point(2, 0));
        assert_eq!(diag.to_string(), "[line 2] error: Invalid assignment target");
    }

    #[test]
    fn test_error_without_position() {
        let diag = Diagnostic::error("Division by zero", Span::DUMMY);
        assert_eq!(diag.to_string(), "error: Division by zero");
    }

    #[test]
    fn test_notes_render_indented() {
        let diag = Diagnostic::error("bad call", Span::DUMMY).with_note("callee is null");
        assert_eq!(diag.to_string(), "error: bad call\n  note: callee is null");
    }
}
