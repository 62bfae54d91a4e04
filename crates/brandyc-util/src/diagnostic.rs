//! Diagnostic collection.
//!
//! Every message the front-end produces is a [`Diagnostic`]: a token
//! index into the translation unit's token vector, a message, and a
//! [`Severity`]. The [`Handler`] accumulates them behind interior
//! mutability so passes taking `&Handler` can report freely.
//!
//! Rendering (source snippets, carets, colors) is deliberately not here;
//! a front-end consumer formats the collected records however it wants.

use std::cell::{Cell, RefCell};
use std::fmt;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Compilation can continue and code can still be generated.
    Warning,
    /// Analysis continues so further errors can be found, but code
    /// generation is suppressed.
    Error,
    /// The pipeline must stop; later passes cannot run.
    Terminal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Terminal => write!(f, "error"),
        }
    }
}

/// A single diagnostic record anchored at a token.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Index into the translation unit's token vector.
    pub token_index: usize,
    /// Human-readable message.
    pub message: String,
    /// Severity level.
    pub severity: Severity,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(token_index: usize, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            token_index,
            message: message.into(),
            severity,
        }
    }
}

/// Collector for diagnostics produced across the pipeline.
///
/// # Examples
///
/// ```
/// use brandyc_util::Handler;
///
/// let handler = Handler::new();
/// handler.error(3, "could not resolve name");
/// assert!(handler.has_errors());
/// assert_eq!(handler.error_count(), 1);
/// ```
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    fatal: Cell<bool>,
}

impl Handler {
    /// Create an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn warn(&self, token_index: usize, message: impl Into<String>) {
        self.emit(Diagnostic::new(token_index, message, Severity::Warning));
    }

    /// Record an error. Analysis continues; code generation will be
    /// suppressed.
    pub fn error(&self, token_index: usize, message: impl Into<String>) {
        self.emit(Diagnostic::new(token_index, message, Severity::Error));
    }

    /// Record a terminal error. The pipeline stops after the current
    /// pass.
    pub fn terminal(&self, token_index: usize, message: impl Into<String>) {
        self.emit(Diagnostic::new(token_index, message, Severity::Terminal));
    }

    /// Record a pre-built diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        if diagnostic.severity == Severity::Terminal {
            self.fatal.set(true);
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// True if any error or terminal diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.severity != Severity::Warning)
    }

    /// True if a terminal diagnostic was recorded.
    pub fn is_fatal(&self) -> bool {
        self.fatal.get()
    }

    /// Number of errors (including terminal errors).
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity != Severity::Warning)
            .count()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Snapshot of the collected diagnostics, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drop all collected diagnostics.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
        self.fatal.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_handler_is_clean() {
        let handler = Handler::new();
        assert!(!handler.has_errors());
        assert!(!handler.is_fatal());
        assert_eq!(handler.error_count(), 0);
        assert_eq!(handler.warning_count(), 0);
    }

    #[test]
    fn test_warning_is_not_error() {
        let handler = Handler::new();
        handler.warn(0, "unused variable");
        assert!(!handler.has_errors());
        assert_eq!(handler.warning_count(), 1);
    }

    #[test]
    fn test_error_counts() {
        let handler = Handler::new();
        handler.error(1, "bad");
        handler.error(2, "worse");
        assert!(handler.has_errors());
        assert!(!handler.is_fatal());
        assert_eq!(handler.error_count(), 2);
    }

    #[test]
    fn test_terminal_sets_fatal() {
        let handler = Handler::new();
        handler.terminal(5, "unrecognized byte sequence");
        assert!(handler.has_errors());
        assert!(handler.is_fatal());
    }

    #[test]
    fn test_diagnostics_preserve_order_and_anchor() {
        let handler = Handler::new();
        handler.error(7, "first");
        handler.warn(9, "second");

        let diags = handler.diagnostics();
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].token_index, 7);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[1].message, "second");
    }

    #[test]
    fn test_clear_resets_fatal() {
        let handler = Handler::new();
        handler.terminal(0, "boom");
        handler.clear();
        assert!(!handler.has_errors());
        assert!(!handler.is_fatal());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(format!("{}", Severity::Warning), "warning");
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Terminal), "error");
    }
}
