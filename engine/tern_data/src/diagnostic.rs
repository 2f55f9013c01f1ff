//! Diagnostics surfaced from the parser backend.

use std::fmt;
use std::path::PathBuf;

/// A position in a source file, 1-based.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Location {
            path: path.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// Severity of a diagnostic, in ascending order.
///
/// `Ignored` diagnostics are suppressed before they reach the editor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    Ignored,
    Note,
    Warning,
    Error,
    Fatal,
}

impl DiagnosticSeverity {
    /// Whether this diagnostic should be filtered out entirely.
    #[inline]
    pub fn is_ignored(self) -> bool {
        matches!(self, DiagnosticSeverity::Ignored)
    }

    /// Whether this diagnostic aborts or invalidates the parse.
    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, DiagnosticSeverity::Error | DiagnosticSeverity::Fatal)
    }
}

/// One diagnostic reported for a translation unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Location,
    pub severity: DiagnosticSeverity,
    pub text: String,
}

impl Diagnostic {
    pub fn new(location: Location, severity: DiagnosticSeverity, text: impl Into<String>) -> Self {
        Diagnostic {
            location,
            severity,
            text: text.into(),
        }
    }

    #[inline]
    pub fn is_ignored(&self) -> bool {
        self.severity.is_ignored()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}: {}", self.location, self.severity, self.text)
    }
}
