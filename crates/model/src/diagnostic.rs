//! Diagnostics as values.
//!
//! Every component returns its diagnostics to the caller; the CLI layer is
//! responsible for rendering them. There is deliberately no global sink.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The failure taxonomy, by `kind` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A source file failed to parse, a directory was unreadable, or no
    /// workflow declarations were found.
    DiscoveryError,
    /// A symbol refers to a name that is undeclared or mistyped.
    ReferenceError,
    /// The execution harness could not materialize a value.
    EvaluationError,
    /// The IR failed validation (cycle, missing job id, steps+uses, …).
    InvariantError,
    /// An unknown step value type reached the emitter.
    EmitError,
    /// YAML parsing failed or a structural oddity was encountered.
    ImportError,
    /// Filesystem read/write failure.
    IoError,
    /// The operation was cancelled by an external signal.
    Cancelled,
}

impl DiagnosticKind {
    /// The stable `kind` string used in text and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DiscoveryError => "discovery-error",
            Self::ReferenceError => "reference-error",
            Self::EvaluationError => "evaluation-error",
            Self::InvariantError => "invariant-error",
            Self::EmitError => "emit-error",
            Self::ImportError => "import-error",
            Self::IoError => "io-error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic severity. Unknown references during discovery are warnings;
/// everything else defaults to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks the operation that produced it.
    Error,
    /// Reported but non-blocking.
    Warning,
}

/// A single diagnostic produced by a component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Failure class.
    pub kind: DiagnosticKind,
    /// Severity; most diagnostics are errors.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Source file the diagnostic refers to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// 1-based line within `file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// 1-based column within `line`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl Diagnostic {
    /// Create an error diagnostic of the given kind.
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }

    /// Create a warning diagnostic of the given kind.
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(kind, message)
        }
    }

    /// Shorthand for an invariant error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::error(DiagnosticKind::InvariantError, message)
    }

    /// Shorthand for the cancellation diagnostic.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::error(DiagnosticKind::Cancelled, "operation cancelled")
    }

    /// Attach a source location.
    #[must_use]
    pub fn at(mut self, file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Attach a source file without line information.
    #[must_use]
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Whether this diagnostic blocks the operation.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    /// Text rendering: `path:line:col: message [kind]`, with the location
    /// prefix dropped when unknown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}", file.display())?;
            if let (Some(line), Some(column)) = (self.line, self.column) {
                write!(f, ":{line}:{column}")?;
            } else if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} [{}]", self.message, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_location() {
        let diag = Diagnostic::invariant("dependency cycle involving jobs 'a', 'b'")
            .at("src/jobs.rs", 12, 5);
        assert_eq!(
            diag.to_string(),
            "src/jobs.rs:12:5: dependency cycle involving jobs 'a', 'b' [invariant-error]"
        );
    }

    #[test]
    fn test_display_without_location() {
        let diag = Diagnostic::error(DiagnosticKind::ImportError, "jobs must be a mapping");
        assert_eq!(diag.to_string(), "jobs must be a mapping [import-error]");
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(DiagnosticKind::DiscoveryError.as_str(), "discovery-error");
        assert_eq!(DiagnosticKind::IoError.as_str(), "io-error");
    }

    #[test]
    fn test_json_shape() {
        let diag = Diagnostic::warning(DiagnosticKind::ReferenceError, "unknown name 'Build'");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["kind"], "reference-error");
        assert_eq!(json["severity"], "warning");
    }
}
