//! CLI-level failures rendered through miette.
//!
//! Semantic problems in workflow definitions travel as
//! [`wag_model::Diagnostic`] values and are printed by the command
//! renderers; `CliError` covers everything outside that: missing inputs,
//! filesystem failures, and watcher setup.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// An error that aborts the command.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    /// The input path the user named does not exist.
    #[error("input '{path}' does not exist")]
    #[diagnostic(
        code(wag::cli::missing_input),
        help("check the path argument; `wag --help` shows the expected usage")
    )]
    MissingInput {
        /// The path as given on the command line.
        path: PathBuf,
    },

    /// A filesystem read or write failed.
    #[error("failed to {operation} '{path}'")]
    #[diagnostic(code(wag::cli::io))]
    Io {
        /// What was being attempted.
        operation: &'static str,
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The output directory for `init` is already populated.
    #[error("'{path}' already exists")]
    #[diagnostic(
        code(wag::cli::already_exists),
        help("choose a different name or output directory")
    )]
    AlreadyExists {
        /// The directory that was about to be created.
        path: PathBuf,
    },

    /// The filesystem watcher could not be started.
    #[error("cannot watch '{path}'")]
    #[diagnostic(code(wag::cli::watch))]
    Watch {
        /// The directory being watched.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: notify::Error,
    },
}

impl CliError {
    /// Process exit code for this failure. Usage-class problems (a path
    /// that does not exist) exit 2; everything else exits 1.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::MissingInput { .. } => 2,
            _ => 1,
        }
    }

    /// Wrap an io error with the path and operation that produced it.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let missing = CliError::MissingInput {
            path: PathBuf::from("nope.yml"),
        };
        assert_eq!(missing.exit_code(), 2);
        let io = CliError::io("read", "x", std::io::Error::other("boom"));
        assert_eq!(io.exit_code(), 1);
    }
}
