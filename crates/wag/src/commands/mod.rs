//! Command implementations.
//!
//! Every command returns the process exit code it wants: 0 for success,
//! 1 for semantic failures (diagnostics, lint findings, differences).
//! Usage-class failures surface as [`CliError`] and exit 2.

pub mod build;
pub mod diff;
pub mod graph;
pub mod import;
pub mod init;
pub mod lint;
pub mod list;
pub mod validate;
pub mod watch;

use crate::cli::Commands;
use crate::errors::CliError;
use indexmap::IndexMap;
use std::path::Path;
use wag_discover::DiscoveryResult;
use wag_model::{CancelToken, Diagnostic, Workflow};

/// Dispatch a parsed subcommand.
pub fn run(command: Commands) -> Result<u8, CliError> {
    match command {
        Commands::Build {
            path,
            out_dir,
            dry_run,
            format,
        } => build::run(&path, &out_dir, dry_run, format),
        Commands::Import {
            file,
            out_dir,
            single_file,
            no_scaffold,
            input_type,
        } => import::run(&file, &out_dir, single_file, no_scaffold, input_type),
        Commands::Validate { file, format } => validate::run(&file, format),
        Commands::List { path } => list::run(&path),
        Commands::Lint { path, fix, format } => lint::run(&path, fix, format),
        Commands::Diff {
            path1,
            path2,
            yaml,
            format,
        } => diff::run(&path1, &path2, yaml, format),
        Commands::Graph {
            path,
            format,
            direction,
        } => graph::run(&path, format, direction),
        Commands::Init { name, out_dir } => init::run(&name, &out_dir),
        Commands::Watch {
            path,
            out_dir,
            debounce,
            lint_only,
        } => watch::run(&path, &out_dir, debounce, lint_only),
    }
}

/// The discover-then-evaluate front half shared by most commands.
pub(crate) struct Pipeline {
    /// Raw discovery output, including the reference graph.
    pub discovery: DiscoveryResult,
    /// Evaluated workflows, keyed by declaration symbol.
    pub workflows: IndexMap<String, Workflow>,
    /// Discovery and evaluation diagnostics, in pipeline order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Pipeline {
    /// Whether any diagnostic blocks the command.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Discover and evaluate a source tree.
pub(crate) fn run_pipeline(path: &Path) -> Result<Pipeline, CliError> {
    if !path.exists() {
        return Err(CliError::MissingInput { path: path.into() });
    }
    let cancel = CancelToken::new();
    let discovery = wag_discover::discover(path, &cancel);
    let extraction = wag_eval::evaluate(&discovery, &cancel);
    let mut diagnostics = discovery.errors.clone();
    diagnostics.extend(extraction.errors);
    tracing::debug!(
        workflows = extraction.workflows.len(),
        diagnostics = diagnostics.len(),
        "pipeline finished"
    );
    Ok(Pipeline {
        discovery,
        workflows: extraction.workflows,
        diagnostics,
    })
}

/// Print diagnostics to stderr, one per line.
pub(crate) fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

/// The common JSON report envelope: `success` plus `errors`, with
/// command-specific fields merged in.
pub(crate) fn json_envelope(
    success: bool,
    errors: &[Diagnostic],
    extra: &[(&str, serde_json::Value)],
) -> serde_json::Value {
    let mut payload = serde_json::Map::new();
    payload.insert("success".to_string(), serde_json::Value::Bool(success));
    payload.insert(
        "errors".to_string(),
        serde_json::to_value(errors).unwrap_or_default(),
    );
    for (key, value) in extra {
        payload.insert((*key).to_string(), value.clone());
    }
    serde_json::Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wag_model::DiagnosticKind;

    #[test]
    fn test_envelope_shape() {
        let errors = vec![Diagnostic::error(DiagnosticKind::ImportError, "bad")];
        let payload = json_envelope(false, &errors, &[("count", serde_json::json!(1))]);
        assert_eq!(payload["success"], false);
        assert_eq!(payload["errors"][0]["kind"], "import-error");
        assert_eq!(payload["count"], 1);
    }
}
