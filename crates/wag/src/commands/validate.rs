//! `wag validate`: check a workflow YAML file.
//!
//! When `actionlint` is on the PATH it is preferred, since it checks far
//! more than the structural invariants. Without it, the file is imported
//! and run through the internal validators.

use crate::cli::OutputFormat;
use crate::commands::{json_envelope, print_diagnostics};
use crate::errors::CliError;
use std::fs;
use std::path::Path;
use std::process::Command;
use wag_model::{validate as validate_workflow, validate_job_graph, Diagnostic, DiagnosticKind};

pub fn run(file: &Path, format: OutputFormat) -> Result<u8, CliError> {
    if !file.is_file() {
        return Err(CliError::MissingInput { path: file.into() });
    }

    let diagnostics = match external_actionlint(file) {
        Some(diagnostics) => diagnostics,
        None => internal_validate(file)?,
    };
    let success = !diagnostics.iter().any(Diagnostic::is_error);

    match format {
        OutputFormat::Json => {
            let payload = json_envelope(
                success,
                &diagnostics,
                &[("file", serde_json::json!(file))],
            );
            println!("{payload}");
        }
        OutputFormat::Text => {
            print_diagnostics(&diagnostics);
            if success {
                println!("{}: ok", file.display());
            }
        }
    }

    Ok(u8::from(!success))
}

/// Run `actionlint` if present. `None` means the binary is unavailable
/// and the internal validators should run instead.
fn external_actionlint(file: &Path) -> Option<Vec<Diagnostic>> {
    let output = Command::new("actionlint")
        .arg("-no-color")
        .arg(file)
        .output()
        .ok()?;
    tracing::debug!(status = ?output.status, "actionlint finished");
    if output.status.success() {
        return Some(Vec::new());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut diagnostics: Vec<Diagnostic> = stdout
        .lines()
        .chain(stderr.lines())
        .filter(|line| !line.trim().is_empty())
        .map(|line| Diagnostic::invariant(line.to_string()))
        .collect();
    // A nonzero exit must fail validation even when the output is empty.
    if diagnostics.is_empty() {
        diagnostics.push(Diagnostic::invariant(format!(
            "actionlint rejected the file ({})",
            output.status
        )));
    }
    Some(diagnostics)
}

/// Import the file and run the structural validators over the result.
fn internal_validate(file: &Path) -> Result<Vec<Diagnostic>, CliError> {
    let source = fs::read_to_string(file).map_err(|e| CliError::io("read", file, e))?;
    let imported = match wag_import::import_workflow(&source) {
        Ok(imported) => imported,
        Err(fatal) => return Ok(vec![fatal.in_file(file)]),
    };
    let mut diagnostics = imported.errors;
    diagnostics.extend(validate_workflow(&imported.workflow));
    diagnostics.extend(validate_job_graph(&imported.workflow));
    if imported.workflow.jobs.is_empty() {
        diagnostics.push(Diagnostic::error(
            DiagnosticKind::ImportError,
            "workflow has no jobs",
        ));
    }
    Ok(diagnostics)
}
