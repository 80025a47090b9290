//! `wag build`: typed declarations to canonical YAML.

use crate::cli::BuildFormat;
use crate::commands::{json_envelope, print_diagnostics, run_pipeline};
use crate::errors::CliError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use wag_model::names::filename;
use wag_model::{validate, validate_job_graph, Diagnostic, DiagnosticKind};

/// A workflow ready to be written.
struct Output {
    /// Declaration symbol the workflow came from.
    symbol: String,
    /// Output file name, `<filename(workflow.name)>.yml`.
    file_name: String,
    /// Number of jobs the workflow declares.
    jobs: usize,
    /// Canonical YAML bytes.
    yaml: String,
}

pub fn run(
    path: &Path,
    out_dir: &Path,
    dry_run: bool,
    format: BuildFormat,
) -> Result<u8, CliError> {
    let pipeline = run_pipeline(path)?;
    let mut diagnostics = pipeline.diagnostics;
    let mut outputs = Vec::new();
    let mut claimed: HashMap<String, String> = HashMap::new();

    for (symbol, workflow) in &pipeline.workflows {
        diagnostics.extend(validate(workflow));
        diagnostics.extend(validate_job_graph(workflow));

        let file_name = format!("{}.yml", filename(&workflow.name));
        if let Some(previous) = claimed.insert(file_name.clone(), symbol.clone()) {
            diagnostics.push(Diagnostic::invariant(format!(
                "workflows '{previous}' and '{symbol}' both emit '{file_name}'"
            )));
            continue;
        }

        match wag_emit::emit_workflow(workflow, Some(&pipeline.discovery.references)) {
            Ok(yaml) => outputs.push(Output {
                symbol: symbol.clone(),
                file_name,
                jobs: workflow.jobs.len(),
                yaml,
            }),
            Err(error) => {
                diagnostics.push(Diagnostic::error(DiagnosticKind::EmitError, error.to_string()));
            }
        }
    }

    let success = !diagnostics.iter().any(Diagnostic::is_error);

    if success && !dry_run {
        fs::create_dir_all(out_dir).map_err(|e| CliError::io("create", out_dir, e))?;
        for output in &outputs {
            let target = out_dir.join(&output.file_name);
            fs::write(&target, &output.yaml).map_err(|e| CliError::io("write", &target, e))?;
        }
    }

    match format {
        BuildFormat::Json => {
            let files: Vec<serde_json::Value> = outputs
                .iter()
                .map(|output| {
                    serde_json::json!({
                        "workflow": output.symbol,
                        "file": output.file_name,
                        "path": out_dir.join(&output.file_name),
                        "jobs": output.jobs,
                    })
                })
                .collect();
            let payload = json_envelope(
                success,
                &diagnostics,
                &[
                    ("files", serde_json::Value::Array(files)),
                    ("dry_run", serde_json::Value::Bool(dry_run)),
                ],
            );
            println!("{payload}");
        }
        BuildFormat::Yaml => {
            print_diagnostics(&diagnostics);
            if success {
                for output in &outputs {
                    let target = out_dir.join(&output.file_name);
                    if dry_run {
                        println!("--- {}", target.display());
                        print!("{}", output.yaml);
                    } else {
                        println!("wrote {}", target.display());
                    }
                }
            }
        }
    }

    Ok(u8::from(!success))
}
