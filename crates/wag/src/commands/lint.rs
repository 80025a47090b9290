//! `wag lint`: style rules over a source tree.

use crate::cli::OutputFormat;
use crate::commands::{json_envelope, print_diagnostics, run_pipeline};
use crate::errors::CliError;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use wag_lint::{rewrite_deprecated_commands, LintIssue};

pub fn run(path: &Path, fix: bool, format: OutputFormat) -> Result<u8, CliError> {
    let pipeline = run_pipeline(path)?;
    let mut issues = wag_lint::lint(&pipeline.discovery, &pipeline.workflows);

    if fix {
        let fixed = apply_fixes(&issues)?;
        if !fixed.is_empty() {
            // Findings the rewrite just resolved would only confuse the
            // report; keep the rest.
            issues.retain(|issue| {
                !(issue.fixable && issue.file.as_deref().is_some_and(|f| fixed.contains(f)))
            });
        }
        for file in &fixed {
            println!("fixed {}", file.display());
        }
    }

    let success = issues.is_empty() && !pipeline.has_errors();

    match format {
        OutputFormat::Json => {
            let payload = json_envelope(
                success,
                &pipeline.diagnostics,
                &[(
                    "issues",
                    serde_json::to_value(&issues).unwrap_or_default(),
                )],
            );
            println!("{payload}");
        }
        OutputFormat::Text => {
            print_diagnostics(&pipeline.diagnostics);
            for issue in &issues {
                println!("{issue}");
            }
            if success {
                println!("no issues found");
            }
        }
    }

    Ok(u8::from(!success))
}

/// Rewrite the source files behind fixable findings. Returns the set of
/// files that changed.
fn apply_fixes(issues: &[LintIssue]) -> Result<BTreeSet<PathBuf>, CliError> {
    let targets: BTreeSet<&Path> = issues
        .iter()
        .filter(|issue| issue.fixable)
        .filter_map(|issue| issue.file.as_deref())
        .collect();

    let mut fixed = BTreeSet::new();
    for target in targets {
        let source = fs::read_to_string(target).map_err(|e| CliError::io("read", target, e))?;
        if let std::borrow::Cow::Owned(rewritten) = rewrite_deprecated_commands(&source) {
            fs::write(target, rewritten).map_err(|e| CliError::io("write", target, e))?;
            fixed.insert(target.to_path_buf());
        }
    }
    Ok(fixed)
}
