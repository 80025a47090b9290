//! `wag list`: show discovered declarations.

use crate::commands::{print_diagnostics, run_pipeline};
use crate::errors::CliError;
use std::path::Path;
use wag_discover::DeclKind;
use wag_model::names::filename;

pub fn run(path: &Path) -> Result<u8, CliError> {
    let pipeline = run_pipeline(path)?;
    print_diagnostics(&pipeline.diagnostics);

    for (symbol, workflow) in &pipeline.workflows {
        let jobs = workflow.jobs.len();
        let noun = if jobs == 1 { "job" } else { "jobs" };
        let events = workflow.on.active_events();
        let on = if events.is_empty() {
            "no triggers".to_string()
        } else {
            format!("on {}", events.join(", "))
        };
        println!(
            "{symbol}: \"{}\" ({jobs} {noun}, {on}) -> {}.yml",
            workflow.name,
            filename(&workflow.name)
        );
    }

    for decl in &pipeline.discovery.others {
        println!("{}: {}", decl.name, kind_label(decl.kind));
    }

    Ok(u8::from(pipeline.has_errors()))
}

fn kind_label(kind: DeclKind) -> &'static str {
    match kind {
        DeclKind::Workflow => "workflow",
        DeclKind::Job => "job",
        DeclKind::Triggers => "triggers",
        DeclKind::Steps => "step list",
        DeclKind::Dependabot => "dependabot config",
        DeclKind::IssueTemplate => "issue template",
        DeclKind::CodeOwners => "code owners",
    }
}
