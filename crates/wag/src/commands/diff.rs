//! `wag diff`: semantic comparison of two workflows.
//!
//! Each side is either a workflow YAML file or a typed source tree. The
//! comparison is over the IR, so formatting-only differences between two
//! YAML files do not register; `--yaml` adds a line diff of the canonical
//! emission for readers who want the textual view.

use crate::cli::DiffFormat;
use crate::commands::{print_diagnostics, run_pipeline};
use crate::errors::CliError;
use similar::TextDiff;
use std::fs;
use std::path::Path;
use wag_model::{Diagnostic, Workflow};

/// Job-level differences between two workflows.
#[derive(Debug, Default)]
struct Report {
    renamed: Option<(String, String)>,
    triggers_changed: bool,
    added_jobs: Vec<String>,
    removed_jobs: Vec<String>,
    changed_jobs: Vec<String>,
    added_edges: Vec<(String, String)>,
    removed_edges: Vec<(String, String)>,
}

impl Report {
    fn is_empty(&self) -> bool {
        self.renamed.is_none()
            && !self.triggers_changed
            && self.added_jobs.is_empty()
            && self.removed_jobs.is_empty()
            && self.changed_jobs.is_empty()
            && self.added_edges.is_empty()
            && self.removed_edges.is_empty()
    }
}

pub fn run(path1: &Path, path2: &Path, yaml: bool, format: DiffFormat) -> Result<u8, CliError> {
    let old = match load(path1)? {
        Loaded::Workflow(workflow) => workflow,
        Loaded::Failed(diagnostics) => {
            print_diagnostics(&diagnostics);
            return Ok(1);
        }
    };
    let new = match load(path2)? {
        Loaded::Workflow(workflow) => workflow,
        Loaded::Failed(diagnostics) => {
            print_diagnostics(&diagnostics);
            return Ok(1);
        }
    };

    let report = compare(&old, &new);
    let different = !report.is_empty();

    match format {
        DiffFormat::Text => render_text(&report),
        DiffFormat::Markdown => render_markdown(&report),
        DiffFormat::Json => render_json(&report, different),
    }

    if yaml && format != DiffFormat::Json {
        if let (Ok(before), Ok(after)) = (
            wag_emit::emit_workflow(&old, None),
            wag_emit::emit_workflow(&new, None),
        ) {
            let diff = TextDiff::from_lines(&before, &after);
            print!(
                "{}",
                diff.unified_diff()
                    .header(&path1.display().to_string(), &path2.display().to_string())
            );
        }
    }

    Ok(u8::from(different))
}

enum Loaded {
    Workflow(Workflow),
    Failed(Vec<Diagnostic>),
}

/// Load one side: YAML files are imported, directories go through the
/// evaluator. A source tree with several workflows diffs its first one.
fn load(path: &Path) -> Result<Loaded, CliError> {
    if path.is_file() {
        let source = fs::read_to_string(path).map_err(|e| CliError::io("read", path, e))?;
        return match wag_import::import_workflow(&source) {
            Ok(imported) if !imported.has_errors() => Ok(Loaded::Workflow(imported.workflow)),
            Ok(imported) => Ok(Loaded::Failed(
                imported
                    .errors
                    .into_iter()
                    .map(|error| error.in_file(path))
                    .collect(),
            )),
            Err(fatal) => Ok(Loaded::Failed(vec![fatal.in_file(path)])),
        };
    }

    let pipeline = run_pipeline(path)?;
    if pipeline.has_errors() {
        return Ok(Loaded::Failed(pipeline.diagnostics));
    }
    match pipeline.workflows.into_iter().next() {
        Some((symbol, workflow)) => {
            if pipeline.discovery.workflows.len() > 1 {
                tracing::warn!(%symbol, "source tree declares several workflows; diffing the first");
            }
            Ok(Loaded::Workflow(workflow))
        }
        None => Ok(Loaded::Failed(vec![Diagnostic::invariant(format!(
            "no workflow declarations under '{}'",
            path.display()
        ))])),
    }
}

fn compare(old: &Workflow, new: &Workflow) -> Report {
    let mut report = Report::default();
    if old.name != new.name {
        report.renamed = Some((old.name.clone(), new.name.clone()));
    }
    report.triggers_changed = old.on != new.on;

    for id in new.sorted_job_ids() {
        match old.jobs.get(id) {
            None => report.added_jobs.push(id.to_string()),
            Some(previous) if previous != &new.jobs[id] => {
                report.changed_jobs.push(id.to_string());
            }
            Some(_) => {}
        }
    }
    for id in old.sorted_job_ids() {
        if !new.jobs.contains_key(id) {
            report.removed_jobs.push(id.to_string());
        }
    }

    let before = edges(old);
    let after = edges(new);
    report.added_edges = after.iter().filter(|e| !before.contains(e)).cloned().collect();
    report.removed_edges = before.iter().filter(|e| !after.contains(e)).cloned().collect();
    report
}

/// Dependency edges as (dependency, dependent) pairs, sorted.
fn edges(workflow: &Workflow) -> Vec<(String, String)> {
    let mut edges = Vec::new();
    for (id, job) in &workflow.jobs {
        for need in &job.needs {
            edges.push((need.clone(), id.clone()));
        }
    }
    edges.sort();
    edges
}

fn render_text(report: &Report) {
    if report.is_empty() {
        println!("workflows are semantically identical");
        return;
    }
    if let Some((old, new)) = &report.renamed {
        println!("renamed: \"{old}\" -> \"{new}\"");
    }
    if report.triggers_changed {
        println!("triggers changed");
    }
    for id in &report.added_jobs {
        println!("added job '{id}'");
    }
    for id in &report.removed_jobs {
        println!("removed job '{id}'");
    }
    for id in &report.changed_jobs {
        println!("changed job '{id}'");
    }
    for (from, to) in &report.added_edges {
        println!("added dependency '{from}' -> '{to}'");
    }
    for (from, to) in &report.removed_edges {
        println!("removed dependency '{from}' -> '{to}'");
    }
}

fn render_markdown(report: &Report) {
    println!("## Workflow diff");
    println!();
    if report.is_empty() {
        println!("No semantic differences.");
        return;
    }
    if let Some((old, new)) = &report.renamed {
        println!("- renamed: `{old}` -> `{new}`");
    }
    if report.triggers_changed {
        println!("- triggers changed");
    }
    for id in &report.added_jobs {
        println!("- added job `{id}`");
    }
    for id in &report.removed_jobs {
        println!("- removed job `{id}`");
    }
    for id in &report.changed_jobs {
        println!("- changed job `{id}`");
    }
    for (from, to) in &report.added_edges {
        println!("- added dependency `{from}` -> `{to}`");
    }
    for (from, to) in &report.removed_edges {
        println!("- removed dependency `{from}` -> `{to}`");
    }
}

fn render_json(report: &Report, different: bool) {
    let edge = |(from, to): &(String, String)| serde_json::json!({ "from": from, "to": to });
    let payload = serde_json::json!({
        "success": true,
        "errors": [],
        "different": different,
        "renamed": report.renamed.as_ref().map(|(old, new)| {
            serde_json::json!({ "from": old, "to": new })
        }),
        "triggers_changed": report.triggers_changed,
        "added_jobs": report.added_jobs,
        "removed_jobs": report.removed_jobs,
        "changed_jobs": report.changed_jobs,
        "added_edges": report.added_edges.iter().map(edge).collect::<Vec<_>>(),
        "removed_edges": report.removed_edges.iter().map(edge).collect::<Vec<_>>(),
    });
    println!("{payload}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use wag_model::{Job, Step};

    fn job(needs: &[&str]) -> Job {
        let mut job = Job::on("ubuntu-latest", [Step::run("true")]);
        for need in needs {
            job = job.needs(*need);
        }
        job
    }

    #[test]
    fn test_identical_workflows() {
        let mut workflow = Workflow::named("CI");
        workflow.jobs.insert("build".into(), job(&[]));
        let report = compare(&workflow, &workflow.clone());
        assert!(report.is_empty());
    }

    #[test]
    fn test_added_and_removed_jobs() {
        let mut old = Workflow::named("CI");
        old.jobs.insert("build".into(), job(&[]));
        old.jobs.insert("docs".into(), job(&[]));
        let mut new = Workflow::named("CI");
        new.jobs.insert("build".into(), job(&[]));
        new.jobs.insert("test".into(), job(&["build"]));

        let report = compare(&old, &new);
        assert_eq!(report.added_jobs, vec!["test"]);
        assert_eq!(report.removed_jobs, vec!["docs"]);
        assert_eq!(
            report.added_edges,
            vec![("build".to_string(), "test".to_string())]
        );
    }

    #[test]
    fn test_changed_job_body() {
        let mut old = Workflow::named("CI");
        old.jobs
            .insert("build".into(), Job::on("ubuntu-latest", [Step::run("make")]));
        let mut new = Workflow::named("CI");
        new.jobs.insert(
            "build".into(),
            Job::on("ubuntu-latest", [Step::run("make all")]),
        );
        let report = compare(&old, &new);
        assert_eq!(report.changed_jobs, vec!["build"]);
        assert!(report.added_jobs.is_empty());
    }

    #[test]
    fn test_rename_and_triggers() {
        let old = Workflow::named("CI");
        let mut new = Workflow::named("Release");
        new.on.push = Some(wag_model::PushTrigger::default());
        let report = compare(&old, &new);
        assert_eq!(
            report.renamed,
            Some(("CI".to_string(), "Release".to_string()))
        );
        assert!(report.triggers_changed);
    }
}
