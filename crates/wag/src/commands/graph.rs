//! `wag graph`: job dependency graphs.

use crate::cli::{Direction, GraphFormat};
use crate::commands::{json_envelope, print_diagnostics, run_pipeline};
use crate::errors::CliError;
use std::fmt::Write;
use std::path::Path;
use wag_model::Workflow;

pub fn run(path: &Path, format: GraphFormat, direction: Direction) -> Result<u8, CliError> {
    let pipeline = run_pipeline(path)?;
    if pipeline.has_errors() {
        print_diagnostics(&pipeline.diagnostics);
        return Ok(1);
    }

    match format {
        GraphFormat::Dot => {
            for workflow in pipeline.workflows.values() {
                print!("{}", render_dot(workflow, direction));
            }
        }
        GraphFormat::Mermaid => {
            for workflow in pipeline.workflows.values() {
                print!("{}", render_mermaid(workflow, direction));
            }
        }
        GraphFormat::Json => {
            let workflows: Vec<serde_json::Value> = pipeline
                .workflows
                .values()
                .map(|workflow| {
                    let edges: Vec<serde_json::Value> = edges(workflow)
                        .iter()
                        .map(|(from, to)| serde_json::json!({ "from": from, "to": to }))
                        .collect();
                    serde_json::json!({
                        "name": workflow.name,
                        "jobs": workflow.sorted_job_ids(),
                        "edges": edges,
                    })
                })
                .collect();
            let payload = json_envelope(
                true,
                &pipeline.diagnostics,
                &[("workflows", serde_json::Value::Array(workflows))],
            );
            println!("{payload}");
        }
    }

    Ok(0)
}

/// Dependency edges as (dependency, dependent) pairs, sorted for stable
/// output.
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

fn render_dot(workflow: &Workflow, direction: Direction) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph {:?} {{", workflow.name);
    let _ = writeln!(out, "  rankdir={};", direction.keyword());
    for id in workflow.sorted_job_ids() {
        let _ = writeln!(out, "  {id:?};");
    }
    for (from, to) in edges(workflow) {
        let _ = writeln!(out, "  {from:?} -> {to:?};");
    }
    out.push_str("}\n");
    out
}

fn render_mermaid(workflow: &Workflow, direction: Direction) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "graph {}", direction.keyword());
    let connected: Vec<(String, String)> = edges(workflow);
    for (from, to) in &connected {
        let _ = writeln!(out, "  {from} --> {to}");
    }
    // Isolated jobs still deserve a node.
    for id in workflow.sorted_job_ids() {
        let isolated = connected
            .iter()
            .all(|(from, to)| from != id && to != id);
        if isolated {
            let _ = writeln!(out, "  {id}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wag_model::{Job, Step};

    fn diamond() -> Workflow {
        let base = || Job::on("ubuntu-latest", [Step::run("true")]);
        let mut workflow = Workflow::named("CI");
        workflow.jobs.insert("build".into(), base());
        workflow.jobs.insert("test".into(), base().needs("build"));
        workflow.jobs.insert("lint".into(), base().needs("build"));
        workflow
            .jobs
            .insert("deploy".into(), base().needs("test").needs("lint"));
        workflow
    }

    #[test]
    fn test_dot_output() {
        let dot = render_dot(&diamond(), Direction::Tb);
        assert_eq!(
            dot,
            "digraph \"CI\" {\n  rankdir=TB;\n  \"build\";\n  \"deploy\";\n  \"lint\";\n  \"test\";\n  \"build\" -> \"lint\";\n  \"build\" -> \"test\";\n  \"lint\" -> \"deploy\";\n  \"test\" -> \"deploy\";\n}\n"
        );
    }

    #[test]
    fn test_mermaid_direction_and_isolated_nodes() {
        let base = || Job::on("ubuntu-latest", [Step::run("true")]);
        let mut workflow = Workflow::named("CI");
        workflow.jobs.insert("solo".into(), base());
        workflow.jobs.insert("a".into(), base());
        workflow.jobs.insert("b".into(), base().needs("a"));

        let mermaid = render_mermaid(&workflow, Direction::Lr);
        assert!(mermaid.starts_with("graph LR\n"));
        assert!(mermaid.contains("  a --> b\n"));
        assert!(mermaid.contains("  solo\n"));
        assert!(!mermaid.contains("  a\n  b"));
    }
}
