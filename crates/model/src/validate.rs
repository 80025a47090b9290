//! The two pure invariant checkers shared by both pipeline directions.

use crate::diagnostic::Diagnostic;
use crate::job::Job;
use crate::trigger::{PullRequestTrigger, PushTrigger, WorkflowRun};
use crate::workflow::Workflow;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Check a workflow's structural invariants.
///
/// Covers everything except the job dependency graph, which
/// [`validate_job_graph`] owns. Jobs are visited in lexicographic id order
/// so diagnostics are stable.
#[must_use]
pub fn validate(workflow: &Workflow) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if let Some(push) = &workflow.on.push {
        check_push_axes(&mut diagnostics, "push", push);
    }
    if let Some(pr) = &workflow.on.pull_request {
        check_pull_request_axes(&mut diagnostics, "pull_request", pr);
    }
    if let Some(pr) = &workflow.on.pull_request_target {
        check_pull_request_axes(&mut diagnostics, "pull_request_target", pr);
    }
    if let Some(run) = &workflow.on.workflow_run {
        check_workflow_run_axes(&mut diagnostics, run);
    }

    for id in workflow.sorted_job_ids() {
        if id.is_empty() {
            diagnostics.push(Diagnostic::invariant("job id must not be empty"));
            continue;
        }
        // Indexing is safe: the id came from the map's own keys.
        if let Some(job) = workflow.jobs.get(id) {
            check_job(&mut diagnostics, id, job);
        }
    }

    diagnostics
}

fn check_job(diagnostics: &mut Vec<Diagnostic>, id: &str, job: &Job) {
    match (job.steps.is_empty(), job.uses.is_some()) {
        (false, true) => diagnostics.push(Diagnostic::invariant(format!(
            "job '{id}' sets both steps and uses; they are mutually exclusive"
        ))),
        (true, false) => diagnostics.push(Diagnostic::invariant(format!(
            "job '{id}' has neither steps nor a reusable workflow reference"
        ))),
        _ => {}
    }

    if !job.steps.is_empty() && job.runs_on.is_unset() {
        diagnostics.push(Diagnostic::invariant(format!(
            "job '{id}' has steps but no runs-on"
        )));
    }

    if let Some(strategy) = &job.strategy {
        for axis in strategy.matrix.axes.keys() {
            if axis == "include" || axis == "exclude" {
                diagnostics.push(Diagnostic::invariant(format!(
                    "job '{id}' uses reserved matrix axis name '{axis}'"
                )));
            }
        }
    }

    let mut seen_ids: HashMap<&str, usize> = HashMap::new();
    for (index, step) in job.steps.iter().enumerate() {
        match (step.uses.is_some(), step.run.is_some()) {
            (true, true) => diagnostics.push(Diagnostic::invariant(format!(
                "job '{id}' step {index} sets both uses and run"
            ))),
            (false, false) => diagnostics.push(Diagnostic::invariant(format!(
                "job '{id}' step {index} sets neither uses nor run"
            ))),
            _ => {}
        }
        if step.uses.is_some() && step.shell.is_some() {
            diagnostics.push(Diagnostic::invariant(format!(
                "job '{id}' step {index} sets shell on a uses step"
            )));
        }
        if let Some(step_id) = step.id.as_deref() {
            if let Some(previous) = seen_ids.insert(step_id, index) {
                diagnostics.push(Diagnostic::invariant(format!(
                    "job '{id}' duplicates step id '{step_id}' (steps {previous} and {index})"
                )));
            }
        }
    }
}

fn check_push_axes(diagnostics: &mut Vec<Diagnostic>, event: &str, push: &PushTrigger) {
    exclusive_axis(diagnostics, event, "branches", !push.branches.is_empty(), !push.branches_ignore.is_empty());
    exclusive_axis(diagnostics, event, "tags", !push.tags.is_empty(), !push.tags_ignore.is_empty());
    exclusive_axis(diagnostics, event, "paths", !push.paths.is_empty(), !push.paths_ignore.is_empty());
}

fn check_pull_request_axes(
    diagnostics: &mut Vec<Diagnostic>,
    event: &str,
    pr: &PullRequestTrigger,
) {
    exclusive_axis(diagnostics, event, "branches", !pr.branches.is_empty(), !pr.branches_ignore.is_empty());
    exclusive_axis(diagnostics, event, "paths", !pr.paths.is_empty(), !pr.paths_ignore.is_empty());
}

fn check_workflow_run_axes(diagnostics: &mut Vec<Diagnostic>, run: &WorkflowRun) {
    exclusive_axis(
        diagnostics,
        "workflow_run",
        "branches",
        !run.branches.is_empty(),
        !run.branches_ignore.is_empty(),
    );
}

fn exclusive_axis(
    diagnostics: &mut Vec<Diagnostic>,
    event: &str,
    axis: &str,
    include: bool,
    ignore: bool,
) {
    if include && ignore {
        diagnostics.push(Diagnostic::invariant(format!(
            "{event} trigger sets both {axis} and {axis}-ignore; they are mutually exclusive"
        )));
    }
}

/// Check the job dependency graph.
///
/// Detects `needs` entries that reference a job id absent from the same
/// workflow, and dependency cycles. Jobs are added to the graph in
/// lexicographic id order so cycle reports are stable.
#[must_use]
pub fn validate_job_graph(workflow: &Workflow) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

    for id in workflow.sorted_job_ids() {
        nodes.insert(id, graph.add_node(id));
    }

    for id in workflow.sorted_job_ids() {
        let Some(job) = workflow.jobs.get(id) else {
            continue;
        };
        for dependency in &job.needs {
            match nodes.get(dependency.as_str()) {
                // Edge direction: dependency → dependent.
                Some(&from) => {
                    graph.add_edge(from, nodes[id], ());
                }
                None => diagnostics.push(Diagnostic::invariant(format!(
                    "job '{id}' needs unknown job '{dependency}'"
                ))),
            }
        }
    }

    for component in tarjan_scc(&graph) {
        let cyclic = component.len() > 1
            || component
                .first()
                .is_some_and(|&n| graph.find_edge(n, n).is_some());
        if cyclic {
            let mut ids: Vec<&str> = component.iter().map(|&n| graph[n]).collect();
            ids.sort_unstable();
            let listed = ids
                .iter()
                .map(|id| format!("'{id}'"))
                .collect::<Vec<_>>()
                .join(", ");
            diagnostics.push(Diagnostic::invariant(format!(
                "dependency cycle involving jobs {listed}"
            )));
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::RunsOn;
    use crate::step::Step;

    fn job_with_steps() -> Job {
        Job {
            runs_on: RunsOn::label("ubuntu-latest"),
            steps: vec![Step::run("echo hello")],
            ..Job::default()
        }
    }

    #[test]
    fn test_valid_workflow_passes() {
        let mut workflow = Workflow::named("CI");
        workflow.jobs.insert("build".into(), job_with_steps());
        assert!(validate(&workflow).is_empty());
        assert!(validate_job_graph(&workflow).is_empty());
    }

    #[test]
    fn test_steps_and_uses_are_exclusive() {
        let mut workflow = Workflow::named("CI");
        let mut job = job_with_steps();
        job.uses = Some("org/repo/.github/workflows/ci.yml@main".into());
        workflow.jobs.insert("build".into(), job);
        let diagnostics = validate(&workflow);
        assert!(
            diagnostics
                .iter()
                .any(|d| d.message.contains("both steps and uses"))
        );
    }

    #[test]
    fn test_missing_needs_target() {
        let mut workflow = Workflow::named("CI");
        workflow
            .jobs
            .insert("test".into(), job_with_steps().needs("build"));
        let diagnostics = validate_job_graph(&workflow);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("unknown job 'build'"));
    }

    #[test]
    fn test_cycle_mentions_both_ids() {
        let mut workflow = Workflow::named("CI");
        workflow.jobs.insert("a".into(), job_with_steps().needs("b"));
        workflow.jobs.insert("b".into(), job_with_steps().needs("a"));
        let diagnostics = validate_job_graph(&workflow);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("'a'"));
        assert!(diagnostics[0].message.contains("'b'"));
        assert_eq!(diagnostics[0].kind.as_str(), "invariant-error");
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let mut workflow = Workflow::named("CI");
        workflow.jobs.insert("a".into(), job_with_steps().needs("a"));
        let diagnostics = validate_job_graph(&workflow);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("cycle"));
    }

    #[test]
    fn test_push_include_ignore_exclusive() {
        let mut workflow = Workflow::named("CI");
        workflow.jobs.insert("build".into(), job_with_steps());
        workflow.on.push = Some(PushTrigger {
            branches: vec!["main".into()],
            branches_ignore: vec!["wip/*".into()],
            ..PushTrigger::default()
        });
        let diagnostics = validate(&workflow);
        assert!(
            diagnostics
                .iter()
                .any(|d| d.message.contains("branches and branches-ignore"))
        );
    }

    #[test]
    fn test_reserved_matrix_axis() {
        let mut workflow = Workflow::named("CI");
        let mut job = job_with_steps();
        let mut strategy = crate::job::Strategy::default();
        strategy
            .matrix
            .axes
            .insert("include".into(), vec!["x".into()]);
        job.strategy = Some(strategy);
        workflow.jobs.insert("build".into(), job);
        let diagnostics = validate(&workflow);
        assert!(
            diagnostics
                .iter()
                .any(|d| d.message.contains("reserved matrix axis"))
        );
    }

    #[test]
    fn test_diamond_is_acyclic() {
        let mut workflow = Workflow::named("CI");
        workflow.jobs.insert("build".into(), job_with_steps());
        workflow
            .jobs
            .insert("test".into(), job_with_steps().needs("build"));
        workflow.jobs.insert(
            "deploy".into(),
            job_with_steps().needs("build").needs("test"),
        );
        assert!(validate_job_graph(&workflow).is_empty());
    }
}
