//! The canonical workflow writer.

use crate::scalar;
use indexmap::IndexMap;
use tracing::debug;
use wag_model::names::yaml_key;
use wag_model::{
    Concurrency, Container, Expr, Job, JobSecrets, Permissions, PullRequestTrigger,
    PushTrigger, RunDefaults, RunsOn, Scalar, Step, Triggers, Workflow, EVENT_KINDS,
};

/// Emission failure. The emitter assumes pre-validated IR; the only thing
/// it checks itself is that every step is exactly one of run or uses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    /// A step sets neither or both of `run` and `uses`.
    #[error("job '{job}' step {index}: a step must set exactly one of run and uses")]
    InvalidStep {
        /// Id of the owning job.
        job: String,
        /// Zero-based step index.
        index: usize,
    },
}

/// Serialize a workflow to its canonical YAML byte form.
///
/// The optional reference graph names which sub-objects were declared as
/// top-level symbols; attribution never changes the emitted bytes, so an
/// absent graph produces identical output.
pub fn emit_workflow(
    workflow: &Workflow,
    references: Option<&IndexMap<String, Vec<String>>>,
) -> Result<String, EmitError> {
    if let Some(graph) = references {
        debug!(symbols = graph.len(), "emitting with symbol attribution");
    }

    let mut w = Writer::default();
    if !workflow.name.is_empty() {
        w.line(0, &format!("name: {}", scalar::quote(&workflow.name)));
    }
    emit_triggers(&mut w, &workflow.on);
    if let Some(permissions) = &workflow.permissions {
        emit_permissions(&mut w, 0, permissions);
    }
    if let Some(defaults) = &workflow.defaults {
        emit_defaults(&mut w, 0, defaults);
    }
    if let Some(concurrency) = &workflow.concurrency {
        emit_concurrency(&mut w, 0, concurrency);
    }
    emit_expr_map(&mut w, 0, "env", &workflow.env);

    if workflow.jobs.is_empty() {
        w.line(0, "jobs: {}");
    } else {
        w.line(0, "jobs:");
        for (id, job) in &workflow.jobs {
            emit_job(&mut w, id, job)?;
        }
    }
    Ok(w.out)
}

#[derive(Default)]
struct Writer {
    out: String,
}

impl Writer {
    fn line(&mut self, indent: usize, text: &str) {
        if text.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Write a sequence entry: the first line gets the `- ` marker, the
    /// rest align under it.
    fn entry(&mut self, indent: usize, lines: &[String]) {
        for (index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                self.out.push('\n');
                continue;
            }
            if index == 0 {
                for _ in 0..indent {
                    self.out.push_str("  ");
                }
                self.out.push_str("- ");
            } else {
                for _ in 0..=indent {
                    self.out.push_str("  ");
                }
            }
            self.out.push_str(line);
            self.out.push('\n');
        }
    }

    fn string_list(&mut self, indent: usize, key: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        self.line(indent, &format!("{key}:"));
        for item in items {
            self.line(indent + 1, &format!("- {}", scalar::quote(item)));
        }
    }
}

fn emit_triggers(w: &mut Writer, triggers: &Triggers) {
    if triggers.is_empty() {
        w.line(0, "on: {}");
        return;
    }
    w.line(0, "on:");
    if let Some(push) = &triggers.push {
        emit_push(w, "push", push);
    }
    if let Some(pr) = &triggers.pull_request {
        emit_pull_request(w, "pull_request", pr);
    }
    if let Some(pr) = &triggers.pull_request_target {
        emit_pull_request(w, "pull_request_target", pr);
    }
    if let Some(schedule) = &triggers.schedule {
        w.line(1, "schedule:");
        for cron in schedule {
            w.entry(2, &[format!("cron: {}", scalar::quote(&cron.cron))]);
        }
    }
    if let Some(dispatch) = &triggers.workflow_dispatch {
        if dispatch.inputs.is_empty() {
            w.line(1, "workflow_dispatch:");
        } else {
            w.line(1, "workflow_dispatch:");
            w.line(2, "inputs:");
            for (name, input) in &dispatch.inputs {
                w.line(3, &format!("{}:", scalar::quote(name)));
                if !input.description.is_empty() {
                    w.line(4, &format!("description: {}", scalar::quote(&input.description)));
                }
                if let Some(required) = input.required {
                    w.line(4, &format!("required: {required}"));
                }
                if let Some(default) = &input.default {
                    w.line(4, &format!("default: {}", scalar::render(default)));
                }
                if let Some(input_type) = &input.input_type {
                    w.line(4, &format!("type: {}", scalar::quote(input_type)));
                }
                w.string_list(4, "options", &input.options);
            }
        }
    }
    if let Some(call) = &triggers.workflow_call {
        if call.inputs.is_empty() && call.outputs.is_empty() && call.secrets.is_empty() {
            w.line(1, "workflow_call:");
        } else {
            w.line(1, "workflow_call:");
            if !call.inputs.is_empty() {
                w.line(2, "inputs:");
                for (name, input) in &call.inputs {
                    w.line(3, &format!("{}:", scalar::quote(name)));
                    if !input.description.is_empty() {
                        w.line(4, &format!("description: {}", scalar::quote(&input.description)));
                    }
                    if let Some(required) = input.required {
                        w.line(4, &format!("required: {required}"));
                    }
                    if let Some(default) = &input.default {
                        w.line(4, &format!("default: {}", scalar::render(default)));
                    }
                    if let Some(input_type) = &input.input_type {
                        w.line(4, &format!("type: {}", scalar::quote(input_type)));
                    }
                }
            }
            if !call.outputs.is_empty() {
                w.line(2, "outputs:");
                for (name, output) in &call.outputs {
                    w.line(3, &format!("{}:", scalar::quote(name)));
                    if !output.description.is_empty() {
                        w.line(4, &format!("description: {}", scalar::quote(&output.description)));
                    }
                    w.line(4, &format!("value: {}", scalar::quote(&output.value.render())));
                }
            }
            if !call.secrets.is_empty() {
                w.line(2, "secrets:");
                for (name, secret) in &call.secrets {
                    w.line(3, &format!("{}:", scalar::quote(name)));
                    if !secret.description.is_empty() {
                        w.line(4, &format!("description: {}", scalar::quote(&secret.description)));
                    }
                    if let Some(required) = secret.required {
                        w.line(4, &format!("required: {required}"));
                    }
                }
            }
        }
    }
    if let Some(run) = &triggers.workflow_run {
        w.line(1, "workflow_run:");
        w.string_list(2, "workflows", &run.workflows);
        w.string_list(2, "types", &run.types);
        w.string_list(2, "branches", &run.branches);
        w.string_list(2, "branches-ignore", &run.branches_ignore);
    }
    if let Some(dispatch) = &triggers.repository_dispatch {
        if dispatch.types.is_empty() {
            w.line(1, "repository_dispatch:");
        } else {
            w.line(1, "repository_dispatch:");
            w.string_list(2, "types", &dispatch.types);
        }
    }
    for key in EVENT_KINDS {
        let Some(Some(trigger)) = triggers.types_event(key) else {
            continue;
        };
        if trigger.types.is_empty() {
            w.line(1, &format!("{key}:"));
        } else {
            w.line(1, &format!("{key}:"));
            w.string_list(2, "types", &trigger.types);
        }
    }
}

fn emit_push(w: &mut Writer, key: &str, push: &PushTrigger) {
    if push.is_bare() {
        w.line(1, &format!("{key}:"));
        return;
    }
    w.line(1, &format!("{key}:"));
    w.string_list(2, "branches", &push.branches);
    w.string_list(2, "branches-ignore", &push.branches_ignore);
    w.string_list(2, "tags", &push.tags);
    w.string_list(2, "tags-ignore", &push.tags_ignore);
    w.string_list(2, "paths", &push.paths);
    w.string_list(2, "paths-ignore", &push.paths_ignore);
}

fn emit_pull_request(w: &mut Writer, key: &str, pr: &PullRequestTrigger) {
    if pr.is_bare() {
        w.line(1, &format!("{key}:"));
        return;
    }
    w.line(1, &format!("{key}:"));
    w.string_list(2, "branches", &pr.branches);
    w.string_list(2, "branches-ignore", &pr.branches_ignore);
    w.string_list(2, "paths", &pr.paths);
    w.string_list(2, "paths-ignore", &pr.paths_ignore);
    w.string_list(2, "types", &pr.types);
}

fn emit_permissions(w: &mut Writer, indent: usize, permissions: &Permissions) {
    if permissions.is_empty() {
        w.line(indent, "permissions: {}");
        return;
    }
    w.line(indent, "permissions:");
    for (scope, level) in permissions.entries() {
        w.line(indent + 1, &format!("{}: {}", yaml_key(scope), level.as_str()));
    }
}

fn emit_defaults(w: &mut Writer, indent: usize, defaults: &RunDefaults) {
    if defaults.is_empty() {
        return;
    }
    w.line(indent, "defaults:");
    w.line(indent + 1, "run:");
    if let Some(shell) = &defaults.shell {
        w.line(indent + 2, &format!("shell: {}", scalar::quote(shell)));
    }
    if let Some(dir) = &defaults.working_directory {
        w.line(indent + 2, &format!("working-directory: {}", scalar::quote(dir)));
    }
}

fn emit_concurrency(w: &mut Writer, indent: usize, concurrency: &Concurrency) {
    w.line(indent, "concurrency:");
    w.line(
        indent + 1,
        &format!("group: {}", scalar::quote(&concurrency.group.render())),
    );
    if let Some(cancel) = concurrency.cancel_in_progress {
        w.line(indent + 1, &format!("cancel-in-progress: {cancel}"));
    }
}

fn emit_expr_map(w: &mut Writer, indent: usize, key: &str, map: &IndexMap<String, Expr>) {
    if map.is_empty() {
        return;
    }
    w.line(indent, &format!("{key}:"));
    for (name, value) in map {
        w.line(
            indent + 1,
            &format!("{}: {}", scalar::quote(name), scalar::quote(&value.render())),
        );
    }
}

fn emit_scalar_map(w: &mut Writer, indent: usize, key: &str, map: &IndexMap<String, Scalar>) {
    if map.is_empty() {
        return;
    }
    w.line(indent, &format!("{key}:"));
    for (name, value) in map {
        w.line(
            indent + 1,
            &format!("{}: {}", scalar::quote(name), scalar::render(value)),
        );
    }
}

fn emit_job(w: &mut Writer, id: &str, job: &Job) -> Result<(), EmitError> {
    w.line(1, &format!("{}:", scalar::quote(id)));
    if let Some(name) = &job.name {
        w.line(2, &format!("name: {}", scalar::quote(name)));
    }
    match &job.runs_on {
        RunsOn::Label(label) if label.is_empty() => {}
        RunsOn::Label(label) => w.line(2, &format!("runs-on: {}", scalar::quote(label))),
        RunsOn::Labels(labels) => w.string_list(2, "runs-on", labels),
        RunsOn::Expression(expr) => {
            w.line(2, &format!("runs-on: {}", scalar::quote(&expr.render())));
        }
    }
    // A list even when the source expressed a single dependency.
    w.string_list(2, "needs", &job.needs);
    if let Some(condition) = &job.if_condition {
        w.line(2, &format!("if: {}", scalar::quote(&condition.render())));
    }
    if let Some(permissions) = &job.permissions {
        emit_permissions(w, 2, permissions);
    }
    if let Some(environment) = &job.environment {
        if let Some(url) = &environment.url {
            w.line(2, "environment:");
            w.line(3, &format!("name: {}", scalar::quote(&environment.name)));
            w.line(3, &format!("url: {}", scalar::quote(&url.render())));
        } else {
            w.line(2, &format!("environment: {}", scalar::quote(&environment.name)));
        }
    }
    if let Some(concurrency) = &job.concurrency {
        emit_concurrency(w, 2, concurrency);
    }
    emit_expr_map(w, 2, "outputs", &job.outputs);
    emit_expr_map(w, 2, "env", &job.env);
    if let Some(defaults) = &job.defaults {
        emit_defaults(w, 2, defaults);
    }
    if let Some(strategy) = &job.strategy {
        w.line(2, "strategy:");
        if !strategy.matrix.is_empty() {
            w.line(3, "matrix:");
            for (axis, values) in &strategy.matrix.axes {
                w.line(4, &format!("{}:", scalar::quote(axis)));
                for value in values {
                    w.line(5, &format!("- {}", scalar::render(value)));
                }
            }
            emit_matrix_entries(w, "include", &strategy.matrix.include);
            emit_matrix_entries(w, "exclude", &strategy.matrix.exclude);
        }
        if let Some(fail_fast) = strategy.fail_fast {
            w.line(3, &format!("fail-fast: {fail_fast}"));
        }
        if let Some(max_parallel) = strategy.max_parallel {
            w.line(3, &format!("max-parallel: {max_parallel}"));
        }
    }
    if let Some(container) = &job.container {
        w.line(2, "container:");
        emit_container(w, 3, container);
    }
    if !job.services.is_empty() {
        w.line(2, "services:");
        for (name, service) in &job.services {
            w.line(3, &format!("{}:", scalar::quote(name)));
            emit_container(w, 4, service);
        }
    }
    if let Some(uses) = &job.uses {
        w.line(2, &format!("uses: {}", scalar::quote(uses)));
    }
    emit_scalar_map(w, 2, "with", &job.with);
    match &job.secrets {
        Some(JobSecrets::Inherit) => w.line(2, "secrets: inherit"),
        Some(JobSecrets::Map(map)) => {
            if map.is_empty() {
                w.line(2, "secrets: {}");
            } else {
                w.line(2, "secrets:");
                for (name, value) in map {
                    w.line(
                        3,
                        &format!("{}: {}", scalar::quote(name), scalar::quote(&value.render())),
                    );
                }
            }
        }
        None => {}
    }
    if !job.steps.is_empty() {
        w.line(2, "steps:");
        for (index, step) in job.steps.iter().enumerate() {
            let lines = step_lines(id, index, step)?;
            w.entry(3, &lines);
        }
    }
    if let Some(timeout) = job.timeout_minutes {
        w.line(2, &format!("timeout-minutes: {timeout}"));
    }
    if let Some(continue_on_error) = job.continue_on_error {
        w.line(2, &format!("continue-on-error: {continue_on_error}"));
    }
    Ok(())
}

fn emit_matrix_entries(w: &mut Writer, key: &str, entries: &[IndexMap<String, Scalar>]) {
    if entries.is_empty() {
        return;
    }
    w.line(4, &format!("{key}:"));
    for entry in entries {
        let lines: Vec<String> = entry
            .iter()
            .map(|(k, v)| format!("{}: {}", scalar::quote(k), scalar::render(v)))
            .collect();
        w.entry(5, &lines);
    }
}

fn emit_container(w: &mut Writer, indent: usize, container: &Container) {
    w.line(indent, &format!("image: {}", scalar::quote(&container.image)));
    if let Some(credentials) = &container.credentials {
        w.line(indent, "credentials:");
        w.line(
            indent + 1,
            &format!("username: {}", scalar::quote(&credentials.username.render())),
        );
        w.line(
            indent + 1,
            &format!("password: {}", scalar::quote(&credentials.password.render())),
        );
    }
    emit_expr_map(w, indent, "env", &container.env);
    if !container.ports.is_empty() {
        w.line(indent, "ports:");
        for port in &container.ports {
            w.line(indent + 1, &format!("- {}", scalar::render(port)));
        }
    }
    w.string_list(indent, "volumes", &container.volumes);
    if let Some(options) = &container.options {
        w.line(indent, &format!("options: {}", scalar::quote(options)));
    }
}

/// Render one step as lines relative to its own sequence entry, in the
/// canonical key order.
fn step_lines(job_id: &str, index: usize, step: &Step) -> Result<Vec<String>, EmitError> {
    if step.run.is_some() == step.uses.is_some() {
        return Err(EmitError::InvalidStep {
            job: job_id.to_string(),
            index,
        });
    }
    let mut lines = Vec::new();
    if let Some(id) = &step.id {
        lines.push(format!("id: {}", scalar::quote(id)));
    }
    if let Some(name) = &step.name {
        lines.push(format!("name: {}", scalar::quote(name)));
    }
    if let Some(condition) = &step.if_condition {
        lines.push(format!("if: {}", scalar::quote(&condition.render())));
    }
    if let Some(uses) = &step.uses {
        lines.push(format!("uses: {}", scalar::quote(uses)));
    }
    if !step.with.is_empty() {
        lines.push("with:".to_string());
        for (key, value) in &step.with {
            lines.push(format!("  {}: {}", scalar::quote(key), scalar::render(value)));
        }
    }
    if let Some(run) = &step.run {
        if run.contains('\n') {
            let style = if run.ends_with('\n') { "|" } else { "|-" };
            lines.push(format!("run: {style}"));
            for body_line in run.trim_end_matches('\n').split('\n') {
                if body_line.is_empty() {
                    lines.push(String::new());
                } else {
                    lines.push(format!("  {body_line}"));
                }
            }
        } else {
            lines.push(format!("run: {}", scalar::quote(run)));
        }
    }
    if let Some(shell) = &step.shell {
        lines.push(format!("shell: {}", scalar::quote(shell)));
    }
    if !step.env.is_empty() {
        lines.push("env:".to_string());
        for (key, value) in &step.env {
            lines.push(format!("  {}: {}", scalar::quote(key), scalar::quote(&value.render())));
        }
    }
    if let Some(dir) = &step.working_directory {
        lines.push(format!("working-directory: {}", scalar::quote(dir)));
    }
    if let Some(continue_on_error) = step.continue_on_error {
        lines.push(format!("continue-on-error: {continue_on_error}"));
    }
    if let Some(timeout) = step.timeout_minutes {
        lines.push(format!("timeout-minutes: {timeout}"));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wag_model::{Cron, TypesTrigger};

    fn minimal() -> Workflow {
        let mut workflow = Workflow::named("CI");
        workflow.on.push = Some(PushTrigger {
            branches: vec!["main".into()],
            ..PushTrigger::default()
        });
        workflow.jobs.insert(
            "build".into(),
            Job::on("ubuntu-latest", [Step::run("echo hello")]),
        );
        workflow
    }

    #[test]
    fn test_minimal_workflow_bytes() {
        let yaml = emit_workflow(&minimal(), None).unwrap();
        assert_eq!(
            yaml,
            "name: CI\n\
             on:\n\
             \x20 push:\n\
             \x20   branches:\n\
             \x20     - main\n\
             jobs:\n\
             \x20 build:\n\
             \x20   runs-on: ubuntu-latest\n\
             \x20   steps:\n\
             \x20     - run: echo hello\n"
        );
    }

    #[test]
    fn test_empty_triggers_emit_empty_mapping() {
        let mut workflow = Workflow::named("X");
        workflow.jobs.insert(
            "a".into(),
            Job::on("ubuntu-latest", [Step::run("true")]),
        );
        let yaml = emit_workflow(&workflow, None).unwrap();
        assert!(yaml.contains("on: {}\n"));
    }

    #[test]
    fn test_bare_and_typed_triggers() {
        let mut workflow = minimal();
        workflow.on.push = Some(PushTrigger::default());
        workflow.on.issues = Some(TypesTrigger::with_types(["opened"]));
        workflow.on.merge_group = Some(TypesTrigger::bare());
        let yaml = emit_workflow(&workflow, None).unwrap();
        assert!(yaml.contains("on:\n  push:\n"));
        assert!(yaml.contains("  issues:\n    types:\n      - opened\n"));
        assert!(yaml.contains("  merge_group:\n"));
    }

    #[test]
    fn test_needs_emitted_as_list() {
        let mut workflow = minimal();
        workflow.jobs.insert(
            "test".into(),
            Job::on("ubuntu-latest", [Step::run("cargo test")]).needs("build"),
        );
        workflow.jobs.insert(
            "deploy".into(),
            Job::on("ubuntu-latest", [Step::run("make deploy")])
                .needs("build")
                .needs("test"),
        );
        let yaml = emit_workflow(&workflow, None).unwrap();
        assert!(yaml.contains("  test:\n    runs-on: ubuntu-latest\n    needs:\n      - build\n"));
        assert!(yaml.contains("    needs:\n      - build\n      - test\n"));
    }

    #[test]
    fn test_multiline_run_block_scalar() {
        let mut workflow = minimal();
        workflow.jobs.insert(
            "lint".into(),
            Job::on("ubuntu-latest", [Step::run("cargo fmt --check\ncargo clippy\n")]),
        );
        let yaml = emit_workflow(&workflow, None).unwrap();
        assert!(yaml.contains(
            "    steps:\n      - run: |\n          cargo fmt --check\n          cargo clippy\n"
        ));

        workflow.jobs.insert(
            "lint".into(),
            Job::on("ubuntu-latest", [Step::run("a\nb")]),
        );
        let yaml = emit_workflow(&workflow, None).unwrap();
        assert!(yaml.contains("- run: |-\n          a\n          b\n"));
    }

    #[test]
    fn test_step_key_order() {
        let step = Step::uses("actions/checkout@v4")
            .with_id("checkout")
            .with_name("Checkout")
            .with_input("fetch-depth", 0_i64);
        let mut workflow = minimal();
        workflow.jobs.insert("co".into(), Job::on("ubuntu-latest", [step]));
        let yaml = emit_workflow(&workflow, None).unwrap();
        assert!(yaml.contains(
            "      - id: checkout\n        name: Checkout\n        uses: actions/checkout@v4\n        with:\n          fetch-depth: 0\n"
        ));
    }

    #[test]
    fn test_matrix_and_strategy() {
        let mut job = Job::on("${{ matrix.os }}", [Step::run("cargo test")]);
        job.runs_on = RunsOn::Expression(Expr::context("matrix.os"));
        let mut strategy = wag_model::Strategy::default();
        strategy.matrix.axes.insert(
            "go".into(),
            vec![Scalar::String("1.22".into()), Scalar::String("1.23".into())],
        );
        strategy.matrix.axes.insert(
            "os".into(),
            vec!["ubuntu-latest".into(), "macos-latest".into()],
        );
        strategy.matrix.include.push(IndexMap::from([
            ("os".to_string(), Scalar::String("windows-latest".into())),
            ("go".to_string(), Scalar::String("1.23".into())),
        ]));
        strategy.fail_fast = Some(false);
        job.strategy = Some(strategy);
        let mut workflow = minimal();
        workflow.jobs.insert("test".into(), job);
        let yaml = emit_workflow(&workflow, None).unwrap();
        assert!(yaml.contains(
            "    strategy:\n      matrix:\n        go:\n          - '1.22'\n          - '1.23'\n        os:\n          - ubuntu-latest\n          - macos-latest\n        include:\n          - os: windows-latest\n            go: '1.23'\n      fail-fast: false\n"
        ));
        assert!(yaml.contains("    runs-on: ${{ matrix.os }}\n"));
    }

    #[test]
    fn test_reusable_job() {
        let mut job = Job::reusable("org/repo/.github/workflows/deploy.yml@v1");
        job.with.insert("env".into(), Scalar::String("prod".into()));
        job.secrets = Some(JobSecrets::Inherit);
        let mut workflow = minimal();
        workflow.jobs.insert("deploy".into(), job);
        let yaml = emit_workflow(&workflow, None).unwrap();
        assert!(yaml.contains(
            "  deploy:\n    uses: org/repo/.github/workflows/deploy.yml@v1\n    with:\n      env: prod\n    secrets: inherit\n"
        ));
    }

    #[test]
    fn test_invalid_step_fails_fast() {
        let mut step = Step::run("echo hi");
        step.uses = Some("actions/checkout@v4".into());
        let mut workflow = minimal();
        workflow.jobs.insert("bad".into(), Job::on("ubuntu-latest", [step]));
        let err = emit_workflow(&workflow, None).unwrap_err();
        assert_eq!(
            err,
            EmitError::InvalidStep {
                job: "bad".into(),
                index: 0
            }
        );
    }

    #[test]
    fn test_schedule_and_permissions_and_concurrency() {
        let mut workflow = minimal();
        workflow.on.schedule = Some(vec![Cron::new("0 4 * * 1")]);
        let mut permissions = Permissions::default();
        permissions.set("contents", wag_model::PermissionLevel::Read);
        permissions.set("id_token", wag_model::PermissionLevel::Write);
        workflow.permissions = Some(permissions);
        workflow.concurrency = Some(
            Concurrency::group(Expr::context("github.workflow")).cancel_in_progress(),
        );
        let yaml = emit_workflow(&workflow, None).unwrap();
        assert!(yaml.contains("  schedule:\n    - cron: 0 4 * * 1\n"));
        assert!(yaml.contains("permissions:\n  contents: read\n  id-token: write\n"));
        assert!(yaml.contains(
            "concurrency:\n  group: ${{ github.workflow }}\n  cancel-in-progress: true\n"
        ));
    }

    #[test]
    fn test_two_emissions_are_identical() {
        let workflow = minimal();
        let first = emit_workflow(&workflow, None).unwrap();
        let second = emit_workflow(&workflow, None).unwrap();
        assert_eq!(first, second);
    }
}
