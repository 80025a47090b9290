//! Typed source generation from the IR.
//!
//! The generated source re-creates the sharing structure of the original
//! document: every job, every job's step list, and every non-bare trigger
//! payload gets its own `LazyLock` static, and the workflow literal refers
//! to those statics. Generated files carry no header comment so that a
//! build of the generated source reproduces the input YAML byte for byte.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use wag_model::names::identifier;
use wag_model::{
    Container, Expr, Job, JobSecrets, Permissions, PullRequestTrigger, PushTrigger,
    RunsOn, Scalar, Step, Workflow, EVENT_KINDS,
};

/// Where the generated declarations land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLayout {
    /// All declarations in a single `workflows.rs`.
    SingleFile,
    /// The four-file convention: `workflows.rs`, `triggers.rs`, `jobs.rs`,
    /// `steps.rs`.
    Split,
}

/// One generated source file, named relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name, e.g. `workflows.rs`.
    pub name: String,
    /// Full file contents.
    pub contents: String,
}

/// Generate typed source declaring the given workflows.
#[must_use]
pub fn generate_workflows(workflows: &[Workflow], layout: SourceLayout) -> Vec<GeneratedFile> {
    let mut generator = Generator::default();
    for workflow in workflows {
        generator.workflow(workflow);
    }
    let files = generator.finish(layout);
    tracing::debug!(
        workflows = workflows.len(),
        files = files.len(),
        "source generated"
    );
    files
}

/// A code fragment plus the model types it mentions, so file headers can
/// import exactly what they use.
#[derive(Default)]
struct Code {
    lines: Vec<String>,
    types: BTreeSet<&'static str>,
    maps: bool,
}

impl Code {
    fn line(&mut self, indent: usize, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{text}", "    ".repeat(indent)));
        }
    }

    fn ty(&mut self, name: &'static str) -> &'static str {
        self.types.insert(name);
        name
    }
}

#[derive(Default)]
struct Generator {
    used: HashSet<String>,
    triggers: Vec<Code>,
    steps: Vec<Code>,
    jobs: Vec<Code>,
    workflows: Vec<Code>,
    shared_steps: Vec<(Vec<Step>, String)>,
}

impl Generator {
    fn claim(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{base}{counter}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn workflow(&mut self, workflow: &Workflow) {
        let symbol = self.claim(&identifier(&workflow.name));
        let trigger_refs = self.trigger_refs(&symbol, workflow);

        let mut job_refs: Vec<(String, String)> = Vec::new();
        for (id, job) in &workflow.jobs {
            let job_symbol = self.claim(&identifier(id));
            let steps_ref = self.steps_symbol(&job_symbol, &job.steps);
            let block = job_block(&job_symbol, job, steps_ref.as_deref());
            self.jobs.push(block);
            job_refs.push((id.clone(), job_symbol));
        }

        self.workflows
            .push(workflow_block(&symbol, workflow, &trigger_refs, &job_refs));
    }

    /// Render every trigger slot to the expression the workflow literal
    /// uses for it, generating payload statics for the non-bare ones.
    fn trigger_refs(&mut self, workflow_symbol: &str, workflow: &Workflow) -> Vec<(&'static str, String)> {
        let on = &workflow.on;
        let mut refs = Vec::new();

        if let Some(push) = &on.push {
            refs.push(("push", self.push_ref(workflow_symbol, "Push", push)));
        }
        if let Some(pr) = &on.pull_request {
            refs.push((
                "pull_request",
                self.pull_request_ref(workflow_symbol, "PullRequest", pr),
            ));
        }
        if let Some(pr) = &on.pull_request_target {
            refs.push((
                "pull_request_target",
                self.pull_request_ref(workflow_symbol, "PullRequestTarget", pr),
            ));
        }
        if let Some(schedule) = &on.schedule {
            let symbol = self.claim(&format!("{workflow_symbol}Schedule"));
            let mut code = Code::default();
            let cron_ty = code.ty("Cron");
            let entries: Vec<String> = schedule
                .iter()
                .map(|entry| format!("{cron_ty}::new({})", string_lit(&entry.cron)))
                .collect();
            code.line(
                0,
                format!(
                    "pub static {symbol}: LazyLock<Vec<{cron_ty}>> = LazyLock::new(|| vec![{}]);",
                    entries.join(", ")
                ),
            );
            code.line(0, "");
            self.triggers.push(code);
            refs.push(("schedule", format!("Some({symbol}.clone())")));
        }
        if let Some(dispatch) = &on.workflow_dispatch {
            if dispatch.inputs.is_empty() {
                refs.push(("workflow_dispatch", "Some(WorkflowDispatch::default())".into()));
            } else {
                let symbol = self.claim(&format!("{workflow_symbol}Dispatch"));
                self.triggers.push(dispatch_block(&symbol, dispatch));
                refs.push(("workflow_dispatch", format!("Some({symbol}.clone())")));
            }
        }
        if let Some(call) = &on.workflow_call {
            if call.inputs.is_empty() && call.outputs.is_empty() && call.secrets.is_empty() {
                refs.push(("workflow_call", "Some(WorkflowCall::default())".into()));
            } else {
                let symbol = self.claim(&format!("{workflow_symbol}Call"));
                self.triggers.push(call_block(&symbol, call));
                refs.push(("workflow_call", format!("Some({symbol}.clone())")));
            }
        }
        if let Some(run) = &on.workflow_run {
            let symbol = self.claim(&format!("{workflow_symbol}WorkflowRun"));
            let mut code = Code::default();
            let ty = code.ty("WorkflowRun");
            code.line(
                0,
                format!("pub static {symbol}: LazyLock<{ty}> = LazyLock::new(|| {ty} {{"),
            );
            if !run.workflows.is_empty() {
                code.line(1, format!("workflows: {},", string_vec(&run.workflows)));
            }
            if !run.types.is_empty() {
                code.line(1, format!("types: {},", string_vec(&run.types)));
            }
            if !run.branches.is_empty() {
                code.line(1, format!("branches: {},", string_vec(&run.branches)));
            }
            if !run.branches_ignore.is_empty() {
                code.line(
                    1,
                    format!("branches_ignore: {},", string_vec(&run.branches_ignore)),
                );
            }
            code.line(1, format!("..{ty}::default()"));
            code.line(0, "});");
            code.line(0, "");
            self.triggers.push(code);
            refs.push(("workflow_run", format!("Some({symbol}.clone())")));
        }
        if let Some(dispatch) = &on.repository_dispatch {
            if dispatch.types.is_empty() {
                refs.push((
                    "repository_dispatch",
                    "Some(RepositoryDispatch::default())".into(),
                ));
            } else {
                let symbol = self.claim(&format!("{workflow_symbol}RepositoryDispatch"));
                let mut code = Code::default();
                let ty = code.ty("RepositoryDispatch");
                code.line(
                    0,
                    format!(
                        "pub static {symbol}: LazyLock<{ty}> = LazyLock::new(|| {ty} {{ types: {} }});",
                        string_vec(&dispatch.types)
                    ),
                );
                code.line(0, "");
                self.triggers.push(code);
                refs.push(("repository_dispatch", format!("Some({symbol}.clone())")));
            }
        }
        for key in EVENT_KINDS {
            let Some(Some(trigger)) = on.types_event(key) else {
                continue;
            };
            if trigger.types.is_empty() {
                refs.push((key, "Some(TypesTrigger::bare())".into()));
            } else {
                let symbol = self.claim(&format!("{workflow_symbol}{}", identifier(key)));
                let mut code = Code::default();
                let ty = code.ty("TypesTrigger");
                let types: Vec<String> = trigger.types.iter().map(|t| string_lit(t)).collect();
                code.line(
                    0,
                    format!(
                        "pub static {symbol}: LazyLock<{ty}> = LazyLock::new(|| {ty}::with_types([{}]));",
                        types.join(", ")
                    ),
                );
                code.line(0, "");
                self.triggers.push(code);
                refs.push((key, format!("Some({symbol}.clone())")));
            }
        }
        refs
    }

    fn push_ref(&mut self, workflow_symbol: &str, suffix: &str, push: &PushTrigger) -> String {
        if push.is_bare() {
            return "Some(PushTrigger::default())".into();
        }
        let symbol = self.claim(&format!("{workflow_symbol}{suffix}"));
        let mut code = Code::default();
        let ty = code.ty("PushTrigger");
        code.line(
            0,
            format!("pub static {symbol}: LazyLock<{ty}> = LazyLock::new(|| {ty} {{"),
        );
        for (field, values) in [
            ("branches", &push.branches),
            ("branches_ignore", &push.branches_ignore),
            ("tags", &push.tags),
            ("tags_ignore", &push.tags_ignore),
            ("paths", &push.paths),
            ("paths_ignore", &push.paths_ignore),
        ] {
            if !values.is_empty() {
                code.line(1, format!("{field}: {},", string_vec(values)));
            }
        }
        code.line(1, format!("..{ty}::default()"));
        code.line(0, "});");
        code.line(0, "");
        self.triggers.push(code);
        format!("Some({symbol}.clone())")
    }

    fn pull_request_ref(
        &mut self,
        workflow_symbol: &str,
        suffix: &str,
        pr: &PullRequestTrigger,
    ) -> String {
        if pr.is_bare() {
            return "Some(PullRequestTrigger::default())".into();
        }
        let symbol = self.claim(&format!("{workflow_symbol}{suffix}"));
        let mut code = Code::default();
        let ty = code.ty("PullRequestTrigger");
        code.line(
            0,
            format!("pub static {symbol}: LazyLock<{ty}> = LazyLock::new(|| {ty} {{"),
        );
        for (field, values) in [
            ("branches", &pr.branches),
            ("branches_ignore", &pr.branches_ignore),
            ("paths", &pr.paths),
            ("paths_ignore", &pr.paths_ignore),
            ("types", &pr.types),
        ] {
            if !values.is_empty() {
                code.line(1, format!("{field}: {},", string_vec(values)));
            }
        }
        code.line(1, format!("..{ty}::default()"));
        code.line(0, "});");
        code.line(0, "");
        self.triggers.push(code);
        format!("Some({symbol}.clone())")
    }

    /// The steps static for a job, deduplicated by value so two jobs with
    /// identical step lists share one symbol.
    fn steps_symbol(&mut self, job_symbol: &str, steps: &[Step]) -> Option<String> {
        if steps.is_empty() {
            return None;
        }
        for (existing, symbol) in &self.shared_steps {
            if existing == steps {
                return Some(symbol.clone());
            }
        }
        let symbol = self.claim(&format!("{job_symbol}Steps"));
        let mut code = Code::default();
        let ty = code.ty("Step");
        code.line(
            0,
            format!("pub static {symbol}: LazyLock<Vec<{ty}>> = LazyLock::new(|| {{"),
        );
        code.line(1, "vec![");
        for step in steps {
            step_literal(&mut code, 2, step);
        }
        code.line(1, "]");
        code.line(0, "});");
        code.line(0, "");
        self.shared_steps.push((steps.to_vec(), symbol.clone()));
        self.steps.push(code);
        Some(symbol)
    }

    fn finish(self, layout: SourceLayout) -> Vec<GeneratedFile> {
        match layout {
            SourceLayout::SingleFile => {
                let mut blocks = Vec::new();
                blocks.extend(self.triggers);
                blocks.extend(self.steps);
                blocks.extend(self.jobs);
                blocks.extend(self.workflows);
                vec![assemble("workflows.rs", &blocks, &[])]
            }
            SourceLayout::Split => {
                let mut files = Vec::new();
                if !self.triggers.is_empty() {
                    files.push(assemble("triggers.rs", &self.triggers, &[]));
                }
                if !self.steps.is_empty() {
                    files.push(assemble("steps.rs", &self.steps, &[]));
                }
                let mut job_uses = Vec::new();
                if !self.steps.is_empty() {
                    job_uses.push("use crate::steps::*;");
                }
                files.push(assemble("jobs.rs", &self.jobs, &job_uses));
                let mut workflow_uses = Vec::new();
                if !self.triggers.is_empty() {
                    workflow_uses.push("use crate::triggers::*;");
                }
                workflow_uses.push("use crate::jobs::*;");
                files.push(assemble("workflows.rs", &self.workflows, &workflow_uses));
                files
            }
        }
    }
}

fn assemble(name: &str, blocks: &[Code], crate_uses: &[&str]) -> GeneratedFile {
    let mut types: BTreeSet<&'static str> = BTreeSet::new();
    let mut maps = false;
    for block in blocks {
        types.extend(&block.types);
        maps |= block.maps;
    }

    let mut contents = String::new();
    contents.push_str("#![allow(non_upper_case_globals)]\n\n");
    contents.push_str("use std::sync::LazyLock;\n\n");
    if maps {
        contents.push_str("use indexmap::IndexMap;\n");
    }
    if !types.is_empty() {
        let list: Vec<&str> = types.iter().copied().collect();
        contents.push_str(&format!("use wag_model::{{{}}};\n", list.join(", ")));
    }
    for import in crate_uses {
        contents.push_str(import);
        contents.push('\n');
    }
    contents.push('\n');
    for block in blocks {
        for line in &block.lines {
            contents.push_str(line);
            contents.push('\n');
        }
    }
    while contents.ends_with("\n\n") {
        contents.pop();
    }
    GeneratedFile {
        name: name.to_string(),
        contents,
    }
}

fn workflow_block(
    symbol: &str,
    workflow: &Workflow,
    trigger_refs: &[(&'static str, String)],
    job_refs: &[(String, String)],
) -> Code {
    let mut code = Code::default();
    let ty = code.ty("Workflow");
    code.line(
        0,
        format!("pub static {symbol}: LazyLock<{ty}> = LazyLock::new(|| {ty} {{"),
    );
    if !workflow.name.is_empty() {
        code.line(1, format!("name: {},", string_expr(&workflow.name)));
    }
    let triggers_ty = code.ty("Triggers");
    if trigger_refs.is_empty() {
        code.line(1, format!("on: {triggers_ty}::default(),"));
    } else {
        code.line(1, format!("on: {triggers_ty} {{"));
        for (field, value) in trigger_refs {
            note_trigger_types(&mut code, value);
            code.line(2, format!("{field}: {value},"));
        }
        code.line(2, format!("..{triggers_ty}::default()"));
        code.line(1, "},");
    }
    if let Some(permissions) = &workflow.permissions {
        permissions_field(&mut code, 1, permissions);
    }
    if let Some(defaults) = &workflow.defaults {
        let ty = code.ty("RunDefaults");
        code.line(1, format!("defaults: Some({ty} {{"));
        code.line(2, format!("shell: {},", opt_string_expr(defaults.shell.as_deref())));
        code.line(
            2,
            format!(
                "working_directory: {},",
                opt_string_expr(defaults.working_directory.as_deref())
            ),
        );
        code.line(1, "}),");
    }
    if let Some(concurrency) = &workflow.concurrency {
        concurrency_field(&mut code, 1, concurrency);
    }
    if !workflow.env.is_empty() {
        expr_map_field(&mut code, 1, "env", &workflow.env, false);
    }
    if job_refs.is_empty() {
        code.maps = true;
        code.line(1, "jobs: IndexMap::new(),");
    } else {
        code.maps = true;
        code.line(1, "jobs: IndexMap::from([");
        for (id, job_symbol) in job_refs {
            code.line(2, format!("({}, {job_symbol}.clone()),", string_expr(id)));
        }
        code.line(1, "]),");
    }
    code.line(1, format!("..{ty}::default()"));
    code.line(0, "});");
    code.line(0, "");
    code
}

/// Bare trigger references mention their payload type inline; make sure
/// the file imports it.
fn note_trigger_types(code: &mut Code, rendered: &str) {
    for ty in [
        "PushTrigger",
        "PullRequestTrigger",
        "TypesTrigger",
        "WorkflowDispatch",
        "WorkflowCall",
        "RepositoryDispatch",
    ] {
        if rendered.contains(ty) {
            code.ty(ty);
        }
    }
}

#[allow(clippy::too_many_lines)]
fn job_block(symbol: &str, job: &Job, steps_ref: Option<&str>) -> Code {
    let mut code = Code::default();
    let ty = code.ty("Job");
    code.line(
        0,
        format!("pub static {symbol}: LazyLock<{ty}> = LazyLock::new(|| {ty} {{"),
    );
    if let Some(name) = &job.name {
        code.line(1, format!("name: Some({}),", string_expr(name)));
    }
    match &job.runs_on {
        RunsOn::Label(label) if label.is_empty() => {}
        RunsOn::Label(label) => {
            let runs_on = code.ty("RunsOn");
            code.line(1, format!("runs_on: {runs_on}::Label({}),", string_expr(label)));
        }
        RunsOn::Labels(labels) => {
            let runs_on = code.ty("RunsOn");
            code.line(1, format!("runs_on: {runs_on}::Labels({}),", string_vec(labels)));
        }
        RunsOn::Expression(expr) => {
            let runs_on = code.ty("RunsOn");
            let expr = expr_literal(&mut code.types, expr);
            code.line(1, format!("runs_on: {runs_on}::Expression({expr}),"));
        }
    }
    if !job.needs.is_empty() {
        code.line(1, format!("needs: {},", string_vec(&job.needs)));
    }
    if let Some(condition) = &job.if_condition {
        let condition = expr_literal(&mut code.types, condition);
        code.line(1, format!("if_condition: Some({condition}),"));
    }
    if let Some(permissions) = &job.permissions {
        permissions_field(&mut code, 1, permissions);
    }
    if let Some(environment) = &job.environment {
        let env_ty = code.ty("JobEnvironment");
        let url = match &environment.url {
            Some(url) => format!("Some({})", expr_literal(&mut code.types, url)),
            None => "None".to_string(),
        };
        code.line(
            1,
            format!(
                "environment: Some({env_ty} {{ name: {}, url: {url} }}),",
                string_expr(&environment.name)
            ),
        );
    }
    if let Some(concurrency) = &job.concurrency {
        concurrency_field(&mut code, 1, concurrency);
    }
    if !job.outputs.is_empty() {
        expr_map_field(&mut code, 1, "outputs", &job.outputs, false);
    }
    if !job.env.is_empty() {
        expr_map_field(&mut code, 1, "env", &job.env, false);
    }
    if let Some(defaults) = &job.defaults {
        let defaults_ty = code.ty("RunDefaults");
        code.line(1, format!("defaults: Some({defaults_ty} {{"));
        code.line(2, format!("shell: {},", opt_string_expr(defaults.shell.as_deref())));
        code.line(
            2,
            format!(
                "working_directory: {},",
                opt_string_expr(defaults.working_directory.as_deref())
            ),
        );
        code.line(1, "}),");
    }
    if let Some(strategy) = &job.strategy {
        let strategy_ty = code.ty("Strategy");
        code.line(1, format!("strategy: Some({strategy_ty} {{"));
        if !strategy.matrix.is_empty() {
            let matrix_ty = code.ty("Matrix");
            code.line(2, format!("matrix: {matrix_ty} {{"));
            if !strategy.matrix.axes.is_empty() {
                code.maps = true;
                code.line(3, "axes: IndexMap::from([");
                for (axis, values) in &strategy.matrix.axes {
                    let rendered: Vec<String> = values.iter().map(scalar_expr).collect();
                    code.line(
                        4,
                        format!("({}, vec![{}]),", string_expr(axis), rendered.join(", ")),
                    );
                }
                code.line(3, "]),");
            }
            matrix_entries_field(&mut code, 3, "include", &strategy.matrix.include);
            matrix_entries_field(&mut code, 3, "exclude", &strategy.matrix.exclude);
            code.line(3, format!("..{matrix_ty}::default()"));
            code.line(2, "},");
        }
        if let Some(fail_fast) = strategy.fail_fast {
            code.line(2, format!("fail_fast: Some({fail_fast}),"));
        }
        if let Some(max_parallel) = strategy.max_parallel {
            code.line(2, format!("max_parallel: Some({max_parallel}),"));
        }
        code.line(2, format!("..{strategy_ty}::default()"));
        code.line(1, "}),");
    }
    if let Some(container) = &job.container {
        code.line(1, "container: Some(");
        container_literal(&mut code, 2, container);
        code.line(1, "),");
    }
    if !job.services.is_empty() {
        code.maps = true;
        code.line(1, "services: IndexMap::from([");
        for (name, service) in &job.services {
            code.line(2, format!("({},", string_expr(name)));
            container_literal(&mut code, 3, service);
            code.line(2, "),");
        }
        code.line(1, "]),");
    }
    if let Some(uses) = &job.uses {
        code.line(1, format!("uses: Some({}),", string_expr(uses)));
    }
    if !job.with.is_empty() {
        scalar_map_field(&mut code, 1, "with", &job.with, true);
    }
    match &job.secrets {
        Some(JobSecrets::Inherit) => {
            let secrets_ty = code.ty("JobSecrets");
            code.line(1, format!("secrets: Some({secrets_ty}::Inherit),"));
        }
        Some(JobSecrets::Map(map)) => {
            let secrets_ty = code.ty("JobSecrets");
            code.maps = true;
            code.line(1, format!("secrets: Some({secrets_ty}::Map(IndexMap::from(["));
            for (name, value) in map {
                let value = expr_literal(&mut code.types, value);
                code.line(2, format!("({}, {value}),", string_expr(name)));
            }
            code.line(1, "]))),");
        }
        None => {}
    }
    if let Some(steps) = steps_ref {
        code.line(1, format!("steps: {steps}.clone(),"));
    }
    if let Some(timeout) = job.timeout_minutes {
        code.line(1, format!("timeout_minutes: Some({timeout}),"));
    }
    if let Some(continue_on_error) = job.continue_on_error {
        code.line(1, format!("continue_on_error: Some({continue_on_error}),"));
    }
    code.line(1, format!("..{ty}::default()"));
    code.line(0, "});");
    code.line(0, "");
    code
}

fn step_literal(code: &mut Code, indent: usize, step: &Step) {
    let ty = code.ty("Step");
    code.line(indent, format!("{ty} {{"));
    if let Some(id) = &step.id {
        code.line(indent + 1, format!("id: Some({}),", string_expr(id)));
    }
    if let Some(name) = &step.name {
        code.line(indent + 1, format!("name: Some({}),", string_expr(name)));
    }
    if let Some(condition) = &step.if_condition {
        let condition = expr_literal(&mut code.types, condition);
        code.line(indent + 1, format!("if_condition: Some({condition}),"));
    }
    if let Some(uses) = &step.uses {
        code.line(indent + 1, format!("uses: Some({}),", string_expr(uses)));
    }
    if !step.with.is_empty() {
        scalar_map_field(code, indent + 1, "with", &step.with, true);
    }
    if let Some(run) = &step.run {
        code.line(indent + 1, format!("run: Some({}),", string_expr(run)));
    }
    if let Some(shell) = &step.shell {
        code.line(indent + 1, format!("shell: Some({}),", string_expr(shell)));
    }
    if !step.env.is_empty() {
        expr_map_field(code, indent + 1, "env", &step.env, true);
    }
    if let Some(dir) = &step.working_directory {
        code.line(
            indent + 1,
            format!("working_directory: Some({}),", string_expr(dir)),
        );
    }
    if let Some(continue_on_error) = step.continue_on_error {
        code.line(
            indent + 1,
            format!("continue_on_error: Some({continue_on_error}),"),
        );
    }
    if let Some(timeout) = step.timeout_minutes {
        code.line(indent + 1, format!("timeout_minutes: Some({timeout}),"));
    }
    code.line(indent + 1, format!("..{ty}::default()"));
    code.line(indent, "},");
}

fn container_literal(code: &mut Code, indent: usize, container: &Container) {
    let ty = code.ty("Container");
    code.line(indent, format!("{ty} {{"));
    code.line(indent + 1, format!("image: {},", string_expr(&container.image)));
    if let Some(credentials) = &container.credentials {
        let cred_ty = code.ty("ContainerCredentials");
        let username = expr_literal(&mut code.types, &credentials.username);
        let password = expr_literal(&mut code.types, &credentials.password);
        code.line(
            indent + 1,
            format!(
                "credentials: Some({cred_ty} {{ username: {username}, password: {password} }}),"
            ),
        );
    }
    if !container.env.is_empty() {
        expr_map_field(code, indent + 1, "env", &container.env, false);
    }
    if !container.ports.is_empty() {
        let ports: Vec<String> = container.ports.iter().map(scalar_expr).collect();
        code.line(indent + 1, format!("ports: vec![{}],", ports.join(", ")));
    }
    if !container.volumes.is_empty() {
        code.line(indent + 1, format!("volumes: {},", string_vec(&container.volumes)));
    }
    if let Some(options) = &container.options {
        code.line(indent + 1, format!("options: Some({}),", string_expr(options)));
    }
    code.line(indent + 1, format!("..{ty}::default()"));
    code.line(indent, "}");
}

fn dispatch_block(symbol: &str, dispatch: &wag_model::WorkflowDispatch) -> Code {
    let mut code = Code::default();
    let ty = code.ty("WorkflowDispatch");
    let input_ty = code.ty("DispatchInput");
    code.maps = true;
    code.line(
        0,
        format!("pub static {symbol}: LazyLock<{ty}> = LazyLock::new(|| {ty} {{"),
    );
    code.line(1, "inputs: IndexMap::from([");
    for (name, input) in &dispatch.inputs {
        code.line(2, format!("({}, {input_ty} {{", string_expr(name)));
        if !input.description.is_empty() {
            code.line(3, format!("description: {},", string_expr(&input.description)));
        }
        if let Some(required) = input.required {
            code.line(3, format!("required: Some({required}),"));
        }
        if let Some(default) = &input.default {
            code.line(3, format!("default: Some({}),", scalar_expr(default)));
        }
        if let Some(input_type) = &input.input_type {
            code.line(3, format!("input_type: Some({}),", string_expr(input_type)));
        }
        if !input.options.is_empty() {
            code.line(3, format!("options: {},", string_vec(&input.options)));
        }
        code.line(3, format!("..{input_ty}::default()"));
        code.line(2, "}),");
    }
    code.line(1, "]),");
    code.line(0, "});");
    code.line(0, "");
    code
}

fn call_block(symbol: &str, call: &wag_model::WorkflowCall) -> Code {
    let mut code = Code::default();
    let ty = code.ty("WorkflowCall");
    code.line(
        0,
        format!("pub static {symbol}: LazyLock<{ty}> = LazyLock::new(|| {ty} {{"),
    );
    if !call.inputs.is_empty() {
        let input_ty = code.ty("WorkflowCallInput");
        code.maps = true;
        code.line(1, "inputs: IndexMap::from([");
        for (name, input) in &call.inputs {
            code.line(2, format!("({}, {input_ty} {{", string_expr(name)));
            if !input.description.is_empty() {
                code.line(3, format!("description: {},", string_expr(&input.description)));
            }
            if let Some(required) = input.required {
                code.line(3, format!("required: Some({required}),"));
            }
            if let Some(default) = &input.default {
                code.line(3, format!("default: Some({}),", scalar_expr(default)));
            }
            if let Some(input_type) = &input.input_type {
                code.line(3, format!("input_type: Some({}),", string_expr(input_type)));
            }
            code.line(3, format!("..{input_ty}::default()"));
            code.line(2, "}),");
        }
        code.line(1, "]),");
    }
    if !call.outputs.is_empty() {
        let output_ty = code.ty("WorkflowCallOutput");
        code.maps = true;
        code.line(1, "outputs: IndexMap::from([");
        for (name, output) in &call.outputs {
            let value = expr_literal(&mut code.types, &output.value);
            code.line(2, format!("({}, {output_ty} {{", string_expr(name)));
            code.line(3, format!("description: {},", string_expr(&output.description)));
            code.line(3, format!("value: {value},"));
            code.line(2, "}),");
        }
        code.line(1, "]),");
    }
    if !call.secrets.is_empty() {
        let secret_ty = code.ty("WorkflowCallSecret");
        code.maps = true;
        code.line(1, "secrets: IndexMap::from([");
        for (name, secret) in &call.secrets {
            code.line(2, format!("({}, {secret_ty} {{", string_expr(name)));
            if !secret.description.is_empty() {
                code.line(3, format!("description: {},", string_expr(&secret.description)));
            }
            if let Some(required) = secret.required {
                code.line(3, format!("required: Some({required}),"));
            }
            code.line(3, format!("..{secret_ty}::default()"));
            code.line(2, "}),");
        }
        code.line(1, "]),");
    }
    code.line(1, format!("..{ty}::default()"));
    code.line(0, "});");
    code.line(0, "");
    code
}

fn permissions_field(code: &mut Code, indent: usize, permissions: &Permissions) {
    let ty = code.ty("Permissions");
    if permissions.is_empty() {
        code.line(indent, format!("permissions: Some({ty}::default()),"));
        return;
    }
    let level_ty = code.ty("PermissionLevel");
    code.line(indent, format!("permissions: Some({ty} {{"));
    for (scope, level) in permissions.entries() {
        code.line(
            indent + 1,
            format!("{scope}: Some({level_ty}::{:?}),", level),
        );
    }
    code.line(indent + 1, format!("..{ty}::default()"));
    code.line(indent, "}),");
}

fn concurrency_field(code: &mut Code, indent: usize, concurrency: &wag_model::Concurrency) {
    let ty = code.ty("Concurrency");
    let group = expr_literal(&mut code.types, &concurrency.group);
    let cancel = match concurrency.cancel_in_progress {
        Some(flag) => format!("Some({flag})"),
        None => "None".to_string(),
    };
    code.line(
        indent,
        format!(
            "concurrency: Some({ty} {{ group: {group}, cancel_in_progress: {cancel} }}),"
        ),
    );
}

fn matrix_entries_field(
    code: &mut Code,
    indent: usize,
    field: &str,
    entries: &[IndexMap<String, Scalar>],
) {
    if entries.is_empty() {
        return;
    }
    code.maps = true;
    code.line(indent, format!("{field}: vec!["));
    for entry in entries {
        code.line(indent + 1, "IndexMap::from([");
        for (key, value) in entry {
            code.line(
                indent + 2,
                format!("({}, {}),", string_expr(key), scalar_expr(value)),
            );
        }
        code.line(indent + 1, "]),");
    }
    code.line(indent, "],");
}

fn scalar_map_field(
    code: &mut Code,
    indent: usize,
    field: &str,
    map: &IndexMap<String, Scalar>,
    sorted: bool,
) {
    code.maps = true;
    code.line(indent, format!("{field}: IndexMap::from(["));
    let mut keys: Vec<&String> = map.keys().collect();
    if sorted {
        keys.sort();
    }
    for key in keys {
        code.line(
            indent + 1,
            format!("({}, {}),", string_expr(key), scalar_expr(&map[key])),
        );
    }
    code.line(indent, "]),");
}

fn expr_map_field(
    code: &mut Code,
    indent: usize,
    field: &str,
    map: &IndexMap<String, Expr>,
    sorted: bool,
) {
    code.maps = true;
    code.line(indent, format!("{field}: IndexMap::from(["));
    let mut keys: Vec<&String> = map.keys().collect();
    if sorted {
        keys.sort();
    }
    for key in keys {
        let value = expr_literal(&mut code.types, &map[key]);
        code.line(indent + 1, format!("({}, {value}),", string_expr(key)));
    }
    code.line(indent, "]),");
}

fn expr_literal(types: &mut BTreeSet<&'static str>, expr: &Expr) -> String {
    types.insert("Expr");
    match expr {
        Expr::Lit(text) => format!("Expr::lit({})", string_lit(text)),
        other => format!("Expr::lit({})", string_lit(&other.render())),
    }
}

/// A Rust string literal: raw when the text is multi-line and contains no
/// raw-string terminator, escaped otherwise.
fn string_lit(text: &str) -> String {
    if text.contains('\n') && !text.contains("\"#") {
        format!("r#\"{text}\"#")
    } else {
        format!("{text:?}")
    }
}

fn string_expr(text: &str) -> String {
    format!("{}.to_string()", string_lit(text))
}

fn opt_string_expr(text: Option<&str>) -> String {
    match text {
        Some(text) => format!("Some({})", string_expr(text)),
        None => "None".to_string(),
    }
}

fn string_vec(items: &[String]) -> String {
    let rendered: Vec<String> = items.iter().map(|item| string_expr(item)).collect();
    format!("vec![{}]", rendered.join(", "))
}

fn scalar_expr(value: &Scalar) -> String {
    match value {
        Scalar::String(text) => format!("{}.into()", string_lit(text)),
        Scalar::Int(v) => format!("{v}_i64.into()"),
        Scalar::Float(v) => format!("{v:?}_f64.into()"),
        Scalar::Bool(v) => format!("{v}.into()"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wag_model::{Triggers, TypesTrigger};

    fn minimal() -> Workflow {
        let mut workflow = Workflow::named("CI");
        workflow.on.push = Some(PushTrigger {
            branches: vec!["main".to_string()],
            ..PushTrigger::default()
        });
        workflow.jobs.insert(
            "build".to_string(),
            Job::on("ubuntu-latest", [Step::run("echo hello")]),
        );
        workflow
    }

    #[test]
    fn test_single_file_structure() {
        let files = generate_workflows(&[minimal()], SourceLayout::SingleFile);
        assert_eq!(files.len(), 1);
        let contents = &files[0].contents;
        assert!(contents.starts_with("#![allow(non_upper_case_globals)]\n"));
        assert!(contents.contains("pub static CiPush: LazyLock<PushTrigger>"));
        assert!(contents.contains("pub static BuildSteps: LazyLock<Vec<Step>>"));
        assert!(contents.contains("pub static Build: LazyLock<Job>"));
        assert!(contents.contains("pub static Ci: LazyLock<Workflow>"));
        assert!(contents.contains("push: Some(CiPush.clone()),"));
        assert!(contents.contains("steps: BuildSteps.clone(),"));
        assert!(contents.contains("(\"build\".to_string(), Build.clone()),"));
    }

    #[test]
    fn test_split_layout_files() {
        let files = generate_workflows(&[minimal()], SourceLayout::Split);
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["triggers.rs", "steps.rs", "jobs.rs", "workflows.rs"]);
        let workflows = &files[3].contents;
        assert!(workflows.contains("use crate::jobs::*;"));
        assert!(workflows.contains("use crate::triggers::*;"));
    }

    #[test]
    fn test_bare_triggers_stay_inline() {
        let mut workflow = minimal();
        workflow.on = Triggers::default();
        workflow.on.push = Some(PushTrigger::default());
        workflow.on.merge_group = Some(TypesTrigger::bare());
        let files = generate_workflows(&[workflow], SourceLayout::SingleFile);
        let contents = &files[0].contents;
        assert!(contents.contains("push: Some(PushTrigger::default()),"));
        assert!(contents.contains("merge_group: Some(TypesTrigger::bare()),"));
        assert!(!contents.contains("pub static CiPush"));
    }

    #[test]
    fn test_reserved_job_id_gets_suffix() {
        let mut workflow = minimal();
        workflow.jobs.insert(
            "type".to_string(),
            Job::on("ubuntu-latest", [Step::run("true")]),
        );
        let files = generate_workflows(&[workflow], SourceLayout::SingleFile);
        let contents = &files[0].contents;
        assert!(contents.contains("pub static TypeJob: LazyLock<Job>"));
        assert!(contents.contains("(\"type\".to_string(), TypeJob.clone()),"));
    }

    #[test]
    fn test_identical_step_lists_are_shared() {
        let mut workflow = minimal();
        workflow.jobs.insert(
            "rebuild".to_string(),
            Job::on("ubuntu-latest", [Step::run("echo hello")]),
        );
        let files = generate_workflows(&[workflow], SourceLayout::SingleFile);
        let contents = &files[0].contents;
        assert_eq!(contents.matches("pub static BuildSteps").count(), 1);
        assert!(!contents.contains("pub static RebuildSteps"));
        assert_eq!(contents.matches("steps: BuildSteps.clone(),").count(), 2);
    }

    #[test]
    fn test_with_keys_sorted() {
        let mut step = Step::uses("actions/cache@v4");
        step.with.insert("path".to_string(), "~/.cargo".into());
        step.with.insert("key".to_string(), "cargo-${{ hashFiles('**/Cargo.lock') }}".into());
        let mut workflow = minimal();
        workflow.jobs.insert("cache".to_string(), Job::on("ubuntu-latest", [step]));
        let files = generate_workflows(&[workflow], SourceLayout::SingleFile);
        let contents = &files[0].contents;
        let key_pos = contents.find("(\"key\".to_string()").unwrap();
        let path_pos = contents.find("(\"path\".to_string()").unwrap();
        assert!(key_pos < path_pos);
    }

    #[test]
    fn test_multiline_run_uses_raw_string() {
        let mut workflow = minimal();
        workflow.jobs.insert(
            "lint".to_string(),
            Job::on("ubuntu-latest", [Step::run("cargo fmt --check\ncargo clippy\n")]),
        );
        let files = generate_workflows(&[workflow], SourceLayout::SingleFile);
        let contents = &files[0].contents;
        assert!(contents.contains("run: Some(r#\"cargo fmt --check\ncargo clippy\n\"#.to_string()),"));
    }

    #[test]
    fn test_symbol_collision_across_workflows() {
        let mut second = minimal();
        second.name = "CI".to_string();
        let files = generate_workflows(&[minimal(), second], SourceLayout::SingleFile);
        let contents = &files[0].contents;
        assert!(contents.contains("pub static Ci: LazyLock<Workflow>"));
        assert!(contents.contains("pub static Ci2: LazyLock<Workflow>"));
    }
}
