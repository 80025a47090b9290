//! YAML to IR decoding.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use wag_model::{
    Concurrency, Container, ContainerCredentials, Cron, Diagnostic, DiagnosticKind,
    DispatchInput, Expr, Job, JobEnvironment, JobSecrets, Matrix, PermissionLevel,
    Permissions, PullRequestTrigger, PushTrigger, RepositoryDispatch, RunDefaults, RunsOn,
    Scalar, Step, Strategy, Triggers, TypesTrigger, Workflow, WorkflowCall,
    WorkflowCallInput, WorkflowCallOutput, WorkflowCallSecret, WorkflowDispatch,
    WorkflowRun,
};

/// A decoded workflow plus the non-fatal oddities encountered on the way.
#[derive(Debug)]
pub struct Imported {
    /// The decoded workflow; fields touched by an error keep their default.
    pub workflow: Workflow,
    /// Structural oddities, all of kind `import-error`.
    pub errors: Vec<Diagnostic>,
}

impl Imported {
    /// Whether any blocking error was collected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Diagnostic::is_error)
    }
}

/// Decode workflow YAML into the IR.
///
/// Unparseable YAML is the only fatal failure; structural oddities are
/// collected into [`Imported::errors`] while the rest of the document is
/// still decoded.
pub fn import_workflow(source: &str) -> Result<Imported, Diagnostic> {
    let value: Value = serde_yaml::from_str(source).map_err(parse_failure)?;
    let Value::Mapping(root) = value else {
        return Err(Diagnostic::error(
            DiagnosticKind::ImportError,
            "workflow document is not a mapping",
        ));
    };
    let mut decoder = Decoder::default();
    let workflow = decoder.workflow(&root);
    tracing::debug!(
        jobs = workflow.jobs.len(),
        errors = decoder.errors.len(),
        "workflow decoded"
    );
    Ok(Imported {
        workflow,
        errors: decoder.errors,
    })
}

fn parse_failure(err: serde_yaml::Error) -> Diagnostic {
    let mut diagnostic = Diagnostic::error(
        DiagnosticKind::ImportError,
        format!("invalid YAML: {err}"),
    );
    if let Some(location) = err.location() {
        diagnostic.line = Some(location.line());
        diagnostic.column = Some(location.column());
    }
    diagnostic
}

#[derive(Default)]
struct Decoder {
    errors: Vec<Diagnostic>,
}

impl Decoder {
    fn error(&mut self, message: impl Into<String>) {
        self.errors
            .push(Diagnostic::error(DiagnosticKind::ImportError, message));
    }

    fn workflow(&mut self, root: &Mapping) -> Workflow {
        let mut workflow = Workflow::default();
        for (key, value) in root {
            let Some(key) = key.as_str() else {
                self.error("workflow keys must be strings");
                continue;
            };
            match key {
                "name" => workflow.name = self.text(value, "name"),
                "on" => workflow.on = self.triggers(value),
                "permissions" => workflow.permissions = self.permissions(value),
                "defaults" => workflow.defaults = self.defaults(value),
                "concurrency" => workflow.concurrency = Some(self.concurrency(value)),
                "env" => workflow.env = self.expr_map(value, "env"),
                "jobs" => workflow.jobs = self.jobs(value),
                other => self.error(format!("unknown workflow key '{other}'")),
            }
        }
        workflow
    }

    // Trigger decoding accepts the three source forms: a single event name,
    // a sequence of event names, and the full mapping.
    fn triggers(&mut self, value: &Value) -> Triggers {
        let mut triggers = Triggers::default();
        match value {
            Value::String(event) => self.bare_event(&mut triggers, event),
            Value::Sequence(events) => {
                for event in events {
                    match event.as_str() {
                        Some(name) => self.bare_event(&mut triggers, name),
                        None => self.error("event names in the on list must be strings"),
                    }
                }
            }
            Value::Mapping(map) => {
                for (key, payload) in map {
                    match key.as_str() {
                        Some(name) => self.event(&mut triggers, name, payload),
                        None => self.error("event keys must be strings"),
                    }
                }
            }
            other => self.error(format!(
                "on must be an event name, a list, or a mapping, found {}",
                describe(other)
            )),
        }
        triggers
    }

    fn bare_event(&mut self, triggers: &mut Triggers, name: &str) {
        match name {
            "push" => triggers.push = Some(PushTrigger::default()),
            "pull_request" => triggers.pull_request = Some(PullRequestTrigger::default()),
            "pull_request_target" => {
                triggers.pull_request_target = Some(PullRequestTrigger::default());
            }
            "workflow_dispatch" => {
                triggers.workflow_dispatch = Some(WorkflowDispatch::default());
            }
            "workflow_call" => triggers.workflow_call = Some(WorkflowCall::default()),
            "repository_dispatch" => {
                triggers.repository_dispatch = Some(RepositoryDispatch::default());
            }
            "schedule" | "workflow_run" => {
                self.error(format!("event '{name}' requires a configuration mapping"));
            }
            other => match triggers.types_event_mut(other) {
                Some(slot) => *slot = Some(TypesTrigger::bare()),
                None => self.error(format!("unknown event '{other}'")),
            },
        }
    }

    fn event(&mut self, triggers: &mut Triggers, name: &str, payload: &Value) {
        if payload.is_null() {
            self.bare_event(triggers, name);
            return;
        }
        match name {
            "push" => triggers.push = Some(self.push_trigger(payload, name)),
            "pull_request" => {
                triggers.pull_request = Some(self.pull_request_trigger(payload, name));
            }
            "pull_request_target" => {
                triggers.pull_request_target =
                    Some(self.pull_request_trigger(payload, name));
            }
            "schedule" => triggers.schedule = Some(self.schedule(payload)),
            "workflow_dispatch" => {
                triggers.workflow_dispatch = Some(self.workflow_dispatch(payload));
            }
            "workflow_call" => triggers.workflow_call = Some(self.workflow_call(payload)),
            "workflow_run" => triggers.workflow_run = Some(self.workflow_run(payload)),
            "repository_dispatch" => {
                let mut dispatch = RepositoryDispatch::default();
                for (key, value) in self.mapping(payload, name) {
                    match key.as_str() {
                        "types" => dispatch.types = self.string_list(&value, "types"),
                        other => {
                            self.error(format!("unknown repository_dispatch key '{other}'"));
                        }
                    }
                }
                triggers.repository_dispatch = Some(dispatch);
            }
            other => match triggers.types_event_mut(other) {
                Some(slot) => {
                    let mut trigger = TypesTrigger::bare();
                    for (key, value) in self.mapping(payload, other) {
                        match key.as_str() {
                            "types" => trigger.types = self.string_list(&value, "types"),
                            unknown => {
                                self.error(format!("unknown {other} key '{unknown}'"));
                            }
                        }
                    }
                    *slot = Some(trigger);
                }
                None => self.error(format!("unknown event '{other}'")),
            },
        }
    }

    fn push_trigger(&mut self, payload: &Value, event: &str) -> PushTrigger {
        let mut trigger = PushTrigger::default();
        for (key, value) in self.mapping(payload, event) {
            match key.as_str() {
                "branches" => trigger.branches = self.string_list(&value, &key),
                "branches-ignore" => trigger.branches_ignore = self.string_list(&value, &key),
                "tags" => trigger.tags = self.string_list(&value, &key),
                "tags-ignore" => trigger.tags_ignore = self.string_list(&value, &key),
                "paths" => trigger.paths = self.string_list(&value, &key),
                "paths-ignore" => trigger.paths_ignore = self.string_list(&value, &key),
                other => self.error(format!("unknown {event} key '{other}'")),
            }
        }
        trigger
    }

    fn pull_request_trigger(&mut self, payload: &Value, event: &str) -> PullRequestTrigger {
        let mut trigger = PullRequestTrigger::default();
        for (key, value) in self.mapping(payload, event) {
            match key.as_str() {
                "branches" => trigger.branches = self.string_list(&value, &key),
                "branches-ignore" => trigger.branches_ignore = self.string_list(&value, &key),
                "paths" => trigger.paths = self.string_list(&value, &key),
                "paths-ignore" => trigger.paths_ignore = self.string_list(&value, &key),
                "types" => trigger.types = self.string_list(&value, &key),
                other => self.error(format!("unknown {event} key '{other}'")),
            }
        }
        trigger
    }

    fn schedule(&mut self, payload: &Value) -> Vec<Cron> {
        let Value::Sequence(entries) = payload else {
            self.error("schedule must be a list of cron entries");
            return Vec::new();
        };
        let mut crons = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.get("cron").and_then(Value::as_str) {
                Some(cron) => crons.push(Cron::new(cron)),
                None => self.error("schedule entries must set cron"),
            }
        }
        crons
    }

    fn workflow_dispatch(&mut self, payload: &Value) -> WorkflowDispatch {
        let mut dispatch = WorkflowDispatch::default();
        for (key, value) in self.mapping(payload, "workflow_dispatch") {
            match key.as_str() {
                "inputs" => {
                    for (name, spec) in self.mapping(&value, "inputs") {
                        let mut input = DispatchInput::default();
                        for (attr, attr_value) in self.mapping(&spec, &name) {
                            match attr.as_str() {
                                "description" => {
                                    input.description = self.text(&attr_value, &attr);
                                }
                                "required" => input.required = attr_value.as_bool(),
                                "default" => input.default = self.scalar(&attr_value, &attr),
                                "type" => input.input_type = Some(self.text(&attr_value, &attr)),
                                "options" => input.options = self.string_list(&attr_value, &attr),
                                other => {
                                    self.error(format!("unknown input key '{other}'"));
                                }
                            }
                        }
                        dispatch.inputs.insert(name, input);
                    }
                }
                other => self.error(format!("unknown workflow_dispatch key '{other}'")),
            }
        }
        dispatch
    }

    fn workflow_call(&mut self, payload: &Value) -> WorkflowCall {
        let mut call = WorkflowCall::default();
        for (key, value) in self.mapping(payload, "workflow_call") {
            match key.as_str() {
                "inputs" => {
                    for (name, spec) in self.mapping(&value, "inputs") {
                        let mut input = WorkflowCallInput::default();
                        for (attr, attr_value) in self.mapping(&spec, &name) {
                            match attr.as_str() {
                                "description" => {
                                    input.description = self.text(&attr_value, &attr);
                                }
                                "required" => input.required = attr_value.as_bool(),
                                "default" => input.default = self.scalar(&attr_value, &attr),
                                "type" => input.input_type = Some(self.text(&attr_value, &attr)),
                                other => {
                                    self.error(format!("unknown input key '{other}'"));
                                }
                            }
                        }
                        call.inputs.insert(name, input);
                    }
                }
                "outputs" => {
                    for (name, spec) in self.mapping(&value, "outputs") {
                        let mut output = WorkflowCallOutput {
                            description: String::new(),
                            value: Expr::lit(""),
                        };
                        for (attr, attr_value) in self.mapping(&spec, &name) {
                            match attr.as_str() {
                                "description" => {
                                    output.description = self.text(&attr_value, &attr);
                                }
                                "value" => output.value = self.expr(&attr_value, &attr),
                                other => {
                                    self.error(format!("unknown output key '{other}'"));
                                }
                            }
                        }
                        call.outputs.insert(name, output);
                    }
                }
                "secrets" => {
                    for (name, spec) in self.mapping(&value, "secrets") {
                        let mut secret = WorkflowCallSecret::default();
                        for (attr, attr_value) in self.mapping(&spec, &name) {
                            match attr.as_str() {
                                "description" => {
                                    secret.description = self.text(&attr_value, &attr);
                                }
                                "required" => secret.required = attr_value.as_bool(),
                                other => {
                                    self.error(format!("unknown secret key '{other}'"));
                                }
                            }
                        }
                        call.secrets.insert(name, secret);
                    }
                }
                other => self.error(format!("unknown workflow_call key '{other}'")),
            }
        }
        call
    }

    fn workflow_run(&mut self, payload: &Value) -> WorkflowRun {
        let mut run = WorkflowRun::default();
        for (key, value) in self.mapping(payload, "workflow_run") {
            match key.as_str() {
                "workflows" => run.workflows = self.string_list(&value, &key),
                "types" => run.types = self.string_list(&value, &key),
                "branches" => run.branches = self.string_list(&value, &key),
                "branches-ignore" => run.branches_ignore = self.string_list(&value, &key),
                other => self.error(format!("unknown workflow_run key '{other}'")),
            }
        }
        run
    }

    fn permissions(&mut self, value: &Value) -> Option<Permissions> {
        let mut permissions = Permissions::default();
        for (key, level) in self.mapping(value, "permissions") {
            let Some(level_text) = level.as_str() else {
                self.error(format!("permission '{key}' level must be a string"));
                continue;
            };
            let Some(level) = PermissionLevel::parse(level_text) else {
                self.error(format!("unknown permission level '{level_text}'"));
                continue;
            };
            let field = wag_model::names::field_for_key(&key);
            if !permissions.set(&field, level) {
                self.error(format!("unknown permission scope '{key}'"));
            }
        }
        Some(permissions)
    }

    fn defaults(&mut self, value: &Value) -> Option<RunDefaults> {
        let mut defaults = RunDefaults::default();
        for (key, run) in self.mapping(value, "defaults") {
            if key != "run" {
                self.error(format!("unknown defaults key '{key}'"));
                continue;
            }
            for (attr, attr_value) in self.mapping(&run, "defaults.run") {
                match attr.as_str() {
                    "shell" => defaults.shell = Some(self.text(&attr_value, &attr)),
                    "working-directory" => {
                        defaults.working_directory = Some(self.text(&attr_value, &attr));
                    }
                    other => self.error(format!("unknown defaults.run key '{other}'")),
                }
            }
        }
        Some(defaults)
    }

    fn concurrency(&mut self, value: &Value) -> Concurrency {
        if let Some(group) = value.as_str() {
            return Concurrency::group(Expr::lit(group));
        }
        let mut concurrency = Concurrency::group(Expr::lit(""));
        for (key, attr_value) in self.mapping(value, "concurrency") {
            match key.as_str() {
                "group" => concurrency.group = self.expr(&attr_value, &key),
                "cancel-in-progress" => {
                    concurrency.cancel_in_progress = attr_value.as_bool();
                }
                other => self.error(format!("unknown concurrency key '{other}'")),
            }
        }
        concurrency
    }

    fn jobs(&mut self, value: &Value) -> IndexMap<String, Job> {
        let mut jobs = IndexMap::new();
        let Value::Mapping(map) = value else {
            self.error("jobs must be a mapping");
            return jobs;
        };
        for (id, spec) in map {
            let Some(id) = id.as_str() else {
                self.error("job ids must be strings");
                continue;
            };
            let Value::Mapping(spec) = spec else {
                self.error(format!("job '{id}' value is not a mapping"));
                continue;
            };
            let job = self.job(id, spec);
            jobs.insert(id.to_string(), job);
        }
        jobs
    }

    #[allow(clippy::too_many_lines)]
    fn job(&mut self, id: &str, spec: &Mapping) -> Job {
        let mut job = Job::default();
        for (key, value) in spec {
            let Some(key) = key.as_str() else {
                self.error(format!("job '{id}' keys must be strings"));
                continue;
            };
            match key {
                "name" => job.name = Some(self.text(value, key)),
                "runs-on" => job.runs_on = self.runs_on(value),
                "needs" => job.needs = self.string_list(value, key),
                "if" => job.if_condition = Some(self.expr(value, key)),
                "permissions" => job.permissions = self.permissions(value),
                "environment" => job.environment = Some(self.environment(value)),
                "concurrency" => job.concurrency = Some(self.concurrency(value)),
                "outputs" => job.outputs = self.expr_map(value, key),
                "env" => job.env = self.expr_map(value, key),
                "defaults" => job.defaults = self.defaults(value),
                "strategy" => job.strategy = Some(self.strategy(value)),
                "container" => job.container = Some(self.container(value)),
                "services" => {
                    for (name, service) in self.mapping(value, key) {
                        let container = self.container(&service);
                        job.services.insert(name, container);
                    }
                }
                "uses" => job.uses = Some(self.text(value, key)),
                "with" => job.with = self.scalar_map(value, key),
                "secrets" => job.secrets = Some(self.job_secrets(value)),
                "steps" => job.steps = self.steps(id, value),
                "timeout-minutes" => job.timeout_minutes = self.u32_value(value, key),
                "continue-on-error" => job.continue_on_error = value.as_bool(),
                other => self.error(format!("unknown key '{other}' in job '{id}'")),
            }
        }
        job
    }

    fn runs_on(&mut self, value: &Value) -> RunsOn {
        match value {
            Value::String(label) => RunsOn::Label(label.clone()),
            Value::Sequence(_) => RunsOn::Labels(self.string_list(value, "runs-on")),
            other => {
                self.error(format!("runs-on must be a label or a list, found {}", describe(other)));
                RunsOn::default()
            }
        }
    }

    fn environment(&mut self, value: &Value) -> JobEnvironment {
        if let Some(name) = value.as_str() {
            return JobEnvironment {
                name: name.to_string(),
                url: None,
            };
        }
        let mut environment = JobEnvironment {
            name: String::new(),
            url: None,
        };
        for (key, attr_value) in self.mapping(value, "environment") {
            match key.as_str() {
                "name" => environment.name = self.text(&attr_value, &key),
                "url" => environment.url = Some(self.expr(&attr_value, &key)),
                other => self.error(format!("unknown environment key '{other}'")),
            }
        }
        environment
    }

    fn job_secrets(&mut self, value: &Value) -> JobSecrets {
        if value.as_str() == Some("inherit") {
            return JobSecrets::Inherit;
        }
        JobSecrets::Map(self.expr_map(value, "secrets"))
    }

    fn strategy(&mut self, value: &Value) -> Strategy {
        let mut strategy = Strategy::default();
        for (key, attr_value) in self.mapping(value, "strategy") {
            match key.as_str() {
                "matrix" => strategy.matrix = self.matrix(&attr_value),
                "fail-fast" => strategy.fail_fast = attr_value.as_bool(),
                "max-parallel" => strategy.max_parallel = self.u32_value(&attr_value, &key),
                other => self.error(format!("unknown strategy key '{other}'")),
            }
        }
        strategy
    }

    // Every matrix key that is not the literal include or exclude is an
    // axis; values stay opaque scalars so numbers and strings survive.
    fn matrix(&mut self, value: &Value) -> Matrix {
        let mut matrix = Matrix::default();
        for (key, axis_value) in self.mapping(value, "matrix") {
            match key.as_str() {
                "include" => matrix.include = self.matrix_entries(&axis_value, &key),
                "exclude" => matrix.exclude = self.matrix_entries(&axis_value, &key),
                axis => {
                    let Value::Sequence(values) = &axis_value else {
                        self.error(format!("matrix axis '{axis}' must be a list"));
                        continue;
                    };
                    let mut scalars = Vec::with_capacity(values.len());
                    for entry in values {
                        if let Some(scalar) = self.scalar(entry, axis) {
                            scalars.push(scalar);
                        }
                    }
                    matrix.axes.insert(axis.to_string(), scalars);
                }
            }
        }
        matrix
    }

    fn matrix_entries(&mut self, value: &Value, what: &str) -> Vec<IndexMap<String, Scalar>> {
        let Value::Sequence(entries) = value else {
            self.error(format!("matrix {what} must be a list of mappings"));
            return Vec::new();
        };
        let mut decoded = Vec::with_capacity(entries.len());
        for entry in entries {
            decoded.push(self.scalar_map(entry, what));
        }
        decoded
    }

    fn container(&mut self, value: &Value) -> Container {
        if let Some(image) = value.as_str() {
            return Container::image(image);
        }
        let mut container = Container::image("");
        for (key, attr_value) in self.mapping(value, "container") {
            match key.as_str() {
                "image" => container.image = self.text(&attr_value, &key),
                "credentials" => {
                    let mut username = Expr::lit("");
                    let mut password = Expr::lit("");
                    for (attr, credential) in self.mapping(&attr_value, "credentials") {
                        match attr.as_str() {
                            "username" => username = self.expr(&credential, &attr),
                            "password" => password = self.expr(&credential, &attr),
                            other => {
                                self.error(format!("unknown credentials key '{other}'"));
                            }
                        }
                    }
                    container.credentials = Some(ContainerCredentials { username, password });
                }
                "env" => container.env = self.expr_map(&attr_value, &key),
                "ports" => {
                    let Value::Sequence(ports) = &attr_value else {
                        self.error("container ports must be a list");
                        continue;
                    };
                    for port in ports {
                        if let Some(scalar) = self.scalar(port, "ports") {
                            container.ports.push(scalar);
                        }
                    }
                }
                "volumes" => container.volumes = self.string_list(&attr_value, &key),
                "options" => container.options = Some(self.text(&attr_value, &key)),
                other => self.error(format!("unknown container key '{other}'")),
            }
        }
        container
    }

    fn steps(&mut self, job_id: &str, value: &Value) -> Vec<Step> {
        let Value::Sequence(entries) = value else {
            self.error(format!("steps of job '{job_id}' must be a list"));
            return Vec::new();
        };
        let mut steps = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let Value::Mapping(spec) = entry else {
                self.error(format!(
                    "job '{job_id}' step {index} is not a mapping"
                ));
                continue;
            };
            steps.push(self.step(job_id, index, spec));
        }
        steps
    }

    fn step(&mut self, job_id: &str, index: usize, spec: &Mapping) -> Step {
        let mut step = Step::default();
        for (key, value) in spec {
            let Some(key) = key.as_str() else {
                self.error(format!("job '{job_id}' step {index} keys must be strings"));
                continue;
            };
            match key {
                "id" => step.id = Some(self.text(value, key)),
                "name" => step.name = Some(self.text(value, key)),
                "if" => step.if_condition = Some(self.expr(value, key)),
                "uses" => step.uses = Some(self.text(value, key)),
                "with" => step.with = self.scalar_map(value, key),
                "run" => step.run = Some(self.text(value, key)),
                "shell" => step.shell = Some(self.text(value, key)),
                "env" => step.env = self.expr_map(value, key),
                "working-directory" => {
                    step.working_directory = Some(self.text(value, key));
                }
                "continue-on-error" => step.continue_on_error = value.as_bool(),
                "timeout-minutes" => step.timeout_minutes = self.u32_value(value, key),
                other => self.error(format!(
                    "unknown key '{other}' in job '{job_id}' step {index}"
                )),
            }
        }
        step
    }

    // Shared scalar plumbing.

    fn mapping(&mut self, value: &Value, what: &str) -> Vec<(String, Value)> {
        let Value::Mapping(map) = value else {
            self.error(format!("{what} must be a mapping, found {}", describe(value)));
            return Vec::new();
        };
        let mut entries = Vec::with_capacity(map.len());
        for (key, entry) in map {
            match key.as_str() {
                Some(key) => entries.push((key.to_string(), entry.clone())),
                None => self.error(format!("{what} keys must be strings")),
            }
        }
        entries
    }

    fn text(&mut self, value: &Value, what: &str) -> String {
        match self.scalar(value, what) {
            Some(scalar) => scalar.as_text(),
            None => String::new(),
        }
    }

    fn expr(&mut self, value: &Value, what: &str) -> Expr {
        Expr::lit(self.text(value, what))
    }

    fn scalar(&mut self, value: &Value, what: &str) -> Option<Scalar> {
        match value {
            Value::String(text) => Some(Scalar::String(text.clone())),
            Value::Bool(flag) => Some(Scalar::Bool(*flag)),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Some(Scalar::Int(int))
                } else {
                    number.as_f64().map(Scalar::Float)
                }
            }
            other => {
                self.error(format!("{what} must be a scalar, found {}", describe(other)));
                None
            }
        }
    }

    fn string_list(&mut self, value: &Value, what: &str) -> Vec<String> {
        match value {
            Value::String(single) => vec![single.clone()],
            Value::Sequence(entries) => {
                let mut items = Vec::with_capacity(entries.len());
                for entry in entries {
                    if let Some(scalar) = self.scalar(entry, what) {
                        items.push(scalar.as_text());
                    }
                }
                items
            }
            other => {
                self.error(format!(
                    "{what} must be a string or a list, found {}",
                    describe(other)
                ));
                Vec::new()
            }
        }
    }

    fn expr_map(&mut self, value: &Value, what: &str) -> IndexMap<String, Expr> {
        let mut map = IndexMap::new();
        for (key, entry) in self.mapping(value, what) {
            let expr = self.expr(&entry, &key);
            map.insert(key, expr);
        }
        map
    }

    fn scalar_map(&mut self, value: &Value, what: &str) -> IndexMap<String, Scalar> {
        let mut map = IndexMap::new();
        for (key, entry) in self.mapping(value, what) {
            if let Some(scalar) = self.scalar(&entry, &key) {
                map.insert(key, scalar);
            }
        }
        map
    }

    fn u32_value(&mut self, value: &Value, what: &str) -> Option<u32> {
        let minutes = value.as_u64().and_then(|v| u32::try_from(v).ok());
        if minutes.is_none() {
            self.error(format!("{what} must be a non-negative integer"));
        }
        minutes
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_on_form() {
        let imported = import_workflow("name: CI\non: push\njobs: {}\n").unwrap();
        assert!(imported.errors.is_empty());
        assert_eq!(imported.workflow.on.push, Some(PushTrigger::default()));
    }

    #[test]
    fn test_sequence_on_form() {
        let imported =
            import_workflow("name: CI\non: [push, pull_request]\njobs: {}\n").unwrap();
        assert!(imported.errors.is_empty());
        assert!(imported.workflow.on.push.is_some());
        assert_eq!(
            imported.workflow.on.pull_request,
            Some(PullRequestTrigger::default())
        );
    }

    #[test]
    fn test_mapping_on_form() {
        let yaml = "name: CI\non:\n  push:\n    branches: [main]\njobs: {}\n";
        let imported = import_workflow(yaml).unwrap();
        let push = imported.workflow.on.push.unwrap();
        assert_eq!(push.branches, vec!["main"]);
    }

    #[test]
    fn test_full_job_decoding() {
        let yaml = "\
name: CI
on:
  push:
jobs:
  build:
    runs-on: ubuntu-latest
    needs: setup
    timeout-minutes: 20
    steps:
      - uses: actions/checkout@v4
        with:
          fetch-depth: 0
      - name: Test
        run: cargo test
        env:
          RUST_BACKTRACE: '1'
";
        let imported = import_workflow(yaml).unwrap();
        assert!(imported.errors.is_empty(), "{:?}", imported.errors);
        let job = &imported.workflow.jobs["build"];
        assert_eq!(job.runs_on, RunsOn::Label("ubuntu-latest".to_string()));
        assert_eq!(job.needs, vec!["setup"]);
        assert_eq!(job.timeout_minutes, Some(20));
        assert_eq!(job.steps[0].uses.as_deref(), Some("actions/checkout@v4"));
        assert_eq!(job.steps[0].with["fetch-depth"], Scalar::Int(0));
        assert_eq!(job.steps[1].run.as_deref(), Some("cargo test"));
        assert_eq!(job.steps[1].env["RUST_BACKTRACE"], Expr::lit("1"));
    }

    #[test]
    fn test_matrix_axes_stay_opaque() {
        let yaml = "\
name: CI
on: push
jobs:
  test:
    runs-on: ubuntu-latest
    strategy:
      matrix:
        go: ['1.22', '1.23']
        os: [ubuntu-latest, macos-latest]
        include:
          - go: '1.23'
            experimental: true
    steps:
      - run: go test ./...
";
        let imported = import_workflow(yaml).unwrap();
        let matrix = &imported.workflow.jobs["test"].strategy.as_ref().unwrap().matrix;
        assert_eq!(matrix.axes.keys().collect::<Vec<_>>(), vec!["go", "os"]);
        assert_eq!(
            matrix.axes["go"],
            vec![
                Scalar::String("1.22".to_string()),
                Scalar::String("1.23".to_string())
            ]
        );
        assert_eq!(
            matrix.include[0]["experimental"],
            Scalar::Bool(true)
        );
    }

    #[test]
    fn test_non_mapping_job_is_collected_not_fatal() {
        let yaml = "name: CI\non: push\njobs:\n  build: 12\n  ok:\n    runs-on: ubuntu-latest\n";
        let imported = import_workflow(yaml).unwrap();
        assert!(imported.has_errors());
        assert!(imported.errors[0]
            .message
            .contains("job 'build' value is not a mapping"));
        assert!(imported.workflow.jobs.contains_key("ok"));
    }

    #[test]
    fn test_invalid_yaml_is_fatal() {
        let err = import_workflow("name: [unclosed\n").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::ImportError);
    }

    #[test]
    fn test_secrets_forms() {
        let yaml = "\
name: CI
on: push
jobs:
  deploy:
    uses: org/repo/.github/workflows/deploy.yml@v1
    secrets: inherit
  notify:
    uses: org/repo/.github/workflows/notify.yml@v1
    secrets:
      token: ${{ secrets.TOKEN }}
";
        let imported = import_workflow(yaml).unwrap();
        assert_eq!(
            imported.workflow.jobs["deploy"].secrets,
            Some(JobSecrets::Inherit)
        );
        match imported.workflow.jobs["notify"].secrets.as_ref().unwrap() {
            JobSecrets::Map(map) => {
                assert_eq!(map["token"], Expr::lit("${{ secrets.TOKEN }}"));
            }
            JobSecrets::Inherit => panic!("expected a secrets map"),
        }
    }

    #[test]
    fn test_round_trip_emission_is_stable() {
        let yaml = "\
name: CI
on:
  push:
    branches:
      - main
  pull_request:
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - run: cargo build
  test:
    runs-on: ubuntu-latest
    needs:
      - build
    steps:
      - run: cargo test
";
        let first = wag_emit::emit_workflow(&import_workflow(yaml).unwrap().workflow, None)
            .unwrap();
        let second = wag_emit::emit_workflow(&import_workflow(&first).unwrap().workflow, None)
            .unwrap();
        assert_eq!(first, second);
    }
}
