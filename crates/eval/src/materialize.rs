//! Conversion from interpreted values to workflow IR.
//!
//! This is where entity schemas live: which fields each record type has,
//! how a `StepAction` canonicalizes into a step, and how `needs` entries
//! normalize to job ids. Errors are plain strings; the interpreter attaches
//! locations.

use crate::value::{Record, Value};
use indexmap::IndexMap;
use wag_model::{
    Concurrency, Container, ContainerCredentials, Cron, DispatchInput, Expr, Job,
    JobEnvironment, JobSecrets, Matrix, PermissionLevel, Permissions, PullRequestTrigger,
    PushTrigger, RepositoryDispatch, RunDefaults, RunsOn, Scalar, Step, Strategy, Triggers,
    TypesTrigger, Workflow, WorkflowCall, WorkflowCallInput, WorkflowCallOutput,
    WorkflowCallSecret, WorkflowDispatch, WorkflowRun,
};

type Outcome<T> = Result<T, String>;

/// Field-by-field reader over a record of a known type.
struct Fields {
    type_name: String,
    map: IndexMap<String, Value>,
}

impl Fields {
    fn of(value: Value, type_name: &str) -> Outcome<Self> {
        let value = value
            .unwrap_option()
            .ok_or_else(|| format!("expected a {type_name} value, found None"))?;
        match value {
            Value::Record(Record {
                type_name: actual,
                fields,
                ..
            }) if actual == type_name || actual == "Default" => Ok(Self {
                type_name: type_name.to_string(),
                map: fields,
            }),
            other => Err(format!(
                "expected a {type_name} value, found {}",
                other.describe()
            )),
        }
    }

    fn take(&mut self, name: &str) -> Option<Value> {
        self.map.shift_remove(name).and_then(Value::unwrap_option)
    }

    fn finish(self) -> Outcome<()> {
        match self.map.keys().next() {
            Some(unknown) => Err(format!(
                "unknown field '{unknown}' on {}",
                self.type_name
            )),
            None => Ok(()),
        }
    }
}

/// Materialize a workflow record.
pub(crate) fn workflow(value: Value) -> Outcome<Workflow> {
    let mut fields = Fields::of(value, "Workflow")?;
    let mut workflow = Workflow {
        name: fields.take("name").map(as_string).transpose()?.unwrap_or_default(),
        on: fields.take("on").map(triggers).transpose()?.unwrap_or_default(),
        permissions: fields.take("permissions").map(permissions).transpose()?,
        defaults: fields.take("defaults").map(run_defaults).transpose()?,
        concurrency: fields.take("concurrency").map(concurrency).transpose()?,
        env: fields.take("env").map(expr_map).transpose()?.unwrap_or_default(),
        jobs: IndexMap::new(),
    };
    if let Some(value) = fields.take("jobs") {
        let Value::Map(entries) = value else {
            return Err(format!("jobs must be a mapping, found {}", value.describe()));
        };
        for (id, entry) in entries {
            let job = job(entry).map_err(|err| format!("job '{id}': {err}"))?;
            workflow.jobs.insert(id, job);
        }
    }
    fields.finish()?;
    Ok(workflow)
}

fn triggers(value: Value) -> Outcome<Triggers> {
    let mut fields = Fields::of(value, "Triggers")?;
    let mut triggers = Triggers {
        push: fields.take("push").map(push_trigger).transpose()?,
        pull_request: fields.take("pull_request").map(pull_request_trigger).transpose()?,
        pull_request_target: fields
            .take("pull_request_target")
            .map(pull_request_trigger)
            .transpose()?,
        schedule: fields.take("schedule").map(cron_list).transpose()?,
        workflow_dispatch: fields
            .take("workflow_dispatch")
            .map(workflow_dispatch)
            .transpose()?,
        workflow_call: fields.take("workflow_call").map(workflow_call).transpose()?,
        workflow_run: fields.take("workflow_run").map(workflow_run).transpose()?,
        repository_dispatch: fields
            .take("repository_dispatch")
            .map(repository_dispatch)
            .transpose()?,
        ..Triggers::default()
    };
    let remaining: Vec<String> = fields.map.keys().cloned().collect();
    for key in remaining {
        let Some(value) = fields.take(&key) else {
            continue;
        };
        match triggers.types_event_mut(&key) {
            Some(slot) => *slot = Some(types_trigger(value)?),
            None => return Err(format!("unknown field '{key}' on Triggers")),
        }
    }
    Ok(triggers)
}

fn push_trigger(value: Value) -> Outcome<PushTrigger> {
    let mut fields = Fields::of(value, "PushTrigger")?;
    let trigger = PushTrigger {
        branches: string_list(fields.take("branches"))?,
        branches_ignore: string_list(fields.take("branches_ignore"))?,
        tags: string_list(fields.take("tags"))?,
        tags_ignore: string_list(fields.take("tags_ignore"))?,
        paths: string_list(fields.take("paths"))?,
        paths_ignore: string_list(fields.take("paths_ignore"))?,
    };
    fields.finish()?;
    Ok(trigger)
}

fn pull_request_trigger(value: Value) -> Outcome<PullRequestTrigger> {
    let mut fields = Fields::of(value, "PullRequestTrigger")?;
    let trigger = PullRequestTrigger {
        branches: string_list(fields.take("branches"))?,
        branches_ignore: string_list(fields.take("branches_ignore"))?,
        paths: string_list(fields.take("paths"))?,
        paths_ignore: string_list(fields.take("paths_ignore"))?,
        types: string_list(fields.take("types"))?,
    };
    fields.finish()?;
    Ok(trigger)
}

fn types_trigger(value: Value) -> Outcome<TypesTrigger> {
    let mut fields = Fields::of(value, "TypesTrigger")?;
    let trigger = TypesTrigger {
        types: string_list(fields.take("types"))?,
    };
    fields.finish()?;
    Ok(trigger)
}

fn cron_list(value: Value) -> Outcome<Vec<Cron>> {
    let Value::List(items) = value else {
        return Err(format!("schedule must be a list, found {}", value.describe()));
    };
    items
        .into_iter()
        .map(|item| {
            let mut fields = Fields::of(item, "Cron")?;
            let cron = Cron {
                cron: fields.take("cron").map(as_string).transpose()?.unwrap_or_default(),
            };
            fields.finish()?;
            Ok(cron)
        })
        .collect()
}

fn workflow_dispatch(value: Value) -> Outcome<WorkflowDispatch> {
    let mut fields = Fields::of(value, "WorkflowDispatch")?;
    let mut dispatch = WorkflowDispatch::default();
    if let Some(inputs) = fields.take("inputs") {
        for (name, input) in into_map(inputs)? {
            dispatch.inputs.insert(name, dispatch_input(input)?);
        }
    }
    fields.finish()?;
    Ok(dispatch)
}

fn dispatch_input(value: Value) -> Outcome<DispatchInput> {
    let mut fields = Fields::of(value, "DispatchInput")?;
    let input = DispatchInput {
        description: fields
            .take("description")
            .map(as_string)
            .transpose()?
            .unwrap_or_default(),
        required: fields.take("required").map(as_bool).transpose()?,
        default: fields.take("default").map(as_scalar).transpose()?,
        input_type: opt_string(fields.take("input_type"))?,
        options: string_list(fields.take("options"))?,
    };
    fields.finish()?;
    Ok(input)
}

fn workflow_call(value: Value) -> Outcome<WorkflowCall> {
    let mut fields = Fields::of(value, "WorkflowCall")?;
    let mut call = WorkflowCall::default();
    if let Some(inputs) = fields.take("inputs") {
        for (name, input) in into_map(inputs)? {
            let mut input_fields = Fields::of(input, "WorkflowCallInput")?;
            call.inputs.insert(
                name,
                WorkflowCallInput {
                    description: input_fields
                        .take("description")
                        .map(as_string)
                        .transpose()?
                        .unwrap_or_default(),
                    required: input_fields.take("required").map(as_bool).transpose()?,
                    default: input_fields.take("default").map(as_scalar).transpose()?,
                    input_type: opt_string(input_fields.take("input_type"))?,
                },
            );
            input_fields.finish()?;
        }
    }
    if let Some(outputs) = fields.take("outputs") {
        for (name, output) in into_map(outputs)? {
            let mut output_fields = Fields::of(output, "WorkflowCallOutput")?;
            call.outputs.insert(
                name,
                WorkflowCallOutput {
                    description: output_fields
                        .take("description")
                        .map(as_string)
                        .transpose()?
                        .unwrap_or_default(),
                    value: output_fields
                        .take("value")
                        .map(as_expr)
                        .transpose()?
                        .ok_or("workflow_call output requires a value")?,
                },
            );
            output_fields.finish()?;
        }
    }
    if let Some(secrets) = fields.take("secrets") {
        for (name, secret) in into_map(secrets)? {
            let mut secret_fields = Fields::of(secret, "WorkflowCallSecret")?;
            call.secrets.insert(
                name,
                WorkflowCallSecret {
                    description: secret_fields
                        .take("description")
                        .map(as_string)
                        .transpose()?
                        .unwrap_or_default(),
                    required: secret_fields.take("required").map(as_bool).transpose()?,
                },
            );
            secret_fields.finish()?;
        }
    }
    fields.finish()?;
    Ok(call)
}

fn workflow_run(value: Value) -> Outcome<WorkflowRun> {
    let mut fields = Fields::of(value, "WorkflowRun")?;
    let run = WorkflowRun {
        workflows: string_list(fields.take("workflows"))?,
        types: string_list(fields.take("types"))?,
        branches: string_list(fields.take("branches"))?,
        branches_ignore: string_list(fields.take("branches_ignore"))?,
    };
    fields.finish()?;
    Ok(run)
}

fn repository_dispatch(value: Value) -> Outcome<RepositoryDispatch> {
    let mut fields = Fields::of(value, "RepositoryDispatch")?;
    let dispatch = RepositoryDispatch {
        types: string_list(fields.take("types"))?,
    };
    fields.finish()?;
    Ok(dispatch)
}

fn permissions(value: Value) -> Outcome<Permissions> {
    let mut fields = Fields::of(value, "Permissions")?;
    let mut permissions = Permissions::default();
    let scopes: Vec<String> = fields.map.keys().cloned().collect();
    for scope in scopes {
        let Some(value) = fields.take(&scope) else {
            continue;
        };
        let level = permission_level(value)?;
        if !permissions.set(&scope, level) {
            return Err(format!("unknown permission scope '{scope}'"));
        }
    }
    Ok(permissions)
}

fn permission_level(value: Value) -> Outcome<PermissionLevel> {
    match &value {
        Value::Variant {
            type_name, variant, ..
        } if type_name == "PermissionLevel" => match variant.as_str() {
            "Read" => Ok(PermissionLevel::Read),
            "Write" => Ok(PermissionLevel::Write),
            "None" => Ok(PermissionLevel::None),
            other => Err(format!("unknown permission level '{other}'")),
        },
        other => Err(format!(
            "permission level must be a PermissionLevel, found {}",
            other.describe()
        )),
    }
}

fn run_defaults(value: Value) -> Outcome<RunDefaults> {
    let mut fields = Fields::of(value, "RunDefaults")?;
    let defaults = RunDefaults {
        shell: opt_string(fields.take("shell"))?,
        working_directory: opt_string(fields.take("working_directory"))?,
    };
    fields.finish()?;
    Ok(defaults)
}

fn concurrency(value: Value) -> Outcome<Concurrency> {
    let mut fields = Fields::of(value, "Concurrency")?;
    let concurrency = Concurrency {
        group: fields
            .take("group")
            .map(as_expr)
            .transpose()?
            .ok_or("concurrency requires a group")?,
        cancel_in_progress: fields.take("cancel_in_progress").map(as_bool).transpose()?,
    };
    fields.finish()?;
    Ok(concurrency)
}

fn job(value: Value) -> Outcome<Job> {
    let mut fields = Fields::of(value, "Job")?;
    let job = Job {
        name: opt_string(fields.take("name"))?,
        runs_on: fields.take("runs_on").map(runs_on).transpose()?.unwrap_or_default(),
        needs: needs_list(fields.take("needs"))?,
        if_condition: fields.take("if_condition").map(as_expr).transpose()?,
        permissions: fields.take("permissions").map(permissions).transpose()?,
        environment: fields.take("environment").map(job_environment).transpose()?,
        concurrency: fields.take("concurrency").map(concurrency).transpose()?,
        outputs: fields.take("outputs").map(expr_map).transpose()?.unwrap_or_default(),
        env: fields.take("env").map(expr_map).transpose()?.unwrap_or_default(),
        defaults: fields.take("defaults").map(run_defaults).transpose()?,
        strategy: fields.take("strategy").map(strategy).transpose()?,
        container: fields.take("container").map(container).transpose()?,
        services: fields
            .take("services")
            .map(container_map)
            .transpose()?
            .unwrap_or_default(),
        steps: step_list(fields.take("steps"))?,
        timeout_minutes: opt_u32(fields.take("timeout_minutes"))?,
        continue_on_error: fields.take("continue_on_error").map(as_bool).transpose()?,
        uses: opt_string(fields.take("uses"))?,
        with: fields.take("with").map(scalar_map).transpose()?.unwrap_or_default(),
        secrets: fields.take("secrets").map(job_secrets).transpose()?,
    };
    fields.finish()?;
    Ok(job)
}

fn runs_on(value: Value) -> Outcome<RunsOn> {
    match value {
        Value::Variant {
            type_name,
            variant,
            mut args,
        } if type_name == "RunsOn" => match (variant.as_str(), args.len()) {
            ("Label", 1) => Ok(RunsOn::Label(as_string(args.remove(0))?)),
            ("Labels", 1) => Ok(RunsOn::Labels(string_list(Some(args.remove(0)))?)),
            ("Expression", 1) => Ok(RunsOn::Expression(as_expr(args.remove(0))?)),
            _ => Err(format!("unknown runner form RunsOn::{variant}")),
        },
        Value::Record(record) if record.type_name == "RunsOn" => Ok(RunsOn::default()),
        Value::Str(label) => Ok(RunsOn::Label(label)),
        other => Err(format!("runs_on must be a RunsOn, found {}", other.describe())),
    }
}

/// Normalize `needs` entries to job-id strings. A Job value stands for its
/// own display name.
fn needs_list(value: Option<Value>) -> Outcome<Vec<String>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let Value::List(items) = value else {
        return Err(format!("needs must be a list, found {}", value.describe()));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Str(id) => Ok(id),
            Value::Record(record) if record.type_name == "Job" => record
                .fields
                .get("name")
                .cloned()
                .and_then(Value::unwrap_option)
                .map(as_string)
                .transpose()?
                .ok_or_else(|| "needs entry is a Job without a name".to_string()),
            other => Err(format!(
                "needs entry must be a job id or a Job, found {}",
                other.describe()
            )),
        })
        .collect()
}

fn job_environment(value: Value) -> Outcome<JobEnvironment> {
    let mut fields = Fields::of(value, "JobEnvironment")?;
    let environment = JobEnvironment {
        name: fields.take("name").map(as_string).transpose()?.unwrap_or_default(),
        url: fields.take("url").map(as_expr).transpose()?,
    };
    fields.finish()?;
    Ok(environment)
}

fn job_secrets(value: Value) -> Outcome<JobSecrets> {
    match value {
        Value::Variant {
            type_name,
            variant,
            mut args,
        } if type_name == "JobSecrets" => match (variant.as_str(), args.len()) {
            ("Inherit", 0) => Ok(JobSecrets::Inherit),
            ("Map", 1) => Ok(JobSecrets::Map(expr_map(args.remove(0))?)),
            _ => Err(format!("unknown secrets form JobSecrets::{variant}")),
        },
        other => Err(format!(
            "secrets must be a JobSecrets, found {}",
            other.describe()
        )),
    }
}

fn strategy(value: Value) -> Outcome<Strategy> {
    let mut fields = Fields::of(value, "Strategy")?;
    let strategy = Strategy {
        matrix: fields.take("matrix").map(matrix).transpose()?.unwrap_or_default(),
        fail_fast: fields.take("fail_fast").map(as_bool).transpose()?,
        max_parallel: opt_u32(fields.take("max_parallel"))?,
    };
    fields.finish()?;
    Ok(strategy)
}

fn matrix(value: Value) -> Outcome<Matrix> {
    let mut fields = Fields::of(value, "Matrix")?;
    let mut matrix = Matrix::default();
    if let Some(axes) = fields.take("axes") {
        for (axis, values) in into_map(axes)? {
            let Value::List(items) = values else {
                return Err(format!("matrix axis '{axis}' must be a list"));
            };
            let values: Outcome<Vec<Scalar>> = items.into_iter().map(as_scalar).collect();
            matrix.axes.insert(axis, values?);
        }
    }
    matrix.include = matrix_entries(fields.take("include"))?;
    matrix.exclude = matrix_entries(fields.take("exclude"))?;
    fields.finish()?;
    Ok(matrix)
}

fn matrix_entries(value: Option<Value>) -> Outcome<Vec<IndexMap<String, Scalar>>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let Value::List(items) = value else {
        return Err(format!(
            "matrix include/exclude must be a list, found {}",
            value.describe()
        ));
    };
    items.into_iter().map(scalar_map).collect()
}

fn container(value: Value) -> Outcome<Container> {
    let mut fields = Fields::of(value, "Container")?;
    let container = Container {
        image: fields.take("image").map(as_string).transpose()?.unwrap_or_default(),
        credentials: fields
            .take("credentials")
            .map(container_credentials)
            .transpose()?,
        env: fields.take("env").map(expr_map).transpose()?.unwrap_or_default(),
        ports: scalar_list(fields.take("ports"))?,
        volumes: string_list(fields.take("volumes"))?,
        options: opt_string(fields.take("options"))?,
    };
    fields.finish()?;
    Ok(container)
}

fn container_credentials(value: Value) -> Outcome<ContainerCredentials> {
    let mut fields = Fields::of(value, "ContainerCredentials")?;
    let credentials = ContainerCredentials {
        username: fields
            .take("username")
            .map(as_expr)
            .transpose()?
            .ok_or("container credentials require a username")?,
        password: fields
            .take("password")
            .map(as_expr)
            .transpose()?
            .ok_or("container credentials require a password")?,
    };
    fields.finish()?;
    Ok(credentials)
}

fn container_map(value: Value) -> Outcome<IndexMap<String, Container>> {
    into_map(value)?
        .into_iter()
        .map(|(id, entry)| Ok((id, container(entry)?)))
        .collect()
}

fn step_list(value: Option<Value>) -> Outcome<Vec<Step>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let Value::List(items) = value else {
        return Err(format!("steps must be a list, found {}", value.describe()));
    };
    items.into_iter().map(step).collect()
}

/// Canonicalize a step entry. Anything that is not a `Step` record but
/// carries an action reference and inputs is treated as a step action.
fn step(value: Value) -> Outcome<Step> {
    let Value::Record(record) = value else {
        return Err(format!(
            "step entry is neither a step nor an action, found {}",
            value.describe()
        ));
    };
    if record.type_name == "Step" {
        let mut fields = Fields {
            type_name: record.type_name,
            map: record.fields,
        };
        let step = Step {
            id: opt_string(fields.take("id"))?,
            name: opt_string(fields.take("name"))?,
            if_condition: fields.take("if_condition").map(as_expr).transpose()?,
            uses: opt_string(fields.take("uses"))?,
            with: fields.take("with").map(scalar_map).transpose()?.unwrap_or_default(),
            run: opt_string(fields.take("run"))?,
            shell: opt_string(fields.take("shell"))?,
            env: fields.take("env").map(expr_map).transpose()?.unwrap_or_default(),
            working_directory: opt_string(fields.take("working_directory"))?,
            continue_on_error: fields.take("continue_on_error").map(as_bool).transpose()?,
            timeout_minutes: opt_u32(fields.take("timeout_minutes"))?,
        };
        fields.finish()?;
        return Ok(step);
    }
    // Step-action shape: an action reference plus inputs.
    if record.fields.contains_key("uses") {
        let mut fields = Fields {
            type_name: record.type_name,
            map: record.fields,
        };
        let step = Step {
            uses: opt_string(fields.take("uses"))?,
            with: fields.take("with").map(scalar_map).transpose()?.unwrap_or_default(),
            ..Step::default()
        };
        return Ok(step);
    }
    Err(format!(
        "step entry is neither a step nor an action, found a {} value",
        record.type_name
    ))
}

// ---- primitive conversions ----

pub(crate) fn as_string(value: Value) -> Outcome<String> {
    match value {
        Value::Str(text) => Ok(text),
        Value::Expr(Expr::Lit(text)) => Ok(text),
        other => Err(format!("expected a string, found {}", other.describe())),
    }
}

/// Like [`as_string`] but also stringifies numbers and booleans.
pub(crate) fn as_text(value: Value) -> Outcome<String> {
    match value {
        Value::Int(v) => Ok(v.to_string()),
        Value::Float(v) => Ok(v.to_string()),
        Value::Bool(v) => Ok(v.to_string()),
        other => as_string(other),
    }
}

pub(crate) fn as_expr(value: Value) -> Outcome<Expr> {
    match value {
        Value::Expr(expr) => Ok(expr),
        Value::Str(text) => Ok(Expr::lit(text)),
        Value::Int(v) => Ok(Expr::lit(v.to_string())),
        Value::Float(v) => Ok(Expr::lit(v.to_string())),
        Value::Bool(v) => Ok(Expr::lit(v.to_string())),
        other => Err(format!("expected an expression, found {}", other.describe())),
    }
}

fn as_scalar(value: Value) -> Outcome<Scalar> {
    match value {
        Value::Str(text) => Ok(Scalar::String(text)),
        Value::Int(v) => Ok(Scalar::Int(v)),
        Value::Float(v) => Ok(Scalar::Float(v)),
        Value::Bool(v) => Ok(Scalar::Bool(v)),
        Value::Expr(expr) => Ok(Scalar::String(expr.render())),
        other => Err(format!("expected a scalar, found {}", other.describe())),
    }
}

fn as_bool(value: Value) -> Outcome<bool> {
    match value {
        Value::Bool(v) => Ok(v),
        other => Err(format!("expected a boolean, found {}", other.describe())),
    }
}

fn opt_string(value: Option<Value>) -> Outcome<Option<String>> {
    let Some(value) = value else { return Ok(None) };
    let text = as_string(value)?;
    // Empty optional strings are the zero value; elide them.
    Ok((!text.is_empty()).then_some(text))
}

fn opt_u32(value: Option<Value>) -> Outcome<Option<u32>> {
    let Some(value) = value else { return Ok(None) };
    let Value::Int(raw) = value else {
        return Err(format!("expected an integer, found {}", value.describe()));
    };
    let number =
        u32::try_from(raw).map_err(|_| format!("integer {raw} is out of range"))?;
    Ok((number != 0).then_some(number))
}

fn string_list(value: Option<Value>) -> Outcome<Vec<String>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let Value::List(items) = value else {
        return Err(format!("expected a list, found {}", value.describe()));
    };
    items.into_iter().map(as_string).collect()
}

fn scalar_list(value: Option<Value>) -> Outcome<Vec<Scalar>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let Value::List(items) = value else {
        return Err(format!("expected a list, found {}", value.describe()));
    };
    items.into_iter().map(as_scalar).collect()
}

fn into_map(value: Value) -> Outcome<IndexMap<String, Value>> {
    match value {
        Value::Map(map) => Ok(map),
        other => Err(format!("expected a mapping, found {}", other.describe())),
    }
}

fn expr_map(value: Value) -> Outcome<IndexMap<String, Expr>> {
    into_map(value)?
        .into_iter()
        .map(|(key, entry)| Ok((key, as_expr(entry)?)))
        .collect()
}

fn scalar_map(value: Value) -> Outcome<IndexMap<String, Scalar>> {
    into_map(value)?
        .into_iter()
        .map(|(key, entry)| Ok((key, as_scalar(entry)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_action_canonicalization() {
        let action = Value::Record(
            Record::empty("SetupGo")
                .field("uses", Value::Str("actions/setup-go@v5".into()))
                .field(
                    "with",
                    Value::Map(IndexMap::from([(
                        "go-version".to_string(),
                        Value::Str("1.23".into()),
                    )])),
                ),
        );
        let step = step(action).unwrap();
        assert_eq!(step.uses.as_deref(), Some("actions/setup-go@v5"));
        assert_eq!(step.with["go-version"], Scalar::String("1.23".into()));
    }

    #[test]
    fn test_non_step_value_rejected() {
        let err = step(Value::Str("oops".into())).unwrap_err();
        assert!(err.contains("neither a step nor an action"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let record = Value::Record(
            Record::empty("Workflow").field("nmae", Value::Str("CI".into())),
        );
        let err = workflow(record).unwrap_err();
        assert!(err.contains("unknown field 'nmae'"));
    }

    #[test]
    fn test_zero_valued_optionals_elided() {
        let record = Value::Record(
            Record::empty("Job")
                .field("name", Value::Str(String::new()))
                .field("timeout_minutes", Value::Int(0))
                .field(
                    "runs_on",
                    Value::Variant {
                        type_name: "RunsOn".into(),
                        variant: "Label".into(),
                        args: vec![Value::Str("ubuntu-latest".into())],
                    },
                ),
        );
        let job = job(record).unwrap();
        assert_eq!(job.name, None);
        assert_eq!(job.timeout_minutes, None);
    }

    #[test]
    fn test_expr_values_stay_symbolic() {
        let record = Value::Record(Record::empty("Workflow").field(
            "env",
            Value::Map(IndexMap::from([(
                "SHA".to_string(),
                Value::Expr(Expr::context("github.sha")),
            )])),
        ));
        let workflow = workflow(record).unwrap();
        assert_eq!(workflow.env["SHA"], Expr::context("github.sha"));
    }
}
