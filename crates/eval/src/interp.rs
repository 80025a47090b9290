//! The initializer-expression interpreter.

use crate::materialize;
use crate::value::{EvalError, Record, Value};
use indexmap::IndexMap;
use std::collections::HashMap;
use syn::spanned::Spanned;
use tracing::debug;
use wag_discover::{Decl, DiscoveryResult};
use wag_model::{
    validate, validate_job_graph, CancelToken, CompareOp, Diagnostic, Workflow,
};

/// Workflows materialized from one discovery pass.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    /// Symbol name → materialized workflow, in discovery order.
    pub workflows: IndexMap<String, Workflow>,
    /// Per-workflow failures. A failed workflow is absent from `workflows`;
    /// the others are still present.
    pub errors: Vec<Diagnostic>,
}

impl ExtractionResult {
    /// Whether any error-severity diagnostic was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Diagnostic::is_error)
    }
}

/// Evaluate every discovered workflow declaration.
///
/// Shared symbols are evaluated once and memoized. Each workflow is
/// validated against the model invariants before being admitted; a failing
/// workflow is reported and skipped. Cancellation discards partial output.
#[must_use]
pub fn evaluate(discovery: &DiscoveryResult, cancel: &CancelToken) -> ExtractionResult {
    let mut interpreter = Interpreter::new(discovery);
    let mut result = ExtractionResult::default();

    for decl in &discovery.workflows {
        if cancel.is_cancelled() {
            return ExtractionResult {
                workflows: IndexMap::new(),
                errors: vec![Diagnostic::cancelled()],
            };
        }
        match materialize_workflow(&mut interpreter, decl) {
            Ok(workflow) => {
                let diagnostics: Vec<Diagnostic> = validate(&workflow)
                    .into_iter()
                    .chain(validate_job_graph(&workflow))
                    .map(|d| d.in_file(decl.file.clone()))
                    .collect();
                if diagnostics.iter().any(Diagnostic::is_error) {
                    debug!(workflow = %decl.name, "workflow failed validation");
                    result.errors.extend(diagnostics);
                } else {
                    result.errors.extend(diagnostics);
                    result.workflows.insert(decl.name.clone(), workflow);
                }
            }
            Err(err) => {
                let mut diagnostic = Diagnostic::error(
                    err.kind,
                    format!("evaluating '{}': {}", decl.name, err.message),
                );
                diagnostic = diagnostic.at(
                    decl.file.clone(),
                    err.line.unwrap_or(decl.line),
                    err.column.unwrap_or(1),
                );
                result.errors.push(diagnostic);
            }
        }
    }
    result
}

fn materialize_workflow(
    interpreter: &mut Interpreter<'_>,
    decl: &Decl,
) -> Result<Workflow, EvalError> {
    let value = interpreter.eval(&decl.init)?;
    materialize::workflow(value).map_err(EvalError::new)
}

struct Interpreter<'a> {
    symbols: HashMap<&'a str, &'a Decl>,
    memo: HashMap<String, Value>,
    in_progress: Vec<String>,
    locals: Vec<HashMap<String, Value>>,
}

impl<'a> Interpreter<'a> {
    fn new(discovery: &'a DiscoveryResult) -> Self {
        Self {
            symbols: discovery
                .all_decls()
                .map(|decl| (decl.name.as_str(), decl))
                .collect(),
            memo: HashMap::new(),
            in_progress: Vec::new(),
            locals: Vec::new(),
        }
    }

    fn eval(&mut self, expr: &syn::Expr) -> Result<Value, EvalError> {
        match expr {
            syn::Expr::Lit(lit) => eval_lit(&lit.lit),
            syn::Expr::Path(path) => self.eval_path(path),
            syn::Expr::Call(call) => self.eval_call(call),
            syn::Expr::MethodCall(call) => self.eval_method(call),
            syn::Expr::Macro(mac) => self.eval_macro(&mac.mac),
            syn::Expr::Struct(literal) => self.eval_struct(literal),
            syn::Expr::Array(array) => {
                let mut items = Vec::with_capacity(array.elems.len());
                for element in &array.elems {
                    items.push(self.eval(element)?);
                }
                Ok(Value::List(items))
            }
            syn::Expr::Tuple(tuple) => {
                let mut items = Vec::with_capacity(tuple.elems.len());
                for element in &tuple.elems {
                    items.push(self.eval(element)?);
                }
                Ok(Value::Tuple(items))
            }
            syn::Expr::Reference(reference) => self.eval(&reference.expr),
            syn::Expr::Paren(paren) => self.eval(&paren.expr),
            syn::Expr::Group(group) => self.eval(&group.expr),
            syn::Expr::Block(block) => self.eval_block(&block.block),
            syn::Expr::Unary(unary) => self.eval_unary(unary),
            syn::Expr::Field(field) => self.eval_field(field),
            other => Err(
                EvalError::new("unsupported expression in initializer").at_span(other.span())
            ),
        }
    }

    fn eval_path(&mut self, path: &syn::ExprPath) -> Result<Value, EvalError> {
        let segments: Vec<String> = path
            .path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect();
        match segments.as_slice() {
            [single] => {
                if single == "None" {
                    return Ok(Value::Nothing);
                }
                for scope in self.locals.iter().rev() {
                    if let Some(value) = scope.get(single) {
                        return Ok(value.clone());
                    }
                }
                if self.symbols.contains_key(single.as_str()) {
                    return self.resolve_symbol(single, path.span());
                }
                Err(EvalError::reference(format!("unknown name '{single}'"))
                    .at_span(path.span()))
            }
            [type_name, variant]
                if variant.chars().next().is_some_and(char::is_uppercase) =>
            {
                Ok(Value::Variant {
                    type_name: type_name.clone(),
                    variant: variant.clone(),
                    args: Vec::new(),
                })
            }
            _ => Err(EvalError::new(format!(
                "unsupported path '{}'",
                segments.join("::")
            ))
            .at_span(path.span())),
        }
    }

    fn resolve_symbol(
        &mut self,
        name: &str,
        span: proc_macro2::Span,
    ) -> Result<Value, EvalError> {
        if let Some(value) = self.memo.get(name) {
            return Ok(value.clone());
        }
        if self.in_progress.iter().any(|n| n == name) {
            return Err(EvalError::reference(format!(
                "cyclic reference involving '{name}'"
            ))
            .at_span(span));
        }
        let Some(decl) = self.symbols.get(name).copied() else {
            return Err(
                EvalError::reference(format!("unknown name '{name}'")).at_span(span)
            );
        };
        self.in_progress.push(name.to_string());
        let outcome = self.eval(&decl.init);
        self.in_progress.pop();
        let value = outcome?;
        self.memo.insert(name.to_string(), value.clone());
        Ok(value)
    }

    fn eval_call(&mut self, call: &syn::ExprCall) -> Result<Value, EvalError> {
        let syn::Expr::Path(func) = call.func.as_ref() else {
            return Err(EvalError::new("unsupported call target").at_span(call.span()));
        };
        let segments: Vec<String> = func
            .path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect();
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval(arg)?);
        }

        if segments.len() == 1 {
            if segments[0] == "Some" && args.len() == 1 {
                let inner = args.remove(0);
                return Ok(Value::Just(Box::new(inner)));
            }
            return Err(EvalError::new(format!(
                "unsupported function '{}'",
                segments[0]
            ))
            .at_span(call.span()));
        }

        let type_name = segments[segments.len() - 2].clone();
        let method = segments[segments.len() - 1].clone();
        constructor(&type_name, &method, args)
            .map_err(|err| err.at_span(call.span()))
    }

    fn eval_method(&mut self, call: &syn::ExprMethodCall) -> Result<Value, EvalError> {
        let receiver = self.eval(&call.receiver)?;
        let method = call.method.to_string();
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval(arg)?);
        }
        apply_method(receiver, &method, args).map_err(|err| err.at_span(call.span()))
    }

    fn eval_macro(&mut self, mac: &syn::Macro) -> Result<Value, EvalError> {
        let name = mac
            .path
            .segments
            .last()
            .map(|s| s.ident.to_string())
            .unwrap_or_default();
        if name == "vec" {
            let elements = mac
                .parse_body_with(
                    syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated,
                )
                .map_err(|err| EvalError::new(err.to_string()).at_span(mac.span()))?;
            let mut items = Vec::with_capacity(elements.len());
            for element in &elements {
                items.push(self.eval(element)?);
            }
            return Ok(Value::List(items));
        }
        Err(EvalError::new(format!("unsupported macro '{name}!'")).at_span(mac.span()))
    }

    fn eval_struct(&mut self, literal: &syn::ExprStruct) -> Result<Value, EvalError> {
        let Some(type_name) = literal.path.segments.last().map(|s| s.ident.to_string())
        else {
            return Err(EvalError::new("struct literal without a type").at_span(literal.span()));
        };

        let mut base = match &literal.rest {
            Some(rest) => {
                let tail = self.eval(rest)?;
                match tail {
                    Value::Record(record)
                        if record.type_name == type_name
                            || record.type_name == "Default" =>
                    {
                        Record {
                            type_name: type_name.clone(),
                            ..record
                        }
                    }
                    other => {
                        return Err(EvalError::new(format!(
                            "struct tail of {type_name} is {}",
                            other.describe()
                        ))
                        .at_span(literal.span()));
                    }
                }
            }
            None => Record {
                type_name: type_name.clone(),
                fields: IndexMap::new(),
                defaulted: false,
            },
        };

        for field in &literal.fields {
            let syn::Member::Named(ident) = &field.member else {
                return Err(
                    EvalError::new("unsupported tuple-struct literal").at_span(field.span())
                );
            };
            let value = self.eval(&field.expr)?;
            base.fields.insert(ident.to_string(), value);
        }
        Ok(Value::Record(base))
    }

    fn eval_block(&mut self, block: &syn::Block) -> Result<Value, EvalError> {
        self.locals.push(HashMap::new());
        let result = self.eval_block_inner(block);
        self.locals.pop();
        result
    }

    fn eval_block_inner(&mut self, block: &syn::Block) -> Result<Value, EvalError> {
        let mut tail = None;
        for statement in &block.stmts {
            match statement {
                syn::Stmt::Local(local) => {
                    let syn::Pat::Ident(pat) = &local.pat else {
                        return Err(EvalError::new("unsupported let pattern")
                            .at_span(local.span()));
                    };
                    let Some(init) = &local.init else {
                        return Err(EvalError::new("let binding without initializer")
                            .at_span(local.span()));
                    };
                    let value = self.eval(&init.expr)?;
                    if let Some(scope) = self.locals.last_mut() {
                        scope.insert(pat.ident.to_string(), value);
                    }
                }
                syn::Stmt::Expr(expr, None) => {
                    tail = Some(self.eval(expr)?);
                }
                other => {
                    return Err(
                        EvalError::new("unsupported statement in initializer block")
                            .at_span(other.span()),
                    );
                }
            }
        }
        tail.ok_or_else(|| {
            EvalError::new("initializer block has no trailing expression").at_span(block.span())
        })
    }

    fn eval_unary(&mut self, unary: &syn::ExprUnary) -> Result<Value, EvalError> {
        let syn::UnOp::Not(_) = unary.op else {
            return Err(EvalError::new("unsupported unary operator").at_span(unary.span()));
        };
        match self.eval(&unary.expr)? {
            Value::Bool(value) => Ok(Value::Bool(!value)),
            Value::Expr(expr) => Ok(Value::Expr(expr.not())),
            other => Err(EvalError::new(format!("cannot negate {}", other.describe()))
                .at_span(unary.span())),
        }
    }

    fn eval_field(&mut self, field: &syn::ExprField) -> Result<Value, EvalError> {
        let receiver = self.eval(&field.base)?;
        let syn::Member::Named(ident) = &field.member else {
            return Err(EvalError::new("unsupported tuple field access").at_span(field.span()));
        };
        let name = ident.to_string();
        match receiver {
            Value::Record(record) => record.fields.get(&name).cloned().ok_or_else(|| {
                EvalError::new(format!(
                    "field '{name}' is not set on {}",
                    record.type_name
                ))
                .at_span(field.span())
            }),
            other => Err(EvalError::new(format!(
                "cannot access field '{name}' of {}",
                other.describe()
            ))
            .at_span(field.span())),
        }
    }
}

/// Interpret a `Type::method(args)` constructor call.
fn constructor(
    type_name: &str,
    method: &str,
    args: Vec<Value>,
) -> Result<Value, EvalError> {
    // Enum variants are calls whose "method" is capitalized.
    if method.chars().next().is_some_and(char::is_uppercase) {
        return Ok(Value::Variant {
            type_name: type_name.to_string(),
            variant: method.to_string(),
            args,
        });
    }
    if method == "default" {
        return Ok(Value::Record(Record::empty(type_name)));
    }

    let take = |index: usize| -> Result<Value, EvalError> {
        args.get(index).cloned().ok_or_else(|| {
            EvalError::new(format!(
                "'{type_name}::{method}' is missing argument {index}"
            ))
        })
    };

    match (type_name, method) {
        ("IndexMap" | "HashMap" | "BTreeMap", "from") => {
            let Value::List(entries) = take(0)? else {
                return Err(EvalError::new(format!(
                    "'{type_name}::from' expects an array of pairs"
                )));
            };
            let mut map = IndexMap::new();
            for entry in entries {
                let Value::Tuple(pair) = entry else {
                    return Err(EvalError::new(format!(
                        "'{type_name}::from' entries must be (key, value) pairs"
                    )));
                };
                let [key, value]: [Value; 2] = pair.try_into().map_err(|_| {
                    EvalError::new(format!(
                        "'{type_name}::from' entries must be (key, value) pairs"
                    ))
                })?;
                let key = materialize::as_string(key).map_err(EvalError::new)?;
                map.insert(key, value);
            }
            Ok(Value::Map(map))
        }
        ("IndexMap" | "HashMap" | "BTreeMap", "new") => Ok(Value::Map(IndexMap::new())),
        ("Vec", "new") => Ok(Value::List(Vec::new())),
        ("Vec", "from") => match take(0)? {
            Value::List(items) => Ok(Value::List(items)),
            other => Err(EvalError::new(format!(
                "'Vec::from' expects an array, found {}",
                other.describe()
            ))),
        },
        ("String", "new") => Ok(Value::Str(String::new())),
        ("String", "from") => take(0),
        ("Expr", "lit") => {
            let text = materialize::as_text(take(0)?).map_err(EvalError::new)?;
            Ok(Value::Expr(wag_model::Expr::lit(text)))
        }
        ("Expr", "context") => {
            let path = materialize::as_string(take(0)?).map_err(EvalError::new)?;
            Ok(Value::Expr(wag_model::Expr::context(path)))
        }
        ("Expr", "call") => {
            let name = materialize::as_string(take(0)?).map_err(EvalError::new)?;
            let Value::List(raw) = take(1)? else {
                return Err(EvalError::new("'Expr::call' expects an argument list"));
            };
            let mut call_args = Vec::with_capacity(raw.len());
            for value in raw {
                call_args.push(materialize::as_expr(value).map_err(EvalError::new)?);
            }
            Ok(Value::Expr(wag_model::Expr::call(name, call_args)))
        }
        ("Step", "uses") => Ok(Value::Record(Record::empty("Step").field("uses", take(0)?))),
        ("Step", "run") => Ok(Value::Record(Record::empty("Step").field("run", take(0)?))),
        ("Job", "on") => Ok(Value::Record(
            Record::empty("Job")
                .field(
                    "runs_on",
                    Value::Variant {
                        type_name: "RunsOn".into(),
                        variant: "Label".into(),
                        args: vec![take(0)?],
                    },
                )
                .field("steps", take(1)?),
        )),
        ("Job", "reusable") => {
            Ok(Value::Record(Record::empty("Job").field("uses", take(0)?)))
        }
        ("Workflow", "named") => {
            Ok(Value::Record(Record::empty("Workflow").field("name", take(0)?)))
        }
        ("TypesTrigger", "bare") => Ok(Value::Record(Record::empty("TypesTrigger"))),
        ("TypesTrigger", "with_types") => Ok(Value::Record(
            Record::empty("TypesTrigger").field("types", take(0)?),
        )),
        ("Cron", "new") => Ok(Value::Record(Record::empty("Cron").field("cron", take(0)?))),
        ("Concurrency", "group") => Ok(Value::Record(
            Record::empty("Concurrency").field("group", take(0)?),
        )),
        ("RunsOn", "label") => Ok(Value::Variant {
            type_name: "RunsOn".into(),
            variant: "Label".into(),
            args: vec![take(0)?],
        }),
        ("Action", "new") => Ok(Value::Record(Record::empty("Action").field("uses", take(0)?))),
        ("Container", "image") => Ok(Value::Record(
            Record::empty("Container").field("image", take(0)?),
        )),
        _ => Err(EvalError::new(format!(
            "unsupported constructor '{type_name}::{method}'"
        ))),
    }
}

/// Apply a method call to an evaluated receiver.
fn apply_method(receiver: Value, method: &str, args: Vec<Value>) -> Result<Value, EvalError> {
    // Ownership/conversion adapters are identity over interpreted values.
    match method {
        "clone" | "into" | "to_owned" | "as_str" | "to_vec" => return Ok(receiver),
        "to_string" => {
            return Ok(match receiver {
                Value::Int(v) => Value::Str(v.to_string()),
                Value::Float(v) => Value::Str(v.to_string()),
                Value::Bool(v) => Value::Str(v.to_string()),
                other => other,
            });
        }
        _ => {}
    }

    let take = |index: usize| -> Result<Value, EvalError> {
        args.get(index).cloned().ok_or_else(|| {
            EvalError::new(format!("'{method}' is missing argument {index}"))
        })
    };

    if let Value::Expr(expr) = &receiver {
        let expr = expr.clone();
        let operand = |value: Value| materialize::as_expr(value).map_err(EvalError::new);
        return match method {
            "not" => Ok(Value::Expr(expr.not())),
            "and" => Ok(Value::Expr(expr.and(operand(take(0)?)?))),
            "or" => Ok(Value::Expr(expr.or(operand(take(0)?)?))),
            "eq" => Ok(Value::Expr(expr.eq(operand(take(0)?)?))),
            "ne" => Ok(Value::Expr(expr.ne(operand(take(0)?)?))),
            "compare" => {
                let op = compare_op(take(0)?)?;
                Ok(Value::Expr(expr.compare(op, operand(take(1)?)?)))
            }
            _ => Err(EvalError::new(format!(
                "unsupported method '{method}' on an expression"
            ))),
        };
    }

    let Value::Record(mut record) = receiver else {
        return Err(EvalError::new(format!(
            "unsupported method '{method}' on {}",
            receiver.describe()
        )));
    };

    match (record.type_name.as_str(), method) {
        ("Step", "with_name") => record.fields.insert("name".into(), take(0)?),
        ("Step", "with_id") => record.fields.insert("id".into(), take(0)?),
        ("Step", "with_if") => record.fields.insert("if_condition".into(), take(0)?),
        ("Step", "with_input") | ("Action", "input") => {
            insert_into_map_field(&mut record, "with", take(0)?, take(1)?)?;
            None
        }
        ("Step", "with_env") => {
            insert_into_map_field(&mut record, "env", take(0)?, take(1)?)?;
            None
        }
        ("Job", "needs") => {
            let entry = take(0)?;
            match record.fields.entry("needs".into()).or_insert_with(|| Value::List(Vec::new())) {
                Value::List(items) => items.push(entry),
                other => {
                    return Err(EvalError::new(format!(
                        "'needs' is {}, not a list",
                        other.describe()
                    )));
                }
            }
            None
        }
        ("Concurrency", "cancel_in_progress") => record
            .fields
            .insert("cancel_in_progress".into(), Value::Bool(true)),
        _ => {
            return Err(EvalError::new(format!(
                "unsupported method '{method}' on {}",
                record.type_name
            )));
        }
    };
    Ok(Value::Record(record))
}

fn insert_into_map_field(
    record: &mut Record,
    field: &str,
    key: Value,
    value: Value,
) -> Result<(), EvalError> {
    let key = materialize::as_string(key).map_err(EvalError::new)?;
    match record
        .fields
        .entry(field.to_string())
        .or_insert_with(|| Value::Map(IndexMap::new()))
    {
        Value::Map(map) => {
            map.insert(key, value);
            Ok(())
        }
        other => Err(EvalError::new(format!(
            "'{field}' is {}, not a mapping",
            other.describe()
        ))),
    }
}

fn compare_op(value: Value) -> Result<CompareOp, EvalError> {
    let Value::Variant {
        type_name, variant, ..
    } = &value
    else {
        return Err(EvalError::new("comparison operator must be a CompareOp"));
    };
    if type_name != "CompareOp" {
        return Err(EvalError::new("comparison operator must be a CompareOp"));
    }
    match variant.as_str() {
        "Eq" => Ok(CompareOp::Eq),
        "Ne" => Ok(CompareOp::Ne),
        "Lt" => Ok(CompareOp::Lt),
        "Le" => Ok(CompareOp::Le),
        "Gt" => Ok(CompareOp::Gt),
        "Ge" => Ok(CompareOp::Ge),
        other => Err(EvalError::new(format!("unknown comparison operator '{other}'"))),
    }
}

fn eval_lit(lit: &syn::Lit) -> Result<Value, EvalError> {
    match lit {
        syn::Lit::Str(value) => Ok(Value::Str(value.value())),
        syn::Lit::Int(value) => value
            .base10_parse::<i64>()
            .map(Value::Int)
            .map_err(|err| EvalError::new(err.to_string()).at_span(lit.span())),
        syn::Lit::Float(value) => value
            .base10_parse::<f64>()
            .map(Value::Float)
            .map_err(|err| EvalError::new(err.to_string()).at_span(lit.span())),
        syn::Lit::Bool(value) => Ok(Value::Bool(value.value)),
        other => Err(EvalError::new("unsupported literal").at_span(other.span())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wag_discover::{Decl, DeclKind};
    use wag_model::{DiagnosticKind, RunsOn};

    fn decl(name: &str, kind: DeclKind, source: &str) -> Decl {
        Decl {
            name: name.into(),
            file: format!("{}.rs", name.to_lowercase()).into(),
            line: 1,
            kind,
            init: syn::parse_str(source).unwrap(),
        }
    }

    fn discovery(decls: Vec<Decl>) -> DiscoveryResult {
        let mut result = DiscoveryResult::default();
        for d in decls {
            result.references.insert(d.name.clone(), Vec::new());
            match d.kind {
                DeclKind::Workflow => result.workflows.push(d),
                DeclKind::Job => result.jobs.push(d),
                DeclKind::Triggers => result.triggers.push(d),
                DeclKind::Steps => result.step_lists.push(d),
                _ => result.others.push(d),
            }
        }
        result
    }

    #[test]
    fn test_struct_literal_workflow() {
        let discovery = discovery(vec![decl(
            "Ci",
            DeclKind::Workflow,
            r#"Workflow {
                name: "CI".into(),
                on: Triggers {
                    push: Some(PushTrigger {
                        branches: vec!["main".into()],
                        ..PushTrigger::default()
                    }),
                    ..Triggers::default()
                },
                jobs: IndexMap::from([(
                    "build".into(),
                    Job::on("ubuntu-latest", [Step::run("cargo test")]),
                )]),
                ..Workflow::default()
            }"#,
        )]);
        let result = evaluate(&discovery, &CancelToken::new());
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let workflow = &result.workflows["Ci"];
        assert_eq!(workflow.name, "CI");
        assert_eq!(
            workflow.on.push.as_ref().unwrap().branches,
            vec!["main".to_string()]
        );
        let job = &workflow.jobs["build"];
        assert_eq!(job.runs_on, RunsOn::Label("ubuntu-latest".into()));
        assert_eq!(job.steps[0].run.as_deref(), Some("cargo test"));
    }

    #[test]
    fn test_cross_symbol_references_are_memoized() {
        let discovery = discovery(vec![
            decl(
                "SharedSteps",
                DeclKind::Steps,
                r#"vec![Step::uses("actions/checkout@v4")]"#,
            ),
            decl(
                "Build",
                DeclKind::Job,
                r#"Job { runs_on: RunsOn::Label("ubuntu-latest".into()), steps: SharedSteps.clone(), ..Job::default() }"#,
            ),
            decl(
                "Ci",
                DeclKind::Workflow,
                r#"Workflow {
                    name: "CI".into(),
                    jobs: IndexMap::from([("build".into(), Build.clone())]),
                    ..Workflow::default()
                }"#,
            ),
            decl(
                "Release",
                DeclKind::Workflow,
                r#"Workflow {
                    name: "Release".into(),
                    jobs: IndexMap::from([("build".into(), Build.clone())]),
                    ..Workflow::default()
                }"#,
            ),
        ]);
        let result = evaluate(&discovery, &CancelToken::new());
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(result.workflows.len(), 2);
        assert_eq!(
            result.workflows["Ci"].jobs["build"].steps[0].uses.as_deref(),
            Some("actions/checkout@v4")
        );
    }

    #[test]
    fn test_builder_chain_and_expressions() {
        let discovery = discovery(vec![decl(
            "Ci",
            DeclKind::Workflow,
            r#"Workflow {
                name: "CI".into(),
                jobs: IndexMap::from([(
                    "deploy".into(),
                    Job {
                        runs_on: RunsOn::Label("ubuntu-latest".into()),
                        if_condition: Some(
                            Expr::context("github.ref").eq(Expr::lit("refs/heads/main")),
                        ),
                        steps: vec![
                            Step::run("make deploy").with_name("Deploy").with_env(
                                "TOKEN",
                                Expr::context("secrets.DEPLOY_TOKEN"),
                            ),
                        ],
                        ..Job::default()
                    },
                )]),
                ..Workflow::default()
            }"#,
        )]);
        let result = evaluate(&discovery, &CancelToken::new());
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let job = &result.workflows["Ci"].jobs["deploy"];
        assert_eq!(
            job.if_condition.as_ref().unwrap().render(),
            "${{ github.ref == 'refs/heads/main' }}"
        );
        let step = &job.steps[0];
        assert_eq!(step.name.as_deref(), Some("Deploy"));
        assert_eq!(
            step.env["TOKEN"].render(),
            "${{ secrets.DEPLOY_TOKEN }}"
        );
    }

    #[test]
    fn test_cyclic_reference_is_reference_error() {
        let discovery = discovery(vec![
            decl(
                "Ci",
                DeclKind::Workflow,
                r#"Workflow {
                    name: Cycle.name.clone(),
                    ..Workflow::default()
                }"#,
            ),
            decl(
                "Cycle",
                DeclKind::Job,
                r#"Job { name: Some("x".into()), needs: vec![Cycle2.clone()], ..Job::default() }"#,
            ),
            decl(
                "Cycle2",
                DeclKind::Job,
                r#"Job { name: Some("y".into()), needs: vec![Cycle.clone()], ..Job::default() }"#,
            ),
        ]);
        let result = evaluate(&discovery, &CancelToken::new());
        assert!(result.workflows.is_empty());
        assert!(result
            .errors
            .iter()
            .any(|d| d.kind == DiagnosticKind::ReferenceError
                && d.message.contains("cyclic reference")));
    }

    #[test]
    fn test_failing_workflow_does_not_block_others() {
        let discovery = discovery(vec![
            decl(
                "Broken",
                DeclKind::Workflow,
                r#"Workflow { name: Missing.clone(), ..Workflow::default() }"#,
            ),
            decl(
                "Ok",
                DeclKind::Workflow,
                r#"Workflow {
                    name: "OK".into(),
                    jobs: IndexMap::from([(
                        "build".into(),
                        Job::on("ubuntu-latest", [Step::run("true")]),
                    )]),
                    ..Workflow::default()
                }"#,
            ),
        ]);
        let result = evaluate(&discovery, &CancelToken::new());
        assert_eq!(result.workflows.len(), 1);
        assert!(result.workflows.contains_key("Ok"));
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("'Broken'"));
    }

    #[test]
    fn test_needs_job_value_canonicalized_to_name() {
        let discovery = discovery(vec![
            decl(
                "Build",
                DeclKind::Job,
                r#"Job {
                    name: Some("build".into()),
                    runs_on: RunsOn::Label("ubuntu-latest".into()),
                    steps: vec![Step::run("cargo build")],
                    ..Job::default()
                }"#,
            ),
            decl(
                "Ci",
                DeclKind::Workflow,
                r#"Workflow {
                    name: "CI".into(),
                    jobs: IndexMap::from([
                        ("build".into(), Build.clone()),
                        (
                            "test".into(),
                            Job {
                                runs_on: RunsOn::Label("ubuntu-latest".into()),
                                needs: vec![Build.clone()],
                                steps: vec![Step::run("cargo test")],
                                ..Job::default()
                            },
                        ),
                    ]),
                    ..Workflow::default()
                }"#,
            ),
        ]);
        let result = evaluate(&discovery, &CancelToken::new());
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(
            result.workflows["Ci"].jobs["test"].needs,
            vec!["build".to_string()]
        );
    }

    #[test]
    fn test_invalid_workflow_is_reported_and_skipped() {
        // Job with steps and uses at once fails model validation.
        let discovery = discovery(vec![decl(
            "Ci",
            DeclKind::Workflow,
            r#"Workflow {
                name: "CI".into(),
                jobs: IndexMap::from([(
                    "build".into(),
                    Job {
                        runs_on: RunsOn::Label("ubuntu-latest".into()),
                        steps: vec![Step::run("true")],
                        uses: Some("org/repo/.github/workflows/x.yml@main".into()),
                        ..Job::default()
                    },
                )]),
                ..Workflow::default()
            }"#,
        )]);
        let result = evaluate(&discovery, &CancelToken::new());
        assert!(result.workflows.is_empty());
        assert!(result
            .errors
            .iter()
            .any(|d| d.kind == DiagnosticKind::InvariantError));
    }

    #[test]
    fn test_cancellation_discards_partial_output() {
        let discovery = discovery(vec![decl(
            "Ci",
            DeclKind::Workflow,
            r#"Workflow { name: "CI".into(), ..Workflow::default() }"#,
        )]);
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = evaluate(&discovery, &cancel);
        assert!(result.workflows.is_empty());
        assert_eq!(result.errors[0].kind, DiagnosticKind::Cancelled);
    }
}
