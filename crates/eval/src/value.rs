//! The neutral value universe the interpreter produces.

use indexmap::IndexMap;
use wag_model::{DiagnosticKind, Expr};

/// A runtime value produced by interpreting an initializer expression.
///
/// Values stay neutral: entity semantics (which fields a `Job` has, how a
/// `StepAction` canonicalizes) live in the materializer, not here.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string literal or string-like value.
    Str(String),
    /// An integer literal.
    Int(i64),
    /// A floating-point literal.
    Float(f64),
    /// A boolean literal.
    Bool(bool),
    /// A list (`vec![…]` or an array literal).
    List(Vec<Value>),
    /// A tuple, as used in `IndexMap::from([(k, v)])` entries.
    Tuple(Vec<Value>),
    /// A string-keyed mapping with insertion order preserved.
    Map(IndexMap<String, Value>),
    /// `None`.
    Nothing,
    /// `Some(inner)`.
    Just(Box<Value>),
    /// A struct value, by type name and explicit fields.
    Record(Record),
    /// An enum value, e.g. `RunsOn::Label("ubuntu-latest")`.
    Variant {
        /// Enum type name.
        type_name: String,
        /// Variant name.
        variant: String,
        /// Tuple-variant payload, empty for unit variants.
        args: Vec<Value>,
    },
    /// An already-built expression term.
    Expr(Expr),
}

/// A struct value.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The struct's type name, e.g. `Workflow`. `Default` marks a bare
    /// `Default::default()` whose type comes from context.
    pub type_name: String,
    /// Explicitly assigned fields.
    pub fields: IndexMap<String, Value>,
    /// Whether unassigned fields take their default (a
    /// `..Default::default()` tail or a defaulting constructor).
    pub defaulted: bool,
}

impl Record {
    /// A `T::default()` value with no explicit fields.
    #[must_use]
    pub fn empty(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
            defaulted: true,
        }
    }

    /// Add an explicit field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

impl Value {
    /// A short noun for this value's shape, used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Str(_) => "a string".into(),
            Self::Int(_) => "an integer".into(),
            Self::Float(_) => "a float".into(),
            Self::Bool(_) => "a boolean".into(),
            Self::List(_) => "a list".into(),
            Self::Tuple(_) => "a tuple".into(),
            Self::Map(_) => "a mapping".into(),
            Self::Nothing => "None".into(),
            Self::Just(inner) => inner.describe(),
            Self::Record(record) => format!("a {} value", record.type_name),
            Self::Variant {
                type_name, variant, ..
            } => format!("{type_name}::{variant}"),
            Self::Expr(_) => "an expression".into(),
        }
    }

    /// Strip a `Some(…)` wrapper, mapping `None` to `None`.
    #[must_use]
    pub fn unwrap_option(self) -> Option<Value> {
        match self {
            Self::Nothing => None,
            Self::Just(inner) => Some(*inner),
            other => Some(other),
        }
    }
}

/// An evaluation failure for one symbol or workflow.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    /// `reference-error` for unknown or cyclic names, `evaluation-error`
    /// for everything else.
    pub kind: DiagnosticKind,
    /// What went wrong.
    pub message: String,
    /// 1-based source line, when a span is available.
    pub line: Option<usize>,
    /// 1-based source column.
    pub column: Option<usize>,
}

impl EvalError {
    /// An evaluation error with no location.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::EvaluationError,
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// A reference error (unknown name, cyclic reference).
    pub fn reference(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::ReferenceError,
            ..Self::new(message)
        }
    }

    /// Attach the location of the offending expression.
    #[must_use]
    pub fn at_span(mut self, span: proc_macro2::Span) -> Self {
        if self.line.is_none() {
            let start = span.start();
            self.line = Some(start.line);
            self.column = Some(start.column + 1);
        }
        self
    }
}
