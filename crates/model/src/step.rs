//! Steps and step-like values.

use crate::expr::Expr;
use indexmap::IndexMap;
use std::fmt;

/// A plain YAML scalar, used for `with:` inputs and matrix values.
///
/// Values are kept opaque so any scalar type survives a round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A string value.
    String(String),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
}

impl Scalar {
    /// The string form of this scalar, without YAML quoting.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A step within a job.
///
/// A step is either an action reference (`uses` + `with`) or a shell command
/// (`run` + `shell`), never both; [`crate::validate`] enforces the split.
/// Steps are identified by value equality, which is what lets the importer
/// bind identical step lists to a single shared symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    /// Step id, unique within a job when present.
    pub id: Option<String>,
    /// Step display name.
    pub name: Option<String>,
    /// Conditional execution expression.
    pub if_condition: Option<Expr>,
    /// Action reference, e.g. `actions/checkout@v4`.
    pub uses: Option<String>,
    /// Action inputs for `uses` steps.
    pub with: IndexMap<String, Scalar>,
    /// Shell command(s).
    pub run: Option<String>,
    /// Shell for `run` steps, e.g. `bash`.
    pub shell: Option<String>,
    /// Step environment variables.
    pub env: IndexMap<String, Expr>,
    /// Working directory for `run` steps.
    pub working_directory: Option<String>,
    /// Continue the job when this step fails.
    pub continue_on_error: Option<bool>,
    /// Step timeout in minutes.
    pub timeout_minutes: Option<u32>,
}

impl Step {
    /// Create a step that uses an action.
    pub fn uses(action: impl Into<String>) -> Self {
        Self {
            uses: Some(action.into()),
            ..Self::default()
        }
    }

    /// Create a step that runs a shell command.
    pub fn run(command: impl Into<String>) -> Self {
        Self {
            run: Some(command.into()),
            ..Self::default()
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the step id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a `with:` input.
    #[must_use]
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.with.insert(key.into(), value.into());
        self
    }

    /// Add an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set a condition.
    #[must_use]
    pub fn with_if(mut self, condition: Expr) -> Self {
        self.if_condition = Some(condition);
        self
    }

    /// Whether this step is an action reference rather than a command.
    #[must_use]
    pub const fn is_action(&self) -> bool {
        self.uses.is_some()
    }
}

/// Capability pair for polymorphic step carriers.
///
/// Anything that can name an action and produce its inputs can stand in for
/// a [`Step`] in a step list; the evaluator canonicalizes such values by
/// calling both capabilities.
pub trait StepAction {
    /// The action reference, e.g. `actions/setup-go@v5`.
    fn action_ref(&self) -> String;

    /// The `with:` inputs for the action.
    fn inputs(&self) -> IndexMap<String, Scalar>;
}

impl<T: StepAction + ?Sized> From<&T> for Step {
    fn from(action: &T) -> Self {
        Self {
            uses: Some(action.action_ref()),
            with: action.inputs(),
            ..Self::default()
        }
    }
}

/// A concrete [`StepAction`] carrier for ad-hoc action references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    /// The action reference.
    pub uses: String,
    /// The action inputs.
    pub with: IndexMap<String, Scalar>,
}

impl Action {
    /// Create an action carrier.
    pub fn new(uses: impl Into<String>) -> Self {
        Self {
            uses: uses.into(),
            with: IndexMap::new(),
        }
    }

    /// Add a `with:` input.
    #[must_use]
    pub fn input(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.with.insert(key.into(), value.into());
        self
    }
}

impl StepAction for Action {
    fn action_ref(&self) -> String {
        self.uses.clone()
    }

    fn inputs(&self) -> IndexMap<String, Scalar> {
        self.with.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_builder() {
        let step = Step::uses("actions/checkout@v4")
            .with_name("Checkout")
            .with_input("fetch-depth", 2);
        assert_eq!(step.name.as_deref(), Some("Checkout"));
        assert_eq!(step.uses.as_deref(), Some("actions/checkout@v4"));
        assert_eq!(step.with.get("fetch-depth"), Some(&Scalar::Int(2)));
    }

    #[test]
    fn test_step_action_canonicalization() {
        let action = Action::new("actions/setup-go@v5").input("go-version", "1.23");
        let step: Step = Step::from(&action);
        assert_eq!(step.uses.as_deref(), Some("actions/setup-go@v5"));
        assert_eq!(
            step.with.get("go-version"),
            Some(&Scalar::String("1.23".into()))
        );
        assert!(step.run.is_none());
    }

    #[test]
    fn test_steps_compare_by_value() {
        let a = Step::run("echo hello");
        let b = Step::run("echo hello");
        assert_eq!(a, b);
    }
}
