//! Jobs and job-level configuration.

use crate::expr::Expr;
use crate::step::{Scalar, Step};
use crate::workflow::{Concurrency, Permissions, RunDefaults};
use indexmap::IndexMap;

/// Runner specification for where a job runs.
#[derive(Debug, Clone, PartialEq)]
pub enum RunsOn {
    /// Single runner label, e.g. `ubuntu-latest`.
    Label(String),
    /// Multiple labels; the runner must match all of them.
    Labels(Vec<String>),
    /// An expression, e.g. `${{ matrix.os }}`.
    Expression(Expr),
}

impl Default for RunsOn {
    fn default() -> Self {
        Self::Label(String::new())
    }
}

impl RunsOn {
    /// Create a single-label runner spec.
    pub fn label(label: impl Into<String>) -> Self {
        Self::Label(label.into())
    }

    /// Whether no runner has been specified.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Label(label) if label.is_empty())
    }
}

/// Deployment environment for protection rules.
#[derive(Debug, Clone, PartialEq)]
pub struct JobEnvironment {
    /// Environment name.
    pub name: String,
    /// URL of the deployed environment.
    pub url: Option<Expr>,
}

/// Secrets passed to a reusable workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum JobSecrets {
    /// `secrets: inherit`.
    Inherit,
    /// An explicit secret mapping.
    Map(IndexMap<String, Expr>),
}

/// A build matrix.
///
/// Axis iteration order follows insertion order; `include` and `exclude`
/// are stored verbatim as ordered lists of mappings and never expanded here.
/// The axis names `include` and `exclude` are reserved by GitHub and are
/// rejected by validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix {
    /// Axis name → ordered values.
    pub axes: IndexMap<String, Vec<Scalar>>,
    /// Extra combinations to add.
    pub include: Vec<IndexMap<String, Scalar>>,
    /// Combinations to remove.
    pub exclude: Vec<IndexMap<String, Scalar>>,
}

impl Matrix {
    /// Whether the matrix has no axes and no include/exclude entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty() && self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Job execution strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Strategy {
    /// The build matrix.
    pub matrix: Matrix,
    /// Cancel remaining matrix jobs when one fails.
    pub fail_fast: Option<bool>,
    /// Maximum concurrent matrix jobs.
    pub max_parallel: Option<u32>,
}

/// Registry credentials for a container image.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerCredentials {
    /// Registry username.
    pub username: Expr,
    /// Registry password, usually a secrets expression.
    pub password: Expr,
}

/// A container a job (or service) runs in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    /// Container image reference.
    pub image: String,
    /// Registry credentials.
    pub credentials: Option<ContainerCredentials>,
    /// Container environment variables.
    pub env: IndexMap<String, Expr>,
    /// Exposed ports.
    pub ports: Vec<Scalar>,
    /// Volume mounts.
    pub volumes: Vec<String>,
    /// Extra `docker create` options.
    pub options: Option<String>,
}

impl Container {
    /// Create a container from an image reference.
    pub fn image(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }
}

/// A named unit of execution within a workflow.
///
/// Either `steps` is non-empty or `uses` references a reusable workflow,
/// never both. `needs` holds back-references to sibling jobs by id only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Job {
    /// Display name shown in the GitHub UI.
    pub name: Option<String>,
    /// Runner specification.
    pub runs_on: RunsOn,
    /// Ids of jobs that must complete first.
    pub needs: Vec<String>,
    /// Conditional execution expression.
    pub if_condition: Option<Expr>,
    /// Job-level token permissions.
    pub permissions: Option<Permissions>,
    /// Deployment environment.
    pub environment: Option<JobEnvironment>,
    /// Job-level concurrency group.
    pub concurrency: Option<Concurrency>,
    /// Output name → value expression.
    pub outputs: IndexMap<String, Expr>,
    /// Job-level environment variables.
    pub env: IndexMap<String, Expr>,
    /// Job-level run defaults.
    pub defaults: Option<RunDefaults>,
    /// Matrix strategy.
    pub strategy: Option<Strategy>,
    /// Container to run the job in.
    pub container: Option<Container>,
    /// Service id → container.
    pub services: IndexMap<String, Container>,
    /// Ordered steps.
    pub steps: Vec<Step>,
    /// Job timeout in minutes; zero means unset.
    pub timeout_minutes: Option<u32>,
    /// Continue the workflow when this job fails.
    pub continue_on_error: Option<bool>,
    /// Reusable workflow reference.
    pub uses: Option<String>,
    /// Inputs for the reusable workflow.
    pub with: IndexMap<String, Scalar>,
    /// Secrets for the reusable workflow.
    pub secrets: Option<JobSecrets>,
}

impl Job {
    /// Create a job that runs the given steps on a runner label.
    pub fn on(runner: impl Into<String>, steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            runs_on: RunsOn::label(runner),
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Create a job that calls a reusable workflow.
    pub fn reusable(reference: impl Into<String>) -> Self {
        Self {
            uses: Some(reference.into()),
            ..Self::default()
        }
    }

    /// Add a dependency on another job by id.
    #[must_use]
    pub fn needs(mut self, job_id: impl Into<String>) -> Self {
        self.needs.push(job_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_builder() {
        let job = Job::on("ubuntu-latest", [Step::run("echo hello")]).needs("build");
        assert_eq!(job.runs_on, RunsOn::Label("ubuntu-latest".into()));
        assert_eq!(job.needs, vec!["build"]);
        assert_eq!(job.steps.len(), 1);
    }

    #[test]
    fn test_runs_on_unset() {
        assert!(RunsOn::default().is_unset());
        assert!(!RunsOn::label("ubuntu-latest").is_unset());
    }

    #[test]
    fn test_matrix_empty() {
        assert!(Matrix::default().is_empty());
        let mut matrix = Matrix::default();
        matrix.axes.insert("os".into(), vec!["ubuntu-latest".into()]);
        assert!(!matrix.is_empty());
    }
}
