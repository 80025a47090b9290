//! Intermediate representation of GitHub Actions workflows.
//!
//! This crate is the single source of truth shared by the evaluator (typed
//! source → IR) and the importer (YAML → IR). Both directions meet here, so
//! there is exactly one set of entity types, one pair of validators, and one
//! place where identifier/key-name mappings live.
//!
//! # Key Types
//!
//! - [`Workflow`], [`Job`], [`Step`], [`Triggers`]: the entity graph
//! - [`Expr`]: the symbolic `${{ … }}` expression carrier
//! - [`Diagnostic`]: component diagnostics as plain values, never a global sink
//! - [`validate`] / [`validate_job_graph`]: the two pure invariant checkers
//! - [`names`]: identifier, filename, and YAML key-name normalization
//!
//! All IR instances are immutable after construction by the evaluator or the
//! importer; ownership is tree-shaped and `needs` holds back-references by
//! job id only, so the object graph is a DAG.

mod cancel;
mod diagnostic;
mod expr;
mod job;
mod owners;
mod step;
mod templates;
mod trigger;
mod validate;
mod workflow;

pub mod names;

pub use cancel::CancelToken;
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use expr::{CompareOp, Expr};
pub use job::{
    Container, ContainerCredentials, Job, JobEnvironment, JobSecrets, Matrix, RunsOn, Strategy,
};
pub use owners::{CodeOwners, Dependabot, DependabotSchedule, DependabotUpdate, OwnerRule};
pub use step::{Action, Scalar, Step, StepAction};
pub use templates::{FormElement, IssueTemplate, PullRequestTemplate};
pub use trigger::{
    Cron, DispatchInput, PullRequestTrigger, PushTrigger, RepositoryDispatch, Triggers,
    TypesTrigger, WorkflowCall, WorkflowCallInput, WorkflowCallOutput, WorkflowCallSecret,
    WorkflowDispatch, WorkflowRun, EVENT_KINDS,
};
pub use validate::{validate, validate_job_graph};
pub use workflow::{Concurrency, PermissionLevel, Permissions, RunDefaults, Workflow};
