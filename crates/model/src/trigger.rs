//! Workflow trigger configuration.
//!
//! The trigger set is a closed union over GitHub's event kinds. Each event
//! may be absent, bare (no configuration), carry a `types` list, or carry a
//! detailed payload (push-family filters, cron schedules, dispatch/call
//! inputs, workflow_run filters).

use crate::expr::Expr;
use crate::step::Scalar;
use indexmap::IndexMap;

/// Trigger configuration for a workflow.
///
/// Field order matches the canonical emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triggers {
    /// `push` events, with optional branch/tag/path filters.
    pub push: Option<PushTrigger>,
    /// `pull_request` events.
    pub pull_request: Option<PullRequestTrigger>,
    /// `pull_request_target` events.
    pub pull_request_target: Option<PullRequestTrigger>,
    /// Cron schedules.
    pub schedule: Option<Vec<Cron>>,
    /// Manual dispatch with optional inputs.
    pub workflow_dispatch: Option<WorkflowDispatch>,
    /// Reusable-workflow call surface.
    pub workflow_call: Option<WorkflowCall>,
    /// Completion of other workflows.
    pub workflow_run: Option<WorkflowRun>,
    /// External `repository_dispatch` events.
    pub repository_dispatch: Option<RepositoryDispatch>,
    /// `release` events.
    pub release: Option<TypesTrigger>,
    /// `issues` events.
    pub issues: Option<TypesTrigger>,
    /// `issue_comment` events.
    pub issue_comment: Option<TypesTrigger>,
    /// `create` events (branch or tag created).
    pub create: Option<TypesTrigger>,
    /// `delete` events (branch or tag deleted).
    pub delete: Option<TypesTrigger>,
    /// `fork` events.
    pub fork: Option<TypesTrigger>,
    /// Wiki (`gollum`) events.
    pub gollum: Option<TypesTrigger>,
    /// Repository made public.
    pub public: Option<TypesTrigger>,
    /// GitHub Pages build events.
    pub page_build: Option<TypesTrigger>,
    /// Commit status events.
    pub status: Option<TypesTrigger>,
    /// `label` events.
    pub label: Option<TypesTrigger>,
    /// `milestone` events.
    pub milestone: Option<TypesTrigger>,
    /// Classic project events.
    pub project: Option<TypesTrigger>,
    /// Classic project card events.
    pub project_card: Option<TypesTrigger>,
    /// Classic project column events.
    pub project_column: Option<TypesTrigger>,
    /// Pull request review events.
    pub pull_request_review: Option<TypesTrigger>,
    /// Pull request review comment events.
    pub pull_request_review_comment: Option<TypesTrigger>,
    /// `watch` (star) events.
    pub watch: Option<TypesTrigger>,
    /// Check run events.
    pub check_run: Option<TypesTrigger>,
    /// Check suite events.
    pub check_suite: Option<TypesTrigger>,
    /// Discussion events.
    pub discussion: Option<TypesTrigger>,
    /// Discussion comment events.
    pub discussion_comment: Option<TypesTrigger>,
    /// Merge queue events.
    pub merge_group: Option<TypesTrigger>,
}

/// The closed set of event kind keys, in canonical emission order.
pub const EVENT_KINDS: &[&str] = &[
    "push",
    "pull_request",
    "pull_request_target",
    "schedule",
    "workflow_dispatch",
    "workflow_call",
    "workflow_run",
    "repository_dispatch",
    "release",
    "issues",
    "issue_comment",
    "create",
    "delete",
    "fork",
    "gollum",
    "public",
    "page_build",
    "status",
    "label",
    "milestone",
    "project",
    "project_card",
    "project_column",
    "pull_request_review",
    "pull_request_review_comment",
    "watch",
    "check_run",
    "check_suite",
    "discussion",
    "discussion_comment",
    "merge_group",
];

impl Triggers {
    /// Whether no event is configured (serialized as the empty mapping).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_events().is_empty()
    }

    /// The event kind keys present in this trigger set, in canonical order.
    #[must_use]
    pub fn active_events(&self) -> Vec<&'static str> {
        let mut events = Vec::new();
        let mut push = |name, present| {
            if present {
                events.push(name);
            }
        };
        push("push", self.push.is_some());
        push("pull_request", self.pull_request.is_some());
        push("pull_request_target", self.pull_request_target.is_some());
        push("schedule", self.schedule.is_some());
        push("workflow_dispatch", self.workflow_dispatch.is_some());
        push("workflow_call", self.workflow_call.is_some());
        push("workflow_run", self.workflow_run.is_some());
        push("repository_dispatch", self.repository_dispatch.is_some());
        push("release", self.release.is_some());
        push("issues", self.issues.is_some());
        push("issue_comment", self.issue_comment.is_some());
        push("create", self.create.is_some());
        push("delete", self.delete.is_some());
        push("fork", self.fork.is_some());
        push("gollum", self.gollum.is_some());
        push("public", self.public.is_some());
        push("page_build", self.page_build.is_some());
        push("status", self.status.is_some());
        push("label", self.label.is_some());
        push("milestone", self.milestone.is_some());
        push("project", self.project.is_some());
        push("project_card", self.project_card.is_some());
        push("project_column", self.project_column.is_some());
        push("pull_request_review", self.pull_request_review.is_some());
        push(
            "pull_request_review_comment",
            self.pull_request_review_comment.is_some(),
        );
        push("watch", self.watch.is_some());
        push("check_run", self.check_run.is_some());
        push("check_suite", self.check_suite.is_some());
        push("discussion", self.discussion.is_some());
        push("discussion_comment", self.discussion_comment.is_some());
        push("merge_group", self.merge_group.is_some());
        events
    }

    /// Access a types-only event slot by its key, if the key names one.
    #[must_use]
    pub fn types_event(&self, key: &str) -> Option<&Option<TypesTrigger>> {
        match key {
            "release" => Some(&self.release),
            "issues" => Some(&self.issues),
            "issue_comment" => Some(&self.issue_comment),
            "create" => Some(&self.create),
            "delete" => Some(&self.delete),
            "fork" => Some(&self.fork),
            "gollum" => Some(&self.gollum),
            "public" => Some(&self.public),
            "page_build" => Some(&self.page_build),
            "status" => Some(&self.status),
            "label" => Some(&self.label),
            "milestone" => Some(&self.milestone),
            "project" => Some(&self.project),
            "project_card" => Some(&self.project_card),
            "project_column" => Some(&self.project_column),
            "pull_request_review" => Some(&self.pull_request_review),
            "pull_request_review_comment" => Some(&self.pull_request_review_comment),
            "watch" => Some(&self.watch),
            "check_run" => Some(&self.check_run),
            "check_suite" => Some(&self.check_suite),
            "discussion" => Some(&self.discussion),
            "discussion_comment" => Some(&self.discussion_comment),
            "merge_group" => Some(&self.merge_group),
            _ => None,
        }
    }

    /// Mutable access to a types-only event slot by its key.
    pub fn types_event_mut(&mut self, key: &str) -> Option<&mut Option<TypesTrigger>> {
        match key {
            "release" => Some(&mut self.release),
            "issues" => Some(&mut self.issues),
            "issue_comment" => Some(&mut self.issue_comment),
            "create" => Some(&mut self.create),
            "delete" => Some(&mut self.delete),
            "fork" => Some(&mut self.fork),
            "gollum" => Some(&mut self.gollum),
            "public" => Some(&mut self.public),
            "page_build" => Some(&mut self.page_build),
            "status" => Some(&mut self.status),
            "label" => Some(&mut self.label),
            "milestone" => Some(&mut self.milestone),
            "project" => Some(&mut self.project),
            "project_card" => Some(&mut self.project_card),
            "project_column" => Some(&mut self.project_column),
            "pull_request_review" => Some(&mut self.pull_request_review),
            "pull_request_review_comment" => Some(&mut self.pull_request_review_comment),
            "watch" => Some(&mut self.watch),
            "check_run" => Some(&mut self.check_run),
            "check_suite" => Some(&mut self.check_suite),
            "discussion" => Some(&mut self.discussion),
            "discussion_comment" => Some(&mut self.discussion_comment),
            "merge_group" => Some(&mut self.merge_group),
            _ => None,
        }
    }
}

/// Push event filters.
///
/// For each axis the include and ignore variants are mutually exclusive;
/// [`crate::validate`] enforces this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushTrigger {
    /// Branch patterns to trigger on.
    pub branches: Vec<String>,
    /// Branch patterns to ignore.
    pub branches_ignore: Vec<String>,
    /// Tag patterns to trigger on.
    pub tags: Vec<String>,
    /// Tag patterns to ignore.
    pub tags_ignore: Vec<String>,
    /// Path patterns that must match.
    pub paths: Vec<String>,
    /// Path patterns to ignore.
    pub paths_ignore: Vec<String>,
}

impl PushTrigger {
    /// Whether this is a bare trigger (serialized as the null scalar).
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.branches.is_empty()
            && self.branches_ignore.is_empty()
            && self.tags.is_empty()
            && self.tags_ignore.is_empty()
            && self.paths.is_empty()
            && self.paths_ignore.is_empty()
    }
}

/// Pull request event filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullRequestTrigger {
    /// Target branch patterns.
    pub branches: Vec<String>,
    /// Target branch patterns to ignore.
    pub branches_ignore: Vec<String>,
    /// Path patterns that must match.
    pub paths: Vec<String>,
    /// Path patterns to ignore.
    pub paths_ignore: Vec<String>,
    /// Activity types, e.g. `opened`, `synchronize`.
    pub types: Vec<String>,
}

impl PullRequestTrigger {
    /// Whether this is a bare trigger.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.branches.is_empty()
            && self.branches_ignore.is_empty()
            && self.paths.is_empty()
            && self.paths_ignore.is_empty()
            && self.types.is_empty()
    }
}

/// A trigger whose only configuration is an activity-type list.
///
/// An empty list is the bare form (`key:`); a non-empty list serializes as
/// the single-key mapping `{ types: […] }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypesTrigger {
    /// Activity types to trigger on.
    pub types: Vec<String>,
}

impl TypesTrigger {
    /// A bare trigger with no configuration.
    #[must_use]
    pub fn bare() -> Self {
        Self::default()
    }

    /// A trigger restricted to the given activity types.
    pub fn with_types(types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single cron schedule entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Cron {
    /// Cron expression, e.g. `"0 4 * * 1"`.
    pub cron: String,
}

impl Cron {
    /// Create a schedule entry from a cron expression.
    pub fn new(expr: impl Into<String>) -> Self {
        Self { cron: expr.into() }
    }
}

/// Manual dispatch trigger with optional typed inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowDispatch {
    /// Input parameters, keyed by input name.
    pub inputs: IndexMap<String, DispatchInput>,
}

/// One `workflow_dispatch` input definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchInput {
    /// Human-readable description.
    pub description: String,
    /// Whether the input must be supplied.
    pub required: Option<bool>,
    /// Default value.
    pub default: Option<Scalar>,
    /// Input type: `string`, `boolean`, `number`, `choice`, `environment`.
    pub input_type: Option<String>,
    /// Choices, for `choice`-typed inputs.
    pub options: Vec<String>,
}

/// Reusable-workflow call surface (`workflow_call`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowCall {
    /// Declared inputs.
    pub inputs: IndexMap<String, WorkflowCallInput>,
    /// Declared outputs.
    pub outputs: IndexMap<String, WorkflowCallOutput>,
    /// Declared secrets.
    pub secrets: IndexMap<String, WorkflowCallSecret>,
}

/// One `workflow_call` input definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowCallInput {
    /// Human-readable description.
    pub description: String,
    /// Whether the caller must supply the input.
    pub required: Option<bool>,
    /// Default value.
    pub default: Option<Scalar>,
    /// Input type.
    pub input_type: Option<String>,
}

/// One `workflow_call` output definition.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowCallOutput {
    /// Human-readable description.
    pub description: String,
    /// Output value expression.
    pub value: Expr,
}

/// One `workflow_call` secret definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowCallSecret {
    /// Human-readable description.
    pub description: String,
    /// Whether the caller must supply the secret.
    pub required: Option<bool>,
}

/// Trigger on completion of other workflows (`workflow_run`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowRun {
    /// Names of the upstream workflows.
    pub workflows: Vec<String>,
    /// Activity types (`completed`, `requested`, `in_progress`).
    pub types: Vec<String>,
    /// Branch filters.
    pub branches: Vec<String>,
    /// Branch filters to ignore.
    pub branches_ignore: Vec<String>,
}

/// External `repository_dispatch` trigger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepositoryDispatch {
    /// Custom event types to accept.
    pub types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_triggers() {
        let triggers = Triggers::default();
        assert!(triggers.is_empty());
        assert!(triggers.active_events().is_empty());
    }

    #[test]
    fn test_active_events_order_is_canonical() {
        let triggers = Triggers {
            merge_group: Some(TypesTrigger::bare()),
            push: Some(PushTrigger::default()),
            schedule: Some(vec![Cron::new("0 0 * * *")]),
            ..Triggers::default()
        };
        assert_eq!(
            triggers.active_events(),
            vec!["push", "schedule", "merge_group"]
        );
    }

    #[test]
    fn test_bare_detection() {
        assert!(PushTrigger::default().is_bare());
        let push = PushTrigger {
            branches: vec!["main".into()],
            ..PushTrigger::default()
        };
        assert!(!push.is_bare());
    }

    #[test]
    fn test_event_kind_table_matches_fields() {
        let all = Triggers {
            push: Some(PushTrigger::default()),
            pull_request: Some(PullRequestTrigger::default()),
            pull_request_target: Some(PullRequestTrigger::default()),
            schedule: Some(vec![]),
            workflow_dispatch: Some(WorkflowDispatch::default()),
            workflow_call: Some(WorkflowCall::default()),
            workflow_run: Some(WorkflowRun::default()),
            repository_dispatch: Some(RepositoryDispatch::default()),
            release: Some(TypesTrigger::bare()),
            issues: Some(TypesTrigger::bare()),
            issue_comment: Some(TypesTrigger::bare()),
            create: Some(TypesTrigger::bare()),
            delete: Some(TypesTrigger::bare()),
            fork: Some(TypesTrigger::bare()),
            gollum: Some(TypesTrigger::bare()),
            public: Some(TypesTrigger::bare()),
            page_build: Some(TypesTrigger::bare()),
            status: Some(TypesTrigger::bare()),
            label: Some(TypesTrigger::bare()),
            milestone: Some(TypesTrigger::bare()),
            project: Some(TypesTrigger::bare()),
            project_card: Some(TypesTrigger::bare()),
            project_column: Some(TypesTrigger::bare()),
            pull_request_review: Some(TypesTrigger::bare()),
            pull_request_review_comment: Some(TypesTrigger::bare()),
            watch: Some(TypesTrigger::bare()),
            check_run: Some(TypesTrigger::bare()),
            check_suite: Some(TypesTrigger::bare()),
            discussion: Some(TypesTrigger::bare()),
            discussion_comment: Some(TypesTrigger::bare()),
            merge_group: Some(TypesTrigger::bare()),
        };
        assert_eq!(all.active_events(), EVENT_KINDS);
    }
}
