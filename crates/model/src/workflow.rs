//! The workflow root entity and workflow-level configuration.

use crate::expr::Expr;
use crate::job::Job;
use crate::trigger::Triggers;
use indexmap::IndexMap;

/// Permission level for a `GITHUB_TOKEN` scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionLevel {
    /// Read-only access.
    Read,
    /// Read and write access.
    Write,
    /// No access.
    None,
}

impl PermissionLevel {
    /// The YAML value for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::None => "none",
        }
    }

    /// Parse a YAML permission value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "read" => Some(Self::Read),
            "write" => Some(Self::Write),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// `GITHUB_TOKEN` permissions over the fixed scope set.
///
/// An absent scope inherits the repository default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions {
    /// GitHub Actions permission.
    pub actions: Option<PermissionLevel>,
    /// Check runs permission.
    pub checks: Option<PermissionLevel>,
    /// Repository contents permission.
    pub contents: Option<PermissionLevel>,
    /// Deployments permission.
    pub deployments: Option<PermissionLevel>,
    /// Discussions permission.
    pub discussions: Option<PermissionLevel>,
    /// OIDC token permission.
    pub id_token: Option<PermissionLevel>,
    /// Issues permission.
    pub issues: Option<PermissionLevel>,
    /// GitHub Packages permission.
    pub packages: Option<PermissionLevel>,
    /// GitHub Pages permission.
    pub pages: Option<PermissionLevel>,
    /// Pull requests permission.
    pub pull_requests: Option<PermissionLevel>,
    /// Classic repository projects permission.
    pub repository_projects: Option<PermissionLevel>,
    /// Code scanning alerts permission.
    pub security_events: Option<PermissionLevel>,
    /// Commit statuses permission.
    pub statuses: Option<PermissionLevel>,
}

/// The fixed permission scope identifiers, in canonical emission order.
pub const PERMISSION_SCOPES: &[&str] = &[
    "actions",
    "checks",
    "contents",
    "deployments",
    "discussions",
    "id_token",
    "issues",
    "packages",
    "pages",
    "pull_requests",
    "repository_projects",
    "security_events",
    "statuses",
];

impl Permissions {
    /// Iterate the configured scopes as `(scope identifier, level)` pairs,
    /// in canonical order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, PermissionLevel)> {
        let slots = [
            ("actions", self.actions),
            ("checks", self.checks),
            ("contents", self.contents),
            ("deployments", self.deployments),
            ("discussions", self.discussions),
            ("id_token", self.id_token),
            ("issues", self.issues),
            ("packages", self.packages),
            ("pages", self.pages),
            ("pull_requests", self.pull_requests),
            ("repository_projects", self.repository_projects),
            ("security_events", self.security_events),
            ("statuses", self.statuses),
        ];
        slots
            .into_iter()
            .filter_map(|(scope, level)| level.map(|l| (scope, l)))
            .collect()
    }

    /// Set a scope by its identifier. Returns `false` for an unknown scope.
    pub fn set(&mut self, scope: &str, level: PermissionLevel) -> bool {
        let slot = match scope {
            "actions" => &mut self.actions,
            "checks" => &mut self.checks,
            "contents" => &mut self.contents,
            "deployments" => &mut self.deployments,
            "discussions" => &mut self.discussions,
            "id_token" => &mut self.id_token,
            "issues" => &mut self.issues,
            "packages" => &mut self.packages,
            "pages" => &mut self.pages,
            "pull_requests" => &mut self.pull_requests,
            "repository_projects" => &mut self.repository_projects,
            "security_events" => &mut self.security_events,
            "statuses" => &mut self.statuses,
            _ => return false,
        };
        *slot = Some(level);
        true
    }

    /// Whether no scope is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Concurrency group configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Concurrency {
    /// Group name, usually an expression over `github.*` contexts.
    pub group: Expr,
    /// Cancel in-progress runs when a new run starts.
    pub cancel_in_progress: Option<bool>,
}

impl Concurrency {
    /// Create a concurrency group.
    pub fn group(group: impl Into<Expr>) -> Self {
        Self {
            group: group.into(),
            cancel_in_progress: None,
        }
    }

    /// Cancel in-progress runs of the same group.
    #[must_use]
    pub const fn cancel_in_progress(mut self) -> Self {
        self.cancel_in_progress = Some(true);
        self
    }
}

/// Defaults applied to every `run:` step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunDefaults {
    /// Default shell.
    pub shell: Option<String>,
    /// Default working directory.
    pub working_directory: Option<String>,
}

impl RunDefaults {
    /// Whether no default is configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shell.is_none() && self.working_directory.is_none()
    }
}

/// The root entity: one GitHub Actions workflow file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workflow {
    /// Display name; empty means absent.
    pub name: String,
    /// Trigger configuration.
    pub on: Triggers,
    /// Workflow-level token permissions.
    pub permissions: Option<Permissions>,
    /// Workflow-level run defaults.
    pub defaults: Option<RunDefaults>,
    /// Workflow-level concurrency group.
    pub concurrency: Option<Concurrency>,
    /// Workflow-level environment variables.
    pub env: IndexMap<String, Expr>,
    /// Job id → job. Keys are unique and non-empty; insertion order is
    /// preserved for emission, while diagnostics iterate lexicographically.
    pub jobs: IndexMap<String, Job>,
}

impl Workflow {
    /// Create a named workflow with no triggers or jobs.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Job ids in lexicographic order, as used for diagnostics and graph
    /// analysis.
    #[must_use]
    pub fn sorted_job_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.jobs.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_entries_order() {
        let mut permissions = Permissions::default();
        assert!(permissions.set("id_token", PermissionLevel::Write));
        assert!(permissions.set("contents", PermissionLevel::Read));
        assert!(!permissions.set("unknown", PermissionLevel::Read));
        assert_eq!(
            permissions.entries(),
            vec![
                ("contents", PermissionLevel::Read),
                ("id_token", PermissionLevel::Write),
            ]
        );
    }

    #[test]
    fn test_sorted_job_ids() {
        let mut workflow = Workflow::named("CI");
        workflow.jobs.insert("deploy".into(), Job::default());
        workflow.jobs.insert("build".into(), Job::default());
        assert_eq!(workflow.sorted_job_ids(), vec!["build", "deploy"]);
        // Emission order stays insertion order.
        let keys: Vec<&String> = workflow.jobs.keys().collect();
        assert_eq!(keys, vec!["deploy", "build"]);
    }

    #[test]
    fn test_permission_level_parse() {
        assert_eq!(PermissionLevel::parse("read"), Some(PermissionLevel::Read));
        assert_eq!(PermissionLevel::parse("invalid"), None);
    }
}
