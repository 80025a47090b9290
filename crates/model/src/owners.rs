//! Repository metadata entities: CODEOWNERS and Dependabot configuration.

/// A single code ownership rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRule {
    /// File pattern (glob syntax) the rule applies to.
    pub pattern: String,
    /// Owners for files matching the pattern.
    pub owners: Vec<String>,
    /// Optional comment emitted above the rule.
    pub comment: Option<String>,
}

impl OwnerRule {
    /// Create a rule from a pattern and its owners.
    pub fn new(
        pattern: impl Into<String>,
        owners: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            owners: owners.into_iter().map(Into::into).collect(),
            comment: None,
        }
    }

    /// Attach a comment emitted above the rule.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// A CODEOWNERS file: an ordered list of ownership rules.
///
/// Later rules take precedence on GitHub, so order is preserved exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeOwners {
    /// Ownership rules, in file order.
    pub rules: Vec<OwnerRule>,
}

impl CodeOwners {
    /// Create an empty CODEOWNERS file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    #[must_use]
    pub fn rule(mut self, rule: OwnerRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a rule from a pattern and its owners.
    #[must_use]
    pub fn own(
        self,
        pattern: impl Into<String>,
        owners: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.rule(OwnerRule::new(pattern, owners))
    }

    /// Render the CODEOWNERS file content.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        for rule in &self.rules {
            if let Some(comment) = &rule.comment {
                for line in comment.lines() {
                    output.push_str("# ");
                    output.push_str(line);
                    output.push('\n');
                }
            }
            output.push_str(&rule.pattern);
            for owner in &rule.owners {
                output.push(' ');
                output.push_str(owner);
            }
            output.push('\n');
        }
        output
    }
}

/// Update cadence for a Dependabot ecosystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependabotSchedule {
    /// `daily`, `weekly`, or `monthly`.
    pub interval: String,
    /// Day of week for weekly schedules.
    pub day: Option<String>,
    /// Time of day, `HH:MM`.
    pub time: Option<String>,
    /// IANA timezone for `time`.
    pub timezone: Option<String>,
}

impl DependabotSchedule {
    /// Create a schedule with the given interval.
    pub fn interval(interval: impl Into<String>) -> Self {
        Self {
            interval: interval.into(),
            day: None,
            time: None,
            timezone: None,
        }
    }
}

/// One `updates:` entry in a Dependabot configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependabotUpdate {
    /// Package ecosystem, e.g. `cargo` or `github-actions`.
    pub package_ecosystem: String,
    /// Manifest directory, usually `/`.
    pub directory: String,
    /// Update cadence.
    pub schedule: DependabotSchedule,
    /// Labels applied to update pull requests.
    pub labels: Vec<String>,
    /// Reviewers requested on update pull requests.
    pub reviewers: Vec<String>,
    /// Maximum number of open update pull requests.
    pub open_pull_requests_limit: Option<u32>,
    /// Custom commit message prefix.
    pub commit_message_prefix: Option<String>,
}

impl DependabotUpdate {
    /// Create an update entry for an ecosystem rooted at a directory.
    pub fn new(ecosystem: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            package_ecosystem: ecosystem.into(),
            directory: directory.into(),
            schedule: DependabotSchedule::interval("weekly"),
            labels: Vec::new(),
            reviewers: Vec::new(),
            open_pull_requests_limit: None,
            commit_message_prefix: None,
        }
    }

    /// Set the update cadence.
    #[must_use]
    pub fn schedule(mut self, schedule: DependabotSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Add a label applied to update pull requests.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }
}

/// A `dependabot.yml` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependabot {
    /// Schema version; always 2.
    pub version: u32,
    /// Per-ecosystem update entries.
    pub updates: Vec<DependabotUpdate>,
}

impl Default for Dependabot {
    fn default() -> Self {
        Self {
            version: 2,
            updates: Vec::new(),
        }
    }
}

impl Dependabot {
    /// Create an empty version-2 configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an update entry.
    #[must_use]
    pub fn update(mut self, update: DependabotUpdate) -> Self {
        self.updates.push(update);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_rules_in_order() {
        let owners = CodeOwners::new()
            .own("*", ["@org/maintainers"])
            .rule(OwnerRule::new("*.rs", ["@rust-team", "@backend"]).comment("Rust sources"));
        assert_eq!(
            owners.generate(),
            "* @org/maintainers\n# Rust sources\n*.rs @rust-team @backend\n"
        );
    }

    #[test]
    fn test_generate_empty() {
        assert_eq!(CodeOwners::new().generate(), "");
    }

    #[test]
    fn test_dependabot_defaults() {
        let config = Dependabot::new().update(
            DependabotUpdate::new("cargo", "/")
                .schedule(DependabotSchedule::interval("daily"))
                .label("dependencies"),
        );
        assert_eq!(config.version, 2);
        assert_eq!(config.updates[0].schedule.interval, "daily");
        assert_eq!(config.updates[0].labels, vec!["dependencies"]);
    }
}
