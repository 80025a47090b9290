//! Style rules for typed workflow declarations.
//!
//! Rules are identified as `WAG001` through `WAG008` and operate on the
//! discovery output plus the evaluated workflows, so both source-level
//! conventions (symbol naming, unused declarations) and workflow-level
//! conventions (unpinned actions, missing timeouts) are covered.

mod fix;
mod rules;

pub use fix::rewrite_deprecated_commands;

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use wag_discover::DiscoveryResult;
use wag_model::Workflow;

/// The rule identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleCode {
    /// An action reference is not pinned to a tag or commit.
    Wag001,
    /// A run command uses the deprecated `::set-output`/`::save-state`
    /// workflow commands.
    Wag002,
    /// A job has no `timeout_minutes`.
    Wag003,
    /// A declaration name is not PascalCase.
    Wag004,
    /// A declaration is never referenced.
    Wag005,
    /// A workflow has no name.
    Wag006,
    /// An environment value looks like a hard-coded secret.
    Wag007,
    /// A multi-line run step has no name.
    Wag008,
}

impl RuleCode {
    /// The stable `WAGnnn` identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wag001 => "WAG001",
            Self::Wag002 => "WAG002",
            Self::Wag003 => "WAG003",
            Self::Wag004 => "WAG004",
            Self::Wag005 => "WAG005",
            Self::Wag006 => "WAG006",
            Self::Wag007 => "WAG007",
            Self::Wag008 => "WAG008",
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintIssue {
    /// Which rule fired.
    pub code: RuleCode,
    /// What was found and where, in workflow terms.
    pub message: String,
    /// The declaring source file, when attributable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// 1-based line of the declaration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Whether `--fix` can rewrite the source automatically.
    pub fixable: bool,
}

impl LintIssue {
    fn new(code: RuleCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            file: None,
            line: None,
            fixable: false,
        }
    }

    fn at_decl(mut self, discovery: &DiscoveryResult, symbol: &str) -> Self {
        if let Some(decl) = discovery.symbol(symbol) {
            self.file = Some(decl.file.clone());
            self.line = Some(decl.line);
        }
        self
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}", file.display())?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Run every rule over the discovery output and the evaluated workflows.
///
/// The workflow map is keyed by declaration symbol, as produced by the
/// evaluator, so findings can be attributed to their declaring file.
#[must_use]
pub fn lint(
    discovery: &DiscoveryResult,
    workflows: &IndexMap<String, Workflow>,
) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    rules::symbol_naming(discovery, &mut issues);
    rules::unused_declarations(discovery, &mut issues);
    for (symbol, workflow) in workflows {
        rules::workflow_rules(discovery, symbol, workflow, &mut issues);
    }
    tracing::debug!(
        workflows = workflows.len(),
        issues = issues.len(),
        "lint finished"
    );
    issues
}
