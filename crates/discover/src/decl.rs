//! Declaration records and the scan result.

use indexmap::IndexMap;
use std::path::PathBuf;
use wag_model::Diagnostic;

/// The declared type of a discovered binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// A `Workflow` value.
    Workflow,
    /// A `Job` value.
    Job,
    /// A `Triggers` value.
    Triggers,
    /// A `Vec<Step>` value.
    Steps,
    /// A `Dependabot` configuration.
    Dependabot,
    /// An `IssueTemplate` value.
    IssueTemplate,
    /// A `CodeOwners` value.
    CodeOwners,
}

impl DeclKind {
    /// Map a declared type name to a kind.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Workflow" => Some(Self::Workflow),
            "Job" => Some(Self::Job),
            "Triggers" => Some(Self::Triggers),
            "Dependabot" => Some(Self::Dependabot),
            "IssueTemplate" => Some(Self::IssueTemplate),
            "CodeOwners" => Some(Self::CodeOwners),
            _ => None,
        }
    }

    /// Human-readable kind name, as used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workflow => "workflow",
            Self::Job => "job",
            Self::Triggers => "triggers",
            Self::Steps => "steps",
            Self::Dependabot => "dependabot",
            Self::IssueTemplate => "issue-template",
            Self::CodeOwners => "codeowners",
        }
    }
}

/// One discovered top-level binding.
#[derive(Debug, Clone)]
pub struct Decl {
    /// Symbol name as written in source.
    pub name: String,
    /// File the binding lives in.
    pub file: PathBuf,
    /// 1-based line of the binding.
    pub line: usize,
    /// Declared type.
    pub kind: DeclKind,
    /// Initializer expression, with any lazy-initialization wrapper
    /// already unwrapped.
    pub init: syn::Expr,
}

/// Everything a scan of one source tree produced.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    /// Workflow declarations, in scan order.
    pub workflows: Vec<Decl>,
    /// Job declarations.
    pub jobs: Vec<Decl>,
    /// Trigger declarations.
    pub triggers: Vec<Decl>,
    /// Step-list declarations.
    pub step_lists: Vec<Decl>,
    /// Dependabot, issue-template, and codeowners declarations.
    pub others: Vec<Decl>,
    /// Parse failures, duplicate symbols, and unknown-reference warnings.
    pub errors: Vec<Diagnostic>,
    /// Symbol name → other top-level names its initializer mentions,
    /// in first-mention order.
    pub references: IndexMap<String, Vec<String>>,
}

impl DiscoveryResult {
    /// All declarations across every category, in scan order per category.
    pub fn all_decls(&self) -> impl Iterator<Item = &Decl> {
        self.workflows
            .iter()
            .chain(&self.jobs)
            .chain(&self.triggers)
            .chain(&self.step_lists)
            .chain(&self.others)
    }

    /// Look up a declaration by symbol name.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<&Decl> {
        self.all_decls().find(|decl| decl.name == name)
    }

    /// Whether any error-severity diagnostic was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Diagnostic::is_error)
    }
}
