//! YAML import: decode existing configuration files into the IR and
//! generate equivalent typed source.
//!
//! The decoder is deliberately forgiving: it collects as many
//! `import-error` diagnostics as it can per document instead of stopping
//! at the first oddity. Only an unparseable document is fatal.
//!
//! Source generation re-materializes sharing: every job, step list, and
//! non-bare trigger payload becomes a named top-level symbol the workflow
//! refers to, so the generated source reads like hand-written
//! declarations rather than one giant literal.

mod codegen;
mod codeowners;
mod decode;
mod dependabot;
mod scaffold;
mod templates;

pub use codegen::{generate_workflows, GeneratedFile, SourceLayout};
pub use codeowners::{generate_codeowners_source, import_codeowners};
pub use decode::{import_workflow, Imported};
pub use dependabot::{generate_dependabot_source, import_dependabot};
pub use scaffold::scaffold;
pub use templates::{
    generate_issue_template_source, generate_pull_request_template_source,
    import_issue_template, import_pull_request_template,
};
