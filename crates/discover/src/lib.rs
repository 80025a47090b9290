//! Static source scanner for typed workflow packages.
//!
//! Walks a source tree, parses every Rust file, and records each top-level
//! binding whose declared type is one of the workflow entities. Initializer
//! expressions are kept as parsed AST handles for the evaluator; while
//! walking them the scanner also records which other top-level symbols each
//! initializer mentions, producing the reference graph the importer uses to
//! re-materialize sharing.
//!
//! Discovery is best-effort: a file that fails to parse is reported and
//! skipped, and the scan continues.

mod decl;
mod refs;
mod scan;

pub use decl::{Decl, DeclKind, DiscoveryResult};
pub use scan::discover;
