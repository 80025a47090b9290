//! Canonical YAML emission.
//!
//! The writer is hand-rolled on purpose: the wire format fixes key order,
//! the `key:` null form for bare triggers, block-scalar selection for
//! multi-line commands, and a deterministic quoting rule, none of which a
//! generic serializer guarantees. Two emissions of the same IR are
//! byte-identical.

mod scalar;
mod workflow;

pub use workflow::{emit_workflow, EmitError};
