//! Evaluation of discovered declarations into workflow IR.
//!
//! The evaluator interprets initializer ASTs directly: literals, struct
//! literals with `..Default::default()` tails, the entity constructors and
//! builder methods, `vec![…]`, `IndexMap::from([…])`, and references to
//! other discovered symbols. Symbol values are memoized, so a job shared by
//! three workflows is evaluated once.
//!
//! Evaluation is per-workflow fail-soft: a workflow whose initializer
//! cannot be materialized contributes a diagnostic and the remaining
//! workflows are still produced.

mod interp;
mod materialize;
mod value;

pub use interp::{evaluate, ExtractionResult};
pub use value::{EvalError, Record, Value};
