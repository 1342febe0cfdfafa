//! Tree Engine Operations
//!
//! Pure, synchronous computation over one record snapshot:
//!
//! - [`parse`] - raw value string to [`ParsedOperation`](crate::models::ParsedOperation)
//! - [`build_forest`] - flat records to roots, orphans and children
//! - [`evaluate`] / [`evaluate_forest`] - computed values, top-down
//! - [`diagnose`] - displayed count versus record count
//! - [`validate_input`] - pre-submission checks with user-facing messages
//! - [`ForestSnapshot`] - all of the above in one call
//!
//! Nothing here does I/O or holds locks; the service layer feeds in record
//! lists and hands snapshots to clients.

mod builder;
mod diagnostics;
mod error;
mod evaluator;
mod parser;
mod snapshot;
mod validation;

pub use builder::build_forest;
pub use diagnostics::{diagnose, ForestDiagnostics, MISMATCH_WARNING};
pub use error::{EvaluationError, ParseError, ValidationError};
pub use evaluator::{evaluate, evaluate_forest, EvaluationReport};
pub use parser::parse;
pub use snapshot::{FailureView, ForestSnapshot, ForestView, TreeView};
pub use validation::{validate_input, NodeRole};
