//! Numtree Core
//!
//! Reconstruction and evaluation engine for collaboratively built trees of
//! numeric operations, plus the persistence and service plumbing around it.
//!
//! # Architecture
//!
//! - **Flat storage**: stores keep parent-referencing records, never trees
//! - **Derived forests**: every snapshot rebuilds roots, orphans and
//!   children from scratch and evaluates them top-down
//! - **Graceful evaluation**: bad stored data fails per node, not per forest
//! - **Capability writes**: adding and clearing require a `Session`
//!
//! # Modules
//!
//! - [`models`] - Records, parsed operations, the forest arena
//! - [`operations`] - Parser, builder, evaluator, diagnostics, validation
//! - [`config`] - Evaluation limits
//! - [`db`] - NodeStore trait, in-memory and libsql backends, domain events
//! - [`services`] - NodeService, LiveForestService, sessions

pub mod config;
pub mod db;
pub mod models;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use config::EvaluationLimits;
pub use models::*;
pub use operations::{
    build_forest, diagnose, evaluate, evaluate_forest, parse, validate_input, ForestSnapshot,
    ForestView,
};
pub use services::*;
