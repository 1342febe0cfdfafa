//! Business Services
//!
//! - `NodeService` - add, delete-all, list and snapshot operations
//! - `LiveForestService` - recomputes the snapshot after every store event
//! - `Session` / `SessionRegistry` - the capability required for writes
//!
//! Services sit between transports and the store, enforcing the write
//! rules the engine itself knows nothing about.

pub mod auth;
pub mod error;
pub mod live_forest;
pub mod node_service;

pub use auth::{InvalidSessionEntry, Session, SessionRegistry};
pub use error::NodeServiceError;
pub use live_forest::LiveForestService;
pub use node_service::NodeService;
