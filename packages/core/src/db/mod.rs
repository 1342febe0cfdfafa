//! Database Layer
//!
//! - [`NodeStore`] - async persistence trait the services depend on
//! - [`InMemoryStore`] - `Vec` behind a tokio lock, for tests and demos
//! - [`TursoStore`] - embedded libsql file database (feature `turso`)
//! - [`DomainEvent`] - broadcast after every successful write
//!
//! # Architecture
//!
//! Stores hold flat records only. Trees are never persisted; they are
//! rebuilt from `list_all()` by the engine for every snapshot.

mod error;
pub mod events;
mod memory_store;
mod node_store;
#[cfg(feature = "turso")]
mod turso_store;

pub use error::DatabaseError;
pub use events::DomainEvent;
pub use memory_store::InMemoryStore;
pub use node_store::NodeStore;
#[cfg(feature = "turso")]
pub use turso_store::TursoStore;
