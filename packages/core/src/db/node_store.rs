//! NodeStore Trait - Persistence Abstraction
//!
//! The engine never talks to a database directly. It consumes record
//! snapshots from a `NodeStore`, and the service layer writes through one.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: All I/O methods are async so embedded (libsql) and
//!    in-process (memory) backends share one interface
//! 2. **Append and Clear Only**: Records are never updated or deleted one
//!    at a time
//! 3. **No Referential Integrity**: A parent id that does not resolve is
//!    legal data (an orphan), so stores must not enforce foreign keys
//! 4. **Events After Writes**: Each successful write emits one
//!    [`DomainEvent`] to subscribers
//!
//! # Examples
//!
//! ```rust
//! use numtree_core::db::{InMemoryStore, NodeStore};
//! use numtree_core::models::NewNodeRecord;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let store: Arc<dyn NodeStore> = Arc::new(InMemoryStore::new());
//!
//! let root = store.insert(NewNodeRecord::root("10", "alice@example.com")).await?;
//! store.insert(NewNodeRecord::child("+5", &root.id, "alice@example.com")).await?;
//!
//! assert_eq!(store.list_all().await?.len(), 2);
//! # Ok(())
//! # }
//! ```

use crate::db::{DatabaseError, DomainEvent};
use crate::models::{NewNodeRecord, NodeRecord};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Abstraction layer for node persistence
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; services hold them as
/// `Arc<dyn NodeStore>` across tasks.
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// All records in creation order.
    async fn list_all(&self) -> Result<Vec<NodeRecord>, DatabaseError>;

    /// Persist a new record, assigning its id and timestamp.
    ///
    /// Emits [`DomainEvent::NodeCreated`] once the write is committed.
    async fn insert(&self, record: NewNodeRecord) -> Result<NodeRecord, DatabaseError>;

    /// Remove every record and return how many there were.
    ///
    /// Emits [`DomainEvent::NodesCleared`] once the write is committed.
    async fn delete_all(&self) -> Result<usize, DatabaseError>;

    /// Look up a single record by id.
    async fn get(&self, id: &str) -> Result<Option<NodeRecord>, DatabaseError>;

    /// Receive domain events for every subsequent write.
    fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent>;
}
