//! In-process NodeStore
//!
//! Keeps records in a `Vec` behind a tokio `RwLock`. Used by tests and by
//! the dev server when `NUMTREE_STORE=memory`.

use crate::db::events::DOMAIN_EVENT_CHANNEL_CAPACITY;
use crate::db::{DatabaseError, DomainEvent, NodeStore};
use crate::models::{NewNodeRecord, NodeRecord};
use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

pub struct InMemoryStore {
    records: RwLock<Vec<NodeRecord>>,
    event_tx: broadcast::Sender<DomainEvent>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Start from existing records, e.g. a fixture. No events are sent.
    pub fn with_records(records: Vec<NodeRecord>) -> Self {
        let (event_tx, _) = broadcast::channel(DOMAIN_EVENT_CHANNEL_CAPACITY);
        Self {
            records: RwLock::new(records),
            event_tx,
        }
    }

    fn emit_event(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeStore for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<NodeRecord>, DatabaseError> {
        Ok(self.records.read().await.clone())
    }

    async fn insert(&self, record: NewNodeRecord) -> Result<NodeRecord, DatabaseError> {
        let record = record.into_record();
        self.records.write().await.push(record.clone());

        tracing::debug!(id = %record.id, "Inserted node");
        self.emit_event(DomainEvent::NodeCreated(record.clone()));
        Ok(record)
    }

    async fn delete_all(&self) -> Result<usize, DatabaseError> {
        let count = {
            let mut records = self.records.write().await;
            let count = records.len();
            records.clear();
            count
        };

        tracing::debug!(count, "Deleted all nodes");
        self.emit_event(DomainEvent::NodesCleared { count });
        Ok(count)
    }

    async fn get(&self, id: &str) -> Result<Option<NodeRecord>, DatabaseError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .find(|record| record.id == id)
            .cloned())
    }

    fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent> {
        self.event_tx.subscribe()
    }
}
