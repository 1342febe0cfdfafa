//! LiveForestService - Recompute on Every Change
//!
//! Listens to the store's domain events and rebuilds the whole snapshot
//! after each one. There is no incremental patching: a snapshot is always
//! the full pipeline over a fresh `list_all()`.
//!
//! # Architecture
//!
//! ```text
//! NodeStore --broadcast<DomainEvent>--> LiveForestService --watch<Arc<ForestSnapshot>>--> readers
//! ```
//!
//! The watch channel only keeps the newest snapshot, so slow readers skip
//! intermediate states instead of queueing them.

use crate::db::DomainEvent;
use crate::operations::ForestSnapshot;
use crate::services::{NodeService, NodeServiceError};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

pub struct LiveForestService {
    service: NodeService,
    events: broadcast::Receiver<DomainEvent>,
    snapshot_tx: watch::Sender<Arc<ForestSnapshot>>,
}

impl LiveForestService {
    /// Subscribe to events and compute the initial snapshot.
    ///
    /// The subscription is taken before the first read, so no write can
    /// fall between the two unnoticed.
    pub async fn new(service: NodeService) -> Result<Self, NodeServiceError> {
        let events = service.subscribe_to_events();
        let initial = service.snapshot().await?;
        let (snapshot_tx, _) = watch::channel(Arc::new(initial));

        Ok(Self {
            service,
            events,
            snapshot_tx,
        })
    }

    /// Receiver of the newest snapshot. Take these before calling [`run`](Self::run).
    pub fn subscribe(&self) -> watch::Receiver<Arc<ForestSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub fn latest(&self) -> Arc<ForestSnapshot> {
        self.snapshot_tx.borrow().clone()
    }

    /// Recompute from the store and publish.
    pub async fn refresh(&self) -> Result<Arc<ForestSnapshot>, NodeServiceError> {
        let snapshot = Arc::new(self.service.snapshot().await?);
        self.snapshot_tx.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    /// Process events until the store's channel closes.
    ///
    /// A failed recompute is logged and the previous snapshot stays
    /// published until the next event.
    pub async fn run(mut self) {
        loop {
            match self.events.recv().await {
                Ok(event) => {
                    tracing::debug!(event_type = event.event_type(), "Recomputing forest");
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Live forest lagged behind store events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }

            match self.refresh().await {
                Ok(snapshot) => {
                    if let Some(warning) = snapshot.diagnostics().warning() {
                        tracing::warn!("{}", warning);
                    }
                }
                Err(e) => tracing::error!("Failed to recompute forest: {}", e),
            }
        }

        tracing::info!("Store event channel closed, live forest stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use crate::services::Session;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_recomputes_after_each_write() {
        let service = NodeService::new(Arc::new(InMemoryStore::new()));
        let live = LiveForestService::new(service.clone()).await.unwrap();
        let mut rx = live.subscribe();
        assert!(rx.borrow().forest().is_empty());
        tokio::spawn(live.run());

        let session = Session::new("alice@example.com");
        let root = service.add_node(Some(&session), "10", None).await.unwrap();

        timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("Timeout waiting for snapshot")
            .expect("Sender dropped");
        assert_eq!(rx.borrow_and_update().forest().computed_value(&root.id), Some(10.0));

        service.delete_all(Some(&session)).await.unwrap();
        timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("Timeout waiting for snapshot")
            .expect("Sender dropped");
        assert!(rx.borrow_and_update().forest().is_empty());
    }

    #[tokio::test]
    async fn test_initial_snapshot_reflects_existing_records() {
        let store = InMemoryStore::with_records(vec![crate::models::NodeRecord::new(
            "1", "4", None, "alice",
        )]);
        let live = LiveForestService::new(NodeService::new(Arc::new(store)))
            .await
            .unwrap();

        assert_eq!(live.latest().forest().computed_value("1"), Some(4.0));
        let refreshed = live.refresh().await.unwrap();
        assert_eq!(refreshed.diagnostics().record_count, 1);
    }
}
