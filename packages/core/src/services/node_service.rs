//! NodeService - Write and Snapshot Operations
//!
//! The single entry point clients use to change or read the number tree:
//!
//! - Add a node (session required, input validated, parent checked)
//! - Delete all nodes (session required)
//! - List records and build evaluated snapshots
//! - Subscribe to domain events of the underlying store
//!
//! The service never retries. A failed write is returned once to the caller.

use crate::config::EvaluationLimits;
use crate::db::{DomainEvent, NodeStore};
use crate::models::{NewNodeRecord, NodeRecord};
use crate::operations::{validate_input, ForestSnapshot, NodeRole};
use crate::services::{NodeServiceError, Session};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Core service for number-node operations
///
/// # Examples
///
/// ```rust
/// use numtree_core::db::InMemoryStore;
/// use numtree_core::services::{NodeService, Session};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let service = NodeService::new(Arc::new(InMemoryStore::new()));
/// let session = Session::new("alice@example.com");
///
/// let root = service.add_node(Some(&session), "10", None).await?;
/// service.add_node(Some(&session), "*3", Some(root.id.as_str())).await?;
///
/// let snapshot = service.snapshot().await?;
/// assert_eq!(snapshot.view().roots[0].children[0].computed_value, Some(30.0));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NodeService {
    store: Arc<dyn NodeStore>,
    limits: EvaluationLimits,
}

impl NodeService {
    /// Create a service with default evaluation limits
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self {
            store,
            limits: EvaluationLimits::default(),
        }
    }

    /// Create a service with custom evaluation limits
    ///
    /// # Errors
    ///
    /// Returns `InitializationError` if the limits do not validate.
    pub fn with_limits(
        store: Arc<dyn NodeStore>,
        limits: EvaluationLimits,
    ) -> Result<Self, NodeServiceError> {
        limits
            .validate()
            .map_err(NodeServiceError::initialization_error)?;
        Ok(Self { store, limits })
    }

    /// Get access to the underlying store
    pub fn store(&self) -> &Arc<dyn NodeStore> {
        &self.store
    }

    pub fn limits(&self) -> &EvaluationLimits {
        &self.limits
    }

    /// Subscribe to domain events of the underlying store
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent> {
        self.store.subscribe_to_events()
    }

    /// Add a root (`parent_id = None`) or child node.
    ///
    /// The stored value is the trimmed input and the owner comes from the
    /// session.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` without a session; nothing is written
    /// - `Validation` with the user-facing reason the input was rejected
    /// - `InvalidParent` if `parent_id` names no existing record
    /// - `Database` if the store fails
    pub async fn add_node(
        &self,
        session: Option<&Session>,
        value: &str,
        parent_id: Option<&str>,
    ) -> Result<NodeRecord, NodeServiceError> {
        let session = session.ok_or_else(NodeServiceError::unauthenticated_add)?;
        let value = validate_input(value, NodeRole::for_parent(parent_id))?;

        let new_record = match parent_id {
            None => NewNodeRecord::root(value, session.owner()),
            Some(parent_id) => {
                if self.store.get(parent_id).await?.is_none() {
                    return Err(NodeServiceError::invalid_parent(parent_id));
                }
                NewNodeRecord::child(value, parent_id, session.owner())
            }
        };

        let record = self.store.insert(new_record).await?;
        tracing::info!(
            id = %record.id,
            parent_id = ?record.parent_id,
            owner = %record.owner,
            "Added node"
        );
        Ok(record)
    }

    /// Delete every node and return how many were removed.
    pub async fn delete_all(&self, session: Option<&Session>) -> Result<usize, NodeServiceError> {
        let session = session.ok_or_else(NodeServiceError::unauthenticated_delete)?;
        let count = self.store.delete_all().await?;

        tracing::info!(count, owner = %session.owner(), "Deleted all nodes");
        Ok(count)
    }

    /// All records in creation order.
    pub async fn list_all(&self) -> Result<Vec<NodeRecord>, NodeServiceError> {
        Ok(self.store.list_all().await?)
    }

    /// Build, evaluate and diagnose the current record set.
    pub async fn snapshot(&self) -> Result<ForestSnapshot, NodeServiceError> {
        let records = self.store.list_all().await?;
        Ok(ForestSnapshot::from_records(records, &self.limits))
    }
}
