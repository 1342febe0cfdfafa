//! Stored Node Records
//!
//! `NodeRecord` is the shape every persistence backend stores and every
//! client receives. Records are immutable once created: the only way to
//! change the record set is to add a node or delete all of them.
//!
//! # Examples
//!
//! ```rust
//! use numtree_core::models::NewNodeRecord;
//!
//! let root = NewNodeRecord::root("10", "alice@example.com");
//! let child = NewNodeRecord::child("+5", "node-1", "alice@example.com");
//!
//! assert!(root.parent_id.is_none());
//! assert_eq!(child.parent_id.as_deref(), Some("node-1"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted number node.
///
/// # Fields
///
/// - `id`: Opaque identifier assigned by the store (UUID v4)
/// - `value`: Bare number for roots, sign + number for children
/// - `parent_id`: `None` for roots, otherwise the id of another record
/// - `owner`: Identity of the user who created the node
/// - `created_at`: Creation timestamp, stores list records in this order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,

    pub value: String,

    #[serde(default)]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub owner: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl NodeRecord {
    /// Build a record with an explicit id and the current timestamp.
    ///
    /// Stores assign ids themselves; this constructor exists for fixtures,
    /// imports and clients that replay snapshots.
    pub fn new(
        id: impl Into<String>,
        value: impl Into<String>,
        parent_id: Option<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            parent_id,
            owner: owner.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether this record declares itself a root (no parent reference).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Insert payload handed to a [`NodeStore`](crate::db::NodeStore).
///
/// The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNodeRecord {
    pub value: String,
    pub parent_id: Option<String>,
    pub owner: String,
}

impl NewNodeRecord {
    pub fn root(value: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            parent_id: None,
            owner: owner.into(),
        }
    }

    pub fn child(
        value: impl Into<String>,
        parent_id: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            parent_id: Some(parent_id.into()),
            owner: owner.into(),
        }
    }

    /// Materialize the payload into a record with a fresh UUID.
    pub fn into_record(self) -> NodeRecord {
        NodeRecord {
            id: Uuid::new_v4().to_string(),
            value: self.value,
            parent_id: self.parent_id,
            owner: self.owner,
            created_at: Utc::now(),
        }
    }
}
