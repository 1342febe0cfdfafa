//! Domain Events for node stores
//!
//! Every [`NodeStore`](crate::db::NodeStore) announces successful writes on
//! a tokio broadcast channel so that other parts of the system (the live
//! forest service, the dev server's SSE stream) can react without coupling
//! to a particular backend.
//!
//! # Event Flow
//!
//! 1. A store commits an insert or a delete-all
//! 2. The matching domain event is sent on the broadcast channel
//! 3. All subscribers receive it asynchronously
//! 4. `LiveForestService` recomputes the forest from a fresh `list_all()`
//!
//! Events are only sent after the write succeeded. A failed write emits
//! nothing.

use crate::models::NodeRecord;
use serde::{Deserialize, Serialize};

/// Broadcast channel capacity for domain events.
///
/// Subscribers that lag behind only miss intermediate states; the next
/// event triggers a full recompute anyway.
pub const DOMAIN_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Domain events emitted by node stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomainEvent {
    /// A new node was created
    #[serde(rename = "node:created")]
    NodeCreated(NodeRecord),

    /// All nodes were deleted
    #[serde(rename = "nodes:cleared")]
    NodesCleared { count: usize },
}

impl DomainEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            DomainEvent::NodeCreated(_) => "node:created",
            DomainEvent::NodesCleared { .. } => "nodes:cleared",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The event JSON is internally tagged: the `type` discriminator sits
    /// next to the record fields rather than wrapping them.
    #[test]
    fn test_domain_event_serialization_contract() {
        let record = NodeRecord::new("n1", "10", None, "alice@example.com");
        let json = serde_json::to_value(DomainEvent::NodeCreated(record)).unwrap();

        assert_eq!(json["type"], "node:created");
        assert_eq!(json["id"], "n1");
        assert_eq!(json["value"], "10");
        assert!(json.get("nodeCreated").is_none());

        let json = serde_json::to_value(DomainEvent::NodesCleared { count: 3 }).unwrap();
        assert_eq!(json["type"], "nodes:cleared");
        assert_eq!(json["count"], 3);
    }

    #[test]
    fn test_event_type_matches_tag() {
        let created = DomainEvent::NodeCreated(NodeRecord::new("n1", "1", None, "a"));
        let cleared = DomainEvent::NodesCleared { count: 0 };

        for event in [created, cleared] {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.event_type());
        }
    }
}
