//! Flat record list to forest
//!
//! Two passes over the input: the first allocates one arena node per record
//! and indexes it by id, the second places every node under its parent, in
//! the root list, or in the orphan list. All orders follow the input order.

use crate::models::{Forest, NodeRecord};

/// Reconstruct the forest for one record snapshot.
///
/// A record whose parent is absent is a root. One whose parent resolves is
/// appended to that parent's children, even if the parent is itself. One
/// whose parent does not resolve is an orphan.
pub fn build_forest(records: Vec<NodeRecord>) -> Forest {
    let mut forest = Forest::new();
    let placements: Vec<_> = records
        .into_iter()
        .map(|record| {
            let parent_id = record.parent_id.clone();
            (forest.push_node(record), parent_id)
        })
        .collect();

    for (index, parent_id) in placements {
        match parent_id {
            None => forest.push_root(index),
            Some(parent_id) => match forest.index_of(&parent_id) {
                Some(parent) => forest.attach_child(parent, index),
                None => forest.push_orphan(index),
            },
        }
    }

    tracing::debug!(
        nodes = forest.len(),
        roots = forest.roots().len(),
        orphans = forest.orphans().len(),
        "Built forest"
    );

    forest
}
