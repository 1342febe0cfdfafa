//! Structural consistency check
//!
//! Counts every node displayed under a root or an orphan and compares the
//! total with the number of records. With single placement the two always
//! agree unless some records sit on a parent cycle and are reachable from
//! nothing. A mismatch is a warning for the user, never an error.

use crate::models::{Forest, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shown next to the status line when the counts disagree.
pub const MISMATCH_WARNING: &str = "Mismatch detected - some nodes may not be properly linked";

/// Counts for the status line plus the ids that made them disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestDiagnostics {
    /// Records in the snapshot
    pub record_count: usize,
    pub root_count: usize,
    pub orphan_count: usize,
    /// Nodes under roots and orphans, every descendant included
    pub displayed_count: usize,
    /// Records no root or orphan reaches, in input order
    pub unreachable_ids: Vec<String>,
}

impl ForestDiagnostics {
    pub fn is_consistent(&self) -> bool {
        self.displayed_count == self.record_count
    }

    pub fn warning(&self) -> Option<&'static str> {
        (!self.is_consistent()).then_some(MISMATCH_WARNING)
    }

    /// One-line summary in the same shape as the UI status bar.
    pub fn status_line(&self) -> String {
        format!(
            "Total nodes in database: {} | Root nodes: {} | Orphaned nodes: {} | Total displayed: {}",
            self.record_count, self.root_count, self.orphan_count, self.displayed_count
        )
    }
}

/// Compare displayed node count with record count.
///
/// A node reached a second time is counted again but its children are not
/// expanded again, so the count terminates on any input.
pub fn diagnose(forest: &Forest) -> ForestDiagnostics {
    let mut expanded: HashSet<NodeIndex> = HashSet::with_capacity(forest.len());
    let mut displayed_count = 0;

    for &start in forest.roots().iter().chain(forest.orphans().iter()) {
        let mut stack = vec![start];
        while let Some(index) = stack.pop() {
            displayed_count += 1;
            if expanded.insert(index) {
                stack.extend(forest.children(index).iter().copied());
            }
        }
    }

    let unreachable_ids = forest
        .iter()
        .filter(|(index, _)| !expanded.contains(index))
        .map(|(_, node)| node.id().to_string())
        .collect();

    let diagnostics = ForestDiagnostics {
        record_count: forest.len(),
        root_count: forest.roots().len(),
        orphan_count: forest.orphans().len(),
        displayed_count,
        unreachable_ids,
    };

    if let Some(warning) = diagnostics.warning() {
        tracing::warn!(
            records = diagnostics.record_count,
            displayed = diagnostics.displayed_count,
            unreachable = ?diagnostics.unreachable_ids,
            "{}",
            warning
        );
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeRecord;
    use crate::operations::build_forest;

    fn record(id: &str, value: &str, parent: Option<&str>) -> NodeRecord {
        NodeRecord::new(id, value, parent.map(str::to_string), "alice@example.com")
    }

    #[test]
    fn test_consistent_forest() {
        let forest = build_forest(vec![
            record("1", "10", None),
            record("2", "+5", Some("1")),
            record("3", "+5", Some("2")),
            record("4", "-1", Some("gone")),
            record("5", "*2", Some("4")),
        ]);

        let diagnostics = diagnose(&forest);

        assert_eq!(diagnostics.record_count, 5);
        assert_eq!(diagnostics.root_count, 1);
        assert_eq!(diagnostics.orphan_count, 1);
        assert_eq!(diagnostics.displayed_count, 5);
        assert!(diagnostics.is_consistent());
        assert_eq!(diagnostics.warning(), None);
        assert!(diagnostics.unreachable_ids.is_empty());
    }

    #[test]
    fn test_empty_forest_is_consistent() {
        let diagnostics = diagnose(&build_forest(Vec::new()));
        assert!(diagnostics.is_consistent());
        assert_eq!(diagnostics.displayed_count, 0);
    }

    #[test]
    fn test_cycle_members_are_flagged() {
        let forest = build_forest(vec![
            record("1", "10", None),
            record("a", "+1", Some("b")),
            record("b", "+1", Some("a")),
            record("c", "*2", Some("a")),
            record("x", "+1", Some("x")),
        ]);

        let diagnostics = diagnose(&forest);

        assert_eq!(diagnostics.displayed_count, 1);
        assert!(!diagnostics.is_consistent());
        assert_eq!(diagnostics.warning(), Some(MISMATCH_WARNING));
        assert_eq!(diagnostics.unreachable_ids, vec!["a", "b", "c", "x"]);
    }

    #[test]
    fn test_status_line() {
        let forest = build_forest(vec![record("1", "10", None), record("2", "+1", Some("9"))]);

        assert_eq!(
            diagnose(&forest).status_line(),
            "Total nodes in database: 2 | Root nodes: 1 | Orphaned nodes: 1 | Total displayed: 2"
        );
    }
}
