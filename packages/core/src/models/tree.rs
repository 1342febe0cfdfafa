//! In-memory forest reconstructed from a record snapshot
//!
//! The forest is an arena: every record becomes exactly one [`TreeNode`]
//! addressed by a [`NodeIndex`], and parent/child links are index lists.
//! A record whose parent id is its own id therefore becomes its own child,
//! and it is the evaluator's job to notice the cycle.
//!
//! Forests are derived state. They are rebuilt from scratch for every
//! snapshot and never persisted.

use crate::models::NodeRecord;
use crate::operations::EvaluationError;
use std::collections::{HashMap, HashSet};

/// Position of a node inside a [`Forest`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A record plus its derived tree state.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub record: NodeRecord,

    /// Children in input order.
    pub children: Vec<NodeIndex>,

    /// Set by the evaluator; `None` before evaluation or after a failure.
    pub computed_value: Option<f64>,

    /// Failure recorded by graceful forest evaluation.
    pub error: Option<EvaluationError>,
}

impl TreeNode {
    pub fn new(record: NodeRecord) -> Self {
        Self {
            record,
            children: Vec::new(),
            computed_value: None,
            error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn value(&self) -> &str {
        &self.record.value
    }
}

/// Roots, orphans and their descendants for one record snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    nodes: Vec<TreeNode>,
    lookup: HashMap<String, NodeIndex>,
    roots: Vec<NodeIndex>,
    orphans: Vec<NodeIndex>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the arena (equals the number of input records).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn orphans(&self) -> &[NodeIndex] {
        &self.orphans
    }

    pub fn node(&self, index: NodeIndex) -> &TreeNode {
        &self.nodes[index.0]
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut TreeNode {
        &mut self.nodes[index.0]
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.nodes[index.0].children
    }

    /// Resolve an id. With duplicate ids the last record wins.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.lookup.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.index_of(id).map(|index| self.node(index))
    }

    /// Computed value of the node with this id, if it was evaluated.
    pub fn computed_value(&self, id: &str) -> Option<f64> {
        self.get(id).and_then(|node| node.computed_value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &TreeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }

    /// Pre-order walk of the subtree under `start`, each node visited once.
    pub fn subtree(&self, start: NodeIndex) -> Vec<NodeIndex> {
        let mut visited = HashSet::new();
        self.collect_subtree(start, &mut visited)
    }

    /// Ids of every node reachable from a root or an orphan, in display
    /// order: each root's subtree, then each orphan's subtree.
    pub fn flatten_ids(&self) -> Vec<String> {
        let mut visited = HashSet::new();
        let mut ids = Vec::with_capacity(self.nodes.len());
        for &start in self.roots.iter().chain(self.orphans.iter()) {
            for index in self.collect_subtree(start, &mut visited) {
                ids.push(self.node(index).record.id.clone());
            }
        }
        ids
    }

    fn collect_subtree(&self, start: NodeIndex, visited: &mut HashSet<NodeIndex>) -> Vec<NodeIndex> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(index) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }
            order.push(index);
            stack.extend(self.children(index).iter().rev().copied());
        }
        order
    }

    pub(crate) fn push_node(&mut self, record: NodeRecord) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.lookup.insert(record.id.clone(), index);
        self.nodes.push(TreeNode::new(record));
        index
    }

    pub(crate) fn push_root(&mut self, index: NodeIndex) {
        self.roots.push(index);
    }

    pub(crate) fn push_orphan(&mut self, index: NodeIndex) {
        self.orphans.push(index);
    }

    pub(crate) fn attach_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.nodes[parent.0].children.push(child);
    }

    /// Forget previous evaluation results so a re-run starts clean.
    pub(crate) fn reset_evaluation(&mut self) {
        for node in &mut self.nodes {
            node.computed_value = None;
            node.error = None;
        }
    }
}
