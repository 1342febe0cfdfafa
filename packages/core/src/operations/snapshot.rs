//! One record snapshot, fully processed
//!
//! [`ForestSnapshot::from_records`] runs the whole pipeline for a record
//! list: build the forest, evaluate it gracefully, diagnose it. The result
//! is immutable; a new record list means a new snapshot.
//!
//! [`ForestSnapshot::view`] turns the arena into nested, serializable
//! [`TreeView`]s for clients.

use crate::config::EvaluationLimits;
use crate::models::{Forest, NodeIndex, NodeRecord};
use crate::operations::{
    build_forest, diagnose, evaluate_forest, EvaluationError, EvaluationReport, ForestDiagnostics,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Evaluated forest, evaluation report and diagnostics for one record list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForestSnapshot {
    forest: Forest,
    report: EvaluationReport,
    diagnostics: ForestDiagnostics,
}

impl ForestSnapshot {
    pub fn from_records(records: Vec<NodeRecord>, limits: &EvaluationLimits) -> Self {
        let mut forest = build_forest(records);
        let report = evaluate_forest(&mut forest, limits);
        let diagnostics = diagnose(&forest);

        Self {
            forest,
            report,
            diagnostics,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn report(&self) -> &EvaluationReport {
        &self.report
    }

    pub fn diagnostics(&self) -> &ForestDiagnostics {
        &self.diagnostics
    }

    /// Depth of the deepest displayed node; a lone root has depth 0.
    pub fn max_depth(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.forest.len());
        let mut deepest = 0;

        for &start in self.forest.roots().iter().chain(self.forest.orphans().iter()) {
            let mut stack = vec![(start, 0usize)];
            while let Some((index, depth)) = stack.pop() {
                if !seen.insert(index) {
                    continue;
                }
                deepest = deepest.max(depth);
                stack.extend(
                    self.forest
                        .children(index)
                        .iter()
                        .map(|&child| (child, depth + 1)),
                );
            }
        }

        deepest
    }

    /// Nested view of roots and orphans for serialization.
    pub fn view(&self) -> ForestView {
        let mut visited = HashSet::with_capacity(self.forest.len());
        let roots = self
            .forest
            .roots()
            .iter()
            .filter_map(|&root| self.tree_view(root, &mut visited))
            .collect();
        let orphans = self
            .forest
            .orphans()
            .iter()
            .filter_map(|&orphan| self.tree_view(orphan, &mut visited))
            .collect();

        ForestView {
            roots,
            orphans,
            diagnostics: self.diagnostics.clone(),
            failures: self.report.failures.iter().map(FailureView::from).collect(),
            max_depth: self.max_depth(),
        }
    }

    /// Build the nested view bottom-up so deep chains do not recurse.
    /// Nodes already placed elsewhere are left out, which keeps cyclic
    /// input finite.
    fn tree_view(&self, start: NodeIndex, visited: &mut HashSet<NodeIndex>) -> Option<TreeView> {
        if !visited.insert(start) {
            return None;
        }

        let mut order = Vec::new();
        let mut placed: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        let mut stack = vec![start];
        while let Some(index) = stack.pop() {
            order.push(index);
            let fresh: Vec<NodeIndex> = self
                .forest
                .children(index)
                .iter()
                .copied()
                .filter(|&child| visited.insert(child))
                .collect();
            stack.extend(fresh.iter().rev().copied());
            placed.insert(index, fresh);
        }

        let mut built: HashMap<NodeIndex, TreeView> = HashMap::with_capacity(order.len());
        for &index in order.iter().rev() {
            let children = placed
                .remove(&index)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|child| built.remove(&child))
                .collect();
            let node = self.forest.node(index);
            built.insert(
                index,
                TreeView {
                    id: node.record.id.clone(),
                    value: node.record.value.clone(),
                    parent_id: node.record.parent_id.clone(),
                    owner: node.record.owner.clone(),
                    computed_value: node.computed_value,
                    error: node.error.as_ref().map(FailureView::from),
                    children,
                },
            );
        }

        built.remove(&start)
    }
}

/// Serializable form of a [`ForestSnapshot`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestView {
    pub roots: Vec<TreeView>,
    pub orphans: Vec<TreeView>,
    pub diagnostics: ForestDiagnostics,
    pub failures: Vec<FailureView>,
    pub max_depth: usize,
}

/// A node and everything displayed beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeView {
    pub id: String,
    pub value: String,
    pub parent_id: Option<String>,
    pub owner: String,
    pub computed_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FailureView>,
    pub children: Vec<TreeView>,
}

/// An [`EvaluationError`] flattened for clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureView {
    pub node_id: String,
    pub code: String,
    pub message: String,
}

impl From<&EvaluationError> for FailureView {
    fn from(error: &EvaluationError) -> Self {
        Self {
            node_id: error.node_id().to_string(),
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}
