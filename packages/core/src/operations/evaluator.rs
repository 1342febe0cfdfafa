//! Top-down value evaluation
//!
//! Each node's computed value is its own number (roots, and orphans whose
//! value is a bare number) or its operation applied to the value inherited
//! from its parent. Evaluation runs pre-order, so a parent always has its
//! value before any child is looked at.
//!
//! # Architecture
//!
//! Walks use an explicit stack instead of recursion. Every walk keeps a
//! visited set and tracks depth, so a cyclic record set surfaces as
//! [`EvaluationError::Cycle`] and a pathologically deep one as
//! [`EvaluationError::MaxDepthExceeded`] rather than exhausting the stack.
//!
//! Two entry points share the per-node arithmetic:
//!
//! - [`evaluate`] walks one subtree and stops at the first failure.
//! - [`evaluate_forest`] walks every root and orphan, records failures on
//!   the nodes they happened at, skips the failed node's subtree and keeps
//!   going with its siblings.

use crate::config::EvaluationLimits;
use crate::models::{Forest, NodeIndex, ParsedOperation, Sign, TreeNode};
use crate::operations::{parse, EvaluationError};
use std::collections::HashSet;

/// Outcome of [`evaluate_forest`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationReport {
    /// Nodes that received a computed value
    pub evaluated: usize,

    /// Descendants left unevaluated because an ancestor failed
    pub skipped: usize,

    /// One entry per failed node, in walk order
    pub failures: Vec<EvaluationError>,
}

impl EvaluationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Evaluate the subtree under `start`, failing fast.
///
/// `inherited` is the parent's computed value; pass `None` for roots and
/// orphans. Nodes evaluated before a failure keep their values and the
/// failing node is left without one.
///
/// # Examples
///
/// ```rust
/// use numtree_core::config::EvaluationLimits;
/// use numtree_core::models::NodeRecord;
/// use numtree_core::operations::{build_forest, evaluate};
///
/// let mut forest = build_forest(vec![
///     NodeRecord::new("1", "10", None, "alice"),
///     NodeRecord::new("2", "+5", Some("1".into()), "alice"),
/// ]);
/// let root = forest.roots()[0];
/// evaluate(&mut forest, root, None, &EvaluationLimits::default()).unwrap();
///
/// assert_eq!(forest.computed_value("2"), Some(15.0));
/// ```
pub fn evaluate(
    forest: &mut Forest,
    start: NodeIndex,
    inherited: Option<f64>,
    limits: &EvaluationLimits,
) -> Result<(), EvaluationError> {
    let mut visited = HashSet::new();
    let mut stack = vec![(start, inherited, 0usize)];

    while let Some((index, inherited, depth)) = stack.pop() {
        let outcome = step(forest, index, inherited, depth, limits, &mut visited);
        let node = forest.node_mut(index);
        match outcome {
            Ok(value) => {
                node.computed_value = Some(value);
                push_children(&mut stack, forest, index, value, depth);
            }
            Err(error) => {
                if !matches!(error, EvaluationError::Cycle { .. }) {
                    node.computed_value = None;
                }
                return Err(error);
            }
        }
    }

    Ok(())
}

/// Evaluate every root and orphan, degrading per node.
///
/// Previous results are cleared first. A failing node keeps no computed
/// value, carries its error, and its descendants are skipped. Nodes that
/// no root or orphan reaches can only sit on or below a parent cycle, so
/// they are marked with [`EvaluationError::Cycle`].
pub fn evaluate_forest(forest: &mut Forest, limits: &EvaluationLimits) -> EvaluationReport {
    forest.reset_evaluation();

    let mut report = EvaluationReport::default();
    let mut visited = HashSet::with_capacity(forest.len());
    let starts: Vec<NodeIndex> = forest
        .roots()
        .iter()
        .chain(forest.orphans().iter())
        .copied()
        .collect();

    for start in starts {
        let mut stack = vec![(start, None, 0usize)];
        while let Some((index, inherited, depth)) = stack.pop() {
            match step(forest, index, inherited, depth, limits, &mut visited) {
                Ok(value) => {
                    forest.node_mut(index).computed_value = Some(value);
                    report.evaluated += 1;
                    push_children(&mut stack, forest, index, value, depth);
                }
                Err(error @ EvaluationError::Cycle { .. }) => {
                    // Already evaluated through another path; leave its state alone.
                    tracing::warn!(node_id = %error.node_id(), "Node reached twice during evaluation");
                    report.failures.push(error);
                }
                Err(error) => {
                    report.skipped += skip_descendants(forest, index, &mut visited);
                    record_failure(forest, index, error, &mut report);
                }
            }
        }
    }

    let stranded: Vec<NodeIndex> = forest
        .iter()
        .map(|(index, _)| index)
        .filter(|index| !visited.contains(index))
        .collect();
    for index in stranded {
        let error = EvaluationError::cycle(forest.node(index).id());
        record_failure(forest, index, error, &mut report);
    }

    tracing::debug!(
        evaluated = report.evaluated,
        skipped = report.skipped,
        failures = report.failures.len(),
        "Evaluated forest"
    );

    report
}

/// Guards plus arithmetic for one node of a walk.
fn step(
    forest: &Forest,
    index: NodeIndex,
    inherited: Option<f64>,
    depth: usize,
    limits: &EvaluationLimits,
    visited: &mut HashSet<NodeIndex>,
) -> Result<f64, EvaluationError> {
    let node = forest.node(index);
    if !visited.insert(index) {
        return Err(EvaluationError::cycle(node.id()));
    }
    if depth > limits.max_depth {
        return Err(EvaluationError::max_depth_exceeded(
            node.id(),
            limits.max_depth,
        ));
    }
    compute(node, inherited)
}

/// The node's value given what its parent computed.
fn compute(node: &TreeNode, inherited: Option<f64>) -> Result<f64, EvaluationError> {
    let operation = parse(node.value()).map_err(|e| EvaluationError::parse(node.id(), e))?;

    let (sign, operand) = match operation {
        ParsedOperation::Root { value } => return Ok(value),
        ParsedOperation::Apply { sign, operand } => (sign, operand),
    };
    let base = inherited.ok_or_else(|| EvaluationError::missing_parent_value(node.id()))?;

    let result = match sign {
        Sign::Add => base + operand,
        Sign::Subtract => base - operand,
        Sign::Multiply => base * operand,
        Sign::Divide if operand == 0.0 => {
            return Err(EvaluationError::division_by_zero(node.id()));
        }
        Sign::Divide => base / operand,
    };

    if !result.is_finite() {
        return Err(EvaluationError::non_finite(node.id()));
    }
    Ok(result)
}

fn push_children(
    stack: &mut Vec<(NodeIndex, Option<f64>, usize)>,
    forest: &Forest,
    index: NodeIndex,
    value: f64,
    depth: usize,
) {
    // Reversed so the first child is popped first.
    stack.extend(
        forest
            .children(index)
            .iter()
            .rev()
            .map(|&child| (child, Some(value), depth + 1)),
    );
}

/// Mark everything under a failed node as visited; returns how many.
fn skip_descendants(forest: &Forest, index: NodeIndex, visited: &mut HashSet<NodeIndex>) -> usize {
    forest
        .subtree(index)
        .into_iter()
        .skip(1)
        .filter(|&descendant| visited.insert(descendant))
        .count()
}

fn record_failure(
    forest: &mut Forest,
    index: NodeIndex,
    error: EvaluationError,
    report: &mut EvaluationReport,
) {
    tracing::warn!(node_id = %error.node_id(), error = %error, "Node evaluation failed");
    let node = forest.node_mut(index);
    node.computed_value = None;
    node.error = Some(error.clone());
    report.failures.push(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeRecord;
    use crate::operations::build_forest;

    fn record(id: &str, value: &str, parent: Option<&str>) -> NodeRecord {
        NodeRecord::new(id, value, parent.map(str::to_string), "alice@example.com")
    }

    fn limits() -> EvaluationLimits {
        EvaluationLimits::default()
    }

    #[test]
    fn test_root_with_child() {
        let mut forest = build_forest(vec![record("1", "10", None), record("2", "+5", Some("1"))]);
        let root = forest.roots()[0];

        evaluate(&mut forest, root, None, &limits()).unwrap();

        assert_eq!(forest.computed_value("1"), Some(10.0));
        assert_eq!(forest.computed_value("2"), Some(15.0));
    }

    #[test]
    fn test_all_operators() {
        let mut forest = build_forest(vec![
            record("r", "12", None),
            record("add", "+3", Some("r")),
            record("sub", "-3", Some("r")),
            record("mul", "*3", Some("r")),
            record("div", "/3", Some("r")),
            record("chain", "*2", Some("add")),
        ]);
        let root = forest.roots()[0];

        evaluate(&mut forest, root, None, &limits()).unwrap();

        assert_eq!(forest.computed_value("add"), Some(15.0));
        assert_eq!(forest.computed_value("sub"), Some(9.0));
        assert_eq!(forest.computed_value("mul"), Some(36.0));
        assert_eq!(forest.computed_value("div"), Some(4.0));
        assert_eq!(forest.computed_value("chain"), Some(30.0));
    }

    #[test]
    fn test_root_ignores_inherited_value() {
        let mut forest = build_forest(vec![record("1", "7", None)]);
        let root = forest.roots()[0];

        evaluate(&mut forest, root, Some(100.0), &limits()).unwrap();

        assert_eq!(forest.computed_value("1"), Some(7.0));
    }

    #[test]
    fn test_division_by_zero_keeps_ancestors() {
        let mut forest = build_forest(vec![
            record("1", "10", None),
            record("2", "*3", Some("1")),
            record("3", "/0", Some("2")),
        ]);
        let root = forest.roots()[0];

        let err = evaluate(&mut forest, root, None, &limits()).unwrap_err();

        assert_eq!(err, EvaluationError::division_by_zero("3"));
        assert_eq!(forest.computed_value("1"), Some(10.0));
        assert_eq!(forest.computed_value("2"), Some(30.0));
        assert_eq!(forest.computed_value("3"), None);
    }

    #[test]
    fn test_orphan_with_operation_needs_parent_value() {
        let mut forest = build_forest(vec![record("2", "+5", Some("1"))]);
        assert!(forest.roots().is_empty());
        let orphan = forest.orphans()[0];

        let err = evaluate(&mut forest, orphan, None, &limits()).unwrap_err();

        assert_eq!(err, EvaluationError::missing_parent_value("2"));
        assert_eq!(forest.computed_value("2"), None);
    }

    #[test]
    fn test_orphan_with_bare_number_acts_as_root() {
        let mut forest = build_forest(vec![
            record("o", "4", Some("gone")),
            record("k", "*2", Some("o")),
        ]);
        let orphan = forest.orphans()[0];

        evaluate(&mut forest, orphan, None, &limits()).unwrap();

        assert_eq!(forest.computed_value("o"), Some(4.0));
        assert_eq!(forest.computed_value("k"), Some(8.0));
    }

    #[test]
    fn test_self_parent_is_reported_as_cycle() {
        let mut forest = build_forest(vec![record("x", "5", Some("x"))]);
        let x = forest.index_of("x").unwrap();

        let err = evaluate(&mut forest, x, None, &limits()).unwrap_err();

        assert_eq!(err, EvaluationError::cycle("x"));
        assert_eq!(forest.computed_value("x"), Some(5.0));
    }

    #[test]
    fn test_two_node_cycle() {
        let mut forest = build_forest(vec![
            record("a", "+1", Some("b")),
            record("b", "+1", Some("a")),
        ]);
        let a = forest.index_of("a").unwrap();

        let err = evaluate(&mut forest, a, Some(0.0), &limits()).unwrap_err();

        assert_eq!(err, EvaluationError::cycle("a"));
    }

    #[test]
    fn test_max_depth() {
        let mut records = vec![record("n0", "1", None)];
        for i in 1..=5 {
            records.push(record(&format!("n{i}"), "+1", Some(&format!("n{}", i - 1))));
        }
        let mut forest = build_forest(records);
        let root = forest.roots()[0];

        let err = evaluate(&mut forest, root, None, &EvaluationLimits::with_max_depth(3)).unwrap_err();
        assert_eq!(err, EvaluationError::max_depth_exceeded("n4", 3));
        assert_eq!(forest.computed_value("n3"), Some(4.0));

        evaluate(&mut forest, root, None, &EvaluationLimits::with_max_depth(5)).unwrap();
        assert_eq!(forest.computed_value("n5"), Some(6.0));
    }

    #[test]
    fn test_deep_chain_does_not_overflow_stack() {
        let depth = 50_000;
        let mut records = vec![record("n0", "0", None)];
        for i in 1..=depth {
            records.push(record(&format!("n{i}"), "+1", Some(&format!("n{}", i - 1))));
        }
        let mut forest = build_forest(records);
        let root = forest.roots()[0];

        evaluate(&mut forest, root, None, &EvaluationLimits::with_max_depth(depth)).unwrap();

        assert_eq!(forest.computed_value(&format!("n{depth}")), Some(depth as f64));
    }

    #[test]
    fn test_unparsable_stored_value() {
        let mut forest = build_forest(vec![record("1", "10", None), record("2", "+x", Some("1"))]);
        let root = forest.roots()[0];

        let err = evaluate(&mut forest, root, None, &limits()).unwrap_err();

        assert!(matches!(err, EvaluationError::Parse { ref node_id, .. } if node_id == "2"));
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let mut forest = build_forest(vec![
            record("1", "3", None),
            record("2", "/4", Some("1")),
            record("3", "-0.25", Some("2")),
        ]);
        let root = forest.roots()[0];

        evaluate(&mut forest, root, None, &limits()).unwrap();
        let first: Vec<_> = forest.iter().map(|(_, n)| n.computed_value).collect();
        evaluate(&mut forest, root, None, &limits()).unwrap();
        let second: Vec<_> = forest.iter().map(|(_, n)| n.computed_value).collect();

        assert_eq!(first, second);
        assert_eq!(forest.computed_value("3"), Some(0.5));
    }

    #[test]
    fn test_evaluate_forest_continues_after_failures() {
        let mut forest = build_forest(vec![
            record("1", "10", None),
            record("2", "/0", Some("1")),
            record("3", "+1", Some("2")),
            record("4", "+1", Some("1")),
            record("5", "+5", Some("missing")),
            record("6", "*2", Some("5")),
            record("7", "20", None),
        ]);

        let report = evaluate_forest(&mut forest, &limits());

        assert_eq!(report.evaluated, 3);
        assert_eq!(report.skipped, 2);
        assert_eq!(
            report.failures,
            vec![
                EvaluationError::division_by_zero("2"),
                EvaluationError::missing_parent_value("5"),
            ]
        );
        assert_eq!(forest.computed_value("1"), Some(10.0));
        assert_eq!(forest.computed_value("4"), Some(11.0));
        assert_eq!(forest.computed_value("7"), Some(20.0));
        assert_eq!(forest.computed_value("3"), None);
        assert_eq!(
            forest.get("2").unwrap().error,
            Some(EvaluationError::division_by_zero("2"))
        );
        assert!(forest.get("3").unwrap().error.is_none());
    }

    #[test]
    fn test_overflow_is_reported_not_stored() {
        let mut forest = build_forest(vec![
            record("1", "1e308", None),
            record("2", "*10", Some("1")),
            record("3", "*0", Some("2")),
            record("4", "+1", Some("1")),
        ]);
        let root = forest.roots()[0];

        let err = evaluate(&mut forest, root, None, &limits()).unwrap_err();
        assert_eq!(err, EvaluationError::non_finite("2"));
        assert_eq!(forest.computed_value("2"), None);

        let report = evaluate_forest(&mut forest, &limits());

        assert_eq!(report.failures, vec![EvaluationError::non_finite("2")]);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.evaluated, 2);
        assert_eq!(forest.computed_value("2"), None);
        assert_eq!(forest.computed_value("3"), None);
        assert_eq!(forest.computed_value("4"), Some(1e308));
        assert_eq!(
            forest.get("2").unwrap().error,
            Some(EvaluationError::non_finite("2"))
        );
    }

    #[test]
    fn test_evaluate_forest_depth_limit_skips_subtree() {
        let mut forest = build_forest(vec![
            record("a0", "1", None),
            record("a1", "+1", Some("a0")),
            record("a2", "+1", Some("a1")),
            record("a3", "+1", Some("a2")),
            record("a4", "+1", Some("a3")),
            record("a2b", "*5", Some("a1")),
            record("b0", "7", None),
            record("b1", "*2", Some("b0")),
        ]);

        let report = evaluate_forest(&mut forest, &EvaluationLimits::with_max_depth(2));

        assert_eq!(
            report.failures,
            vec![EvaluationError::max_depth_exceeded("a3", 2)]
        );
        assert_eq!(report.skipped, 1);
        assert_eq!(report.evaluated, 6);
        assert_eq!(forest.computed_value("a2"), Some(3.0));
        assert_eq!(forest.computed_value("a2b"), Some(10.0));
        assert_eq!(forest.computed_value("a3"), None);
        assert_eq!(forest.computed_value("a4"), None);
        assert!(forest.get("a4").unwrap().error.is_none());
        assert_eq!(
            forest.get("a3").unwrap().error,
            Some(EvaluationError::max_depth_exceeded("a3", 2))
        );
        assert_eq!(forest.computed_value("b1"), Some(14.0));
    }

    #[test]
    fn test_evaluate_forest_flags_unreachable_cycles() {
        let mut forest = build_forest(vec![
            record("root", "1", None),
            record("x", "+1", Some("x")),
        ]);

        let report = evaluate_forest(&mut forest, &limits());

        assert_eq!(report.evaluated, 1);
        assert_eq!(report.failures, vec![EvaluationError::cycle("x")]);
        assert_eq!(forest.get("x").unwrap().error, Some(EvaluationError::cycle("x")));
    }

    #[test]
    fn test_evaluate_forest_clears_previous_results() {
        let mut forest = build_forest(vec![record("1", "10", None), record("2", "+1", Some("1"))]);

        let first = evaluate_forest(&mut forest, &limits());
        let second = evaluate_forest(&mut forest, &limits());

        assert!(first.is_clean());
        assert_eq!(first, second);
        assert_eq!(forest.computed_value("2"), Some(11.0));
    }
}
