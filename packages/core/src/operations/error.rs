//! Error types for the tree engine
//!
//! Three families of failure exist:
//!
//! - [`ParseError`]: a raw value does not match the root or signed grammar.
//! - [`EvaluationError`]: a node cannot be given a computed value.
//! - [`ValidationError`]: user input rejected before it is ever stored.
//!   Its messages are shown verbatim next to the input field.

use crate::models::Sign;
use thiserror::Error;

/// A raw node value that is neither a bare number nor `sign number`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Nothing after the sign character (`"+"`, `"/ "`).
    #[error("Missing number after '{sign}' in '{input}'")]
    MissingOperand { input: String, sign: Sign },

    /// The numeric part is empty, malformed or not finite.
    #[error("Invalid number format: '{input}'")]
    InvalidNumber { input: String },
}

impl ParseError {
    pub fn missing_operand(input: impl Into<String>, sign: Sign) -> Self {
        Self::MissingOperand {
            input: input.into(),
            sign,
        }
    }

    pub fn invalid_number(input: impl Into<String>) -> Self {
        Self::InvalidNumber {
            input: input.into(),
        }
    }

    /// The raw value that failed to parse.
    pub fn input(&self) -> &str {
        match self {
            ParseError::MissingOperand { input, .. } => input,
            ParseError::InvalidNumber { input } => input,
        }
    }
}

/// Failure to compute a node's value.
///
/// Every variant names the node it happened at so graceful evaluation can
/// attach it to the right place in the forest.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// The stored value does not parse.
    #[error("Node '{node_id}' has an unparsable value: {source}")]
    Parse {
        node_id: String,
        #[source]
        source: ParseError,
    },

    /// `/0` reached the evaluator (stored data bypassed input validation).
    #[error("Division by zero at node '{node_id}'")]
    DivisionByZero { node_id: String },

    /// The arithmetic overflowed to infinity or produced NaN.
    #[error("Result at node '{node_id}' is not a finite number")]
    NonFinite { node_id: String },

    /// A signed operation with no inherited value, i.e. a non-root orphan.
    #[error("Child node '{node_id}' must have a parent value")]
    MissingParentValue { node_id: String },

    /// The walk reached a node it had already visited.
    #[error("Cycle detected at node '{node_id}'")]
    Cycle { node_id: String },

    /// The walk went deeper than the configured limit.
    #[error("Maximum evaluation depth {max_depth} exceeded at node '{node_id}'")]
    MaxDepthExceeded { node_id: String, max_depth: usize },
}

impl EvaluationError {
    pub fn parse(node_id: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            node_id: node_id.into(),
            source,
        }
    }

    pub fn division_by_zero(node_id: impl Into<String>) -> Self {
        Self::DivisionByZero {
            node_id: node_id.into(),
        }
    }

    pub fn non_finite(node_id: impl Into<String>) -> Self {
        Self::NonFinite {
            node_id: node_id.into(),
        }
    }

    pub fn missing_parent_value(node_id: impl Into<String>) -> Self {
        Self::MissingParentValue {
            node_id: node_id.into(),
        }
    }

    pub fn cycle(node_id: impl Into<String>) -> Self {
        Self::Cycle {
            node_id: node_id.into(),
        }
    }

    pub fn max_depth_exceeded(node_id: impl Into<String>, max_depth: usize) -> Self {
        Self::MaxDepthExceeded {
            node_id: node_id.into(),
            max_depth,
        }
    }

    pub fn node_id(&self) -> &str {
        match self {
            EvaluationError::Parse { node_id, .. }
            | EvaluationError::DivisionByZero { node_id }
            | EvaluationError::NonFinite { node_id }
            | EvaluationError::MissingParentValue { node_id }
            | EvaluationError::Cycle { node_id }
            | EvaluationError::MaxDepthExceeded { node_id, .. } => node_id,
        }
    }

    /// Machine-readable code used in serialized views.
    pub fn code(&self) -> &'static str {
        match self {
            EvaluationError::Parse { .. } => "PARSE_ERROR",
            EvaluationError::DivisionByZero { .. } => "DIVISION_BY_ZERO",
            EvaluationError::NonFinite { .. } => "NON_FINITE",
            EvaluationError::MissingParentValue { .. } => "MISSING_PARENT_VALUE",
            EvaluationError::Cycle { .. } => "CYCLE",
            EvaluationError::MaxDepthExceeded { .. } => "MAX_DEPTH_EXCEEDED",
        }
    }
}

/// Rejected user input. Display strings are user-facing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Input cannot be empty")]
    Empty,

    #[error("Root node should be a number without a sign")]
    RootHasSign,

    #[error("Root must be a valid number")]
    InvalidRootNumber,

    #[error("Child node must start with +, -, *, or /")]
    MissingSign,

    #[error("Number is required after the sign")]
    MissingOperand,

    #[error("Invalid number after sign")]
    InvalidOperand,

    #[error("Cannot divide by zero")]
    DivisionByZero,
}
