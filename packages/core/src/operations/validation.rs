//! Pre-submission input validation
//!
//! Runs before a record is created and is stricter than [`parse`]: roots may
//! not carry a sign and `/0` is refused outright. Stored data can still
//! bypass it, so the evaluator keeps its own zero-division guard.
//!
//! [`parse`]: crate::operations::parse

use crate::models::Sign;
use crate::operations::parser::parse_number;
use crate::operations::ValidationError;
use serde::{Deserialize, Serialize};

/// Which kind of node the input is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeRole {
    Root,
    Child,
}

impl NodeRole {
    /// A node with a parent is a child, otherwise a root.
    pub fn for_parent(parent_id: Option<&str>) -> Self {
        match parent_id {
            Some(_) => NodeRole::Child,
            None => NodeRole::Root,
        }
    }
}

/// Check user input for a new node and return the trimmed value to store.
///
/// # Examples
///
/// ```rust
/// use numtree_core::operations::{validate_input, NodeRole, ValidationError};
///
/// assert_eq!(validate_input(" 10 ", NodeRole::Root).unwrap(), "10");
/// assert_eq!(
///     validate_input("-5", NodeRole::Root).unwrap_err(),
///     ValidationError::RootHasSign
/// );
/// assert_eq!(
///     validate_input("/0", NodeRole::Child).unwrap_err(),
///     ValidationError::DivisionByZero
/// );
/// ```
pub fn validate_input(raw: &str, role: NodeRole) -> Result<String, ValidationError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(ValidationError::Empty);
    }

    let mut chars = input.chars();
    let sign = chars.next().and_then(Sign::from_char);

    match role {
        NodeRole::Root => {
            if sign.is_some() {
                return Err(ValidationError::RootHasSign);
            }
            parse_number(input).ok_or(ValidationError::InvalidRootNumber)?;
        }
        NodeRole::Child => {
            let sign = sign.ok_or(ValidationError::MissingSign)?;
            let rest = chars.as_str();
            if rest.trim().is_empty() {
                return Err(ValidationError::MissingOperand);
            }
            let operand = parse_number(rest).ok_or(ValidationError::InvalidOperand)?;
            if sign == Sign::Divide && operand == 0.0 {
                return Err(ValidationError::DivisionByZero);
            }
        }
    }

    Ok(input.to_string())
}
