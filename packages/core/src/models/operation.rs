//! Parsed node operations
//!
//! A node's raw `value` string is either a bare number (a root) or a sign
//! followed by a number (an operation applied to the parent's value).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four supported arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Sign {
    pub const ALL: [Sign; 4] = [Sign::Add, Sign::Subtract, Sign::Multiply, Sign::Divide];

    /// Map a leading character to its sign, if it is one.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Sign::Add),
            '-' => Some(Sign::Subtract),
            '*' => Some(Sign::Multiply),
            '/' => Some(Sign::Divide),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Sign::Add => '+',
            Sign::Subtract => '-',
            Sign::Multiply => '*',
            Sign::Divide => '/',
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Structured form of a node value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParsedOperation {
    /// Bare number; the node's value regardless of any parent.
    Root { value: f64 },
    /// `sign operand` applied to the inherited parent value.
    Apply { sign: Sign, operand: f64 },
}

impl ParsedOperation {
    pub fn is_root(&self) -> bool {
        matches!(self, ParsedOperation::Root { .. })
    }

    /// `None` for roots.
    pub fn sign(&self) -> Option<Sign> {
        match self {
            ParsedOperation::Root { .. } => None,
            ParsedOperation::Apply { sign, .. } => Some(*sign),
        }
    }

    pub fn operand(&self) -> f64 {
        match self {
            ParsedOperation::Root { value } => *value,
            ParsedOperation::Apply { operand, .. } => *operand,
        }
    }
}

impl fmt::Display for ParsedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedOperation::Root { value } => write!(f, "{}", value),
            ParsedOperation::Apply { sign, operand } => write!(f, "{}{}", sign, operand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_char_mapping() {
        for sign in Sign::ALL {
            assert_eq!(Sign::from_char(sign.as_char()), Some(sign));
        }
        assert_eq!(Sign::from_char('x'), None);
        assert_eq!(Sign::from_char('1'), None);
    }

    #[test]
    fn test_accessors() {
        let root = ParsedOperation::Root { value: 10.0 };
        assert!(root.is_root());
        assert_eq!(root.sign(), None);
        assert_eq!(root.operand(), 10.0);

        let op = ParsedOperation::Apply {
            sign: Sign::Divide,
            operand: 4.0,
        };
        assert!(!op.is_root());
        assert_eq!(op.sign(), Some(Sign::Divide));
        assert_eq!(op.operand(), 4.0);
        assert_eq!(op.to_string(), "/4");
    }

    #[test]
    fn test_operation_serialization_contract() {
        let op = ParsedOperation::Apply {
            sign: Sign::Multiply,
            operand: 3.0,
        };
        let json = serde_json::to_value(op).unwrap();

        assert_eq!(json["kind"], "apply");
        assert_eq!(json["sign"], "*");
        assert_eq!(json["operand"], 3.0);
    }
}
