//! Value parser
//!
//! Grammar:
//!
//! ```text
//! value  := root | child
//! root   := number                 (does not start with + - * /)
//! child  := sign number
//! sign   := '+' | '-' | '*' | '/'
//! ```
//!
//! `number` is anything Rust's `f64` parser accepts after trimming ASCII
//! whitespace, as long as the result is finite. Division by zero is not a
//! parse concern; see [`validate_input`](crate::operations::validate_input)
//! and the evaluator.
//!
//! The sign is only recognized as the very first character. A stored value
//! with whitespace before the sign (`" +5"`) is therefore a root number,
//! since `f64` accepts a leading `+` or `-`. Input submitted through
//! `validate_input` is trimmed first, so this only affects raw stored data.

use crate::models::{ParsedOperation, Sign};
use crate::operations::ParseError;

/// Parse a raw node value.
///
/// # Examples
///
/// ```rust
/// use numtree_core::models::{ParsedOperation, Sign};
/// use numtree_core::operations::parse;
///
/// assert_eq!(parse("10").unwrap(), ParsedOperation::Root { value: 10.0 });
/// assert_eq!(
///     parse("*3").unwrap(),
///     ParsedOperation::Apply { sign: Sign::Multiply, operand: 3.0 }
/// );
/// assert!(parse("+abc").is_err());
/// ```
pub fn parse(raw: &str) -> Result<ParsedOperation, ParseError> {
    let mut chars = raw.chars();
    match chars.next().and_then(Sign::from_char) {
        None => {
            let value = parse_number(raw).ok_or_else(|| ParseError::invalid_number(raw))?;
            Ok(ParsedOperation::Root { value })
        }
        Some(sign) => {
            let rest = chars.as_str();
            if rest.trim().is_empty() {
                return Err(ParseError::missing_operand(raw, sign));
            }
            let operand = parse_number(rest).ok_or_else(|| ParseError::invalid_number(raw))?;
            Ok(ParsedOperation::Apply { sign, operand })
        }
    }
}

/// Strict finite float parse of the whole (trimmed) text.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_values() {
        for (raw, expected) in [("10", 10.0), ("0", 0.0), ("3.25", 3.25), ("1e3", 1000.0), (" 7 ", 7.0)] {
            let parsed = parse(raw).unwrap();
            assert!(parsed.is_root(), "{raw} should be a root");
            assert_eq!(parsed.operand(), expected);
            assert_eq!(parsed.sign(), None);
        }
    }

    #[test]
    fn test_child_values() {
        for sign in Sign::ALL {
            for n in [0.0, 5.0, 2.5, 1000.0] {
                let raw = format!("{}{}", sign, n);
                assert_eq!(
                    parse(&raw).unwrap(),
                    ParsedOperation::Apply { sign, operand: n },
                    "parsing {raw}"
                );
            }
        }
    }

    #[test]
    fn test_signed_negative_operand() {
        // "--5" subtracts negative five
        assert_eq!(
            parse("--5").unwrap(),
            ParsedOperation::Apply {
                sign: Sign::Subtract,
                operand: -5.0
            }
        );
    }

    #[test]
    fn test_rejected_values() {
        assert!(matches!(parse(""), Err(ParseError::InvalidNumber { .. })));
        assert!(matches!(parse("abc"), Err(ParseError::InvalidNumber { .. })));
        assert!(matches!(
            parse("+"),
            Err(ParseError::MissingOperand { sign: Sign::Add, .. })
        ));
        assert!(matches!(parse("+abc"), Err(ParseError::InvalidNumber { .. })));
        assert!(matches!(parse("/ "), Err(ParseError::MissingOperand { .. })));
    }

    #[test]
    fn test_trailing_garbage_and_non_finite_rejected() {
        assert!(parse("10abc").is_err());
        assert!(parse("+5x").is_err());
        assert!(parse("NaN").is_err());
        assert!(parse("inf").is_err());
        assert!(parse("*infinity").is_err());
    }

    #[test]
    fn test_whitespace_before_sign_is_a_root() {
        assert_eq!(parse(" +5").unwrap(), ParsedOperation::Root { value: 5.0 });
        assert_eq!(parse("\t-2").unwrap(), ParsedOperation::Root { value: -2.0 });
        assert!(parse(" *3").is_err());
    }

    #[test]
    fn test_parser_allows_divide_by_zero() {
        assert_eq!(
            parse("/0").unwrap(),
            ParsedOperation::Apply {
                sign: Sign::Divide,
                operand: 0.0
            }
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse("-2.5").unwrap(), parse("-2.5").unwrap());
        assert_eq!(parse("x").unwrap_err(), parse("x").unwrap_err());
    }
}
