//! Engine configuration

use serde::{Deserialize, Serialize};

/// Default for [`EvaluationLimits::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Upper bound accepted by [`EvaluationLimits::validate`].
pub const MAX_SUPPORTED_DEPTH: usize = 1_000_000;

/// Bounds applied to every evaluation walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluationLimits {
    /// Deepest level (root = 0) the evaluator will descend to
    pub max_depth: usize,
}

impl Default for EvaluationLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EvaluationLimits {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth must be greater than 0".to_string());
        }

        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(format!(
                "max_depth cannot exceed {}",
                MAX_SUPPORTED_DEPTH
            ));
        }

        Ok(())
    }
}
