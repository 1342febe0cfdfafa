//! Service Layer Error Types

use crate::db::DatabaseError;
use crate::operations::ValidationError;
use thiserror::Error;

/// Service operation errors
#[derive(Error, Debug)]
pub enum NodeServiceError {
    /// Write attempted without a session
    #[error("Not Authenticated, cannot {action}")]
    Unauthenticated { action: &'static str },

    /// Input rejected before reaching the store; the message is user-facing
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Child submitted under a parent that does not exist
    #[error("Invalid parent node: {parent_id}")]
    InvalidParent { parent_id: String },

    /// Database operation failed
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    /// Service initialization failed
    #[error("Initialization error: {0}")]
    InitializationError(String),
}

impl NodeServiceError {
    pub fn unauthenticated_add() -> Self {
        Self::Unauthenticated {
            action: "add new numbers",
        }
    }

    pub fn unauthenticated_delete() -> Self {
        Self::Unauthenticated {
            action: "delete numbers",
        }
    }

    /// Create an invalid parent error
    pub fn invalid_parent(parent_id: impl Into<String>) -> Self {
        Self::InvalidParent {
            parent_id: parent_id.into(),
        }
    }

    /// Create an initialization error
    pub fn initialization_error(msg: impl Into<String>) -> Self {
        Self::InitializationError(msg.into())
    }

    /// Stable code for transport layers
    pub fn code(&self) -> &'static str {
        match self {
            NodeServiceError::Unauthenticated { .. } => "UNAUTHENTICATED",
            NodeServiceError::Validation(_) => "VALIDATION_ERROR",
            NodeServiceError::InvalidParent { .. } => "INVALID_PARENT",
            NodeServiceError::Database(_) => "DATABASE_ERROR",
            NodeServiceError::InitializationError(_) => "INITIALIZATION_ERROR",
        }
    }
}
