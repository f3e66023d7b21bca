//! Error types for metanode registration

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, MetaError>;

/// Metanode registry errors
#[derive(Error, Debug)]
pub enum MetaError {
    #[error("Schema already registered: {name}")]
    DuplicateName { name: String },

    #[error("Invalid handle for schema '{schema}': {reason}")]
    InvalidHandle { schema: String, reason: String },

    #[error("Field '{field}' already declared on schema '{schema}'")]
    DuplicateField { schema: String, field: String },

    #[error("Link '{schema}.{field}' targets unknown or unfinished schema '{target}'")]
    UnknownTarget {
        schema: String,
        field: String,
        target: String,
    },

    #[error("Schema '{name}' has no fields")]
    EmptyDefinition { name: String },

    #[error("Invalid name: {context} must not be empty")]
    InvalidName { context: String },

    #[error("Schemas still open: {}", .names.join(", "))]
    UnfinishedDefinition { names: Vec<String> },

    #[error("Schema not found: {name}")]
    NotFound { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MetaError {
    /// Whether this error came from the registration phase itself
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            MetaError::DuplicateName { .. }
                | MetaError::InvalidHandle { .. }
                | MetaError::DuplicateField { .. }
                | MetaError::UnknownTarget { .. }
                | MetaError::EmptyDefinition { .. }
                | MetaError::InvalidName { .. }
                | MetaError::UnfinishedDefinition { .. }
        )
    }
}
