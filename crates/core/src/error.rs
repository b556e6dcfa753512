//! RBAC error model.

use thiserror::Error;

/// Result type used across the RBAC layer.
pub type RbacResult<T> = Result<T, RbacError>;

/// Classification of an [`RbacError`], for callers that branch on the kind
/// rather than on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    ValidationFailed,
    SchemaViolation,
    AccessDenied,
}

/// RBAC-level error.
///
/// `AccessDenied` is a normal decision outcome, not a fault. The other
/// variants reject a document before any of its fields are trusted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RbacError {
    /// Empty or unparsable document.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Parsed, but a required field or constraint check failed.
    #[error("failed to validate: {field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    /// A field does not satisfy its declared JSON-Schema type/shape.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// No role in the set grants the requested access.
    #[error("access denied: {0}")]
    AccessDenied(String),
}

impl RbacError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            Self::SchemaViolation(_) => ErrorKind::SchemaViolation,
            Self::AccessDenied(_) => ErrorKind::AccessDenied,
        }
    }

    pub fn is_access_denied(&self) -> bool {
        self.kind() == ErrorKind::AccessDenied
    }

    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }

    pub fn is_validation_failed(&self) -> bool {
        self.kind() == ErrorKind::ValidationFailed
    }

    pub fn is_schema_violation(&self) -> bool {
        self.kind() == ErrorKind::SchemaViolation
    }
}
