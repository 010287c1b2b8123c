//! Errors surfaced by the accounting services and entity handlers.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Accounting and entity operation errors.
#[derive(Debug, Clone, Error)]
pub enum AccountingError {
    /// Malformed input.
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Lookup against an id or key that doesn't exist.
    #[error("{message}")]
    NotFound { code: ErrorCode, message: String },

    /// Uniqueness violation.
    #[error("{message}")]
    Conflict { code: ErrorCode, message: String },

    /// Operation not allowed in the entity's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Storage failure not otherwise classified.
    #[error("Storage error: {0}")]
    Storage(#[source] DomainError),

    /// A paired operation failed and so did the action undoing its first half.
    #[error("{cause} (compensating action failed: {compensation})")]
    CompensationFailed {
        cause: Box<AccountingError>,
        compensation: Box<AccountingError>,
    },
}

impl AccountingError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AccountingError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        AccountingError::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn conflict(code: ErrorCode, message: impl Into<String>) -> Self {
        AccountingError::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn compensation_failed(cause: AccountingError, compensation: AccountingError) -> Self {
        AccountingError::CompensationFailed {
            cause: Box::new(cause),
            compensation: Box::new(compensation),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AccountingError::Validation { .. } => ErrorCode::ValidationFailed,
            AccountingError::NotFound { code, .. } => *code,
            AccountingError::Conflict { code, .. } => *code,
            AccountingError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            AccountingError::Storage(err) => err.code,
            AccountingError::CompensationFailed { .. } => ErrorCode::InternalError,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AccountingError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AccountingError::Conflict { .. })
    }
}

impl From<DomainError> for AccountingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed | ErrorCode::InvalidFormat => AccountingError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition => AccountingError::InvalidState(err.message),
            code if code.is_not_found() => AccountingError::NotFound {
                code,
                message: err.message,
            },
            code if code.is_conflict() => AccountingError::Conflict {
                code,
                message: err.message,
            },
            _ => AccountingError::Storage(err),
        }
    }
}

impl From<ValidationError> for AccountingError {
    fn from(err: ValidationError) -> Self {
        AccountingError::validation(err.field(), err.to_string())
    }
}
