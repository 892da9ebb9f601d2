use thiserror::Error;

use crate::audit::error::AuditError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("storage failure: {0}")]
    StorageFailure(String),

    #[error("{0}")]
    General(String),
}

impl From<AuditError> for DomainError {
    fn from(err: AuditError) -> Self {
        Self::StorageFailure(err.to_string())
    }
}

/// How an operation failure is classified for the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Validation,
    General,
}

/// Errors that can be classified by the audit interceptor.
pub trait AuditedFailure {
    fn failure_kind(&self) -> FailureKind;
}

impl AuditedFailure for DomainError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Validation(_) => FailureKind::Validation,
            Self::MalformedQuery(_) | Self::StorageFailure(_) | Self::General(_) => {
                FailureKind::General
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_error_becomes_storage_failure() {
        let err: DomainError = AuditError::StorageFailure("disk full".to_string()).into();
        assert!(matches!(err, DomainError::StorageFailure(ref m) if m.contains("disk full")));
    }

    #[test]
    fn failure_kinds() {
        assert_eq!(
            DomainError::NotFound("customer 1".into()).failure_kind(),
            FailureKind::NotFound
        );
        assert_eq!(
            DomainError::Validation("name".into()).failure_kind(),
            FailureKind::Validation
        );
        assert_eq!(
            DomainError::StorageFailure("io".into()).failure_kind(),
            FailureKind::General
        );
        assert_eq!(
            DomainError::General("boom".into()).failure_kind(),
            FailureKind::General
        );
    }
}
