use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit storage failure: {0}")]
    StorageFailure(String),

    #[error("audit serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
