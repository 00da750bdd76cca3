use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine-surface errors.
///
/// The scoring math itself never fails: malformed records are clamped and
/// logged, empty inputs yield empty outputs. Only the store boundary and
/// nonsensical requests surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The content store could not serve a read. The engine performs no
    /// retries; backoff policy belongs to the collaborator owning the
    /// store connection.
    #[error("data unavailable: {0}")]
    DataUnavailable(#[from] anyhow::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
