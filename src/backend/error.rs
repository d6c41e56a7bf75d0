use thiserror::Error;

/// Classification of backend failures, used for status mapping and log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendErrorKind {
    /// Backend unreachable or refusing connections.
    Unavailable,
    Timeout,
    /// Backend rejected the query as too large or malformed.
    QueryRejected,
    /// Session used out of order (search before filter, filter twice).
    InvalidSession,
    Serialization,
    Internal,
}

impl BackendErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendErrorKind::Unavailable => "unavailable",
            BackendErrorKind::Timeout => "timeout",
            BackendErrorKind::QueryRejected => "query_rejected",
            BackendErrorKind::InvalidSession => "invalid_session",
            BackendErrorKind::Serialization => "serialization",
            BackendErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("search backend error ({kind}): {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Unavailable, message)
    }

    pub fn invalid_session(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::InvalidSession, message)
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(BackendErrorKind::Serialization, e.to_string())
    }
}

/// Convenience result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
