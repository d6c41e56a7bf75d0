use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{error, warn};

use crate::backend::{BackendErrorKind, ErrorTable};

use super::error::SearchError;

/// Status returned for [`SearchError::InvalidSearch`].
pub const INVALID_SEARCH_STATUS: u16 = 400;

/// Status for backend error kinds the table does not map.
pub const DEFAULT_BACKEND_STATUS: u16 = 500;

/// Error body handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// Maps search errors to status codes, user-facing messages and log severity.
///
/// Assembled once at startup, usually from the backend's [`ErrorTable`], and owned by the
/// orchestrator.
#[derive(Debug, Clone)]
pub struct ErrorPolicy {
    statuses: HashMap<BackendErrorKind, u16>,
    messages: HashMap<BackendErrorKind, String>,
    error_log_kinds: HashSet<BackendErrorKind>,
    default_status: u16,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self {
            statuses: HashMap::new(),
            messages: HashMap::new(),
            error_log_kinds: HashSet::new(),
            default_status: DEFAULT_BACKEND_STATUS,
        }
    }
}

impl ErrorPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a backend's contributed table; later entries win.
    pub fn with_backend(mut self, table: ErrorTable) -> Self {
        self.statuses.extend(table.statuses);
        self.messages.extend(table.messages);
        self.error_log_kinds.extend(table.error_log_kinds);
        self
    }

    pub fn status(mut self, kind: BackendErrorKind, status: u16) -> Self {
        self.statuses.insert(kind, status);
        self
    }

    pub fn message(mut self, kind: BackendErrorKind, message: impl Into<String>) -> Self {
        self.messages.insert(kind, message.into());
        self
    }

    pub fn log_as_error(mut self, kind: BackendErrorKind) -> Self {
        self.error_log_kinds.insert(kind);
        self
    }

    pub fn status_for(&self, err: &SearchError) -> u16 {
        match err {
            SearchError::InvalidSearch(_) => INVALID_SEARCH_STATUS,
            SearchError::Backend(e) => self
                .statuses
                .get(&e.kind)
                .copied()
                .unwrap_or(self.default_status),
        }
    }

    pub fn message_for(&self, err: &SearchError) -> String {
        match err {
            SearchError::InvalidSearch(message) => message.clone(),
            SearchError::Backend(e) => self
                .messages
                .get(&e.kind)
                .cloned()
                .unwrap_or_else(|| e.to_string()),
        }
    }

    /// Logs a backend error at the severity its kind is configured for.
    pub fn log(&self, err: &SearchError) {
        let SearchError::Backend(e) = err else {
            return;
        };
        if self.error_log_kinds.contains(&e.kind) {
            error!(kind = %e.kind, error = %e, "Search backend failure");
        } else {
            warn!(kind = %e.kind, error = %e, "Search backend failure");
        }
    }

    pub fn response(&self, err: &SearchError) -> ErrorResponse {
        ErrorResponse {
            error: self.message_for(err),
            code: self.status_for(err),
        }
    }
}
