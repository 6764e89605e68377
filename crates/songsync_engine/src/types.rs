use std::fmt;

use songsync_core::{CollectionId, RemoteId};
use thiserror::Error;

/// Used when a remote error carries no usable message at all.
pub const GENERIC_FAILURE_REASON: &str = "Failed to add song.";

/// Best search hit for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: RemoteId,
    pub title: String,
    pub channel_title: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// A remote playlist owned by the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    pub item_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct CatalogError {
    pub kind: FailureKind,
    pub message: String,
}

impl CatalogError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Human-readable reason recorded on a failed item: the service's own
    /// message first, then the transport message, then a generic fallback.
    ///
    /// `Service` errors carry the payload's message and every other kind
    /// carries the client's message, so only emptiness needs checking here.
    pub fn failure_reason(&self) -> String {
        let message = self.message.trim();
        if message.is_empty() {
            GENERIC_FAILURE_REASON.to_string()
        } else {
            message.to_string()
        }
    }

    pub fn is_service_error(&self) -> bool {
        matches!(self.kind, FailureKind::Service { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    NotAuthenticated,
    /// The service answered with a structured error payload.
    Service { status: u16 },
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    InvalidRequest,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NotAuthenticated => write!(f, "not authenticated"),
            FailureKind::Service { status } => write!(f, "service error {status}"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_reason_prefers_service_message() {
        let err = CatalogError::new(FailureKind::Service { status: 403 }, "quota exceeded");
        assert_eq!(err.failure_reason(), "quota exceeded");
    }

    #[test]
    fn failure_reason_uses_transport_message() {
        let err = CatalogError::new(FailureKind::Network, "connection reset");
        assert_eq!(err.failure_reason(), "connection reset");
    }

    #[test]
    fn failure_reason_falls_back_to_generic() {
        let err = CatalogError::new(FailureKind::HttpStatus(500), "  ");
        assert_eq!(err.failure_reason(), GENERIC_FAILURE_REASON);
    }
}
