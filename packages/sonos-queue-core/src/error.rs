//! Centralized error types for the sonos-queue core library.
//!
//! Each module defines its own `thiserror` enum; this module gathers them
//! behind [`QueueError`], which is what the command line reports, with a
//! stable machine-readable code per variant.

use serde::Serialize;
use thiserror::Error;

use crate::collection::CollectError;
use crate::sonos::discovery::DiscoveryError;
use crate::sonos::soap::SoapError;

/// Crate-wide error type for queue and playlist operations.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum QueueError {
    /// Speaker discovery failed (SSDP/network issues).
    #[error("Discovery failed: {0}")]
    Discovery(String),

    /// SOAP request to a Sonos speaker failed.
    #[error("SOAP request failed: {0}")]
    Soap(String),

    /// A collection could not be materialized completely.
    #[error("Collection failed: {0}")]
    Collection(String),

    /// No device matched the requested filter.
    #[error("No coordinator found: {0}")]
    NoCoordinator(String),

    /// No saved playlist has the requested title.
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    /// Configuration error (invalid file or override).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl QueueError {
    /// Returns a machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Discovery(_) => "discovery_failed",
            Self::Soap(_) => "soap_error",
            Self::Collection(_) => "collection_failed",
            Self::NoCoordinator(_) => "no_coordinator",
            Self::PlaylistNotFound(_) => "playlist_not_found",
            Self::Configuration(_) => "configuration_error",
        }
    }
}

impl From<DiscoveryError> for QueueError {
    fn from(err: DiscoveryError) -> Self {
        Self::Discovery(err.to_string())
    }
}

impl From<SoapError> for QueueError {
    fn from(err: SoapError) -> Self {
        Self::Soap(err.to_string())
    }
}

impl From<CollectError> for QueueError {
    fn from(err: CollectError) -> Self {
        match err {
            CollectError::Source(soap) => soap.into(),
            other => Self::Collection(other.to_string()),
        }
    }
}

/// Convenient Result alias for crate-level operations.
pub type QueueResult<T> = Result<T, QueueError>;

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

// Re-export Result type aliases from their defining modules
pub use crate::collection::CollectResult;
pub use crate::sonos::discovery::DiscoveryResult;
pub use crate::sonos::soap::SoapResult;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_source_errors_become_soap_errors() {
        let err: QueueError = CollectError::Source(SoapError::Fault("boom".into())).into();
        assert!(matches!(err, QueueError::Soap(_)));
        assert_eq!(err.code(), "soap_error");
    }

    #[test]
    fn collect_errors_become_collection_failures() {
        let stalled = CollectError::Stalled {
            requests: 4,
            received: 4,
            total: 10,
        };

        let err: QueueError = stalled.into();
        assert_eq!(err.code(), "collection_failed");
        assert!(err.to_string().contains("4 of 10"));
    }

    #[test]
    fn discovery_errors_become_discovery_failures() {
        let err: QueueError = DiscoveryError::InvalidAddress("living-room".into()).into();
        assert_eq!(err.code(), "discovery_failed");
        assert!(err.to_string().contains("living-room"));
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = QueueError::PlaylistNotFound("Dinner".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "PlaylistNotFound");
        assert_eq!(json["details"], "Dinner");
    }
}
