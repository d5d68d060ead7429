//! Typed error hierarchy for the victorops crate.
//!
//! `VoError` gives every failure boundary in the library its own
//! variant so callers can distinguish the failure category without
//! string inspection:
//!
//! - `RequestConstruction` — the outbound request could not be built
//!   (malformed path/URL). Never retried, surfaced immediately.
//! - `Api` — the remote API answered with a non-200 status. Carries the
//!   exact status code and the raw response body; VictorOps error
//!   bodies contain the diagnostic detail, so they are preserved
//!   verbatim instead of being discarded.
//! - `Parse` — the response body was not valid JSON for the expected
//!   shape. Surfaced to the caller, never recovered into a partial
//!   record.
//! - `Network` — transport-level failure (DNS, TCP, TLS, timeout). No
//!   HTTP status is available because no response was received.
//!
//! The library performs no retry, backoff, or circuit breaking; every
//! error propagates to the immediate caller. The one deliberate
//! exception is override creation, which consults
//! [`VoError::is_conflicting_override`] — see that method's docs.

use reqwest::StatusCode;

/// Unified error type for all victorops library operations.
#[derive(Debug, thiserror::Error)]
pub enum VoError {
    /// The outbound request could not be constructed, typically because
    /// the base URL plus relative path did not form a valid URL.
    #[error("failed to construct request: {0}")]
    RequestConstruction(String),

    /// The API returned a non-200 HTTP status code.
    ///
    /// The `body` field holds the raw response text exactly as
    /// received. Both API surfaces return their diagnostic messages in
    /// the body, so it is read in full before the error is raised.
    #[error("got a {status} error: {body}")]
    Api {
        /// The HTTP status code returned by the API.
        status: StatusCode,
        /// The raw response body text.
        body: String,
    },

    /// JSON deserialization of a response body failed.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A network-level failure occurred before a response was received.
    /// Wraps the underlying `reqwest::Error` which carries the
    /// transport diagnostics.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl VoError {
    /// Returns `true` if this error is the portal's rejection of an
    /// override window that overlaps an already-existing override.
    ///
    /// The portal reports the overlap as an error whose body mentions
    /// "conflicting" override schedules. Override creation treats that
    /// case as success (the override is already in place), so this
    /// predicate is the explicit classification rule backing that
    /// idempotent-create behavior.
    pub fn is_conflicting_override(&self) -> bool {
        self.to_string().contains("conflicting")
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, VoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn api_error_preserves_status_and_body() {
        let err = VoError::Api {
            status: StatusCode::FORBIDDEN,
            body: r#"{"error":"org not accessible"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"), "display should include status code");
        assert!(
            msg.contains("org not accessible"),
            "display should include response body"
        );
    }

    #[test]
    fn parse_error_chains_to_serde_json() {
        let json_err = serde_json::from_str::<String>("not-json").unwrap_err();
        let err = VoError::Parse(json_err);
        assert!(
            err.to_string().contains("failed to parse response"),
            "display should indicate parse failure"
        );
        assert!(
            err.source().is_some(),
            "Parse variant should chain to serde_json::Error"
        );
    }

    #[test]
    fn conflicting_override_detected_in_api_body() {
        let err = VoError::Api {
            status: StatusCode::CONFLICT,
            body: "conflicting override schedules already exist".to_string(),
        };
        assert!(err.is_conflicting_override());
    }

    #[test]
    fn non_conflicting_errors_are_not_remapped() {
        let err = VoError::Api {
            status: StatusCode::CONFLICT,
            body: "override window in the past".to_string(),
        };
        assert!(!err.is_conflicting_override());

        let err = VoError::RequestConstruction("relative URL without a base".to_string());
        assert!(!err.is_conflicting_override());
    }

    #[test]
    fn error_is_send_and_sync() {
        // VoError must be Send + Sync so operations can run on
        // multi-threaded executors.
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VoError>();
    }
}
