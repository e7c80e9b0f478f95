//! Error types for extraction backends.

use thiserror::Error;

/// Errors a remote extraction backend can fail with.
///
/// The selector treats every variant identically: "this backend failed for
/// this call". The distinction exists for logs and diagnostics only.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status or an error body.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered 200 but the body was not the JSON we asked for.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The backend has no credentials configured and should never have
    /// been selected.
    #[error("backend '{0}' has no credentials configured")]
    MissingCredentials(String),
}
