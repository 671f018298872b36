//! Error type for gateway HTTP calls.

use http::StatusCode;

/// Failure of a gateway API call.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request never produced a usable response (connect, timeout,
    /// or body-decode failure).
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    ///
    /// The body is kept verbatim; `POST /transactions` rejections carry
    /// per-field details there.
    #[error("gateway returned {status}: {body}")]
    Status {
        /// HTTP status of the response.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },

    /// Token acquisition failed.
    #[error("gateway authorization failed: {0}")]
    Auth(String),
}

impl HttpError {
    /// Whether this is a gateway rejection with the given status.
    #[must_use]
    pub fn is_status(&self, status: StatusCode) -> bool {
        matches!(self, Self::Status { status: s, .. } if *s == status)
    }
}
