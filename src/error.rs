//! Error types for the bookstore API client.
//!
//! Transport-level failures and 5xx statuses are transient and eligible for
//! retry; everything else is terminal. Note that a non-2xx status by itself
//! is *not* an error: the client hands the response envelope back so callers
//! can assert on the status code. Errors are reserved for failures where no
//! usable envelope exists (transport, configuration) or where the caller
//! demanded a typed result the body could not provide.

use http::StatusCode;

/// The main error type for API calls made through this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level failure: connection refused, DNS lookup failure,
    /// broken transfer. Wraps the underlying `reqwest::Error`.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be deserialized into the requested type.
    ///
    /// The raw body and status are preserved so the offending payload can be
    /// inspected. This error is terminal and never retried.
    #[error("failed to deserialize response (status {status}): {message}")]
    Deserialize {
        /// The raw response body that failed to deserialize.
        body: String,
        /// The serde error message.
        message: String,
        /// The HTTP status code of the response.
        status: StatusCode,
    },

    /// A call that requires success saw a non-2xx status.
    ///
    /// Raised only by the `*_and_return` resource operations and
    /// [`ApiResponse::require_success`](crate::ApiResponse::require_success);
    /// plain verb calls return the envelope instead.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The raw response body.
        body: String,
    },

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The configured base URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if this error is transient and worth retrying.
    ///
    /// Only transport-level failures qualify. Deserialization, configuration
    /// and status errors cannot be fixed by retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout)
    }

    /// Returns the HTTP status code attached to this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Deserialize { status, .. } => Some(*status),
            Error::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized `Result` type for API calls.
pub type Result<T> = std::result::Result<T, Error>;
