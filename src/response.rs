//! The response envelope returned by every API call.
//!
//! [`ApiResponse`] preserves the raw transaction details (status, headers,
//! body, elapsed time, attempt count) alongside the optionally deserialized
//! payload. Non-2xx statuses are carried in the envelope rather than raised,
//! so conformance tests can assert on whatever the server returned.

use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::retry::HasStatus;
use crate::{Error, Result};

/// A completed HTTP transaction, typed or raw.
///
/// `data` is populated only when the call was typed *and* the status was
/// 2xx; for unsuccessful responses the raw `body` is all there is. `elapsed`
/// covers the whole logical call, including backoff sleeps and every retry
/// attempt.
#[derive(Debug, Clone)]
pub struct ApiResponse<T = ()> {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The raw response body.
    pub body: String,
    /// The deserialized payload, for successful typed calls.
    pub data: Option<T>,
    /// Wall-clock time for the whole call, retries included.
    pub elapsed: Duration,
    /// How many attempts the call took; `1` means no retries.
    pub attempts: u32,
}

impl<T> ApiResponse<T> {
    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// `true` if the call needed more than one attempt.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a response header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Converts the envelope into its payload, requiring a successful status.
    ///
    /// Non-2xx statuses become [`Error::UnexpectedStatus`]. This backs the
    /// `*_and_return` resource operations: an error body is never worth
    /// deserializing, so success is checked first.
    pub fn require_success(self) -> Result<T> {
        if !self.is_success() {
            return Err(Error::UnexpectedStatus {
                status: self.status,
                body: self.body,
            });
        }
        self.data.ok_or(Error::Deserialize {
            message: "response body was not deserialized".to_string(),
            body: self.body,
            status: self.status,
        })
    }
}

impl ApiResponse<()> {
    /// Deserializes the body into `T` when the status is successful.
    ///
    /// Unsuccessful responses pass through with `data: None` so the caller
    /// can inspect the status; a malformed body on a successful response is
    /// the terminal [`Error::Deserialize`].
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<ApiResponse<T>> {
        let data = if self.status.is_success() {
            match serde_json::from_str(&self.body) {
                Ok(data) => Some(data),
                Err(e) => {
                    return Err(Error::Deserialize {
                        message: e.to_string(),
                        body: self.body,
                        status: self.status,
                    })
                }
            }
        } else {
            None
        };

        Ok(ApiResponse {
            status: self.status,
            headers: self.headers,
            body: self.body,
            data,
            elapsed: self.elapsed,
            attempts: self.attempts,
        })
    }
}

impl<T> HasStatus for ApiResponse<T> {
    fn status_code(&self) -> StatusCode {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        id: i32,
    }

    fn raw(status: StatusCode, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            headers: HeaderMap::new(),
            body: body.to_string(),
            data: None,
            elapsed: Duration::from_millis(5),
            attempts: 1,
        }
    }

    #[test]
    fn into_typed_deserializes_successful_bodies() {
        let typed = raw(StatusCode::OK, r#"{"id":7}"#)
            .into_typed::<Payload>()
            .unwrap();

        assert_eq!(typed.data, Some(Payload { id: 7 }));
        assert!(typed.is_success());
    }

    #[test]
    fn into_typed_passes_unsuccessful_responses_through_untyped() {
        let typed = raw(StatusCode::NOT_FOUND, "not here")
            .into_typed::<Payload>()
            .unwrap();

        assert_eq!(typed.status, StatusCode::NOT_FOUND);
        assert_eq!(typed.data, None);
        assert_eq!(typed.body, "not here");
    }

    #[test]
    fn into_typed_reports_malformed_successful_bodies() {
        let result = raw(StatusCode::OK, "<html>").into_typed::<Payload>();

        match result {
            Err(Error::Deserialize { status, body, .. }) => {
                assert_eq!(status, StatusCode::OK);
                assert_eq!(body, "<html>");
            }
            other => panic!("expected Deserialize error, got {:?}", other),
        }
    }

    #[test]
    fn require_success_rejects_non_2xx() {
        let typed = raw(StatusCode::BAD_REQUEST, "bad id")
            .into_typed::<Payload>()
            .unwrap();

        match typed.require_success() {
            Err(Error::UnexpectedStatus { status, body }) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body, "bad id");
            }
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[test]
    fn require_success_unwraps_the_payload() {
        let typed = raw(StatusCode::OK, r#"{"id":3}"#)
            .into_typed::<Payload>()
            .unwrap();

        assert_eq!(typed.require_success().unwrap(), Payload { id: 3 });
    }
}
