//! The base API client: one transport, uniform retries, timing and logging.
//!
//! [`ApiClient`] owns a single `reqwest::Client` bound to the configured
//! base URL and timeout, and funnels every verb through the retry policy.
//! Each call is timed and logged; responses slower than the configured
//! threshold produce a warning, never a failure. Construction does not probe
//! the host, so an unreachable server only surfaces on first use.
//!
//! The client is cheap to clone and safe to share: concurrent calls reuse
//! the same connection pool and hold no mutable state in common. Dropping
//! the last clone releases the transport.

use http::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::retry::{RetryPolicy, RetryPredicate};
use crate::settings::ApiSettings;
use crate::{ApiResponse, Error, Result};

/// An HTTP client for one API under test.
///
/// # Examples
///
/// ```no_run
/// use bookstore_conformance::{ApiClient, ApiSettings};
///
/// # async fn example() -> Result<(), bookstore_conformance::Error> {
/// let client = ApiClient::new(ApiSettings::default())?;
/// let response = client.get("/api/v1/Books/1").await?;
/// println!("status: {}, took {:?}", response.status, response.elapsed);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
    max_response_time: Duration,
}

impl ApiClient {
    /// Creates a client from settings with the default retry classification.
    pub fn new(settings: ApiSettings) -> Result<Self> {
        Self::builder().settings(settings).build()
    }

    /// Creates a [`ClientBuilder`] for non-default construction.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Executes one logical call: build request, run it under the retry
    /// policy, stamp timing and attempt count, log the outcome.
    ///
    /// This is the single funnel every verb goes through; `body` is
    /// serialized as JSON when present.
    pub async fn execute<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse> {
        let start = Instant::now();
        tracing::debug!(method = %method, path, "request");

        let op_method = method.clone();
        let result = self
            .inner
            .retry
            .execute(move || self.attempt(op_method.clone(), path, body))
            .await;

        let elapsed = start.elapsed();
        match result {
            Ok((mut response, attempts)) => {
                response.elapsed = elapsed;
                response.attempts = attempts;
                self.log_response(&method, path, &response);
                self.check_response_time(&response);
                Ok(response)
            }
            Err(error) => {
                tracing::error!(
                    method = %method,
                    path,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %error,
                    "request failed without a response"
                );
                Err(error)
            }
        }
    }

    /// One transport attempt. Timeouts are folded into the error taxonomy
    /// here so the retry predicate sees them as transport failures.
    async fn attempt<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse> {
        let mut url = self.inner.base_url.clone();
        url.set_path(path);

        let mut request = self.inner.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(classify_transport)?;

        Ok(ApiResponse {
            status,
            headers,
            body,
            data: None,
            elapsed: Duration::ZERO,
            attempts: 1,
        })
    }

    fn log_response(&self, method: &Method, path: &str, response: &ApiResponse) {
        let elapsed_ms = response.elapsed.as_millis() as u64;
        if response.is_success() {
            tracing::debug!(
                method = %method,
                path,
                status = response.status.as_u16(),
                elapsed_ms,
                attempts = response.attempts,
                "response"
            );
        } else {
            tracing::warn!(
                method = %method,
                path,
                status = response.status.as_u16(),
                elapsed_ms,
                attempts = response.attempts,
                error = %response.body,
                "unsuccessful response"
            );
        }
    }

    /// Warns when a call exceeded the configured response-time threshold.
    /// Observability only; the response is returned either way.
    pub fn check_response_time<T>(&self, response: &ApiResponse<T>) {
        if response.elapsed > self.inner.max_response_time {
            tracing::warn!(
                elapsed_ms = response.elapsed.as_millis() as u64,
                threshold_ms = self.inner.max_response_time.as_millis() as u64,
                "response time exceeded threshold"
            );
        }
    }

    /// Makes a GET request, returning the raw envelope.
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.execute::<()>(Method::GET, path, None).await
    }

    /// Makes a GET request and deserializes a successful body into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.get(path).await?.into_typed()
    }

    /// Makes a POST request with a JSON body, deserializing success into `T`.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>> {
        self.execute(Method::POST, path, Some(body))
            .await?
            .into_typed()
    }

    /// Makes a PUT request with a JSON body, deserializing success into `T`.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>> {
        self.execute(Method::PUT, path, Some(body))
            .await?
            .into_typed()
    }

    /// Makes a DELETE request, returning the raw envelope.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.execute::<()>(Method::DELETE, path, None).await
    }
}

fn classify_transport(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout
    } else {
        Error::Transport(error)
    }
}

/// Builder for configuring and creating an [`ApiClient`].
///
/// # Examples
///
/// ```no_run
/// use bookstore_conformance::{ApiClient, ApiSettings};
/// use bookstore_conformance::retry::RetryOnTransient;
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), bookstore_conformance::Error> {
/// let client = ApiClient::builder()
///     .settings(ApiSettings::default())
///     .retry_predicate(Arc::new(RetryOnTransient))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    settings: ApiSettings,
    retry_predicate: Option<Arc<dyn RetryPredicate>>,
}

impl ClientBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            settings: ApiSettings::default(),
            retry_predicate: None,
        }
    }

    /// Sets the settings the client is built from.
    pub fn settings(mut self, settings: ApiSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Swaps the transient/terminal classification used by the retry policy.
    pub fn retry_predicate(mut self, predicate: Arc<dyn RetryPredicate>) -> Self {
        self.retry_predicate = Some(predicate);
        self
    }

    /// Builds the configured [`ApiClient`].
    ///
    /// Validates the base URL's syntax and constructs the transport; the
    /// host itself is not contacted until the first call.
    pub fn build(self) -> Result<ApiClient> {
        let base_url = Url::parse(&self.settings.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(self.settings.timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        let mut retry = RetryPolicy::from_settings(&self.settings);
        if let Some(predicate) = self.retry_predicate {
            retry = retry.with_predicate(predicate);
        }

        tracing::info!(
            base_url = %base_url,
            timeout_secs = self.settings.timeout_seconds,
            "API client initialized"
        );

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                retry,
                max_response_time: self.settings.max_response_time(),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_rejects_an_unparseable_base_url() {
        let result = ApiClient::new(ApiSettings {
            base_url: "not a url".to_string(),
            ..ApiSettings::default()
        });

        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn build_does_not_contact_the_host() {
        // A syntactically valid URL with no server behind it still builds;
        // connection failures belong to the first call.
        let client = ApiClient::new(ApiSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            ..ApiSettings::default()
        });

        assert!(client.is_ok());
    }
}
