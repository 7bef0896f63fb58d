//! HTTP client with tracing and a bounded timeout.
//!
//! This module provides a wrapped HTTP client that adds:
//! - Request/response tracing
//! - An optional domain allowlist
//! - Bearer-auth and JSON convenience methods

use reqwest::{header, Client, Response};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for Quotabar.
const USER_AGENT: &str = concat!("Quotabar/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing and an optional domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built. This only occurs when
    /// the system's TLS configuration is fundamentally broken, which makes
    /// network operations impossible and is unrecoverable at runtime.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to create HTTP client: {e}. \
                    This usually indicates a broken TLS/SSL configuration."
                )
            });

        Self {
            inner: client,
            timeout,
            allowed_domains: None,
        }
    }

    /// Restricts requests to the given domains (and their subdomains).
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Returns the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), HttpError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(());
        };

        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Maps a reqwest failure, restoring the timeout bound.
    fn map_send_error(&self, err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(self.timeout)
        } else {
            HttpError::Request(err)
        }
    }

    /// Performs a GET request.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<Response, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("GET request");

        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a GET request with a bearer token.
    #[instrument(skip(self, token), fields(url = %url))]
    pub async fn get_bearer(&self, url: &str, token: &str) -> Result<Response, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("GET request with bearer auth");

        let response = self
            .inner
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a bearer-authenticated GET and returns the body on 2xx.
    ///
    /// Non-success statuses become [`HttpError::Status`] so callers can
    /// classify them without inspecting a `Response`.
    pub async fn get_bearer_text(&self, url: &str, token: &str) -> Result<String, HttpError> {
        let response = self.get_bearer(url, token).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status(status.as_u16()));
        }
        response.text().await.map_err(|e| self.map_send_error(e))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
