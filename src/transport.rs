//! HTTP transport used by the channel
//!
//! The channel only needs "POST this body, tell me the status". Keeping that
//! behind [`HttpTransport`] lets tests record requests and lets callers share
//! one client between channels.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;

use crate::config::IonicPushConfig;
use crate::errors::{AppError, AppResult, TransportError};

const USER_AGENT: &str = concat!("ionic-push/", env!("CARGO_PKG_VERSION"));

/// An outgoing POST request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What came back from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the actual network I/O.
///
/// Implementations return every response they receive, whatever its status;
/// an `Err` means no response was received at all.
pub trait HttpTransport: Send + Sync {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).post(request)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).post(request)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).post(request)
    }
}

/// Blocking `reqwest` transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client honouring the configured timeout
    pub fn new(config: &IonicPushConfig) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(30));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::config_with_source("Failed to create HTTP client", e))?;

        Ok(Self { client })
    }

    fn build_headers(request: &HttpRequest) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::with_source(format!("Invalid header name '{name}'"), e))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::with_source(format!("Invalid value for header '{name}'"), e))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

impl HttpTransport for ReqwestTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let headers = Self::build_headers(request)?;

        let response = self
            .client
            .post(&request.url)
            .headers(headers)
            .body(request.body.clone())
            .send()?;

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
