//! HTTP transport for the analysis server
//!
//! `HttpTransport` resolves an `Endpoint` against `ApiSettings`, issues a
//! single request and hands back the decoded JSON document. Every failure
//! mode comes back as a `ClientError`; nothing is retried.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::config::ApiSettings;
use crate::core::{ClientBuilder, Endpoint, Transport};
use crate::error::mapping::{classify_http_error, map_http_error};
use crate::error::{ClientError, Result};
use crate::util::{generate_request_id, measure_time_async};

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client
    http_client: Client,

    /// Base URL, endpoint paths and timeout
    settings: ApiSettings,
}

impl HttpTransport {
    /// Create a transport from validated settings
    pub fn new(settings: ApiSettings) -> Result<Self> {
        let builder = ClientBuilder::for_settings(&settings);
        Self::with_builder(settings, builder)
    }

    /// Create a transport with a customised client builder.
    ///
    /// The settings' timeout always wins over the builder's.
    pub fn with_builder(settings: ApiSettings, builder: ClientBuilder) -> Result<Self> {
        settings.validate()?;

        let http_client = builder.timeout(settings.timeout).build_http_client()?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    /// Settings this transport was built with
    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, endpoint: Endpoint, method: Method, body: Option<Value>) -> Result<Value> {
        let url = self.settings.resolve(endpoint)?;
        let request_id = generate_request_id();

        debug!(
            "Sending request to analysis server: {} {} (endpoint {}, request {})",
            method, url, endpoint, request_id
        );

        let mut builder = self
            .http_client
            .request(method.clone(), &url)
            .header(REQUEST_ID_HEADER, request_id.as_str());

        if let Some(body) = body {
            let request_json = serde_json::to_string(&body)
                .map_err(|e| ClientError::validation(format!("Failed to serialize request: {}", e)))?;

            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(request_json);
        }

        let (sent, elapsed) = measure_time_async(|| builder.send()).await;

        let response = sent.map_err(|e| {
            let error = ClientError::from(e);
            warn!("{} {} failed after {:?}: {}", method, url, elapsed, error);
            error
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            let error = ClientError::from(e);
            warn!("Failed to read response body from {}: {}", url, error);
            error
        })?;

        if status.is_success() {
            debug!(
                "{} {} -> {} in {:?} ({} bytes, request {})",
                method,
                url,
                status.as_u16(),
                elapsed,
                text.len(),
                request_id
            );
            parse_success_body(&text)
        } else {
            let error = parse_error_response(status, &text);
            warn!(
                "{} {} -> {} ({}): {}",
                method,
                url,
                status.as_u16(),
                classify_http_error(status),
                error.cause()
            );
            Err(error)
        }
    }

    fn base_url(&self) -> &str {
        &self.settings.base_url
    }
}

/// Decode a 2xx response body into a JSON document
pub fn parse_success_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Err(ClientError::decode("Response body is empty"));
    }

    serde_json::from_str(text)
        .map_err(|e| ClientError::decode(format!("Response body is not valid JSON: {}", e)))
}

/// Map a non-2xx response to a remote error
pub fn parse_error_response(status: StatusCode, body: &str) -> ClientError {
    map_http_error(status, body)
}
