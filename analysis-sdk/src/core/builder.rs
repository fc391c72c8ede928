//! HTTP client construction for `HttpTransport`

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client as ReqwestClient;

use crate::config::{ApiSettings, DEFAULT_TIMEOUT};
use crate::error::{ClientError, Result};

/// User agent sent unless overridden
pub const DEFAULT_USER_AGENT: &str = concat!("code-analyzer/", env!("CARGO_PKG_VERSION"));

/// Upper bound on TCP/TLS connection setup, independent of the request timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for the reqwest client behind the transport
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    /// Extra headers sent with every request, in insertion order
    extra_headers: Vec<(String, String)>,

    /// Whole-request timeout
    timeout: Duration,

    user_agent: String,

    /// Accept gzip-encoded responses
    gzip: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            extra_headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            gzip: true,
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preloaded with the timeout from `settings`
    pub fn for_settings(settings: &ApiSettings) -> Self {
        Self::new().timeout(settings.timeout)
    }

    /// Add a header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn compression(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }

    /// Timeout the built client will apply
    pub fn configured_timeout(&self) -> Duration {
        self.timeout
    }

    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &self.extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientError::configuration(format!("Invalid header name {}: {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ClientError::configuration(format!("Invalid value for header {}: {}", name, e))
            })?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    /// Build the reqwest client
    pub fn build_http_client(&self) -> Result<ReqwestClient> {
        ReqwestClient::builder()
            .timeout(self.timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(self.timeout))
            .user_agent(self.user_agent.as_str())
            .gzip(self.gzip)
            .default_headers(self.default_headers()?)
            .build()
            .map_err(|e| ClientError::configuration(format!("Failed to build HTTP client: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_header_name_is_configuration_error() {
        let err = ClientBuilder::new()
            .header("bad header", "x")
            .build_http_client()
            .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_for_settings_takes_timeout() {
        let settings = ApiSettings::default().with_timeout(Duration::from_secs(12));
        assert_eq!(
            ClientBuilder::for_settings(&settings).configured_timeout(),
            Duration::from_secs(12)
        );
    }
}
