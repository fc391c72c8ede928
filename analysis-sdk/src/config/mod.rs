//! Configuration management for the analysis client
//!
//! This module provides utilities for loading and validating the client's
//! `ApiSettings`, with support for environment variables and
//! `appsettings.json`-style documents.

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use serde_json::Value;
use url::Url;

use crate::core::Endpoint;
use crate::error::{ClientError, Result};
use crate::util::parse_duration;

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Prefix for environment overrides, e.g. `CODE_ANALYZER_APISETTINGS_BASEURL`
pub const ENV_PREFIX: &str = "CODE_ANALYZER";

/// Separator between nested configuration sections
pub const KEY_SEPARATOR: char = ':';

const BASE_URL_KEY: &str = "ApiSettings:BaseUrl";
const TIMEOUT_KEY: &str = "ApiSettings:Timeout";
const ENDPOINTS_SECTION: &str = "ApiSettings:Endpoints";

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Typed accessors layered over `get_string`
pub trait ConfigProviderExt: ConfigProvider {
    /// Get a duration such as `300`, `300s`, `5m` or `250ms`; bare numbers are seconds
    fn get_duration(&self, key: &str) -> Result<Duration> {
        let raw = self.get_string(key)?;
        parse_duration(&raw).ok_or_else(|| {
            ClientError::configuration(format!("Invalid timeout for key {}: {}", key, raw))
        })
    }

    /// Get a duration, falling back to `default` only when the key is absent
    fn get_duration_or(&self, key: &str, default: Duration) -> Result<Duration> {
        match self.get_string(key) {
            Ok(_) => self.get_duration(key),
            Err(_) => Ok(default),
        }
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,
}

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Format a configuration key as an environment variable
    fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        env_key.push_str(&key.to_uppercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_"));

        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => {
                ClientError::configuration(format!("Environment variable not set: {}", env_key))
            }
            env::VarError::NotUnicode(_) => ClientError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    /// Configuration values
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ClientError::configuration(format!("Configuration key not found: {}", key)))
    }
}

/// Provider backed by a JSON settings document.
///
/// Nested objects are flattened into `Section:Sub:Key` entries, so
/// `{"ApiSettings": {"BaseUrl": "..."}}` is read as `ApiSettings:BaseUrl`.
#[derive(Debug, Clone, Default)]
pub struct JsonFileConfigProvider {
    values: HashMap<String, String>,
}

impl JsonFileConfigProvider {
    /// Load and flatten a settings file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ClientError::configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        debug!("Loaded settings from {}", path.display());
        Self::from_json_str(&text)
    }

    /// Flatten a settings document held in memory
    pub fn from_json_str(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)
            .map_err(|e| ClientError::configuration(format!("Invalid settings JSON: {}", e)))?;

        if !root.is_object() {
            return Err(ClientError::configuration("Settings document must be a JSON object"));
        }

        let mut values = HashMap::new();
        flatten_into(&mut values, None, &root);
        Ok(Self { values })
    }

    /// Number of flattened entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the document held no scalar values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn flatten_into(out: &mut HashMap<String, String>, prefix: Option<&str>, value: &Value) {
    let join = |key: &str| match prefix {
        Some(p) => format!("{}{}{}", p, KEY_SEPARATOR, key),
        None => key.to_string(),
    };

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(out, Some(&join(key)), child);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(out, Some(&join(&index.to_string())), child);
            }
        }
        Value::Null => {}
        Value::String(s) => {
            if let Some(p) = prefix {
                out.insert(p.to_string(), s.clone());
            }
        }
        other => {
            if let Some(p) = prefix {
                out.insert(p.to_string(), other.to_string());
            }
        }
    }
}

impl ConfigProvider for JsonFileConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ClientError::configuration(format!("Configuration key not found: {}", key)))
    }
}

/// A composite config provider that tries multiple providers in order
#[derive(Default)]
pub struct CompositeConfigProvider {
    /// Ordered list of config providers to try
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl CompositeConfigProvider {
    /// Create a new composite config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider to the end of the chain
    pub fn add_provider(&mut self, provider: impl ConfigProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    /// Builder-style variant of `add_provider`
    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.add_provider(provider);
        self
    }
}

impl ConfigProvider for CompositeConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        for provider in &self.providers {
            if let Ok(value) = provider.get_string(key) {
                return Ok(value);
            }
        }

        Err(ClientError::configuration(format!(
            "Configuration key not found in any provider: {}",
            key
        )))
    }
}

/// Global default configuration provider
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> =
    Lazy::new(|| Arc::new(EnvConfigProvider::new().with_prefix(ENV_PREFIX)));

/// Configured path for every endpoint the settings named
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointPaths {
    paths: HashMap<Endpoint, String>,
}

impl EndpointPaths {
    /// Create an empty path table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path for an endpoint
    pub fn set(&mut self, endpoint: Endpoint, path: impl Into<String>) {
        self.paths.insert(endpoint, path.into());
    }

    /// Builder-style variant of `set`
    pub fn with(mut self, endpoint: Endpoint, path: impl Into<String>) -> Self {
        self.set(endpoint, path);
        self
    }

    /// Path configured for `endpoint`
    pub fn get(&self, endpoint: Endpoint) -> Option<&str> {
        self.paths.get(&endpoint).map(String::as_str)
    }

    /// Endpoints that have no configured path
    pub fn missing(&self) -> Vec<Endpoint> {
        Endpoint::ALL
            .iter()
            .copied()
            .filter(|e| !self.paths.contains_key(e))
            .collect()
    }
}

/// Connection settings for the remote analysis server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Base URL, e.g. `http://localhost:5000`
    pub base_url: String,

    /// Timeout applied to every request
    pub timeout: Duration,

    /// Per-operation paths appended to the base URL
    pub endpoints: EndpointPaths,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            endpoints: EndpointPaths::default(),
        }
    }
}

impl ApiSettings {
    /// Settings with the given base URL and no endpoint paths
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the path for one endpoint
    pub fn with_endpoint(mut self, endpoint: Endpoint, path: impl Into<String>) -> Self {
        self.endpoints.set(endpoint, path);
        self
    }

    /// Load settings from a config provider
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let base_url = provider.get_string_or(BASE_URL_KEY, DEFAULT_BASE_URL);

        let timeout = provider.get_duration_or(TIMEOUT_KEY, DEFAULT_TIMEOUT)?;

        let mut endpoints = EndpointPaths::new();
        for endpoint in Endpoint::ALL {
            let key = format!("{}{}{}", ENDPOINTS_SECTION, KEY_SEPARATOR, endpoint.config_name());
            if let Ok(path) = provider.get_string(&key) {
                endpoints.set(endpoint, path);
            }
        }

        let settings = Self {
            base_url,
            timeout,
            endpoints,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_provider(&**DEFAULT_PROVIDER)
    }

    /// Validate this configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::configuration("Base URL is required"));
        }

        Url::parse(&self.base_url)
            .map_err(|e| ClientError::configuration(format!("Invalid base URL {}: {}", self.base_url, e)))?;

        if self.timeout.is_zero() {
            return Err(ClientError::configuration("Timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Full URL for `endpoint`, or a configuration error when its path is unset
    pub fn resolve(&self, endpoint: Endpoint) -> Result<String> {
        let path = self.endpoints.get(endpoint).ok_or_else(|| {
            ClientError::configuration(format!(
                "No path configured for endpoint {} ({}{}{})",
                endpoint, ENDPOINTS_SECTION, KEY_SEPARATOR, endpoint.config_name()
            ))
        })?;

        let base = self.base_url.trim_end_matches('/');
        let path = path.trim();

        if path.is_empty() {
            Ok(base.to_string())
        } else if path.starts_with('/') {
            Ok(format!("{}{}", base, path))
        } else {
            Ok(format!("{}/{}", base, path))
        }
    }
}
