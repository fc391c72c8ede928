//! Core abstractions for the Analysis SDK
//!
//! This module provides the fundamental interfaces the rest of the SDK is
//! written against:
//!
//! - `Transport`: issues a single HTTP call against a configured endpoint
//! - `Endpoint`: the closed set of remote operations the client knows about
//! - `ClientBuilder`: builder for the underlying HTTP client

pub mod builder;
pub use builder::ClientBuilder;

use std::fmt;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::Result;

/// Remote operations exposed by the analysis server.
///
/// Each variant resolves to a path through the `ApiSettings:Endpoints:<Name>`
/// configuration key; no path is compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    Debug,
    DebugStatus,
    NlpAnalyze,
    NlpFunctions,
    NlpStatus,
    FormalVerify,
    FormalStatus,
}

impl Endpoint {
    /// Every endpoint, in configuration order
    pub const ALL: [Endpoint; 8] = [
        Endpoint::Health,
        Endpoint::Debug,
        Endpoint::DebugStatus,
        Endpoint::NlpAnalyze,
        Endpoint::NlpFunctions,
        Endpoint::NlpStatus,
        Endpoint::FormalVerify,
        Endpoint::FormalStatus,
    ];

    /// Name used under `ApiSettings:Endpoints`
    pub fn config_name(self) -> &'static str {
        match self {
            Endpoint::Health => "Health",
            Endpoint::Debug => "Debug",
            Endpoint::DebugStatus => "DebugStatus",
            Endpoint::NlpAnalyze => "NlpAnalyze",
            Endpoint::NlpFunctions => "NlpFunctions",
            Endpoint::NlpStatus => "NlpStatus",
            Endpoint::FormalVerify => "FormalVerify",
            Endpoint::FormalStatus => "FormalStatus",
        }
    }

    /// HTTP method the server expects for this operation
    pub fn method(self) -> Method {
        match self {
            Endpoint::Debug | Endpoint::NlpAnalyze | Endpoint::FormalVerify => Method::POST,
            Endpoint::Health
            | Endpoint::DebugStatus
            | Endpoint::NlpFunctions
            | Endpoint::NlpStatus
            | Endpoint::FormalStatus => Method::GET,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

/// Single-attempt JSON transport.
///
/// Implementations never panic on network trouble: every failure comes back
/// as a typed `ClientError`. No retries are performed.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Call `endpoint` with `method`, sending `body` as JSON when present,
    /// and return the decoded JSON document of a successful response.
    async fn call(&self, endpoint: Endpoint, method: Method, body: Option<Value>) -> Result<Value>;

    /// Base URL the transport resolves endpoint paths against
    fn base_url(&self) -> &str;
}
