//! # Analysis SDK
//!
//! Client for a remote C/C++ analysis server exposing three modules:
//! debugging, natural-language test generation and formal-verification
//! contract synthesis.
//!
//! This crate provides:
//!
//! - Typed request/response schemas for every module
//! - A single-attempt JSON transport with uniform error semantics
//! - A dispatcher routing a selected module to its endpoint and schema
//! - Deterministic plain-text report renderers
//! - A connectivity monitor for the server's health endpoint
//!
//! ## Architecture
//!
//! - `Transport`: issues the HTTP call (`HttpTransport` in production)
//! - `Dispatcher`: validates inputs, routes, decodes, renders
//! - `render`: pure functions from decoded responses to `Report`s
//! - `ConnectivityMonitor`: writes the shared `HealthState` flag
//! - `ClientError`: the one error type every operation returns

pub mod core;
pub use crate::core::{ClientBuilder, Endpoint, Transport};

pub mod error;
pub use error::{ClientError, ErrorKind, Result, TransportFailureKind};

pub mod config;
pub use config::{ApiSettings, ConfigProvider, ConfigProviderExt};

pub mod schema;
pub use schema::{AnalysisInputs, AnalysisRequest, AnalysisResponse, Module, StatusSnapshot};

pub mod transport;
pub use transport::HttpTransport;

pub mod dispatch;
pub use dispatch::Dispatcher;

pub mod render;
pub use render::{Report, Section};

pub mod monitor;
pub use monitor::{ConnectivityMonitor, HealthState};

mod util;

#[cfg(test)]
mod tests;

/// Build a dispatcher and a connectivity monitor sharing one HTTP transport
pub fn connect(settings: ApiSettings) -> Result<(Dispatcher, ConnectivityMonitor)> {
    let transport: std::sync::Arc<dyn Transport> = std::sync::Arc::new(HttpTransport::new(settings)?);
    Ok((
        Dispatcher::new(transport.clone()),
        ConnectivityMonitor::new(transport),
    ))
}
