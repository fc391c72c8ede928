//! Module dispatcher
//!
//! Turns a selected `Module` plus the current inputs into one validated
//! request, sends it through the `Transport`, decodes the module's response
//! schema and renders it. The dispatcher is stateless apart from the shared
//! transport, so overlapping calls do not interfere with each other.

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::core::{Endpoint, Transport};
use crate::error::{ClientError, Result};
use crate::render::{self, Report};
use crate::schema::{
    decode_json, AnalysisInputs, AnalysisRequest, AnalysisResponse, FunctionsResponse, Module,
    StatusSnapshot,
};

/// Routing entry for one module
#[derive(Clone, Copy)]
pub struct Route {
    pub module: Module,

    /// Endpoint performing the analysis
    pub endpoint: Endpoint,

    /// Endpoint reporting readiness
    pub status_endpoint: Endpoint,

    /// Validates inputs and builds the request body
    pub build: fn(&AnalysisInputs) -> Result<AnalysisRequest>,

    /// Decodes the module's response schema
    pub decode: fn(Value) -> Result<AnalysisResponse>,

    /// Renders the decoded response; a response of another module is handed to that module's route
    pub render: fn(&AnalysisResponse) -> Report,
}

/// The routing table. Exhaustive over `Module`, no fallthrough.
pub fn route(module: Module) -> Route {
    match module {
        Module::Debugging => Route {
            module,
            endpoint: Endpoint::Debug,
            status_endpoint: Endpoint::DebugStatus,
            build: |inputs| AnalysisRequest::build(Module::Debugging, inputs),
            decode: |value| decode_json(value).map(AnalysisResponse::Debugging),
            render: |response| match response {
                AnalysisResponse::Debugging(r) => render::render_debug(r),
                other => render::render(other),
            },
        },
        Module::Nlp => Route {
            module,
            endpoint: Endpoint::NlpAnalyze,
            status_endpoint: Endpoint::NlpStatus,
            build: |inputs| AnalysisRequest::build(Module::Nlp, inputs),
            decode: |value| decode_json(value).map(AnalysisResponse::Nlp),
            render: |response| match response {
                AnalysisResponse::Nlp(r) => render::render_nlp(r),
                other => render::render(other),
            },
        },
        Module::FormalVerification => Route {
            module,
            endpoint: Endpoint::FormalVerify,
            status_endpoint: Endpoint::FormalStatus,
            build: |inputs| AnalysisRequest::build(Module::FormalVerification, inputs),
            decode: |value| decode_json(value).map(AnalysisResponse::FormalVerification),
            render: |response| match response {
                AnalysisResponse::FormalVerification(r) => render::render_formal(r),
                other => render::render(other),
            },
        },
    }
}

/// Entry point used by the UI collaborator
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    /// Create a dispatcher over a shared transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Transport the dispatcher sends through
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Validate, send and decode one analysis request.
    ///
    /// Validation failures return before the transport is touched.
    pub async fn analyze(&self, module: Module, inputs: &AnalysisInputs) -> Result<AnalysisResponse> {
        let route = route(module);
        let request = (route.build)(inputs)?;

        let body = serde_json::to_value(&request)
            .map_err(|e| ClientError::validation(format!("Failed to serialize request: {}", e)))?;

        info!("Submitting {} analysis to {}", module, route.endpoint);

        let json = self
            .transport
            .call(route.endpoint, route.endpoint.method(), Some(body))
            .await
            .map_err(|e| {
                warn!("{} analysis failed: {}", module, e);
                e
            })?;

        let mut response = (route.decode)(json)?;

        if let (
            AnalysisResponse::FormalVerification(formal),
            AnalysisRequest::FormalVerification(sent),
        ) = (&mut response, &request)
        {
            if formal.function_name.trim().is_empty() {
                formal.function_name = sent.function_name.clone();
            }
        }

        debug!("{} analysis decoded", module);
        Ok(response)
    }

    /// Analyze and render in one step
    pub async fn dispatch(&self, module: Module, inputs: &AnalysisInputs) -> Result<Report> {
        let response = self.analyze(module, inputs).await?;
        Ok((route(module).render)(&response))
    }

    /// `dispatch` that gives up as soon as `cancel` fires.
    ///
    /// The in-flight request future is dropped on cancellation, so a late
    /// response is discarded rather than delivered.
    pub async fn dispatch_cancellable(
        &self,
        module: Module,
        inputs: &AnalysisInputs,
        cancel: &CancellationToken,
    ) -> Result<Report> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("{} analysis cancelled by caller", module);
                Err(ClientError::Cancelled)
            }
            result = self.dispatch(module, inputs) => result,
        }
    }

    /// Readiness snapshot of one module
    pub async fn status(&self, module: Module) -> Result<StatusSnapshot> {
        let endpoint = route(module).status_endpoint;
        let json = self.transport.call(endpoint, endpoint.method(), None).await?;
        decode_json(json)
    }

    /// Functions the NLP module has discovered so far
    pub async fn list_functions(&self) -> Result<FunctionsResponse> {
        let endpoint = Endpoint::NlpFunctions;
        let json = self.transport.call(endpoint, endpoint.method(), None).await?;
        decode_json(json)
    }
}
