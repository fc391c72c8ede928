//! Wire schemas exchanged with the analysis server
//!
//! One schema family per module (`debug`, `nlp`, `formal`) plus the generic
//! error envelope, the health payload and the per-module status snapshot.
//!
//! Decoding is strict about required fields and types and lenient about
//! optional ones: missing optional fields take their defaults, unknown fields
//! are ignored, a wrongly typed field fails the whole decode.

pub mod debug;
pub mod formal;
pub mod nlp;

pub use debug::*;
pub use formal::*;
pub use nlp::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::Endpoint;
use crate::error::{ClientError, Result};
use crate::util::is_blank;

/// Filename sent when the caller has none
pub const DEFAULT_FILENAME: &str = "temp.c";

/// Health status string that counts as connected
pub const HEALTHY_STATUS: &str = "running";

/// The three analysis capabilities of the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Module {
    Debugging,
    #[serde(rename = "NLP")]
    Nlp,
    FormalVerification,
}

impl Module {
    /// Every module, in UI order
    pub const ALL: [Module; 3] = [Module::Debugging, Module::Nlp, Module::FormalVerification];

    /// Endpoint that performs this module's analysis
    pub fn analysis_endpoint(self) -> Endpoint {
        match self {
            Module::Debugging => Endpoint::Debug,
            Module::Nlp => Endpoint::NlpAnalyze,
            Module::FormalVerification => Endpoint::FormalVerify,
        }
    }

    /// Endpoint reporting this module's readiness
    pub fn status_endpoint(self) -> Endpoint {
        match self {
            Module::Debugging => Endpoint::DebugStatus,
            Module::Nlp => Endpoint::NlpStatus,
            Module::FormalVerification => Endpoint::FormalStatus,
        }
    }

    /// Short display label
    pub fn label(self) -> &'static str {
        match self {
            Module::Debugging => "Debugging",
            Module::Nlp => "NLP",
            Module::FormalVerification => "Formal Verification",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Module {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "debug" | "debugging" => Ok(Module::Debugging),
            "nlp" | "tests" | "test-generation" => Ok(Module::Nlp),
            "formal" | "formal-verification" | "formalverification" | "verify" => {
                Ok(Module::FormalVerification)
            }
            other => Err(ClientError::validation(format!("Unknown module: {}", other))),
        }
    }
}

/// Raw user input for one submission; the UI collaborator owns it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisInputs {
    /// C/C++ source text
    pub code: String,

    /// Source filename, used by debugging only
    pub filename: String,

    /// Function under verification, used by formal verification only
    pub function_name: String,
}

impl AnalysisInputs {
    /// Inputs carrying only source code
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Set the filename
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the function name
    pub fn function_name(mut self, function_name: impl Into<String>) -> Self {
        self.function_name = function_name.into();
        self
    }
}

/// Request body for one submission, keyed by module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalysisRequest {
    Debugging(DebugRequest),
    Nlp(NlpRequest),
    FormalVerification(FormalRequest),
}

impl AnalysisRequest {
    /// Validate `inputs` and build the request variant matching `module`.
    ///
    /// Code must be non-blank for every module; formal verification also
    /// requires a non-blank function name.
    pub fn build(module: Module, inputs: &AnalysisInputs) -> Result<Self> {
        if is_blank(&inputs.code) {
            return Err(ClientError::validation(format!(
                "{} requires source code; please enter or load some code first",
                module
            )));
        }

        match module {
            Module::Debugging => {
                let filename = if is_blank(&inputs.filename) {
                    DEFAULT_FILENAME.to_string()
                } else {
                    inputs.filename.trim().to_string()
                };
                Ok(AnalysisRequest::Debugging(DebugRequest {
                    code: inputs.code.clone(),
                    filename,
                }))
            }
            Module::Nlp => Ok(AnalysisRequest::Nlp(NlpRequest {
                code: inputs.code.clone(),
            })),
            Module::FormalVerification => {
                if is_blank(&inputs.function_name) {
                    return Err(ClientError::validation(
                        "Formal Verification requires a function name",
                    ));
                }
                Ok(AnalysisRequest::FormalVerification(FormalRequest {
                    code: inputs.code.clone(),
                    function_name: inputs.function_name.trim().to_string(),
                }))
            }
        }
    }

    /// Module this request belongs to
    pub fn module(&self) -> Module {
        match self {
            AnalysisRequest::Debugging(_) => Module::Debugging,
            AnalysisRequest::Nlp(_) => Module::Nlp,
            AnalysisRequest::FormalVerification(_) => Module::FormalVerification,
        }
    }
}

/// Decoded response for one submission, keyed by module
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Debugging(DebugResponse),
    Nlp(NlpResponse),
    FormalVerification(FormalResponse),
}

impl AnalysisResponse {
    /// Decode `value` with the schema belonging to `module`
    pub fn decode(module: Module, value: serde_json::Value) -> Result<Self> {
        let decoded = match module {
            Module::Debugging => AnalysisResponse::Debugging(decode_json(value)?),
            Module::Nlp => AnalysisResponse::Nlp(decode_json(value)?),
            Module::FormalVerification => AnalysisResponse::FormalVerification(decode_json(value)?),
        };
        Ok(decoded)
    }

    /// Module this response belongs to
    pub fn module(&self) -> Module {
        match self {
            AnalysisResponse::Debugging(_) => Module::Debugging,
            AnalysisResponse::Nlp(_) => Module::Nlp,
            AnalysisResponse::FormalVerification(_) => Module::FormalVerification,
        }
    }
}

/// Decode a JSON document into `T`, reporting failures as `ClientError::Decode`
pub fn decode_json<T>(value: serde_json::Value) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if !value.is_object() {
        return Err(ClientError::decode(format!(
            "Expected a JSON object, got {}",
            json_type_name(&value)
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| ClientError::decode(format!("Response did not match schema: {}", e)))
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Deserialize an optional field, treating an explicit `null` like a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Generic wrapper used by the server for non-success responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Payload of the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthResponse {
    /// Only an exact `"running"` counts as healthy
    pub fn is_running(&self) -> bool {
        self.status == HEALTHY_STATUS
    }
}

/// Per-module readiness flags; each module fills a different subset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, alias = "chatdbgAvailable", skip_serializing_if = "Option::is_none")]
    pub chatdbg_available: Option<bool>,

    #[serde(default, alias = "llmdebuggerAvailable", skip_serializing_if = "Option::is_none")]
    pub llmdebugger_available: Option<bool>,

    #[serde(default, alias = "gdbAvailable", skip_serializing_if = "Option::is_none")]
    pub gdb_available: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    #[serde(default, alias = "modelsLoaded", skip_serializing_if = "Option::is_none")]
    pub models_loaded: Option<bool>,

    #[serde(default, alias = "functionsDiscovered", skip_serializing_if = "Option::is_none")]
    pub functions_discovered: Option<u32>,

    #[serde(default, alias = "framacAvailable", skip_serializing_if = "Option::is_none")]
    pub framac_available: Option<bool>,

    #[serde(default, alias = "llmAvailable", skip_serializing_if = "Option::is_none")]
    pub llm_available: Option<bool>,
}
