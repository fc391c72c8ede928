//! Formal verification module schemas

use serde::{Deserialize, Serialize};

/// Request body for the formal verify endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalRequest {
    pub code: String,
    pub function_name: String,
}

/// Generated ACSL contract and its validation outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalResponse {
    /// Echo of the verified function; back-filled from the request when absent
    #[serde(default, deserialize_with = "super::null_as_default", alias = "functionName")]
    pub function_name: String,

    pub contracts: Contracts,

    /// Complete ACSL specification text
    #[serde(default, deserialize_with = "super::null_as_default", alias = "acslCode")]
    pub acsl_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<GenerationMetadata>,
}

impl FormalResponse {
    /// Whether the server judged the contract valid; absent validation is invalid
    pub fn is_valid(&self) -> bool {
        self.validation.as_ref().map_or(false, |v| v.valid)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contracts {
    /// `requires` clauses
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub preconditions: Vec<String>,

    /// `ensures` clauses
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub postconditions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub valid: bool,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub warnings: Vec<String>,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub errors: Vec<String>,
}

/// How the contract was produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    #[serde(default, deserialize_with = "super::null_as_default", alias = "templateUsed")]
    pub template_used: bool,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "aiEnhanced")]
    pub ai_enhanced: bool,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub category: String,
}
