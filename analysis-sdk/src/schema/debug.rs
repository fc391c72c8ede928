//! Debugging module schemas

use serde::{Deserialize, Serialize};

/// Request body for the debug endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugRequest {
    pub code: String,
    pub filename: String,
}

/// Full debugging report.
///
/// `compilation_analysis` is required; every other sub-report defaults to
/// empty when the server leaves it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugResponse {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub status: String,

    #[serde(alias = "compilationAnalysis")]
    pub compilation_analysis: CompilationAnalysis,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "staticAnalysis")]
    pub static_analysis: StaticAnalysis,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "aiAnalysis")]
    pub ai_analysis: AiAnalysis,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub recommendations: Vec<Recommendation>,
}

/// Compiler outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationAnalysis {
    #[serde(alias = "compilationSuccessful")]
    pub compilation_successful: bool,

    /// Raw compiler diagnostics, empty on success
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub errors: String,
}

/// Static metrics computed without running the program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticAnalysis {
    #[serde(default, deserialize_with = "super::null_as_default", alias = "lineCount")]
    pub line_count: u32,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "functionCount")]
    pub function_count: u32,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "codeMetrics")]
    pub code_metrics: CodeMetrics,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "potentialIssues")]
    pub potential_issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeMetrics {
    #[serde(default, deserialize_with = "super::null_as_default", alias = "cyclomaticComplexity")]
    pub cyclomatic_complexity: u32,

    /// Fraction of comment lines, 0.0 to 1.0
    #[serde(default, deserialize_with = "super::null_as_default", alias = "commentRatio")]
    pub comment_ratio: f64,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "avgFunctionLength")]
    pub avg_function_length: f64,
}

/// Model-assisted root-cause analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    #[serde(default, deserialize_with = "super::null_as_default", alias = "rootCause")]
    pub root_cause: String,

    /// Model confidence, 0.0 to 1.0
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub confidence: f64,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "fixSuggestions")]
    pub fix_suggestions: Vec<String>,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub prevention: Vec<String>,
}

/// A single prioritised recommendation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// "high", "medium" or "low", in any letter case
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub priority: String,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub category: String,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
}

/// Priority buckets used when grouping recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
    Other,
}

impl Recommendation {
    /// Case-insensitive priority bucket
    pub fn priority_level(&self) -> Priority {
        match self.priority.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Other,
        }
    }
}
