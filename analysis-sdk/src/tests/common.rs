//! Shared fixtures for the test modules

use std::time::Duration;

use serde_json::{json, Value};

use crate::config::ApiSettings;
use crate::core::Endpoint;

/// Settings pointing every endpoint at `base_url`, mirroring the sample appsettings.json
pub fn settings_for(base_url: &str) -> ApiSettings {
    ApiSettings::new(base_url)
        .with_timeout(Duration::from_secs(5))
        .with_endpoint(Endpoint::Health, "/health")
        .with_endpoint(Endpoint::Debug, "/api/debug")
        .with_endpoint(Endpoint::DebugStatus, "/api/debug/status")
        .with_endpoint(Endpoint::NlpAnalyze, "/api/nlp/analyze")
        .with_endpoint(Endpoint::NlpFunctions, "/api/nlp/functions")
        .with_endpoint(Endpoint::NlpStatus, "/api/nlp/status")
        .with_endpoint(Endpoint::FormalVerify, "/api/formal/verify")
        .with_endpoint(Endpoint::FormalStatus, "/api/formal/status")
}

/// A debug report for a program that compiled cleanly
pub fn clean_debug_response() -> Value {
    json!({
        "status": "Analysis complete",
        "compilation_analysis": {
            "compilation_successful": true,
            "errors": ""
        },
        "static_analysis": {
            "line_count": 1,
            "function_count": 1,
            "code_metrics": {
                "cyclomatic_complexity": 1,
                "comment_ratio": 0.0,
                "avg_function_length": 1.0
            },
            "potential_issues": []
        },
        "ai_analysis": {
            "root_cause": "",
            "confidence": 0.0,
            "fix_suggestions": [],
            "prevention": []
        },
        "recommendations": []
    })
}

/// A formal verification result with every section populated
pub fn full_formal_response() -> Value {
    json!({
        "function_name": "abs_val",
        "contracts": {
            "preconditions": ["requires x > INT_MIN;"],
            "postconditions": ["ensures \\result >= 0;"]
        },
        "acsl_code": "/*@\n  requires x > INT_MIN;\n  ensures \\result >= 0;\n*/",
        "validation": {
            "valid": true,
            "warnings": ["loop invariant not generated"],
            "errors": []
        },
        "metadata": {
            "template_used": true,
            "ai_enhanced": false,
            "category": "arithmetic"
        }
    })
}

/// An NLP result with one function and one test group
pub fn nlp_response() -> Value {
    json!({
        "status": "Test generation complete",
        "functions_found": 1,
        "total_tests": 3,
        "functions_details": [{
            "name": "add",
            "line_number": 3,
            "signature": "int add(int a, int b)",
            "return_type": "int",
            "parameters": [
                {"name": "a", "type": "int"},
                {"name": "b", "type": "int"}
            ]
        }],
        "test_cases": {
            "add": {
                "functional_tests": [{"input": [1, 2], "expected": 3}],
                "boundary_tests": [{"input": [2147483647, 0]}, {"input": [0, 0]}],
                "error_tests": [],
                "performance_tests": []
            }
        },
        "unit_test_code": "void test_add(void) { assert(add(1, 2) == 3); }\n"
    })
}
