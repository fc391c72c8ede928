//! Error mapping for non-success responses
//!
//! The analysis server wraps failures in an envelope
//! `{status, message, data?, error?}`. These helpers turn such a response
//! into a `ClientError::Remote` with the most useful cause available.

use reqwest::StatusCode;
use serde_json::Value;

use super::ClientError;
use crate::schema::Envelope;
use crate::util::truncate_string;

/// Longest raw body quoted in a cause string
const MAX_CAUSE_LEN: usize = 200;

/// Map a non-success HTTP response to a remote error.
///
/// Cause precedence: envelope `error`, then envelope `message`, then the raw
/// body. The full body is always preserved on the error.
pub fn map_http_error(status: StatusCode, body: &str) -> ClientError {
    let cause = envelope_cause(body).unwrap_or_else(|| fallback_cause(status, body));
    ClientError::remote(status.as_u16(), cause, body)
}

/// Extract the human-readable cause from an error envelope, if any
pub fn envelope_cause(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    if !json.is_object() {
        return None;
    }

    let envelope: Envelope<Value> = serde_json::from_value(json).ok()?;

    envelope
        .error
        .filter(|e| !e.trim().is_empty())
        .or_else(|| Some(envelope.message).filter(|m| !m.trim().is_empty()))
}

fn fallback_cause(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        truncate_string(body, MAX_CAUSE_LEN)
    }
}

/// Helper function to classify HTTP errors by category
pub fn classify_http_error(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "validation",
        401 => "authentication",
        403 => "authorization",
        404 => "not_found",
        408 => "timeout",
        413 => "payload_too_large",
        429 => "rate_limit",
        500..=599 => "server",
        _ => "unknown",
    }
}

/// Status codes after which a manual resubmission may succeed
pub fn is_transient_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 502 | 503 | 504)
}
