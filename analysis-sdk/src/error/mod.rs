//! Error handling for the Analysis SDK
//!
//! Every failure the client can observe is folded into `ClientError`:
//! - `Validation` is raised locally, before any network call
//! - `Transport` covers DNS, refused connections, TLS and timeouts
//! - `Remote` carries a non-2xx status plus the server's error envelope
//! - `Decode` means the body was not JSON or did not match the schema

use std::fmt;

use thiserror::Error;

pub mod mapping;

/// Result type for Analysis SDK operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Sub-classification of transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    /// The configured request timeout elapsed
    Timeout,
    /// DNS resolution or TCP/TLS connection failed
    Connect,
    /// Anything else reported by the HTTP stack
    Other,
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailureKind::Timeout => f.write_str("timeout"),
            TransportFailureKind::Connect => f.write_str("connection"),
            TransportFailureKind::Other => f.write_str("transport"),
        }
    }
}

/// Flat error classification, handy for matching and for UI decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport(TransportFailureKind),
    Remote,
    Decode,
    Configuration,
    Cancelled,
}

/// Main error type for the Analysis SDK
#[derive(Error, Debug)]
pub enum ClientError {
    /// Blank or otherwise unusable input, caught before any request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network level failure
    #[error("Transport error ({kind}): {cause}")]
    Transport {
        kind: TransportFailureKind,
        cause: String,
    },

    /// Server answered with a non-success status
    #[error("Remote error (HTTP {status}): {cause}")]
    Remote {
        status: u16,
        cause: String,
        body: String,
    },

    /// Response body could not be decoded into the expected schema
    #[error("Decode error: {0}")]
    Decode(String),

    /// Missing or invalid client configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller abandoned the request before it completed
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Create a timeout transport error
    pub fn timeout(message: impl Into<String>) -> Self {
        ClientError::Transport {
            kind: TransportFailureKind::Timeout,
            cause: message.into(),
        }
    }

    /// Create a connection transport error
    pub fn connect(message: impl Into<String>) -> Self {
        ClientError::Transport {
            kind: TransportFailureKind::Connect,
            cause: message.into(),
        }
    }

    /// Create an unclassified transport error
    pub fn transport(message: impl Into<String>) -> Self {
        ClientError::Transport {
            kind: TransportFailureKind::Other,
            cause: message.into(),
        }
    }

    /// Create a remote error
    pub fn remote(status: u16, cause: impl Into<String>, body: impl Into<String>) -> Self {
        ClientError::Remote {
            status,
            cause: cause.into(),
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        ClientError::Configuration(message.into())
    }

    /// Flat classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Transport { kind, .. } => ErrorKind::Transport(*kind),
            ClientError::Remote { .. } => ErrorKind::Remote,
            ClientError::Decode(_) => ErrorKind::Decode,
            ClientError::Configuration(_) => ErrorKind::Configuration,
            ClientError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Human-readable cause, without the category prefix
    pub fn cause(&self) -> &str {
        match self {
            ClientError::Validation(message)
            | ClientError::Decode(message)
            | ClientError::Configuration(message) => message,
            ClientError::Transport { cause, .. } | ClientError::Remote { cause, .. } => cause,
            ClientError::Cancelled => "request cancelled",
        }
    }

    /// HTTP status code, for remote errors
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether resubmitting the same request could plausibly succeed.
    /// The client never retries on its own; this only informs the caller.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport { .. } => true,
            ClientError::Remote { status, .. } => mapping::is_transient_status(*status),
            _ => false,
        }
    }
}

/// Convert reqwest errors to ClientError
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::timeout(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ClientError::connect(format!("Connection error: {}", err))
        } else if err.is_decode() {
            ClientError::decode(format!("Response decode error: {}", err))
        } else if err.is_redirect() {
            ClientError::transport(format!("Too many redirects: {}", err))
        } else {
            ClientError::transport(format!("HTTP client error: {}", err))
        }
    }
}

/// Convert serde_json errors to ClientError
impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::decode(format!("JSON error: {}", err))
    }
}
