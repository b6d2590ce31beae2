//! Error types for the Randomur feed core.
//!
//! Every fault here is scoped to a single fetch and recoverable by a later
//! refresh. The variants are grouped so the fetch coordinator can tell a
//! transport loss (a hint that connectivity dropped) apart from a bad
//! payload.

use std::time::Duration;
use thiserror::Error;

/// Main error type for the Randomur core.
#[derive(Debug, Error)]
pub enum RandomurError {
    // Network errors
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    // Payload errors
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Gallery API returned {status}: {message}")]
    Api { status: u16, message: String },

    // Fetch lifecycle errors
    #[error("Fetch {id} is already running")]
    FetchInProgress { id: u64 },

    #[error("Network is offline")]
    Offline,

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // File system errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Randomur operations.
pub type Result<T> = std::result::Result<T, RandomurError>;

/// Coarse failure classification recorded on a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The remote host could not be reached or the body could not be read.
    Transport,
    /// The payload was malformed or did not match the envelope schema.
    Parse,
    /// The server answered with a non-success status.
    Api,
    /// The fetch was refused before any request was made.
    Rejected,
    Other,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport"),
            FailureKind::Parse => write!(f, "parse"),
            FailureKind::Api => write!(f, "api"),
            FailureKind::Rejected => write!(f, "rejected"),
            FailureKind::Other => write!(f, "other"),
        }
    }
}

// Conversion implementations for common error types

impl From<std::io::Error> for RandomurError {
    fn from(err: std::io::Error) -> Self {
        RandomurError::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for RandomurError {
    fn from(err: serde_json::Error) -> Self {
        RandomurError::Parse {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl RandomurError {
    /// Create a transport error from a message and an underlying cause.
    pub fn transport(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        RandomurError::Transport {
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }

    /// Create a parse error without an underlying serde error.
    pub fn parse(message: impl Into<String>) -> Self {
        RandomurError::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Classify this error for the fetch state machine.
    pub fn kind(&self) -> FailureKind {
        match self {
            RandomurError::Transport { .. } | RandomurError::Timeout(_) => FailureKind::Transport,
            RandomurError::Parse { .. } => FailureKind::Parse,
            RandomurError::Api { .. } => FailureKind::Api,
            RandomurError::FetchInProgress { .. } | RandomurError::Offline => {
                FailureKind::Rejected
            }
            _ => FailureKind::Other,
        }
    }

    /// Whether this failure is the signal that connectivity may have dropped
    /// before the connectivity monitor noticed.
    pub fn is_network_interruption(&self) -> bool {
        self.kind() == FailureKind::Transport
    }
}
