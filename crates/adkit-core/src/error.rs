//! Error types for the AdKit system
//!
//! This module defines all error types used throughout the crate.
//!
//! Propagation policy: load failures are delivered to the registered
//! [`LoadObserver`](crate::traits::LoadObserver) and never cross the API
//! boundary as a return value; tracking failures are logged and dropped;
//! only synchronous precondition violations (e.g. `render` misuse) fail
//! at the call site.

use thiserror::Error;

/// Result type alias for AdKit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the AdKit system
#[derive(Error, Debug)]
pub enum Error {
    /// The ad server had no ad available for the requested slot
    #[error("no fill: the ad server returned no ad for this request")]
    NoFill,

    /// Network-level failure while talking to a collaborator
    #[error("network error: {0}")]
    Network(String),

    /// The requested size/type combination is not served
    #[error("invalid ad size: {0}")]
    InvalidSize(String),

    /// `render` was called with an ad this unit does not own, or while
    /// the unit is not ready to display
    #[error("invalid ad: {0}")]
    InvalidAd(String),

    /// Analytics delivery failure (logged only, never surfaced to callers)
    #[error("tracking error: {0}")]
    Tracking(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// The ad unit's owning context has been torn down
    #[error("ad unit is closed: its owning context has been torn down")]
    UnitClosed,

    /// Server-specific error with context
    #[error("ad server error ({server}): {message}")]
    Server {
        /// Server name
        server: String,
        /// Error message
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid-size error
    pub fn invalid_size(msg: impl Into<String>) -> Self {
        Self::InvalidSize(msg.into())
    }

    /// Create an invalid-ad error
    pub fn invalid_ad(msg: impl Into<String>) -> Self {
        Self::InvalidAd(msg.into())
    }

    /// Create a tracking error
    pub fn tracking(msg: impl Into<String>) -> Self {
        Self::Tracking(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a server-specific error
    pub fn server(server: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Server {
            server: server.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether this error represents a no-fill load result
    pub fn is_no_fill(&self) -> bool {
        matches!(self, Self::NoFill)
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
