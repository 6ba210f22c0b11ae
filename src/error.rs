//! Error types and Result aliases for sage-relay

use std::path::PathBuf;

/// Result type alias for sage-relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sage-relay
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // === Session errors ===
    /// The transport could not establish a session, or it was torn down
    #[error("Failed to connect to '{endpoint}': {reason}")]
    ConnectFailed { endpoint: String, reason: String },

    /// An action needed a live session and none was established
    #[error("Not connected to Sage")]
    NotConnected,

    /// The session went away while an operation was in flight
    #[error("Session closed")]
    SessionClosed,

    /// A remote call could not be issued
    #[error("Call to '{procedure}' failed: {reason}")]
    CallFailed { procedure: String, reason: String },

    /// A topic subscription could not be registered
    #[error("Subscribe to '{topic}' failed: {reason}")]
    SubscribeFailed { topic: String, reason: String },

    /// A compact URI used an alias with no registered prefix
    #[error("Unknown prefix '{prefix}'")]
    UnknownPrefix { prefix: String },

    /// The transport endpoint could not be built
    #[error("Invalid endpoint: {reason}")]
    InvalidEndpoint { reason: String },

    // === Rendering errors ===
    /// A pushed payload did not have the expected shape
    #[error("Invalid render input: {reason}")]
    RenderInputInvalid { reason: String },

    // === Configuration errors ===
    /// Failed to load configuration file
    #[error("Failed to load config from '{}': {reason}", path.display())]
    ConfigLoadFailed { path: PathBuf, reason: String },

    /// Configuration file not found
    #[error("Configuration file not found")]
    ConfigNotFound,

    /// Configuration validation failed
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    /// Failed to serialize configuration
    #[error("Failed to serialize config as {format}: {reason}")]
    ConfigSerializationFailed { format: String, reason: String },

    /// Failed to parse configuration
    #[error("Failed to parse {format} config: {reason}")]
    ConfigParseFailed { format: String, reason: String },

    // === I/O and serialization errors ===
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Regex compilation errors
    #[error("Regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors (for cases not yet categorized)
    #[error("Error: {0}")]
    Other(String),
}

impl Error {
    /// Whether this error only means "nothing to talk to right now"
    ///
    /// Handlers use this to downgrade the failure to a no-op instead of
    /// propagating it to the host.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Error::NotConnected | Error::SessionClosed)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
