//! Common error types used throughout trackforged.
//!
//! Every variant here is recoverable: plugins turn them into a skipped
//! decision plus a rationale line instead of failing the host.

/// Common error type for trackforged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An external service was unavailable or answered with garbage.
    #[error("Lookup failed ({service}): {message}")]
    Lookup { service: String, message: String },

    /// A language code is not in the ISO 639 table.
    #[error("Unknown language code: {0}")]
    Conversion(String),

    /// Structural signals were not enough to classify the file.
    #[error("Probe ambiguous: {0}")]
    ProbeAmbiguous(String),

    /// A decision would break a safety invariant.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The input is outside what the plugin handles.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is missing or inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new Lookup error.
    pub fn lookup<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::Lookup {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a new Conversion error.
    pub fn conversion<S: Into<String>>(code: S) -> Self {
        Self::Conversion(code.into())
    }

    /// Create a new ProbeAmbiguous error.
    pub fn probe_ambiguous<S: Into<String>>(msg: S) -> Self {
        Self::ProbeAmbiguous(msg.into())
    }

    /// Create a new InvariantViolation error.
    pub fn invariant<S: Into<String>>(msg: S) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Create a new UnsupportedInput error.
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Self::UnsupportedInput(msg.into())
    }

    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
