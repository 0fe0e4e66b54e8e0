//! Domain error types
//!
//! Two layers of errors live here. [`LookupError`] describes why a single
//! external lookup tier produced no data; it is always recoverable and the
//! caller decides whether to fall through to the next tier. [`GeoError`] is
//! the application error returned by fallible operations that can abort a run.
//! Neither type exposes third-party HTTP client types.

use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum GeoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The required input file does not exist
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    /// Input data is unusable (missing columns, unreadable rows)
    #[error("Input error: {0}")]
    Input(String),

    /// Cache persistence errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Output artifact errors
    #[error("Output error: {0}")]
    Output(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Failure of a single external lookup tier
///
/// Every variant degrades to "no data" for the CEP being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Request exceeded the configured timeout
    #[error("{service} request timed out")]
    Timeout { service: &'static str },

    /// Connection or protocol failure before a response was received
    #[error("{service} transport error: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    /// Service answered with a non-success status
    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    /// Response body could not be interpreted
    #[error("{service} returned a malformed response: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },

    /// The postal registry does not know the CEP
    #[error("CEP {0} not found in postal registry")]
    NotFound(String),

    /// The postal registry answered without a street to geocode
    #[error("CEP {0} has no street address")]
    IncompleteAddress(String),

    /// The geocoding service returned an empty candidate list
    #[error("no geocoding candidates for '{0}'")]
    NoCandidates(String),
}

impl LookupError {
    /// Classify a `reqwest` failure for the given service
    pub(crate) fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout { service }
        } else if let Some(status) = err.status() {
            LookupError::Status {
                service,
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            LookupError::Malformed {
                service,
                message: err.to_string(),
            }
        } else {
            LookupError::Transport {
                service,
                message: err.to_string(),
            }
        }
    }
}

impl From<std::io::Error> for GeoError {
    fn from(err: std::io::Error) -> Self {
        GeoError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for GeoError {
    fn from(err: toml::de::Error) -> Self {
        GeoError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for GeoError {
    fn from(err: csv::Error) -> Self {
        GeoError::Csv(err.to_string())
    }
}
