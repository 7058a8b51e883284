//! Error types for the NewsBreak core library
//!
//! The four error kinds callers need to tell apart map onto four variants:
//! configuration problems are fatal at construction, API rejections are
//! never retried, transport failures are retried and only surface after the
//! attempt budget is spent, and schema mismatches keep the raw payload so
//! upstream drift can be diagnosed without losing data.

use serde_json::Value;
use thiserror::Error;

/// Main error type for NewsBreak API operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid constructor arguments: non-positive rate, zero attempt
    /// budget, missing credential. Never retried.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The upstream processed and rejected the request - bad HTTP status,
    /// non-zero application code, or a recognized error-page shape.
    #[error("NewsBreak API error (code={code}): {message}")]
    Api {
        code: i64,
        message: String,
        /// Parsed response body, when one was obtained
        raw: Option<Value>,
    },

    /// No HTTP response was obtained (network failure, timeout, reset)
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The retry budget was exhausted without a single transport success
    #[error("Max retries exceeded after {attempts} attempts: {message}")]
    MaxRetriesExceeded { attempts: u32, message: String },

    /// A successful response did not match the expected payload structure
    #[error("Schema error: {message}")]
    Schema {
        message: String,
        /// Full payload as received, attached for diagnosis
        raw: Value,
    },

    /// JSON serialization errors outside the response-classification path
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for configuration errors
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}
