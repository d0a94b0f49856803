//! Error types for travelscout
//!
//! The taxonomy follows the pipeline's isolation policy: transient fetch and
//! parse failures stop at the fetch-unit boundary (logged, item contributes
//! zero records), while setup-time failures (config validation, identifier
//! resolution) propagate to the caller as `Err`.

use thiserror::Error;

/// Result type alias for travelscout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for travelscout
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "concurrency")
        key: Option<String>,
    },

    /// Transient per-item fetch failure (non-200 status, empty payload, ...)
    ///
    /// Inside a pipeline run this never aborts the executor; it is swallowed
    /// into an empty [`crate::FetchResult`] and logged.
    #[error("fetch failed for {item}: {reason}")]
    Fetch {
        /// The work item (URL or parameter summary) that failed
        item: String,
        /// Why the fetch failed
        reason: String,
    },

    /// The record boundary could not be located in an otherwise-successful
    /// response (missing container element, missing itinerary collection)
    #[error("unexpected payload shape: {context}")]
    Schema {
        /// What was being looked for, and where
        context: String,
    },

    /// Browser automation failure (navigation, rendered-HTML retrieval)
    #[error("browser error: {0}")]
    Browser(String),

    /// Network error from the HTTP client
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for an [`Error::Fetch`] with formatted context
    pub fn fetch(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Fetch {
            item: item.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`Error::Schema`] with formatted context
    pub fn schema(context: impl Into<String>) -> Self {
        Error::Schema {
            context: context.into(),
        }
    }
}
