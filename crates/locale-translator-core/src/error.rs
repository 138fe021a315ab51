use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::language::Language;

/// Unified error type for locale-translator-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Document operations (format checks, parsing, writing)
/// - Browser automation (waits, stale elements, WebDriver failures)
/// - HTTP translation API operations (requests, responses, rate limiting)
/// - Configuration operations (loading, validation)
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Document Errors
    // ==========================================================================
    /// Input file is not a JSON file
    #[error("file {} is not a json file (extension '{extension}')", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Failed to (de)serialize a document
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    // ==========================================================================
    // Browser Errors
    // ==========================================================================
    /// A bounded wait did not observe the expected page state in time
    #[error("timed out after {timeout:?} waiting for {condition}")]
    WaitTimeout { condition: String, timeout: Duration },

    /// A located element was replaced by the page before it could be read
    #[error("stale element reference")]
    StaleElement,

    /// WebDriver session or command failure
    #[error("browser automation failed: {0}")]
    Browser(String),

    // ==========================================================================
    // Translation Errors
    // ==========================================================================
    /// Backend response could not be interpreted
    #[error("failed to parse translation response: {0}")]
    Parse(String),

    /// Language has no known mapping in the backend
    #[error("{0} is not a supported language")]
    UnsupportedLanguage(Language),

    /// Engine-level failure not otherwise classified
    #[error("translation failed: {0}")]
    Translation(String),

    /// A single text failed to translate
    #[error("failed to translate '{text}' from {from} to {to}: {cause}")]
    ItemFailed {
        text: String,
        from: Language,
        to: Language,
        #[source]
        cause: Box<Error>,
    },

    /// Translation API request failed
    #[error("translation API request failed: {0}")]
    Request(String),

    /// Rate limited by translation API
    #[error("translation rate limited{}", retry_after.map(|s| format!(", retry after {s} seconds")).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error, or the per-item failure it wraps, is a wait timeout.
    pub fn is_wait_timeout(&self) -> bool {
        match self {
            Self::WaitTimeout { .. } => true,
            Self::ItemFailed { cause, .. } => cause.is_wait_timeout(),
            _ => false,
        }
    }

    /// The innermost error, looking through per-item wrappers.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::ItemFailed { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
