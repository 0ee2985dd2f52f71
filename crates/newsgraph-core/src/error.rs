//! Error types for newsgraph-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur during text analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The noun extractor failed on a text unit.
    #[error("noun extraction failed: {message}")]
    Tokenizer {
        /// Description reported by the extractor.
        message: String,
    },

    /// A pipeline parameter is out of range. Raised before any work starts.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in [`crate::pipeline::AnalysisParams`].
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while retrieving or loading documents.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Naver API credentials are not configured.
    #[error("naver client id/secret not configured (set NEWSGRAPH_NAVER__CLIENT_ID and NEWSGRAPH_NAVER__CLIENT_SECRET)")]
    MissingCredentials,

    /// The HTTP request could not be completed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("news API returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// A response body or corpus file was not valid JSON for the expected shape.
    #[error("malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// A local file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File involved.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`SourceError`].
pub type SourceResult<T> = Result<T, SourceError>;
