//! Error types for the AI data tools.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the model service or handling documents.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read a local file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file exceeds the configured upload size limit.
    #[error("File is {size_mb:.1} MB, larger than the {limit_mb} MB limit")]
    FileTooLarge { size_mb: f64, limit_mb: u64 },

    /// The model service reported the uploaded file as failed.
    #[error("Remote processing failed for file {name}")]
    FileProcessingFailed { name: String },

    /// The uploaded file never left the processing state.
    #[error("Timed out after {waited:?} waiting for file {name} to become ready")]
    UploadTimeout { name: String, waited: Duration },

    /// A chat turn was attempted before a file was processed.
    #[error("No document has been processed yet; upload a file first")]
    NotInitialized,

    /// The API key was rejected.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The service is rate limiting this key.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The request was malformed or referenced something unknown.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The service failed with a 5xx status.
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success response.
    #[error("Unexpected response ({status}): {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be understood.
    #[error("Failed to parse response: {0}")]
    ResponseParsing(String),

    /// The prompt was blocked by the service's safety filters.
    #[error("Request blocked: {0}")]
    Blocked(String),

    /// The service returned no usable candidate.
    #[error("The model returned no content")]
    EmptyResponse,

    /// No text could be extracted from a document.
    #[error("Failed to extract text: {0}")]
    NoText(String),

    /// Delimited text could not be parsed.
    #[error("CSV parsing error: {0}")]
    CsvError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::CsvError(err.to_string())
    }
}
