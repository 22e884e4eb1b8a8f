use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the ALE tools.
#[derive(Error, Debug)]
pub enum AleError {
    /// A required input file does not exist.
    #[error("File not found: {0}")]
    InputNotFound(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file or its parent directory could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A delimited input file could not be decoded.
    #[error("Failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// The configured endpoint is not a valid absolute URL.
    #[error("Invalid endpoint URL {url}: {message}")]
    InvalidEndpoint { url: String, message: String },

    /// The HTTP request never produced a response (connect, timeout, TLS...).
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Convenience alias used throughout the ALE crates.
pub type Result<T> = std::result::Result<T, AleError>;
