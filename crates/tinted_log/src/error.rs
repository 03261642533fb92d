//! Error types.

use std::io;
use std::path::Path;

use thiserror::Error;
use tint::ParseColorError;

/// Errors produced while configuring or writing logs.
#[derive(Error, Debug)]
pub enum Error {
    /// A color string was not `#RRGGBB`.
    #[error(transparent)]
    InvalidFormat(#[from] ParseColorError),
    /// Opening, writing, flushing or closing a sink failed.
    #[error("I/O error on {target}: {source}")]
    Io {
        /// The file path, or `console`.
        target: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// A configuration document could not be decoded.
    #[error("malformed configuration document: {0}")]
    ConfigParse(#[from] ConfigParseError),
}

impl Error {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            target: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn console(source: io::Error) -> Self {
        Self::Io {
            target: "console".to_string(),
            source,
        }
    }
}

/// Why a configuration document failed to decode.
#[derive(Error, Debug)]
pub enum ConfigParseError {
    /// JSON decode failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML decode failure.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    /// The document bytes were not UTF-8.
    #[error("document is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
    /// File extension other than `.json` or `.toml`.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// A specialized [`Result`] type for logging operations.
pub type Result<T> = std::result::Result<T, Error>;
