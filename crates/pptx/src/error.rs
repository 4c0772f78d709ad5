//! Error types for reading and writing PPTX packages.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing or reading a package.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML generation or parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// The package is missing a part or refers to one that does not exist.
    #[error("Invalid or corrupted package: {0}")]
    Corrupted(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Zip(e.to_string())
    }
}

impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        Self::Xml(e.to_string())
    }
}
