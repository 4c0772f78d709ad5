//! Error types for script rendering.

use crate::token::MarkerKind;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a script into a deck.
///
/// The tokenizer never fails; every variant here comes from rendering.
#[derive(Error, Debug)]
pub enum Error {
    /// A marker lacks an attribute its layout cannot do without.
    #[error("[{kind}] marker is missing required attribute '{name}'")]
    MissingAttribute { kind: MarkerKind, name: String },

    /// An attribute is present but its value cannot be used.
    #[error("Invalid value for attribute '{name}': {value:?}")]
    InvalidAttribute { name: String, value: String },

    /// The image source is not an absolute http(s) URL.
    #[error("Image source must be a direct http(s) URL: {0:?}")]
    InvalidSource(String),

    /// The image could not be downloaded.
    #[error("Failed to fetch image '{src}': {reason}")]
    Fetch { src: String, reason: String },

    /// The downloaded content is not an image we can place.
    #[error("Not an image: {0}")]
    NotAnImage(String),
}
