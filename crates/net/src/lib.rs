//! Network access for deck generation: downloading images referenced by
//! scripts and forwarding uploads to an image host.

pub mod fetch;
pub mod upload;

pub use fetch::{HttpImageFetcher, DEFAULT_FETCH_TIMEOUT};
pub use upload::{ImageHost, UploadError, DEFAULT_UPLOAD_ENDPOINT};

/// User agent sent with every outgoing request.
pub const USER_AGENT: &str = concat!("deck/", env!("CARGO_PKG_VERSION"));
