//! Shared handler state.

use deck_core::ImageFetcher;
use deck_net::ImageHost;
use std::sync::Arc;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Image source for IMAGE and MIX markers.
    pub fetcher: Arc<dyn ImageFetcher + Send + Sync>,

    /// Destination for `/upload`.
    pub host: Arc<ImageHost>,
}

impl AppState {
    pub fn new(fetcher: impl ImageFetcher + Send + Sync + 'static, host: ImageHost) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            host: Arc::new(host),
        }
    }
}
