//! Application state.

use std::sync::Arc;

use ytthumb_upstream::ThumbnailClient;

use crate::config::ApiConfig;
use crate::services::ThumbnailService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub thumbnails: Arc<ThumbnailService>,
}

impl AppState {
    /// Create new application state around an upstream client.
    pub fn new(config: ApiConfig, client: ThumbnailClient) -> Self {
        let thumbnails = ThumbnailService::new(client, config.hint_max_age);

        Self {
            config,
            thumbnails: Arc::new(thumbnails),
        }
    }
}
