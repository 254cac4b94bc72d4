use std::sync::Arc;

use stockroom_core::uploads::ImageStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stockroom_db::DbPool,
    /// Server configuration (session settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// On-disk store for item images.
    pub images: Arc<ImageStore>,
}

impl AppState {
    pub fn new(pool: stockroom_db::DbPool, config: ServerConfig) -> Self {
        let images = ImageStore::new(config.upload_dir.clone(), config.max_upload_bytes);
        Self {
            pool,
            config: Arc::new(config),
            images: Arc::new(images),
        }
    }
}
