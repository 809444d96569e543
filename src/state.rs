use std::sync::Arc;

use crate::{
    config::AppConfig,
    database::{MongoDB, MongoStoryStore, MongoUserStore, StoryStore, UserStore},
    services::{asset_service::AssetStore, session_service::SessionIssuer},
};

/// Process-wide collaborators, built once at startup and shared by every
/// worker through `web::Data`.
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub stories: Arc<dyn StoryStore>,
    pub assets: AssetStore,
    pub sessions: SessionIssuer,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(config: &AppConfig, db: &MongoDB) -> Self {
        Self {
            users: Arc::new(MongoUserStore::new(db)),
            stories: Arc::new(MongoStoryStore::new(db)),
            assets: AssetStore::new(&config.upload_dir, &config.public_base_url, config.max_upload_bytes),
            sessions: SessionIssuer::new(&config.access_token_secret),
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::database::memory::{MemoryStoryStore, MemoryUserStore};
    use std::path::Path;

    pub const TEST_SECRET: &str = "test-access-token-secret";

    /// State backed by in-memory stores and a caller-owned upload directory.
    pub fn memory_state(upload_dir: &Path) -> AppState {
        AppState {
            users: Arc::new(MemoryUserStore::default()),
            stories: Arc::new(MemoryStoryStore::default()),
            assets: AssetStore::new(upload_dir, "http://localhost:8080", 64 * 1024),
            sessions: SessionIssuer::new(TEST_SECRET),
            bcrypt_cost: 4,
        }
    }
}
