pub mod stories;
pub mod users;

#[cfg(test)]
pub mod memory;

pub use stories::{MongoStoryStore, StoryQuery, StoryStore};
pub use users::{MongoUserStore, UserStore};

use mongodb::{bson::doc, options::IndexOptions, Client, Collection, Database, IndexModel};
use std::error::Error;

pub const USERS_COLLECTION: &str = "users";
pub const STORIES_COLLECTION: &str = "travelStories";

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    /// Connects, verifies the deployment is reachable and ensures indexes.
    ///
    /// The database name comes from the URI path when present, otherwise
    /// `fallback_db` is used.
    pub async fn new(uri: &str, fallback_db: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| fallback_db.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        db.list_collection_names().await?;
        log::info!("📦 Using database: {}", db_name);

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<mongodb::bson::Document>(USERS_COLLECTION);
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }

        let stories = self.collection::<mongodb::bson::Document>(STORIES_COLLECTION);
        let owner_index = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .build();

        match stories.create_index(owner_index).await {
            Ok(_) => log::info!("   ✅ Index created: travelStories(userId)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let favourite_index = IndexModel::builder()
            .keys(doc! { "userId": 1, "isFavourite": -1 })
            .build();

        match stories.create_index(favourite_index).await {
            Ok(_) => log::info!("   ✅ Index created: travelStories(userId, isFavourite)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Closes pooled connections. Call once the HTTP server has stopped.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}
