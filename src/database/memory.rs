//! In-process stores used by tests; same owner scoping as the MongoDB adapters.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{StoryQuery, StoryStore, UserStore};
use crate::{
    models::{TravelStory, User},
    utils::error::AppError,
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.iter().find(|u| u.id == *id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exist".to_string()));
        }
        users.push(user.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStoryStore {
    stories: RwLock<Vec<TravelStory>>,
}

fn matches(query: &StoryQuery, story: &TravelStory) -> bool {
    match query {
        StoryQuery::All => true,
        StoryQuery::Search(text) => {
            let needle = text.to_lowercase();
            story.title.to_lowercase().contains(&needle)
                || story.story.to_lowercase().contains(&needle)
                || story
                    .visited_location
                    .iter()
                    .any(|l| l.to_lowercase().contains(&needle))
        }
        StoryQuery::VisitedBetween { start, end } => {
            story.visited_date >= *start && story.visited_date <= *end
        }
    }
}

#[async_trait]
impl StoryStore for MemoryStoryStore {
    async fn insert(&self, story: &TravelStory) -> Result<(), AppError> {
        self.stories.write().await.push(story.clone());
        Ok(())
    }

    async fn find_owned(&self, id: &ObjectId, owner: &ObjectId) -> Result<Option<TravelStory>, AppError> {
        Ok(self
            .stories
            .read()
            .await
            .iter()
            .find(|s| s.id == *id && s.user_id == *owner)
            .cloned())
    }

    async fn list_owned(&self, owner: &ObjectId, query: &StoryQuery) -> Result<Vec<TravelStory>, AppError> {
        let mut found: Vec<TravelStory> = self
            .stories
            .read()
            .await
            .iter()
            .filter(|s| s.user_id == *owner && matches(query, s))
            .cloned()
            .collect();
        found.sort_by_key(|s| !s.is_favourite);
        Ok(found)
    }

    async fn replace_owned(&self, story: &TravelStory) -> Result<bool, AppError> {
        let mut stories = self.stories.write().await;
        match stories
            .iter_mut()
            .find(|s| s.id == story.id && s.user_id == story.user_id)
        {
            Some(existing) => {
                *existing = story.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_owned(&self, id: &ObjectId, owner: &ObjectId) -> Result<bool, AppError> {
        let mut stories = self.stories.write().await;
        let before = stories.len();
        stories.retain(|s| !(s.id == *id && s.user_id == *owner));
        Ok(stories.len() < before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
