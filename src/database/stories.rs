use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    Collection,
};

use super::{MongoDB, STORIES_COLLECTION};
use crate::{models::TravelStory, utils::error::AppError};

/// Which of an owner's stories to return.
#[derive(Debug, Clone)]
pub enum StoryQuery {
    All,
    /// Case-insensitive literal substring over title, story and locations.
    Search(String),
    /// `visitedDate` within `[start, end]`.
    VisitedBetween { start: DateTime, end: DateTime },
}

impl StoryQuery {
    fn to_filter(&self, owner: &ObjectId) -> Document {
        match self {
            StoryQuery::All => doc! { "userId": *owner },
            StoryQuery::Search(text) => {
                let pattern = doc! { "$regex": regex::escape(text), "$options": "i" };
                doc! {
                    "userId": *owner,
                    "$or": [
                        { "title": pattern.clone() },
                        { "story": pattern.clone() },
                        { "visitedLocation": pattern },
                    ]
                }
            }
            StoryQuery::VisitedBetween { start, end } => doc! {
                "userId": *owner,
                "visitedDate": { "$gte": *start, "$lte": *end },
            },
        }
    }
}

/// Story repository. Every operation is scoped to the owning account, so a
/// record belonging to someone else behaves exactly like a missing one.
#[async_trait]
pub trait StoryStore: Send + Sync {
    async fn insert(&self, story: &TravelStory) -> Result<(), AppError>;

    async fn find_owned(&self, id: &ObjectId, owner: &ObjectId) -> Result<Option<TravelStory>, AppError>;

    /// Matching stories, favourites first.
    async fn list_owned(&self, owner: &ObjectId, query: &StoryQuery) -> Result<Vec<TravelStory>, AppError>;

    /// Overwrites the stored document. Returns `false` when no owned record matched.
    async fn replace_owned(&self, story: &TravelStory) -> Result<bool, AppError>;

    async fn delete_owned(&self, id: &ObjectId, owner: &ObjectId) -> Result<bool, AppError>;

    /// Cheap round trip to the backing store.
    async fn ping(&self) -> Result<(), AppError>;
}

pub struct MongoStoryStore {
    collection: Collection<TravelStory>,
}

impl MongoStoryStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<TravelStory>(STORIES_COLLECTION),
        }
    }
}

#[async_trait]
impl StoryStore for MongoStoryStore {
    async fn insert(&self, story: &TravelStory) -> Result<(), AppError> {
        self.collection.insert_one(story).await?;
        Ok(())
    }

    async fn find_owned(&self, id: &ObjectId, owner: &ObjectId) -> Result<Option<TravelStory>, AppError> {
        Ok(self
            .collection
            .find_one(doc! { "_id": *id, "userId": *owner })
            .await?)
    }

    async fn list_owned(&self, owner: &ObjectId, query: &StoryQuery) -> Result<Vec<TravelStory>, AppError> {
        let cursor = self
            .collection
            .find(query.to_filter(owner))
            .sort(doc! { "isFavourite": -1 })
            .await?;

        let stories: Vec<TravelStory> = cursor.try_collect().await?;
        Ok(stories)
    }

    async fn replace_owned(&self, story: &TravelStory) -> Result<bool, AppError> {
        let result = self
            .collection
            .replace_one(doc! { "_id": story.id, "userId": story.user_id }, story)
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn delete_owned(&self, id: &ObjectId, owner: &ObjectId) -> Result<bool, AppError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": *id, "userId": *owner })
            .await?;

        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.collection.estimated_document_count().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_filter_is_owner_scoped() {
        let owner = ObjectId::new();
        let queries = [
            StoryQuery::All,
            StoryQuery::Search("paris".into()),
            StoryQuery::VisitedBetween {
                start: DateTime::from_millis(0),
                end: DateTime::from_millis(1),
            },
        ];

        for query in queries {
            let filter = query.to_filter(&owner);
            assert_eq!(filter.get_object_id("userId").unwrap(), owner);
        }
    }

    #[test]
    fn test_search_pattern_is_escaped() {
        let filter = StoryQuery::Search("a.b*".into()).to_filter(&ObjectId::new());
        let clauses = filter.get_array("$or").unwrap();
        let title = clauses[0].as_document().unwrap().get_document("title").unwrap();

        assert_eq!(title.get_str("$regex").unwrap(), r"a\.b\*");
        assert_eq!(title.get_str("$options").unwrap(), "i");
    }
}
