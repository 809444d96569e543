use std::{fmt, str::FromStr};

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::to_chrono;

/// Travel journal entry (stored in MongoDB `travelStories`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelStory {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub story: String,
    pub visited_location: Vec<String>,
    #[serde(default)]
    pub is_favourite: bool,
    /// Owning account; never changes after insert.
    pub user_id: ObjectId,
    pub created_on: DateTime,
    pub image_url: String,
    pub visited_date: DateTime,
}

/// Point in time supplied by clients as epoch milliseconds, either as a JSON
/// number or as a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochMillis(pub i64);

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidEpochMillis(String);

impl fmt::Display for InvalidEpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid epoch-milliseconds timestamp", self.0)
    }
}

impl std::error::Error for InvalidEpochMillis {}

impl EpochMillis {
    /// Accepts only instants that render back as a calendar date.
    pub fn new(ms: i64) -> Result<Self, InvalidEpochMillis> {
        chrono::DateTime::from_timestamp_millis(ms)
            .map(|_| EpochMillis(ms))
            .ok_or_else(|| InvalidEpochMillis(ms.to_string()))
    }

    pub fn to_bson(self) -> DateTime {
        DateTime::from_millis(self.0)
    }
}

impl FromStr for EpochMillis {
    type Err = InvalidEpochMillis;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ms = s.trim().parse::<i64>().map_err(|_| InvalidEpochMillis(s.to_string()))?;
        EpochMillis::new(ms)
    }
}

impl<'de> Deserialize<'de> for EpochMillis {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(ms) => EpochMillis::new(ms).map_err(serde::de::Error::custom),
            // out-of-range floats would saturate on the cast
            Raw::Float(ms) if ms.is_finite() && ms.abs() < i64::MAX as f64 => {
                EpochMillis::new(ms.trunc() as i64).map_err(serde::de::Error::custom)
            }
            Raw::Float(ms) => Err(serde::de::Error::custom(InvalidEpochMillis(ms.to_string()))),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStoryRequest {
    pub title: Option<String>,
    pub story: Option<String>,
    pub visited_location: Option<Vec<String>>,
    pub image_url: Option<String>,
    #[schema(value_type = Option<String>, example = "1700000000000")]
    pub visited_date: Option<EpochMillis>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditStoryRequest {
    pub title: Option<String>,
    pub story: Option<String>,
    pub visited_location: Option<Vec<String>>,
    /// Falls back to the placeholder image when absent or empty.
    pub image_url: Option<String>,
    #[schema(value_type = Option<String>, example = "1700000000000")]
    pub visited_date: Option<EpochMillis>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFavouriteRequest {
    pub is_favourite: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    /// Inclusive lower bound, epoch milliseconds.
    pub start_date: Option<String>,
    /// Inclusive upper bound, epoch milliseconds.
    pub end_date: Option<String>,
}

/// Story as rendered in API responses.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelStoryResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub story: String,
    pub visited_location: Vec<String>,
    pub is_favourite: bool,
    pub user_id: String,
    pub created_on: chrono::DateTime<chrono::Utc>,
    pub image_url: String,
    pub visited_date: chrono::DateTime<chrono::Utc>,
}

impl From<TravelStory> for TravelStoryResponse {
    fn from(story: TravelStory) -> Self {
        TravelStoryResponse {
            id: story.id.to_hex(),
            title: story.title,
            story: story.story,
            visited_location: story.visited_location,
            is_favourite: story.is_favourite,
            user_id: story.user_id.to_hex(),
            created_on: to_chrono(story.created_on),
            image_url: story.image_url,
            visited_date: to_chrono(story.visited_date),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoryEnvelope {
    pub story: TravelStoryResponse,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoryListResponse {
    pub stories: Vec<TravelStoryResponse>,
}
