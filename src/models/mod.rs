pub mod travel_story;
pub mod user;

pub use travel_story::*;
pub use user::*;

/// BSON timestamps are rendered as RFC 3339 in API responses.
pub(crate) fn to_chrono(dt: mongodb::bson::DateTime) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}
