// Owner-scoped CRUD over travel stories plus the image cleanup that
// accompanies deletion.

use mongodb::bson::{oid::ObjectId, DateTime};

use crate::{
    database::StoryQuery,
    models::{
        AddStoryRequest, DateRangeQuery, EditStoryRequest, EpochMillis, TravelStory,
        UpdateFavouriteRequest,
    },
    state::AppState,
    utils::{error::AppError, present},
};

const STORY_NOT_FOUND: &str = "Travel story not found";

/// Validated mutable fields shared by create and edit.
struct StoryFields {
    title: String,
    story: String,
    visited_location: Vec<String>,
    visited_date: DateTime,
}

fn required_fields(
    title: Option<String>,
    story: Option<String>,
    visited_location: Option<Vec<String>>,
    visited_date: Option<EpochMillis>,
    message: &str,
) -> Result<StoryFields, AppError> {
    let (Some(title), Some(story), Some(visited_location), Some(visited_date)) = (
        present(title),
        present(story),
        visited_location.filter(|l| !l.is_empty()),
        visited_date,
    ) else {
        return Err(AppError::validation(message));
    };

    Ok(StoryFields {
        title,
        story,
        visited_location,
        visited_date: visited_date.to_bson(),
    })
}

/// Unparseable ids can never match an owned record.
fn parse_story_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::not_found(STORY_NOT_FOUND))
}

fn favourites_first(mut stories: Vec<TravelStory>) -> Vec<TravelStory> {
    stories.sort_by_key(|s| !s.is_favourite);
    stories
}

async fn find_owned_or_404(state: &AppState, owner: &ObjectId, id: &str) -> Result<TravelStory, AppError> {
    let id = parse_story_id(id)?;
    state
        .stories
        .find_owned(&id, owner)
        .await?
        .ok_or_else(|| AppError::not_found(STORY_NOT_FOUND))
}

pub async fn create_story(
    state: &AppState,
    owner: &ObjectId,
    request: AddStoryRequest,
) -> Result<TravelStory, AppError> {
    const MISSING: &str = "All fields are required!";

    let image_url = present(request.image_url).ok_or_else(|| AppError::validation(MISSING))?;
    let fields = required_fields(
        request.title,
        request.story,
        request.visited_location,
        request.visited_date,
        MISSING,
    )?;

    let story = TravelStory {
        id: ObjectId::new(),
        title: fields.title,
        story: fields.story,
        visited_location: fields.visited_location,
        is_favourite: false,
        user_id: *owner,
        created_on: DateTime::now(),
        image_url,
        visited_date: fields.visited_date,
    };

    state.stories.insert(&story).await?;
    log::info!("✅ Story {} created for user {}", story.id, owner);

    Ok(story)
}

pub async fn list_stories(state: &AppState, owner: &ObjectId) -> Result<Vec<TravelStory>, AppError> {
    let stories = state.stories.list_owned(owner, &StoryQuery::All).await?;
    Ok(favourites_first(stories))
}

pub async fn edit_story(
    state: &AppState,
    owner: &ObjectId,
    id: &str,
    request: EditStoryRequest,
) -> Result<TravelStory, AppError> {
    let fields = required_fields(
        request.title,
        request.story,
        request.visited_location,
        request.visited_date,
        "All fields are required",
    )?;

    let mut story = find_owned_or_404(state, owner, id).await?;

    story.title = fields.title;
    story.story = fields.story;
    story.visited_location = fields.visited_location;
    story.image_url = present(request.image_url).unwrap_or_else(|| state.assets.placeholder_url());
    story.visited_date = fields.visited_date;

    if !state.stories.replace_owned(&story).await? {
        // deleted between lookup and write
        return Err(AppError::not_found(STORY_NOT_FOUND));
    }

    log::info!("✅ Story {} updated", story.id);
    Ok(story)
}

/// Removes the record, then tries to remove its image. Image cleanup is best
/// effort: failures are logged and never change the outcome.
pub async fn delete_story(state: &AppState, owner: &ObjectId, id: &str) -> Result<(), AppError> {
    let story = find_owned_or_404(state, owner, id).await?;

    if !state.stories.delete_owned(&story.id, owner).await? {
        return Err(AppError::not_found(STORY_NOT_FOUND));
    }
    log::info!("🗑️  Story {} deleted", story.id);

    match state.assets.remove_by_url(&story.image_url).await {
        Ok(true) => log::info!("🗑️  Removed image for story {}", story.id),
        Ok(false) => log::debug!("No stored image to remove for story {}: {}", story.id, story.image_url),
        Err(e) => log::warn!("⚠️  Failed to delete image file {}: {}", story.image_url, e),
    }

    Ok(())
}

pub async fn set_favourite(
    state: &AppState,
    owner: &ObjectId,
    id: &str,
    request: UpdateFavouriteRequest,
) -> Result<TravelStory, AppError> {
    let is_favourite = request
        .is_favourite
        .ok_or_else(|| AppError::validation("isFavourite is required"))?;

    let mut story = find_owned_or_404(state, owner, id).await?;
    story.is_favourite = is_favourite;

    if !state.stories.replace_owned(&story).await? {
        return Err(AppError::not_found(STORY_NOT_FOUND));
    }

    Ok(story)
}

pub async fn search_stories(
    state: &AppState,
    owner: &ObjectId,
    query: Option<String>,
) -> Result<Vec<TravelStory>, AppError> {
    let query = present(query).ok_or_else(|| AppError::not_found("query is required!"))?;

    let stories = state
        .stories
        .list_owned(owner, &StoryQuery::Search(query))
        .await?;
    Ok(favourites_first(stories))
}

pub async fn filter_by_visited_date(
    state: &AppState,
    owner: &ObjectId,
    range: DateRangeQuery,
) -> Result<Vec<TravelStory>, AppError> {
    let parse = |raw: Option<String>, name: &str| -> Result<DateTime, AppError> {
        raw.as_deref()
            .ok_or_else(|| AppError::validation(format!("{} is required", name)))?
            .parse::<EpochMillis>()
            .map(EpochMillis::to_bson)
            .map_err(|e| AppError::validation(format!("{}: {}", name, e)))
    };

    let start = parse(range.start_date, "startDate")?;
    let end = parse(range.end_date, "endDate")?;

    let stories = state
        .stories
        .list_owned(owner, &StoryQuery::VisitedBetween { start, end })
        .await?;
    Ok(favourites_first(stories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::memory_state;

    fn add_request(title: &str, location: &str, visited_ms: i64) -> AddStoryRequest {
        AddStoryRequest {
            title: Some(title.to_string()),
            story: Some(format!("Notes about {}", title)),
            visited_location: Some(vec![location.to_string()]),
            image_url: Some("http://localhost:8080/uploads/1-a.jpg".to_string()),
            visited_date: Some(EpochMillis(visited_ms)),
        }
    }

    fn edit_request(image_url: Option<&str>) -> EditStoryRequest {
        EditStoryRequest {
            title: Some("Lyon".to_string()),
            story: Some("Food".to_string()),
            visited_location: Some(vec!["Lyon".to_string()]),
            image_url: image_url.map(str::to_string),
            visited_date: Some(EpochMillis(1_600_000_000_000)),
        }
    }

    #[tokio::test]
    async fn test_create_converts_date_and_defaults_favourite() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(dir.path());
        let owner = ObjectId::new();

        let story = create_story(&state, &owner, add_request("Paris", "Paris", 1_700_000_000_000))
            .await
            .unwrap();

        assert_eq!(story.visited_date.timestamp_millis(), 1_700_000_000_000);
        assert!(!story.is_favourite);
        assert_eq!(story.user_id, owner);

        let listed = list_stories(&state, &owner).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Paris");
        assert_eq!(listed[0].visited_location, vec!["Paris".to_string()]);
        assert_eq!(listed[0].image_url, story.image_url);
    }

    #[tokio::test]
    async fn test_create_requires_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(dir.path());
        let owner = ObjectId::new();

        let mut no_image = add_request("Paris", "Paris", 0);
        no_image.image_url = None;
        let mut blank_title = add_request("Paris", "Paris", 0);
        blank_title.title = Some("  ".to_string());
        let mut no_locations = add_request("Paris", "Paris", 0);
        no_locations.visited_location = Some(vec![]);
        let mut no_date = add_request("Paris", "Paris", 0);
        no_date.visited_date = None;

        for request in [no_image, blank_title, no_locations, no_date] {
            let err = create_story(&state, &owner, request).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert!(list_stories(&state, &owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_without_image_uses_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(dir.path());
        let owner = ObjectId::new();
        let story = create_story(&state, &owner, add_request("Paris", "Paris", 0)).await.unwrap();

        let edited = edit_story(&state, &owner, &story.id.to_hex(), edit_request(None))
            .await
            .unwrap();
        assert_eq!(edited.image_url, "http://localhost:8080/assets/placeholder.jpeg");
        assert_eq!(edited.title, "Lyon");

        let edited = edit_story(&state, &owner, &story.id.to_hex(), edit_request(Some("")))
            .await
            .unwrap();
        assert_eq!(edited.image_url, "http://localhost:8080/assets/placeholder.jpeg");
    }

    #[tokio::test]
    async fn test_foreign_stories_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(dir.path());
        let owner = ObjectId::new();
        let intruder = ObjectId::new();
        let story = create_story(&state, &owner, add_request("Paris", "Paris", 0)).await.unwrap();
        let id = story.id.to_hex();

        let edit = edit_story(&state, &intruder, &id, edit_request(None)).await.unwrap_err();
        let delete = delete_story(&state, &intruder, &id).await.unwrap_err();
        let favourite = set_favourite(
            &state,
            &intruder,
            &id,
            UpdateFavouriteRequest { is_favourite: Some(true) },
        )
        .await
        .unwrap_err();

        for err in [edit, delete, favourite] {
            assert!(matches!(err, AppError::NotFound(_)));
        }

        let untouched = list_stories(&state, &owner).await.unwrap();
        assert_eq!(untouched.len(), 1);
        assert_eq!(untouched[0].title, "Paris");
        assert!(!untouched[0].is_favourite);
        assert!(list_stories(&state, &intruder).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(dir.path());

        let err = delete_story(&state, &ObjectId::new(), "not-an-id").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_listing_puts_favourites_first() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(dir.path());
        let owner = ObjectId::new();

        let mut ids = Vec::new();
        for title in ["a", "b", "c", "d"] {
            let story = create_story(&state, &owner, add_request(title, "X", 0)).await.unwrap();
            ids.push(story.id.to_hex());
        }
        for id in [&ids[1], &ids[3]] {
            set_favourite(&state, &owner, id, UpdateFavouriteRequest { is_favourite: Some(true) })
                .await
                .unwrap();
        }

        let titles: Vec<_> = list_stories(&state, &owner)
            .await
            .unwrap()
            .into_iter()
            .map(|s| (s.title, s.is_favourite))
            .collect();

        assert!(titles[..2].iter().all(|(_, fav)| *fav));
        assert!(titles[2..].iter().all(|(_, fav)| !*fav));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_scoped() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(dir.path());
        let owner = ObjectId::new();
        let other = ObjectId::new();

        create_story(&state, &owner, add_request("Paris", "France", 0)).await.unwrap();
        create_story(&state, &owner, add_request("Rome", "Italy", 0)).await.unwrap();
        create_story(&state, &other, add_request("Paris again", "France", 0)).await.unwrap();

        let by_title = search_stories(&state, &owner, Some("PAR".into())).await.unwrap();
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].user_id, owner);

        let by_location = search_stories(&state, &owner, Some("ital".into())).await.unwrap();
        assert_eq!(by_location.len(), 1);
        assert_eq!(by_location[0].title, "Rome");

        let err = search_stories(&state, &owner, Some(String::new())).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = search_stories(&state, &owner, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_date_filter_bounds_are_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(dir.path());
        let owner = ObjectId::new();

        for (title, ms) in [("early", 1_000), ("start", 2_000), ("end", 3_000), ("late", 4_000)] {
            create_story(&state, &owner, add_request(title, "X", ms)).await.unwrap();
        }

        let found = filter_by_visited_date(
            &state,
            &owner,
            DateRangeQuery {
                start_date: Some("2000".into()),
                end_date: Some("3000".into()),
            },
        )
        .await
        .unwrap();

        let mut titles: Vec<_> = found.into_iter().map(|s| s.title).collect();
        titles.sort();
        assert_eq!(titles, vec!["end".to_string(), "start".to_string()]);

        let err = filter_by_visited_date(
            &state,
            &owner,
            DateRangeQuery { start_date: Some("soon".into()), end_date: None },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = filter_by_visited_date(
            &state,
            &owner,
            DateRangeQuery {
                start_date: Some("0".into()),
                end_date: Some(i64::MAX.to_string()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_uploaded_image() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(dir.path());
        let owner = ObjectId::new();

        let filename = state.assets.save(Some("trip.jpg"), b"jpeg").await.unwrap();
        let mut request = add_request("Paris", "Paris", 0);
        request.image_url = Some(state.assets.public_url(&filename));
        let story = create_story(&state, &owner, request).await.unwrap();

        delete_story(&state, &owner, &story.id.to_hex()).await.unwrap();

        assert!(!dir.path().join(&filename).exists());
        assert!(list_stories(&state, &owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_image_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(dir.path());
        let owner = ObjectId::new();
        let story = create_story(&state, &owner, add_request("Paris", "Paris", 0)).await.unwrap();

        assert!(delete_story(&state, &owner, &story.id.to_hex()).await.is_ok());
        assert!(list_stories(&state, &owner).await.unwrap().is_empty());
    }
}
