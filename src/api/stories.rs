use actix_web::{web, HttpResponse};

use crate::{
    models::{
        AddStoryRequest, DateRangeQuery, EditStoryRequest, SearchQuery, StoryEnvelope,
        StoryListResponse, TravelStory, UpdateFavouriteRequest,
    },
    services::{session_service::AuthenticatedUser, story_service},
    state::AppState,
    utils::error::AppError,
};

fn envelope(story: TravelStory, message: &str) -> StoryEnvelope {
    StoryEnvelope {
        story: story.into(),
        message: message.to_string(),
    }
}

fn list(stories: Vec<TravelStory>) -> StoryListResponse {
    StoryListResponse {
        stories: stories.into_iter().map(Into::into).collect(),
    }
}

/// POST /add-story
#[utoipa::path(
    post,
    path = "/add-story",
    tag = "Stories",
    request_body = AddStoryRequest,
    responses(
        (status = 200, description = "Story created", body = StoryEnvelope),
        (status = 400, description = "Missing or malformed fields, including a visitedDate outside the representable range"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Storage failure (reported as 500, never 400)")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_story(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    request: web::Json<AddStoryRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /add-story - user {}", user.user_id);

    let story = story_service::create_story(&state, &user.user_id, request.into_inner())
        .await
        .inspect_err(|e| log::warn!("❌ Failed to add story: {}", e))?;

    Ok(HttpResponse::Ok().json(envelope(story, "Added Successfully")))
}

/// GET /get-all-stories
#[utoipa::path(
    get,
    path = "/get-all-stories",
    tag = "Stories",
    responses(
        (status = 200, description = "Caller's stories, favourites first", body = StoryListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Storage failure (reported as 500, never 400)")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_all_stories(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /get-all-stories - user {}", user.user_id);

    let stories = story_service::list_stories(&state, &user.user_id)
        .await
        .inspect_err(|e| log::error!("❌ Failed to list stories: {}", e))?;

    Ok(HttpResponse::Ok().json(list(stories)))
}

/// POST /edit-story/{id}
#[utoipa::path(
    post,
    path = "/edit-story/{id}",
    tag = "Stories",
    params(("id" = String, Path, description = "Story id")),
    request_body = EditStoryRequest,
    responses(
        (status = 201, description = "Story updated", body = StoryEnvelope),
        (status = 400, description = "Missing or malformed fields"),
        (status = 404, description = "No such story owned by the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn edit_story(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<EditStoryRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 POST /edit-story/{} - user {}", id, user.user_id);

    let story = story_service::edit_story(&state, &user.user_id, &id, request.into_inner())
        .await
        .inspect_err(|e| log::warn!("❌ Failed to edit story {}: {}", id, e))?;

    Ok(HttpResponse::Created().json(envelope(story, "Updated Successfully")))
}

/// DELETE /delete-story/{id}
#[utoipa::path(
    delete,
    path = "/delete-story/{id}",
    tag = "Stories",
    params(("id" = String, Path, description = "Story id")),
    responses(
        (status = 201, description = "Story deleted"),
        (status = 404, description = "No such story owned by the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_story(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️  DELETE /delete-story/{} - user {}", id, user.user_id);

    story_service::delete_story(&state, &user.user_id, &id)
        .await
        .inspect_err(|e| log::warn!("❌ Failed to delete story {}: {}", id, e))?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "error": false,
        "message": "Deleted Successfully"
    })))
}

/// PUT /update-isFavourite/{id}
#[utoipa::path(
    put,
    path = "/update-isFavourite/{id}",
    tag = "Stories",
    params(("id" = String, Path, description = "Story id")),
    request_body = UpdateFavouriteRequest,
    responses(
        (status = 200, description = "Favourite flag updated", body = StoryEnvelope),
        (status = 404, description = "No such story owned by the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_is_favourite(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateFavouriteRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("⭐ PUT /update-isFavourite/{} - user {}", id, user.user_id);

    let story = story_service::set_favourite(&state, &user.user_id, &id, request.into_inner())
        .await
        .inspect_err(|e| log::warn!("❌ Failed to update favourite {}: {}", id, e))?;

    Ok(HttpResponse::Ok().json(envelope(story, "Updated Successfully")))
}

/// GET /search?query=...
#[utoipa::path(
    get,
    path = "/search",
    tag = "Stories",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching stories, favourites first", body = StoryListResponse),
        (status = 404, description = "Missing or empty query"),
        (status = 500, description = "Storage failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn search(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /search - user {}", user.user_id);

    let stories = story_service::search_stories(&state, &user.user_id, query.into_inner().query)
        .await
        .inspect_err(|e| log::warn!("❌ Search failed: {}", e))?;

    Ok(HttpResponse::Ok().json(list(stories)))
}

/// GET /travel-stories/filter?startDate=...&endDate=...
#[utoipa::path(
    get,
    path = "/travel-stories/filter",
    tag = "Stories",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Stories visited within the range, favourites first", body = StoryListResponse),
        (status = 400, description = "Missing, non-numeric or out-of-range startDate/endDate; rejected before any lookup"),
        (status = 500, description = "Storage failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn filter_by_date(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    range: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    log::info!("📅 GET /travel-stories/filter - user {}", user.user_id);

    let stories = story_service::filter_by_visited_date(&state, &user.user_id, range.into_inner())
        .await
        .inspect_err(|e| log::warn!("❌ Date filter failed: {}", e))?;

    Ok(HttpResponse::Ok().json(list(stories)))
}
