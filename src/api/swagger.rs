use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Travel Journal API",
        version = "1.0.0",
        description = "Backend for a personal travel journal.\n\n**Authentication:** story and profile endpoints require a JWT Bearer token obtained from `/user-create` or `/login`. Tokens are valid for 72 hours.\n\n**Errors:** failures are returned as `{\"error\": true, \"message\": \"...\"}`."
    ),
    paths(
        // Auth
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::get_user,

        // Images
        crate::api::images::upload_image,
        crate::api::images::delete_image,

        // Stories
        crate::api::stories::add_story,
        crate::api::stories::get_all_stories,
        crate::api::stories::edit_story,
        crate::api::stories::delete_story,
        crate::api::stories::update_is_favourite,
        crate::api::stories::search,
        crate::api::stories::filter_by_date,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::PublicUser,
            crate::models::AuthResponse,
            crate::models::UserProfile,
            crate::models::AddStoryRequest,
            crate::models::EditStoryRequest,
            crate::models::UpdateFavouriteRequest,
            crate::models::TravelStoryResponse,
            crate::models::StoryEnvelope,
            crate::models::StoryListResponse,
            crate::api::images::ImageUploadResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and the current account."),
        (name = "Images", description = "Image upload and removal. Uploaded files are served from /uploads."),
        (name = "Stories", description = "Travel stories, always scoped to the authenticated account."),
        (name = "Health", description = "Readiness of the story database and upload directory."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /login or /user-create"))
                        .build()
                ),
            );
        }
    }
}
