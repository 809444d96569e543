use actix_web::{web, HttpResponse};

use crate::{
    models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile},
    services::{auth_service, session_service::AuthenticatedUser},
    state::AppState,
    utils::error::AppError,
};

#[utoipa::path(
    post,
    path = "/user-create",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Missing fields or user already exists")
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.clone().unwrap_or_else(|| "N/A".to_string());
    log::info!("📝 POST /user-create - email: {}", email);

    let response = auth_service::register(&state, request.into_inner())
        .await
        .inspect_err(|e| log::warn!("❌ Registration failed: {} - {}", email, e))?;

    Ok(HttpResponse::Created().json(response))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing fields or wrong password"),
        (status = 404, description = "No account with this email")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.clone().unwrap_or_else(|| "N/A".to_string());
    log::info!("🔐 POST /login - email: {}", email);

    let response = auth_service::login(&state, request.into_inner())
        .await
        .inspect_err(|e| log::warn!("❌ Login failed: {} - {}", email, e))?;

    log::info!("✅ Login successful: {}", email);
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    get,
    path = "/get-user",
    tag = "Auth",
    responses(
        (status = 200, description = "User information retrieved", body = UserProfile),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /get-user - user {}", user.user_id);

    let profile = auth_service::get_current_user(&state, &user.user_id)
        .await
        .inspect_err(|e| log::warn!("❌ Failed to get user {}: {}", user.user_id, e))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user": profile,
        "message": "User details retrieved successfully"
    })))
}
