use bcrypt::{hash, verify};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::{
    models::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, User, UserProfile},
    state::AppState,
    utils::{error::AppError, present},
};

// bcrypt is CPU bound; keep it off the async workers
async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

async fn verify_password(password: String, hashed: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify(password, &hashed))
        .await
        .map_err(|e| AppError::internal(format!("Verification task failed: {}", e)))?
        .map_err(AppError::from)
}

// User registration
pub async fn register(state: &AppState, request: RegisterRequest) -> Result<AuthResponse, AppError> {
    let (Some(full_name), Some(email), Some(password)) = (
        present(request.full_name),
        present(request.email),
        present(request.password),
    ) else {
        return Err(AppError::validation("All fields are required"));
    };

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("User already exist".to_string()));
    }

    let new_user = User {
        id: ObjectId::new(),
        full_name,
        email,
        password: hash_password(password, state.bcrypt_cost).await?,
        created_on: BsonDateTime::now(),
    };

    // the unique index still rejects a racing duplicate here
    state.users.insert(&new_user).await?;

    let access_token = state.sessions.issue(&new_user.id)?;

    log::info!("✅ User registered successfully: {}", new_user.email);

    Ok(AuthResponse {
        error: false,
        user: PublicUser::from(&new_user),
        access_token,
        message: "Registration Successful".to_string(),
    })
}

// User login
pub async fn login(state: &AppState, request: LoginRequest) -> Result<AuthResponse, AppError> {
    let (Some(email), Some(password)) = (present(request.email), present(request.password)) else {
        return Err(AppError::validation("Email and Password are required!"));
    };

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::not_found("User Not found"))?;

    if !verify_password(password, user.password.clone()).await? {
        return Err(AppError::InvalidCredential("Wrong password!".to_string()));
    }

    let access_token = state.sessions.issue(&user.id)?;

    Ok(AuthResponse {
        error: false,
        user: PublicUser::from(&user),
        access_token,
        message: "Login Successful".to_string(),
    })
}

// Get current user
pub async fn get_current_user(state: &AppState, user_id: &ObjectId) -> Result<UserProfile, AppError> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| AppError::unauthenticated("User no longer exists"))
}
