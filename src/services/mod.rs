pub mod asset_service;
pub mod auth_service;
pub mod session_service;
pub mod story_service;
