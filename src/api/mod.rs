pub mod auth;
pub mod health;
pub mod images;
pub mod stories;
pub mod swagger;

use std::path::Path;

use actix_files::Files;
use actix_web::web;

use crate::{
    middleware::AuthMiddleware,
    services::asset_service::{ASSETS_ROUTE, UPLOADS_ROUTE},
    utils::error::AppError,
};

/// Registers every API route. Everything except registration, login, the
/// image endpoints and health goes through [`AuthMiddleware`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::validation(format!("Invalid request body: {}", err)).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::validation(format!("Invalid query string: {}", err)).into()),
    )
    .route("/health", web::get().to(health::health_check))
    // Identity
    .route("/user-create", web::post().to(auth::register))
    .route("/login", web::post().to(auth::login))
    .service(
        web::resource("/get-user")
            .wrap(AuthMiddleware)
            .route(web::get().to(auth::get_user)),
    )
    // Images
    .route("/image-upload", web::post().to(images::upload_image))
    .route("/delete-image", web::delete().to(images::delete_image))
    // Stories
    .service(
        web::resource("/add-story")
            .wrap(AuthMiddleware)
            .route(web::post().to(stories::add_story)),
    )
    .service(
        web::resource("/get-all-stories")
            .wrap(AuthMiddleware)
            .route(web::get().to(stories::get_all_stories)),
    )
    .service(
        web::resource("/edit-story/{id}")
            .wrap(AuthMiddleware)
            .route(web::post().to(stories::edit_story)),
    )
    .service(
        web::resource("/delete-story/{id}")
            .wrap(AuthMiddleware)
            .route(web::delete().to(stories::delete_story)),
    )
    .service(
        web::resource("/update-isFavourite/{id}")
            .wrap(AuthMiddleware)
            .route(web::put().to(stories::update_is_favourite)),
    )
    .service(
        web::resource("/search")
            .wrap(AuthMiddleware)
            .route(web::get().to(stories::search)),
    )
    .service(
        web::resource("/travel-stories/filter")
            .wrap(AuthMiddleware)
            .route(web::get().to(stories::filter_by_date)),
    );
}

/// Read-only static serving for uploads and bundled assets. No access control.
pub fn configure_static(cfg: &mut web::ServiceConfig, upload_dir: &Path, assets_dir: &Path) {
    cfg.service(Files::new(UPLOADS_ROUTE, upload_dir))
        .service(Files::new(ASSETS_ROUTE, assets_dir));
}
