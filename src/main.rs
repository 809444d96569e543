mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod state;
mod utils;

use std::io;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppConfig, state::AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Travel Journal API...");

    let db = database::MongoDB::new(&config.mongo_uri, &config.mongo_database)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            io::Error::other(e.to_string())
        })?;

    log::info!("✅ MongoDB connected: {}", db.database().name());

    let state = AppState::new(&config, &db);
    state.assets.ensure_dir().await?;
    log::info!("📁 Uploads stored in {}", state.assets.upload_dir().display());

    let state = web::Data::new(state);
    let bind_address = config.bind_address();

    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);
    log::info!("📄 OpenAPI spec at: http://{}/api-docs/openapi.json", bind_address);

    let server_config = config.clone();
    HttpServer::new(move || {
        let cors = match server_config.cors_allowed_origin.as_deref() {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        }
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::CONTENT_TYPE])
        .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();
        let upload_dir = server_config.upload_dir.clone();
        let assets_dir = server_config.assets_dir.clone();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure)
            .configure(move |cfg| api::configure_static(cfg, &upload_dir, &assets_dir))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    log::info!("👋 Server stopped, closing MongoDB connection");
    db.shutdown().await;
    Ok(())
}
