use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Readiness of the journal's two backing stores.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` when both stores are reachable, `degraded` otherwise.
    pub status: String,
    pub database: bool,
    pub uploads: bool,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Story database and upload directory reachable", body = HealthResponse),
        (status = 503, description = "A backing store is unavailable", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = match state.stories.ping().await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("⚠️  Health check: story database unreachable: {}", e);
            false
        }
    };

    let uploads = tokio::fs::metadata(state.assets.upload_dir())
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if !uploads {
        log::warn!("⚠️  Health check: upload directory {} missing", state.assets.upload_dir().display());
    }

    let healthy = database && uploads;
    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        database,
        uploads,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
