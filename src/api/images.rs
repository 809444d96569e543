use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::{state::AppState, utils::error::AppError};

/// Multipart field carrying the uploaded file.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub image_url: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImageQuery {
    pub image_url: Option<String>,
}

/// POST /image-upload - stores the `image` field and returns its public URL
#[utoipa::path(
    post,
    path = "/image-upload",
    tag = "Images",
    request_body(content_type = "multipart/form-data", description = "File in the `image` field"),
    responses(
        (status = 201, description = "Image stored", body = ImageUploadResponse),
        (status = 400, description = "No image uploaded")
    )
)]
pub async fn upload_image(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    log::info!("🖼️  POST /image-upload");

    let limit = state.assets.max_bytes();

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| AppError::validation(format!("Invalid multipart payload: {}", e)))?;

        if field.name() != Some(IMAGE_FIELD) {
            // drain fields we do not care about
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| AppError::validation(format!("Invalid multipart payload: {}", e)))?;
            }
            continue;
        }

        let original_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::validation(format!("Invalid multipart payload: {}", e)))?;
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::validation("Image exceeds maximum upload size"));
            }
            bytes.extend_from_slice(&chunk);
        }

        let filename = state.assets.save(original_name.as_deref(), &bytes).await?;

        return Ok(HttpResponse::Created().json(ImageUploadResponse {
            image_url: state.assets.public_url(&filename),
        }));
    }

    log::warn!("❌ Upload request without an '{}' field", IMAGE_FIELD);
    Err(AppError::validation("No image Uploaded"))
}

/// DELETE /delete-image?imageUrl=... - removes a previously uploaded file
#[utoipa::path(
    delete,
    path = "/delete-image",
    tag = "Images",
    params(DeleteImageQuery),
    responses(
        (status = 200, description = "Deleted, or `error: true` when the file does not exist"),
        (status = 400, description = "Missing imageUrl parameter")
    )
)]
pub async fn delete_image(
    state: web::Data<AppState>,
    query: web::Query<DeleteImageQuery>,
) -> Result<HttpResponse, AppError> {
    let image_url = query
        .into_inner()
        .image_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::validation("imageUrl parameter is required"))?;

    log::info!("🗑️  DELETE /delete-image - {}", image_url);

    let removed = state
        .assets
        .remove_by_url(&image_url)
        .await
        .inspect_err(|e| log::error!("❌ Failed to delete image {}: {}", image_url, e))?;

    if removed {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Image deleted successfully"
        })))
    } else {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "error": true,
            "message": "Image not found"
        })))
    }
}
