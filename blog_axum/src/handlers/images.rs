//! Image upload/delete for admins and the public read-through proxy

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartRejection},
    http::header,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::{Value, json};

use blog_core::{ImageInfo, ImageUpload};

use crate::error::ApiError;
use crate::state::AppState;

/// Upper bound on an uploaded image
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Images are content-addressed by id, so proxied copies never go stale.
const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

pub(crate) fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/images",
            post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/images/{id}", delete(remove))
}

pub(crate) fn public_router() -> Router<AppState> {
    Router::new().route("/images/{*path}", get(proxy))
}

async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImageInfo>, ApiError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation("File name is required".to_string()))?;
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::Validation(format!(
                "Unsupported file type: {content_type}"
            )));
        }

        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::Validation("File is empty".to_string()));
        }

        let info = state
            .cms
            .upload_image(ImageUpload {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            })
            .await?;
        tracing::info!("Uploaded image {} ({} bytes)", info.id, info.size);
        return Ok(Json(info));
    }

    Err(ApiError::Validation("No file provided".to_string()))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.cms.delete_image(&id).await?;
    tracing::info!("Deleted image {}", id);
    Ok(Json(json!({ "success": true })))
}

async fn proxy(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state.cms.fetch_image(&path).await?;
    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
        ],
        image.bytes,
    ))
}
