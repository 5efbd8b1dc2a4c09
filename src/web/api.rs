use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::ThumbnailError;
use crate::models::{InputImage, UploadThumbnailsResponse};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ThumbnailQuery {
    /// Comma-separated preset names, e.g. `presets=small,large`
    pub presets: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// `POST /thumbnails` — multipart upload of one or more `files` parts.
pub async fn upload_thumbnails(
    State(state): State<AppState>,
    Query(params): Query<ThumbnailQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadThumbnailsResponse>), ThumbnailError> {
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ThumbnailError::invalid_image(format!("malformed multipart upload: {e}"))
    })? {
        if field.name() != Some("files") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(|e| {
            ThumbnailError::invalid_image(format!("failed to read upload {filename}: {e}"))
        })?;

        images.push(InputImage {
            filename,
            data: data.to_vec(),
            content_type,
        });
    }

    let presets = params.presets.map(|list| {
        list.split(',')
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
    });

    let response = state
        .thumbnail_service
        .generate_thumbnails(images, presets, params.width, params.height)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /thumbnails/:id` — raw bytes with the stored content-type.
pub async fn get_thumbnail(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<(HeaderMap, Vec<u8>), ThumbnailError> {
    let (data, content_type) = state.thumbnail_service.get_thumbnail_content(&id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        content_type
            .parse()
            .unwrap_or_else(|_| "application/octet-stream".parse().unwrap()),
    );
    headers.insert(
        header::CACHE_CONTROL,
        "public, max-age=86400".parse().unwrap(),
    );

    Ok((headers, data))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "thumbnail-service"
    }))
}
