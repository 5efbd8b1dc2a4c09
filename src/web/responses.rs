use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::errors::ThumbnailError;

impl IntoResponse for ThumbnailError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ThumbnailError::InvalidImage { .. } => (StatusCode::BAD_REQUEST, "INVALID_IMAGE"),
            ThumbnailError::NotFound { .. } => (StatusCode::NOT_FOUND, "THUMBNAIL_NOT_FOUND"),
            ThumbnailError::Storage { .. } => {
                tracing::error!("storage failure: {self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
