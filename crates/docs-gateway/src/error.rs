//! HTTP error responses.

use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use dropbox::DropboxError;
use serde::Serialize;
use thiserror::Error;

/// Error body used for every locally generated failure
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dropbox(#[from] DropboxError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Invalid JSON body: {0}")]
    JsonBody(#[from] JsonRejection),

    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Provider answers are replayed as-is
            ApiError::Dropbox(DropboxError::Api { status, body }) => {
                let status =
                    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
                let content_type = if serde_json::from_str::<serde_json::Value>(&body).is_ok() {
                    "application/json"
                } else {
                    "text/plain; charset=utf-8"
                };
                (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
            }
            ApiError::Dropbox(e) => {
                tracing::warn!("Dropbox request failed: {}", e);
                (StatusCode::BAD_GATEWAY, Json(ErrorBody::new(e.to_string()))).into_response()
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message))).into_response()
            }
            ApiError::Multipart(e) => {
                (e.status(), Json(ErrorBody::new(e.body_text()))).into_response()
            }
            ApiError::JsonBody(e) => {
                (e.status(), Json(ErrorBody::new(e.body_text()))).into_response()
            }
            ApiError::Query(e) => {
                (e.status(), Json(ErrorBody::new(e.body_text()))).into_response()
            }
        }
    }
}
