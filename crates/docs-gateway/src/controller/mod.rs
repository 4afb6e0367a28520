//! Route handlers
//!
//! Handlers behind the token gate read the caller's token from the
//! `AccessToken` request extension.

pub mod auth;
pub mod documents;
pub mod sign;
pub mod upload;

use axum::{
    extract::{FromRequest, FromRequestParts},
    Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;

/// JSON request body; malformed bodies are answered as an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query string; missing or malformed fields are answered as an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Handler for `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
