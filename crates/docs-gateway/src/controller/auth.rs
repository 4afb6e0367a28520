//! OAuth and account handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use dropbox::{Account, TokenResponse};
use serde::Deserialize;

use super::JsonBody;
use crate::error::ApiError;
use crate::require_header::AccessToken;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    /// Authorization code returned to the redirect URI
    pub code: String,

    /// Redirect URI used to obtain the code (falls back to the configured one)
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

/// Handler for `POST /auth`
pub async fn authorize_user(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<AuthorizeRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let redirect_uri = request
        .redirect_uri
        .as_deref()
        .or(state.config.dropbox.redirect_uri.as_deref())
        .ok_or_else(|| ApiError::BadRequest("redirectUri is required".to_string()))?;

    let token = state.dropbox.get_token(&request.code, redirect_uri).await?;
    Ok(Json(token))
}

/// Handler for `GET /me`
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(AccessToken(token)): Extension<AccessToken>,
) -> Result<Json<Account>, ApiError> {
    let account = state.dropbox.get_current_user(&token).await?;
    Ok(Json(account))
}
