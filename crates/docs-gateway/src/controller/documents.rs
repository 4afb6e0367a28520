//! Listing, registration, certificate save and delete handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use base64::Engine;
use bytes::Bytes;
use dropbox::{DeleteResult, Document, ExportDocument, FileMetadata};
use serde::Deserialize;

use super::{JsonBody, QueryParams};
use crate::certificate::Registration;
use crate::error::ApiError;
use crate::require_header::AccessToken;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsQuery {
    /// Folder to list (empty for the root)
    #[serde(default)]
    pub parent_id: String,

    /// Only keep files with this extension (folders are always kept)
    #[serde(default)]
    pub ext: Option<String>,
}

/// Handler for `GET /docs`
pub async fn get_documents(
    State(state): State<Arc<AppState>>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    QueryParams(query): QueryParams<DocumentsQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = state
        .dropbox
        .get_documents(&token, &query.parent_id, query.ext.as_deref())
        .await?;
    Ok(Json(documents))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Dropbox path or `id:` of the document
    pub file_id: String,

    /// Display name (defaults to the Dropbox file name)
    #[serde(default)]
    pub name: Option<String>,
}

/// Handler for `POST /register`
pub async fn register_document(
    State(state): State<Arc<AppState>>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<Json<Registration>, ApiError> {
    if request.file_id.is_empty() {
        return Err(ApiError::BadRequest("fileId is required".to_string()));
    }

    let download = state.dropbox.download_document(&token, &request.file_id).await?;
    let name = request
        .name
        .filter(|n| !n.is_empty())
        .or_else(|| Some(download.metadata.name).filter(|n| !n.is_empty()))
        .unwrap_or_else(|| last_segment(&request.file_id).to_string());

    let registration = Registration::new(&request.file_id, &name, &download.contents);
    tracing::info!(
        "Registered {} ({} bytes, sha256 {})",
        registration.name,
        registration.size,
        registration.sha256
    );
    Ok(Json(registration))
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(flatten)]
    pub document: ExportDocument,

    /// Certificate file contents, base64-encoded
    pub certificate: String,
}

/// Handler for `POST /save`
pub async fn save_document(
    State(state): State<Arc<AppState>>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    JsonBody(request): JsonBody<SaveRequest>,
) -> Result<Json<FileMetadata>, ApiError> {
    if request.document.filename.is_empty() {
        return Err(ApiError::BadRequest("filename is required".to_string()));
    }

    let contents = base64::engine::general_purpose::STANDARD
        .decode(request.certificate.trim())
        .map_err(|e| ApiError::BadRequest(format!("certificate is not valid base64: {}", e)))?;

    let metadata = state
        .dropbox
        .upload_file(&token, &request.document, Bytes::from(contents))
        .await?;
    Ok(Json(metadata))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    pub file_id: String,
}

/// Handler for `DELETE /docs`
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    QueryParams(query): QueryParams<DeleteQuery>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = state.dropbox.delete_file(&token, &query.file_id).await?;
    Ok(Json(result))
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
