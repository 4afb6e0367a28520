//! PDF signing handler

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use dropbox::{ExportDocument, FileMetadata};
use serde::Serialize;

use super::upload::UploadForm;
use crate::certificate::{is_pdf, Certificate};
use crate::error::ApiError;
use crate::require_header::AccessToken;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SignResponse {
    pub certificate: Certificate,

    /// Present when a `parentId` was given and the PDF was stored in Dropbox
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded: Option<FileMetadata>,
}

/// Handler for `POST /sign-pdf`
///
/// Issues a certificate for the uploaded PDF. When the form names a
/// `parentId`, the PDF is also uploaded to that Dropbox folder.
pub async fn sign_pdf(
    State(state): State<Arc<AppState>>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    multipart: Multipart,
) -> Result<Json<SignResponse>, ApiError> {
    let (parent_id, file) = UploadForm::read(multipart).await?.into_file()?;

    if !is_pdf(&file.contents) {
        return Err(ApiError::BadRequest(format!("{} is not a PDF", file.filename)));
    }

    let certificate = state.signer.sign(&file.filename, &file.contents);
    tracing::info!("Signed {} (sha256 {})", certificate.filename, certificate.sha256);

    let uploaded = match parent_id.filter(|p| !p.is_empty()) {
        Some(folder) => {
            let document = ExportDocument::new(file.filename, folder);
            Some(state.dropbox.upload_file(&token, &document, file.contents).await?)
        }
        None => None,
    };

    Ok(Json(SignResponse {
        certificate,
        uploaded,
    }))
}
