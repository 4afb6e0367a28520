//! Multipart upload handler

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use bytes::Bytes;
use dropbox::{ExportDocument, FileMetadata};

use crate::error::ApiError;
use crate::require_header::AccessToken;
use crate::AppState;

/// A file part taken from a multipart body.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub contents: Bytes,
}

/// Fields read from an upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// Target folder (`parentId` field)
    pub parent_id: Option<String>,
    /// The `file` part
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// Read `parentId`, an optional `filename` override and the `file` part.
    /// Unknown fields are skipped.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();
        let mut filename_override = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("parentId") => form.parent_id = Some(field.text().await?),
                Some("filename") => filename_override = Some(field.text().await?),
                Some("file") => {
                    let filename = field.file_name().map(base_name).unwrap_or_default().to_string();
                    let contents = field.bytes().await?;
                    form.file = Some(UploadedFile { filename, contents });
                }
                other => tracing::debug!("Ignoring multipart field {:?}", other),
            }
        }

        if let (Some(file), Some(name)) = (form.file.as_mut(), filename_override) {
            file.filename = base_name(&name).to_string();
        }

        Ok(form)
    }

    /// The file part, which must have a usable name.
    pub fn into_file(self) -> Result<(Option<String>, UploadedFile), ApiError> {
        let file = self
            .file
            .ok_or_else(|| ApiError::BadRequest("file is required".to_string()))?;
        if file.filename.is_empty() {
            return Err(ApiError::BadRequest("file name is required".to_string()));
        }
        Ok((self.parent_id, file))
    }
}

/// Handler for `POST /upload`
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    multipart: Multipart,
) -> Result<Json<FileMetadata>, ApiError> {
    let (parent_id, file) = UploadForm::read(multipart).await?.into_file()?;

    let document = ExportDocument::new(file.filename, parent_id.unwrap_or_default());
    let metadata = state
        .dropbox
        .upload_file(&token, &document, file.contents)
        .await?;
    Ok(Json(metadata))
}

/// Last component of a client-supplied file name.
fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name).trim()
}
