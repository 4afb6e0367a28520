//! Document service over the Dropbox API.
//!
//! Translates host-level calls (list documents, download, upload a
//! certificate, ...) into Dropbox requests. Every call builds a client bound
//! to the caller's access token; provider errors are returned untouched.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::client::{DropboxClient, Endpoints};
use crate::error::Result;
use crate::extension::filter_by_extension;
use crate::oauth::OAuthApp;
use crate::types::{
    Account, DeleteResult, Document, FileMetadata, ListFolderArg, TokenResponse, UploadArg,
};

/// Page size passed to `files/list_folder`. Listings are not paginated.
pub const LIST_FOLDER_LIMIT: u32 = 2000;

const USER_AGENT: &str = concat!("dropbox-docs/", env!("CARGO_PKG_VERSION"));

/// A document the host wants written back to Dropbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub filename: String,

    #[serde(rename = "sourceData", default)]
    pub source_data: SourceData,
}

/// Where an exported document came from. Older records carry the folder as
/// `parent_id`, newer ones as `parentId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceData {
    #[serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(rename = "parent_id", default, skip_serializing_if = "Option::is_none")]
    pub legacy_parent_id: Option<String>,
}

impl SourceData {
    /// The target folder: `parentId` if set, else `parent_id`, else root.
    pub fn folder(&self) -> &str {
        [&self.parent_id, &self.legacy_parent_id]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

impl ExportDocument {
    pub fn new(filename: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            source_data: SourceData {
                parent_id: Some(folder.into()),
                legacy_parent_id: None,
            },
        }
    }

    /// Dropbox path the document is uploaded to: `<folder>/<filename>`.
    pub fn upload_path(&self) -> String {
        let folder = self.source_data.folder().trim_end_matches('/');
        format!("{}/{}", folder, self.filename)
    }
}

/// A downloaded file and the metadata Dropbox reported for it.
#[derive(Debug, Clone)]
pub struct DownloadedDocument {
    pub metadata: FileMetadata,
    pub contents: Bytes,
}

/// Adapter between the host application and Dropbox.
pub struct DropboxService {
    oauth: OAuthApp,
    http: reqwest::Client,
    endpoints: Arc<Endpoints>,
}

impl DropboxService {
    /// Create a service for the given app credentials and Dropbox hosts.
    pub fn new(oauth: OAuthApp, endpoints: Endpoints) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_http_client(oauth, endpoints, http))
    }

    /// Create a service around an existing `reqwest::Client`.
    pub fn with_http_client(oauth: OAuthApp, endpoints: Endpoints, http: reqwest::Client) -> Self {
        Self {
            oauth,
            http,
            endpoints: Arc::new(endpoints),
        }
    }

    fn client(&self, access_token: &str) -> DropboxClient {
        DropboxClient::new(self.http.clone(), self.endpoints.clone(), access_token)
    }

    /// Exchange an OAuth authorization code for an access token.
    pub async fn get_token(&self, code: &str, redirect_uri: &str) -> Result<TokenResponse> {
        self.oauth
            .exchange_code(&self.http, &self.endpoints, code, redirect_uri)
            .await
    }

    /// Profile of the account owning `access_token`.
    pub async fn get_current_user(&self, access_token: &str) -> Result<Account> {
        self.client(access_token).get_current_account().await
    }

    /// List the entries directly under `parent_id` (`""` is the root).
    ///
    /// With `ext`, files whose extension differs are dropped; folders are
    /// always kept so the caller can keep browsing.
    pub async fn get_documents(
        &self,
        access_token: &str,
        parent_id: &str,
        ext: Option<&str>,
    ) -> Result<Vec<Document>> {
        let arg = ListFolderArg {
            path: parent_id.to_string(),
            recursive: false,
            include_deleted: false,
            include_media_info: false,
            limit: LIST_FOLDER_LIMIT,
        };

        let listing = self.client(access_token).list_folder(&arg).await?;
        if listing.has_more {
            tracing::debug!(
                "Listing of '{}' truncated at {} entries",
                parent_id,
                listing.entries.len()
            );
        }

        let documents: Vec<Document> = listing
            .entries
            .into_iter()
            .map(|entry| Document::new(entry, parent_id))
            .collect();

        Ok(match ext.filter(|e| !e.is_empty()) {
            Some(ext) => filter_by_extension(documents, ext),
            None => documents,
        })
    }

    /// Download a file into memory via a temporary link.
    pub async fn download_document(
        &self,
        access_token: &str,
        file_id: &str,
    ) -> Result<DownloadedDocument> {
        let client = self.client(access_token);
        let link = client.get_temporary_link(file_id).await?;
        let contents = client.download_link(&link.link).await?;

        tracing::debug!("Downloaded {} ({} bytes)", link.metadata.name, contents.len());
        Ok(DownloadedDocument {
            metadata: link.metadata,
            contents,
        })
    }

    /// Upload `contents` to `<folder>/<filename>` of the exported document.
    pub async fn upload_file(
        &self,
        access_token: &str,
        document: &ExportDocument,
        contents: Bytes,
    ) -> Result<FileMetadata> {
        let arg = UploadArg::add(document.upload_path());
        let metadata = self.client(access_token).upload(&arg, contents).await?;

        tracing::info!(
            "Uploaded {} to Dropbox",
            metadata.path_display.as_deref().unwrap_or(&metadata.name)
        );
        Ok(metadata)
    }

    /// Delete a file (or folder) by path or id.
    pub async fn delete_file(&self, access_token: &str, file_id: &str) -> Result<DeleteResult> {
        let result = self.client(access_token).delete(file_id).await?;
        tracing::info!("Deleted {} from Dropbox", result.metadata.name);
        Ok(result)
    }
}
