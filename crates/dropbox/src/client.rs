//! Minimal Dropbox API v2 HTTP client.
//!
//! A `DropboxClient` is bound to one access token and is meant to live for
//! a single call. The underlying `reqwest::Client` is shared, so building
//! one is cheap.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DropboxError, Result};
use crate::types::{
    Account, DeleteResult, FileMetadata, ListFolderArg, ListFolderResult, PathArg,
    TemporaryLink, UploadArg,
};

/// Default host for RPC-style endpoints
pub const DEFAULT_API_URL: &str = "https://api.dropboxapi.com";

/// Default host for content upload/download endpoints
pub const DEFAULT_CONTENT_URL: &str = "https://content.dropboxapi.com";

const API_ARG_HEADER: &str = "Dropbox-API-Arg";

/// Base URLs of the Dropbox hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// RPC host (`/2/...` and `/oauth2/token`)
    pub api: String,
    /// Content host (`/2/files/upload`)
    pub content: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api: DEFAULT_API_URL.to_string(),
            content: DEFAULT_CONTENT_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point both hosts at one base URL (used against mock servers).
    pub fn single(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            api: base_url.clone(),
            content: base_url,
        }
    }

    fn rpc_url(&self, route: &str) -> String {
        format!("{}/2/{}", self.api.trim_end_matches('/'), route)
    }

    fn content_url(&self, route: &str) -> String {
        format!("{}/2/{}", self.content.trim_end_matches('/'), route)
    }

    pub(crate) fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.api.trim_end_matches('/'))
    }
}

/// Client bound to a single access token.
pub struct DropboxClient {
    http: reqwest::Client,
    endpoints: Arc<Endpoints>,
    access_token: String,
}

impl DropboxClient {
    pub fn new(http: reqwest::Client, endpoints: Arc<Endpoints>, access_token: &str) -> Self {
        Self {
            http,
            endpoints,
            access_token: access_token.to_string(),
        }
    }

    /// `users/get_current_account`
    pub async fn get_current_account(&self) -> Result<Account> {
        self.rpc_without_arg("users/get_current_account").await
    }

    /// `files/list_folder`
    pub async fn list_folder(&self, arg: &ListFolderArg) -> Result<ListFolderResult> {
        self.rpc("files/list_folder", arg).await
    }

    /// `files/get_temporary_link`
    pub async fn get_temporary_link(&self, path: &str) -> Result<TemporaryLink> {
        self.rpc("files/get_temporary_link", &PathArg { path }).await
    }

    /// `files/delete_v2`
    pub async fn delete(&self, path: &str) -> Result<DeleteResult> {
        self.rpc("files/delete_v2", &PathArg { path }).await
    }

    /// `files/upload` (single request, content host)
    pub async fn upload(&self, arg: &UploadArg, contents: Bytes) -> Result<FileMetadata> {
        let url = self.endpoints.content_url("files/upload");
        tracing::debug!("Dropbox upload: {} bytes to {}", contents.len(), arg.path);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .header(API_ARG_HEADER, header_safe_json(arg)?)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(contents)
            .send()
            .await?;

        decode(response).await
    }

    /// Fetch a temporary link and buffer the whole body.
    pub async fn download_link(&self, link: &str) -> Result<Bytes> {
        let response = self.http.get(link).send().await?;
        let response = ensure_success(response).await?;
        let buffer = buffer_stream(response.bytes_stream()).await?;
        Ok(buffer)
    }

    async fn rpc<A, R>(&self, route: &str, arg: &A) -> Result<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!("Dropbox RPC: {}", route);
        let response = self
            .http
            .post(self.endpoints.rpc_url(route))
            .bearer_auth(&self.access_token)
            .json(arg)
            .send()
            .await?;

        decode(response).await
    }

    /// RPC endpoints that take no argument must be called without a body.
    async fn rpc_without_arg<R: DeserializeOwned>(&self, route: &str) -> Result<R> {
        tracing::debug!("Dropbox RPC: {}", route);
        let response = self
            .http
            .post(self.endpoints.rpc_url(route))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        decode(response).await
    }
}

/// Turn a non-success response into `DropboxError::Api`, keeping the body.
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Failed to read Dropbox {} error body: {}", status, e);
            String::new()
        }
    };
    tracing::debug!("Dropbox returned {}: {}", status, body);
    Err(DropboxError::Api { status, body })
}

pub(crate) async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
    let response = ensure_success(response).await?;
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Collect a byte stream into one contiguous buffer.
pub async fn buffer_stream<S, E>(stream: S) -> std::result::Result<Bytes, E>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
{
    let mut stream = std::pin::pin!(stream);
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer.freeze())
}

/// JSON for the `Dropbox-API-Arg` header. Header values must be ASCII, so
/// anything outside it is written as a `\uXXXX` escape.
fn header_safe_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    Ok(out)
}
