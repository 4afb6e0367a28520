//! Thin Dropbox API v2 client and the document service built on it.
//!
//! - [`DropboxService`]: host-facing adapter (token exchange, listings,
//!   download, upload, delete)
//! - [`DropboxClient`]: per-call client bound to one access token
//! - [`types`]: wire types, passed through to callers mostly verbatim

pub mod client;
pub mod error;
pub mod extension;
pub mod oauth;
pub mod service;
pub mod types;

pub use client::{DropboxClient, Endpoints};
pub use error::{DropboxError, Result};
pub use oauth::OAuthApp;
pub use service::{DownloadedDocument, DropboxService, ExportDocument, SourceData, LIST_FOLDER_LIMIT};
pub use types::{Account, DeleteResult, Document, Entry, EntryTag, FileMetadata, TokenResponse};
