//! Wire types for the subset of the Dropbox API v2 this crate talks to.
//!
//! Response types keep every field Dropbox sends: the named fields are the
//! ones the adapter reads, everything else rides along in `extra` so the
//! caller sees the provider payload unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of a listing entry (Dropbox `.tag`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryTag {
    File,
    Folder,
    Deleted,
}

/// A file or folder record returned by `files/list_folder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = ".tag")]
    pub tag: EntryTag,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_lower: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_display: Option<String>,

    /// Remaining provider fields (size, rev, client_modified, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    pub fn is_folder(&self) -> bool {
        self.tag == EntryTag::Folder
    }
}

/// An entry as handed back to the host: the raw entry plus the folder it
/// was listed from and a folder flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    #[serde(flatten)]
    pub entry: Entry,

    #[serde(rename = "parentId")]
    pub parent_id: String,

    #[serde(rename = "isFolder")]
    pub is_folder: bool,
}

impl Document {
    pub fn new(entry: Entry, parent_id: &str) -> Self {
        let is_folder = entry.is_folder();
        Self {
            entry,
            parent_id: parent_id.to_string(),
            is_folder,
        }
    }
}

/// Arguments for `files/list_folder`.
#[derive(Debug, Clone, Serialize)]
pub struct ListFolderArg {
    pub path: String,
    pub recursive: bool,
    pub include_deleted: bool,
    pub include_media_info: bool,
    pub limit: u32,
}

/// Result of `files/list_folder`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListFolderResult {
    pub entries: Vec<Entry>,
    pub cursor: String,
    pub has_more: bool,
}

/// Argument carrying a single path (`get_temporary_link`, `delete_v2`).
#[derive(Debug, Clone, Serialize)]
pub struct PathArg<'a> {
    pub path: &'a str,
}

/// Result of `files/get_temporary_link`.
#[derive(Debug, Clone, Deserialize)]
pub struct TemporaryLink {
    pub metadata: FileMetadata,
    pub link: String,
}

/// Metadata of a single file (upload result, temporary link metadata).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_lower: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_display: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Arguments for `files/upload`, sent in the `Dropbox-API-Arg` header.
#[derive(Debug, Clone, Serialize)]
pub struct UploadArg {
    pub path: String,
    pub mode: &'static str,
    pub autorename: bool,
    pub mute: bool,
}

impl UploadArg {
    pub fn add(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: "add",
            autorename: false,
            mute: false,
        }
    }
}

/// Result of `files/delete_v2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub metadata: Entry,
}

/// Result of the OAuth authorization-code exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

/// Profile of the account the access token belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub name: AccountName,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub email_verified: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountName {
    pub given_name: String,
    pub surname: String,
    pub familiar_name: String,
    pub display_name: String,
    pub abbreviated_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_keeps_unknown_fields() {
        let json = r#"{
            ".tag": "file",
            "name": "report.pdf",
            "id": "id:abc",
            "path_lower": "/docs/report.pdf",
            "path_display": "/Docs/report.pdf",
            "size": 1024,
            "rev": "015f"
        }"#;

        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.tag, EntryTag::File);
        assert_eq!(entry.extra.get("size"), Some(&Value::from(1024)));
        assert_eq!(entry.extra.get("rev"), Some(&Value::from("015f")));
    }

    #[test]
    fn test_document_serializes_flat() {
        let entry: Entry = serde_json::from_value(serde_json::json!({
            ".tag": "folder",
            "name": "Contracts",
            "path_lower": "/contracts"
        }))
        .unwrap();

        let doc = Document::new(entry, "/");
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value[".tag"], "folder");
        assert_eq!(value["name"], "Contracts");
        assert_eq!(value["parentId"], "/");
        assert_eq!(value["isFolder"], true);
        assert!(value.get("entry").is_none());
    }

    #[test]
    fn test_upload_arg_defaults_to_add() {
        let arg = UploadArg::add("/certs/a.pdf");
        let value = serde_json::to_value(&arg).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "path": "/certs/a.pdf",
                "mode": "add",
                "autorename": false,
                "mute": false
            })
        );
    }
}
