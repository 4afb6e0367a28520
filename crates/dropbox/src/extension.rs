//! File extension helpers used by listing filters.

use crate::types::Document;

/// Extension of a file name: the text after the last `.`.
///
/// Dotfiles (`.bashrc`) and names ending in a dot have no extension.
pub fn file_extension(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// Whether `name` carries the extension `ext` (leading dot optional,
/// ASCII case-insensitive).
pub fn has_extension(name: &str, ext: &str) -> bool {
    let wanted = ext.strip_prefix('.').unwrap_or(ext);
    file_extension(name).is_some_and(|actual| actual.eq_ignore_ascii_case(wanted))
}

/// Keep folders, and files whose extension matches `ext`.
pub fn filter_by_extension(documents: Vec<Document>, ext: &str) -> Vec<Document> {
    documents
        .into_iter()
        .filter(|doc| doc.is_folder || has_extension(&doc.entry.name, ext))
        .collect()
}
