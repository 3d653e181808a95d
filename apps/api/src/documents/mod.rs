//! Document naming, filename validation, and the generated-document index.
//!
//! A document filename is derived from the product title: characters other
//! than alphanumerics, underscore, whitespace, and hyphen are dropped, runs
//! of whitespace/hyphens collapse to a single `_`, and `.docx` is appended.
//! The reverse mapping is lossy for exotic titles, so lookups from a
//! filename go through `document_filename` on the stored titles instead of
//! trusting the naive underscore-to-space inverse.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod handlers;

pub const DOCUMENT_EXTENSION: &str = ".docx";
pub const DOCUMENT_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Derives the document filename for a product title.
pub fn document_filename(title: &str) -> String {
    let mut cleaned = String::with_capacity(title.len());
    let mut pending_sep = false;
    for c in title.chars() {
        if c.is_whitespace() || c == '-' {
            pending_sep = true;
        } else if c.is_alphanumeric() || c == '_' {
            if pending_sep && !cleaned.is_empty() {
                cleaned.push('_');
            }
            pending_sep = false;
            cleaned.push(c);
        }
        // anything else (dots, slashes, punctuation) is dropped
    }
    format!("{}{}", cleaned.trim_matches('_'), DOCUMENT_EXTENSION)
}

/// Naive inverse of `document_filename`: extension stripped, underscores
/// back to spaces. Good enough for display names; record lookups should
/// compare cleaned titles instead.
pub fn title_from_filename(filename: &str) -> String {
    filename
        .strip_suffix(DOCUMENT_EXTENSION)
        .unwrap_or(filename)
        .replace('_', " ")
}

/// The sole path-traversal defense, applied identically everywhere a
/// filename is accepted: the input must equal its own basename and end in
/// the document extension.
pub fn is_valid_document_filename(input: &str) -> bool {
    if input == DOCUMENT_EXTENSION || !input.ends_with(DOCUMENT_EXTENSION) {
        return false;
    }
    matches!(
        Path::new(input).file_name().and_then(|n| n.to_str()),
        Some(name) if name == input
    )
}

/// One generated document as reported by the index.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
    /// Filename with the extension stripped and underscores back to spaces.
    pub name: String,
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Lists generated documents, most recently modified first. Hidden files
/// and files without the document extension are skipped; a missing
/// directory is an empty index.
pub fn list_documents(dir: &Path) -> std::io::Result<Vec<DocumentDescriptor>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry?;
        let filename = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        if filename.starts_with('.') || !filename.ends_with(DOCUMENT_EXTENSION) {
            continue;
        }
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        documents.push(DocumentDescriptor {
            name: title_from_filename(&filename),
            filename,
            size: metadata.len(),
            last_modified: DateTime::<Utc>::from(metadata.modified()?),
        });
    }

    documents.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_document_filename_replaces_spaces_with_underscores() {
        assert_eq!(document_filename("California Poppy"), "California_Poppy.docx");
    }

    #[test]
    fn test_document_filename_drops_punctuation_and_collapses_runs() {
        assert_eq!(document_filename("St. John's Wort"), "St_Johns_Wort.docx");
        assert_eq!(document_filename("Dry - Meadow  Mix"), "Dry_Meadow_Mix.docx");
        assert_eq!(document_filename(" Arroyo Lupine "), "Arroyo_Lupine.docx");
    }

    #[test]
    fn test_title_from_filename_round_trips_simple_titles() {
        assert_eq!(title_from_filename("California_Poppy.docx"), "California Poppy");
        let title = "Arroyo Lupine";
        assert_eq!(title_from_filename(&document_filename(title)), title);
    }

    #[test]
    fn test_filename_validation() {
        assert!(is_valid_document_filename("Arroyo_Lupine.docx"));
        assert!(!is_valid_document_filename("../secret.docx"));
        assert!(!is_valid_document_filename("a/b.docx"));
        assert!(!is_valid_document_filename("report.txt"));
        assert!(!is_valid_document_filename(".docx"));
        assert!(!is_valid_document_filename(""));
    }

    #[test]
    fn test_list_documents_skips_hidden_and_foreign_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("California_Poppy.docx"), b"doc").unwrap();
        std::fs::write(dir.path().join(".hidden.docx"), b"doc").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"text").unwrap();

        let docs = list_documents(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].filename, "California_Poppy.docx");
        assert_eq!(docs[0].name, "California Poppy");
        assert_eq!(docs[0].size, 3);
    }

    #[test]
    fn test_list_documents_sorts_most_recent_first() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Older.docx"), b"doc").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));
        std::fs::write(dir.path().join("Newer.docx"), b"doc").unwrap();

        let docs = list_documents(dir.path()).unwrap();
        assert_eq!(docs[0].filename, "Newer.docx");
        assert_eq!(docs[1].filename, "Older.docx");
    }

    #[test]
    fn test_missing_directory_is_empty_index() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(list_documents(&missing).unwrap().is_empty());
    }
}
