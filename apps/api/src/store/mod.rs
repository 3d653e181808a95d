//! Product store — one pretty-printed JSON array file holding every record,
//! oldest-appended first. `Title` is the logical key; the store itself stays
//! permissive about duplicates (callers check before generating).
//!
//! Single logical writer assumed; there is no locking. Writes go through a
//! temp file in the same directory and a rename so a crash mid-write cannot
//! leave a half-written array behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

use crate::models::product::ProductRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file {path} is not a valid product array: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ProductStore {
    path: PathBuf,
}

impl ProductStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full array in file (insertion) order. A missing file is an empty store.
    pub fn list_all(&self) -> Result<Vec<ProductRecord>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Appends one record to the end of the array.
    pub fn append(&self, record: ProductRecord) -> Result<(), StoreError> {
        let mut records = self.list_all()?;
        records.push(record);
        self.write(&records)?;
        info!("store now holds {} products", records.len());
        Ok(())
    }

    /// Removes every record whose `Title` matches case-insensitively.
    /// Returns whether anything was removed; calling again with no
    /// intervening append reports `false` and leaves the file untouched.
    pub fn remove_by_title(&self, title: &str) -> Result<bool, StoreError> {
        let mut records = self.list_all()?;
        let before = records.len();
        records.retain(|r| !r.title.eq_ignore_ascii_case(title));
        if records.len() == before {
            return Ok(false);
        }
        self.write(&records)?;
        Ok(true)
    }

    /// Case-insensitive lookup by title. First match wins when duplicates
    /// exist.
    pub fn find_by_title(&self, title: &str) -> Result<Option<ProductRecord>, StoreError> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|r| r.title.eq_ignore_ascii_case(title)))
    }

    fn write(&self, records: &[ProductRecord]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = dir {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        let pretty =
            serde_json::to_vec_pretty(records).map_err(|e| StoreError::Malformed {
                path: self.path.clone(),
                source: e,
            })?;

        // Temp file in the target directory so the final persist is a
        // same-filesystem rename.
        let mut tmp = NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
            .map_err(io_err)?;
        tmp.write_all(&pretty).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e.error,
        })?;
        Ok(())
    }
}
