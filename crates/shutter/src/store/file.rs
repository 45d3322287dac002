//! A gallery store backed by a single TOML or JSON file.

use std::path::{Path, PathBuf};

use shutter_core::logging::targets;

use super::records::GalleryRecord;
use super::{GalleryReader, GalleryWriter, atomic_write};
use crate::error::{StoreError, StoreResult};

/// Document format of a [`FileStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    /// TOML document.
    Toml,
    /// JSON document.
    Json,
}

impl StoreFormat {
    /// Guess the format from a file extension. Anything other than `.json`
    /// is treated as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Reads and writes a [`GalleryRecord`] at a fixed path.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    format: StoreFormat,
}

impl FileStore {
    /// Create a store with an explicit format.
    pub fn new(path: impl Into<PathBuf>, format: StoreFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Create a TOML store.
    pub fn toml(path: impl Into<PathBuf>) -> Self {
        Self::new(path, StoreFormat::Toml)
    }

    /// Create a JSON store.
    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(path, StoreFormat::Json)
    }

    /// Create a store whose format is chosen by file extension.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = StoreFormat::from_path(&path);
        Self { path, format }
    }

    /// Location of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Document format.
    pub fn format(&self) -> StoreFormat {
        self.format
    }

    /// Returns `true` if the store file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl GalleryReader for FileStore {
    fn read(&self) -> StoreResult<GalleryRecord> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let record: GalleryRecord = match self.format {
            StoreFormat::Toml => {
                toml::from_str(&content).map_err(|e| StoreError::Parse(e.to_string()))?
            }
            StoreFormat::Json => {
                serde_json::from_str(&content).map_err(|e| StoreError::Parse(e.to_string()))?
            }
        };
        tracing::debug!(
            target: targets::STORE,
            path = %self.path.display(),
            albums = record.albums.len(),
            "read gallery store"
        );
        Ok(record)
    }
}

impl GalleryWriter for FileStore {
    fn write(&self, record: &GalleryRecord) -> StoreResult<()> {
        let content = match self.format {
            StoreFormat::Toml => {
                toml::to_string_pretty(record).map_err(|e| StoreError::Serialize(e.to_string()))?
            }
            StoreFormat::Json => serde_json::to_string_pretty(record)
                .map_err(|e| StoreError::Serialize(e.to_string()))?,
        };
        atomic_write(&self.path, content.as_bytes()).map_err(|e| self.io_error(e))?;
        tracing::debug!(
            target: targets::STORE,
            path = %self.path.display(),
            albums = record.albums.len(),
            "wrote gallery store"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AlbumRecord, PhotoRecord};

    fn record() -> GalleryRecord {
        GalleryRecord {
            albums: vec![AlbumRecord {
                name: "Vacation".into(),
                description: "Summer trip".into(),
                icon_image_path: Some("/p/1.png".into()),
                photos: vec![
                    PhotoRecord {
                        path: "/p/1.png".into(),
                        name: Some("Beach".into()),
                        description: String::new(),
                    },
                    PhotoRecord {
                        path: "/p/2.png".into(),
                        name: None,
                        description: String::new(),
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_toml_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::toml(dir.path().join("gallery.toml"));
        assert!(!store.exists());

        store.write(&record()).unwrap();
        assert!(store.exists());
        assert_eq!(store.read().unwrap(), record());
    }

    #[test]
    fn test_json_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::at(dir.path().join("gallery.json"));
        assert_eq!(store.format(), StoreFormat::Json);

        store.write(&record()).unwrap();
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"Vacation\""));
        assert_eq!(store.read().unwrap(), record());
    }

    #[test]
    fn test_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileStore::toml(dir.path().join("missing.toml"));
        assert!(matches!(missing.read(), Err(StoreError::Io { .. })));

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "{ not json").unwrap();
        assert!(matches!(FileStore::json(garbage).read(), Err(StoreError::Parse(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(StoreFormat::from_path(Path::new("a.JSON")), StoreFormat::Json);
        assert_eq!(StoreFormat::from_path(Path::new("a.toml")), StoreFormat::Toml);
        assert_eq!(StoreFormat::from_path(Path::new("a")), StoreFormat::Toml);
    }
}
