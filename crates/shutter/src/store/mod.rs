//! Gallery persistence.
//!
//! The model never reads or writes files itself. A [`GalleryReader`] hands
//! it a [`GalleryRecord`] to restore, and a [`GalleryWriter`] receives the
//! record captured from a live gallery. [`FileStore`] implements both over a
//! TOML or JSON document.
//!
//! # Example
//!
//! ```ignore
//! use shutter::store::{FileStore, GalleryReader, GalleryRecord, GalleryWriter};
//!
//! let store = FileStore::toml("gallery.toml");
//! store.write(&GalleryRecord::capture(&gallery))?;
//!
//! let restored = store.read()?.restore(&context)?;
//! ```

mod file;
mod records;

use std::io::Write;
use std::path::Path;

pub use file::{FileStore, StoreFormat};
pub use records::{AlbumRecord, GalleryRecord, PhotoRecord};

use crate::error::StoreResult;

/// Source of stored gallery content.
pub trait GalleryReader {
    /// Read the stored gallery.
    fn read(&self) -> StoreResult<GalleryRecord>;
}

/// Sink for gallery content.
pub trait GalleryWriter {
    /// Replace the stored gallery with `record`.
    fn write(&self, record: &GalleryRecord) -> StoreResult<()>;
}

/// Write `bytes` to `path` through a temporary file in the same directory,
/// then rename it over the target.
///
/// Readers see either the old file or the new one, never a partial write.
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_atomic_write_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(atomic_write(&path, b"x").is_err());
    }
}
