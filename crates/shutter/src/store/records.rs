//! Serializable snapshots of the item hierarchy.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shutter_core::PerfSpan;
use shutter_core::logging::targets;

use crate::context::GalleryContext;
use crate::error::StoreResult;
use crate::media::{Icon, IconSize, Image, fit_within};
use crate::model::{Album, Gallery, ItemNode, Photo};

/// Stored gallery content: albums in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GalleryRecord {
    /// Albums in display order.
    #[serde(default)]
    pub albums: Vec<AlbumRecord>,
}

/// Stored album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRecord {
    /// Album name.
    pub name: String,
    /// Album description.
    #[serde(default)]
    pub description: String,
    /// Path of the image whose thumbnail is the album icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_image_path: Option<PathBuf>,
    /// Photos in display order.
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,
}

/// Stored photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Image file location.
    pub path: PathBuf,
    /// Explicit name. Absent when the photo is named after its file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Photo description.
    #[serde(default)]
    pub description: String,
}

impl GalleryRecord {
    /// Walk the gallery's albums and photos in display order.
    pub fn capture(gallery: &Gallery) -> Self {
        let albums = gallery.albums().iter().map(|album| AlbumRecord::capture(album)).collect();
        Self { albums }
    }

    /// Total number of stored photos.
    pub fn photo_count(&self) -> usize {
        self.albums.iter().map(|a| a.photos.len()).sum()
    }

    /// Rebuild a gallery, opening every photo through the context's image
    /// provider.
    ///
    /// Photos that fail to open are skipped with a warning. An album icon
    /// that fails to open leaves the album on its fallback icon.
    pub fn restore(&self, context: &GalleryContext) -> StoreResult<Gallery> {
        let _span = PerfSpan::new("gallery_restore");
        let gallery = Gallery::new();
        for record in &self.albums {
            gallery.add_album(record.restore(context)?)?;
        }
        tracing::debug!(
            target: targets::STORE,
            albums = gallery.album_count(),
            "gallery restored"
        );
        Ok(gallery)
    }
}

impl AlbumRecord {
    fn capture(album: &Album) -> Self {
        Self {
            name: album.name(),
            description: album.description(),
            icon_image_path: album.icon_image_path(),
            photos: album.photos().iter().map(|photo| PhotoRecord::capture(photo)).collect(),
        }
    }

    fn restore(&self, context: &GalleryContext) -> StoreResult<Arc<Album>> {
        let album = Album::new(self.name.clone());
        if !self.description.is_empty() {
            album.set_description(&self.description);
        }

        for record in &self.photos {
            match Photo::open(&record.path, context.images()) {
                Ok(photo) => {
                    if let Some(name) = &record.name {
                        photo.set_name(name);
                    }
                    if !record.description.is_empty() {
                        photo.set_description(&record.description);
                    }
                    album.add_photo(photo)?;
                }
                Err(error) => {
                    tracing::warn!(
                        target: targets::STORE,
                        album = %self.name,
                        path = %record.path.display(),
                        %error,
                        "skipping photo that failed to open"
                    );
                }
            }
        }

        if let Some(path) = &self.icon_image_path {
            album.set_icon_image_path(Some(path));
            let size = IconSize::Small;
            let icon = context.images().open(path).and_then(|image| {
                let (width, height) =
                    fit_within((image.width(), image.height()), size.width(), size.height());
                image.scale(width, height)
            });
            match icon {
                Ok(image) => {
                    album.set_icon(Some(Icon::Image(image)));
                }
                Err(error) => {
                    tracing::warn!(
                        target: targets::STORE,
                        album = %self.name,
                        path = %path.display(),
                        %error,
                        "album icon image could not be opened"
                    );
                }
            }
        }
        Ok(album)
    }
}

impl PhotoRecord {
    fn capture(photo: &Photo) -> Self {
        let name = photo.name();
        let file_name = photo
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Self {
            path: photo.path().to_path_buf(),
            name: (file_name.as_deref() != Some(name.as_str())).then_some(name),
            description: photo.description(),
        }
    }
}
