//! User-level gallery actions.

use std::path::Path;
use std::sync::Arc;

use shutter_core::DeliveryReport;
use shutter_core::logging::targets;

use crate::context::GalleryContext;
use crate::error::{GalleryError, GalleryResult};
use crate::media::{Icon, IconSize, Image};
use crate::model::{Album, Gallery, Item, ItemNode, Photo};

/// The actions behind the gallery menus and toolbar.
///
/// Every action works on explicit arguments plus the gallery's last
/// selection. Dialogs, file choosers and confirmation prompts are the
/// caller's business.
#[derive(Debug, Clone)]
pub struct GalleryController {
    gallery: Arc<Gallery>,
    context: Arc<GalleryContext>,
}

impl GalleryController {
    /// Create a controller over `gallery`.
    pub fn new(gallery: Arc<Gallery>, context: Arc<GalleryContext>) -> Self {
        Self { gallery, context }
    }

    /// The controlled gallery.
    pub fn gallery(&self) -> &Arc<Gallery> {
        &self.gallery
    }

    /// The injected configuration and collaborators.
    pub fn context(&self) -> &GalleryContext {
        &self.context
    }

    /// Create an album and append it to the gallery.
    ///
    /// The name must not be blank or already used by another album.
    pub fn add_album(&self, name: &str) -> GalleryResult<Arc<Album>> {
        let name = required_name(name)?;
        if self.gallery.find_album(name).is_some() {
            return Err(GalleryError::DuplicateName(name.to_string()));
        }
        let album = Album::new(name);
        self.gallery.add_album(album.clone())?;
        Ok(album)
    }

    /// Open the image at `path` and append it to the last selected album.
    ///
    /// When a photo is selected, its album counts as the selected album.
    pub fn add_photo(&self, path: impl AsRef<Path>) -> GalleryResult<Arc<Photo>> {
        let album = self
            .gallery
            .last_selected_album()?
            .ok_or(GalleryError::NoAlbumSelected)?;
        let photo = Photo::open(path.as_ref(), self.context.images())?;
        album.add_photo(photo.clone())?;
        Ok(photo)
    }

    /// Remove the last selected album from the gallery, or the last selected
    /// photo from its album. Returns the removed item.
    pub fn remove_last_selected(&self) -> GalleryResult<Item> {
        let item = self.last_selected()?;
        match &item {
            Item::Album(album) => {
                self.gallery.remove_album(album)?;
            }
            Item::Photo(photo) => {
                let album = photo
                    .album()
                    .ok_or(GalleryError::StaleReference(photo.id()))?;
                album.remove_photo(photo)?;
            }
        }
        Ok(item)
    }

    /// Rename the last selected item.
    pub fn rename_last_selected(&self, name: &str) -> GalleryResult<DeliveryReport> {
        let name = required_name(name)?;
        let item = self.last_selected()?;
        Ok(item.node().set_name(name))
    }

    /// Replace the description of the last selected item.
    pub fn describe_last_selected(&self, description: &str) -> GalleryResult<DeliveryReport> {
        let item = self.last_selected()?;
        Ok(item.node().set_description(description))
    }

    /// Use the last selected photo as its album's icon.
    ///
    /// The icon is a thumbnail of the photo fitted to the small icon size,
    /// whatever icon the album had before. The photo path is recorded so
    /// the icon can be rebuilt after a restore.
    pub fn set_icon_to_last_selected(&self) -> GalleryResult<DeliveryReport> {
        let item = self.last_selected()?;
        let photo = item.as_photo().ok_or(GalleryError::NoPhotoSelected)?;
        let album = photo
            .album()
            .ok_or(GalleryError::StaleReference(photo.id()))?;

        let size = IconSize::Small;
        let image = photo.thumbnail(size.width(), size.height())?;
        let (width, height) = (image.width(), image.height());
        album.set_icon_image_path(Some(photo.path()));
        tracing::debug!(target: targets::MODEL, album = %album.id(), photo = %photo.id(), width, height, "album icon set from photo");
        Ok(album.set_icon(Some(Icon::Image(image))))
    }

    /// Make `item` the gallery's selection and notify selection observers.
    pub fn select_item(&self, item: &Item) -> DeliveryReport {
        self.gallery.set_selected_item(item)
    }

    fn last_selected(&self) -> GalleryResult<Item> {
        self.gallery
            .last_selected()?
            .ok_or(GalleryError::NothingSelected)
    }
}

fn required_name(name: &str) -> GalleryResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        Err(GalleryError::EmptyName)
    } else {
        Ok(name)
    }
}
