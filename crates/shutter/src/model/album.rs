//! Albums: ordered, exclusively owned photo sequences.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use shutter_core::DeliveryReport;
use shutter_core::logging::targets;

use super::change::{ChangeBus, ChangeKind, EventSubject, ItemChangeEvent};
use super::item::{Item, ItemId, ItemInfo, ItemKind, ItemNode};
use super::photo::Photo;
use crate::error::{GalleryError, GalleryResult};
use crate::media::{ALBUM_ICON_KEY, Icon, IconResolver, IconSize};

/// An ordered collection of photos.
///
/// Insertion order is display order. An album exclusively owns its photos;
/// each photo keeps a non-owning back-reference to the album holding it.
pub struct Album {
    id: ItemId,
    this: Weak<Album>,
    info: RwLock<ItemInfo>,
    photos: RwLock<Vec<Arc<Photo>>>,
    icon_image_path: RwLock<Option<PathBuf>>,
    changes: ChangeBus,
}

impl Album {
    /// Create an empty album.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        let info = ItemInfo::named(name);
        Arc::new_cyclic(|this| Self {
            id: ItemId::next(),
            this: this.clone(),
            info: RwLock::new(info),
            photos: RwLock::new(Vec::new()),
            icon_image_path: RwLock::new(None),
            changes: ChangeBus::new(),
        })
    }

    /// Append a photo and publish an addition event.
    ///
    /// Fails without publishing if the photo is already in this album, or
    /// if it still belongs to another album.
    pub fn add_photo(&self, photo: Arc<Photo>) -> GalleryResult<DeliveryReport> {
        {
            let mut photos = self.photos.write();
            if photos.iter().any(|p| p.id() == photo.id()) {
                return Err(GalleryError::DuplicateItem(photo.id()));
            }
            if let Some(owner) = photo.album() {
                if owner.id() != self.id {
                    return Err(GalleryError::AlreadyOwned {
                        photo: photo.id(),
                        album: owner.id(),
                    });
                }
            }
            photos.push(photo.clone());
        }
        photo.set_album(self.this.clone());

        tracing::debug!(target: targets::MODEL, album = %self.id, photo = %photo.id(), "photo added");
        Ok(self.publish(Item::Photo(photo), ChangeKind::Addition))
    }

    /// Remove a photo and publish a removal event.
    ///
    /// Removing a photo that is not in this album fails with
    /// [`GalleryError::NotFound`] and publishes nothing.
    pub fn remove_photo(&self, photo: &Arc<Photo>) -> GalleryResult<DeliveryReport> {
        let removed = {
            let mut photos = self.photos.write();
            let position = photos
                .iter()
                .position(|p| p.id() == photo.id())
                .ok_or(GalleryError::NotFound(photo.id()))?;
            photos.remove(position)
        };
        removed.set_album(Weak::new());

        tracing::debug!(target: targets::MODEL, album = %self.id, photo = %removed.id(), "photo removed");
        Ok(self.publish(Item::Photo(removed), ChangeKind::Removal))
    }

    /// Move a photo from this album to `target`: a removal here followed by
    /// an addition there.
    pub fn move_photo_to(&self, photo: &Arc<Photo>, target: &Album) -> GalleryResult<DeliveryReport> {
        if target.contains(photo) {
            return Err(GalleryError::DuplicateItem(photo.id()));
        }
        let mut report = self.remove_photo(photo)?;
        report.merge(target.add_photo(photo.clone())?);
        Ok(report)
    }

    /// Photo at `index` in display order.
    pub fn photo(&self, index: usize) -> Option<Arc<Photo>> {
        self.photos.read().get(index).cloned()
    }

    /// First photo with the given name.
    pub fn find_photo(&self, name: &str) -> Option<Arc<Photo>> {
        self.photos.read().iter().find(|p| p.name() == name).cloned()
    }

    /// Snapshot of the photos in display order.
    pub fn photos(&self) -> Vec<Arc<Photo>> {
        self.photos.read().clone()
    }

    /// Position of a photo in display order.
    pub fn index_of(&self, photo: &Photo) -> Option<usize> {
        self.photos.read().iter().position(|p| p.id() == photo.id())
    }

    /// Returns `true` if the photo is in this album.
    pub fn contains(&self, photo: &Photo) -> bool {
        self.index_of(photo).is_some()
    }

    /// Path of the photo whose thumbnail is used as this album's icon.
    pub fn icon_image_path(&self) -> Option<PathBuf> {
        self.icon_image_path.read().clone()
    }

    /// Record the path of the image backing the album icon.
    pub fn set_icon_image_path(&self, path: Option<&Path>) {
        *self.icon_image_path.write() = path.map(Path::to_path_buf);
    }

    fn publish(&self, changed: Item, kind: ChangeKind) -> DeliveryReport {
        match self.this.upgrade() {
            Some(this) => {
                let event = ItemChangeEvent::new(EventSubject::Item(Item::Album(this)), changed, kind);
                self.changes.publish(&event)
            }
            None => DeliveryReport::empty(),
        }
    }

    fn publish_self(&self, kind: ChangeKind) -> DeliveryReport {
        match self.this.upgrade() {
            Some(this) => self.changes.publish(&ItemChangeEvent::about(Item::Album(this), kind)),
            None => DeliveryReport::empty(),
        }
    }
}

impl ItemNode for Album {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Album
    }

    fn name(&self) -> String {
        self.info.read().name.clone().unwrap_or_default()
    }

    fn set_name(&self, name: &str) -> DeliveryReport {
        self.info.write().name = Some(name.to_string());
        self.publish_self(ChangeKind::Rename)
    }

    fn description(&self) -> String {
        self.info.read().description.clone()
    }

    fn set_description(&self, description: &str) -> DeliveryReport {
        self.info.write().description = description.to_string();
        self.publish_self(ChangeKind::StateChange)
    }

    fn child_count(&self) -> usize {
        self.photos.read().len()
    }

    fn custom_icon(&self) -> Option<Icon> {
        self.info.read().icon.clone()
    }

    fn set_icon(&self, icon: Option<Icon>) -> DeliveryReport {
        self.info.write().icon = icon;
        self.publish_self(ChangeKind::StateChange)
    }

    fn icon(&self, icons: &dyn IconResolver) -> Icon {
        self.custom_icon()
            .unwrap_or_else(|| icons.resolve(ALBUM_ICON_KEY, IconSize::Small))
    }

    fn changes(&self) -> &ChangeBus {
        &self.changes
    }
}

impl fmt::Debug for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Album")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("photos", &self.child_count())
            .finish()
    }
}
