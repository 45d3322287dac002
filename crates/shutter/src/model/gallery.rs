//! The gallery root: ordered albums plus selection state.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use shutter_core::DeliveryReport;
use shutter_core::logging::targets;

use super::album::Album;
use super::change::{ChangeBus, ChangeKind, EventSubject, ItemChangeEvent};
use super::item::{Item, ItemId, ItemNode, WeakItem};
use super::photo::Photo;
use super::selection::SelectionBus;
use crate::error::{GalleryError, GalleryResult};

#[derive(Debug, Default)]
struct LastSelected {
    item: Option<WeakItem>,
    album: Option<(Weak<Album>, ItemId)>,
    photo: Option<(Weak<Photo>, ItemId)>,
}

/// Root of the item hierarchy.
///
/// Holds albums in display order, a [`ChangeBus`] for album additions and
/// removals, and a [`SelectionBus`] for selection fan-out.
///
/// The "last selected" references are weak: the gallery never keeps an item
/// alive, and never clears these references on its own when an item is
/// removed. Lookups validate the reference and report
/// [`GalleryError::StaleReference`] if it no longer resolves to an item
/// reachable from this gallery.
pub struct Gallery {
    id: ItemId,
    albums: RwLock<Vec<Arc<Album>>>,
    changes: Arc<ChangeBus>,
    selection: SelectionBus,
    last: RwLock<LastSelected>,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

impl Gallery {
    /// Create an empty gallery.
    pub fn new() -> Self {
        Self {
            id: ItemId::next(),
            albums: RwLock::new(Vec::new()),
            changes: Arc::new(ChangeBus::new()),
            selection: SelectionBus::new(),
            last: RwLock::new(LastSelected::default()),
        }
    }

    /// Identity of the gallery root, used as the subject of its events.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Change broadcaster for album additions and removals.
    pub fn changes(&self) -> &ChangeBus {
        &self.changes
    }

    /// Handle to the change broadcaster that does not keep it alive.
    pub fn changes_handle(&self) -> Weak<ChangeBus> {
        Arc::downgrade(&self.changes)
    }

    /// Selection broadcaster.
    pub fn selection(&self) -> &SelectionBus {
        &self.selection
    }

    /// Append an album and publish an addition event.
    pub fn add_album(&self, album: Arc<Album>) -> GalleryResult<DeliveryReport> {
        {
            let mut albums = self.albums.write();
            if albums.iter().any(|a| a.id() == album.id()) {
                return Err(GalleryError::DuplicateItem(album.id()));
            }
            albums.push(album.clone());
        }
        tracing::debug!(target: targets::MODEL, album = %album.id(), "album added");
        Ok(self.publish(Item::Album(album), ChangeKind::Addition))
    }

    /// Remove an album and publish a removal event.
    ///
    /// The album is removed even if it is the last selected item.
    pub fn remove_album(&self, album: &Arc<Album>) -> GalleryResult<DeliveryReport> {
        let removed = {
            let mut albums = self.albums.write();
            let position = albums
                .iter()
                .position(|a| a.id() == album.id())
                .ok_or(GalleryError::NotFound(album.id()))?;
            albums.remove(position)
        };
        tracing::debug!(target: targets::MODEL, album = %removed.id(), "album removed");
        Ok(self.publish(Item::Album(removed), ChangeKind::Removal))
    }

    /// Album at `index` in display order.
    pub fn album(&self, index: usize) -> Option<Arc<Album>> {
        self.albums.read().get(index).cloned()
    }

    /// First album with the given name.
    pub fn find_album(&self, name: &str) -> Option<Arc<Album>> {
        self.albums.read().iter().find(|a| a.name() == name).cloned()
    }

    /// Snapshot of the albums in display order.
    pub fn albums(&self) -> Vec<Arc<Album>> {
        self.albums.read().clone()
    }

    /// Number of albums.
    pub fn album_count(&self) -> usize {
        self.albums.read().len()
    }

    /// Returns `true` if the album is in this gallery.
    pub fn contains_album(&self, album: &Album) -> bool {
        self.albums.read().iter().any(|a| a.id() == album.id())
    }

    /// Returns `true` if the photo sits in an album of this gallery.
    pub fn contains_photo(&self, photo: &Photo) -> bool {
        photo
            .album()
            .is_some_and(|album| album.contains(photo) && self.contains_album(&album))
    }

    /// Returns `true` if the item is reachable from this gallery.
    pub fn contains(&self, item: &Item) -> bool {
        match item {
            Item::Album(album) => self.contains_album(album),
            Item::Photo(photo) => self.contains_photo(photo),
        }
    }

    /// Visit every album and its photos in display order.
    pub fn for_each_photo<F>(&self, mut visit: F)
    where
        F: FnMut(&Arc<Album>, &Arc<Photo>),
    {
        for album in self.albums() {
            for photo in album.photos() {
                visit(&album, &photo);
            }
        }
    }

    /// Record `item` as the current selection and notify selection
    /// observers.
    ///
    /// Selecting a photo also makes its album the last selected album;
    /// selecting an album leaves the last selected photo untouched.
    pub fn set_selected_item(&self, item: &Item) -> DeliveryReport {
        {
            let mut last = self.last.write();
            last.item = Some(item.downgrade());
            match item {
                Item::Album(album) => {
                    last.album = Some((Arc::downgrade(album), album.id()));
                }
                Item::Photo(photo) => {
                    last.photo = Some((Arc::downgrade(photo), photo.id()));
                    if let Some(album) = photo.album() {
                        last.album = Some((Arc::downgrade(&album), album.id()));
                    }
                }
            }
        }
        self.selection.notify(item)
    }

    /// Forget the selection.
    pub fn clear_selection(&self) {
        *self.last.write() = LastSelected::default();
    }

    /// The most recently selected item.
    ///
    /// Returns `Ok(None)` if nothing was selected, and
    /// [`GalleryError::StaleReference`] if the item was removed since.
    pub fn last_selected(&self) -> GalleryResult<Option<Item>> {
        let Some(weak) = self.last.read().item.clone() else {
            return Ok(None);
        };
        let item = weak
            .upgrade()
            .ok_or(GalleryError::StaleReference(weak.id()))?;
        if self.contains(&item) {
            Ok(Some(item))
        } else {
            Err(GalleryError::StaleReference(item.id()))
        }
    }

    /// The most recently selected album, or the album of the most recently
    /// selected photo.
    pub fn last_selected_album(&self) -> GalleryResult<Option<Arc<Album>>> {
        let Some((weak, id)) = self.last.read().album.clone() else {
            return Ok(None);
        };
        match weak.upgrade() {
            Some(album) if self.contains_album(&album) => Ok(Some(album)),
            _ => Err(GalleryError::StaleReference(id)),
        }
    }

    /// The most recently selected photo.
    pub fn last_selected_photo(&self) -> GalleryResult<Option<Arc<Photo>>> {
        let Some((weak, id)) = self.last.read().photo.clone() else {
            return Ok(None);
        };
        match weak.upgrade() {
            Some(photo) if self.contains_photo(&photo) => Ok(Some(photo)),
            _ => Err(GalleryError::StaleReference(id)),
        }
    }

    fn publish(&self, changed: Item, kind: ChangeKind) -> DeliveryReport {
        let event = ItemChangeEvent::new(EventSubject::Gallery(self.id), changed, kind);
        self.changes.publish(&event)
    }
}

impl fmt::Debug for Gallery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gallery")
            .field("id", &self.id)
            .field("albums", &self.album_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::RasterImage;
    use crate::model::{ChangeObserver, SelectionKind, SelectionObserver};
    use parking_lot::Mutex;
    use shutter_core::ObserverError;

    fn photo(path: &str) -> Arc<Photo> {
        Photo::from_image(path, Arc::new(RasterImage::blank(2, 2)))
    }

    #[test]
    fn test_album_events_use_gallery_subject() {
        let gallery = Gallery::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let observer: Arc<dyn ChangeObserver> =
            Arc::new(move |e: &ItemChangeEvent| -> Result<(), ObserverError> {
                seen_clone.lock().push((e.kind, e.subject.clone(), e.changed.id()));
                Ok(())
            });
        gallery.changes().register(observer);

        let album = Album::new("A");
        gallery.add_album(album.clone()).unwrap();
        gallery.remove_album(&album).unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (ChangeKind::Addition, EventSubject::Gallery(gallery.id()), album.id()));
        assert_eq!(seen[1].0, ChangeKind::Removal);
    }

    #[test]
    fn test_duplicate_and_missing_albums() {
        let gallery = Gallery::new();
        let album = Album::new("A");
        gallery.add_album(album.clone()).unwrap();

        assert!(matches!(gallery.add_album(album.clone()), Err(GalleryError::DuplicateItem(_))));
        gallery.remove_album(&album).unwrap();
        assert!(matches!(gallery.remove_album(&album), Err(GalleryError::NotFound(_))));
    }

    #[test]
    fn test_lookup() {
        let gallery = Gallery::new();
        gallery.add_album(Album::new("Vacation")).unwrap();
        gallery.add_album(Album::new("Work")).unwrap();

        assert_eq!(gallery.album(1).map(|a| a.name()), Some("Work".to_string()));
        assert!(gallery.find_album("Vacation").is_some());
        assert!(gallery.find_album("Nope").is_none());
        assert_eq!(gallery.album_count(), 2);
    }

    #[test]
    fn test_selection_tracks_album_of_photo() {
        let gallery = Gallery::new();
        let album = Album::new("A");
        let p1 = photo("/p/1.jpg");
        album.add_photo(p1.clone()).unwrap();
        gallery.add_album(album.clone()).unwrap();

        assert!(gallery.last_selected().unwrap().is_none());

        gallery.set_selected_item(&Item::from(p1.clone()));
        assert_eq!(gallery.last_selected().unwrap().map(|i| i.id()), Some(p1.id()));
        assert_eq!(gallery.last_selected_album().unwrap().map(|a| a.id()), Some(album.id()));
        assert_eq!(gallery.last_selected_photo().unwrap().map(|p| p.id()), Some(p1.id()));

        gallery.clear_selection();
        assert!(gallery.last_selected().unwrap().is_none());
    }

    #[test]
    fn test_set_selected_item_notifies_bus() {
        let gallery = Gallery::new();
        let hits = Arc::new(Mutex::new(0));
        let hits_clone = hits.clone();
        let observer: Arc<dyn SelectionObserver> =
            Arc::new(move |_: &Item| -> Result<(), ObserverError> {
                *hits_clone.lock() += 1;
                Ok(())
            });
        gallery.selection().register_observer(observer, SelectionKind::Album);

        let album = Album::new("A");
        gallery.add_album(album.clone()).unwrap();
        let report = gallery.set_selected_item(&Item::from(album));
        assert_eq!(report.recipients, 1);
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn test_removed_selection_is_stale_not_cleared() {
        let gallery = Gallery::new();
        let album = Album::new("A");
        let p1 = photo("/p/1.jpg");
        album.add_photo(p1.clone()).unwrap();
        gallery.add_album(album.clone()).unwrap();
        gallery.set_selected_item(&Item::from(p1.clone()));

        album.remove_photo(&p1).unwrap();
        assert!(matches!(gallery.last_selected(), Err(GalleryError::StaleReference(id)) if id == p1.id()));
        assert!(matches!(gallery.last_selected_photo(), Err(GalleryError::StaleReference(_))));
        assert!(gallery.last_selected_album().unwrap().is_some());

        drop(p1);
        assert!(matches!(gallery.last_selected(), Err(GalleryError::StaleReference(_))));
    }

    #[test]
    fn test_removing_selected_album_is_allowed() {
        let gallery = Gallery::new();
        let album = Album::new("A");
        gallery.add_album(album.clone()).unwrap();
        gallery.set_selected_item(&Item::from(album.clone()));

        gallery.remove_album(&album).unwrap();
        assert_eq!(gallery.album_count(), 0);
        assert!(matches!(gallery.last_selected_album(), Err(GalleryError::StaleReference(_))));
    }

    #[test]
    fn test_for_each_photo_visits_in_order() {
        let gallery = Gallery::new();
        let first = Album::new("First");
        let second = Album::new("Second");
        first.add_photo(photo("/p/a.jpg")).unwrap();
        second.add_photo(photo("/p/b.jpg")).unwrap();
        second.add_photo(photo("/p/c.jpg")).unwrap();
        gallery.add_album(first).unwrap();
        gallery.add_album(second).unwrap();

        let mut names = Vec::new();
        gallery.for_each_photo(|album, photo| names.push(format!("{}/{}", album.name(), photo.name())));
        assert_eq!(names, vec!["First/a.jpg", "Second/b.jpg", "Second/c.jpg"]);
    }
}
