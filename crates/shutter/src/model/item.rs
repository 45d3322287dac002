//! The item abstraction shared by albums and photos.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use shutter_core::DeliveryReport;

use super::album::Album;
use super::change::ChangeBus;
use super::photo::Photo;
use crate::media::{Icon, IconResolver};

static ITEM_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an album, photo or gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    pub(crate) fn next() -> Self {
        Self(ITEM_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminator for the two item variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// An album of photos.
    Album,
    /// A single photo.
    Photo,
}

/// Mutable descriptive state common to every item.
#[derive(Debug, Clone, Default)]
pub(crate) struct ItemInfo {
    pub(crate) name: Option<String>,
    pub(crate) description: String,
    pub(crate) icon: Option<Icon>,
}

impl ItemInfo {
    pub(crate) fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Capabilities shared by albums and photos: nameable, describable,
/// iconable, child-counted, and observable.
pub trait ItemNode: Send + Sync {
    /// Identity of this item.
    fn id(&self) -> ItemId;

    /// Which variant this is.
    fn kind(&self) -> ItemKind;

    /// Display name.
    fn name(&self) -> String;

    /// Rename the item. Always publishes a rename event, even if the name is
    /// unchanged.
    fn set_name(&self, name: &str) -> DeliveryReport;

    /// Free-form description.
    fn description(&self) -> String;

    /// Replace the description. Publishes a state-change event.
    fn set_description(&self, description: &str) -> DeliveryReport;

    /// Number of direct children.
    fn child_count(&self) -> usize;

    /// The icon set explicitly on this item, if any.
    fn custom_icon(&self) -> Option<Icon>;

    /// Replace the custom icon. Publishes a state-change event.
    fn set_icon(&self, icon: Option<Icon>) -> DeliveryReport;

    /// The icon to display: the custom icon, or a fallback from `icons`.
    fn icon(&self, icons: &dyn IconResolver) -> Icon;

    /// Change broadcaster scoped to this item.
    fn changes(&self) -> &ChangeBus;
}

/// A shared handle to either item variant.
///
/// Equality and hashing use [`ItemId`], so two handles compare equal exactly
/// when they refer to the same item.
#[derive(Clone)]
pub enum Item {
    /// An album.
    Album(Arc<Album>),
    /// A photo.
    Photo(Arc<Photo>),
}

impl Item {
    /// The variant as a trait object.
    pub fn node(&self) -> &dyn ItemNode {
        match self {
            Self::Album(album) => album.as_ref(),
            Self::Photo(photo) => photo.as_ref(),
        }
    }

    /// Identity of the item.
    pub fn id(&self) -> ItemId {
        self.node().id()
    }

    /// Which variant this is.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Album(_) => ItemKind::Album,
            Self::Photo(_) => ItemKind::Photo,
        }
    }

    /// Display name.
    pub fn name(&self) -> String {
        self.node().name()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.node().child_count()
    }

    /// The album, if this is one.
    pub fn as_album(&self) -> Option<&Arc<Album>> {
        match self {
            Self::Album(album) => Some(album),
            Self::Photo(_) => None,
        }
    }

    /// The photo, if this is one.
    pub fn as_photo(&self) -> Option<&Arc<Photo>> {
        match self {
            Self::Photo(photo) => Some(photo),
            Self::Album(_) => None,
        }
    }

    /// Change broadcaster of the item.
    pub fn changes(&self) -> &ChangeBus {
        self.node().changes()
    }

    pub(crate) fn downgrade(&self) -> WeakItem {
        match self {
            Self::Album(album) => WeakItem::Album(Arc::downgrade(album), album.id()),
            Self::Photo(photo) => WeakItem::Photo(Arc::downgrade(photo), photo.id()),
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Item {}

impl std::hash::Hash for Item {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({} {:?})", self.kind(), self.id(), self.name())
    }
}

impl From<Arc<Album>> for Item {
    fn from(album: Arc<Album>) -> Self {
        Self::Album(album)
    }
}

impl From<Arc<Photo>> for Item {
    fn from(photo: Arc<Photo>) -> Self {
        Self::Photo(photo)
    }
}

/// A non-owning reference to an item that remembers the item's id.
#[derive(Debug, Clone)]
pub(crate) enum WeakItem {
    Album(Weak<Album>, ItemId),
    Photo(Weak<Photo>, ItemId),
}

impl WeakItem {
    pub(crate) fn id(&self) -> ItemId {
        match self {
            Self::Album(_, id) | Self::Photo(_, id) => *id,
        }
    }

    pub(crate) fn upgrade(&self) -> Option<Item> {
        match self {
            Self::Album(weak, _) => weak.upgrade().map(Item::Album),
            Self::Photo(weak, _) => weak.upgrade().map(Item::Photo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::RasterImage;

    #[test]
    fn test_item_ids_are_unique() {
        let a = ItemId::next();
        let b = ItemId::next();
        assert_ne!(a, b);
        assert!(b > a);
        assert_eq!(format!("{}", ItemId(7)), "#7");
    }

    #[test]
    fn test_item_dispatch() {
        let album = Album::new("Trips");
        let photo = Photo::from_image("/p/beach.jpg", Arc::new(RasterImage::blank(4, 4)));
        album.add_photo(photo.clone()).unwrap();

        let album_item = Item::from(album.clone());
        let photo_item = Item::from(photo.clone());

        assert_eq!(album_item.kind(), ItemKind::Album);
        assert_eq!(album_item.child_count(), 1);
        assert_eq!(photo_item.kind(), ItemKind::Photo);
        assert_eq!(photo_item.child_count(), 0);
        assert_eq!(photo_item.name(), "beach.jpg");
        assert!(album_item.as_photo().is_none());
        assert_eq!(photo_item.as_photo().map(|p| p.id()), Some(photo.id()));
    }

    #[test]
    fn test_item_equality_is_by_identity() {
        let first = Album::new("Same");
        let second = Album::new("Same");
        assert_eq!(Item::from(first.clone()), Item::from(first.clone()));
        assert_ne!(Item::from(first), Item::from(second));
    }

    #[test]
    fn test_weak_item_does_not_keep_item_alive() {
        let album = Album::new("Short lived");
        let weak = Item::from(album.clone()).downgrade();
        assert!(weak.upgrade().is_some());
        drop(album);
        assert!(weak.upgrade().is_none());
    }
}
