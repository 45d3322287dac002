//! Gallery-wide selection broadcasting.
//!
//! Observers declare which kind of selection they care about. A photo
//! detail view registers for [`SelectionKind::Photo`], an inspector for
//! [`SelectionKind::Any`]. Each [`SelectionBus::notify`] reaches every
//! interested observer exactly once, even if it registered under several
//! interests.

use std::sync::Arc;

use shutter_core::observer::{deliver_each, union_of};
use shutter_core::logging::targets;
use shutter_core::{DeliveryReport, ObserverError, ObserverSet};

use super::item::{Item, ItemKind};

/// Interest filter for selection observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionKind {
    /// Every selection.
    #[default]
    Any,
    /// Album selections only.
    Album,
    /// Photo selections only.
    Photo,
}

impl From<ItemKind> for SelectionKind {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Album => Self::Album,
            ItemKind::Photo => Self::Photo,
        }
    }
}

/// Receives "this item is now selected" notifications.
pub trait SelectionObserver: Send + Sync {
    /// Handle a selection.
    fn on_selected(&self, item: &Item) -> Result<(), ObserverError>;
}

impl<F> SelectionObserver for F
where
    F: Fn(&Item) -> Result<(), ObserverError> + Send + Sync,
{
    fn on_selected(&self, item: &Item) -> Result<(), ObserverError> {
        self(item)
    }
}

/// Selection broadcaster with per-kind interest buckets.
#[derive(Debug, Default)]
pub struct SelectionBus {
    any: ObserverSet<dyn SelectionObserver>,
    albums: ObserverSet<dyn SelectionObserver>,
    photos: ObserverSet<dyn SelectionObserver>,
}

impl SelectionBus {
    /// Create a bus with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&self, kind: SelectionKind) -> &ObserverSet<dyn SelectionObserver> {
        match kind {
            SelectionKind::Any => &self.any,
            SelectionKind::Album => &self.albums,
            SelectionKind::Photo => &self.photos,
        }
    }

    /// Register an observer under `kind`. Returns `false` if it was already
    /// registered under that kind.
    pub fn register_observer(&self, observer: Arc<dyn SelectionObserver>, kind: SelectionKind) -> bool {
        self.bucket(kind).register(observer)
    }

    /// Remove an observer from every interest bucket. Returns `true` if it
    /// was registered under any kind.
    pub fn remove_observer(&self, observer: &Arc<dyn SelectionObserver>) -> bool {
        let mut removed = false;
        for kind in [SelectionKind::Any, SelectionKind::Album, SelectionKind::Photo] {
            removed |= self.bucket(kind).unregister(observer);
        }
        removed
    }

    /// Returns `true` if the observer is registered under `kind`.
    pub fn is_registered(&self, observer: &Arc<dyn SelectionObserver>, kind: SelectionKind) -> bool {
        self.bucket(kind).contains(observer)
    }

    /// Number of distinct observers across all buckets.
    pub fn observer_count(&self) -> usize {
        union_of(&[&self.any, &self.albums, &self.photos]).len()
    }

    /// Deliver `item` to the observers interested in `Any` or in the item's
    /// kind, once each.
    ///
    /// Selecting the same item twice notifies twice.
    pub fn notify(&self, item: &Item) -> DeliveryReport {
        let kind = SelectionKind::from(item.kind());
        let recipients = union_of(&[&self.any, self.bucket(kind)]);
        tracing::trace!(
            target: targets::SELECTION,
            item = %item.id(),
            ?kind,
            recipients = recipients.len(),
            "notifying selection"
        );
        deliver_each(&recipients, |observer| observer.on_selected(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::RasterImage;
    use crate::model::{Album, ItemId, Photo};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Seen(Mutex<Vec<ItemId>>);

    impl SelectionObserver for Seen {
        fn on_selected(&self, item: &Item) -> Result<(), ObserverError> {
            self.0.lock().push(item.id());
            Ok(())
        }
    }

    fn items() -> (Item, Item) {
        let album = Album::new("A");
        let photo = Photo::from_image("/p/x.jpg", Arc::new(RasterImage::blank(1, 1)));
        (Item::from(album), Item::from(photo))
    }

    #[test]
    fn test_kind_filtering() {
        let bus = SelectionBus::new();
        let album_only = Arc::new(Seen::default());
        let photo_only = Arc::new(Seen::default());
        let any = Arc::new(Seen::default());
        bus.register_observer(album_only.clone(), SelectionKind::Album);
        bus.register_observer(photo_only.clone(), SelectionKind::Photo);
        bus.register_observer(any.clone(), SelectionKind::Any);

        let (album, photo) = items();
        assert_eq!(bus.notify(&photo).recipients, 2);
        assert_eq!(bus.notify(&album).recipients, 2);

        assert_eq!(*album_only.0.lock(), vec![album.id()]);
        assert_eq!(*photo_only.0.lock(), vec![photo.id()]);
        assert_eq!(*any.0.lock(), vec![photo.id(), album.id()]);
    }

    #[test]
    fn test_multiple_interests_deliver_once() {
        let bus = SelectionBus::new();
        let both = Arc::new(Seen::default());
        bus.register_observer(both.clone(), SelectionKind::Album);
        bus.register_observer(both.clone(), SelectionKind::Any);
        assert_eq!(bus.observer_count(), 1);

        let (album, _) = items();
        assert_eq!(bus.notify(&album).recipients, 1);
        assert_eq!(both.0.lock().len(), 1);
    }

    #[test]
    fn test_repeated_selection_renotifies() {
        let bus = SelectionBus::new();
        let any = Arc::new(Seen::default());
        bus.register_observer(any.clone(), SelectionKind::Any);

        let (album, _) = items();
        bus.notify(&album);
        bus.notify(&album);
        assert_eq!(any.0.lock().len(), 2);
    }

    #[test]
    fn test_remove_clears_all_buckets() {
        let bus = SelectionBus::new();
        let observer: Arc<dyn SelectionObserver> = Arc::new(Seen::default());
        bus.register_observer(observer.clone(), SelectionKind::Album);
        bus.register_observer(observer.clone(), SelectionKind::Photo);
        bus.register_observer(observer.clone(), SelectionKind::Any);

        assert!(bus.remove_observer(&observer));
        assert!(!bus.remove_observer(&observer));
        for kind in [SelectionKind::Any, SelectionKind::Album, SelectionKind::Photo] {
            assert!(!bus.is_registered(&observer, kind));
        }
        let (album, photo) = items();
        assert_eq!(bus.notify(&album).recipients, 0);
        assert_eq!(bus.notify(&photo).recipients, 0);
    }

    #[test]
    fn test_closure_observer_failure_is_reported() {
        let bus = SelectionBus::new();
        bus.register_observer(
            Arc::new(|_: &Item| -> Result<(), ObserverError> { Err(ObserverError::failed("busy")) }),
            SelectionKind::Any,
        );
        let (album, _) = items();
        let report = bus.notify(&album);
        assert_eq!(report.recipients, 1);
        assert!(!report.is_clean());
    }
}
