//! End-to-end tests driving the gallery through its controller.

use std::sync::Arc;

use parking_lot::Mutex;
use shutter::media::MemoryImageProvider;
use shutter::store::{FileStore, GalleryReader, GalleryRecord, GalleryWriter};
use shutter::{
    Gallery, GalleryContext, GalleryController, Item, ItemNode, ObserverError, ProjectionOptions,
    SelectionKind, SelectionObserver, TreeProjection,
};

#[derive(Default)]
struct SelectionLog {
    names: Mutex<Vec<String>>,
}

impl SelectionObserver for SelectionLog {
    fn on_selected(&self, item: &Item) -> Result<(), ObserverError> {
        self.names.lock().push(item.name());
        Ok(())
    }
}

fn context() -> Arc<GalleryContext> {
    let images = Arc::new(MemoryImageProvider::new());
    for name in ["p1", "p2", "p3"] {
        images.insert_blank(format!("/photos/{name}"), 40, 30);
    }
    Arc::new(GalleryContext::in_memory().with_images(images))
}

/// Vacation { p1, p2 } and an empty Work album.
fn populated(controller: &GalleryController) {
    let vacation = controller.add_album("Vacation").unwrap();
    controller.add_album("Work").unwrap();
    controller.select_item(&Item::from(vacation));
    controller.add_photo("/photos/p1").unwrap();
    controller.add_photo("/photos/p2").unwrap();
}

#[test]
fn test_vacation_scenario() {
    let gallery = Arc::new(Gallery::new());
    let controller = GalleryController::new(gallery.clone(), context());
    populated(&controller);

    let tree = TreeProjection::new(ProjectionOptions::default());
    tree.initialize(&gallery);

    let albums = Arc::new(SelectionLog::default());
    let any = Arc::new(SelectionLog::default());
    let photos = Arc::new(SelectionLog::default());
    gallery
        .selection()
        .register_observer(albums.clone(), SelectionKind::Album);
    gallery
        .selection()
        .register_observer(any.clone(), SelectionKind::Any);
    gallery
        .selection()
        .register_observer(photos.clone(), SelectionKind::Photo);

    let vacation = gallery.find_album("Vacation").unwrap();
    let vacation_node = tree.node_for(vacation.id()).unwrap();
    tree.select(vacation_node, &gallery).unwrap();

    assert_eq!(*albums.names.lock(), vec!["Vacation"]);
    assert_eq!(*any.names.lock(), vec!["Vacation"]);
    assert!(photos.names.lock().is_empty());

    controller.add_photo("/photos/p3").unwrap();
    assert_eq!(tree.child_labels(Some(vacation_node)), vec!["p1", "p2", "p3"]);

    let p1 = vacation.find_photo("p1").unwrap();
    tree.select_item(&Item::from(p1), &gallery).unwrap();
    controller.remove_last_selected().unwrap();

    assert_eq!(tree.child_labels(Some(vacation_node)), vec!["p2", "p3"]);
    assert_eq!(
        vacation.photos().iter().map(|p| p.name()).collect::<Vec<_>>(),
        vec!["p2", "p3"]
    );
    assert_eq!(*photos.names.lock(), vec!["p1"]);
}

#[test]
fn test_store_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let context = context();
    let gallery = Arc::new(Gallery::new());
    let controller = GalleryController::new(gallery.clone(), context.clone());
    populated(&controller);
    controller.describe_last_selected("first day").unwrap();

    for store in [
        FileStore::toml(dir.path().join("gallery.toml")),
        FileStore::json(dir.path().join("gallery.json")),
    ] {
        store.write(&GalleryRecord::capture(&gallery)).unwrap();
        let restored = store.read().unwrap().restore(&context).unwrap();

        assert_eq!(restored.album_count(), 2);
        let vacation = restored.find_album("Vacation").unwrap();
        assert_eq!(vacation.child_count(), 2);
        assert_eq!(vacation.description(), "first day");
        assert_eq!(vacation.photo(1).unwrap().name(), "p2");
        assert_eq!(restored.find_album("Work").unwrap().child_count(), 0);
    }
}
