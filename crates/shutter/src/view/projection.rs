//! Incremental tree mirror of a gallery.
//!
//! [`TreeProjection`] is built once from a [`Gallery`] and then kept in step
//! by the change events of the nodes it shows. It never rescans the
//! gallery. Additions are placed relative to the root or to the current
//! selection:
//!
//! - an album added to the gallery root is appended under the tree root;
//! - any other addition is appended under the selected node if the event's
//!   subject backs it, or else under the selected node's parent if the
//!   subject backs that;
//! - everything else is dropped with a debug log.
//!
//! Renames and removals only touch the tree when they concern the selected
//! node.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use shutter_core::logging::targets;
use shutter_core::{DeliveryReport, ObserverError, PerfSpan, Signal};

use super::snapshot::{SnapshotNode, TreeSnapshot};
use super::tree::{NodeContent, NodeId, TreeStorage};
use crate::config::GalleryViewConfig;
use crate::error::{ProjectionError, ProjectionResult};
use crate::model::{
    Album, ChangeBus, ChangeKind, ChangeObserver, Gallery, Item, ItemChangeEvent, ItemId,
    ItemNode,
};

/// Label options for projected rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Append ` (count)` to album labels.
    pub show_album_count: bool,
    /// Label photo rows with the photo name. Otherwise photo labels are empty.
    pub show_photo_name: bool,
    /// Label of the placeholder row under empty albums.
    pub placeholder_label: String,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self::from(&GalleryViewConfig::default())
    }
}

impl From<&GalleryViewConfig> for ProjectionOptions {
    fn from(config: &GalleryViewConfig) -> Self {
        Self {
            show_album_count: config.show_album_count,
            show_photo_name: config.show_photo_name,
            placeholder_label: config.placeholder_label.clone(),
        }
    }
}

/// Signals emitted when the projected tree changes.
///
/// Parents are `None` for the invisible root. Every signal is emitted after
/// the projection's internal lock is released, so slots may query the
/// projection.
#[derive(Default)]
pub struct ProjectionSignals {
    /// Rows were inserted. Args: (parent, first row, last row)
    pub rows_inserted: Signal<(Option<NodeId>, usize, usize)>,
    /// Rows were removed. Args: (parent, first row, last row)
    pub rows_removed: Signal<(Option<NodeId>, usize, usize)>,
    /// A node's label and its children's labels were recomputed.
    pub node_reloaded: Signal<NodeId>,
    /// The whole tree was rebuilt.
    pub reset: Signal<()>,
}

enum Notice {
    Inserted(Option<NodeId>, usize),
    Removed(Option<NodeId>, usize),
    Reloaded(NodeId),
}

/// Forwards change events to a projection without keeping it alive.
struct Forwarder(Weak<TreeProjection>);

impl ChangeObserver for Forwarder {
    fn on_change(&self, event: &ItemChangeEvent) -> Result<(), ObserverError> {
        if let Some(projection) = self.0.upgrade() {
            projection.apply(event);
        }
        Ok(())
    }
}

/// A tree view model mirroring a gallery: an invisible root, one row per
/// album, one row per photo, and a placeholder row under empty albums.
pub struct TreeProjection {
    options: ProjectionOptions,
    observer: Arc<dyn ChangeObserver>,
    /// Change bus of the gallery being mirrored.
    observed: Mutex<Weak<ChangeBus>>,
    storage: RwLock<TreeStorage>,
    selected: RwLock<Option<NodeId>>,
    signals: ProjectionSignals,
}

impl TreeProjection {
    /// Create an empty projection. Call [`initialize`](Self::initialize) to
    /// populate it.
    pub fn new(options: ProjectionOptions) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            options,
            observer: Arc::new(Forwarder(this.clone())),
            observed: Mutex::new(Weak::new()),
            storage: RwLock::new(TreeStorage::new()),
            selected: RwLock::new(None),
            signals: ProjectionSignals::default(),
        })
    }

    /// Label options in use.
    pub fn options(&self) -> &ProjectionOptions {
        &self.options
    }

    /// Change signals.
    pub fn signals(&self) -> &ProjectionSignals {
        &self.signals
    }

    /// Rebuild the tree from `gallery` and start observing it and every
    /// item it contains.
    ///
    /// Any previously mirrored gallery stops being observed. Clears the
    /// selection and emits `reset`.
    pub fn initialize(&self, gallery: &Gallery) {
        let _span = PerfSpan::new("tree_projection_initialize");

        self.release_gallery();
        let stale = self.storage.write().clear();
        self.unwatch(&stale);
        *self.selected.write() = None;

        gallery.changes().register(self.observer.clone());
        *self.observed.lock() = gallery.changes_handle();
        let mut watch = Vec::new();
        {
            let mut storage = self.storage.write();
            for album in gallery.albums() {
                self.insert_album(&mut storage, &album, &mut watch);
            }
        }
        self.watch(&watch);

        tracing::debug!(
            target: targets::PROJECTION,
            albums = gallery.album_count(),
            nodes = self.node_count(),
            "projection initialized"
        );
        self.signals.reset.emit(());
    }

    /// Stop observing the mirrored gallery and every shown item, and empty
    /// the tree.
    pub fn detach(&self) {
        self.release_gallery();
        let stale = self.storage.write().clear();
        self.unwatch(&stale);
        *self.selected.write() = None;
        self.signals.reset.emit(());
    }

    /// Select `node` and forward the selection to the gallery, which
    /// notifies its selection observers.
    pub fn select(&self, node: NodeId, gallery: &Gallery) -> ProjectionResult<DeliveryReport> {
        let item = {
            let storage = self.storage.read();
            let entry = storage
                .get(node)
                .ok_or(ProjectionError::UnknownNode(node.as_u64()))?;
            entry
                .content
                .item()
                .ok_or(ProjectionError::NotSelectable(node.as_u64()))?
        };
        *self.selected.write() = Some(node);
        Ok(gallery.set_selected_item(&item))
    }

    /// Select the node showing `item`.
    pub fn select_item(&self, item: &Item, gallery: &Gallery) -> ProjectionResult<DeliveryReport> {
        let node = self
            .node_for(item.id())
            .ok_or(ProjectionError::NotShown(item.id()))?;
        self.select(node, gallery)
    }

    /// Forget the selected node. The gallery's own selection is untouched.
    pub fn clear_selection(&self) {
        *self.selected.write() = None;
    }

    /// The selected node.
    pub fn selected(&self) -> Option<NodeId> {
        *self.selected.read()
    }

    /// Top-level rows.
    pub fn root_children(&self) -> Vec<NodeId> {
        self.storage.read().children_of(None).to_vec()
    }

    /// Child rows of `node`.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.storage.read().children_of(Some(node)).to_vec()
    }

    /// Parent of `node`, `None` for top-level rows and unknown nodes.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.storage.read().parent_of(node)
    }

    /// Cached label of `node`.
    pub fn label(&self, node: NodeId) -> Option<String> {
        self.storage.read().get(node).map(|n| n.label.clone())
    }

    /// What `node` shows.
    pub fn content(&self, node: NodeId) -> Option<NodeContent> {
        self.storage.read().get(node).map(|n| n.content.clone())
    }

    /// Node showing the item with `id`.
    pub fn node_for(&self, id: ItemId) -> Option<NodeId> {
        self.storage.read().node_for(id)
    }

    /// Labels of the children of `parent`, or of the top level for `None`.
    pub fn child_labels(&self, parent: Option<NodeId>) -> Vec<String> {
        let storage = self.storage.read();
        storage
            .children_of(parent)
            .iter()
            .filter_map(|&child| storage.get(child).map(|n| n.label.clone()))
            .collect()
    }

    /// Number of rows, placeholders included.
    pub fn node_count(&self) -> usize {
        self.storage.read().len()
    }

    /// Owned copy of the whole tree.
    pub fn snapshot(&self) -> TreeSnapshot {
        let storage = self.storage.read();
        let children = storage
            .children_of(None)
            .iter()
            .filter_map(|&id| snapshot_node(&storage, id))
            .collect();
        TreeSnapshot::new(children)
    }

    fn apply(&self, event: &ItemChangeEvent) {
        match event.kind {
            ChangeKind::Addition => self.apply_addition(event),
            ChangeKind::Removal => self.apply_removal(event),
            ChangeKind::Rename => self.apply_rename(event),
            ChangeKind::StateChange => {}
        }
    }

    fn apply_addition(&self, event: &ItemChangeEvent) {
        let mut notices = Vec::new();
        let mut watch = Vec::new();
        {
            let mut storage = self.storage.write();
            if storage.node_for(event.changed.id()).is_some() {
                tracing::debug!(
                    target: targets::PROJECTION,
                    changed = %event.changed.id(),
                    "addition of an item already shown ignored"
                );
                return;
            }

            match (&event.changed, event.subject.is_gallery()) {
                (Item::Album(album), true) => {
                    let row = storage.children_of(None).len();
                    self.insert_album(&mut storage, album, &mut watch);
                    notices.push(Notice::Inserted(None, row));
                }
                _ => {
                    let Some(target) = self.addition_target(&storage, event.subject.id()) else {
                        tracing::debug!(
                            target: targets::PROJECTION,
                            subject = %event.subject.id(),
                            changed = %event.changed.id(),
                            "addition outside the selected branch dropped"
                        );
                        return;
                    };

                    if let Some(placeholder) = storage.placeholder_of(target) {
                        let row = storage.row_of(placeholder).unwrap_or(0);
                        storage.remove_node(placeholder);
                        notices.push(Notice::Removed(Some(target), row));
                    }

                    let row = storage.children_of(Some(target)).len();
                    let content = NodeContent::from(event.changed.clone());
                    let label = self.label_for(&content);
                    if storage.add_child(Some(target), content, label).is_some() {
                        watch.push(event.changed.clone());
                        notices.push(Notice::Inserted(Some(target), row));
                    }
                    self.reload(&mut storage, target);
                    notices.push(Notice::Reloaded(target));
                }
            }
        }
        self.watch(&watch);
        self.emit(notices);
    }

    /// The selected node if it backs `subject`, else its parent if that
    /// backs `subject`.
    fn addition_target(&self, storage: &TreeStorage, subject: ItemId) -> Option<NodeId> {
        let selected = (*self.selected.read())?;
        if storage.item_id_of(selected) == Some(subject) {
            return Some(selected);
        }
        let parent = storage.parent_of(selected)?;
        (storage.item_id_of(parent) == Some(subject)).then_some(parent)
    }

    fn apply_removal(&self, event: &ItemChangeEvent) {
        let mut notices = Vec::new();
        let removed = {
            let mut storage = self.storage.write();
            let mut selected = self.selected.write();
            let Some(node) = *selected else {
                return;
            };
            if storage.item_id_of(node) != Some(event.changed.id()) {
                tracing::debug!(
                    target: targets::PROJECTION,
                    changed = %event.changed.id(),
                    "removal of an unselected item ignored"
                );
                return;
            }

            let parent = storage.parent_of(node);
            let row = storage.row_of(node).unwrap_or(0);
            let removed = storage.remove_node(node);
            *selected = None;
            notices.push(Notice::Removed(parent, row));
            if let Some(parent) = parent {
                self.relabel(&mut storage, parent);
                notices.push(Notice::Reloaded(parent));
            }
            removed
        };
        self.unwatch(&removed);
        self.emit(notices);
    }

    fn apply_rename(&self, event: &ItemChangeEvent) {
        let node = {
            let mut storage = self.storage.write();
            let Some(node) = *self.selected.read() else {
                return;
            };
            if storage.item_id_of(node) != Some(event.changed.id()) {
                return;
            }
            self.relabel(&mut storage, node);
            node
        };
        self.signals.node_reloaded.emit(node);
    }

    /// Append an album row under the root, with photo rows or a placeholder.
    fn insert_album(&self, storage: &mut TreeStorage, album: &Arc<Album>, watch: &mut Vec<Item>) {
        let content = NodeContent::Album(album.clone());
        let label = self.label_for(&content);
        let Some(album_node) = storage.add_child(None, content, label) else {
            return;
        };
        watch.push(Item::Album(album.clone()));

        let photos = album.photos();
        if photos.is_empty() {
            let placeholder = self.options.placeholder_label.clone();
            storage.add_child(Some(album_node), NodeContent::Placeholder, placeholder);
            return;
        }
        for photo in photos {
            let content = NodeContent::Photo(photo.clone());
            let label = self.label_for(&content);
            storage.add_child(Some(album_node), content, label);
            watch.push(Item::Photo(photo));
        }
    }

    fn label_for(&self, content: &NodeContent) -> String {
        match content {
            NodeContent::Album(album) if self.options.show_album_count => {
                format!("{} ({})", album.name(), album.child_count())
            }
            NodeContent::Album(album) => album.name(),
            NodeContent::Photo(photo) if self.options.show_photo_name => photo.name(),
            NodeContent::Photo(_) => String::new(),
            NodeContent::Placeholder => self.options.placeholder_label.clone(),
        }
    }

    fn relabel(&self, storage: &mut TreeStorage, node: NodeId) {
        let Some(content) = storage.get(node).map(|n| n.content.clone()) else {
            return;
        };
        let label = self.label_for(&content);
        if let Some(entry) = storage.get_mut(node) {
            entry.label = label;
        }
    }

    fn reload(&self, storage: &mut TreeStorage, node: NodeId) {
        self.relabel(storage, node);
        for child in storage.children_of(Some(node)).to_vec() {
            self.relabel(storage, child);
        }
    }

    fn release_gallery(&self) {
        let previous = std::mem::take(&mut *self.observed.lock());
        if let Some(bus) = previous.upgrade() {
            bus.unregister(&self.observer);
        }
    }

    fn watch(&self, items: &[Item]) {
        for item in items {
            item.changes().register(self.observer.clone());
        }
    }

    fn unwatch(&self, contents: &[NodeContent]) {
        for item in contents.iter().filter_map(NodeContent::item) {
            item.changes().unregister(&self.observer);
        }
    }

    fn emit(&self, notices: Vec<Notice>) {
        for notice in notices {
            match notice {
                Notice::Inserted(parent, row) => {
                    self.signals.rows_inserted.emit((parent, row, row));
                }
                Notice::Removed(parent, row) => {
                    self.signals.rows_removed.emit((parent, row, row));
                }
                Notice::Reloaded(node) => {
                    self.signals.node_reloaded.emit(node);
                }
            }
        }
    }
}

impl Drop for TreeProjection {
    fn drop(&mut self) {
        self.release_gallery();
        let contents = self.storage.get_mut().clear();
        self.unwatch(&contents);
    }
}

fn snapshot_node(storage: &TreeStorage, id: NodeId) -> Option<SnapshotNode> {
    let node = storage.get(id)?;
    Some(SnapshotNode {
        id: Some(id),
        label: node.label.clone(),
        kind: node.content.kind_name(),
        children: node
            .children
            .iter()
            .filter_map(|&child| snapshot_node(storage, child))
            .collect(),
    })
}
