//! Node storage for the tree projection.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::model::{Album, Item, ItemId, ItemNode, Photo};

static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a tree node. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

/// What a tree node shows.
#[derive(Debug, Clone)]
pub enum NodeContent {
    /// An album row.
    Album(Arc<Album>),
    /// A photo row.
    Photo(Arc<Photo>),
    /// The non-selectable row under an empty album.
    Placeholder,
}

impl NodeContent {
    /// The backing item, unless this is a placeholder.
    pub fn item(&self) -> Option<Item> {
        match self {
            Self::Album(album) => Some(Item::Album(album.clone())),
            Self::Photo(photo) => Some(Item::Photo(photo.clone())),
            Self::Placeholder => None,
        }
    }

    /// Identity of the backing item.
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Self::Album(album) => Some(album.id()),
            Self::Photo(photo) => Some(photo.id()),
            Self::Placeholder => None,
        }
    }

    /// Returns `true` for the placeholder row.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    /// Short kind name for debug output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Album(_) => "Album",
            Self::Photo(_) => "Photo",
            Self::Placeholder => "Placeholder",
        }
    }
}

impl From<Item> for NodeContent {
    fn from(item: Item) -> Self {
        match item {
            Item::Album(album) => Self::Album(album),
            Item::Photo(photo) => Self::Photo(photo),
        }
    }
}

pub(crate) struct TreeNode {
    pub(crate) content: NodeContent,
    pub(crate) label: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// Nodes by id, the ordered top level, and an item index.
///
/// A `None` parent means the invisible root.
#[derive(Default)]
pub(crate) struct TreeStorage {
    nodes: HashMap<NodeId, TreeNode>,
    root_children: Vec<NodeId>,
    by_item: HashMap<ItemId, NodeId>,
}

impl TreeStorage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Append a node under `parent`. Returns `None` if the parent does not
    /// exist.
    pub(crate) fn add_child(
        &mut self,
        parent: Option<NodeId>,
        content: NodeContent,
        label: String,
    ) -> Option<NodeId> {
        let id = NodeId::next();
        match parent {
            None => self.root_children.push(id),
            Some(parent_id) => self.nodes.get_mut(&parent_id)?.children.push(id),
        }
        if let Some(item_id) = content.item_id() {
            self.by_item.insert(item_id, id);
        }
        self.nodes.insert(
            id,
            TreeNode {
                content,
                label,
                parent,
                children: Vec::new(),
            },
        );
        Some(id)
    }

    /// Detach a node from its parent and drop it with all descendants.
    /// Returns the removed contents, the node's own first.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> Vec<NodeContent> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        match node.parent {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|&child| child != id);
                }
            }
            None => self.root_children.retain(|&child| child != id),
        }
        let mut removed = Vec::new();
        self.remove_subtree(id, &mut removed);
        removed
    }

    fn remove_subtree(&mut self, id: NodeId, removed: &mut Vec<NodeContent>) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        if let Some(item_id) = node.content.item_id() {
            if self.by_item.get(&item_id) == Some(&id) {
                self.by_item.remove(&item_id);
            }
        }
        removed.push(node.content);
        for child in node.children {
            self.remove_subtree(child, removed);
        }
    }

    /// Drop every node. Returns the removed contents.
    pub(crate) fn clear(&mut self) -> Vec<NodeContent> {
        self.root_children.clear();
        self.by_item.clear();
        self.nodes.drain().map(|(_, node)| node.content).collect()
    }

    pub(crate) fn children_of(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            None => &self.root_children,
            Some(id) => self
                .nodes
                .get(&id)
                .map(|n| n.children.as_slice())
                .unwrap_or(&[]),
        }
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub(crate) fn row_of(&self, id: NodeId) -> Option<usize> {
        let node = self.nodes.get(&id)?;
        self.children_of(node.parent)
            .iter()
            .position(|&child| child == id)
    }

    pub(crate) fn node_for(&self, item: ItemId) -> Option<NodeId> {
        self.by_item.get(&item).copied()
    }

    /// Placeholder child of `parent`, if it has one.
    pub(crate) fn placeholder_of(&self, parent: NodeId) -> Option<NodeId> {
        self.children_of(Some(parent))
            .iter()
            .copied()
            .find(|&child| self.nodes.get(&child).is_some_and(|n| n.content.is_placeholder()))
    }

    /// Item backing a node. `None` for placeholders and unknown nodes.
    pub(crate) fn item_id_of(&self, id: NodeId) -> Option<ItemId> {
        self.nodes.get(&id).and_then(|n| n.content.item_id())
    }
}
