//! Owned copies of the projected tree.

use std::fmt;

use shutter_core::{DebugTree, TreeFormatOptions, TreeFormatter};

use super::tree::NodeId;

/// One row of a [`TreeSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotNode {
    /// Node identity. `None` for the invisible root.
    pub id: Option<NodeId>,
    /// Row label.
    pub label: String,
    /// `"Album"`, `"Photo"`, `"Placeholder"` or `"Root"`.
    pub kind: &'static str,
    /// Child rows in display order.
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    /// Labels of the direct children.
    pub fn child_labels(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.label.as_str()).collect()
    }

    /// Depth-first search for the first node with `label`.
    pub fn find(&self, label: &str) -> Option<&SnapshotNode> {
        self.children.iter().find_map(|child| {
            if child.label == label {
                Some(child)
            } else {
                child.find(label)
            }
        })
    }
}

impl DebugTree for SnapshotNode {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn kind_name(&self) -> &'static str {
        self.kind
    }

    fn debug_id(&self) -> Option<u64> {
        self.id.map(NodeId::as_u64)
    }

    fn child_nodes(&self) -> Vec<&Self> {
        self.children.iter().collect()
    }
}

/// A point-in-time copy of the whole projection, for renderers and tests.
///
/// `Display` prints labels only, one row per line:
///
/// ```text
/// Vacation
/// ├── p1
/// └── p2
/// Work
/// └── [no images]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    root: SnapshotNode,
}

impl TreeSnapshot {
    pub(crate) fn new(children: Vec<SnapshotNode>) -> Self {
        Self {
            root: SnapshotNode {
                id: None,
                label: String::new(),
                kind: "Root",
                children,
            },
        }
    }

    /// The invisible root.
    pub fn root(&self) -> &SnapshotNode {
        &self.root
    }

    /// Labels of the top-level rows.
    pub fn root_labels(&self) -> Vec<&str> {
        self.root.child_labels()
    }

    /// First node with `label`, searched depth-first.
    pub fn find(&self, label: &str) -> Option<&SnapshotNode> {
        self.root.find(label)
    }

    /// Render with custom formatting options.
    pub fn render(&self, options: TreeFormatOptions) -> String {
        TreeFormatter::with_options(options).format_children(&self.root)
    }
}

impl fmt::Display for TreeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(TreeFormatOptions::minimal()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str, kind: &'static str) -> SnapshotNode {
        SnapshotNode {
            id: None,
            label: label.to_string(),
            kind,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_display_and_find() {
        let snapshot = TreeSnapshot::new(vec![
            SnapshotNode {
                children: vec![leaf("p1", "Photo"), leaf("p2", "Photo")],
                ..leaf("Vacation", "Album")
            },
            SnapshotNode {
                children: vec![leaf("[no images]", "Placeholder")],
                ..leaf("Work", "Album")
            },
        ]);

        assert_eq!(snapshot.root_labels(), vec!["Vacation", "Work"]);
        assert_eq!(snapshot.find("Vacation").unwrap().child_labels(), vec!["p1", "p2"]);
        assert_eq!(snapshot.find("p2").unwrap().kind, "Photo");
        assert!(snapshot.find("missing").is_none());
        assert_eq!(
            snapshot.to_string(),
            "Vacation\n\u{251c}\u{2500}\u{2500} p1\n\u{2514}\u{2500}\u{2500} p2\nWork\n\u{2514}\u{2500}\u{2500} [no images]\n"
        );
    }

    #[test]
    fn test_empty_display() {
        assert_eq!(TreeSnapshot::new(Vec::new()).to_string(), "(empty)\n");
    }
}
