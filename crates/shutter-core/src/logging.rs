//! Logging and debugging facilities for Shutter.
//!
//! This module provides:
//! - Integration with the `tracing` crate for structured logging
//! - Debug visualization for tree-shaped structures
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Shutter uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // Your application code...
//! }
//! ```
//!
//! # Debug Visualization
//!
//! Any type implementing [`DebugTree`] can be rendered with [`TreeFormatter`]:
//!
//! ```ignore
//! use shutter_core::logging::{TreeFormatter, TreeFormatOptions};
//!
//! let formatter = TreeFormatter::with_options(TreeFormatOptions::minimal());
//! println!("{}", formatter.format(&projection.snapshot()));
//! ```

use std::fmt::Write as FmtWrite;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "shutter_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "shutter_core::signal";
    /// Observer registry target.
    pub const OBSERVER: &str = "shutter_core::observer";
    /// Item model target.
    pub const MODEL: &str = "shutter::model";
    /// Selection broadcasting target.
    pub const SELECTION: &str = "shutter::selection";
    /// Tree projection target.
    pub const PROJECTION: &str = "shutter::projection";
    /// Slideshow player target.
    pub const SLIDESHOW: &str = "shutter::slideshow";
    /// Persistence target.
    pub const STORE: &str = "shutter::store";
    /// Configuration target.
    pub const CONFIG: &str = "shutter::config";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact dash-prefixed representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node IDs.
    pub show_ids: bool,
    /// Whether to show node kinds.
    pub show_kinds: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_kinds: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output: labels only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_kinds: false,
            ..Default::default()
        }
    }
}

/// A node that can be rendered by [`TreeFormatter`].
pub trait DebugTree {
    /// Display label of this node.
    fn label(&self) -> String;

    /// Short kind name, shown when `show_kinds` is set.
    fn kind_name(&self) -> &'static str;

    /// Identifier, shown when `show_ids` is set.
    fn debug_id(&self) -> Option<u64> {
        None
    }

    /// Child nodes in display order.
    fn child_nodes(&self) -> Vec<&Self>;
}

/// Renders [`DebugTree`] structures as indented text.
#[derive(Debug, Clone, Default)]
pub struct TreeFormatter {
    options: TreeFormatOptions,
}

impl TreeFormatter {
    /// Create a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format a whole tree. The root itself is rendered at depth zero.
    pub fn format<N: DebugTree>(&self, root: &N) -> String {
        let mut output = String::new();
        self.format_into(root, 0, true, &mut output);
        output
    }

    /// Format only the children of `root`, each as a depth-zero entry.
    ///
    /// Useful for trees with an invisible root.
    pub fn format_children<N: DebugTree>(&self, root: &N) -> String {
        let mut output = String::new();
        let children = root.child_nodes();
        if children.is_empty() {
            output.push_str("(empty)\n");
        }
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.format_into(child, 0, i + 1 == count, &mut output);
        }
        output
    }

    fn format_into<N: DebugTree>(&self, node: &N, depth: usize, is_last: bool, output: &mut String) {
        if let Some(max) = self.options.max_depth {
            if depth > max {
                return;
            }
        }

        output.push_str(&self.build_prefix(depth, is_last));

        let label = node.label();
        output.push_str(if label.is_empty() { "(unnamed)" } else { &label });

        if self.options.show_ids {
            if let Some(id) = node.debug_id() {
                let _ = write!(output, " [{id}]");
            }
        }
        if self.options.show_kinds {
            let _ = write!(output, " ({})", node.kind_name());
        }
        output.push('\n');

        let children = node.child_nodes();
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.format_into(child, depth + 1, i + 1 == count, output);
        }
    }

    /// Build the prefix string for a tree node.
    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            for _ in 0..self.options.indent_size {
                prefix.push(' ');
            }
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

/// A guard that emits a tracing span when dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "shutter::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
