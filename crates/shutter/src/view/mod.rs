//! View-side models.
//!
//! The gallery tree shown to the user is a [`TreeProjection`]: built once,
//! then updated in place from change events. Renderers read it through node
//! queries, its [`ProjectionSignals`], or a [`TreeSnapshot`].

mod projection;
mod snapshot;
mod tree;

pub use projection::{ProjectionOptions, ProjectionSignals, TreeProjection};
pub use snapshot::{SnapshotNode, TreeSnapshot};
pub use tree::{NodeContent, NodeId};
