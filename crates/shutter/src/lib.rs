//! Shutter - the core of a photo gallery application.
//!
//! This crate provides everything behind the gallery window except the
//! widgets themselves:
//!
//! - **Item Model**: a [`Gallery`] of [`Album`]s of [`Photo`]s, each node with
//!   its own change bus
//! - **Selection**: last-selected tracking and selection notifications
//! - **Tree Projection**: an incrementally maintained tree view of the gallery
//! - **Slideshow**: a threaded player over an immutable frame sequence
//! - **Persistence**: TOML/JSON gallery stores and configuration files
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use shutter::{Gallery, GalleryContext, GalleryController, ProjectionOptions, TreeProjection};
//!
//! let gallery = Arc::new(Gallery::new());
//! let controller = GalleryController::new(gallery.clone(), Arc::new(GalleryContext::in_memory()));
//!
//! let tree = TreeProjection::new(ProjectionOptions::default());
//! tree.initialize(&gallery);
//!
//! controller.add_album("Vacation").unwrap();
//! assert_eq!(tree.snapshot().root_labels(), ["Vacation"]);
//! ```

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod media;
pub mod model;
pub mod slideshow;
pub mod store;
pub mod view;

pub use config::{GalleryConfig, GalleryViewConfig, IconConfig, SlideshowConfig};
pub use context::GalleryContext;
pub use controller::{GalleryController, ZoomController};
pub use error::{
    ConfigError, ConfigResult, GalleryError, GalleryResult, ImageError, ImageResult,
    PlayerError, PlayerResult, ProjectionError, ProjectionResult, StoreError, StoreResult,
};
pub use model::{
    Album, ChangeBus, ChangeKind, ChangeObserver, EventSubject, Gallery, Item, ItemChangeEvent,
    ItemId, ItemKind, ItemNode, Photo, SelectionBus, SelectionKind, SelectionObserver,
};
pub use slideshow::{
    Frame, FrameSequence, PlayerBuilder, PlayerConfig, PlayerState, SlideshowPlayer,
    TransportControls,
};
pub use store::{FileStore, GalleryReader, GalleryRecord, GalleryWriter};
pub use view::{NodeContent, NodeId, ProjectionOptions, TreeProjection, TreeSnapshot};

pub use shutter_core::{DeliveryReport, ObserverError, ObserverFailure, Signal};

static_assertions::assert_impl_all!(Gallery: Send, Sync);
static_assertions::assert_impl_all!(Album: Send, Sync);
static_assertions::assert_impl_all!(Photo: Send, Sync);
static_assertions::assert_impl_all!(TreeProjection: Send, Sync);
static_assertions::assert_impl_all!(SlideshowPlayer: Send, Sync);
static_assertions::assert_impl_all!(GalleryContext: Send, Sync);
