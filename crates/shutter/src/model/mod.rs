//! The gallery item model.
//!
//! A [`Gallery`] holds [`Album`]s, an album holds [`Photo`]s. Every node owns
//! a [`ChangeBus`]; mutations publish [`ItemChangeEvent`]s on the bus of the
//! node whose sequence changed, or of the renamed node itself. Selection goes
//! through the gallery's [`SelectionBus`].
//!
//! Observers never receive events they did not register for: an observer of
//! an album's bus sees additions and removals in that album, not renames of
//! its photos.

mod album;
mod change;
mod gallery;
mod item;
mod photo;
mod selection;

pub use album::Album;
pub use change::{ChangeBus, ChangeKind, ChangeObserver, EventSubject, ItemChangeEvent};
pub use gallery::Gallery;
pub use item::{Item, ItemId, ItemKind, ItemNode};
pub use photo::Photo;
pub use selection::{SelectionBus, SelectionKind, SelectionObserver};
