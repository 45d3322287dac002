//! Controllers: the user actions of the gallery, minus the dialogs.

mod gallery;
mod zoom;

pub use gallery::GalleryController;
pub use zoom::ZoomController;
