//! Media collaborators: image decoding and icon lookup.
//!
//! Both are seams. The gallery model talks to them through the
//! [`ImageProvider`] and [`IconResolver`] traits; the implementations here
//! cover the common case (files decoded with the `image` crate, icons from
//! configuration) and in-memory use.

mod icon;
mod provider;

pub use icon::{ALBUM_ICON_KEY, Icon, IconResolver, IconSize, PHOTO_ICON_KEY, ThemedIconResolver};
pub use provider::{
    Image, ImageProvider, MemoryImageProvider, RasterImage, RasterImageProvider, fit_within,
};
