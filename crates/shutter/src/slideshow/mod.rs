//! Slideshow playback.
//!
//! A [`FrameSequence`] is taken from an album or a photo list once, when the
//! slideshow is created. The [`SlideshowPlayer`] then walks it on its own
//! thread and never touches the live gallery.

mod controls;
mod player;
mod sequence;

pub use controls::TransportControls;
pub use player::{PlayerBuilder, PlayerConfig, PlayerState, SlideshowPlayer};
pub use sequence::{ASSORTED_TITLE, Frame, FrameSequence};
