//! Read-only frame sequences for playback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::media::Image;
use crate::model::{Album, ItemId, ItemNode, Photo};

/// Title used for sequences built from an arbitrary photo list.
pub const ASSORTED_TITLE: &str = "Assorted Collection";

/// One slide: a photo resolved at the time the sequence was taken.
#[derive(Debug, Clone)]
pub struct Frame {
    photo: ItemId,
    name: String,
    path: PathBuf,
    image: Arc<dyn Image>,
}

impl Frame {
    fn capture(photo: &Photo) -> Self {
        Self {
            photo: photo.id(),
            name: photo.name(),
            path: photo.path().to_path_buf(),
            image: photo.original_image(),
        }
    }

    /// Identity of the photo this frame was taken from.
    pub fn photo_id(&self) -> ItemId {
        self.photo
    }

    /// Photo name at capture time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Image file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full-size image.
    pub fn image(&self) -> &Arc<dyn Image> {
        &self.image
    }
}

/// An ordered, immutable snapshot of photos.
///
/// Later changes to the album or photos it was built from are not seen.
/// Cloning shares the frames.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    title: String,
    frames: Arc<[Frame]>,
}

impl FrameSequence {
    /// Build from explicit parts.
    pub fn new(title: impl Into<String>, frames: Vec<Frame>) -> Self {
        Self {
            title: title.into(),
            frames: frames.into(),
        }
    }

    /// Snapshot an album's photos in display order, titled with the album
    /// name.
    pub fn from_album(album: &Album) -> Self {
        let frames = album.photos().iter().map(|p| Frame::capture(p)).collect();
        Self::new(album.name(), frames)
    }

    /// Snapshot an arbitrary list of photos.
    pub fn from_photos(photos: &[Arc<Photo>]) -> Self {
        let frames = photos.iter().map(|p| Frame::capture(p)).collect();
        Self::new(ASSORTED_TITLE, frames)
    }

    /// Sequence title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`.
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// All frames in order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}
