//! Error types for the gallery crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::ItemId;

/// Errors raised by the item model and the gallery controller.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The item is already part of this collection.
    #[error("item {0} is already in this collection")]
    DuplicateItem(ItemId),

    /// The item is not part of this collection.
    #[error("item {0} is not in this collection")]
    NotFound(ItemId),

    /// The photo still belongs to another album; remove it there first.
    #[error("photo {photo} still belongs to album {album}")]
    AlreadyOwned {
        /// The photo being added.
        photo: ItemId,
        /// The album that currently owns it.
        album: ItemId,
    },

    /// A weak reference points at an item that has since been removed.
    #[error("reference to item {0} is stale: the item was removed")]
    StaleReference(ItemId),

    /// A name was required but none was supplied.
    #[error("a non-empty name is required")]
    EmptyName,

    /// An album with this name already exists.
    #[error("an album named {0:?} already exists")]
    DuplicateName(String),

    /// The operation needs a selected item.
    #[error("nothing is selected")]
    NothingSelected,

    /// The operation needs a selected album.
    #[error("no album is selected")]
    NoAlbumSelected,

    /// The operation needs a selected photo.
    #[error("no photo is selected")]
    NoPhotoSelected,

    /// Opening or scaling an image failed.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Errors raised by image providers.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The file could not be read.
    #[error("failed to open image {path}: {source}")]
    Open {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be decoded.
    #[error("failed to decode image {path}: {message}")]
    Decode {
        /// Path that was requested.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// A scale request had a zero dimension.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl ImageError {
    /// Create a decode error.
    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by the tree projection.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The node id does not exist in the tree.
    #[error("unknown tree node {0}")]
    UnknownNode(u64),

    /// The node is a placeholder and cannot be selected.
    #[error("tree node {0} is a placeholder and cannot be selected")]
    NotSelectable(u64),

    /// The item has no node in the tree.
    #[error("item {0} is not shown in the tree")]
    NotShown(ItemId),
}

/// Errors raised by the slideshow player.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// There is nothing to play.
    #[error("slideshow sequence is empty")]
    EmptySequence,

    /// The player was stopped; a new player is required.
    #[error("slideshow player was stopped and cannot be restarted")]
    Stopped,

    /// The playback thread could not be spawned.
    #[error("failed to spawn playback thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("config I/O error at {path}: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(String),

    /// A value is out of range.
    #[error("invalid config value for {key}: {message}")]
    Invalid {
        /// Dotted key of the offending value.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Errors raised by gallery persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the store failed.
    #[error("store I/O error at {path}: {source}")]
    Io {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The stored document could not be parsed.
    #[error("failed to parse gallery store: {0}")]
    Parse(String),

    /// The gallery could not be serialized.
    #[error("failed to serialize gallery store: {0}")]
    Serialize(String),

    /// Rebuilding the gallery from records failed.
    #[error("failed to restore gallery: {0}")]
    Restore(#[from] GalleryError),
}

/// Result alias for model operations.
pub type GalleryResult<T> = Result<T, GalleryError>;
/// Result alias for image operations.
pub type ImageResult<T> = Result<T, ImageError>;
/// Result alias for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;
/// Result alias for player operations.
pub type PlayerResult<T> = Result<T, PlayerError>;
/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
/// Result alias for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;
