//! Icon handles and the icon resolver seam.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::provider::Image;
use crate::config::IconConfig;

/// Logical key of the fallback icon for albums.
pub const ALBUM_ICON_KEY: &str = "album";
/// Logical key of the fallback icon for photos.
pub const PHOTO_ICON_KEY: &str = "photo";

/// Size classes for themed icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IconSize {
    /// 16x16 pixels.
    Small,
    /// 32x32 pixels.
    Medium,
    /// 48x48 pixels.
    Large,
    /// The default size, 16x16 pixels.
    #[default]
    Default,
}

impl IconSize {
    /// Edge length in pixels.
    pub fn pixels(self) -> u32 {
        match self {
            Self::Small | Self::Default => 16,
            Self::Medium => 32,
            Self::Large => 48,
        }
    }

    /// Width in pixels.
    pub fn width(self) -> u32 {
        self.pixels()
    }

    /// Height in pixels.
    pub fn height(self) -> u32 {
        self.pixels()
    }

    /// Resolution string such as `"16x16"`.
    pub fn resolution(self) -> String {
        format!("{}x{}", self.width(), self.height())
    }
}

/// A displayable icon handle. Rendering is up to the UI.
#[derive(Clone)]
pub enum Icon {
    /// A theme icon identified by logical key and size class.
    Themed {
        /// Logical key, e.g. [`ALBUM_ICON_KEY`].
        key: String,
        /// Requested size class.
        size: IconSize,
    },
    /// An icon loaded from a file.
    File {
        /// Location of the icon file.
        path: PathBuf,
        /// Requested size class.
        size: IconSize,
    },
    /// An icon made from image pixels, e.g. a photo thumbnail.
    Image(Arc<dyn Image>),
}

impl Icon {
    /// Pixel dimensions the icon is meant to be drawn at.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Themed { size, .. } | Self::File { size, .. } => (size.width(), size.height()),
            Self::Image(image) => (image.width(), image.height()),
        }
    }

    /// Returns `true` for icons built from image pixels.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Themed { key, size } => write!(f, "Icon::Themed({key}, {})", size.resolution()),
            Self::File { path, size } => {
                write!(f, "Icon::File({}, {})", path.display(), size.resolution())
            }
            Self::Image(image) => write!(f, "Icon::Image({}x{})", image.width(), image.height()),
        }
    }
}

/// Resolves logical icon keys to displayable icons.
///
/// Used as the fallback when an album or photo has no custom icon.
pub trait IconResolver: Send + Sync {
    /// Return the icon for `key` at `size`.
    fn resolve(&self, key: &str, size: IconSize) -> Icon;
}

/// Resolver that maps the album and photo keys to configured files and
/// falls back to theme icons for everything else.
#[derive(Debug, Clone, Default)]
pub struct ThemedIconResolver {
    theme: String,
    album_icon: Option<PathBuf>,
    photo_icon: Option<PathBuf>,
}

impl ThemedIconResolver {
    /// Build a resolver from icon configuration.
    pub fn from_config(config: &IconConfig) -> Self {
        Self {
            theme: config.theme.clone(),
            album_icon: config.album_icon.clone(),
            photo_icon: config.photo_icon.clone(),
        }
    }

    /// Name of the icon theme used for unmapped keys.
    pub fn theme(&self) -> &str {
        &self.theme
    }
}

impl IconResolver for ThemedIconResolver {
    fn resolve(&self, key: &str, size: IconSize) -> Icon {
        let mapped = match key {
            ALBUM_ICON_KEY => self.album_icon.as_ref(),
            PHOTO_ICON_KEY => self.photo_icon.as_ref(),
            _ => None,
        };
        match mapped {
            Some(path) => Icon::File {
                path: path.clone(),
                size,
            },
            None => Icon::Themed {
                key: key.to_string(),
                size,
            },
        }
    }
}
