//! Typed gallery configuration.
//!
//! [`GalleryConfig`] replaces a process-wide settings registry: it is
//! constructed once (usually loaded from disk), validated, and handed to the
//! components that need it through a [`GalleryContext`](crate::GalleryContext).
//!
//! Every section is `#[serde(default)]`, so a partial file only overrides
//! the keys it names.
//!
//! # Example
//!
//! ```ignore
//! use shutter::config::GalleryConfig;
//!
//! let config = GalleryConfig::load_toml("gallery.toml")?;
//! assert!(config.slideshow.interval_ms > 0);
//! config.save_json("gallery.json")?;
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shutter_core::logging::targets;

use crate::error::{ConfigError, ConfigResult};
use crate::store::atomic_write;

/// Root configuration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GalleryConfig {
    /// Tree view presentation.
    pub gallery_view: GalleryViewConfig,
    /// Slideshow playback.
    pub slideshow: SlideshowConfig,
    /// Fallback icons.
    pub icons: IconConfig,
}

/// Tree view presentation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryViewConfig {
    /// Width of photo thumbnails in pixels.
    pub thumbnail_width: u32,
    /// Height of photo thumbnails in pixels.
    pub thumbnail_height: u32,
    /// Append the photo count to album labels.
    pub show_album_count: bool,
    /// Show photo names as tree labels.
    pub show_photo_name: bool,
    /// Label of the placeholder row under empty albums.
    pub placeholder_label: String,
}

impl Default for GalleryViewConfig {
    fn default() -> Self {
        Self {
            thumbnail_width: 48,
            thumbnail_height: 48,
            show_album_count: false,
            show_photo_name: true,
            placeholder_label: "[no images]".to_string(),
        }
    }
}

/// Slideshow playback options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowConfig {
    /// Milliseconds between frames.
    pub interval_ms: u64,
    /// Start slideshows in fullscreen mode.
    pub fullscreen_default: bool,
    /// Background color as `#rrggbb`.
    pub background_color: String,
}

impl SlideshowConfig {
    /// The frame interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            fullscreen_default: false,
            background_color: "#000000".to_string(),
        }
    }
}

/// Fallback icon options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Icon file used for albums without a custom icon.
    pub album_icon: Option<PathBuf>,
    /// Icon file used for photos without a custom icon or thumbnail.
    pub photo_icon: Option<PathBuf>,
    /// Theme used for keys without a configured file.
    pub theme: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            album_icon: None,
            photo_icon: None,
            theme: "default".to_string(),
        }
    }
}

impl GalleryConfig {
    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        let view = &self.gallery_view;
        if view.thumbnail_width == 0 {
            return Err(invalid("gallery_view.thumbnail_width", "must be at least 1"));
        }
        if view.thumbnail_height == 0 {
            return Err(invalid("gallery_view.thumbnail_height", "must be at least 1"));
        }
        if self.slideshow.interval_ms == 0 {
            return Err(invalid("slideshow.interval_ms", "must be at least 1"));
        }
        if !is_hex_color(&self.slideshow.background_color) {
            return Err(invalid(
                "slideshow.background_color",
                format!("{:?} is not a #rrggbb color", self.slideshow.background_color),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load_toml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&read(path)?)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded TOML config");
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let config = Self::from_json_str(&read(path)?)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded JSON config");
        Ok(config)
    }

    /// Save as TOML, replacing the file atomically.
    pub fn save_toml(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        write(path.as_ref(), content.as_bytes())
    }

    /// Save as JSON, replacing the file atomically.
    pub fn save_json(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        write(path.as_ref(), content.as_bytes())
    }
}

fn invalid(key: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        message: message.into(),
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn read(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, bytes: &[u8]) -> ConfigResult<()> {
    atomic_write(path, bytes).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GalleryConfig::default();
        config.validate().unwrap();
        assert_eq!(config.slideshow.interval(), Duration::from_secs(3));
        assert!(!config.gallery_view.show_album_count);
        assert!(config.gallery_view.show_photo_name);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GalleryConfig::from_toml_str(
            r#"
            [slideshow]
            interval_ms = 250

            [gallery_view]
            show_album_count = true
            "#,
        )
        .unwrap();

        assert_eq!(config.slideshow.interval_ms, 250);
        assert!(config.gallery_view.show_album_count);
        assert_eq!(config.gallery_view.thumbnail_width, 48);
        assert_eq!(config.slideshow.background_color, "#000000");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = GalleryConfig::from_toml_str("[slideshow]\ninterval_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "slideshow.interval_ms", .. }));

        let err =
            GalleryConfig::from_json_str(r#"{"slideshow": {"background_color": "black"}}"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "slideshow.background_color", .. }));

        let err = GalleryConfig::from_toml_str("[gallery_view]\nthumbnail_height = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            GalleryConfig::from_toml_str("slideshow = ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GalleryConfig::default();
        config.slideshow.fullscreen_default = true;
        config.icons.album_icon = Some(PathBuf::from("icons/album.png"));

        let toml_path = dir.path().join("gallery.toml");
        config.save_toml(&toml_path).unwrap();
        assert_eq!(GalleryConfig::load_toml(&toml_path).unwrap(), config);

        let json_path = dir.path().join("gallery.json");
        config.save_json(&json_path).unwrap();
        assert_eq!(GalleryConfig::load_json(&json_path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GalleryConfig::load_toml(dir.path().join("absent.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
