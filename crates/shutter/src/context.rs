//! Explicit dependency bundle for gallery components.

use std::fmt;
use std::sync::Arc;

use crate::config::GalleryConfig;
use crate::media::{
    IconResolver, ImageProvider, MemoryImageProvider, RasterImageProvider, ThemedIconResolver,
};

/// Configuration plus the media collaborators, passed to whatever needs
/// them instead of being looked up globally.
///
/// Cloning is cheap; the collaborators are shared.
#[derive(Clone)]
pub struct GalleryContext {
    config: GalleryConfig,
    icons: Arc<dyn IconResolver>,
    images: Arc<dyn ImageProvider>,
}

impl GalleryContext {
    /// Assemble a context from its parts.
    pub fn new(
        config: GalleryConfig,
        icons: Arc<dyn IconResolver>,
        images: Arc<dyn ImageProvider>,
    ) -> Self {
        Self {
            config,
            icons,
            images,
        }
    }

    /// A context that decodes images from disk and resolves icons from the
    /// configuration's icon section.
    pub fn from_config(config: GalleryConfig) -> Self {
        let icons = Arc::new(ThemedIconResolver::from_config(&config.icons));
        Self::new(config, icons, Arc::new(RasterImageProvider::new()))
    }

    /// Default configuration with an empty in-memory image provider.
    pub fn in_memory() -> Self {
        let config = GalleryConfig::default();
        let icons = Arc::new(ThemedIconResolver::from_config(&config.icons));
        Self::new(config, icons, Arc::new(MemoryImageProvider::new()))
    }

    /// Replace the image provider.
    pub fn with_images(mut self, images: Arc<dyn ImageProvider>) -> Self {
        self.images = images;
        self
    }

    /// Replace the icon resolver.
    pub fn with_icons(mut self, icons: Arc<dyn IconResolver>) -> Self {
        self.icons = icons;
        self
    }

    /// Gallery configuration.
    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Icon resolver.
    pub fn icons(&self) -> &dyn IconResolver {
        self.icons.as_ref()
    }

    /// Image provider.
    pub fn images(&self) -> &dyn ImageProvider {
        self.images.as_ref()
    }
}

impl Default for GalleryContext {
    fn default() -> Self {
        Self::from_config(GalleryConfig::default())
    }
}

impl fmt::Debug for GalleryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{ALBUM_ICON_KEY, Icon, IconSize, Image};
    use std::path::{Path, PathBuf};

    #[test]
    fn test_from_config_uses_icon_section() {
        let mut config = GalleryConfig::default();
        config.icons.album_icon = Some(PathBuf::from("/icons/album.png"));
        let context = GalleryContext::from_config(config);

        assert!(matches!(
            context.icons().resolve(ALBUM_ICON_KEY, IconSize::Small),
            Icon::File { ref path, .. } if path == Path::new("/icons/album.png")
        ));
    }

    #[test]
    fn test_with_images_replaces_provider() {
        let provider = Arc::new(MemoryImageProvider::new());
        provider.insert_blank("/p/a.png", 3, 2);
        let context = GalleryContext::in_memory().with_images(provider);

        let image = context.images().open(Path::new("/p/a.png")).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert!(context.images().open(Path::new("/p/b.png")).is_err());
    }
}
