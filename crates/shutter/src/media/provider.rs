//! Image provider seam.
//!
//! The model never decodes bytes itself. Photos receive their pixels from an
//! [`ImageProvider`] and ask the resulting [`Image`] for scaled variants.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;
use image::imageops::FilterType;
use parking_lot::RwLock;

use crate::error::{ImageError, ImageResult};

/// A decoded image that can produce rescaled copies of itself.
pub trait Image: Send + Sync {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Produce a copy scaled to exactly `width` x `height`.
    fn scale(&self, width: u32, height: u32) -> ImageResult<Arc<dyn Image>>;
}

impl fmt::Debug for dyn Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image({}x{})", self.width(), self.height())
    }
}

/// Resolves file paths to decoded images.
pub trait ImageProvider: Send + Sync {
    /// Decode the image stored at `path`.
    fn open(&self, path: &Path) -> ImageResult<Arc<dyn Image>>;
}

/// Largest size with the aspect ratio of `source` that fits in
/// `width` x `height`. Dimensions never drop below one pixel.
pub fn fit_within(source: (u32, u32), width: u32, height: u32) -> (u32, u32) {
    let (source_width, source_height) = source;
    if source_width == 0 || source_height == 0 || width == 0 || height == 0 {
        return (width.max(1), height.max(1));
    }

    let box_ratio = f64::from(width) / f64::from(height);
    let image_ratio = f64::from(source_width) / f64::from(source_height);

    if box_ratio < image_ratio {
        let fitted = (f64::from(width) / image_ratio) as u32;
        (width, fitted.max(1))
    } else {
        let fitted = (f64::from(height) * image_ratio) as u32;
        (fitted.max(1), height)
    }
}

/// An [`Image`] backed by the `image` crate.
#[derive(Clone)]
pub struct RasterImage {
    pixels: DynamicImage,
}

impl RasterImage {
    /// Wrap an already decoded image.
    pub fn new(pixels: DynamicImage) -> Self {
        Self { pixels }
    }

    /// A black RGB image of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(DynamicImage::new_rgb8(width, height))
    }

    /// Access the underlying pixels.
    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }
}

impl Image for RasterImage {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn scale(&self, width: u32, height: u32) -> ImageResult<Arc<dyn Image>> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        let scaled = self.pixels.resize_exact(width, height, FilterType::Triangle);
        Ok(Arc::new(Self::new(scaled)))
    }
}

/// Decodes images from disk with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterImageProvider;

impl RasterImageProvider {
    /// Create a provider.
    pub fn new() -> Self {
        Self
    }
}

impl ImageProvider for RasterImageProvider {
    fn open(&self, path: &Path) -> ImageResult<Arc<dyn Image>> {
        let pixels = image::open(path).map_err(|err| match err {
            image::ImageError::IoError(source) => ImageError::Open {
                path: path.to_path_buf(),
                source,
            },
            other => ImageError::decode(path, other.to_string()),
        })?;
        Ok(Arc::new(RasterImage::new(pixels)))
    }
}

/// Serves pre-built images registered by path.
///
/// Paths that were never inserted fail with [`ImageError::Open`] of kind
/// `NotFound`, the same way a missing file would.
#[derive(Default)]
pub struct MemoryImageProvider {
    images: RwLock<HashMap<PathBuf, Arc<dyn Image>>>,
}

impl MemoryImageProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image under `path`, replacing any previous entry.
    pub fn insert(&self, path: impl Into<PathBuf>, image: Arc<dyn Image>) {
        self.images.write().insert(path.into(), image);
    }

    /// Register a blank image of the given size under `path`.
    pub fn insert_blank(&self, path: impl Into<PathBuf>, width: u32, height: u32) {
        self.insert(path, Arc::new(RasterImage::blank(width, height)));
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.images.read().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.images.read().is_empty()
    }
}

impl ImageProvider for MemoryImageProvider {
    fn open(&self, path: &Path) -> ImageResult<Arc<dyn Image>> {
        self.images
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| ImageError::Open {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such image"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_landscape() {
        // 4:3 into a 100x100 box is width-constrained.
        assert_eq!(fit_within((400, 300), 100, 100), (100, 75));
    }

    #[test]
    fn test_fit_within_portrait() {
        assert_eq!(fit_within((300, 600), 100, 100), (50, 100));
    }

    #[test]
    fn test_fit_within_degenerate() {
        assert_eq!(fit_within((0, 10), 20, 30), (20, 30));
        assert_eq!(fit_within((1000, 1), 10, 10), (10, 1));
    }

    #[test]
    fn test_raster_scale() {
        let image = RasterImage::blank(8, 4);
        let scaled = image.scale(4, 2).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (4, 2));
        assert!(matches!(
            image.scale(0, 2),
            Err(ImageError::InvalidDimensions { width: 0, height: 2 })
        ));
    }

    #[test]
    fn test_memory_provider() {
        let provider = MemoryImageProvider::new();
        provider.insert_blank("/photos/a.png", 10, 20);

        let image = provider.open(Path::new("/photos/a.png")).unwrap();
        assert_eq!(image.height(), 20);
        assert!(matches!(
            provider.open(Path::new("/photos/missing.png")),
            Err(ImageError::Open { .. })
        ));
    }

    #[test]
    fn test_raster_provider_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        DynamicImage::new_rgb8(6, 3).save(&path).unwrap();

        let image = RasterImageProvider::new().open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (6, 3));

        let missing = RasterImageProvider::new().open(&dir.path().join("nope.png"));
        assert!(matches!(missing, Err(ImageError::Open { .. })));
    }
}
