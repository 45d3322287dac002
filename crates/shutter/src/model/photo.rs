//! Photos: leaf items holding image data.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use shutter_core::DeliveryReport;

use super::album::Album;
use super::change::{ChangeBus, ChangeKind, ItemChangeEvent};
use super::item::{Item, ItemId, ItemInfo, ItemKind, ItemNode};
use crate::context::GalleryContext;
use crate::error::ImageResult;
use crate::media::{Icon, IconResolver, IconSize, Image, ImageProvider, PHOTO_ICON_KEY, fit_within};

/// A single photo.
///
/// The original decoded image is kept for the lifetime of the photo; scale
/// requests always start from it, so repeated zooming does not degrade
/// quality.
pub struct Photo {
    id: ItemId,
    this: Weak<Photo>,
    path: PathBuf,
    info: RwLock<ItemInfo>,
    original: Arc<dyn Image>,
    current: RwLock<Arc<dyn Image>>,
    album: RwLock<Weak<Album>>,
    changes: ChangeBus,
}

impl Photo {
    /// Decode the image at `path` with `images` and wrap it in a photo.
    pub fn open(path: impl Into<PathBuf>, images: &dyn ImageProvider) -> ImageResult<Arc<Self>> {
        let path = path.into();
        let image = images.open(&path)?;
        Ok(Self::from_image(path, image))
    }

    /// Wrap an already decoded image.
    pub fn from_image(path: impl Into<PathBuf>, image: Arc<dyn Image>) -> Arc<Self> {
        let path = path.into();
        Arc::new_cyclic(|this| Self {
            id: ItemId::next(),
            this: this.clone(),
            path,
            info: RwLock::new(ItemInfo::default()),
            current: RwLock::new(image.clone()),
            original: image,
            album: RwLock::new(Weak::new()),
            changes: ChangeBus::new(),
        })
    }

    /// Location of the image file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The album currently holding this photo.
    pub fn album(&self) -> Option<Arc<Album>> {
        self.album.read().upgrade()
    }

    pub(crate) fn set_album(&self, album: Weak<Album>) {
        *self.album.write() = album;
    }

    /// The image as currently scaled.
    pub fn image(&self) -> Arc<dyn Image> {
        self.current.read().clone()
    }

    /// The image as decoded.
    pub fn original_image(&self) -> Arc<dyn Image> {
        self.original.clone()
    }

    /// Dimensions of the current image.
    pub fn dimensions(&self) -> (u32, u32) {
        let image = self.current.read();
        (image.width(), image.height())
    }

    /// Scale the original to fit within `width` x `height`, keeping its
    /// aspect ratio, and publish a state-change event.
    pub fn scale_image(&self, width: u32, height: u32) -> ImageResult<DeliveryReport> {
        let scaled = self.thumbnail(width, height)?;
        *self.current.write() = scaled;
        Ok(self.publish_self(ChangeKind::StateChange))
    }

    /// Restore the current image to the original size and publish a
    /// state-change event.
    pub fn reset_image(&self) -> DeliveryReport {
        *self.current.write() = self.original.clone();
        self.publish_self(ChangeKind::StateChange)
    }

    /// An aspect-fit copy of the original. Does not change the current image.
    pub fn thumbnail(&self, width: u32, height: u32) -> ImageResult<Arc<dyn Image>> {
        let (fit_width, fit_height) =
            fit_within((self.original.width(), self.original.height()), width, height);
        self.original.scale(fit_width, fit_height)
    }

    /// The icon to display, using the configured thumbnail size when the
    /// photo has no custom icon. Falls back to the themed photo icon if the
    /// thumbnail cannot be produced.
    pub fn icon_with(&self, context: &GalleryContext) -> Icon {
        if let Some(icon) = self.custom_icon() {
            return icon;
        }
        let view = &context.config().gallery_view;
        match self.thumbnail(view.thumbnail_width, view.thumbnail_height) {
            Ok(thumbnail) => Icon::Image(thumbnail),
            Err(_) => context.icons().resolve(PHOTO_ICON_KEY, IconSize::Large),
        }
    }

    fn publish_self(&self, kind: ChangeKind) -> DeliveryReport {
        match self.this.upgrade() {
            Some(this) => self.changes.publish(&ItemChangeEvent::about(Item::Photo(this), kind)),
            None => DeliveryReport::empty(),
        }
    }
}

impl ItemNode for Photo {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Photo
    }

    /// The explicit name, or the file name of the path.
    fn name(&self) -> String {
        if let Some(name) = &self.info.read().name {
            return name.clone();
        }
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn set_name(&self, name: &str) -> DeliveryReport {
        self.info.write().name = Some(name.to_string());
        self.publish_self(ChangeKind::Rename)
    }

    fn description(&self) -> String {
        self.info.read().description.clone()
    }

    fn set_description(&self, description: &str) -> DeliveryReport {
        self.info.write().description = description.to_string();
        self.publish_self(ChangeKind::StateChange)
    }

    fn child_count(&self) -> usize {
        0
    }

    fn custom_icon(&self) -> Option<Icon> {
        self.info.read().icon.clone()
    }

    fn set_icon(&self, icon: Option<Icon>) -> DeliveryReport {
        self.info.write().icon = icon;
        self.publish_self(ChangeKind::StateChange)
    }

    fn icon(&self, icons: &dyn IconResolver) -> Icon {
        self.custom_icon()
            .unwrap_or_else(|| icons.resolve(PHOTO_ICON_KEY, IconSize::Large))
    }

    fn changes(&self) -> &ChangeBus {
        &self.changes
    }
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageError;
    use crate::media::{MemoryImageProvider, RasterImage, ThemedIconResolver};
    use crate::model::ChangeObserver;
    use parking_lot::Mutex;
    use shutter_core::ObserverError;

    #[derive(Default)]
    struct Kinds(Mutex<Vec<ChangeKind>>);

    impl ChangeObserver for Kinds {
        fn on_change(&self, event: &ItemChangeEvent) -> Result<(), ObserverError> {
            self.0.lock().push(event.kind);
            Ok(())
        }
    }

    fn landscape() -> Arc<Photo> {
        Photo::from_image("/photos/wide.png", Arc::new(RasterImage::blank(400, 300)))
    }

    #[test]
    fn test_name_falls_back_to_file_name() {
        let photo = landscape();
        assert_eq!(photo.name(), "wide.png");
        photo.set_name("Sunset");
        assert_eq!(photo.name(), "Sunset");
        assert_eq!(photo.child_count(), 0);
    }

    #[test]
    fn test_scale_keeps_aspect_ratio() {
        let photo = landscape();
        let kinds = Arc::new(Kinds::default());
        photo.changes().register(kinds.clone());

        photo.scale_image(100, 100).unwrap();
        assert_eq!(photo.dimensions(), (100, 75));

        photo.scale_image(800, 300).unwrap();
        assert_eq!(photo.dimensions(), (400, 300));

        photo.reset_image();
        assert_eq!(photo.dimensions(), (400, 300));
        assert_eq!(
            *kinds.0.lock(),
            vec![ChangeKind::StateChange, ChangeKind::StateChange, ChangeKind::StateChange]
        );
    }

    #[test]
    fn test_thumbnail_does_not_touch_current_image() {
        let photo = landscape();
        let thumb = photo.thumbnail(48, 48).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (48, 36));
        assert_eq!(photo.dimensions(), (400, 300));
    }

    #[test]
    fn test_open_through_provider() {
        let provider = MemoryImageProvider::new();
        provider.insert_blank("/photos/a.png", 2, 2);

        let photo = Photo::open("/photos/a.png", &provider).unwrap();
        assert_eq!(photo.path(), Path::new("/photos/a.png"));
        assert!(photo.album().is_none());
        assert!(matches!(
            Photo::open("/photos/missing.png", &provider),
            Err(ImageError::Open { .. })
        ));
    }

    #[test]
    fn test_icons() {
        let photo = landscape();
        let resolver = ThemedIconResolver::default();
        assert!(matches!(
            photo.icon(&resolver),
            Icon::Themed { size: IconSize::Large, .. }
        ));

        let context = GalleryContext::in_memory();
        let icon = photo.icon_with(&context);
        assert!(icon.is_image());
        assert_eq!(icon.dimensions(), (48, 36));

        photo.set_icon(Some(Icon::Themed {
            key: "star".into(),
            size: IconSize::Medium,
        }));
        assert_eq!(photo.icon_with(&context).dimensions(), (32, 32));
    }
}
