//! Zoom state for a single displayed photo.

use std::sync::Arc;

use parking_lot::Mutex;
use shutter_core::DeliveryReport;
use shutter_core::logging::targets;

use crate::error::ImageResult;
use crate::media::Image;
use crate::model::{ItemNode, Photo};

const STEP: f64 = 0.1;
const MIN_FACTOR: f64 = 0.1;

/// Tracks the zoom factor of one photo and rescales it on request.
///
/// Every scale request starts from the original image, so the factor is
/// always relative to the original size.
#[derive(Debug)]
pub struct ZoomController {
    photo: Arc<Photo>,
    factor: Mutex<f64>,
}

impl ZoomController {
    /// Start at the original size.
    pub fn new(photo: Arc<Photo>) -> Self {
        Self {
            photo,
            factor: Mutex::new(1.0),
        }
    }

    /// The zoomed photo.
    pub fn photo(&self) -> &Arc<Photo> {
        &self.photo
    }

    /// Current factor relative to the original size.
    pub fn factor(&self) -> f64 {
        *self.factor.lock()
    }

    /// Enlarge by one step.
    pub fn zoom_in(&self) -> ImageResult<DeliveryReport> {
        self.step(STEP)
    }

    /// Shrink by one step, never below the minimum factor.
    pub fn zoom_out(&self) -> ImageResult<DeliveryReport> {
        self.step(-STEP)
    }

    /// Back to the original size.
    pub fn zoom_original(&self) -> DeliveryReport {
        *self.factor.lock() = 1.0;
        self.photo.reset_image()
    }

    /// Fit the photo within `width` x `height`, keeping its aspect ratio.
    pub fn zoom_to_fit(&self, width: u32, height: u32) -> ImageResult<DeliveryReport> {
        let report = self.photo.scale_image(width, height)?;
        let original = self.photo.original_image().width().max(1);
        let (scaled, _) = self.photo.dimensions();
        *self.factor.lock() = f64::from(scaled) / f64::from(original);
        Ok(report)
    }

    fn step(&self, delta: f64) -> ImageResult<DeliveryReport> {
        let factor = {
            let mut factor = self.factor.lock();
            *factor = round_tenth(*factor + delta).max(MIN_FACTOR);
            *factor
        };
        let original = self.photo.original_image();
        let width = scaled_side(original.width(), factor);
        let height = scaled_side(original.height(), factor);
        tracing::trace!(target: targets::MODEL, photo = %self.photo.id(), factor, width, height, "zoom");
        self.photo.scale_image(width, height)
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn scaled_side(side: u32, factor: f64) -> u32 {
    ((f64::from(side) * factor).round() as u32).max(1)
}
