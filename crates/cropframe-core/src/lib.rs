//! Cropframe Core - constrained pan/zoom crop engine
//!
//! This crate provides the geometry behind an interactive image cropper: a
//! transform engine that never lets the crop window leave the image, a
//! gesture interpreter that turns touch and scroll input into transform
//! deltas, and a display mapper that renders a crop into a preview box.

pub mod cropper;
pub mod display;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod gesture;
pub mod transform;

pub use cropper::Cropper;
pub use display::{map_crop_to_display, DisplayPlacement};
pub use error::CropError;
pub use extract::{apply_shape_mask, extract_crop, render_preview, PreviewFilter};
pub use geometry::{Affine, ImageGeometry, Point, Rect, Size, Vec2};
pub use gesture::{clamp_scale, GestureInterpreter, PointerEvent, ScrollDirection, TouchId};
pub use transform::{AppliedDelta, CropEngine, TransformDelta};

// Re-exported so bindings share the same pixel buffer types
pub use image;

use serde::{Deserialize, Serialize};

/// Native pixel size of the loaded source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Texture size of a decoded image.
    pub fn of_image(image: &image::RgbImage) -> Self {
        Self::new(image.width(), image.height())
    }

    /// Reject textures with a zero dimension.
    pub fn validate(&self) -> Result<(), CropError> {
        if self.width == 0 || self.height == 0 {
            return Err(CropError::InvalidTexture {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Crop rectangle in native source pixels.
///
/// To show an entire 100 x 100 image, use `(100, 100, 50, 50)`: full size,
/// centered on the image center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropResult {
    pub width: u32,
    pub height: u32,
    pub center_x: u32,
    pub center_y: u32,
}

impl CropResult {
    pub fn new(width: u32, height: u32, center_x: u32, center_y: u32) -> Self {
        Self {
            width,
            height,
            center_x,
            center_y,
        }
    }

    /// Left edge in source pixels (may be fractional for odd sizes).
    pub fn left(&self) -> f64 {
        self.center_x as f64 - self.width as f64 / 2.0
    }

    /// Top edge in source pixels, measured along the same axis as `center_y`.
    pub fn top(&self) -> f64 {
        self.center_y as f64 - self.height as f64 / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Shape of the crop window.
///
/// Only the chrome and the final mask differ between shapes; the transform
/// math is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropShape {
    #[default]
    Rectangle,
    Circle,
}

impl CropShape {
    /// Check whether `point` falls inside the shape inscribed in `window`.
    pub fn contains(&self, window: &Rect, point: Point) -> bool {
        match self {
            CropShape::Rectangle => geometry::contains_point(window, point),
            CropShape::Circle => {
                if window.width() <= 0.0 || window.height() <= 0.0 {
                    return false;
                }
                let center = window.center();
                let nx = (point.x - center.x) / (window.width() / 2.0);
                let ny = (point.y - center.y) / (window.height() / 2.0);
                nx * nx + ny * ny <= 1.0
            }
        }
    }
}

/// Gesture tuning for a cropper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    /// Minimum absolute zoom
    pub zoom_min: f64,
    /// Maximum absolute zoom
    pub zoom_max: f64,
    /// Zoom change per scroll step
    pub zoom_delta: f64,
    /// Touch count that drives panning; the pan is divided by it
    pub translation_touches: usize,
    pub do_translation_x: bool,
    pub do_translation_y: bool,
    pub do_scale: bool,
    pub do_rotation: bool,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            zoom_min: 1.0,
            zoom_max: 2.0,
            zoom_delta: 0.05,
            translation_touches: 1,
            do_translation_x: true,
            do_translation_y: true,
            do_scale: true,
            do_rotation: false,
        }
    }
}

impl CropperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the zoom bounds, scroll step and touch divisor.
    pub fn validate(&self) -> Result<(), CropError> {
        if !(self.zoom_min.is_finite() && self.zoom_min > 0.0) {
            return Err(CropError::InvalidConfig(format!(
                "zoom_min must be positive, got {}",
                self.zoom_min
            )));
        }
        if !(self.zoom_max.is_finite() && self.zoom_max >= self.zoom_min) {
            return Err(CropError::InvalidConfig(format!(
                "zoom_max ({}) must be >= zoom_min ({})",
                self.zoom_max, self.zoom_min
            )));
        }
        if !(0.0..1.0).contains(&self.zoom_delta) {
            return Err(CropError::InvalidConfig(format!(
                "zoom_delta must be in [0, 1), got {}",
                self.zoom_delta
            )));
        }
        if self.translation_touches == 0 {
            return Err(CropError::InvalidConfig(
                "translation_touches must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CropperConfig::new();
        assert_eq!(config.zoom_min, 1.0);
        assert_eq!(config.zoom_max, 2.0);
        assert_eq!(config.zoom_delta, 0.05);
        assert_eq!(config.translation_touches, 1);
        assert!(config.do_translation_x && config.do_translation_y && config.do_scale);
        assert!(!config.do_rotation);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_inverted_zoom_bounds() {
        let mut config = CropperConfig::new();
        config.zoom_max = 0.5;
        assert!(matches!(config.validate(), Err(CropError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_zero_touches() {
        let mut config = CropperConfig::new();
        config.translation_touches = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_bad_zoom_delta() {
        let mut config = CropperConfig::new();
        config.zoom_delta = 1.0;
        assert!(config.validate().is_err());
        config.zoom_delta = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_texture_validate() {
        assert!(Texture::new(1, 1).validate().is_ok());
        assert!(Texture::new(0, 5).validate().is_err());
    }

    #[test]
    fn test_texture_of_image() {
        let img = image::RgbImage::new(32, 16);
        assert_eq!(Texture::of_image(&img), Texture::new(32, 16));
    }

    #[test]
    fn test_crop_result_edges() {
        let crop = CropResult::new(100, 50, 60, 40);
        assert_eq!(crop.left(), 10.0);
        assert_eq!(crop.top(), 15.0);
        assert!(!crop.is_empty());
        assert!(CropResult::new(0, 10, 5, 5).is_empty());
    }

    #[test]
    fn test_rectangle_shape_contains_corners() {
        let window = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(CropShape::Rectangle.contains(&window, Point::new(0.0, 0.0)));
        assert!(CropShape::Rectangle.contains(&window, Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_circle_shape_excludes_corners() {
        let window = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(CropShape::Circle.contains(&window, Point::new(50.0, 50.0)));
        assert!(CropShape::Circle.contains(&window, Point::new(50.0, 0.0)));
        assert!(!CropShape::Circle.contains(&window, Point::new(2.0, 2.0)));
        assert!(!CropShape::Circle.contains(&Rect::default(), Point::ORIGIN));
    }
}
