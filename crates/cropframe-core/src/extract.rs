//! Pixel-level crop extraction and preview rendering.
//!
//! The engine only produces numbers; this module turns a [`CropResult`]
//! into pixels for export and preview panes.
//!
//! # Coordinate System
//!
//! - Crop centers are in source pixels, origin at the top-left row
//! - Hosts with a y-up frame should pass [`CropResult::flip_y`] first
//! - Regions reaching past the image are clamped; output is at least 1x1

use image::{imageops, Rgb, RgbImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::display::map_crop_to_display;
use crate::error::CropError;
use crate::geometry::{Point, Rect};
use crate::{CropResult, CropShape, Texture};

/// Resampling filter for preview rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PreviewFilter {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl PreviewFilter {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> imageops::FilterType {
        match self {
            PreviewFilter::Nearest => imageops::FilterType::Nearest,
            PreviewFilter::Bilinear => imageops::FilterType::Triangle,
            PreviewFilter::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

impl CropResult {
    /// Mirror the center vertically, converting between y-up and y-down rows.
    pub fn flip_y(&self, texture_height: u32) -> CropResult {
        CropResult {
            center_y: texture_height.saturating_sub(self.center_y),
            ..*self
        }
    }
}

/// Copy the crop region out of `image`.
///
/// # Behavior
///
/// - If the region extends beyond image bounds, it is clamped
/// - Minimum output dimension is 1x1 pixels
/// - A crop covering the whole image returns a copy of the original
pub fn extract_crop(image: &RgbImage, crop: &CropResult) -> Result<RgbImage, CropError> {
    if crop.is_empty() {
        return Err(CropError::EmptyCrop);
    }
    Texture::of_image(image).validate()?;

    let (width, height) = image.dimensions();

    // Clamp each edge on its own so regions hanging off the image are cut, not shifted
    let left_f = crop.left().round();
    let top_f = crop.top().round();
    let left = (left_f.max(0.0) as u32).min(width.saturating_sub(1));
    let top = (top_f.max(0.0) as u32).min(height.saturating_sub(1));
    let right = ((left_f + crop.width as f64).max(0.0) as u32).min(width);
    let bottom = ((top_f + crop.height as f64).max(0.0) as u32).min(height);

    let out_width = right.saturating_sub(left).max(1);
    let out_height = bottom.saturating_sub(top).max(1);

    if left == 0 && top == 0 && out_width == width && out_height == height {
        return Ok(image.clone());
    }

    Ok(imageops::crop_imm(image, left, top, out_width, out_height).to_image())
}

/// Make everything outside `shape` transparent.
///
/// The shape is inscribed in the full image; a pixel is kept when its center
/// lies inside.
pub fn apply_shape_mask(image: &RgbImage, shape: CropShape) -> RgbaImage {
    let (width, height) = image.dimensions();
    let window = Rect::new(0.0, 0.0, width as f64, height as f64);

    RgbaImage::from_fn(width, height, |x, y| {
        let Rgb([r, g, b]) = *image.get_pixel(x, y);
        let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
        let alpha = if shape.contains(&window, center) { 255 } else { 0 };
        Rgba([r, g, b, alpha])
    })
}

/// Render the crop region at the size a preview box of `box_width` shows it.
///
/// Uses the same uniform scale as [`map_crop_to_display`].
pub fn render_preview(
    image: &RgbImage,
    crop: &CropResult,
    box_width: u32,
    filter: PreviewFilter,
) -> Result<RgbImage, CropError> {
    if box_width == 0 {
        return Err(CropError::InvalidFrame {
            width: 0.0,
            height: 0.0,
        });
    }
    let target = Rect::new(0.0, 0.0, box_width as f64, box_width as f64);
    let placement = map_crop_to_display(crop, Texture::of_image(image), target)?;

    let cropped = extract_crop(image, crop)?;
    let out_width = ((cropped.width() as f64 * placement.scale).round() as u32).max(1);
    let out_height = ((cropped.height() as f64 * placement.scale).round() as u32).max(1);

    if out_width == cropped.width() && out_height == cropped.height() {
        return Ok(cropped);
    }
    Ok(imageops::resize(
        &cropped,
        out_width,
        out_height,
        filter.to_image_filter(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = ((y * width + x) % 256) as u8;
            Rgb([v, v, v])
        })
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(100, 100);
        let result = extract_crop(&img, &CropResult::new(100, 100, 50, 50)).unwrap();
        assert_eq!(result.dimensions(), (100, 100));
        assert_eq!(result, img);
    }

    #[test]
    fn test_center_crop() {
        let img = test_image(10, 10);
        let result = extract_crop(&img, &CropResult::new(6, 6, 5, 5)).unwrap();

        assert_eq!(result.dimensions(), (6, 6));
        // First pixel comes from (2, 2): (2 * 10 + 2) % 256 = 22
        assert_eq!(result.get_pixel(0, 0).0, [22, 22, 22]);
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let img = test_image(10, 10);
        // Centered on the far corner: only the 2x2 inside the image remains
        let result = extract_crop(&img, &CropResult::new(4, 4, 10, 10)).unwrap();
        assert_eq!(result.dimensions(), (2, 2));

        let result = extract_crop(&img, &CropResult::new(8, 8, 0, 0)).unwrap();
        assert_eq!(result.dimensions(), (4, 4));
        assert_eq!(result.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_crop_rectangular_source() {
        let img = test_image(200, 100);
        let result = extract_crop(&img, &CropResult::new(100, 100, 150, 50)).unwrap();
        assert_eq!(result.dimensions(), (100, 100));
        assert_eq!(result.get_pixel(0, 0).0[0], (100 % 256) as u8);
    }

    #[test]
    fn test_empty_crop_rejected() {
        let img = test_image(10, 10);
        assert_eq!(
            extract_crop(&img, &CropResult::new(0, 5, 5, 5)),
            Err(CropError::EmptyCrop)
        );
    }

    #[test]
    fn test_flip_y() {
        let crop = CropResult::new(50, 50, 100, 30);
        assert_eq!(crop.flip_y(100).center_y, 70);
        assert_eq!(crop.flip_y(100).flip_y(100), crop);
    }

    #[test]
    fn test_circle_mask_clears_corners() {
        let img = test_image(20, 20);
        let masked = apply_shape_mask(&img, CropShape::Circle);

        assert_eq!(masked.get_pixel(0, 0).0[3], 0);
        assert_eq!(masked.get_pixel(19, 19).0[3], 0);
        assert_eq!(masked.get_pixel(10, 10).0[3], 255);
        // Color is preserved
        assert_eq!(masked.get_pixel(10, 10).0[0], img.get_pixel(10, 10).0[0]);
    }

    #[test]
    fn test_rectangle_mask_keeps_everything() {
        let img = test_image(8, 8);
        let masked = apply_shape_mask(&img, CropShape::Rectangle);
        assert!(masked.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_render_preview_scales_to_box() {
        let img = test_image(200, 100);
        let crop = CropResult::new(100, 100, 100, 50);

        let preview = render_preview(&img, &crop, 50, PreviewFilter::Bilinear).unwrap();
        assert_eq!(preview.dimensions(), (50, 50));

        let preview = render_preview(&img, &crop, 100, PreviewFilter::Nearest).unwrap();
        assert_eq!(preview.dimensions(), (100, 100));
    }

    #[test]
    fn test_render_preview_rejects_zero_box() {
        let img = test_image(10, 10);
        let crop = CropResult::new(10, 10, 5, 5);
        assert!(render_preview(&img, &crop, 0, PreviewFilter::Lanczos3).is_err());
    }

    #[test]
    fn test_filter_conversion() {
        assert_eq!(
            PreviewFilter::Nearest.to_image_filter(),
            imageops::FilterType::Nearest
        );
        assert_eq!(
            PreviewFilter::default().to_image_filter(),
            imageops::FilterType::Triangle
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
