//! Display mapping for crop previews.
//!
//! A preview pane draws the whole texture, scaled and offset so that only the
//! crop region lands inside the pane:
//!
//! ```text
//! scale   = box_width / crop_width
//! draw_w  = texture_width  * scale
//! draw_x  = box_x - (center_x - crop_width / 2) * scale
//! ```
//!
//! The scale is uniform and driven by the box width; crops from the engine
//! are square, so a square box is filled exactly.

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::geometry::Rect;
use crate::{CropResult, Texture};

/// Where to draw the full texture so the crop fills the target box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPlacement {
    /// Screen pixels per source pixel
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl DisplayPlacement {
    /// The on-screen rectangle covered by a source-pixel rectangle.
    pub fn map_source_rect(&self, left: f64, top: f64, width: f64, height: f64) -> Rect {
        Rect::from_origin_size(
            (self.x + left * self.scale, self.y + top * self.scale),
            (width * self.scale, height * self.scale),
        )
    }
}

/// Compute the placement that renders `crop` of `texture` into `target`.
///
/// Pure; call again whenever the crop or the box changes.
pub fn map_crop_to_display(
    crop: &CropResult,
    texture: Texture,
    target: Rect,
) -> Result<DisplayPlacement, CropError> {
    if crop.is_empty() {
        return Err(CropError::EmptyCrop);
    }
    texture.validate()?;

    let scale = target.width() / crop.width as f64;
    Ok(DisplayPlacement {
        scale,
        width: texture.width as f64 * scale,
        height: texture.height as f64 * scale,
        x: target.x0 - crop.left() * scale,
        y: target.y0 - crop.top() * scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_image_crop_fills_box() {
        let crop = CropResult::new(100, 100, 50, 50);
        let placement =
            map_crop_to_display(&crop, Texture::new(100, 100), Rect::new(0.0, 0.0, 200.0, 200.0))
                .unwrap();

        assert_eq!(placement.scale, 2.0);
        assert_eq!(placement.width, 200.0);
        assert_eq!(placement.height, 200.0);
        assert_eq!(placement.x, 0.0);
        assert_eq!(placement.y, 0.0);
    }

    #[test]
    fn test_center_crop_offsets_texture() {
        // Right half square of a 1000x500 image into a 250px box
        let crop = CropResult::new(500, 500, 750, 250);
        let placement =
            map_crop_to_display(&crop, Texture::new(1000, 500), Rect::new(10.0, 20.0, 260.0, 270.0))
                .unwrap();

        assert_eq!(placement.scale, 0.5);
        assert_eq!(placement.width, 500.0);
        assert_eq!(placement.height, 250.0);
        assert_eq!(placement.x, 10.0 - 250.0);
        assert_eq!(placement.y, 20.0);
    }

    #[test]
    fn test_crop_region_lands_on_box() {
        let crop = CropResult::new(50, 50, 100, 50);
        let target = Rect::new(5.0, 5.0, 105.0, 105.0);
        let placement = map_crop_to_display(&crop, Texture::new(200, 100), target).unwrap();

        let mapped = placement.map_source_rect(crop.left(), crop.top(), 50.0, 50.0);
        assert_eq!(mapped, target);
    }

    #[test]
    fn test_empty_crop_rejected() {
        let crop = CropResult::new(0, 10, 5, 5);
        let result = map_crop_to_display(&crop, Texture::new(10, 10), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(result, Err(CropError::EmptyCrop));
    }

    #[test]
    fn test_missing_texture_rejected() {
        let crop = CropResult::new(10, 10, 5, 5);
        let result = map_crop_to_display(&crop, Texture::new(0, 0), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(matches!(result, Err(CropError::InvalidTexture { .. })));
    }
}
