//! Frame-local geometry: the fitted image layout and a few helpers over
//! [`kurbo`] points and rectangles.
//!
//! All coordinates are frame-local: `(0, 0)` is one corner of the cropper
//! frame and `(frame.width, frame.height)` the opposite one. The engine never
//! assumes which way the y axis points, so the same math serves y-up and
//! y-down hosts.

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CropError;
use crate::Texture;

/// Check that both sides are finite and strictly positive.
pub fn is_valid_size(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// True if `point` lies inside `rect` or on its border.
///
/// Unlike [`Rect::contains`], the far edges count as inside.
pub fn contains_point(rect: &Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.y >= rect.y0 && point.x <= rect.x1 && point.y <= rect.y1
}

/// Signed angle in radians that turns `from` onto `to`.
///
/// Positive when `to` lies counter-clockwise of `from` in a y-up frame.
pub fn signed_angle(from: Vec2, to: Vec2) -> f64 {
    from.cross(to).atan2(from.dot(to))
}

/// Placement of the fitted image and the crop window inside the frame.
///
/// Derived from the frame size and the texture's native size; clients only
/// read it. Recomputed on every frame resize and texture load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageGeometry {
    /// Size of the cropper frame the geometry was fitted into.
    pub frame: Size,
    /// Untransformed image placement (minimum corner).
    pub image_pos: Point,
    /// Untransformed image size after contain-fit.
    pub image_size: Size,
    /// Crop window minimum corner, centered in the frame.
    pub crop_pos: Point,
    /// Crop window size; always a square.
    pub crop_size: Size,
    /// Square spanned by the long side of the fitted image.
    pub frame_size: Size,
}

impl ImageGeometry {
    /// Fit `texture` into `frame` preserving aspect ratio and center it.
    ///
    /// The crop window is a square whose side is the shorter fitted image
    /// dimension, centered in the frame.
    pub fn fit(frame: Size, texture: Texture) -> Result<Self, CropError> {
        if !is_valid_size(frame) {
            return Err(CropError::InvalidFrame {
                width: frame.width,
                height: frame.height,
            });
        }
        texture.validate()?;

        let tw = texture.width as f64;
        let th = texture.height as f64;
        let fit = (frame.width / tw).min(frame.height / th);

        let image_size = Size::new(tw * fit, th * fit);
        let image_pos = Point::new(
            (frame.width - image_size.width) / 2.0,
            (frame.height - image_size.height) / 2.0,
        );

        let side = image_size.width.min(image_size.height);
        let crop_size = Size::new(side, side);
        let crop_pos = Point::new(
            (frame.width - side) / 2.0,
            (frame.height - side) / 2.0,
        );

        let long_side = image_size.width.max(image_size.height);

        let geometry = Self {
            frame,
            image_pos,
            image_size,
            crop_pos,
            crop_size,
            frame_size: Size::new(long_side, long_side),
        };
        debug!(
            frame_width = frame.width,
            frame_height = frame.height,
            texture_width = texture.width,
            texture_height = texture.height,
            image_width = image_size.width,
            image_height = image_size.height,
            crop_side = side,
            "recalculated image geometry"
        );
        Ok(geometry)
    }

    pub fn image_rect(&self) -> Rect {
        Rect::from_origin_size(self.image_pos, self.image_size)
    }

    pub fn crop_rect(&self) -> Rect {
        Rect::from_origin_size(self.crop_pos, self.crop_size)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the crop window never exceeds the fitted image or the frame.
        #[test]
        fn prop_crop_window_inside_image(
            fw in 10.0f64..2000.0,
            fh in 10.0f64..2000.0,
            tw in 1u32..5000,
            th in 1u32..5000,
        ) {
            let geo = ImageGeometry::fit(Size::new(fw, fh), Texture::new(tw, th)).unwrap();

            prop_assert!(geo.crop_size.width <= geo.frame_size.width);
            prop_assert!(geo.crop_size.width <= fw + 1e-9);
            prop_assert!(geo.crop_size.height <= fh + 1e-9);
            prop_assert!(geo.image_size.width <= fw + 1e-9);
            prop_assert!(geo.image_size.height <= fh + 1e-9);

            let center = geo.crop_rect().center();
            prop_assert!((center.x - fw / 2.0).abs() < 1e-6);
            prop_assert!((center.y - fh / 2.0).abs() < 1e-6);
        }
    }
}
