//! The constrained transform engine.
//!
//! [`CropEngine`] owns the transform applied to the fitted image and refuses
//! to commit any transform that would let the crop window show area outside
//! the image. Each incoming delta is split into its pan-x, pan-y and zoom
//! components; every component is validated on its own and replaced by its
//! identity value if it fails, so an over-zoom never blocks a valid pan.
//!
//! # Crop extraction
//!
//! The on-screen image extent under the current transform is compared with
//! the fixed crop window to recover the crop in native texture pixels:
//!
//! ```text
//! sx = texture_width  / (mx - x)
//! sy = texture_height / (my - y)
//! crop_w = crop_window_w * sx
//! center_x = (crop_center_x - x) * sx
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::CropError;
use crate::geometry::{is_valid_size, Affine, ImageGeometry, Point, Size};
use crate::{CropResult, Texture};

/// Slack in frame pixels for the containment test, absorbing float error
/// from composed matrices. Checked against the fixed crop window, so it never
/// accumulates across commits.
const CONTAINMENT_EPSILON: f64 = 1e-9;

/// An incremental transform request.
///
/// Built with [`TransformDelta::pan`] or [`TransformDelta::zoom`]; the
/// default is the no-op delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformDelta {
    pub dx: f64,
    pub dy: f64,
    /// Multiplicative zoom; 1.0 leaves the zoom unchanged.
    pub scale: f64,
    /// Point held fixed while scaling.
    pub anchor: Point,
    /// Compose as `current * delta` instead of `delta * current`.
    pub post_multiply: bool,
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            scale: 1.0,
            anchor: Point::ORIGIN,
            post_multiply: false,
        }
    }
}

impl TransformDelta {
    pub fn pan(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            ..Self::default()
        }
    }

    pub fn zoom(scale: f64, anchor: Point) -> Self {
        Self {
            scale,
            anchor,
            ..Self::default()
        }
    }

    pub fn post_multiplied(mut self) -> Self {
        self.post_multiply = true;
        self
    }

    /// The full delta `T(anchor) * T(dx, dy) * S(scale) * T(-anchor)`.
    pub fn to_affine(&self) -> Affine {
        let anchor = self.anchor.to_vec2();
        Affine::translate(anchor)
            * Affine::translate((self.dx, self.dy))
            * Affine::scale(self.scale)
            * Affine::translate(-anchor)
    }

    /// This delta with everything but the x pan replaced by its identity value.
    fn only_dx(&self) -> Self {
        Self {
            dy: 0.0,
            scale: 1.0,
            ..*self
        }
    }

    fn only_dy(&self) -> Self {
        Self {
            dx: 0.0,
            scale: 1.0,
            ..*self
        }
    }

    fn only_scale(&self) -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            ..*self
        }
    }
}

/// Components of a delta that were actually committed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedDelta {
    pub dx: f64,
    pub dy: f64,
    pub scale: f64,
}

impl AppliedDelta {
    pub const NONE: AppliedDelta = AppliedDelta {
        dx: 0.0,
        dy: 0.0,
        scale: 1.0,
    };

    /// True if the transform was left untouched.
    pub fn is_noop(&self) -> bool {
        *self == Self::NONE
    }
}

/// Owns the image transform and the fitted geometry it is validated against.
#[derive(Debug, Clone)]
pub struct CropEngine {
    transform: Affine,
    frame: Option<Size>,
    texture: Option<Texture>,
    geometry: Option<ImageGeometry>,
}

impl Default for CropEngine {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            frame: None,
            texture: None,
            geometry: None,
        }
    }
}

impl CropEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn geometry(&self) -> Option<&ImageGeometry> {
        self.geometry.as_ref()
    }

    pub fn texture(&self) -> Option<Texture> {
        self.texture
    }

    pub fn frame(&self) -> Option<Size> {
        self.frame
    }

    /// Current absolute zoom of the image: the length of the transformed
    /// unit x-vector.
    pub fn scale(&self) -> f64 {
        let [a, b, ..] = self.transform.as_coeffs();
        a.hypot(b)
    }

    /// Reset the transform to identity.
    pub fn reset(&mut self) {
        self.transform = Affine::IDENTITY;
        debug!("transform reset");
    }

    /// Resize the frame and refit the geometry.
    ///
    /// The transform is kept unless it no longer contains the new crop
    /// window, in which case it is reset.
    pub fn set_frame_size(&mut self, width: f64, height: f64) -> Result<(), CropError> {
        let frame = Size::new(width, height);
        if !is_valid_size(frame) {
            return Err(CropError::InvalidFrame { width, height });
        }
        self.frame = Some(frame);
        if self.texture.is_some() {
            self.refit()?;
            if !self.is_valid(&self.transform) {
                self.reset();
            }
        }
        Ok(())
    }

    /// Load a new texture, refit the geometry and reset the transform.
    pub fn load_texture(&mut self, texture: Texture) -> Result<(), CropError> {
        texture.validate()?;
        self.texture = Some(texture);
        if self.frame.is_some() {
            self.refit()?;
        }
        self.reset();
        Ok(())
    }

    /// Drop the texture; geometry-dependent operations fail until a new one loads.
    pub fn clear_texture(&mut self) {
        self.texture = None;
        self.geometry = None;
        self.reset();
    }

    /// Set frame and texture together and refit the geometry.
    ///
    /// Behaves like [`load_texture`](Self::load_texture) when the texture
    /// changes and like [`set_frame_size`](Self::set_frame_size) otherwise.
    pub fn recalculate_geometry(
        &mut self,
        frame_width: f64,
        frame_height: f64,
        texture_width: u32,
        texture_height: u32,
    ) -> Result<&ImageGeometry, CropError> {
        let texture = Texture::new(texture_width, texture_height);
        let texture_changed = self.texture != Some(texture);

        // Frame first so the refit below never reads a stale frame
        let frame = Size::new(frame_width, frame_height);
        if !is_valid_size(frame) {
            return Err(CropError::InvalidFrame {
                width: frame_width,
                height: frame_height,
            });
        }
        texture.validate()?;
        self.frame = Some(frame);
        self.texture = Some(texture);
        self.refit()?;

        if texture_changed || !self.is_valid(&self.transform) {
            self.reset();
        }
        self.geometry.as_ref().ok_or(CropError::NoTexture)
    }

    fn refit(&mut self) -> Result<(), CropError> {
        let texture = self.texture.ok_or(CropError::NoTexture)?;
        let frame = self.frame.ok_or(CropError::NoFrame)?;
        self.geometry = Some(ImageGeometry::fit(frame, texture)?);
        Ok(())
    }

    /// Check that `transform` keeps the crop window inside the transformed image.
    ///
    /// Always false while no geometry exists.
    pub fn is_valid(&self, transform: &Affine) -> bool {
        let Some(geo) = &self.geometry else {
            return false;
        };
        let image = geo.image_rect();
        let crop = geo.crop_rect();

        let min = *transform * image.origin();
        let max = *transform * Point::new(image.x1, image.y1);

        min.x <= crop.x0 + CONTAINMENT_EPSILON
            && min.y <= crop.y0 + CONTAINMENT_EPSILON
            && max.x >= crop.x1 - CONTAINMENT_EPSILON
            && max.y >= crop.y1 - CONTAINMENT_EPSILON
    }

    /// Apply `delta`, dropping every component that would fail validation.
    ///
    /// Each component is tested in the same composition order it will be
    /// committed in. Returns the components that were committed.
    pub fn apply_transform(&mut self, delta: TransformDelta) -> AppliedDelta {
        if self.geometry.is_none() {
            trace!("transform ignored: no geometry");
            return AppliedDelta::NONE;
        }

        let mut dx = delta.dx;
        let mut dy = delta.dy;
        let mut scale = delta.scale;

        if !self.is_valid(&self.compose(&delta.only_dx())) {
            trace!(dx, "pan x rejected");
            dx = 0.0;
        }
        if !self.is_valid(&self.compose(&delta.only_dy())) {
            trace!(dy, "pan y rejected");
            dy = 0.0;
        }
        if !self.is_valid(&self.compose(&delta.only_scale())) {
            trace!(scale, "zoom rejected");
            scale = 1.0;
        }

        let mut accepted = TransformDelta {
            dx,
            dy,
            scale,
            ..delta
        };
        let mut candidate = self.compose(&accepted);

        // Components can pass alone yet fail together; drop the zoom first,
        // then everything.
        if !self.is_valid(&candidate) && accepted.scale != 1.0 {
            trace!(scale, "zoom rejected in combination with pan");
            accepted.scale = 1.0;
            candidate = self.compose(&accepted);
        }
        if !self.is_valid(&candidate) {
            trace!("combined transform rejected");
            return AppliedDelta::NONE;
        }

        self.transform = candidate;
        AppliedDelta {
            dx: accepted.dx,
            dy: accepted.dy,
            scale: accepted.scale,
        }
    }

    fn compose(&self, delta: &TransformDelta) -> Affine {
        let step = delta.to_affine();
        if delta.post_multiply {
            self.transform * step
        } else {
            step * self.transform
        }
    }

    /// Map the crop window back into native texture pixels.
    pub fn get_crop(&self) -> Result<CropResult, CropError> {
        let texture = self.texture.ok_or(CropError::NoTexture)?;
        let geo = self.geometry.as_ref().ok_or(CropError::NoFrame)?;

        let image = geo.image_rect();
        let crop = geo.crop_rect();
        let min = self.transform * image.origin();
        let max = self.transform * Point::new(image.x1, image.y1);

        let sx = texture.width as f64 / (max.x - min.x);
        let sy = texture.height as f64 / (max.y - min.y);
        let center = crop.center();

        Ok(CropResult {
            width: round_px(crop.width() * sx),
            height: round_px(crop.height() * sy),
            center_x: round_px((center.x - min.x) * sx),
            center_y: round_px((center.y - min.y) * sy),
        })
    }
}

/// Round half to even, clamped at zero.
#[inline]
fn round_px(value: f64) -> u32 {
    value.round_ties_even().max(0.0) as u32
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for a frame and a texture to fit into it.
    fn setup_strategy() -> impl Strategy<Value = ((f64, f64), (u32, u32))> {
        ((50.0f64..800.0, 50.0f64..800.0), (1u32..4000, 1u32..4000))
    }

    /// Strategy for a single delta with the anchor somewhere near the frame.
    fn delta_strategy() -> impl Strategy<Value = TransformDelta> {
        (
            -80.0f64..80.0,
            -80.0f64..80.0,
            0.4f64..2.5,
            (-100.0f64..900.0, -100.0f64..900.0),
            any::<bool>(),
        )
            .prop_map(|(dx, dy, scale, (ax, ay), post_multiply)| TransformDelta {
                dx,
                dy,
                scale,
                anchor: Point::new(ax, ay),
                post_multiply,
            })
    }

    proptest! {
        /// Property: the committed transform always contains the crop window.
        #[test]
        fn prop_containment_invariant(
            ((fw, fh), (tw, th)) in setup_strategy(),
            deltas in prop::collection::vec(delta_strategy(), 1..40),
        ) {
            let mut engine = CropEngine::new();
            engine.set_frame_size(fw, fh).unwrap();
            engine.load_texture(Texture::new(tw, th)).unwrap();

            for delta in deltas {
                engine.apply_transform(delta);
                prop_assert!(engine.is_valid(&engine.transform()));
            }
        }

        /// Property: the crop never reaches outside the texture.
        #[test]
        fn prop_crop_within_texture(
            ((fw, fh), (tw, th)) in setup_strategy(),
            deltas in prop::collection::vec(delta_strategy(), 0..20),
        ) {
            let mut engine = CropEngine::new();
            engine.set_frame_size(fw, fh).unwrap();
            engine.load_texture(Texture::new(tw, th)).unwrap();
            for delta in deltas {
                engine.apply_transform(delta);
            }

            let crop = engine.get_crop().unwrap();
            // One pixel of slack for rounding
            prop_assert!(crop.width <= tw + 1);
            prop_assert!(crop.height <= th + 1);
            prop_assert!(crop.center_x <= tw);
            prop_assert!(crop.center_y <= th);
        }

        /// Property: reset twice equals reset once.
        #[test]
        fn prop_reset_idempotent(
            ((fw, fh), (tw, th)) in setup_strategy(),
            deltas in prop::collection::vec(delta_strategy(), 0..10),
        ) {
            let mut engine = CropEngine::new();
            engine.set_frame_size(fw, fh).unwrap();
            engine.load_texture(Texture::new(tw, th)).unwrap();
            for delta in deltas {
                engine.apply_transform(delta);
            }

            engine.reset();
            let once = engine.transform();
            engine.reset();
            prop_assert_eq!(engine.transform(), once);
            prop_assert_eq!(once, Affine::IDENTITY);
        }
    }
}
