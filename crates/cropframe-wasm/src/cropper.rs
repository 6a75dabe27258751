//! WASM bindings for the interactive cropper.
//!
//! The host forwards pointer events in frame-local coordinates and reads the
//! crop back whenever a preview needs refreshing.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const cropper = new JsCropper(true); // circular chrome
//! cropper.set_frame_size(500, 500);
//! cropper.load_texture(image.width, image.height);
//!
//! canvas.onpointerdown = (e) => cropper.touch_down(e.pointerId, e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => {
//!   if (cropper.touch_move(e.pointerId, e.offsetX, e.offsetY)) redraw();
//! };
//! canvas.onpointerup = (e) => cropper.touch_up(e.pointerId);
//! canvas.onwheel = (e) => cropper.scroll(e.deltaY < 0, e.offsetX, e.offsetY);
//!
//! const crop = cropper.get_crop(); // { width, height, center_x, center_y }
//! ```

use cropframe_core::{
    CropError, CropShape, Cropper, CropperConfig, Point, PointerEvent, Rect, ScrollDirection,
    Texture,
};
use wasm_bindgen::prelude::*;

use crate::types::JsCropResult;

fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// An interactive cropper over one image.
#[wasm_bindgen]
pub struct JsCropper {
    inner: Cropper,
}

#[wasm_bindgen]
impl JsCropper {
    /// Create a cropper with default zoom limits (1x to 2x).
    #[wasm_bindgen(constructor)]
    pub fn new(circular: bool) -> JsCropper {
        Self {
            inner: Cropper::new(shape_from_flag(circular)),
        }
    }

    /// Create a cropper from a config object.
    ///
    /// Missing fields take their defaults:
    /// `{ zoom_min: 1, zoom_max: 2, zoom_delta: 0.05, translation_touches: 1,
    ///    do_translation_x: true, do_translation_y: true, do_scale: true,
    ///    do_rotation: false }`
    pub fn with_config(config: JsValue, circular: bool) -> Result<JsCropper, JsValue> {
        let config: CropperConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid cropper config: {}", e)))?;
        let inner = Cropper::with_config(shape_from_flag(circular), config).map_err(|e| {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
            to_js_error(e)
        })?;
        Ok(Self { inner })
    }

    /// Crop window shape: "rectangle" or "circle"
    #[wasm_bindgen(getter)]
    pub fn shape(&self) -> String {
        match self.inner.shape() {
            CropShape::Rectangle => "rectangle".to_string(),
            CropShape::Circle => "circle".to_string(),
        }
    }

    /// Current absolute zoom
    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.zoom()
    }

    /// Set the frame size; refits the image.
    pub fn set_frame_size(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner.set_frame_size(width, height).map_err(to_js_error)
    }

    /// Load a texture by its native size; refits and resets the view.
    pub fn load_texture(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner
            .load_texture(Texture::new(width, height))
            .map_err(to_js_error)
    }

    pub fn clear_texture(&mut self) {
        self.inner.clear_texture();
    }

    /// Return to the fitted default view.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn touch_down(&mut self, id: u32, x: f64, y: f64) -> bool {
        self.inner.handle_event(PointerEvent::Down {
            id: id.into(),
            position: Point::new(x, y),
        })
    }

    /// Returns true if the view changed and should be redrawn.
    pub fn touch_move(&mut self, id: u32, x: f64, y: f64) -> bool {
        self.inner.handle_event(PointerEvent::Move {
            id: id.into(),
            position: Point::new(x, y),
        })
    }

    pub fn touch_up(&mut self, id: u32) -> bool {
        self.inner.handle_event(PointerEvent::Up { id: id.into() })
    }

    /// Zoom one step about the pointer: `up = true` zooms out, `false` zooms in.
    pub fn scroll(&mut self, up: bool, x: f64, y: f64) -> bool {
        let direction = if up {
            ScrollDirection::Up
        } else {
            ScrollDirection::Down
        };
        self.inner.handle_event(PointerEvent::Scroll {
            direction,
            position: Point::new(x, y),
        })
    }

    /// Current crop in native texture pixels.
    ///
    /// # Errors
    ///
    /// Fails if no texture is loaded or the frame was never sized.
    pub fn get_crop(&self) -> Result<JsCropResult, JsValue> {
        self.crop().map_err(to_js_error)
    }

    /// Crop window as `[x, y, width, height]`, empty before geometry exists.
    pub fn crop_window(&self) -> Vec<f64> {
        self.inner
            .crop_window()
            .map(rect_to_vec)
            .unwrap_or_default()
    }

    /// Transformed image bounds as `[x, y, width, height]`, empty before geometry exists.
    pub fn image_bounds(&self) -> Vec<f64> {
        self.inner
            .image_on_screen()
            .map(rect_to_vec)
            .unwrap_or_default()
    }

    /// Current transform as `[a, b, c, d, e, f]` (canvas `setTransform` order).
    pub fn transform(&self) -> Vec<f64> {
        self.inner.engine().transform().as_coeffs().to_vec()
    }

    /// Hit test against the crop window shape.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.inner.contains(Point::new(x, y))
    }
}

impl JsCropper {
    pub(crate) fn crop(&self) -> Result<JsCropResult, CropError> {
        self.inner.crop().map(JsCropResult::from)
    }
}

fn rect_to_vec(r: Rect) -> Vec<f64> {
    vec![r.x0, r.y0, r.width(), r.height()]
}

fn shape_from_flag(circular: bool) -> CropShape {
    if circular {
        CropShape::Circle
    } else {
        CropShape::Rectangle
    }
}
