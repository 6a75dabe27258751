//! WASM bindings for preview placement and pixel extraction.
//!
//! A preview pane either draws the full source image with the placement from
//! [`map_crop_to_display`], or asks for the cropped pixels directly with
//! [`extract_crop`] / [`render_preview`].

use crate::types::{JsCropResult, JsDecodedImage};
use cropframe_core::{
    apply_shape_mask as core_mask, extract_crop as core_extract,
    map_crop_to_display as core_map, render_preview as core_preview, CropError, CropShape,
    DisplayPlacement, PreviewFilter, Rect, Texture,
};
use wasm_bindgen::prelude::*;

fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Where to draw the full texture so the crop fills a preview box.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsDisplayPlacement {
    inner: DisplayPlacement,
}

#[wasm_bindgen]
impl JsDisplayPlacement {
    /// Screen pixels per source pixel
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.scale
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.y
    }
}

/// Compute where to draw a texture so `crop` fills the box.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const p = map_crop_to_display(cropper.get_crop(), img.width, img.height, 0, 0, 128, 128);
/// ctx.drawImage(img, p.x, p.y, p.width, p.height);
/// ```
#[wasm_bindgen]
pub fn map_crop_to_display(
    crop: &JsCropResult,
    texture_width: u32,
    texture_height: u32,
    box_x: f64,
    box_y: f64,
    box_width: f64,
    box_height: f64,
) -> Result<JsDisplayPlacement, JsValue> {
    placement(
        crop,
        texture_width,
        texture_height,
        Rect::from_origin_size((box_x, box_y), (box_width, box_height)),
    )
    .map_err(to_js_error)
}

fn placement(
    crop: &JsCropResult,
    texture_width: u32,
    texture_height: u32,
    target: Rect,
) -> Result<JsDisplayPlacement, CropError> {
    core_map(crop.inner(), Texture::new(texture_width, texture_height), target)
        .map(|inner| JsDisplayPlacement { inner })
}

/// Copy the crop region out of an RGB image.
#[wasm_bindgen]
pub fn extract_crop(image: &JsDecodedImage, crop: &JsCropResult) -> Result<JsDecodedImage, JsValue> {
    extract(image, crop).map_err(to_js_error)
}

fn extract(image: &JsDecodedImage, crop: &JsCropResult) -> Result<JsDecodedImage, CropError> {
    let src = rgb_source(image)?;
    core_extract(&src, crop.inner()).map(JsDecodedImage::from_rgb)
}

/// Crop and scale for a preview box of `box_width` pixels.
///
/// * `filter` - 0 = Nearest, 1 = Bilinear, 2 = Lanczos3 (other values: Bilinear)
/// * `circular` - return RGBA with everything outside the inscribed circle transparent
#[wasm_bindgen]
pub fn render_preview(
    image: &JsDecodedImage,
    crop: &JsCropResult,
    box_width: u32,
    filter: u8,
    circular: bool,
) -> Result<JsDecodedImage, JsValue> {
    preview(image, crop, box_width, filter, circular).map_err(to_js_error)
}

fn preview(
    image: &JsDecodedImage,
    crop: &JsCropResult,
    box_width: u32,
    filter: u8,
    circular: bool,
) -> Result<JsDecodedImage, CropError> {
    let src = rgb_source(image)?;
    let rendered = core_preview(&src, crop.inner(), box_width, filter_from_u8(filter))?;
    if circular {
        Ok(JsDecodedImage::from_rgba(core_mask(&rendered, CropShape::Circle)))
    } else {
        Ok(JsDecodedImage::from_rgb(rendered))
    }
}

fn rgb_source(image: &JsDecodedImage) -> Result<cropframe_core::image::RgbImage, CropError> {
    image.to_rgb().ok_or(CropError::InvalidTexture {
        width: image.width(),
        height: image.height(),
    })
}

/// Convert a u8 filter type value to the core PreviewFilter enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> PreviewFilter {
    match value {
        0 => PreviewFilter::Nearest,
        2 => PreviewFilter::Lanczos3,
        _ => PreviewFilter::Bilinear, // Default
    }
}


/// WASM-specific tests that require JsValue.
///
/// These tests use functions that return `Result<T, JsValue>` and can only
/// run on wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_map_crop_to_display_error_is_string() {
        let crop = JsCropResult::new(0, 0, 0, 0);
        let err = map_crop_to_display(&crop, 10, 10, 0.0, 0.0, 10.0, 10.0).unwrap_err();
        assert_eq!(err.as_string().unwrap(), "Crop rectangle is empty");
    }

    #[wasm_bindgen_test]
    fn test_extract_crop_binding() {
        let img = JsDecodedImage::new(4, 4, vec![7u8; 48]);
        let crop = JsCropResult::new(2, 2, 2, 2);
        let result = extract_crop(&img, &crop).unwrap();
        assert_eq!(result.byte_length(), 12);
    }
}
