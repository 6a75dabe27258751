//! WASM-compatible wrapper types for crop data and pixel buffers.
//!
//! This module provides JavaScript-friendly types that wrap the core cropframe
//! types, handling the conversion between Rust and JavaScript representations.

use cropframe_core::image::{RgbImage, RgbaImage};
use cropframe_core::CropResult;
use wasm_bindgen::prelude::*;

/// Crop rectangle in native source pixels.
///
/// Pass these four values straight to a preview: `width`, `height`,
/// `center_x`, `center_y`.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsCropResult {
    inner: CropResult,
}

#[wasm_bindgen]
impl JsCropResult {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, center_x: u32, center_y: u32) -> JsCropResult {
        Self {
            inner: CropResult::new(width, height, center_x, center_y),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn center_x(&self) -> u32 {
        self.inner.center_x
    }

    #[wasm_bindgen(getter)]
    pub fn center_y(&self) -> u32 {
        self.inner.center_y
    }

    /// Mirror the center vertically (y-up hosts to top-down pixel rows).
    pub fn flip_y(&self, texture_height: u32) -> JsCropResult {
        self.inner.flip_y(texture_height).into()
    }
}

impl From<CropResult> for JsCropResult {
    fn from(inner: CropResult) -> Self {
        Self { inner }
    }
}

impl JsCropResult {
    pub(crate) fn inner(&self) -> &CropResult {
        &self.inner
    }
}

/// An image buffer wrapper for JavaScript.
///
/// Holds RGB (3 channels) or RGBA (4 channels) pixel data in row-major order.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new RGB JsDecodedImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            channels: 3,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel: 3 for RGB, 4 for RGBA
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsDecodedImage {
    pub(crate) fn from_rgb(img: RgbImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            channels: 3,
            pixels: img.into_raw(),
        }
    }

    pub(crate) fn from_rgba(img: RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            channels: 4,
            pixels: img.into_raw(),
        }
    }

    /// Convert to a core RGB buffer.
    ///
    /// Returns `None` for RGBA data or when the buffer length does not match
    /// the dimensions. Note: This clones the pixel data.
    pub(crate) fn to_rgb(&self) -> Option<RgbImage> {
        if self.channels != 3 {
            return None;
        }
        RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }
}
