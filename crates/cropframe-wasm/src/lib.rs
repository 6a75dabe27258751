//! Cropframe WASM - WebAssembly bindings for cropframe
//!
//! This crate exposes the cropframe-core crop engine to JavaScript/TypeScript
//! hosts that own the canvas, the pointer events and the preview panes.
//!
//! # Module Structure
//!
//! - `cropper` - The interactive cropper (pointer events in, crop out)
//! - `display` - Preview placement and pixel extraction
//! - `types` - WASM-compatible wrapper types for crops and pixel buffers
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropper, map_crop_to_display } from '@cropframe/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const cropper = new JsCropper(false);
//! cropper.set_frame_size(canvas.width, canvas.height);
//! cropper.load_texture(img.naturalWidth, img.naturalHeight);
//! const crop = cropper.get_crop();
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod display;
mod types;

// Re-export public types
pub use cropper::JsCropper;
pub use display::{extract_crop, map_crop_to_display, render_preview, JsDisplayPlacement};
pub use types::{JsCropResult, JsDecodedImage};

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
