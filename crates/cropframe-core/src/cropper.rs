//! The cropper a UI collaborator holds.
//!
//! Bundles one [`CropEngine`], one [`GestureInterpreter`] and the crop
//! window shape. Rectangular and circular croppers share every line of math;
//! the shape only answers hit tests for chrome and masking.

use crate::error::CropError;
use crate::geometry::{ImageGeometry, Point, Rect};
use crate::gesture::{GestureInterpreter, PointerEvent};
use crate::transform::CropEngine;
use crate::{CropResult, CropShape, CropperConfig, Texture};

#[derive(Debug, Clone, Default)]
pub struct Cropper {
    engine: CropEngine,
    gestures: GestureInterpreter,
    shape: CropShape,
}

impl Cropper {
    /// Create a cropper with the default configuration.
    pub fn new(shape: CropShape) -> Self {
        Self {
            engine: CropEngine::new(),
            gestures: GestureInterpreter::new(CropperConfig::default()),
            shape,
        }
    }

    pub fn with_config(shape: CropShape, config: CropperConfig) -> Result<Self, CropError> {
        config.validate()?;
        Ok(Self {
            engine: CropEngine::new(),
            gestures: GestureInterpreter::new(config),
            shape,
        })
    }

    pub fn shape(&self) -> CropShape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: CropShape) {
        self.shape = shape;
    }

    pub fn config(&self) -> &CropperConfig {
        self.gestures.config()
    }

    /// Replace the configuration; takes effect from the next event.
    pub fn set_config(&mut self, config: CropperConfig) -> Result<(), CropError> {
        config.validate()?;
        self.gestures.set_config(config);
        Ok(())
    }

    pub fn engine(&self) -> &CropEngine {
        &self.engine
    }

    pub fn geometry(&self) -> Option<&ImageGeometry> {
        self.engine.geometry()
    }

    /// Resize the frame; touches tracked in the old frame are dropped.
    pub fn set_frame_size(&mut self, width: f64, height: f64) -> Result<(), CropError> {
        self.gestures.cancel();
        self.engine.set_frame_size(width, height)
    }

    /// Load a new source texture; any gesture in progress is dropped.
    pub fn load_texture(&mut self, texture: Texture) -> Result<(), CropError> {
        self.gestures.cancel();
        self.engine.load_texture(texture)
    }

    pub fn clear_texture(&mut self) {
        self.gestures.cancel();
        self.engine.clear_texture();
    }

    /// Return to the fitted default view.
    pub fn reset(&mut self) {
        self.gestures.cancel();
        self.engine.reset();
    }

    /// Feed one pointer event; returns true if the view changed.
    pub fn handle_event(&mut self, event: PointerEvent) -> bool {
        self.gestures.handle(&mut self.engine, event)
    }

    pub fn crop(&self) -> Result<CropResult, CropError> {
        self.engine.get_crop()
    }

    /// Absolute zoom of the image.
    pub fn zoom(&self) -> f64 {
        self.engine.scale()
    }

    pub fn crop_window(&self) -> Option<Rect> {
        self.engine.geometry().map(ImageGeometry::crop_rect)
    }

    /// The image rectangle as currently drawn on screen.
    pub fn image_on_screen(&self) -> Option<Rect> {
        let geo = self.engine.geometry()?;
        let image = geo.image_rect();
        Some(self.engine.transform().transform_rect_bbox(image))
    }

    /// Hit test against the crop window's shape.
    pub fn contains(&self, point: Point) -> bool {
        self.crop_window()
            .is_some_and(|window| self.shape.contains(&window, point))
    }
}
