//! Constrained image transform: the engine that owns the image's [`Affine`](kurbo::Affine).
//!
//! # Composition Order
//!
//! Deltas are screen-space by default: the committed transform becomes
//! `delta * current`, so the delta applies after everything already on the
//! image. A post-multiplied delta (`current * delta`) applies in image space
//! instead, for hosts that track their own outer transform.
//!
//! # Coordinate System
//!
//! - Frame-local coordinates, origin at a frame corner
//! - Zoom is uniform; rotation is never composed into the matrix

mod engine;

pub use engine::{AppliedDelta, CropEngine, TransformDelta};
