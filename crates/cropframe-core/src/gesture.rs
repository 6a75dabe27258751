//! Gesture interpretation: pointer events in, transform deltas out.
//!
//! The interpreter tracks the last known position of every active touch and
//! feeds the [`CropEngine`] one delta per event:
//!
//! - **One touch, move**: pan by the movement, divided by the configured
//!   translation touch count.
//! - **Scroll**: zoom by one `zoom_delta` step about the pointer. Wheel zoom
//!   ignores `do_scale`, which only gates pinch zoom.
//! - **Two or more touches, move**: pinch-zoom about the touch farthest from
//!   the moving one, provided the moving touch is itself the farthest from
//!   that anchor. Only the extreme pair of touches drives the zoom.
//!
//! Rotation between the old and new touch vectors is measured and recorded
//! but never applied to the transform.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::{contains_point, signed_angle, Point, Rect};
use crate::transform::{CropEngine, TransformDelta};
use crate::CropperConfig;

/// Stable identifier of one touch across its down/move/up events.
pub type TouchId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// A pointer event in frame-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { id: TouchId, position: Point },
    Move { id: TouchId, position: Point },
    Up { id: TouchId },
    /// Wheel step; zooms even when `do_scale` is off.
    Scroll { direction: ScrollDirection, position: Point },
}

/// Limit a multiplicative zoom so the resulting absolute zoom stays in
/// `[zoom_min, zoom_max]`.
pub fn clamp_scale(scale: f64, current: f64, zoom_min: f64, zoom_max: f64) -> f64 {
    let new_scale = scale * current;
    if new_scale < zoom_min {
        zoom_min / current
    } else if new_scale > zoom_max {
        zoom_max / current
    } else {
        scale
    }
}

/// Index of the first point farthest from `target`.
fn farthest_from(points: &[Point], target: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let d = p.distance(target);
        if best.map_or(true, |(_, best_d)| d > best_d) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Turns raw pointer events into engine transforms.
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    config: CropperConfig,
    /// Active touches in arrival order with their last known position.
    touches: Vec<(TouchId, Point)>,
    last_rotation: f64,
}

impl GestureInterpreter {
    pub fn new(config: CropperConfig) -> Self {
        Self {
            config,
            touches: Vec::new(),
            last_rotation: 0.0,
        }
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CropperConfig) {
        self.config = config;
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    /// Last known position of a tracked touch.
    pub fn touch_position(&self, id: TouchId) -> Option<Point> {
        self.touches.iter().find(|(t, _)| *t == id).map(|(_, p)| *p)
    }

    /// Rotation in radians measured by the latest two-touch move.
    pub fn last_rotation(&self) -> f64 {
        self.last_rotation
    }

    /// Forget every tracked touch.
    pub fn cancel(&mut self) {
        self.touches.clear();
        self.last_rotation = 0.0;
    }

    /// Process one event; returns true if the engine's transform changed.
    pub fn handle(&mut self, engine: &mut CropEngine, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { id, position } => {
                if !in_frame(engine, position) {
                    trace!(id, "touch down outside frame ignored");
                    return false;
                }
                match self.touches.iter_mut().find(|(t, _)| *t == id) {
                    Some(touch) => touch.1 = position,
                    None => self.touches.push((id, position)),
                }
                false
            }
            PointerEvent::Move { id, position } => {
                let Some(index) = self.touches.iter().position(|(t, _)| *t == id) else {
                    return false;
                };
                let changed = self.transform_with_touch(engine, index, position);
                self.touches[index].1 = position;
                changed
            }
            PointerEvent::Up { id } => {
                self.touches.retain(|(t, _)| *t != id);
                if self.touches.is_empty() {
                    self.last_rotation = 0.0;
                }
                false
            }
            PointerEvent::Scroll {
                direction,
                position,
            } => self.scroll(engine, direction, position),
        }
    }

    fn scroll(&mut self, engine: &mut CropEngine, direction: ScrollDirection, position: Point) -> bool {
        if !in_frame(engine, position) {
            return false;
        }
        let step = match direction {
            ScrollDirection::Up => 1.0 - self.config.zoom_delta,
            ScrollDirection::Down => 1.0 + self.config.zoom_delta,
        };
        let scale = self.clamp(step, engine.scale());
        !engine
            .apply_transform(TransformDelta::zoom(scale, position))
            .is_noop()
    }

    fn clamp(&self, scale: f64, current: f64) -> f64 {
        clamp_scale(scale, current, self.config.zoom_min, self.config.zoom_max)
    }

    fn transform_with_touch(&mut self, engine: &mut CropEngine, index: usize, position: Point) -> bool {
        let count = self.touches.len();
        let previous = self.touches[index].1;
        let mut changed = false;

        if count == self.config.translation_touches {
            let divisor = count as f64;
            let dx = if self.config.do_translation_x {
                (position.x - previous.x) / divisor
            } else {
                0.0
            };
            let dy = if self.config.do_translation_y {
                (position.y - previous.y) / divisor
            } else {
                0.0
            };
            changed |= !engine.apply_transform(TransformDelta::pan(dx, dy)).is_noop();
        }

        if count == 1 {
            return changed;
        }

        // Last known positions of the other touches, then this touch
        let mut points: Vec<Point> = self
            .touches
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, (_, p))| *p)
            .collect();
        let Some(anchor) = farthest_from(&points, position).map(|i| points[i]) else {
            return changed;
        };
        points.push(position);

        if farthest_from(&points, anchor) != Some(points.len() - 1) {
            trace!("touch is not part of the extreme pair");
            return changed;
        }

        let old_line = previous - anchor;
        let new_line = position - anchor;
        if old_line.length() == 0.0 {
            trace!("zero-length reference vector, gesture skipped");
            return changed;
        }

        self.last_rotation = if self.config.do_rotation {
            signed_angle(old_line, new_line)
        } else {
            0.0
        };

        if self.config.do_scale {
            let scale = self.clamp(new_line.length() / old_line.length(), engine.scale());
            changed |= !engine
                .apply_transform(TransformDelta::zoom(scale, anchor))
                .is_noop();
        }
        changed
    }
}

fn in_frame(engine: &CropEngine, position: Point) -> bool {
    engine
        .frame()
        .map_or(true, |frame| contains_point(&Rect::from_origin_size(Point::ORIGIN, frame), position))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
