//! Zoom/pan engine for the image canvas.
//!
//! Pure state and math: the component layer converts DOM events into
//! canvas-local coordinates, feeds them in here, and draws whatever
//! `placement()` says. Keeping web-sys out of this module lets the gesture
//! arithmetic run under plain `cargo test`.

use crate::state::{Gesture, PointerSet, Transform, Vec2};

const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Where the image lands on the canvas, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone)]
pub struct ZoomPanEngine {
    viewport: Vec2,
    /// Natural pixel size of the loaded bitmap, if any.
    image: Option<Vec2>,
    /// Display size at scale 1: the image fit inside the viewport without
    /// upscaling, aspect ratio preserved. Recomputed only on image load.
    base: Vec2,
    transform: Transform,
    pointers: PointerSet,
    gesture: Gesture,
}

impl ZoomPanEngine {
    pub fn new(width: f64, height: f64) -> Self {
        let viewport = Vec2::new(width, height);
        Self {
            viewport,
            image: None,
            base: Vec2::default(),
            transform: Transform::centered(viewport),
            pointers: PointerSet::default(),
            gesture: Gesture::Idle,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.transform.offset
    }

    pub fn base_size(&self) -> Vec2 {
        self.base
    }

    /// A new bitmap finished decoding: fit it inside the viewport and
    /// recenter the view at scale 1.
    pub fn image_loaded(&mut self, natural_w: f64, natural_h: f64) {
        let fit = (self.viewport.x / natural_w)
            .min(self.viewport.y / natural_h)
            .min(1.0);
        self.image = Some(Vec2::new(natural_w, natural_h));
        self.base = Vec2::new(natural_w * fit, natural_h * fit);
        self.transform = Transform::centered(self.viewport);
    }

    /// Cursor-anchored wheel zoom. Returns whether a redraw is needed.
    pub fn wheel_zoom(&mut self, cursor: Vec2, delta_y: f64) -> bool {
        if self.image.is_none() {
            return false;
        }
        let factor = if delta_y < 0.0 {
            WHEEL_ZOOM_IN
        } else {
            WHEEL_ZOOM_OUT
        };
        self.transform
            .rescale_about(self.transform.scale * factor, cursor);
        true
    }

    pub fn pointer_down(&mut self, id: i32, pos: Vec2) {
        if self.image.is_none() {
            return;
        }
        self.pointers.insert(id, pos);
        self.gesture = match self.pointers.len() {
            1 => Gesture::Dragging {
                start: pos,
                offset_start: self.transform.offset,
            },
            2 => self.fresh_pinch(),
            _ => Gesture::Idle,
        };
    }

    /// Returns whether the move changed the transform (and a redraw is due).
    pub fn pointer_move(&mut self, id: i32, pos: Vec2) -> bool {
        if self.image.is_none() || !self.pointers.update(id, pos) {
            return false;
        }
        match self.gesture {
            Gesture::Pinching {
                start_dist,
                start_scale,
                mid,
            } if self.pointers.len() == 2 && start_dist > 0.0 => {
                let Some((a, b)) = self.pointers.pair() else {
                    return false;
                };
                // Anchor each tick at the frozen midpoint against the scale
                // of the previous tick, not the pinch-start scale.
                let next = start_scale * a.distance(b) / start_dist;
                self.transform.rescale_about(next, mid);
                true
            }
            Gesture::Dragging {
                start,
                offset_start,
            } => {
                self.transform.offset = offset_start + (pos - start);
                true
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self, id: i32) {
        self.pointers.remove(id);
        self.gesture = match self.pointers.len() {
            // Back into a two-pointer state: remeasure the pinch fully.
            2 => self.fresh_pinch(),
            // A lone survivor never resumes the drag.
            _ => Gesture::Idle,
        };
    }

    /// Pointer left the canvas: stop any drag. Tracked positions stay, since
    /// captured pointers keep reporting until pointer-up.
    pub fn pointer_leave(&mut self) {
        if matches!(self.gesture, Gesture::Dragging { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    pub fn reset(&mut self) {
        self.transform = Transform::centered(self.viewport);
    }

    pub fn placement(&self) -> Option<Placement> {
        self.image?;
        let w = self.base.x * self.transform.scale;
        let h = self.base.y * self.transform.scale;
        Some(Placement {
            x: self.transform.offset.x - w / 2.0,
            y: self.transform.offset.y - h / 2.0,
            w,
            h,
        })
    }

    fn fresh_pinch(&self) -> Gesture {
        match self.pointers.pair() {
            Some((a, b)) => Gesture::Pinching {
                start_dist: a.distance(b),
                start_scale: self.transform.scale,
                mid: a.midpoint(b),
            },
            None => Gesture::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{MAX_SCALE, MIN_SCALE};

    fn engine_with_image() -> ZoomPanEngine {
        let mut eng = ZoomPanEngine::new(500.0, 500.0);
        eng.image_loaded(400.0, 400.0);
        eng
    }

    /// Image point currently under a canvas point, in units of the base size.
    fn image_point_under(eng: &ZoomPanEngine, p: Vec2) -> Vec2 {
        let pl = eng.placement().unwrap();
        Vec2::new((p.x - pl.x) / pl.w, (p.y - pl.y) / pl.h)
    }

    #[test]
    fn base_size_fits_wide_image_by_width() {
        let mut eng = ZoomPanEngine::new(500.0, 500.0);
        eng.image_loaded(1000.0, 500.0);
        assert_eq!(eng.base_size(), Vec2::new(500.0, 250.0));
        let pl = eng.placement().unwrap();
        assert_eq!((pl.x, pl.y, pl.w, pl.h), (0.0, 125.0, 500.0, 250.0));
    }

    #[test]
    fn small_image_is_not_upscaled() {
        let mut eng = ZoomPanEngine::new(500.0, 500.0);
        eng.image_loaded(100.0, 60.0);
        assert_eq!(eng.base_size(), Vec2::new(100.0, 60.0));
    }

    #[test]
    fn no_image_means_no_ops() {
        let mut eng = ZoomPanEngine::new(500.0, 500.0);
        assert!(!eng.wheel_zoom(Vec2::new(10.0, 10.0), -1.0));
        eng.pointer_down(1, Vec2::new(10.0, 10.0));
        assert!(!eng.pointer_move(1, Vec2::new(20.0, 20.0)));
        assert!(eng.placement().is_none());
        assert_eq!(eng.scale(), 1.0);
    }

    #[test]
    fn wheel_zoom_scale_stays_clamped() {
        let mut eng = engine_with_image();
        for _ in 0..100 {
            eng.wheel_zoom(Vec2::new(42.0, 42.0), -1.0);
        }
        assert_eq!(eng.scale(), MAX_SCALE);
        for _ in 0..200 {
            eng.wheel_zoom(Vec2::new(42.0, 42.0), 1.0);
        }
        assert_eq!(eng.scale(), MIN_SCALE);
    }

    #[test]
    fn wheel_zoom_anchors_at_cursor() {
        let mut eng = engine_with_image();
        let cursor = Vec2::new(123.0, 77.0);
        let before = image_point_under(&eng, cursor);
        assert!(eng.wheel_zoom(cursor, -10.0));
        let after = image_point_under(&eng, cursor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        assert!((eng.scale() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn wheel_zoom_at_image_center_keeps_offset() {
        let mut eng = engine_with_image();
        let center = eng.offset();
        assert!(eng.wheel_zoom(center, -10.0));
        assert_eq!(eng.offset(), center);
        assert!((eng.scale() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn drag_translates_offset_by_pointer_delta() {
        let mut eng = engine_with_image();
        let start_offset = eng.offset();
        eng.pointer_down(1, Vec2::new(100.0, 100.0));
        assert!(eng.pointer_move(1, Vec2::new(150.0, 130.0)));
        assert_eq!(eng.offset(), start_offset + Vec2::new(50.0, 30.0));
        // Scale is untouched by panning.
        assert_eq!(eng.scale(), 1.0);
    }

    #[test]
    fn drag_deltas_accumulate_from_drag_start() {
        let mut eng = engine_with_image();
        let start_offset = eng.offset();
        eng.pointer_down(1, Vec2::new(0.0, 0.0));
        assert!(eng.pointer_move(1, Vec2::new(10.0, 0.0)));
        assert!(eng.pointer_move(1, Vec2::new(25.0, -5.0)));
        assert_eq!(eng.offset(), start_offset + Vec2::new(25.0, -5.0));
    }

    #[test]
    fn pinch_doubles_scale_when_distance_doubles() {
        let mut eng = engine_with_image();
        eng.pointer_down(1, Vec2::new(100.0, 100.0));
        eng.pointer_down(2, Vec2::new(200.0, 100.0));
        assert!(eng.pointer_move(2, Vec2::new(300.0, 100.0)));
        assert!((eng.scale() - 2.0).abs() < 1e-12);
        // Anchor formula against the frozen midpoint (150,100), previous
        // scale 1: o' = m - (m - o) * 2 with o = (250,250).
        assert_eq!(eng.offset(), Vec2::new(350.0, 400.0));
    }

    #[test]
    fn pinch_midpoint_stays_fixed_across_ticks() {
        let mut eng = engine_with_image();
        eng.pointer_down(1, Vec2::new(100.0, 100.0));
        eng.pointer_down(2, Vec2::new(200.0, 100.0));
        let mid = Vec2::new(150.0, 100.0);
        let before = image_point_under(&eng, mid);
        assert!(eng.pointer_move(2, Vec2::new(260.0, 100.0)));
        let between = image_point_under(&eng, mid);
        assert!(eng.pointer_move(2, Vec2::new(320.0, 100.0)));
        let after = image_point_under(&eng, mid);
        assert!((before.x - between.x).abs() < 1e-9);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn pinch_scale_stays_clamped() {
        let mut eng = engine_with_image();
        eng.pointer_down(1, Vec2::new(250.0, 250.0));
        eng.pointer_down(2, Vec2::new(251.0, 250.0));
        // Distance 1 -> 451: the raw factor clamps to MAX_SCALE.
        assert!(eng.pointer_move(2, Vec2::new(701.0, 250.0)));
        assert_eq!(eng.scale(), MAX_SCALE);
    }

    #[test]
    fn coincident_pinch_pointers_mutate_nothing() {
        let mut eng = engine_with_image();
        let offset = eng.offset();
        eng.pointer_down(1, Vec2::new(100.0, 100.0));
        eng.pointer_down(2, Vec2::new(100.0, 100.0));
        assert!(!eng.pointer_move(2, Vec2::new(200.0, 100.0)));
        assert_eq!(eng.scale(), 1.0);
        assert_eq!(eng.offset(), offset);
    }

    #[test]
    fn second_pointer_down_cancels_drag() {
        let mut eng = engine_with_image();
        eng.pointer_down(1, Vec2::new(100.0, 100.0));
        assert!(eng.pointer_move(1, Vec2::new(110.0, 100.0)));
        let offset = eng.offset();
        eng.pointer_down(2, Vec2::new(110.0, 100.0));
        // Coincident pair: pinch is guarded, and the drag must not keep
        // running either.
        assert!(!eng.pointer_move(1, Vec2::new(200.0, 200.0)));
        assert_eq!(eng.offset(), offset);
    }

    #[test]
    fn survivor_of_pinch_does_not_resume_drag() {
        let mut eng = engine_with_image();
        eng.pointer_down(1, Vec2::new(100.0, 100.0));
        eng.pointer_down(2, Vec2::new(200.0, 100.0));
        eng.pointer_up(2);
        let offset = eng.offset();
        assert!(!eng.pointer_move(1, Vec2::new(300.0, 300.0)));
        assert_eq!(eng.offset(), offset);
        // A fresh pointer-down starts dragging again.
        eng.pointer_up(1);
        eng.pointer_down(1, Vec2::new(50.0, 50.0));
        assert!(eng.pointer_move(1, Vec2::new(60.0, 50.0)));
        assert_eq!(eng.offset(), offset + Vec2::new(10.0, 0.0));
    }

    #[test]
    fn third_pointer_lift_remeasures_pinch() {
        let mut eng = engine_with_image();
        eng.pointer_down(1, Vec2::new(100.0, 100.0));
        eng.pointer_down(2, Vec2::new(200.0, 100.0));
        eng.pointer_down(3, Vec2::new(300.0, 300.0));
        // Three pointers: no pan, no pinch.
        assert!(!eng.pointer_move(2, Vec2::new(220.0, 100.0)));
        eng.pointer_up(3);
        // Pinch restarts from the current pair distance (120), so moving the
        // second pointer out to distance 240 doubles the scale.
        assert!(eng.pointer_move(2, Vec2::new(340.0, 100.0)));
        assert!((eng.scale() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn pointer_leave_stops_drag() {
        let mut eng = engine_with_image();
        eng.pointer_down(1, Vec2::new(100.0, 100.0));
        eng.pointer_leave();
        let offset = eng.offset();
        assert!(!eng.pointer_move(1, Vec2::new(150.0, 150.0)));
        assert_eq!(eng.offset(), offset);
    }

    #[test]
    fn unknown_pointer_moves_are_ignored() {
        let mut eng = engine_with_image();
        assert!(!eng.pointer_move(99, Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn reset_restores_identity_view_and_keeps_image() {
        let mut eng = engine_with_image();
        eng.wheel_zoom(Vec2::new(10.0, 20.0), -1.0);
        eng.pointer_down(1, Vec2::new(0.0, 0.0));
        eng.pointer_move(1, Vec2::new(80.0, 40.0));
        eng.reset();
        assert_eq!(eng.scale(), 1.0);
        assert_eq!(eng.offset(), Vec2::new(250.0, 250.0));
        assert_eq!(eng.base_size(), Vec2::new(400.0, 400.0));
        assert!(eng.has_image());
    }

    #[test]
    fn image_load_resets_view() {
        let mut eng = engine_with_image();
        eng.wheel_zoom(Vec2::new(10.0, 20.0), -1.0);
        eng.image_loaded(1000.0, 500.0);
        assert_eq!(eng.scale(), 1.0);
        assert_eq!(eng.offset(), Vec2::new(250.0, 250.0));
        assert_eq!(eng.base_size(), Vec2::new(500.0, 250.0));
    }

    #[test]
    fn placement_is_idempotent() {
        let mut eng = engine_with_image();
        eng.wheel_zoom(Vec2::new(321.0, 111.0), -1.0);
        assert_eq!(eng.placement(), eng.placement());
    }
}
