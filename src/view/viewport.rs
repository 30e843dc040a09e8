use nalgebra::Vector2;

use crate::dynamics::state::State;

pub const DEFAULT_SCALE: f64 = 150.0; // pixels per world unit
pub const ZOOM_STEP: f64 = 1.3;

// ---------------------------------------------------------------------------
// Viewport state
// ---------------------------------------------------------------------------

/// World-to-screen affine map. Screen y grows downward, world y upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub scale: f64,              // pixels per world unit, always > 0
    pub offset: Vector2<f64>,    // pixels
    pub screen_center: Vector2<f64>, // half the canvas size
}

impl ViewportState {
    pub fn new(canvas: Vector2<f64>) -> Self {
        Self {
            scale: DEFAULT_SCALE,
            offset: Vector2::zeros(),
            screen_center: canvas * 0.5,
        }
    }

    /// Back to the default scale with no pan; canvas size is kept.
    pub fn reset(&self) -> Self {
        Self {
            scale: DEFAULT_SCALE,
            offset: Vector2::zeros(),
            screen_center: self.screen_center,
        }
    }

    /// Re-centre on a resized canvas. Scale and pan are kept.
    pub fn resize(&self, canvas: Vector2<f64>) -> Self {
        Self {
            screen_center: canvas * 0.5,
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    pub fn factor(&self) -> f64 {
        match self {
            ZoomDirection::In => ZOOM_STEP,
            ZoomDirection::Out => 1.0 / ZOOM_STEP,
        }
    }

    /// Wheel delta to direction; positive scrolls zoom in.
    pub fn from_scroll(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(ZoomDirection::In)
        } else if delta < 0.0 {
            Some(ZoomDirection::Out)
        } else {
            None
        }
    }

    pub fn inverse(&self) -> Self {
        match self {
            ZoomDirection::In => ZoomDirection::Out,
            ZoomDirection::Out => ZoomDirection::In,
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinate conversion
// ---------------------------------------------------------------------------

pub fn world_to_screen(point: Vector2<f64>, vp: &ViewportState) -> Vector2<f64> {
    vp.screen_center + vp.offset + Vector2::new(point.x, -point.y) * vp.scale
}

pub fn screen_to_world(pixel: Vector2<f64>, vp: &ViewportState) -> Vector2<f64> {
    let rel = (pixel - vp.screen_center - vp.offset) / vp.scale;
    Vector2::new(rel.x, -rel.y)
}

/// Screen positions of every trajectory point under the given view.
pub fn screen_vertices(trajectory: &[State], vp: &ViewportState) -> Vec<Vector2<f64>> {
    trajectory.iter().map(|s| world_to_screen(s.pos, vp)).collect()
}

// ---------------------------------------------------------------------------
// Gestures
// ---------------------------------------------------------------------------

/// Zoom by one step, keeping the world point under `cursor` fixed on screen.
pub fn apply_zoom(vp: &ViewportState, cursor: Vector2<f64>, direction: ZoomDirection) -> ViewportState {
    let before = screen_to_world(cursor, vp);
    let mut zoomed = ViewportState {
        scale: vp.scale * direction.factor(),
        ..*vp
    };
    let after = screen_to_world(cursor, &zoomed);

    // Screen y is flipped relative to world y
    zoomed.offset.x += (after.x - before.x) * zoomed.scale;
    zoomed.offset.y -= (after.y - before.y) * zoomed.scale;
    zoomed
}

/// Translate by a raw pixel delta. No inertia, no clamping.
pub fn apply_pan(vp: &ViewportState, delta: Vector2<f64>) -> ViewportState {
    ViewportState {
        offset: vp.offset + delta,
        ..*vp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn canvas() -> Vector2<f64> {
        Vector2::new(1000.0, 800.0)
    }

    #[test]
    fn origin_maps_to_center() {
        let vp = ViewportState::new(canvas());
        let p = world_to_screen(Vector2::zeros(), &vp);
        assert_eq!(p, Vector2::new(500.0, 400.0));
    }

    #[test]
    fn world_y_points_up() {
        let vp = ViewportState::new(canvas());
        let p = world_to_screen(Vector2::new(1.0, 1.0), &vp);
        assert_eq!(p, Vector2::new(650.0, 250.0));
    }

    #[test]
    fn screen_to_world_inverts() {
        let vp = ViewportState {
            scale: 37.5,
            offset: Vector2::new(-12.0, 31.0),
            screen_center: Vector2::new(400.0, 300.0),
        };
        let w = Vector2::new(-1.25, 0.75);
        let back = screen_to_world(world_to_screen(w, &vp), &vp);
        assert_abs_diff_eq!(back.x, w.x, epsilon = 1e-12);
        assert_abs_diff_eq!(back.y, w.y, epsilon = 1e-12);
    }

    #[test]
    fn zoom_keeps_point_under_cursor() {
        let vp = ViewportState {
            offset: Vector2::new(20.0, -15.0),
            ..ViewportState::new(canvas())
        };
        let cursor = Vector2::new(710.0, 130.0);
        let anchor = screen_to_world(cursor, &vp);
        for dir in [ZoomDirection::In, ZoomDirection::Out] {
            let zoomed = apply_zoom(&vp, cursor, dir);
            let p = world_to_screen(anchor, &zoomed);
            assert_abs_diff_eq!(p.x, cursor.x, epsilon = 1e-9);
            assert_abs_diff_eq!(p.y, cursor.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn zoom_in_then_out_is_identity() {
        let vp = ViewportState {
            scale: 212.0,
            offset: Vector2::new(-40.0, 90.0),
            screen_center: Vector2::new(320.0, 240.0),
        };
        let cursor = Vector2::new(17.0, 455.0);
        let back = apply_zoom(&apply_zoom(&vp, cursor, ZoomDirection::In), cursor, ZoomDirection::Out);
        assert_abs_diff_eq!(back.scale, vp.scale, epsilon = 1e-9);
        assert_abs_diff_eq!(back.offset.x, vp.offset.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.offset.y, vp.offset.y, epsilon = 1e-9);
        assert_eq!(back.screen_center, vp.screen_center);
    }

    #[test]
    fn zoom_scale_is_multiplicative() {
        let vp = ViewportState::new(canvas());
        let cursor = Vector2::new(500.0, 400.0);
        let z = apply_zoom(&vp, cursor, ZoomDirection::In);
        assert_abs_diff_eq!(z.scale, DEFAULT_SCALE * ZOOM_STEP, epsilon = 1e-12);
        // At the screen centre with no pan the offset stays put
        assert_abs_diff_eq!(z.offset.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(z.offset.y, 0.0, epsilon = 1e-12);
        let mut out = vp;
        for _ in 0..50 {
            out = apply_zoom(&out, cursor, ZoomDirection::Out);
        }
        assert!(out.scale > 0.0);
    }

    #[test]
    fn pan_adds_raw_delta() {
        let vp = ViewportState::new(canvas());
        let moved = apply_pan(&apply_pan(&vp, Vector2::new(5.0, -3.0)), Vector2::new(1.0, 1.0));
        assert_eq!(moved.offset, Vector2::new(6.0, -2.0));
        assert_eq!(moved.scale, vp.scale);
    }

    #[test]
    fn reset_and_resize() {
        let vp = apply_pan(&ViewportState::new(canvas()), Vector2::new(9.0, 9.0));
        let resized = vp.resize(Vector2::new(200.0, 100.0));
        assert_eq!(resized.screen_center, Vector2::new(100.0, 50.0));
        assert_eq!(resized.offset, vp.offset);
        let reset = resized.reset();
        assert_eq!(reset.offset, Vector2::zeros());
        assert_eq!(reset.scale, DEFAULT_SCALE);
        assert_eq!(reset.screen_center, resized.screen_center);
    }

    #[test]
    fn scroll_direction() {
        assert_eq!(ZoomDirection::from_scroll(1.0), Some(ZoomDirection::In));
        assert_eq!(ZoomDirection::from_scroll(-0.5), Some(ZoomDirection::Out));
        assert_eq!(ZoomDirection::from_scroll(0.0), None);
        assert_eq!(ZoomDirection::In.inverse(), ZoomDirection::Out);
    }

    #[test]
    fn vertices_follow_trajectory() {
        let vp = ViewportState::new(canvas());
        let traj = [State::new(0.0, 0.0, 0.0, 0.0), State::new(1.0, -1.0, 0.0, 0.0)];
        let v = screen_vertices(&traj, &vp);
        assert_eq!(v, vec![Vector2::new(500.0, 400.0), Vector2::new(650.0, 550.0)]);
    }
}
