use nalgebra::Vector2;

use crate::dynamics::state::State;
use super::viewport::ViewportState;

const PADDING_FACTOR: f64 = 0.1;
/// Extents below this pad as if they were this wide.
const MIN_PADDING_BASE: f64 = 0.1;
/// Smallest view side in world units (a little over the body radius).
const MIN_VIEW_DIMENSION: f64 = 0.02;

// ---------------------------------------------------------------------------
// Fitted view
// ---------------------------------------------------------------------------

/// Rectangle in display coordinates (x right, y down) sized to the canvas
/// aspect ratio and covering the trajectory, the origin and a margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedView {
    pub center: Vector2<f64>,
    pub size: Vector2<f64>,
}

impl FittedView {
    pub fn min(&self) -> Vector2<f64> {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> Vector2<f64> {
        self.center + self.size * 0.5
    }

    pub fn contains(&self, p: Vector2<f64>) -> bool {
        let (lo, hi) = (self.min(), self.max());
        p.x >= lo.x && p.x <= hi.x && p.y >= lo.y && p.y <= hi.y
    }

    /// Viewport that maps this rectangle onto a canvas of the given pixel size.
    pub fn to_viewport(&self, canvas: Vector2<f64>) -> Option<ViewportState> {
        if !(canvas.x > 0.0 && canvas.y > 0.0) || !canvas.iter().all(|c| c.is_finite()) {
            return None;
        }
        let scale = canvas.y / self.size.y;
        Some(ViewportState {
            scale,
            offset: -self.center * scale,
            screen_center: canvas * 0.5,
        })
    }
}

/// Trajectory positions with y inverted for screen-style display.
pub fn display_points(trajectory: &[State]) -> Vec<Vector2<f64>> {
    trajectory.iter().map(|s| Vector2::new(s.pos.x, -s.pos.y)).collect()
}

/// Fit a view around display-space points plus the origin.
///
/// Returns `None` for no points or an unusable aspect ratio.
pub fn fit_display_points(points: &[Vector2<f64>], canvas_aspect: f64) -> Option<FittedView> {
    if points.is_empty() || !(canvas_aspect > 0.0) || !canvas_aspect.is_finite() {
        return None;
    }

    // Bounding box, always including the central body
    let mut lo = Vector2::<f64>::zeros();
    let mut hi = Vector2::<f64>::zeros();
    for p in points {
        lo.x = lo.x.min(p.x);
        lo.y = lo.y.min(p.y);
        hi.x = hi.x.max(p.x);
        hi.y = hi.y.max(p.y);
    }

    let extent = hi - lo;
    let padding = Vector2::new(
        extent.x.max(MIN_PADDING_BASE) * PADDING_FACTOR,
        extent.y.max(MIN_PADDING_BASE) * PADDING_FACTOR,
    );
    let padded_lo = lo - padding;
    let padded_hi = hi + padding;
    let padded = padded_hi - padded_lo;

    // Floors affect sizing only, never centring
    let eff_w = padded.x.max(MIN_VIEW_DIMENSION);
    let eff_h = padded.y.max(MIN_VIEW_DIMENSION);

    let size = if canvas_aspect > eff_w / eff_h {
        Vector2::new(eff_h * canvas_aspect, eff_h)
    } else {
        Vector2::new(eff_w, eff_w / canvas_aspect)
    };

    Some(FittedView {
        center: padded_lo + padded * 0.5,
        size,
    })
}

/// Fit a view around a trajectory (world coordinates).
pub fn compute_fitted_view(trajectory: &[State], canvas_aspect: f64) -> Option<FittedView> {
    fit_display_points(&display_points(trajectory), canvas_aspect)
}
