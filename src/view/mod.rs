pub mod fit;
pub mod reveal;
pub mod viewport;

pub use fit::{compute_fitted_view, display_points, fit_display_points, FittedView};
pub use reveal::RevealCursor;
pub use viewport::{
    apply_pan, apply_zoom, screen_to_world, screen_vertices, world_to_screen, ViewportState,
    ZoomDirection,
};
