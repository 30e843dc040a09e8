pub mod dynamics;
pub mod error;
pub mod io;
pub mod scaling;
pub mod sim;
pub mod view;

pub use error::{Error, Result};

// Flat re-exports for the common path: inputs in, trajectory out
pub mod prelude {
    pub use crate::dynamics::state::{SimConfig, SimParams, State};
    pub use crate::scaling::{scale_parameters, PhysicalInputs, Scaled, ScalingContext};
    pub use crate::sim::{run, simulate, Propagator, SimRun, Termination};
    pub use crate::view::{compute_fitted_view, world_to_screen, ViewportState};
}
