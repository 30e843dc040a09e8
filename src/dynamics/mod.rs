pub mod central_force;
pub mod state;

pub use central_force::derivatives;
pub use state::{Deriv, SimConfig, SimParams, State};
