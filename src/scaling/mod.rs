pub mod inputs;
pub mod scaler;

pub use inputs::{Field, PhysicalInputs};
pub use scaler::{scale_parameters, Scaled, ScalingContext};
