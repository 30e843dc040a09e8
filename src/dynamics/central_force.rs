use nalgebra::Vector2;

use crate::dynamics::state::{Deriv, SimParams, State};

// ---------------------------------------------------------------------------
// Equations of motion: central gravity + linear propulsion
// ---------------------------------------------------------------------------

/// Compute state derivatives for a given state.
///
/// Forces modeled:
///   1. Gravity:    inverse-square, toward the origin
///   2. Propulsion: (thrust - drag) times the raw velocity vector
///
/// The propulsion term is not normalised by speed, so its magnitude grows
/// with |v|. At r = 0 the acceleration is zero.
pub fn derivatives(state: &State, params: &SimParams) -> Deriv {
    let r_squared = state.radius_squared();
    if r_squared == 0.0 {
        return Deriv {
            dpos: state.vel,
            dvel: Vector2::zeros(),
        };
    }

    let gravity = gravity_factor(r_squared, params);
    let propulsion = propulsion_factor(params);

    Deriv {
        dpos: state.vel,
        dvel: state.pos * gravity + state.vel * propulsion,
    }
}

/// −G·M / r³, applied to the position vector.
pub fn gravity_factor(r_squared: f64, params: &SimParams) -> f64 {
    let r = r_squared.sqrt();
    let r_cubed = r_squared * r;
    -params.g * params.m / r_cubed
}

/// Net linear perturbation applied to the velocity vector.
pub fn propulsion_factor(params: &SimParams) -> f64 {
    params.thrust_coefficient - params.drag_coefficient
}
