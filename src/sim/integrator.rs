use crate::dynamics;
use crate::dynamics::state::{SimParams, State};

// ---------------------------------------------------------------------------
// Classical 4th-order Runge-Kutta, fixed step
// ---------------------------------------------------------------------------

/// Single RK4 step: advance state by dt.
pub fn rk4_step(state: &State, dt: f64, params: &SimParams) -> State {
    let k1 = dynamics::derivatives(state, params);
    let k2 = dynamics::derivatives(&state.apply(&k1, dt * 0.5), params);
    let k3 = dynamics::derivatives(&state.apply(&k2, dt * 0.5), params);
    let k4 = dynamics::derivatives(&state.apply(&k3, dt), params);

    State {
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
    }
}
