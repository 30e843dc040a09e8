use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// Default engine constants (dimensionless)
// ---------------------------------------------------------------------------

pub const DEFAULT_DT: f64 = 0.001;
pub const DEFAULT_STEPS: usize = 100_000;
pub const DEFAULT_CENTRAL_BODY_RADIUS: f64 = 0.01;
pub const DEFAULT_INITIAL_X: f64 = 1.5;
pub const DEFAULT_FALLBACK_STEPS: usize = 1000;

// ---------------------------------------------------------------------------
// Planar state: position and velocity, dimensionless
// ---------------------------------------------------------------------------

/// Phase vector of the orbiting body. Central body sits at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
}

impl State {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self {
            pos: Vector2::new(x, y),
            vel: Vector2::new(vx, vy),
        }
    }

    /// Advance state by a derivative scaled by h (used inside RK4).
    pub fn apply(&self, d: &Deriv, h: f64) -> State {
        State {
            pos: self.pos + d.dpos * h,
            vel: self.vel + d.dvel * h,
        }
    }

    pub fn radius_squared(&self) -> f64 {
        self.pos.x * self.pos.x + self.pos.y * self.pos.y
    }

    pub fn radius(&self) -> f64 {
        self.radius_squared().sqrt()
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Strictly inside a disc of the given radius.
    pub fn is_inside(&self, radius: f64) -> bool {
        self.radius_squared() < radius * radius
    }

    /// Specific orbital energy v²/2 − μ/r.
    pub fn specific_energy(&self, mu: f64) -> f64 {
        0.5 * self.vel.norm_squared() - mu / self.radius()
    }

    /// Specific angular momentum (z component of r × v).
    pub fn angular_momentum(&self) -> f64 {
        self.pos.x * self.vel.y - self.pos.y * self.vel.x
    }

    /// Rate of change of the radius; zero at an apsis.
    pub fn radial_velocity(&self) -> f64 {
        let r = self.radius();
        if r == 0.0 {
            return 0.0;
        }
        self.pos.dot(&self.vel) / r
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deriv {
    pub dpos: Vector2<f64>, // velocity
    pub dvel: Vector2<f64>, // acceleration
}

// ---------------------------------------------------------------------------
// Simulation parameters (immutable per run)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    pub g: f64,
    pub m: f64,                   // central mass, already scaled
    pub central_body_radius: f64, // collision threshold
    pub drag_coefficient: f64,
    pub thrust_coefficient: f64,
    pub dt: f64,
    pub steps: usize,
    pub initial_state: State,
}

impl SimParams {
    /// Gravitational parameter G·M.
    pub fn mu(&self) -> f64 {
        self.g * self.m
    }

    /// Step count the engine actually runs; zero is treated as one.
    pub fn effective_steps(&self) -> usize {
        self.steps.max(1)
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            g: 1.0,
            m: 1.0,
            central_body_radius: DEFAULT_CENTRAL_BODY_RADIUS,
            drag_coefficient: 0.05,
            thrust_coefficient: 0.0,
            dt: DEFAULT_DT,
            steps: DEFAULT_STEPS,
            initial_state: State::new(DEFAULT_INITIAL_X, 0.0, 0.0, 0.8),
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation config: engine knobs the unit scaler does not derive
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub dt: f64,
    pub central_body_radius: f64,
    pub initial_x: f64,
    pub fallback_steps: usize, // used when dt is degenerate
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            central_body_radius: DEFAULT_CENTRAL_BODY_RADIUS,
            initial_x: DEFAULT_INITIAL_X,
            fallback_steps: DEFAULT_FALLBACK_STEPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn apply_scales_derivative() {
        let s = State::new(1.0, 2.0, 3.0, 4.0);
        let d = Deriv {
            dpos: Vector2::new(1.0, -1.0),
            dvel: Vector2::new(0.5, 0.25),
        };
        let out = s.apply(&d, 2.0);
        assert_eq!(out, State::new(3.0, 0.0, 4.0, 4.5));
    }

    #[test]
    fn circular_orbit_invariants() {
        // r = 1, v = 1, mu = 1: circular, E = -1/2, h = 1
        let s = State::new(1.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(s.specific_energy(1.0), -0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(s.angular_momentum(), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(s.radial_velocity(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn inside_is_strict() {
        let s = State::new(0.01, 0.0, 0.0, 0.0);
        assert!(!s.is_inside(0.01));
        assert!(s.is_inside(0.010_001));
    }

    #[test]
    fn zero_steps_run_once() {
        let p = SimParams { steps: 0, ..SimParams::default() };
        assert_eq!(p.effective_steps(), 1);
    }
}
