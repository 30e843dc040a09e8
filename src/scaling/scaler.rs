use log::{debug, warn};

use crate::dynamics::state::{SimConfig, SimParams, State};
use crate::error::{ScalingError, ScalingWarning};
use super::inputs::PhysicalInputs;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G_SI: f64 = 6.67430e-11; // m^3 kg^-1 s^-2
pub const ASTRONOMICAL_UNIT: f64 = 1.495978707e11; // m
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const CENTRAL_MASS_FACTOR_KG: f64 = 1.0e25;

/// Below this a divisor is treated as zero.
const DEGENERATE_EPS: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Unit system
// ---------------------------------------------------------------------------

/// Reference units linking SI quantities to the dimensionless engine.
/// In these units G = M = 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingContext {
    pub length_unit: f64, // m
    pub mass_unit: f64,   // kg
    pub time_unit: f64,   // s
    pub characteristic_velocity: f64, // m/s
}

impl ScalingContext {
    /// Build the unit system; the reference length maps onto `initial_x`.
    pub fn new(mass_unit: f64, initial_x: f64) -> Result<Self, ScalingError> {
        if !(mass_unit > DEGENERATE_EPS) {
            return Err(ScalingError::NonPositiveMass { mass_unit });
        }
        let length_unit = ASTRONOMICAL_UNIT / initial_x;
        let time_unit = (length_unit.powi(3) / (G_SI * mass_unit)).sqrt();
        Ok(Self {
            length_unit,
            mass_unit,
            time_unit,
            characteristic_velocity: length_unit / time_unit,
        })
    }

    pub fn time_to_days(&self, t: f64) -> f64 {
        t * self.time_unit / SECONDS_PER_DAY
    }

    pub fn days_to_time(&self, days: f64) -> f64 {
        days * SECONDS_PER_DAY / self.time_unit
    }

    /// Physical time in days of trajectory index `step`.
    pub fn step_to_days(&self, step: usize, dt: f64) -> f64 {
        self.time_to_days(step as f64 * dt)
    }

    pub fn length_to_meters(&self, x: f64) -> f64 {
        x * self.length_unit
    }

    pub fn velocity_to_mps(&self, v: f64) -> f64 {
        v * self.characteristic_velocity
    }
}

// ---------------------------------------------------------------------------
// Scaling
// ---------------------------------------------------------------------------

/// Engine-ready parameters plus the units that produced them.
#[derive(Debug, Clone)]
pub struct Scaled {
    pub params: SimParams,
    pub context: ScalingContext,
    pub warnings: Vec<ScalingWarning>,
}

/// Convert validated physical inputs into dimensionless simulation parameters.
///
/// The body starts at `(initial_x, 0)` moving along +y with speed V0.
pub fn scale_parameters(inputs: &PhysicalInputs, config: &SimConfig) -> Result<Scaled, ScalingError> {
    inputs.validate()?;
    // A zero radius would switch collision detection off
    if !(config.central_body_radius > 0.0 && config.central_body_radius.is_finite()) {
        return Err(ScalingError::InvalidRadius { radius: config.central_body_radius });
    }

    let mass_unit = inputs.m_central_body_factor * CENTRAL_MASS_FACTOR_KG;
    let context = ScalingContext::new(mass_unit, config.initial_x)?;
    let mut warnings = Vec::new();

    // Satellite mass enters as a tiny correction to the central mass
    let m = (mass_unit + inputs.m_satellite_kg) / mass_unit;

    let vy = if context.characteristic_velocity.abs() > DEGENERATE_EPS {
        inputs.v0_m_per_s / context.characteristic_velocity
    } else {
        warnings.push(ScalingWarning::DegenerateVelocity);
        0.0
    };

    let steps = if config.dt > DEGENERATE_EPS {
        let total = context.days_to_time(inputs.t_days);
        // float -> usize saturates; NaN maps to 0 and is clamped below
        (total / config.dt).floor() as usize
    } else {
        warnings.push(ScalingWarning::DegenerateStep);
        config.fallback_steps
    };

    for w in &warnings {
        warn!("{}", w);
    }

    let params = SimParams {
        g: 1.0,
        m,
        central_body_radius: config.central_body_radius,
        drag_coefficient: inputs.k_coeff,
        thrust_coefficient: inputs.f_coeff,
        dt: config.dt,
        steps: steps.max(1),
        initial_state: State::new(config.initial_x, 0.0, 0.0, vy),
    };

    debug!(
        "scaled: L = {:.4e} m, T = {:.4e} s, V = {:.4} m/s, M = {}, vy = {:.6}, steps = {}",
        context.length_unit,
        context.time_unit,
        context.characteristic_velocity,
        params.m,
        vy,
        params.steps
    );

    Ok(Scaled { params, context, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn units_for_reference_mass() {
        let ctx = ScalingContext::new(1.0e25, 1.5).unwrap();
        assert_relative_eq!(ctx.length_unit, ASTRONOMICAL_UNIT / 1.5, max_relative = 1e-15);
        // T = sqrt(L^3 / (G M))
        let expected_t = (ctx.length_unit.powi(3) / (G_SI * 1.0e25)).sqrt();
        assert_relative_eq!(ctx.time_unit, expected_t, max_relative = 1e-15);
        assert_relative_eq!(ctx.characteristic_velocity, 81.8, max_relative = 1e-3);
    }

    #[test]
    fn reference_inputs_scale() {
        let scaled = scale_parameters(&PhysicalInputs::reference(), &SimConfig::default()).unwrap();
        let p = &scaled.params;
        assert!(scaled.warnings.is_empty());
        assert_eq!(p.g, 1.0);
        assert_relative_eq!(p.m, 1.0 + 1000.0 / 1.0e25, max_relative = 1e-15);
        assert_eq!(p.initial_state.pos.x, 1.5);
        assert_eq!(p.initial_state.vel.x, 0.0);
        assert_relative_eq!(
            p.initial_state.vel.y,
            66.0 / scaled.context.characteristic_velocity,
            max_relative = 1e-15
        );
        let expected_steps = (170_000.0 * SECONDS_PER_DAY / scaled.context.time_unit / 0.001).floor();
        assert_eq!(p.steps, expected_steps as usize);
        assert_eq!(p.drag_coefficient, 0.0);
        assert_eq!(p.central_body_radius, 0.01);
    }

    #[test]
    fn zero_central_mass_fails() {
        // Bypasses range validation on purpose
        let err = ScalingContext::new(0.0, 1.5).unwrap_err();
        assert_eq!(err, ScalingError::NonPositiveMass { mass_unit: 0.0 });
        assert!(ScalingContext::new(1e-10, 1.5).is_err());
        assert!(ScalingContext::new(f64::NAN, 1.5).is_err());
    }

    #[test]
    fn zero_mass_factor_input_is_rejected() {
        let inputs = PhysicalInputs {
            m_central_body_factor: 0.0,
            ..PhysicalInputs::reference()
        };
        let err = scale_parameters(&inputs, &SimConfig::default()).unwrap_err();
        assert!(matches!(err, ScalingError::Invalid(_)));
    }

    #[test]
    fn degenerate_dt_uses_fallback_steps() {
        let config = SimConfig { dt: 0.0, ..SimConfig::default() };
        let scaled = scale_parameters(&PhysicalInputs::reference(), &config).unwrap();
        assert_eq!(scaled.params.steps, 1000);
        assert_eq!(scaled.warnings, vec![ScalingWarning::DegenerateStep]);
    }

    #[test]
    fn degenerate_velocity_starts_at_rest() {
        // Tiny initial_x blows the length unit up until L/T is ~1e-13 m/s
        let config = SimConfig { initial_x: 1.0e-30, ..SimConfig::default() };
        let scaled = scale_parameters(&PhysicalInputs::reference(), &config).unwrap();
        assert!(scaled.context.characteristic_velocity <= 1e-9);
        assert_eq!(scaled.params.initial_state.vel.y, 0.0);
        assert_eq!(scaled.warnings, vec![ScalingWarning::DegenerateVelocity]);
        assert_eq!(scaled.params.steps, 1);
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        for radius in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let config = SimConfig { central_body_radius: radius, ..SimConfig::default() };
            let err = scale_parameters(&PhysicalInputs::reference(), &config).unwrap_err();
            assert!(matches!(err, ScalingError::InvalidRadius { .. }), "radius {}", radius);
        }
    }

    #[test]
    fn short_duration_clamps_to_one_step() {
        // One day is far below one time unit (~38 years)
        let inputs = PhysicalInputs { t_days: 1.0, ..PhysicalInputs::reference() };
        let scaled = scale_parameters(&inputs, &SimConfig::default()).unwrap();
        assert_eq!(scaled.params.steps, 1);
    }

    #[test]
    fn coefficients_pass_through() {
        let inputs = PhysicalInputs { k_coeff: 0.3, f_coeff: 1.2, ..PhysicalInputs::reference() };
        let scaled = scale_parameters(&inputs, &SimConfig::default()).unwrap();
        assert_eq!(scaled.params.drag_coefficient, 0.3);
        assert_eq!(scaled.params.thrust_coefficient, 1.2);
    }

    #[test]
    fn time_conversions_invert() {
        let ctx = ScalingContext::new(3.0e25, 1.5).unwrap();
        assert_relative_eq!(ctx.days_to_time(ctx.time_to_days(2.5)), 2.5, max_relative = 1e-14);
        assert_relative_eq!(ctx.step_to_days(1000, 0.001), ctx.time_to_days(1.0), max_relative = 1e-14);
        assert_relative_eq!(ctx.length_to_meters(1.5), ASTRONOMICAL_UNIT, max_relative = 1e-15);
    }
}
