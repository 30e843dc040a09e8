use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::dynamics::state::{SimParams, State};
use crate::scaling::scaler::ScalingContext;
use crate::sim::event::{detect_events, ApsisDetector, EventKind, Termination};
use crate::sim::runner::SimRun;

/// Summary statistics computed from a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitSummary {
    pub points: usize,
    pub duration: f64,              // dimensionless
    pub duration_days: Option<f64>, // only with a unit system
    pub min_radius: f64,
    pub max_radius: f64,
    pub final_radius: f64,
    pub energy_drift: f64,           // relative, |E - E0| / |E0|
    pub angular_momentum_drift: f64, // relative, |h - h0| / |h0|
    pub periapsis_count: usize,
    pub apoapsis_count: usize,
    pub termination: Termination,
}

/// Relative change, falling back to absolute when the reference is zero.
fn drift(initial: f64, current: f64) -> f64 {
    let diff = (current - initial).abs();
    if initial == 0.0 {
        diff
    } else {
        diff / initial.abs()
    }
}

impl OrbitSummary {
    /// Compute summary from a run. Drift figures compare the final state
    /// with the initial one, so they are only meaningful without drag or
    /// thrust.
    pub fn from_run(run: &SimRun, params: &SimParams, context: Option<&ScalingContext>) -> Self {
        let traj = &run.trajectory;
        let first = traj.first().copied().unwrap_or(params.initial_state);
        let last = traj.last().copied().unwrap_or(first);
        let mu = params.mu();

        let (min_radius, max_radius) = traj
            .iter()
            .map(State::radius)
            .fold((f64::INFINITY, 0.0_f64), |(lo, hi), r| (lo.min(r), hi.max(r)));

        let mut apsides = ApsisDetector;
        let events = detect_events(traj, &mut [&mut apsides]);
        let count = |kind: EventKind| events.iter().filter(|e| e.kind == kind).count();

        let duration = traj.len().saturating_sub(1) as f64 * params.dt;

        OrbitSummary {
            points: traj.len(),
            duration,
            duration_days: context.map(|c| c.time_to_days(duration)),
            min_radius: if traj.is_empty() { first.radius() } else { min_radius },
            max_radius: if traj.is_empty() { first.radius() } else { max_radius },
            final_radius: last.radius(),
            energy_drift: drift(first.specific_energy(mu), last.specific_energy(mu)),
            angular_momentum_drift: drift(first.angular_momentum(), last.angular_momentum()),
            periapsis_count: count(EventKind::Periapsis),
            apoapsis_count: count(EventKind::Apoapsis),
            termination: run.termination,
        }
    }
}

/// JSON number, or `null` for NaN and infinities.
fn number(v: f64) -> String {
    if v.is_finite() {
        format!("{}", v)
    } else {
        "null".into()
    }
}

fn termination_fields(t: Termination) -> (&'static str, String) {
    match t {
        Termination::Completed => ("completed", "null".into()),
        Termination::Collision { step } => ("collision", step.to_string()),
        Termination::InitialCollision => ("initial_collision", "0".into()),
    }
}

/// Write run summary as JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &OrbitSummary) -> io::Result<()> {
    let (reason, step) = termination_fields(summary.termination);
    let days = summary.duration_days.map_or_else(|| "null".into(), number);

    writeln!(writer, "{{")?;
    writeln!(writer, "  \"termination\": {{")?;
    writeln!(writer, "    \"reason\": \"{}\",", reason)?;
    writeln!(writer, "    \"step\": {}", step)?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"trajectory\": {{")?;
    writeln!(writer, "    \"points\": {},", summary.points)?;
    writeln!(writer, "    \"duration\": {},", number(summary.duration))?;
    writeln!(writer, "    \"duration_days\": {},", days)?;
    writeln!(writer, "    \"min_radius\": {},", number(summary.min_radius))?;
    writeln!(writer, "    \"max_radius\": {},", number(summary.max_radius))?;
    writeln!(writer, "    \"final_radius\": {}", number(summary.final_radius))?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"conservation\": {{")?;
    writeln!(writer, "    \"energy_drift\": {},", number(summary.energy_drift))?;
    writeln!(writer, "    \"angular_momentum_drift\": {}", number(summary.angular_momentum_drift))?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"events\": {{")?;
    writeln!(writer, "    \"periapsis\": {},", summary.periapsis_count)?;
    writeln!(writer, "    \"apoapsis\": {}", summary.apoapsis_count)?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write run summary JSON to a file.
pub fn write_summary_file(path: &Path, summary: &OrbitSummary) -> io::Result<()> {
    let mut file = File::create(path)?;
    write_summary(&mut file, summary)
}
