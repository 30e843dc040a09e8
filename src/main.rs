use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use orbit_sim::dynamics::state::SimConfig;
use orbit_sim::io::{csv, json, params, table};
use orbit_sim::scaling::{scale_parameters, Field, PhysicalInputs};
use orbit_sim::sim::event::{ApsisDetector, CollisionDetector, EventDetector, EventKind};
use orbit_sim::sim::{detect_events, run};

/// Planar two-body orbit with linear drag/thrust, integrated with RK4.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Parameter file (key=value lines); the reference orbit is used if omitted
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Dimensionless time step
    #[arg(long, default_value_t = SimConfig::default().dt)]
    dt: f64,

    /// Dimensionless central body radius (collision threshold)
    #[arg(long, default_value_t = SimConfig::default().central_body_radius)]
    radius: f64,

    /// Export the trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Export the run summary as JSON
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Save the parameters used for this run
    #[arg(long)]
    save_params: Option<PathBuf>,

    /// Maximum number of sampled table rows (0 hides the table)
    #[arg(long, default_value_t = table::DEFAULT_MAX_ROWS)]
    rows: usize,
}

const MAX_PRINTED_EVENTS: usize = 12;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------
    let inputs = match &args.params {
        Some(path) => {
            info!("loading parameters from {}", path.display());
            params::read_params_file(path)?
        }
        None => PhysicalInputs::reference(),
    };

    let config = SimConfig {
        dt: args.dt,
        central_body_radius: args.radius,
        ..SimConfig::default()
    };

    let scaled = scale_parameters(&inputs, &config)?;
    let sim_params = &scaled.params;
    let ctx = &scaled.context;

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let sim_run = run(sim_params);
    let trajectory = &sim_run.trajectory;

    let mut apsides = ApsisDetector;
    let mut collision = CollisionDetector::new(sim_params.central_body_radius);
    let mut detectors: [&mut dyn EventDetector; 2] = [&mut apsides, &mut collision];
    let events = detect_events(trajectory, &mut detectors);
    let summary = json::OrbitSummary::from_run(&sim_run, sim_params, Some(ctx));

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  ORBIT SIMULATION: two-body, RK4, linear drag/thrust");
    println!("====================================================================");
    println!();
    println!("  Input Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    for field in Field::ALL {
        println!(
            "  {:<24} {:>14} {}",
            field.key(),
            inputs.get(field),
            field.unit()
        );
    }
    println!();

    println!("  Unit System");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Length unit:   {:>12.4e} m      Mass unit:    {:>12.4e} kg",
        ctx.length_unit, ctx.mass_unit
    );
    println!(
        "  Time unit:     {:>12.4e} s      Velocity:     {:>12.4} m/s",
        ctx.time_unit, ctx.characteristic_velocity
    );
    println!(
        "  Initial state: x = {:.3}, vy = {:.6}   M = {:.12}",
        sim_params.initial_state.pos.x, sim_params.initial_state.vel.y, sim_params.m
    );
    println!(
        "  Integration:   {} steps, dt = {}   (1 step = {:.3} days)",
        sim_params.steps,
        sim_params.dt,
        ctx.step_to_days(1, sim_params.dt)
    );
    for w in &scaled.warnings {
        println!("  WARNING: {}", w);
    }
    println!();

    println!("  Orbit Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if events.is_empty() {
        println!("  (none)");
    }
    for ev in events.iter().take(MAX_PRINTED_EVENTS) {
        let label = match ev.kind {
            EventKind::Periapsis => "PERIAPSIS",
            EventKind::Apoapsis => "APOAPSIS",
            EventKind::Collision => "COLLISION",
        };
        println!(
            "  {:<10} step={:>9}   t={:>12.1} days   r={:>9.5}   v={:>8.5}",
            label,
            ev.step,
            ctx.step_to_days(ev.step, sim_params.dt),
            ev.state.radius(),
            ev.state.speed()
        );
    }
    if events.len() > MAX_PRINTED_EVENTS {
        println!("  ... {} more", events.len() - MAX_PRINTED_EVENTS);
    }
    println!();

    println!("  Run Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Termination:   {:?}", sim_run.termination);
    println!(
        "  Points:        {:>10}      Duration:  {:.1} days",
        summary.points,
        summary.duration_days.unwrap_or(0.0)
    );
    println!(
        "  Radius:        min {:.5}   max {:.5}   final {:.5}",
        summary.min_radius, summary.max_radius, summary.final_radius
    );
    println!(
        "  Final r (AU):  {:.5}",
        ctx.length_to_meters(summary.final_radius) / orbit_sim::scaling::scaler::ASTRONOMICAL_UNIT
    );
    println!(
        "  Drift:         energy {:.3e}   angular momentum {:.3e}",
        summary.energy_drift, summary.angular_momentum_drift
    );
    println!();

    if args.rows > 0 {
        println!("  Trajectory Table (x, y, vx, vy dimensionless)");
        println!("  ──────────────────────────────────────────────────────────────────");
        let rows = table::sample_rows(trajectory, sim_params.dt, ctx, args.rows);
        table::write_table(&mut std::io::stdout().lock(), &rows)?;
        println!();
    }
    println!("====================================================================");
    println!();

    // -----------------------------------------------------------------------
    // Exports
    // -----------------------------------------------------------------------
    if let Some(path) = &args.csv {
        csv::write_trajectory_file(path, trajectory, sim_params.dt)?;
        info!("trajectory written to {}", path.display());
    }
    if let Some(path) = &args.summary {
        json::write_summary_file(path, &summary)?;
        info!("summary written to {}", path.display());
    }
    if let Some(path) = &args.save_params {
        params::write_params_file(path, &inputs)?;
        info!("parameters written to {}", path.display());
    }

    Ok(())
}
