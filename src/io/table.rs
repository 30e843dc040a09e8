use std::io::{self, Write};

use crate::dynamics::state::State;
use crate::scaling::scaler::ScalingContext;

pub const DEFAULT_MAX_ROWS: usize = 100;

/// One sampled trajectory row: physical time, dimensionless phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRow {
    pub step_index: usize,
    pub time_days: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

/// Every `len / max_rows`-th state (all of them for short runs).
///
/// The stride is truncated, so a long run can yield somewhat more than
/// `max_rows` rows; the first state is always included.
pub fn sample_rows(
    trajectory: &[State],
    dt: f64,
    context: &ScalingContext,
    max_rows: usize,
) -> Vec<TableRow> {
    let stride = if max_rows > 0 && trajectory.len() > max_rows {
        (trajectory.len() / max_rows).max(1)
    } else {
        1
    };

    trajectory
        .iter()
        .enumerate()
        .step_by(stride)
        .map(|(i, s)| TableRow {
            step_index: i,
            time_days: context.step_to_days(i, dt),
            x: s.pos.x,
            y: s.pos.y,
            vx: s.vel.x,
            vy: s.vel.y,
        })
        .collect()
}

/// Fixed-width text table, two decimals like the summary printout.
pub fn write_table<W: Write>(writer: &mut W, rows: &[TableRow]) -> io::Result<()> {
    writeln!(
        writer,
        "  {:>12}  {:>10}  {:>10}  {:>10}  {:>10}",
        "time [days]", "x", "y", "vx", "vy"
    )?;
    for r in rows {
        writeln!(
            writer,
            "  {:>12.2}  {:>10.2}  {:>10.2}  {:>10.2}  {:>10.2}",
            r.time_days, r.x, r.y, r.vx, r.vy
        )?;
    }
    Ok(())
}
