use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};

use crate::dynamics::state::State;
use crate::error::Result;

/// One CSV row. Columns: step_index, dimensionless_time, x, y, vx, vy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub step_index: usize,
    pub dimensionless_time: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl TrajectoryRecord {
    pub fn new(step_index: usize, dt: f64, state: &State) -> Self {
        Self {
            step_index,
            dimensionless_time: step_index as f64 * dt,
            x: state.pos.x,
            y: state.pos.y,
            vx: state.vel.x,
            vy: state.vel.y,
        }
    }

    pub fn state(&self) -> State {
        State::new(self.x, self.y, self.vx, self.vy)
    }
}

/// Write a trajectory as CSV, one row per state, with a header.
pub fn write_trajectory<W: Write>(writer: W, trajectory: &[State], dt: f64) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for (i, s) in trajectory.iter().enumerate() {
        wtr.serialize(TrajectoryRecord::new(i, dt, s))?;
    }
    // An empty trajectory still gets a header
    if trajectory.is_empty() {
        wtr.write_record(["step_index", "dimensionless_time", "x", "y", "vx", "vy"])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: &Path, trajectory: &[State], dt: f64) -> Result<()> {
    write_trajectory(File::create(path)?, trajectory, dt)
}

/// Read records back in file order. Step indices are not checked.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<TrajectoryRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

pub fn read_trajectory<R: Read>(reader: R) -> Result<Vec<State>> {
    Ok(read_records(reader)?.iter().map(TrajectoryRecord::state).collect())
}

pub fn read_trajectory_file(path: &Path) -> Result<Vec<State>> {
    read_trajectory(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn short_arc() -> Vec<State> {
        vec![
            State::new(1.5, 0.0, 0.0, 0.8),
            State::new(1.4999995, 0.0008, -0.0003, 0.7999998),
            State::new(1.499998, 0.0016, -0.0006, 0.7999991),
        ]
    }

    #[test]
    fn csv_output_has_header_and_rows() {
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &short_arc(), 0.001).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "step_index,dimensionless_time,x,y,vx,vy");
        assert_eq!(lines.len(), 4); // header + 3 data rows
        assert!(lines[1].starts_with("0,0.0,1.5,"));
        assert!(lines[3].starts_with("2,0.002,"));
    }

    #[test]
    fn empty_trajectory_writes_header_only() {
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &[], 0.001).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "step_index,dimensionless_time,x,y,vx,vy\n");
    }

    #[test]
    fn reads_back_exact_states() {
        let traj = short_arc();
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj, 0.001).unwrap();
        assert_eq!(read_trajectory(buf.as_slice()).unwrap(), traj);

        let records = read_records(buf.as_slice()).unwrap();
        assert_eq!(records[1].step_index, 1);
        assert_eq!(records[1].dimensionless_time, 0.001);
    }

    #[test]
    fn malformed_row_is_csv_error() {
        let text = "step_index,dimensionless_time,x,y,vx,vy\n0,0.0,1.5,zero,0.0,0.8\n";
        assert!(matches!(read_trajectory(text.as_bytes()), Err(Error::Csv(_))));
    }
}
