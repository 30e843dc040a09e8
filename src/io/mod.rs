pub mod csv;
pub mod json;
pub mod params;
pub mod table;

pub use self::csv::{read_trajectory, write_trajectory, TrajectoryRecord};
pub use self::json::{write_summary, OrbitSummary};
pub use self::params::{read_params, write_params};
pub use self::table::{sample_rows, TableRow, DEFAULT_MAX_ROWS};
