pub mod event;
pub mod integrator;
pub mod runner;

pub use event::{detect_events, EventKind, SimEvent, Termination};
pub use integrator::rk4_step;
pub use runner::{run, simulate, Propagator, SimRun};
