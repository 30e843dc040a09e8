use log::{debug, info};

use crate::dynamics::state::{SimParams, State};
use super::event::Termination;
use super::integrator::rk4_step;

// Capacity hint ceiling; long runs grow the Vec as needed.
const MAX_PREALLOC: usize = 1_000_000;

// ---------------------------------------------------------------------------
// Step-by-step propagator
// ---------------------------------------------------------------------------

/// Lazily yields the trajectory one state at a time: the initial state first,
/// then one state per RK4 step. Stops after `steps` steps or on the first
/// state inside the central body (that state is still yielded). Dropping the
/// iterator early is how a caller interrupts a long run.
pub struct Propagator<'a> {
    params: &'a SimParams,
    current: State,
    steps_done: usize,
    started: bool,
    termination: Option<Termination>,
}

impl<'a> Propagator<'a> {
    pub fn new(params: &'a SimParams) -> Self {
        Self {
            params,
            current: params.initial_state,
            steps_done: 0,
            started: false,
            termination: None,
        }
    }

    /// Steps integrated so far.
    pub fn steps_done(&self) -> usize {
        self.steps_done
    }

    /// Set once the iterator is exhausted.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    fn collided(&self) -> bool {
        self.current.is_inside(self.params.central_body_radius)
    }
}

impl Iterator for Propagator<'_> {
    type Item = State;

    fn next(&mut self) -> Option<State> {
        if self.termination.is_some() {
            return None;
        }

        if !self.started {
            self.started = true;
            if self.collided() {
                info!(
                    "initial position ({:.4}, {:.4}) is inside the central body (R = {})",
                    self.current.pos.x, self.current.pos.y, self.params.central_body_radius
                );
                self.termination = Some(Termination::InitialCollision);
            }
            return Some(self.current);
        }

        if self.steps_done >= self.params.effective_steps() {
            self.termination = Some(Termination::Completed);
            return None;
        }

        self.current = rk4_step(&self.current, self.params.dt, self.params);
        self.steps_done += 1;

        if self.collided() {
            info!(
                "collision at step {}: ({:.4}, {:.4}), r = {:.6}",
                self.steps_done,
                self.current.pos.x,
                self.current.pos.y,
                self.current.radius()
            );
            self.termination = Some(Termination::Collision { step: self.steps_done });
        } else if self.steps_done == self.params.effective_steps() {
            self.termination = Some(Termination::Completed);
        }

        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.termination.is_some() {
            return (0, Some(0));
        }
        // Pending steps plus the initial state if not yet yielded; the upper
        // bound overflows only for steps == usize::MAX
        let pending = self.params.effective_steps().saturating_sub(self.steps_done);
        let initial = usize::from(!self.started);
        (
            1.min(pending.saturating_add(initial)),
            pending.checked_add(initial),
        )
    }
}

// ---------------------------------------------------------------------------
// Full simulation
// ---------------------------------------------------------------------------

/// Trajectory together with the reason the run stopped.
#[derive(Debug, Clone)]
pub struct SimRun {
    pub trajectory: Vec<State>,
    pub termination: Termination,
}

/// Run the engine to completion or collision.
pub fn run(params: &SimParams) -> SimRun {
    debug!(
        "simulating {} steps, dt = {}, mu = {}, propulsion = {}",
        params.effective_steps(),
        params.dt,
        params.mu(),
        params.thrust_coefficient - params.drag_coefficient
    );

    let mut propagator = Propagator::new(params);
    let capacity = params.effective_steps().saturating_add(1);
    let mut trajectory = Vec::with_capacity(capacity.min(MAX_PREALLOC));
    trajectory.extend(&mut propagator);

    let termination = propagator.termination().unwrap_or(Termination::Completed);
    debug!("run finished with {} states ({:?})", trajectory.len(), termination);

    SimRun { trajectory, termination }
}

/// Run the engine and return only the trajectory.
/// Always at least one state (the initial one), at most `steps + 1`.
pub fn simulate(params: &SimParams) -> Vec<State> {
    run(params).trajectory
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn vacuum(steps: usize) -> SimParams {
        SimParams {
            drag_coefficient: 0.0,
            thrust_coefficient: 0.0,
            steps,
            ..SimParams::default()
        }
    }

    #[test]
    fn first_state_is_initial() {
        let p = vacuum(10);
        let traj = simulate(&p);
        assert_eq!(traj[0], p.initial_state);
    }

    #[test]
    fn completed_run_has_steps_plus_one() {
        let p = vacuum(250);
        let out = run(&p);
        assert_eq!(out.trajectory.len(), 251);
        assert_eq!(out.termination, Termination::Completed);
    }

    #[test]
    fn zero_steps_clamped_to_one() {
        let p = vacuum(0);
        assert_eq!(simulate(&p).len(), 2);
    }

    #[test]
    fn initial_collision_returns_single_state() {
        let p = SimParams {
            initial_state: State::new(0.005, 0.0, 0.0, 1.0),
            ..vacuum(100)
        };
        let out = run(&p);
        assert_eq!(out.trajectory.len(), 1);
        assert_eq!(out.termination, Termination::InitialCollision);
    }

    #[test]
    fn radial_infall_truncates_at_collision() {
        // Released from rest: falls straight in, well before 10 000 steps.
        // A large body keeps the last step far from the singularity.
        let p = SimParams {
            central_body_radius: 0.1,
            initial_state: State::new(1.0, 0.0, 0.0, 0.0),
            ..vacuum(10_000)
        };
        let out = run(&p);
        let last = out.trajectory.last().unwrap();
        assert!(last.is_inside(p.central_body_radius));
        assert!(out.trajectory.len() < 10_001);
        match out.termination {
            Termination::Collision { step } => assert_eq!(step + 1, out.trajectory.len()),
            other => panic!("expected collision, got {:?}", other),
        }
        // Every earlier state is outside
        let n = out.trajectory.len();
        assert!(out.trajectory[..n - 1]
            .iter()
            .all(|s| !s.is_inside(p.central_body_radius)));
    }

    #[test]
    fn propagator_can_be_interrupted() {
        let p = vacuum(1_000_000);
        let mut prop = Propagator::new(&p);
        let head: Vec<State> = prop.by_ref().take(5).collect();
        assert_eq!(head.len(), 5);
        assert_eq!(prop.steps_done(), 4);
        assert!(prop.termination().is_none());
    }

    #[test]
    fn huge_step_count_can_be_sampled() {
        let p = vacuum(usize::MAX);
        let mut prop = Propagator::new(&p);
        assert_eq!(prop.size_hint(), (1, None));

        let head: Vec<State> = prop.by_ref().take(3).collect();
        assert_eq!(head.len(), 3);
        assert_eq!(head[0], p.initial_state);
        assert_eq!(prop.size_hint(), (1, Some(usize::MAX - 2)));
    }

    #[test]
    fn size_hint_counts_initial_state() {
        let p = vacuum(10);
        let mut prop = Propagator::new(&p);
        assert_eq!(prop.size_hint(), (1, Some(11)));
        prop.next();
        assert_eq!(prop.size_hint(), (1, Some(10)));
        let rest: Vec<State> = prop.by_ref().collect();
        assert_eq!(rest.len(), 10);
        assert_eq!(prop.size_hint(), (0, Some(0)));
    }

    #[test]
    fn propagator_matches_simulate() {
        let p = SimParams { steps: 50, ..SimParams::default() };
        let lazy: Vec<State> = Propagator::new(&p).collect();
        assert_eq!(lazy, simulate(&p));
    }

    #[test]
    fn non_finite_values_propagate_without_panic() {
        let p = SimParams {
            drag_coefficient: 0.0,
            thrust_coefficient: 1.0e308,
            initial_state: State::new(1.5, 0.0, 0.0, 1.0),
            steps: 10,
            ..SimParams::default()
        };
        let out = run(&p);
        // NaN never compares below the radius, so the run is not cut short
        assert_eq!(out.trajectory.len(), 11);
        assert_eq!(out.termination, Termination::Completed);
        let last = out.trajectory.last().unwrap();
        assert!(!(last.pos.x.is_finite() && last.pos.y.is_finite()));
    }
}
