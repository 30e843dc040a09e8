use crate::dynamics::state::State;

// ---------------------------------------------------------------------------
// Run termination
// ---------------------------------------------------------------------------

/// Why a run stopped. Collisions are normal outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// All requested steps were integrated.
    Completed,
    /// The body entered the central body after `step` steps.
    Collision { step: usize },
    /// The initial state was already inside the central body.
    InitialCollision,
}

impl Termination {
    pub fn is_collision(&self) -> bool {
        !matches!(self, Termination::Completed)
    }
}

// ---------------------------------------------------------------------------
// Trajectory events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Periapsis,
    Apoapsis,
    Collision,
}

/// A discrete event found in a trajectory.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub step: usize,
    pub kind: EventKind,
    pub state: State,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind>;
}

/// Detects apsides from a sign change of the radial velocity.
pub struct ApsisDetector;

impl EventDetector for ApsisDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind> {
        let before = prev.radial_velocity();
        let after = current.radial_velocity();
        if before < 0.0 && after >= 0.0 {
            Some(EventKind::Periapsis)
        } else if before > 0.0 && after <= 0.0 {
            Some(EventKind::Apoapsis)
        } else {
            None
        }
    }
}

/// Fires once when the body enters the central body.
pub struct CollisionDetector {
    pub radius: f64,
    fired: bool,
}

impl CollisionDetector {
    pub fn new(radius: f64) -> Self {
        Self { radius, fired: false }
    }
}

impl EventDetector for CollisionDetector {
    fn check(&mut self, _prev: &State, current: &State) -> Option<EventKind> {
        if self.fired || !current.is_inside(self.radius) {
            return None;
        }
        self.fired = true;
        Some(EventKind::Collision)
    }
}

/// Run detectors over consecutive pairs; events carry the index of the later state.
pub fn detect_events(trajectory: &[State], detectors: &mut [&mut dyn EventDetector]) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for (i, pair) in trajectory.windows(2).enumerate() {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&pair[0], &pair[1]) {
                events.push(SimEvent {
                    step: i + 1,
                    kind,
                    state: pair[1],
                });
            }
        }
    }
    events
}
