pub const DEFAULT_POINTS_PER_FRAME: usize = 1;
pub const MIN_POINTS_PER_FRAME: usize = 1;
pub const MAX_POINTS_PER_FRAME: usize = 2048;
pub const SPEED_MULTIPLIER: usize = 2;

/// Animated reveal of a precomputed trajectory: how many points to draw.
///
/// The trajectory itself never changes; only the cursor moves, once per
/// rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealCursor {
    index: usize,
    len: usize,
    points_per_frame: usize,
    paused: bool,
    show_all: bool,
}

impl RevealCursor {
    pub fn new(len: usize) -> Self {
        Self {
            index: len.min(1),
            len,
            points_per_frame: DEFAULT_POINTS_PER_FRAME,
            paused: false,
            show_all: false,
        }
    }

    /// Points to draw this frame.
    pub fn visible(&self) -> usize {
        if self.show_all {
            self.len
        } else {
            self.index.min(self.len)
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn points_per_frame(&self) -> usize {
        self.points_per_frame
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_showing_all(&self) -> bool {
        self.show_all
    }

    pub fn is_finished(&self) -> bool {
        self.visible() == self.len
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if !self.paused && !self.show_all && self.index < self.len {
            self.index = (self.index + self.points_per_frame).min(self.len);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
        self.index = if self.show_all { self.len } else { self.len.min(1) };
    }

    pub fn faster(&mut self) {
        self.points_per_frame = (self.points_per_frame * SPEED_MULTIPLIER).min(MAX_POINTS_PER_FRAME);
    }

    pub fn slower(&mut self) {
        self.points_per_frame = (self.points_per_frame / SPEED_MULTIPLIER).max(MIN_POINTS_PER_FRAME);
    }

    /// Restart the animation at default speed.
    pub fn reset(&mut self) {
        *self = Self::new(self.len);
    }

    /// Point at a new trajectory of `len` points, keeping progress where possible.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.index = if self.show_all {
            len
        } else {
            self.index.min(len).max(len.min(1))
        };
    }
}
