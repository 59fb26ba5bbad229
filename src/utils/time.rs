use std::time::{Duration, Instant};

/// Frame timing for the render loop.
///
/// Real-time hosts call [`tick`](Self::tick); headless hosts and tests step a
/// fixed delta with [`tick_fixed`](Self::tick_fixed).
#[derive(Debug, Clone)]
pub struct Timer {
    last_update: Instant,
    /// Time since last tick
    pub delta: Duration,
    /// Total elapsed time since creation
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
    /// Upper bound on a single delta, so a stalled frame cannot skip a whole
    /// clip in one step.
    pub max_delta: Duration,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            max_delta: Duration::from_millis(100),
        }
    }

    /// Advances by the wall-clock time since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now - self.last_update;
        self.last_update = now;
        self.advance(delta)
    }

    /// Advances by exactly `seconds`.
    pub fn tick_fixed(&mut self, seconds: f32) -> f32 {
        self.advance(Duration::from_secs_f32(seconds.max(0.0)))
    }

    fn advance(&mut self, delta: Duration) -> f32 {
        self.delta = delta.min(self.max_delta);
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.dt_seconds()
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
