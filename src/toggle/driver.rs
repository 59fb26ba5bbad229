use crate::toggle::state::ToggleState;

/// Exponentially smooths a value toward one of two targets picked by the
/// toggle state. One step per frame: `current = lerp(current, target, alpha)`.
///
/// The value approaches its target asymptotically; at `alpha = 0.1` it is
/// within 1% of a 0 → 2 swing after roughly 45 frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedDriver {
    pub on_target: f32,
    pub off_target: f32,
    pub alpha: f32,
    current: f32,
}

impl SmoothedDriver {
    #[must_use]
    pub fn new(on_target: f32, off_target: f32, alpha: f32, initial: f32) -> Self {
        Self {
            on_target,
            off_target,
            alpha: alpha.clamp(0.0, 1.0),
            current: initial,
        }
    }

    #[must_use]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[must_use]
    pub fn target(&self, state: ToggleState) -> f32 {
        if state.is_on() { self.on_target } else { self.off_target }
    }

    /// Advances one frame and returns the new value.
    pub fn step(&mut self, state: ToggleState) -> f32 {
        let target = self.target(state);
        self.current += (target - self.current) * self.alpha;
        self.current
    }
}

/// Hard on/off visibility that follows the toggle state, plus a continuous
/// spin that only advances while visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinWhileVisible {
    /// Radians added per frame.
    pub rate: f32,
    visible: bool,
    angle: f32,
}

impl SpinWhileVisible {
    #[must_use]
    pub fn new(rate: f32, initial_angle: f32) -> Self {
        Self {
            rate,
            visible: false,
            angle: initial_angle,
        }
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advances one frame. Returns `(visible, angle)`.
    pub fn step(&mut self, state: ToggleState) -> (bool, f32) {
        self.visible = state.is_on();
        if self.visible {
            self.angle += self.rate;
        }
        (self.visible, self.angle)
    }
}
