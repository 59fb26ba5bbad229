/// On/off source of truth for the light switch.
///
/// Owned by the scene root. The [`ToggleController`](super::ToggleController)
/// is the only writer; drivers read it every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleState {
    on: bool,
}

impl ToggleState {
    #[must_use]
    pub fn new(on: bool) -> Self {
        Self { on }
    }

    #[inline]
    #[must_use]
    pub fn is_on(self) -> bool {
        self.on
    }

    /// Flips the state and returns the new value.
    pub(crate) fn flip(&mut self) -> bool {
        self.on = !self.on;
        self.on
    }
}
