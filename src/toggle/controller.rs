use crate::animation::PlayDirection;
use crate::input::PointerEvent;
use crate::toggle::player::{ClipCommand, ReversibleClipPlayer};
use crate::toggle::state::ToggleState;

/// Turns a click on the switch into a state flip plus a clip play command.
///
/// Both happen inside one `&mut self` call, so no other activation can slip
/// between the flip and the command. The player is registered once its clip
/// has loaded; activations before that still flip the state but animate
/// nothing, and the pose does not catch up later.
#[derive(Debug)]
pub struct ToggleController<P: ClipCommand = ReversibleClipPlayer> {
    player: Option<P>,
    activations: u64,
}

impl<P: ClipCommand> Default for ToggleController<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ClipCommand> ToggleController<P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            player: None,
            activations: 0,
        }
    }

    /// Hands the controller the capability to play the switch clip.
    pub fn register_player(&mut self, player: P) {
        if self.player.is_some() {
            log::debug!("Replacing registered switch player");
        }
        self.player = Some(player);
    }

    /// Drops the player, e.g. when its model is unloaded.
    pub fn unregister_player(&mut self) -> Option<P> {
        self.player.take()
    }

    #[must_use]
    pub fn player(&self) -> Option<&P> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut P> {
        self.player.as_mut()
    }

    /// Number of activations handled so far.
    #[must_use]
    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Handles a click on any of the switch's hit targets.
    ///
    /// Stops the event so overlapping targets underneath (knob over base)
    /// don't activate a second time. Returns the new state.
    pub fn handle_activate(&mut self, event: &mut PointerEvent, state: &mut ToggleState) -> bool {
        event.stop_propagation();

        let on = state.flip();
        self.activations += 1;

        match self.player.as_mut() {
            Some(player) => player.play(PlayDirection::from_on(on)),
            None => log::debug!("Switch clip not loaded yet; state flipped without animation"),
        }

        log::info!("Light switch turned {}", if on { "on" } else { "off" });
        on
    }
}
