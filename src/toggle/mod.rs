//! The light switch: toggle state, the reversible clip player it commands,
//! the controller binding clicks to both, and per-frame drivers that follow
//! the state.

pub mod state;
pub mod player;
pub mod controller;
pub mod driver;

pub use state::ToggleState;
pub use player::{ClipCommand, ReversibleClipPlayer};
pub use controller::ToggleController;
pub use driver::{SmoothedDriver, SpinWhileVisible};
