//! Enabled state of the slideshow transport actions.

use super::player::PlayerState;

/// Which transport actions a UI should offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportControls {
    /// Start, or resume when paused.
    pub start: bool,
    /// Stop for good.
    pub stop: bool,
    /// Pause.
    pub pause: bool,
    /// Show the next frame.
    pub next: bool,
    /// Show the previous frame.
    pub previous: bool,
}

impl TransportControls {
    /// Controls for a player in `state`.
    ///
    /// A stopped player cannot be started again, so it only offers stepping.
    pub fn for_state(state: PlayerState) -> Self {
        Self {
            start: matches!(state, PlayerState::Idle | PlayerState::Paused),
            stop: state.is_active(),
            pause: state == PlayerState::Running,
            next: true,
            previous: true,
        }
    }
}
