//! Events that trigger state transitions

use super::machine::PlayMode;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Button events
    /// Fire button stable-pressed
    FirePressed,
    /// A mode button was pressed on the mode screen
    ModeSelected(PlayMode),
    /// Any button pressed after the celebration
    Dismiss,
    /// A button held long enough to abandon the game
    Reset,

    // Motion events
    /// Autonomous aim reached its cup preset
    AimSettled,

    // Timer events
    /// Solenoid on-time elapsed
    LaunchElapsed,
    /// Score window closed; `winner` if the board now has a line
    ScoreWindowClosed { winner: bool },
}

impl Event {
    /// Check if this event is a deadline expiry
    pub fn is_timer_event(&self) -> bool {
        matches!(
            self,
            Event::LaunchElapsed | Event::ScoreWindowClosed { .. }
        )
    }
}
