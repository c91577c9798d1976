//! State machine definition
//!
//! Display, LED, solenoid and aim behavior is a function of the current
//! state and an event.

use super::events::Event;

/// How shots are aimed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayMode {
    /// Player steers theta/phi with the aim buttons
    Manual,
    /// Player picks a cup and the launcher aims at its preset
    Auto,
}

/// Game states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameState {
    /// Welcome message, waiting for fire
    MainMenu,
    /// Mode prompt, waiting for a mode button
    SelectMode,
    /// Manual aiming
    Manual,
    /// Autonomous aiming
    Auto,
    /// Solenoid energized
    Launch(PlayMode),
    /// Watching the beams for a hit
    WaitScore(PlayMode),
    /// Winner banner
    GameOver,
}

impl GameState {
    /// Aiming state for a mode
    pub fn play(mode: PlayMode) -> Self {
        match mode {
            PlayMode::Manual => GameState::Manual,
            PlayMode::Auto => GameState::Auto,
        }
    }

    /// Mode of the game in progress
    pub fn mode(&self) -> Option<PlayMode> {
        match *self {
            GameState::Manual => Some(PlayMode::Manual),
            GameState::Auto => Some(PlayMode::Auto),
            GameState::Launch(mode) | GameState::WaitScore(mode) => Some(mode),
            _ => None,
        }
    }

    /// Check if a game is in progress
    pub fn is_in_progress(&self) -> bool {
        self.mode().is_some()
    }

    /// Check if this state allows the solenoid to be energized
    pub fn solenoid_allowed(&self) -> bool {
        matches!(self, GameState::Launch(_))
    }

    /// Check if a ball may be on its way to the cups
    pub fn is_in_flight(&self) -> bool {
        matches!(self, GameState::Launch(_) | GameState::WaitScore(_))
    }

    /// Check if this state accepts aim commands
    pub fn aim_allowed(&self) -> bool {
        matches!(self, GameState::Manual | GameState::Auto)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use GameState::*;

        match (self, event) {
            (MainMenu, FirePressed) => SelectMode,

            (SelectMode, ModeSelected(mode)) => GameState::play(mode),

            (Manual, FirePressed) => Launch(PlayMode::Manual),
            (Auto, FirePressed | AimSettled) => Launch(PlayMode::Auto),

            (Launch(mode), LaunchElapsed) => WaitScore(mode),

            (WaitScore(_), ScoreWindowClosed { winner: true }) => GameOver,
            (WaitScore(mode), ScoreWindowClosed { winner: false }) => GameState::play(mode),

            (GameOver, Dismiss) => MainMenu,

            // Abandon the game from anywhere in play
            (Manual | Auto | Launch(_) | WaitScore(_), Reset) => MainMenu,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_to_mode_select() {
        assert_eq!(
            GameState::MainMenu.transition(Event::FirePressed),
            GameState::SelectMode
        );
        assert_eq!(
            GameState::MainMenu.transition(Event::Dismiss),
            GameState::MainMenu
        );
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(
            GameState::SelectMode.transition(Event::ModeSelected(PlayMode::Manual)),
            GameState::Manual
        );
        assert_eq!(
            GameState::SelectMode.transition(Event::ModeSelected(PlayMode::Auto)),
            GameState::Auto
        );
    }

    #[test]
    fn test_shot_cycle_keeps_mode() {
        let state = GameState::Auto
            .transition(Event::FirePressed)
            .transition(Event::AimSettled)
            .transition(Event::LaunchElapsed);
        assert_eq!(state, GameState::WaitScore(PlayMode::Auto));
        assert_eq!(
            state.transition(Event::ScoreWindowClosed { winner: false }),
            GameState::Auto
        );
        assert_eq!(
            state.transition(Event::ScoreWindowClosed { winner: true }),
            GameState::GameOver
        );
    }

    #[test]
    fn test_manual_fires_directly() {
        assert_eq!(
            GameState::Manual.transition(Event::FirePressed),
            GameState::Launch(PlayMode::Manual)
        );
        // Settling is irrelevant in manual play
        assert_eq!(
            GameState::Manual.transition(Event::AimSettled),
            GameState::Manual
        );
    }

    #[test]
    fn test_reset_from_play_only() {
        let in_play = [
            GameState::Manual,
            GameState::Auto,
            GameState::Launch(PlayMode::Manual),
            GameState::WaitScore(PlayMode::Auto),
        ];
        for state in in_play {
            assert!(state.is_in_progress());
            assert_eq!(state.transition(Event::Reset), GameState::MainMenu);
        }
        assert_eq!(
            GameState::GameOver.transition(Event::Reset),
            GameState::GameOver
        );
    }

    #[test]
    fn test_solenoid_only_in_launch() {
        assert!(GameState::Launch(PlayMode::Auto).solenoid_allowed());
        assert!(!GameState::WaitScore(PlayMode::Auto).solenoid_allowed());
        assert!(!GameState::Manual.solenoid_allowed());
    }

    #[test]
    fn test_in_flight_covers_launch_and_window() {
        assert!(GameState::Launch(PlayMode::Manual).is_in_flight());
        assert!(GameState::WaitScore(PlayMode::Auto).is_in_flight());
        assert!(!GameState::Auto.is_in_flight());
        assert!(!GameState::GameOver.is_in_flight());
    }
}
