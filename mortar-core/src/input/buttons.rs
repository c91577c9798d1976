//! Debounced button state handed to the game each tick

use crate::config::BUTTON_COUNT;

/// Stable levels and edges for the nine game buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSnapshot {
    held: [bool; BUTTON_COUNT],
    pressed: [bool; BUTTON_COUNT],
}

impl ButtonSnapshot {
    /// Build from debounced levels and rising edges
    pub fn new(held: [bool; BUTTON_COUNT], pressed: [bool; BUTTON_COUNT]) -> Self {
        Self { held, pressed }
    }

    /// No button held or pressed
    pub fn idle() -> Self {
        Self::default()
    }

    /// Button is stable-pressed
    pub fn is_held(&self, button: u8) -> bool {
        self.held.get(button as usize).copied().unwrap_or(false)
    }

    /// Button became stable-pressed this tick
    pub fn was_pressed(&self, button: u8) -> bool {
        self.pressed.get(button as usize).copied().unwrap_or(false)
    }

    /// Any button is stable-pressed
    pub fn any_held(&self) -> bool {
        self.held.iter().any(|&h| h)
    }

    /// First button (lowest index) that became pressed this tick
    pub fn first_pressed(&self) -> Option<u8> {
        self.pressed.iter().position(|&p| p).map(|i| i as u8)
    }
}
