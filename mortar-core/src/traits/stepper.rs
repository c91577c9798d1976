//! Step/direction output trait
//!
//! The launcher's axes are driven by A4988-style step/dir drivers: one pin
//! selects the direction, a pulse on the other advances one microstep.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motor rotation direction
///
/// `Clockwise` is the direction of increasing step position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Clockwise rotation (position counts up)
    Clockwise,
    /// Counter-clockwise rotation (position counts down)
    CounterClockwise,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Position change produced by one step in this direction
    pub fn delta(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    /// Direction that moves from `from` toward `to`, if they differ
    pub fn toward(from: i32, to: i32) -> Option<Self> {
        match to.cmp(&from) {
            core::cmp::Ordering::Greater => Some(Direction::Clockwise),
            core::cmp::Ordering::Less => Some(Direction::CounterClockwise),
            core::cmp::Ordering::Equal => None,
        }
    }
}

/// Trait for a step/direction driver
///
/// Implementations only toggle pins; position bookkeeping lives in
/// [`crate::motion::StepGenerator`].
pub trait StepOutput {
    /// Drive the direction line
    ///
    /// Called before the first step and whenever the direction changes.
    fn set_direction(&mut self, dir: Direction);

    /// Emit one step pulse
    fn step(&mut self);
}
