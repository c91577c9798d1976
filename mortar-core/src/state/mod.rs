//! Game state machine
//!
//! The game is driven by a finite state machine. Transitions are pure; the
//! [`crate::controller::GameController`] performs entry and exit actions.

pub mod board;
pub mod events;
pub mod machine;

pub use board::{Board, Player};
pub use events::Event;
pub use machine::{GameState, PlayMode};
