//! Input conditioning
//!
//! Raw GPIO samples go through a [`Debouncer`] per channel group. The beam
//! group is then fed to the [`BeamArray`] scoring detector, and the button
//! group is handed to the game as a [`ButtonSnapshot`].

pub mod beams;
pub mod buttons;
pub mod debounce;

pub use beams::{cell_for_pair, BeamArray, BEAM_PAIRS};
pub use buttons::ButtonSnapshot;
pub use debounce::Debouncer;
