//! Board-agnostic control core for the launcher firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (display, indicator LEDs, solenoid outputs, steppers)
//! - Input conditioning (debounce, beam-break scoring)
//! - Stepper motion (axis step generation, homing, angle commands)
//! - Game state machine and board
//! - The per-tick control loop tying them together
//! - Configuration type definitions and parser

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod control_loop;
pub mod controller;
pub mod heartbeat;
pub mod input;
pub mod motion;
pub mod state;
pub mod timing;
pub mod traits;

pub use control_loop::{ControlLoop, LoopPins, TickReport};
pub use controller::{Collaborators, GameController, GameTick};
