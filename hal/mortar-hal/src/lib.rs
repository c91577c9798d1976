//! Mortar Hardware Abstraction Layer
//!
//! This crate defines the pin capabilities the control core needs from a
//! board. Real GPIO (RP2040 via embassy) and simulated pins both implement
//! the same traits, so the choice is made at construction time rather than
//! by inspecting pin types at runtime.
//!
//! The firmware wraps embassy GPIO through the embedded-hal adapters in
//! mortar-drivers; host tests use [`sim::SimPin`] over atomics they own.
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`]: raw levels
//! - [`gpio::ActiveLevel`]: wiring polarity

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod sim;

pub use gpio::{ActiveLevel, InputPin, OutputPin};
pub use sim::SimPin;
