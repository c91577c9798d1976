//! Driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in mortar-core for the launcher's hardware:
//!
//! - Step/dir stepper outputs (single and mirrored pairs)
//! - GPIO output channels (solenoid)
//! - Text panel model (static, scrolling, flashing)
//! - Pixel buffers for the indicator LED strings
//! - Adapters from embedded-hal pins to the mortar-hal traits

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod leds;
pub mod output;
pub mod pin;
pub mod stepper;
