//! Output channel implementations

pub mod gpio;

pub use gpio::GpioOutputs;
