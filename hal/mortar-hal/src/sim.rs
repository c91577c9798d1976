//! Simulated pins
//!
//! A `SimPin` is a view onto an `AtomicBool` owned elsewhere. The test
//! harness (or a host simulation) keeps the atomic and flips it, while the
//! code under test holds the pin through the ordinary GPIO traits. Several
//! pins may share one level, which is how a wire between an output and an
//! input is modelled.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::gpio::{InputPin, OutputPin};

/// Pin backed by a shared atomic level
#[derive(Clone, Copy)]
pub struct SimPin<'a> {
    level: &'a AtomicBool,
}

impl<'a> SimPin<'a> {
    /// Create a pin that reads and drives `level`
    pub const fn new(level: &'a AtomicBool) -> Self {
        Self { level }
    }

    /// Current electrical level
    pub fn level(&self) -> bool {
        self.level.load(Ordering::Acquire)
    }
}

impl InputPin for SimPin<'_> {
    fn is_high(&self) -> bool {
        self.level()
    }
}

impl OutputPin for SimPin<'_> {
    fn set_high(&mut self) {
        self.level.store(true, Ordering::Release);
    }

    fn set_low(&mut self) {
        self.level.store(false, Ordering::Release);
    }

    fn is_set_high(&self) -> bool {
        self.level()
    }
}
