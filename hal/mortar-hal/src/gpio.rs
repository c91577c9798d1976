//! Digital pin capabilities
//!
//! The control loop only ever reads a level or drives one. Both operations
//! are infallible here; adapters for fallible pins decide what a failure
//! means before the value reaches the core.

/// Driven pin (step, dir, solenoid, heartbeat)
pub trait OutputPin {
    fn set_high(&mut self);

    fn set_low(&mut self);

    /// Invert the driven level
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Drive high when `high`, low otherwise
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Level last driven, not a readback of the pad
    fn is_set_high(&self) -> bool;

    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Sampled pin (buttons, beam receivers, limit switches)
///
/// Reads the raw electrical level; polarity is applied with
/// [`read_asserted`].
pub trait InputPin {
    fn is_high(&self) -> bool;

    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Which electrical level means "asserted"
///
/// Buttons and beam receivers on the launcher are wired with pull-ups, so a
/// press or a broken beam reads low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveLevel {
    /// Asserted when the pin reads high
    High,
    /// Asserted when the pin reads low (pull-up wiring)
    #[default]
    Low,
}

impl ActiveLevel {
    /// Translate an electrical level into a logical assertion
    pub fn is_asserted(self, high: bool) -> bool {
        match self {
            ActiveLevel::High => high,
            ActiveLevel::Low => !high,
        }
    }

    /// Electrical level that represents the given logical state
    pub fn level_for(self, asserted: bool) -> bool {
        self.is_asserted(asserted)
    }
}

/// Read an input pin as a logical value
pub fn read_asserted<P: InputPin + ?Sized>(pin: &P, active: ActiveLevel) -> bool {
    active.is_asserted(pin.is_high())
}
