//! GPIO output channels
//!
//! Drives the launch solenoid (and any spare channels) from GPIO pins,
//! directly or through a MOSFET/relay board.

use mortar_core::traits::OutputChannels;
use mortar_hal::OutputPin;

/// Bank of GPIO-driven output channels
///
/// The pins can be configured as active-high (default) or active-low.
pub struct GpioOutputs<P, const N: usize> {
    pins: [P; N],
    /// If true, channel ON = pin LOW
    inverted: bool,
    /// Current logical state (true = channel on)
    on: [bool; N],
}

impl<P: OutputPin, const N: usize> GpioOutputs<P, N> {
    /// Create a new output bank, all channels off
    ///
    /// # Arguments
    /// - `pins`: one GPIO pin per channel
    /// - `inverted`: If true, a channel is ON when its pin is LOW (relay boards)
    pub fn new(pins: [P; N], inverted: bool) -> Self {
        let mut bank = Self {
            pins,
            inverted,
            on: [false; N],
        };
        bank.all_off();
        bank
    }

    /// Create a new output bank with active-high outputs
    pub fn new_active_high(pins: [P; N]) -> Self {
        Self::new(pins, false)
    }

    /// Create a new output bank with active-low outputs
    pub fn new_active_low(pins: [P; N]) -> Self {
        Self::new(pins, true)
    }

    /// Borrow a channel's pin
    pub fn pin(&self, channel: u8) -> Option<&P> {
        self.pins.get(channel as usize)
    }
}

impl<P: OutputPin, const N: usize> OutputChannels for GpioOutputs<P, N> {
    fn set_output(&mut self, channel: u8, on: bool) {
        let index = channel as usize;
        let Some(pin) = self.pins.get_mut(index) else {
            return;
        };
        self.on[index] = on;
        // Normal: on=true → high; inverted: on=true → low
        pin.set_state(on != self.inverted);
    }

    fn is_on(&self, channel: u8) -> bool {
        self.on.get(channel as usize).copied().unwrap_or(false)
    }

    fn all_off(&mut self) {
        for channel in 0..N {
            self.set_output(channel as u8, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self { high: false }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_high_channel() {
        let mut bank = GpioOutputs::new_active_high([MockPin::new(), MockPin::new()]);

        assert!(!bank.is_on(0));
        assert!(!bank.pins[0].is_set_high());

        bank.set_output(0, true);
        assert!(bank.is_on(0));
        assert!(bank.pins[0].is_set_high());
        assert!(!bank.pins[1].is_set_high());

        bank.set_output(0, false);
        assert!(!bank.pins[0].is_set_high());
    }

    #[test]
    fn test_active_low_channel() {
        let mut bank = GpioOutputs::new_active_low([MockPin::new()]);

        // Initially off (pin is high for active-low)
        assert!(!bank.is_on(0));
        assert!(bank.pins[0].is_set_high());

        bank.set_output(0, true);
        assert!(bank.is_on(0));
        assert!(!bank.pins[0].is_set_high());

        bank.all_off();
        assert!(bank.pins[0].is_set_high());
    }

    #[test]
    fn test_unknown_channel_ignored() {
        let mut bank = GpioOutputs::new_active_high([MockPin::new()]);
        bank.set_output(5, true);
        assert!(!bank.is_on(5));
        assert!(bank.pin(5).is_none());
    }
}
