//! embedded-hal pin adapters
//!
//! Wraps any infallible embedded-hal 1.0 digital pin so it can be handed to
//! the control core through the mortar-hal traits.

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::digital;

/// Input pin adapter
///
/// embedded-hal reads through `&mut self`; the core reads through `&self`.
pub struct EhInput<P> {
    pin: RefCell<P>,
}

impl<P: digital::InputPin<Error = Infallible>> EhInput<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin: RefCell::new(pin),
        }
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin.into_inner()
    }
}

impl<P: digital::InputPin<Error = Infallible>> mortar_hal::InputPin for EhInput<P> {
    fn is_high(&self) -> bool {
        match self.pin.borrow_mut().is_high() {
            Ok(high) => high,
            Err(never) => match never {},
        }
    }
}

/// Output pin adapter that remembers the driven level
pub struct EhOutput<P> {
    pin: P,
    high: bool,
}

impl<P: digital::OutputPin<Error = Infallible>> EhOutput<P> {
    /// Wrap a pin, driving it to `initial_high`
    pub fn new(mut pin: P, initial_high: bool) -> Self {
        let _ = pin.set_state(initial_high.into());
        Self {
            pin,
            high: initial_high,
        }
    }
}

impl<P: digital::OutputPin<Error = Infallible>> mortar_hal::OutputPin for EhOutput<P> {
    fn set_high(&mut self) {
        let _ = self.pin.set_high();
        self.high = true;
    }

    fn set_low(&mut self) {
        let _ = self.pin.set_low();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortar_hal::{InputPin, OutputPin};

    struct FakePin {
        high: bool,
        writes: u32,
    }

    impl digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl digital::InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    impl digital::OutputPin for FakePin {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_input_adapter() {
        let input = EhInput::new(FakePin {
            high: false,
            writes: 0,
        });
        assert!(input.is_low());
        assert!(!input.into_inner().high);
    }

    #[test]
    fn test_output_adapter() {
        let mut out = EhOutput::new(
            FakePin {
                high: false,
                writes: 0,
            },
            true,
        );
        assert!(out.is_set_high());
        out.toggle();
        assert!(out.is_set_low());
        assert!(!out.pin.high);
        assert_eq!(out.pin.writes, 2);
    }
}
