//! Status LED heartbeat

use mortar_hal::OutputPin;

use crate::timing::{Deadline, Tick};

/// Toggles a pin every `period` ticks so a stalled loop is visible
pub struct Heartbeat<P> {
    pin: P,
    period: u32,
    next: Deadline,
}

impl<P: OutputPin> Heartbeat<P> {
    /// Create a heartbeat, pin starts low
    pub fn new(mut pin: P, period: u32) -> Self {
        pin.set_low();
        Self {
            pin,
            period: period.max(1),
            next: Deadline::after(0, period.max(1)),
        }
    }

    /// Call once per tick
    pub fn update(&mut self, now: Tick) {
        if self.next.is_reached(now) {
            self.pin.toggle();
            self.next = Deadline::after(now, self.period);
        }
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
        toggles: u32,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
            self.toggles += 1;
        }

        fn set_low(&mut self) {
            self.high = false;
            self.toggles += 1;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_toggles_each_period() {
        let mut hb = Heartbeat::new(
            MockPin {
                high: true,
                toggles: 0,
            },
            500,
        );
        assert!(!hb.pin().is_set_high());

        for now in 1..500 {
            hb.update(now);
        }
        assert!(!hb.pin().is_set_high());
        hb.update(500);
        assert!(hb.pin().is_set_high());
        for now in 501..=1000 {
            hb.update(now);
        }
        assert!(!hb.pin().is_set_high());
        assert_eq!(hb.pin().toggles, 3);
    }
}
