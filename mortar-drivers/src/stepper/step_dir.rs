//! Step/dir driver (A4988 and similar)
//!
//! The direction line is written only when it changes, and always before
//! the next step pulse. The step pulse is held high for `pulse_ns`.

use embedded_hal::delay::DelayNs;
use mortar_core::traits::{Direction, StepOutput};
use mortar_hal::OutputPin;

/// Minimum STEP high time for the A4988 is 1 µs
pub const DEFAULT_PULSE_NS: u32 = 2_000;

/// Step/dir stepper output
pub struct StepDir<S, D, W> {
    step: S,
    dir: D,
    delay: W,
    /// Clockwise drives DIR low instead of high
    invert_dir: bool,
    pulse_ns: u32,
    steps: u32,
}

impl<S: OutputPin, D: OutputPin, W: DelayNs> StepDir<S, D, W> {
    /// Create a new step/dir output
    ///
    /// # Arguments
    /// - `step`, `dir`: driver pins
    /// - `delay`: used to hold the step pulse
    /// - `invert_dir`: swap the meaning of the DIR level
    pub fn new(mut step: S, dir: D, delay: W, invert_dir: bool) -> Self {
        step.set_low();
        Self {
            step,
            dir,
            delay,
            invert_dir,
            pulse_ns: DEFAULT_PULSE_NS,
            steps: 0,
        }
    }

    /// Override the step pulse width
    pub fn with_pulse_ns(mut self, pulse_ns: u32) -> Self {
        self.pulse_ns = pulse_ns;
        self
    }

    /// Pulses emitted since creation
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Level currently on the DIR pin
    pub fn dir_pin(&self) -> &D {
        &self.dir
    }
}

impl<S: OutputPin, D: OutputPin, W: DelayNs> StepOutput for StepDir<S, D, W> {
    fn set_direction(&mut self, dir: Direction) {
        let high = matches!(dir, Direction::Clockwise) != self.invert_dir;
        self.dir.set_state(high);
    }

    fn step(&mut self) {
        self.step.set_high();
        self.delay.delay_ns(self.pulse_ns);
        self.step.set_low();
        self.steps = self.steps.wrapping_add(1);
    }
}

/// Two motors on one axis, mounted facing each other
///
/// The elevation axis is lifted by a motor on each side; the second motor
/// turns the opposite way so both push the barrel in the same direction.
pub struct MirroredStepDir<A, B> {
    primary: A,
    mirror: B,
}

impl<A: StepOutput, B: StepOutput> MirroredStepDir<A, B> {
    pub fn new(primary: A, mirror: B) -> Self {
        Self { primary, mirror }
    }

    pub fn primary(&self) -> &A {
        &self.primary
    }

    pub fn mirror(&self) -> &B {
        &self.mirror
    }
}

impl<A: StepOutput, B: StepOutput> StepOutput for MirroredStepDir<A, B> {
    fn set_direction(&mut self, dir: Direction) {
        self.primary.set_direction(dir);
        self.mirror.set_direction(dir.opposite());
    }

    fn step(&mut self) {
        self.primary.step();
        self.mirror.step();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO pin that counts rising edges
    struct MockPin {
        high: bool,
        rises: u32,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: false,
                rises: 0,
            }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            if !self.high {
                self.rises += 1;
            }
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    struct MockDelay {
        total_ns: u32,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns;
        }
    }

    fn driver(invert: bool) -> StepDir<MockPin, MockPin, MockDelay> {
        StepDir::new(MockPin::new(), MockPin::new(), MockDelay { total_ns: 0 }, invert)
    }

    #[test]
    fn test_step_pulse() {
        let mut d = driver(false);
        d.step();
        d.step();
        assert_eq!(d.steps(), 2);
        assert_eq!(d.step.rises, 2);
        assert!(d.step.is_set_low());
        assert_eq!(d.delay.total_ns, 2 * DEFAULT_PULSE_NS);
    }

    #[test]
    fn test_direction_levels() {
        let mut d = driver(false);
        d.set_direction(Direction::Clockwise);
        assert!(d.dir_pin().is_set_high());
        d.set_direction(Direction::CounterClockwise);
        assert!(d.dir_pin().is_set_low());

        let mut inv = driver(true);
        inv.set_direction(Direction::Clockwise);
        assert!(inv.dir_pin().is_set_low());
    }

    #[test]
    fn test_mirrored_pair() {
        let mut pair = MirroredStepDir::new(driver(false), driver(false));
        pair.set_direction(Direction::Clockwise);
        pair.step();

        assert!(pair.primary().dir_pin().is_set_high());
        assert!(pair.mirror().dir_pin().is_set_low());
        assert_eq!(pair.primary().steps(), 1);
        assert_eq!(pair.mirror().steps(), 1);
    }
}
