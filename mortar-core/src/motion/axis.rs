//! Per-axis shared state and step generation
//!
//! An axis is split in two halves. [`AxisShared`] holds the fields both
//! contexts see, as atomics with one writer each:
//!
//! | field      | writer            |
//! |------------|-------------------|
//! | `position` | step generator    |
//! | `ack`      | step generator    |
//! | `target`   | motion controller |
//! | `mode`     | motion controller |
//! | `slow`     | motion controller |
//! | `request`  | motion controller |
//! | `reference`| motion controller |
//!
//! [`StepGenerator`] owns the step/dir outputs and is the only code that
//! moves `position`. It runs either from the control loop ([`TickDivided`])
//! or from its own periodic task. Loads and stores only, so this works on
//! cores without compare-and-swap.

use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering};

use crate::traits::{Direction, StepOutput};

/// What the step generator does on each event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisMode {
    /// Step toward `target`
    Track,
    /// Emit no steps
    Hold,
    /// Step continuously in one direction, ignoring `target`
    FreeRun(Direction),
}

impl AxisMode {
    fn to_u8(self) -> u8 {
        match self {
            AxisMode::Track => 0,
            AxisMode::Hold => 1,
            AxisMode::FreeRun(Direction::Clockwise) => 2,
            AxisMode::FreeRun(Direction::CounterClockwise) => 3,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => AxisMode::Track,
            2 => AxisMode::FreeRun(Direction::Clockwise),
            3 => AxisMode::FreeRun(Direction::CounterClockwise),
            _ => AxisMode::Hold,
        }
    }
}

/// State shared between the motion controller and an axis' step generator
pub struct AxisShared {
    position: AtomicI32,
    ack: AtomicU8,
    target: AtomicI32,
    mode: AtomicU8,
    slow: AtomicBool,
    request: AtomicU8,
    reference: AtomicI32,
}

impl AxisShared {
    /// Create an axis at position 0, tracking target 0
    pub const fn new() -> Self {
        Self {
            position: AtomicI32::new(0),
            ack: AtomicU8::new(0),
            target: AtomicI32::new(0),
            mode: AtomicU8::new(0),
            slow: AtomicBool::new(false),
            request: AtomicU8::new(0),
            reference: AtomicI32::new(0),
        }
    }

    /// Current position in microsteps
    pub fn position(&self) -> i32 {
        self.position.load(Ordering::Acquire)
    }

    /// Target position in microsteps
    pub fn target(&self) -> i32 {
        self.target.load(Ordering::Acquire)
    }

    pub fn mode(&self) -> AxisMode {
        AxisMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    /// Homing speed selected
    pub fn is_slow(&self) -> bool {
        self.slow.load(Ordering::Acquire)
    }

    /// A position reference is waiting for the step generator
    pub fn reference_pending(&self) -> bool {
        self.request.load(Ordering::Acquire) != self.ack.load(Ordering::Acquire)
    }

    /// Tracking and at the target
    pub fn is_settled(&self) -> bool {
        self.mode() == AxisMode::Track
            && !self.reference_pending()
            && self.position() == self.target()
    }

    pub(crate) fn set_target(&self, steps: i32) {
        self.target.store(steps, Ordering::Release);
    }

    pub(crate) fn set_mode(&self, mode: AxisMode) {
        self.mode.store(mode.to_u8(), Ordering::Release);
    }

    pub(crate) fn set_slow(&self, slow: bool) {
        self.slow.store(slow, Ordering::Release);
    }

    /// Ask the step generator to redefine its position as `steps`
    pub(crate) fn request_reference(&self, steps: i32) {
        self.reference.store(steps, Ordering::Release);
        let next = self.request.load(Ordering::Relaxed).wrapping_add(1);
        self.request.store(next, Ordering::Release);
    }
}

impl Default for AxisShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Step generator for one axis
///
/// Each call to [`StepGenerator::generate`] is one generation event and
/// moves the position by at most one step.
pub struct StepGenerator<'a, O> {
    shared: &'a AxisShared,
    output: O,
    position: i32,
    direction: Option<Direction>,
    seen_request: u8,
}

impl<'a, O: StepOutput> StepGenerator<'a, O> {
    /// Create a generator driving `output`
    ///
    /// Starts from the position already stored in `shared`.
    pub fn new(shared: &'a AxisShared, output: O) -> Self {
        Self {
            shared,
            position: shared.position(),
            seen_request: shared.request.load(Ordering::Acquire),
            output,
            direction: None,
        }
    }

    /// Run one generation event
    ///
    /// Returns the direction stepped, or `None` if no pulse was emitted.
    pub fn generate(&mut self) -> Option<Direction> {
        let request = self.shared.request.load(Ordering::Acquire);
        if request != self.seen_request {
            self.position = self.shared.reference.load(Ordering::Acquire);
            self.shared.position.store(self.position, Ordering::Release);
            self.seen_request = request;
            self.shared.ack.store(request, Ordering::Release);
            return None;
        }

        let dir = match self.shared.mode() {
            AxisMode::Hold => return None,
            AxisMode::FreeRun(dir) => dir,
            AxisMode::Track => Direction::toward(self.position, self.shared.target())?,
        };

        // Direction settles before the pulse
        if self.direction != Some(dir) {
            self.output.set_direction(dir);
            self.direction = Some(dir);
        }
        self.output.step();

        self.position = self.position.saturating_add(dir.delta());
        self.shared.position.store(self.position, Ordering::Release);
        Some(dir)
    }

    /// Whether the shared state asks for homing speed
    pub fn is_slow(&self) -> bool {
        self.shared.is_slow()
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    /// Borrow the step output
    pub fn output(&self) -> &O {
        &self.output
    }
}

/// Tick-divided stepping: one generation event every `feed_rate` ticks
pub struct TickDivided<'a, O> {
    generator: StepGenerator<'a, O>,
    feed_rate: u16,
    homing_feed_rate: u16,
    ticks: u16,
}

impl<'a, O: StepOutput> TickDivided<'a, O> {
    /// Wrap a generator with normal and homing divisors
    pub fn new(generator: StepGenerator<'a, O>, feed_rate: u16, homing_feed_rate: u16) -> Self {
        Self {
            generator,
            feed_rate: feed_rate.max(1),
            homing_feed_rate: homing_feed_rate.max(1),
            ticks: 0,
        }
    }

    /// Call once per control-loop tick
    pub fn tick(&mut self) -> Option<Direction> {
        self.ticks += 1;
        let rate = if self.generator.is_slow() {
            self.homing_feed_rate
        } else {
            self.feed_rate
        };
        if self.ticks < rate {
            return None;
        }
        self.ticks = 0;
        self.generator.generate()
    }

    pub fn generator(&self) -> &StepGenerator<'a, O> {
        &self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records pin activity as (direction line, pulses)
    #[derive(Default)]
    struct MockOutput {
        dir: Option<Direction>,
        dir_writes: u32,
        steps: u32,
    }

    impl StepOutput for MockOutput {
        fn set_direction(&mut self, dir: Direction) {
            self.dir = Some(dir);
            self.dir_writes += 1;
        }

        fn step(&mut self) {
            assert!(self.dir.is_some(), "step before direction");
            self.steps += 1;
        }
    }

    #[test]
    fn test_tracks_target_one_step_per_event() {
        let shared = AxisShared::new();
        let mut gen = StepGenerator::new(&shared, MockOutput::default());
        shared.set_target(3);

        for expected in 1..=3 {
            assert_eq!(gen.generate(), Some(Direction::Clockwise));
            assert_eq!(shared.position(), expected);
        }
        assert_eq!(gen.generate(), None);
        assert!(shared.is_settled());
        assert_eq!(gen.output().steps, 3);
        assert_eq!(gen.output().dir_writes, 1);
    }

    #[test]
    fn test_direction_change_written_before_step() {
        let shared = AxisShared::new();
        let mut gen = StepGenerator::new(&shared, MockOutput::default());
        shared.set_target(1);
        gen.generate();
        shared.set_target(-1);
        assert_eq!(gen.generate(), Some(Direction::CounterClockwise));
        assert_eq!(gen.output().dir, Some(Direction::CounterClockwise));
        assert_eq!(gen.output().dir_writes, 2);
        gen.generate();
        assert_eq!(shared.position(), -1);
    }

    #[test]
    fn test_hold_and_free_run() {
        let shared = AxisShared::new();
        let mut gen = StepGenerator::new(&shared, MockOutput::default());
        shared.set_target(10);
        shared.set_mode(AxisMode::Hold);
        assert_eq!(gen.generate(), None);

        shared.set_mode(AxisMode::FreeRun(Direction::CounterClockwise));
        for _ in 0..5 {
            gen.generate();
        }
        assert_eq!(shared.position(), -5);
        assert!(!shared.is_settled());
    }

    #[test]
    fn test_reference_handshake() {
        let shared = AxisShared::new();
        let mut gen = StepGenerator::new(&shared, MockOutput::default());
        shared.set_mode(AxisMode::FreeRun(Direction::Clockwise));
        gen.generate();
        gen.generate();

        shared.set_mode(AxisMode::Hold);
        shared.set_target(0);
        shared.request_reference(0);
        assert!(shared.reference_pending());

        // The event that applies the reference emits no pulse
        assert_eq!(gen.generate(), None);
        assert!(!shared.reference_pending());
        assert_eq!(shared.position(), 0);
        assert_eq!(gen.output().steps, 2);
    }

    #[test]
    fn test_tick_divided_rate() {
        let shared = AxisShared::new();
        let gen = StepGenerator::new(&shared, MockOutput::default());
        let mut div = TickDivided::new(gen, 2, 4);
        shared.set_target(100);

        for _ in 0..10 {
            div.tick();
        }
        assert_eq!(shared.position(), 5);

        shared.set_slow(true);
        for _ in 0..8 {
            div.tick();
        }
        assert_eq!(shared.position(), 7);
    }
}
