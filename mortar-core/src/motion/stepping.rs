//! Stepping strategies as seen from the control loop

use super::axis::TickDivided;
use crate::traits::StepOutput;

/// Step work done inside the control loop, once per tick
pub trait Stepping {
    fn on_tick(&mut self);
}

/// Axes run from their own timer tasks; nothing to do in the loop
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerStepping;

impl Stepping for TimerStepping {
    fn on_tick(&mut self) {}
}

/// Both axes stepped from the control loop through their feed-rate dividers
pub struct TickStepping<'a, T, P> {
    pub theta: TickDivided<'a, T>,
    pub phi: TickDivided<'a, P>,
}

impl<'a, T: StepOutput, P: StepOutput> TickStepping<'a, T, P> {
    pub fn new(theta: TickDivided<'a, T>, phi: TickDivided<'a, P>) -> Self {
        Self { theta, phi }
    }
}

impl<T: StepOutput, P: StepOutput> Stepping for TickStepping<'_, T, P> {
    fn on_tick(&mut self) {
        self.theta.tick();
        self.phi.tick();
    }
}
