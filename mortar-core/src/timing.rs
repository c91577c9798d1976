//! Tick counter and deadlines
//!
//! The control loop runs at a fixed 1 ms period. Every timeout in the core is
//! a deadline compared against the monotonic tick counter.

/// Monotonic tick count (1 tick = 1 ms)
pub type Tick = u64;

/// Tick period of the control loop in milliseconds
pub const TICK_PERIOD_MS: u32 = 1;

/// Absolute point in time, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    at: Tick,
}

impl Deadline {
    /// Deadline `ticks` after `now`
    pub fn after(now: Tick, ticks: u32) -> Self {
        Self {
            at: now.saturating_add(ticks as Tick),
        }
    }

    /// Tick at which the deadline expires
    pub fn tick(&self) -> Tick {
        self.at
    }

    /// `T >= deadline`
    pub fn is_reached(&self, now: Tick) -> bool {
        now >= self.at
    }
}
