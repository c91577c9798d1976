//! Configuration type definitions
//!
//! These types represent the launcher configuration. All angles are stored
//! in tenths of a degree (`_x10`) and all durations in control-loop ticks
//! (1 tick = 1 ms), so nothing here needs floating point.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use mortar_hal::ActiveLevel;

use crate::traits::Direction;

/// Number of game buttons (3x3 pad)
pub const BUTTON_COUNT: usize = 9;

/// Number of beam-break sensors (3 row beams, 3 column beams)
pub const BEAM_COUNT: usize = 6;

/// Number of cells on the board
pub const CELL_COUNT: usize = 9;

/// Debounce settings for one group of inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DebounceConfig {
    /// Consecutive disagreeing samples needed before the stable value flips
    pub threshold: u16,
    /// Asserted level reads low (pull-up wiring)
    pub active_low: bool,
}

impl DebounceConfig {
    /// Electrical level that means "asserted"
    pub fn active_level(&self) -> ActiveLevel {
        if self.active_low {
            ActiveLevel::Low
        } else {
            ActiveLevel::High
        }
    }
}

/// Input conditioning settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputConfig {
    pub buttons: DebounceConfig,
    pub beams: DebounceConfig,
    /// Ticks a latched beam must read clear before its latch releases
    pub beam_reset_window: u16,
    /// Limit switches read low when triggered
    pub limit_active_low: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            buttons: DebounceConfig {
                threshold: 50,
                active_low: true,
            },
            beams: DebounceConfig {
                threshold: 1,
                active_low: true,
            },
            beam_reset_window: 100,
            limit_active_low: true,
        }
    }
}

/// Per-axis stepper configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisConfig {
    /// Microstep divisor of the driver
    pub microsteps: u16,
    /// Full-step angle in hundredths of a degree (1.8° = 180)
    pub step_angle_x100: u16,
    /// Lowest commandable angle (tenths of a degree)
    pub min_x10: i32,
    /// Highest commandable angle (tenths of a degree)
    pub max_x10: i32,
    /// Direction that runs the axis into its limit switch
    pub home_direction: Direction,
    /// Give up homing if the switch is not seen within this many ticks
    pub homing_timeout_ticks: u32,
    /// Tick-divided stepping: ticks between steps in normal motion
    pub feed_rate: u16,
    /// Tick-divided stepping: ticks between steps while homing
    pub homing_feed_rate: u16,
    /// Timer-driven stepping: steps per second in normal motion
    pub steps_per_second: u32,
    /// Timer-driven stepping: steps per second while homing
    pub homing_steps_per_second: u32,
}

impl AxisConfig {
    /// Default configuration for the elevation (theta) axis
    pub fn theta() -> Self {
        Self {
            min_x10: 0,
            max_x10: 1800,
            home_direction: Direction::CounterClockwise,
            ..Self::default()
        }
    }

    /// Default configuration for the azimuth (phi) axis
    pub fn phi() -> Self {
        Self {
            min_x10: -1800,
            max_x10: 1800,
            home_direction: Direction::CounterClockwise,
            ..Self::default()
        }
    }

    /// Clamp an angle to the axis range
    pub fn clamp_x10(&self, angle_x10: i32) -> i32 {
        angle_x10.clamp(self.min_x10, self.max_x10)
    }

    /// Convert an angle (tenths of a degree) to a microstep position
    ///
    /// `steps = angle * microsteps / step_angle`, rounded half away from zero.
    pub fn angle_to_steps(&self, angle_x10: i32) -> i32 {
        // angle_x10 / 10 degrees, step_angle_x100 / 100 degrees per full step
        let num = angle_x10 as i64 * self.microsteps as i64 * 10;
        div_round(num, self.step_angle_x100.max(1) as i64) as i32
    }

    /// Convert a microstep position back to an angle (tenths of a degree)
    pub fn steps_to_angle(&self, steps: i32) -> i32 {
        let num = steps as i64 * self.step_angle_x100 as i64;
        div_round(num, (self.microsteps.max(1) as i64) * 10) as i32
    }

    /// Step period for timer-driven stepping in microseconds
    pub fn step_period_us(&self, homing: bool) -> u32 {
        let sps = if homing {
            self.homing_steps_per_second
        } else {
            self.steps_per_second
        };
        1_000_000 / sps.max(1)
    }

    /// Tick divisor for tick-divided stepping
    pub fn feed_rate_for(&self, homing: bool) -> u16 {
        if homing {
            self.homing_feed_rate.max(1)
        } else {
            self.feed_rate.max(1)
        }
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            microsteps: 8,
            step_angle_x100: 180,
            min_x10: 0,
            max_x10: 1800,
            home_direction: Direction::CounterClockwise,
            homing_timeout_ticks: 20_000,
            feed_rate: 2,
            homing_feed_rate: 4,
            steps_per_second: 500,
            homing_steps_per_second: 250,
        }
    }
}

/// Integer division rounding half away from zero (`d > 0`)
fn div_round(n: i64, d: i64) -> i64 {
    if n >= 0 {
        (2 * n + d) / (2 * d)
    } else {
        (2 * n - d) / (2 * d)
    }
}

/// How step pulses are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepStrategy {
    /// The control loop emits at most one step every `feed_rate` ticks
    TickDivided,
    /// Each axis runs its own periodic task at `steps_per_second`
    #[default]
    Timer,
}

/// Game timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameTiming {
    /// Solenoid on-time
    pub launch_ticks: u32,
    /// Window after a launch in which a beam hit counts
    pub score_timeout_ticks: u32,
    /// Winner banner duration before a button returns to the menu
    pub celebration_ticks: u32,
    /// Minimum ticks between two manual aim increments
    pub aim_cooldown_ticks: u32,
    /// Holding any button this long during a game resets to the menu
    pub reset_hold_ticks: u32,
    /// Half period of the heartbeat LED
    pub heartbeat_ticks: u32,
    /// Scroll speed for menu messages (columns per second)
    pub scroll_speed: u16,
    /// Blink half period for flashing messages (ms)
    pub flash_rate_ms: u16,
}

impl Default for GameTiming {
    fn default() -> Self {
        Self {
            launch_ticks: 500,
            score_timeout_ticks: 4000,
            celebration_ticks: 3000,
            aim_cooldown_ticks: 150,
            reset_hold_ticks: 10_000,
            heartbeat_ticks: 500,
            scroll_speed: 10,
            flash_rate_ms: 250,
        }
    }
}

/// Button roles
///
/// Indices into the 3x3 pad, row-major from the top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputMap {
    pub fire: u8,
    pub auto_mode: u8,
    pub manual_mode: u8,
    pub aim_up: u8,
    pub aim_down: u8,
    pub aim_left: u8,
    pub aim_right: u8,
    /// Output channel wired to the launch solenoid
    pub solenoid_channel: u8,
}

impl Default for InputMap {
    fn default() -> Self {
        Self {
            fire: 4,
            auto_mode: 1,
            manual_mode: 7,
            aim_up: 1,
            aim_down: 7,
            aim_left: 3,
            aim_right: 5,
            solenoid_channel: 0,
        }
    }
}

/// Preset aim for one cup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CupAim {
    pub theta_x10: i32,
    pub phi_x10: i32,
}

/// Aiming settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AimConfig {
    /// Elevation change per manual aim press
    pub theta_step_x10: i32,
    /// Azimuth change per manual aim press
    pub phi_step_x10: i32,
    /// Autonomous-mode presets, indexed by cell
    pub cups: [CupAim; CELL_COUNT],
}

impl Default for AimConfig {
    fn default() -> Self {
        const PHI: [i32; CELL_COUNT] = [-150, 0, 150, -200, 0, 200, -250, 0, 250];
        let mut cups = [CupAim::default(); CELL_COUNT];
        for (cup, phi) in cups.iter_mut().zip(PHI) {
            *cup = CupAim {
                theta_x10: 450,
                phi_x10: phi,
            };
        }
        Self {
            theta_step_x10: 50,
            phi_step_x10: 50,
            cups,
        }
    }
}

/// Complete launcher configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineConfig {
    pub input: InputConfig,
    pub theta: AxisConfig,
    pub phi: AxisConfig,
    pub stepping: StepStrategy,
    pub timing: GameTiming,
    pub map: InputMap,
    pub aim: AimConfig,
}

impl MachineConfig {
    /// Create the stock configuration
    pub fn new() -> Self {
        Self {
            input: InputConfig::default(),
            theta: AxisConfig::theta(),
            phi: AxisConfig::phi(),
            stepping: StepStrategy::default(),
            timing: GameTiming::default(),
            map: InputMap::default(),
            aim: AimConfig::default(),
        }
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::new()
    }
}
