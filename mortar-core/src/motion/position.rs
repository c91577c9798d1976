//! Axis identity, limit switches, and motion status types

/// Axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisId {
    /// Elevation
    Theta,
    /// Azimuth
    Phi,
}

/// Limit switch readings, `true` = triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LimitSwitches {
    pub theta: bool,
    pub phi: bool,
}

impl LimitSwitches {
    /// Reading for one axis
    pub fn is_triggered(&self, axis: AxisId) -> bool {
        match axis {
            AxisId::Theta => self.theta,
            AxisId::Phi => self.phi,
        }
    }
}

/// Motion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Axis position unknown, homing required
    NotHomed,
    /// A homing run is already active
    HomingInProgress,
    /// Limit switch not seen before the homing deadline
    HomingFailed(AxisId),
}

/// Result of polling an active homing run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingProgress {
    /// No homing run active
    Idle,
    /// Still seeking or zeroing the given axis
    InProgress(AxisId),
    /// Both axes homed on this poll
    Complete,
}

/// Snapshot of one axis for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisStatus {
    pub axis: AxisId,
    /// Current position in microsteps
    pub position: i32,
    /// Target position in microsteps
    pub target: i32,
    /// Last commanded angle (tenths of a degree)
    pub commanded_x10: i32,
}

impl AxisStatus {
    /// Position has reached the target
    pub fn is_settled(&self) -> bool {
        self.position == self.target
    }
}
