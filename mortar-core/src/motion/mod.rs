//! Stepper motion
//!
//! Angle commands flow from the game into the [`MotionController`], which
//! writes step targets into each axis' [`AxisShared`]. The axes' step
//! generators run either inside the control loop or on their own timers.

pub mod axis;
pub mod controller;
pub mod position;
pub mod stepping;

pub use axis::{AxisMode, AxisShared, StepGenerator, TickDivided};
pub use controller::MotionController;
pub use position::{AxisId, AxisStatus, HomingProgress, LimitSwitches, MotionError};
pub use stepping::{Stepping, TickStepping, TimerStepping};
