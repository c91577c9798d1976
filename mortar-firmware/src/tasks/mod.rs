//! Embassy async tasks
//!
//! The control loop owns the game and the motion commands. The stepper
//! tasks only exist when the axes run on their own timers.

pub mod status;
pub mod stepper;
pub mod tick;

pub use status::status_task;
pub use stepper::{phi_stepper_task, theta_stepper_task};
pub use tick::{tick_task, LoopStepping};
