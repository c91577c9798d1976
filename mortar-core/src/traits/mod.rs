//! Collaborator traits
//!
//! These traits define the interface between the control core and the
//! hardware the launcher drives. Drivers for them live in `mortar-drivers`.

pub mod display;
pub mod indicator;
pub mod output;
pub mod stepper;

pub use display::MessageDisplay;
pub use indicator::{IndicatorLeds, Rgb};
pub use output::OutputChannels;
pub use stepper::{Direction, StepOutput};
