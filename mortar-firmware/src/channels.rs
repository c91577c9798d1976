//! State shared between tasks
//!
//! The axis halves are plain statics: the control loop writes targets, the
//! stepper tasks (or the loop itself) move positions. Status events flow
//! to the logging task so the 1 ms loop never waits on RTT.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use mortar_core::controller::Transition;
use mortar_core::motion::{AxisShared, MotionError};
use mortar_core::state::Player;
use mortar_core::timing::Tick;

const STATUS_CHANNEL_SIZE: usize = 16;

pub static THETA_AXIS: AxisShared = AxisShared::new();
pub static PHI_AXIS: AxisShared = AxisShared::new();

/// Something worth logging from the control loop
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusEvent {
    Homing(Result<(), MotionError>),
    Transition(Transition),
    Scored { cell: u8, player: Player },
    Winner(Player),
    Display(&'static str),
    /// Loop work took longer than one tick
    Overrun { now: Tick, micros: u32 },
}

pub static STATUS_CHANNEL: Channel<CriticalSectionRawMutex, StatusEvent, STATUS_CHANNEL_SIZE> =
    Channel::new();

/// Queue a status event, dropping it if the logger is behind
pub fn publish(event: StatusEvent) {
    let _ = STATUS_CHANNEL.try_send(event);
}
