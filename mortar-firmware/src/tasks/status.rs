//! Status logging task
//!
//! Drains [`STATUS_CHANNEL`] into defmt so logging never runs inside the
//! control loop.

use defmt::*;

use crate::channels::{StatusEvent, STATUS_CHANNEL};

#[embassy_executor::task]
pub async fn status_task() {
    info!("Status task started");

    loop {
        match STATUS_CHANNEL.receive().await {
            StatusEvent::Homing(Ok(())) => info!("Homing complete, axes at zero"),
            StatusEvent::Homing(Err(e)) => {
                error!("Homing failed: {:?}, motion halted", e);
            }
            StatusEvent::Transition(t) if t.event.is_timer_event() => {
                debug!("{:?} -> {:?} on {:?}", t.from, t.to, t.event);
            }
            StatusEvent::Transition(t) => {
                info!("{:?} -> {:?} on {:?}", t.from, t.to, t.event);
            }
            StatusEvent::Scored { cell, player } => {
                info!("{} landed in cell {}", player.label(), cell);
            }
            StatusEvent::Winner(player) => info!("{}", player.win_message()),
            StatusEvent::Display(text) => debug!("Display: {}", text),
            StatusEvent::Overrun { now, micros } => {
                warn!("Tick {} overran: {} us", now, micros);
            }
        }
    }
}
