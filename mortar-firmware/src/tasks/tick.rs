//! Control loop task
//!
//! Runs one [`LauncherLoop`] tick per millisecond and forwards anything
//! interesting to the status task.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use mortar_core::motion::{Stepping, TickStepping, TimerStepping};
use mortar_core::state::GameState;
use mortar_core::timing::TICK_PERIOD_MS;
use mortar_core::TickReport;

use crate::board::{LauncherLoop, PhiOutput, ThetaOutput};
use crate::channels::{publish, StatusEvent};

const TICK_INTERVAL: Duration = Duration::from_millis(TICK_PERIOD_MS as u64);

/// Where the step generators run, chosen from the configuration at boot
pub enum LoopStepping {
    Timer(TimerStepping),
    Tick(TickStepping<'static, ThetaOutput, PhiOutput>),
}

impl Stepping for LoopStepping {
    fn on_tick(&mut self) {
        match self {
            LoopStepping::Timer(s) => s.on_tick(),
            LoopStepping::Tick(s) => s.on_tick(),
        }
    }
}

/// Control loop task - homes the axes, then ticks forever
#[embassy_executor::task]
pub async fn tick_task(mut control: LauncherLoop, mut stepping: LoopStepping) {
    info!("Control loop started");

    match control.start_homing() {
        Ok(()) => info!("Homing started"),
        Err(e) => error!("Homing failed to start: {:?}", e),
    }

    let mut ticker = Ticker::every(TICK_INTERVAL);
    let mut display_changes = 0;

    loop {
        ticker.next().await;

        let started = Instant::now();
        let report = control.tick(&mut stepping);
        let elapsed = started.elapsed();

        report_tick(&control, &report, &mut display_changes);

        if elapsed > TICK_INTERVAL {
            publish(StatusEvent::Overrun {
                now: report.now,
                micros: elapsed.as_micros() as u32,
            });
        }
    }
}

fn report_tick(control: &LauncherLoop, report: &TickReport, display_changes: &mut u32) {
    let game = control.game();

    if let Some(result) = report.homing {
        publish(StatusEvent::Homing(result));
    }

    if let Some(cell) = report.game.scored {
        publish(StatusEvent::Scored {
            cell,
            player: game.player(),
        });
    }

    if let Some(transition) = report.game.transition {
        publish(StatusEvent::Transition(transition));
        if transition.to == GameState::GameOver {
            if let Some(winner) = game.board().check_winner() {
                publish(StatusEvent::Winner(winner));
            }
        }
    }

    let display = &game.collaborators().display;
    if display.changes() != *display_changes {
        *display_changes = display.changes();
        publish(StatusEvent::Display(display.text()));
    }
}
