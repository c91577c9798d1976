//! Mortar - Tic-Tac-Toe Mortar Launcher Firmware
//!
//! Main firmware binary for the RP2040 launcher board. Two players take
//! turns aiming a solenoid-fired mortar at a 3x3 grid of landing cups;
//! beam-break pairs under the cups report where each ball lands.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use mortar_core::config::{MachineConfig, StepStrategy};
use mortar_core::motion::{MotionController, StepGenerator, TickDivided, TickStepping, TimerStepping};
use mortar_core::{Collaborators, ControlLoop, LoopPins};
use mortar_drivers::display::TextDisplay;
use mortar_drivers::leds::PixelBuffer;
use mortar_drivers::output::GpioOutputs;
use mortar_drivers::stepper::MirroredStepDir;

use crate::board::{input, output, step_dir};
use crate::channels::{PHI_AXIS, THETA_AXIS};
use crate::tasks::LoopStepping;

mod board;
mod channels;
mod config;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit launcher.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../launcher.toml");

static MACHINE_CONFIG: StaticCell<MachineConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Mortar firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static MachineConfig = MACHINE_CONFIG.init(config::load(EMBEDDED_CONFIG));

    let buttons_low = config.input.buttons.active_low;
    let beams_low = config.input.beams.active_low;
    let limits_low = config.input.limit_active_low;

    let pins = LoopPins {
        buttons: [
            input(p.PIN_6, buttons_low),
            input(p.PIN_7, buttons_low),
            input(p.PIN_8, buttons_low),
            input(p.PIN_9, buttons_low),
            input(p.PIN_10, buttons_low),
            input(p.PIN_11, buttons_low),
            input(p.PIN_12, buttons_low),
            input(p.PIN_13, buttons_low),
            input(p.PIN_14, buttons_low),
        ],
        beams: [
            input(p.PIN_20, beams_low),
            input(p.PIN_21, beams_low),
            input(p.PIN_22, beams_low),
            input(p.PIN_26, beams_low),
            input(p.PIN_27, beams_low),
            input(p.PIN_28, beams_low),
        ],
        theta_limit: input(p.PIN_15, limits_low),
        phi_limit: input(p.PIN_16, limits_low),
        heartbeat: output(p.PIN_25),
    };
    info!("Inputs initialized");

    // Motor B faces motor A across the barrel
    let theta_out = MirroredStepDir::new(
        step_dir(p.PIN_4, p.PIN_5, false),
        step_dir(p.PIN_2, p.PIN_3, false),
    );
    let phi_out = step_dir(p.PIN_0, p.PIN_1, false);
    let theta_gen = StepGenerator::new(&THETA_AXIS, theta_out);
    let phi_gen = StepGenerator::new(&PHI_AXIS, phi_out);
    info!("Stepper outputs initialized");

    let io = Collaborators {
        display: TextDisplay::new(),
        pad_leds: PixelBuffer::default(),
        cup_leds: PixelBuffer::default(),
        outputs: GpioOutputs::new_active_high([output(p.PIN_17)]),
    };

    let motion = MotionController::new(config.theta, &THETA_AXIS, config.phi, &PHI_AXIS);
    let control = ControlLoop::new(config, pins, motion, io);

    let stepping = match config.stepping {
        StepStrategy::TickDivided => {
            info!("Stepping from the control loop");
            LoopStepping::Tick(TickStepping::new(
                TickDivided::new(
                    theta_gen,
                    config.theta.feed_rate,
                    config.theta.homing_feed_rate,
                ),
                TickDivided::new(phi_gen, config.phi.feed_rate, config.phi.homing_feed_rate),
            ))
        }
        StepStrategy::Timer => {
            info!("Stepping from timer tasks");
            spawner
                .spawn(tasks::theta_stepper_task(theta_gen, config.theta))
                .unwrap();
            spawner
                .spawn(tasks::phi_stepper_task(phi_gen, config.phi))
                .unwrap();
            LoopStepping::Timer(TimerStepping)
        }
    };

    spawner.spawn(tasks::status_task()).unwrap();
    spawner.spawn(tasks::tick_task(control, stepping)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
