//! Timer-driven step generation
//!
//! One task per axis. Each waits one step period, then runs a single
//! generation event; the period switches when the axis enters or leaves
//! homing speed.

use defmt::*;
use embassy_time::{Duration, Ticker};

use mortar_core::config::AxisConfig;
use mortar_core::motion::StepGenerator;
use mortar_core::traits::StepOutput;

use crate::board::{PhiGenerator, ThetaGenerator};

/// Elevation stepper task (two mirrored motors)
#[embassy_executor::task]
pub async fn theta_stepper_task(generator: ThetaGenerator, config: AxisConfig) {
    info!("Theta stepper task started");
    run_axis("theta", generator, config).await
}

/// Azimuth stepper task
#[embassy_executor::task]
pub async fn phi_stepper_task(generator: PhiGenerator, config: AxisConfig) {
    info!("Phi stepper task started");
    run_axis("phi", generator, config).await
}

fn step_period(config: &AxisConfig, slow: bool) -> Duration {
    Duration::from_micros(config.step_period_us(slow) as u64)
}

async fn run_axis<O: StepOutput>(
    name: &'static str,
    mut generator: StepGenerator<'static, O>,
    config: AxisConfig,
) -> ! {
    let mut slow = generator.is_slow();
    let mut ticker = Ticker::every(step_period(&config, slow));

    loop {
        ticker.next().await;
        generator.generate();

        if generator.is_slow() != slow {
            slow = !slow;
            ticker = Ticker::every(step_period(&config, slow));
            debug!(
                "{} step period {} us",
                name,
                config.step_period_us(slow)
            );
        }
    }
}
