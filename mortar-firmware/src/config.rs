//! Configuration loading
//!
//! The launcher has no persistent storage: the configuration is the
//! `launcher.toml` embedded at build time, falling back to the stock
//! values if it does not parse.

use defmt::*;

use mortar_core::config::{parse_config, MachineConfig, StepStrategy};

/// Parse the embedded configuration
pub fn load(source: &str) -> MachineConfig {
    let config = match parse_config(source) {
        Ok(config) => {
            info!("Parsed embedded configuration");
            config
        }
        Err(e) => {
            // build.rs should have caught this
            error!("Failed to parse embedded config: {:?}", e);
            warn!("Using stock configuration");
            MachineConfig::default()
        }
    };

    log_config_summary(&config);
    config
}

fn log_config_summary(config: &MachineConfig) {
    let input = &config.input;
    debug!(
        "  debounce: buttons {} ticks, beams {} ticks, beam window {}",
        input.buttons.threshold, input.beams.threshold, input.beam_reset_window
    );
    for (name, axis) in [("theta", &config.theta), ("phi", &config.phi)] {
        debug!(
            "  {}: {}..{} x0.1 deg, {} microsteps, home {:?}",
            name, axis.min_x10, axis.max_x10, axis.microsteps, axis.home_direction
        );
    }
    match config.stepping {
        StepStrategy::TickDivided => debug!("  stepping: control loop"),
        StepStrategy::Timer => debug!("  stepping: timer tasks"),
    }
    let timing = &config.timing;
    debug!(
        "  launch {} ms, score window {} ms, reset hold {} ms",
        timing.launch_ticks, timing.score_timeout_ticks, timing.reset_hold_ticks
    );
}
