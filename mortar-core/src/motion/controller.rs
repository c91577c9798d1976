//! Motion controller
//!
//! Owns the command side of both axes. Angle commands are clamped to the
//! axis range, converted to microsteps and written as the axis target; the
//! step generators do the rest.
//!
//! Homing runs as a polled state machine (theta first, then phi):
//!
//! ```text
//! Seeking ──limit──▶ Zeroing ──ack──▶ next axis / homed
//!    │                  │
//!    └──── deadline ────┴──▶ HomingFailed (motion halted)
//! ```
//!
//! [`MotionController::home`] wraps the same machine in a bounded blocking
//! loop for use at startup.

use super::axis::{AxisMode, AxisShared};
use super::position::{AxisId, AxisStatus, HomingProgress, LimitSwitches, MotionError};
use crate::config::{AxisConfig, CupAim};
use crate::timing::{Deadline, Tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HomingPhase {
    /// Free-running toward the limit switch
    Seeking,
    /// Switch seen, waiting for the generator to take the zero reference
    Zeroing,
}

#[derive(Debug, Clone, Copy)]
struct Homing {
    axis: AxisId,
    phase: HomingPhase,
    deadline: Deadline,
}

/// Command-side view of one axis
struct AxisChannel<'a> {
    id: AxisId,
    config: AxisConfig,
    shared: &'a AxisShared,
    commanded_x10: i32,
}

impl<'a> AxisChannel<'a> {
    fn new(id: AxisId, config: AxisConfig, shared: &'a AxisShared) -> Self {
        Self {
            id,
            config,
            shared,
            commanded_x10: config.steps_to_angle(shared.position()),
        }
    }

    /// Returns true if the target changed
    fn write(&mut self, angle_x10: i32) -> bool {
        let clamped = self.config.clamp_x10(angle_x10);
        let steps = self.config.angle_to_steps(clamped);
        self.commanded_x10 = clamped;
        if steps == self.shared.target() {
            return false;
        }
        self.shared.set_target(steps);
        true
    }

    fn status(&self) -> AxisStatus {
        AxisStatus {
            axis: self.id,
            position: self.shared.position(),
            target: self.shared.target(),
            commanded_x10: self.commanded_x10,
        }
    }
}

/// Controller for the theta and phi axes
pub struct MotionController<'a> {
    theta: AxisChannel<'a>,
    phi: AxisChannel<'a>,
    homed: bool,
    run_enabled: bool,
    homing: Option<Homing>,
}

impl<'a> MotionController<'a> {
    /// Create a controller over two axes
    ///
    /// Both axes hold until homing completes.
    pub fn new(
        theta_config: AxisConfig,
        theta: &'a AxisShared,
        phi_config: AxisConfig,
        phi: &'a AxisShared,
    ) -> Self {
        theta.set_mode(AxisMode::Hold);
        phi.set_mode(AxisMode::Hold);
        Self {
            theta: AxisChannel::new(AxisId::Theta, theta_config, theta),
            phi: AxisChannel::new(AxisId::Phi, phi_config, phi),
            homed: false,
            run_enabled: false,
            homing: None,
        }
    }

    fn channel(&mut self, axis: AxisId) -> &mut AxisChannel<'a> {
        match axis {
            AxisId::Theta => &mut self.theta,
            AxisId::Phi => &mut self.phi,
        }
    }

    fn accepts_commands(&self) -> bool {
        self.homed && self.homing.is_none()
    }

    /// Command the elevation angle (tenths of a degree)
    ///
    /// Returns true if the axis target changed. Ignored until homed.
    pub fn write_theta(&mut self, angle_x10: i32) -> bool {
        self.accepts_commands() && self.theta.write(angle_x10)
    }

    /// Command the azimuth angle (tenths of a degree)
    ///
    /// Returns true if the axis target changed. Ignored until homed.
    pub fn write_phi(&mut self, angle_x10: i32) -> bool {
        self.accepts_commands() && self.phi.write(angle_x10)
    }

    /// Nudge the elevation relative to the last command
    pub fn step_theta(&mut self, delta_x10: i32) -> bool {
        let angle = self.theta.commanded_x10.saturating_add(delta_x10);
        self.write_theta(angle)
    }

    /// Nudge the azimuth relative to the last command
    pub fn step_phi(&mut self, delta_x10: i32) -> bool {
        let angle = self.phi.commanded_x10.saturating_add(delta_x10);
        self.write_phi(angle)
    }

    /// Command both axes to a cup preset
    pub fn aim(&mut self, cup: CupAim) -> bool {
        let theta = self.write_theta(cup.theta_x10);
        let phi = self.write_phi(cup.phi_x10);
        theta || phi
    }

    /// Both axes are tracking and at their targets
    pub fn is_settled(&self) -> bool {
        self.theta.shared.is_settled() && self.phi.shared.is_settled()
    }

    pub fn is_homed(&self) -> bool {
        self.homed
    }

    pub fn is_homing(&self) -> bool {
        self.homing.is_some()
    }

    pub fn run_enabled(&self) -> bool {
        self.run_enabled
    }

    /// Enable or pause target tracking
    ///
    /// Has no effect during homing. Tracking only resumes once homed.
    pub fn set_run_enabled(&mut self, enabled: bool) {
        if self.homing.is_some() {
            return;
        }
        self.run_enabled = enabled;
        let mode = if enabled && self.homed {
            AxisMode::Track
        } else {
            AxisMode::Hold
        };
        self.theta.shared.set_mode(mode);
        self.phi.shared.set_mode(mode);
    }

    /// Stop all motion output and abandon any homing run
    pub fn halt(&mut self) {
        self.homing = None;
        self.run_enabled = false;
        for ch in [&self.theta, &self.phi] {
            ch.shared.set_mode(AxisMode::Hold);
            ch.shared.set_slow(false);
        }
    }

    pub fn theta(&self) -> AxisStatus {
        self.theta.status()
    }

    pub fn phi(&self) -> AxisStatus {
        self.phi.status()
    }

    /// Begin homing both axes
    ///
    /// Clears the homed flag; angle commands are ignored until
    /// [`MotionController::poll_homing`] reports completion.
    pub fn start_homing(&mut self, now: Tick) -> Result<(), MotionError> {
        if self.homing.is_some() {
            return Err(MotionError::HomingInProgress);
        }
        self.homed = false;
        self.run_enabled = false;
        self.theta.shared.set_mode(AxisMode::Hold);
        self.phi.shared.set_mode(AxisMode::Hold);
        self.begin_seek(AxisId::Theta, now);
        Ok(())
    }

    fn begin_seek(&mut self, axis: AxisId, now: Tick) {
        let ch = self.channel(axis);
        ch.shared.set_slow(true);
        ch.shared.set_mode(AxisMode::FreeRun(ch.config.home_direction));
        let deadline = Deadline::after(now, ch.config.homing_timeout_ticks);
        self.homing = Some(Homing {
            axis,
            phase: HomingPhase::Seeking,
            deadline,
        });
    }

    fn fail(&mut self, axis: AxisId) -> MotionError {
        self.halt();
        MotionError::HomingFailed(axis)
    }

    /// Advance the homing run by one tick
    ///
    /// On timeout all motion is halted and `HomingFailed` is returned.
    pub fn poll_homing(
        &mut self,
        now: Tick,
        limits: LimitSwitches,
    ) -> Result<HomingProgress, MotionError> {
        let Some(mut homing) = self.homing else {
            return Ok(HomingProgress::Idle);
        };

        let ch = self.channel(homing.axis);
        match homing.phase {
            HomingPhase::Seeking => {
                if limits.is_triggered(homing.axis) {
                    ch.shared.set_mode(AxisMode::Hold);
                    ch.shared.set_target(0);
                    ch.shared.request_reference(0);
                    homing.phase = HomingPhase::Zeroing;
                    homing.deadline = Deadline::after(now, ch.config.homing_timeout_ticks);
                } else if homing.deadline.is_reached(now) {
                    return Err(self.fail(homing.axis));
                }
            }
            HomingPhase::Zeroing => {
                if !ch.shared.reference_pending() {
                    ch.shared.set_slow(false);
                    ch.commanded_x10 = 0;
                    ch.shared.set_mode(AxisMode::Track);
                    return Ok(self.finish_axis(homing.axis, now));
                } else if homing.deadline.is_reached(now) {
                    return Err(self.fail(homing.axis));
                }
            }
        }

        self.homing = Some(homing);
        Ok(HomingProgress::InProgress(homing.axis))
    }

    fn finish_axis(&mut self, axis: AxisId, now: Tick) -> HomingProgress {
        match axis {
            AxisId::Theta => {
                self.begin_seek(AxisId::Phi, now);
                HomingProgress::InProgress(AxisId::Phi)
            }
            AxisId::Phi => {
                self.homing = None;
                self.homed = true;
                self.run_enabled = true;
                HomingProgress::Complete
            }
        }
    }

    /// Home both axes, blocking until done or timed out
    ///
    /// `limits` reads the switches; `advance` waits one tick and must keep
    /// the step generators running (directly or through their timers).
    /// Only for startup or an explicit re-home, never from the game loop.
    pub fn home<L, A>(&mut self, mut limits: L, mut advance: A) -> Result<(), MotionError>
    where
        L: FnMut() -> LimitSwitches,
        A: FnMut(),
    {
        let mut now: Tick = 0;
        self.start_homing(now)?;
        loop {
            advance();
            now += 1;
            if self.poll_homing(now, limits())? == HomingProgress::Complete {
                return Ok(());
            }
        }
    }
}
