//! Fixed-period control loop
//!
//! One call to [`ControlLoop::tick`] is one 1 ms tick. The order within a
//! tick is fixed:
//!
//! 1. Heartbeat LED
//! 2. Sample and debounce buttons, beams and limit switches
//! 3. Tick-divided stepping (no-op when the axes run on timers)
//! 4. Homing poll, then the game
//!
//! Nothing in here blocks except [`ControlLoop::home`].

use mortar_hal::gpio::read_asserted;
use mortar_hal::{ActiveLevel, InputPin, OutputPin};

use crate::config::{MachineConfig, BEAM_COUNT, BUTTON_COUNT};
use crate::controller::{Collaborators, GameController, GameTick};
use crate::heartbeat::Heartbeat;
use crate::input::{BeamArray, ButtonSnapshot, Debouncer};
use crate::motion::{HomingProgress, LimitSwitches, MotionController, MotionError, Stepping};
use crate::state::GameState;
use crate::timing::Tick;
use crate::traits::{IndicatorLeds, MessageDisplay, OutputChannels};

/// Pins sampled or driven by the loop
pub struct LoopPins<P, H> {
    pub buttons: [P; BUTTON_COUNT],
    pub beams: [P; BEAM_COUNT],
    pub theta_limit: P,
    pub phi_limit: P,
    pub heartbeat: H,
}

/// Outcome of one tick, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub now: Tick,
    pub game: GameTick,
    /// Homing finished (`Ok`) or failed on this tick
    pub homing: Option<Result<(), MotionError>>,
}

/// The per-tick scheduler
pub struct ControlLoop<'a, P, H, D, L, S> {
    now: Tick,
    heartbeat: Heartbeat<H>,
    button_pins: [P; BUTTON_COUNT],
    beam_pins: [P; BEAM_COUNT],
    limit_pins: [P; 2],
    button_level: ActiveLevel,
    beam_level: ActiveLevel,
    limit_level: ActiveLevel,
    buttons: Debouncer<BUTTON_COUNT>,
    beam_filter: Debouncer<BEAM_COUNT>,
    beams: BeamArray,
    motion: MotionController<'a>,
    game: GameController<D, L, S>,
}

impl<'a, P, H, D, L, S> ControlLoop<'a, P, H, D, L, S>
where
    P: InputPin,
    H: OutputPin,
    D: MessageDisplay,
    L: IndicatorLeds,
    S: OutputChannels,
{
    /// Assemble the loop and draw the main menu
    pub fn new(
        config: &MachineConfig,
        pins: LoopPins<P, H>,
        mut motion: MotionController<'a>,
        io: Collaborators<D, L, S>,
    ) -> Self {
        let input = &config.input;
        let limit_level = if input.limit_active_low {
            ActiveLevel::Low
        } else {
            ActiveLevel::High
        };

        let mut game = GameController::new(config, io);
        game.start(0, &mut motion);

        Self {
            now: 0,
            heartbeat: Heartbeat::new(pins.heartbeat, config.timing.heartbeat_ticks),
            button_pins: pins.buttons,
            beam_pins: pins.beams,
            limit_pins: [pins.theta_limit, pins.phi_limit],
            button_level: input.buttons.active_level(),
            beam_level: input.beams.active_level(),
            limit_level,
            buttons: Debouncer::new(input.buttons.threshold),
            beam_filter: Debouncer::new(input.beams.threshold),
            beams: BeamArray::new(input.beam_reset_window),
            motion,
            game,
        }
    }

    /// Run one tick
    pub fn tick<T: Stepping>(&mut self, stepping: &mut T) -> TickReport {
        self.now += 1;
        let now = self.now;

        self.heartbeat.update(now);

        let raw_buttons = sample(&self.button_pins, self.button_level);
        self.buttons.sample(&raw_buttons);
        let raw_beams = sample(&self.beam_pins, self.beam_level);
        let broken = *self.beam_filter.sample(&raw_beams);
        let hit = self.beams.update(&broken);

        stepping.on_tick();

        let homing = if self.motion.is_homing() {
            let limits = read_limits(&self.limit_pins, self.limit_level);
            match self.motion.poll_homing(now, limits) {
                Ok(HomingProgress::Complete) => Some(Ok(())),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            }
        } else {
            None
        };

        let snapshot = ButtonSnapshot::new(*self.buttons.stable(), *self.buttons.rising());
        let game = self.game.tick(now, &snapshot, hit, &mut self.motion);
        if game.hit_consumed {
            self.beams.accept();
        }

        TickReport { now, game, homing }
    }

    /// Start a non-blocking homing run, polled by [`ControlLoop::tick`]
    pub fn start_homing(&mut self) -> Result<(), MotionError> {
        self.motion.start_homing(self.now)
    }

    /// Home both axes, blocking
    ///
    /// `wait` must sleep one tick. Startup only.
    pub fn home<T: Stepping, W: FnMut()>(
        &mut self,
        stepping: &mut T,
        mut wait: W,
    ) -> Result<(), MotionError> {
        let pins = &self.limit_pins;
        let level = self.limit_level;
        self.motion.home(
            || read_limits(pins, level),
            || {
                stepping.on_tick();
                wait();
            },
        )
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn state(&self) -> GameState {
        self.game.state()
    }

    pub fn game(&self) -> &GameController<D, L, S> {
        &self.game
    }

    pub fn motion(&self) -> &MotionController<'a> {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut MotionController<'a> {
        &mut self.motion
    }

    pub fn beams(&self) -> &BeamArray {
        &self.beams
    }
}

fn sample<P: InputPin, const N: usize>(pins: &[P; N], level: ActiveLevel) -> [bool; N] {
    let mut raw = [false; N];
    for (value, pin) in raw.iter_mut().zip(pins) {
        *value = read_asserted(pin, level);
    }
    raw
}

fn read_limits<P: InputPin>(pins: &[P; 2], level: ActiveLevel) -> LimitSwitches {
    LimitSwitches {
        theta: read_asserted(&pins[0], level),
        phi: read_asserted(&pins[1], level),
    }
}
