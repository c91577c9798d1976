//! Full control loop on simulated pins
//!
//! Buttons, beams, limit switches and the solenoid are `SimPin`s over
//! atomics owned by the test; the axes are stepped from the loop through
//! real `StepDir` outputs.

use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use mortar_core::config::{MachineConfig, StepStrategy};
use mortar_core::controller::WELCOME_MESSAGE;
use mortar_core::motion::{
    AxisId, AxisShared, MotionController, MotionError, StepGenerator, TickDivided, TickStepping,
};
use mortar_core::state::{GameState, PlayMode, Player};
use mortar_core::traits::Rgb;
use mortar_core::{Collaborators, ControlLoop, LoopPins, TickReport};
use mortar_drivers::display::TextDisplay;
use mortar_drivers::leds::PixelBuffer;
use mortar_drivers::output::GpioOutputs;
use mortar_drivers::stepper::StepDir;
use mortar_hal::SimPin;

const THETA_TRAVEL: i32 = 40;
const PHI_TRAVEL: i32 = 25;

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Electrical level of every simulated wire
struct Wires {
    buttons: [AtomicBool; 9],
    beams: [AtomicBool; 6],
    limits: [AtomicBool; 2],
    heartbeat: AtomicBool,
    solenoid: AtomicBool,
    /// theta step, theta dir, phi step, phi dir
    steppers: [AtomicBool; 4],
}

impl Wires {
    /// Everything idle: pull-ups high, beams clear, switches open
    fn new() -> Self {
        Self {
            buttons: core::array::from_fn(|_| AtomicBool::new(true)),
            beams: core::array::from_fn(|_| AtomicBool::new(true)),
            limits: core::array::from_fn(|_| AtomicBool::new(true)),
            heartbeat: AtomicBool::new(false),
            solenoid: AtomicBool::new(false),
            steppers: core::array::from_fn(|_| AtomicBool::new(false)),
        }
    }

    fn press(&self, button: usize, down: bool) {
        self.buttons[button].store(!down, Ordering::SeqCst);
    }

    fn beam(&self, beam: usize, broken: bool) {
        self.beams[beam].store(!broken, Ordering::SeqCst);
    }

    fn limit(&self, axis: usize, triggered: bool) {
        self.limits[axis].store(!triggered, Ordering::SeqCst);
    }
}

type Loop<'a> = ControlLoop<
    'a,
    SimPin<'a>,
    SimPin<'a>,
    TextDisplay<16>,
    PixelBuffer<9>,
    GpioOutputs<SimPin<'a>, 1>,
>;
type Stepper<'a> = StepDir<SimPin<'a>, SimPin<'a>, NoDelay>;

struct Sim<'a> {
    control: Loop<'a>,
    steps: TickStepping<'a, Stepper<'a>, Stepper<'a>>,
    wires: &'a Wires,
    theta: &'a AxisShared,
    phi: &'a AxisShared,
    switches_work: bool,
}

impl<'a> Sim<'a> {
    fn new(
        config: &MachineConfig,
        wires: &'a Wires,
        theta: &'a AxisShared,
        phi: &'a AxisShared,
    ) -> Self {
        let pins = LoopPins {
            buttons: core::array::from_fn(|i| SimPin::new(&wires.buttons[i])),
            beams: core::array::from_fn(|i| SimPin::new(&wires.beams[i])),
            theta_limit: SimPin::new(&wires.limits[0]),
            phi_limit: SimPin::new(&wires.limits[1]),
            heartbeat: SimPin::new(&wires.heartbeat),
        };
        let io = Collaborators {
            display: TextDisplay::new(),
            pad_leds: PixelBuffer::default(),
            cup_leds: PixelBuffer::default(),
            outputs: GpioOutputs::new_active_high([SimPin::new(&wires.solenoid)]),
        };
        let motion = MotionController::new(config.theta, theta, config.phi, phi);
        let control = ControlLoop::new(config, pins, motion, io);

        let stepper = |step: usize, dir: usize| {
            StepDir::new(
                SimPin::new(&wires.steppers[step]),
                SimPin::new(&wires.steppers[dir]),
                NoDelay,
                false,
            )
        };
        let steps = TickStepping::new(
            TickDivided::new(
                StepGenerator::new(theta, stepper(0, 1)),
                config.theta.feed_rate,
                config.theta.homing_feed_rate,
            ),
            TickDivided::new(
                StepGenerator::new(phi, stepper(2, 3)),
                config.phi.feed_rate,
                config.phi.homing_feed_rate,
            ),
        );

        Self {
            control,
            steps,
            wires,
            theta,
            phi,
            switches_work: true,
        }
    }

    fn tick(&mut self) -> TickReport {
        // Switches close once the axis has run far enough toward home
        let theta_hit = self.theta.is_slow() && self.theta.position() <= -THETA_TRAVEL;
        let phi_hit = self.phi.is_slow() && self.phi.position() <= -PHI_TRAVEL;
        self.wires.limit(0, self.switches_work && theta_hit);
        self.wires.limit(1, self.switches_work && phi_hit);

        self.control.tick(&mut self.steps)
    }

    fn run_until<F>(&mut self, max: u32, mut done: F) -> TickReport
    where
        F: FnMut(&TickReport, &Loop<'a>) -> bool,
    {
        for _ in 0..max {
            let report = self.tick();
            if done(&report, &self.control) {
                return report;
            }
        }
        panic!("condition not reached within {max} ticks");
    }

    /// Run long enough for a button change to pass the debouncer
    fn settle(&mut self, config: &MachineConfig) {
        for _ in 0..=config.input.buttons.threshold {
            self.tick();
        }
    }

    fn home(&mut self) {
        self.control.start_homing().expect("homing starts");
        let report = self.run_until(5_000, |r, _| r.homing.is_some());
        assert_eq!(report.homing, Some(Ok(())));
    }
}

fn sim_config() -> MachineConfig {
    let mut config = MachineConfig::new();
    config.stepping = StepStrategy::TickDivided;
    config.theta.homing_timeout_ticks = 2_000;
    config.phi.homing_timeout_ticks = 2_000;
    config
}

#[test]
fn homing_sets_zero_only_after_switch() {
    let config = sim_config();
    let wires = Wires::new();
    let (theta, phi) = (AxisShared::new(), AxisShared::new());
    let mut sim = Sim::new(&config, &wires, &theta, &phi);

    sim.control.start_homing().unwrap();
    assert!(!sim.control.motion_mut().write_theta(450));

    let mut saw_switch = false;
    for _ in 0..5_000 {
        let report = sim.tick();
        saw_switch |= !wires.limits[0].load(Ordering::SeqCst);
        if !saw_switch {
            assert!(!sim.control.motion().is_homed());
            assert!(!sim.control.motion_mut().write_phi(100));
        }
        if let Some(result) = report.homing {
            assert_eq!(result, Ok(()));
            break;
        }
    }

    assert!(saw_switch);
    assert!(sim.control.motion().is_homed());
    assert_eq!(theta.position(), 0);
    assert_eq!(phi.position(), 0);
    assert_eq!(theta.target(), 0);

    // Commands are accepted from here on
    assert!(sim.control.motion_mut().write_theta(450));
    sim.run_until(2_000, |_, c| c.motion().is_settled());
    assert_eq!(theta.position(), config.theta.angle_to_steps(450));
}

#[test]
fn homing_times_out_and_halts() {
    let mut config = sim_config();
    config.theta.homing_timeout_ticks = 300;
    let wires = Wires::new();
    let (theta, phi) = (AxisShared::new(), AxisShared::new());
    let mut sim = Sim::new(&config, &wires, &theta, &phi);
    sim.switches_work = false;

    sim.control.start_homing().unwrap();
    let report = sim.run_until(1_000, |r, _| r.homing.is_some());
    assert_eq!(report.homing, Some(Err(MotionError::HomingFailed(AxisId::Theta))));
    assert!(report.now >= 300);

    // No more steps once halted
    let parked = theta.position();
    for _ in 0..100 {
        sim.tick();
    }
    assert_eq!(theta.position(), parked);
    assert!(!sim.control.motion().is_homed());
}

#[test]
fn heartbeat_toggles() {
    let config = sim_config();
    let wires = Wires::new();
    let (theta, phi) = (AxisShared::new(), AxisShared::new());
    let mut sim = Sim::new(&config, &wires, &theta, &phi);

    let mut flips = 0;
    let mut last = wires.heartbeat.load(Ordering::SeqCst);
    for _ in 0..2_000 {
        sim.tick();
        let level = wires.heartbeat.load(Ordering::SeqCst);
        if level != last {
            flips += 1;
            last = level;
        }
    }
    assert_eq!(flips, 4);
}

#[test]
fn manual_game_turn() {
    let config = sim_config();
    let map = config.map;
    let wires = Wires::new();
    let (theta, phi) = (AxisShared::new(), AxisShared::new());
    let mut sim = Sim::new(&config, &wires, &theta, &phi);
    sim.home();

    assert_eq!(sim.control.state(), GameState::MainMenu);
    {
        let io = sim.control.game().collaborators();
        assert_eq!(io.display.text(), WELCOME_MESSAGE);
        assert_eq!(io.pad_leds.shown(map.fire as usize), Rgb::RED);
    }

    // Fire: the transition lands on the tick the debouncer commits
    wires.press(map.fire as usize, true);
    for _ in 0..config.input.buttons.threshold {
        assert!(sim.tick().game.transition.is_none());
    }
    let report = sim.tick();
    assert_eq!(
        report.game.transition.map(|t| t.to),
        Some(GameState::SelectMode)
    );
    wires.press(map.fire as usize, false);
    sim.settle(&config);

    // Manual mode clears the pad LEDs
    wires.press(map.manual_mode as usize, true);
    let entered = sim
        .run_until(200, |r, _| r.game.transition.is_some())
        .now;
    assert_eq!(sim.control.state(), GameState::Manual);
    assert!(sim
        .control
        .game()
        .collaborators()
        .pad_leds
        .frame()
        .iter()
        .all(Rgb::is_off));
    wires.press(map.manual_mode as usize, false);
    sim.settle(&config);

    // One aim press moves theta by exactly one increment
    let one_step = config.theta.angle_to_steps(config.aim.theta_step_x10);
    wires.press(map.aim_up as usize, true);
    let moved = sim.run_until(500, |_, _| theta.target() != 0).now;
    assert!(moved >= entered + config.timing.aim_cooldown_ticks as u64);
    assert_eq!(theta.target(), one_step);

    // A second press inside the cooldown is ignored
    wires.press(map.aim_up as usize, false);
    sim.settle(&config);
    wires.press(map.aim_up as usize, true);
    sim.settle(&config);
    assert!(sim.control.now() < moved + config.timing.aim_cooldown_ticks as u64);
    assert_eq!(theta.target(), one_step);
    wires.press(map.aim_up as usize, false);
    sim.settle(&config);

    // Fire and land in cell 8
    wires.press(map.fire as usize, true);
    sim.run_until(200, |_, c| c.state() == GameState::Launch(PlayMode::Manual));
    assert!(wires.solenoid.load(Ordering::SeqCst));
    wires.press(map.fire as usize, false);

    sim.run_until(1_000, |_, c| c.state() == GameState::WaitScore(PlayMode::Manual));
    assert!(!wires.solenoid.load(Ordering::SeqCst));

    wires.beam(0, true);
    wires.beam(3, true);
    let report = sim.run_until(10, |r, _| r.game.scored.is_some());
    assert_eq!(report.game.scored, Some(8));
    wires.beam(0, false);
    wires.beam(3, false);

    {
        let game = sim.control.game();
        assert_eq!(game.board().get(8), Some(Player::One));
        assert_eq!(game.collaborators().cup_leds.shown(8), Rgb::RED);
    }

    // Window closes without a line: turn passes
    sim.run_until(5_000, |_, c| c.state() == GameState::Manual);
    let game = sim.control.game();
    assert_eq!(game.player(), Player::Two);
    assert_eq!(game.collaborators().display.text(), "PLAYER 2");
}

#[test]
fn landing_before_window_opens_scores() {
    let config = sim_config();
    let map = config.map;
    let wires = Wires::new();
    let (theta, phi) = (AxisShared::new(), AxisShared::new());
    let mut sim = Sim::new(&config, &wires, &theta, &phi);
    sim.home();

    for button in [map.fire, map.manual_mode, map.fire] {
        wires.press(button as usize, true);
        sim.run_until(200, |r, _| r.game.transition.is_some());
        wires.press(button as usize, false);
        sim.settle(&config);
    }
    assert_eq!(sim.control.state(), GameState::Launch(PlayMode::Manual));

    // Ball breaks the beams while the solenoid is still on and stays there
    wires.beam(0, true);
    wires.beam(3, true);
    for _ in 0..5 {
        sim.tick();
    }
    assert_eq!(sim.control.state(), GameState::Launch(PlayMode::Manual));

    let report = sim.run_until(1_000, |r, _| r.game.scored.is_some());
    assert_eq!(report.game.scored, Some(8));
    assert!(matches!(sim.control.state(), GameState::WaitScore(_)));
    assert_eq!(sim.control.game().board().get(8), Some(Player::One));
}
