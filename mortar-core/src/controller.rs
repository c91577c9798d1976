//! Game controller
//!
//! Wraps the pure [`GameState`] machine and performs everything around it:
//! - Turns debounced buttons, beam hits and motion status into events
//! - Runs entry/exit actions (display, LEDs, solenoid, aim)
//! - Owns the board, the current player and all game deadlines

use crate::config::{AimConfig, GameTiming, InputMap, MachineConfig, CELL_COUNT};
use crate::input::ButtonSnapshot;
use crate::motion::MotionController;
use crate::state::{Board, Event, GameState, PlayMode, Player};
use crate::timing::{Deadline, Tick, TICK_PERIOD_MS};
use crate::traits::{IndicatorLeds, MessageDisplay, OutputChannels, Rgb};

pub const WELCOME_MESSAGE: &str =
    "Welcome To Tic-Tac-Toe Mortar Launcher! PRESS RED BUTTON TO CONTINUE!";
pub const MODE_PROMPT: &str = "Select Game Mode";
pub const LAUNCH_MESSAGE: &str = "BOOM";
pub const DISMISS_PROMPT: &str = "PRESS ANY BUTTON";

/// LED color for a player's cells
pub fn player_color(player: Player) -> Rgb {
    match player {
        Player::One => Rgb::RED,
        Player::Two => Rgb::BLUE,
    }
}

/// Output devices driven by the game
pub struct Collaborators<D, L, S> {
    pub display: D,
    /// LEDs under the nine buttons
    pub pad_leds: L,
    /// LEDs around the nine landing cups
    pub cup_leds: L,
    pub outputs: S,
}

/// A state change and the event that caused it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: GameState,
    pub to: GameState,
    pub event: Event,
}

/// What happened during one game tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameTick {
    pub transition: Option<Transition>,
    /// Cell claimed by a hit this tick
    pub scored: Option<u8>,
    /// The beam report was taken; the detector should be cleared
    pub hit_consumed: bool,
}

/// Top-level game controller
pub struct GameController<D, L, S> {
    state: GameState,
    board: Board,
    player: Player,
    timing: GameTiming,
    map: InputMap,
    aim: AimConfig,
    /// Deadline of the current timed state
    deadline: Option<Deadline>,
    aim_ready_at: Tick,
    scored_this_turn: bool,
    pending_cup: Option<u8>,
    /// Landing reported while the ball was in flight
    pending_hit: Option<u8>,
    held_since: Option<Tick>,
    io: Collaborators<D, L, S>,
}

impl<D, L, S> GameController<D, L, S>
where
    D: MessageDisplay,
    L: IndicatorLeds,
    S: OutputChannels,
{
    /// Create a controller in the main menu
    ///
    /// Call [`GameController::start`] before the first tick to draw the menu.
    pub fn new(config: &MachineConfig, io: Collaborators<D, L, S>) -> Self {
        Self {
            state: GameState::MainMenu,
            board: Board::new(),
            player: Player::One,
            timing: config.timing,
            map: config.map,
            aim: config.aim,
            deadline: None,
            aim_ready_at: 0,
            scored_this_turn: false,
            pending_cup: None,
            pending_hit: None,
            held_since: None,
            io,
        }
    }

    /// Run the main menu entry actions
    pub fn start(&mut self, now: Tick, motion: &mut MotionController) {
        self.state = GameState::MainMenu;
        self.enter(now, motion);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Player whose turn it is
    pub fn player(&self) -> Player {
        self.player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn collaborators(&self) -> &Collaborators<D, L, S> {
        &self.io
    }

    pub fn collaborators_mut(&mut self) -> &mut Collaborators<D, L, S> {
        &mut self.io
    }

    /// Evaluate one tick
    ///
    /// `buttons` and `hit` must already reflect this tick's samples.
    pub fn tick(
        &mut self,
        now: Tick,
        buttons: &ButtonSnapshot,
        hit: Option<u8>,
        motion: &mut MotionController,
    ) -> GameTick {
        self.io.display.tick(TICK_PERIOD_MS);

        // A landing can be reported before the score window opens
        if hit.is_some() && self.state.is_in_flight() {
            self.pending_hit = hit;
        }

        let mut out = GameTick::default();
        let event = match self.reset_hold(now, buttons) {
            Some(event) => Some(event),
            None => self.poll(now, buttons, motion, &mut out),
        };

        if let Some(event) = event {
            out.transition = self.dispatch(event, now, motion);
        }
        out
    }

    /// Any button held for `reset_hold_ticks` during a game
    fn reset_hold(&mut self, now: Tick, buttons: &ButtonSnapshot) -> Option<Event> {
        if !self.state.is_in_progress() || !buttons.any_held() {
            self.held_since = None;
            return None;
        }
        let since = *self.held_since.get_or_insert(now);
        (now - since >= self.timing.reset_hold_ticks as Tick).then_some(Event::Reset)
    }

    fn deadline_reached(&self, now: Tick) -> bool {
        self.deadline.is_some_and(|d| d.is_reached(now))
    }

    fn poll(
        &mut self,
        now: Tick,
        buttons: &ButtonSnapshot,
        motion: &mut MotionController,
        out: &mut GameTick,
    ) -> Option<Event> {
        match self.state {
            GameState::MainMenu => buttons
                .was_pressed(self.map.fire)
                .then_some(Event::FirePressed),
            GameState::SelectMode => {
                if buttons.was_pressed(self.map.auto_mode) {
                    Some(Event::ModeSelected(PlayMode::Auto))
                } else if buttons.was_pressed(self.map.manual_mode) {
                    Some(Event::ModeSelected(PlayMode::Manual))
                } else {
                    None
                }
            }
            GameState::Manual => {
                self.manual_aim(now, buttons, motion);
                buttons
                    .was_pressed(self.map.fire)
                    .then_some(Event::FirePressed)
            }
            GameState::Auto => self.auto_aim(now, buttons, motion),
            GameState::Launch(_) => self
                .deadline_reached(now)
                .then_some(Event::LaunchElapsed),
            GameState::WaitScore(_) => {
                if let Some(cell) = self.pending_hit.take() {
                    out.hit_consumed = true;
                    if self.record_hit(cell) {
                        out.scored = Some(cell);
                    }
                }
                self.deadline_reached(now)
                    .then(|| Event::ScoreWindowClosed {
                        winner: self.board.check_winner().is_some(),
                    })
            }
            GameState::GameOver => {
                if !self.deadline_reached(now) {
                    return None;
                }
                self.io
                    .display
                    .show_scrolling(DISMISS_PROMPT, self.timing.scroll_speed);
                buttons.first_pressed().map(|_| Event::Dismiss)
            }
        }
    }

    fn aim_ready(&self, now: Tick, motion: &MotionController) -> bool {
        self.state.aim_allowed() && now >= self.aim_ready_at && motion.is_homed()
    }

    /// Held aim buttons nudge the axes, at most once per cooldown
    fn manual_aim(&mut self, now: Tick, buttons: &ButtonSnapshot, motion: &mut MotionController) {
        if !self.aim_ready(now, motion) {
            return;
        }

        let map = self.map;
        let mut issued = false;
        if buttons.is_held(map.aim_up) {
            motion.step_theta(self.aim.theta_step_x10);
            issued = true;
        } else if buttons.is_held(map.aim_down) {
            motion.step_theta(-self.aim.theta_step_x10);
            issued = true;
        }
        if buttons.is_held(map.aim_right) {
            motion.step_phi(self.aim.phi_step_x10);
            issued = true;
        } else if buttons.is_held(map.aim_left) {
            motion.step_phi(-self.aim.phi_step_x10);
            issued = true;
        }

        if issued {
            self.aim_ready_at = now + self.timing.aim_cooldown_ticks as Tick;
        }
    }

    /// A cup button aims at its preset; the shot goes once both axes settle
    ///
    /// Fire launches at the current aim. The fire pad never selects a cup.
    fn auto_aim(
        &mut self,
        now: Tick,
        buttons: &ButtonSnapshot,
        motion: &mut MotionController,
    ) -> Option<Event> {
        if self.pending_cup.is_some() {
            return motion.is_settled().then_some(Event::AimSettled);
        }

        if buttons.was_pressed(self.map.fire) {
            return Some(Event::FirePressed);
        }

        if !self.aim_ready(now, motion) {
            return None;
        }

        let fire = self.map.fire;
        let cup = (0..CELL_COUNT as u8).find(|&cup| {
            cup != fire && buttons.was_pressed(cup) && self.board.get(cup).is_none()
        })?;

        motion.aim(self.aim.cups[cup as usize]);
        self.pending_cup = Some(cup);
        self.io.pad_leds.clear();
        self.io.pad_leds.set_pixel(cup as usize, Rgb::WHITE);
        self.io.pad_leds.show();
        None
    }

    /// Claim a cell for the current player
    ///
    /// One claim per turn; hits on occupied cells do not count.
    fn record_hit(&mut self, cell: u8) -> bool {
        if self.scored_this_turn || !self.board.place(cell, self.player) {
            return false;
        }
        self.scored_this_turn = true;
        self.io
            .display
            .show_flashing(self.player.score_message(), self.timing.flash_rate_ms);
        self.render_board();
        true
    }

    fn dispatch(
        &mut self,
        event: Event,
        now: Tick,
        motion: &mut MotionController,
    ) -> Option<Transition> {
        let from = self.state;
        let to = from.transition(event);
        if to == from {
            return None;
        }

        self.exit(from, event);
        self.state = to;
        self.io
            .outputs
            .set_output(self.map.solenoid_channel, to.solenoid_allowed());
        self.enter(now, motion);
        Some(Transition { from, to, event })
    }

    fn exit(&mut self, from: GameState, event: Event) {
        match from {
            GameState::WaitScore(_) => {
                if event == (Event::ScoreWindowClosed { winner: false }) {
                    self.player = self.player.other();
                }
            }
            _ => {}
        }
    }

    fn enter(&mut self, now: Tick, motion: &mut MotionController) {
        self.deadline = None;
        let timing = self.timing;

        match self.state {
            GameState::MainMenu => {
                self.board.reset();
                self.player = Player::One;
                self.pending_cup = None;
                self.pending_hit = None;
                self.held_since = None;
                self.io.outputs.all_off();
                motion.write_theta(0);
                motion.write_phi(0);

                self.io
                    .display
                    .show_scrolling(WELCOME_MESSAGE, timing.scroll_speed);
                self.io.pad_leds.clear();
                self.io.pad_leds.set_pixel(self.map.fire as usize, Rgb::RED);
                self.io.pad_leds.show();
                self.render_board();
            }
            GameState::SelectMode => {
                self.io
                    .display
                    .show_scrolling(MODE_PROMPT, timing.scroll_speed);
                self.io.pad_leds.clear();
                self.io
                    .pad_leds
                    .set_pixel(self.map.auto_mode as usize, Rgb::RED);
                self.io
                    .pad_leds
                    .set_pixel(self.map.manual_mode as usize, Rgb::RED);
                self.io.pad_leds.show();
            }
            GameState::Manual | GameState::Auto => {
                self.pending_cup = None;
                self.pending_hit = None;
                self.scored_this_turn = false;
                self.aim_ready_at = now + timing.aim_cooldown_ticks as Tick;

                self.io.display.show_static(self.player.label());
                self.io.pad_leds.clear();
                if self.state == GameState::Auto {
                    // Open cups are the valid targets
                    let color = player_color(self.player);
                    let fire = self.map.fire as usize;
                    for cell in 0..CELL_COUNT {
                        if cell != fire && self.board.get(cell as u8).is_none() {
                            self.io.pad_leds.set_pixel(cell, color);
                        }
                    }
                    self.io.pad_leds.set_pixel(fire, Rgb::RED);
                }
                self.io.pad_leds.show();
            }
            GameState::Launch(_) => {
                self.io
                    .display
                    .show_flashing(LAUNCH_MESSAGE, timing.flash_rate_ms);
                self.deadline = Some(Deadline::after(now, timing.launch_ticks));
            }
            GameState::WaitScore(_) => {
                self.scored_this_turn = false;
                self.deadline = Some(Deadline::after(now, timing.score_timeout_ticks));
            }
            GameState::GameOver => {
                let winner = self.board.check_winner().unwrap_or(self.player);
                self.io
                    .display
                    .show_flashing(winner.win_message(), timing.flash_rate_ms);
                self.io.pad_leds.fill(player_color(winner));
                self.io.pad_leds.show();
                self.deadline = Some(Deadline::after(now, timing.celebration_ticks));
            }
        }
    }

    fn render_board(&mut self) {
        for (cell, occupant) in self.board.cells().iter().enumerate() {
            let color = occupant.map_or(Rgb::OFF, player_color);
            self.io.cup_leds.set_pixel(cell, color);
        }
        self.io.cup_leds.show();
    }
}
