//! Pin assignment and concrete driver types for the launcher board
//!
//! Raspberry Pi Pico:
//!
//! | GPIO            | Function                          |
//! |-----------------|-----------------------------------|
//! | 0, 1            | phi STEP, DIR                     |
//! | 2, 3            | theta motor B STEP, DIR (mirrored)|
//! | 4, 5            | theta motor A STEP, DIR           |
//! | 6-14            | pad buttons 0-8                   |
//! | 15, 16          | theta, phi limit switches         |
//! | 17              | solenoid                          |
//! | 20-22, 26-28    | beam receivers 0-5                |
//! | 25              | heartbeat LED                     |

use embassy_rp::gpio::{Input, Level, Output, Pin, Pull};
use embassy_rp::Peri;
use embassy_time::Delay;

use mortar_core::config::CELL_COUNT;
use mortar_core::motion::StepGenerator;
use mortar_core::ControlLoop;
use mortar_drivers::display::TextDisplay;
use mortar_drivers::leds::PixelBuffer;
use mortar_drivers::output::GpioOutputs;
use mortar_drivers::pin::{EhInput, EhOutput};
use mortar_drivers::stepper::{MirroredStepDir, StepDir};

/// Characters on the text panel
pub const DISPLAY_COLS: usize = 16;

pub type BoardInput = EhInput<Input<'static>>;
pub type BoardOutput = EhOutput<Output<'static>>;

pub type PhiOutput = StepDir<BoardOutput, BoardOutput, Delay>;
pub type ThetaOutput = MirroredStepDir<PhiOutput, PhiOutput>;

pub type ThetaGenerator = StepGenerator<'static, ThetaOutput>;
pub type PhiGenerator = StepGenerator<'static, PhiOutput>;

pub type LauncherLoop = ControlLoop<
    'static,
    BoardInput,
    BoardOutput,
    TextDisplay<DISPLAY_COLS>,
    PixelBuffer<CELL_COUNT>,
    GpioOutputs<BoardOutput, 1>,
>;

/// Input with the pull that idles it deasserted
pub fn input(pin: Peri<'static, impl Pin>, active_low: bool) -> BoardInput {
    let pull = if active_low { Pull::Up } else { Pull::Down };
    EhInput::new(Input::new(pin, pull))
}

pub fn output(pin: Peri<'static, impl Pin>) -> BoardOutput {
    EhOutput::new(Output::new(pin, Level::Low), false)
}

/// One step/dir driver
pub fn step_dir(
    step: Peri<'static, impl Pin>,
    dir: Peri<'static, impl Pin>,
    invert_dir: bool,
) -> PhiOutput {
    StepDir::new(output(step), output(dir), Delay, invert_dir)
}
