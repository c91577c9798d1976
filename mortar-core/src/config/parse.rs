//! Simple TOML parser for launcher configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! the launcher configuration. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, decimal, boolean)
//! - [section] and [section.subsection] headers
//! - Single-line integer/decimal arrays: cup_phi = [-15, 0, 15]
//! - Comments (# ...)
//!
//! Angles are written in degrees with at most one decimal place and parsed
//! into tenths of a degree. Unknown sections and keys are errors so that a
//! typo does not silently fall back to a default.

use heapless::Vec;

use super::types::{
    AxisConfig, DebounceConfig, MachineConfig, StepStrategy, BUTTON_COUNT, CELL_COUNT,
};
use crate::traits::Direction;

/// What went wrong on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigErrorKind {
    /// Invalid or unknown section header
    InvalidSection,
    /// Key not valid in the current section
    UnknownKey,
    /// Line is not `key = value`
    InvalidLine,
    /// Value has the wrong type or does not fit
    InvalidValue,
    /// Array has the wrong number of items
    WrongItemCount,
    /// Axis range is empty (min > max)
    InvalidRange,
    /// Button index outside the 3x3 pad
    InvalidButton,
}

/// Parse error with its 1-based line number (0 for whole-file checks)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigError {
    pub line: usize,
    pub kind: ConfigErrorKind,
}

impl ConfigError {
    fn at(line: usize, kind: ConfigErrorKind) -> Self {
        Self { line, kind }
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Input,
    Buttons,
    Beams,
    Theta,
    Phi,
    Stepping,
    Timing,
    Map,
    Aim,
}

/// Parse TOML configuration into MachineConfig
///
/// Keys that are not present keep their stock values.
pub fn parse_config(input: &str) -> Result<MachineConfig, ConfigError> {
    let mut config = MachineConfig::new();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])
                .ok_or(ConfigError::at(line_no, ConfigErrorKind::InvalidSection))?;
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ConfigError::at(line_no, ConfigErrorKind::InvalidLine))?;

        apply_value(section, key, value, &mut config).map_err(|kind| ConfigError::at(line_no, kind))?;
    }

    validate(&config)?;
    Ok(config)
}

/// Check cross-field constraints of a parsed configuration
pub fn validate(config: &MachineConfig) -> Result<(), ConfigError> {
    for axis in [&config.theta, &config.phi] {
        if axis.min_x10 > axis.max_x10 {
            return Err(ConfigError::at(0, ConfigErrorKind::InvalidRange));
        }
        if axis.microsteps == 0 || axis.step_angle_x100 == 0 {
            return Err(ConfigError::at(0, ConfigErrorKind::InvalidValue));
        }
    }

    let map = &config.map;
    let buttons = [
        map.fire,
        map.auto_mode,
        map.manual_mode,
        map.aim_up,
        map.aim_down,
        map.aim_left,
        map.aim_right,
    ];
    if buttons.iter().any(|&b| b as usize >= BUTTON_COUNT) || map.auto_mode == map.manual_mode {
        return Err(ConfigError::at(0, ConfigErrorKind::InvalidButton));
    }

    Ok(())
}

/// Drop a trailing `# comment` that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_section_header(header: &str) -> Option<Section> {
    let section = match header.trim() {
        "input" => Section::Input,
        "input.buttons" => Section::Buttons,
        "input.beams" => Section::Beams,
        "axis.theta" => Section::Theta,
        "axis.phi" => Section::Phi,
        "stepping" => Section::Stepping,
        "timing" => Section::Timing,
        "map" => Section::Map,
        "aim" => Section::Aim,
        _ => return None,
    };
    Some(section)
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigErrorKind> {
    value.parse().map_err(|_| ConfigErrorKind::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ConfigErrorKind> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigErrorKind::InvalidValue),
    }
}

/// Parse a decimal like `-12.5` into an integer scaled by `10^places`
///
/// More fractional digits than `places` is an error rather than a silent
/// truncation.
pub fn parse_fixed(value: &str, places: u32) -> Result<i32, ConfigErrorKind> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };

    if (whole.is_empty() && frac.is_empty())
        || frac.len() > places as usize
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ConfigErrorKind::InvalidValue);
    }

    let mut scaled: i64 = 0;
    for b in whole.bytes() {
        scaled = scaled * 10 + (b - b'0') as i64;
        if scaled > i32::MAX as i64 {
            return Err(ConfigErrorKind::InvalidValue);
        }
    }
    for i in 0..places as usize {
        let digit = frac.as_bytes().get(i).map_or(0, |b| (b - b'0') as i64);
        scaled = scaled * 10 + digit;
    }

    let scaled = if negative { -scaled } else { scaled };
    i32::try_from(scaled).map_err(|_| ConfigErrorKind::InvalidValue)
}

/// Parse an angle in degrees into tenths of a degree
fn parse_angle(value: &str) -> Result<i32, ConfigErrorKind> {
    parse_fixed(value, 1)
}

/// Parse `[a, b, c]` as angles; exactly `CELL_COUNT` items
fn parse_angle_array(value: &str) -> Result<[i32; CELL_COUNT], ConfigErrorKind> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ConfigErrorKind::InvalidValue)?;

    let mut items: Vec<i32, CELL_COUNT> = Vec::new();
    for item in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        items
            .push(parse_angle(item)?)
            .map_err(|_| ConfigErrorKind::WrongItemCount)?;
    }

    items
        .into_array()
        .map_err(|_| ConfigErrorKind::WrongItemCount)
}

fn parse_direction(value: &str) -> Result<Direction, ConfigErrorKind> {
    match parse_string(value) {
        "cw" | "clockwise" => Ok(Direction::Clockwise),
        "ccw" | "counterclockwise" => Ok(Direction::CounterClockwise),
        _ => Err(ConfigErrorKind::InvalidValue),
    }
}

fn parse_strategy(value: &str) -> Result<StepStrategy, ConfigErrorKind> {
    match parse_string(value) {
        "tick" => Ok(StepStrategy::TickDivided),
        "timer" => Ok(StepStrategy::Timer),
        _ => Err(ConfigErrorKind::InvalidValue),
    }
}

fn parse_button(value: &str) -> Result<u8, ConfigErrorKind> {
    let index: u8 = parse_int(value)?;
    if index as usize >= BUTTON_COUNT {
        return Err(ConfigErrorKind::InvalidButton);
    }
    Ok(index)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MachineConfig,
) -> Result<(), ConfigErrorKind> {
    match section {
        Section::Root => return Err(ConfigErrorKind::UnknownKey),
        Section::Input => match key {
            "beam_reset_window" => config.input.beam_reset_window = parse_int(value)?,
            "limit_active_low" => config.input.limit_active_low = parse_bool(value)?,
            _ => return Err(ConfigErrorKind::UnknownKey),
        },
        Section::Buttons => apply_debounce(key, value, &mut config.input.buttons)?,
        Section::Beams => apply_debounce(key, value, &mut config.input.beams)?,
        Section::Theta => apply_axis(key, value, &mut config.theta)?,
        Section::Phi => apply_axis(key, value, &mut config.phi)?,
        Section::Stepping => match key {
            "strategy" => config.stepping = parse_strategy(value)?,
            _ => return Err(ConfigErrorKind::UnknownKey),
        },
        Section::Timing => {
            let t = &mut config.timing;
            match key {
                "launch_ms" => t.launch_ticks = parse_int(value)?,
                "score_timeout_ms" => t.score_timeout_ticks = parse_int(value)?,
                "celebration_ms" => t.celebration_ticks = parse_int(value)?,
                "aim_cooldown_ms" => t.aim_cooldown_ticks = parse_int(value)?,
                "reset_hold_ms" => t.reset_hold_ticks = parse_int(value)?,
                "heartbeat_ms" => t.heartbeat_ticks = parse_int(value)?,
                "scroll_speed" => t.scroll_speed = parse_int(value)?,
                "flash_rate_ms" => t.flash_rate_ms = parse_int(value)?,
                _ => return Err(ConfigErrorKind::UnknownKey),
            }
        }
        Section::Map => {
            let m = &mut config.map;
            match key {
                "fire" => m.fire = parse_button(value)?,
                "auto_mode" => m.auto_mode = parse_button(value)?,
                "manual_mode" => m.manual_mode = parse_button(value)?,
                "aim_up" => m.aim_up = parse_button(value)?,
                "aim_down" => m.aim_down = parse_button(value)?,
                "aim_left" => m.aim_left = parse_button(value)?,
                "aim_right" => m.aim_right = parse_button(value)?,
                "solenoid_channel" => m.solenoid_channel = parse_int(value)?,
                _ => return Err(ConfigErrorKind::UnknownKey),
            }
        }
        Section::Aim => {
            let a = &mut config.aim;
            match key {
                "theta_step" => a.theta_step_x10 = parse_angle(value)?,
                "phi_step" => a.phi_step_x10 = parse_angle(value)?,
                "cup_theta" => {
                    for (cup, theta) in a.cups.iter_mut().zip(parse_angle_array(value)?) {
                        cup.theta_x10 = theta;
                    }
                }
                "cup_phi" => {
                    for (cup, phi) in a.cups.iter_mut().zip(parse_angle_array(value)?) {
                        cup.phi_x10 = phi;
                    }
                }
                _ => return Err(ConfigErrorKind::UnknownKey),
            }
        }
    }
    Ok(())
}

fn apply_debounce(
    key: &str,
    value: &str,
    debounce: &mut DebounceConfig,
) -> Result<(), ConfigErrorKind> {
    match key {
        "threshold" => debounce.threshold = parse_int(value)?,
        "active_low" => debounce.active_low = parse_bool(value)?,
        _ => return Err(ConfigErrorKind::UnknownKey),
    }
    Ok(())
}

fn apply_axis(key: &str, value: &str, axis: &mut AxisConfig) -> Result<(), ConfigErrorKind> {
    match key {
        "microsteps" => axis.microsteps = parse_int(value)?,
        "step_angle" => {
            let hundredths = parse_fixed(value, 2)?;
            axis.step_angle_x100 =
                u16::try_from(hundredths).map_err(|_| ConfigErrorKind::InvalidValue)?;
        }
        "min" => axis.min_x10 = parse_angle(value)?,
        "max" => axis.max_x10 = parse_angle(value)?,
        "home_direction" => axis.home_direction = parse_direction(value)?,
        "homing_timeout_ms" => axis.homing_timeout_ticks = parse_int(value)?,
        "feed_rate" => axis.feed_rate = parse_int(value)?,
        "homing_feed_rate" => axis.homing_feed_rate = parse_int(value)?,
        "steps_per_second" => axis.steps_per_second = parse_int(value)?,
        "homing_steps_per_second" => axis.homing_steps_per_second = parse_int(value)?,
        _ => return Err(ConfigErrorKind::UnknownKey),
    }
    Ok(())
}
