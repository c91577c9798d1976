//! Build script for mortar-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates launcher.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const SECTIONS: &[&str] = &[
    "input",
    "input.buttons",
    "input.beams",
    "axis.theta",
    "axis.phi",
    "stepping",
    "timing",
    "map",
    "aim",
];

const BUTTON_COUNT: i64 = 9;
const CELL_COUNT: usize = 9;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate launcher.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=launcher.toml");

    let config_path = Path::new("launcher.toml");
    if !config_path.exists() {
        fail(
            "launcher.toml not found",
            &["The firmware embeds launcher.toml from the crate directory.".to_string()],
        );
    }

    let content = fs::read_to_string(config_path)
        .unwrap_or_else(|e| fail("Failed to read launcher.toml", &[e.to_string()]));

    let config: toml::Table = toml::from_str(&content).unwrap_or_else(|e| {
        let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
        fail("Invalid TOML syntax in launcher.toml", &lines)
    });

    let mut errors = Vec::new();
    check_sections(&config, &mut errors);
    check_axis(&config, "theta", &mut errors);
    check_axis(&config, "phi", &mut errors);
    check_stepping(&config, &mut errors);
    check_map(&config, &mut errors);
    check_aim(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid launcher configuration", &errors);
    }

    println!("cargo:warning=launcher.toml validated successfully");
}

/// Abort the build with a boxed error listing
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let line = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", line)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

/// Flatten `[axis.theta]` style tables into dotted names
fn section<'a>(config: &'a toml::Table, name: &str) -> Option<&'a toml::Table> {
    let mut table = config;
    for part in name.split('.') {
        table = table.get(part)?.as_table()?;
    }
    Some(table)
}

fn check_sections(config: &toml::Table, errors: &mut Vec<String>) {
    for (name, value) in config {
        match value {
            toml::Value::Table(inner) if name == "input" || name == "axis" => {
                for (child, value) in inner {
                    if value.is_table() {
                        let dotted = format!("{}.{}", name, child);
                        if !SECTIONS.contains(&dotted.as_str()) {
                            errors.push(format!("unknown section [{}]", dotted));
                        }
                    }
                }
            }
            toml::Value::Table(_) if SECTIONS.contains(&name.as_str()) => {}
            toml::Value::Table(_) => errors.push(format!("unknown section [{}]", name)),
            _ => errors.push(format!("'{}' must be inside a section", name)),
        }
    }
}

/// Angle in degrees with at most one decimal place
fn angle(value: &toml::Value) -> Option<f64> {
    let degrees = match value {
        toml::Value::Integer(i) => *i as f64,
        toml::Value::Float(f) => *f,
        _ => return None,
    };
    let tenths = degrees * 10.0;
    ((tenths - tenths.round()).abs() < 1e-6).then_some(degrees)
}

fn check_axis(config: &toml::Table, axis: &str, errors: &mut Vec<String>) {
    let name = format!("axis.{}", axis);
    let Some(table) = section(config, &name) else {
        return;
    };

    let min = table.get("min").map(angle);
    let max = table.get("max").map(angle);
    for (key, value) in [("min", min), ("max", max)] {
        if value == Some(None) {
            errors.push(format!("[{}] {} must be degrees, one decimal", name, key));
        }
    }
    if let (Some(Some(min)), Some(Some(max))) = (min, max) {
        if min > max {
            errors.push(format!("[{}] min must not exceed max", name));
        }
    }

    for key in [
        "microsteps",
        "feed_rate",
        "homing_feed_rate",
        "steps_per_second",
        "homing_steps_per_second",
        "homing_timeout_ms",
    ] {
        if let Some(value) = table.get(key) {
            if value.as_integer().map_or(true, |v| v <= 0) {
                errors.push(format!("[{}] {} must be a positive integer", name, key));
            }
        }
    }

    if let Some(dir) = table.get("home_direction") {
        if !matches!(dir.as_str(), Some("cw" | "ccw" | "clockwise" | "counterclockwise")) {
            errors.push(format!("[{}] home_direction must be 'cw' or 'ccw'", name));
        }
    }
}

fn check_stepping(config: &toml::Table, errors: &mut Vec<String>) {
    let strategy = section(config, "stepping").and_then(|t| t.get("strategy"));
    if let Some(strategy) = strategy {
        if !matches!(strategy.as_str(), Some("tick" | "timer")) {
            errors.push("[stepping] strategy must be 'tick' or 'timer'".to_string());
        }
    }
}

fn check_map(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(map) = section(config, "map") else {
        return;
    };

    for (key, value) in map {
        if key == "solenoid_channel" {
            continue;
        }
        match value.as_integer() {
            Some(i) if (0..BUTTON_COUNT).contains(&i) => {}
            _ => errors.push(format!("[map] {} must be a button index 0-8", key)),
        }
    }

    if let (Some(auto), Some(manual)) = (map.get("auto_mode"), map.get("manual_mode")) {
        if auto == manual {
            errors.push("[map] auto_mode and manual_mode must differ".to_string());
        }
    }
}

fn check_aim(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(aim) = section(config, "aim") else {
        return;
    };

    for key in ["cup_theta", "cup_phi"] {
        match aim.get(key) {
            Some(toml::Value::Array(items)) => {
                if items.len() != CELL_COUNT {
                    errors.push(format!("[aim] {} needs exactly {} angles", key, CELL_COUNT));
                }
                if items.iter().any(|v| angle(v).is_none()) {
                    errors.push(format!("[aim] {} entries must be degrees", key));
                }
            }
            Some(_) => errors.push(format!("[aim] {} must be an array", key)),
            None => {}
        }
    }
}
