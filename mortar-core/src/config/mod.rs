//! Configuration types
//!
//! Board-agnostic configuration structures and the TOML-subset parser used
//! to load them from the embedded `launcher.toml`.

pub mod parse;
pub mod types;

pub use parse::{parse_config, validate, ConfigError, ConfigErrorKind};
pub use types::*;
