//! Message display implementations

pub mod text;

pub use text::{TextDisplay, TextMode};
