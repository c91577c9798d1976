//! Indicator LED implementations

pub mod buffer;

pub use buffer::PixelBuffer;
