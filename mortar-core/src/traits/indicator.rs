//! RGB indicator LED trait
//!
//! The launcher has two LED strings: one under the nine push buttons and one
//! around the nine landing cups. Both are addressed by cell index.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Check if all channels are off
    pub fn is_off(&self) -> bool {
        *self == Rgb::OFF
    }
}

/// Trait for an addressable LED string
///
/// Pixel writes are buffered until [`IndicatorLeds::show`].
pub trait IndicatorLeds {
    /// Number of pixels in the string
    fn len(&self) -> usize;

    /// Check if the string has no pixels
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set one pixel in the buffer (out-of-range indices are ignored)
    fn set_pixel(&mut self, index: usize, color: Rgb);

    /// Set every pixel in the buffer
    fn fill(&mut self, color: Rgb) {
        for i in 0..self.len() {
            self.set_pixel(i, color);
        }
    }

    /// Turn every pixel off in the buffer
    fn clear(&mut self) {
        self.fill(Rgb::OFF);
    }

    /// Push the buffer to the LEDs
    fn show(&mut self);
}
