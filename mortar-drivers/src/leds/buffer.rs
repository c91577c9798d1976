//! Double-buffered pixel string
//!
//! Pixel writes land in a back buffer; [`IndicatorLeds::show`] copies it to
//! the front frame, applying the global brightness. Nothing drives a physical
//! string from it; the front frame is the model tests and logs read back.

use mortar_core::traits::{IndicatorLeds, Rgb};

/// `N`-pixel LED string buffer
#[derive(Debug, Clone)]
pub struct PixelBuffer<const N: usize> {
    back: [Rgb; N],
    front: [Rgb; N],
    /// Global brightness, 255 = full
    brightness: u8,
    frames: u32,
}

impl<const N: usize> Default for PixelBuffer<N> {
    fn default() -> Self {
        Self::new(255)
    }
}

impl<const N: usize> PixelBuffer<N> {
    /// Create a dark string
    pub fn new(brightness: u8) -> Self {
        Self {
            back: [Rgb::OFF; N],
            front: [Rgb::OFF; N],
            brightness,
            frames: 0,
        }
    }

    /// Pixels as last shown
    pub fn frame(&self) -> &[Rgb; N] {
        &self.front
    }

    /// Pixel as last shown
    pub fn shown(&self, index: usize) -> Rgb {
        self.front.get(index).copied().unwrap_or(Rgb::OFF)
    }

    /// Number of `show` calls
    pub fn frames(&self) -> u32 {
        self.frames
    }

    fn scale(&self, c: Rgb) -> Rgb {
        let s = |v: u8| ((v as u16 * self.brightness as u16 + 127) / 255) as u8;
        Rgb::new(s(c.r), s(c.g), s(c.b))
    }
}

impl<const N: usize> IndicatorLeds for PixelBuffer<N> {
    fn len(&self) -> usize {
        N
    }

    fn set_pixel(&mut self, index: usize, color: Rgb) {
        if let Some(p) = self.back.get_mut(index) {
            *p = color;
        }
    }

    fn show(&mut self) {
        for i in 0..N {
            self.front[i] = self.scale(self.back[i]);
        }
        self.frames += 1;
    }
}
