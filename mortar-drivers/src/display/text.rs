//! Text panel model
//!
//! Keeps the message, its animation and the frame of `COLS` characters
//! currently visible. A panel driver (LED matrix, character LCD) only has to
//! push [`TextDisplay::frame`] whenever [`TextDisplay::take_dirty`] says so.

use heapless::String;
use mortar_core::traits::MessageDisplay;

/// How the message is animated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextMode {
    Static,
    /// Columns advanced per second
    Scrolling { speed: u16 },
    /// Half period of the blink in ms
    Flashing { rate_ms: u16 },
}

/// Single-line text panel, `COLS` characters wide
pub struct TextDisplay<const COLS: usize> {
    text: &'static str,
    mode: TextMode,
    /// Scroll position in columns, 0 = text just off the right edge
    offset: usize,
    /// Flash phase
    visible: bool,
    elapsed_ms: u32,
    frame: String<COLS>,
    dirty: bool,
    changes: u32,
}

impl<const COLS: usize> Default for TextDisplay<COLS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const COLS: usize> TextDisplay<COLS> {
    /// Create a blank panel
    pub fn new() -> Self {
        let mut display = Self {
            text: "",
            mode: TextMode::Static,
            offset: 0,
            visible: true,
            elapsed_ms: 0,
            frame: String::new(),
            dirty: true,
            changes: 0,
        };
        display.render();
        display
    }

    /// Current message
    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn mode(&self) -> TextMode {
        self.mode
    }

    /// Characters currently visible
    pub fn frame(&self) -> &str {
        self.frame.as_str()
    }

    /// Number of times the message was replaced
    pub fn changes(&self) -> u32 {
        self.changes
    }

    /// Check and clear the redraw flag
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    fn set(&mut self, text: &'static str, mode: TextMode) {
        if self.text == text && self.mode == mode {
            return;
        }
        self.text = text;
        self.mode = mode;
        self.offset = 0;
        self.visible = true;
        self.elapsed_ms = 0;
        self.changes += 1;
        self.render();
    }

    /// Period of one animation step in ms
    fn step_ms(&self) -> Option<u32> {
        match self.mode {
            TextMode::Static => None,
            TextMode::Scrolling { speed } => Some(1000 / speed.max(1) as u32),
            TextMode::Flashing { rate_ms } => Some(rate_ms.max(1) as u32),
        }
    }

    fn advance(&mut self) {
        match self.mode {
            TextMode::Static => {}
            TextMode::Scrolling { .. } => {
                // Text enters from the right and leaves on the left
                self.offset = (self.offset + 1) % (self.text.len() + COLS);
            }
            TextMode::Flashing { .. } => self.visible = !self.visible,
        }
    }

    fn render(&mut self) {
        self.frame.clear();
        let bytes = self.text.as_bytes();
        for col in 0..COLS {
            let c = match self.mode {
                TextMode::Scrolling { .. } => (self.offset + col)
                    .checked_sub(COLS)
                    .and_then(|i| bytes.get(i).copied()),
                TextMode::Flashing { .. } if !self.visible => None,
                _ => bytes.get(col).copied(),
            };
            let c = match c {
                Some(b) if b.is_ascii() => b as char,
                Some(_) => '?',
                None => ' ',
            };
            let _ = self.frame.push(c);
        }
        self.dirty = true;
    }
}

impl<const COLS: usize> MessageDisplay for TextDisplay<COLS> {
    fn show_static(&mut self, text: &'static str) {
        self.set(text, TextMode::Static);
    }

    fn show_scrolling(&mut self, text: &'static str, speed: u16) {
        self.set(text, TextMode::Scrolling { speed });
    }

    fn show_flashing(&mut self, text: &'static str, rate_ms: u16) {
        self.set(text, TextMode::Flashing { rate_ms });
    }

    fn tick(&mut self, elapsed_ms: u32) {
        let Some(step) = self.step_ms() else {
            return;
        };
        self.elapsed_ms += elapsed_ms;
        let mut moved = false;
        while self.elapsed_ms >= step {
            self.elapsed_ms -= step;
            self.advance();
            moved = true;
        }
        if moved {
            self.render();
        }
    }
}
