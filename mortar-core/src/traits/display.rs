//! Message display trait for the launcher's text panel

/// Trait for the scrolling/flashing message panel
///
/// Implementations render text on whatever panel the board carries. Every
/// call is idempotent: showing the message that is already up (with the same
/// mode and rate) must not restart its animation, because the game controller
/// re-issues its current message freely.
pub trait MessageDisplay {
    /// Show text without animation
    fn show_static(&mut self, text: &'static str);

    /// Scroll text across the panel
    ///
    /// - `speed`: columns advanced per second
    fn show_scrolling(&mut self, text: &'static str, speed: u16);

    /// Blink text on and off
    ///
    /// - `rate_ms`: half period of the blink
    fn show_flashing(&mut self, text: &'static str, rate_ms: u16);

    /// Advance animations by `elapsed_ms`
    fn tick(&mut self, elapsed_ms: u32);
}
