//! Digital output channel trait (solenoid driver)

/// Trait for a bank of on/off output channels
///
/// The launch solenoid is channel 0 on the stock build.
pub trait OutputChannels {
    /// Drive a channel on or off (unknown channels are ignored)
    fn set_output(&mut self, channel: u8, on: bool);

    /// Current state of a channel
    fn is_on(&self, channel: u8) -> bool;

    /// Turn all channels off
    fn all_off(&mut self);
}
