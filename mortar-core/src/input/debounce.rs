//! Stability-counter debouncer
//!
//! Each channel keeps a committed (stable) value and a counter of consecutive
//! samples that disagree with it. A sample that agrees resets the counter;
//! once the counter exceeds the threshold the stable value flips.

/// Debouncer for a group of `N` channels sharing one threshold
#[derive(Debug, Clone)]
pub struct Debouncer<const N: usize> {
    stable: [bool; N],
    counters: [u16; N],
    rising: [bool; N],
    falling: [bool; N],
    threshold: u16,
}

impl<const N: usize> Debouncer<N> {
    /// Create a debouncer with every channel stable at `false`
    pub fn new(threshold: u16) -> Self {
        Self {
            stable: [false; N],
            counters: [0; N],
            rising: [false; N],
            falling: [false; N],
            threshold,
        }
    }

    /// Feed one sample per channel and return the stable values
    ///
    /// Call exactly once per tick.
    pub fn sample(&mut self, raw: &[bool; N]) -> &[bool; N] {
        for i in 0..N {
            self.rising[i] = false;
            self.falling[i] = false;

            if raw[i] == self.stable[i] {
                self.counters[i] = 0;
                continue;
            }

            self.counters[i] = self.counters[i].saturating_add(1);
            if self.counters[i] > self.threshold {
                self.stable[i] = raw[i];
                self.counters[i] = 0;
                if raw[i] {
                    self.rising[i] = true;
                } else {
                    self.falling[i] = true;
                }
            }
        }
        &self.stable
    }

    /// Stable values as of the last sample
    pub fn stable(&self) -> &[bool; N] {
        &self.stable
    }

    /// Channels that became asserted on the last sample
    pub fn rising(&self) -> &[bool; N] {
        &self.rising
    }

    /// Channels that became released on the last sample
    pub fn falling(&self) -> &[bool; N] {
        &self.falling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commits_after_threshold_plus_one() {
        let mut d = Debouncer::<1>::new(3);
        for _ in 0..3 {
            assert!(!d.sample(&[true])[0]);
        }
        assert!(d.sample(&[true])[0]);
        assert!(d.rising()[0]);

        // Edge is reported for one sample only
        d.sample(&[true]);
        assert!(!d.rising()[0]);
    }

    #[test]
    fn test_glitch_resets_counter() {
        let mut d = Debouncer::<1>::new(2);
        d.sample(&[true]);
        d.sample(&[true]);
        d.sample(&[false]); // agrees with stable, counter back to 0
        d.sample(&[true]);
        d.sample(&[true]);
        assert!(!d.stable()[0]);
        d.sample(&[true]);
        assert!(d.stable()[0]);
    }

    #[test]
    fn test_oscillation_never_commits() {
        let mut d = Debouncer::<1>::new(1);
        for i in 0..100 {
            d.sample(&[i % 2 == 0]);
            assert!(!d.stable()[0]);
        }
    }

    #[test]
    fn test_channels_independent() {
        let mut d = Debouncer::<3>::new(0);
        let stable = *d.sample(&[true, false, true]);
        assert_eq!(stable, [true, false, true]);
        d.sample(&[false, false, true]);
        assert_eq!(d.falling(), &[true, false, false]);
    }
}
