//! Beam-break scoring detector
//!
//! Three beams run along the rows of cups and three along the columns. A ball
//! dropping into a cup breaks one row beam and one column beam, not
//! necessarily on the same tick, so each beam is latched when it first reads
//! broken and only released after `reset_window` ticks of reading clear.
//!
//! Beam numbering: 0..=2 are the column beams, 3..=5 the row beams.

use crate::config::{BEAM_COUNT, CELL_COUNT};

/// Beam pair for each cell, indexed by cell
pub const BEAM_PAIRS: [[u8; 2]; CELL_COUNT] = [
    [2, 5],
    [1, 5],
    [0, 5],
    [2, 4],
    [1, 4],
    [0, 4],
    [2, 3],
    [1, 3],
    [0, 3],
];

/// Look up the cell for an unordered pair of beams
pub fn cell_for_pair(a: u8, b: u8) -> Option<u8> {
    BEAM_PAIRS
        .iter()
        .position(|pair| (pair[0] == a && pair[1] == b) || (pair[0] == b && pair[1] == a))
        .map(|cell| cell as u8)
}

/// Latching beam-pair detector
#[derive(Debug, Clone)]
pub struct BeamArray {
    latched: [bool; BEAM_COUNT],
    clear_ticks: [u16; BEAM_COUNT],
    reset_window: u16,
    armed: bool,
}

impl BeamArray {
    /// Create a detector with all latches clear
    pub fn new(reset_window: u16) -> Self {
        Self {
            latched: [false; BEAM_COUNT],
            clear_ticks: [0; BEAM_COUNT],
            reset_window,
            armed: true,
        }
    }

    /// Feed the debounced beam states (`true` = broken)
    ///
    /// Returns a cell the first tick exactly two latched beams form a known
    /// pair. After reporting, the detector stays quiet until every latch has
    /// released.
    pub fn update(&mut self, broken: &[bool; BEAM_COUNT]) -> Option<u8> {
        for i in 0..BEAM_COUNT {
            if broken[i] {
                self.latched[i] = true;
                self.clear_ticks[i] = 0;
            } else if self.latched[i] {
                self.clear_ticks[i] = self.clear_ticks[i].saturating_add(1);
                if self.clear_ticks[i] >= self.reset_window {
                    self.latched[i] = false;
                    self.clear_ticks[i] = 0;
                }
            }
        }

        if !self.armed {
            if self.latched_count() == 0 {
                self.armed = true;
            }
            return None;
        }

        let mut pair = [0u8; 2];
        let mut count = 0;
        for (i, &latched) in self.latched.iter().enumerate() {
            if !latched {
                continue;
            }
            if count < 2 {
                pair[count] = i as u8;
            }
            count += 1;
        }

        if count != 2 {
            return None;
        }

        let cell = cell_for_pair(pair[0], pair[1])?;
        self.armed = false;
        Some(cell)
    }

    /// Consume the current hit
    ///
    /// Clears every latch. The detector re-arms once all beams have read
    /// clear for a full reset window.
    pub fn accept(&mut self) {
        self.latched = [false; BEAM_COUNT];
        self.clear_ticks = [0; BEAM_COUNT];
        self.armed = false;
    }

    /// Number of latched beams
    pub fn latched_count(&self) -> usize {
        self.latched.iter().filter(|&&l| l).count()
    }

    /// Whether a new pair would be reported
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beams(indices: &[usize]) -> [bool; BEAM_COUNT] {
        let mut b = [false; BEAM_COUNT];
        for &i in indices {
            b[i] = true;
        }
        b
    }

    #[test]
    fn test_pair_table_is_bijection() {
        for cell in 0..CELL_COUNT as u8 {
            let [a, b] = BEAM_PAIRS[cell as usize];
            assert_eq!(cell_for_pair(a, b), Some(cell));
            assert_eq!(cell_for_pair(b, a), Some(cell));
        }
        // Two column beams or two row beams never name a cell
        assert_eq!(cell_for_pair(0, 1), None);
        assert_eq!(cell_for_pair(3, 5), None);
    }

    #[test]
    fn test_simultaneous_pair() {
        let mut arr = BeamArray::new(10);
        assert_eq!(arr.update(&beams(&[1, 4])), Some(4));
    }

    #[test]
    fn test_staggered_pair_latches() {
        let mut arr = BeamArray::new(10);
        assert_eq!(arr.update(&beams(&[3])), None);
        assert_eq!(arr.update(&beams(&[])), None);
        assert_eq!(arr.update(&beams(&[0])), Some(8));
    }

    #[test]
    fn test_reported_once() {
        let mut arr = BeamArray::new(5);
        assert_eq!(arr.update(&beams(&[2, 5])), Some(0));
        for _ in 0..20 {
            assert_eq!(arr.update(&beams(&[2, 5])), None);
        }
        // Clear long enough to release, then the same cup again
        for _ in 0..5 {
            assert_eq!(arr.update(&beams(&[])), None);
        }
        assert!(arr.is_armed());
        assert_eq!(arr.update(&beams(&[2, 5])), Some(0));
    }

    #[test]
    fn test_latch_decays() {
        let mut arr = BeamArray::new(3);
        arr.update(&beams(&[3]));
        arr.update(&beams(&[]));
        arr.update(&beams(&[]));
        assert_eq!(arr.latched_count(), 1);
        arr.update(&beams(&[]));
        assert_eq!(arr.latched_count(), 0);
        // Row beam alone has decayed, a lone column beam is not a score
        assert_eq!(arr.update(&beams(&[0])), None);
    }

    #[test]
    fn test_ambiguous_patterns() {
        let mut arr = BeamArray::new(10);
        assert_eq!(arr.update(&beams(&[0, 3, 4])), None);

        let mut arr = BeamArray::new(10);
        assert_eq!(arr.update(&beams(&[0, 1])), None);
    }

    #[test]
    fn test_accept_disarms_until_clear() {
        let mut arr = BeamArray::new(2);
        assert_eq!(arr.update(&beams(&[0, 4])), Some(5));
        arr.accept();
        assert_eq!(arr.latched_count(), 0);
        assert!(!arr.is_armed());

        // Ball still sitting in the beams
        assert_eq!(arr.update(&beams(&[0, 4])), None);
        arr.update(&beams(&[]));
        arr.update(&beams(&[]));
        assert!(arr.is_armed());
        assert_eq!(arr.update(&beams(&[1, 3])), Some(7));
    }
}
