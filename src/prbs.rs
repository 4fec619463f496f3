//! PRBS-7 bit source (x^7 + x^6 + 1).
//!
//! Deterministic test and benchmark data. The register starts at 0x01 and each
//! step outputs its LSB before shifting in the feedback bit, so the sequence
//! begins `1, 0, 0, 0, 0, 0, 1, 1` and repeats every 127 bits.

/// Sequence period.
pub const PRBS7_PERIOD: usize = 127;

const PRBS7_SEED: u8 = 0x01;

/// Infinite PRBS-7 iterator.
#[derive(Debug, Clone)]
pub struct Prbs7 {
    state: u8,
}

impl Prbs7 {
    /// Starts from the standard seed 0x01.
    pub fn new() -> Self {
        Self { state: PRBS7_SEED }
    }

    /// Starts from `seed`; only the low 7 bits are used. A zero seed is
    /// replaced by the standard one, since the all-zero register never leaves 0.
    pub fn with_seed(seed: u8) -> Self {
        let state = seed & 0x7F;
        Self {
            state: if state == 0 { PRBS7_SEED } else { state },
        }
    }
}

impl Default for Prbs7 {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Prbs7 {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let out = self.state & 1 != 0;
        let feedback = ((self.state >> 6) ^ (self.state >> 5)) & 1;
        self.state = ((self.state << 1) | feedback) & 0x7F;
        Some(out)
    }
}

/// First `count` bits of the standard PRBS-7 sequence.
pub fn prbs7(count: usize) -> Vec<bool> {
    Prbs7::new().take(count).collect()
}
