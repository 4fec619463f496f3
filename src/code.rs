//! Rate 1/2 convolutional code parameters and the 2-bit channel symbol.
//!
//! A code is described by its constraint length `K` and two generator
//! polynomials `G0`, `G1` given as `K`-bit masks. The encoder keeps the `M = K - 1`
//! most recent input bits as its shift-register state, newest bit in the LSB:
//!
//! ```text
//! register = (state << 1) | bit          (K bits)
//! symbol   = parity(register & G0) << 1 | parity(register & G1)
//! next     = register & (2^M - 1)
//! ```
//!
//! Only `K = 3, 5, 7` are supported, with these preset generator pairs:
//!
//! | K | G0    | G1    |
//! |---|-------|-------|
//! | 3 | 0o7   | 0o5   |
//! | 5 | 0o23  | 0o35  |
//! | 7 | 0o171 | 0o133 |

use crate::error::{Error, Result};
use std::fmt;

/// Default maximum frame length in symbols, tail included.
pub const MAX_FRAME: usize = 32;

/// Constraint lengths the trellis engine is built for.
pub const SUPPORTED_CONSTRAINT_LENGTHS: [usize; 3] = [3, 5, 7];

/// XOR of all set bits.
#[inline]
pub(crate) fn parity(x: u32) -> bool {
    x.count_ones() & 1 == 1
}

/// A 2-bit channel symbol: bit 1 from `G0`, bit 0 from `G1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Symbol(u8);

impl Symbol {
    /// The all-zero symbol.
    pub const ZERO: Symbol = Symbol(0);

    /// Creates a symbol, rejecting values wider than two bits.
    pub fn new(value: u8) -> Result<Self> {
        if value > 0b11 {
            return Err(Error::InvalidSymbol(value));
        }
        Ok(Symbol(value))
    }

    /// Builds a symbol from its `G0` (high) and `G1` (low) output bits.
    pub fn from_bits(g0_bit: bool, g1_bit: bool) -> Self {
        Symbol(((g0_bit as u8) << 1) | g1_bit as u8)
    }

    /// Keeps only the two low bits of `value`.
    pub(crate) fn from_masked(value: u8) -> Self {
        Symbol(value & 0b11)
    }

    /// Raw 2-bit value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Hamming distance to `other`, 0 to 2.
    #[inline]
    pub fn distance(self, other: Symbol) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// Returns the symbol with bit `bit` (0 or 1) inverted.
    ///
    /// # Panics
    ///
    /// Panics if `bit > 1`.
    pub fn flipped(self, bit: usize) -> Self {
        assert!(bit < 2, "symbol bit index {} out of range", bit);
        Symbol(self.0 ^ (1 << bit))
    }
}

impl TryFrom<u8> for Symbol {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Symbol::new(value)
    }
}

impl From<Symbol> for u8 {
    fn from(symbol: Symbol) -> u8 {
        symbol.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02b}", self.0)
    }
}

/// Parameters of a rate 1/2 convolutional code. Fixed for the lifetime of an
/// encoder or decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeParams {
    /// Constraint length K: register length including the current input bit
    constraint_length: usize,
    /// Generator for the high symbol bit
    g0: u32,
    /// Generator for the low symbol bit
    g1: u32,
}

impl CodeParams {
    /// Creates a code configuration.
    ///
    /// # Arguments
    ///
    /// * `constraint_length` - K, one of 3, 5 or 7
    /// * `g0` - Generator mask for the high symbol bit
    /// * `g1` - Generator mask for the low symbol bit
    ///
    /// # Returns
    ///
    /// The configuration, or an error if K is unsupported or a generator is
    /// zero or wider than K bits.
    pub fn new(constraint_length: usize, g0: u32, g1: u32) -> Result<Self> {
        if !SUPPORTED_CONSTRAINT_LENGTHS.contains(&constraint_length) {
            return Err(Error::UnsupportedConstraintLength(constraint_length));
        }

        let max_poly_value = (1u32 << constraint_length) - 1;
        for (index, &polynomial) in [g0, g1].iter().enumerate() {
            if polynomial == 0 || polynomial > max_poly_value {
                return Err(Error::InvalidGenerator {
                    index,
                    polynomial,
                    constraint_length,
                });
            }
        }

        Ok(CodeParams {
            constraint_length,
            g0,
            g1,
        })
    }

    /// K = 3 code, generators 7 and 5 (octal).
    pub fn k3() -> Self {
        CodeParams {
            constraint_length: 3,
            g0: 0o7,
            g1: 0o5,
        }
    }

    /// K = 5 code, generators 23 and 35 (octal).
    pub fn k5() -> Self {
        CodeParams {
            constraint_length: 5,
            g0: 0o23,
            g1: 0o35,
        }
    }

    /// K = 7 code, generators 171 and 133 (octal), the NASA/802.11 pair.
    pub fn k7() -> Self {
        CodeParams {
            constraint_length: 7,
            g0: 0o171,
            g1: 0o133,
        }
    }

    /// Returns the preset code for a supported constraint length.
    pub fn preset(constraint_length: usize) -> Result<Self> {
        match constraint_length {
            3 => Ok(Self::k3()),
            5 => Ok(Self::k5()),
            7 => Ok(Self::k7()),
            other => Err(Error::UnsupportedConstraintLength(other)),
        }
    }

    pub fn constraint_length(&self) -> usize {
        self.constraint_length
    }

    /// The `(G0, G1)` generator masks.
    pub fn generators(&self) -> (u32, u32) {
        (self.g0, self.g1)
    }

    /// Register memory M = K - 1, which is also the tail length.
    pub fn memory(&self) -> usize {
        self.constraint_length - 1
    }

    /// Number of trellis states, 2^M.
    pub fn num_states(&self) -> usize {
        1 << self.memory()
    }

    pub fn state_mask(&self) -> usize {
        self.num_states() - 1
    }

    /// Code rate; always 1/2.
    pub fn code_rate(&self) -> f64 {
        0.5
    }

    /// Data bits that fit in a frame of `max_frame` symbols once the tail is
    /// accounted for.
    pub fn max_data_bits(&self, max_frame: usize) -> usize {
        max_frame.saturating_sub(self.memory())
    }

    /// State reached from `state` after shifting in `bit`.
    #[inline]
    pub fn next_state(&self, state: usize, bit: bool) -> usize {
        ((state << 1) | bit as usize) & self.state_mask()
    }

    /// Symbol emitted when `bit` is shifted into `state`.
    #[inline]
    pub fn output_symbol(&self, state: usize, bit: bool) -> Symbol {
        let register = ((state << 1) | bit as usize) as u32;
        Symbol::from_bits(parity(register & self.g0), parity(register & self.g1))
    }

    /// The two states with a transition into `state`.
    ///
    /// Both predecessors enter `state` with the same input bit (`state & 1`);
    /// they differ only in the oldest register bit, which is dropped by the
    /// transition. Index 0 is the predecessor whose oldest bit is 0.
    #[inline]
    pub fn predecessors(&self, state: usize) -> [usize; 2] {
        let base = state >> 1;
        [base, base | (1 << (self.memory() - 1))]
    }

    pub(crate) fn check_state(&self, state: usize) -> Result<()> {
        if state >= self.num_states() {
            return Err(Error::InvalidState {
                state,
                num_states: self.num_states(),
            });
        }
        Ok(())
    }
}

impl Default for CodeParams {
    /// The K = 7 preset.
    fn default() -> Self {
        Self::k7()
    }
}
