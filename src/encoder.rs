//! Convolutional encoder.
//!
//! Each input bit is shifted into the register and produces one 2-bit symbol.
//! After the data, `M = K - 1` zero bits are shifted in so the register always
//! ends in state 0; the decoder relies on that tail to terminate its traceback.

use crate::code::{CodeParams, Symbol};
use crate::error::Result;

/// Incremental encoder holding the shift-register state between calls.
#[derive(Debug, Clone)]
pub struct ConvolutionalEncoder {
    params: CodeParams,
    state: usize,
}

impl ConvolutionalEncoder {
    /// Creates an encoder starting from state 0.
    pub fn new(params: CodeParams) -> Self {
        Self { params, state: 0 }
    }

    /// Creates an encoder starting from an explicit register state.
    pub fn with_state(params: CodeParams, state: usize) -> Result<Self> {
        params.check_state(state)?;
        Ok(Self { params, state })
    }

    pub fn params(&self) -> &CodeParams {
        &self.params
    }

    /// Current register state (the last M input bits, newest in the LSB).
    pub fn state(&self) -> usize {
        self.state
    }

    /// Shifts in one bit and returns its symbol.
    pub fn push_bit(&mut self, bit: bool) -> Symbol {
        let symbol = self.params.output_symbol(self.state, bit);
        self.state = self.params.next_state(self.state, bit);
        symbol
    }

    /// Emits the M tail symbols, returning the register to state 0.
    pub fn flush(&mut self) -> Vec<Symbol> {
        (0..self.params.memory())
            .map(|_| self.push_bit(false))
            .collect()
    }

    /// Encodes `bits` followed by the tail.
    pub fn encode_frame(&mut self, bits: &[bool]) -> Vec<Symbol> {
        let mut symbols = Vec::with_capacity(bits.len() + self.params.memory());
        symbols.extend(bits.iter().map(|&bit| self.push_bit(bit)));
        symbols.extend(self.flush());
        symbols
    }
}

/// Encodes `bits` from state 0 and appends the M tail symbols.
///
/// # Returns
///
/// `bits.len() + M` symbols.
pub fn encode(params: &CodeParams, bits: &[bool]) -> Vec<Symbol> {
    ConvolutionalEncoder::new(*params).encode_frame(bits)
}

/// Encodes `bits` starting from `initial_state`, then appends the tail.
///
/// Fails if `initial_state` is not a state of the trellis.
pub fn encode_with_state(
    params: &CodeParams,
    initial_state: usize,
    bits: &[bool],
) -> Result<Vec<Symbol>> {
    Ok(ConvolutionalEncoder::with_state(*params, initial_state)?.encode_frame(bits))
}
