//! Error types shared by the encoder, the trellis engine and the packing adapter.

use thiserror::Error;

/// Errors returned by the codec.
///
/// Caller-policy violations (overflowing a frame, starting a frame that cannot
/// carry a tail, reading a bit that is not valid yet) are surfaced here so they
/// can be tested deterministically. The tick-level interface never returns
/// these; it simply ignores transfers the handshake does not allow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Generic invalid parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Only K = 3, 5 and 7 are supported
    #[error("Unsupported constraint length {0} (expected 3, 5 or 7)")]
    UnsupportedConstraintLength(usize),

    /// A generator polynomial is zero or wider than the constraint length
    #[error("Generator polynomial {index} ({polynomial:#o}) is not valid for constraint length {constraint_length}")]
    InvalidGenerator {
        index: usize,
        polynomial: u32,
        constraint_length: usize,
    },

    /// A symbol value does not fit in two bits
    #[error("Invalid symbol value {0} (symbols are 2 bits wide)")]
    InvalidSymbol(u8),

    /// A shift-register state outside the trellis
    #[error("State {state} is outside the trellis ({num_states} states)")]
    InvalidState { state: usize, num_states: usize },

    /// More symbols than the frame buffer can hold
    #[error("Frame overflow: {length} symbols exceeds the maximum of {max_length}")]
    FrameOverflow { length: usize, max_length: usize },

    /// Start requested with no buffered symbols
    #[error("Cannot decode an empty frame")]
    EmptyFrame,

    /// Start requested before a full tail could have been received
    #[error("Short frame: {length} symbols, at least {min_length} required for the tail")]
    ShortFrame { length: usize, min_length: usize },

    /// The engine is not in a phase that allows the request
    #[error("Decoder not ready: {0}")]
    NotReady(&'static str),

    /// A decoded bit was requested while output-valid is low
    #[error("No decoded bit is valid")]
    OutputNotValid,
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;
