//! Rate-1/2 convolutional encoder and hard-decision Viterbi decoder.
//!
//! Supports constraint lengths 3, 5 and 7 with arbitrary generator pairs and
//! zero-tail frame termination.

pub mod code;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod packing;
pub mod prbs;

pub use code::{CodeParams, Symbol, MAX_FRAME};
pub use decoder::{decode, DecoderConfig, FrameDecode, TracebackStart, ViterbiDecoder};
pub use encoder::{encode, ConvolutionalEncoder};
pub use error::{Error, Result};
pub use packing::PackedDecoder;
