//! Hard-decision Viterbi decoder.
//!
//! The decoder is split the way the hardware it models is:
//!
//! - [`acs`]: add-compare-select recursion over path metrics
//! - [`history`]: fixed-capacity decision-bit storage
//! - [`traceback`]: backward reconstruction from a terminal state
//! - [`control`]: the tick-driven state machine and its handshake
//!
//! [`decode`] runs a whole frame through ACS and traceback in one call, for
//! callers that do not need the handshake.
//!
//! # Examples
//!
//! ```rust
//! use viterbi_fec::{encode, CodeParams, ViterbiDecoder};
//!
//! let params = CodeParams::k5();
//! let bits = vec![true, false, true, true, false, true, false, false];
//! let mut symbols = encode(&params, &bits);
//! symbols[2] = symbols[2].flipped(0);
//!
//! let mut decoder = ViterbiDecoder::with_params(params).unwrap();
//! assert_eq!(decoder.decode_frame(&symbols).unwrap(), bits);
//! ```

pub mod acs;
pub mod control;
pub mod history;
pub mod traceback;

pub use acs::{AcsEngine, Metric, TrellisTable, UNREACHABLE};
pub use control::{DecoderConfig, FrameReport, Inputs, Phase, Status, ViterbiDecoder};
pub use history::DecisionHistory;
pub use traceback::{traceback, TracebackStart};

use crate::code::{CodeParams, Symbol};
use crate::error::{Error, Result};

/// Result of decoding one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDecode {
    /// Decoded data bits, tail removed
    pub bits: Vec<bool>,
    /// State the traceback started from
    pub terminal_state: usize,
    /// Final path metric of that state (lower is better)
    pub path_metric: Metric,
}

/// Decodes a complete frame of symbols, tail included.
///
/// # Arguments
///
/// * `params` - Code the symbols were encoded with
/// * `symbols` - Received frame; not bounded by a maximum frame length
/// * `start` - Traceback starting strategy
///
/// # Returns
///
/// `symbols.len() - M` decoded bits with the terminal state and its metric,
/// or an error for an empty frame or one shorter than the tail.
pub fn decode(
    params: &CodeParams,
    symbols: &[Symbol],
    start: TracebackStart,
) -> Result<FrameDecode> {
    if symbols.is_empty() {
        return Err(Error::EmptyFrame);
    }
    if symbols.len() < params.memory() {
        return Err(Error::ShortFrame {
            length: symbols.len(),
            min_length: params.memory(),
        });
    }

    let mut engine = AcsEngine::new(params);
    let mut history = DecisionHistory::new(params.num_states(), symbols.len());
    for &symbol in symbols {
        // Sized to the frame: a row is always free
        if let Some(row) = history.push_row() {
            engine.step(symbol, row);
        }
    }

    let terminal_state = start.resolve(engine.metrics());
    Ok(FrameDecode {
        bits: traceback(&history, params.memory(), terminal_state),
        terminal_state,
        path_metric: engine.metrics()[terminal_state],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{MAX_FRAME, SUPPORTED_CONSTRAINT_LENGTHS};
    use crate::encoder::encode;
    use crate::prbs::prbs7;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn patterns(len: usize) -> Vec<(&'static str, Vec<bool>)> {
        let mut single_end = vec![false; len];
        single_end[len - 1] = true;
        let mut single_start = vec![false; len];
        single_start[0] = true;

        vec![
            ("all_zeros", vec![false; len]),
            ("all_ones", vec![true; len]),
            ("alt_10", (0..len).map(|i| i % 2 == 0).collect()),
            ("alt_01", (0..len).map(|i| i % 2 == 1).collect()),
            ("single_1_start", single_start),
            ("single_1_end", single_end),
            ("burst_1100", (0..len).map(|i| i % 4 < 2).collect()),
            ("prbs7", prbs7(len)),
        ]
    }

    fn symbol_distance(a: &[Symbol], b: &[Symbol]) -> u32 {
        a.iter().zip(b).map(|(x, y)| x.distance(*y)).sum()
    }

    fn bits_of(word: u32, len: usize) -> Vec<bool> {
        (0..len).map(|i| (word >> i) & 1 == 1).collect()
    }

    #[test]
    fn test_round_trip_all_patterns() {
        for &k in &SUPPORTED_CONSTRAINT_LENGTHS {
            let params = CodeParams::preset(k).unwrap();
            let max_data = params.max_data_bits(MAX_FRAME);
            let mut decoder = ViterbiDecoder::with_params(params).unwrap();

            for len in [8, 16, max_data] {
                for (name, bits) in patterns(len) {
                    let symbols = encode(&params, &bits);
                    assert!(symbols.len() <= MAX_FRAME);

                    let pure = decode(&params, &symbols, TracebackStart::BestMetric).unwrap();
                    assert_eq!(pure.bits, bits, "K={} {} len={}", k, name, len);
                    assert_eq!(pure.path_metric, 0);
                    assert_eq!(pure.terminal_state, 0);

                    let streamed = decoder.decode_frame(&symbols).unwrap();
                    assert_eq!(streamed, bits, "K={} {} len={} (streamed)", k, name, len);
                }
            }
        }
    }

    #[test]
    fn test_zero_state_traceback_agrees_on_clean_frames() {
        for &k in &SUPPORTED_CONSTRAINT_LENGTHS {
            let params = CodeParams::preset(k).unwrap();
            let config = DecoderConfig::new(params).with_traceback_start(TracebackStart::ZeroState);
            let mut forced = ViterbiDecoder::new(config).unwrap();
            let mut searched = ViterbiDecoder::with_params(params).unwrap();

            for (_, bits) in patterns(16) {
                let symbols = encode(&params, &bits);
                let a = forced.decode_frame(&symbols).unwrap();
                let b = searched.decode_frame(&symbols).unwrap();
                assert_eq!(a, b);
                assert_eq!(a, bits);
                assert_eq!(forced.last_report().unwrap().terminal_state, 0);
            }
        }
    }

    #[test]
    fn test_decode_errors() {
        let params = CodeParams::k5();
        assert_eq!(
            decode(&params, &[], TracebackStart::BestMetric),
            Err(Error::EmptyFrame)
        );
        assert_eq!(
            decode(&params, &[Symbol::ZERO; 2], TracebackStart::BestMetric),
            Err(Error::ShortFrame {
                length: 2,
                min_length: 4
            })
        );
        // Exactly the tail: valid frame without data bits
        let tail_only = decode(&params, &[Symbol::ZERO; 4], TracebackStart::BestMetric).unwrap();
        assert!(tail_only.bits.is_empty());
    }

    #[test]
    fn test_long_frames_decode_without_frame_limit() {
        let params = CodeParams::k7();
        let bits = prbs7(300);
        let symbols = encode(&params, &bits);
        let result = decode(&params, &symbols, TracebackStart::BestMetric).unwrap();
        assert_eq!(result.bits, bits);
        assert_eq!(result.terminal_state, 0);
        assert_eq!(result.path_metric, 0);
    }

    #[test]
    fn test_known_noisy_vectors() {
        // K=3, data 10110100: clean 11 10 00 01 01 00 10 11 00 00
        let params = CodeParams::k3();
        let bits = [true, false, true, true, false, true, false, false];
        let mut symbols = encode(&params, &bits);
        assert_eq!(symbols.len(), 10);

        symbols[2] = symbols[2].flipped(0);
        let result = decode(&params, &symbols, TracebackStart::BestMetric).unwrap();
        assert_eq!(result.bits, bits);
        assert_eq!(result.path_metric, 1);

        // Two flips stay within the correction radius of a d_free = 5 code
        symbols[8] = symbols[8].flipped(1);
        let result = decode(&params, &symbols, TracebackStart::ZeroState).unwrap();
        assert_eq!(result.bits, bits);
        assert_eq!(result.path_metric, 2);
    }

    #[test]
    fn test_single_flip_corrected() {
        let bits = [true, false, true, true, false, true, false, false];
        for &k in &SUPPORTED_CONSTRAINT_LENGTHS {
            let params = CodeParams::preset(k).unwrap();
            let clean = encode(&params, &bits);
            for index in 0..clean.len() {
                for bit in 0..2 {
                    let mut noisy = clean.clone();
                    noisy[index] = noisy[index].flipped(bit);
                    let result = decode(&params, &noisy, TracebackStart::BestMetric).unwrap();
                    assert_eq!(result.bits, bits, "K={} flip {}:{}", k, index, bit);
                    assert_eq!(result.path_metric, 1);
                }
            }
        }
    }

    #[test]
    fn test_noisy_decode_is_maximum_likelihood() {
        // Brute force over every 8-bit data word: the decoder's output must
        // re-encode to a codeword at minimum distance from what was received.
        const LEN: usize = 8;
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for &k in &SUPPORTED_CONSTRAINT_LENGTHS {
            let params = CodeParams::preset(k).unwrap();
            let codebook: Vec<(Vec<bool>, Vec<Symbol>)> = (0..1u32 << LEN)
                .map(|word| {
                    let bits = bits_of(word, LEN);
                    let symbols = encode(&params, &bits);
                    (bits, symbols)
                })
                .collect();

            for _ in 0..40 {
                let (sent, clean) = &codebook[rng.gen_range(0..codebook.len())];
                let mut received = clean.clone();
                for _ in 0..rng.gen_range(1..=4) {
                    let index = rng.gen_range(0..received.len());
                    received[index] = received[index].flipped(rng.gen_range(0..2));
                }

                let best = codebook
                    .iter()
                    .map(|(_, symbols)| symbol_distance(symbols, &received))
                    .min()
                    .unwrap();
                let winners: Vec<&Vec<bool>> = codebook
                    .iter()
                    .filter(|(_, symbols)| symbol_distance(symbols, &received) == best)
                    .map(|(bits, _)| bits)
                    .collect();

                // Every codeword ends in state 0, so the survivor there is the
                // nearest codeword.
                let result = decode(&params, &received, TracebackStart::ZeroState).unwrap();
                let reencoded = encode(&params, &result.bits);
                assert_eq!(symbol_distance(&reencoded, &received), best);
                assert_eq!(result.path_metric, best);
                assert_eq!(result.terminal_state, 0);
                if winners.len() == 1 {
                    assert_eq!(&result.bits, winners[0]);
                }
                // Few flips against free distance >= 5: the sent word is recovered
                let flips = symbol_distance(clean, &received);
                if 2 * flips < 5 {
                    assert_eq!(&result.bits, sent);
                }
            }
        }
    }
}
