//! Traceback over a complete decision history.

use super::acs::{best_state, is_reachable, Metric};
use super::history::DecisionHistory;

/// How the traceback picks its starting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracebackStart {
    /// State with the smallest final path metric, lowest index on ties.
    #[default]
    BestMetric,
    /// Always state 0, skipping the search. Valid whenever the frame carries a
    /// full zero tail; used to check the decoder against a terminated reference.
    ZeroState,
}

impl TracebackStart {
    /// Selects the starting state from the final path metrics.
    pub fn resolve(self, metrics: &[Metric]) -> usize {
        let state = match self {
            TracebackStart::BestMetric => best_state(metrics).map_or(0, |(state, _)| state),
            TracebackStart::ZeroState => 0,
        };

        // State 0 is reachable after any number of steps from the reset
        // configuration, so this only fails if the metrics were corrupted.
        let reachable = metrics.get(state).copied().is_some_and(is_reachable);
        if !reachable {
            log::error!("traceback starting from unreachable state {}", state);
        }
        debug_assert!(reachable, "unreachable terminal state {}", state);
        state
    }
}

/// Walks the history backward from `start_state` and returns the decoded bits.
///
/// `memory` is the tail length M. See [`traceback_into`].
pub fn traceback(history: &DecisionHistory, memory: usize, start_state: usize) -> Vec<bool> {
    let mut bits = Vec::with_capacity(history.len().saturating_sub(memory));
    traceback_into(history, memory, start_state, &mut bits);
    bits
}

/// Walks the history backward from `start_state`, writing the decoded bits to
/// `out` (cleared first).
///
/// Visits every recorded step exactly once, last to first. The bit of the
/// transition into state `s` is `s & 1`; the decision bit for `s` picks the
/// predecessor `s >> 1` (0) or `(s >> 1) | 2^(M-1)` (1). Bits reconstructed in
/// the last `memory` steps belong to the tail and are dropped, leaving
/// `history.len() - memory` bits in transmission order.
pub fn traceback_into(
    history: &DecisionHistory,
    memory: usize,
    start_state: usize,
    out: &mut Vec<bool>,
) {
    let steps = history.len();
    let data_len = steps.saturating_sub(memory);
    let oldest_bit = 1 << (memory - 1);

    out.clear();
    out.resize(data_len, false);

    let mut state = start_state;
    for step in (0..steps).rev() {
        if step < data_len {
            out[step] = state & 1 == 1;
        }
        let base = state >> 1;
        state = if history.decision(step, state) {
            base | oldest_bit
        } else {
            base
        };
    }

    log::trace!(
        "traceback from state {} over {} steps ended in state {}",
        start_state,
        steps,
        state
    );
}
