//! Add-compare-select recursion.
//!
//! For every destination state `s` the two predecessors are `s >> 1` and
//! `(s >> 1) | 2^(M-1)`; both enter `s` with input bit `s & 1`. Each candidate
//! metric is the predecessor's path metric plus the Hamming distance between
//! the received symbol and the symbol that transition emits. The smaller
//! candidate survives and its index is recorded as the decision bit.
//!
//! Ties resolve to decision 0, the predecessor whose oldest register bit is 0.
//!
//! Path metrics start as `[0, UNREACHABLE, ...]` since the encoder always
//! starts in state 0. Additions saturate, so an unreachable predecessor can
//! never beat a reachable one and a state with two unreachable predecessors
//! stays unreachable.

use super::history::DecisionRow;
use crate::code::{CodeParams, Symbol};

/// Accumulated Hamming distance of a survivor path.
pub type Metric = u32;

/// Metric of a state no path can have reached.
pub const UNREACHABLE: Metric = Metric::MAX;

#[inline]
pub fn is_reachable(metric: Metric) -> bool {
    metric != UNREACHABLE
}

#[derive(Debug, Clone, Copy)]
struct Branches {
    predecessors: [usize; 2],
    expected: [Symbol; 2],
}

/// Per-state predecessor and expected-symbol lookup, built once per code.
#[derive(Debug, Clone)]
pub struct TrellisTable {
    branches: Vec<Branches>,
}

impl TrellisTable {
    pub fn new(params: &CodeParams) -> Self {
        let branches = (0..params.num_states())
            .map(|state| {
                let bit = state & 1 == 1;
                let predecessors = params.predecessors(state);
                Branches {
                    predecessors,
                    expected: predecessors.map(|p| params.output_symbol(p, bit)),
                }
            })
            .collect();
        Self { branches }
    }

    pub fn num_states(&self) -> usize {
        self.branches.len()
    }

    pub fn predecessors(&self, state: usize) -> [usize; 2] {
        self.branches[state].predecessors
    }

    /// Symbols emitted on the transitions from each predecessor into `state`.
    pub fn expected(&self, state: usize) -> [Symbol; 2] {
        self.branches[state].expected
    }
}

/// One ACS step.
///
/// Reads the current path metrics, writes the updated metrics to `next` and
/// one decision bit per destination state to `decisions`. All three slices
/// must have `table.num_states()` entries.
pub fn acs_step(
    table: &TrellisTable,
    metrics: &[Metric],
    received: Symbol,
    next: &mut [Metric],
    decisions: &mut DecisionRow,
) {
    debug_assert_eq!(metrics.len(), table.num_states());
    debug_assert_eq!(next.len(), table.num_states());
    debug_assert_eq!(decisions.len(), table.num_states());

    for (state, branch) in table.branches.iter().enumerate() {
        let [p0, p1] = branch.predecessors;
        let m0 = metrics[p0].saturating_add(received.distance(branch.expected[0]));
        let m1 = metrics[p1].saturating_add(received.distance(branch.expected[1]));

        let take_p1 = m1 < m0;
        next[state] = if take_p1 { m1 } else { m0 };
        decisions.set(state, take_p1);
    }
}

/// Path-metric state of the trellis for the frame in progress.
#[derive(Debug, Clone)]
pub struct AcsEngine {
    table: TrellisTable,
    metrics: Vec<Metric>,
    scratch: Vec<Metric>,
    steps: usize,
}

impl AcsEngine {
    /// Creates an engine already reset for a new frame.
    pub fn new(params: &CodeParams) -> Self {
        let num_states = params.num_states();
        let mut engine = Self {
            table: TrellisTable::new(params),
            metrics: vec![UNREACHABLE; num_states],
            scratch: vec![UNREACHABLE; num_states],
            steps: 0,
        };
        engine.reset();
        engine
    }

    /// State 0 becomes the only valid origin.
    pub fn reset(&mut self) {
        self.metrics.fill(UNREACHABLE);
        self.metrics[0] = 0;
        self.steps = 0;
    }

    /// Runs one ACS step for `received`, writing the decision row.
    pub fn step(&mut self, received: Symbol, decisions: &mut DecisionRow) {
        acs_step(
            &self.table,
            &self.metrics,
            received,
            &mut self.scratch,
            decisions,
        );
        std::mem::swap(&mut self.metrics, &mut self.scratch);
        self.steps += 1;
        log::trace!(
            "acs step {}: received {}, metrics {:?}",
            self.steps,
            received,
            self.metrics
        );
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Number of symbols processed since the last reset.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn table(&self) -> &TrellisTable {
        &self.table
    }

    /// State with the smallest metric (lowest index on ties) and that metric,
    /// or `None` if no state is reachable.
    pub fn best_state(&self) -> Option<(usize, Metric)> {
        best_state(&self.metrics)
    }
}

/// Argmin over reachable metrics, lowest index first.
pub fn best_state(metrics: &[Metric]) -> Option<(usize, Metric)> {
    metrics
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, metric)| is_reachable(metric))
        .min_by_key(|&(state, metric)| (metric, state))
}
