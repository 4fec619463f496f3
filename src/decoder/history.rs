//! Decision history: one survivor bit per (step, state).
//!
//! Stored as a single flat bit vector sized `capacity * num_states` up front,
//! so recording a step never allocates. Row `t` occupies bits
//! `t * num_states .. (t + 1) * num_states`.

use bitvec::prelude::*;

/// One step's worth of decision bits, indexed by destination state.
pub type DecisionRow = BitSlice<usize, Lsb0>;

#[derive(Debug, Clone)]
pub struct DecisionHistory {
    num_states: usize,
    capacity: usize,
    len: usize,
    bits: BitVec<usize, Lsb0>,
}

impl DecisionHistory {
    /// Allocates room for `capacity` steps of a trellis with `num_states` states.
    pub fn new(num_states: usize, capacity: usize) -> Self {
        Self {
            num_states,
            capacity,
            len: 0,
            bits: bitvec![usize, Lsb0; 0; num_states * capacity],
        }
    }

    /// Largest capacity whose `num_states * capacity` bits fit in one vector.
    pub fn max_capacity(num_states: usize) -> usize {
        DecisionRow::MAX_BITS / num_states.max(1)
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Forgets every recorded step. Storage is kept; rows are overwritten in
    /// full by the next `push_row`.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Appends a step and returns its row for the ACS engine to fill, or
    /// `None` if the history is full.
    pub fn push_row(&mut self) -> Option<&mut DecisionRow> {
        if self.is_full() {
            return None;
        }
        let start = self.len * self.num_states;
        self.len += 1;
        Some(&mut self.bits[start..start + self.num_states])
    }

    /// Decision row of a recorded step.
    ///
    /// # Panics
    ///
    /// Panics if `step >= len()`.
    pub fn row(&self, step: usize) -> &DecisionRow {
        assert!(step < self.len, "step {} not recorded", step);
        let start = step * self.num_states;
        &self.bits[start..start + self.num_states]
    }

    /// Decision bit for `state` at `step`: `true` selects the predecessor
    /// whose oldest register bit is 1.
    #[inline]
    pub fn decision(&self, step: usize, state: usize) -> bool {
        debug_assert!(step < self.len && state < self.num_states);
        self.bits[step * self.num_states + state]
    }
}
