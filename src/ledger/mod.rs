//! Pending-delta ledger
//!
//! Tracks deltas still waiting to be pushed up the hierarchy during an
//! update. Keyed by original position; deltas landing on the same
//! position coalesce additively. Ordered so propagation is deterministic.

use std::collections::BTreeMap;

use num_traits::Float;

/// Ordered map from original position to pending delta
#[derive(Debug, Clone, Default)]
pub struct DeltaLedger<T> {
    pending: BTreeMap<usize, T>,
}

impl<T: Float> DeltaLedger<T> {
    /// Empty ledger
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
        }
    }

    /// Add `delta` at `position`, coalescing with anything already there.
    pub fn add(&mut self, position: usize, delta: T) {
        let slot = self.pending.entry(position).or_insert_with(T::zero);
        *slot = *slot + delta;
    }

    /// Remove and return the delta at `position`.
    pub fn take(&mut self, position: usize) -> Option<T> {
        self.pending.remove(&position)
    }

    /// Delta currently pending at `position`.
    pub fn get(&self, position: usize) -> Option<T> {
        self.pending.get(&position).copied()
    }

    /// Pending entries in position order, copied out so the ledger can be
    /// mutated while walking them.
    pub fn snapshot(&self) -> Vec<(usize, T)> {
        self.pending.iter().map(|(&p, &d)| (p, d)).collect()
    }

    /// Number of distinct pending positions.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Consume the ledger in position order.
    pub fn drain(self) -> impl Iterator<Item = (usize, T)> {
        self.pending.into_iter()
    }
}

impl<T: Float> FromIterator<(usize, T)> for DeltaLedger<T> {
    fn from_iter<I: IntoIterator<Item = (usize, T)>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for (position, delta) in iter {
            ledger.add(position, delta);
        }
        ledger
    }
}
