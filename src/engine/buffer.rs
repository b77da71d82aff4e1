//! The built multi-level buffer

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::hierarchy::{Hierarchy, LevelLayout};

/// All hierarchy levels of one array, stacked in a single flat vector
///
/// Level `k` entry `j` lives at slot `j·b^(k-1)`; see [`LevelLayout`].
/// The raw array itself is not stored.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AggregateBuffer<T> {
    pub(crate) values: Vec<T>,
    pub(crate) data_len: usize,
    pub(crate) basis: usize,
    pub(crate) order: usize,
    pub(crate) levels: usize,
}

impl<T: Float> AggregateBuffer<T> {
    /// Flat buffer contents.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of flat slots (`⌊(n-1)/b⌋ + 1`).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the buffer has no slots.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Length `n` of the array this buffer was built from.
    pub fn data_len(&self) -> usize {
        self.data_len
    }

    /// Basis the buffer was built with.
    pub fn basis(&self) -> usize {
        self.basis
    }

    /// Order the buffer was built with.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of coarse levels stored.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Placement of level `k` (`1 ≤ k ≤ levels()`).
    pub fn level(&self, level: usize) -> Option<LevelLayout> {
        Hierarchy::new(self.basis, self.order).layout(level, self.data_len)
    }

    /// `(original position, value)` of every entry level `k` still owns.
    pub fn level_values(&self, level: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        self.level(level)
            .into_iter()
            .flat_map(move |layout| {
                (0..layout.count)
                    .filter(move |&j| layout.owns(j))
                    .map(move |j| (layout.position(j), self.values[layout.slot(j)]))
            })
    }

    /// blake3 hash of the parameters and contents.
    ///
    /// Advisory: lets callers detect a stale or foreign buffer.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for header in [self.basis, self.order, self.data_len, self.levels] {
            hasher.update(&(header as u64).to_le_bytes());
        }
        for v in &self.values {
            let bits = v.to_f64().unwrap_or(f64::NAN).to_bits();
            hasher.update(&bits.to_le_bytes());
        }
        hasher.finalize()
    }

    /// Mutable slot access for update propagation.
    pub(crate) fn slot_mut(&mut self, slot: usize) -> &mut T {
        &mut self.values[slot]
    }
}
