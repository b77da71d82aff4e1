//! Block-zone classification
//!
//! Every fine-level index rolls up into the next coarser level in one of
//! four ways:
//! - block start (`r = 0`): passes straight through to one coarse node
//! - left zone: first `N-1` blocks, one-sided stencil on nodes `0..2N`
//! - right zone: last `N` blocks, mirrored one-sided stencil
//! - interior: symmetric stencil on nodes `k-N+1 ..= k+N`
//!
//! Construction scatters along these taps, query interpolation gathers
//! along them and update propagation follows them; all three go through
//! [`BlockZone::classify`] so they cannot drift apart.

mod window;

pub use window::WindowBounds;

use num_traits::Float;

use crate::algebra::CoefficientTable;

/// Where a fine-level index sits relative to the coarse nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockZone {
    /// Block start; identical to coarse node `coarse`
    Node {
        /// Coarse node index
        coarse: usize,
    },
    /// Within `N-1` blocks of the left edge
    Left {
        /// Fine index (distance from the left edge)
        index: usize,
    },
    /// Within `N` blocks of the right edge
    Right {
        /// First of the `2N` trailing coarse nodes
        first: usize,
        /// Fine distance from the last fine index
        mirrored: usize,
    },
    /// Away from both edges
    Interior {
        /// Block number `k = i / b`
        block: usize,
        /// Position in block `r = i % b`
        offset: usize,
    },
}

impl BlockZone {
    /// Classify fine index `index` of a level holding `fine_len` entries.
    ///
    /// # Panics
    ///
    /// Panics if the coarse level would hold fewer than `2N` nodes.
    pub fn classify(index: usize, fine_len: usize, basis: usize, order: usize) -> Self {
        let coarse_len = fine_len.saturating_sub(1) / basis + 1;
        assert!(
            coarse_len >= 2 * order,
            "coarse level of {} entries cannot hold a stencil of {}",
            coarse_len,
            2 * order
        );

        let block = index / basis;
        let offset = index % basis;

        if offset == 0 {
            BlockZone::Node { coarse: block }
        } else if block + 1 < order {
            BlockZone::Left { index }
        } else if block + order >= coarse_len {
            BlockZone::Right {
                first: coarse_len - 2 * order,
                mirrored: (fine_len - 1).saturating_sub(index),
            }
        } else {
            BlockZone::Interior { block, offset }
        }
    }

    /// Weighted coarse nodes this zone reads from (or scatters into).
    pub fn stencil<'a, T: Float>(self, table: &'a CoefficientTable<T>) -> Stencil<'a, T> {
        Stencil {
            table,
            zone: self,
            next: 0,
        }
    }
}

/// Iterator over `(coarse node, weight)` taps of one fine index
#[derive(Debug, Clone)]
pub struct Stencil<'a, T> {
    table: &'a CoefficientTable<T>,
    zone: BlockZone,
    next: usize,
}

impl<'a, T: Float> Iterator for Stencil<'a, T> {
    type Item = (usize, T);

    fn next(&mut self) -> Option<Self::Item> {
        let width = match self.zone {
            BlockZone::Node { .. } => 1,
            _ => self.table.stencil_width(),
        };
        if self.next >= width {
            return None;
        }
        let j = self.next;
        self.next += 1;

        let order = self.table.order();
        let tap = match self.zone {
            BlockZone::Node { coarse } => (coarse, T::one()),
            BlockZone::Left { index } => (j, self.table.left_coefficient(j, index)),
            BlockZone::Right { first, mirrored } => (
                first + j,
                self.table.left_coefficient(width - 1 - j, mirrored),
            ),
            BlockZone::Interior { block, offset } => (
                block + 1 + j - order,
                self.table.coefficient(j as i64 + 1 - order as i64, offset),
            ),
        };
        Some(tap)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let width = match self.zone {
            BlockZone::Node { .. } => 1,
            _ => self.table.stencil_width(),
        };
        let left = width.saturating_sub(self.next);
        (left, Some(left))
    }
}

impl<'a, T: Float> ExactSizeIterator for Stencil<'a, T> {}
