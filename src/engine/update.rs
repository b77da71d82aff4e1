//! Point updates
//!
//! A delta at position `p` changes every coarse entry whose stencil reads
//! `p`. Pending deltas ride up the hierarchy in a [`DeltaLedger`]; at each
//! scale the ones off the coarse grid are scattered along the same taps
//! construction used and then written into their own slot.

use num_traits::Float;
use tracing::{debug, trace};

use super::{AggregateBuffer, HierarchicalBuffer};
use crate::{blocking::BlockZone, ledger::DeltaLedger, OlaError};

impl<T: Float> HierarchicalBuffer<T> {
    /// Reflect `data[position] += delta` in `buffer` without rebuilding.
    ///
    /// The caller applies the same change to its data source; the buffer
    /// then matches a fresh `build` of the updated array.
    pub fn update(
        &self,
        buffer: &mut AggregateBuffer<T>,
        position: usize,
        delta: T,
    ) -> Result<(), OlaError> {
        self.update_many(buffer, &[(position, delta)])
    }

    /// Apply several point deltas in one pass.
    ///
    /// Deltas on the same position coalesce first; the result equals
    /// calling [`update`](Self::update) once per entry.
    pub fn update_many(
        &self,
        buffer: &mut AggregateBuffer<T>,
        deltas: &[(usize, T)],
    ) -> Result<(), OlaError> {
        self.check_buffer(buffer)?;
        let len = buffer.data_len();
        if let Some(&(position, _)) = deltas.iter().find(|(p, _)| *p >= len) {
            return Err(OlaError::PositionOutOfRange { position, len });
        }

        let ledger: DeltaLedger<T> = deltas.iter().copied().collect();
        debug!(positions = ledger.len(), "propagating point updates");
        self.propagate(buffer, ledger);
        Ok(())
    }

    fn propagate(&self, buffer: &mut AggregateBuffer<T>, mut ledger: DeltaLedger<T>) {
        let basis = self.basis();
        let order = self.order();
        let len = buffer.data_len();

        for level in 0..self.levels(len) {
            let scale = self.hierarchy.scale(level);
            let span = scale * basis;
            let fine_len = (len - 1) / scale + 1;

            for (index, value) in ledger.snapshot() {
                let fine = index / scale;
                if fine % basis == 0 {
                    continue;
                }
                let zone = BlockZone::classify(fine, fine_len, basis, order);
                for (node, w) in zone.stencil(&self.table) {
                    ledger.add(node * span, w * value);
                }
                if level >= 1 {
                    let slot = buffer.slot_mut(index / basis);
                    *slot = *slot + value;
                }
                ledger.take(index);
            }
            trace!(scale, pending = ledger.len(), "propagated scale");
        }

        for (index, value) in ledger.drain() {
            let slot = buffer.slot_mut(index / basis);
            *slot = *slot + value;
        }
    }
}
