//! Buffer construction

use num_traits::Float;
use tracing::{debug, trace};

use super::{AggregateBuffer, HierarchicalBuffer};
use crate::{blocking::BlockZone, source::DataSource, OlaError};

impl<T: Float> HierarchicalBuffer<T> {
    /// Build the multi-level buffer for `source`.
    ///
    /// Reads every element once. Fails with [`OlaError::TooSmall`] when the
    /// base level cannot hold `2N` blocks and with
    /// [`OlaError::BasisLengthMismatch`] when `(n-1)` is not a multiple of
    /// the top scale (see [`recommended_padded_length`]).
    ///
    /// [`recommended_padded_length`]: Self::recommended_padded_length
    pub fn build<S>(&self, source: &S) -> Result<AggregateBuffer<T>, OlaError>
    where
        S: DataSource<T> + ?Sized,
    {
        let len = source.len();
        let basis = self.basis();
        let top = self.levels(len);
        if top == 0 {
            return Err(OlaError::TooSmall {
                len,
                required: self.min_buildable_len(),
            });
        }
        let top_scale = self.hierarchy.scale(top);
        if (len - 1) % top_scale != 0 {
            return Err(OlaError::BasisLengthMismatch {
                len,
                scale: top_scale,
            });
        }

        let mut values = vec![T::zero(); self.hierarchy.buffer_len(len)];
        let mut level = self.transform_once(len, |i| source.value(i))?;
        values[..level.len()].copy_from_slice(&level);
        trace!(depth = 1, entries = level.len(), "reduced level");

        for k in 2..=top {
            level = self.transform_once(level.len(), |i| level[i])?;
            let stride = self.hierarchy.scale(k - 1);
            for (j, v) in level.iter().enumerate() {
                values[j * stride] = *v;
            }
            trace!(depth = k, entries = level.len(), "reduced level");
        }

        debug!(len, levels = top, slots = values.len(), "built aggregate buffer");
        Ok(AggregateBuffer {
            values,
            data_len: len,
            basis,
            order: self.order(),
            levels: top,
        })
    }

    /// One reduction step: scatter `fine_len` values onto the coarse nodes.
    fn transform_once<F>(&self, fine_len: usize, fine: F) -> Result<Vec<T>, OlaError>
    where
        F: Fn(usize) -> T,
    {
        let (basis, order) = (self.basis(), self.order());
        let coarse_len = fine_len.saturating_sub(1) / basis + 1;
        if coarse_len < 2 * order {
            return Err(OlaError::TooSmall {
                len: fine_len,
                required: self.hierarchy.min_len(),
            });
        }

        let mut coarse = vec![T::zero(); coarse_len];
        for i in 0..fine_len {
            let v = fine(i);
            if self.config.skip_zeros && v == T::zero() {
                continue;
            }
            for (node, w) in BlockZone::classify(i, fine_len, basis, order).stencil(&self.table) {
                coarse[node] = coarse[node] + w * v;
            }
        }
        Ok(coarse)
    }
}
