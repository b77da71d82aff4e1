//! Hierarchical aggregation engine
//!
//! Owns the `(b, N)` parameters and the coefficient table; builds,
//! queries and updates [`AggregateBuffer`]s:
//! - `build`: O(n) multi-level Lagrange reduction
//! - `query`: O(b·log_b n) boundary corrections plus top-level walk
//! - `update`: O(b·log_b n) delta propagation through the same stencils

mod buffer;
mod build;
mod query;
mod update;

pub use buffer::AggregateBuffer;

use num_traits::Float;

use crate::{
    algebra::{CoefficientTable, RangedFunction},
    blocking::BlockZone,
    hierarchy::Hierarchy,
    OlaConfig, OlaError,
};

/// Build/query/update engine for one `(basis, order)` pair
///
/// Holds no data; one engine serves any number of buffers.
#[derive(Debug, Clone)]
pub struct HierarchicalBuffer<T> {
    config: OlaConfig,
    hierarchy: Hierarchy,
    table: CoefficientTable<T>,
}

impl<T: Float> HierarchicalBuffer<T> {
    /// Engine with default settings for basis `b > 1` and order `N > 0`.
    pub fn new(basis: usize, order: usize) -> Result<Self, OlaError> {
        Self::with_config(OlaConfig::new(basis, order)?)
    }

    /// Engine from an explicit configuration.
    pub fn with_config(config: OlaConfig) -> Result<Self, OlaError> {
        config.validate()?;
        Ok(Self {
            hierarchy: Hierarchy::new(config.basis, config.order),
            table: CoefficientTable::new(config.basis, config.order),
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &OlaConfig {
        &self.config
    }

    /// Block size `b`.
    pub fn basis(&self) -> usize {
        self.config.basis
    }

    /// Moment order `N`.
    pub fn order(&self) -> usize {
        self.config.order
    }

    /// Shared interpolation weights.
    pub fn table(&self) -> &CoefficientTable<T> {
        &self.table
    }

    /// Level arithmetic.
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Hierarchy height for an array of length `len`.
    pub fn levels(&self, len: usize) -> usize {
        self.hierarchy.levels(len)
    }

    /// Smallest length `≥ len` that `build` accepts without a basis
    /// mismatch.
    pub fn recommended_padded_length(&self, len: usize) -> usize {
        self.hierarchy.padded_length(len)
    }

    /// Shortest array `build` accepts, `(2N - 1)·b + 1`.
    pub fn min_buildable_len(&self) -> usize {
        self.hierarchy.min_len()
    }

    /// Highest polynomial degree answered exactly: every stencil has `2N`
    /// nodes, so degree `2N - 1`.
    pub fn max_exact_degree(&self) -> usize {
        2 * self.order() - 1
    }

    /// What `f` looks like at `index` when seen through the stencils of
    /// scale `scale` over an array of length `len`.
    ///
    /// Block starts return `f(index)`; other indices return the weighted
    /// combination of `f` at the `2N` coarse nodes of their zone.
    ///
    /// # Panics
    ///
    /// Panics if the next coarser level holds fewer than `2N` nodes.
    pub fn interpolate<F>(&self, index: usize, scale: usize, f: &F, len: usize) -> T
    where
        F: RangedFunction<T> + ?Sized,
    {
        let fine_len = len.saturating_sub(1) / scale + 1;
        let span = scale * self.basis();
        BlockZone::classify(index / scale, fine_len, self.basis(), self.order())
            .stencil(&self.table)
            .fold(T::zero(), |acc, (node, w)| acc + w * f.eval(node * span))
    }
}
