//! Lagrange weights for the block hierarchy
//!
//! Two families, both ratios of products of linear factors:
//! - interior `DD(m, r)` over the symmetric node window `[1-N, N]`
//! - left-edge `left(m, r)` over the one-sided window `[0, 2N-1]`
//!
//! Right-edge weights reuse `left` with mirrored node and position.

use num_traits::Float;

/// Lagrange basis polynomial for `node` over `nodes`, evaluated at `x`.
fn lagrange_weight(x: f64, node: i64, nodes: impl Iterator<Item = i64> + Clone) -> f64 {
    let numerator = nodes
        .clone()
        .filter(|&l| l != node)
        .fold(1.0, |acc, l| acc * (x - l as f64));
    let denominator = nodes
        .filter(|&l| l != node)
        .fold(1.0, |acc, l| acc * (node - l) as f64);
    numerator / denominator
}

/// Precomputed interpolation weights for a `(basis, order)` pair
///
/// Immutable once built; safe to share between buffers.
#[derive(Debug, Clone)]
pub struct CoefficientTable<T> {
    basis: usize,
    order: usize,
    /// Row-major `2N × b`: row `m + N - 1`, column `r`
    interior: Vec<T>,
}

impl<T: Float> CoefficientTable<T> {
    /// Build the interior table for basis `b > 1` and order `N > 0`.
    ///
    /// # Panics
    ///
    /// Panics if `basis < 2` or `order == 0`.
    pub fn new(basis: usize, order: usize) -> Self {
        assert!(basis > 1, "basis must exceed 1, got {}", basis);
        assert!(order > 0, "order must be positive");

        let n = order as i64;
        let b = basis as f64;
        let mut interior = Vec::with_capacity(2 * order * basis);
        for m in (1 - n)..=n {
            for r in 0..basis {
                let w = lagrange_weight(r as f64 / b, m, (1 - n)..=n);
                interior.push(T::from(w).unwrap_or_else(T::nan));
            }
        }

        Self {
            basis,
            order,
            interior,
        }
    }

    /// Block size `b`.
    #[inline]
    pub fn basis(&self) -> usize {
        self.basis
    }

    /// Moment order `N`.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of nodes in every stencil (`2N`).
    #[inline]
    pub fn stencil_width(&self) -> usize {
        2 * self.order
    }

    /// Interior weight `DD(m, r)` for `m ∈ [1-N, N]`, `r ∈ [0, b)`.
    ///
    /// # Panics
    ///
    /// Panics when `(m, r)` lies outside the table.
    #[inline]
    pub fn coefficient(&self, m: i64, r: usize) -> T {
        let n = self.order as i64;
        assert!(
            (1 - n..=n).contains(&m) && r < self.basis,
            "interior coefficient ({}, {}) outside [{}, {}] x [0, {})",
            m,
            r,
            1 - n,
            n,
            self.basis
        );
        self.interior[(m + n - 1) as usize * self.basis + r]
    }

    /// Left-edge weight `left(m, r)` for `m ∈ [0, 2N)`.
    ///
    /// `r` is the fine-level index measured from the edge; the node
    /// spacing is `b`, so the evaluation point is `r / b`.
    ///
    /// # Panics
    ///
    /// Panics when `m ≥ 2N`.
    pub fn left_coefficient(&self, m: usize, r: usize) -> T {
        let width = self.stencil_width();
        assert!(
            m < width,
            "left coefficient node {} outside [0, {})",
            m,
            width
        );
        let w = lagrange_weight(
            r as f64 / self.basis as f64,
            m as i64,
            0..width as i64,
        );
        T::from(w).unwrap_or_else(T::nan)
    }
}
