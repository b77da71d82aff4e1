//! Ranged query functionals
//!
//! A query is a scalar product ⟨f, data⟩ where f is a low-degree
//! polynomial that vanishes outside a half-open range [start, end).
//! Degree d = 0, 1, 2, 3 gives range sums and first/second/third moments.

use std::fmt;

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::source::DataSource;

/// Highest degree a [`RangedPolynomial`] can carry.
pub const MAX_DEGREE: usize = 3;

/// Capability required from a query functional.
///
/// Evaluates at integer positions and carries its own support
/// `[start, end)`; outside the support the value must be zero.
pub trait RangedFunction<T> {
    /// First position of the support (inclusive).
    fn start(&self) -> usize;

    /// One past the last position of the support.
    fn end(&self) -> usize;

    /// Polynomial degree of the functional inside its support.
    fn degree(&self) -> usize;

    /// Value at `x`; zero when `x` lies outside `[start, end)`.
    fn eval(&self, x: usize) -> T;
}

/// `a0 + a1·x + a2·x² + a3·x³` on `[start, end)`, zero elsewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangedPolynomial<T> {
    /// Coefficients, lowest order first
    pub coefficients: [T; 4],
    /// Inclusive start of the support
    pub start: usize,
    /// Exclusive end of the support
    pub end: usize,
}

impl<T: Float> RangedPolynomial<T> {
    /// Create from explicit coefficients.
    pub fn new(a0: T, a1: T, a2: T, a3: T, start: usize, end: usize) -> Self {
        Self {
            coefficients: [a0, a1, a2, a3],
            start,
            end,
        }
    }

    /// Pure monomial `x^degree` on `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `degree > 3`.
    pub fn monomial(degree: usize, start: usize, end: usize) -> Self {
        assert!(
            degree <= MAX_DEGREE,
            "monomial degree {} exceeds {}",
            degree,
            MAX_DEGREE
        );
        let mut coefficients = [T::zero(); 4];
        coefficients[degree] = T::one();
        Self {
            coefficients,
            start,
            end,
        }
    }

    /// Constant one on `[start, end)`: the range-sum functional.
    pub fn range_sum(start: usize, end: usize) -> Self {
        Self::monomial(0, start, end)
    }

    /// Same polynomial restricted to another range.
    pub fn with_range(mut self, start: usize, end: usize) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Whether `x` lies in the support.
    #[inline]
    pub fn contains(&self, x: usize) -> bool {
        self.start <= x && x < self.end
    }

    /// Evaluate the unrestricted polynomial (ignores the range).
    #[inline]
    pub fn eval_unbounded(&self, x: usize) -> T {
        let x = T::from(x).unwrap_or_else(T::nan);
        let [a0, a1, a2, a3] = self.coefficients;
        // Horner
        ((a3 * x + a2) * x + a1) * x + a0
    }
}

impl<T: Float> RangedFunction<T> for RangedPolynomial<T> {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }

    fn degree(&self) -> usize {
        self.coefficients
            .iter()
            .rposition(|c| *c != T::zero())
            .unwrap_or(0)
    }

    #[inline]
    fn eval(&self, x: usize) -> T {
        if self.contains(x) {
            self.eval_unbounded(x)
        } else {
            T::zero()
        }
    }
}

impl<T: Float + fmt::Display> fmt::Display for RangedPolynomial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a0, a1, a2, a3] = self.coefficients;
        write!(
            f,
            "{} + {}x + {}x^2 + {}x^3 on [{}, {})",
            a0, a1, a2, a3, self.start, self.end
        )
    }
}

/// Scalar product ⟨f, data⟩ by direct scan of the support.
///
/// Linear in the range length; the reference the buffer must agree with.
pub fn direct_product<T, F, S>(f: &F, source: &S) -> T
where
    T: Float,
    F: RangedFunction<T> + ?Sized,
    S: DataSource<T> + ?Sized,
{
    let end = f.end().min(source.len());
    (f.start()..end).fold(T::zero(), |acc, x| acc + f.eval(x) * source.value(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_outside_range() {
        let p = RangedPolynomial::new(1.0, 2.0, 0.0, 0.0, 3, 6);
        assert_eq!(p.eval(2), 0.0);
        assert_eq!(p.eval(3), 7.0);
        assert_eq!(p.eval(5), 11.0);
        assert_eq!(p.eval(6), 0.0);
    }

    #[test]
    fn test_monomials() {
        for degree in 0..=MAX_DEGREE {
            let p = RangedPolynomial::<f64>::monomial(degree, 0, 10);
            assert_eq!(p.degree(), degree);
            assert_eq!(p.eval(2), 2f64.powi(degree as i32));
        }
    }

    #[test]
    #[should_panic]
    fn test_monomial_degree_four_panics() {
        let _ = RangedPolynomial::<f64>::monomial(4, 0, 1);
    }

    #[test]
    fn test_cubic_evaluation() {
        let p = RangedPolynomial::new(1.0f64, -1.0, 0.5, 2.0, 0, 100);
        let x = 7.0;
        let expected = 1.0 - x + 0.5 * x * x + 2.0 * x * x * x;
        assert!((p.eval(7) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_direct_product_first_moment() {
        let data: Vec<f64> = (0..9).map(|x| x as f64).collect();
        let f = RangedPolynomial::monomial(1, 0, 5);
        assert_eq!(direct_product(&f, data.as_slice()), 30.0);
    }

    #[test]
    fn test_empty_range_is_zero() {
        let data = vec![1.0f64; 8];
        let f = RangedPolynomial::range_sum(4, 4);
        assert_eq!(direct_product(&f, data.as_slice()), 0.0);
    }
}
