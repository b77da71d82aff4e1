//! Range queries
//!
//! At every scale below the top, the coarse level sees `f` only through
//! its stencils. Away from the range boundaries that view is exact; inside
//! the two imperfect windows the difference `f - interpolate(f)` is paid
//! for with the values held at that scale. What remains is a plain walk
//! over the top level.

use num_traits::Float;
use tracing::{error, trace};

use super::{AggregateBuffer, HierarchicalBuffer};
use crate::{
    algebra::RangedFunction, blocking::WindowBounds, source::DataSource, OlaError,
};

/// Relative tolerance of the range-validation pass
const VALIDATION_TOLERANCE: f64 = 1e-4;

impl<T: Float> HierarchicalBuffer<T> {
    /// Scalar product `Σ f(x)·data[x]` over `[f.start(), f.end())`.
    ///
    /// `source` must be the array `buffer` was built from (with any
    /// updates applied to both). Exact for functionals of degree `< 2N`.
    pub fn query<F, S>(
        &self,
        f: &F,
        source: &S,
        buffer: &AggregateBuffer<T>,
    ) -> Result<T, OlaError>
    where
        F: RangedFunction<T> + ?Sized,
        S: DataSource<T> + ?Sized,
    {
        let len = source.len();
        self.check_buffer(buffer)?;
        if len != buffer.data_len() {
            return Err(OlaError::SourceLengthMismatch {
                expected: buffer.data_len(),
                actual: len,
            });
        }
        let (start, end) = (f.start(), f.end());
        if start > end || end > len {
            return Err(OlaError::InvalidRange { start, end, len });
        }
        if f.degree() > self.max_exact_degree() {
            return Err(OlaError::DegreeExceedsOrder {
                degree: f.degree(),
                order: self.order(),
            });
        }

        let basis = self.basis();
        let order = self.order();
        let top = self.levels(len);
        let mut sum = T::zero();

        for level in 0..top {
            let scale = self.hierarchy.scale(level);
            if level >= 1 && len % scale != 1 {
                return Err(OlaError::BasisLengthMismatch { len, scale });
            }

            let lower = WindowBounds::imperfect(start, scale, len, basis, order);
            let upper = WindowBounds::imperfect(end, scale, len, basis, order).after(&lower);

            let mut correction = T::zero();
            for index in lower.indices(scale).chain(upper.indices(scale)) {
                let value = if level == 0 {
                    source.value(index)
                } else {
                    buffer.values[index / basis]
                };
                let residual = f.eval(index) - self.interpolate(index, scale, f, len);
                correction = correction + residual * value;
            }
            trace!(
                scale,
                lower = ?(lower.lower, lower.upper),
                upper = ?(upper.lower, upper.upper),
                correction = correction.to_f64(),
                "boundary correction"
            );

            if self.config.validate_ranges {
                self.validate_scale(f, scale, len, &lower, &upper)?;
            }
            sum = sum + correction;
        }

        let top_scale = self.hierarchy.scale(top);
        let first = start.div_ceil(top_scale) * top_scale;
        let last = end / top_scale * top_scale;
        for index in (first..=last).step_by(top_scale) {
            sum = sum + f.eval(index) * buffer.values[index / basis];
        }
        Ok(sum)
    }

    /// Outside the imperfect windows the coarse view of `f` must agree
    /// with `f` itself.
    fn validate_scale<F>(
        &self,
        f: &F,
        scale: usize,
        len: usize,
        lower: &WindowBounds,
        upper: &WindowBounds,
    ) -> Result<(), OlaError>
    where
        F: RangedFunction<T> + ?Sized,
    {
        for index in (0..len).step_by(scale) {
            if lower.contains(index) || upper.contains(index) {
                continue;
            }
            let expected = f.eval(index).to_f64().unwrap_or(f64::NAN);
            let interpolated = self
                .interpolate(index, scale, f, len)
                .to_f64()
                .unwrap_or(f64::NAN);
            let tolerance = VALIDATION_TOLERANCE * expected.abs().max(1.0);
            // NaN counts as disagreement
            let agrees = (expected - interpolated).abs() <= tolerance;
            if !agrees {
                error!(
                    index,
                    scale, expected, interpolated, "interpolation disagrees outside imperfect range"
                );
                return Err(OlaError::RangeValidation {
                    index,
                    scale,
                    expected,
                    interpolated,
                });
            }
        }
        Ok(())
    }

    /// Reject buffers built with other parameters.
    pub(crate) fn check_buffer(&self, buffer: &AggregateBuffer<T>) -> Result<(), OlaError> {
        if buffer.basis() != self.basis() || buffer.order() != self.order() {
            return Err(OlaError::ParameterMismatch {
                basis: buffer.basis(),
                order: buffer.order(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algebra::RangedPolynomial, OlaConfig};

    fn ramp() -> Vec<f64> {
        (0..9).map(|x| x as f64).collect()
    }

    #[test]
    fn test_sum_and_first_moment() {
        let engine = HierarchicalBuffer::<f64>::new(2, 1).unwrap();
        let data = ramp();
        let buffer = engine.build(&data).unwrap();

        let sum = engine
            .query(&RangedPolynomial::range_sum(0, 5), &data, &buffer)
            .unwrap();
        assert!((sum - 10.0).abs() < 1e-9);

        let moment = engine
            .query(&RangedPolynomial::monomial(1, 0, 5), &data, &buffer)
            .unwrap();
        assert!((moment - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_and_full_ranges() {
        let engine = HierarchicalBuffer::<f64>::new(2, 1).unwrap();
        let data = ramp();
        let buffer = engine.build(&data).unwrap();
        for at in 0..=9 {
            let empty = engine
                .query(&RangedPolynomial::range_sum(at, at), &data, &buffer)
                .unwrap();
            assert!(empty.abs() < 1e-9, "empty at {}: {}", at, empty);
        }
        let full = engine
            .query(&RangedPolynomial::range_sum(0, 9), &data, &buffer)
            .unwrap();
        assert!((full - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_requests() {
        let engine = HierarchicalBuffer::<f64>::new(2, 1).unwrap();
        let data = ramp();
        let buffer = engine.build(&data).unwrap();

        let backwards = RangedPolynomial::range_sum(5, 3);
        assert!(matches!(
            engine.query(&backwards, &data, &buffer),
            Err(OlaError::InvalidRange { start: 5, end: 3, len: 9 })
        ));

        let past_end = RangedPolynomial::range_sum(0, 10);
        assert!(matches!(
            engine.query(&past_end, &data, &buffer),
            Err(OlaError::InvalidRange { .. })
        ));

        let quadratic = RangedPolynomial::monomial(2, 0, 5);
        assert!(matches!(
            engine.query(&quadratic, &data, &buffer),
            Err(OlaError::DegreeExceedsOrder { degree: 2, order: 1 })
        ));

        let shorter = vec![0.0; 8];
        assert!(matches!(
            engine.query(&RangedPolynomial::range_sum(0, 4), &shorter, &buffer),
            Err(OlaError::SourceLengthMismatch { expected: 9, actual: 8 })
        ));

        let other = HierarchicalBuffer::<f64>::new(2, 2).unwrap();
        assert!(matches!(
            other.query(&RangedPolynomial::range_sum(0, 4), &data, &buffer),
            Err(OlaError::ParameterMismatch { basis: 2, order: 1 })
        ));
    }

    #[test]
    fn test_validation_mode_accepts_correct_buffer() {
        let config = OlaConfig::new(3, 2).unwrap().with_range_validation(true);
        let engine = HierarchicalBuffer::<f64>::with_config(config).unwrap();
        let data: Vec<f64> = (0..55).map(|x| ((x * 7) % 11) as f64 - 5.0).collect();
        let buffer = engine.build(&data).unwrap();
        for (start, end) in [(0, 55), (3, 40), (17, 18), (30, 54)] {
            let f = RangedPolynomial::new(0.5, -1.0, 0.25, 0.01, start, end);
            let got = engine.query(&f, &data, &buffer).unwrap();
            let want = crate::algebra::direct_product(&f, &data);
            assert!((got - want).abs() < 1e-6 * want.abs().max(1.0));
        }
    }

    /// Evaluates `x²` but claims to be constant.
    struct UnderstatedSquare;

    impl RangedFunction<f64> for UnderstatedSquare {
        fn start(&self) -> usize {
            0
        }
        fn end(&self) -> usize {
            9
        }
        fn degree(&self) -> usize {
            0
        }
        fn eval(&self, x: usize) -> f64 {
            if x < 9 {
                (x * x) as f64
            } else {
                0.0
            }
        }
    }

    #[test]
    fn test_validation_catches_understated_degree() {
        let config = OlaConfig::new(2, 1).unwrap().with_range_validation(true);
        let engine = HierarchicalBuffer::<f64>::with_config(config).unwrap();
        let data = ramp();
        let buffer = engine.build(&data).unwrap();
        // index 1 interpolates between 0 and 4
        assert_eq!(
            engine.query(&UnderstatedSquare, &data, &buffer),
            Err(OlaError::RangeValidation {
                index: 1,
                scale: 1,
                expected: 1.0,
                interpolated: 2.0,
            })
        );

        let unchecked = HierarchicalBuffer::<f64>::new(2, 1).unwrap();
        assert!(unchecked.query(&UnderstatedSquare, &data, &buffer).is_ok());
    }

    #[test]
    fn test_rejects_buffer_length_off_the_scale_grid() {
        let engine = HierarchicalBuffer::<f64>::new(2, 1).unwrap();
        let mut buffer = engine.build(&ramp()).unwrap();
        let data = vec![1.0; 8];
        buffer.data_len = 8;
        assert_eq!(
            engine.query(&RangedPolynomial::range_sum(0, 8), &data, &buffer),
            Err(OlaError::BasisLengthMismatch { len: 8, scale: 2 })
        );
    }

    #[test]
    fn test_trait_object_functional() {
        let engine = HierarchicalBuffer::<f64>::new(2, 1).unwrap();
        let data = ramp();
        let buffer = engine.build(&data).unwrap();
        let f: Box<dyn RangedFunction<f64>> = Box::new(RangedPolynomial::range_sum(2, 7));
        let got = engine.query(f.as_ref(), &data, &buffer).unwrap();
        assert!((got - 20.0).abs() < 1e-9);
    }
}
