//! Imperfect ranges
//!
//! Near a query boundary the functional is not a polynomial on the whole
//! stencil, so the coarse level cannot reproduce it. Those indices get a
//! raw correction term; everything outside the window is exact.

/// Half-open index window `[lower, upper)` at one scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowBounds {
    /// First index of the window
    pub lower: usize,
    /// One past the last index
    pub upper: usize,
}

impl WindowBounds {
    /// Empty window anchored at `at`.
    pub fn empty(at: usize) -> Self {
        Self {
            lower: at,
            upper: at,
        }
    }

    /// Window of indices around boundary `x` whose interpolation at
    /// `scale` depends on values on both sides of `x`.
    ///
    /// Boundaries at `0` or `len` never break a stencil and yield an empty
    /// window. Windows are clamped to `[scale, len - scale)` at the edges.
    pub fn imperfect(x: usize, scale: usize, len: usize, basis: usize, order: usize) -> Self {
        if x == 0 || x == len {
            return Self::empty(x);
        }

        let span = (scale * basis) as i64;
        let order = order as i64;
        let block = x as i64 / span;

        let mut lower = (block - order) * span + scale as i64;
        let mut upper = (block + order) * span;
        if x as i64 <= span * (2 * order - 1) {
            lower = scale as i64;
        }
        if ((len - x) as i64) < span * 2 * order {
            upper = (len - scale) as i64;
        }

        Self {
            lower: lower.max(0) as usize,
            upper: upper.max(lower).max(0) as usize,
        }
    }

    /// Number of positions covered.
    pub fn length(&self) -> usize {
        self.upper.saturating_sub(self.lower)
    }

    /// Whether the window covers nothing.
    pub fn is_empty(&self) -> bool {
        self.upper <= self.lower
    }

    /// Whether `index` falls inside.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.lower <= index && index < self.upper
    }

    /// Drop the part of `self` already covered by `earlier`.
    ///
    /// `earlier` must start no later than `self`.
    pub fn after(self, earlier: &WindowBounds) -> Self {
        if self.lower < earlier.upper {
            let lower = earlier.upper.min(self.upper);
            Self {
                lower,
                upper: self.upper,
            }
        } else {
            self
        }
    }

    /// Indices of the window on the grid of multiples of `step`.
    pub fn indices(&self, step: usize) -> impl Iterator<Item = usize> {
        let first = self.lower.div_ceil(step) * step;
        (first..self.upper).step_by(step)
    }
}
