//! # Online Aggregation via Hierarchical Lagrange Buffers
//!
//! Precomputes a compact multi-level buffer over a one-dimensional array
//! so that range sums and low-order range moments are answered in
//! O(b·log_b n) instead of O(range), while point updates stay O(b·log_b n).
//!
//! ## Core Algorithm
//!
//! 1. **Coefficient table**: Lagrange weights over `2N` nodes, with
//!    one-sided stencils at the array edges
//! 2. **Construction**: each level scatters into the next coarser one
//!    (block size `b`); all levels share one flat buffer
//! 3. **Query**: per scale, correct the coarse view of `f` inside the two
//!    imperfect windows around the range ends, then walk the top level
//! 4. **Update**: push a delta up through the same stencils
//!
//! Result: exact answers for functionals of degree ≤ 2N−1
//!
//! ## Usage Example
//!
//! ```
//! use ola::{HierarchicalBuffer, RangedPolynomial};
//!
//! let engine = HierarchicalBuffer::<f64>::new(2, 1)?;
//! let mut data: Vec<f64> = (0..9).map(|x| x as f64).collect();
//! let mut buffer = engine.build(&data)?;
//!
//! let sum = engine.query(&RangedPolynomial::range_sum(0, 5), &data, &buffer)?;
//! assert!((sum - 10.0).abs() < 1e-9);
//!
//! engine.update(&mut buffer, 3, 10.0)?;
//! data[3] += 10.0;
//! let sum = engine.query(&RangedPolynomial::range_sum(0, 5), &data, &buffer)?;
//! assert!((sum - 20.0).abs() < 1e-9);
//! # Ok::<(), ola::OlaError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules
pub mod algebra;   // Query functionals and Lagrange weights
pub mod blocking;  // Zone classification and imperfect windows
pub mod hierarchy; // Level arithmetic and buffer layout
pub mod ledger;    // Pending deltas for updates
pub mod source;    // Data source abstraction
pub mod engine;    // Build, query, update

// Re-exports for convenience
pub use algebra::{direct_product, CoefficientTable, RangedFunction, RangedPolynomial};
pub use engine::{AggregateBuffer, HierarchicalBuffer};
pub use hierarchy::{Hierarchy, LevelLayout};
pub use source::{DataSource, FnSource, PaddedSource};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine parameters
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OlaConfig {
    /// Block size b (> 1)
    pub basis: usize,

    /// Moment order N (> 0); exact up to degree 2N-1
    pub order: usize,

    /// Check interpolation outside the imperfect windows on every query
    /// (O(n) per scale)
    pub validate_ranges: bool,

    /// Skip exact zeros during construction
    pub skip_zeros: bool,
}

impl OlaConfig {
    /// Validated configuration with default switches
    pub fn new(basis: usize, order: usize) -> Result<Self, OlaError> {
        let config = Self {
            basis,
            order,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Set range validation
    pub fn with_range_validation(mut self, enabled: bool) -> Self {
        self.validate_ranges = enabled;
        self
    }

    /// Set zero skipping
    pub fn with_zero_skipping(mut self, enabled: bool) -> Self {
        self.skip_zeros = enabled;
        self
    }

    /// Check basis and order
    pub fn validate(&self) -> Result<(), OlaError> {
        if self.basis < 2 {
            return Err(OlaError::InvalidBasis(self.basis));
        }
        if self.order == 0 {
            return Err(OlaError::InvalidOrder(self.order));
        }
        Ok(())
    }
}

impl Default for OlaConfig {
    fn default() -> Self {
        Self {
            basis: 2,
            order: 1,
            validate_ranges: false,
            skip_zeros: true,
        }
    }
}

/// Errors raised by the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OlaError {
    /// Basis must exceed 1
    #[error("Invalid basis {0}: must be at least 2")]
    InvalidBasis(usize),

    /// Order must be positive
    #[error("Invalid order {0}: must be at least 1")]
    InvalidOrder(usize),

    /// Array too short for one level of 2N blocks
    #[error("Array of length {len} too small: need at least {required}")]
    TooSmall {
        /// Actual length
        len: usize,
        /// Minimum length
        required: usize,
    },

    /// (len - 1) not a multiple of the scale in use
    #[error("Length {len} does not fit scale {scale}: pad to a recommended length")]
    BasisLengthMismatch {
        /// Array length
        len: usize,
        /// Offending scale
        scale: usize,
    },

    /// Source differs in length from the one the buffer was built for
    #[error("Buffer built for length {expected}, source has {actual}")]
    SourceLengthMismatch {
        /// Length recorded in the buffer
        expected: usize,
        /// Length of the source passed in
        actual: usize,
    },

    /// Buffer built with different parameters
    #[error("Buffer built with basis {basis} and order {order}")]
    ParameterMismatch {
        /// Basis of the buffer
        basis: usize,
        /// Order of the buffer
        order: usize,
    },

    /// Query range outside 0 <= start <= end <= len
    #[error("Invalid range [{start}, {end}) for length {len}")]
    InvalidRange {
        /// Range start
        start: usize,
        /// Range end
        end: usize,
        /// Array length
        len: usize,
    },

    /// Update position outside the array
    #[error("Position {position} out of range for length {len}")]
    PositionOutOfRange {
        /// Requested position
        position: usize,
        /// Array length
        len: usize,
    },

    /// Functional degree not reproduced by 2N-node stencils
    #[error("Degree {degree} exceeds what order {order} answers exactly")]
    DegreeExceedsOrder {
        /// Degree of the functional
        degree: usize,
        /// Engine order
        order: usize,
    },

    /// Interpolation disagreed with the functional outside the imperfect
    /// windows
    ///
    /// Only raised with [`OlaConfig::validate_ranges`] on. It signals an
    /// inconsistent buffer or a functional whose `degree()` understates it,
    /// and is returned as an error (after an `error!` log) instead of
    /// aborting the process.
    #[error("Range validation failed at index {index}, scale {scale}: {expected} != {interpolated}")]
    RangeValidation {
        /// Offending index
        index: usize,
        /// Scale being checked
        scale: usize,
        /// Functional value
        expected: f64,
        /// Interpolated value
        interpolated: f64,
    },
}
