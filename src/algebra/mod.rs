//! Numeric building blocks
//!
//! - Ranged polynomial functionals (the queries)
//! - Lagrange coefficient table (the hierarchy weights)

mod coefficients;
mod polynomial;

pub use coefficients::CoefficientTable;
pub use polynomial::{direct_product, RangedFunction, RangedPolynomial, MAX_DEGREE};
