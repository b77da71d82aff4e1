//! Hierarchy geometry
//!
//! Pure arithmetic on `(b, N, n)`: how many levels a length supports,
//! which lengths are admissible, and where each level sits in the flat
//! buffer. No data is touched here.

mod level;

pub use level::LevelLayout;

/// Level arithmetic for a `(basis, order)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hierarchy {
    basis: usize,
    order: usize,
}

impl Hierarchy {
    /// Geometry for basis `b` and order `N`.
    ///
    /// Callers validate `b > 1` and `N > 0`.
    pub fn new(basis: usize, order: usize) -> Self {
        Self { basis, order }
    }

    /// Block size `b`.
    pub fn basis(&self) -> usize {
        self.basis
    }

    /// Moment order `N`.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of coarse levels built for an array of length `len`.
    ///
    /// Counts scales `b, b², …` that still leave at least `2N` entries.
    /// Zero means the array is too small for even one level.
    pub fn levels(&self, len: usize) -> usize {
        let mut levels = 0;
        let mut scale = self.basis;
        while len / scale + 1 >= 2 * self.order && len / scale > 0 {
            levels += 1;
            scale = match scale.checked_mul(self.basis) {
                Some(next) => next,
                None => break,
            };
        }
        levels
    }

    /// Shortest length `build` accepts: one level of `2N` coarse nodes.
    pub fn min_len(&self) -> usize {
        (2 * self.order - 1) * self.basis + 1
    }

    /// `b^k`, saturating at `usize::MAX`.
    pub fn scale(&self, level: usize) -> usize {
        (0..level).fold(1usize, |s, _| s.saturating_mul(self.basis))
    }

    /// Smallest admissible length `≥ len`: `(padded - 1)` is a multiple of
    /// `b^levels(len)`.
    pub fn padded_length(&self, len: usize) -> usize {
        let ratio = self.scale(self.levels(len));
        let leftover = len.saturating_sub(1).div_ceil(ratio);
        leftover * ratio + 1
    }

    /// Whether `len` can be built without padding.
    pub fn is_admissible(&self, len: usize) -> bool {
        let levels = self.levels(len);
        levels > 0 && len.saturating_sub(1) % self.scale(levels) == 0
    }

    /// Layout of level `k` (`1 ≤ k ≤ levels(len)`) for an array of `len`.
    pub fn layout(&self, level: usize, len: usize) -> Option<LevelLayout> {
        let top = self.levels(len);
        if level == 0 || level > top {
            return None;
        }
        let scale = self.scale(level);
        Some(LevelLayout {
            level,
            scale,
            stride: scale / self.basis,
            count: len.saturating_sub(1) / scale + 1,
            top: level == top,
        })
    }

    /// Length of the flat buffer for an array of `len`.
    pub fn buffer_len(&self, len: usize) -> usize {
        len.saturating_sub(1) / self.basis + 1
    }
}
