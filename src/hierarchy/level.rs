//! Placement of one hierarchy level inside the flat buffer

/// Where the entries of one level live in the flat buffer
///
/// Level `k ≥ 1` (scale `s = b^k`) has `count = ⌊(n-1)/s⌋ + 1` entries.
/// Entry `j` stands for original position `j·s` and is stored at flat
/// slot `j·s/b = j·stride`. Every `b`-th entry of a non-top level shares
/// its slot with the next coarser level, which wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelLayout {
    /// Level number `k`
    pub level: usize,
    /// Scale `b^k` in original positions
    pub scale: usize,
    /// Distance between consecutive entries in the flat buffer (`b^(k-1)`)
    pub stride: usize,
    /// Number of entries at this level
    pub count: usize,
    /// Whether this is the coarsest level
    pub top: bool,
}

impl LevelLayout {
    /// Flat buffer slot of entry `j`.
    #[inline]
    pub fn slot(&self, j: usize) -> usize {
        j * self.stride
    }

    /// Original position represented by entry `j`.
    #[inline]
    pub fn position(&self, j: usize) -> usize {
        j * self.scale
    }

    /// Whether entry `j` still holds this level's value (not overwritten
    /// by a coarser level).
    #[inline]
    pub fn owns(&self, j: usize) -> bool {
        self.top || j % (self.scale / self.stride) != 0
    }

    /// Entries that keep this level's value.
    pub fn owned_entries(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).filter(move |&j| self.owns(j))
    }
}
