//! Anchor priors in grid-cell units.

use std::ops::Deref;

/// Prior box shape for one anchor slot, in grid-cell units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    /// Prior width in cells.
    pub width: f32,
    /// Prior height in cells.
    pub height: f32,
}

impl Anchor {
    /// Creates an anchor from a `(width, height)` pair.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl From<(f32, f32)> for Anchor {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

/// Ordered anchor priors, index-aligned with the tensor's anchor axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnchorTable {
    anchors: Vec<Anchor>,
}

impl AnchorTable {
    /// Creates a table from anchors in slot order.
    pub fn new(anchors: Vec<Anchor>) -> Self {
        Self { anchors }
    }

    /// Builds a table from `(width, height)` pairs.
    pub fn from_pairs(pairs: &[(f32, f32)]) -> Self {
        Self {
            anchors: pairs.iter().copied().map(Anchor::from).collect(),
        }
    }
}

impl Deref for AnchorTable {
    type Target = [Anchor];

    fn deref(&self) -> &Self::Target {
        &self.anchors
    }
}
