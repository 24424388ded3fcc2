// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The 3×3 sub-tile segment partition.
//!
//! Each tile is split into nine cells used for support and height
//! bookkeeping. A [`Segments`] mask holds one bit per cell:
//!
//! ```text
//!          x0     x1     x2
//!   y0   X0Y0   X1Y0   X2Y0
//!   y1   X0Y1   X1Y1   X2Y1
//!   y2   X0Y2   X1Y2   X2Y2
//! ```
//!
//! The four corner cells occupy bits 0–3, the centre cell bit 4 and the four
//! edge-centre cells bits 5–8. [`Segments::rotate`] remaps a mask through two
//! 4×4 tables, one for the corners and one for the edge centres; the centre
//! cell is unaffected by rotation.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign, Not};

use crate::geometry::Rotation;

/// Number of segments in a tile.
pub const SEGMENT_COUNT: usize = 9;

/// Corner remap, indexed by `[rotation][corner bit]`.
const CORNER_MAP: [[u8; 4]; 4] = [[0, 1, 2, 3], [2, 0, 3, 1], [3, 2, 1, 0], [1, 3, 0, 2]];

/// Edge-centre remap, indexed by `[rotation][bit - 5]`.
const EDGE_MAP: [[u8; 4]; 4] = [[0, 1, 2, 3], [1, 3, 0, 2], [3, 2, 1, 0], [2, 0, 3, 1]];

const _: () = {
    let mut i = 0;
    while i < 4 {
        assert!(CORNER_MAP[0][i] as usize == i, "rotation 0 must keep corners");
        assert!(EDGE_MAP[0][i] as usize == i, "rotation 0 must keep edges");
        i += 1;
    }
};

/// A set of tile segments.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Segments(u16);

impl Segments {
    /// No segments.
    pub const NONE: Self = Self(0);
    /// Corner at x0, y0.
    pub const X0Y0: Self = Self(1 << 0);
    /// Corner at x2, y0.
    pub const X2Y0: Self = Self(1 << 1);
    /// Corner at x0, y2.
    pub const X0Y2: Self = Self(1 << 2);
    /// Corner at x2, y2.
    pub const X2Y2: Self = Self(1 << 3);
    /// The centre cell.
    pub const X1Y1: Self = Self(1 << 4);
    /// Edge centre at x1, y0.
    pub const X1Y0: Self = Self(1 << 5);
    /// Edge centre at x0, y1.
    pub const X0Y1: Self = Self(1 << 6);
    /// Edge centre at x2, y1.
    pub const X2Y1: Self = Self(1 << 7);
    /// Edge centre at x1, y2.
    pub const X1Y2: Self = Self(1 << 8);
    /// All nine segments.
    pub const ALL: Self = Self(0x1FF);

    /// Creates a mask from raw bits, discarding bits above the ninth.
    #[inline]
    #[must_use]
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Returns `true` if no segment is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every segment in `other` is also in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if `self` and `other` share a segment.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns the mask as it appears after rotating the view by `rotation`.
    #[must_use]
    pub const fn rotate(self, rotation: Rotation) -> Self {
        let r = rotation.quarter_turns() as usize;
        let mut out = self.0 & Self::X1Y1.0;
        let mut i = 0;
        while i < 4 {
            if self.0 & (1 << i) != 0 {
                out |= 1 << CORNER_MAP[r][i];
            }
            if self.0 & (1 << (i + 5)) != 0 {
                out |= 1 << (EDGE_MAP[r][i] + 5);
            }
            i += 1;
        }
        Self(out)
    }

    /// Returns an iterator over the indices (`0..9`) of the set segments.
    #[must_use]
    pub fn indices(self) -> SegmentIndices {
        SegmentIndices { bits: self.0 }
    }
}

impl fmt::Debug for Segments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segments({:#05x})", self.0)
    }
}

impl BitOr for Segments {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Segments {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Segments {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Segments {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }
}

/// Iterator over the set segment indices of a [`Segments`] mask.
///
/// Created by [`Segments::indices`].
#[derive(Clone, Debug)]
pub struct SegmentIndices {
    bits: u16,
}

impl Iterator for SegmentIndices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(idx)
    }
}
