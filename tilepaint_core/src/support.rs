// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Support height bookkeeping for the tile being painted.
//!
//! Track, road and surface painters record, per segment, the height at which
//! supports beneath them must start. Later painters on the same tile read
//! those heights back to decide whether and where to draw pylons.

use crate::image::ImageId;
use crate::interaction::{InteractionItem, OwnerRef};
use crate::segment::{SEGMENT_COUNT, Segments};

/// Height value meaning "no support committed".
pub const UNSET_HEIGHT: u16 = 0xFFFF;

/// Slope value recorded under an active bridge.
pub const BRIDGE_SUPPORT_SLOPE: u8 = 0x20;

/// A committed support height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SupportHeight {
    /// Height in map units, or [`UNSET_HEIGHT`].
    pub height: u16,
    /// Slope of the piece that committed the height.
    pub slope: u8,
    /// Auxiliary state, cleared whenever a height is committed.
    pub aux: u8,
}

impl SupportHeight {
    /// A support slot with nothing committed.
    pub const UNSET: Self = Self {
        height: UNSET_HEIGHT,
        slope: 0,
        aux: 0,
    };

    /// Returns `true` if no height is committed.
    #[inline]
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.height == UNSET_HEIGHT
    }
}

impl Default for SupportHeight {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Per-segment and general support heights for one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupportHeights {
    segments: [SupportHeight; SEGMENT_COUNT],
    general: SupportHeight,
}

impl Default for SupportHeights {
    fn default() -> Self {
        Self {
            segments: [SupportHeight::UNSET; SEGMENT_COUNT],
            general: SupportHeight::UNSET,
        }
    }
}

impl SupportHeights {
    /// Sets `height` on every segment in `segments`.
    ///
    /// Committing [`UNSET_HEIGHT`] releases the segments but leaves their
    /// slope untouched.
    pub fn set_segments(&mut self, segments: Segments, height: u16, slope: u8) {
        for i in segments.indices() {
            let seg = &mut self.segments[i];
            seg.height = height;
            if height != UNSET_HEIGHT {
                seg.slope = slope;
                seg.aux = 0;
            }
        }
    }

    /// Sets the general (whole-tile) support height.
    pub fn set_general(&mut self, height: u16, slope: u8) {
        self.general = SupportHeight {
            height,
            slope,
            aux: 0,
        };
    }

    /// Returns the support height of segment `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 9`.
    #[must_use]
    pub fn segment(&self, index: usize) -> SupportHeight {
        assert!(
            index < SEGMENT_COUNT,
            "segment index {index} out of range"
        );
        self.segments[index]
    }

    /// Returns the general support height.
    #[inline]
    #[must_use]
    pub const fn general(&self) -> SupportHeight {
        self.general
    }

    /// Returns `true` if every segment and the general height are unset.
    #[must_use]
    pub fn is_all_unset(&self) -> bool {
        self.general.is_unset() && self.segments.iter().all(SupportHeight::is_unset)
    }
}

/// Supports requested by track and road additions on the current tile.
///
/// Additions register what they want drawn per segment; the support painter
/// consumes the record once the tile's elements have been processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackRoadAdditionSupports {
    /// Height the supports reach up to, `0` if none were requested.
    pub height: u16,
    /// Segments already occupied by an addition.
    pub occupied_segments: Segments,
    /// Per-segment support frequency.
    pub segment_frequency: [u16; SEGMENT_COUNT],
    /// Per-segment support image.
    pub segment_images: [ImageId; SEGMENT_COUNT],
    /// Per-segment interaction kind of the owning addition.
    pub segment_interaction_item: [InteractionItem; SEGMENT_COUNT],
    /// Per-segment owner of the addition.
    pub segment_owner: [OwnerRef; SEGMENT_COUNT],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unset() {
        assert!(SupportHeights::default().is_all_unset());
    }

    #[test]
    fn set_segments_touches_only_selected() {
        let mut s = SupportHeights::default();
        s.set_segments(Segments::X0Y0 | Segments::X1Y1, 48, 3);
        assert_eq!(s.segment(0).height, 48);
        assert_eq!(s.segment(0).slope, 3);
        assert_eq!(s.segment(4).height, 48);
        assert!(s.segment(1).is_unset());
        assert!(s.general().is_unset());
    }

    #[test]
    fn releasing_keeps_slope() {
        let mut s = SupportHeights::default();
        s.set_segments(Segments::ALL, 32, 5);
        s.set_segments(Segments::X2Y2, UNSET_HEIGHT, 9);
        let seg = s.segment(3);
        assert!(seg.is_unset());
        assert_eq!(seg.slope, 5);
    }

    #[test]
    fn general_height_clears_aux() {
        let mut s = SupportHeights::default();
        s.set_general(64, BRIDGE_SUPPORT_SLOPE);
        assert_eq!(
            s.general(),
            SupportHeight {
                height: 64,
                slope: 0x20,
                aux: 0
            }
        );
    }

    #[test]
    #[should_panic(expected = "segment index 9 out of range")]
    fn segment_out_of_range_panics() {
        let _ = SupportHeights::default().segment(9);
    }
}
