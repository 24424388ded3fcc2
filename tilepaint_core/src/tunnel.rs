// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunnel mouths recorded per tile edge.
//!
//! Sloped track and road pieces that cut into terrain record a tunnel entry
//! on the edge they leave through. The terrain painter of the tile reads the
//! entries back to draw the portals.

use crate::geometry::MICRO_Z_STEP;

/// Number of tile edges.
pub const EDGE_COUNT: usize = 4;

/// Maximum number of entries kept per edge.
pub const TUNNELS_PER_EDGE: usize = 32;

/// One tunnel mouth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TunnelEntry {
    /// Height of the mouth in micro-Z units.
    pub height: u8,
    /// Tunnel style.
    pub kind: u8,
}

impl TunnelEntry {
    /// Creates an entry for a mouth at height `z` in map units.
    ///
    /// Heights below zero or above the representable range are clamped.
    #[must_use]
    pub fn at(z: i32, kind: u8) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "clamped into u8 range"
        )]
        let height = (z / MICRO_Z_STEP).clamp(0, i32::from(u8::MAX)) as u8;
        Self { height, kind }
    }
}

/// The tunnel entries of the current tile, one list per edge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TunnelTable {
    entries: [[TunnelEntry; TUNNELS_PER_EDGE]; EDGE_COUNT],
    counts: [u8; EDGE_COUNT],
}

impl TunnelTable {
    /// Forgets every entry on every edge.
    pub fn reset(&mut self) {
        self.counts = [0; EDGE_COUNT];
    }

    /// Records a mouth at height `z` on `edge`.
    ///
    /// An entry equal to the last one on that edge is not repeated, and
    /// entries beyond [`TUNNELS_PER_EDGE`] are dropped.
    ///
    /// # Panics
    ///
    /// Panics if `edge >= 4`.
    pub fn insert(&mut self, z: i32, kind: u8, edge: usize) {
        assert!(edge < EDGE_COUNT, "tunnel edge {edge} out of range");
        let entry = TunnelEntry::at(z, kind);
        let count = usize::from(self.counts[edge]);
        if count > 0 && self.entries[edge][count - 1] == entry {
            return;
        }
        if count == TUNNELS_PER_EDGE {
            return;
        }
        self.entries[edge][count] = entry;
        self.counts[edge] += 1;
    }

    /// Records mouths on several edges at once.
    ///
    /// `heights` holds one height per edge relative to `base`; edges set to
    /// `-1` have no tunnel.
    pub fn insert_all(&mut self, heights: [i16; EDGE_COUNT], base: i32, kind: u8) {
        for (edge, h) in heights.into_iter().enumerate() {
            if h != -1 {
                self.insert(i32::from(h) + base, kind, edge);
            }
        }
    }

    /// Returns the entries recorded on `edge`, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if `edge >= 4`.
    #[must_use]
    pub fn edge(&self, edge: usize) -> &[TunnelEntry] {
        assert!(edge < EDGE_COUNT, "tunnel edge {edge} out of range");
        &self.entries[edge][..usize::from(self.counts[edge])]
    }

    /// Returns `true` if no edge has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn heights_are_stored_in_micro_z() {
        assert_eq!(TunnelEntry::at(64, 1).height, 4);
        assert_eq!(TunnelEntry::at(-16, 1).height, 0);
        assert_eq!(TunnelEntry::at(100_000, 1).height, 255);
    }

    #[test]
    fn insert_appends_and_skips_repeats() {
        let mut t = TunnelTable::default();
        t.insert(32, 0, 1);
        t.insert(32, 0, 1);
        t.insert(48, 0, 1);
        t.insert(32, 0, 1);
        let heights: Vec<_> = t.edge(1).iter().map(|e| e.height).collect();
        assert_eq!(heights, [2, 3, 2]);
        assert!(t.edge(0).is_empty());
    }

    #[test]
    fn full_edge_drops_further_entries() {
        let mut t = TunnelTable::default();
        for i in 0..40 {
            t.insert(i * MICRO_Z_STEP, 0, 2);
        }
        assert_eq!(t.edge(2).len(), TUNNELS_PER_EDGE);
        assert_eq!(t.edge(2)[TUNNELS_PER_EDGE - 1].height, 31);
    }

    #[test]
    fn insert_all_skips_absent_edges() {
        let mut t = TunnelTable::default();
        t.insert_all([0, -1, 16, -1], 32, 7);
        assert_eq!(t.edge(0), [TunnelEntry { height: 2, kind: 7 }]);
        assert!(t.edge(1).is_empty());
        assert_eq!(t.edge(2), [TunnelEntry { height: 3, kind: 7 }]);
        assert!(t.edge(3).is_empty());
    }

    #[test]
    fn reset_empties_every_edge() {
        let mut t = TunnelTable::default();
        t.insert_all([0, 0, 0, 0], 0, 0);
        assert!(!t.is_empty());
        t.reset();
        assert!(t.is_empty());
        for edge in 0..EDGE_COUNT {
            assert!(t.edge(edge).is_empty());
        }
    }

    #[test]
    #[should_panic(expected = "tunnel edge 4 out of range")]
    fn edge_out_of_range_panics() {
        TunnelTable::default().insert(0, 0, 4);
    }
}
