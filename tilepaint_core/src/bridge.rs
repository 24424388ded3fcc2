// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bridge slot of the tile being painted.

use crate::image::ImageId;

/// The bridge structure carried by the current tile, if any.
///
/// Only one bridge can be active per tile. A piece that declares a bridge
/// while one is already active replaces the descriptor and keeps the
/// union of both edge and quarter occupancies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BridgeEntry {
    /// Deck height in map units, `0` when no bridge is active.
    pub height: i16,
    /// Bridge piece variant.
    pub sub_type: u8,
    /// Edges (high nibble) and quarters (low nibble) the deck covers.
    pub edges_quarters: u8,
    /// Bridge object.
    pub object_id: u8,
    /// Base image of the bridge object.
    pub image_base: ImageId,
}

impl BridgeEntry {
    /// The empty slot.
    pub const NONE: Self = Self {
        height: 0,
        sub_type: 0,
        edges_quarters: 0,
        object_id: 0,
        image_base: ImageId(0),
    };

    /// Returns `true` if no bridge is active.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.height == 0
    }

    /// Applies `incoming` to the slot.
    ///
    /// The newest entry always wins. If the slot was active, the occupancy
    /// it already had is ORed into the new entry. Clearing is done by
    /// assigning [`BridgeEntry::NONE`] directly.
    pub fn merge(&mut self, incoming: Self) {
        let edges_quarters = if self.is_empty() {
            incoming.edges_quarters
        } else {
            self.edges_quarters | incoming.edges_quarters
        };
        *self = incoming;
        self.edges_quarters = edges_quarters;
    }
}
