// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tile bookkeeping: supports, tunnels, the bridge slot and the
//! track/road slots that are merged when a tile ends.

use crate::arena::{INVALID, RecordId};
use crate::bridge::BridgeEntry;
use crate::geometry::ScreenPos;
use crate::segment::Segments;
use crate::support::{
    BRIDGE_SUPPORT_SLOPE, SupportHeight, SupportHeights, TrackRoadAdditionSupports, UNSET_HEIGHT,
};
use crate::trace::{PhaseBeginEvent, PhaseEndEvent, PhaseKind, Tracer};
use crate::tunnel::{EDGE_COUNT, TunnelEntry};

use super::PaintSession;

/// Number of track/road priority slots.
pub const TRACK_ROAD_SLOTS: usize = 5;

/// Number of track/road addition priority slots.
pub const ADDITION_SLOTS: usize = 2;

impl PaintSession {
    // -- Tile lifecycle --

    /// Starts a new tile column whose origin projects to `screen_pos`.
    ///
    /// Clears the supports, the bridge slot, the occupied segments and the
    /// track/road slots. Tunnels are kept; see [`reset_tunnels`](Self::reset_tunnels).
    pub fn reset_tile_column(&mut self, screen_pos: ScreenPos) {
        self.tile_screen_pos = screen_pos;
        self.did_pass_surface = false;
        self.supports = SupportHeights::default();
        self.bridge = BridgeEntry::NONE;
        self.occupied_track_segments = Segments::NONE;
        self.addition_supports = TrackRoadAdditionSupports::default();
        self.track_road = [INVALID; TRACK_ROAD_SLOTS];
        self.track_road_additions = [INVALID; ADDITION_SLOTS];
    }

    /// Starts a new element stack on the current tile: every support height
    /// is unset and every tunnel edge is empty.
    pub fn reset_tile(&mut self) {
        self.supports = SupportHeights::default();
        self.tunnels.reset();
    }

    /// Empties all four tunnel edges.
    pub fn reset_tunnels(&mut self) {
        self.tunnels.reset();
    }

    /// Finishes the tile in progress.
    ///
    /// Merges the track/road slots and then the addition slots into the
    /// quadrant index, releases occupied addition segments, lowers the
    /// general support under an active bridge and releases occupied track
    /// segments.
    pub fn end_tile(&mut self) {
        self.end_tile_traced(&mut Tracer::none());
    }

    /// Like [`end_tile`](Self::end_tile), bracketing the work in a
    /// [`PhaseKind::Finalise`] phase on `tracer`.
    pub fn end_tile_traced(&mut self, tracer: &mut Tracer<'_>) {
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Finalise,
            arena_used: self.arena_used(),
        });

        self.finalise_track_road_ordering();
        self.finalise_track_road_additions_ordering();

        self.addition_supports.occupied_segments = Segments::NONE;

        if !self.bridge.is_empty() {
            // A deck below ground never lowers the supports.
            if let Ok(deck) = u16::try_from(self.bridge.height)
                && self.supports.general().height >= deck
            {
                self.supports.set_general(deck, BRIDGE_SUPPORT_SLOPE);
            }
            self.bridge = BridgeEntry::NONE;
        }

        if !self.occupied_track_segments.is_empty() {
            self.supports
                .set_segments(self.occupied_track_segments, UNSET_HEIGHT, 0);
            self.occupied_track_segments = Segments::NONE;
        }

        tracer.phase_end(&PhaseEndEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Finalise,
            arena_used: self.arena_used(),
        });
    }

    /// Records the highest clearance of the tile, in small-Z steps.
    pub fn set_max_height(&mut self, max_clear_z: i32) {
        self.max_height = max_clear_z.saturating_mul(4).saturating_add(32);
    }

    /// Returns the height painters may draw up to on the current tile.
    #[inline]
    #[must_use]
    pub const fn max_height(&self) -> i32 {
        self.max_height
    }

    /// Returns the screen position of the current tile column.
    #[inline]
    #[must_use]
    pub const fn tile_screen_position(&self) -> ScreenPos {
        self.tile_screen_pos
    }

    /// Marks the surface of the current tile as painted.
    pub fn set_did_pass_surface(&mut self, passed: bool) {
        self.did_pass_surface = passed;
    }

    /// Returns `true` once the surface of the current tile was painted.
    #[inline]
    #[must_use]
    pub const fn did_pass_surface(&self) -> bool {
        self.did_pass_surface
    }

    // -- Supports --

    /// Commits `height` and `slope` on every segment in `segments`.
    ///
    /// Committing [`UNSET_HEIGHT`] releases the segments and keeps their
    /// slope.
    pub fn set_segment_support_height(&mut self, segments: Segments, height: u16, slope: u8) {
        self.supports.set_segments(segments, height, slope);
    }

    /// Commits the general (whole-tile) support height.
    pub fn set_general_support_height(&mut self, height: u16, slope: u8) {
        self.supports.set_general(height, slope);
    }

    /// Returns the support height of segment `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 9`.
    #[must_use]
    pub fn segment_support_height(&self, index: usize) -> SupportHeight {
        self.supports.segment(index)
    }

    /// Returns the general support height.
    #[must_use]
    pub const fn general_support_height(&self) -> SupportHeight {
        self.supports.general()
    }

    /// Returns every support height of the current tile.
    #[must_use]
    pub const fn support_heights(&self) -> &SupportHeights {
        &self.supports
    }

    /// Marks segments as taken by a track piece. They are released when the
    /// tile ends.
    pub fn set_occupied_track_segments(&mut self, segments: Segments) {
        self.occupied_track_segments |= segments;
    }

    /// Returns the segments taken by track pieces on the current tile.
    #[must_use]
    pub const fn occupied_track_segments(&self) -> Segments {
        self.occupied_track_segments
    }

    /// Marks segments as taken by an addition's supports.
    pub fn set_occupied_addition_support_segments(&mut self, segments: Segments) {
        self.addition_supports.occupied_segments = segments;
    }

    /// Returns the segments taken by addition supports.
    #[must_use]
    pub const fn occupied_addition_support_segments(&self) -> Segments {
        self.addition_supports.occupied_segments
    }

    /// Returns the height addition supports reach up to.
    #[must_use]
    pub const fn addition_support_height(&self) -> u16 {
        self.addition_supports.height
    }

    /// Sets the height addition supports reach up to.
    pub fn set_addition_support_height(&mut self, height: u16) {
        self.addition_supports.height = height;
    }

    /// Returns the addition supports requested on the current tile.
    #[must_use]
    pub const fn addition_supports(&self) -> &TrackRoadAdditionSupports {
        &self.addition_supports
    }

    /// Returns the addition supports for in-place updates.
    pub fn addition_supports_mut(&mut self) -> &mut TrackRoadAdditionSupports {
        &mut self.addition_supports
    }

    // -- Bridge --

    /// Declares a bridge on the current tile.
    ///
    /// If one is already active, `entry` replaces it and keeps the occupied
    /// edges and quarters of both. See [`BridgeEntry::merge`].
    pub fn set_bridge_entry(&mut self, entry: BridgeEntry) {
        self.bridge.merge(entry);
    }

    /// Returns the active bridge, [`BridgeEntry::NONE`] if there is none.
    #[must_use]
    pub const fn bridge_entry(&self) -> BridgeEntry {
        self.bridge
    }

    // -- Tunnels --

    /// Records a tunnel mouth at height `z` on `edge`.
    ///
    /// # Panics
    ///
    /// Panics if `edge >= 4`.
    pub fn insert_tunnel(&mut self, z: i32, kind: u8, edge: usize) {
        self.tunnels.insert(z, kind, edge);
    }

    /// Records tunnel mouths on several edges, heights relative to `base`.
    /// Edges set to `-1` are skipped.
    pub fn insert_tunnels(&mut self, heights: [i16; EDGE_COUNT], base: i32, kind: u8) {
        self.tunnels.insert_all(heights, base, kind);
    }

    /// Returns the tunnel mouths recorded on `edge`, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if `edge >= 4`.
    #[must_use]
    pub fn tunnels(&self, edge: usize) -> &[TunnelEntry] {
        self.tunnels.edge(edge)
    }

    // -- Finalisation --

    /// Merges the track/road slots into one sprite and files it for
    /// ordering. Returns the merged sprite, if any slot was used.
    pub fn finalise_track_road_ordering(&mut self) -> Option<RecordId> {
        let slots = core::mem::replace(&mut self.track_road, [INVALID; TRACK_ROAD_SLOTS]);
        self.finalise_ordering(&slots)
    }

    /// Merges the addition slots into one sprite and files it for ordering.
    pub fn finalise_track_road_additions_ordering(&mut self) -> Option<RecordId> {
        let slots = core::mem::replace(&mut self.track_road_additions, [INVALID; ADDITION_SLOTS]);
        self.finalise_ordering(&slots)
    }

    /// Chains the non-empty slots in slot order behind the first one, then
    /// gives that route sprite the footprint common to the whole chain.
    fn finalise_ordering(&mut self, slots: &[u32]) -> Option<RecordId> {
        let mut route = INVALID;
        let mut last = INVALID;
        for &entry in slots.iter().filter(|&&e| e != INVALID) {
            if route == INVALID {
                route = entry;
            } else {
                self.arena.sprite_at_mut(last).next_child = entry;
            }
            last = entry;
            while self.arena.sprite_at(last).next_child != INVALID {
                last = self.arena.sprite_at(last).next_child;
            }
        }
        if route == INVALID {
            return None;
        }

        let rotation = self.options.rotation.quarter_turns();
        let mut merged = self.arena.sprite_at(route).bounds;
        let mut node = self.arena.sprite_at(route).next_child;
        while node != INVALID {
            let sprite = self.arena.sprite_at(node);
            let b = sprite.bounds;
            match rotation {
                0 => {
                    merged.x = merged.x.max(b.x);
                    merged.y = merged.y.max(b.y);
                    merged.x_end = merged.x_end.min(b.x_end);
                    merged.y_end = merged.y_end.min(b.y_end);
                }
                1 => {
                    merged.x = merged.x.min(b.x);
                    merged.y = merged.y.max(b.y);
                    merged.x_end = merged.x_end.max(b.x_end);
                    merged.y_end = merged.y_end.min(b.y_end);
                }
                2 => {
                    merged.x = merged.x.min(b.x);
                    merged.y = merged.y.min(b.y);
                    merged.x_end = merged.x_end.max(b.x_end);
                    merged.y_end = merged.y_end.max(b.y_end);
                }
                _ => {
                    merged.x = merged.x.max(b.x);
                    merged.y = merged.y.min(b.y);
                    merged.x_end = merged.x_end.min(b.x_end);
                    merged.y_end = merged.y_end.max(b.y_end);
                }
            }
            node = sprite.next_child;
        }

        let bounds = &mut self.arena.sprite_at_mut(route).bounds;
        bounds.x = merged.x;
        bounds.y = merged.y;
        bounds.x_end = merged.x_end;
        bounds.y_end = merged.y_end;
        self.quadrants
            .insert(&mut self.arena, route, self.options.rotation);
        Some(self.arena.id_at(route))
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "arena length is bounded by its u32 capacity"
    )]
    pub(crate) fn arena_used(&self) -> u32 {
        self.arena.len() as u32
    }
}
