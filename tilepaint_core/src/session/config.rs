// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session configuration and per-frame options.

use crate::geometry::Rotation;
use crate::interaction::InteractionItem;

/// Configuration fixed for the lifetime of a [`PaintSession`](super::PaintSession).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum number of records per frame.
    pub arena_capacity: u32,
}

impl SessionConfig {
    /// The classic pool: 4000 entries minus two reserved list heads.
    #[must_use]
    pub const fn classic() -> Self {
        Self {
            arena_capacity: 3998,
        }
    }

    /// A configuration with a custom arena size.
    #[must_use]
    pub const fn with_arena_capacity(arena_capacity: u32) -> Self {
        Self { arena_capacity }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Viewport display toggles.
///
/// The see-through flags make the matching kinds of object translucent at
/// draw time. Combined with [`underground`](Self::underground) those objects
/// are not drawn at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ViewFlags {
    /// Underground view is active.
    pub underground: bool,
    /// Track, signals, stations, airports, docks and bridges.
    pub see_through_tracks: bool,
    /// Roads and road stations.
    pub see_through_roads: bool,
    /// Trees.
    pub see_through_trees: bool,
    /// Walls.
    pub see_through_scenery: bool,
    /// Buildings, industries and headquarters.
    pub see_through_buildings: bool,
}

impl ViewFlags {
    /// Returns `true` if a see-through flag covers `item`.
    #[must_use]
    pub const fn is_see_through(&self, item: InteractionItem) -> bool {
        use InteractionItem as I;
        match item {
            I::Track
            | I::TrackExtra
            | I::Signal
            | I::TrainStation
            | I::Airport
            | I::Dock
            | I::Bridge => self.see_through_tracks,
            I::RoadStation | I::Road | I::RoadExtra => self.see_through_roads,
            I::Tree | I::IndustryTree => self.see_through_trees,
            I::Wall => self.see_through_scenery,
            I::Building | I::Industry | I::HeadquarterBuilding => self.see_through_buildings,
            _ => false,
        }
    }
}

/// Options supplied with every [`init`](super::PaintSession::init).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Viewport rotation.
    pub rotation: Rotation,
    /// Display toggles.
    pub view_flags: ViewFlags,
    /// Height above which foreground objects may be hidden by painters.
    pub foreground_cull_height: i16,
}
