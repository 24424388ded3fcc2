// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction item kinds and hit-test filters.
//!
//! Every Basic record is stamped with the [`InteractionItem`] kind and the
//! [`OwnerRef`] of the element being painted when it was created. Pointer
//! hit-testing and see-through culling read these back after ordering.

use core::fmt;
use core::ops::BitOr;

/// What kind of world object a sprite belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InteractionItem {
    /// Not interactive.
    #[default]
    None,
    /// Terrain surface.
    Surface,
    /// A moving entity (vehicle, effect).
    Entity,
    /// Track piece.
    Track,
    /// Track addition (platform, canopy, overhead wires).
    TrackExtra,
    /// Track signal.
    Signal,
    /// Train station.
    TrainStation,
    /// Road station.
    RoadStation,
    /// Airport.
    Airport,
    /// Dock.
    Dock,
    /// Water surface.
    Water,
    /// Tree.
    Tree,
    /// Wall.
    Wall,
    /// Town name label.
    TownLabel,
    /// Station name label.
    StationLabel,
    /// Road piece.
    Road,
    /// Road addition.
    RoadExtra,
    /// Bridge structure.
    Bridge,
    /// Town building.
    Building,
    /// Industry building.
    Industry,
    /// Company headquarters.
    HeadquarterBuilding,
    /// Tree planted by an industry.
    IndustryTree,
}

impl InteractionItem {
    /// Returns the filter bit that suppresses this kind, if any.
    #[must_use]
    pub const fn filter_bit(self) -> InteractionFilter {
        match self {
            Self::None | Self::Bridge => InteractionFilter::NONE,
            Self::Surface => InteractionFilter::SURFACE,
            Self::Entity => InteractionFilter::ENTITY,
            Self::Track => InteractionFilter::TRACK,
            Self::TrackExtra => InteractionFilter::TRACK_EXTRA,
            Self::Signal => InteractionFilter::SIGNAL,
            Self::TrainStation | Self::RoadStation | Self::Airport | Self::Dock => {
                InteractionFilter::STATION
            }
            Self::Water => InteractionFilter::WATER,
            Self::Tree | Self::IndustryTree => InteractionFilter::TREE,
            Self::Wall => InteractionFilter::WALL,
            Self::TownLabel => InteractionFilter::TOWN_LABEL,
            Self::StationLabel => InteractionFilter::STATION_LABEL,
            Self::Road => InteractionFilter::ROAD,
            Self::RoadExtra => InteractionFilter::ROAD_EXTRA,
            Self::Building => InteractionFilter::BUILDING,
            Self::Industry => InteractionFilter::INDUSTRY,
            Self::HeadquarterBuilding => InteractionFilter::HEADQUARTER_BUILDING,
        }
    }

    /// Returns `true` if a hit on this kind is reported under `filter`.
    ///
    /// Non-interactive sprites and bridge structures are never reported.
    #[must_use]
    pub const fn passes(self, filter: InteractionFilter) -> bool {
        match self {
            Self::None | Self::Bridge => false,
            _ => filter.0 & self.filter_bit().0 == 0,
        }
    }
}

/// A set of interaction kinds to ignore during hit-testing.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InteractionFilter(u32);

impl InteractionFilter {
    /// Ignore nothing.
    pub const NONE: Self = Self(0);
    /// Ignore terrain surfaces.
    pub const SURFACE: Self = Self(1 << 0);
    /// Ignore entities.
    pub const ENTITY: Self = Self(1 << 1);
    /// Ignore track.
    pub const TRACK: Self = Self(1 << 2);
    /// Ignore water.
    pub const WATER: Self = Self(1 << 3);
    /// Ignore trees.
    pub const TREE: Self = Self(1 << 4);
    /// Ignore track additions.
    pub const TRACK_EXTRA: Self = Self(1 << 5);
    /// Ignore signals.
    pub const SIGNAL: Self = Self(1 << 6);
    /// Ignore stations, airports and docks.
    pub const STATION: Self = Self(1 << 7);
    /// Ignore town labels.
    pub const TOWN_LABEL: Self = Self(1 << 8);
    /// Ignore station labels.
    pub const STATION_LABEL: Self = Self(1 << 9);
    /// Ignore roads and tram lines.
    pub const ROAD: Self = Self(1 << 10);
    /// Ignore road additions.
    pub const ROAD_EXTRA: Self = Self(1 << 11);
    /// Ignore walls.
    pub const WALL: Self = Self(1 << 12);
    /// Ignore town buildings.
    pub const BUILDING: Self = Self(1 << 13);
    /// Ignore industries.
    pub const INDUSTRY: Self = Self(1 << 14);
    /// Ignore company headquarters.
    pub const HEADQUARTER_BUILDING: Self = Self(1 << 15);

    /// Returns `true` if every kind in `other` is also ignored by `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl fmt::Debug for InteractionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InteractionFilter({:#06x})", self.0)
    }
}

impl BitOr for InteractionFilter {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// An opaque reference to the world element or entity that produced a sprite.
///
/// The world model assigns these; the core passes them through untouched.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OwnerRef(pub u32);

impl fmt::Debug for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerRef({})", self.0)
    }
}
