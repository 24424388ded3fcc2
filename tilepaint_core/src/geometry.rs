// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World and screen coordinates and the four-way isometric projection.
//!
//! World positions are in map units, with [`TILE_SIZE`] units per tile edge
//! and heights in the same unit (one small-Z step is [`SMALL_Z_STEP`]
//! units). Screen positions are unzoomed viewport pixels.
//!
//! [`Rotation`] captures one of the four viewport orientations and provides
//! the projection ([`game_to_screen`](Rotation::game_to_screen)) together
//! with the vector rotations the plot list uses to turn per-piece offsets
//! and bounding boxes into world space.

use core::ops::{Add, Sub};

/// Number of map units along one tile edge.
pub const TILE_SIZE: i32 = 32;

/// Number of map units per small-Z height step.
pub const SMALL_Z_STEP: i32 = 4;

/// Number of map units per micro-Z height step (four small-Z steps).
pub const MICRO_Z_STEP: i32 = 16;

/// A 2D world position in map units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pos2 {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
}

impl Pos2 {
    /// Creates a position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Pos2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

/// A 3D world position in map units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pos3 {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Height.
    pub z: i32,
}

impl Pos3 {
    /// Creates a position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Creates a position from a horizontal position and a height.
    #[inline]
    #[must_use]
    pub const fn from_xy(xy: Pos2, z: i32) -> Self {
        Self::new(xy.x, xy.y, z)
    }

    /// Returns the horizontal part of the position.
    #[inline]
    #[must_use]
    pub const fn xy(self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }
}

/// A position on the unzoomed viewport, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScreenPos {
    /// Horizontal pixel offset.
    pub x: i32,
    /// Vertical pixel offset (grows downwards).
    pub y: i32,
}

impl ScreenPos {
    /// Creates a screen position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for ScreenPos {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for ScreenPos {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// One of the four viewport orientations, in clockwise quarter turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rotation(u8);

impl Rotation {
    /// The default orientation.
    pub const R0: Self = Self(0);
    /// One quarter turn.
    pub const R1: Self = Self(1);
    /// Two quarter turns.
    pub const R2: Self = Self(2);
    /// Three quarter turns.
    pub const R3: Self = Self(3);

    /// All four orientations in order.
    pub const ALL: [Self; 4] = [Self::R0, Self::R1, Self::R2, Self::R3];

    /// Creates a rotation, wrapping `quarter_turns` into `0..4`.
    #[inline]
    #[must_use]
    pub const fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns & 3)
    }

    /// Returns the number of quarter turns (`0..4`).
    #[inline]
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }

    /// Returns the rotation that undoes this one.
    #[inline]
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self((4 - self.0) & 3)
    }

    /// Mirrors the rotation across the x axis: 1 and 3 swap, 0 and 2 stay.
    #[inline]
    #[must_use]
    pub const fn flip_x_axis(self) -> Self {
        Self((self.0 * 3) % 4)
    }

    /// Rotates a horizontal vector by this many quarter turns.
    ///
    /// Negation saturates, so `i32::MIN` maps to `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn rotate(self, v: Pos2) -> Pos2 {
        match self.0 {
            0 => Pos2::new(v.x, v.y),
            1 => Pos2::new(v.y, v.x.saturating_neg()),
            2 => Pos2::new(v.x.saturating_neg(), v.y.saturating_neg()),
            _ => Pos2::new(v.y.saturating_neg(), v.x),
        }
    }

    /// Rotates a per-piece bounding-box size into view space.
    ///
    /// Extents are inclusive on the near faces for each orientation, so one
    /// unit is taken off the axes that end up facing the camera.
    #[must_use]
    pub const fn rotate_bound_box_size(self, size: Pos3) -> Pos3 {
        let (x, y, turn) = match self.0 {
            0 => (size.x - 1, size.y - 1, Self::R0),
            1 => (size.x - 1, size.y, Self::R3),
            2 => (size.x, size.y, Self::R2),
            _ => (size.x, size.y - 1, Self::R1),
        };
        Pos3::from_xy(turn.rotate(Pos2::new(x, y)), size.z)
    }

    /// Projects a world position onto the unzoomed viewport.
    ///
    /// The arithmetic saturates at the `i32` range.
    #[must_use]
    pub const fn game_to_screen(self, p: Pos3) -> ScreenPos {
        let (sx, sy) = match self.0 {
            0 => (p.y.saturating_sub(p.x), p.x.saturating_add(p.y)),
            1 => (
                p.x.saturating_neg().saturating_sub(p.y),
                p.y.saturating_sub(p.x),
            ),
            2 => (
                p.x.saturating_sub(p.y),
                p.x.saturating_neg().saturating_sub(p.y),
            ),
            _ => (p.x.saturating_add(p.y), p.x.saturating_sub(p.y)),
        };
        ScreenPos::new(sx, (sy >> 1).saturating_sub(p.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps() {
        assert_eq!(Rotation::new(5), Rotation::R1);
        assert_eq!(Rotation::new(3).quarter_turns(), 3);
    }

    #[test]
    fn flip_x_axis_swaps_odd_turns() {
        assert_eq!(Rotation::R0.flip_x_axis(), Rotation::R0);
        assert_eq!(Rotation::R1.flip_x_axis(), Rotation::R3);
        assert_eq!(Rotation::R2.flip_x_axis(), Rotation::R2);
        assert_eq!(Rotation::R3.flip_x_axis(), Rotation::R1);
    }

    #[test]
    fn rotate_then_inverse_is_identity() {
        let v = Pos2::new(7, -3);
        for r in Rotation::ALL {
            assert_eq!(r.inverse().rotate(r.rotate(v)), v, "rotation {r:?}");
        }
    }

    #[test]
    fn extreme_coordinates_saturate() {
        let v = Pos2::new(i32::MIN, i32::MAX);
        assert_eq!(Rotation::R1.rotate(v), Pos2::new(i32::MAX, i32::MAX));
        assert_eq!(Rotation::R2.rotate(v), Pos2::new(i32::MAX, -i32::MAX));
        let far = Pos3::new(i32::MAX, i32::MAX, i32::MIN);
        for r in Rotation::ALL {
            let _ = r.game_to_screen(far);
        }
        assert_eq!(
            Rotation::R3.game_to_screen(Pos3::new(i32::MAX, 1, 0)),
            ScreenPos::new(i32::MAX, (i32::MAX - 1) >> 1)
        );
    }

    #[test]
    fn rotate_quarter_turn() {
        assert_eq!(Rotation::R1.rotate(Pos2::new(1, 2)), Pos2::new(2, -1));
        assert_eq!(Rotation::R3.rotate(Pos2::new(1, 2)), Pos2::new(-2, 1));
    }

    #[test]
    fn bound_box_size_shrinks_near_faces() {
        let size = Pos3::new(32, 16, 8);
        assert_eq!(
            Rotation::R0.rotate_bound_box_size(size),
            Pos3::new(31, 15, 8)
        );
        assert_eq!(
            Rotation::R1.rotate_bound_box_size(size),
            Pos3::new(-16, 31, 8)
        );
        assert_eq!(
            Rotation::R2.rotate_bound_box_size(size),
            Pos3::new(-32, -16, 8)
        );
        assert_eq!(
            Rotation::R3.rotate_bound_box_size(size),
            Pos3::new(15, -32, 8)
        );
    }

    #[test]
    fn game_to_screen_origin_and_height() {
        for r in Rotation::ALL {
            assert_eq!(r.game_to_screen(Pos3::new(0, 0, 0)), ScreenPos::new(0, 0));
            assert_eq!(
                r.game_to_screen(Pos3::new(0, 0, 16)),
                ScreenPos::new(0, -16)
            );
        }
        assert_eq!(
            Rotation::R0.game_to_screen(Pos3::new(32, 0, 0)),
            ScreenPos::new(-32, 16)
        );
        assert_eq!(
            Rotation::R2.game_to_screen(Pos3::new(32, 0, 0)),
            ScreenPos::new(32, -16)
        );
    }
}
