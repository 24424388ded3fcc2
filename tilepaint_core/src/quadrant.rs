// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth buckets for top-level sprites.
//!
//! Every sprite that takes part in ordering is filed into one of
//! [`QUADRANT_COUNT`] buckets keyed by how far it is from the camera along
//! the view diagonal. Buckets are chains threaded through the sprites' own
//! `next_in_quadrant` links, newest first. The index also tracks the lowest
//! and highest bucket used so ordering only visits the occupied range.

use alloc::vec;
use alloc::vec::Vec;

use crate::arena::{Arena, INVALID};
use crate::geometry::{Pos2, Rotation, TILE_SIZE};

/// Number of depth buckets.
pub const QUADRANT_COUNT: usize = 1024;

const RANGE_MAX: i32 = QUADRANT_COUNT as i32 * TILE_SIZE;
const RANGE_CENTRE: i32 = RANGE_MAX / 2;

/// Returns the bucket a sprite with bounding-box origin `pos` belongs to.
///
/// The diagonal distance is offset so that it stays positive for every
/// rotation; anything outside the range is clamped into the first or last
/// bucket.
#[must_use]
pub fn quadrant_for(pos: Pos2, rotation: Rotation) -> u16 {
    let (x, y) = (i64::from(pos.x), i64::from(pos.y));
    let (centre, max) = (i64::from(RANGE_CENTRE), i64::from(RANGE_MAX));
    let hash = match rotation.quarter_turns() {
        0 => x + y,
        1 => (y - x) + centre,
        2 => max - (x + y),
        _ => (x - y) + centre,
    };
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped into 0..QUADRANT_COUNT"
    )]
    let idx = (hash / i64::from(TILE_SIZE)).clamp(0, QUADRANT_COUNT as i64 - 1) as u16;
    idx
}

/// The bucket index.
#[derive(Clone, Debug)]
pub struct QuadrantIndex {
    heads: Vec<u32>,
    back: u32,
    front: u32,
}

impl Default for QuadrantIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadrantIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heads: vec![INVALID; QUADRANT_COUNT],
            back: INVALID,
            front: 0,
        }
    }

    /// Empties every bucket.
    pub fn clear(&mut self) {
        self.heads.fill(INVALID);
        self.back = INVALID;
        self.front = 0;
    }

    /// Returns `true` if no sprite has been filed.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.back == INVALID
    }

    /// Returns the lowest and highest occupied bucket.
    #[must_use]
    pub const fn range(&self) -> Option<(u32, u32)> {
        if self.is_empty() {
            None
        } else {
            Some((self.back, self.front))
        }
    }

    /// Files the sprite in slot `idx` under its bucket.
    ///
    /// The sprite becomes the new head of that bucket.
    pub(crate) fn insert(&mut self, arena: &mut Arena, idx: u32, rotation: Rotation) {
        let sprite = arena.sprite_at_mut(idx);
        let q = quadrant_for(Pos2::new(sprite.bounds.x, sprite.bounds.y), rotation);
        let bucket = &mut self.heads[q as usize];
        sprite.quadrant = q;
        sprite.next_in_quadrant = *bucket;
        *bucket = idx;
        let q = u32::from(q);
        self.back = if self.back == INVALID {
            q
        } else {
            self.back.min(q)
        };
        self.front = self.front.max(q);
    }

    /// Returns the head slot of bucket `q`, or [`INVALID`].
    #[inline]
    pub(crate) fn head(&self, q: u32) -> u32 {
        self.heads[q as usize]
    }

    /// Returns the slots in bucket `q`, newest first.
    pub fn bucket<'a>(&self, arena: &'a Arena, q: u16) -> Bucket<'a> {
        Bucket {
            arena,
            next: self.heads.get(q as usize).copied().unwrap_or(INVALID),
        }
    }
}

/// Iterator over the slots of one bucket.
///
/// Created by [`QuadrantIndex::bucket`].
pub struct Bucket<'a> {
    arena: &'a Arena,
    next: u32,
}

impl Iterator for Bucket<'_> {
    type Item = crate::arena::RecordId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == INVALID {
            return None;
        }
        let idx = self.next;
        self.next = self.arena.sprite_at(idx).next_in_quadrant;
        Some(self.arena.id_at(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PaintEntry, SpriteRecord};

    fn filed(arena: &mut Arena, index: &mut QuadrantIndex, x: i32, y: i32, r: Rotation) -> u32 {
        let mut s = SpriteRecord::default();
        s.bounds.x = x;
        s.bounds.y = y;
        let id = arena.allocate(PaintEntry::Sprite(s)).unwrap();
        index.insert(arena, id.index(), r);
        id.index()
    }

    #[test]
    fn hash_per_rotation() {
        let p = Pos2::new(64, 32);
        assert_eq!(quadrant_for(p, Rotation::R0), 3);
        assert_eq!(quadrant_for(p, Rotation::R1), 511);
        assert_eq!(quadrant_for(p, Rotation::R2), 1021);
        assert_eq!(quadrant_for(p, Rotation::R3), 513);
    }

    #[test]
    fn hash_clamps_out_of_range() {
        assert_eq!(quadrant_for(Pos2::new(-4000, -4000), Rotation::R0), 0);
        assert_eq!(quadrant_for(Pos2::new(40000, 40000), Rotation::R0), 1023);
    }

    #[test]
    fn buckets_are_newest_first() {
        let mut arena = Arena::with_capacity(8);
        let mut index = QuadrantIndex::new();
        let a = filed(&mut arena, &mut index, 0, 0, Rotation::R0);
        let b = filed(&mut arena, &mut index, 1, 1, Rotation::R0);
        let slots: Vec<_> = index.bucket(&arena, 0).map(|id| id.index()).collect();
        assert_eq!(slots, [b, a]);
    }

    #[test]
    fn range_tracks_back_and_front() {
        let mut arena = Arena::with_capacity(8);
        let mut index = QuadrantIndex::new();
        assert_eq!(index.range(), None);
        filed(&mut arena, &mut index, 320, 0, Rotation::R0);
        filed(&mut arena, &mut index, 64, 0, Rotation::R0);
        filed(&mut arena, &mut index, 640, 0, Rotation::R0);
        assert_eq!(index.range(), Some((2, 20)));
        index.clear();
        assert!(index.is_empty());
    }

    #[test]
    fn first_bucket_alone_is_a_valid_range() {
        let mut arena = Arena::with_capacity(1);
        let mut index = QuadrantIndex::new();
        filed(&mut arena, &mut index, 0, 0, Rotation::R0);
        assert_eq!(index.range(), Some((0, 0)));
    }
}
