// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Back-to-front ordering of top-level sprites.
//!
//! Sprites are first laid out bucket by bucket, from the bucket furthest from
//! the camera to the nearest. The engine then sweeps a two-bucket window
//! across that list. Inside the window every pending sprite is visited once;
//! any later neighbour that lies behind it (see [`is_behind`]) is unlinked
//! and reinserted just ahead of it.
//!
//! The list is held in a side table of `next` links over dense node
//! indices, with a virtual head node at index `n`. Per-node visit state also
//! lives in a side table and persists from one window to the next.
//!
//! # Tie-break
//!
//! Every node is visited at most once per window and moves are applied as
//! they are found, so the outcome depends only on the input order. For two
//! sprites in the same bucket that each consider the other to be behind,
//! the sprite visited later wins: the one enqueued first ends up drawn last.

use alloc::vec::Vec;

use crate::arena::{Arena, INVALID};
use crate::geometry::Rotation;
use crate::quadrant::QuadrantIndex;
use crate::record::BoundBox;

#[cfg(feature = "trace-rich")]
use crate::trace::OrderingMove;

/// Returns `true` if `candidate` must be drawn before `visited`.
///
/// The test is asymmetric and rotation dependent. Along every axis the
/// visited box must reach the candidate's near face, and the two boxes must
/// not overlap on all three axes at once.
#[must_use]
pub fn is_behind(candidate: &BoundBox, visited: &BoundBox, rotation: Rotation) -> bool {
    let (a, b) = (visited, candidate);
    if a.z_end < b.z {
        return false;
    }
    let overlap_z = a.z < b.z_end;
    match rotation.quarter_turns() {
        0 => {
            a.y_end >= b.y
                && a.x_end >= b.x
                && !(overlap_z && a.y < b.y_end && a.x < b.x_end)
        }
        1 => {
            a.y_end >= b.y
                && a.x_end < b.x
                && !(overlap_z && a.y < b.y_end && a.x >= b.x_end)
        }
        2 => {
            a.y_end < b.y
                && a.x_end < b.x
                && !(overlap_z && a.y >= b.y_end && a.x >= b.x_end)
        }
        _ => {
            a.y_end < b.y
                && a.x_end >= b.x
                && !(overlap_z && a.y >= b.y_end && a.x < b.x_end)
        }
    }
}

const PENDING: u8 = 1 << 0;
const NEIGHBOUR: u8 = 1 << 1;
const OUTSIDE: u8 = 1 << 2;

/// Counters from one ordering run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrderStats {
    /// Sprites that took part.
    pub sprites: u32,
    /// Window passes performed.
    pub passes: u32,
    /// Sprites moved ahead of another.
    pub moves: u32,
}

/// Reusable ordering state.
///
/// Holding one of these across frames keeps the side tables allocated.
#[derive(Clone, Debug, Default)]
pub struct Orderer {
    slots: Vec<u32>,
    quadrant: Vec<u32>,
    bounds: Vec<BoundBox>,
    next: Vec<u32>,
    visit: Vec<u8>,
    #[cfg(feature = "trace-rich")]
    moves: Vec<OrderingMove>,
}

impl Orderer {
    /// Creates an empty orderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders every sprite filed in `index` and writes their slots,
    /// back to front, into `out`.
    ///
    /// `out` is cleared first.
    pub fn arrange_into(
        &mut self,
        arena: &Arena,
        index: &QuadrantIndex,
        rotation: Rotation,
        out: &mut Vec<u32>,
    ) -> OrderStats {
        out.clear();
        self.load(arena, index);
        let Some((back, front)) = index.range() else {
            return OrderStats::default();
        };

        let head = self.head();
        let mut stats = OrderStats {
            sprites: head,
            ..OrderStats::default()
        };

        let mut entry = self.pass(head, back, NEIGHBOUR, rotation, &mut stats);
        let mut q = back + 1;
        while q < front {
            entry = self.pass(entry, q, 0, rotation, &mut stats);
            q += 1;
        }

        let mut node = self.next[head as usize];
        while node != INVALID {
            out.push(self.slots[node as usize]);
            node = self.next[node as usize];
        }
        stats
    }

    /// Moves recorded during the last run.
    #[cfg(feature = "trace-rich")]
    #[must_use]
    pub fn moves(&self) -> &[OrderingMove] {
        &self.moves
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "node count is bounded by the u32 arena capacity"
    )]
    fn head(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Concatenates the buckets from back to front into one list.
    fn load(&mut self, arena: &Arena, index: &QuadrantIndex) {
        self.slots.clear();
        self.quadrant.clear();
        self.bounds.clear();
        self.next.clear();
        self.visit.clear();
        #[cfg(feature = "trace-rich")]
        self.moves.clear();

        if let Some((back, front)) = index.range() {
            for q in back..=front {
                let mut slot = index.head(q);
                while slot != INVALID {
                    let sprite = arena.sprite_at(slot);
                    self.slots.push(slot);
                    self.quadrant.push(u32::from(sprite.quadrant));
                    self.bounds.push(sprite.bounds);
                    slot = sprite.next_in_quadrant;
                }
            }
        }

        let n = self.head();
        self.next.extend(1..=n);
        if let Some(last) = self.next.last_mut() {
            *last = INVALID;
        }
        // Virtual head.
        self.next.push(if n == 0 { INVALID } else { 0 });
        self.visit.resize(self.slots.len() + 1, 0);
    }

    /// Runs one window pass for bucket `q` starting from `start`.
    ///
    /// Returns the node just before the first node of bucket `q` or later,
    /// which is where the next pass picks up.
    fn pass(
        &mut self,
        start: u32,
        q: u32,
        flag: u8,
        rotation: Rotation,
        stats: &mut OrderStats,
    ) -> u32 {
        stats.passes += 1;

        let mut node = start;
        loop {
            let next = self.next[node as usize];
            if next == INVALID {
                return node;
            }
            if self.quadrant[next as usize] >= q {
                break;
            }
            node = next;
        }
        let entry = node;

        // Classify the window.
        let mut node = self.next[entry as usize];
        while node != INVALID {
            let nq = self.quadrant[node as usize];
            let visit = &mut self.visit[node as usize];
            if nq > q + 1 {
                *visit = OUTSIDE;
                break;
            } else if nq == q + 1 {
                *visit = NEIGHBOUR | PENDING;
            } else if nq == q {
                *visit = flag | PENDING;
            }
            node = self.next[node as usize];
        }

        let mut anchor = entry;
        loop {
            let visited = loop {
                let next = self.next[anchor as usize];
                if next == INVALID || self.visit[next as usize] & OUTSIDE != 0 {
                    return entry;
                }
                if self.visit[next as usize] & PENDING != 0 {
                    break next;
                }
                anchor = next;
            };
            self.visit[visited as usize] &= !PENDING;

            let before = anchor;
            let front = self.bounds[visited as usize];
            let mut prev = visited;
            loop {
                let cand = self.next[prev as usize];
                if cand == INVALID || self.visit[cand as usize] & OUTSIDE != 0 {
                    break;
                }
                if self.visit[cand as usize] & NEIGHBOUR == 0 {
                    prev = cand;
                    continue;
                }
                if is_behind(&self.bounds[cand as usize], &front, rotation) {
                    self.next[prev as usize] = self.next[cand as usize];
                    self.next[cand as usize] = self.next[before as usize];
                    self.next[before as usize] = cand;
                    stats.moves += 1;
                    #[cfg(feature = "trace-rich")]
                    self.moves.push(OrderingMove {
                        moved: self.slots[cand as usize],
                        ahead_of: self.slots[visited as usize],
                    });
                } else {
                    prev = cand;
                }
            }
            anchor = before;
        }
    }
}
