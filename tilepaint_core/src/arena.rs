// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-capacity per-frame record storage.
//!
//! The arena hands out slots in allocation order and never grows past the
//! capacity it was created with. Running out is a soft failure: callers get
//! `None` and the frame simply loses the extra sprites. All slots are
//! released together by [`Arena::reset`], which also bumps the frame epoch
//! so that [`RecordId`]s from earlier frames are detected as stale.

use alloc::vec::Vec;
use core::fmt;

use crate::record::{AttachedRecord, PaintEntry, SpriteRecord, TextRecord};

/// Sentinel value meaning "no record" in chain link fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a record in an [`Arena`].
///
/// Carries the slot index and the frame epoch the record was allocated in.
/// Handles are only meaningful until the arena is next reset.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub(crate) idx: u32,
    pub(crate) frame: u32,
}

impl RecordId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the frame epoch the record belongs to.
    #[inline]
    #[must_use]
    pub const fn frame(self) -> u32 {
        self.frame
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({}@frame{})", self.idx, self.frame)
    }
}

/// Per-frame record storage.
#[derive(Clone, Debug)]
pub struct Arena {
    entries: Vec<PaintEntry>,
    capacity: u32,
    frame: u32,
}

impl Arena {
    /// Creates an arena holding at most `capacity` records.
    ///
    /// The backing storage is reserved up front and never reallocated.
    #[must_use]
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            entries: Vec::with_capacity(capacity as usize),
            capacity,
            frame: 0,
        }
    }

    /// Releases every record and starts a new frame epoch.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frame = self.frame.wrapping_add(1);
    }

    /// Stores `entry` in the next free slot.
    ///
    /// Returns `None` once `capacity` records have been allocated.
    pub fn allocate(&mut self, entry: PaintEntry) -> Option<RecordId> {
        if self.is_full() {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "length is bounded by the u32 capacity"
        )]
        let idx = self.entries.len() as u32;
        self.entries.push(entry);
        Some(RecordId {
            idx,
            frame: self.frame,
        })
    }

    /// Returns the number of allocated records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been allocated this frame.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of records per frame.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns `true` if no further allocation can succeed this frame.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity as usize
    }

    /// Returns the current frame epoch.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Returns `true` if `id` refers to a record of the current frame.
    #[inline]
    #[must_use]
    pub fn is_live(&self, id: RecordId) -> bool {
        id.frame == self.frame && (id.idx as usize) < self.entries.len()
    }

    /// Returns the record `id` refers to.
    ///
    /// # Panics
    ///
    /// Panics if `id` is from an earlier frame.
    #[must_use]
    pub fn get(&self, id: RecordId) -> &PaintEntry {
        self.validate(id);
        &self.entries[id.idx as usize]
    }

    /// Returns the sprite `id` refers to, or `None` if it is another kind.
    ///
    /// # Panics
    ///
    /// Panics if `id` is from an earlier frame.
    #[must_use]
    pub fn sprite(&self, id: RecordId) -> Option<&SpriteRecord> {
        match self.get(id) {
            PaintEntry::Sprite(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the attachment `id` refers to, or `None` if it is another kind.
    ///
    /// # Panics
    ///
    /// Panics if `id` is from an earlier frame.
    #[must_use]
    pub fn attached(&self, id: RecordId) -> Option<&AttachedRecord> {
        match self.get(id) {
            PaintEntry::Attached(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the text label `id` refers to, or `None` if it is another kind.
    ///
    /// # Panics
    ///
    /// Panics if `id` is from an earlier frame.
    #[must_use]
    pub fn text(&self, id: RecordId) -> Option<&TextRecord> {
        match self.get(id) {
            PaintEntry::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Returns an iterator over all records in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &PaintEntry)> + '_ {
        let frame = self.frame;
        (0_u32..).zip(self.entries.iter()).map(move |(idx, entry)| (RecordId { idx, frame }, entry))
    }

    /// Builds a handle for a slot index of the current frame.
    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> RecordId {
        RecordId {
            idx,
            frame: self.frame,
        }
    }

    // -- slot access for the session internals --

    pub(crate) fn sprite_at(&self, idx: u32) -> &SpriteRecord {
        match &self.entries[idx as usize] {
            PaintEntry::Sprite(s) => s,
            other => panic!("slot {idx} holds a {} record, not a sprite", other.kind_name()),
        }
    }

    pub(crate) fn sprite_at_mut(&mut self, idx: u32) -> &mut SpriteRecord {
        match &mut self.entries[idx as usize] {
            PaintEntry::Sprite(s) => s,
            other => panic!("slot {idx} holds a {} record, not a sprite", other.kind_name()),
        }
    }

    pub(crate) fn attached_at(&self, idx: u32) -> &AttachedRecord {
        match &self.entries[idx as usize] {
            PaintEntry::Attached(a) => a,
            other => panic!("slot {idx} holds a {} record, not an attachment", other.kind_name()),
        }
    }

    pub(crate) fn attached_at_mut(&mut self, idx: u32) -> &mut AttachedRecord {
        match &mut self.entries[idx as usize] {
            PaintEntry::Attached(a) => a,
            other => panic!("slot {idx} holds a {} record, not an attachment", other.kind_name()),
        }
    }

    pub(crate) fn text_at(&self, idx: u32) -> &TextRecord {
        match &self.entries[idx as usize] {
            PaintEntry::Text(t) => t,
            other => panic!("slot {idx} holds a {} record, not text", other.kind_name()),
        }
    }

    pub(crate) fn text_at_mut(&mut self, idx: u32) -> &mut TextRecord {
        match &mut self.entries[idx as usize] {
            PaintEntry::Text(t) => t,
            other => panic!("slot {idx} holds a {} record, not text", other.kind_name()),
        }
    }

    fn validate(&self, id: RecordId) {
        assert!(
            self.is_live(id),
            "stale RecordId: {id:?} (arena frame {})",
            self.frame
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SpriteRecord;

    fn sprite() -> PaintEntry {
        PaintEntry::Sprite(SpriteRecord::default())
    }

    #[test]
    fn allocates_up_to_capacity() {
        let mut arena = Arena::with_capacity(3);
        for i in 0..3 {
            let id = arena.allocate(sprite()).expect("within capacity");
            assert_eq!(id.index(), i);
        }
        assert!(arena.is_full());
        assert!(arena.allocate(sprite()).is_none());
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn zero_capacity_never_allocates() {
        let mut arena = Arena::with_capacity(0);
        assert!(arena.allocate(sprite()).is_none());
        assert!(arena.is_empty());
    }

    #[test]
    fn reset_frees_slots_and_bumps_frame() {
        let mut arena = Arena::with_capacity(2);
        let old = arena.allocate(sprite()).unwrap();
        arena.allocate(sprite()).unwrap();
        arena.reset();
        assert!(arena.is_empty());
        assert!(!arena.is_live(old));
        let new = arena.allocate(sprite()).unwrap();
        assert_eq!(new.index(), old.index());
        assert_ne!(new.frame(), old.frame());
    }

    #[test]
    #[should_panic(expected = "stale RecordId")]
    fn stale_handle_panics() {
        let mut arena = Arena::with_capacity(1);
        let id = arena.allocate(sprite()).unwrap();
        arena.reset();
        let _ = arena.get(id);
    }

    #[test]
    fn typed_accessors_match_variant() {
        let mut arena = Arena::with_capacity(2);
        let s = arena.allocate(sprite()).unwrap();
        let t = arena
            .allocate(PaintEntry::Text(TextRecord::default()))
            .unwrap();
        assert!(arena.sprite(s).is_some());
        assert!(arena.text(s).is_none());
        assert!(arena.text(t).is_some());
        assert!(arena.attached(t).is_none());
    }

    #[test]
    fn iter_walks_allocation_order() {
        let mut arena = Arena::with_capacity(4);
        arena.allocate(sprite()).unwrap();
        arena
            .allocate(PaintEntry::Attached(AttachedRecord::default()))
            .unwrap();
        let kinds: Vec<_> = arena.iter().map(|(_, e)| e.kind_name()).collect();
        assert_eq!(kinds, ["sprite", "attached"]);
    }
}
