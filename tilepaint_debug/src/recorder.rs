// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Rich events ([`on_ordering_moves`](TraceSink::on_ordering_moves),
//! [`on_draw_culls`](TraceSink::on_draw_culls)) store only the count.

use tilepaint_core::geometry::Rotation;
use tilepaint_core::trace::{
    DrawCull, FrameSummary, OrderingMove, PhaseBeginEvent, PhaseEndEvent, PhaseKind,
    SessionInitEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SESSION_INIT: u8 = 1;
const TAG_PHASE_BEGIN: u8 = 2;
const TAG_PHASE_END: u8 = 3;
const TAG_FRAME_SUMMARY: u8 = 4;
const TAG_ORDERING_MOVES_COUNT: u8 = 5;
const TAG_DRAW_CULLS_COUNT: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_option_u32(&mut self, v: Option<u32>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_u32(val);
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
            }
        }
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Enqueue => 0,
            PhaseKind::Arrange => 1,
            PhaseKind::Finalise => 2,
            PhaseKind::Draw => 3,
        });
    }

    fn write_count(&mut self, tag: u8, frame_index: u64, len: usize) {
        self.write_u8(tag);
        self.write_u64(frame_index);
        let count = u32::try_from(len).unwrap_or(u32::MAX);
        self.write_u32(count);
    }
}

impl TraceSink for RecorderSink {
    fn on_session_init(&mut self, e: &SessionInitEvent) {
        self.write_u8(TAG_SESSION_INIT);
        self.write_u64(e.frame_index);
        self.write_u8(e.rotation.quarter_turns());
        self.write_u8(e.zoom);
        self.write_u32(e.arena_capacity);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u32(e.arena_used);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u32(e.arena_used);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u32(s.sprites);
        self.write_u32(s.attachments);
        self.write_u32(s.strings);
        self.write_u32(s.dropped);
        self.write_u32(s.culled);
        self.write_u32(s.ordered);
        self.write_u32(s.moves);
        self.write_option_u32(s.back_quadrant);
        self.write_option_u32(s.front_quadrant);
    }

    fn on_ordering_moves(&mut self, frame_index: u64, moves: &[OrderingMove]) {
        self.write_count(TAG_ORDERING_MOVES_COUNT, frame_index, moves.len());
    }

    fn on_draw_culls(&mut self, frame_index: u64, culls: &[DrawCull]) {
        self.write_count(TAG_DRAW_CULLS_COUNT, frame_index, culls.len());
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`SessionInitEvent`].
    SessionInit(SessionInitEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
    /// Ordering-move count for a frame.
    OrderingMovesCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of sprites moved.
        count: u32,
    },
    /// Draw-cull count for a frame.
    DrawCullsCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of records culled.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_option_u32(&mut self) -> Option<Option<u32>> {
        let present = self.read_u8()?;
        let val = self.read_u32()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Enqueue,
            1 => PhaseKind::Arrange,
            2 => PhaseKind::Finalise,
            _ => PhaseKind::Draw,
        })
    }

    fn decode_session_init(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SessionInit(SessionInitEvent {
            frame_index: self.read_u64()?,
            rotation: Rotation::new(self.read_u8()?),
            zoom: self.read_u8()?,
            arena_capacity: self.read_u32()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            arena_used: self.read_u32()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            arena_used: self.read_u32()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            sprites: self.read_u32()?,
            attachments: self.read_u32()?,
            strings: self.read_u32()?,
            dropped: self.read_u32()?,
            culled: self.read_u32()?,
            ordered: self.read_u32()?,
            moves: self.read_u32()?,
            back_quadrant: self.read_option_u32()?,
            front_quadrant: self.read_option_u32()?,
        }))
    }

    fn decode_count(&mut self) -> Option<(u64, u32)> {
        Some((self.read_u64()?, self.read_u32()?))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_SESSION_INIT => self.decode_session_init(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            TAG_ORDERING_MOVES_COUNT => {
                let (frame_index, count) = self.decode_count()?;
                Some(RecordedEvent::OrderingMovesCount { frame_index, count })
            }
            TAG_DRAW_CULLS_COUNT => {
                let (frame_index, count) = self.decode_count()?;
                Some(RecordedEvent::DrawCullsCount { frame_index, count })
            }
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
