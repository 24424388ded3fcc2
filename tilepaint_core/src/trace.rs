// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the paint pipeline.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! session and the draw plan call at each stage of a frame. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`OrderingMove`] and [`DrawCull`]
//!   events plus the corresponding `TraceSink` methods.

use crate::geometry::Rotation;

#[cfg(feature = "trace-rich")]
use crate::image::ImageId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of the paint pipeline is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Plot-list calls from the tile painters.
    Enqueue,
    /// Quadrant ordering.
    Arrange,
    /// Track/road slot finalisation at the end of a tile.
    Finalise,
    /// Flattening the ordered chain into draw commands.
    Draw,
}

impl PhaseKind {
    /// Returns a short lowercase name, for log output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enqueue => "enqueue",
            Self::Arrange => "arrange",
            Self::Finalise => "finalise",
            Self::Draw => "draw",
        }
    }
}

/// Why a queued record was not drawn.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CullReason {
    /// A see-through view flag hides this kind while underground.
    Underground,
    /// A see-through view flag hides an image that is already blended.
    AlreadyBlended,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a session is initialised for a new frame.
#[derive(Clone, Copy, Debug)]
pub struct SessionInitEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Viewport rotation for the frame.
    pub rotation: Rotation,
    /// Render target zoom level.
    pub zoom: u8,
    /// Maximum number of records the arena can hold.
    pub arena_capacity: u32,
}

/// Marks the beginning of a pipeline phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Records allocated so far this frame.
    pub arena_used: u32,
}

/// Marks the end of a pipeline phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Records allocated so far this frame.
    pub arena_used: u32,
}

/// Per-frame counters, emitted once the frame has been ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Sprite records created.
    pub sprites: u32,
    /// Attached records created.
    pub attachments: u32,
    /// Text records created.
    pub strings: u32,
    /// Records dropped because the arena was full.
    pub dropped: u32,
    /// Sprites rejected at creation by the visibility test.
    pub culled: u32,
    /// Top-level sprites in the ordered chain.
    pub ordered: u32,
    /// Sprites moved by the ordering passes.
    pub moves: u32,
    /// Lowest occupied quadrant, if any.
    pub back_quadrant: Option<u32>,
    /// Highest occupied quadrant, if any.
    pub front_quadrant: Option<u32>,
}

/// A sprite moved ahead of another during ordering.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderingMove {
    /// Arena slot of the sprite that moved.
    pub moved: u32,
    /// Arena slot of the sprite it now precedes.
    pub ahead_of: u32,
}

/// A record left out of the draw plan by view-flag culling.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCull {
    /// Arena slot of the culled record.
    pub slot: u32,
    /// Image that would have been drawn.
    pub image: ImageId,
    /// Why it was culled.
    pub reason: CullReason,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the paint pipeline.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a session is initialised for a frame.
    fn on_session_init(&mut self, e: &SessionInitEvent) {
        _ = e;
    }

    /// Called at the beginning of a pipeline phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pipeline phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called with the per-frame counters.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called with the moves of one ordering run (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_ordering_moves(&mut self, frame_index: u64, moves: &[OrderingMove]) {
        _ = (frame_index, moves);
    }

    /// Called with the records culled while building a draw plan (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_draw_culls(&mut self, frame_index: u64, culls: &[DrawCull]) {
        _ = (frame_index, culls);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`SessionInitEvent`].
    #[inline]
    pub fn session_init(&mut self, e: &SessionInitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_session_init(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, summary: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_summary(summary);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = summary;
        }
    }

    /// Emits ordering moves.
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn ordering_moves(&mut self, frame_index: u64, moves: &[OrderingMove]) {
        if let Some(s) = &mut self.sink {
            s.on_ordering_moves(frame_index, moves);
        }
    }

    /// Emits draw culls.
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn draw_culls(&mut self, frame_index: u64, culls: &[DrawCull]) {
        if let Some(s) = &mut self.sink {
            s.on_draw_culls(frame_index, culls);
        }
    }
}
