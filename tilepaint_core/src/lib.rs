// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite queuing and back-to-front ordering for isometric tile maps.
//!
//! `tilepaint_core` collects the sprites a frame's tile painters produce,
//! sorts them so that nothing is drawn over something that should appear in
//! front of it, and hands the ordered chains to a drawer. It is `no_std`
//! compatible (with `alloc`), keeps every record in a per-frame arena and
//! links records through `u32` slot indices.
//!
//! # Architecture
//!
//! ```text
//!   PaintSession::init(render target, options)
//!       │
//!       ▼
//!   tile painters ──► plot list (add_to_plot_list_*, attach_to_previous,
//!       │             add_to_string_plot_list)
//!       │                 │
//!       │                 ▼
//!       │             Arena ◄──── QuadrantIndex (depth buckets)
//!       ▼
//!   end_tile ──► track/road slots merged into the index
//!       │
//!       ▼
//!   arrange_structs ──► Orderer ──► ordered chain ──► drawer
//! ```
//!
//! **[`session`]**: the paint session. Owns the frame's arena, quadrant
//! index and all per-tile context; exposes the plot-list API and the ordered
//! result.
//!
//! **[`arena`]**: fixed-capacity per-frame record storage with
//! frame-stamped [`RecordId`](arena::RecordId) handles.
//!
//! **[`record`]**: the three record kinds (sprite, attachment, text label)
//! as one closed enum.
//!
//! **[`quadrant`]** and **[`order`]**: depth bucketing and the window sweep
//! that turns buckets into a back-to-front chain.
//!
//! **[`geometry`]**: world and screen coordinates and the four-way
//! isometric projection.
//!
//! **[`segment`]**, **[`support`]**, **[`tunnel`]**, **[`bridge`]**:
//! per-tile bookkeeping shared between painters of the same tile.
//!
//! **[`image`]**: image ids, the render target and the image-extent lookup.
//!
//! **[`interaction`]**: the kinds of map object a sprite can belong to and
//! filters over them.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-move
//!   ordering events and per-record cull events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod arena;
pub mod bridge;
pub mod geometry;
pub mod image;
pub mod interaction;
pub mod order;
pub mod quadrant;
pub mod record;
pub mod segment;
pub mod session;
pub mod support;
pub mod trace;
pub mod tunnel;
