// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for tilepaint diagnostics.
//!
//! This crate provides [`TraceSink`](tilepaint_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`export`]: JSON for recorded events and for whole draw plans.

pub mod export;
pub mod pretty;
pub mod recorder;
