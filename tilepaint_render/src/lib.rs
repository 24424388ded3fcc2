// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw plans, drawer replay and hit-testing for tilepaint.
//!
//! This crate sits between an arranged
//! [`PaintSession`](tilepaint_core::session::PaintSession) and the platform
//! blitter. It defines:
//!
//! - [`DrawPlan`]: the frame flattened into back-to-front [`DrawItem`]s and
//!   [`TextItem`]s, with see-through culling and zoom snapping applied
//! - [`Drawer`] and [`replay`]: the blitter boundary
//! - [`hit_test`]: the frontmost sprite under a point, filtered by kind
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` / `trace-rich` (disabled by default): Forward to the matching
//!   `tilepaint_core` features. With `trace-rich`, plans keep the records
//!   they culled.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod drawer;
mod hit;
mod plan;

pub use drawer::{Drawer, replay};
pub use hit::{Interaction, PixelHitTester, hit_test};
pub use plan::{DrawItem, DrawPlan, DrawRole, SEE_THROUGH_COLOUR, TextItem};
