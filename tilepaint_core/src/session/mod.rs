// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paint session: one frame's worth of queued sprites and the context
//! the tile painters mutate while queuing them.
//!
//! A frame goes through three stages:
//!
//! 1. [`init`](PaintSession::init) resets the arena, the quadrant index and
//!    the enqueue cursor for a render target and a set of options.
//! 2. Tile painters call the plot-list methods
//!    ([`add_to_plot_list_as_parent`](PaintSession::add_to_plot_list_as_parent)
//!    and friends), bracketing each tile with
//!    [`reset_tile_column`](PaintSession::reset_tile_column) and
//!    [`end_tile`](PaintSession::end_tile).
//! 3. [`arrange_structs`](PaintSession::arrange_structs) orders the queued
//!    sprites back to front. The result is read through
//!    [`ordered`](PaintSession::ordered), [`children`](PaintSession::children),
//!    [`attachments`](PaintSession::attachments) and
//!    [`texts`](PaintSession::texts).
//!
//! The session owns all of its state. Nothing is global, and a session is
//! not shared between threads while a frame is being built.

mod arrange;
mod config;
mod plot;
mod tile;

use alloc::boxed::Box;
use alloc::vec::Vec;

pub use arrange::{Attachments, Children, Texts};
pub use config::{SessionConfig, SessionOptions, ViewFlags};
pub use tile::{ADDITION_SLOTS, TRACK_ROAD_SLOTS};

use crate::arena::{Arena, INVALID};
use crate::bridge::BridgeEntry;
use crate::geometry::{Pos2, Rotation, ScreenPos};
use crate::image::{ImageTable, RenderTarget};
use crate::interaction::{InteractionItem, OwnerRef};
use crate::order::{OrderStats, Orderer};
use crate::quadrant::QuadrantIndex;
use crate::segment::Segments;
use crate::support::{SupportHeights, TrackRoadAdditionSupports};
use crate::trace::{PhaseBeginEvent, PhaseKind, SessionInitEvent, Tracer};
use crate::tunnel::TunnelTable;

/// Counters for the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Sprite records created.
    pub sprites: u32,
    /// Attached records created.
    pub attachments: u32,
    /// Text records created.
    pub strings: u32,
    /// Records dropped because the arena was full.
    pub dropped: u32,
    /// Sprites rejected by the visibility test.
    pub culled: u32,
}

/// One frame's paint state.
pub struct PaintSession {
    // -- Frame storage --
    pub(crate) arena: Arena,
    pub(crate) quadrants: QuadrantIndex,
    pub(crate) orderer: Orderer,
    pub(crate) ordered: Vec<u32>,
    pub(crate) order_stats: OrderStats,
    pub(crate) images: Box<dyn ImageTable>,

    // -- Frame context --
    pub(crate) render_target: RenderTarget,
    pub(crate) options: SessionOptions,
    pub(crate) frame_index: u64,
    pub(crate) stats: SessionStats,

    // -- Enqueue cursor --
    pub(crate) current: u32,
    pub(crate) text_head: u32,
    pub(crate) text_tail: u32,
    pub(crate) item: InteractionItem,
    pub(crate) owner: OwnerRef,
    pub(crate) mod_id: u8,
    pub(crate) map_pos: Pos2,
    pub(crate) sprite_pos: Pos2,

    // -- Tile in progress --
    pub(crate) tile_screen_pos: ScreenPos,
    pub(crate) did_pass_surface: bool,
    pub(crate) max_height: i32,
    pub(crate) supports: SupportHeights,
    pub(crate) addition_supports: TrackRoadAdditionSupports,
    pub(crate) occupied_track_segments: Segments,
    pub(crate) bridge: BridgeEntry,
    pub(crate) tunnels: TunnelTable,
    pub(crate) track_road: [u32; TRACK_ROAD_SLOTS],
    pub(crate) track_road_additions: [u32; ADDITION_SLOTS],
}

impl core::fmt::Debug for PaintSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaintSession")
            .field("frame_index", &self.frame_index)
            .field("render_target", &self.render_target)
            .field("options", &self.options)
            .field("records", &self.arena.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl PaintSession {
    /// Creates a session.
    ///
    /// `images` resolves image extents for the visibility test. The session
    /// is empty until the first [`init`](Self::init).
    #[must_use]
    pub fn new(config: SessionConfig, images: impl ImageTable + 'static) -> Self {
        Self {
            arena: Arena::with_capacity(config.arena_capacity),
            quadrants: QuadrantIndex::new(),
            orderer: Orderer::new(),
            ordered: Vec::new(),
            order_stats: OrderStats::default(),
            images: Box::new(images),
            render_target: RenderTarget::default(),
            options: SessionOptions::default(),
            frame_index: 0,
            stats: SessionStats::default(),
            current: INVALID,
            text_head: INVALID,
            text_tail: INVALID,
            item: InteractionItem::None,
            owner: OwnerRef::default(),
            mod_id: 0,
            map_pos: Pos2::default(),
            sprite_pos: Pos2::default(),
            tile_screen_pos: ScreenPos::default(),
            did_pass_surface: false,
            max_height: 0,
            supports: SupportHeights::default(),
            addition_supports: TrackRoadAdditionSupports::default(),
            occupied_track_segments: Segments::NONE,
            bridge: BridgeEntry::NONE,
            tunnels: TunnelTable::default(),
            track_road: [INVALID; TRACK_ROAD_SLOTS],
            track_road_additions: [INVALID; ADDITION_SLOTS],
        }
    }

    /// Starts a new frame for `render_target`.
    ///
    /// Every record of the previous frame is released and handles to them
    /// become stale.
    pub fn init(&mut self, render_target: RenderTarget, options: SessionOptions) {
        self.init_traced(render_target, options, &mut Tracer::none());
    }

    /// Like [`init`](Self::init), emitting the session-init event and opening
    /// the enqueue phase on `tracer`.
    pub fn init_traced(
        &mut self,
        render_target: RenderTarget,
        options: SessionOptions,
        tracer: &mut Tracer<'_>,
    ) {
        self.frame_index += 1;
        self.render_target = render_target;
        self.options = options;
        self.stats = SessionStats::default();

        self.arena.reset();
        self.quadrants.clear();
        self.ordered.clear();
        self.order_stats = OrderStats::default();

        self.current = INVALID;
        self.text_head = INVALID;
        self.text_tail = INVALID;
        self.item = InteractionItem::None;
        self.owner = OwnerRef::default();
        self.mod_id = 0;
        self.map_pos = Pos2::default();
        self.sprite_pos = Pos2::default();

        self.max_height = 0;
        self.reset_tile_column(ScreenPos::default());
        self.reset_tile();

        tracer.session_init(&SessionInitEvent {
            frame_index: self.frame_index,
            rotation: options.rotation,
            zoom: render_target.zoom,
            arena_capacity: self.arena.capacity(),
        });
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Enqueue,
            arena_used: 0,
        });
    }

    // -- Context setters --

    /// Sets the interaction kind stamped on subsequently created sprites.
    pub fn set_item_type(&mut self, item: InteractionItem) {
        self.item = item;
    }

    /// Sets the track modification (or signal side) stamped on subsequently
    /// created sprites.
    pub fn set_track_mod_id(&mut self, mod_id: u8) {
        self.mod_id = mod_id;
    }

    /// Sets the map position stamped on subsequently created sprites.
    pub fn set_map_position(&mut self, pos: Pos2) {
        self.map_pos = pos;
    }

    /// Sets the world position sprite offsets are relative to.
    pub fn set_sprite_position(&mut self, pos: Pos2) {
        self.sprite_pos = pos;
    }

    /// Sets the owner reference stamped on subsequently created sprites.
    pub fn set_current_item(&mut self, owner: OwnerRef) {
        self.owner = owner;
    }

    /// Forgets the current sprite, so the next child starts a new parent and
    /// attachments have nothing to attach to.
    pub fn reset_last_ps(&mut self) {
        self.current = INVALID;
    }

    // -- Accessors --

    /// Returns the record storage of the current frame.
    #[inline]
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Returns the quadrant index of the current frame.
    #[inline]
    #[must_use]
    pub fn quadrants(&self) -> &QuadrantIndex {
        &self.quadrants
    }

    /// Returns the render target passed to the last `init`.
    #[inline]
    #[must_use]
    pub const fn render_target(&self) -> RenderTarget {
        self.render_target
    }

    /// Returns the viewport rotation.
    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.options.rotation
    }

    /// Returns the view flags.
    #[inline]
    #[must_use]
    pub const fn view_flags(&self) -> ViewFlags {
        self.options.view_flags
    }

    /// Returns the foreground cull height.
    #[inline]
    #[must_use]
    pub const fn foreground_cull_height(&self) -> i16 {
        self.options.foreground_cull_height
    }

    /// Returns the frame counter, incremented by every `init`.
    #[inline]
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Returns the counters of the current frame.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Returns the current interaction kind.
    #[inline]
    #[must_use]
    pub const fn item_type(&self) -> InteractionItem {
        self.item
    }

    /// Returns the current map position.
    #[inline]
    #[must_use]
    pub const fn map_position(&self) -> Pos2 {
        self.map_pos
    }

    /// Returns the current sprite position.
    #[inline]
    #[must_use]
    pub const fn sprite_position(&self) -> Pos2 {
        self.sprite_pos
    }

    /// Returns the most recently created sprite, if attachments and
    /// children would still go to it.
    #[must_use]
    pub fn current(&self) -> Option<crate::arena::RecordId> {
        (self.current != INVALID).then(|| self.arena.id_at(self.current))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::session;
    use super::*;
    use crate::geometry::Pos3;
    use crate::image::ImageId;

    #[test]
    fn init_bumps_frame_and_clears() {
        let mut s = session(8);
        assert_eq!(s.frame_index(), 1);
        s.add_to_plot_list_as_parent(ImageId::new(1), Pos3::new(0, 0, 0), Pos3::new(1, 1, 1))
            .unwrap();
        assert_eq!(s.arena().len(), 1);
        s.init(s.render_target(), SessionOptions::default());
        assert_eq!(s.frame_index(), 2);
        assert!(s.arena().is_empty());
        assert!(s.quadrants().is_empty());
        assert!(s.current().is_none());
        assert_eq!(s.stats(), SessionStats::default());
    }

    #[test]
    fn options_are_exposed() {
        let mut s = session(1);
        let options = SessionOptions {
            rotation: Rotation::R2,
            view_flags: ViewFlags {
                underground: true,
                ..ViewFlags::default()
            },
            foreground_cull_height: 96,
        };
        s.init(RenderTarget::new(0, 0, 10, 10, 1), options);
        assert_eq!(s.rotation(), Rotation::R2);
        assert!(s.view_flags().underground);
        assert_eq!(s.foreground_cull_height(), 96);
        assert_eq!(s.render_target().zoom, 1);
    }

    #[test]
    fn context_setters_stamp_sprites() {
        let mut s = session(4);
        s.set_item_type(InteractionItem::Building);
        s.set_current_item(OwnerRef(42));
        s.set_track_mod_id(3);
        s.set_map_position(Pos2::new(64, 96));
        let id = s
            .add_to_plot_list_as_parent(ImageId::new(1), Pos3::new(0, 0, 0), Pos3::new(1, 1, 1))
            .unwrap();
        let sprite = s.arena().sprite(id).unwrap();
        assert_eq!(sprite.item, InteractionItem::Building);
        assert_eq!(sprite.owner, OwnerRef(42));
        assert_eq!(sprite.mod_id, 3);
        assert_eq!(sprite.map_pos, Pos2::new(64, 96));
    }

    #[test]
    fn reset_last_ps_forgets_current() {
        let mut s = session(4);
        s.add_to_plot_list_as_parent(ImageId::new(1), Pos3::new(0, 0, 0), Pos3::new(1, 1, 1))
            .unwrap();
        assert!(s.current().is_some());
        s.reset_last_ps();
        assert!(s.current().is_none());
        assert!(
            s.attach_to_previous(ImageId::new(2), ScreenPos::new(0, 0))
                .is_none()
        );
    }
}
