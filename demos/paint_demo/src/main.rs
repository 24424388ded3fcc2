// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paints a small synthetic map through the full tilepaint pipeline.
//!
//! Each of the four rotations is painted as one frame: terrain, a track line
//! with canopies, trees, a vehicle and a labelled building. Events go to a
//! [`PrettyPrintSink`] on stdout and a [`RecorderSink`]. The recording and
//! the last draw plan are exported as JSON.

use std::fs::File;
use std::io::BufWriter;

use kurbo::Rect;
use tilepaint_core::geometry::{Pos2, Pos3, Rotation, ScreenPos};
use tilepaint_core::image::{ImageId, RenderTarget};
use tilepaint_core::interaction::{InteractionFilter, InteractionItem, OwnerRef};
use tilepaint_core::record::StringId;
use tilepaint_core::segment::Segments;
use tilepaint_core::session::{PaintSession, SessionConfig, SessionOptions, ViewFlags};
use tilepaint_core::trace::{
    DrawCull, FrameSummary, OrderingMove, PhaseBeginEvent, PhaseEndEvent, SessionInitEvent,
    TraceSink, Tracer,
};
use tilepaint_render::{DrawPlan, Drawer, TextItem, hit_test, replay};

use tilepaint_debug::pretty::PrettyPrintSink;
use tilepaint_debug::recorder::RecorderSink;

const MAP_SIZE: i32 = 6;
const TILE: i32 = 32;
const TRACK_ROW: i32 = 2;

const SURFACE: ImageId = ImageId(1);
const TRACK: ImageId = ImageId(2);
const CANOPY: ImageId = ImageId(3);
const TREE: ImageId = ImageId(4);
const TREE_SNOW: ImageId = ImageId(5);
const VEHICLE: ImageId = ImageId(6);
const BUILDING: ImageId = ImageId(7);
const SIGN: ImageId = ImageId(8);

/// Sends every event to both sinks.
struct Fanout<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Fanout<'_> {
    fn on_session_init(&mut self, e: &SessionInitEvent) {
        self.pretty.on_session_init(e);
        self.recorder.on_session_init(e);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.pretty.on_phase_begin(e);
        self.recorder.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.pretty.on_phase_end(e);
        self.recorder.on_phase_end(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.pretty.on_frame_summary(s);
        self.recorder.on_frame_summary(s);
    }

    fn on_ordering_moves(&mut self, frame_index: u64, moves: &[OrderingMove]) {
        self.pretty.on_ordering_moves(frame_index, moves);
        self.recorder.on_ordering_moves(frame_index, moves);
    }

    fn on_draw_culls(&mut self, frame_index: u64, culls: &[DrawCull]) {
        self.pretty.on_draw_culls(frame_index, culls);
        self.recorder.on_draw_culls(frame_index, culls);
    }
}

/// Counts draw calls instead of writing pixels.
#[derive(Debug, Default)]
struct CountingDrawer {
    images: usize,
    masked: usize,
    strings: usize,
}

impl Drawer for CountingDrawer {
    fn draw_image(&mut self, _rt: &RenderTarget, _pos: ScreenPos, _image: ImageId) {
        self.images += 1;
    }

    fn draw_image_masked(
        &mut self,
        _rt: &RenderTarget,
        _pos: ScreenPos,
        _image: ImageId,
        _mask: ImageId,
    ) {
        self.masked += 1;
    }

    fn draw_string(&mut self, _rt: &RenderTarget, _text: &TextItem) {
        self.strings += 1;
    }
}

fn height_at(tx: i32, ty: i32) -> i32 {
    ((tx * 3 + ty * 5) % 4) * 8
}

fn paint_tile(session: &mut PaintSession, tracer: &mut Tracer<'_>, tx: i32, ty: i32) {
    let map = Pos2::new(tx * TILE, ty * TILE);
    let z = height_at(tx, ty);
    let owner = OwnerRef((ty * MAP_SIZE + tx).unsigned_abs());

    session.set_map_position(map);
    session.set_sprite_position(map);
    session.reset_tile_column(session.rotation().game_to_screen(Pos3::from_xy(map, 0)));
    session.reset_tile();
    session.set_max_height(z / 4 + 8);

    session.set_item_type(InteractionItem::Surface);
    session.set_current_item(owner);
    session.add_to_plot_list_as_parent(SURFACE, Pos3::new(0, 0, z), Pos3::new(32, 32, 1));
    session.set_did_pass_surface(true);
    let surface_support = u16::try_from(z + 16).unwrap_or(u16::MAX);
    session.set_general_support_height(surface_support, 0);

    if ty == TRACK_ROW {
        session.set_item_type(InteractionItem::Track);
        session.set_track_mod_id(0);
        session.add_to_plot_list_track_road(
            TRACK,
            0,
            Pos3::new(0, 0, z),
            Pos3::new(0, 6, z),
            Pos3::new(32, 20, 1),
        );
        session.set_occupied_track_segments(Segments::X0Y1 | Segments::X1Y1 | Segments::X2Y1);
        if tx % 2 == 0 {
            session.set_item_type(InteractionItem::TrackExtra);
            session.add_to_plot_list_track_road_addition(
                CANOPY,
                0,
                Pos3::new(0, 0, z + 24),
                Pos3::new(0, 6, z + 24),
                Pos3::new(32, 20, 2),
            );
        }
        if tx == 3 {
            session.set_item_type(InteractionItem::Entity);
            session.set_sprite_position(map + Pos2::new(16, 16));
            session.add_to_plot_list_as_parent_with_bounds(
                VEHICLE,
                Pos3::new(0, 0, z + 4),
                Pos3::new(-6, -6, z + 4),
                Pos3::new(12, 12, 12),
            );
            session.set_sprite_position(map);
        }
    } else if (tx + ty) % 3 == 0 {
        session.set_item_type(InteractionItem::Tree);
        session.add_to_plot_list_as_parent(TREE, Pos3::new(16, 16, z), Pos3::new(4, 4, 40));
        session.add_to_plot_list_as_child(
            TREE_SNOW,
            Pos3::new(16, 16, z),
            Pos3::new(16, 16, z),
            Pos3::new(4, 4, 40),
        );
    } else if tx == 4 && ty == 4 {
        session.set_item_type(InteractionItem::Building);
        session.add_to_plot_list_as_parent_with_bounds(
            BUILDING,
            Pos3::new(0, 0, z),
            Pos3::new(2, 2, z),
            Pos3::new(28, 28, 48),
        );
        session.attach_to_previous(SIGN, ScreenPos::new(0, -12));
        session.add_to_string_plot_list(1850, StringId(1), z + 56, 0, &[], 2);
    }

    session.end_tile_traced(tracer);
}

fn frame_options(rotation: Rotation) -> SessionOptions {
    // The last rotation runs underground with see-through trees, which hides
    // the trees entirely.
    let view_flags = if rotation == Rotation::R3 {
        ViewFlags {
            underground: true,
            see_through_trees: true,
            ..ViewFlags::default()
        }
    } else {
        ViewFlags {
            see_through_buildings: rotation == Rotation::R2,
            ..ViewFlags::default()
        }
    };
    SessionOptions {
        rotation,
        view_flags,
        foreground_cull_height: 0,
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- session -----------------------------------------------------------
    let images = |id: ImageId| (id.index() != 0).then(|| Rect::new(-16.0, -32.0, 16.0, 16.0));
    let mut session = PaintSession::new(SessionConfig::classic(), images);
    let rt = RenderTarget::new(-400, -200, 800, 600, 0);
    let mut plan = DrawPlan::new();

    {
        let mut fanout = Fanout {
            pretty: &mut pretty,
            recorder: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut fanout);

        for rotation in Rotation::ALL {
            session.init_traced(rt, frame_options(rotation), &mut tracer);
            for ty in 0..MAP_SIZE {
                for tx in 0..MAP_SIZE {
                    paint_tile(&mut session, &mut tracer, tx, ty);
                }
            }
            let stats = session.arrange_structs_traced(&mut tracer);
            plan.build_into(&session, &mut tracer);

            let mut drawer = CountingDrawer::default();
            replay(&plan, &rt, &mut drawer);

            let tester = |_image: ImageId, anchor: ScreenPos, point: ScreenPos| {
                let d = point - anchor;
                (-16..16).contains(&d.x) && (-32..16).contains(&d.y)
            };
            let hit = hit_test(
                &plan,
                &session,
                ScreenPos::new(0, 64),
                InteractionFilter::NONE,
                &tester,
            );

            println!(
                "rotation {}: {} sorted over {} passes, {} moves, drew {} images ({} masked) and {} strings, \
                 hit {:?}",
                rotation.quarter_turns(),
                stats.sprites,
                stats.passes,
                stats.moves,
                drawer.images,
                drawer.masked,
                drawer.strings,
                hit.map(|h| h.item),
            );
        }
    }

    // -- export ------------------------------------------------------------
    let path = "paint_trace.json";
    let file = File::create(path).expect("failed to create paint_trace.json");
    let mut writer = BufWriter::new(file);
    tilepaint_debug::export::write_events_json(recorder.as_bytes(), &mut writer)
        .expect("failed to write event JSON");

    let plan_path = "paint_plan.json";
    let file = File::create(plan_path).expect("failed to create paint_plan.json");
    let mut writer = BufWriter::new(file);
    tilepaint_debug::export::write_plan_json(&plan, &mut writer)
        .expect("failed to write plan JSON");

    println!("Wrote {path} and {plan_path}");
}
