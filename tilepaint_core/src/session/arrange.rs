// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordering the frame and reading the result back.

use crate::arena::{Arena, INVALID, RecordId};
use crate::order::OrderStats;
use crate::record::PaintEntry;
use crate::trace::{FrameSummary, PhaseBeginEvent, PhaseEndEvent, PhaseKind, Tracer};

use super::PaintSession;

impl PaintSession {
    /// Orders every filed sprite back to front.
    ///
    /// Children, attachments and text labels keep their own chains and are
    /// not reordered.
    pub fn arrange_structs(&mut self) -> OrderStats {
        self.arrange_structs_traced(&mut Tracer::none())
    }

    /// Like [`arrange_structs`](Self::arrange_structs), closing the enqueue
    /// phase, bracketing the ordering in a [`PhaseKind::Arrange`] phase and
    /// emitting the frame summary on `tracer`.
    pub fn arrange_structs_traced(&mut self, tracer: &mut Tracer<'_>) -> OrderStats {
        let used = self.arena_used();
        tracer.phase_end(&PhaseEndEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Enqueue,
            arena_used: used,
        });
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Arrange,
            arena_used: used,
        });

        self.order_stats = self.orderer.arrange_into(
            &self.arena,
            &self.quadrants,
            self.options.rotation,
            &mut self.ordered,
        );

        #[cfg(feature = "trace-rich")]
        tracer.ordering_moves(self.frame_index, self.orderer.moves());

        tracer.phase_end(&PhaseEndEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Arrange,
            arena_used: used,
        });
        tracer.frame_summary(&self.frame_summary());
        self.order_stats
    }

    /// Returns the top-level sprites in draw order, back to front.
    ///
    /// Empty until [`arrange_structs`](Self::arrange_structs) has run.
    pub fn ordered(&self) -> impl ExactSizeIterator<Item = RecordId> + '_ {
        self.ordered.iter().map(|&idx| self.arena.id_at(idx))
    }

    /// Returns the children of sprite `id` in draw order.
    ///
    /// Attachments and text records have no children.
    ///
    /// # Panics
    ///
    /// Panics if `id` is from an earlier frame.
    #[must_use]
    pub fn children(&self, id: RecordId) -> Children<'_> {
        let next = match self.arena.get(id) {
            PaintEntry::Sprite(s) => s.next_child,
            _ => INVALID,
        };
        Children {
            arena: &self.arena,
            next,
        }
    }

    /// Returns the attachments of sprite `id` in the order they were added.
    ///
    /// # Panics
    ///
    /// Panics if `id` is from an earlier frame.
    #[must_use]
    pub fn attachments(&self, id: RecordId) -> Attachments<'_> {
        let next = match self.arena.get(id) {
            PaintEntry::Sprite(s) => s.first_attached,
            _ => INVALID,
        };
        Attachments {
            arena: &self.arena,
            next,
        }
    }

    /// Returns the text labels in the order they were queued.
    #[must_use]
    pub fn texts(&self) -> Texts<'_> {
        Texts {
            arena: &self.arena,
            next: self.text_head,
        }
    }

    /// Counters from the last [`arrange_structs`](Self::arrange_structs).
    #[must_use]
    pub const fn order_stats(&self) -> OrderStats {
        self.order_stats
    }

    /// Returns the summary of the current frame.
    #[must_use]
    pub fn frame_summary(&self) -> FrameSummary {
        let range = self.quadrants.range();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "ordered length is bounded by the u32 arena capacity"
        )]
        let ordered = self.ordered.len() as u32;
        FrameSummary {
            frame_index: self.frame_index,
            sprites: self.stats.sprites,
            attachments: self.stats.attachments,
            strings: self.stats.strings,
            dropped: self.stats.dropped,
            culled: self.stats.culled,
            ordered,
            moves: self.order_stats.moves,
            back_quadrant: range.map(|(back, _)| back),
            front_quadrant: range.map(|(_, front)| front),
        }
    }
}

/// Iterator over the children of a sprite.
///
/// Created by [`PaintSession::children`].
#[derive(Clone, Debug)]
pub struct Children<'a> {
    arena: &'a Arena,
    next: u32,
}

impl Iterator for Children<'_> {
    type Item = RecordId;

    fn next(&mut self) -> Option<RecordId> {
        if self.next == INVALID {
            return None;
        }
        let id = self.arena.id_at(self.next);
        self.next = self.arena.sprite_at(self.next).next_child;
        Some(id)
    }
}

/// Iterator over the attachments of a sprite.
///
/// Created by [`PaintSession::attachments`].
#[derive(Clone, Debug)]
pub struct Attachments<'a> {
    arena: &'a Arena,
    next: u32,
}

impl Iterator for Attachments<'_> {
    type Item = RecordId;

    fn next(&mut self) -> Option<RecordId> {
        if self.next == INVALID {
            return None;
        }
        let id = self.arena.id_at(self.next);
        self.next = self.arena.attached_at(self.next).next;
        Some(id)
    }
}

/// Iterator over the text labels of a frame.
///
/// Created by [`PaintSession::texts`].
#[derive(Clone, Debug)]
pub struct Texts<'a> {
    arena: &'a Arena,
    next: u32,
}

impl Iterator for Texts<'_> {
    type Item = RecordId;

    fn next(&mut self) -> Option<RecordId> {
        if self.next == INVALID {
            return None;
        }
        let id = self.arena.id_at(self.next);
        self.next = self.arena.text_at(self.next).next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::super::test_support::session;
    use super::*;
    use crate::geometry::{Pos2, Pos3, Rotation, ScreenPos};
    use crate::image::{ImageId, RenderTarget};
    use crate::session::SessionOptions;

    const IMG: ImageId = ImageId(5);

    fn cube(s: &mut PaintSession, x: i32, y: i32, z: i32) -> RecordId {
        s.add_to_plot_list_as_parent(IMG, Pos3::new(x, y, z), Pos3::new(4, 4, 4))
            .unwrap()
    }

    #[test]
    fn nothing_to_order_before_arrange() {
        let mut s = session(8);
        cube(&mut s, 0, 0, 0);
        assert_eq!(s.ordered().len(), 0);
        s.arrange_structs();
        assert_eq!(s.ordered().len(), 1);
    }

    #[test]
    fn stacked_cubes_draw_lower_first() {
        for lower_first in [true, false] {
            let mut s = session(8);
            let (low, high);
            if lower_first {
                low = cube(&mut s, 0, 0, 0);
                high = cube(&mut s, 0, 0, 4);
                cube(&mut s, 10, 10, 0);
            } else {
                cube(&mut s, 10, 10, 0);
                high = cube(&mut s, 0, 0, 4);
                low = cube(&mut s, 0, 0, 0);
            }
            s.arrange_structs();
            let order: Vec<_> = s.ordered().collect();
            assert_eq!(order.len(), 3);
            let pos = |id| order.iter().position(|&o| o == id).unwrap();
            assert!(pos(low) < pos(high), "lower_first = {lower_first}: {order:?}");
        }
    }

    fn rotated_session(rotation: Rotation) -> PaintSession {
        let mut s = session(8);
        s.init(
            RenderTarget::new(-4096, -4096, 8192, 8192, 0),
            SessionOptions {
                rotation,
                ..SessionOptions::default()
            },
        );
        s
    }

    #[test]
    fn stacked_cubes_draw_lower_first_in_every_rotation() {
        for rotation in Rotation::ALL {
            for lower_first in [true, false] {
                let mut s = rotated_session(rotation);
                let (low, high);
                if lower_first {
                    low = cube(&mut s, 0, 0, 0);
                    high = cube(&mut s, 0, 0, 4);
                } else {
                    high = cube(&mut s, 0, 0, 4);
                    low = cube(&mut s, 0, 0, 0);
                }
                s.arrange_structs();
                let order: Vec<_> = s.ordered().collect();
                assert_eq!(
                    order,
                    [low, high],
                    "rotation {rotation:?}, lower_first = {lower_first}"
                );
            }
        }
    }

    #[test]
    fn side_by_side_cubes_draw_far_first_in_every_rotation() {
        // Offsets are view relative, so the cube at the piece origin is the
        // far one for both axes in every rotation.
        for rotation in Rotation::ALL {
            for (dx, dy) in [(8, 0), (0, 8)] {
                for origin_first in [true, false] {
                    let mut s = rotated_session(rotation);
                    let (far, near);
                    if origin_first {
                        far = cube(&mut s, 0, 0, 0);
                        near = cube(&mut s, dx, dy, 0);
                    } else {
                        near = cube(&mut s, dx, dy, 0);
                        far = cube(&mut s, 0, 0, 0);
                    }
                    let screen_y = |id| s.arena().sprite(id).unwrap().screen_pos.y;
                    assert!(screen_y(far) < screen_y(near), "rotation {rotation:?}");
                    s.arrange_structs();
                    let order: Vec<_> = s.ordered().collect();
                    assert_eq!(
                        order,
                        [far, near],
                        "rotation {rotation:?}, offset ({dx}, {dy}), origin_first = {origin_first}"
                    );
                }
            }
        }
    }

    #[test]
    fn ordering_is_reproducible() {
        let build = || {
            let mut s = session(32);
            for (x, y, z) in [(0, 0, 0), (40, 8, 4), (8, 40, 8), (12, 12, 0), (64, 0, 4), (0, 64, 8)] {
                s.set_sprite_position(Pos2::new(x, y));
                cube(&mut s, 0, 0, z);
            }
            s.arrange_structs();
            s.ordered().collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn children_and_attachments_stay_with_their_parent() {
        let mut s = session(16);
        let far = cube(&mut s, 0, 0, 0);
        let att = s.attach_to_previous(ImageId(6), ScreenPos::new(0, -4)).unwrap();
        let kid = s
            .add_to_plot_list_as_child(IMG, Pos3::new(0, 0, 4), Pos3::new(0, 0, 4), Pos3::new(4, 4, 4))
            .unwrap();
        s.set_sprite_position(Pos2::new(64, 64));
        let near = cube(&mut s, 0, 0, 0);
        s.arrange_structs();

        let order: Vec<_> = s.ordered().collect();
        assert_eq!(order, [far, near]);
        assert_eq!(s.children(far).collect::<Vec<_>>(), [kid]);
        assert_eq!(s.attachments(far).collect::<Vec<_>>(), [att]);
        assert_eq!(s.children(near).count(), 0);
        assert_eq!(s.attachments(kid).count(), 0);
    }

    #[test]
    fn summary_reflects_frame() {
        let mut s = session(2);
        cube(&mut s, 0, 0, 0);
        s.set_sprite_position(Pos2::new(320, 0));
        cube(&mut s, 0, 0, 0);
        assert!(s.attach_to_previous(IMG, ScreenPos::default()).is_none());
        s.arrange_structs();
        let summary = s.frame_summary();
        assert_eq!(summary.frame_index, 1);
        assert_eq!(summary.sprites, 2);
        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.ordered, 2);
        assert_eq!(summary.back_quadrant, Some(0));
        assert_eq!(summary.front_quadrant, Some(10));
    }

    #[test]
    fn empty_frame_summary() {
        let mut s = session(2);
        s.arrange_structs();
        let summary = s.frame_summary();
        assert_eq!(summary.ordered, 0);
        assert_eq!(summary.back_quadrant, None);
        assert_eq!(s.texts().count(), 0);
    }

    #[test]
    #[should_panic(expected = "stale RecordId")]
    fn stale_handles_panic() {
        let mut s = session(2);
        let id = cube(&mut s, 0, 0, 0);
        s.init(s.render_target(), s.options);
        let _ = s.children(id);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn arrange_reports_phases_and_summary() {
        use crate::trace::{TraceSink, Tracer};

        #[derive(Default)]
        struct Log {
            phases: Vec<(PhaseKind, bool)>,
            summary: Option<FrameSummary>,
        }

        impl TraceSink for Log {
            fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
                self.phases.push((e.phase, true));
            }
            fn on_phase_end(&mut self, e: &PhaseEndEvent) {
                self.phases.push((e.phase, false));
            }
            fn on_frame_summary(&mut self, summary: &FrameSummary) {
                self.summary = Some(*summary);
            }
        }

        let mut log = Log::default();
        let mut s = session(4);
        {
            let mut tracer = Tracer::new(&mut log);
            s.init_traced(s.render_target(), s.options, &mut tracer);
            cube(&mut s, 0, 0, 0);
            s.end_tile_traced(&mut tracer);
            s.arrange_structs_traced(&mut tracer);
        }
        assert_eq!(
            log.phases,
            [
                (PhaseKind::Enqueue, true),
                (PhaseKind::Finalise, true),
                (PhaseKind::Finalise, false),
                (PhaseKind::Enqueue, false),
                (PhaseKind::Arrange, true),
                (PhaseKind::Arrange, false),
            ]
        );
        let summary = log.summary.unwrap();
        assert_eq!(summary.sprites, 1);
        assert_eq!(summary.ordered, 1);
    }
}
