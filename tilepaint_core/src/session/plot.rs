// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plot-list API: queuing sprites, attachments and text labels.

use crate::arena::{INVALID, RecordId};
use crate::geometry::{Pos3, ScreenPos};
use crate::image::ImageId;
use crate::record::{
    AttachedRecord, BoundBox, PaintEntry, SpriteRecord, StringId, TEXT_ARG_COUNT, TextRecord,
};

use super::PaintSession;
use super::tile::{ADDITION_SLOTS, TRACK_ROAD_SLOTS};

impl PaintSession {
    /// Queues a top-level sprite whose bounding box starts at `offset`.
    ///
    /// Shorthand for
    /// [`add_to_plot_list_as_parent_with_bounds`](Self::add_to_plot_list_as_parent_with_bounds)
    /// with the bounding-box offset equal to the image offset.
    pub fn add_to_plot_list_as_parent(
        &mut self,
        image: ImageId,
        offset: Pos3,
        bbox_size: Pos3,
    ) -> Option<RecordId> {
        self.add_to_plot_list_as_parent_with_bounds(image, offset, offset, bbox_size)
    }

    /// Queues a top-level sprite and files it for ordering.
    ///
    /// `offset` positions the image and `bbox_offset`/`bbox_size` describe
    /// its bounding box, all relative to the current sprite position in
    /// unrotated piece space. The new sprite becomes current.
    ///
    /// Returns `None`, and leaves no sprite current, when the image is not
    /// visible or the arena is full. Image visibility is the only cull;
    /// [`foreground_cull_height`](Self::foreground_cull_height) is left to
    /// the painters.
    pub fn add_to_plot_list_as_parent_with_bounds(
        &mut self,
        image: ImageId,
        offset: Pos3,
        bbox_offset: Pos3,
        bbox_size: Pos3,
    ) -> Option<RecordId> {
        self.current = INVALID;
        let idx = self.create_sprite(image, offset, bbox_offset, bbox_size)?;
        self.current = idx;
        self.quadrants
            .insert(&mut self.arena, idx, self.options.rotation);
        Some(self.arena.id_at(idx))
    }

    /// Queues a sprite drawn as part of the current sprite.
    ///
    /// The child is linked directly after the current sprite in its child
    /// chain and becomes current itself, so consecutive children keep their
    /// call order. Children never enter the quadrant index; they are drawn
    /// wherever their parent ends up. With no current sprite this behaves
    /// like [`add_to_plot_list_as_parent_with_bounds`](Self::add_to_plot_list_as_parent_with_bounds).
    pub fn add_to_plot_list_as_child(
        &mut self,
        image: ImageId,
        offset: Pos3,
        bbox_offset: Pos3,
        bbox_size: Pos3,
    ) -> Option<RecordId> {
        if self.current == INVALID {
            return self.add_to_plot_list_as_parent_with_bounds(image, offset, bbox_offset, bbox_size);
        }
        let idx = self.create_sprite(image, offset, bbox_offset, bbox_size)?;
        let parent = self.current;
        let after = self.arena.sprite_at(parent).next_child;
        self.arena.sprite_at_mut(idx).next_child = after;
        self.arena.sprite_at_mut(parent).next_child = idx;
        self.current = idx;
        Some(self.arena.id_at(idx))
    }

    /// Queues a track or road sprite into slot `priority`.
    ///
    /// Sprites in the same slot form a chain, newest first. The slots are
    /// merged into one ordered sprite when the tile ends (see
    /// [`finalise_track_road_ordering`](Self::finalise_track_road_ordering)).
    ///
    /// # Panics
    ///
    /// Panics if `priority` is not below [`TRACK_ROAD_SLOTS`].
    pub fn add_to_plot_list_track_road(
        &mut self,
        image: ImageId,
        priority: usize,
        offset: Pos3,
        bbox_offset: Pos3,
        bbox_size: Pos3,
    ) -> Option<RecordId> {
        assert!(
            priority < TRACK_ROAD_SLOTS,
            "track/road priority {priority} out of range"
        );
        self.current = INVALID;
        let idx = self.create_sprite(image, offset, bbox_offset, bbox_size)?;
        self.current = idx;
        let previous = core::mem::replace(&mut self.track_road[priority], idx);
        self.arena.sprite_at_mut(idx).next_child = previous;
        Some(self.arena.id_at(idx))
    }

    /// Queues a track or road addition sprite into addition slot `priority`.
    ///
    /// # Panics
    ///
    /// Panics if `priority` is not below [`ADDITION_SLOTS`].
    pub fn add_to_plot_list_track_road_addition(
        &mut self,
        image: ImageId,
        priority: usize,
        offset: Pos3,
        bbox_offset: Pos3,
        bbox_size: Pos3,
    ) -> Option<RecordId> {
        assert!(
            priority < ADDITION_SLOTS,
            "track/road addition priority {priority} out of range"
        );
        self.current = INVALID;
        let idx = self.create_sprite(image, offset, bbox_offset, bbox_size)?;
        self.current = idx;
        let previous = core::mem::replace(&mut self.track_road_additions[priority], idx);
        self.arena.sprite_at_mut(idx).next_child = previous;
        Some(self.arena.id_at(idx))
    }

    /// Layers `image` over the current sprite at a fixed screen `offset`.
    ///
    /// Attachments are drawn in the order they were added, right after the
    /// sprite they belong to. Returns `None` if there is no current sprite or
    /// the arena is full.
    pub fn attach_to_previous(&mut self, image: ImageId, offset: ScreenPos) -> Option<RecordId> {
        if self.current == INVALID {
            return None;
        }
        let Some(id) = self.arena.allocate(PaintEntry::Attached(AttachedRecord {
            image,
            offset,
            ..AttachedRecord::default()
        })) else {
            self.stats.dropped += 1;
            return None;
        };
        self.stats.attachments += 1;
        let parent = self.arena.sprite_at_mut(self.current);
        let tail = parent.last_attached;
        parent.last_attached = id.idx;
        if tail == INVALID {
            parent.first_attached = id.idx;
        } else {
            self.arena.attached_at_mut(tail).next = id.idx;
        }
        Some(id)
    }

    /// Queues a text label at the current sprite position.
    ///
    /// `amount` fills the first two format arguments (low half first). The
    /// label is anchored at the projection of the sprite position at height
    /// `z`, shifted right by `x_offset`. Labels are drawn in call order after
    /// all sprites.
    pub fn add_to_string_plot_list(
        &mut self,
        amount: u32,
        string_id: StringId,
        z: i32,
        x_offset: i32,
        y_offsets: &'static [i8],
        colour: u8,
    ) -> Option<RecordId> {
        let anchor = self
            .options
            .rotation
            .game_to_screen(Pos3::from_xy(self.sprite_pos, z));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "splitting into 16-bit halves"
        )]
        let (low, high) = (amount as u16, (amount >> 16) as u16);
        let mut args = [0; TEXT_ARG_COUNT];
        args[0] = low;
        args[1] = high;
        let Some(id) = self.arena.allocate(PaintEntry::Text(TextRecord {
            string_id,
            args,
            screen_pos: ScreenPos::new(anchor.x.saturating_add(x_offset), anchor.y),
            colour,
            y_offsets,
            ..TextRecord::default()
        })) else {
            self.stats.dropped += 1;
            return None;
        };
        self.stats.strings += 1;
        if self.text_tail == INVALID {
            self.text_head = id.idx;
        } else {
            self.arena.text_at_mut(self.text_tail).next = id.idx;
        }
        self.text_tail = id.idx;
        Some(id)
    }

    /// Draws the sprite or attachment `id` through `mask`.
    ///
    /// Text records are left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `id` is from an earlier frame.
    pub fn set_masked_image(&mut self, id: RecordId, mask: ImageId) {
        assert!(
            self.arena.is_live(id),
            "stale RecordId: {id:?} (arena frame {})",
            self.arena.frame()
        );
        match self.arena.get(id) {
            PaintEntry::Sprite(_) => self.arena.sprite_at_mut(id.idx).masked_image = Some(mask),
            PaintEntry::Attached(_) => self.arena.attached_at_mut(id.idx).masked_image = Some(mask),
            PaintEntry::Text(_) => {}
        }
    }

    /// Projects, culls and allocates one sprite. Returns its slot.
    fn create_sprite(
        &mut self,
        image: ImageId,
        offset: Pos3,
        bbox_offset: Pos3,
        bbox_size: Pos3,
    ) -> Option<u32> {
        let rotation = self.options.rotation;
        let swapped = rotation.flip_x_axis();

        let anchor = Pos3::from_xy(swapped.rotate(offset.xy()) + self.sprite_pos, offset.z);
        let screen_pos = rotation.game_to_screen(anchor);

        let visible = self
            .images
            .extents(image)
            .is_some_and(|extents| self.render_target.is_visible(screen_pos, extents));
        if !visible {
            self.stats.culled += 1;
            return None;
        }

        let size = Pos3::new(bbox_size.x.max(0), bbox_size.y.max(0), bbox_size.z.max(0));
        let rot_offset = Pos3::from_xy(swapped.rotate(bbox_offset.xy()), bbox_offset.z);
        let rot_size = rotation.rotate_bound_box_size(size);
        let origin = rot_offset.xy() + self.sprite_pos;
        let bounds = BoundBox {
            x: origin.x,
            y: origin.y,
            z: rot_offset.z,
            x_end: origin.x.saturating_add(rot_size.x),
            y_end: origin.y.saturating_add(rot_size.y),
            z_end: rot_offset.z.saturating_add(rot_size.z),
        };

        let Some(id) = self.arena.allocate(PaintEntry::Sprite(SpriteRecord {
            image,
            screen_pos,
            bounds,
            item: self.item,
            owner: self.owner,
            map_pos: self.map_pos,
            mod_id: self.mod_id,
            ..SpriteRecord::default()
        })) else {
            self.stats.dropped += 1;
            return None;
        };
        self.stats.sprites += 1;
        Some(id.idx)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::super::test_support::session;
    use super::*;
    use crate::geometry::{Pos2, Rotation};
    use crate::image::RenderTarget;
    use crate::session::SessionOptions;

    const IMG: ImageId = ImageId(5);

    #[test]
    fn parent_projects_and_bounds() {
        let mut s = session(8);
        s.set_sprite_position(Pos2::new(64, 32));
        let id = s
            .add_to_plot_list_as_parent_with_bounds(
                IMG,
                Pos3::new(0, 0, 16),
                Pos3::new(2, 4, 16),
                Pos3::new(28, 24, 8),
            )
            .unwrap();
        let sprite = s.arena().sprite(id).unwrap();
        assert_eq!(sprite.screen_pos, ScreenPos::new(-32, 32));
        assert_eq!(
            sprite.bounds,
            BoundBox {
                x: 66,
                y: 36,
                z: 16,
                x_end: 93,
                y_end: 59,
                z_end: 24
            }
        );
        assert_eq!(s.current(), Some(id));
        assert!(s.quadrants().range().is_some());
    }

    #[test]
    fn negative_sizes_are_clamped() {
        let mut s = session(8);
        let id = s
            .add_to_plot_list_as_parent(IMG, Pos3::new(0, 0, 0), Pos3::new(-5, -5, -5))
            .unwrap();
        let b = s.arena().sprite(id).unwrap().bounds;
        assert_eq!((b.x_end, b.y_end, b.z_end), (-1, -1, 0));
    }

    #[test]
    fn unknown_or_offscreen_images_are_culled() {
        let mut s = session(8);
        assert!(
            s.add_to_plot_list_as_parent(ImageId(0), Pos3::new(0, 0, 0), Pos3::new(1, 1, 1))
                .is_none()
        );
        s.init(
            RenderTarget::new(0, 0, 100, 100, 0),
            SessionOptions::default(),
        );
        s.set_sprite_position(Pos2::new(0, 4000));
        assert!(
            s.add_to_plot_list_as_parent(IMG, Pos3::new(0, 0, 0), Pos3::new(1, 1, 1))
                .is_none()
        );
        assert_eq!(s.stats().culled, 1);
        assert!(s.arena().is_empty());
        assert!(s.current().is_none());
    }

    #[test]
    fn arena_exhaustion_drops_cleanly() {
        let mut s = session(3);
        for _ in 0..3 {
            assert!(
                s.add_to_plot_list_as_parent(IMG, Pos3::new(0, 0, 0), Pos3::new(1, 1, 1))
                    .is_some()
            );
        }
        assert!(
            s.add_to_plot_list_as_parent(IMG, Pos3::new(0, 0, 0), Pos3::new(1, 1, 1))
                .is_none()
        );
        assert!(s.attach_to_previous(IMG, ScreenPos::new(0, 0)).is_none());
        assert!(
            s.add_to_string_plot_list(0, StringId(1), 0, 0, &[], 0)
                .is_none()
        );
        assert_eq!(s.stats().dropped, 2);
        assert_eq!(s.stats().sprites, 3);
        s.arrange_structs();
        assert_eq!(s.ordered().count(), 3);
    }

    #[test]
    fn children_follow_in_call_order() {
        let mut s = session(8);
        let parent = s
            .add_to_plot_list_as_parent(IMG, Pos3::new(0, 0, 0), Pos3::new(4, 4, 4))
            .unwrap();
        let a = s
            .add_to_plot_list_as_child(IMG, Pos3::new(0, 0, 4), Pos3::new(0, 0, 4), Pos3::new(4, 4, 4))
            .unwrap();
        let b = s
            .add_to_plot_list_as_child(IMG, Pos3::new(0, 0, 8), Pos3::new(0, 0, 8), Pos3::new(4, 4, 4))
            .unwrap();
        let kids: Vec<_> = s.children(parent).collect();
        assert_eq!(kids, [a, b]);
        assert_eq!(s.current(), Some(b));
        assert_eq!(s.quadrants().bucket(s.arena(), 0).count(), 1);
    }

    #[test]
    fn child_without_parent_becomes_parent() {
        let mut s = session(8);
        let id = s
            .add_to_plot_list_as_child(IMG, Pos3::new(0, 0, 0), Pos3::new(0, 0, 0), Pos3::new(4, 4, 4))
            .unwrap();
        assert_eq!(s.quadrants().bucket(s.arena(), 0).next(), Some(id));
    }

    #[test]
    fn attachments_append_in_order() {
        let mut s = session(8);
        let parent = s
            .add_to_plot_list_as_parent(IMG, Pos3::new(0, 0, 0), Pos3::new(4, 4, 4))
            .unwrap();
        let a = s.attach_to_previous(ImageId(6), ScreenPos::new(1, 2)).unwrap();
        let b = s.attach_to_previous(ImageId(7), ScreenPos::new(3, 4)).unwrap();
        let got: Vec<_> = s.attachments(parent).collect();
        assert_eq!(got, [a, b]);
        assert_eq!(s.arena().attached(b).unwrap().offset, ScreenPos::new(3, 4));
    }

    #[test]
    fn attach_without_current_fails() {
        let mut s = session(8);
        assert!(s.attach_to_previous(IMG, ScreenPos::new(0, 0)).is_none());
        assert!(s.arena().is_empty());
    }

    #[test]
    fn strings_chain_in_call_order() {
        let mut s = session(8);
        s.set_sprite_position(Pos2::new(32, 32));
        let a = s
            .add_to_string_plot_list(0x0001_0002, StringId(10), 16, 5, &[1, -1], 3)
            .unwrap();
        let b = s
            .add_to_string_plot_list(7, StringId(11), 0, 0, &[], 3)
            .unwrap();
        let got: Vec<_> = s.texts().collect();
        assert_eq!(got, [a, b]);
        let text = s.arena().text(a).unwrap();
        assert_eq!(text.args[0], 2);
        assert_eq!(text.args[1], 1);
        assert_eq!(text.screen_pos, ScreenPos::new(5, 16));
        assert_eq!(text.y_offsets, [1, -1]);
    }

    #[test]
    fn masked_image_is_recorded() {
        let mut s = session(8);
        let id = s
            .add_to_plot_list_as_parent(IMG, Pos3::new(0, 0, 0), Pos3::new(4, 4, 4))
            .unwrap();
        s.set_masked_image(id, ImageId(9));
        assert_eq!(s.arena().sprite(id).unwrap().masked_image, Some(ImageId(9)));
    }

    #[test]
    fn rotation_swaps_offset_axes() {
        let mut s = session(8);
        s.init(
            RenderTarget::new(-4096, -4096, 8192, 8192, 0),
            SessionOptions {
                rotation: Rotation::R1,
                ..SessionOptions::default()
            },
        );
        let id = s
            .add_to_plot_list_as_parent(IMG, Pos3::new(8, 0, 0), Pos3::new(4, 2, 1))
            .unwrap();
        let b = s.arena().sprite(id).unwrap().bounds;
        // Rotation 1 draws with the x axis flipped to rotation 3.
        assert_eq!((b.x, b.y), (0, 8));
        assert_eq!((b.x_end, b.y_end), (-2, 11));
    }

    #[test]
    fn extreme_offsets_saturate_and_clamp() {
        let mut s = session(16);
        for rotation in Rotation::ALL {
            s.init(
                RenderTarget::new(-4096, -4096, 8192, 8192, 0),
                SessionOptions {
                    rotation,
                    ..SessionOptions::default()
                },
            );
            let far = s
                .add_to_plot_list_as_parent_with_bounds(
                    IMG,
                    Pos3::new(0, 0, 0),
                    Pos3::new(0x7000_0000, 0x7000_0000, 0),
                    Pos3::new(1, 1, 1),
                )
                .unwrap();
            let skewed = s
                .add_to_plot_list_as_parent_with_bounds(
                    IMG,
                    Pos3::new(0, 0, 0),
                    Pos3::new(i32::MIN, i32::MAX, i32::MAX),
                    Pos3::new(i32::MAX, i32::MAX, i32::MAX),
                )
                .unwrap();
            s.set_sprite_position(Pos2::new(i32::MAX, i32::MIN));
            let _ = s.add_to_plot_list_as_parent(
                IMG,
                Pos3::new(i32::MIN, i32::MAX, i32::MIN),
                Pos3::new(4, 4, 4),
            );
            s.set_sprite_position(Pos2::default());

            assert_eq!(
                s.arena().sprite(far).unwrap().quadrant,
                1023,
                "rotation {rotation:?}"
            );
            assert_eq!(s.arena().sprite(skewed).unwrap().bounds.z_end, i32::MAX);
            let stats = s.arrange_structs();
            assert!(stats.sprites >= 2, "rotation {rotation:?}");
        }
    }

    #[test]
    fn track_road_slots_chain_newest_first() {
        let mut s = session(8);
        let a = s
            .add_to_plot_list_track_road(IMG, 1, Pos3::new(0, 0, 0), Pos3::new(0, 0, 0), Pos3::new(32, 32, 1))
            .unwrap();
        let b = s
            .add_to_plot_list_track_road(IMG, 1, Pos3::new(0, 0, 0), Pos3::new(0, 0, 0), Pos3::new(32, 32, 1))
            .unwrap();
        assert_eq!(s.current(), Some(b));
        assert!(s.quadrants().is_empty());
        assert_eq!(s.children(b).collect::<Vec<_>>(), [a]);
    }

    #[test]
    #[should_panic(expected = "track/road priority 5 out of range")]
    fn track_road_priority_out_of_range_panics() {
        let mut s = session(8);
        let _ = s.add_to_plot_list_track_road(IMG, 5, Pos3::default(), Pos3::default(), Pos3::default());
    }
}
