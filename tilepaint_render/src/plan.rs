// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw plan: the ordered draw commands for one frame.

use alloc::vec::Vec;

use tilepaint_core::arena::RecordId;
use tilepaint_core::geometry::ScreenPos;
use tilepaint_core::image::ImageId;
use tilepaint_core::interaction::InteractionItem;
use tilepaint_core::record::{StringId, TEXT_ARG_COUNT};
use tilepaint_core::session::{PaintSession, ViewFlags};
use tilepaint_core::trace::{PhaseBeginEvent, PhaseEndEvent, PhaseKind, Tracer};

#[cfg(feature = "trace-rich")]
use tilepaint_core::trace::{CullReason, DrawCull};

/// Translucency colour used for see-through objects.
pub const SEE_THROUGH_COLOUR: u8 = 30;

/// How an item relates to the ordered chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawRole {
    /// A top-level sprite from the ordered chain.
    Sprite,
    /// A sprite from the child chain of a top-level sprite.
    Child,
    /// An overlay attached to a sprite.
    Attachment,
}

/// A single image draw.
///
/// Items are produced in back-to-front order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawItem {
    /// The record being drawn.
    pub record: RecordId,
    /// The sprite a hit on this item reports. Attachments report the sprite
    /// they are attached to; sprites report themselves.
    pub reports: RecordId,
    /// Relation to the ordered chain.
    pub role: DrawRole,
    /// Image to draw, translucent if a see-through flag applies.
    pub image: ImageId,
    /// Mask the image is drawn through, if any.
    pub mask: Option<ImageId>,
    /// Anchor on the viewport, snapped for the zoom level.
    pub pos: ScreenPos,
    /// Kind of object the item belongs to.
    pub item: InteractionItem,
}

/// A text label draw, in unzoomed output pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextItem {
    /// The text record.
    pub record: RecordId,
    /// Format string.
    pub string_id: StringId,
    /// Format arguments.
    pub args: [u16; TEXT_ARG_COUNT],
    /// Anchor in output pixels.
    pub pos: ScreenPos,
    /// Text colour.
    pub colour: u8,
    /// Per-character vertical offsets.
    pub y_offsets: &'static [i8],
}

/// The draw commands for a single frame.
#[derive(Clone, Debug, Default)]
pub struct DrawPlan {
    /// Zoom level of the render target.
    pub zoom: u8,
    /// Image draws in back-to-front order.
    pub items: Vec<DrawItem>,
    /// Text labels in the order they were queued. Drawn after all items.
    pub texts: Vec<TextItem>,
    #[cfg(feature = "trace-rich")]
    culls: Vec<DrawCull>,
}

impl DrawPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the plan for an arranged session.
    #[must_use]
    pub fn build(session: &PaintSession) -> Self {
        let mut plan = Self::new();
        plan.build_into(session, &mut Tracer::none());
        plan
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
        self.texts.clear();
        #[cfg(feature = "trace-rich")]
        self.culls.clear();
    }

    /// Rebuilds the plan in place from an arranged session, bracketing the
    /// work in a [`PhaseKind::Draw`] phase on `tracer`.
    ///
    /// Each top-level sprite is followed by its attachments, then by each
    /// child and that child's attachments. A sprite hidden by the view flags
    /// hides its children as well.
    pub fn build_into(&mut self, session: &PaintSession, tracer: &mut Tracer<'_>) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "arena length is bounded by its u32 capacity"
        )]
        let used = session.arena().len() as u32;
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: session.frame_index(),
            phase: PhaseKind::Draw,
            arena_used: used,
        });

        self.clear();
        let rt = session.render_target();
        self.zoom = rt.zoom;
        let flags = session.view_flags();
        let arena = session.arena();

        for id in session.ordered() {
            let Some(sprite) = arena.sprite(id) else {
                continue;
            };
            if !self.push_sprite(id, DrawRole::Sprite, flags, session) {
                continue;
            }
            self.push_attachments(id, sprite.item, sprite.screen_pos, flags, session);
            for child in session.children(id) {
                let Some(child_sprite) = arena.sprite(child) else {
                    continue;
                };
                if self.push_sprite(child, DrawRole::Child, flags, session) {
                    self.push_attachments(
                        child,
                        child_sprite.item,
                        child_sprite.screen_pos,
                        flags,
                        session,
                    );
                }
            }
        }

        let zoom = u32::from(rt.zoom);
        for id in session.texts() {
            let Some(text) = arena.text(id) else {
                continue;
            };
            self.texts.push(TextItem {
                record: id,
                string_id: text.string_id,
                args: text.args,
                pos: ScreenPos::new(text.screen_pos.x >> zoom, text.screen_pos.y >> zoom),
                colour: text.colour,
                y_offsets: text.y_offsets,
            });
        }

        #[cfg(feature = "trace-rich")]
        tracer.draw_culls(session.frame_index(), &self.culls);

        tracer.phase_end(&PhaseEndEvent {
            frame_index: session.frame_index(),
            phase: PhaseKind::Draw,
            arena_used: used,
        });
    }

    /// Records culled while building the plan.
    #[cfg(feature = "trace-rich")]
    #[must_use]
    pub fn culls(&self) -> &[DrawCull] {
        &self.culls
    }

    /// Pushes a sprite. Returns `false` if the view flags hide it.
    fn push_sprite(
        &mut self,
        id: RecordId,
        role: DrawRole,
        flags: ViewFlags,
        session: &PaintSession,
    ) -> bool {
        let Some(sprite) = session.arena().sprite(id) else {
            return false;
        };
        let see_through = flags.is_see_through(sprite.item);
        let Some(image) = self.resolve(id, sprite.image, see_through, flags) else {
            return false;
        };
        let mut pos = sprite.screen_pos;
        if sprite.item == InteractionItem::Entity {
            let grid = !((1_i32 << self.zoom) - 1);
            pos = ScreenPos::new(pos.x & grid, pos.y & grid);
        }
        self.items.push(DrawItem {
            record: id,
            reports: id,
            role,
            image,
            mask: sprite.masked_image,
            pos,
            item: sprite.item,
        });
        true
    }

    /// Pushes the attachments of sprite `parent`, drawn relative to its
    /// anchor and culled by its kind.
    fn push_attachments(
        &mut self,
        parent: RecordId,
        item: InteractionItem,
        anchor: ScreenPos,
        flags: ViewFlags,
        session: &PaintSession,
    ) {
        let see_through = flags.is_see_through(item);
        for id in session.attachments(parent) {
            let Some(attached) = session.arena().attached(id) else {
                continue;
            };
            let Some(image) = self.resolve(id, attached.image, see_through, flags) else {
                continue;
            };
            let mut pos = anchor + attached.offset;
            if self.zoom != 0 {
                pos = ScreenPos::new(pos.x & !1, pos.y & !1);
            }
            self.items.push(DrawItem {
                record: id,
                reports: parent,
                role: DrawRole::Attachment,
                image,
                mask: attached.masked_image,
                pos,
                item,
            });
        }
    }

    /// Returns the image to draw, or `None` if the record is hidden.
    fn resolve(
        &mut self,
        id: RecordId,
        image: ImageId,
        see_through: bool,
        flags: ViewFlags,
    ) -> Option<ImageId> {
        if !see_through {
            return Some(image);
        }
        if flags.underground || image.is_blended() {
            #[cfg(feature = "trace-rich")]
            self.culls.push(DrawCull {
                slot: id.index(),
                image,
                reason: if flags.underground {
                    CullReason::Underground
                } else {
                    CullReason::AlreadyBlended
                },
            });
            #[cfg(not(feature = "trace-rich"))]
            let _ = id;
            return None;
        }
        Some(ImageId::new(image.index()).with_translucency(SEE_THROUGH_COLOUR))
    }
}
