// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer hit-testing over a draw plan.

use tilepaint_core::arena::RecordId;
use tilepaint_core::geometry::{Pos2, ScreenPos};
use tilepaint_core::image::ImageId;
use tilepaint_core::interaction::{InteractionFilter, InteractionItem, OwnerRef};
use tilepaint_core::session::PaintSession;

use crate::plan::DrawPlan;

/// Decides whether an image covers a point.
///
/// Implementations usually test the opacity of the sprite pixel under the
/// point.
pub trait PixelHitTester {
    /// Returns `true` if `image`, anchored at `anchor`, has a visible pixel
    /// at `point`.
    fn is_hit(&self, image: ImageId, anchor: ScreenPos, point: ScreenPos) -> bool;
}

impl<F> PixelHitTester for F
where
    F: Fn(ImageId, ScreenPos, ScreenPos) -> bool,
{
    fn is_hit(&self, image: ImageId, anchor: ScreenPos, point: ScreenPos) -> bool {
        self(image, anchor, point)
    }
}

/// What a hit resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interaction {
    /// The sprite that was hit. For attachments, the sprite they belong to.
    pub record: RecordId,
    /// Kind of object hit.
    pub item: InteractionItem,
    /// Element or entity that produced the sprite.
    pub owner: OwnerRef,
    /// Map position of the tile the sprite was painted for.
    pub map_pos: Pos2,
    /// Track modification or signal side.
    pub mod_id: u8,
}

/// Returns the frontmost item of `plan` under `point` whose kind passes
/// `filter`.
///
/// Items are tested in draw order and the last hit wins, so the result is
/// the item drawn on top.
#[must_use]
pub fn hit_test(
    plan: &DrawPlan,
    session: &PaintSession,
    point: ScreenPos,
    filter: InteractionFilter,
    tester: &impl PixelHitTester,
) -> Option<Interaction> {
    let mut found = None;
    for item in &plan.items {
        if !item.item.passes(filter) || !tester.is_hit(item.image, item.pos, point) {
            continue;
        }
        found = Some(item.reports);
    }
    let record = found?;
    let sprite = session.arena().sprite(record)?;
    Some(Interaction {
        record,
        item: sprite.item,
        owner: sprite.owner,
        map_pos: sprite.map_pos,
        mod_id: sprite.mod_id,
    })
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;
    use tilepaint_core::geometry::Pos3;
    use tilepaint_core::image::RenderTarget;
    use tilepaint_core::session::{SessionConfig, SessionOptions};

    use super::*;

    /// Every image is a 16×16 box with its anchor at the top-left.
    fn square(_image: ImageId, anchor: ScreenPos, point: ScreenPos) -> bool {
        let d = point - anchor;
        (0..16).contains(&d.x) && (0..16).contains(&d.y)
    }

    fn session() -> PaintSession {
        let images = |_: ImageId| Some(Rect::new(0.0, 0.0, 16.0, 16.0));
        let mut s = PaintSession::new(SessionConfig::with_arena_capacity(16), images);
        s.init(
            RenderTarget::new(-512, -512, 1024, 1024, 0),
            SessionOptions::default(),
        );
        s
    }

    #[test]
    fn frontmost_hit_wins() {
        let mut s = session();
        s.set_item_type(InteractionItem::Surface);
        s.set_current_item(OwnerRef(1));
        s.add_to_plot_list_as_parent(ImageId(1), Pos3::default(), Pos3::new(32, 32, 1))
            .unwrap();
        s.set_item_type(InteractionItem::Tree);
        s.set_current_item(OwnerRef(2));
        s.set_map_position(Pos2::new(32, 64));
        let tree = s
            .add_to_plot_list_as_parent(ImageId(2), Pos3::new(0, 0, 4), Pos3::new(4, 4, 20))
            .unwrap();
        s.arrange_structs();
        let plan = DrawPlan::build(&s);

        // The tree anchors at (0, -4) over the surface at (0, 0).
        let hit = hit_test(&plan, &s, ScreenPos::new(2, 2), InteractionFilter::NONE, &square)
            .unwrap();
        assert_eq!(hit.record, tree);
        assert_eq!(hit.owner, OwnerRef(2));
        assert_eq!(hit.map_pos, Pos2::new(32, 64));

        let hit = hit_test(&plan, &s, ScreenPos::new(2, 2), InteractionFilter::TREE, &square)
            .unwrap();
        assert_eq!(hit.item, InteractionItem::Surface);

        assert!(hit_test(&plan, &s, ScreenPos::new(100, 100), InteractionFilter::NONE, &square).is_none());
    }

    #[test]
    fn attachments_report_their_parent() {
        let mut s = session();
        s.set_item_type(InteractionItem::Building);
        let house = s
            .add_to_plot_list_as_parent(ImageId(1), Pos3::default(), Pos3::new(8, 8, 8))
            .unwrap();
        s.attach_to_previous(ImageId(2), ScreenPos::new(40, 0))
            .unwrap();
        s.arrange_structs();
        let plan = DrawPlan::build(&s);
        let hit = hit_test(&plan, &s, ScreenPos::new(45, 5), InteractionFilter::NONE, &square)
            .unwrap();
        assert_eq!(hit.record, house);
        assert_eq!(hit.item, InteractionItem::Building);
    }

    #[test]
    fn non_interactive_sprites_are_skipped() {
        let mut s = session();
        s.add_to_plot_list_as_parent(ImageId(1), Pos3::default(), Pos3::new(8, 8, 8))
            .unwrap();
        s.arrange_structs();
        let plan = DrawPlan::build(&s);
        assert!(hit_test(&plan, &s, ScreenPos::new(1, 1), InteractionFilter::NONE, &square).is_none());
    }
}
