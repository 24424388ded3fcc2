// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawer boundary.

use tilepaint_core::geometry::ScreenPos;
use tilepaint_core::image::{ImageId, RenderTarget};

use crate::plan::{DrawPlan, TextItem};

/// Writes pixels for a [`DrawPlan`].
///
/// Implemented by the platform's blitter. Positions passed to
/// [`draw_image`](Self::draw_image) and
/// [`draw_image_masked`](Self::draw_image_masked) are unzoomed viewport
/// pixels; text positions are output pixels against the unzoomed target.
pub trait Drawer {
    /// Draws `image` anchored at `pos`.
    fn draw_image(&mut self, rt: &RenderTarget, pos: ScreenPos, image: ImageId);

    /// Draws `image` through `mask`, anchored at `pos`.
    fn draw_image_masked(&mut self, rt: &RenderTarget, pos: ScreenPos, image: ImageId, mask: ImageId);

    /// Draws a text label.
    fn draw_string(&mut self, rt: &RenderTarget, text: &TextItem);
}

/// Replays `plan` into `drawer`: every image item in order, then every text
/// label against the unzoomed target.
pub fn replay(plan: &DrawPlan, rt: &RenderTarget, drawer: &mut impl Drawer) {
    for item in &plan.items {
        match item.mask {
            Some(mask) => drawer.draw_image_masked(rt, item.pos, item.image, mask),
            None => drawer.draw_image(rt, item.pos, item.image),
        }
    }
    if plan.texts.is_empty() {
        return;
    }
    let text_rt = rt.unzoomed();
    for text in &plan.texts {
        drawer.draw_string(&text_rt, text);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Rect;
    use tilepaint_core::geometry::{Pos2, Pos3};
    use tilepaint_core::record::StringId;
    use tilepaint_core::session::{PaintSession, SessionConfig, SessionOptions};

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Image(ScreenPos, ImageId),
        Masked(ScreenPos, ImageId, ImageId),
        Text(RenderTarget, StringId),
    }

    #[derive(Default)]
    struct Log(Vec<Call>);

    impl Drawer for Log {
        fn draw_image(&mut self, _rt: &RenderTarget, pos: ScreenPos, image: ImageId) {
            self.0.push(Call::Image(pos, image));
        }

        fn draw_image_masked(
            &mut self,
            _rt: &RenderTarget,
            pos: ScreenPos,
            image: ImageId,
            mask: ImageId,
        ) {
            self.0.push(Call::Masked(pos, image, mask));
        }

        fn draw_string(&mut self, rt: &RenderTarget, text: &TextItem) {
            self.0.push(Call::Text(*rt, text.string_id));
        }
    }

    #[test]
    fn replays_images_then_texts() {
        let images = |id: ImageId| (id.index() != 0).then(|| Rect::new(-8.0, -8.0, 8.0, 8.0));
        let mut s = PaintSession::new(SessionConfig::with_arena_capacity(8), images);
        let rt = RenderTarget::new(-256, -256, 512, 512, 1);
        s.init(rt, SessionOptions::default());
        s.add_to_string_plot_list(0, StringId(4), 0, 0, &[], 0)
            .unwrap();
        let a = s
            .add_to_plot_list_as_parent(ImageId(1), Pos3::default(), Pos3::new(2, 2, 2))
            .unwrap();
        s.set_masked_image(a, ImageId(2));
        s.set_sprite_position(Pos2::new(64, 64));
        s.add_to_plot_list_as_parent(ImageId(3), Pos3::default(), Pos3::new(2, 2, 2))
            .unwrap();
        s.arrange_structs();

        let plan = DrawPlan::build(&s);
        let mut log = Log::default();
        replay(&plan, &rt, &mut log);
        assert_eq!(
            log.0,
            [
                Call::Masked(ScreenPos::new(0, 0), ImageId(1), ImageId(2)),
                Call::Image(ScreenPos::new(0, 64), ImageId(3)),
                Call::Text(RenderTarget::new(-128, -128, 256, 256, 0), StringId(4)),
            ]
        );
    }
}
