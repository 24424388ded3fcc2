// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image identifiers, render targets and the image-extent lookup.
//!
//! The core never decodes images. It only needs to know where an image's
//! pixels fall relative to its anchor so it can drop sprites that cannot
//! reach the render target. That lookup is supplied by the caller through
//! [`ImageTable`].

use core::fmt;

use kurbo::{Rect, Vec2};

use crate::geometry::ScreenPos;

/// A packed image identifier: sprite index plus colour-remap flags.
///
/// The low 19 bits hold the sprite index. Bits 19–23 carry the primary
/// colour (or translucency colour), bits 24–28 the secondary colour, and the
/// top three bits select remap, translucent and secondary-remap modes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

impl ImageId {
    const INDEX_MASK: u32 = 0x7_FFFF;
    const PRIMARY_SHIFT: u32 = 19;
    const COLOUR_MASK: u32 = 0x1F;
    const REMAP_FLAG: u32 = 1 << 29;
    const TRANSLUCENT_FLAG: u32 = 1 << 30;
    const SECONDARY_FLAG: u32 = 1 << 31;

    /// Creates an image id for a plain sprite index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index & Self::INDEX_MASK)
    }

    /// Returns the sprite index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 & Self::INDEX_MASK
    }

    /// Returns `true` if the image is drawn blended over what is beneath it.
    #[inline]
    #[must_use]
    pub const fn is_blended(self) -> bool {
        self.0 & Self::TRANSLUCENT_FLAG != 0
    }

    /// Returns `true` if the image carries a colour remap.
    #[inline]
    #[must_use]
    pub const fn has_remap(self) -> bool {
        self.0 & (Self::REMAP_FLAG | Self::SECONDARY_FLAG) != 0
    }

    /// Returns the same sprite index drawn translucently with `colour`.
    #[inline]
    #[must_use]
    pub const fn with_translucency(self, colour: u8) -> Self {
        Self(
            self.index()
                | ((colour as u32 & Self::COLOUR_MASK) << Self::PRIMARY_SHIFT)
                | Self::TRANSLUCENT_FLAG,
        )
    }
}

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({}", self.index())?;
        if self.is_blended() {
            f.write_str(" blended")?;
        } else if self.has_remap() {
            f.write_str(" remap")?;
        }
        f.write_str(")")
    }
}

/// The destination a session paints into.
///
/// The rectangle is the visible area in viewport pixels before zoom scaling,
/// the same space sprite anchors are projected into. The zoom level only
/// applies when pixels are finally written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderTarget {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Zoom level, `0` (1:1) to `3` (1:8).
    pub zoom: u8,
}

impl RenderTarget {
    /// Creates a render target, clamping `zoom` to `0..=3`.
    #[must_use]
    pub fn new(x: i32, y: i32, width: i32, height: i32, zoom: u8) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
            zoom: zoom.min(3),
        }
    }

    /// Returns the visible region as a rectangle.
    #[must_use]
    pub fn region(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }

    /// Returns the same target in output pixels, with the zoom folded in.
    ///
    /// Text is drawn at a fixed size regardless of zoom, so string records
    /// are laid out against this target.
    #[must_use]
    pub fn unzoomed(&self) -> Self {
        Self {
            x: self.x >> self.zoom,
            y: self.y >> self.zoom,
            width: self.width >> self.zoom,
            height: self.height >> self.zoom,
            zoom: 0,
        }
    }

    /// Returns `true` if an image with the given extents, anchored at `pos`,
    /// covers at least one pixel of the target.
    ///
    /// Touching edges do not count as overlap.
    #[must_use]
    pub fn is_visible(&self, pos: ScreenPos, extents: Rect) -> bool {
        let region = self.region();
        let image = extents + Vec2::new(f64::from(pos.x), f64::from(pos.y));
        image.x1 > region.x0 && image.y1 > region.y0 && image.x0 < region.x1 && image.y0 < region.y1
    }
}

/// Resolves the pixel extents of images relative to their anchor point.
///
/// Implementations typically wrap a sprite atlas header table. The returned
/// rectangle is in unzoomed pixels with the anchor at the origin.
pub trait ImageTable {
    /// Returns the extents of `image`, or `None` if the image is unknown.
    fn extents(&self, image: ImageId) -> Option<Rect>;
}

impl<F> ImageTable for F
where
    F: Fn(ImageId) -> Option<Rect>,
{
    fn extents(&self, image: ImageId) -> Option<Rect> {
        self(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_id_packs_index_and_flags() {
        let id = ImageId::new(1234);
        assert_eq!(id.index(), 1234);
        assert!(!id.is_blended());
        let t = id.with_translucency(30);
        assert_eq!(t.index(), 1234);
        assert!(t.is_blended());
    }

    #[test]
    fn index_is_masked() {
        assert_eq!(ImageId::new(u32::MAX).index(), 0x7_FFFF);
    }

    #[test]
    fn visibility_uses_strict_edges() {
        let rt = RenderTarget::new(0, 0, 100, 100, 0);
        let sprite = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rt.is_visible(ScreenPos::new(0, 0), sprite));
        assert!(rt.is_visible(ScreenPos::new(95, 95), sprite));
        assert!(!rt.is_visible(ScreenPos::new(-10, 0), sprite), "touching left");
        assert!(!rt.is_visible(ScreenPos::new(100, 0), sprite), "touching right");
        assert!(!rt.is_visible(ScreenPos::new(0, 100), sprite), "touching bottom");
    }

    #[test]
    fn unzoomed_scales_by_zoom() {
        let rt = RenderTarget::new(64, 32, 256, 128, 2);
        assert_eq!(rt.unzoomed(), RenderTarget::new(16, 8, 64, 32, 0));
        assert_eq!(rt.unzoomed().region(), Rect::new(16.0, 8.0, 80.0, 40.0));
    }

    #[test]
    fn closures_are_image_tables() {
        let table = |id: ImageId| (id.index() == 7).then(|| Rect::new(-4.0, -8.0, 4.0, 0.0));
        assert!(table.extents(ImageId::new(7)).is_some());
        assert!(table.extents(ImageId::new(8)).is_none());
    }
}
