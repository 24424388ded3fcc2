// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint record variants.
//!
//! A [`PaintEntry`] is one slot of the per-frame [`Arena`](crate::arena::Arena).
//! Three kinds of record share the slots:
//!
//! - [`SpriteRecord`]: an image with a world-space bounding box. Sprites are
//!   the unit the ordering engine sorts. Each one heads two chains: its
//!   *children* (further sprites drawn as part of the same object, never
//!   reordered against it) and its *attachments*.
//! - [`AttachedRecord`]: an image drawn at a fixed screen offset on top of
//!   the sprite it is attached to.
//! - [`TextRecord`]: a text label, kept in its own chain and never sorted.
//!
//! Chain links are raw slot indices with [`INVALID`] as the terminator.

use core::fmt;

use crate::arena::INVALID;
use crate::geometry::{Pos2, ScreenPos};
use crate::image::ImageId;
use crate::interaction::{InteractionItem, OwnerRef};

/// A world-space bounding box after rotation into view space.
///
/// The `*_end` corners are not necessarily larger than the start corners:
/// for rotated views the extents point away from the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoundBox {
    /// Start x.
    pub x: i32,
    /// Start y.
    pub y: i32,
    /// Start height.
    pub z: i32,
    /// End x.
    pub x_end: i32,
    /// End y.
    pub y_end: i32,
    /// End height.
    pub z_end: i32,
}

/// A queued sprite.
#[derive(Clone, Debug)]
pub struct SpriteRecord {
    /// Image to draw.
    pub image: ImageId,
    /// Optional mask the image is drawn through.
    pub masked_image: Option<ImageId>,
    /// Projected anchor on the viewport.
    pub screen_pos: ScreenPos,
    /// Bounding box used for ordering.
    pub bounds: BoundBox,
    /// Kind of object this sprite belongs to.
    pub item: InteractionItem,
    /// Element or entity that produced the sprite.
    pub owner: OwnerRef,
    /// Map position of the tile being painted.
    pub map_pos: Pos2,
    /// Track modification or signal side.
    pub mod_id: u8,
    pub(crate) quadrant: u16,
    pub(crate) next_in_quadrant: u32,
    pub(crate) next_child: u32,
    pub(crate) first_attached: u32,
    pub(crate) last_attached: u32,
}

impl Default for SpriteRecord {
    fn default() -> Self {
        Self {
            image: ImageId::default(),
            masked_image: None,
            screen_pos: ScreenPos::default(),
            bounds: BoundBox::default(),
            item: InteractionItem::None,
            owner: OwnerRef::default(),
            map_pos: Pos2::default(),
            mod_id: 0,
            quadrant: 0,
            next_in_quadrant: INVALID,
            next_child: INVALID,
            first_attached: INVALID,
            last_attached: INVALID,
        }
    }
}

impl SpriteRecord {
    /// Returns the quadrant bucket the sprite was filed under.
    ///
    /// Only meaningful for sprites that entered the quadrant index; child
    /// and unfinalised track/road sprites report `0`.
    #[inline]
    #[must_use]
    pub const fn quadrant(&self) -> u16 {
        self.quadrant
    }

    /// Returns `true` if the sprite has at least one attachment.
    #[inline]
    #[must_use]
    pub const fn has_attachments(&self) -> bool {
        self.first_attached != INVALID
    }

    /// Returns `true` if another sprite follows this one in its child chain.
    #[inline]
    #[must_use]
    pub const fn has_next_child(&self) -> bool {
        self.next_child != INVALID
    }
}

/// An overlay drawn on top of a sprite at a fixed screen offset.
#[derive(Clone, Debug)]
pub struct AttachedRecord {
    /// Image to draw.
    pub image: ImageId,
    /// Optional mask the image is drawn through.
    pub masked_image: Option<ImageId>,
    /// Offset from the parent sprite's anchor.
    pub offset: ScreenPos,
    pub(crate) next: u32,
}

impl Default for AttachedRecord {
    fn default() -> Self {
        Self {
            image: ImageId::default(),
            masked_image: None,
            offset: ScreenPos::default(),
            next: INVALID,
        }
    }
}

/// Identifier of a localised format string.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StringId(pub u16);

impl fmt::Debug for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringId({})", self.0)
    }
}

/// Number of format arguments a text record carries.
pub const TEXT_ARG_COUNT: usize = 8;

/// A queued text label.
#[derive(Clone, Debug)]
pub struct TextRecord {
    /// Format string.
    pub string_id: StringId,
    /// Format arguments.
    pub args: [u16; TEXT_ARG_COUNT],
    /// Anchor on the viewport.
    pub screen_pos: ScreenPos,
    /// Text colour.
    pub colour: u8,
    /// Per-character vertical offsets, if the label follows a curve.
    pub y_offsets: &'static [i8],
    pub(crate) next: u32,
}

impl Default for TextRecord {
    fn default() -> Self {
        Self {
            string_id: StringId::default(),
            args: [0; TEXT_ARG_COUNT],
            screen_pos: ScreenPos::default(),
            colour: 0,
            y_offsets: &[],
            next: INVALID,
        }
    }
}

/// One arena slot.
#[derive(Clone, Debug)]
pub enum PaintEntry {
    /// A sortable sprite.
    Sprite(SpriteRecord),
    /// An overlay attached to a sprite.
    Attached(AttachedRecord),
    /// A text label.
    Text(TextRecord),
}

impl PaintEntry {
    /// Returns a short name for the variant, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Sprite(_) => "sprite",
            Self::Attached(_) => "attached",
            Self::Text(_) => "text",
        }
    }
}
