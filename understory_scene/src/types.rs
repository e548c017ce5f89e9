// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, geometry, and content.

use alloc::string::String;

use kurbo::{Affine, BezPath, Point, Vec2};

/// Identifier for a node in the scene (generational).
///
/// Ids are cheap to copy and compare. Once the node is removed the id is stale forever:
/// the slot may be recycled, but with a bumped generation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw slot index (for diagnostics only).
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns the generation counter.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Per-node flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible. Hiding a node hides its whole subtree.
        const VISIBLE = 0b0000_0001;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Local geometry for a node, relative to its parent.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalNode {
    /// Translation of the pivot point in parent space.
    pub position: Point,
    /// Rotation in radians, around the pivot.
    pub rotation: f64,
    /// Non-uniform scale, around the pivot.
    pub scale: Vec2,
    /// Local-space point that `position` places and that rotation and scale pivot around.
    pub pivot: Point,
    /// Opacity in `0.0..=1.0`, multiplied down the tree.
    pub opacity: f64,
    /// Visibility flags.
    pub flags: NodeFlags,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            pivot: Point::ZERO,
            opacity: 1.0,
            flags: NodeFlags::default(),
        }
    }
}

impl LocalNode {
    /// The local-to-parent transform: `translate(position) * rotate * scale * translate(-pivot)`.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
            * Affine::translate(-self.pivot.to_vec2())
    }
}

/// Text styling stored on a text node.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Font size in logical pixels.
    pub font_size: f64,
    /// Fill color as `0xRRGGBB`.
    pub fill: u32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: String::from("sans-serif"),
            font_size: 16.0,
            fill: 0x00_00_00,
        }
    }
}

/// Payload of a text node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextContent {
    /// The text itself.
    pub text: String,
    /// How the text is drawn.
    pub style: TextStyle,
    /// Normalized anchor: `(0, 0)` is top-left, `(1, 1)` is bottom-right.
    pub anchor: Point,
}

/// Payload of an image node.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageContent {
    /// Image source (path, URL, or atlas name; resolved by the renderer).
    pub source: String,
    /// Multiplicative tint as `0xRRGGBB`. White leaves the image unchanged.
    pub tint: u32,
    /// Normalized anchor: `(0, 0)` is top-left, `(1, 1)` is bottom-right.
    pub anchor: Point,
}

impl Default for ImageContent {
    fn default() -> Self {
        Self {
            source: String::new(),
            tint: 0xFF_FF_FF,
            anchor: Point::ZERO,
        }
    }
}

/// What a node draws.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Content {
    /// A container. Draws nothing itself.
    #[default]
    Group,
    /// A vector shape.
    Shape(BezPath),
    /// A run of text.
    Text(TextContent),
    /// An image.
    Image(ImageContent),
    /// An invisible node that keeps a slot occupied.
    Placeholder,
}

impl Content {
    /// A short lowercase name for debugging output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Shape(_) => "shape",
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Placeholder => "placeholder",
        }
    }
}
