// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract: what the reconciler needs from a retained node tree.
//!
//! The reconciler never owns nodes itself. It asks a [`Backend`] to create
//! them, wire them into containers, reposition them, set their fields, and
//! finally detach them. A backend can be a scene graph (see the
//! `scene_adapter` feature), a platform widget tree, or a test double.
//!
//! # Ordering
//!
//! Keyed list reconciliation repositions nodes by asking for their current
//! index ([`Backend::child_index`]) and inserting at an index
//! ([`Backend::add_child_at`]). The reconciler makes a small, fixed number of
//! index queries per new child, so `child_index` must be constant time
//! (or close to it): keep each node's slot in its parent, as
//! `understory_scene` does, or keep a shadow ordered index in the adapter. A
//! linear index query turns a full shuffle of `n` children into `O(n²)`.
//!
//! # Exclusivity
//!
//! Between patch calls the tree below a patch root belongs to the reconciler.
//! Reordering or removing those nodes behind its back breaks the index-based
//! repositioning.

use kurbo::{Point, Vec2};

use crate::element::Primitive;
use crate::props::{Color, Draw, TextStyle};

/// A retained node tree the reconciler can drive.
///
/// Every mutating method receives handles that the backend produced itself.
/// Handles of released nodes must be tolerated (ignored), since a deferred
/// [`Detach`](crate::Detach) may outlive its container.
pub trait Backend {
    /// Handle to a backing node.
    type Node: Copy + Eq + core::fmt::Debug;

    /// Create a detached node of the given kind with default fields.
    ///
    /// [`Primitive::Placeholder`] must produce an invisible, empty node.
    fn create(&mut self, primitive: Primitive) -> Self::Node;

    /// Append `child` to `parent`.
    fn add_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Insert `child` into `parent` at `index`.
    ///
    /// If `child` is already a child of `parent` it is moved: it is taken out
    /// first, and `index` counts the remaining children. Indices past the end
    /// append.
    fn add_child_at(&mut self, parent: Self::Node, child: Self::Node, index: usize);

    /// Current position of `child` in `parent`, if it is a child of `parent`.
    ///
    /// Called on every keyed move; should not scan the child list.
    fn child_index(&self, parent: Self::Node, child: Self::Node) -> Option<usize>;

    /// Detach `child` from `parent` and release it with its whole subtree.
    ///
    /// Does nothing if `child` is not (or no longer) a child of `parent`.
    fn remove_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Number of children of `parent`.
    fn child_count(&self, parent: Self::Node) -> usize;

    /// The container `node` is attached to.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Set the position.
    fn set_position(&mut self, node: Self::Node, position: Point);

    /// Set the opacity.
    fn set_opacity(&mut self, node: Self::Node, opacity: f64);

    /// Set the visibility.
    fn set_visible(&mut self, node: Self::Node, visible: bool);

    /// Set the rotation in radians.
    fn set_rotation(&mut self, node: Self::Node, rotation: f64);

    /// Set the pivot.
    fn set_pivot(&mut self, node: Self::Node, pivot: Point);

    /// Set the scale.
    fn set_scale(&mut self, node: Self::Node, scale: Vec2);

    /// Replace the drawing of a shape node by running `draw` (or clear it for `None`).
    fn draw(&mut self, node: Self::Node, draw: Option<&Draw>);

    /// Set the content of a text node.
    fn set_text(&mut self, node: Self::Node, text: &str);

    /// Set the style of a text node.
    fn set_text_style(&mut self, node: Self::Node, style: &TextStyle);

    /// Set the anchor of a text or image node.
    fn set_anchor(&mut self, node: Self::Node, anchor: Point);

    /// Set the source of an image node.
    fn set_image_source(&mut self, node: Self::Node, source: &str);

    /// Set the tint of an image node.
    fn set_tint(&mut self, node: Self::Node, tint: Color);
}
