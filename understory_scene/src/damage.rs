// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a [`crate::Scene::commit`] changed.

use alloc::vec::Vec;

use kurbo::Rect;

/// Repaint regions and bookkeeping from one commit.
///
/// A shape that moved contributes both its old and its new world bounds.
/// Nodes without bounds (groups, text, images, placeholders) are counted in
/// `recomputed` but add no rectangle.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// World-space rectangles to repaint, in traversal order.
    pub dirty_rects: Vec<Rect>,
    /// Live nodes whose world transform, opacity, or visibility was refreshed.
    pub recomputed: usize,
}

impl Damage {
    /// Bounding box of every dirty rectangle, or `None` if there are none.
    pub fn union_rect(&self) -> Option<Rect> {
        self.dirty_rects.iter().copied().reduce(|acc, r| acc.union(r))
    }

    /// No region needs repainting.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Record `rect`, skipping degenerate ones.
    pub(crate) fn push(&mut self, rect: Rect) {
        if rect.area() > 0.0 {
            self.dirty_rects.push(rect);
        }
    }
}
