// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: allocation, topology, node fields, and commit.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use kurbo::{Affine, BezPath, Point, Rect, Shape as _, Vec2};
use smallvec::SmallVec;

use crate::damage::Damage;
use crate::types::{Content, LocalNode, NodeFlags, NodeId, TextStyle};

/// A retained tree of nodes.
///
/// Nodes live in slots addressed by generational [`NodeId`]s. Topology changes
/// (insert, reposition, remove) and field changes take effect immediately for
/// structural queries such as [`Scene::children_of`] and [`Scene::child_index`].
/// World-space data (transforms, opacity, visibility, bounds) is only refreshed
/// by [`Scene::commit`].
///
/// Every operation on a stale id is a silent no-op, and every accessor returns
/// `None` (or an empty slice) for one.
///
/// ## Example
///
/// ```rust
/// use understory_scene::{Content, Scene};
///
/// let mut scene = Scene::new();
/// let root = scene.insert(None, Content::Group);
/// let child = scene.insert(Some(root), Content::Placeholder);
/// assert_eq!(scene.child_index(root, child), Some(0));
///
/// scene.remove_child(root, child);
/// assert!(!scene.is_alive(child));
/// assert_eq!(scene.child_count(root), 0);
/// ```
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// world bounds of nodes removed since the last commit
    removed: Vec<Rect>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct WorldNode {
    transform: Affine,
    opacity: f64,
    visible: bool,
    bounds: Rect,
}

impl Default for WorldNode {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            opacity: 1.0,
            visible: false,
            bounds: Rect::ZERO,
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    /// Position in the parent's `children`; meaningless while detached.
    slot: usize,
    children: SmallVec<[NodeId; 4]>,
    local: LocalNode,
    content: Content,
    world: WorldNode,
    dirty: bool,
}

impl Node {
    fn new(generation: u32, content: Content) -> Self {
        let mut local = LocalNode::default();
        if matches!(content, Content::Placeholder) {
            local.flags.remove(NodeFlags::VISIBLE);
        }
        Self {
            generation,
            parent: None,
            slot: 0,
            children: SmallVec::new(),
            local,
            content,
            world: WorldNode::default(),
            dirty: true,
        }
    }

    fn local_bounds(&self) -> Option<Rect> {
        match &self.content {
            Content::Shape(path) if !path.elements().is_empty() => Some(path.bounding_box()),
            _ => None,
        }
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Insert a new node, appended to the children of `parent` (or detached if `None`).
    ///
    /// Placeholder nodes start hidden; every other node starts visible with
    /// default geometry.
    pub fn insert(&mut self, parent: Option<NodeId>, content: Content) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, content));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, content)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, generation);
        if let Some(p) = parent {
            self.add_child(p, id);
        }
        id
    }

    /// Remove a node and its whole subtree, detaching it from its parent.
    ///
    /// All ids in the subtree go stale immediately. The area they covered is
    /// reported as damage by the next [`Scene::commit`].
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
    }

    /// Append `child` to `parent`, detaching it from any previous parent first.
    ///
    /// Ignored if either id is stale or if the move would create a cycle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let count = self.child_count(parent);
        self.add_child_at(parent, child, count);
    }

    /// Insert `child` into `parent` at `index`, detaching it from any previous parent first.
    ///
    /// When `child` is already a child of `parent`, it is removed before `index`
    /// is applied, so `index` refers to positions among the *other* children.
    /// Indices past the end append.
    ///
    /// Ignored if either id is stale or if the move would create a cycle.
    pub fn add_child_at(&mut self, parent: NodeId, child: NodeId, index: usize) {
        if !self.is_alive(parent) || !self.is_alive(child) || self.is_ancestor_or_self(child, parent)
        {
            return;
        }
        if let Some(old_parent) = self.node(child).parent {
            self.unlink_parent(child, old_parent);
        }
        let siblings = &mut self.node_mut(parent).children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.node_mut(child).parent = Some(parent);
        self.reindex(parent, index);
        self.mark_subtree_dirty(child);
    }

    /// Remove `child` from `parent` and free its subtree.
    ///
    /// Does nothing unless `child` is currently a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent_of(child) == Some(parent) {
            self.remove(child);
        }
    }

    /// Position of `child` among the children of `parent`.
    ///
    /// Constant time: every node remembers its slot in its parent.
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.node_opt(child)
            .filter(|n| n.parent == Some(parent))
            .map(|n| n.slot)
    }

    /// Number of children of `parent`, or zero for a stale id.
    pub fn child_count(&self, parent: NodeId) -> usize {
        self.children_of(parent).len()
    }

    /// Get the children of a node in order, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        if !self.is_alive(id) {
            return &[];
        }
        &self.node(id).children
    }

    /// Returns the parent of a node if live, or `None` for detached nodes and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns `true` if the scene holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Local geometry of a live node.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Content of a live node.
    pub fn content(&self, id: NodeId) -> Option<&Content> {
        self.node_opt(id).map(|n| &n.content)
    }

    /// Update position.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        self.update_local(id, |l| &mut l.position, position);
    }

    /// Update rotation (radians).
    pub fn set_rotation(&mut self, id: NodeId, rotation: f64) {
        self.update_local(id, |l| &mut l.rotation, rotation);
    }

    /// Update scale.
    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) {
        self.update_local(id, |l| &mut l.scale, scale);
    }

    /// Update pivot.
    pub fn set_pivot(&mut self, id: NodeId, pivot: Point) {
        self.update_local(id, |l| &mut l.pivot, pivot);
    }

    /// Update opacity.
    pub fn set_opacity(&mut self, id: NodeId, opacity: f64) {
        self.update_local(id, |l| &mut l.opacity, opacity);
    }

    /// Show or hide a node (and with it, its subtree).
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        let Some(flags) = self.local(id).map(|l| l.flags) else {
            return;
        };
        let mut next = flags;
        next.set(NodeFlags::VISIBLE, visible);
        self.set_flags(id, next);
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.update_local(id, |l| &mut l.flags, flags);
    }

    /// Replace the path of a shape node. Ignored for other content.
    pub fn set_path(&mut self, id: NodeId, path: BezPath) {
        if let Some(n) = self.node_opt_mut(id)
            && let Content::Shape(p) = &mut n.content
        {
            *p = path;
            n.dirty = true;
        }
    }

    /// Replace the text of a text node. Ignored for other content.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && let Content::Text(t) = &mut n.content
            && t.text != text
        {
            t.text.clear();
            t.text.push_str(text);
            n.dirty = true;
        }
    }

    /// Replace the style of a text node. Ignored for other content.
    pub fn set_text_style(&mut self, id: NodeId, style: TextStyle) {
        if let Some(n) = self.node_opt_mut(id)
            && let Content::Text(t) = &mut n.content
            && t.style != style
        {
            t.style = style;
            n.dirty = true;
        }
    }

    /// Update the anchor of a text or image node. Ignored for other content.
    pub fn set_anchor(&mut self, id: NodeId, anchor: Point) {
        if let Some(n) = self.node_opt_mut(id) {
            let slot = match &mut n.content {
                Content::Text(t) => &mut t.anchor,
                Content::Image(i) => &mut i.anchor,
                _ => return,
            };
            if *slot != anchor {
                *slot = anchor;
                n.dirty = true;
            }
        }
    }

    /// Replace the source of an image node. Ignored for other content.
    pub fn set_image_source(&mut self, id: NodeId, source: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && let Content::Image(i) = &mut n.content
            && i.source != source
        {
            i.source.clear();
            i.source.push_str(source);
            n.dirty = true;
        }
    }

    /// Update the tint of an image node. Ignored for other content.
    pub fn set_tint(&mut self, id: NodeId, tint: u32) {
        if let Some(n) = self.node_opt_mut(id)
            && let Content::Image(i) = &mut n.content
            && i.tint != tint
        {
            i.tint = tint;
            n.dirty = true;
        }
    }

    /// Return the world transform for a live node as of the last [`Scene::commit`].
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        self.node_opt(id).map(|n| n.world.transform)
    }

    /// Return the effective opacity (product of ancestor opacities) as of the last commit.
    pub fn world_opacity(&self, id: NodeId) -> Option<f64> {
        self.node_opt(id).map(|n| n.world.opacity)
    }

    /// Return whether the node and all of its ancestors were visible at the last commit.
    pub fn world_visible(&self, id: NodeId) -> Option<bool> {
        self.node_opt(id).map(|n| n.world.visible)
    }

    /// Return the world-space bounding box of a shape node as of the last commit.
    ///
    /// Nodes that draw nothing report [`Rect::ZERO`].
    pub fn world_bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.world.bounds)
    }

    /// Recompute world data for every node reachable from a root and return coarse damage.
    ///
    /// A node contributes damage (its old and new world bounds) when it was
    /// touched since the last commit or its world data changed. Nodes removed
    /// since the last commit contribute their last world bounds.
    pub fn commit(&mut self) -> Damage {
        let mut damage = Damage::default();
        for r in self.removed.drain(..) {
            damage.push(r);
        }
        let roots: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "NodeId uses 32-bit indices by design."
                    )]
                    Some(NodeId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect();

        for root in roots {
            self.update_world(root, &mut damage);
        }
        damage
    }

    /// Render an indented, one-line-per-node description of the subtree at `id`.
    ///
    /// Intended for debugging and tests. Returns an empty string for a stale id.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .filter(|n| n.generation == id.1)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn update_local<T: PartialEq>(
        &mut self,
        id: NodeId,
        field: impl FnOnce(&mut LocalNode) -> &mut T,
        value: T,
    ) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        let slot = field(&mut n.local);
        if *slot != value {
            *slot = value;
            self.mark_subtree_dirty(id);
        }
    }

    fn mark_subtree_dirty(&mut self, id: NodeId) {
        let mut stack = alloc::vec![id];
        while let Some(id) = stack.pop() {
            let n = self.node_mut(id);
            n.dirty = true;
            stack.extend(n.children.iter().copied());
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent_of(id) {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let slot = self.node(id).slot;
        let p = self.node_mut(parent);
        debug_assert_eq!(p.children.get(slot), Some(&id), "stale child slot");
        p.children.remove(slot);
        self.node_mut(id).parent = None;
        self.reindex(parent, slot);
    }

    /// Refresh the slots of `parent`'s children from `from` onward.
    fn reindex(&mut self, parent: NodeId, from: usize) {
        for i in from..self.node(parent).children.len() {
            let child = self.node(parent).children[i];
            self.node_mut(child).slot = i;
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = alloc::vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes[id.idx()].take() else {
                unreachable!("subtree slot is unoccupied");
            };
            if node.world.visible && node.world.bounds.area() > 0.0 {
                self.removed.push(node.world.bounds);
            }
            self.free_list.push(id.idx());
            stack.extend(node.children);
        }
    }

    fn update_world(&mut self, root: NodeId, damage: &mut Damage) {
        // Depth-first, propagating transform, opacity, and visibility toward the leaves.
        let mut stack = alloc::vec![(root, Affine::IDENTITY, 1.0_f64, true)];

        while let Some((id, parent_tf, parent_opacity, parent_visible)) = stack.pop() {
            let node = self.node_mut(id);
            let transform = parent_tf * node.local.transform();
            let opacity = parent_opacity * node.local.opacity;
            let visible = parent_visible && node.local.flags.contains(NodeFlags::VISIBLE);
            let bounds = node
                .local_bounds()
                .map(|b| transform_rect_bbox(transform, b))
                .unwrap_or(Rect::ZERO);

            let old = core::mem::replace(
                &mut node.world,
                WorldNode {
                    transform,
                    opacity,
                    visible,
                    bounds,
                },
            );
            let changed = old.transform != transform
                || old.opacity != opacity
                || old.visible != visible
                || old.bounds != bounds;
            if node.dirty || changed {
                damage.recomputed += 1;
                if old.visible {
                    damage.push(old.bounds);
                }
                if visible {
                    damage.push(bounds);
                }
            }
            node.dirty = false;

            // Push in reverse so children are visited in order.
            for &child in node.children.iter().rev() {
                stack.push((child, transform, opacity, visible));
            }
        }
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        for _ in 0..depth {
            out.push_str("  ");
        }
        let _ = write!(out, "{}#{}", node.content.name(), id.0);
        let local = &node.local;
        if local.position != Point::ZERO {
            let _ = write!(out, " pos=({}, {})", local.position.x, local.position.y);
        }
        if local.opacity != 1.0 {
            let _ = write!(out, " opacity={}", local.opacity);
        }
        if !local.flags.contains(NodeFlags::VISIBLE) && !matches!(node.content, Content::Placeholder)
        {
            out.push_str(" hidden");
        }
        match &node.content {
            Content::Text(t) => {
                let _ = write!(out, " {:?}", t.text);
            }
            Content::Image(i) => {
                let _ = write!(out, " src={:?}", i.source);
            }
            _ => {}
        }
        out.push('\n');
        for &child in &node.children {
            self.dump_into(child, depth + 1, out);
        }
    }
}

/// Transform an axis-aligned `Rect` by an `Affine` and return a conservative
/// axis-aligned bounding box.
fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let min_x = (a * rect.x0).min(a * rect.x1) + (c * rect.y0).min(c * rect.y1);
    let max_x = (a * rect.x0).max(a * rect.x1) + (c * rect.y0).max(c * rect.y1);
    let min_y = (b * rect.x0).min(b * rect.x1) + (d * rect.y0).min(d * rect.y1);
    let max_y = (b * rect.x0).max(b * rect.x1) + (d * rect.y0).max(d * rect.y1);
    Rect::new(min_x + e, min_y + f, max_x + e, max_y + f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextContent;
    use core::f64::consts::FRAC_PI_2;
    use kurbo::Shape;

    fn square(side: f64) -> BezPath {
        Rect::new(0.0, 0.0, side, side).to_path(0.1)
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut scene = Scene::new();
        let root = scene.insert(None, Content::Group);
        let a = scene.insert(Some(root), Content::Group);
        assert!(scene.is_alive(root));
        assert!(scene.is_alive(a));

        scene.remove(a);
        assert!(!scene.is_alive(a));

        let b = scene.insert(Some(root), Content::Group);
        assert!(scene.is_alive(b));
        assert!(!scene.is_alive(a), "recycled slot must not revive a stale id");
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn remove_frees_whole_subtree() {
        let mut scene = Scene::new();
        let root = scene.insert(None, Content::Group);
        let group = scene.insert(Some(root), Content::Group);
        let leaf = scene.insert(Some(group), Content::Shape(square(4.0)));
        assert_eq!(scene.len(), 3);

        scene.remove_child(root, group);
        assert!(!scene.is_alive(group));
        assert!(!scene.is_alive(leaf));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.child_count(root), 0);
    }

    #[test]
    fn remove_child_ignores_foreign_parent() {
        let mut scene = Scene::new();
        let a = scene.insert(None, Content::Group);
        let b = scene.insert(None, Content::Group);
        let child = scene.insert(Some(a), Content::Group);

        scene.remove_child(b, child);
        assert!(scene.is_alive(child));
        assert_eq!(scene.children_of(a), &[child]);
    }

    #[test]
    fn add_child_at_repositions_existing_child() {
        let mut scene = Scene::new();
        let root = scene.insert(None, Content::Group);
        let a = scene.insert(Some(root), Content::Group);
        let b = scene.insert(Some(root), Content::Group);
        let c = scene.insert(Some(root), Content::Group);

        // Move `a` to the end: index applies after `a` is taken out.
        scene.add_child_at(root, a, 2);
        assert_eq!(scene.children_of(root), &[b, c, a]);

        // Move `a` back to the front.
        scene.add_child_at(root, a, 0);
        assert_eq!(scene.children_of(root), &[a, b, c]);

        // Past-the-end appends.
        scene.add_child_at(root, b, 99);
        assert_eq!(scene.children_of(root), &[a, c, b]);
        assert_eq!(scene.child_index(root, b), Some(2));
    }

    #[test]
    fn child_index_follows_moves_and_removals() {
        let mut scene = Scene::new();
        let root = scene.insert(None, Content::Group);
        let other = scene.insert(None, Content::Group);
        let kids: Vec<_> = (0..6).map(|_| scene.insert(Some(root), Content::Group)).collect();

        scene.add_child_at(root, kids[5], 0);
        scene.add_child_at(root, kids[0], 3);
        scene.remove_child(root, kids[2]);
        scene.add_child(other, kids[4]);
        scene.add_child_at(root, kids[1], 99);

        for (i, &c) in scene.children_of(root).iter().enumerate() {
            assert_eq!(scene.child_index(root, c), Some(i));
        }
        assert_eq!(scene.child_index(root, kids[2]), None);
        assert_eq!(scene.child_index(root, kids[4]), None);
        assert_eq!(scene.child_index(other, kids[4]), Some(0));
    }

    #[test]
    fn add_child_reparents() {
        let mut scene = Scene::new();
        let left = scene.insert(None, Content::Group);
        let right = scene.insert(None, Content::Group);
        let n = scene.insert(Some(left), Content::Group);

        scene.add_child(right, n);
        assert_eq!(scene.child_count(left), 0);
        assert_eq!(scene.parent_of(n), Some(right));
    }

    #[test]
    fn add_child_rejects_cycles() {
        let mut scene = Scene::new();
        let root = scene.insert(None, Content::Group);
        let child = scene.insert(Some(root), Content::Group);

        scene.add_child(child, root);
        assert_eq!(scene.parent_of(root), None);
        scene.add_child(child, child);
        assert_eq!(scene.child_count(child), 0);
    }

    #[test]
    fn stale_ids_are_ignored() {
        let mut scene = Scene::new();
        let root = scene.insert(None, Content::Group);
        let n = scene.insert(Some(root), Content::Group);
        scene.remove(n);

        scene.set_position(n, Point::new(1.0, 1.0));
        scene.add_child(root, n);
        assert_eq!(scene.child_count(root), 0);
        assert!(scene.local(n).is_none());
        assert!(scene.world_transform(n).is_none());
        assert_eq!(scene.children_of(n), &[] as &[NodeId]);
    }

    #[test]
    fn placeholder_starts_hidden() {
        let mut scene = Scene::new();
        let root = scene.insert(None, Content::Group);
        let p = scene.insert(Some(root), Content::Placeholder);
        let _ = scene.commit();
        assert_eq!(scene.world_visible(p), Some(false));
        assert_eq!(scene.world_visible(root), Some(true));
    }

    #[test]
    fn world_transform_composes_pivot_rotation_and_scale() {
        let mut scene = Scene::new();
        let root = scene.insert(None, Content::Group);
        let n = scene.insert(Some(root), Content::Shape(square(10.0)));
        scene.set_position(root, Point::new(100.0, 0.0));
        scene.set_pivot(n, Point::new(5.0, 5.0));
        scene.set_position(n, Point::new(5.0, 5.0));
        scene.set_scale(n, Vec2::new(2.0, 2.0));
        let _ = scene.commit();

        let tf = scene.world_transform(n).unwrap();
        // The pivot stays put under scale.
        let p = tf * Point::new(5.0, 5.0);
        assert!((p.x - 105.0).abs() < 1e-9 && (p.y - 5.0).abs() < 1e-9);
        assert_eq!(scene.world_bounds(n), Some(Rect::new(95.0, -5.0, 115.0, 15.0)));

        scene.set_rotation(n, FRAC_PI_2);
        let _ = scene.commit();
        let p = scene.world_transform(n).unwrap() * Point::new(5.0, 5.0);
        assert!((p.x - 105.0).abs() < 1e-9 && (p.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn opacity_and_visibility_inherit() {
        let mut scene = Scene::new();
        let root = scene.insert(None, Content::Group);
        let mid = scene.insert(Some(root), Content::Group);
        let leaf = scene.insert(Some(mid), Content::Group);
        scene.set_opacity(root, 0.5);
        scene.set_opacity(mid, 0.5);
        let _ = scene.commit();
        assert_eq!(scene.world_opacity(leaf), Some(0.25));
        assert_eq!(scene.world_visible(leaf), Some(true));

        scene.set_visible(mid, false);
        let _ = scene.commit();
        assert_eq!(scene.world_visible(leaf), Some(false));
        assert_eq!(scene.world_visible(root), Some(true));
    }

    #[test]
    fn commit_reports_move_and_removal_damage() {
        let mut scene = Scene::new();
        let root = scene.insert(None, Content::Group);
        let n = scene.insert(Some(root), Content::Shape(square(10.0)));
        let first = scene.commit();
        assert_eq!(first.union_rect(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

        let quiet = scene.commit();
        assert!(quiet.is_empty());
        assert_eq!(quiet.recomputed, 0);

        scene.set_position(n, Point::new(50.0, 0.0));
        let moved = scene.commit();
        assert_eq!(moved.union_rect(), Some(Rect::new(0.0, 0.0, 60.0, 10.0)));

        scene.remove(n);
        let removed = scene.commit();
        assert_eq!(removed.union_rect(), Some(Rect::new(50.0, 0.0, 60.0, 10.0)));
    }

    #[test]
    fn content_setters_respect_kind() {
        let mut scene = Scene::new();
        let text = scene.insert(None, Content::Text(TextContent::default()));
        let group = scene.insert(None, Content::Group);

        scene.set_text(text, "hello");
        scene.set_anchor(text, Point::new(0.5, 0.5));
        scene.set_text(group, "ignored");
        scene.set_tint(text, 0xFF_00_00);

        let Some(Content::Text(t)) = scene.content(text) else {
            panic!("text node lost its content");
        };
        assert_eq!(t.text, "hello");
        assert_eq!(t.anchor, Point::new(0.5, 0.5));
        assert_eq!(scene.content(group), Some(&Content::Group));
    }

    #[test]
    fn dump_lists_children_in_order() {
        let mut scene = Scene::new();
        let root = scene.insert(None, Content::Group);
        let t = scene.insert(
            Some(root),
            Content::Text(TextContent {
                text: "Mon".into(),
                ..TextContent::default()
            }),
        );
        let _p = scene.insert(Some(root), Content::Placeholder);
        scene.set_position(t, Point::new(4.0, 2.0));

        let dump = scene.dump(root);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("group#"));
        assert!(lines[1].starts_with("  text#"));
        assert!(lines[1].contains("pos=(4, 2)"));
        assert!(lines[1].contains("\"Mon\""));
        assert!(lines[2].starts_with("  placeholder#"));
        assert!(!lines[2].contains("hidden"));
    }
}
