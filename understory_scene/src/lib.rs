// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Scene: a retained, generational scene graph.
//!
//! Understory Scene is the mutable half of a declarative UI stack: a tree of
//! long-lived nodes that a reconciler (for example `understory_vtree`) creates,
//! repositions, mutates field by field, and detaches.
//!
//! - Nodes are addressed by generational [`NodeId`]s. A removed node's id goes stale
//!   immediately, and a recycled slot never answers to an old id.
//! - Every node owns an ordered list of children. Index queries and insert-at-index
//!   are first-class so keyed list reconciliation can reposition nodes cheaply.
//! - Every node carries the same geometry ([`LocalNode`]): position, rotation, scale,
//!   pivot, opacity, and visibility. Its [`Content`] says what it draws.
//! - [`Scene::commit`] recomputes world transforms, effective opacity and visibility,
//!   and returns coarse [`Damage`].
//!
//! ## Content kinds
//!
//! - [`Content::Group`]: a container with no drawing of its own.
//! - [`Content::Shape`]: a vector path, recorded by a drawing routine.
//! - [`Content::Text`]: a run of text with a style and an anchor.
//! - [`Content::Image`]: an image reference with a tint and an anchor.
//! - [`Content::Placeholder`]: an invisible, empty node that holds a slot open.
//!
//! This crate does not lay out, shape text, decode images, or rasterize. It stores what a
//! renderer would need and tells it what changed.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_scene::{Content, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None, Content::Group);
//! let a = scene.insert(Some(root), Content::Group);
//! let b = scene.insert(Some(root), Content::Group);
//!
//! // Move `b` in front of `a`.
//! scene.add_child_at(root, b, 0);
//! assert_eq!(scene.children_of(root), &[b, a]);
//!
//! scene.set_position(a, Point::new(10.0, 0.0));
//! let _damage = scene.commit();
//! assert_eq!(scene.world_transform(a).unwrap().translation().x, 10.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod scene;
mod types;

pub use damage::Damage;
pub use scene::Scene;
pub use types::{Content, ImageContent, LocalNode, NodeFlags, NodeId, TextContent, TextStyle};
