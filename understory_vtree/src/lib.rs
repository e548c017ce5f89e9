// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory VTree: a keyed virtual-tree reconciler over a pluggable retained backend.
//!
//! Each cycle, application code builds a fresh tree of [`Element`] descriptions from its state.
//! [`patch`] compares that tree with the previous one and applies the smallest set of mutations it
//! can find to a retained node tree behind the [`Backend`] trait: a scene graph, a widget toolkit,
//! or a test double.
//!
//! - Descriptions have a [`Kind`] (a closed set of [`Primitive`]s, or a [`Component`]), a [`Key`]
//!   unique among siblings, [`Props`], and ordered children.
//! - Two descriptions are the same node exactly when kind and key match ([`Identity`]). Same nodes
//!   are updated in place; anything else is destroyed and rebuilt.
//! - Children of groups are reconciled by key with a four-cursor walk and a lazily built key map,
//!   so appends, prepends, removals, and reorders reuse backing nodes.
//! - Up to four [`Hooks`] per description observe the lifecycle: mount, update, destroy, and
//!   remove. The remove hook receives a [`Detach`] token and may defer detachment, for example
//!   to run an exit animation.
//!
//! ## Components
//!
//! A [`Component`] is a function from props and children to a description, with a stable identity
//! token assigned when it is created. It is expanded one level on every cycle. Hooks placed on a
//! component call site see mount, destroy, and remove, but never update; put update hooks on the
//! description the component returns.
//!
//! ## Absent children
//!
//! Children handed to the builder may be `None`. Each absent slot becomes an invisible placeholder
//! keyed by its slot index, so conditionally shown children do not shift the identity of their
//! siblings. A component that renders nothing also yields a placeholder.
//!
//! ## Ordering and cost
//!
//! The reconciler positions nodes by asking the backend for current child indices and inserting at
//! indices. Pure appends, prepends, and stable reorders cost O(n) backend calls; a shuffle costs
//! one hash lookup and one index query per unmatched child, on top of whatever the backend's index
//! query costs.
//!
//! ## Example
//!
//! ```rust
//! # #[cfg(feature = "scene_adapter")] {
//! use understory_scene::{Content, Scene};
//! use understory_vtree::{Element, Props, Root};
//!
//! fn view(days: &[&str]) -> Element<Scene> {
//!     Element::group(
//!         "week",
//!         Props::new(),
//!         days.iter()
//!             .enumerate()
//!             .map(|(i, &day)| {
//!                 Element::text(day, Props::new().text(day).position(i as f64 * 80.0, 0.0))
//!             })
//!             .collect::<Vec<_>>(),
//!     )
//! }
//!
//! let mut scene = Scene::new();
//! let container = scene.insert(None, Content::Group);
//! let mut root: Root<Scene> = Root::new(container);
//!
//! root.render(&mut scene, Some(view(&["Mon", "Tue", "Wed"])));
//! let week = root.current().and_then(Element::node).unwrap();
//! let wed = scene.children_of(week)[2];
//!
//! // Wednesday moves to the front; its scene node is reused.
//! root.render(&mut scene, Some(view(&["Wed", "Mon", "Tue"])));
//! assert_eq!(scene.children_of(week)[0], wed);
//! # }
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` in dependencies.
//! - `libm`: `no_std` float math for Kurbo.
//! - `scene_adapter`: implements [`Backend`] for `understory_scene::Scene`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;

mod backend;
mod children;
mod create;
mod element;
mod hooks;
mod key;
mod patch;
mod props;
mod root;

#[cfg(test)]
mod testing;

pub use backend::Backend;
pub use create::materialize;
pub use element::{Children, Component, ComponentId, Element, IntoChildren, Kind, Primitive, h};
pub use hooks::{Detach, DestroyHook, Hooks, MountHook, RemoveHook, UpdateHook};
pub use key::{Identity, Key, KindId};
pub use patch::patch;
pub use props::{Color, Draw, Geometry, Props, TextStyle, Value};
pub use root::{App, Root};
