// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The patch engine and the in-place node updater.

use alloc::boxed::Box;

use crate::backend::Backend;
use crate::children::reconcile_children;
use crate::create::{apply_content, apply_geometry, create, render};
use crate::element::{Element, Kind, Primitive};
use crate::hooks;

/// Bring the children of `parent` from `old` to `new`.
///
/// Returns the description to keep for the next cycle: `new`, now
/// materialized, or `None`.
///
/// - Neither present: nothing happens.
/// - Only `new`: it is materialized and appended to `parent`.
/// - Only `old`: it is retired (destroy hooks) and detached (remove hook).
/// - Both, same kind and key: the old backing node is updated in place.
/// - Both, different identity: `new` is materialized and inserted where the
///   old node sits, then the old one is retired and detached.
///
/// `old` must be the value a previous call returned for the same `parent`.
///
/// ```rust
/// # #[cfg(feature = "scene_adapter")] {
/// use understory_scene::Scene;
/// use understory_vtree::{Element, Props, patch};
///
/// let mut scene = Scene::new();
/// let root = scene.insert(None, Default::default());
///
/// let view = |day: &str| Element::text("day", Props::new().text(day));
/// let tree = patch(&mut scene, root, None, Some(view("Mon")));
/// let node = tree.as_ref().and_then(Element::node).unwrap();
///
/// let tree = patch(&mut scene, root, tree, Some(view("Tue")));
/// assert_eq!(tree.as_ref().and_then(Element::node), Some(node));
///
/// assert!(patch(&mut scene, root, tree, None).is_none());
/// assert_eq!(scene.child_count(root), 0);
/// # }
/// ```
pub fn patch<B: Backend>(
    backend: &mut B,
    parent: B::Node,
    old: Option<Element<B>>,
    new: Option<Element<B>>,
) -> Option<Element<B>> {
    match (old, new) {
        (None, None) => None,
        (None, Some(mut new)) => {
            tracing::debug!(?parent, key = %new.key(), "patch: mount");
            let node = create(backend, &mut new);
            backend.add_child(parent, node);
            Some(new)
        }
        (Some(old), None) => {
            tracing::debug!(?parent, key = %old.key(), "patch: unmount");
            hooks::remove(backend, parent, old);
            None
        }
        (Some(old), Some(mut new)) => {
            tracing::debug!(?parent, key = %new.key(), "patch");
            reconcile(backend, parent, old, &mut new);
            Some(new)
        }
    }
}

/// Both present: update in place when the identity holds, replace otherwise.
pub(crate) fn reconcile<B: Backend>(
    backend: &mut B,
    parent: B::Node,
    old: Element<B>,
    new: &mut Element<B>,
) {
    if old.is_same(new) {
        update(backend, old, new);
    } else {
        replace(backend, parent, old, new);
    }
}

/// Materialize `new` at the position of `old`, then retire `old`.
///
/// Inserting at the old index rather than appending is deliberate: a
/// component whose output changes identity inside a list keeps its place.
fn replace<B: Backend>(backend: &mut B, parent: B::Node, old: Element<B>, new: &mut Element<B>) {
    tracing::trace!(old = ?old.identity(), new = ?new.identity(), "replace");
    let node = create(backend, new);
    match old.node().and_then(|old| backend.child_index(parent, old)) {
        Some(index) => backend.add_child_at(parent, node, index),
        None => backend.add_child(parent, node),
    }
    hooks::remove(backend, parent, old);
}

/// Reconcile two descriptions of the same identity onto the old backing node.
///
/// A component is re-rendered and its rendered descriptions are reconciled
/// against the container its node lives in. Hooks at a component call site
/// never see updates.
pub(crate) fn update<B: Backend>(backend: &mut B, mut old: Element<B>, new: &mut Element<B>) {
    let node = old
        .node()
        .expect("updating a description that was never materialized");
    match new.kind() {
        Kind::Component(component) => {
            let component = component.clone();
            let mut rendered = render(&component, new);
            let previous = old
                .rendered
                .take()
                .expect("materialized component without a rendered description");
            let parent = backend
                .parent(node)
                .expect("materialized component node is not attached");
            reconcile(backend, parent, *previous, &mut rendered);
            new.node = rendered.node();
            new.rendered = Some(Box::new(rendered));
        }
        Kind::Primitive(primitive) => {
            let primitive = *primitive;
            tracing::trace!(key = %new.key(), ?node, "update");
            new.node = Some(node);
            hooks::update(&old, new);
            apply_geometry(backend, node, &new.props().geometry);
            if primitive == Primitive::Group {
                let previous = old.take_children();
                reconcile_children(backend, node, previous, new.children_mut());
            } else {
                apply_content(backend, node, primitive, Some(old.props()), new.props());
            }
        }
    }
}
