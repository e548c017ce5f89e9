// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Materializing descriptions into backing nodes, and applying their fields.

use alloc::boxed::Box;
use alloc::rc::Rc;

use crate::backend::Backend;
use crate::element::{Component, Element, Kind, Primitive};
use crate::hooks;
use crate::props::{Color, Draw, Geometry, Props, TextStyle};

/// Materialize an optional description into a detached backing node.
///
/// `None` produces an invisible placeholder node, so a parent can position
/// "nothing" the same way on every cycle. The node is not attached anywhere;
/// the caller adds it to a container.
///
/// ```rust
/// # #[cfg(feature = "scene_adapter")] {
/// use understory_scene::{Content, Scene};
/// use understory_vtree::{Element, Props, materialize};
///
/// let mut scene = Scene::new();
/// let mut label = Element::text("label", Props::new().text("Mon"));
/// let node = materialize(&mut scene, Some(&mut label));
/// assert_eq!(label.node(), Some(node));
/// assert!(matches!(scene.content(node), Some(Content::Text(_))));
///
/// let gap = materialize(&mut scene, None);
/// assert!(matches!(scene.content(gap), Some(Content::Placeholder)));
/// # }
/// ```
pub fn materialize<B: Backend>(backend: &mut B, element: Option<&mut Element<B>>) -> B::Node {
    match element {
        Some(element) => create(backend, element),
        None => backend.create(Primitive::Placeholder),
    }
}

/// Build the backing node for `element` and everything below it.
///
/// Records the node (and, for components, the rendered description) on
/// `element`, then fires its mount hook.
pub(crate) fn create<B: Backend>(backend: &mut B, element: &mut Element<B>) -> B::Node {
    let node = match element.kind() {
        Kind::Component(component) => {
            let component = component.clone();
            let mut rendered = render(&component, element);
            let node = create(backend, &mut rendered);
            element.rendered = Some(Box::new(rendered));
            node
        }
        Kind::Primitive(primitive) => {
            let primitive = *primitive;
            let node = backend.create(primitive);
            apply_geometry(backend, node, &element.props().geometry);
            if primitive == Primitive::Group {
                for child in element.children_mut() {
                    let child_node = create(backend, child);
                    backend.add_child(node, child_node);
                }
            } else {
                apply_content(backend, node, primitive, None, element.props());
            }
            node
        }
    };
    tracing::trace!(kind = ?element.kind(), key = %element.key(), ?node, "create");
    element.node = Some(node);
    hooks::mount(backend, element, node);
    node
}

/// Expand a component call site by one level.
///
/// A component that renders nothing yields a placeholder carrying the call
/// site's key, so the call site always has a backing node.
pub(crate) fn render<B: Backend>(component: &Component<B>, element: &Element<B>) -> Element<B> {
    component
        .render(element.props(), element.children())
        .unwrap_or_else(|| {
            tracing::trace!(component = component.name(), key = %element.key(), "rendered nothing");
            Element::placeholder(element.key().clone())
        })
}

/// Write every geometry field that is set.
pub(crate) fn apply_geometry<B: Backend>(backend: &mut B, node: B::Node, geometry: &Geometry) {
    if let Some(position) = geometry.position {
        backend.set_position(node, position);
    }
    if let Some(opacity) = geometry.opacity {
        backend.set_opacity(node, opacity);
    }
    if let Some(visible) = geometry.visible {
        backend.set_visible(node, visible);
    }
    if let Some(rotation) = geometry.rotation {
        backend.set_rotation(node, rotation);
    }
    if let Some(pivot) = geometry.pivot {
        backend.set_pivot(node, pivot);
    }
    if let Some(scale) = geometry.scale {
        backend.set_scale(node, scale);
    }
}

/// Write the kind-specific fields of a leaf.
///
/// With `old == None` (creation) every set field is written. Otherwise a field
/// is written only if it differs from the old one: drawing routines and text
/// styles by pointer, everything else by value. A field that was set and is now
/// unset is reset to its default.
pub(crate) fn apply_content<B: Backend>(
    backend: &mut B,
    node: B::Node,
    primitive: Primitive,
    old: Option<&Props<B>>,
    new: &Props<B>,
) {
    match primitive {
        Primitive::Shape => {
            if differs(old.map(|o| &o.draw), &new.draw, Draw::ptr_eq) {
                backend.draw(node, new.draw.as_ref());
            }
        }
        Primitive::Text => {
            if differs(old.map(|o| &o.text), &new.text, |a, b| a == b) {
                backend.set_text(node, new.text.as_deref().unwrap_or(""));
            }
            if differs(old.map(|o| &o.style), &new.style, Rc::ptr_eq) {
                match &new.style {
                    Some(style) => backend.set_text_style(node, style),
                    None => backend.set_text_style(node, &TextStyle::default()),
                }
            }
            apply_anchor(backend, node, old, new);
        }
        Primitive::Image => {
            if differs(old.map(|o| &o.source), &new.source, |a, b| a == b) {
                backend.set_image_source(node, new.source.as_deref().unwrap_or(""));
            }
            if differs(old.map(|o| &o.tint), &new.tint, |a, b| a == b) {
                backend.set_tint(node, new.tint.unwrap_or(Color::WHITE));
            }
            apply_anchor(backend, node, old, new);
        }
        Primitive::Group | Primitive::Placeholder => {}
    }
}

fn apply_anchor<B: Backend>(
    backend: &mut B,
    node: B::Node,
    old: Option<&Props<B>>,
    new: &Props<B>,
) {
    if differs(old.map(|o| &o.anchor), &new.anchor, |a, b| a == b) {
        backend.set_anchor(node, new.anchor.unwrap_or_default());
    }
}

fn differs<T>(old: Option<&Option<T>>, new: &Option<T>, same: impl Fn(&T, &T) -> bool) -> bool {
    match (old, new) {
        (None, new) => new.is_some(),
        (Some(None), None) => false,
        (Some(Some(old)), Some(new)) => !same(old, new),
        (Some(_), _) => true,
    }
}
