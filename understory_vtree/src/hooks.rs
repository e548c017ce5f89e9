// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle hooks and the deferred-detach token.
//!
//! Each description may carry up to four independent callbacks:
//!
//! - **mount**: once, after the backing node is fully built (children attached,
//!   fields applied, drawing done). The node is not yet attached to its parent.
//! - **update**: once per cycle in which the description keeps its identity,
//!   with the old and the new description. Never on the replace path, and never
//!   on component descriptions.
//! - **destroy**: once, when the identity is retired, depth-first: the
//!   description itself, then its rendered description (components) or its
//!   children in order.
//! - **remove**: at the moment of physical detachment, after destroy has fired
//!   for the whole subtree. Receives a [`Detach`] token; detachment happens when
//!   the token is finished.
//!
//! The dispatch functions at the bottom of this module are the only places the
//! reconciler invokes hooks.

use alloc::rc::Rc;
use core::fmt;

use crate::backend::Backend;
use crate::element::Element;

/// Called with the backing node once it is fully built.
pub type MountHook<B> = Rc<dyn Fn(&mut B, <B as Backend>::Node)>;

/// Called with the old and the new description when identity is preserved.
pub type UpdateHook<B> = Rc<dyn Fn(&Element<B>, &Element<B>)>;

/// Called with the backing node when its identity is retired.
pub type DestroyHook<B> = Rc<dyn Fn(&mut B, <B as Backend>::Node)>;

/// Called when the backing node is about to leave its parent.
pub type RemoveHook<B> = Rc<dyn Fn(&mut B, <B as Backend>::Node, Detach<B>)>;

/// The four optional lifecycle callbacks of a description.
pub struct Hooks<B: Backend> {
    /// See [`MountHook`].
    pub mount: Option<MountHook<B>>,
    /// See [`UpdateHook`].
    pub update: Option<UpdateHook<B>>,
    /// See [`DestroyHook`].
    pub destroy: Option<DestroyHook<B>>,
    /// See [`RemoveHook`].
    pub remove: Option<RemoveHook<B>>,
}

impl<B: Backend> Default for Hooks<B> {
    fn default() -> Self {
        Self {
            mount: None,
            update: None,
            destroy: None,
            remove: None,
        }
    }
}

impl<B: Backend> Clone for Hooks<B> {
    fn clone(&self) -> Self {
        Self {
            mount: self.mount.clone(),
            update: self.update.clone(),
            destroy: self.destroy.clone(),
            remove: self.remove.clone(),
        }
    }
}

impl<B: Backend> fmt::Debug for Hooks<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("mount", &self.mount.is_some())
            .field("update", &self.update.is_some())
            .field("destroy", &self.destroy.is_some())
            .field("remove", &self.remove.is_some())
            .finish()
    }
}

impl<B: Backend> Hooks<B> {
    /// Returns `true` if no hook is set.
    pub fn is_empty(&self) -> bool {
        self.mount.is_none() && self.update.is_none() && self.destroy.is_none() && self.remove.is_none()
    }
}

/// Completion token for a deferred detachment.
///
/// A remove hook receives one of these. Detachment happens when [`Detach::finish`]
/// is called, which consumes the token, so it can happen at most once. The hook
/// may finish immediately or keep the token (for example to run an exit
/// animation) and finish it later, between patch calls.
///
/// By the time a remove hook runs, the reconciler has already forgotten the
/// description: later cycles cannot address the node. Dropping the token without
/// finishing it leaves the node attached for good.
#[must_use = "the node stays attached until `finish` is called"]
pub struct Detach<B: Backend> {
    parent: B::Node,
    node: B::Node,
    finished: bool,
}

impl<B: Backend> Detach<B> {
    pub(crate) fn new(parent: B::Node, node: B::Node) -> Self {
        Self {
            parent,
            node,
            finished: false,
        }
    }

    /// The node waiting to be detached.
    pub fn node(&self) -> B::Node {
        self.node
    }

    /// The container it will be detached from.
    pub fn parent(&self) -> B::Node {
        self.parent
    }

    /// Detach the node from its parent and release it.
    pub fn finish(mut self, backend: &mut B) {
        self.finished = true;
        tracing::trace!(parent = ?self.parent, node = ?self.node, "detach");
        backend.remove_child(self.parent, self.node);
    }
}

impl<B: Backend> Drop for Detach<B> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                parent = ?self.parent,
                node = ?self.node,
                "detach token dropped unfinished; node stays attached"
            );
        }
    }
}

impl<B: Backend> fmt::Debug for Detach<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detach")
            .field("parent", &self.parent)
            .field("node", &self.node)
            .field("finished", &self.finished)
            .finish()
    }
}

/// Fire the mount hook of a freshly built description.
pub(crate) fn mount<B: Backend>(backend: &mut B, element: &Element<B>, node: B::Node) {
    if let Some(hook) = &element.props().hooks.mount {
        hook(backend, node);
    }
}

/// Fire the update hook of a description that kept its identity.
pub(crate) fn update<B: Backend>(old: &Element<B>, new: &Element<B>) {
    if let Some(hook) = &new.props().hooks.update {
        hook(old, new);
    }
}

/// Fire destroy hooks depth-first over a retired subtree.
///
/// Components recurse into their rendered description; primitives into their
/// children.
pub(crate) fn destroy<B: Backend>(backend: &mut B, element: &Element<B>) {
    if let (Some(hook), Some(node)) = (&element.props().hooks.destroy, element.node()) {
        hook(backend, node);
    }
    match element.rendered() {
        Some(rendered) => destroy(backend, rendered),
        None => {
            for child in element.children() {
                destroy(backend, child);
            }
        }
    }
}

/// Retire `element` and detach its node from `parent`.
///
/// Destroy hooks fire for the whole subtree first. Then the governing remove
/// hook gets a [`Detach`] token, or the node is detached right away.
pub(crate) fn remove<B: Backend>(backend: &mut B, parent: B::Node, element: Element<B>) {
    destroy(backend, &element);
    let node = element
        .node()
        .expect("removing a description that was never materialized");
    let detach = Detach::new(parent, node);
    match element.remove_hook().cloned() {
        Some(hook) => {
            tracing::trace!(?parent, ?node, "remove deferred to hook");
            hook(backend, node, detach);
        }
        None => detach.finish(backend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Journal, Recorder};
    use crate::{Element, Props, patch};
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn destroy_is_depth_first_and_precedes_remove() {
        let journal = Journal::new();
        let mut backend = Recorder::new();
        let tree = Element::group(
            "outer",
            journal.hooked("outer"),
            vec![
                Element::group("a", journal.hooked("a"), Element::text("a1", journal.hooked("a1"))),
                Element::text("b", journal.hooked("b")),
            ],
        );
        let tree = patch(&mut backend, Recorder::ROOT, None, Some(tree));
        assert_eq!(journal.take(), ["mount a1", "mount a", "mount b", "mount outer"]);

        patch(&mut backend, Recorder::ROOT, tree, None);
        assert_eq!(
            journal.take(),
            ["destroy outer", "destroy a", "destroy a1", "destroy b", "remove outer"]
        );
        assert_eq!(backend.child_count(Recorder::ROOT), 0);
    }

    #[test]
    fn deferred_detach_keeps_node_until_finished() {
        let pending: Rc<RefCell<Vec<Detach<Recorder>>>> = Rc::default();
        let sink = Rc::clone(&pending);
        let fading = Element::shape(
            "fade",
            Props::<Recorder>::new().on_remove(move |_, _, detach| sink.borrow_mut().push(detach)),
        );
        let mut backend = Recorder::new();
        let tree = patch(&mut backend, Recorder::ROOT, None, Some(fading));
        let node = tree.as_ref().and_then(Element::node).unwrap();

        assert!(patch(&mut backend, Recorder::ROOT, tree, None).is_none());
        assert_eq!(backend.children(Recorder::ROOT), [node]);

        let detach = pending.borrow_mut().pop().unwrap();
        assert_eq!(detach.node(), node);
        assert_eq!(detach.parent(), Recorder::ROOT);
        detach.finish(&mut backend);
        assert_eq!(backend.child_count(Recorder::ROOT), 0);
        assert!(!backend.node(node).alive);
    }

    #[test]
    fn no_remove_hook_detaches_immediately() {
        let mut backend = Recorder::new();
        let tree = patch(
            &mut backend,
            Recorder::ROOT,
            None,
            Some(Element::text("t", Props::new().text("x"))),
        );
        backend.clear_log();
        patch(&mut backend, Recorder::ROOT, tree, None);
        assert_eq!(backend.removals(), 1);
        assert_eq!(backend.child_count(Recorder::ROOT), 0);
    }
}
