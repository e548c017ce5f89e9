// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount points and the dispatch loop.

use alloc::boxed::Box;
use core::fmt;

use crate::backend::Backend;
use crate::element::Element;
use crate::patch::patch;

/// A container node and the description last rendered into it.
///
/// Wraps [`patch`] so the returned description is always the one passed back
/// on the next cycle.
pub struct Root<B: Backend> {
    container: B::Node,
    current: Option<Element<B>>,
}

impl<B: Backend> fmt::Debug for Root<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("container", &self.container)
            .field("current", &self.current)
            .finish()
    }
}

impl<B: Backend> Root<B> {
    /// A mount point rendering into `container`. Nothing is rendered yet.
    pub fn new(container: B::Node) -> Self {
        Self {
            container,
            current: None,
        }
    }

    /// The container node.
    pub fn container(&self) -> B::Node {
        self.container
    }

    /// The description currently materialized under the container.
    pub fn current(&self) -> Option<&Element<B>> {
        self.current.as_ref()
    }

    /// Reconcile the container towards `next`.
    pub fn render(&mut self, backend: &mut B, next: Option<Element<B>>) {
        let previous = self.current.take();
        tracing::debug!(
            container = ?self.container,
            had_tree = previous.is_some(),
            has_tree = next.is_some(),
            "render"
        );
        self.current = patch(backend, self.container, previous, next);
    }

    /// Tear down whatever is rendered.
    pub fn unmount(&mut self, backend: &mut B) {
        self.render(backend, None);
    }
}

type ViewFn<S, B> = dyn Fn(&S) -> Option<Element<B>>;

/// A unidirectional loop: state, a view function, and a [`Root`].
///
/// Every [`App::dispatch`] mutates the state, re-runs the view, and patches the
/// result against the previous tree.
///
/// ```rust
/// # #[cfg(feature = "scene_adapter")] {
/// use understory_scene::Scene;
/// use understory_vtree::{App, Element, Props};
///
/// let mut scene = Scene::new();
/// let container = scene.insert(None, Default::default());
/// let mut app: App<u32, Scene> = App::new(container, 0, |count: &u32| {
///     Some(Element::group(
///         "counter",
///         Props::new(),
///         (0..*count)
///             .map(|i| Element::text(i, Props::new().text("tick")))
///             .collect::<Vec<_>>(),
///     ))
/// });
/// app.mount(&mut scene);
/// app.dispatch(&mut scene, |count| *count += 3);
/// let list = app.root().current().and_then(Element::node).unwrap();
/// assert_eq!(scene.child_count(list), 3);
/// # }
/// ```
pub struct App<S, B: Backend> {
    state: S,
    view: Box<ViewFn<S, B>>,
    root: Root<B>,
}

impl<S: fmt::Debug, B: Backend> fmt::Debug for App<S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<S, B: Backend> App<S, B> {
    /// An app rendering `view(state)` into `container`. Call [`App::mount`] to
    /// build the first tree.
    pub fn new(
        container: B::Node,
        state: S,
        view: impl Fn(&S) -> Option<Element<B>> + 'static,
    ) -> Self {
        Self {
            state,
            view: Box::new(view),
            root: Root::new(container),
        }
    }

    /// The current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// The mount point.
    pub fn root(&self) -> &Root<B> {
        &self.root
    }

    /// Render the current state.
    pub fn mount(&mut self, backend: &mut B) {
        let next = (self.view)(&self.state);
        self.root.render(backend, next);
    }

    /// Apply `action` to the state and re-render.
    pub fn dispatch(&mut self, backend: &mut B, action: impl FnOnce(&mut S)) {
        action(&mut self.state);
        self.mount(backend);
    }

    /// Tear the tree down, keeping the state.
    pub fn unmount(&mut self, backend: &mut B) {
        self.root.unmount(backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Props;
    use crate::testing::Recorder;
    use alloc::vec::Vec;

    #[test]
    fn root_retains_previous_tree() {
        let mut backend = Recorder::new();
        let mut root = Root::<Recorder>::new(Recorder::ROOT);
        assert!(root.current().is_none());

        root.render(&mut backend, Some(Element::text("t", Props::new().text("a"))));
        let node = root.current().and_then(Element::node);
        root.render(&mut backend, Some(Element::text("t", Props::new().text("b"))));
        assert_eq!(root.current().and_then(Element::node), node);
        assert_eq!(backend.texts(Recorder::ROOT), ["b"]);

        root.unmount(&mut backend);
        assert!(root.current().is_none());
        assert_eq!(backend.child_count(root.container()), 0);
    }

    #[test]
    fn dispatch_rerenders_from_state() {
        let mut backend = Recorder::new();
        let mut app = App::<_, Recorder>::new(Recorder::ROOT, Vec::<&'static str>::new(), |items| {
            Some(Element::group(
                "list",
                Props::new(),
                items
                    .iter()
                    .map(|&item| Element::text(item, Props::new().text(item)))
                    .collect::<Vec<_>>(),
            ))
        });
        app.mount(&mut backend);
        app.dispatch(&mut backend, |items| items.extend(["b", "c"]));
        app.dispatch(&mut backend, |items| items.insert(0, "a"));
        let list = app.root().current().and_then(Element::node).unwrap();
        assert_eq!(backend.texts(list), ["a", "b", "c"]);
        assert_eq!(app.state().len(), 3);

        app.unmount(&mut backend);
        assert_eq!(backend.child_count(Recorder::ROOT), 0);
        assert_eq!(app.state().len(), 3);
    }
}
