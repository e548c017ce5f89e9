// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Descriptions: kinds, components, and the tree builder.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::backend::Backend;
use crate::hooks::RemoveHook;
use crate::key::{Identity, Key, KindId};
use crate::props::Props;

/// The closed set of primitive node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// A container; the only kind whose children are reconciled.
    Group,
    /// A vector shape produced by a drawing routine.
    Shape,
    /// A run of text.
    Text,
    /// An image.
    Image,
    /// An invisible, empty node standing in for an absent slot.
    Placeholder,
}

/// Stable identity token of a [`Component`].
///
/// Assigned once when the component is constructed; clones share it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type RenderFn<B> = dyn Fn(&Props<B>, &[Element<B>]) -> Option<Element<B>>;

/// A function from `(props, children)` to a description, with a stable identity.
///
/// Two descriptions built from clones of one `Component` have the same kind;
/// two components built from the very same closure by separate calls to
/// [`Component::new`] do not.
pub struct Component<B: Backend> {
    id: ComponentId,
    name: &'static str,
    render: Rc<RenderFn<B>>,
}

impl<B: Backend> Component<B> {
    /// Register a component. `name` is used for logging only.
    pub fn new(
        name: &'static str,
        render: impl Fn(&Props<B>, &[Element<B>]) -> Option<Element<B>> + 'static,
    ) -> Self {
        Self {
            id: ComponentId::next(),
            name,
            render: Rc::new(render),
        }
    }

    /// The identity token.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The name given at registration.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the component function.
    pub fn render(&self, props: &Props<B>, children: &[Element<B>]) -> Option<Element<B>> {
        (self.render)(props, children)
    }
}

impl<B: Backend> Clone for Component<B> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name,
            render: Rc::clone(&self.render),
        }
    }
}

impl<B: Backend> fmt::Debug for Component<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The kind of a description.
pub enum Kind<B: Backend> {
    /// A primitive node.
    Primitive(Primitive),
    /// A component, expanded one level on every cycle.
    Component(Component<B>),
}

impl<B: Backend> Kind<B> {
    /// The kind half of an [`Identity`].
    pub fn id(&self) -> KindId {
        match self {
            Self::Primitive(p) => KindId::Primitive(*p),
            Self::Component(c) => KindId::Component(c.id),
        }
    }
}

impl<B: Backend> Clone for Kind<B> {
    fn clone(&self) -> Self {
        match self {
            Self::Primitive(p) => Self::Primitive(*p),
            Self::Component(c) => Self::Component(c.clone()),
        }
    }
}

impl<B: Backend> fmt::Debug for Kind<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => fmt::Debug::fmt(p, f),
            Self::Component(c) => write!(f, "Component({})", c.name),
        }
    }
}

impl<B: Backend> From<Primitive> for Kind<B> {
    fn from(value: Primitive) -> Self {
        Self::Primitive(value)
    }
}

impl<B: Backend> From<Component<B>> for Kind<B> {
    fn from(value: Component<B>) -> Self {
        Self::Component(value)
    }
}

impl<B: Backend> From<&Component<B>> for Kind<B> {
    fn from(value: &Component<B>) -> Self {
        Self::Component(value.clone())
    }
}

/// Ordered children handed to the builder.
///
/// `None` entries mark conditionally absent slots. The builder turns each one
/// into a placeholder description keyed by its slot index, so the slot keeps a
/// stable (invisible) backing node across cycles.
pub struct Children<B: Backend>(Vec<Option<Element<B>>>);

impl<B: Backend> Default for Children<B> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<B: Backend> fmt::Debug for Children<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.0).finish()
    }
}

impl<B: Backend> From<Element<B>> for Children<B> {
    fn from(value: Element<B>) -> Self {
        Self(alloc::vec![Some(value)])
    }
}

impl<B: Backend> From<Option<Element<B>>> for Children<B> {
    fn from(value: Option<Element<B>>) -> Self {
        Self(alloc::vec![value])
    }
}

impl<B: Backend> From<Vec<Element<B>>> for Children<B> {
    fn from(value: Vec<Element<B>>) -> Self {
        Self(value.into_iter().map(Some).collect())
    }
}

impl<B: Backend> From<Vec<Option<Element<B>>>> for Children<B> {
    fn from(value: Vec<Option<Element<B>>>) -> Self {
        Self(value)
    }
}

impl<B: Backend> FromIterator<Element<B>> for Children<B> {
    fn from_iter<I: IntoIterator<Item = Element<B>>>(iter: I) -> Self {
        Self(iter.into_iter().map(Some).collect())
    }
}

impl<B: Backend> FromIterator<Option<Element<B>>> for Children<B> {
    fn from_iter<I: IntoIterator<Item = Option<Element<B>>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<B: Backend> Children<B> {
    fn normalize(self) -> Vec<Element<B>> {
        self.0
            .into_iter()
            .enumerate()
            .map(|(slot, child)| {
                child.unwrap_or_else(|| {
                    Element::placeholder(Key::Int(i64::try_from(slot).unwrap_or(i64::MAX)))
                })
            })
            .collect()
    }
}

/// A description of one desired node: kind, key, props, and ordered children.
///
/// Descriptions are rebuilt from scratch every cycle. Once the reconciler has
/// materialized one, it records the backing node ([`Element::node`]) and, for
/// components, the one-level expansion ([`Element::rendered`]).
pub struct Element<B: Backend> {
    kind: Kind<B>,
    key: Key,
    props: Props<B>,
    children: Vec<Element<B>>,
    pub(crate) node: Option<B::Node>,
    pub(crate) rendered: Option<Box<Element<B>>>,
}

/// Build a description from a kind, a key, props, and children.
///
/// Children may be a single description, a `Vec` of descriptions, or a `Vec`
/// of optional descriptions; pass `()` for none.
///
/// ```rust
/// # #[cfg(feature = "scene_adapter")] {
/// use understory_scene::Scene;
/// use understory_vtree::{Element, Primitive, Props, h};
///
/// let tree: Element<Scene> = h(
///     Primitive::Group,
///     "root",
///     Props::new(),
///     vec![
///         Some(Element::text("title", Props::new().text("Week 42"))),
///         None,
///     ],
/// );
/// assert_eq!(tree.children().len(), 2);
/// assert!(tree.node().is_none());
/// # }
/// ```
pub fn h<B: Backend>(
    kind: impl Into<Kind<B>>,
    key: impl Into<Key>,
    props: Props<B>,
    children: impl IntoChildren<B>,
) -> Element<B> {
    Element::new(kind, key, props).with_children(children)
}

/// Anything [`h`] accepts as children.
pub trait IntoChildren<B: Backend> {
    /// Convert into an ordered child list.
    fn into_children(self) -> Children<B>;
}

impl<B: Backend, T: Into<Children<B>>> IntoChildren<B> for T {
    fn into_children(self) -> Children<B> {
        self.into()
    }
}

impl<B: Backend> From<()> for Children<B> {
    fn from((): ()) -> Self {
        Self::default()
    }
}

impl<B: Backend> Element<B> {
    /// A description with no children.
    pub fn new(kind: impl Into<Kind<B>>, key: impl Into<Key>, props: Props<B>) -> Self {
        Self {
            kind: kind.into(),
            key: key.into(),
            props,
            children: Vec::new(),
            node: None,
            rendered: None,
        }
    }

    /// Replace the children.
    pub fn with_children(mut self, children: impl IntoChildren<B>) -> Self {
        self.children = children.into_children().normalize();
        self
    }

    /// A group description.
    pub fn group(key: impl Into<Key>, props: Props<B>, children: impl IntoChildren<B>) -> Self {
        Self::new(Primitive::Group, key, props).with_children(children)
    }

    /// A shape description.
    pub fn shape(key: impl Into<Key>, props: Props<B>) -> Self {
        Self::new(Primitive::Shape, key, props)
    }

    /// A text description.
    pub fn text(key: impl Into<Key>, props: Props<B>) -> Self {
        Self::new(Primitive::Text, key, props)
    }

    /// An image description.
    pub fn image(key: impl Into<Key>, props: Props<B>) -> Self {
        Self::new(Primitive::Image, key, props)
    }

    /// A placeholder description.
    pub fn placeholder(key: impl Into<Key>) -> Self {
        Self::new(Primitive::Placeholder, key, Props::default())
    }

    /// A component call site.
    pub fn component(
        component: &Component<B>,
        key: impl Into<Key>,
        props: Props<B>,
        children: impl IntoChildren<B>,
    ) -> Self {
        Self::new(component, key, props).with_children(children)
    }

    /// The kind.
    pub fn kind(&self) -> &Kind<B> {
        &self.kind
    }

    /// The key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The props.
    pub fn props(&self) -> &Props<B> {
        &self.props
    }

    /// The children, with absent slots already turned into placeholders.
    pub fn children(&self) -> &[Element<B>] {
        &self.children
    }

    /// The backing node, once materialized.
    pub fn node(&self) -> Option<B::Node> {
        self.node
    }

    /// The one-level expansion of a component description, once materialized.
    pub fn rendered(&self) -> Option<&Self> {
        self.rendered.as_deref()
    }

    /// Kind and key.
    pub fn identity(&self) -> Identity {
        Identity {
            kind: self.kind.id(),
            key: self.key.clone(),
        }
    }

    /// Returns `true` if both descriptions denote the same logical node.
    pub fn is_same(&self, other: &Self) -> bool {
        self.key == other.key && self.kind.id() == other.kind.id()
    }

    pub(crate) fn primitive(&self) -> Option<Primitive> {
        match self.kind {
            Kind::Primitive(p) => Some(p),
            Kind::Component(_) => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }

    pub(crate) fn take_children(&mut self) -> Vec<Self> {
        core::mem::take(&mut self.children)
    }

    /// The remove hook governing detachment: this description's own, or for a
    /// component without one, the one of its rendered description.
    pub(crate) fn remove_hook(&self) -> Option<&RemoveHook<B>> {
        self.props
            .hooks
            .remove
            .as_ref()
            .or_else(|| self.rendered.as_deref().and_then(Self::remove_hook))
    }
}

/// Cloning copies the description only: the clone has no backing node and no
/// rendered description, so it can be materialized independently.
impl<B: Backend> Clone for Element<B> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            key: self.key.clone(),
            props: self.props.clone(),
            children: self.children.clone(),
            node: None,
            rendered: None,
        }
    }
}

impl<B: Backend> fmt::Debug for Element<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("node", &self.node)
            .field("children", &self.children)
            .field("rendered", &self.rendered)
            .finish_non_exhaustive()
    }
}
