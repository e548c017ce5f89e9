// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Description properties: shared geometry, kind-specific fields, hooks, and attributes.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use core::any::Any;
use core::fmt;

use kurbo::{BezPath, Point, Vec2};

use crate::backend::Backend;
use crate::element::Element;
use crate::hooks::{Detach, Hooks};

/// Geometry fields recognized on every kind.
///
/// Only fields that are `Some` are written to the backend. A field that
/// disappears between two cycles keeps its last applied value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geometry {
    /// Position of the pivot in parent space.
    pub position: Option<Point>,
    /// Opacity in `0.0..=1.0`.
    pub opacity: Option<f64>,
    /// Visibility.
    pub visible: Option<bool>,
    /// Rotation in radians.
    pub rotation: Option<f64>,
    /// Local point that rotation and scale pivot around.
    pub pivot: Option<Point>,
    /// Non-uniform scale.
    pub scale: Option<Vec2>,
}

/// An RGB color packed as `0xRRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// Opaque white; the neutral tint.
    pub const WHITE: Self = Self(0xFF_FF_FF);
    /// Opaque black.
    pub const BLACK: Self = Self(0x00_00_00);
}

/// Style of a text node.
///
/// Held behind an `Rc` in [`Props`]; the reconciler re-applies a style only when
/// the `Rc` itself changes, so share one instance across cycles.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font family name.
    pub font_family: Rc<str>,
    /// Font size in logical pixels.
    pub font_size: f64,
    /// Fill color.
    pub fill: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".into(),
            font_size: 16.0,
            fill: Color::BLACK,
        }
    }
}

/// A drawing routine for a shape node.
///
/// The routine appends path elements to the path it is given. Backends call it
/// once per application; the reconciler only re-applies it when a different
/// `Draw` (by pointer) shows up, so keep the same `Draw` alive across cycles
/// for shapes that do not change.
#[derive(Clone)]
pub struct Draw(Rc<dyn Fn(&mut BezPath)>);

impl Draw {
    /// Wrap a drawing routine.
    pub fn new(routine: impl Fn(&mut BezPath) + 'static) -> Self {
        Self(Rc::new(routine))
    }

    /// Run the routine, appending to `path`.
    pub fn paint(&self, path: &mut BezPath) {
        (self.0)(path);
    }

    /// Returns `true` if both handles share one routine.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Draw").field(&Rc::as_ptr(&self.0)).finish()
    }
}

/// A value in the open attribute map, used to feed components.
#[derive(Clone)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string.
    Str(Rc<str>),
    /// Anything else, shared.
    Any(Rc<dyn Any>),
}

impl Value {
    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float, widening integers.
    #[allow(
        clippy::cast_precision_loss,
        reason = "Attribute integers are small UI quantities."
    )]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast an [`Value::Any`] payload.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Any(a) => (**a).downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Any(_) => f.write_str("Any(..)"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl From<Rc<str>> for Value {
    fn from(value: Rc<str>) -> Self {
        Self::Str(value)
    }
}

/// Properties of a description.
///
/// Geometry applies to every kind. The kind-specific fields are read only by
/// the kind they belong to: `draw` by shapes; `text`, `style`, and `anchor` by
/// text; `source`, `tint`, and `anchor` by images. `attrs` is never read by the
/// reconciler; it carries arbitrary inputs to components.
///
/// Built with chained setters:
///
/// ```rust
/// # #[cfg(feature = "scene_adapter")] {
/// use understory_scene::Scene;
/// use understory_vtree::{Color, Props};
///
/// let props: Props<Scene> = Props::new()
///     .position(10.0, 20.0)
///     .opacity(0.5)
///     .tint(Color(0xFF_80_00))
///     .attr("title", "Standup");
/// assert_eq!(props.get("title").and_then(|v| v.as_str()), Some("Standup"));
/// # }
/// ```
pub struct Props<B: Backend> {
    /// Shared geometry.
    pub geometry: Geometry,
    /// Lifecycle hooks.
    pub hooks: Hooks<B>,
    /// Shape drawing routine.
    pub draw: Option<Draw>,
    /// Text content.
    pub text: Option<Rc<str>>,
    /// Text style.
    pub style: Option<Rc<TextStyle>>,
    /// Text or image anchor.
    pub anchor: Option<Point>,
    /// Image source.
    pub source: Option<Rc<str>>,
    /// Image tint.
    pub tint: Option<Color>,
    /// Open attribute map for components.
    pub attrs: BTreeMap<Rc<str>, Value>,
}

impl<B: Backend> Default for Props<B> {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            hooks: Hooks::default(),
            draw: None,
            text: None,
            style: None,
            anchor: None,
            source: None,
            tint: None,
            attrs: BTreeMap::new(),
        }
    }
}

impl<B: Backend> Clone for Props<B> {
    fn clone(&self) -> Self {
        Self {
            geometry: self.geometry,
            hooks: self.hooks.clone(),
            draw: self.draw.clone(),
            text: self.text.clone(),
            style: self.style.clone(),
            anchor: self.anchor,
            source: self.source.clone(),
            tint: self.tint,
            attrs: self.attrs.clone(),
        }
    }
}

impl<B: Backend> fmt::Debug for Props<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Props")
            .field("geometry", &self.geometry)
            .field("hooks", &self.hooks)
            .field("draw", &self.draw)
            .field("text", &self.text)
            .field("style", &self.style)
            .field("anchor", &self.anchor)
            .field("source", &self.source)
            .field("tint", &self.tint)
            .field("attrs", &self.attrs)
            .finish()
    }
}

impl<B: Backend> Props<B> {
    /// Empty properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position.
    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.geometry.position = Some(Point::new(x, y));
        self
    }

    /// Set the opacity.
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.geometry.opacity = Some(opacity);
        self
    }

    /// Set the visibility.
    pub fn visible(mut self, visible: bool) -> Self {
        self.geometry.visible = Some(visible);
        self
    }

    /// Set the rotation in radians.
    pub fn rotation(mut self, radians: f64) -> Self {
        self.geometry.rotation = Some(radians);
        self
    }

    /// Set the pivot.
    pub fn pivot(mut self, x: f64, y: f64) -> Self {
        self.geometry.pivot = Some(Point::new(x, y));
        self
    }

    /// Set the scale.
    pub fn scale(mut self, x: f64, y: f64) -> Self {
        self.geometry.scale = Some(Vec2::new(x, y));
        self
    }

    /// Set the shape drawing routine.
    pub fn draw(mut self, draw: Draw) -> Self {
        self.draw = Some(draw);
        self
    }

    /// Set the text content.
    pub fn text(mut self, text: impl Into<Rc<str>>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the text style.
    pub fn style(mut self, style: Rc<TextStyle>) -> Self {
        self.style = Some(style);
        self
    }

    /// Set the text or image anchor.
    pub fn anchor(mut self, x: f64, y: f64) -> Self {
        self.anchor = Some(Point::new(x, y));
        self
    }

    /// Set the image source.
    pub fn source(mut self, source: impl Into<Rc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the image tint.
    pub fn tint(mut self, tint: Color) -> Self {
        self.tint = Some(tint);
        self
    }

    /// Replace all hooks.
    pub fn hooks(mut self, hooks: Hooks<B>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Set the mount hook.
    pub fn on_mount(mut self, hook: impl Fn(&mut B, B::Node) + 'static) -> Self {
        self.hooks.mount = Some(Rc::new(hook));
        self
    }

    /// Set the update hook.
    pub fn on_update(mut self, hook: impl Fn(&Element<B>, &Element<B>) + 'static) -> Self {
        self.hooks.update = Some(Rc::new(hook));
        self
    }

    /// Set the destroy hook.
    pub fn on_destroy(mut self, hook: impl Fn(&mut B, B::Node) + 'static) -> Self {
        self.hooks.destroy = Some(Rc::new(hook));
        self
    }

    /// Set the remove hook.
    pub fn on_remove(mut self, hook: impl Fn(&mut B, B::Node, Detach<B>) + 'static) -> Self {
        self.hooks.remove = Some(Rc::new(hook));
        self
    }

    /// Set an attribute.
    pub fn attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }
}
