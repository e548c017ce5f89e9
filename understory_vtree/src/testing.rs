// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A backend that records every call, for tests.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::{BezPath, Point, Vec2};

use crate::backend::Backend;
use crate::element::Primitive;
use crate::props::{Color, Draw, TextStyle};

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Create(usize, Primitive),
    AddChild(usize, usize),
    AddChildAt(usize, usize, usize),
    RemoveChild(usize, usize),
    Set(usize, &'static str),
    Draw(usize),
    Text(usize, String),
    Style(usize),
}

#[derive(Debug)]
pub(crate) struct RecNode {
    pub(crate) primitive: Primitive,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    pub(crate) alive: bool,
    pub(crate) position: Point,
    pub(crate) opacity: f64,
    pub(crate) visible: bool,
    pub(crate) text: String,
    pub(crate) path: BezPath,
}

/// Flat list of nodes; handles are indices and are never reused.
#[derive(Debug)]
pub(crate) struct Recorder {
    pub(crate) nodes: Vec<RecNode>,
    pub(crate) log: Vec<Op>,
    index_queries: Cell<usize>,
}

impl Recorder {
    /// A recorder holding a single root group (handle `0`), not logged.
    pub(crate) fn new() -> Self {
        let mut this = Self {
            nodes: Vec::new(),
            log: Vec::new(),
            index_queries: Cell::new(0),
        };
        this.alloc(Primitive::Group);
        this
    }

    pub(crate) const ROOT: usize = 0;

    fn alloc(&mut self, primitive: Primitive) -> usize {
        self.nodes.push(RecNode {
            primitive,
            parent: None,
            children: Vec::new(),
            alive: true,
            position: Point::ZERO,
            opacity: 1.0,
            visible: primitive != Primitive::Placeholder,
            text: String::new(),
            path: BezPath::new(),
        });
        self.nodes.len() - 1
    }

    pub(crate) fn node(&self, id: usize) -> &RecNode {
        &self.nodes[id]
    }

    pub(crate) fn children(&self, parent: usize) -> Vec<usize> {
        self.nodes[parent].children.clone()
    }

    /// Text of every text child of `parent`, in order.
    pub(crate) fn texts(&self, parent: usize) -> Vec<String> {
        self.nodes[parent]
            .children
            .iter()
            .map(|&c| self.nodes[c].text.clone())
            .collect()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.log.iter().filter(|op| pred(op)).count()
    }

    pub(crate) fn creates(&self) -> usize {
        self.count(|op| matches!(op, Op::Create(..)))
    }

    pub(crate) fn removals(&self) -> usize {
        self.count(|op| matches!(op, Op::RemoveChild(..)))
    }

    pub(crate) fn moves(&self) -> usize {
        self.count(|op| matches!(op, Op::AddChildAt(..)))
    }

    /// `child_index` calls since the last [`Recorder::clear_log`].
    pub(crate) fn index_queries(&self) -> usize {
        self.index_queries.get()
    }

    pub(crate) fn clear_log(&mut self) {
        self.log.clear();
        self.index_queries.set(0);
    }

    fn detach(&mut self, child: usize) {
        if let Some(parent) = self.nodes[child].parent.take() {
            self.nodes[parent].children.retain(|&c| c != child);
        }
    }

    fn release(&mut self, node: usize) {
        self.nodes[node].alive = false;
        let children = core::mem::take(&mut self.nodes[node].children);
        for child in children {
            self.release(child);
        }
    }
}

impl Backend for Recorder {
    type Node = usize;

    fn create(&mut self, primitive: Primitive) -> usize {
        let id = self.alloc(primitive);
        self.log.push(Op::Create(id, primitive));
        id
    }

    fn add_child(&mut self, parent: usize, child: usize) {
        self.log.push(Op::AddChild(parent, child));
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    fn add_child_at(&mut self, parent: usize, child: usize, index: usize) {
        self.log.push(Op::AddChildAt(parent, child, index));
        self.detach(child);
        let index = index.min(self.nodes[parent].children.len());
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.insert(index, child);
    }

    fn child_index(&self, parent: usize, child: usize) -> Option<usize> {
        self.index_queries.set(self.index_queries.get() + 1);
        self.nodes[parent].children.iter().position(|&c| c == child)
    }

    fn remove_child(&mut self, parent: usize, child: usize) {
        self.log.push(Op::RemoveChild(parent, child));
        if !self.nodes[parent].alive || self.nodes[child].parent != Some(parent) {
            return;
        }
        self.detach(child);
        self.release(child);
    }

    fn child_count(&self, parent: usize) -> usize {
        self.nodes[parent].children.len()
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.nodes[node].parent
    }

    fn set_position(&mut self, node: usize, position: Point) {
        self.log.push(Op::Set(node, "position"));
        self.nodes[node].position = position;
    }

    fn set_opacity(&mut self, node: usize, opacity: f64) {
        self.log.push(Op::Set(node, "opacity"));
        self.nodes[node].opacity = opacity;
    }

    fn set_visible(&mut self, node: usize, visible: bool) {
        self.log.push(Op::Set(node, "visible"));
        self.nodes[node].visible = visible;
    }

    fn set_rotation(&mut self, node: usize, _rotation: f64) {
        self.log.push(Op::Set(node, "rotation"));
    }

    fn set_pivot(&mut self, node: usize, _pivot: Point) {
        self.log.push(Op::Set(node, "pivot"));
    }

    fn set_scale(&mut self, node: usize, _scale: Vec2) {
        self.log.push(Op::Set(node, "scale"));
    }

    fn draw(&mut self, node: usize, draw: Option<&Draw>) {
        self.log.push(Op::Draw(node));
        let mut path = BezPath::new();
        if let Some(draw) = draw {
            draw.paint(&mut path);
        }
        self.nodes[node].path = path;
    }

    fn set_text(&mut self, node: usize, text: &str) {
        self.log.push(Op::Text(node, text.to_string()));
        self.nodes[node].text = text.to_string();
    }

    fn set_text_style(&mut self, node: usize, _style: &TextStyle) {
        self.log.push(Op::Style(node));
    }

    fn set_anchor(&mut self, node: usize, _anchor: Point) {
        self.log.push(Op::Set(node, "anchor"));
    }

    fn set_image_source(&mut self, node: usize, _source: &str) {
        self.log.push(Op::Set(node, "source"));
    }

    fn set_tint(&mut self, node: usize, _tint: Color) {
        self.log.push(Op::Set(node, "tint"));
    }
}

/// Shared list of hook firings, as `"<hook> <label>"` lines.
#[derive(Clone, Debug, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, line: String) {
        self.0.borrow_mut().push(line);
    }

    pub(crate) fn take(&self) -> Vec<String> {
        core::mem::take(&mut *self.0.borrow_mut())
    }

    /// Props with all four hooks logging to this journal under `label`.
    pub(crate) fn hooked(&self, label: &str) -> crate::Props<Recorder> {
        let (m, u, d, r) = (self.clone(), self.clone(), self.clone(), self.clone());
        let (lm, lu, ld, lr) = (
            label.to_string(),
            label.to_string(),
            label.to_string(),
            label.to_string(),
        );
        crate::Props::<Recorder>::new()
            .on_mount(move |_, _| m.push(alloc::format!("mount {lm}")))
            .on_update(move |_, _| u.push(alloc::format!("update {lu}")))
            .on_destroy(move |_, _| d.push(alloc::format!("destroy {ld}")))
            .on_remove(move |backend, _, detach| {
                r.push(alloc::format!("remove {lr}"));
                detach.finish(backend);
            })
    }
}
