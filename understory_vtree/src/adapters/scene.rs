// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Backend`] for Understory Scene.
//!
//! ## Feature
//!
//! Enable with `scene_adapter`.
//!
//! ## Notes
//!
//! Descriptions map onto scene content one to one: groups, shapes, text,
//! images, and placeholders. Drawing routines record into a fresh
//! [`BezPath`] that replaces the shape's path. Detaching a node frees its
//! subtree, so the ids of a removed description go stale at once; a
//! [`Detach`](crate::Detach) finished after its container was freed does
//! nothing.

use alloc::string::ToString;

use kurbo::{BezPath, Point, Vec2};
use understory_scene::{Content, ImageContent, NodeId, Scene, TextContent};

use crate::backend::Backend;
use crate::element::Primitive;
use crate::props::{Color, Draw, TextStyle};

impl Backend for Scene {
    type Node = NodeId;

    fn create(&mut self, primitive: Primitive) -> NodeId {
        let content = match primitive {
            Primitive::Group => Content::Group,
            Primitive::Shape => Content::Shape(BezPath::new()),
            Primitive::Text => Content::Text(TextContent::default()),
            Primitive::Image => Content::Image(ImageContent::default()),
            Primitive::Placeholder => Content::Placeholder,
        };
        self.insert(None, content)
    }

    fn add_child(&mut self, parent: NodeId, child: NodeId) {
        Self::add_child(self, parent, child);
    }

    fn add_child_at(&mut self, parent: NodeId, child: NodeId, index: usize) {
        Self::add_child_at(self, parent, child, index);
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        Self::child_index(self, parent, child)
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        Self::remove_child(self, parent, child);
    }

    fn child_count(&self, parent: NodeId) -> usize {
        Self::child_count(self, parent)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }

    fn set_position(&mut self, node: NodeId, position: Point) {
        Self::set_position(self, node, position);
    }

    fn set_opacity(&mut self, node: NodeId, opacity: f64) {
        Self::set_opacity(self, node, opacity);
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        Self::set_visible(self, node, visible);
    }

    fn set_rotation(&mut self, node: NodeId, rotation: f64) {
        Self::set_rotation(self, node, rotation);
    }

    fn set_pivot(&mut self, node: NodeId, pivot: Point) {
        Self::set_pivot(self, node, pivot);
    }

    fn set_scale(&mut self, node: NodeId, scale: Vec2) {
        Self::set_scale(self, node, scale);
    }

    fn draw(&mut self, node: NodeId, draw: Option<&Draw>) {
        let mut path = BezPath::new();
        if let Some(draw) = draw {
            draw.paint(&mut path);
        }
        self.set_path(node, path);
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        Self::set_text(self, node, text);
    }

    fn set_text_style(&mut self, node: NodeId, style: &TextStyle) {
        Self::set_text_style(
            self,
            node,
            understory_scene::TextStyle {
                font_family: style.font_family.to_string(),
                font_size: style.font_size,
                fill: style.fill.0,
            },
        );
    }

    fn set_anchor(&mut self, node: NodeId, anchor: Point) {
        Self::set_anchor(self, node, anchor);
    }

    fn set_image_source(&mut self, node: NodeId, source: &str) {
        Self::set_image_source(self, node, source);
    }

    fn set_tint(&mut self, node: NodeId, tint: Color) {
        Self::set_tint(self, node, tint.0);
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::{Point, Rect, Shape as _};
    use understory_scene::{Content, NodeId, Scene};

    use crate::{Detach, Draw, Element, Props, Root, TextStyle};

    fn day_column(events: &[(&str, f64)]) -> Element<Scene> {
        Element::group(
            "column",
            Props::new().position(100.0, 0.0),
            events
                .iter()
                .map(|&(title, top)| {
                    Element::text(title, Props::new().text(title).position(0.0, top))
                })
                .collect::<Vec<_>>(),
        )
    }

    fn titles(scene: &Scene, list: NodeId) -> Vec<&str> {
        scene
            .children_of(list)
            .iter()
            .filter_map(|&c| match scene.content(c) {
                Some(Content::Text(t)) => Some(t.text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn reorder_keeps_scene_ids() {
        let mut scene = Scene::new();
        let container = scene.insert(None, Content::Group);
        let mut root = Root::<Scene>::new(container);

        root.render(&mut scene, Some(day_column(&[("a", 0.0), ("b", 20.0), ("c", 40.0)])));
        let column = root.current().and_then(Element::node).unwrap();
        let before = scene.children_of(column).to_vec();

        root.render(&mut scene, Some(day_column(&[("c", 0.0), ("a", 20.0), ("b", 40.0)])));
        assert_eq!(titles(&scene, column), ["c", "a", "b"]);
        assert_eq!(scene.children_of(column), &[before[2], before[0], before[1]]);
        assert!(before.iter().all(|&id| scene.is_alive(id)));

        let damage = scene.commit();
        assert!(damage.recomputed > 0);
        let c = before[2];
        assert_eq!(
            scene.world_transform(c).unwrap().translation(),
            kurbo::Vec2::new(100.0, 0.0)
        );
    }

    #[test]
    fn removal_frees_scene_nodes() {
        let mut scene = Scene::new();
        let container = scene.insert(None, Content::Group);
        let mut root = Root::<Scene>::new(container);
        root.render(&mut scene, Some(day_column(&[("a", 0.0), ("b", 20.0)])));
        let column = root.current().and_then(Element::node).unwrap();
        let b = scene.children_of(column)[1];

        root.render(&mut scene, Some(day_column(&[("a", 0.0)])));
        assert!(!scene.is_alive(b));

        root.unmount(&mut scene);
        assert!(!scene.is_alive(column));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn shapes_record_their_path() {
        let mut scene = Scene::new();
        let container = scene.insert(None, Content::Group);
        let block = Draw::new(|path| {
            path.extend(Rect::new(0.0, 0.0, 80.0, 30.0).path_elements(0.1));
        });
        let tree = crate::patch(
            &mut scene,
            container,
            None,
            Some(Element::shape("block", Props::new().draw(block).position(10.0, 10.0))),
        );
        let node = tree.as_ref().and_then(Element::node).unwrap();
        match scene.content(node) {
            Some(Content::Shape(path)) => {
                assert_eq!(path.bounding_box(), Rect::new(0.0, 0.0, 80.0, 30.0));
            }
            other => panic!("expected a shape, got {other:?}"),
        }
        scene.commit();
        assert_eq!(
            scene.world_bounds(node),
            Some(Rect::new(10.0, 10.0, 90.0, 40.0))
        );
    }

    #[test]
    fn text_style_and_image_fields_reach_the_scene() {
        let mut scene = Scene::new();
        let container = scene.insert(None, Content::Group);
        let style = Rc::new(TextStyle {
            font_family: "serif".into(),
            font_size: 12.0,
            fill: crate::Color(0x33_66_99),
        });
        let tree = Element::group(
            "card",
            Props::new(),
            vec![
                Element::text(
                    "title",
                    Props::new().text("Standup").style(style).anchor(0.5, 0.0),
                ),
                Element::image(
                    "avatar",
                    Props::new().source("alice.png").tint(crate::Color(0xFF_00_00)),
                ),
            ],
        );
        let tree = crate::patch(&mut scene, container, None, Some(tree));
        let card = tree.as_ref().and_then(Element::node).unwrap();
        let kids = scene.children_of(card).to_vec();
        match scene.content(kids[0]) {
            Some(Content::Text(t)) => {
                assert_eq!(t.text, "Standup");
                assert_eq!(t.style.font_family, "serif");
                assert_eq!(t.style.fill, 0x33_66_99);
                assert_eq!(t.anchor, Point::new(0.5, 0.0));
            }
            other => panic!("expected text, got {other:?}"),
        }
        match scene.content(kids[1]) {
            Some(Content::Image(i)) => {
                assert_eq!(i.source, "alice.png");
                assert_eq!(i.tint, 0xFF_00_00);
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn absent_child_is_a_hidden_placeholder() {
        let mut scene = Scene::new();
        let container = scene.insert(None, Content::Group);
        let tree = Element::group(
            "row",
            Props::new(),
            vec![None, Some(Element::text("t", Props::new().text("x")))],
        );
        let tree = crate::patch(&mut scene, container, None, Some(tree));
        let row = tree.as_ref().and_then(Element::node).unwrap();
        let slot = scene.children_of(row)[0];
        assert!(matches!(scene.content(slot), Some(Content::Placeholder)));
        scene.commit();
        assert_eq!(scene.world_visible(slot), Some(false));
        assert!(scene.dump(row).lines().nth(1).unwrap().starts_with("  placeholder#"));
    }

    #[test]
    fn fade_out_finishes_after_parent_is_gone() {
        let pending: Rc<RefCell<Vec<Detach<Scene>>>> = Rc::default();
        let sink = Rc::clone(&pending);
        let fading = move |key: &str| {
            let sink = Rc::clone(&sink);
            Element::text(
                key,
                Props::<Scene>::new()
                    .text(key)
                    .on_remove(move |scene, node, detach| {
                        Scene::set_opacity(scene, node, 0.0);
                        sink.borrow_mut().push(detach);
                    }),
            )
        };

        let mut scene = Scene::new();
        let container = scene.insert(None, Content::Group);
        let tree = crate::patch(
            &mut scene,
            container,
            None,
            Some(Element::group("list", Props::new(), vec![fading("a"), fading("b")])),
        );
        let list = tree.as_ref().and_then(Element::node).unwrap();
        let tree = crate::patch(
            &mut scene,
            container,
            tree,
            Some(Element::group("list", Props::new(), vec![fading("a")])),
        );
        assert_eq!(titles(&scene, list), ["a", "b"]);
        let fading_b = scene.children_of(list)[1];
        assert_eq!(scene.local(fading_b).unwrap().opacity, 0.0);

        crate::patch(&mut scene, container, tree, None);
        assert!(!scene.is_alive(list));

        for detach in pending.borrow_mut().drain(..) {
            detach.finish(&mut scene);
        }
        assert_eq!(scene.len(), 1);
    }
}
