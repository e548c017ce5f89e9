// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared pieces for the Understory VTree demos: a small calendar week model,
//! its view, and logging setup.
//!
//! Run:
//! - `cargo run -p understory_demos --example week_view`
//! - `RUST_LOG=understory_vtree=trace cargo run -p understory_demos --example week_view`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Rect, RoundedRect, Shape as _};
use tracing_subscriber::EnvFilter;
use understory_scene::Scene;
use understory_vtree::{Color, Component, Detach, Draw, Element, Props, TextStyle};

/// Width of one day column, in logical pixels.
pub const COLUMN_WIDTH: f64 = 120.0;
/// Height of the day header row.
pub const HEADER_HEIGHT: f64 = 24.0;
/// Vertical pixels per minute of the day.
pub const PX_PER_MINUTE: f64 = 0.8;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls do nothing.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// One calendar entry.
#[derive(Clone, Debug)]
pub struct CalendarEvent {
    /// Stable id; used as the reconciliation key of its card.
    pub id: u32,
    /// Title shown on the card.
    pub title: String,
    /// Day of the week, `0` is Monday.
    pub day: usize,
    /// Start, in minutes after midnight.
    pub start: u32,
    /// End, in minutes after midnight.
    pub end: u32,
    block: Draw,
}

impl CalendarEvent {
    fn new(id: u32, title: &str, day: usize, start: u32, end: u32) -> Self {
        Self {
            id,
            title: title.to_owned(),
            day,
            start,
            end,
            block: block_for(end.saturating_sub(start)),
        }
    }

    /// Card height in pixels.
    pub fn height(&self) -> f64 {
        f64::from(self.end.saturating_sub(self.start)) * PX_PER_MINUTE
    }
}

/// Drawing routine for a card body of the given duration.
///
/// Built once per duration change, so unchanged cards are not redrawn.
fn block_for(minutes: u32) -> Draw {
    let height = f64::from(minutes) * PX_PER_MINUTE;
    Draw::new(move |path| {
        let body = RoundedRect::from_rect(Rect::new(0.0, 0.0, COLUMN_WIDTH - 8.0, height), 4.0);
        path.extend(body.path_elements(0.1));
    })
}

/// The application state: every event of one week.
#[derive(Clone, Debug, Default)]
pub struct Week {
    events: Vec<CalendarEvent>,
    next_id: u32,
}

impl Week {
    /// An empty week.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events, in insertion order.
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Add an event and return its id.
    pub fn add(&mut self, title: &str, day: usize, start: u32, end: u32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.events
            .push(CalendarEvent::new(id, title, day.min(6), start, end.max(start)));
        id
    }

    /// Remove an event. Returns `false` if there is no such event.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        self.events.len() != before
    }

    /// Move an event to another day and start time, keeping its duration.
    pub fn reschedule(&mut self, id: u32, day: usize, start: u32) -> bool {
        let Some(event) = self.events.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        let duration = event.end - event.start;
        event.day = day.min(6);
        event.start = start;
        event.end = start + duration;
        true
    }

    /// Change the end time of an event.
    pub fn resize(&mut self, id: u32, end: u32) -> bool {
        let Some(event) = self.events.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        event.end = end.max(event.start);
        event.block = block_for(event.end - event.start);
        true
    }

    /// Events on `day`, ordered by start time, then id.
    pub fn on_day(&self, day: usize) -> Vec<&CalendarEvent> {
        let mut events: Vec<_> = self.events.iter().filter(|e| e.day == day).collect();
        events.sort_by_key(|e| (e.start, e.id));
        events
    }
}

/// Cards waiting for their exit effect to end.
///
/// The card remove hook dims the card and parks its [`Detach`] token here;
/// [`FadeQueue::flush`] finishes them.
#[derive(Clone, Debug, Default)]
pub struct FadeQueue(Rc<RefCell<Vec<Detach<Scene>>>>);

impl FadeQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cards still fading.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns `true` if nothing is fading.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn park(&self, scene: &mut Scene, detach: Detach<Scene>) {
        scene.set_opacity(detach.node(), 0.3);
        self.0.borrow_mut().push(detach);
    }

    /// Detach every parked card. Returns how many were finished.
    pub fn flush(&self, scene: &mut Scene) -> usize {
        let parked: Vec<_> = self.0.borrow_mut().drain(..).collect();
        let count = parked.len();
        for detach in parked {
            detach.finish(scene);
        }
        count
    }
}

/// Components and shared styles for rendering a [`Week`].
#[derive(Debug)]
pub struct WeekView {
    day_column: Component<Scene>,
    card: Component<Scene>,
    header_style: Rc<TextStyle>,
}

impl WeekView {
    /// Build the view. Removed cards fade through `fades`.
    pub fn new(fades: &FadeQueue) -> Self {
        let header_style = Rc::new(TextStyle {
            font_family: "sans-serif".into(),
            font_size: 13.0,
            fill: Color(0x44_44_44),
        });
        let title_style = Rc::new(TextStyle {
            font_family: "sans-serif".into(),
            font_size: 11.0,
            fill: Color::WHITE,
        });

        let column_header = Rc::clone(&header_style);
        let day_column = Component::new("day_column", move |props: &Props<Scene>, cards| {
            let day = props.get("day").and_then(|v| v.as_int()).unwrap_or(0);
            let name = usize::try_from(day)
                .ok()
                .and_then(|d| DAY_NAMES.get(d))
                .copied()
                .unwrap_or("?");
            let header = Element::text(
                "header",
                Props::new()
                    .text(name)
                    .style(Rc::clone(&column_header))
                    .anchor(0.5, 0.0)
                    .position(COLUMN_WIDTH / 2.0, 0.0),
            );
            let body = Element::group(
                "cards",
                Props::new().position(4.0, HEADER_HEIGHT),
                cards.to_vec(),
            );
            Some(Element::group(
                "column",
                Props::new().position(props.geometry.position.unwrap_or_default().x, 0.0),
                vec![header, body],
            ))
        });

        let fade = fades.clone();
        let card = Component::new("card", move |props: &Props<Scene>, _| {
            let title = props.get("title").and_then(|v| v.as_str()).unwrap_or("");
            let fade = fade.clone();
            let mut body = Props::new();
            if let Some(block) = &props.draw {
                body = body.draw(block.clone());
            }
            let top = props.geometry.position.unwrap_or_default().y;
            Some(Element::group(
                "card",
                Props::<Scene>::new()
                    .position(0.0, top)
                    .on_remove(move |scene, _, detach| fade.park(scene, detach)),
                vec![
                    Element::shape("body", body),
                    Element::text(
                        "title",
                        Props::new()
                            .text(title)
                            .style(Rc::clone(&title_style))
                            .position(6.0, 4.0),
                    ),
                ],
            ))
        });

        Self {
            day_column,
            card,
            header_style,
        }
    }

    /// Describe the whole week.
    pub fn render(&self, week: &Week) -> Element<Scene> {
        let columns = (0..DAY_NAMES.len())
            .map(|day| {
                let cards = week
                    .on_day(day)
                    .into_iter()
                    .map(|event| {
                        Element::component(
                            &self.card,
                            event.id,
                            Props::new()
                                .position(0.0, f64::from(event.start) * PX_PER_MINUTE)
                                .draw(event.block.clone())
                                .attr("title", event.title.as_str())
                                .attr("height", event.height()),
                            (),
                        )
                    })
                    .collect::<Vec<_>>();
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "There are seven days in a week."
                )]
                let x = day as f64 * COLUMN_WIDTH;
                Element::component(
                    &self.day_column,
                    DAY_NAMES[day],
                    Props::new().position(x, 0.0).attr("day", day as i64),
                    cards,
                )
            })
            .collect::<Vec<_>>();
        Element::group(
            "week",
            Props::new().position(16.0, 16.0),
            columns,
        )
    }

    /// The header text style, shared by every column.
    pub fn header_style(&self) -> &Rc<TextStyle> {
        &self.header_style
    }
}
