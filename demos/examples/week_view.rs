// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A calendar week driven through a dispatch loop.
//!
//! Each step applies one action to the week, re-renders, patches the scene,
//! commits, and prints the scene with the damage it produced. Removed cards
//! fade for one step before they are detached.
//!
//! Run:
//! - `cargo run -p understory_demos --example week_view`
//! - `RUST_LOG=understory_vtree=trace cargo run -p understory_demos --example week_view`

use understory_demos::{FadeQueue, Week, WeekView, init_tracing};
use understory_scene::{Content, Scene};
use understory_vtree::App;

fn main() {
    init_tracing();

    let mut scene = Scene::new();
    let container = scene.insert(None, Content::Group);
    let fades = FadeQueue::new();
    let view = WeekView::new(&fades);

    let mut week = Week::new();
    let standup = week.add("Standup", 0, 9 * 60, 9 * 60 + 15);
    let review = week.add("Design review", 1, 14 * 60, 15 * 60);
    week.add("Lunch", 2, 12 * 60, 13 * 60);

    let mut app: App<Week, Scene> =
        App::new(container, week, move |week: &Week| Some(view.render(week)));
    app.mount(&mut scene);
    report(&mut scene, container, "initial");

    app.dispatch(&mut scene, |week| {
        week.add("1:1", 0, 8 * 60, 8 * 60 + 30);
    });
    report(&mut scene, container, "add 1:1 before standup");

    app.dispatch(&mut scene, |week| {
        week.reschedule(standup, 0, 10 * 60);
    });
    report(&mut scene, container, "move standup later");

    app.dispatch(&mut scene, |week| {
        week.resize(review, 16 * 60);
    });
    report(&mut scene, container, "extend design review");

    app.dispatch(&mut scene, |week| {
        week.remove(review);
    });
    report(&mut scene, container, "cancel design review (fading)");
    let finished = fades.flush(&mut scene);
    report(&mut scene, container, &format!("fade finished ({finished} detached)"));

    app.unmount(&mut scene);
    report(&mut scene, container, "unmounted");
}

fn report(scene: &mut Scene, container: understory_scene::NodeId, step: &str) {
    let damage = scene.commit();
    tracing::info!(
        step,
        dirty = damage.dirty_rects.len(),
        recomputed = damage.recomputed,
        "committed"
    );
    println!("== {step}");
    print!("{}", scene.dump(container));
    println!(
        "   damage: {} rects, {} nodes recomputed, union {:?}",
        damage.dirty_rects.len(),
        damage.recomputed,
        damage.union_rect()
    );
}
