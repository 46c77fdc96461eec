// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gestures.
//!
//! Feed a scripted input stream through a scope with the pointer-event
//! plugins installed and log the taps, double-taps and holds it produces.
//!
//! Run:
//! - `cargo run -p understory_demos --example pointer_gestures`
//! - `RUST_LOG=debug cargo run -p understory_demos --example pointer_gestures`

use std::rc::Rc;

use kurbo::Point;
use tracing::info;
use understory_demos::{Tree, init_tracing};
use understory_interaction::{Interaction, Pointer, PointerType, RawEvent, Scope};
use understory_pointer_events::{
    CallbackEventable, ElementTargets, Eventable, EventableOptions, HoldRepeat, PointerEvent,
    PointerEventType, PointerEvents,
};

fn logger(
    tree: &Rc<Tree>,
    label: &'static str,
) -> impl Fn(&mut Interaction<u32>, &mut PointerEvent<u32>) + 'static {
    let tree = Rc::clone(tree);
    move |_, ev| {
        info!(
            "{label}: {} on {} at ({:.0}, {:.0}) dt={} count={}",
            ev.event_type,
            ev.current_target.map_or("-", |t| tree.name(t)),
            ev.page.x,
            ev.page.y,
            ev.dt,
            ev.count,
        );
    }
}

fn main() {
    init_tracing();

    let mut tree = Tree::new();
    let window = tree.add("window", None);
    let toolbar = tree.add("toolbar", Some(window));
    let button = tree.add("button", Some(toolbar));
    let list = tree.add("list", Some(window));
    let item = tree.add("item", Some(list));
    let tree = Rc::new(tree);

    let pipeline = PointerEvents::new(Tree::lookup(&tree));
    let targets = ElementTargets::new(&pipeline);
    let repeat = HoldRepeat::new(&pipeline);

    let mut scope = Scope::<u32>::new();
    scope.use_plugin(&targets);
    scope.use_plugin(&repeat);

    let button_events = Rc::new(CallbackEventable::new());
    button_events.on(PointerEventType::Tap, logger(&tree, "button"));
    button_events.on(PointerEventType::DoubleTap, logger(&tree, "button"));
    targets.register(button, button_events as Rc<dyn Eventable<u32>>);

    let item_events = Rc::new(
        CallbackEventable::with_options(EventableOptions {
            hold_duration: 400,
            hold_repeat_interval: 150,
            // Item-local coordinates.
            origin: Point::new(0.0, 120.0),
        })
        .expect("valid eventable options"),
    );
    item_events.on(PointerEventType::Hold, logger(&tree, "item"));
    item_events.on(PointerEventType::Tap, logger(&tree, "item"));
    targets.register(item, item_events as Rc<dyn Eventable<u32>>);

    let window_events = Rc::new(CallbackEventable::new());
    window_events.on(PointerEventType::Down, logger(&tree, "window"));
    window_events.on(PointerEventType::Up, logger(&tree, "window"));
    targets.register(window, window_events as Rc<dyn Eventable<u32>>);

    let id = scope.new_interaction(PointerType::Mouse);
    let at = |x: f64, y: f64| Pointer::mouse(Point::new(x, y));

    info!("-- double-tap the button");
    for t in [0, 180] {
        let i = scope.interaction_mut(id).expect("interaction exists");
        i.pointer_down(at(10.0, 10.0), RawEvent::new("pointerdown", t), Some(button));
        i.pointer_up(at(10.0, 10.0), RawEvent::new("pointerup", t + 60), Some(button), None);
    }

    info!("-- press and hold the item");
    let i = scope.interaction_mut(id).expect("interaction exists");
    i.pointer_down(at(30.0, 130.0), RawEvent::new("pointerdown", 1000), Some(item));
    // A little jitter stays within the move tolerance.
    i.pointer_move(at(30.5, 130.0), RawEvent::new("pointermove", 1100), Some(item));
    let mut now = 1000;
    while now < 1800 {
        now += 100;
        scope.advance_timers(now);
    }
    let i = scope.interaction_mut(id).expect("interaction exists");
    i.pointer_up(at(30.5, 130.0), RawEvent::new("pointerup", now), Some(item), None);

    info!("-- drag off the item: no tap, no hold");
    let i = scope.interaction_mut(id).expect("interaction exists");
    i.pointer_down(at(30.0, 130.0), RawEvent::new("pointerdown", 3000), Some(item));
    i.pointer_move(at(60.0, 130.0), RawEvent::new("pointermove", 3100), Some(list));
    i.pointer_up(at(60.0, 130.0), RawEvent::new("pointerup", 3200), Some(list), None);
    scope.advance_timers(5000);
    info!(pending = scope.pending_timers(), "done");
}
