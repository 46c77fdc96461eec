// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag session.
//!
//! Start a drag from a `pointer_down` listener, keep it horizontal with an
//! edge selection and the `action` channel, and veto moves past a boundary
//! from `before_action`.
//!
//! Run:
//! - `cargo run -p understory_demos --example drag_session`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect, Vec2};
use tracing::info;
use understory_demos::init_tracing;
use understory_interaction::{
    ActionEvent, ActionName, ActionProps, Axis, Edges, Interactable, Interaction, Outcome, Phase,
    Pointer, PointerType, RawEvent, Scope,
};

/// A box that can be dragged.
struct Card {
    rect: Cell<Rect>,
}

impl Interactable<u32> for Card {
    fn action_enabled(&self, action: ActionName) -> bool {
        action == ActionName::Drag
    }

    fn rect(&self, _element: u32) -> Option<Rect> {
        Some(self.rect.get())
    }

    fn fire(&self, _interaction: &mut Interaction<u32>, event: &mut ActionEvent<u32>) {
        if let Some(rect) = event.rect {
            self.rect.set(rect);
        }
        info!(
            "{} at ({:.0}, {:.0}) delta=({:.0}, {:.0}) rect.x0={:.0}",
            event.event_type(),
            event.page.x,
            event.page.y,
            event.delta.x,
            event.delta.y,
            self.rect.get().x0,
        );
    }
}

const CARD: u32 = 1;

fn main() {
    init_tracing();

    let card = Rc::new(Card {
        rect: Cell::new(Rect::new(0.0, 0.0, 120.0, 80.0)),
    });

    let mut scope = Scope::<u32>::new();
    let signals = Rc::clone(scope.signals());

    // Stands in for selector matching: every press on the card starts a drag.
    let target = Rc::clone(&card);
    signals.pointer_down.observe(move |interaction, args| {
        if args.event_target == Some(CARD) {
            let props = ActionProps::new(ActionName::Drag)
                .with_axis(Axis::X)
                .with_edges(Edges::LEFT | Edges::RIGHT);
            interaction.start(props, target.clone(), CARD);
        }
    });

    // Honour the axis hint before the event reaches the card.
    signals.action(Phase::Move).observe(|interaction, args| {
        if interaction.prepared().axis == Some(Axis::X) {
            args.action_event.delta = Vec2::new(args.action_event.delta.x, 0.0);
        }
    });

    // Refuse moves whose pointer leaves the track.
    signals.before_action(Phase::Move).on(|_, args| {
        let past_end = args.pointer.is_some_and(|p| p.page.x > 300.0);
        if past_end {
            info!("move vetoed");
            Outcome::Veto
        } else {
            Outcome::Continue
        }
    });

    let id = scope.new_interaction(PointerType::Mouse);
    let i = scope.interaction_mut(id).expect("interaction exists");
    let at = |x: f64, y: f64| Pointer::mouse(Point::new(x, y));

    i.pointer_down(at(10.0, 10.0), RawEvent::new("pointerdown", 0), Some(CARD));
    for (t, x) in [(16, 60.0), (32, 140.0), (48, 140.0), (64, 320.0), (80, 250.0)] {
        i.pointer_move(at(x, 10.0 + x / 10.0), RawEvent::new("pointermove", t), Some(CARD));
    }
    i.pointer_up(at(250.0, 35.0), RawEvent::new("pointerup", 96), Some(CARD), None);

    info!(
        interacting = i.interacting(),
        velocity = ?i.coords().velocity.page,
        "released"
    );
}
