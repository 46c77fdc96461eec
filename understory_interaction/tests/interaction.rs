// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_interaction` crate.
//!
//! These drive interactions through a scope the way an input binding would,
//! and observe them through the channel table and a recording interactable.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::{Point, Rect, Vec2};
use understory_interaction::{
    ActionEvent, ActionName, ActionProps, Edges, Interactable, Interaction, InteractionId,
    InteractionOptions, MoveInput, Outcome, Phase, Plugin, Pointer, PointerType, RawEvent, Scope,
};

type Elem = u32;

struct Target {
    enabled: Vec<ActionName>,
    rect: Option<Rect>,
    events: RefCell<Vec<ActionEvent<Elem>>>,
}

impl Target {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            enabled: vec![ActionName::Drag, ActionName::Gesture, ActionName::Resize],
            rect: Some(Rect::new(0.0, 0.0, 100.0, 50.0)),
            events: RefCell::new(Vec::new()),
        })
    }

    fn only(enabled: Vec<ActionName>) -> Rc<Self> {
        Rc::new(Self {
            enabled,
            rect: None,
            events: RefCell::new(Vec::new()),
        })
    }

    fn types(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .map(|e| e.event_type().into_owned())
            .collect()
    }
}

impl Interactable<Elem> for Target {
    fn action_enabled(&self, action: ActionName) -> bool {
        self.enabled.contains(&action)
    }

    fn rect(&self, _element: Elem) -> Option<Rect> {
        self.rect
    }

    fn fire(&self, _interaction: &mut Interaction<Elem>, event: &mut ActionEvent<Elem>) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn down(x: f64, y: f64, t: u64) -> (Pointer, RawEvent) {
    (Pointer::mouse(Point::new(x, y)), RawEvent::new("pointerdown", t))
}

fn mv(x: f64, y: f64, t: u64) -> (Pointer, RawEvent) {
    (Pointer::mouse(Point::new(x, y)), RawEvent::new("pointermove", t))
}

fn up(x: f64, y: f64, t: u64) -> (Pointer, RawEvent) {
    (Pointer::mouse(Point::new(x, y)), RawEvent::new("pointerup", t))
}

fn mouse_scope() -> (Scope<Elem>, InteractionId) {
    let mut scope = Scope::new();
    let id = scope.new_interaction(PointerType::Mouse);
    (scope, id)
}

#[test]
fn start_requires_a_pointer_down() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let i = scope.interaction_mut(id).unwrap();

    assert!(!i.start(ActionProps::new(ActionName::Drag), target.clone(), 1));
    assert!(!i.interacting());
    assert_eq!(i.prepared().name, None);
    assert!(i.interactable().is_none());
    assert!(target.events.borrow().is_empty());
}

#[test]
fn gesture_requires_two_pointers() {
    let mut scope = Scope::<Elem>::new();
    let id = scope.new_interaction(PointerType::Touch);
    let target = Target::new();
    let i = scope.interaction_mut(id).unwrap();

    i.pointer_down(
        Pointer::touch(1, Point::new(0.0, 0.0)),
        RawEvent::new("touchstart", 0),
        Some(1),
    );
    assert!(!i.start(ActionProps::new(ActionName::Gesture), target.clone(), 1));
    assert_eq!(i.prepared().name, None);

    i.pointer_down(
        Pointer::touch(2, Point::new(10.0, 0.0)),
        RawEvent::new("touchstart", 5),
        Some(1),
    );
    assert_eq!(i.pointers().len(), 2);
    assert!(i.start(ActionProps::new(ActionName::Gesture), target.clone(), 1));
    assert_eq!(i.current_action(), Some(ActionName::Gesture));
    assert_eq!(target.types(), ["gesturestart"]);
}

#[test]
fn disabled_action_is_rejected() {
    let (mut scope, id) = mouse_scope();
    let target = Target::only(vec![ActionName::Resize]);
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));

    assert!(!i.start(ActionProps::new(ActionName::Drag), target.clone(), 1));
    assert!(i.start(ActionProps::new(ActionName::Resize), target, 1));
}

#[test]
fn second_start_fails_and_keeps_the_first() {
    let (mut scope, id) = mouse_scope();
    let first = Target::new();
    let second = Target::new();
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));

    assert!(i.start(ActionProps::new(ActionName::Drag), first.clone(), 1));
    assert!(!i.start(ActionProps::new(ActionName::Resize), second.clone(), 2));

    assert_eq!(i.prepared().name, Some(ActionName::Drag));
    assert_eq!(i.element(), Some(1));
    let kept = i.interactable().unwrap();
    assert!(std::ptr::addr_eq(Rc::as_ptr(kept), Rc::as_ptr(&first)));
    assert!(second.events.borrow().is_empty());
}

#[test]
fn jitter_below_tolerance_is_not_movement() {
    let (mut scope, id) = mouse_scope();
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(10.0, 10.0, 0);
    i.pointer_down(p, e, Some(1));

    let (p, e) = mv(10.5, 10.5, 10);
    i.pointer_move(p, e, Some(1));
    assert!(!i.pointer_was_moved());

    let (p, e) = mv(10.0, 11.0, 20);
    i.pointer_move(p, e, Some(1));
    assert!(!i.pointer_was_moved(), "exactly at tolerance is not past it");

    let (p, e) = mv(12.0, 10.0, 30);
    i.pointer_move(p, e, Some(1));
    assert!(i.pointer_was_moved());
}

#[test]
fn moved_flag_is_sticky_until_next_idle_down() {
    let (mut scope, id) = mouse_scope();
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    let (p, e) = mv(5.0, 0.0, 10);
    i.pointer_move(p, e, Some(1));
    assert!(i.pointer_was_moved());

    // Returning to the start does not clear it.
    let (p, e) = mv(0.0, 0.0, 20);
    i.pointer_move(p, e, Some(1));
    assert!(i.pointer_was_moved());

    let (p, e) = up(0.0, 0.0, 30);
    i.pointer_up(p, e, Some(1), None);
    assert!(i.pointer_was_moved());

    let (p, e) = down(0.0, 0.0, 40);
    i.pointer_down(p, e, Some(1));
    assert!(!i.pointer_was_moved());
}

#[test]
fn custom_tolerance_applies() {
    let mut scope = Scope::<Elem>::with_options(InteractionOptions {
        pointer_move_tolerance: 10.0,
    })
    .unwrap();
    let id = scope.new_interaction(PointerType::Mouse);
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    let (p, e) = mv(6.0, 6.0, 10);
    i.pointer_move(p, e, Some(1));
    assert!(!i.pointer_was_moved());
    let (p, e) = mv(8.0, 8.0, 20);
    i.pointer_move(p, e, Some(1));
    assert!(i.pointer_was_moved());
}

#[test]
fn invalid_options_are_rejected() {
    let err = Scope::<Elem>::with_options(InteractionOptions {
        pointer_move_tolerance: -1.0,
    });
    assert!(err.is_err());
}

#[test]
fn duplicates_are_flagged_and_do_not_advance_prev() {
    let (mut scope, id) = mouse_scope();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    scope
        .signals()
        .pointer_move
        .observe(move |_, args| log.borrow_mut().push(args.duplicate));

    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    let (p, e) = mv(3.0, 4.0, 10);
    i.pointer_move(p, e, Some(1));
    let prev = i.coords().prev;
    assert_eq!(prev.page, Point::new(3.0, 4.0));

    let (p, e) = mv(3.0, 4.0, 20);
    i.pointer_move(p, e, Some(1));
    assert_eq!(i.coords().prev, prev, "a duplicate keeps the old timestamp too");

    // Same page position but a different client position is not a duplicate.
    let p = Pointer::mouse(Point::new(3.0, 4.0)).with_client(Point::new(3.0, 5.0));
    i.pointer_move(p, RawEvent::new("pointermove", 30), Some(1));

    assert_eq!(*seen.borrow(), [false, true, false]);
}

#[test]
fn duplicate_move_then_real_move_then_up() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let i = scope.interaction_mut(id).unwrap();

    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(i.start(ActionProps::new(ActionName::Drag), target.clone(), 1));

    let (p, e) = mv(0.0, 0.0, 10);
    i.pointer_move(p, e, Some(1));
    assert!(!i.pointer_was_moved());

    let (p, e) = mv(5.0, 5.0, 20);
    i.pointer_move(p, e, Some(1));
    assert!(i.pointer_was_moved());

    let (p, e) = up(5.0, 5.0, 30);
    i.pointer_up(p, e, Some(1), None);

    assert_eq!(target.types(), ["dragstart", "dragmove", "dragend"]);
    let events = target.events.borrow();
    assert_eq!(events[1].delta, Vec2::new(5.0, 5.0));
    assert_eq!(events[2].page, Point::new(5.0, 5.0));
    assert!(!i.interacting());
    assert!(i.pointers().is_empty());
}

#[test]
fn stationary_press_never_runs_a_move_phase() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(1.0, 1.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(i.start(ActionProps::new(ActionName::Drag), target.clone(), 1));
    for t in 1..5 {
        let (p, e) = mv(1.0, 1.0, t * 10);
        i.pointer_move(p, e, Some(1));
    }
    let (p, e) = up(1.0, 1.0, 100);
    i.pointer_up(p, e, Some(1), None);
    assert_eq!(target.types(), ["dragstart", "dragend"]);
}

#[test]
fn stale_event_does_not_regress_prev_event() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    scope
        .signals()
        .action(Phase::Move)
        .observe(|_, args| args.action_event.time_stamp = 1);

    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 50);
    i.pointer_down(p, e, Some(1));
    assert!(i.start(ActionProps::new(ActionName::Drag), target.clone(), 1));
    assert_eq!(i.prev_event().unwrap().time_stamp, 50);

    let (p, e) = mv(5.0, 0.0, 60);
    i.pointer_move(p, e, Some(1));

    // The move was delivered, but prev_event still holds the start.
    assert_eq!(target.types(), ["dragstart", "dragmove"]);
    assert_eq!(i.prev_event().unwrap().phase, Phase::Start);
}

#[test]
fn before_veto_aborts_the_phase() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let after = Rc::new(Cell::new(0));
    let count = Rc::clone(&after);
    scope
        .signals()
        .before_action(Phase::Start)
        .on(|_, _| Outcome::Veto);
    scope
        .signals()
        .after_action(Phase::Start)
        .observe(move |_, _| count.set(count.get() + 1));

    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(!i.start(ActionProps::new(ActionName::Drag), target.clone(), 1));
    assert!(!i.interacting());
    assert!(target.events.borrow().is_empty());
    assert!(i.prev_event().is_none());
    assert_eq!(after.get(), 0);

    // Nothing of the refused start stays behind.
    assert_eq!(i.element(), None);
    assert!(i.interactable().is_none());
    assert_eq!(i.prepared().name, None);
    assert_eq!(i.rect(), None);
    assert!(i.is_stopped());

    let (p, e) = up(0.0, 0.0, 10);
    i.pointer_up(p, e, Some(1), None);
    assert!(!i.move_phase(None));
    assert!(target.events.borrow().is_empty());
}

#[test]
fn stop_during_start_voids_the_interaction() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    scope
        .signals()
        .action(Phase::Start)
        .observe(|interaction, _| interaction.stop());

    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(!i.start(ActionProps::new(ActionName::Drag), target.clone(), 1));
    assert!(!i.interacting());
    assert!(i.is_stopped());
    assert!(i.prev_event().is_none());
    assert_eq!(i.element(), None);
}

#[test]
fn vetoed_end_leaves_the_interaction_open() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let veto = Rc::new(Cell::new(true));
    let flag = Rc::clone(&veto);
    scope.signals().before_action(Phase::End).on(move |_, _| {
        if flag.get() {
            Outcome::Veto
        } else {
            Outcome::Continue
        }
    });

    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(i.start(ActionProps::new(ActionName::Drag), target.clone(), 1));

    i.end(None);
    assert!(i.interacting());
    assert!(!i.is_ending());

    veto.set(false);
    i.end(None);
    assert!(!i.interacting());
    assert_eq!(target.types(), ["dragstart", "dragend"]);
}

#[test]
fn stop_is_idempotent_and_clears_target() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let stops = Rc::new(Cell::new(0));
    let count = Rc::clone(&stops);
    scope
        .signals()
        .stop
        .observe(move |_, _| count.set(count.get() + 1));

    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(i.start(
        ActionProps::new(ActionName::Resize).with_edges(Edges::RIGHT),
        target,
        1
    ));
    i.stop();
    i.stop();

    assert_eq!(stops.get(), 2);
    assert!(!i.interacting());
    assert_eq!(i.prepared().name, None);
    assert_eq!(i.prepared().edges, Some(Edges::RIGHT));
    assert!(i.interactable().is_none());
    assert!(i.prev_event().is_none());
    assert_eq!(i.current_action(), None);
}

#[test]
fn down_fires_update_pointer_before_down() {
    let (mut scope, id) = mouse_scope();
    let order = Rc::new(RefCell::new(Vec::new()));
    let a = Rc::clone(&order);
    let b = Rc::clone(&order);
    scope
        .signals()
        .update_pointer
        .observe(move |_, args| {
            a.borrow_mut()
                .push(if args.down { "update-down" } else { "update" });
        });
    scope
        .signals()
        .pointer_down
        .observe(move |_, _| b.borrow_mut().push("down"));

    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    let (p, e) = mv(3.0, 0.0, 5);
    i.pointer_move(p, e, Some(1));

    assert_eq!(*order.borrow(), ["update-down", "down", "update"]);
}

#[test]
fn down_is_inferred_from_event_type() {
    let mut scope = Scope::<Elem>::new();
    let id = scope.new_interaction(PointerType::Touch);
    let i = scope.interaction_mut(id).unwrap();
    let p = Pointer::touch(4, Point::new(2.0, 2.0));
    i.update_pointer(p, RawEvent::new("TouchStart", 9), Some(3), None);
    assert!(i.pointer_is_down());
    assert_eq!(i.pointers()[0].down_time, Some(9));
    assert_eq!(i.pointers()[0].down_target, Some(3));

    let q = Pointer::touch(5, Point::new(2.0, 2.0));
    i.update_pointer(q, RawEvent::new("touchstart", 10), Some(3), Some(false));
    assert_eq!(i.pointers()[1].down_time, None);
}

#[test]
fn cancel_fires_the_cancel_channel() {
    let (mut scope, id) = mouse_scope();
    let ups = Rc::new(Cell::new(0));
    let cancels = Rc::new(Cell::new(0));
    let (u, c) = (Rc::clone(&ups), Rc::clone(&cancels));
    scope.signals().pointer_up.observe(move |_, _| u.set(u.get() + 1));
    scope
        .signals()
        .pointer_cancel
        .observe(move |_, _| c.set(c.get() + 1));

    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    i.pointer_up(p, RawEvent::new("pointercancel", 5), Some(1), None);

    assert_eq!((ups.get(), cancels.get()), (0, 1));
    assert!(!i.pointer_is_down());
}

#[test]
fn release_of_untracked_pointer_registers_it_first() {
    let mut scope = Scope::<Elem>::new();
    let id = scope.new_interaction(PointerType::Touch);
    let removed = Rc::new(Cell::new(0));
    let r = Rc::clone(&removed);
    scope
        .signals()
        .remove_pointer
        .observe(move |_, _| r.set(r.get() + 1));

    let i = scope.interaction_mut(id).unwrap();
    let p = Pointer::touch(9, Point::new(1.0, 1.0));
    i.pointer_up(p, RawEvent::new("touchend", 3), Some(1), None);
    assert_eq!(removed.get(), 1);
    assert!(i.pointers().is_empty());

    // Removing an untracked pointer is a no-op.
    i.remove_pointer(&p, RawEvent::new("touchend", 4));
    assert_eq!(removed.get(), 1);
}

#[test]
fn mouse_resolves_to_the_last_record_touch_by_id() {
    let mut scope = Scope::<Elem>::new();
    let mouse = scope.new_interaction(PointerType::Mouse);
    let touch = scope.new_interaction(PointerType::Touch);

    let i = scope.interaction_mut(mouse).unwrap();
    i.pointer_down(Pointer::mouse(Point::ZERO), RawEvent::new("mousedown", 0), None);
    let other = Pointer::new(
        understory_interaction::PointerId(42),
        PointerType::Mouse,
        Point::ZERO,
    );
    assert_eq!(i.pointer_index(&other), Some(0));

    let i = scope.interaction_mut(touch).unwrap();
    i.pointer_down(Pointer::touch(1, Point::ZERO), RawEvent::new("touchstart", 0), None);
    i.pointer_down(Pointer::touch(2, Point::ZERO), RawEvent::new("touchstart", 0), None);
    assert_eq!(i.pointer_index(&Pointer::touch(2, Point::ZERO)), Some(1));
    assert_eq!(i.pointer_index(&Pointer::touch(3, Point::ZERO)), None);
}

#[test]
fn current_coords_average_all_pointers() {
    let mut scope = Scope::<Elem>::new();
    let id = scope.new_interaction(PointerType::Touch);
    let i = scope.interaction_mut(id).unwrap();
    i.pointer_down(Pointer::touch(1, Point::new(0.0, 0.0)), RawEvent::new("touchstart", 0), None);
    i.pointer_down(Pointer::touch(2, Point::new(10.0, 4.0)), RawEvent::new("touchstart", 0), None);
    assert_eq!(i.coords().cur.page, Point::new(5.0, 2.0));
    assert_eq!(i.coords().start.page, Point::new(5.0, 2.0));
}

#[test]
fn velocity_updates_on_real_moves() {
    let (mut scope, id) = mouse_scope();
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 1000);
    i.pointer_down(p, e, Some(1));
    let (p, e) = mv(10.0, 0.0, 1100);
    i.pointer_move(p, e, Some(1));
    assert_eq!(i.coords().velocity.page, Vec2::new(100.0, 0.0));
}

#[test]
fn move_phase_without_input_zeroes_delta() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(i.start(ActionProps::new(ActionName::Drag), target.clone(), 1));
    let (p, e) = mv(10.0, 0.0, 10);
    i.pointer_move(p, e, Some(1));
    let rect_after_move = i.rect();

    assert!(i.move_phase(None));
    assert_eq!(i.coords().delta.page, Vec2::ZERO);
    assert_eq!(i.rect(), rect_after_move, "a replay does not move the rect again");
    assert_eq!(target.types(), ["dragstart", "dragmove", "dragmove"]);
    assert_eq!(i.proxy().element(), Some(1));
}

#[test]
fn move_phase_merges_partial_input() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let seen = Rc::new(RefCell::new(None));
    let s = Rc::clone(&seen);
    scope
        .signals()
        .before_action(Phase::Move)
        .observe(move |_, args| {
            *s.borrow_mut() = Some((args.pointer, args.event.clone(), args.pre_end));
        });

    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(i.start(ActionProps::new(ActionName::Drag), target, 1));

    i.move_phase(Some(MoveInput {
        pre_end: true,
        ..MoveInput::default()
    }));
    let (pointer, event, pre_end) = seen.borrow().clone().unwrap();
    assert_eq!(pointer, Some(p));
    assert_eq!(event.map(|e| e.time_stamp), Some(0));
    assert!(pre_end);
}

#[test]
fn move_resizes_the_rect_along_selected_edges() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(100.0, 50.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(i.start(
        ActionProps::new(ActionName::Resize).with_edges(Edges::RIGHT | Edges::BOTTOM),
        target.clone(),
        1
    ));
    let (p, e) = mv(110.0, 55.0, 10);
    i.pointer_move(p, e, Some(1));

    assert_eq!(i.rect(), Some(Rect::new(0.0, 0.0, 110.0, 55.0)));
    assert_eq!(
        target.events.borrow()[1].rect,
        Some(Rect::new(0.0, 0.0, 110.0, 55.0))
    );
}

#[test]
fn blur_ends_then_notifies() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    let (a, b) = (Rc::clone(&order), Rc::clone(&order));
    scope
        .signals()
        .after_action(Phase::End)
        .observe(move |_, _| a.borrow_mut().push("end"));
    scope.signals().blur.observe(move |_, _| b.borrow_mut().push("blur"));

    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(i.start(ActionProps::new(ActionName::Drag), target, 1));
    i.document_blur(Some(RawEvent::new("blur", 5)));

    assert_eq!(*order.borrow(), ["end", "blur"]);
    assert!(!i.interacting());
}

#[test]
fn simulation_suppresses_end_on_release() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(i.start(ActionProps::new(ActionName::Drag), target.clone(), 1));
    i.set_simulation(true);
    let (p, e) = up(0.0, 0.0, 10);
    i.pointer_up(p, e, Some(1), None);
    assert!(i.interacting());
    assert_eq!(target.types(), ["dragstart"]);
}

#[test]
fn scope_refuses_a_taken_target() {
    let mut scope = Scope::<Elem>::new();
    let a = scope.new_interaction(PointerType::Touch);
    let b = scope.new_interaction(PointerType::Touch);
    let target = Target::new();

    for (id, pid) in [(a, 1), (b, 2)] {
        scope.interaction_mut(id).unwrap().pointer_down(
            Pointer::touch(pid, Point::ZERO),
            RawEvent::new("touchstart", 0),
            Some(1),
        );
    }

    assert!(scope.start(a, ActionProps::new(ActionName::Drag), target.clone(), 1));
    assert!(!scope.start(b, ActionProps::new(ActionName::Drag), target.clone(), 1));
    assert!(scope.start(b, ActionProps::new(ActionName::Drag), target.clone(), 2));
    assert!(!scope.start(InteractionId(99), ActionProps::new(ActionName::Drag), target, 3));
}

#[test]
fn interaction_start_skips_the_cross_session_check() {
    let mut scope = Scope::<Elem>::new();
    let a = scope.new_interaction(PointerType::Touch);
    let b = scope.new_interaction(PointerType::Touch);
    let target = Target::new();

    for (id, pid) in [(a, 1), (b, 2)] {
        scope.interaction_mut(id).unwrap().pointer_down(
            Pointer::touch(pid, Point::ZERO),
            RawEvent::new("touchstart", 0),
            Some(1),
        );
    }

    assert!(scope.start(a, ActionProps::new(ActionName::Drag), target.clone(), 1));
    let i = scope.interaction_mut(b).unwrap();
    assert!(i.proxy().start(ActionProps::new(ActionName::Drag), target, 1));
    assert_eq!(scope.interactions().iter().filter(|i| i.interacting()).count(), 2);
}

#[test]
fn ids_are_allocated_per_scope() {
    let mut one = Scope::<Elem>::new();
    let mut two = Scope::<Elem>::new();
    assert_eq!(one.new_interaction(PointerType::Mouse), InteractionId(0));
    assert_eq!(one.new_interaction(PointerType::Mouse), InteractionId(1));
    assert_eq!(two.new_interaction(PointerType::Pen), InteractionId(0));
}

#[test]
fn new_fires_once_per_interaction() {
    let mut scope = Scope::<Elem>::new();
    let created = Rc::new(RefCell::new(Vec::new()));
    let c = Rc::clone(&created);
    scope
        .signals()
        .new
        .observe(move |i, _| c.borrow_mut().push(i.id()));
    scope.new_interaction(PointerType::Mouse);
    scope.new_interaction(PointerType::Touch);
    assert_eq!(*created.borrow(), [InteractionId(0), InteractionId(1)]);
}

struct CountingPlugin(Rc<Cell<u32>>);

impl Plugin<Elem> for CountingPlugin {
    fn id(&self) -> &'static str {
        "test/counting"
    }

    fn install(&self, _scope: &mut Scope<Elem>) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn plugins_install_once() {
    let mut scope = Scope::<Elem>::new();
    let installs = Rc::new(Cell::new(0));
    let plugin = CountingPlugin(Rc::clone(&installs));
    assert!(!scope.is_installed("test/counting"));
    assert!(scope.use_plugin(&plugin));
    assert!(!scope.use_plugin(&plugin));
    assert!(scope.is_installed("test/counting"));
    assert_eq!(installs.get(), 1);
}

#[test]
fn timers_run_against_their_interaction() {
    let mut scope = Scope::<Elem>::new();
    let id = scope.new_interaction(PointerType::Mouse);
    let fired = Rc::new(RefCell::new(Vec::new()));

    let f = Rc::clone(&fired);
    let i = scope.interaction_mut(id).unwrap();
    i.schedule(100, move |i, due| f.borrow_mut().push((i.id(), due)));
    let cancelled = i.schedule(50, |_, _| panic!("cancelled timer ran"));
    assert!(i.cancel_timer(cancelled));
    assert!(!i.cancel_timer(cancelled));

    assert_eq!(scope.next_timer_due(), Some(100));
    assert_eq!(scope.advance_timers(99), 0);
    assert_eq!(scope.advance_timers(250), 1);
    assert_eq!(*fired.borrow(), [(id, 100)]);
    assert_eq!(scope.pending_timers(), 0);
}

#[test]
fn timers_can_reschedule_from_inside_a_task() {
    let mut scope = Scope::<Elem>::new();
    let id = scope.new_interaction(PointerType::Mouse);
    let fired = Rc::new(RefCell::new(Vec::new()));

    fn every_100(fired: Rc<RefCell<Vec<u64>>>) -> impl FnOnce(&mut Interaction<Elem>, u64) {
        move |i, due| {
            fired.borrow_mut().push(due);
            if due < 300 {
                i.schedule(due + 100, every_100(fired));
            }
        }
    }
    scope
        .interaction_mut(id)
        .unwrap()
        .schedule(100, every_100(Rc::clone(&fired)));

    assert_eq!(scope.advance_timers(1000), 3);
    assert_eq!(*fired.borrow(), [100, 200, 300]);
}

#[test]
fn removing_an_interaction_drops_its_timers() {
    let mut scope = Scope::<Elem>::new();
    let a = scope.new_interaction(PointerType::Mouse);
    let b = scope.new_interaction(PointerType::Mouse);
    scope.interaction_mut(a).unwrap().schedule(10, |_, _| panic!("removed"));
    scope.interaction_mut(b).unwrap().schedule(10, |_, _| {});

    assert!(scope.remove_interaction(a));
    assert!(!scope.remove_interaction(a));
    assert!(scope.interaction(a).is_none());
    assert_eq!(scope.pending_timers(), 1);
    assert_eq!(scope.advance_timers(10), 1);
}

#[test]
fn destroy_releases_latest_pointer() {
    let (mut scope, id) = mouse_scope();
    let destroyed = Rc::new(Cell::new(0));
    let count = Rc::clone(&destroyed);
    scope
        .signals()
        .destroy
        .observe(move |_, _| count.set(count.get() + 1));

    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(i.latest_pointer().is_some());
    i.destroy();
    assert!(i.latest_pointer().is_none());
    assert_eq!(destroyed.get(), 1);

    assert!(scope.remove_interaction(id));
    assert_eq!(destroyed.get(), 2);
}

#[test]
fn proxy_exposes_lifecycle() {
    let (mut scope, id) = mouse_scope();
    let target = Target::new();
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));

    let mut proxy = i.proxy();
    assert!(proxy.pointer_is_down());
    assert!(!proxy.pointer_was_moved());
    assert!(proxy.start(ActionProps::new(ActionName::Drag), target.clone(), 1));
    assert!(proxy.interacting());
    assert_eq!(proxy.prepared().name, Some(ActionName::Drag));
    assert!(proxy.interactable().is_some());
    assert!(proxy.move_phase(None));
    proxy.end(None);
    assert!(!proxy.interacting());
    assert_eq!(target.types(), ["dragstart", "dragmove", "dragend"]);
}

#[test]
fn interactable_can_end_from_inside_delivery() {
    struct EndsOnMove;
    impl Interactable<Elem> for EndsOnMove {
        fn action_enabled(&self, _: ActionName) -> bool {
            true
        }
        fn rect(&self, _: Elem) -> Option<Rect> {
            None
        }
        fn fire(&self, interaction: &mut Interaction<Elem>, event: &mut ActionEvent<Elem>) {
            if event.phase == Phase::Move && !interaction.is_ending() {
                interaction.end(None);
            }
        }
    }

    let (mut scope, id) = mouse_scope();
    let i = scope.interaction_mut(id).unwrap();
    let (p, e) = down(0.0, 0.0, 0);
    i.pointer_down(p, e, Some(1));
    assert!(i.start(ActionProps::new(ActionName::Drag), Rc::new(EndsOnMove), 1));
    let (p, e) = mv(4.0, 0.0, 10);
    i.pointer_move(p, e, Some(1));
    assert!(!i.interacting());
}
