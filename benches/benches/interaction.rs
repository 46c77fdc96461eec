// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_interaction::{
    ActionEvent, ActionName, ActionProps, Interactable, Interaction, InteractionId, Pointer,
    PointerType, RawEvent, Scope,
};

struct Sink;

impl Interactable<u32> for Sink {
    fn action_enabled(&self, _action: ActionName) -> bool {
        true
    }

    fn rect(&self, _element: u32) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    fn fire(&self, _interaction: &mut Interaction<u32>, event: &mut ActionEvent<u32>) {
        black_box(event);
    }
}

/// A touch interaction with `pointers` contacts down and `action` running.
fn session(pointers: u32, action: ActionName) -> (Scope<u32>, InteractionId) {
    let mut scope = Scope::new();
    let id = scope.new_interaction(PointerType::Touch);
    let i = scope.interaction_mut(id).unwrap();
    for p in 0..pointers {
        let pointer = Pointer::touch(p, Point::new(f64::from(p) * 10.0, 0.0));
        i.pointer_down(pointer, RawEvent::new("touchstart", 0), Some(1));
    }
    assert!(i.start(ActionProps::new(action), Rc::new(Sink), 1));
    (scope, id)
}

fn bench_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_interaction");
    group.sample_size(50);

    for &(pointers, action) in &[
        (1_u32, ActionName::Drag),
        (2_u32, ActionName::Gesture),
        (8_u32, ActionName::Gesture),
    ] {
        group.bench_function(format!("move_phase(pointers={pointers})"), |b| {
            b.iter_batched(
                || session(pointers, action),
                |(mut scope, id)| {
                    let i = scope.interaction_mut(id).unwrap();
                    for t in 1..=64_u32 {
                        let x = f64::from(t) * 3.0;
                        let pointer = Pointer::touch(t % pointers, Point::new(x, x));
                        let event = RawEvent::new("touchmove", u64::from(t) * 16);
                        i.pointer_move(pointer, event, Some(1));
                    }
                    black_box(scope);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("duplicate_moves", |b| {
        b.iter_batched(
            || session(1, ActionName::Drag),
            |(mut scope, id)| {
                let i = scope.interaction_mut(id).unwrap();
                let pointer = Pointer::touch(0, Point::ZERO);
                for t in 1..=64_u64 {
                    i.pointer_move(pointer, RawEvent::new("touchmove", t * 16), Some(1));
                }
                black_box(scope);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_move);
criterion_main!(benches);
