// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_interaction::{InteractionId, Pointer, PointerType, RawEvent, Scope};
use understory_pointer_events::{
    CallbackEventable, ElementTargets, Eventable, EventableOptions, PointerEventType,
    PointerEvents,
};

/// A chain `depth - 1 -> ... -> 0` with `per_element` tap listeners on each
/// element, and the leaf id.
fn chain(depth: u32, per_element: usize, hold: bool) -> (Scope<u32>, InteractionId, u32) {
    let pipeline = PointerEvents::new(|e: u32| e.checked_sub(1));
    let targets = ElementTargets::new(&pipeline);
    for element in 0..depth {
        for _ in 0..per_element {
            let e = Rc::new(
                CallbackEventable::with_options(EventableOptions {
                    hold_duration: 500 + u64::from(element),
                    ..Default::default()
                })
                .unwrap(),
            );
            e.on(PointerEventType::Tap, |_, ev| {
                black_box(ev);
            });
            if hold {
                e.on(PointerEventType::Hold, |_, ev| {
                    black_box(ev);
                });
            }
            targets.register(element, e as Rc<dyn Eventable<u32>>);
        }
    }
    let mut scope = Scope::new();
    scope.use_plugin(&targets);
    let id = scope.new_interaction(PointerType::Mouse);
    (scope, id, depth - 1)
}

fn bench_pointer_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_pointer_events");
    group.sample_size(50);

    for &(depth, per_element) in &[(4_u32, 1_usize), (16, 1), (16, 4), (64, 2)] {
        group.bench_function(format!("tap(depth={depth},per={per_element})"), |b| {
            b.iter_batched(
                || chain(depth, per_element, false),
                |(mut scope, id, leaf)| {
                    let i = scope.interaction_mut(id).unwrap();
                    let p = Pointer::mouse(Point::new(5.0, 5.0));
                    i.pointer_down(p, RawEvent::new("pointerdown", 0), Some(leaf));
                    i.pointer_up(p, RawEvent::new("pointerup", 40), Some(leaf), None);
                    black_box(scope);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("hold_fire(depth=16,per=2)", |b| {
        b.iter_batched(
            || chain(16, 2, true),
            |(mut scope, id, leaf)| {
                let i = scope.interaction_mut(id).unwrap();
                let p = Pointer::mouse(Point::ZERO);
                i.pointer_down(p, RawEvent::new("pointerdown", 0), Some(leaf));
                scope.advance_timers(1_000);
                black_box(scope);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_pointer_events);
criterion_main!(benches);
