// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target collection, delivery, and the base plugin deriving `down`, `move`,
//! `up`, `cancel`, `tap`, `doubletap` and `hold` from interaction input.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, trace};
use understory_interaction::{
    HoldState, Interaction, Plugin, Pointer, PointerArgs, RawEvent, Scope,
};

use crate::error::ConfigError;
use crate::event::{PointerEvent, PointerEventType};
use crate::eventable::EventTarget;
use crate::options::PointerEventsOptions;
use crate::path::{ElementPath, ParentLookup, path_to_root};
use crate::signals::{CollectArgs, FiredArgs, PointerSignals};

/// Input of [`PointerEvents::fire`].
#[derive(Debug)]
pub struct FireArgs<K: 'static> {
    /// Kind of event to fire.
    pub event_type: PointerEventType,
    /// The pointer.
    pub pointer: Pointer,
    /// The platform event; its timestamp becomes the event's.
    pub event: RawEvent,
    /// Element the pointer is over.
    pub event_target: Option<K>,
    /// Pre-collected targets. Collected along the path of `event_target`
    /// when `None`.
    pub targets: Option<Vec<EventTarget<K>>>,
    /// Initial [`PointerEvent::count`].
    pub count: u32,
}

impl<K: 'static> FireArgs<K> {
    /// Fire `event_type` for `pointer` over `event_target`.
    #[must_use]
    pub fn new(
        event_type: PointerEventType,
        pointer: Pointer,
        event: RawEvent,
        event_target: Option<K>,
    ) -> Self {
        Self {
            event_type,
            pointer,
            event,
            event_target,
            targets: None,
            count: 0,
        }
    }

    /// Deliver to `targets` instead of collecting.
    #[must_use]
    pub fn with_targets(mut self, targets: Vec<EventTarget<K>>) -> Self {
        self.targets = Some(targets);
        self
    }

    /// Start the event's count at `count`.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

struct Inner<K: 'static> {
    signals: PointerSignals<K>,
    options: PointerEventsOptions,
    parents: Box<dyn ParentLookup<K>>,
}

/// The pointer-event pipeline.
///
/// Cloning is cheap and clones share channels, options and the parent
/// lookup. Install it on a [`Scope`] with [`Scope::use_plugin`] to have
/// events derived from interaction input; [`fire`](Self::fire) can also be
/// called directly.
pub struct PointerEvents<K: 'static> {
    inner: Rc<Inner<K>>,
}

impl<K: 'static> Clone for PointerEvents<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: 'static> fmt::Debug for PointerEvents<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerEvents")
            .field("signals", &self.inner.signals)
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + 'static> PointerEvents<K> {
    /// Id under which the pipeline installs itself.
    pub const PLUGIN_ID: &'static str = "pointer-events/base";

    /// A pipeline with default options, walking paths with `parents`.
    pub fn new(parents: impl ParentLookup<K> + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                signals: PointerSignals::default(),
                options: PointerEventsOptions::default(),
                parents: Box::new(parents),
            }),
        }
    }

    /// A pipeline with validated options.
    ///
    /// # Errors
    ///
    /// Returns the validation error of `options`.
    pub fn with_options(
        parents: impl ParentLookup<K> + 'static,
        options: PointerEventsOptions,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            inner: Rc::new(Inner {
                signals: PointerSignals::default(),
                options,
                parents: Box::new(parents),
            }),
        })
    }

    /// The pipeline's channels.
    #[must_use]
    pub fn signals(&self) -> &PointerSignals<K> {
        &self.inner.signals
    }

    /// The pipeline's options.
    #[must_use]
    pub fn options(&self) -> &PointerEventsOptions {
        &self.inner.options
    }

    /// `target` and its ancestors, innermost first.
    #[must_use]
    pub fn path(&self, target: K) -> ElementPath<K> {
        path_to_root(target, &*self.inner.parents)
    }

    /// Collect the targets `args` would be delivered to.
    ///
    /// A tap collects nothing if the pointer moved or was released over a
    /// different element than it went down on. Hold targets are limited to
    /// those whose hold duration armed the pointer's timer.
    pub fn collect_event_targets(
        &self,
        interaction: &mut Interaction<K>,
        args: &FireArgs<K>,
    ) -> Vec<EventTarget<K>> {
        let info = interaction.pointer_info(&args.pointer);
        let down_target = info.map(|info| info.down_target);
        let hold_duration = info.and_then(|info| info.hold).and_then(|hold| hold.duration);

        if args.event_type == PointerEventType::Tap
            && (interaction.pointer_was_moved() || down_target != Some(args.event_target))
        {
            trace!(
                interaction = interaction.id().0,
                moved = interaction.pointer_was_moved(),
                "tap suppressed"
            );
            return Vec::new();
        }

        let mut targets = self.walk_path(interaction, args);
        if args.event_type == PointerEventType::Hold {
            targets.retain(|t| Some(t.eventable.options().hold_duration) == hold_duration);
        }
        targets
    }

    /// Deliver an event to its targets, innermost first, and return it.
    ///
    /// Each target gets its props applied and coordinates relative to its
    /// eventable's origin. Delivery stops after a target that called
    /// [`stop_immediate_propagation`](PointerEvent::stop_immediate_propagation),
    /// or that called [`stop_propagation`](PointerEvent::stop_propagation)
    /// when the next target is on another element. `fired` runs afterwards.
    ///
    /// A tap updates the interaction's previous-tap record; a tap completing
    /// a double-tap first fires a `doubletap`, which becomes the record.
    pub fn fire(&self, interaction: &mut Interaction<K>, mut args: FireArgs<K>) -> PointerEvent<K> {
        let targets = match args.targets.take() {
            Some(targets) => targets,
            None => self.collect_event_targets(interaction, &args),
        };

        let mut event = PointerEvent::for_interaction(
            args.event_type,
            &args.pointer,
            args.event.time_stamp,
            args.event_target,
            interaction,
            &self.inner.options,
        );
        event.count = args.count;
        self.inner.signals.new.fire(interaction, &mut event);

        for (i, target) in targets.iter().enumerate() {
            target.props.apply(&mut event);
            let origin = target.eventable.origin(target.element);
            event.subtract_origin(origin);
            event.current_target = Some(target.element);
            target.eventable.fire(interaction, &mut event);
            event.add_origin(origin);

            if event.immediate_propagation_stopped()
                || (event.propagation_stopped()
                    && targets
                        .get(i + 1)
                        .is_some_and(|next| event.current_target != Some(next.element)))
            {
                break;
            }
        }

        trace!(
            interaction = interaction.id().0,
            event_type = %args.event_type,
            targets = targets.len(),
            "pointer event fired"
        );

        let mut fired = FiredArgs {
            pointer: args.pointer,
            event: args.event,
            event_target: args.event_target,
            targets,
            pointer_event: event,
        };
        self.inner.signals.fired.fire(interaction, &mut fired);
        let event = fired.pointer_event;

        if event.event_type == PointerEventType::Tap {
            let record = if event.double {
                debug!(interaction = interaction.id().0, "double-tap");
                let double = self.fire(
                    interaction,
                    FireArgs::new(
                        PointerEventType::DoubleTap,
                        fired.pointer,
                        fired.event,
                        fired.event_target,
                    ),
                );
                double.to_tap_record()
            } else {
                event.to_tap_record()
            };
            interaction.set_prev_tap(Some(record));
        }

        event
    }

    fn walk_path(
        &self,
        interaction: &mut Interaction<K>,
        args: &FireArgs<K>,
    ) -> Vec<EventTarget<K>> {
        let Some(target) = args.event_target else {
            return Vec::new();
        };
        let mut collect = CollectArgs {
            event_type: args.event_type,
            pointer: args.pointer,
            event: args.event.clone(),
            event_target: args.event_target,
            element: target,
            targets: Vec::new(),
        };
        for element in self.path(target) {
            collect.element = element;
            self.inner.signals.collect_targets.fire(interaction, &mut collect);
        }
        collect.targets
    }

    /// Arm the hold timer of a pointer that just went down.
    fn arm_hold(&self, interaction: &mut Interaction<K>, down: &PointerArgs<K>) {
        let probe = FireArgs::new(
            PointerEventType::Hold,
            down.pointer,
            down.event.clone(),
            down.event_target,
        );
        let targets = self.walk_path(interaction, &probe);
        let Some(duration) = targets
            .iter()
            .map(|t| t.eventable.options().hold_duration)
            .min()
        else {
            return;
        };

        let due = down.event.time_stamp.saturating_add(duration);
        let pipeline = self.clone();
        let FireArgs {
            pointer,
            event,
            event_target,
            ..
        } = probe;
        let timer = interaction.schedule(due, move |interaction, due| {
            if let Some(hold) = interaction
                .pointer_index(&pointer)
                .and_then(|i| interaction.pointer_mut(i))
                .and_then(|info| info.hold.as_mut())
            {
                hold.timer = None;
            }
            debug!(interaction = interaction.id().0, due, "hold timer fired");
            let event = RawEvent::new(event.event_type, due);
            pipeline.fire(
                interaction,
                FireArgs::new(PointerEventType::Hold, pointer, event, event_target),
            );
        });

        if let Some(info) = interaction.pointer_mut(down.pointer_index) {
            info.hold = Some(HoldState {
                duration: Some(duration),
                timer: Some(timer),
            });
        }
        debug!(
            interaction = interaction.id().0,
            pointer_index = down.pointer_index,
            duration,
            due,
            "hold timer armed"
        );
    }
}

/// Cancel the pending hold timer of pointer `index`, if any.
fn cancel_hold<K: Copy + PartialEq + 'static>(interaction: &mut Interaction<K>, index: usize) {
    let Some(timer) = interaction
        .pointer_mut(index)
        .and_then(|info| info.hold.as_mut())
        .and_then(|hold| hold.timer.take())
    else {
        return;
    };
    if interaction.cancel_timer(timer) {
        debug!(
            interaction = interaction.id().0,
            pointer_index = index,
            "hold timer cancelled"
        );
    }
}

impl<K: Copy + Eq + 'static> Plugin<K> for PointerEvents<K> {
    fn id(&self) -> &'static str {
        Self::PLUGIN_ID
    }

    fn install(&self, scope: &mut Scope<K>) {
        let signals = Rc::clone(scope.signals());

        signals.new.observe(|interaction, _| {
            interaction.set_prev_tap(None);
        });

        signals.update_pointer.observe(|interaction, args| {
            let Some(info) = interaction.pointer_mut(args.pointer_index) else {
                return;
            };
            if !args.down && info.hold.is_some() {
                return;
            }
            let stale = info.hold.replace(HoldState::default()).and_then(|h| h.timer);
            if let Some(timer) = stale {
                interaction.cancel_timer(timer);
            }
        });

        let pipeline = self.clone();
        signals.pointer_move.observe(move |interaction, args| {
            let down = interaction.pointer_is_down();
            if args.duplicate || (down && !interaction.pointer_was_moved()) {
                return;
            }
            if down && let Some(index) = args.pointer_index {
                cancel_hold(interaction, index);
            }
            pipeline.fire(
                interaction,
                FireArgs::new(
                    PointerEventType::Move,
                    args.pointer,
                    args.event.clone(),
                    args.event_target,
                ),
            );
        });

        let pipeline = self.clone();
        signals.pointer_down.observe(move |interaction, args| {
            pipeline.arm_hold(interaction, args);
        });

        signals.pointer_up.observe(|interaction, args| {
            cancel_hold(interaction, args.pointer_index);
        });
        signals.pointer_cancel.observe(|interaction, args| {
            cancel_hold(interaction, args.pointer_index);
        });

        let pipeline = self.clone();
        signals.pointer_down.observe(move |interaction, args| {
            pipeline.fire(
                interaction,
                FireArgs::new(
                    PointerEventType::Down,
                    args.pointer,
                    args.event.clone(),
                    args.event_target,
                ),
            );
        });
        let pipeline = self.clone();
        signals.pointer_up.observe(move |interaction, args| {
            pipeline.fire(
                interaction,
                FireArgs::new(
                    PointerEventType::Up,
                    args.pointer,
                    args.event.clone(),
                    args.event_target,
                ),
            );
        });
        let pipeline = self.clone();
        signals.pointer_cancel.observe(move |interaction, args| {
            pipeline.fire(
                interaction,
                FireArgs::new(
                    PointerEventType::Cancel,
                    args.pointer,
                    args.event.clone(),
                    args.event_target,
                ),
            );
        });

        let pipeline = self.clone();
        signals.pointer_up.observe(move |interaction, args| {
            if interaction.pointer_was_moved() {
                return;
            }
            pipeline.fire(
                interaction,
                FireArgs::new(
                    PointerEventType::Tap,
                    args.pointer,
                    args.event.clone(),
                    args.event_target,
                ),
            );
        });
    }
}
