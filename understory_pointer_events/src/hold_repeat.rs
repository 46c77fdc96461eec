// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repeated `hold` events while a pointer stays down.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;
use tracing::debug;
use understory_interaction::{
    Interaction, InteractionId, Plugin, RawEvent, Scope, TimerHandle,
};

use crate::event::PointerEventType;
use crate::pipeline::{FireArgs, PointerEvents};

type Pending = Rc<RefCell<HashMap<InteractionId, TimerHandle>>>;

/// Re-fires `hold` every `hold_repeat_interval` milliseconds.
///
/// The interval is read from the first target's eventable after each `hold`;
/// `0` means no repeat. Each repeat carries a `count` one higher than the
/// previous `hold`. Repeating stops on a real move, on `up` or `cancel`, and
/// when the interaction stops or is destroyed. Installing this plugin
/// installs the base pipeline too.
pub struct HoldRepeat<K: 'static> {
    pipeline: PointerEvents<K>,
    pending: Pending,
}

impl<K: 'static> fmt::Debug for HoldRepeat<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoldRepeat")
            .field("pending", &self.pending.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + 'static> HoldRepeat<K> {
    /// Id under which the plugin installs itself.
    pub const PLUGIN_ID: &'static str = "pointer-events/hold-repeat";

    /// Repeat holds fired by `pipeline`.
    #[must_use]
    pub fn new(pipeline: &PointerEvents<K>) -> Self {
        Self {
            pipeline: pipeline.clone(),
            pending: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Whether a repeat is scheduled for `interaction`.
    #[must_use]
    pub fn is_repeating(&self, interaction: InteractionId) -> bool {
        self.pending.borrow().contains_key(&interaction)
    }
}

fn cancel_repeat<K: Copy + PartialEq + 'static>(
    pending: &Pending,
    interaction: &mut Interaction<K>,
) {
    let handle = pending.borrow_mut().remove(&interaction.id());
    if let Some(handle) = handle
        && interaction.cancel_timer(handle)
    {
        debug!(interaction = interaction.id().0, "hold repeat cancelled");
    }
}

impl<K: Copy + Eq + 'static> Plugin<K> for HoldRepeat<K> {
    fn id(&self) -> &'static str {
        Self::PLUGIN_ID
    }

    fn install(&self, scope: &mut Scope<K>) {
        scope.use_plugin(&self.pipeline);

        let events = self.pipeline.signals();
        events.new.observe(|_, event| {
            if event.event_type == PointerEventType::Hold {
                event.count += 1;
            }
        });

        let pipeline = self.pipeline.clone();
        let pending = Rc::clone(&self.pending);
        events.fired.observe(move |interaction, args| {
            if args.pointer_event.event_type != PointerEventType::Hold {
                return;
            }
            let Some(first) = args.targets.first() else {
                return;
            };
            let interval = first.eventable.options().hold_repeat_interval;
            if interval == 0 {
                return;
            }

            let due = args.pointer_event.time_stamp.saturating_add(interval);
            let count = args.pointer_event.count;
            let (pointer, event_type, event_target) =
                (args.pointer, args.event.event_type.clone(), args.event_target);
            let next = pipeline.clone();
            let owner = Rc::clone(&pending);
            let handle = interaction.schedule(due, move |interaction, due| {
                owner.borrow_mut().remove(&interaction.id());
                next.fire(
                    interaction,
                    FireArgs::new(
                        PointerEventType::Hold,
                        pointer,
                        RawEvent::new(event_type, due),
                        event_target,
                    )
                    .with_count(count),
                );
            });
            let replaced = pending.borrow_mut().insert(interaction.id(), handle);
            if let Some(old) = replaced {
                interaction.cancel_timer(old);
            }
            debug!(
                interaction = interaction.id().0,
                count,
                due,
                "hold repeat scheduled"
            );
        });

        let signals = Rc::clone(scope.signals());

        let pending = Rc::clone(&self.pending);
        signals.pointer_move.observe(move |interaction, args| {
            if args.duplicate || (interaction.pointer_is_down() && !interaction.pointer_was_moved())
            {
                return;
            }
            cancel_repeat(&pending, interaction);
        });
        let pending = Rc::clone(&self.pending);
        signals.pointer_up.observe(move |interaction, _| {
            cancel_repeat(&pending, interaction);
        });
        let pending = Rc::clone(&self.pending);
        signals.pointer_cancel.observe(move |interaction, _| {
            cancel_repeat(&pending, interaction);
        });
        let pending = Rc::clone(&self.pending);
        signals.stop.observe(move |interaction, _| {
            cancel_repeat(&pending, interaction);
        });
        let pending = Rc::clone(&self.pending);
        signals.destroy.observe(move |interaction, _| {
            cancel_repeat(&pending, interaction);
        });
    }
}
