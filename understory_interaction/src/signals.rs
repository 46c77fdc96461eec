// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The channel table shared by all interactions of a scope.
//!
//! Every channel is a [`Signal`] whose context is the [`Interaction`] that
//! fired it. Listeners receive the interaction by `&mut`, so they may inspect
//! its state and call back into it (for example [`Interaction::stop`]).
//!
//! Channel order within one input call:
//!
//! - `pointer_down`: `update_pointer`, then `pointer_down`.
//! - `pointer_move`: `update_pointer`, `pointer_move`, then the move phase if
//!   interacting.
//! - `pointer_up`: `pointer_up` or `pointer_cancel`, the end phase,
//!   `remove_pointer`.
//! - each phase: `before_action`, `action`, delivery to the interactable,
//!   `after_action`.
//!
//! Only [`before_action`](InteractionSignals::before_action) callers act on
//! [`Outcome::Veto`](understory_signal::Outcome::Veto); everywhere else a veto
//! merely skips the remaining listeners of that channel.

use alloc::borrow::Cow;
use core::fmt;

use kurbo::Vec2;
use understory_signal::Signal;

use crate::action::{ActionEvent, Phase};
use crate::interaction::Interaction;
use crate::pointer::{Pointer, RawEvent};

/// Payload of `pointer_down` and `remove_pointer`.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerArgs<K> {
    /// The reported pointer.
    pub pointer: Pointer,
    /// The platform event.
    pub event: RawEvent,
    /// Element under the pointer; always `None` for `remove_pointer`.
    pub event_target: Option<K>,
    /// Index into [`Interaction::pointers`].
    pub pointer_index: usize,
}

/// Payload of `update_pointer`.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdatePointerArgs<K> {
    /// The reported pointer.
    pub pointer: Pointer,
    /// The platform event.
    pub event: RawEvent,
    /// Element under the pointer.
    pub event_target: Option<K>,
    /// Index into [`Interaction::pointers`].
    pub pointer_index: usize,
    /// Whether this update was a down transition.
    pub down: bool,
}

/// Payload of `pointer_move`.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveArgs<K> {
    /// The reported pointer.
    pub pointer: Pointer,
    /// The platform event.
    pub event: RawEvent,
    /// Element under the pointer.
    pub event_target: Option<K>,
    /// Index into [`Interaction::pointers`], `None` if untracked.
    pub pointer_index: Option<usize>,
    /// Client displacement from the start snapshot, present only while the
    /// move tolerance was being checked.
    pub displacement: Option<Vec2>,
    /// `true` if the position is bit-identical to the previous one.
    pub duplicate: bool,
}

/// Payload of `pointer_up` and `pointer_cancel`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReleaseArgs<K> {
    /// The reported pointer.
    pub pointer: Pointer,
    /// The platform event.
    pub event: RawEvent,
    /// Element under the pointer.
    pub event_target: Option<K>,
    /// Element whose listener received the platform event.
    pub cur_event_target: Option<K>,
    /// Index into [`Interaction::pointers`].
    pub pointer_index: usize,
}

/// Payload of `blur`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlurArgs {
    /// The platform event, if any.
    pub event: Option<RawEvent>,
}

/// Payload of `before_action`, and the first half of [`ActionArgs`].
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseArgs<K> {
    /// The running phase.
    pub phase: Phase,
    /// Pointer that drove the phase, if any.
    pub pointer: Option<Pointer>,
    /// Platform event that drove the phase, if any.
    pub event: Option<RawEvent>,
    /// Element under the pointer.
    pub event_target: Option<K>,
    /// Marks the last move before an end.
    pub pre_end: bool,
    /// Overrides the action event type name.
    pub type_override: Option<Cow<'static, str>>,
}

impl<K> PhaseArgs<K> {
    /// Arguments for `phase` driven by `event`.
    #[must_use]
    pub fn new(phase: Phase, event: Option<RawEvent>) -> Self {
        Self {
            phase,
            pointer: None,
            event,
            event_target: None,
            pre_end: false,
            type_override: None,
        }
    }
}

/// Payload of `action` and `after_action`.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionArgs<K> {
    /// The phase arguments as seen by `before_action`.
    pub phase_args: PhaseArgs<K>,
    /// The event that will be (or was) delivered to the interactable.
    pub action_event: ActionEvent<K>,
}

/// A channel whose listeners receive the firing interaction as context.
pub type Channel<K, A> = Signal<Interaction<K>, A>;

/// `before_action`, `action` and `after_action` for one phase.
struct PhaseChannels<K: 'static> {
    before: Channel<K, PhaseArgs<K>>,
    action: Channel<K, ActionArgs<K>>,
    after: Channel<K, ActionArgs<K>>,
}

impl<K: 'static> PhaseChannels<K> {
    fn new() -> Self {
        Self {
            before: Signal::new(),
            action: Signal::new(),
            after: Signal::new(),
        }
    }
}

/// One typed channel per interaction lifecycle notification.
pub struct InteractionSignals<K: 'static> {
    /// An interaction was created.
    pub new: Channel<K, ()>,
    /// A pointer went down.
    pub pointer_down: Channel<K, PointerArgs<K>>,
    /// A pointer moved, including duplicate reports.
    pub pointer_move: Channel<K, MoveArgs<K>>,
    /// A pointer was released.
    pub pointer_up: Channel<K, ReleaseArgs<K>>,
    /// A pointer was cancelled by the platform.
    pub pointer_cancel: Channel<K, ReleaseArgs<K>>,
    /// A pointer record was created or refreshed.
    pub update_pointer: Channel<K, UpdatePointerArgs<K>>,
    /// A pointer record is about to be removed.
    pub remove_pointer: Channel<K, PointerArgs<K>>,
    /// The document lost focus.
    pub blur: Channel<K, BlurArgs>,
    /// The interaction stopped.
    pub stop: Channel<K, ()>,
    /// The interaction is being torn down; side state keyed by its id
    /// should be dropped.
    pub destroy: Channel<K, ()>,
    phases: [PhaseChannels<K>; 3],
}

impl<K: 'static> fmt::Debug for InteractionSignals<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionSignals")
            .field("new", &self.new)
            .field("pointer_down", &self.pointer_down)
            .field("pointer_move", &self.pointer_move)
            .field("pointer_up", &self.pointer_up)
            .field("pointer_cancel", &self.pointer_cancel)
            .field("update_pointer", &self.update_pointer)
            .field("remove_pointer", &self.remove_pointer)
            .field("blur", &self.blur)
            .field("stop", &self.stop)
            .field("destroy", &self.destroy)
            .finish_non_exhaustive()
    }
}

impl<K: 'static> Default for InteractionSignals<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: 'static> InteractionSignals<K> {
    /// A table with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            new: Signal::new(),
            pointer_down: Signal::new(),
            pointer_move: Signal::new(),
            pointer_up: Signal::new(),
            pointer_cancel: Signal::new(),
            update_pointer: Signal::new(),
            remove_pointer: Signal::new(),
            blur: Signal::new(),
            stop: Signal::new(),
            destroy: Signal::new(),
            phases: [PhaseChannels::new(), PhaseChannels::new(), PhaseChannels::new()],
        }
    }

    fn phase(&self, phase: Phase) -> &PhaseChannels<K> {
        &self.phases[phase as usize]
    }

    /// Fired before the action event of `phase` is created. A veto aborts the
    /// phase.
    #[must_use]
    pub fn before_action(&self, phase: Phase) -> &Channel<K, PhaseArgs<K>> {
        &self.phase(phase).before
    }

    /// Fired after the action event of `phase` is created and before it is
    /// delivered. Listeners may adjust the event.
    #[must_use]
    pub fn action(&self, phase: Phase) -> &Channel<K, ActionArgs<K>> {
        &self.phase(phase).action
    }

    /// Fired after the action event of `phase` was delivered.
    #[must_use]
    pub fn after_action(&self, phase: Phase) -> &Channel<K, ActionArgs<K>> {
        &self.phase(phase).after
    }
}
