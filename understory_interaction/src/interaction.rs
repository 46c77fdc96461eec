// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-session interaction state machine.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use kurbo::{Rect, Vec2};
use tracing::{debug, trace};

use crate::action::{
    ActionEvent, ActionName, ActionProps, DeltaSource, Edges, Interactable, Phase, Prepared,
};
use crate::coords::CoordsSet;
use crate::options::InteractionOptions;
use crate::pointer::{Pointer, PointerInfo, PointerType, RawEvent, TapRecord};
use crate::proxy::InteractionProxy;
use crate::signals::{
    ActionArgs, BlurArgs, InteractionSignals, MoveArgs, PhaseArgs, PointerArgs, ReleaseArgs,
    UpdatePointerArgs,
};
use crate::timer::{TimerHandle, TimerQueue};

/// Identifier of an interaction, unique within its [`Scope`](crate::Scope).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractionId(pub u64);

/// Deferred work run against an interaction when its timer becomes due.
///
/// The second argument is the due time, which may be earlier than the time
/// the embedder advanced the clock to.
pub type TimerTask<K> = Box<dyn FnOnce(&mut Interaction<K>, u64)>;

pub(crate) type SharedTimers<K> = Rc<RefCell<TimerQueue<(InteractionId, TimerTask<K>)>>>;

/// The last pointer input seen, kept for replaying a phase without new input.
#[derive(Clone, Debug, PartialEq)]
pub struct LatestPointer<K> {
    /// The pointer.
    pub pointer: Pointer,
    /// The platform event.
    pub event: RawEvent,
    /// Element under the pointer.
    pub event_target: Option<K>,
}

/// Explicit input for [`Interaction::move_phase`].
///
/// Fields left `None` are taken from the latest pointer input.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveInput<K> {
    /// Pointer driving the move.
    pub pointer: Option<Pointer>,
    /// Platform event driving the move. Without one the delta is zeroed.
    pub event: Option<RawEvent>,
    /// Element under the pointer.
    pub event_target: Option<K>,
    /// Marks the last move before an end.
    pub pre_end: bool,
    /// Overrides the action event type name.
    pub type_override: Option<Cow<'static, str>>,
}

impl<K> Default for MoveInput<K> {
    fn default() -> Self {
        Self {
            pointer: None,
            event: None,
            event_target: None,
            pre_end: false,
            type_override: None,
        }
    }
}

/// One gesture session, from first contact to full release.
///
/// An interaction tracks every pointer that touches it, derives coordinates
/// and velocity from them, and runs the `start → move → end` phases of one
/// action at a time. Each phase fires `before_action`, `action` and
/// `after_action` on the scope's [`InteractionSignals`] around the delivery of
/// an [`ActionEvent`] to the [`Interactable`].
///
/// Interactions are created by a [`Scope`](crate::Scope) and driven by an
/// input binding through [`pointer_down`](Self::pointer_down),
/// [`pointer_move`](Self::pointer_move), [`pointer_up`](Self::pointer_up) and
/// [`document_blur`](Self::document_blur).
///
/// Runtime operations never fail loudly: a rejected [`start`](Self::start)
/// or a vetoed phase returns `false` and leaves state untouched.
pub struct Interaction<K: 'static> {
    id: InteractionId,
    pointer_type: PointerType,
    signals: Rc<InteractionSignals<K>>,
    timers: SharedTimers<K>,
    options: InteractionOptions,

    pointers: Vec<PointerInfo<K>>,
    prepared: Prepared,
    interactable: Option<Rc<dyn Interactable<K>>>,
    element: Option<K>,
    rect: Option<Rect>,
    edges: Edges,

    pointer_is_down: bool,
    pointer_was_moved: bool,
    interacting: bool,
    ending: bool,
    stopped: bool,
    simulation: bool,

    coords: CoordsSet,
    down_event: Option<RawEvent>,
    down_pointer: Option<Pointer>,
    latest: Option<LatestPointer<K>>,
    prev_event: Option<ActionEvent<K>>,

    prev_tap: Option<TapRecord<K>>,
    tap_time: u64,
}

impl<K: fmt::Debug + 'static> fmt::Debug for Interaction<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interaction")
            .field("id", &self.id)
            .field("pointer_type", &self.pointer_type)
            .field("pointers", &self.pointers)
            .field("prepared", &self.prepared)
            .field("has_interactable", &self.interactable.is_some())
            .field("element", &self.element)
            .field("rect", &self.rect)
            .field("edges", &self.edges)
            .field("pointer_is_down", &self.pointer_is_down)
            .field("pointer_was_moved", &self.pointer_was_moved)
            .field("interacting", &self.interacting)
            .field("coords", &self.coords)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + PartialEq + 'static> Interaction<K> {
    pub(crate) fn new(
        id: InteractionId,
        pointer_type: PointerType,
        signals: Rc<InteractionSignals<K>>,
        timers: SharedTimers<K>,
        options: InteractionOptions,
    ) -> Self {
        Self {
            id,
            pointer_type,
            signals,
            timers,
            options,
            pointers: Vec::new(),
            prepared: Prepared::default(),
            interactable: None,
            element: None,
            rect: None,
            edges: Edges::default(),
            pointer_is_down: false,
            pointer_was_moved: false,
            interacting: false,
            ending: false,
            stopped: true,
            simulation: false,
            coords: CoordsSet::default(),
            down_event: None,
            down_pointer: None,
            latest: None,
            prev_event: None,
            prev_tap: None,
            tap_time: 0,
        }
    }

    // --- Input -----------------------------------------------------------

    /// A pointer went down on `event_target`.
    ///
    /// Registers the pointer as a down transition and fires `pointer_down`.
    /// Arming an action is left to listeners, which call
    /// [`start`](Self::start).
    pub fn pointer_down(&mut self, pointer: Pointer, event: RawEvent, event_target: Option<K>) {
        let pointer_index = self.update_pointer(pointer, event.clone(), event_target, Some(true));
        let signals = Rc::clone(&self.signals);
        let mut args = PointerArgs {
            pointer,
            event,
            event_target,
            pointer_index,
        };
        signals.pointer_down.fire(self, &mut args);
    }

    /// A pointer moved.
    ///
    /// `pointer_move` fires for every report, duplicates included. Only
    /// non-duplicate reports update velocity, run the move phase while
    /// interacting, and (once the pointer counts as moved) advance the
    /// previous snapshot.
    pub fn pointer_move(&mut self, pointer: Pointer, event: RawEvent, event_target: Option<K>) {
        if !self.simulation {
            self.update_pointer(pointer, event.clone(), event_target, Some(false));
        }

        let duplicate = self.coords.is_duplicate();

        let mut displacement = None;
        if self.pointer_is_down && !self.pointer_was_moved {
            let d: Vec2 = self.coords.cur.client - self.coords.start.client;
            self.pointer_was_moved = d.hypot() > self.options.pointer_move_tolerance;
            displacement = Some(d);
        }

        if !duplicate {
            self.coords.update_velocity();
        }

        let signals = Rc::clone(&self.signals);
        let mut args = MoveArgs {
            pointer,
            event,
            event_target,
            pointer_index: self.pointer_index(&pointer),
            displacement,
            duplicate,
        };
        signals.pointer_move.fire(self, &mut args);

        if !duplicate && !self.simulation {
            if self.interacting {
                self.move_phase(Some(MoveInput {
                    pointer: Some(args.pointer),
                    event: Some(args.event),
                    event_target: args.event_target,
                    ..MoveInput::default()
                }));
            }
            if self.pointer_was_moved {
                self.coords.advance_prev();
            }
        }
    }

    /// A pointer was released or cancelled.
    ///
    /// An event whose type ends in `cancel` fires `pointer_cancel`, anything
    /// else `pointer_up`. The action is then ended, and the pointer removed.
    pub fn pointer_up(
        &mut self,
        pointer: Pointer,
        event: RawEvent,
        event_target: Option<K>,
        cur_event_target: Option<K>,
    ) {
        let pointer_index = match self.pointer_index(&pointer) {
            Some(i) => i,
            None => self.update_pointer(pointer, event.clone(), event_target, Some(false)),
        };

        let signals = Rc::clone(&self.signals);
        let mut args = ReleaseArgs {
            pointer,
            event,
            event_target,
            cur_event_target,
            pointer_index,
        };
        if args.event.is_cancel() {
            signals.pointer_cancel.fire(self, &mut args);
        } else {
            signals.pointer_up.fire(self, &mut args);
        }

        if !self.simulation {
            self.end(Some(args.event.clone()));
        }

        self.pointer_is_down = false;
        self.remove_pointer(&pointer, args.event);
    }

    /// The document lost focus without a matching release.
    ///
    /// Ends the current action, then fires `blur`.
    pub fn document_blur(&mut self, event: Option<RawEvent>) {
        self.end(event.clone());
        let signals = Rc::clone(&self.signals);
        signals.blur.fire(self, &mut BlurArgs { event });
    }

    // --- Pointer bookkeeping ---------------------------------------------

    /// Index of the record tracking `pointer`.
    ///
    /// Mouse and pen interactions have a single contact, so any pointer
    /// resolves to the last record. Touch pointers resolve by id.
    #[must_use]
    pub fn pointer_index(&self, pointer: &Pointer) -> Option<usize> {
        if self.pointer_type.is_single_contact() {
            self.pointers.len().checked_sub(1)
        } else {
            self.pointers.iter().position(|p| p.id == pointer.id)
        }
    }

    /// The record tracking `pointer`.
    #[must_use]
    pub fn pointer_info(&self, pointer: &Pointer) -> Option<&PointerInfo<K>> {
        self.pointer_index(pointer).and_then(|i| self.pointers.get(i))
    }

    /// Create or refresh the record for `pointer` and recompute coordinates.
    ///
    /// `down` forces the transition kind; with `None` it is inferred from
    /// the event type (see [`RawEvent::is_down`]). A down transition records
    /// the down time and target, and while idle also resets the start
    /// snapshot and the moved flag. Fires `update_pointer` and returns the
    /// pointer's index.
    pub fn update_pointer(
        &mut self,
        pointer: Pointer,
        event: RawEvent,
        event_target: Option<K>,
        down: Option<bool>,
    ) -> usize {
        let down = down.unwrap_or_else(|| event.is_down());

        let pointer_index = match self.pointer_index(&pointer) {
            Some(i) => {
                self.pointers[i].pointer = pointer;
                i
            }
            None => {
                self.pointers.push(PointerInfo::new(pointer));
                self.pointers.len() - 1
            }
        };

        self.coords
            .set_current(self.pointers.iter().map(|p| &p.pointer), event.time_stamp);
        self.coords.update_delta();

        if down {
            self.pointer_is_down = true;
            let info = &mut self.pointers[pointer_index];
            info.down_time = Some(self.coords.cur.time_stamp);
            info.down_target = event_target;
            self.down_pointer = Some(pointer);

            if !self.interacting {
                self.coords.reset_start();
                self.down_event = Some(event.clone());
                self.pointer_was_moved = false;
            }
        }

        self.latest = Some(LatestPointer {
            pointer,
            event: event.clone(),
            event_target,
        });

        let signals = Rc::clone(&self.signals);
        let mut args = UpdatePointerArgs {
            pointer,
            event,
            event_target,
            pointer_index,
            down,
        };
        signals.update_pointer.fire(self, &mut args);

        pointer_index
    }

    /// Fire `remove_pointer` and drop the record. No-op for untracked pointers.
    pub fn remove_pointer(&mut self, pointer: &Pointer, event: RawEvent) {
        let Some(pointer_index) = self.pointer_index(pointer) else {
            return;
        };

        let signals = Rc::clone(&self.signals);
        let mut args = PointerArgs {
            pointer: *pointer,
            event,
            event_target: None,
            pointer_index,
        };
        signals.remove_pointer.fire(self, &mut args);

        if pointer_index < self.pointers.len() {
            self.pointers.remove(pointer_index);
        }
    }

    // --- Action lifecycle --------------------------------------------------

    /// Start `action` on `element` of `interactable`.
    ///
    /// Fails, changing nothing, if already interacting, if no pointer is
    /// down, if fewer pointers are tracked than the action needs, or if the
    /// interactable has the action disabled. Otherwise runs the start phase
    /// and returns whether the interaction is now live. A vetoed start, or a
    /// listener calling [`stop`](Self::stop) during the phase, voids the
    /// start and clears the target pair again.
    ///
    /// This does not check other interactions for the same interactable and
    /// element; use [`Scope::start`](crate::Scope::start) for that.
    pub fn start(
        &mut self,
        action: ActionProps,
        interactable: Rc<dyn Interactable<K>>,
        element: K,
    ) -> bool {
        let reason = if self.interacting {
            Some("already interacting")
        } else if !self.pointer_is_down {
            Some("no pointer down")
        } else if self.pointers.len() < action.name.min_pointers() {
            Some("not enough pointers")
        } else if !interactable.action_enabled(action.name) {
            Some("action disabled")
        } else {
            None
        };
        if let Some(reason) = reason {
            debug!(interaction = self.id.0, action = %action.name, reason, "start rejected");
            return false;
        }

        self.prepared.copy_from(&action);
        self.rect = interactable.rect(element);
        self.interactable = Some(interactable);
        self.element = Some(element);
        self.edges = action.edges.unwrap_or_default();
        self.stopped = false;

        let mut args = PhaseArgs::new(Phase::Start, self.down_event.clone());
        args.pointer = self.down_pointer;
        let started = self.do_phase(args);
        self.interacting = started && !self.stopped;

        if !self.interacting {
            self.interactable = None;
            self.element = None;
            self.rect = None;
            self.prepared.name = None;
            self.prev_event = None;
            self.stopped = true;
        }
        debug!(
            interaction = self.id.0,
            action = %action.name,
            interacting = self.interacting,
            "start"
        );
        self.interacting
    }

    /// Run the move phase again.
    ///
    /// With `None`, or an input without an event, the delta is zeroed so
    /// that a move can be recomputed at the same coordinates (for example
    /// after a live option change). Missing input fields are taken from the
    /// latest pointer input. Returns the phase result, or `false` without
    /// running anything when not interacting.
    pub fn move_phase(&mut self, input: Option<MoveInput<K>>) -> bool {
        if !self.interacting {
            trace!(interaction = self.id.0, "move phase while not interacting");
            return false;
        }
        let input = input.unwrap_or_default();
        if input.event.is_none() {
            self.coords.zero_delta();
        }

        let latest = self.latest.as_ref();
        let args = PhaseArgs {
            phase: Phase::Move,
            pointer: input.pointer.or_else(|| latest.map(|l| l.pointer)),
            event: input.event.or_else(|| latest.map(|l| l.event.clone())),
            event_target: input
                .event_target
                .or_else(|| latest.and_then(|l| l.event_target)),
            pre_end: input.pre_end,
            type_override: input.type_override,
        };
        self.do_phase(args)
    }

    /// End the current action.
    ///
    /// Runs the end phase if interacting and stops the interaction only if
    /// the phase completed; a vetoed end leaves the interaction open.
    pub fn end(&mut self, event: Option<RawEvent>) {
        self.ending = true;
        let event = event.or_else(|| self.latest.as_ref().map(|l| l.event.clone()));

        let mut ended = false;
        if self.interacting {
            let mut args = PhaseArgs::new(Phase::End, event);
            args.pointer = self.latest.as_ref().map(|l| l.pointer);
            ended = self.do_phase(args);
        }

        self.ending = false;

        if ended {
            self.stop();
        }
    }

    /// Stop the interaction. Idempotent.
    ///
    /// Fires `stop`, then clears the target pair, the armed action name and
    /// the previous action event.
    pub fn stop(&mut self) {
        let signals = Rc::clone(&self.signals);
        signals.stop.fire(self, &mut ());

        self.interactable = None;
        self.element = None;
        self.interacting = false;
        self.stopped = true;
        self.prepared.name = None;
        self.prev_event = None;
        trace!(interaction = self.id.0, "stop");
    }

    /// Fire `destroy` and release the retained latest pointer input.
    pub fn destroy(&mut self) {
        let signals = Rc::clone(&self.signals);
        signals.destroy.fire(self, &mut ());
        self.latest = None;
    }

    fn do_phase(&mut self, args: PhaseArgs<K>) -> bool {
        let phase = args.phase;
        let Some(name) = self.prepared.name else {
            trace!(interaction = self.id.0, %phase, "phase without an armed action");
            return false;
        };

        if phase == Phase::Move
            && let (Some(rect), Some(interactable)) = (self.rect, self.interactable.as_ref())
        {
            let delta = match interactable.delta_source() {
                DeltaSource::Page => self.coords.delta.page,
                DeltaSource::Client => self.coords.delta.client,
            };
            self.rect = Some(self.edges.apply_delta(rect, delta));
        }

        let signals = Rc::clone(&self.signals);
        let mut phase_args = args;
        if signals
            .before_action(phase)
            .fire(self, &mut phase_args)
            .is_veto()
        {
            trace!(interaction = self.id.0, %phase, "phase vetoed");
            return false;
        }

        let action_event = self.create_action_event(name, &phase_args);
        let mut args = ActionArgs {
            phase_args,
            action_event,
        };
        signals.action(phase).fire(self, &mut args);

        if phase == Phase::Start {
            self.prev_event = Some(args.action_event.clone());
        }

        self.fire_event(&mut args.action_event);

        signals.after_action(phase).fire(self, &mut args);

        true
    }

    fn create_action_event(&self, name: ActionName, args: &PhaseArgs<K>) -> ActionEvent<K> {
        let coords = &self.coords;
        let (page, client, time_stamp) = match args.phase {
            Phase::Start => (coords.start.page, coords.start.client, coords.start.time_stamp),
            Phase::End => match &self.prev_event {
                Some(prev) => (prev.page, prev.client, coords.cur.time_stamp),
                None => (coords.cur.page, coords.cur.client, coords.cur.time_stamp),
            },
            Phase::Move => (coords.cur.page, coords.cur.client, coords.cur.time_stamp),
        };
        let delta = match (&self.prev_event, args.phase) {
            (_, Phase::Start) | (None, _) => Vec2::ZERO,
            (Some(prev), _) => page - prev.page,
        };

        let mut event = ActionEvent::new(self.id, name, args.phase);
        event.element = self.element;
        event.page = page;
        event.client = client;
        event.delta = delta;
        event.velocity = coords.velocity.page;
        event.rect = self.rect;
        event.edges = self.edges;
        event.time_stamp = time_stamp;
        event.pre_end = args.pre_end;
        event.type_override.clone_from(&args.type_override);
        event
    }

    fn fire_event(&mut self, event: &mut ActionEvent<K>) {
        if let Some(target) = self.interactable.clone() {
            target.fire(self, event);
        }
        if self
            .prev_event
            .as_ref()
            .is_none_or(|prev| event.time_stamp >= prev.time_stamp)
        {
            self.prev_event = Some(event.clone());
        }
    }

    // --- Timers --------------------------------------------------------------

    /// Run `task` against this interaction once the scope's clock reaches
    /// `due`.
    pub fn schedule(
        &mut self,
        due: u64,
        task: impl FnOnce(&mut Self, u64) + 'static,
    ) -> TimerHandle {
        self.timers
            .borrow_mut()
            .schedule(due, (self.id, Box::new(task)))
    }

    /// Cancel a pending timer. Returns `false` if it already ran or was
    /// cancelled.
    pub fn cancel_timer(&mut self, handle: TimerHandle) -> bool {
        self.timers.borrow_mut().cancel(handle).is_some()
    }

    // --- Accessors -------------------------------------------------------------

    /// Identifier within the owning scope.
    #[must_use]
    pub fn id(&self) -> InteractionId {
        self.id
    }

    /// Device kind, fixed at creation.
    #[must_use]
    pub fn pointer_type(&self) -> PointerType {
        self.pointer_type
    }

    /// The channel table shared with the scope.
    #[must_use]
    pub fn signals(&self) -> &Rc<InteractionSignals<K>> {
        &self.signals
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &InteractionOptions {
        &self.options
    }

    /// Tracked pointers in first-contact order.
    #[must_use]
    pub fn pointers(&self) -> &[PointerInfo<K>] {
        &self.pointers
    }

    /// Mutable access to one pointer record.
    pub fn pointer_mut(&mut self, index: usize) -> Option<&mut PointerInfo<K>> {
        self.pointers.get_mut(index)
    }

    /// The armed action.
    #[must_use]
    pub fn prepared(&self) -> &Prepared {
        &self.prepared
    }

    /// The action running right now, if interacting.
    #[must_use]
    pub fn current_action(&self) -> Option<ActionName> {
        if self.interacting {
            self.prepared.name
        } else {
            None
        }
    }

    /// Target of the running action.
    #[must_use]
    pub fn interactable(&self) -> Option<&Rc<dyn Interactable<K>>> {
        self.interactable.as_ref()
    }

    /// Element of the running action.
    #[must_use]
    pub fn element(&self) -> Option<K> {
        self.element
    }

    /// Live target rectangle.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Replace the live target rectangle.
    pub fn set_rect(&mut self, rect: Option<Rect>) {
        self.rect = rect;
    }

    /// Edges following the pointer.
    #[must_use]
    pub fn edges(&self) -> Edges {
        self.edges
    }

    /// Replace the edges following the pointer.
    pub fn set_edges(&mut self, edges: Edges) {
        self.edges = edges;
    }

    /// Whether a pointer is currently down.
    #[must_use]
    pub fn pointer_is_down(&self) -> bool {
        self.pointer_is_down
    }

    /// Whether the pointer travelled past the tolerance since going down.
    #[must_use]
    pub fn pointer_was_moved(&self) -> bool {
        self.pointer_was_moved
    }

    /// Whether an action is running.
    #[must_use]
    pub fn interacting(&self) -> bool {
        self.interacting
    }

    /// Whether the end phase is running.
    #[must_use]
    pub fn is_ending(&self) -> bool {
        self.ending
    }

    /// Whether the interaction was stopped and not restarted.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Whether a simulated action (for example inertia) owns the coordinates.
    #[must_use]
    pub fn simulation(&self) -> bool {
        self.simulation
    }

    /// Mark a simulated action as running or finished.
    ///
    /// While set, input does not update pointer coordinates, moves do not run
    /// the move phase, and releases do not end the action.
    pub fn set_simulation(&mut self, simulation: bool) {
        self.simulation = simulation;
    }

    /// Coordinate snapshots.
    #[must_use]
    pub fn coords(&self) -> &CoordsSet {
        &self.coords
    }

    /// The event of the last down transition while idle.
    #[must_use]
    pub fn down_event(&self) -> Option<&RawEvent> {
        self.down_event.as_ref()
    }

    /// The pointer of the last down transition.
    #[must_use]
    pub fn down_pointer(&self) -> Option<&Pointer> {
        self.down_pointer.as_ref()
    }

    /// The latest pointer input, until [`destroy`](Self::destroy).
    #[must_use]
    pub fn latest_pointer(&self) -> Option<&LatestPointer<K>> {
        self.latest.as_ref()
    }

    /// The last delivered action event.
    #[must_use]
    pub fn prev_event(&self) -> Option<&ActionEvent<K>> {
        self.prev_event.as_ref()
    }

    /// The most recent tap or doubletap.
    #[must_use]
    pub fn prev_tap(&self) -> Option<&TapRecord<K>> {
        self.prev_tap.as_ref()
    }

    /// Timestamp of the most recent tap, `0` before the first.
    #[must_use]
    pub fn tap_time(&self) -> u64 {
        self.tap_time
    }

    /// Record a tap, or forget the previous one with `None`.
    pub fn set_prev_tap(&mut self, tap: Option<TapRecord<K>>) {
        self.tap_time = tap.as_ref().map_or(0, |t| t.time_stamp);
        self.prev_tap = tap;
    }

    /// The statically declared facade over this interaction.
    pub fn proxy(&mut self) -> InteractionProxy<'_, K> {
        InteractionProxy::new(self)
    }
}
