// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Receivers of pointer events.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;
use understory_interaction::Interaction;

use crate::error::ConfigError;
use crate::event::{PointerEvent, PointerEventType};
use crate::options::EventableOptions;

/// Something that can receive pointer events on behalf of elements.
///
/// Registering eventables against elements is up to the embedder, usually
/// through a `collect_targets` listener such as
/// [`ElementTargets`](crate::ElementTargets).
pub trait Eventable<K: 'static> {
    /// Hold timing and origin.
    fn options(&self) -> &EventableOptions;

    /// Origin subtracted from event coordinates for `element`.
    fn origin(&self, _element: K) -> Point {
        self.options().origin
    }

    /// Whether this eventable wants `event_type` at all.
    fn listens_to(&self, _event_type: PointerEventType) -> bool {
        true
    }

    /// Deliver `event`.
    fn fire(&self, interaction: &mut Interaction<K>, event: &mut PointerEvent<K>);
}

/// Per-target overrides copied onto the event before delivery.
///
/// Only the fields that are `Some` are copied, so a value set by an earlier
/// target stays visible to later ones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetProps {
    /// Overrides [`PointerEvent::tag`].
    pub tag: Option<&'static str>,
    /// Overrides [`PointerEvent::count`].
    pub count: Option<u32>,
}

impl TargetProps {
    /// Copy the present overrides onto `event`.
    pub fn apply<K>(&self, event: &mut PointerEvent<K>) {
        if let Some(tag) = self.tag {
            event.tag = Some(tag);
        }
        if let Some(count) = self.count {
            event.count = count;
        }
    }
}

/// One collected delivery: an eventable acting for an element.
pub struct EventTarget<K: 'static> {
    /// The receiver.
    pub eventable: Rc<dyn Eventable<K>>,
    /// The element it receives for.
    pub element: K,
    /// Overrides applied before delivery.
    pub props: TargetProps,
}

impl<K: 'static> EventTarget<K> {
    /// A target without overrides.
    pub fn new(eventable: Rc<dyn Eventable<K>>, element: K) -> Self {
        Self {
            eventable,
            element,
            props: TargetProps::default(),
        }
    }

    /// Replace the overrides.
    #[must_use]
    pub fn with_props(mut self, props: TargetProps) -> Self {
        self.props = props;
        self
    }
}

impl<K: Copy + 'static> Clone for EventTarget<K> {
    fn clone(&self) -> Self {
        Self {
            eventable: Rc::clone(&self.eventable),
            element: self.element,
            props: self.props,
        }
    }
}

impl<K: fmt::Debug + 'static> fmt::Debug for EventTarget<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTarget")
            .field("element", &self.element)
            .field("props", &self.props)
            .field("options", self.eventable.options())
            .finish_non_exhaustive()
    }
}

type Listener<K> = Rc<dyn Fn(&mut Interaction<K>, &mut PointerEvent<K>)>;

/// An [`Eventable`] that dispatches to closures registered per event type.
///
/// Listeners for one type run in registration order until one of them calls
/// [`PointerEvent::stop_immediate_propagation`].
pub struct CallbackEventable<K: 'static> {
    options: EventableOptions,
    listeners: RefCell<Vec<(PointerEventType, Listener<K>)>>,
}

impl<K: 'static> fmt::Debug for CallbackEventable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<_> = self.listeners.borrow().iter().map(|(t, _)| *t).collect();
        f.debug_struct("CallbackEventable")
            .field("options", &self.options)
            .field("listeners", &types)
            .finish()
    }
}

impl<K: 'static> Default for CallbackEventable<K> {
    fn default() -> Self {
        Self {
            options: EventableOptions::default(),
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<K: 'static> CallbackEventable<K> {
    /// An eventable with default options and no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An eventable with validated options.
    ///
    /// # Errors
    ///
    /// Returns the validation error of `options`.
    pub fn with_options(options: EventableOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    /// Add a listener for `event_type`.
    pub fn on(
        &self,
        event_type: PointerEventType,
        listener: impl Fn(&mut Interaction<K>, &mut PointerEvent<K>) + 'static,
    ) {
        self.listeners
            .borrow_mut()
            .push((event_type, Rc::new(listener)));
    }

    /// Remove every listener for `event_type`. Returns how many were removed.
    pub fn clear(&self, event_type: PointerEventType) -> usize {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(t, _)| *t != event_type);
        before - listeners.len()
    }
}

impl<K: 'static> Eventable<K> for CallbackEventable<K> {
    fn options(&self) -> &EventableOptions {
        &self.options
    }

    fn listens_to(&self, event_type: PointerEventType) -> bool {
        self.listeners.borrow().iter().any(|(t, _)| *t == event_type)
    }

    fn fire(&self, interaction: &mut Interaction<K>, event: &mut PointerEvent<K>) {
        // Listeners may register more listeners while running.
        let snapshot: SmallVec<[Listener<K>; 4]> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(t, _)| *t == event.event_type)
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener(interaction, event);
            if event.immediate_propagation_stopped() {
                break;
            }
        }
    }
}
