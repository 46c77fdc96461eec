// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Channels of the pointer-event pipeline.

use alloc::vec::Vec;
use core::fmt;

use understory_interaction::{Channel, Pointer, RawEvent, Signal};

use crate::event::{PointerEvent, PointerEventType};
use crate::eventable::EventTarget;

/// Payload of `collect_targets`, fired once per element of the path.
///
/// Listeners push the eventables acting for `element` onto `targets`.
pub struct CollectArgs<K: 'static> {
    /// Kind of event being collected for.
    pub event_type: PointerEventType,
    /// The pointer.
    pub pointer: Pointer,
    /// The platform event.
    pub event: RawEvent,
    /// Element the pointer was over.
    pub event_target: Option<K>,
    /// The path element currently being visited.
    pub element: K,
    /// Targets collected so far, innermost first.
    pub targets: Vec<EventTarget<K>>,
}

impl<K: fmt::Debug + 'static> fmt::Debug for CollectArgs<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectArgs")
            .field("event_type", &self.event_type)
            .field("pointer", &self.pointer)
            .field("event", &self.event)
            .field("event_target", &self.event_target)
            .field("element", &self.element)
            .field("targets", &self.targets)
            .finish()
    }
}

/// Payload of `fired`.
pub struct FiredArgs<K: 'static> {
    /// The pointer.
    pub pointer: Pointer,
    /// The platform event.
    pub event: RawEvent,
    /// Element the pointer was over.
    pub event_target: Option<K>,
    /// Every collected target, including ones skipped by propagation stops.
    pub targets: Vec<EventTarget<K>>,
    /// The event after delivery.
    pub pointer_event: PointerEvent<K>,
}

impl<K: fmt::Debug + 'static> fmt::Debug for FiredArgs<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiredArgs")
            .field("pointer", &self.pointer)
            .field("event", &self.event)
            .field("event_target", &self.event_target)
            .field("targets", &self.targets)
            .field("pointer_event", &self.pointer_event)
            .finish()
    }
}

/// The pipeline's own channels.
pub struct PointerSignals<K: 'static> {
    /// An event was constructed and is about to be delivered.
    pub new: Channel<K, PointerEvent<K>>,
    /// Targets are being collected for one path element.
    pub collect_targets: Channel<K, CollectArgs<K>>,
    /// An event finished delivery.
    pub fired: Channel<K, FiredArgs<K>>,
}

impl<K: 'static> fmt::Debug for PointerSignals<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerSignals")
            .field("new", &self.new)
            .field("collect_targets", &self.collect_targets)
            .field("fired", &self.fired)
            .finish()
    }
}

impl<K: 'static> Default for PointerSignals<K> {
    fn default() -> Self {
        Self {
            new: Signal::new(),
            collect_targets: Signal::new(),
            fired: Signal::new(),
        }
    }
}
