// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pointer_events --heading-base-level=0

//! Understory Pointer Events: discrete, target-addressed pointer events.
//!
//! [`PointerEvents`] listens to the low-level channels of an
//! [`understory_interaction::Scope`] and derives `down`, `move`, `up`,
//! `cancel`, `tap`, `doubletap` and `hold` events from them. Each event is
//! delivered to targets collected along the ancestor path of the element
//! under the pointer, innermost first:
//!
//! - targets are [`Eventable`]s acting for an element, contributed by
//!   listeners of the `collect_targets` channel (see [`ElementTargets`]);
//! - [`PointerEvent::stop_propagation`] stops delivery to other elements,
//!   [`PointerEvent::stop_immediate_propagation`] stops it outright;
//! - coordinates are made relative to each eventable's origin while it runs.
//!
//! Gestures:
//!
//! - `tap` fires on release if the pointer stayed within the move tolerance
//!   and was released over the element it went down on;
//! - a `tap` on the same target less than
//!   [`double_tap_interval`](PointerEventsOptions::double_tap_interval)
//!   after the previous one is flagged [`double`](PointerEvent::double) and
//!   followed by a `doubletap`;
//! - `hold` fires once the pointer has been down and still for the shortest
//!   [`hold_duration`](EventableOptions::hold_duration) among the targets
//!   under it. [`HoldRepeat`] keeps re-firing it.
//!
//! Hold timers live in the scope's timer queue, so embedders drive them with
//! [`Scope::advance_timers`](understory_interaction::Scope::advance_timers).
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::Point;
//! use understory_interaction::{Pointer, PointerType, RawEvent, Scope};
//! use understory_pointer_events::{
//!     CallbackEventable, ElementTargets, Eventable, PointerEventType, PointerEvents,
//! };
//!
//! // Element 2 is a child of element 1.
//! let pipeline = PointerEvents::new(|e: u32| (e == 2).then_some(1));
//! let registry = ElementTargets::new(&pipeline);
//!
//! let taps = Rc::new(Cell::new(0));
//! let button = Rc::new(CallbackEventable::new());
//! let seen = taps.clone();
//! button.on(PointerEventType::Tap, move |_, _| seen.set(seen.get() + 1));
//! registry.register(1, button as Rc<dyn Eventable<u32>>);
//!
//! let mut scope = Scope::<u32>::new();
//! scope.use_plugin(&registry);
//!
//! let id = scope.new_interaction(PointerType::Mouse);
//! let i = scope.interaction_mut(id).unwrap();
//! let p = Pointer::mouse(Point::new(3.0, 3.0));
//! i.pointer_down(p, RawEvent::new("pointerdown", 0), Some(2));
//! i.pointer_up(p, RawEvent::new("pointerup", 80), Some(2), None);
//!
//! assert_eq!(taps.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod element_targets;
mod error;
mod event;
mod eventable;
mod hold_repeat;
mod options;
mod path;
mod pipeline;
mod signals;

pub use element_targets::ElementTargets;
pub use error::ConfigError;
pub use event::{PointerEvent, PointerEventType};
pub use eventable::{CallbackEventable, EventTarget, Eventable, TargetProps};
pub use hold_repeat::HoldRepeat;
pub use options::{EventableOptions, PointerEventsOptions};
pub use path::{ElementPath, ParentLookup, path_to_root};
pub use pipeline::{FireArgs, PointerEvents};
pub use signals::{CollectArgs, FiredArgs, PointerSignals};
