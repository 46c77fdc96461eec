// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_interaction --heading-base-level=0

//! Understory Interaction: multi-pointer gesture sessions.
//!
//! An [`Interaction`] turns a stream of raw pointer contacts into one coherent
//! session. It keeps a record per contact point ([`PointerInfo`]), derives
//! start/previous/current coordinates, deltas and velocity ([`CoordsSet`]),
//! suppresses jitter below a tolerance and duplicate move reports, and runs
//! the `start → move → end` phases of one action at a time.
//!
//! Concrete actions (drag math, resizing, inertia, snapping) are not part of
//! this crate. They plug in through typed channels on [`InteractionSignals`]:
//!
//! - low-level input: `new`, `pointer_down`, `pointer_move`, `pointer_up`,
//!   `pointer_cancel`, `update_pointer`, `remove_pointer`, `blur`, `stop`,
//!   `destroy`;
//! - around every phase: [`before_action`](InteractionSignals::before_action)
//!   (may veto), [`action`](InteractionSignals::action) (may adjust the
//!   event), [`after_action`](InteractionSignals::after_action).
//!
//! A [`Scope`] owns the interactions of one document, the shared channel
//! table, a deterministic [`TimerQueue`] for dwell gestures, and the set of
//! installed [`Plugin`]s.
//!
//! ## Failing closed
//!
//! Operations never panic on bad sequences. [`Interaction::start`] returns
//! `false` when preconditions fail, a vetoed phase returns `false` without
//! constructing an event, and releases of untracked pointers are registered
//! first instead of indexing out of range.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use understory_interaction::{
//!     ActionEvent, ActionName, ActionProps, Interactable, Interaction, Pointer, PointerType,
//!     RawEvent, Scope,
//! };
//!
//! #[derive(Default)]
//! struct Log(RefCell<Vec<String>>);
//!
//! impl Interactable<u32> for Log {
//!     fn action_enabled(&self, _: ActionName) -> bool { true }
//!     fn rect(&self, _: u32) -> Option<Rect> { Some(Rect::new(0.0, 0.0, 10.0, 10.0)) }
//!     fn fire(&self, _: &mut Interaction<u32>, ev: &mut ActionEvent<u32>) {
//!         self.0.borrow_mut().push(ev.event_type().into_owned());
//!     }
//! }
//!
//! let mut scope = Scope::<u32>::new();
//! let id = scope.new_interaction(PointerType::Mouse);
//! let log = Rc::new(Log::default());
//!
//! let i = scope.interaction_mut(id).unwrap();
//! i.pointer_down(Pointer::mouse(Point::ZERO), RawEvent::new("pointerdown", 0), Some(7));
//! assert!(i.start(ActionProps::new(ActionName::Drag), log.clone(), 7));
//! i.pointer_move(Pointer::mouse(Point::new(5.0, 0.0)), RawEvent::new("pointermove", 16), Some(7));
//! let p = Pointer::mouse(Point::new(5.0, 0.0));
//! i.pointer_up(p, RawEvent::new("pointerup", 32), Some(7), None);
//!
//! assert_eq!(*log.0.borrow(), ["dragstart", "dragmove", "dragend"]);
//! assert!(!i.interacting());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod action;
mod coords;
mod error;
mod interaction;
mod options;
mod pointer;
mod proxy;
mod scope;
mod signals;
mod timer;

pub use action::{
    ActionEvent, ActionName, ActionProps, Axis, DeltaSource, Edges, Interactable, Phase, Prepared,
};
pub use coords::{CoordDelta, CoordSnapshot, CoordsSet};
pub use error::ConfigError;
pub use interaction::{Interaction, InteractionId, LatestPointer, MoveInput, TimerTask};
pub use options::InteractionOptions;
pub use pointer::{HoldState, Pointer, PointerId, PointerInfo, PointerType, RawEvent, TapRecord};
pub use proxy::InteractionProxy;
pub use scope::{Plugin, Scope};
pub use signals::{
    ActionArgs, BlurArgs, Channel, InteractionSignals, MoveArgs, PhaseArgs, PointerArgs,
    ReleaseArgs, UpdatePointerArgs,
};
pub use timer::{TimerHandle, TimerQueue};

pub use understory_signal::{ListenerId, Outcome, Signal};
