// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_signal --heading-base-level=0

//! Understory Signal: typed publish/subscribe channels for UI event plumbing.
//!
//! A [`Signal`] is a single named channel. It owns an ordered list of
//! listeners, each of which receives a shared mutable *context* (typically the
//! object whose state changed) and a mutable, channel-specific *payload*.
//! Listeners run synchronously, in registration order.
//!
//! Instead of one bus keyed by strings, higher layers declare a struct with one
//! `Signal` field per channel. Each channel then has a checked payload type and
//! listeners cannot be attached to the wrong shape of argument.
//!
//! ## Veto
//!
//! Every listener returns an [`Outcome`]. [`Outcome::Veto`] stops the remaining
//! listeners of that channel and is returned from [`Signal::fire`]. Whether a
//! veto means anything is up to the caller: "before" style channels typically
//! abort the guarded operation, notification channels ignore it.
//!
//! ## Reentrancy
//!
//! Listeners may fire other signals, fire the same signal again, or add and
//! remove listeners while a signal is firing. [`Signal::fire`] works on a
//! snapshot of the listener list taken when it starts, so a listener added
//! during a fire first runs on the next fire, and a listener removed during a
//! fire still runs if it was part of the snapshot.
//!
//! ## Minimal example
//!
//! ```
//! use understory_signal::{Outcome, Signal};
//!
//! #[derive(Default)]
//! struct Counter { hits: u32 }
//!
//! let sig: Signal<Counter, u32> = Signal::new();
//! sig.observe(|c, n| c.hits += *n);
//! sig.on(|_, n| if *n > 10 { Outcome::Veto } else { Outcome::Continue });
//! sig.observe(|c, _| c.hits += 100);
//!
//! let mut counter = Counter::default();
//! assert_eq!(sig.fire(&mut counter, &mut 1), Outcome::Continue);
//! assert_eq!(counter.hits, 101);
//!
//! // The veto short-circuits the third listener.
//! assert_eq!(sig.fire(&mut counter, &mut 20), Outcome::Veto);
//! assert_eq!(counter.hits, 121);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

/// Result of a single listener invocation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Keep running the remaining listeners.
    #[default]
    Continue,
    /// Stop the remaining listeners and report a veto to the caller.
    Veto,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Veto`].
    #[must_use]
    pub const fn is_veto(self) -> bool {
        matches!(self, Self::Veto)
    }
}

/// Handle returned by [`Signal::on`], used to remove the listener again.
///
/// Ids are unique per signal and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener<Cx, A> = Rc<dyn Fn(&mut Cx, &mut A) -> Outcome>;

/// A single typed channel.
///
/// `Cx` is the context passed to every listener by mutable reference and `A`
/// is the channel payload. Both are borrowed only for the duration of the
/// synchronous [`fire`](Self::fire) call; listeners must not retain them.
pub struct Signal<Cx: ?Sized, A> {
    listeners: RefCell<Vec<(ListenerId, Listener<Cx, A>)>>,
    next_id: Cell<u64>,
}

impl<Cx: ?Sized, A> fmt::Debug for Signal<Cx, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.len())
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

impl<Cx: ?Sized, A> Default for Signal<Cx, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cx: ?Sized, A> Signal<Cx, A> {
    /// Create a signal with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Append a listener that may veto.
    pub fn on(&self, listener: impl Fn(&mut Cx, &mut A) -> Outcome + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Append a listener that only observes (never vetoes).
    pub fn observe(&self, listener: impl Fn(&mut Cx, &mut A) + 'static) -> ListenerId {
        self.on(move |cx, arg| {
            listener(cx, arg);
            Outcome::Continue
        })
    }

    /// Remove a listener. Returns `false` if it was not registered here.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Remove every listener.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Returns `true` if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Run the listeners in registration order.
    ///
    /// Returns [`Outcome::Veto`] as soon as one listener vetoes; the listeners
    /// after it are skipped.
    pub fn fire(&self, cx: &mut Cx, arg: &mut A) -> Outcome {
        let snapshot: Vec<Listener<Cx, A>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            if listener(cx, arg).is_veto() {
                return Outcome::Veto;
            }
        }
        Outcome::Continue
    }
}
