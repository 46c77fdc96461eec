// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A narrow facade over an [`Interaction`].

use alloc::rc::Rc;

use crate::action::{ActionProps, Interactable, Prepared};
use crate::interaction::{Interaction, MoveInput};
use crate::pointer::RawEvent;

/// The part of an [`Interaction`] that action listeners are meant to use.
///
/// Exposes the target pair, the armed action and the pointer flags read-only,
/// plus the lifecycle operations. Obtain one with [`Interaction::proxy`].
#[derive(Debug)]
pub struct InteractionProxy<'a, K: 'static> {
    inner: &'a mut Interaction<K>,
}

impl<'a, K: Copy + PartialEq + 'static> InteractionProxy<'a, K> {
    pub(crate) fn new(inner: &'a mut Interaction<K>) -> Self {
        Self { inner }
    }

    /// Target of the running action.
    #[must_use]
    pub fn interactable(&self) -> Option<&Rc<dyn Interactable<K>>> {
        self.inner.interactable()
    }

    /// Element of the running action.
    #[must_use]
    pub fn element(&self) -> Option<K> {
        self.inner.element()
    }

    /// The armed action.
    #[must_use]
    pub fn prepared(&self) -> &Prepared {
        self.inner.prepared()
    }

    /// Whether a pointer is down.
    #[must_use]
    pub fn pointer_is_down(&self) -> bool {
        self.inner.pointer_is_down()
    }

    /// Whether the pointer travelled past the tolerance.
    #[must_use]
    pub fn pointer_was_moved(&self) -> bool {
        self.inner.pointer_was_moved()
    }

    /// See [`Interaction::start`].
    ///
    /// Like that method, this does not refuse an interactable and element
    /// already taken by another interaction; [`Scope::start`](crate::Scope::start)
    /// does.
    pub fn start(
        &mut self,
        action: ActionProps,
        interactable: Rc<dyn Interactable<K>>,
        element: K,
    ) -> bool {
        self.inner.start(action, interactable, element)
    }

    /// See [`Interaction::move_phase`].
    pub fn move_phase(&mut self, input: Option<MoveInput<K>>) -> bool {
        self.inner.move_phase(input)
    }

    /// See [`Interaction::end`].
    pub fn end(&mut self, event: Option<RawEvent>) {
        self.inner.end(event);
    }

    /// See [`Interaction::stop`].
    pub fn stop(&mut self) {
        self.inner.stop();
    }

    /// See [`Interaction::interacting`].
    #[must_use]
    pub fn interacting(&self) -> bool {
        self.inner.interacting()
    }
}
