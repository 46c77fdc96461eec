// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic queue of cancellable one-shot timers.
//!
//! Nothing here reads a clock. The embedder feeds the current time into
//! [`TimerQueue::pop_due`] (usually through
//! [`Scope::advance_timers`](crate::Scope::advance_timers)) using the same
//! millisecond clock as its input timestamps.

use alloc::collections::BTreeMap;
use core::fmt;

use hashbrown::HashMap;

/// Handle of a scheduled timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Pending one-shot timers ordered by due time, then by scheduling order.
pub struct TimerQueue<T> {
    next: u64,
    by_due: BTreeMap<(u64, TimerHandle), T>,
    due_of: HashMap<TimerHandle, u64>,
}

impl<T> fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("next", &self.next)
            .field("pending", &self.by_due.len())
            .field("next_due", &self.next_due())
            .finish_non_exhaustive()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// An empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: 0,
            by_due: BTreeMap::new(),
            due_of: HashMap::new(),
        }
    }

    /// Schedule `task` to become due at `due`.
    pub fn schedule(&mut self, due: u64, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next);
        self.next += 1;
        self.by_due.insert((due, handle), task);
        self.due_of.insert(handle, due);
        handle
    }

    /// Cancel a pending timer and return its task.
    ///
    /// Returns `None` if the timer already ran or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let due = self.due_of.remove(&handle)?;
        self.by_due.remove(&(due, handle))
    }

    /// Whether `handle` is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.due_of.contains_key(&handle)
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerHandle, u64, T)> {
        let (&(due, _), _) = self.by_due.first_key_value()?;
        if due > now {
            return None;
        }
        let ((due, handle), task) = self.by_due.pop_first()?;
        self.due_of.remove(&handle);
        Some((handle, due, task))
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.by_due.keys().next().map(|(due, _)| *due)
    }

    /// Drop every pending task for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        let due_of = &mut self.due_of;
        self.by_due.retain(|(_, handle), task| {
            let k = keep(task);
            if !k {
                due_of.remove(handle);
            }
            k
        });
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_due.len()
    }

    /// Whether no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_due.is_empty()
    }
}
