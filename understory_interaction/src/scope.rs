// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The session manager: interactions, their shared channels, timers and
//! installed plugins.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashSet;
use tracing::{debug, trace};

use crate::action::{ActionProps, Interactable};
use crate::error::ConfigError;
use crate::interaction::{Interaction, InteractionId, SharedTimers};
use crate::options::InteractionOptions;
use crate::pointer::PointerType;
use crate::signals::InteractionSignals;
use crate::timer::TimerQueue;

/// An extension that hooks into a [`Scope`].
///
/// Plugins usually register listeners on [`Scope::signals`]. Installation is
/// keyed by [`id`](Self::id), so installing the same plugin twice is a no-op.
pub trait Plugin<K: 'static> {
    /// Unique identifier, e.g. `"pointer-events/base"`.
    fn id(&self) -> &'static str;

    /// Register the plugin's listeners and state.
    fn install(&self, scope: &mut Scope<K>);
}

/// Owns every [`Interaction`] of one document or window.
///
/// All interactions of a scope share one [`InteractionSignals`] table and
/// one timer queue. Interaction ids are allocated by the scope, starting at
/// zero.
pub struct Scope<K: 'static> {
    signals: Rc<InteractionSignals<K>>,
    timers: SharedTimers<K>,
    options: InteractionOptions,
    interactions: Vec<Interaction<K>>,
    next_id: u64,
    plugins: HashSet<&'static str>,
}

impl<K: fmt::Debug + 'static> fmt::Debug for Scope<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("options", &self.options)
            .field("interactions", &self.interactions)
            .field("next_id", &self.next_id)
            .field("plugins", &self.plugins)
            .field("pending_timers", &self.timers.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + PartialEq + 'static> Default for Scope<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + PartialEq + 'static> Scope<K> {
    /// A scope with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            signals: Rc::new(InteractionSignals::new()),
            timers: Rc::new(RefCell::new(TimerQueue::new())),
            options: InteractionOptions::default(),
            interactions: Vec::new(),
            next_id: 0,
            plugins: HashSet::new(),
        }
    }

    /// A scope with validated options.
    ///
    /// # Errors
    ///
    /// Returns the validation error of `options`.
    pub fn with_options(options: InteractionOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::new()
        })
    }

    /// Options handed to new interactions.
    #[must_use]
    pub fn options(&self) -> &InteractionOptions {
        &self.options
    }

    /// The channel table shared by all interactions.
    #[must_use]
    pub fn signals(&self) -> &Rc<InteractionSignals<K>> {
        &self.signals
    }

    // --- Plugins ---------------------------------------------------------------

    /// Install `plugin` unless one with the same id already is.
    ///
    /// Returns `true` if the plugin was installed by this call.
    pub fn use_plugin<P: Plugin<K> + ?Sized>(&mut self, plugin: &P) -> bool {
        let id = plugin.id();
        if !self.plugins.insert(id) {
            trace!(plugin = id, "plugin already installed");
            return false;
        }
        plugin.install(self);
        debug!(plugin = id, "plugin installed");
        true
    }

    /// Whether a plugin with `id` is installed.
    #[must_use]
    pub fn is_installed(&self, id: &str) -> bool {
        self.plugins.contains(id)
    }

    // --- Interactions ----------------------------------------------------------

    /// Create an interaction for `pointer_type` input and fire `new` on it.
    pub fn new_interaction(&mut self, pointer_type: PointerType) -> InteractionId {
        let id = InteractionId(self.next_id);
        self.next_id += 1;

        let mut interaction = Interaction::new(
            id,
            pointer_type,
            Rc::clone(&self.signals),
            Rc::clone(&self.timers),
            self.options,
        );
        let signals = Rc::clone(&self.signals);
        signals.new.fire(&mut interaction, &mut ());
        self.interactions.push(interaction);
        trace!(interaction = id.0, ?pointer_type, "interaction created");
        id
    }

    /// All live interactions, oldest first.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction<K>] {
        &self.interactions
    }

    /// Look up an interaction.
    #[must_use]
    pub fn interaction(&self, id: InteractionId) -> Option<&Interaction<K>> {
        self.interactions.iter().find(|i| i.id() == id)
    }

    /// Look up an interaction for driving it.
    pub fn interaction_mut(&mut self, id: InteractionId) -> Option<&mut Interaction<K>> {
        self.interactions.iter_mut().find(|i| i.id() == id)
    }

    /// Destroy an interaction and discard its pending timers.
    ///
    /// Returns `false` if no interaction has `id`.
    pub fn remove_interaction(&mut self, id: InteractionId) -> bool {
        let Some(index) = self.interactions.iter().position(|i| i.id() == id) else {
            return false;
        };
        let mut interaction = self.interactions.remove(index);
        interaction.destroy();
        self.timers.borrow_mut().retain(|(owner, _)| *owner != id);
        trace!(interaction = id.0, "interaction removed");
        true
    }

    /// Start `action` on interaction `id`.
    ///
    /// Like [`Interaction::start`], and additionally refuses when another
    /// interaction of this scope is already interacting with the same
    /// interactable and element.
    pub fn start(
        &mut self,
        id: InteractionId,
        action: ActionProps,
        interactable: Rc<dyn Interactable<K>>,
        element: K,
    ) -> bool {
        let taken = self.interactions.iter().any(|other| {
            other.id() != id
                && other.interacting()
                && other.element() == Some(element)
                && other.interactable().is_some_and(|i| {
                    core::ptr::addr_eq(Rc::as_ptr(i), Rc::as_ptr(&interactable))
                })
        });
        if taken {
            debug!(
                interaction = id.0,
                action = %action.name,
                reason = "target taken by another interaction",
                "start rejected"
            );
            return false;
        }
        match self.interaction_mut(id) {
            Some(interaction) => interaction.start(action, interactable, element),
            None => false,
        }
    }

    // --- Timers ----------------------------------------------------------------

    /// Run every timer due at or before `now`, earliest first.
    ///
    /// Tasks run one at a time and may schedule or cancel timers; a newly
    /// scheduled timer that is already due runs in the same call. Returns the
    /// number of tasks run.
    pub fn advance_timers(&mut self, now: u64) -> usize {
        let mut ran = 0;
        loop {
            let next = self.timers.borrow_mut().pop_due(now);
            let Some((_, due, (owner, task))) = next else {
                break;
            };
            if let Some(interaction) = self.interaction_mut(owner) {
                task(interaction, due);
                ran += 1;
            }
        }
        ran
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_timer_due(&self) -> Option<u64> {
        self.timers.borrow().next_due()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }
}
