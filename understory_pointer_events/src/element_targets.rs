// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A per-element eventable registry.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use understory_interaction::{Plugin, Scope};

use crate::eventable::{EventTarget, Eventable, TargetProps};
use crate::pipeline::PointerEvents;

type Registry<K> = Rc<RefCell<HashMap<K, Vec<(Rc<dyn Eventable<K>>, TargetProps)>>>>;

/// Answers `collect_targets` with the eventables registered per element.
///
/// An eventable is collected only for the event types it
/// [listens to](Eventable::listens_to). Registrations may change at any
/// time, including from inside a listener. Installing this plugin installs
/// the base pipeline too.
pub struct ElementTargets<K: 'static> {
    pipeline: PointerEvents<K>,
    registry: Registry<K>,
}

impl<K: fmt::Debug + 'static> fmt::Debug for ElementTargets<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("ElementTargets")
            .field("elements", &registry.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash + 'static> ElementTargets<K> {
    /// Id under which the plugin installs itself.
    pub const PLUGIN_ID: &'static str = "pointer-events/element-targets";

    /// An empty registry feeding `pipeline`.
    #[must_use]
    pub fn new(pipeline: &PointerEvents<K>) -> Self {
        Self {
            pipeline: pipeline.clone(),
            registry: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Have `eventable` receive events for `element`.
    pub fn register(&self, element: K, eventable: Rc<dyn Eventable<K>>) {
        self.register_with_props(element, eventable, TargetProps::default());
    }

    /// Like [`register`](Self::register), with per-target overrides.
    pub fn register_with_props(
        &self,
        element: K,
        eventable: Rc<dyn Eventable<K>>,
        props: TargetProps,
    ) {
        self.registry
            .borrow_mut()
            .entry(element)
            .or_default()
            .push((eventable, props));
    }

    /// Remove one registration of `eventable` on `element`.
    ///
    /// Returns `false` if it was not registered there.
    pub fn unregister(&self, element: K, eventable: &Rc<dyn Eventable<K>>) -> bool {
        let mut registry = self.registry.borrow_mut();
        let Some(list) = registry.get_mut(&element) else {
            return false;
        };
        let Some(index) = list
            .iter()
            .position(|(e, _)| core::ptr::addr_eq(Rc::as_ptr(e), Rc::as_ptr(eventable)))
        else {
            return false;
        };
        list.remove(index);
        if list.is_empty() {
            registry.remove(&element);
        }
        true
    }

    /// Remove every registration on `element`. Returns how many there were.
    pub fn clear(&self, element: K) -> usize {
        self.registry
            .borrow_mut()
            .remove(&element)
            .map_or(0, |list| list.len())
    }

    /// Whether anything is registered on `element`.
    #[must_use]
    pub fn is_registered(&self, element: K) -> bool {
        self.registry.borrow().contains_key(&element)
    }
}

impl<K: Copy + Eq + Hash + 'static> Plugin<K> for ElementTargets<K> {
    fn id(&self) -> &'static str {
        Self::PLUGIN_ID
    }

    fn install(&self, scope: &mut Scope<K>) {
        scope.use_plugin(&self.pipeline);

        let registry = Rc::clone(&self.registry);
        self.pipeline
            .signals()
            .collect_targets
            .observe(move |_, args| {
                let registry = registry.borrow();
                let Some(list) = registry.get(&args.element) else {
                    return;
                };
                args.targets.extend(
                    list.iter()
                        .filter(|(e, _)| e.listens_to(args.event_type))
                        .map(|(e, props)| {
                            EventTarget::new(Rc::clone(e), args.element).with_props(*props)
                        }),
                );
            });
    }
}
