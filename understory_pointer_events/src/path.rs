// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ancestor paths of event targets.

use smallvec::SmallVec;

/// Ancestor path of an element, innermost first.
pub type ElementPath<K> = SmallVec<[K; 16]>;

/// A lookup mechanism for walking from an element to the root.
pub trait ParentLookup<K: Copy + Eq> {
    /// The parent of `element`, or `None` at a root.
    fn parent_of(&self, element: K) -> Option<K>;
}

impl<K, F> ParentLookup<K> for F
where
    K: Copy + Eq,
    F: Fn(K) -> Option<K>,
{
    #[inline]
    fn parent_of(&self, element: K) -> Option<K> {
        self(element)
    }
}

/// Collects `target` and its ancestors, innermost first.
///
/// The walk stops at the first element already on the path, so a lookup
/// that reports a cycle still terminates.
pub fn path_to_root<K, L>(target: K, lookup: &L) -> ElementPath<K>
where
    K: Copy + Eq,
    L: ParentLookup<K> + ?Sized,
{
    let mut path = ElementPath::new();
    let mut current = Some(target);
    while let Some(element) = current {
        if path.contains(&element) {
            break;
        }
        path.push(element);
        current = lookup.parent_of(element);
    }
    path
}
