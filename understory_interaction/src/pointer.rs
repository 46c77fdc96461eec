// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input and per-pointer bookkeeping.
//!
//! Input bindings translate platform events into a [`Pointer`] (who and
//! where) plus a [`RawEvent`] (what kind and when). An
//! [`Interaction`](crate::Interaction) keeps one [`PointerInfo`] per tracked
//! contact point.

use alloc::borrow::Cow;

use kurbo::Point;

use crate::timer::TimerHandle;

/// Stable identifier of one contact point for its lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

/// The kind of device behind a pointer.
///
/// Mouse and pen pointers have single-contact semantics: an interaction
/// driven by them tracks at most one pointer regardless of reported ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerType {
    /// A mouse or trackpad cursor.
    Mouse,
    /// A stylus.
    Pen,
    /// One finger on a touch surface.
    Touch,
}

impl PointerType {
    /// Returns `true` for device kinds that only ever have one contact.
    #[must_use]
    pub const fn is_single_contact(self) -> bool {
        matches!(self, Self::Mouse | Self::Pen)
    }
}

/// A snapshot of one contact point as reported by the platform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pointer {
    /// Identifier of the contact.
    pub id: PointerId,
    /// Device kind.
    pub pointer_type: PointerType,
    /// Position relative to the document.
    pub page: Point,
    /// Position relative to the viewport.
    pub client: Point,
}

impl Pointer {
    /// A pointer whose page and client positions coincide.
    #[must_use]
    pub const fn new(id: PointerId, pointer_type: PointerType, page: Point) -> Self {
        Self {
            id,
            pointer_type,
            page,
            client: page,
        }
    }

    /// The mouse pointer at `page`.
    #[must_use]
    pub const fn mouse(page: Point) -> Self {
        Self::new(PointerId(1), PointerType::Mouse, page)
    }

    /// Touch contact `id` at `page`.
    #[must_use]
    pub const fn touch(id: u32, page: Point) -> Self {
        Self::new(PointerId(id), PointerType::Touch, page)
    }

    /// Replace the client position.
    #[must_use]
    pub const fn with_client(mut self, client: Point) -> Self {
        self.client = client;
        self
    }
}

/// The platform event that carried a pointer update.
///
/// `event_type` keeps the platform's own name (`"pointerdown"`,
/// `"touchstart"`, `"pointercancel"`, ...). Classification is by
/// case-insensitive suffix, see [`is_down`](Self::is_down) and
/// [`is_cancel`](Self::is_cancel).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEvent {
    /// Platform event name.
    pub event_type: Cow<'static, str>,
    /// Milliseconds on the embedder's clock.
    pub time_stamp: u64,
}

impl RawEvent {
    /// Create an event.
    pub fn new(event_type: impl Into<Cow<'static, str>>, time_stamp: u64) -> Self {
        Self {
            event_type: event_type.into(),
            time_stamp,
        }
    }

    /// `true` if the name ends in `down` or `start`, ignoring ASCII case.
    #[must_use]
    pub fn is_down(&self) -> bool {
        ends_with_ignore_case(&self.event_type, "down")
            || ends_with_ignore_case(&self.event_type, "start")
    }

    /// `true` if the name ends in `cancel`, ignoring ASCII case.
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        ends_with_ignore_case(&self.event_type, "cancel")
    }
}

fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    let (s, suffix) = (s.as_bytes(), suffix.as_bytes());
    s.len() >= suffix.len() && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Pending hold-gesture state for one pointer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HoldState {
    /// Dwell time in milliseconds; `None` until a hold candidate is found.
    pub duration: Option<u64>,
    /// The armed one-shot timer, if any.
    pub timer: Option<TimerHandle>,
}

/// One tracked contact point.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerInfo<K> {
    /// Identifier of the contact.
    pub id: PointerId,
    /// Last reported state.
    pub pointer: Pointer,
    /// Timestamp of the last down transition.
    pub down_time: Option<u64>,
    /// Element under the pointer at the last down transition.
    pub down_target: Option<K>,
    /// Hold bookkeeping, attached by the pointer-event pipeline.
    pub hold: Option<HoldState>,
}

impl<K> PointerInfo<K> {
    /// A freshly seen pointer with no down transition yet.
    #[must_use]
    pub const fn new(pointer: Pointer) -> Self {
        Self {
            id: pointer.id,
            pointer,
            down_time: None,
            down_target: None,
            hold: None,
        }
    }
}

/// Record of the most recent tap (or doubletap) on an interaction.
///
/// Written by the pointer-event pipeline after each tap so that the next tap
/// can decide whether it completes a double-tap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TapRecord<K> {
    /// Pointer that produced the tap.
    pub pointer_id: PointerId,
    /// Target the tap was fired on.
    pub target: Option<K>,
    /// Page position of the tap.
    pub page: Point,
    /// When the tap happened.
    pub time_stamp: u64,
    /// `true` if this record is itself a doubletap.
    pub double: bool,
}
