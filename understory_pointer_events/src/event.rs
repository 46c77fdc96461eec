// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The synthesized pointer event.

use core::fmt;

use kurbo::Point;
use tracing::trace;
use understory_interaction::{
    Interaction, InteractionId, Pointer, PointerId, PointerType, TapRecord,
};

use crate::options::PointerEventsOptions;

/// The discrete event kinds produced by the pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventType {
    /// A pointer went down.
    Down,
    /// A pointer moved.
    Move,
    /// A pointer was released.
    Up,
    /// A pointer was cancelled by the platform.
    Cancel,
    /// A stationary press and release on one element.
    Tap,
    /// The second of two quick taps on one element.
    DoubleTap,
    /// A pointer stayed down and still for the hold duration.
    Hold,
}

impl PointerEventType {
    /// Lowercase name, e.g. `"doubletap"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Move => "move",
            Self::Up => "up",
            Self::Cancel => "cancel",
            Self::Tap => "tap",
            Self::DoubleTap => "doubletap",
            Self::Hold => "hold",
        }
    }
}

impl fmt::Display for PointerEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthesized event, delivered to each collected target in turn.
///
/// While a target's eventable runs, `page` and `client` are relative to that
/// eventable's origin and `current_target` is the target's element.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent<K> {
    /// Event kind.
    pub event_type: PointerEventType,
    /// The interaction the pointer belongs to.
    pub interaction: InteractionId,
    /// The pointer.
    pub pointer_id: PointerId,
    /// Device kind.
    pub pointer_type: PointerType,
    /// Page position.
    pub page: Point,
    /// Client position.
    pub client: Point,
    /// Milliseconds on the embedder's clock.
    pub time_stamp: u64,
    /// Element the pointer was over.
    pub target: Option<K>,
    /// Element currently receiving the event.
    pub current_target: Option<K>,
    /// For `tap`, milliseconds since the pointer went down; for `doubletap`,
    /// milliseconds since the first tap.
    pub dt: u64,
    /// Set on a `tap` that completes a double-tap.
    pub double: bool,
    /// Number of `hold` events fired for this press so far.
    pub count: u32,
    /// Free-form label copied from the target's props.
    pub tag: Option<&'static str>,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl<K> PointerEvent<K> {
    /// A bare event for `pointer` at `time_stamp`.
    #[must_use]
    pub fn new(
        event_type: PointerEventType,
        interaction: InteractionId,
        pointer: &Pointer,
        time_stamp: u64,
        target: Option<K>,
    ) -> Self {
        Self {
            event_type,
            interaction,
            pointer_id: pointer.id,
            pointer_type: pointer.pointer_type,
            page: pointer.page,
            client: pointer.client,
            time_stamp,
            target,
            current_target: None,
            dt: 0,
            double: false,
            count: 0,
            tag: None,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Stop delivery to targets on other elements.
    ///
    /// Remaining targets on the current element still receive the event.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop delivery to every further target and listener.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// See [`stop_propagation`](Self::stop_propagation).
    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// See [`stop_immediate_propagation`](Self::stop_immediate_propagation).
    #[must_use]
    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    /// Make coordinates relative to `origin`.
    pub fn subtract_origin(&mut self, origin: Point) {
        self.page -= origin.to_vec2();
        self.client -= origin.to_vec2();
    }

    /// Undo [`subtract_origin`](Self::subtract_origin).
    pub fn add_origin(&mut self, origin: Point) {
        self.page += origin.to_vec2();
        self.client += origin.to_vec2();
    }
}

impl<K: Copy + PartialEq + 'static> PointerEvent<K> {
    /// An event for `interaction`, with the tap bookkeeping filled in.
    pub(crate) fn for_interaction(
        event_type: PointerEventType,
        pointer: &Pointer,
        time_stamp: u64,
        target: Option<K>,
        interaction: &Interaction<K>,
        options: &PointerEventsOptions,
    ) -> Self {
        let mut ev = Self::new(event_type, interaction.id(), pointer, time_stamp, target);
        match event_type {
            PointerEventType::Tap => {
                let down_time = interaction
                    .pointer_info(pointer)
                    .and_then(|info| info.down_time)
                    .unwrap_or(time_stamp);
                ev.dt = time_stamp.saturating_sub(down_time);

                let interval = time_stamp.saturating_sub(interaction.tap_time());
                ev.double = interaction.prev_tap().is_some_and(|prev| {
                    !prev.double
                        && prev.target == target
                        && interval < options.double_tap_interval
                        && options
                            .double_tap_distance
                            .is_none_or(|max| (pointer.page - prev.page).hypot() <= max)
                });
                if ev.double {
                    trace!(
                        interaction = interaction.id().0,
                        interval,
                        "tap completes a double-tap"
                    );
                }
            }
            PointerEventType::DoubleTap => {
                ev.dt = time_stamp.saturating_sub(interaction.tap_time());
            }
            _ => {}
        }
        ev
    }

    /// The record a later tap compares itself against.
    #[must_use]
    pub fn to_tap_record(&self) -> TapRecord<K> {
        TapRecord {
            pointer_id: self.pointer_id,
            target: self.target,
            page: self.page,
            time_stamp: self.time_stamp,
            double: self.event_type == PointerEventType::DoubleTap,
        }
    }
}
