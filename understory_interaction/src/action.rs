// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Actions, phases and the events an interaction delivers to its target.

use alloc::borrow::Cow;
use alloc::format;
use core::fmt;

use kurbo::{Point, Rect, Vec2};

use crate::interaction::{Interaction, InteractionId};

/// Identifier of a pluggable action behavior.
///
/// The built-in names cover the common cases; `Custom` lets extensions add
/// their own without touching this crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActionName {
    /// Move the target.
    Drag,
    /// Change the target's edges.
    Resize,
    /// Multi-touch pinch/rotate.
    Gesture,
    /// An extension-defined action.
    Custom(&'static str),
}

impl ActionName {
    /// Number of pointers that must be down before the action can start.
    #[must_use]
    pub const fn min_pointers(self) -> usize {
        match self {
            Self::Gesture => 2,
            _ => 1,
        }
    }

    /// Lowercase name, used as the prefix of event type names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drag => "drag",
            Self::Resize => "resize",
            Self::Gesture => "gesture",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis restriction hint for an action.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Horizontal only.
    X,
    /// Vertical only.
    Y,
    /// Both axes.
    #[default]
    XY,
}

bitflags::bitflags! {
    /// Which edges of the target rectangle follow the pointer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// The `x0` side.
        const LEFT = 1 << 0;
        /// The `x1` side.
        const RIGHT = 1 << 1;
        /// The `y0` side.
        const TOP = 1 << 2;
        /// The `y1` side.
        const BOTTOM = 1 << 3;
    }
}

impl Default for Edges {
    fn default() -> Self {
        Self::all()
    }
}

impl Edges {
    /// Move the selected edges of `rect` by `delta`.
    ///
    /// With all four edges selected this translates the rectangle.
    #[must_use]
    pub fn apply_delta(self, rect: Rect, delta: Vec2) -> Rect {
        let mut r = rect;
        if self.contains(Self::LEFT) {
            r.x0 += delta.x;
        }
        if self.contains(Self::RIGHT) {
            r.x1 += delta.x;
        }
        if self.contains(Self::TOP) {
            r.y0 += delta.y;
        }
        if self.contains(Self::BOTTOM) {
            r.y1 += delta.y;
        }
        r
    }
}

/// The action an interaction is asked to start.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActionProps {
    /// Which action.
    pub name: ActionName,
    /// Optional axis hint.
    pub axis: Option<Axis>,
    /// Optional edge selection; all edges when absent.
    pub edges: Option<Edges>,
}

impl ActionProps {
    /// An action with no hints.
    #[must_use]
    pub const fn new(name: ActionName) -> Self {
        Self {
            name,
            axis: None,
            edges: None,
        }
    }

    /// Set the axis hint.
    #[must_use]
    pub const fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Set the edge selection.
    #[must_use]
    pub const fn with_edges(mut self, edges: Edges) -> Self {
        self.edges = Some(edges);
        self
    }
}

/// The action armed on an interaction.
///
/// `name` is `None` when nothing is armed. The hints survive a
/// [`stop`](crate::Interaction::stop) until the next start overwrites them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Prepared {
    /// Armed action, if any.
    pub name: Option<ActionName>,
    /// Axis hint of the last started action.
    pub axis: Option<Axis>,
    /// Edge hint of the last started action.
    pub edges: Option<Edges>,
}

impl Prepared {
    pub(crate) fn copy_from(&mut self, action: &ActionProps) {
        self.name = Some(action.name);
        self.axis = action.axis;
        self.edges = action.edges;
    }
}

/// A stage in an action's lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The action begins.
    Start,
    /// The pointers moved (or a move was replayed).
    Move,
    /// The action finishes.
    End,
}

impl Phase {
    /// Lowercase name, used as the suffix of event type names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Move => "move",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which coordinate space drives rectangle updates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeltaSource {
    /// Document coordinates.
    #[default]
    Page,
    /// Viewport coordinates.
    Client,
}

/// An event synthesized for one action phase and delivered to the
/// interactable.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionEvent<K> {
    /// The interaction that produced the event.
    pub interaction: InteractionId,
    /// The action.
    pub name: ActionName,
    /// The phase.
    pub phase: Phase,
    /// The target element.
    pub element: Option<K>,
    /// Page position.
    pub page: Point,
    /// Client position.
    pub client: Point,
    /// Page movement since the previous action event.
    pub delta: Vec2,
    /// Page velocity in units per second.
    pub velocity: Vec2,
    /// Live target rectangle.
    pub rect: Option<Rect>,
    /// Edges following the pointer.
    pub edges: Edges,
    /// Milliseconds on the embedder's clock.
    pub time_stamp: u64,
    /// Set on the last move before an end.
    pub pre_end: bool,
    /// Overrides the derived event type name.
    pub type_override: Option<Cow<'static, str>>,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl<K> ActionEvent<K> {
    pub(crate) fn new(interaction: InteractionId, name: ActionName, phase: Phase) -> Self {
        Self {
            interaction,
            name,
            phase,
            element: None,
            page: Point::ZERO,
            client: Point::ZERO,
            delta: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rect: None,
            edges: Edges::default(),
            time_stamp: 0,
            pre_end: false,
            type_override: None,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Event type name, e.g. `dragstart`, unless overridden.
    #[must_use]
    pub fn event_type(&self) -> Cow<'static, str> {
        match &self.type_override {
            Some(t) => t.clone(),
            None => Cow::Owned(format!("{}{}", self.name, self.phase)),
        }
    }

    /// Stop delivery to further targets.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop delivery to every further listener, including the current target's.
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
}

/// A target that can be interacted with.
///
/// Registration and selector matching of interactables live outside this
/// crate; an interaction only needs these queries and a delivery hook.
pub trait Interactable<K: 'static> {
    /// Whether `action` is enabled on this target.
    fn action_enabled(&self, action: ActionName) -> bool;

    /// Current rectangle of `element`, if it has one.
    fn rect(&self, element: K) -> Option<Rect>;

    /// Coordinate space used to move the rectangle.
    fn delta_source(&self) -> DeltaSource {
        DeltaSource::Page
    }

    /// Deliver an action event.
    ///
    /// The interaction is passed along so that listeners can end or stop it.
    fn fire(&self, interaction: &mut Interaction<K>, event: &mut ActionEvent<K>);
}
