// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pipeline and per-eventable configuration.

use kurbo::Point;

use crate::error::ConfigError;

/// Options of one [`PointerEvents`](crate::PointerEvents) pipeline.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PointerEventsOptions {
    /// A tap completes a double-tap only if it follows the previous tap by
    /// less than this many milliseconds.
    pub double_tap_interval: u64,
    /// Maximum page distance between the two taps of a double-tap. No limit
    /// when `None`.
    pub double_tap_distance: Option<f64>,
}

impl Default for PointerEventsOptions {
    fn default() -> Self {
        Self {
            double_tap_interval: 500,
            double_tap_distance: None,
        }
    }
}

impl PointerEventsOptions {
    /// Check the options.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroDoubleTapInterval`] for a zero interval, and
    /// [`ConfigError::InvalidDoubleTapDistance`] for a negative, NaN or
    /// infinite distance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.double_tap_interval == 0 {
            return Err(ConfigError::ZeroDoubleTapInterval);
        }
        if let Some(d) = self
            .double_tap_distance
            .filter(|d| !d.is_finite() || *d < 0.0)
        {
            return Err(ConfigError::InvalidDoubleTapDistance(d));
        }
        Ok(())
    }
}

/// Options carried by an [`Eventable`](crate::Eventable).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EventableOptions {
    /// Milliseconds a pointer must stay down and still before `hold` fires.
    pub hold_duration: u64,
    /// Milliseconds between repeated `hold` events; `0` disables repeating.
    pub hold_repeat_interval: u64,
    /// Subtracted from event coordinates while the event is delivered to
    /// this eventable.
    pub origin: Point,
}

impl Default for EventableOptions {
    fn default() -> Self {
        Self {
            hold_duration: 600,
            hold_repeat_interval: 0,
            origin: Point::ZERO,
        }
    }
}

impl EventableOptions {
    /// Check the options.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NonFiniteOrigin`] if either origin coordinate is NaN or
    /// infinite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.origin.is_finite() {
            return Err(ConfigError::NonFiniteOrigin {
                x: self.origin.x,
                y: self.origin.y,
            });
        }
        Ok(())
    }
}
