// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

/// Rejected [`PointerEventsOptions`](crate::PointerEventsOptions) or
/// [`EventableOptions`](crate::EventableOptions).
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A double-tap window of zero milliseconds can never match.
    #[error("double-tap interval must be at least 1 ms")]
    ZeroDoubleTapInterval,
    /// The double-tap distance is negative or not finite.
    #[error("double-tap distance must be finite and non-negative, got {0}")]
    InvalidDoubleTapDistance(f64),
    /// The eventable origin has a NaN or infinite coordinate.
    #[error("eventable origin must be finite, got ({x}, {y})")]
    NonFiniteOrigin {
        /// Horizontal coordinate.
        x: f64,
        /// Vertical coordinate.
        y: f64,
    },
}
