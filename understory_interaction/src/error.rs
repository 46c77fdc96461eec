// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

/// Rejected [`InteractionOptions`](crate::InteractionOptions).
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The move tolerance is negative or not finite.
    #[error("pointer move tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
}
