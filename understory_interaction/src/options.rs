// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction configuration.

use crate::error::ConfigError;

/// Options shared by every interaction of a [`Scope`](crate::Scope).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InteractionOptions {
    /// Client-space distance a down pointer must travel before it counts as
    /// moved.
    pub pointer_move_tolerance: f64,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            pointer_move_tolerance: 1.0,
        }
    }
}

impl InteractionOptions {
    /// Check the options.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidTolerance`] if the tolerance is negative, NaN or
    /// infinite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.pointer_move_tolerance;
        if !t.is_finite() || t < 0.0 {
            return Err(ConfigError::InvalidTolerance(t));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tolerance_is_one() {
        let o = InteractionOptions::default();
        assert_eq!(o.pointer_move_tolerance, 1.0);
        assert_eq!(o.validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_tolerance() {
        for t in [-1.0, f64::NAN, f64::INFINITY] {
            let o = InteractionOptions {
                pointer_move_tolerance: t,
            };
            assert!(matches!(o.validate(), Err(ConfigError::InvalidTolerance(_))));
        }
        let zero = InteractionOptions {
            pointer_move_tolerance: 0.0,
        };
        assert!(zero.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_take_defaults() {
        let o: InteractionOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(o, InteractionOptions::default());
        let o: InteractionOptions =
            serde_json::from_str(r#"{"pointer_move_tolerance":4.5}"#).unwrap();
        assert_eq!(o.pointer_move_tolerance, 4.5);
    }
}
