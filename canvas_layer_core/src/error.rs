// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use alloc::string::String;
use core::fmt;

/// Errors reported by [`CanvasLayer`](crate::layer::CanvasLayer)
/// configuration calls.
///
/// Both variants are recoverable: the layer is left in a consistent state
/// and the caller can retry with corrected configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerError {
    /// The host map has no pane with this name.
    PaneNotFound {
        /// The requested pane name.
        pane: String,
    },
    /// The resolution scale was zero, negative, or not a finite number.
    InvalidResolutionScale(f64),
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PaneNotFound { pane } => write!(f, "\"{pane}\" is not a valid MapPane name."),
            Self::InvalidResolutionScale(scale) => {
                write!(f, "resolution scale must be a positive number, got {scale}")
            }
        }
    }
}

impl core::error::Error for LayerError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn pane_error_names_the_pane() {
        let err = LayerError::PaneNotFound {
            pane: "nonexistent".into(),
        };
        assert_eq!(err.to_string(), "\"nonexistent\" is not a valid MapPane name.");
    }

    #[test]
    fn scale_error_reports_value() {
        let err = LayerError::InvalidResolutionScale(-2.0);
        assert_eq!(
            err.to_string(),
            "resolution scale must be a positive number, got -2"
        );
    }
}
