//! This module defines the error types used by the `pursuit-control` crate.

#![warn(missing_docs)]

/// Error type for path construction.
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    /// The path has no waypoints.
    /// Target search is undefined on an empty path, so one can never be built.
    Empty,
    /// The x and y coordinate sequences have different lengths.
    LengthMismatch {
        /// Number of x coordinates supplied.
        xs: usize,
        /// Number of y coordinates supplied.
        ys: usize,
    },
}

impl core::fmt::Display for PathError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PathError::Empty => write!(f, "Path must contain at least one point"),
            PathError::LengthMismatch { xs, ys } => {
                write!(f, "Path coordinate length mismatch: {} x values, {} y values", xs, ys)
            }
        }
    }
}

impl core::error::Error for PathError {}

/// Error type for controller configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlError {
    /// Error for invalid look-ahead distance.
    /// This variant is returned when the look-ahead distance is not positive and finite.
    InvalidLookahead(&'static str),
    /// Error for invalid speed gain.
    /// This variant is returned when the proportional gain is not positive and finite.
    InvalidGain(&'static str),
}

impl core::fmt::Display for ControlError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ControlError::InvalidLookahead(msg) => write!(f, "Invalid look-ahead distance: {}", msg),
            ControlError::InvalidGain(msg) => write!(f, "Invalid speed gain: {}", msg),
        }
    }
}

impl core::error::Error for ControlError {}
