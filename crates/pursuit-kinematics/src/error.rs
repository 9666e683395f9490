#![warn(missing_docs)]

//! Error types for the kinematics library.
//!
//! These are only produced while constructing vehicle parameters; the state
//! update itself is total and never fails.

use core::fmt;

/// Errors that can occur when building a vehicle model.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Error for invalid wheelbase.
    /// This variant is returned when a wheelbase is provided that is not positive and finite.
    InvalidWheelbase(&'static str),
    /// Error for invalid time step.
    /// This variant is returned when a simulation time step is not positive and finite.
    InvalidTimeStep(&'static str),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidWheelbase(msg) => write!(f, "Invalid wheelbase: {}", msg),
            KinematicsError::InvalidTimeStep(msg) => write!(f, "Invalid time step: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}
