#![warn(missing_docs)]
//! Pure-pursuit path tracking for the kinematic bicycle model.
//!
//! [`Path`] holds the waypoints to follow and [`PurePursuitController`] turns the
//! current [`VehicleState`] into steering and acceleration commands. The
//! controller keeps no memory between ticks: the previous target index is
//! owned by the caller and threaded through [`PurePursuitController::steer`].

pub mod error;
pub mod path;
pub mod pure_pursuit;

pub use error::{ControlError, PathError};
pub use path::Path;
pub use pure_pursuit::{PurePursuitController, SteeringCommand};
pub use pursuit_kinematics::{Pose, VehicleParams, VehicleState};
