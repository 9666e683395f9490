#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for the kinematic bicycle model."]
#![doc = ""]
#![doc = "This crate provides the vehicle state, its fixed geometry parameters,"]
#![doc = "and the discrete-time update that advances pose and speed from acceleration and steering."]

use core::fmt;
use libm::{cos, sin, tan};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::KinematicsError;

/// Default wheelbase (m).
pub const DEFAULT_WHEELBASE: f64 = 2.9;

/// Default simulation time step (s).
pub const DEFAULT_TIME_STEP: f64 = 0.1;

/// A 2‑D pose `(x, y, yaw)` in meters and radians (yaw measured counter‑clockwise
/// from the x‑axis in the world frame).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World‑frame x position (m).
    pub x: f64,
    /// World‑frame y position (m).
    pub y: f64,
    /// Heading (rad). Not normalized; accumulates over full turns.
    pub yaw: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: World-frame x position in meters.
    /// * `y`: World-frame y position in meters.
    /// * `yaw`: Heading in radians.
    pub const fn new(x: f64, y: f64, yaw: f64) -> Self {
        Pose { x, y, yaw }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, yaw: {:.2} rad)", self.x, self.y, self.yaw)
    }
}

/// Fixed geometry and discretization of a simulated vehicle.
///
/// These are set once when the vehicle is built and never change over its lifetime.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ParamsRepr"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleParams {
    /// Distance between the front and rear axles (m).
    wheelbase: f64,
    /// Time advanced by a single update (s).
    dt: f64,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct ParamsRepr {
    wheelbase: f64,
    dt: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<ParamsRepr> for VehicleParams {
    type Error = KinematicsError;

    fn try_from(repr: ParamsRepr) -> Result<Self, Self::Error> {
        VehicleParams::new(repr.wheelbase, repr.dt)
    }
}

impl VehicleParams {
    /// Construct vehicle parameters.
    ///
    /// # Arguments
    ///
    /// * `wheelbase`: Axle-to-axle distance in meters.
    /// * `dt`: Simulation time step in seconds.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidWheelbase)` if `wheelbase` is not positive and finite.
    /// Returns `Err(KinematicsError::InvalidTimeStep)` if `dt` is not positive and finite.
    pub fn new(wheelbase: f64, dt: f64) -> Result<Self, KinematicsError> {
        if !(wheelbase > 0.0) || !wheelbase.is_finite() {
            return Err(KinematicsError::InvalidWheelbase("must be positive and finite"));
        }
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(KinematicsError::InvalidTimeStep("must be positive and finite"));
        }
        Ok(VehicleParams { wheelbase, dt })
    }

    /// Returns the wheelbase.
    pub fn wheelbase(&self) -> f64 {
        self.wheelbase
    }

    /// Returns the time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }
}

impl Default for VehicleParams {
    fn default() -> Self {
        VehicleParams {
            wheelbase: DEFAULT_WHEELBASE,
            dt: DEFAULT_TIME_STEP,
        }
    }
}

impl fmt::Display for VehicleParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VehicleParams (L: {:.2} m, dt: {:.3} s)", self.wheelbase, self.dt)
    }
}

/// Kinematic bicycle-model state.
///
/// Holds the pose and signed forward speed of the rear axle together with the
/// vehicle's fixed parameters. A negative `v` means the vehicle is reversing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VehicleState {
    /// World‑frame x position (m).
    pub x: f64,
    /// World‑frame y position (m).
    pub y: f64,
    /// Heading (rad), unbounded.
    pub yaw: f64,
    /// Signed forward speed (m/s).
    pub v: f64,
    params: VehicleParams,
}

impl VehicleState {
    /// Construct a state with the default wheelbase and time step.
    ///
    /// # Arguments
    ///
    /// * `x`, `y`: World-frame position in meters.
    /// * `yaw`: Heading in radians.
    /// * `v`: Signed forward speed in m/s.
    pub fn new(x: f64, y: f64, yaw: f64, v: f64) -> Self {
        Self::with_params(x, y, yaw, v, VehicleParams::default())
    }

    /// Construct a state with explicit vehicle parameters.
    pub const fn with_params(x: f64, y: f64, yaw: f64, v: f64, params: VehicleParams) -> Self {
        VehicleState { x, y, yaw, v, params }
    }

    /// Returns the vehicle parameters.
    pub fn params(&self) -> VehicleParams {
        self.params
    }

    /// Returns the wheelbase.
    pub fn wheelbase(&self) -> f64 {
        self.params.wheelbase
    }

    /// Returns the time step.
    pub fn dt(&self) -> f64 {
        self.params.dt
    }

    /// Returns the pose portion of the state.
    pub fn pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.yaw)
    }

    /// Advances the state by one time step.
    ///
    /// Every output is computed from the pre-update values:
    ///
    /// ```text
    /// x'   = x + v cos(yaw) dt
    /// y'   = y + v sin(yaw) dt
    /// yaw' = yaw + v / L tan(delta) dt
    /// v'   = v + a dt
    /// ```
    ///
    /// No range checking is done on the inputs. A steering angle of exactly `±PI/2`
    /// makes the yaw-rate term diverge and the result is propagated as-is.
    ///
    /// # Arguments
    ///
    /// * `acceleration`: Longitudinal acceleration command (m/s²).
    /// * `steering_angle`: Front wheel angle relative to the heading (rad).
    ///
    /// # Returns
    ///
    /// The state one time step later, with the same parameters.
    #[must_use]
    pub fn update(&self, acceleration: f64, steering_angle: f64) -> VehicleState {
        let dt = self.params.dt;

        VehicleState {
            x: self.x + self.v * cos(self.yaw) * dt,
            y: self.y + self.v * sin(self.yaw) * dt,
            yaw: self.yaw + self.v / self.params.wheelbase * tan(steering_angle) * dt,
            v: self.v + acceleration * dt,
            params: self.params,
        }
    }
}

impl fmt::Display for VehicleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v: {:.2} m/s", self.pose(), self.v)
    }
}
