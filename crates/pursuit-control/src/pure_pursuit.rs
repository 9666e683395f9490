#![warn(missing_docs)]

//! Pure-pursuit steering law and proportional speed control.
//!
//! The aim point is found in two phases: the waypoint nearest the vehicle, then a
//! forward walk along the path until the accumulated arc length reaches the
//! look-ahead distance. Splitting the two keeps the aim point ahead of the vehicle
//! even when it sits exactly on the path.

use std::f64::consts::PI;
use std::fmt;

use pursuit_kinematics::VehicleState;
use tracing::{debug, trace};

use crate::error::ControlError;
use crate::path::Path;

/// Default look-ahead distance (m).
pub const DEFAULT_LOOKAHEAD: f64 = 1.0;

/// Default proportional speed gain.
pub const DEFAULT_SPEED_GAIN: f64 = 1.0;

/// Output of one steering computation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteeringCommand {
    /// Front wheel angle (rad), always within `(-PI/2, PI/2)`.
    pub steering_angle: f64,
    /// Index of the waypoint steered toward. Pass it back as `previous_index` on the next tick.
    pub target_index: usize,
    /// Bearing to the target relative to the heading (rad), after reverse correction.
    pub alpha: f64,
}

/// Pure-pursuit steering with proportional speed control.
///
/// Holds configuration only. Each call reads the vehicle state and the path but
/// owns neither, and no state survives between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ControllerRepr"))]
pub struct PurePursuitController {
    /// Look-ahead arc length along the path (m)
    lookahead: f64,
    /// Proportional speed gain
    kp: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ControllerRepr {
    lookahead: f64,
    kp: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<ControllerRepr> for PurePursuitController {
    type Error = ControlError;

    fn try_from(repr: ControllerRepr) -> Result<Self, Self::Error> {
        PurePursuitController::new(repr.lookahead, repr.kp)
    }
}

impl PurePursuitController {
    /// Creates a controller.
    ///
    /// # Arguments
    /// * `lookahead` - Look-ahead distance `Lf` in meters
    /// * `kp` - Proportional gain of the speed law
    ///
    /// # Returns
    /// * `Result<Self, ControlError>` - The controller, or an error if either value is
    ///   not positive and finite
    pub fn new(lookahead: f64, kp: f64) -> Result<Self, ControlError> {
        if !(lookahead > 0.0) || !lookahead.is_finite() {
            return Err(ControlError::InvalidLookahead("must be positive and finite"));
        }
        if !(kp > 0.0) || !kp.is_finite() {
            return Err(ControlError::InvalidGain("must be positive and finite"));
        }
        Ok(PurePursuitController { lookahead, kp })
    }

    /// Returns the look-ahead distance.
    pub fn lookahead(&self) -> f64 {
        self.lookahead
    }

    /// Returns the proportional speed gain.
    pub fn kp(&self) -> f64 {
        self.kp
    }

    /// Proportional speed law: `Kp * (target - current)`. The output is not clamped.
    pub fn acceleration(&self, target_speed: f64, current_speed: f64) -> f64 {
        self.kp * (target_speed - current_speed)
    }

    /// Index of the waypoint closest to the vehicle.
    ///
    /// Ties go to the lowest index.
    pub fn nearest_index(&self, state: &VehicleState, path: &Path) -> usize {
        debug_assert!(!path.is_empty(), "target search on an empty path");

        let mut nearest = 0;
        let mut nearest_dist = f64::INFINITY;
        for (i, (px, py)) in path.points().enumerate() {
            let dx = state.x - px;
            let dy = state.y - py;
            let d = (dx * dx + dy * dy).sqrt();
            if d < nearest_dist {
                nearest = i;
                nearest_dist = d;
            }
        }
        trace!(index = nearest, distance = nearest_dist, "Nearest path point");
        nearest
    }

    /// Look-ahead target search.
    ///
    /// Starts at the nearest waypoint and walks forward one segment at a time,
    /// accumulating arc length until it reaches the look-ahead distance or the path
    /// runs out. Returns the index reached, which is at most the last index.
    pub fn target_index(&self, state: &VehicleState, path: &Path) -> usize {
        let mut index = self.nearest_index(state, path);
        let mut travelled = 0.0;

        while self.lookahead > travelled && index + 1 < path.len() {
            travelled += path.segment_length(index);
            index += 1;
            trace!(index, travelled, "Accumulated path length");
        }

        debug!(target_index = index, travelled, "Target index found");
        index
    }

    /// Computes the steering angle toward the look-ahead point.
    ///
    /// The target index never moves backward: if `previous_index` is at or past the
    /// freshly searched index it is kept. An index past the end of the path is
    /// clamped to the last waypoint. When reversing (`v < 0`) the bearing is
    /// reflected as `PI - alpha`.
    ///
    /// # Arguments
    /// * `state` - Current vehicle state
    /// * `path` - Path being followed
    /// * `previous_index` - Target index returned by the previous call (or the initial search)
    pub fn steer(&self, state: &VehicleState, path: &Path, previous_index: usize) -> SteeringCommand {
        let mut index = self.target_index(state, path);
        if previous_index >= index {
            index = previous_index;
        }

        let (tx, ty) = match path.point(index) {
            Some(p) => p,
            None => {
                index = path.last_index();
                path.last_point()
            }
        };

        let mut alpha = (ty - state.y).atan2(tx - state.x) - state.yaw;
        if state.v < 0.0 {
            alpha = PI - alpha;
        }

        let steering_angle = (2.0 * state.wheelbase() * alpha.sin() / self.lookahead).atan2(1.0);

        debug!(target_index = index, tx, ty, alpha, steering_angle, "Computed steering");

        SteeringCommand {
            steering_angle,
            target_index: index,
            alpha,
        }
    }
}

impl Default for PurePursuitController {
    fn default() -> Self {
        PurePursuitController {
            lookahead: DEFAULT_LOOKAHEAD,
            kp: DEFAULT_SPEED_GAIN,
        }
    }
}

impl fmt::Display for PurePursuitController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PurePursuit (Lf: {:.2} m, Kp: {:.2})", self.lookahead, self.kp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;
    const EPSILON: f64 = 1e-9;

    fn straight_path(n: usize) -> Path {
        Path::new((0..n).map(|i| i as f64).collect(), vec![0.0; n]).unwrap()
    }

    #[test]
    fn test_default_controller() {
        let controller = PurePursuitController::default();
        assert_eq!(controller.lookahead(), 1.0);
        assert_eq!(controller.kp(), 1.0);
    }

    #[test]
    fn test_constructor_invalid_values() {
        assert!(matches!(
            PurePursuitController::new(0.0, 1.0),
            Err(ControlError::InvalidLookahead(_))
        ));
        assert!(matches!(
            PurePursuitController::new(1.0, -1.0),
            Err(ControlError::InvalidGain(_))
        ));
        assert!(matches!(
            PurePursuitController::new(f64::NAN, 1.0),
            Err(ControlError::InvalidLookahead(_))
        ));
    }

    #[test]
    fn test_acceleration_proportional() {
        let controller = PurePursuitController::new(1.0, 0.5).unwrap();
        assert!((controller.acceleration(10.0, 4.0) - 3.0).abs() < EPSILON);
        assert!((controller.acceleration(0.0, 4.0) - (-2.0)).abs() < EPSILON);
        assert!((controller.acceleration(2.0, 2.0) - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_concrete_scenario() {
        let controller = PurePursuitController::default();
        let path = straight_path(5);
        let state = VehicleState::new(0.0, 0.0, 0.0, 1.0);

        assert_eq!(controller.nearest_index(&state, &path), 0);
        assert_eq!(controller.target_index(&state, &path), 1);

        let cmd = controller.steer(&state, &path, 0);
        assert_eq!(cmd.target_index, 1);
        assert!((cmd.alpha - 0.0).abs() < EPSILON);
        assert!((cmd.steering_angle - 0.0).abs() < EPSILON);

        let next = state.update(0.0, cmd.steering_angle);
        assert!((next.x - 0.1).abs() < EPSILON);
        assert!((next.y - 0.0).abs() < EPSILON);
        assert!((next.yaw - 0.0).abs() < EPSILON);
        assert!((next.v - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_nearest_tie_picks_lowest_index() {
        let controller = PurePursuitController::default();
        let path = Path::new(vec![-1.0, 1.0, 1.0], vec![0.0, 0.0, 0.0]).unwrap();
        let state = VehicleState::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(controller.nearest_index(&state, &path), 0);

        let duplicate = Path::new(vec![3.0, 1.0, 1.0], vec![0.0, 0.0, 0.0]).unwrap();
        assert_eq!(controller.nearest_index(&state, &duplicate), 1);
    }

    #[test]
    fn test_lookahead_arc_length_property() {
        let controller = PurePursuitController::new(2.5, 1.0).unwrap();
        let path = Path::new(
            vec![0.0, 0.5, 1.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        )
        .unwrap();
        let state = VehicleState::new(0.4, 0.1, 0.0, 1.0);

        let nearest = controller.nearest_index(&state, &path);
        let target = controller.target_index(&state, &path);
        assert_eq!(nearest, 1);
        assert!(path.length_between(nearest, target) >= controller.lookahead());
        assert!(path.length_between(nearest, target - 1) < controller.lookahead());
    }

    #[test]
    fn test_target_index_stops_at_end_of_path() {
        let controller = PurePursuitController::new(10.0, 1.0).unwrap();
        let path = straight_path(5);
        let state = VehicleState::new(3.2, 0.0, 0.0, 1.0);
        assert_eq!(controller.target_index(&state, &path), 4);
    }

    #[test]
    fn test_single_point_path() {
        let controller = PurePursuitController::default();
        let path = Path::new(vec![2.0], vec![2.0]).unwrap();
        let state = VehicleState::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(controller.target_index(&state, &path), 0);

        let cmd = controller.steer(&state, &path, 0);
        assert_eq!(cmd.target_index, 0);
        // Target at 45 degrees to the left.
        assert!(cmd.steering_angle > 0.0);
    }

    #[test]
    fn test_zero_length_segments_are_walked_through() {
        let controller = PurePursuitController::default();
        let path = Path::new(vec![0.0, 0.0, 0.0, 1.0, 2.0], vec![0.0; 5]).unwrap();
        let state = VehicleState::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(controller.target_index(&state, &path), 3);
    }

    #[test]
    fn test_previous_index_never_regresses() {
        let controller = PurePursuitController::default();
        let path = straight_path(10);
        let state = VehicleState::new(0.0, 0.0, 0.0, 1.0);

        let cmd = controller.steer(&state, &path, 6);
        assert_eq!(cmd.target_index, 6);
        // Target ahead on the x-axis, so no steering.
        assert!((cmd.steering_angle - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_previous_index_past_end_is_clamped() {
        let controller = PurePursuitController::default();
        let path = Path::new(vec![0.0, 1.0, 2.0], vec![0.0, 0.0, 2.0]).unwrap();
        let state = VehicleState::new(0.0, 0.0, 0.0, 1.0);

        let cmd = controller.steer(&state, &path, 42);
        assert_eq!(cmd.target_index, 2);
        assert!((cmd.alpha - (2.0_f64).atan2(2.0)).abs() < EPSILON);
    }

    #[test]
    fn test_target_index_monotonic_while_driving() {
        let controller = PurePursuitController::default();
        let path = straight_path(20);
        let mut state = VehicleState::new(0.0, 0.0, 0.0, 1.0);
        let mut index = controller.target_index(&state, &path);

        for _ in 0..180 {
            let cmd = controller.steer(&state, &path, index);
            assert!(cmd.target_index >= index);
            assert!((cmd.steering_angle - 0.0).abs() < EPSILON);
            index = cmd.target_index;
            state = state.update(controller.acceleration(1.0, state.v), cmd.steering_angle);
        }
        assert_eq!(index, path.last_index());
        assert!((state.y - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_steering_sign_follows_target_side() {
        let controller = PurePursuitController::default();
        let state = VehicleState::new(0.0, 0.0, 0.0, 1.0);

        let left = Path::new(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        assert!(controller.steer(&state, &left, 0).steering_angle > 0.0);

        let right = Path::new(vec![0.0, 1.0], vec![0.0, -1.0]).unwrap();
        assert!(controller.steer(&state, &right, 0).steering_angle < 0.0);
    }

    #[test]
    fn test_steering_is_bounded() {
        let controller = PurePursuitController::new(0.01, 1.0).unwrap();
        let path = Path::new(vec![0.0, 0.0], vec![0.0, 1.0]).unwrap();
        let state = VehicleState::new(0.0, 0.0, 0.0, 1.0);
        let cmd = controller.steer(&state, &path, 0);
        assert!(cmd.steering_angle > 0.0);
        assert!(cmd.steering_angle < FRAC_PI_2);
    }

    #[test]
    fn test_reverse_correction() {
        let controller = PurePursuitController::default();
        let path = Path::new(vec![0.0, 1.0, 2.0], vec![0.0, 0.5, 1.0]).unwrap();
        let forward = VehicleState::new(0.0, 0.0, 0.0, 1.0);
        let reverse = VehicleState::new(0.0, 0.0, 0.0, -1.0);

        let fwd_cmd = controller.steer(&forward, &path, 0);
        let rev_cmd = controller.steer(&reverse, &path, 0);
        assert_eq!(fwd_cmd.target_index, rev_cmd.target_index);

        let raw_alpha = fwd_cmd.alpha;
        assert!((rev_cmd.alpha - (PI - raw_alpha)).abs() < EPSILON);
        // sin(PI - a) == sin(a): the reflected bearing yields the same wheel angle.
        assert!((rev_cmd.steering_angle - fwd_cmd.steering_angle).abs() < EPSILON);
    }

    #[test]
    fn test_reverse_target_dead_ahead() {
        let controller = PurePursuitController::default();
        let path = straight_path(5);
        let state = VehicleState::new(0.0, 0.0, 0.0, -1.0);

        let cmd = controller.steer(&state, &path, 0);
        assert!((cmd.alpha - PI).abs() < EPSILON);
        assert!(cmd.steering_angle.abs() < EPSILON);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates_gains() {
        let controller: PurePursuitController =
            serde_json::from_str(r#"{"lookahead":2.0,"kp":0.5}"#).unwrap();
        assert_eq!(controller.lookahead(), 2.0);
        assert_eq!(controller.kp(), 0.5);

        assert!(serde_json::from_str::<PurePursuitController>(r#"{"lookahead":0.0,"kp":1.0}"#).is_err());
        assert!(serde_json::from_str::<PurePursuitController>(r#"{"lookahead":1.0,"kp":-2.0}"#).is_err());
    }
}
