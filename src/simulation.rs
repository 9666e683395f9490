use std::time::Duration;

use anyhow::{Context, ensure};
use pursuit_control::{Path, PurePursuitController, SteeringCommand};
use pursuit_kinematics::{VehicleParams, VehicleState};
use spin_sleep::SpinSleeper;
use tracing::{debug, info, warn};

use crate::settings::SimConfig;

/// One recorded tick of the closed loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
    pub v: f64,
    pub steering_angle: f64,
    pub target_index: usize,
}

impl TrajectorySample {
    fn new(time: f64, state: &VehicleState, steering_angle: f64, target_index: usize) -> Self {
        TrajectorySample {
            time,
            x: state.x,
            y: state.y,
            yaw: state.yaw,
            v: state.v,
            steering_angle,
            target_index,
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOutcome {
    pub reached_goal: bool,
    pub steps: usize,
    pub time: f64,
    pub final_state: VehicleState,
}

/// Closed-loop driver: owns the vehicle state and threads the target index between ticks.
pub struct Simulation {
    state: VehicleState,
    controller: PurePursuitController,
    path: Path,
    target_speed: f64,
    max_time: f64,
    goal_tolerance: f64,
    realtime: bool,
    steps: usize,
    target_index: usize,
    history: Vec<TrajectorySample>,
}

impl Simulation {
    /// Builds a simulation from a loaded config.
    pub fn new(config: &SimConfig) -> anyhow::Result<Self> {
        ensure!(
            config.max_time.is_finite() && config.max_time > 0.0,
            "invalid max_time {}: must be positive and finite",
            config.max_time
        );
        ensure!(
            config.goal_tolerance.is_finite() && config.goal_tolerance >= 0.0,
            "invalid goal_tolerance {}: must be non-negative and finite",
            config.goal_tolerance
        );
        ensure!(
            config.target_speed.is_finite(),
            "invalid target_speed {}: must be finite",
            config.target_speed
        );

        let params = VehicleParams::new(config.vehicle.wheelbase, config.vehicle.dt)
            .context("invalid vehicle parameters")?;
        let controller = PurePursuitController::new(config.controller.lookahead, config.controller.kp)
            .context("invalid controller parameters")?;
        let path = Path::new(config.path.x.clone(), config.path.y.clone()).context("invalid path")?;

        let v = &config.vehicle;
        let state = VehicleState::with_params(v.x, v.y, v.yaw, v.v, params);

        let mut sim = Self::from_parts(
            state,
            controller,
            path,
            config.target_speed,
            config.max_time,
            config.goal_tolerance,
        );
        sim.realtime = config.realtime;
        Ok(sim)
    }

    /// Builds a simulation from already-validated parts. Real-time pacing is off.
    pub fn from_parts(
        state: VehicleState,
        controller: PurePursuitController,
        path: Path,
        target_speed: f64,
        max_time: f64,
        goal_tolerance: f64,
    ) -> Self {
        if path.total_length() == 0.0 {
            warn!(points = path.len(), "Path has zero length; the vehicle will aim at a single point");
        }

        let target_index = controller.target_index(&state, &path);
        let history = vec![TrajectorySample::new(0.0, &state, 0.0, target_index)];

        Simulation {
            state,
            controller,
            path,
            target_speed,
            max_time,
            goal_tolerance,
            realtime: false,
            steps: 0,
            target_index,
            history,
        }
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    /// Recorded samples, starting with the initial state.
    pub fn history(&self) -> &[TrajectorySample] {
        &self.history
    }

    /// Simulated time elapsed (s).
    pub fn time(&self) -> f64 {
        self.steps as f64 * self.state.dt()
    }

    /// True once the target is the final waypoint and the vehicle is within tolerance of it.
    pub fn reached_goal(&self) -> bool {
        let (gx, gy) = self.path.last_point();
        let dx = gx - self.state.x;
        let dy = gy - self.state.y;
        self.target_index >= self.path.last_index()
            && (dx * dx + dy * dy).sqrt() <= self.goal_tolerance
    }

    /// Advances the closed loop by one tick.
    pub fn step(&mut self) -> SteeringCommand {
        let cmd = self.controller.steer(&self.state, &self.path, self.target_index);
        let accel = self.controller.acceleration(self.target_speed, self.state.v);

        self.state = self.state.update(accel, cmd.steering_angle);
        self.target_index = cmd.target_index;
        self.steps += 1;

        let time = self.time();
        debug!(
            time,
            x = self.state.x,
            y = self.state.y,
            yaw = self.state.yaw,
            v = self.state.v,
            accel,
            steering_angle = cmd.steering_angle,
            target_index = cmd.target_index,
            "Simulation tick"
        );
        self.history
            .push(TrajectorySample::new(time, &self.state, cmd.steering_angle, cmd.target_index));

        cmd
    }

    /// Runs until the goal is reached or `max_time` elapses.
    pub fn run(&mut self) -> SimOutcome {
        info!(
            controller = %self.controller,
            params = %self.state.params(),
            initial_state = %self.state,
            path_points = self.path.len(),
            "Simulation started"
        );

        let sleeper = SpinSleeper::default();
        let tick = Duration::from_secs_f64(self.state.dt());

        while self.time() < self.max_time && !self.reached_goal() {
            self.step();
            if self.realtime {
                sleeper.sleep(tick);
            }
        }

        let outcome = SimOutcome {
            reached_goal: self.reached_goal(),
            steps: self.steps,
            time: self.time(),
            final_state: self.state,
        };

        if outcome.reached_goal {
            info!(steps = outcome.steps, time = outcome.time, final_state = %outcome.final_state, "Goal reached");
        } else {
            warn!(steps = outcome.steps, time = outcome.time, final_state = %outcome.final_state, "Time limit reached before goal");
        }
        outcome
    }
}
