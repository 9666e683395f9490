mod settings;   // brings `settings.rs` in as `crate::settings`
mod simulation; // brings `simulation.rs` in as `crate::simulation`

use anyhow::Context;
use simulation::Simulation;
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

/// Every n-th recorded sample is logged in the trajectory summary.
const SUMMARY_STRIDE: usize = 20;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Pure pursuit simulation starting. Loading configuration...");
    let config = settings::load_config().context("failed to load simulation config")?;

    let mut sim = Simulation::new(&config)?;
    let outcome = sim.run();

    for sample in sim.history().iter().step_by(SUMMARY_STRIDE) {
        info!(
            t = %format!("{:.1}", sample.time),
            x = %format!("{:.2}", sample.x),
            y = %format!("{:.2}", sample.y),
            yaw = %format!("{:.3}", sample.yaw),
            v = %format!("{:.2}", sample.v),
            steer = %format!("{:+.3}", sample.steering_angle),
            target = sample.target_index,
            "Trajectory"
        );
    }

    info!(
        reached_goal = outcome.reached_goal,
        steps = outcome.steps,
        time = outcome.time,
        final_pose = %sim.state().pose(),
        final_speed = sim.state().v,
        final_target = sim.target_index(),
        "Simulation finished"
    );
    Ok(())
}
