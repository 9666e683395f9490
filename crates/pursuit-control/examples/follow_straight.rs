use pursuit_control::{Path, PurePursuitController, VehicleState};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // Straight path along the x-axis with a lateral offset start.
    let xs: Vec<f64> = (0..30).map(|i| i as f64).collect();
    let ys = vec![0.0; xs.len()];
    let path = match Path::new(xs, ys) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Failed to build path: {}", e);
            return;
        }
    };

    let controller = PurePursuitController::default();
    let mut state = VehicleState::new(0.0, -1.0, 0.0, 0.0);
    let target_speed = 2.0;
    let mut target_index = controller.target_index(&state, &path);

    println!("Following path of {} points with {}", path.len(), controller);
    println!("Initial State: {}", state);

    for i in 0..120 {
        let cmd = controller.steer(&state, &path, target_index);
        let accel = controller.acceleration(target_speed, state.v);
        state = state.update(accel, cmd.steering_angle);
        target_index = cmd.target_index;

        if i % 10 == 0 {
            println!(
                "Step {:>3}: {} steer: {:+.3} rad target: {}",
                i + 1,
                state,
                cmd.steering_angle,
                target_index
            );
        }
    }

    println!("\nFinal State: {}", state);
}
