use pursuit_kinematics::*;

fn main() {
    let wheelbase = 2.9;
    let dt = 0.1;
    let params_result = VehicleParams::new(wheelbase, dt);

    let acceleration = 0.5; // m/s^2
    let steering_angle = 0.1; // rad, slight left
    let num_steps = 20;

    match params_result {
        Ok(params) => {
            let mut state = VehicleState::with_params(0.0, 0.0, 0.0, 1.0, params);

            println!("Initializing simulation...");
            println!("  {}", params);
            println!("  Initial State:  {}", state);
            println!("  Acceleration:   {} m/s^2", acceleration);
            println!("  Steering Angle: {} rad", steering_angle);
            println!("  Num Steps:      {}", num_steps);
            println!("\nSimulating...");

            for i in 0..num_steps {
                state = state.update(acceleration, steering_angle);
                println!("Step {:>2}: {}", i + 1, state);
            }

            println!("\nSimulation complete.");
            println!("Final State: {:?}", state);
        }
        Err(e) => {
            eprintln!("Failed to build vehicle parameters: {}", e);
            eprintln!("Please ensure wheelbase ({}) and dt ({}) are positive.", wheelbase, dt);
        }
    }
}
