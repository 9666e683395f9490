use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "PURSUIT_CONFIG";

/// Top-level simulation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Speed the proportional law tracks (m/s)
    pub target_speed: f64,
    /// Simulated time after which the run stops (s)
    pub max_time: f64,
    /// Distance to the final waypoint that counts as arrived (m)
    pub goal_tolerance: f64,
    /// Sleep between ticks so the run takes wall-clock time
    pub realtime: bool,
    pub vehicle: VehicleConfig,
    pub controller: ControllerConfig,
    pub path: PathConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub wheelbase: f64,
    pub dt: f64,
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
    pub v: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub lookahead: f64,
    pub kp: f64,
}

/// Waypoints as parallel coordinate lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            target_speed: 10.0 / 3.6,
            max_time: 100.0,
            goal_tolerance: 0.5,
            realtime: false,
            vehicle: VehicleConfig::default(),
            controller: ControllerConfig::default(),
            path: PathConfig::default(),
        }
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        VehicleConfig {
            wheelbase: pursuit_kinematics::DEFAULT_WHEELBASE,
            dt: pursuit_kinematics::DEFAULT_TIME_STEP,
            x: 0.0,
            y: 0.0,
            yaw: 0.0,
            v: 0.0,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            lookahead: pursuit_control::pure_pursuit::DEFAULT_LOOKAHEAD,
            kp: pursuit_control::pure_pursuit::DEFAULT_SPEED_GAIN,
        }
    }
}

/// Loads the simulation config from `$PURSUIT_CONFIG`, or `config/default.toml` if unset.
pub fn load_config() -> Result<SimConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config_from(&path)
}

/// Loads the simulation config from a TOML file, with `PURSUIT_*` environment overrides
/// (nested keys use `__`, e.g. `PURSUIT_CONTROLLER__LOOKAHEAD=2.0`).
pub fn load_config_from(path: &str) -> Result<SimConfig, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix("PURSUIT")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .and_then(|config| config.try_deserialize::<SimConfig>());

    match settings {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
pub(crate) fn parse_config(toml: &str) -> Result<SimConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()
}
