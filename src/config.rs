/// Runtime configuration, loaded from an optional TOML file with sensible
/// defaults for every field.
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const DEFAULT_PARTICLE_COUNT: usize = 100;
const DEFAULT_RADIUS_MIN: f32 = 10.0;
const DEFAULT_RADIUS_MAX: f32 = 30.0;
const DEFAULT_FRICTION: f32 = 0.1;
const DEFAULT_GRAVITY: f32 = 981.0; // pixels/s², ≈ 9.81 m/s² at 100 px/m
const DEFAULT_HISTORY_CAPACITY: usize = 6000;
const DEFAULT_WINDOW_WIDTH: f32 = 1000.0;
const DEFAULT_WINDOW_HEIGHT: f32 = 1000.0;
const DEFAULT_DT: f32 = 1.0 / 60.0;
const DEFAULT_SPEED_MAX: f32 = 200.0;
const DEFAULT_SPIN_MAX: f32 = 5.0;
const DEFAULT_GRAPH_WINDOW: usize = 600;

/// Simulation configuration. Any subset of fields may appear in the TOML
/// file; missing fields take the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of disks created at startup and on reset.
    pub particle_count: usize,
    /// Disk radii are drawn uniformly from `radius_min..=radius_max`.
    pub radius_min: f32,
    pub radius_max: f32,
    /// Friction coefficient applied to disks while the friction toggle is on.
    pub friction: f32,
    /// Downward gravity magnitude applied while the gravity toggle is on.
    pub gravity: f32,
    /// Maximum number of retained snapshots for time inversion.
    pub history_capacity: usize,
    /// Window (and simulation box) size in pixels.
    pub window_width: f32,
    pub window_height: f32,
    /// Simulation timestep; adjustable at runtime by ±10% steps.
    pub dt: f32,
    /// Initial velocity components are drawn from `-speed_max..speed_max`.
    pub speed_max: f32,
    /// Initial angular velocity is drawn from `-spin_max..spin_max`.
    pub spin_max: f32,
    /// Number of samples retained for the total-energy graph.
    pub graph_window: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            radius_min: DEFAULT_RADIUS_MIN,
            radius_max: DEFAULT_RADIUS_MAX,
            friction: DEFAULT_FRICTION,
            gravity: DEFAULT_GRAVITY,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            dt: DEFAULT_DT,
            speed_max: DEFAULT_SPEED_MAX,
            spin_max: DEFAULT_SPIN_MAX,
            graph_window: DEFAULT_GRAPH_WINDOW,
        }
    }
}

impl SimConfig {
    /// Loads and validates a configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let config_str = std::fs::read_to_string(path_ref).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e)
        })?;
        let config: SimConfig = toml::from_str(&config_str).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from '{}': {}", path_ref.display(), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.radius_min <= 0.0 {
            anyhow::bail!("radius_min must be positive");
        }
        if self.radius_max < self.radius_min {
            anyhow::bail!("radius_max must be >= radius_min");
        }
        if self.friction < 0.0 {
            anyhow::bail!("friction must be non-negative");
        }
        if self.gravity < 0.0 {
            anyhow::bail!("gravity must be non-negative");
        }
        if self.history_capacity == 0 {
            anyhow::bail!("history_capacity must be greater than 0");
        }
        if self.dt <= 0.0 {
            anyhow::bail!("dt must be positive");
        }
        // Walls are 20 px thick on each side; the box must leave room for
        // the largest disk to spawn between them.
        let min_window = 4.0 * self.radius_max + 40.0;
        if self.window_width < min_window || self.window_height < min_window {
            anyhow::bail!("window must leave room for the walls and the largest disk");
        }
        Ok(())
    }
}
