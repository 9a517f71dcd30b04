use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Largest accepted `kernel_exponent`.
pub const MAX_KERNEL_EXPONENT: u32 = 32;

/// Parameter bundle for one simulation run.
///
/// Every field has a default, so a config file only needs to list the values
/// it changes. The bundle is fixed once a [`Simulation`](crate::solver::Simulation)
/// has been built from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub particle_count: usize,
    pub particle_mass: f32,
    pub target_density: f32,
    /// Acceleration along +y (screen coordinates, y grows downwards).
    pub gravity_strength: f32,
    pub pressure_coefficient: f32,
    pub viscosity_coefficient: f32,
    /// Fraction of the normal velocity kept after bouncing off a wall.
    pub collision_damping: f32,
    /// Largest offset from a wall a colliding particle is placed at.
    pub boundary_jitter: f32,

    pub smoothing_radius: f32,
    pub kernel_exponent: u32,

    pub width: f32,
    pub height: f32,

    pub step_size: f32,
    pub worker_count: usize,
    /// `None` derives one bin per reachable grid cell.
    pub spatial_hash_bins: Option<usize>,
    /// `None` draws a fresh seed when the simulation is built.
    pub random_seed: Option<u64>,

    // Driver loop
    pub ticks_per_frame: u32,
    pub frames_per_second: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: 1000,
            particle_mass: 1.0,
            target_density: 1.0,
            gravity_strength: 1.0,
            pressure_coefficient: 50.0,
            viscosity_coefficient: 0.1,
            collision_damping: 0.7,
            boundary_jitter: 1.0,
            smoothing_radius: 1.0,
            kernel_exponent: 2,
            width: 512.0,
            height: 512.0,
            step_size: 0.01,
            worker_count: 8,
            spatial_hash_bins: None,
            random_seed: None,
            ticks_per_frame: 4,
            frames_per_second: 60,
        }
    }
}

impl SimulationConfig {
    /// Parse a JSON config, filling missing fields with defaults, and validate it.
    pub fn from_json_str(text: &str) -> Result<Self, SimulationError> {
        let config: SimulationConfig =
            serde_json::from_str(text).map_err(|e| SimulationError::ConfigParse {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| SimulationError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&contents)
    }

    /// Reject parameter bundles the solver cannot run with.
    ///
    /// A positive particle mass is what keeps every density strictly positive,
    /// since each particle always contributes `mass * kernel(0)` to itself.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let finite = [
            ("particle_mass", self.particle_mass),
            ("target_density", self.target_density),
            ("gravity_strength", self.gravity_strength),
            ("pressure_coefficient", self.pressure_coefficient),
            ("viscosity_coefficient", self.viscosity_coefficient),
            ("collision_damping", self.collision_damping),
            ("boundary_jitter", self.boundary_jitter),
            ("smoothing_radius", self.smoothing_radius),
            ("width", self.width),
            ("height", self.height),
            ("step_size", self.step_size),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimulationError::invalid(format!("{name} must be finite")));
            }
        }

        if self.particle_mass <= 0.0 {
            return Err(SimulationError::invalid("particle_mass must be positive"));
        }
        if self.target_density <= 0.0 {
            return Err(SimulationError::invalid("target_density must be positive"));
        }
        if self.smoothing_radius <= 0.0 {
            return Err(SimulationError::invalid("smoothing_radius must be positive"));
        }
        if !(1..=MAX_KERNEL_EXPONENT).contains(&self.kernel_exponent) {
            return Err(SimulationError::invalid(format!(
                "kernel_exponent must be in 1..={MAX_KERNEL_EXPONENT}"
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(SimulationError::invalid("simulation bounds must be positive"));
        }
        if self.spatial_hash_bins == Some(0) {
            return Err(SimulationError::invalid("spatial_hash_bins must be at least 1"));
        }
        if self.worker_count == 0 {
            return Err(SimulationError::invalid("worker_count must be at least 1"));
        }
        if self.step_size < 0.0 {
            return Err(SimulationError::invalid("step_size must be non-negative"));
        }
        if self.viscosity_coefficient < 0.0 {
            return Err(SimulationError::invalid("viscosity_coefficient must be non-negative"));
        }
        if self.collision_damping < 0.0 {
            return Err(SimulationError::invalid("collision_damping must be non-negative"));
        }
        let half_extent = 0.5 * self.width.min(self.height);
        if self.boundary_jitter <= 0.0 || self.boundary_jitter >= half_extent {
            return Err(SimulationError::invalid(format!(
                "boundary_jitter must lie in (0, {half_extent})"
            )));
        }
        Ok(())
    }

    /// Grid cell edge length: twice the smoothing radius.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        2.0 * self.smoothing_radius
    }

    /// Number of cells along x and y covering the bounds.
    pub fn cell_counts(&self) -> (i64, i64) {
        let cell_size = self.cell_size();
        (
            (self.width / cell_size).ceil() as i64,
            (self.height / cell_size).ceil() as i64,
        )
    }

    /// Bin count with the "derive" sentinel resolved.
    ///
    /// The neighbour query visits cell coordinates in `[0, cells_x] x [0, cells_y]`,
    /// so the derived count gives each of those cells a bin of its own before
    /// hash collisions.
    pub fn bin_count(&self) -> usize {
        match self.spatial_hash_bins {
            Some(bins) => bins,
            None => {
                let (cells_x, cells_y) = self.cell_counts();
                ((cells_x + 1) * (cells_y + 1)).max(1) as usize
            }
        }
    }
}
