use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::boundary::WallBox;
use crate::config::SimulationConfig;
use crate::dispatch::WorkerPool;
use crate::error::SimulationError;
use crate::grid::SpatialHashGrid;
use crate::kernel::SmoothingKernel;
use crate::math::{clamp_unit, particle_seed};
use crate::particle::{Particle, ParticleStore};

/// Coefficients the force pass needs, copied out of the config once.
#[derive(Clone, Copy, Debug)]
struct ForceParams {
    particle_mass: f32,
    target_density: f32,
    gravity_strength: f32,
    pressure_coefficient: f32,
    viscosity_coefficient: f32,
    step_size: f32,
}

impl ForceParams {
    fn from_config(config: &SimulationConfig) -> Self {
        Self {
            particle_mass: config.particle_mass,
            target_density: config.target_density,
            gravity_strength: config.gravity_strength,
            pressure_coefficient: config.pressure_coefficient,
            viscosity_coefficient: config.viscosity_coefficient,
            step_size: config.step_size,
        }
    }

    /// Average of both particles' pressures, so the pair feels equal and
    /// opposite forces.
    #[inline]
    fn shared_pressure(&self, density_a: f32, density_b: f32) -> f32 {
        let pressure_a = density_a - self.target_density;
        let pressure_b = density_b - self.target_density;
        self.pressure_coefficient * (pressure_a + pressure_b) / 2.0
    }
}

/// A running SPH simulation: particles, neighbour grid, worker pool and the
/// fixed parameters they were built from.
///
/// Each [`tick`](Self::tick) runs predict, grid rebuild, density pass and
/// force pass in that order, and returns only when all of them are done.
pub struct Simulation {
    config: SimulationConfig,
    params: ForceParams,
    kernel: SmoothingKernel,
    walls: WallBox,
    grid: SpatialHashGrid,
    store: ParticleStore,
    pool: WorkerPool,
    seed: u64,
    tick: u64,
}

impl Simulation {
    /// Build a simulation with `config.particle_count` particles scattered
    /// uniformly over the bounds.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let seed = config.random_seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let bounds = Vec2::new(config.width, config.height);
        let store = ParticleStore::scatter(config.particle_count, bounds, &mut rng);
        Self::build(config, store, seed)
    }

    /// Build a simulation from caller-placed particles.
    ///
    /// `particles.len()` must equal `config.particle_count`.
    pub fn with_particles(
        config: SimulationConfig,
        particles: Vec<Particle>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        if particles.len() != config.particle_count {
            return Err(SimulationError::ParticleCountMismatch {
                expected: config.particle_count,
                actual: particles.len(),
            });
        }
        let seed = config.random_seed.unwrap_or_else(rand::random);
        Self::build(config, ParticleStore::new(particles), seed)
    }

    fn build(
        config: SimulationConfig,
        store: ParticleStore,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        let bounds = Vec2::new(config.width, config.height);
        let bin_count = config.bin_count();
        if config.spatial_hash_bins.is_none() {
            tracing::debug!(bin_count, "derived spatial hash bin count from bounds");
        }

        let pool = WorkerPool::new(config.worker_count)?;
        let grid = SpatialHashGrid::new(config.cell_size(), bounds, bin_count, store.len());

        tracing::info!(
            particles = store.len(),
            bins = bin_count,
            workers = pool.workers(),
            seed,
            "simulation initialised"
        );

        Ok(Self {
            params: ForceParams::from_config(&config),
            kernel: SmoothingKernel::new(config.smoothing_radius, config.kernel_exponent),
            walls: WallBox::new(bounds, config.collision_damping, config.boundary_jitter),
            grid,
            store,
            pool,
            seed,
            tick: 0,
            config,
        })
    }

    /// Advance the simulation by one step of `config.step_size`.
    pub fn tick(&mut self) {
        let _span = tracing::trace_span!("tick", tick = self.tick).entered();
        let ParticleStore {
            particles,
            densities,
            snapshot,
        } = &mut self.store;
        let params = self.params;
        let kernel = self.kernel;
        let walls = self.walls;
        let (seed, tick) = (self.seed, self.tick);

        // 1. Predict
        for particle in particles.iter_mut() {
            particle.predicted_position = particle.position + params.step_size * particle.velocity;
        }

        // 2. Rebuild grid from predicted positions
        self.grid.rebuild(&particles[..]);
        let grid = &self.grid;

        // 3. Density pass
        {
            let particles: &[Particle] = &particles[..];
            self.pool.for_each_slot(&mut densities[..], |i, density| {
                *density = density_at(
                    particles[i].predicted_position,
                    particles,
                    grid,
                    &kernel,
                    params.particle_mass,
                );
            });
        }

        // 4. Force pass: neighbours are read from the snapshot, each worker
        // writes only its own particle.
        snapshot.copy_from_slice(&particles[..]);
        let snapshot: &[Particle] = &snapshot[..];
        let densities: &[f32] = &densities[..];
        self.pool.for_each_slot(&mut particles[..], |i, particle| {
            let force = net_force(i, snapshot, densities, grid, &kernel, &params);
            particle.velocity += (params.step_size / densities[i]) * force;
            particle.position += params.step_size * particle.velocity;
            walls.resolve(
                &mut particle.position,
                &mut particle.velocity,
                particle_seed(seed, tick, i),
            );
        });

        self.tick += 1;
        tracing::trace!(tick = self.tick, "tick complete");
    }

    /// Run `ticks` ticks back to back.
    pub fn advance(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Per-particle color scalar `clamp((rho - rho0) / rho0, -1, 1)`.
    pub fn colors(&self) -> Vec<f32> {
        let mut colors = vec![0.0; self.store.len()];
        self.write_colors(&mut colors);
        colors
    }

    /// Write the color scalars into `out`, one per particle.
    pub fn write_colors(&self, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.store.len());
        let target = self.config.target_density;
        for (color, &density) in out.iter_mut().zip(self.store.densities()) {
            *color = clamp_unit((density - target) / target);
        }
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    #[inline]
    pub fn densities(&self) -> &[f32] {
        self.store.densities()
    }

    #[inline]
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    #[inline]
    pub fn grid(&self) -> &SpatialHashGrid {
        &self.grid
    }

    #[inline]
    pub fn kernel(&self) -> &SmoothingKernel {
        &self.kernel
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Seed actually used for this run (generated if the config had none).
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of completed ticks.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn bounds(&self) -> Vec2 {
        self.walls.bounds
    }
}

/// Kernel-weighted mass around `position`, self-contribution included.
fn density_at(
    position: Vec2,
    particles: &[Particle],
    grid: &SpatialHashGrid,
    kernel: &SmoothingKernel,
    mass: f32,
) -> f32 {
    let mut density = 0.0_f32;
    grid.for_each_neighbor(position, |j| {
        let r = (position - particles[j].predicted_position).length();
        density += mass * kernel.value(r);
    });
    density
}

/// Gravity plus pressure and viscosity from every neighbour of particle `i`.
fn net_force(
    i: usize,
    particles: &[Particle],
    densities: &[f32],
    grid: &SpatialHashGrid,
    kernel: &SmoothingKernel,
    params: &ForceParams,
) -> Vec2 {
    let me = particles[i];
    let density_i = densities[i];
    let h = kernel.radius();

    // y grows downwards on screen
    let mut force = Vec2::new(0.0, params.gravity_strength);

    grid.for_each_neighbor(me.predicted_position, |j| {
        if j == i {
            return;
        }
        let other = &particles[j];
        let offset = me.predicted_position - other.predicted_position;
        let r = offset.length();
        // hash collisions can report particles far outside the kernel
        if r >= h {
            return;
        }

        // Coincident particles have no direction to push along
        if r > 0.0 {
            let direction = offset / r;
            let density_j = densities[j];
            let pressure = params.shared_pressure(density_i, density_j);
            let magnitude =
                pressure * kernel.gradient_magnitude(r) * params.particle_mass / density_j;
            force += magnitude * direction;
        }

        force -= kernel.value(r) * params.viscosity_coefficient * (me.velocity - other.velocity);
    });

    force
}
