use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use rand::Rng;

/// One fluid particle. Identified by its index in the [`ParticleStore`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Confirmed position, carried into the next tick.
    pub position: Vec2,
    /// Look-ahead position used for neighbour search and kernel evaluation.
    pub predicted_position: Vec2,
    pub velocity: Vec2,
}

impl Particle {
    /// Particle at rest at `position`.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            predicted_position: position,
            velocity: Vec2::ZERO,
        }
    }

    pub fn with_velocity(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            predicted_position: position,
            velocity,
        }
    }
}

/// Dense particle array plus the per-tick scratch buffers sized to it.
///
/// The particle count never changes after construction. `densities` and
/// `snapshot` are overwritten in full every tick.
pub struct ParticleStore {
    pub(crate) particles: Vec<Particle>,
    pub(crate) densities: Vec<f32>,
    /// Read-only copy of `particles` used by the force pass for neighbour reads.
    pub(crate) snapshot: Vec<Particle>,
}

impl ParticleStore {
    pub fn new(particles: Vec<Particle>) -> Self {
        let count = particles.len();
        Self {
            particles,
            densities: vec![0.0; count],
            snapshot: vec![Particle::zeroed(); count],
        }
    }

    /// Scatter `count` particles uniformly over `[0, bounds.x) x [0, bounds.y)`.
    pub fn scatter<R: Rng>(count: usize, bounds: Vec2, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| {
                let x = rng.gen_range(0.0..bounds.x);
                let y = rng.gen_range(0.0..bounds.y);
                Particle::at(Vec2::new(x, y))
            })
            .collect();
        Self::new(particles)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Densities from the most recent tick (zero before the first tick).
    #[inline]
    pub fn densities(&self) -> &[f32] {
        &self.densities
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Particle)> {
        self.particles.iter().enumerate()
    }

    /// Raw bytes of the particle array, laid out as `#[repr(C)]` [`Particle`]s.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }
}
