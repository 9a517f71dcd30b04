use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Axis-aligned walls at `0` and `bounds` on each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallBox {
    pub bounds: Vec2,
    /// Fraction of the normal velocity kept after a bounce.
    pub damping: f32,
    /// Largest distance from the wall a colliding particle is moved to.
    pub jitter: f32,
}

impl WallBox {
    pub fn new(bounds: Vec2, damping: f32, jitter: f32) -> Self {
        Self {
            bounds,
            damping,
            jitter,
        }
    }

    /// Push a particle that reached or crossed a wall back inside and reflect it.
    ///
    /// Each axis is handled on its own. The particle lands a random distance in
    /// `(0, jitter]` from the wall rather than exactly on it, so particles do not
    /// pile up on the boundary at rest. Randomness is drawn from `seed` only when
    /// a collision happens. Returns whether any wall was hit.
    pub fn resolve(&self, position: &mut Vec2, velocity: &mut Vec2, seed: u64) -> bool {
        let mut rng: Option<ChaCha8Rng> = None;
        let mut hit = false;

        for axis in 0..2 {
            let bound = self.bounds[axis];
            let p = position[axis];
            if p.is_nan() || (p > 0.0 && p < bound) {
                continue;
            }

            let rng = rng.get_or_insert_with(|| ChaCha8Rng::seed_from_u64(seed));
            // 1 - [0, 1) keeps the offset strictly positive
            let offset = self.jitter * (1.0 - rng.gen::<f32>());
            position[axis] = if p <= 0.0 {
                offset
            } else {
                below(bound - offset, bound)
            };
            velocity[axis] = -velocity[axis] * self.damping;
            hit = true;
        }
        hit
    }
}

/// `x` if it is strictly below `bound`, otherwise the largest `f32` that is.
///
/// `bound - offset` rounds back to `bound` when `offset` is under half an ulp.
#[inline]
fn below(x: f32, bound: f32) -> f32 {
    if x < bound {
        x
    } else {
        // bound is positive and finite, so the previous bit pattern is the next float down
        f32::from_bits(bound.to_bits() - 1)
    }
}
