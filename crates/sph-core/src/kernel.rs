use std::f32::consts::PI;

/// Normalization factor of the 2D polynomial kernel `(h - r)^n`.
///
/// Returns `(n^2 + 3n + 2) / (2 * PI * h^(n+2))`, which makes the kernel
/// integrate to one over the disc of radius `h`.
#[inline]
pub fn normalization(radius: f32, exponent: u32) -> f32 {
    let n = exponent as f32;
    (n * n + 3.0 * n + 2.0) / (2.0 * PI * radius.powi(exponent as i32 + 2))
}

/// Polynomial smoothing kernel `W(r) = c * (h - r)^n` with its normalization
/// precomputed.
///
/// Displacements are clamped to `h`, so the kernel reaches exactly zero at the
/// radius and stays there beyond it. Both the value and the gradient magnitude
/// are finite at `r = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothingKernel {
    radius: f32,
    exponent: u32,
    normalization: f32,
}

impl SmoothingKernel {
    pub fn new(radius: f32, exponent: u32) -> Self {
        Self {
            radius,
            exponent,
            normalization: normalization(radius, exponent),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    #[inline]
    pub fn normalization(&self) -> f32 {
        self.normalization
    }

    /// Influence weight at distance `r`.
    #[inline]
    pub fn value(&self, r: f32) -> f32 {
        let r = r.min(self.radius);
        self.normalization * (self.radius - r).powi(self.exponent as i32)
    }

    /// Magnitude of the kernel slope at distance `r`.
    ///
    /// Callers scale a unit displacement direction by this to get a vector.
    #[inline]
    pub fn gradient_magnitude(&self, r: f32) -> f32 {
        let r = r.min(self.radius);
        self.exponent as f32
            * self.normalization
            * (self.radius - r).powi(self.exponent as i32 - 1)
    }
}
