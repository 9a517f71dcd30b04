/// SplitMix64 finalizer: scrambles a 64-bit value into a well-mixed hash.
#[inline]
pub fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Per-(tick, particle) seed derived from the run seed.
///
/// Lets parallel workers draw random numbers without sharing a generator,
/// with results independent of which worker handles which particle.
#[inline]
pub fn particle_seed(seed: u64, tick: u64, index: usize) -> u64 {
    splitmix64(splitmix64(seed ^ splitmix64(tick)) ^ index as u64)
}

/// Clamp to `[-1, 1]`, as used for the density color scalar.
#[inline]
pub fn clamp_unit(x: f32) -> f32 {
    x.clamp(-1.0, 1.0)
}
