//! Two independent pseudo-random streams per brush.
//!
//! The reference implementation kept a single process-wide `rand_r` seed
//! per stream, which made two brushes on the same canvas share entropy and
//! made tests depend on call order across the whole process. Here each
//! [`BrushRng`] owns its own pair of seeds, so a brush's dab sequence is a
//! pure function of its own seed and the number of times it has been
//! sampled, regardless of what else is running.

/// A minimal `rand_r`-style linear congruential generator, matching the
/// classic glibc `TYPE_0` constants.
#[inline]
fn rand_r(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
    (*seed / 65536) % 32768
}

/// Two independent `[0, 1]` random streams owned by one brush instance.
///
/// `rand1` and `rand2` are seeded from the same value offset by a fixed
/// constant, so distinct brush seeds always produce distinct, uncorrelated
/// pairs of streams.
#[derive(Debug, Clone)]
pub struct BrushRng {
    seed1: u32,
    seed2: u32,
}

impl BrushRng {
    /// Creates a new generator from a single seed.
    pub fn new(seed: u64) -> Self {
        let seed1 = seed as u32;
        let seed2 = (seed as u32) ^ 0x01fa_9b36;
        Self { seed1, seed2 }
    }

    /// Draws the next value from stream 1, in `[0, 1)`.
    #[inline]
    pub fn rand1(&mut self) -> f32 {
        rand_r(&mut self.seed1) as f32 / 32768.0
    }

    /// Draws the next value from stream 2, in `[0, 1)`.
    #[inline]
    pub fn rand2(&mut self) -> f32 {
        rand_r(&mut self.seed2) as f32 / 32768.0
    }

    /// Draws from stream 1 and remaps to `[-1, 1)`.
    #[inline]
    pub fn rand1_signed(&mut self) -> f32 {
        self.rand1() * 2.0 - 1.0
    }

    /// Draws from stream 2 and remaps to `[-1, 1)`.
    #[inline]
    pub fn rand2_signed(&mut self) -> f32 {
        self.rand2() * 2.0 - 1.0
    }
}
