//! Seedable random streams with deterministic splitting.

use penta_math::Vec4;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::Exp1;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Seed used by [`Sampler::default`].
pub const DEFAULT_SEED: u64 = 5489;

/// A random stream owned by exactly one thread at a time.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: Xoshiro256PlusPlus,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Sampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Derive `n` independent child streams.
    ///
    /// Each child is seeded from one draw of this stream, so the parent
    /// advances too and stays independent of its children.
    pub fn split(&mut self, n: usize) -> Vec<Sampler> {
        (0..n).map(|_| Sampler::new(self.rng.next_u64())).collect()
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform value in `[lo, hi)`.
    pub fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.rng.gen::<f32>()
    }

    /// Uniform direction on the half of S³ around `normal`.
    pub fn uniform_hemisphere(&mut self, normal: Vec4) -> Vec4 {
        let dir = self.uniform_sphere();
        if dir.dot(normal) < 0.0 {
            -dir
        } else {
            dir
        }
    }

    /// Uniform direction on S³, by rejection from the 4-cube.
    pub fn uniform_sphere(&mut self) -> Vec4 {
        loop {
            let v = Vec4::new(
                self.uniform(-1.0, 1.0),
                self.uniform(-1.0, 1.0),
                self.uniform(-1.0, 1.0),
                self.uniform(-1.0, 1.0),
            );
            let len_sq = v.length_squared();
            if len_sq <= 1.0 && len_sq > 1e-12 {
                return v / len_sq.sqrt();
            }
        }
    }

    /// Distance to the next scattering event in a medium with mean free path `sigma`.
    pub fn free_path(&mut self, sigma: f32) -> f32 {
        let unit: f32 = self.rng.sample(Exp1);
        unit * sigma
    }
}
