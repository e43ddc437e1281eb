//! Random level assignment for inserted points.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Samples the top layer of each inserted point.
///
/// Levels follow `floor(-ln(U) * mult)` with `mult = 1 / ln(m)`, so most
/// points stay on layer 0 and each higher layer is roughly `m` times sparser.
/// The generator is owned and seeded: the same seed and the same number of
/// calls always produce the same levels.
#[derive(Debug, Clone)]
pub struct LayerAssigner {
    rng: StdRng,
    mult: f64,
    draws: u64,
}

impl LayerAssigner {
    pub fn new(mult: f64, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            mult,
            draws: 0,
        }
    }

    /// Recreate an assigner that has already produced `draws` levels.
    pub fn resume(mult: f64, seed: u64, draws: u64) -> Self {
        let mut assigner = Self::new(mult, seed);
        for _ in 0..draws {
            assigner.sample_layer();
        }
        assigner
    }

    pub fn sample_layer(&mut self) -> usize {
        // gen() is in [0, 1); flip it so ln never sees zero.
        let u: f64 = 1.0 - self.rng.gen::<f64>();
        self.draws += 1;
        (-u.ln() * self.mult).floor() as usize
    }

    /// Number of levels sampled so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}
