use noise::{NoiseFn, Perlin};

/// A deterministic scalar field over the plane.
///
/// Implementations are pure: the same coordinates always give the same value.
pub trait NoiseField: Send + Sync {
    /// Sample the field. Output is in `[-1.0, 1.0]`.
    fn sample(&self, x: f64, y: f64) -> f64;

    /// Returns the name of this field for debugging.
    fn name(&self) -> &'static str {
        "NoiseField"
    }
}

/// Seeded 2D gradient noise.
///
/// The permutation table is shuffled deterministically from the seed, so a
/// given seed produces the same field in every process.
#[derive(Clone, Debug)]
pub struct SeededNoise {
    seed: u32,
    perlin: Perlin,
}

impl SeededNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            perlin: Perlin::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseField for SeededNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        if !(x.is_finite() && y.is_finite()) {
            return 0.0;
        }
        self.perlin.get([x, y]).clamp(-1.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "SeededNoise"
    }
}
