use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Scale values at or below zero are clamped to this instead of failing, so
/// a degenerate configuration cannot divide by zero.
pub const MIN_SCALE: f64 = 1e-4;

/// Half-width of the uniform range each octave offset component is drawn
/// from.
const OFFSET_RANGE: f64 = 100_000.0;

/// Parameters of the fractal height function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Lateral sampling scale; larger values stretch features out
    pub scale: f64,
    /// Vertical scaling applied to the summed octaves
    pub height_multiplier: f64,
    /// Number of noise layers summed (>= 1)
    pub octaves: u32,
    /// Per-octave amplitude decay factor
    pub persistence: f64,
    /// Per-octave frequency growth factor
    pub lacunarity: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 8.0,
            height_multiplier: 2.0,
            octaves: 2,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Fractal height function over a continuous 2D domain.
///
/// Each build draws one random `(dx, dy)` offset per octave from the caller's
/// random source, so two fields built with the same parameters but different
/// sources produce independent terrain. For any one instance `height_at` is a
/// pure function of its inputs.
#[derive(Debug, Clone)]
pub struct NoiseField {
    perlin: Perlin,
    scale: f64,
    height_multiplier: f64,
    persistence: f64,
    lacunarity: f64,
    octave_offsets: Vec<(f64, f64)>,
}

impl NoiseField {
    /// Build a field, drawing octave offsets from `rng`.
    ///
    /// The random source is injected so that seeding policy stays with the
    /// caller; the field itself never touches process entropy.
    pub fn from_rng(params: NoiseParams, rng: &mut impl Rng) -> Self {
        let octaves = params.octaves.max(1);
        let octave_offsets = (0..octaves)
            .map(|_| {
                (
                    rng.gen_range(-OFFSET_RANGE..=OFFSET_RANGE),
                    rng.gen_range(-OFFSET_RANGE..=OFFSET_RANGE),
                )
            })
            .collect();

        Self {
            perlin: Perlin::new(rng.gen()),
            scale: if params.scale > 0.0 {
                params.scale
            } else {
                MIN_SCALE
            },
            height_multiplier: params.height_multiplier,
            persistence: params.persistence,
            lacunarity: params.lacunarity,
            octave_offsets,
        }
    }

    /// Build a field deterministically from an explicit seed.
    pub fn seeded(params: NoiseParams, seed: u64) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self::from_rng(params, &mut rng)
    }

    pub fn octaves(&self) -> usize {
        self.octave_offsets.len()
    }

    /// Evaluate the height at sample point `(x, y)`.
    ///
    /// Sums one coherent-noise sample per octave: amplitude starts at 1 and
    /// decays by `persistence`, frequency starts at 1 and grows by
    /// `lacunarity`, and each octave samples at its own fixed random offset.
    /// The final sum is scaled by `height_multiplier`.
    pub fn height_at(&self, x: f64, y: f64) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut noise_height = 0.0;

        for &(dx, dy) in &self.octave_offsets {
            let sample_x = x / self.scale * frequency + dx;
            let sample_y = y / self.scale * frequency + dy;

            // Unit-range coherent noise remapped to [-1, 1]
            let n = self.coherent_noise_01(sample_x, sample_y) * 2.0 - 1.0;
            noise_height += n * amplitude;

            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        noise_height * self.height_multiplier
    }

    /// The base coherent-noise primitive, normalized to [0, 1].
    fn coherent_noise_01(&self, x: f64, y: f64) -> f64 {
        (self.perlin.get([x, y]) + 1.0) * 0.5
    }
}
