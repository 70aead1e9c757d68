//! Deterministic terrain height sampling.

use noise::{NoiseFn, Simplex};
use veld_config::TerrainConfig;

/// The terrain height oracle.
///
/// `height(x, z)` must be a pure, deterministic function of world
/// coordinates: the same input always yields the same height, across calls
/// and across chunk regenerations.
pub trait TerrainHeight {
    /// Terrain height at the given world coordinate.
    fn height(&self, x: f64, z: f64) -> f64;
}

/// Multi-octave simplex fBm mapped into a configured height range.
///
/// Octaves double in frequency and halve in amplitude (by default), producing
/// self-similar detail; the composite is normalized by the geometric sum of
/// octave amplitudes and remapped to `[min_height, max_height]`.
pub struct HeightField {
    noise: Simplex,
    octaves: u32,
    frequency: f64,
    lacunarity: f64,
    persistence: f64,
    min_height: f64,
    max_height: f64,
    max_amplitude: f64,
}

impl HeightField {
    /// Build a height field from terrain configuration.
    pub fn from_config(config: &TerrainConfig) -> Self {
        let mut max_amplitude = 0.0;
        let mut amplitude = 1.0;
        for _ in 0..config.octaves {
            max_amplitude += amplitude;
            amplitude *= config.persistence;
        }

        Self {
            noise: Simplex::new(config.seed),
            octaves: config.octaves,
            frequency: config.frequency,
            lacunarity: config.lacunarity,
            persistence: config.persistence,
            min_height: config.min_height,
            max_height: config.max_height,
            max_amplitude,
        }
    }

    fn fbm(&self, x: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.frequency;
        let mut amplitude = 1.0;
        for _ in 0..self.octaves {
            total += self.noise.get([x * frequency, z * frequency]) * amplitude;
            frequency *= self.lacunarity;
            amplitude *= self.persistence;
        }
        total
    }
}

impl TerrainHeight for HeightField {
    fn height(&self, x: f64, z: f64) -> f64 {
        if self.max_amplitude == 0.0 {
            return (self.min_height + self.max_height) * 0.5;
        }
        // Normalize fBm output from [-max_amplitude, +max_amplitude] to [0, 1]
        let normalized = (self.fbm(x, z) / self.max_amplitude + 1.0) * 0.5;
        let height = self.min_height + normalized * (self.max_height - self.min_height);
        height.clamp(self.min_height, self.max_height)
    }
}
