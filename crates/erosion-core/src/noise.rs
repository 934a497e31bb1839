//! Fractal Perlin noise for the starting heightmap.
//!
//! fBm: sum of octaves with amplitude = gain^i and frequency = lacunarity^i,
//! then rescaled so the map spans exactly `[0, 1]`.
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::heightmap::HeightMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub octaves: u32,
    pub lacunarity: f64,
    /// Per-octave amplitude decay.
    pub gain: f64,
    /// Base-octave cycles across the map.
    pub scale: f64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self { octaves: 4, lacunarity: 2.0, gain: 0.5, scale: 4.0 }
    }
}

pub struct Fbm {
    settings: NoiseSettings,
    noise: Perlin,
}

impl Fbm {
    pub fn new(seed: u32, settings: NoiseSettings) -> Self {
        Self { settings, noise: Perlin::new(seed) }
    }

    /// Evaluate fBm at `(x, y)` in noise space. Unscaled, roughly ±1.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut value = 0.0f64;
        let mut amp = 1.0f64;
        let mut freq = 1.0f64;
        for _ in 0..self.settings.octaves {
            value += amp * self.noise.get([x * freq, y * freq]);
            amp *= self.settings.gain;
            freq *= self.settings.lacunarity;
        }
        value
    }
}

/// Generate a `size × size` fBm map normalized to `[0, 1]`.
///
/// A constant field (e.g. zero octaves) comes back as all zeros.
pub fn generate_noise_map(size: usize, seed: u32, settings: &NoiseSettings) -> Result<HeightMap> {
    let fbm = Fbm::new(seed, settings.clone());
    let freq = settings.scale / size as f64;
    let mut map = HeightMap::from_fn(size, |y, x| fbm.sample(x as f64 * freq, y as f64 * freq) as f32)?;

    let min_v = map.min_height();
    let range = map.max_height() - min_v;
    for v in &mut map.data {
        *v = if range > 0.0 { (*v - min_v) / range } else { 0.0 };
    }
    Ok(map)
}
