//! Island pipeline: runs the startup passes in order and owns the map plus its
//! simulator between incremental erosion batches.

use serde::{Deserialize, Serialize};

use crate::erosion::{Eroder, ErosionParams, ErosionSummary};
use crate::error::Result;
use crate::heightmap::{HeightMap, HeightStats};
use crate::noise::{generate_noise_map, NoiseSettings};
use crate::shaping::{apply_gradient, remap, GradientType};

/// Offset handed to the border pass. Currently inert.
const ISLAND_OFFSET: f32 = 0.5;

/// Everything needed to reproduce an island from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandParams {
    pub seed: u64,
    /// Cells per side.
    pub map_size: usize,
    pub gradient: GradientType,
    pub noise: NoiseSettings,
    pub erosion: ErosionParams,
}

impl Default for IslandParams {
    fn default() -> Self {
        Self {
            seed: 42,
            map_size: 512,
            gradient: GradientType::Square,
            noise: NoiseSettings::default(),
            erosion: ErosionParams::default(),
        }
    }
}

impl IslandParams {
    /// Parse a (possibly partial) JSON document; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A heightmap together with the simulator that sculpts it.
#[derive(Debug, Clone)]
pub struct Island {
    params: IslandParams,
    map: HeightMap,
    eroder: Eroder,
}

impl Island {
    /// Build the starting terrain.
    ///
    /// Pipeline order:
    ///   1. Fractal noise in `[0, 1]`
    ///   2. Border falloff
    ///   3. Beach remap
    ///   4. Zero-droplet erosion: builds the brush and resets the random stream
    pub fn generate(params: IslandParams) -> Result<Self> {
        let eroder = Eroder::with_seed(params.erosion.clone(), params.seed)?
            .with_fixed_reset_seed(params.seed);
        let map = generate_noise_map(params.map_size, noise_seed(params.seed), &params.noise)?;
        let mut island = Self { params, map, eroder };
        island.shape();
        island.eroder.erode(&mut island.map, 0, true)?;
        log::info!(
            "island generated: {0}×{0}, {1} border, seed {2}",
            island.params.map_size,
            island.params.gradient,
            island.params.seed,
        );
        Ok(island)
    }

    fn shape(&mut self) {
        apply_gradient(&mut self.map, ISLAND_OFFSET, self.params.gradient);
        remap(&mut self.map);
    }

    /// Rebuild from fresh noise with a different border shape.
    ///
    /// Erosion applied so far is discarded along with the old map. The
    /// simulator is left alone: its brush already fits the map size and the
    /// next batch continues the current random stream.
    pub fn reshape(&mut self, gradient: GradientType) -> Result<()> {
        self.params.gradient = gradient;
        self.map = generate_noise_map(self.params.map_size, noise_seed(self.params.seed), &self.params.noise)?;
        self.shape();
        Ok(())
    }

    /// Drop one more batch of droplets, continuing the current random stream.
    pub fn erode(&mut self, droplets: usize) -> Result<ErosionSummary> {
        self.eroder.erode(&mut self.map, droplets, false)
    }

    pub fn params(&self) -> &IslandParams {
        &self.params
    }

    pub fn map(&self) -> &HeightMap {
        &self.map
    }

    pub fn eroder(&self) -> &Eroder {
        &self.eroder
    }

    pub fn stats(&self) -> HeightStats {
        self.map.stats()
    }

    pub fn into_map(self) -> HeightMap {
        self.map
    }
}

fn noise_seed(seed: u64) -> u32 {
    ((seed ^ (seed >> 32)) & 0xFFFF_FFFF) as u32
}
