//! Vegetation site selection.
//!
//! Random cells are accepted when their world height lies in a band above the
//! shoreline and their slope is gentle enough to carry grass. Slope comes from
//! the Sobel normal: `slope = 1 − normal.y`.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::heightmap::HeightMap;
use crate::normal::get_normal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteFilter {
    /// Slope where grass has fully faded out.
    pub grass_slope_threshold: f32,
    /// Fraction of the threshold over which grass fades.
    pub grass_blend_amount: f32,
    pub min_grass_weight: f32,
    /// World height = map value · height_scale + height_offset.
    pub height_scale: f32,
    pub height_offset: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Draws allowed per requested site before giving up.
    pub max_attempts_per_site: usize,
}

impl Default for SiteFilter {
    fn default() -> Self {
        Self {
            grass_slope_threshold: 0.2,
            grass_blend_amount: 0.55,
            min_grass_weight: 0.65,
            height_scale: 8.0,
            height_offset: -1.1,
            min_height: 0.32,
            max_height: 3.25,
            max_attempts_per_site: 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreeSite {
    pub x: usize,
    pub y: usize,
    /// World-space height of the ground under the tree.
    pub height: f32,
    pub normal: [f32; 3],
}

impl SiteFilter {
    /// 1 on flat ground, fading linearly to 0 as slope reaches the threshold.
    pub fn grass_weight(&self, slope: f32) -> f32 {
        let blend_height = self.grass_slope_threshold * (1.0 - self.grass_blend_amount);
        let t = (slope - blend_height) / (self.grass_slope_threshold - blend_height);
        1.0 - t.clamp(0.0, 1.0)
    }

    pub fn world_height(&self, value: f32) -> f32 {
        value * self.height_scale + self.height_offset
    }

    /// Evaluate cell `(x, y)`, returning a site when it passes both filters.
    pub fn check(&self, map: &HeightMap, x: usize, y: usize) -> Option<TreeSite> {
        let height = self.world_height(map.get(y, x));
        if height < self.min_height || height > self.max_height {
            return None;
        }
        let normal = get_normal(map, x, y);
        if self.grass_weight(1.0 - normal[1]) < self.min_grass_weight {
            return None;
        }
        Some(TreeSite { x, y, height, normal })
    }
}

/// Draw up to `count` accepted sites from random cells.
///
/// Gives up after `count · max_attempts_per_site` draws, so barren maps return
/// fewer sites instead of spinning forever.
pub fn find_tree_sites<R: Rng>(
    map: &HeightMap,
    count: usize,
    rng: &mut R,
    filter: &SiteFilter,
) -> Vec<TreeSite> {
    let mut sites = Vec::with_capacity(count);
    let max_attempts = count.saturating_mul(filter.max_attempts_per_site);
    let mut attempts = 0usize;
    while sites.len() < count && attempts < max_attempts {
        attempts += 1;
        let x = rng.gen_range(0..map.size);
        let y = rng.gen_range(0..map.size);
        if let Some(site) = filter.check(map, x, y) {
            sites.push(site);
        }
    }
    if sites.len() < count {
        log::debug!("tree placement found {} of {count} sites in {attempts} draws", sites.len());
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn grass_weight_fades_between_blend_and_threshold() {
        let f = SiteFilter::default();
        assert_eq!(f.grass_weight(0.0), 1.0);
        assert_eq!(f.grass_weight(0.5), 0.0);
        // Blend starts at 0.2 · 0.45 = 0.09; halfway to 0.2 is 0.145.
        assert_abs_diff_eq!(f.grass_weight(0.145), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn flat_meadow_accepts_every_draw() {
        // 0.3 · 8 − 1.1 = 1.3, inside the height band.
        let map = HeightMap::new(32, 0.3).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let sites = find_tree_sites(&map, 50, &mut rng, &SiteFilter::default());
        assert_eq!(sites.len(), 50);
        for s in &sites {
            assert_abs_diff_eq!(s.height, 1.3, epsilon = 1e-5);
            assert_abs_diff_eq!(s.normal[1], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn underwater_map_yields_nothing() {
        let map = HeightMap::new(16, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let filter = SiteFilter { max_attempts_per_site: 4, ..SiteFilter::default() };
        assert!(find_tree_sites(&map, 10, &mut rng, &filter).is_empty());
    }

    #[test]
    fn steep_cells_are_rejected() {
        // Strong ramp in band height: Sobel slope far above the grass threshold.
        let map = HeightMap::from_fn(16, |_, x| 0.2 + x as f32 * 0.02).unwrap();
        let filter = SiteFilter::default();
        assert!(filter.check(&map, 8, 8).is_none());
    }
}
