//! Droplet-based hydraulic erosion.
//!
//! An [`Eroder`] owns everything that must survive between calls: the tunables,
//! the per-cell brush table and the random stream. Repeated `erode` calls on
//! the same instance continue one random sequence, so incremental batches look
//! like one long run.
pub mod brush;
pub mod droplet;
pub mod params;

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::{ErosionError, Result};
use crate::heightmap::HeightMap;
use brush::BrushCache;
use droplet::Droplet;
pub use params::ErosionParams;

/// Totals for one `erode` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ErosionSummary {
    pub droplets: usize,
    pub steps: usize,
    pub eroded: f64,
    pub deposited: f64,
    pub speed_resets: usize,
}

impl ErosionSummary {
    /// Fold another call's totals into this one.
    pub fn merge(&mut self, other: &ErosionSummary) {
        self.droplets += other.droplets;
        self.steps += other.steps;
        self.eroded += other.eroded;
        self.deposited += other.deposited;
        self.speed_resets += other.speed_resets;
    }
}

/// Caller-owned erosion simulator.
#[derive(Debug, Clone)]
pub struct Eroder {
    params: ErosionParams,
    brush: BrushCache,
    rng: StdRng,
    seed: u64,
    /// Seed used on reset instead of the wall clock.
    fixed_reset_seed: Option<u64>,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl Eroder {
    /// Create a simulator seeded from the wall clock.
    pub fn new(params: ErosionParams) -> Result<Self> {
        Self::with_seed(params, clock_seed())
    }

    /// Create a simulator with an explicit starting seed.
    pub fn with_seed(params: ErosionParams, seed: u64) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            brush: BrushCache::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            fixed_reset_seed: None,
        })
    }

    /// Make `reset_seed` reseed from `seed` instead of the clock.
    pub fn with_fixed_reset_seed(mut self, seed: u64) -> Self {
        self.fixed_reset_seed = Some(seed);
        self
    }

    pub fn params(&self) -> &ErosionParams {
        &self.params
    }

    /// Replace the tunables. A changed radius rebuilds the brush on the next call.
    pub fn set_params(&mut self, params: ErosionParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn brush(&self) -> &BrushCache {
        &self.brush
    }

    /// Seed of the current random stream.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn reseed(&mut self, seed: u64) {
        log::debug!("erosion rng reseeded: {seed}");
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = seed;
    }

    /// Build the brush for `map_size` if it is not already current.
    pub fn initialize_brush(&mut self, map_size: usize) -> Result<()> {
        let radius = self.params.erosion_radius;
        if map_size < 2 || radius == 0 || radius >= map_size {
            return Err(ErosionError::InvalidDimension { map_size, radius });
        }
        self.brush.ensure(map_size, radius);
        Ok(())
    }

    /// Simulate `droplet_count` droplets on `map`, in order, mutating it in place.
    ///
    /// With `reset_seed` the random stream restarts first (from the clock, or
    /// from the fixed reset seed when one is set). Zero droplets only prepares
    /// the brush.
    pub fn erode(&mut self, map: &mut HeightMap, droplet_count: usize, reset_seed: bool) -> Result<ErosionSummary> {
        let size = map.size;
        let expected = size * size;
        if map.data.len() != expected {
            return Err(ErosionError::DataLength { size, expected, actual: map.data.len() });
        }
        self.initialize_brush(size)?;

        if reset_seed {
            let seed = self.fixed_reset_seed.unwrap_or_else(clock_seed);
            self.reseed(seed);
        }

        let mut summary = ErosionSummary::default();
        for _ in 0..droplet_count {
            let x = self.rng.gen_range(0..size) as f32;
            let y = self.rng.gen_range(0..size) as f32;
            let trace = Droplet::spawn(x, y, &self.params).run(map, &self.brush, &self.params);
            summary.merge(&ErosionSummary {
                droplets: 1,
                steps: trace.steps,
                eroded: trace.eroded,
                deposited: trace.deposited,
                speed_resets: trace.speed_resets,
            });
        }

        if droplet_count > 0 {
            log::debug!(
                "eroded {} droplets: {} steps, eroded {:.4}, deposited {:.4}, {} speed resets",
                summary.droplets,
                summary.steps,
                summary.eroded,
                summary.deposited,
                summary.speed_resets,
            );
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slope(size: usize) -> HeightMap {
        HeightMap::from_fn(size, |_, x| 1.0 - x as f32 / size as f32).unwrap()
    }

    fn half_sums(map: &HeightMap) -> (f64, f64) {
        let half = map.size / 2;
        let mut upper = 0.0f64;
        let mut lower = 0.0f64;
        for y in 0..map.size {
            for x in 0..map.size {
                if x < half {
                    upper += map.get(y, x) as f64;
                } else {
                    lower += map.get(y, x) as f64;
                }
            }
        }
        (upper, lower)
    }

    #[test]
    fn zero_droplets_leave_the_map_untouched() {
        let mut map = HeightMap::new(9, 0.5).unwrap();
        let before = map.clone();
        let params = ErosionParams { erosion_radius: 4, ..ErosionParams::default() };
        let mut eroder = Eroder::with_seed(params, 1).unwrap();
        let summary = eroder.erode(&mut map, 0, true).unwrap();
        assert_eq!(summary, ErosionSummary::default());
        assert_eq!(map, before);
        assert_eq!(eroder.brush().len(), 81);
    }

    #[test]
    fn default_radius_works_on_small_maps() {
        let mut map = HeightMap::new(9, 0.5).unwrap();
        let before = map.clone();
        let mut eroder = Eroder::with_seed(ErosionParams::default(), 1).unwrap();
        eroder.erode(&mut map, 0, false).unwrap();
        assert_eq!(map, before);
    }

    #[test]
    fn radius_not_smaller_than_map_is_rejected() {
        let mut map = HeightMap::new(6, 0.5).unwrap();
        let mut eroder = Eroder::with_seed(ErosionParams::default(), 1).unwrap();
        let err = eroder.erode(&mut map, 10, false).unwrap_err();
        assert!(matches!(err, ErosionError::InvalidDimension { map_size: 6, radius: 6 }));
    }

    #[test]
    fn tampered_buffer_is_rejected() {
        let mut map = HeightMap::new(16, 0.5).unwrap();
        map.data.pop();
        let mut eroder = Eroder::with_seed(ErosionParams::default(), 1).unwrap();
        assert!(matches!(eroder.erode(&mut map, 1, false), Err(ErosionError::DataLength { .. })));
    }

    #[test]
    fn same_seed_gives_bit_identical_output() {
        let mut a = slope(48);
        let mut b = a.clone();
        let mut ea = Eroder::with_seed(ErosionParams::default(), 99).unwrap();
        let mut eb = Eroder::with_seed(ErosionParams::default(), 99).unwrap();
        ea.erode(&mut a, 300, false).unwrap();
        eb.erode(&mut b, 300, false).unwrap();
        assert!(a.data.iter().zip(&b.data).all(|(x, y)| x.to_bits() == y.to_bits()));
    }

    #[test]
    fn cloned_eroder_continues_the_same_stream() {
        let mut eroder = Eroder::with_seed(ErosionParams::default(), 5).unwrap();
        let mut warm = slope(32);
        eroder.erode(&mut warm, 50, false).unwrap();

        let mut twin = eroder.clone();
        let mut a = warm.clone();
        let mut b = warm;
        eroder.erode(&mut a, 100, false).unwrap();
        twin.erode(&mut b, 100, false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_reset_seed_restarts_the_stream() {
        let mut eroder = Eroder::with_seed(ErosionParams::default(), 3)
            .unwrap()
            .with_fixed_reset_seed(11);
        let mut a = slope(32);
        let mut b = a.clone();
        eroder.erode(&mut a, 200, true).unwrap();
        eroder.erode(&mut b, 200, true).unwrap();
        assert_eq!(a, b);
        assert_eq!(eroder.seed(), 11);
    }

    #[test]
    fn batches_continue_rather_than_repeat() {
        let mut eroder = Eroder::with_seed(ErosionParams::default(), 8).unwrap();
        let mut a = slope(32);
        let mut b = a.clone();
        eroder.erode(&mut a, 200, false).unwrap();
        eroder.erode(&mut b, 200, false).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn slope_moves_material_downhill() {
        let size = 64;
        let mut map = slope(size);
        let (upper_before, lower_before) = half_sums(&map);
        let mut eroder = Eroder::with_seed(ErosionParams::default(), 2024).unwrap();
        let summary = eroder.erode(&mut map, 1000, false).unwrap();
        let (upper_after, lower_after) = half_sums(&map);

        let upper_change = upper_after - upper_before;
        let lower_change = lower_after - lower_before;
        assert!(upper_change < 0.0, "upper half must lose material, changed by {upper_change:.4}");
        assert!(
            lower_change > upper_change,
            "lower half ({lower_change:.4}) should lose less than upper half ({upper_change:.4})"
        );
        assert!(summary.eroded > summary.deposited);
    }

    #[test]
    fn erosion_keeps_heights_non_negative() {
        let size = 48;
        // Shallow bowl close to zero so brush clamping is exercised.
        let c = size as f32 / 2.0;
        let mut map = HeightMap::from_fn(size, |y, x| {
            let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt() / c;
            (d * 0.05).min(0.05)
        })
        .unwrap();
        let mut eroder = Eroder::with_seed(ErosionParams::default(), 17).unwrap();
        eroder.erode(&mut map, 2000, false).unwrap();
        assert!(map.min_height() >= 0.0, "min height {}", map.min_height());
    }

    #[test]
    fn changing_radius_rebuilds_the_brush() {
        let mut map = slope(32);
        let mut eroder = Eroder::with_seed(ErosionParams::default(), 1).unwrap();
        eroder.erode(&mut map, 0, false).unwrap();
        assert_eq!(eroder.brush().radius(), 6);
        eroder
            .set_params(ErosionParams { erosion_radius: 3, ..ErosionParams::default() })
            .unwrap();
        eroder.erode(&mut map, 0, false).unwrap();
        assert_eq!(eroder.brush().radius(), 3);
    }
}
