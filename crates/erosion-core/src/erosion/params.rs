use serde::{Deserialize, Serialize};

use crate::error::{ErosionError, Result};

/// Droplet simulation tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionParams {
    /// Brush radius in cells (≥ 1). Erosion is spread over a disc this wide.
    pub erosion_radius: usize,
    /// 0 = droplets turn instantly downhill, 1 = droplets never change direction.
    pub inertia: f32,
    /// Multiplier on the sediment a droplet can carry.
    pub sediment_capacity_factor: f32,
    /// Capacity floor, keeps flat terrain from stalling transport entirely.
    pub min_sediment_capacity: f32,
    /// Fraction of free capacity eroded per step, 0-1.
    pub erode_speed: f32,
    /// Fraction of excess sediment deposited per step, 0-1.
    pub deposit_speed: f32,
    /// Fraction of water lost per step, 0-1.
    pub evaporate_speed: f32,
    pub gravity: f32,
    /// Upper bound on steps per droplet.
    pub max_droplet_lifetime: usize,
    pub initial_water_volume: f32,
    pub initial_speed: f32,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            erosion_radius: 6,
            inertia: 0.05,
            sediment_capacity_factor: 6.0,
            min_sediment_capacity: 0.01,
            erode_speed: 0.3,
            deposit_speed: 0.3,
            evaporate_speed: 0.01,
            gravity: 4.0,
            max_droplet_lifetime: 60,
            initial_water_volume: 1.0,
            initial_speed: 1.0,
        }
    }
}

fn check(name: &'static str, value: f32, ok: bool, expected: &'static str) -> Result<()> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(ErosionError::InvalidParameter { name, value: value as f64, expected })
    }
}

fn unit(name: &'static str, value: f32) -> Result<()> {
    check(name, value, (0.0..=1.0).contains(&value), "0..=1")
}

fn non_negative(name: &'static str, value: f32) -> Result<()> {
    check(name, value, value >= 0.0, ">= 0")
}

impl ErosionParams {
    /// Reject tunables outside their meaningful ranges.
    pub fn validate(&self) -> Result<()> {
        if self.erosion_radius == 0 {
            return Err(ErosionError::InvalidParameter {
                name: "erosion_radius",
                value: 0.0,
                expected: ">= 1",
            });
        }
        if self.max_droplet_lifetime == 0 {
            return Err(ErosionError::InvalidParameter {
                name: "max_droplet_lifetime",
                value: 0.0,
                expected: ">= 1",
            });
        }
        unit("inertia", self.inertia)?;
        unit("erode_speed", self.erode_speed)?;
        unit("deposit_speed", self.deposit_speed)?;
        unit("evaporate_speed", self.evaporate_speed)?;
        non_negative("sediment_capacity_factor", self.sediment_capacity_factor)?;
        non_negative("min_sediment_capacity", self.min_sediment_capacity)?;
        non_negative("gravity", self.gravity)?;
        non_negative("initial_speed", self.initial_speed)?;
        check(
            "initial_water_volume",
            self.initial_water_volume,
            self.initial_water_volume > 0.0,
            "> 0",
        )
    }
}
