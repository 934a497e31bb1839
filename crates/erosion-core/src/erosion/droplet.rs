//! Single droplet lifecycle.
//!
//! Each step:
//!   1. Sample height and gradient at the current position.
//!   2. Blend the old direction with the downhill gradient by `inertia` and
//!      move one cell along it.
//!   3. Compare heights; deposit when carrying too much or climbing, otherwise
//!      erode through the brush of the cell just left.
//!   4. Update speed from the height change and evaporate some water.
use crate::heightmap::HeightMap;
use super::brush::BrushCache;
use super::params::ErosionParams;

/// Direction lengths at or below this are left unnormalized.
const MIN_DIRECTION_LEN: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Droplet {
    pub x: f32,
    pub y: f32,
    pub dir_x: f32,
    pub dir_y: f32,
    pub speed: f32,
    pub water: f32,
    pub sediment: f32,
}

/// What one droplet did to the map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DropletTrace {
    pub steps: usize,
    pub eroded: f64,
    pub deposited: f64,
    pub speed_resets: usize,
}

impl Droplet {
    pub fn spawn(x: f32, y: f32, params: &ErosionParams) -> Self {
        Self {
            x,
            y,
            dir_x: 0.0,
            dir_y: 0.0,
            speed: params.initial_speed,
            water: params.initial_water_volume,
            sediment: 0.0,
        }
    }

    /// True while the droplet sits where the bilinear sampler may read it.
    #[inline]
    fn on_map(&self, size: usize) -> bool {
        let limit = (size - 1) as f32;
        self.x >= 0.0 && self.x < limit && self.y >= 0.0 && self.y < limit
    }

    /// Run the droplet until it stalls, leaves the map or runs out of lifetime.
    ///
    /// Caller must ensure `brush` was built for `map.size`.
    pub fn run(mut self, map: &mut HeightMap, brush: &BrushCache, params: &ErosionParams) -> DropletTrace {
        let size = map.size;
        let mut trace = DropletTrace::default();

        // Droplets spawned on the last row or column have nowhere to flow.
        if !self.on_map(size) {
            return trace;
        }

        for _ in 0..params.max_droplet_lifetime {
            let node_x = self.x as usize;
            let node_y = self.y as usize;
            let cell = node_y * size + node_x;

            let here = map.sample(self.x, self.y);

            self.dir_x = self.dir_x * params.inertia - here.gradient_x * (1.0 - params.inertia);
            self.dir_y = self.dir_y * params.inertia - here.gradient_y * (1.0 - params.inertia);
            let len = (self.dir_x * self.dir_x + self.dir_y * self.dir_y).sqrt();
            if len > MIN_DIRECTION_LEN {
                self.dir_x /= len;
                self.dir_y /= len;
            }

            self.x += self.dir_x;
            self.y += self.dir_y;

            if (self.dir_x == 0.0 && self.dir_y == 0.0) || !self.on_map(size) {
                break;
            }
            trace.steps += 1;

            let delta_height = map.sample(self.x, self.y).height - here.height;

            let capacity = (-delta_height * self.speed * self.water * params.sediment_capacity_factor)
                .max(params.min_sediment_capacity);

            if self.sediment > capacity || delta_height > 0.0 {
                // Uphill: try to fill the pit behind. Otherwise drop part of the excess.
                let amount = if delta_height > 0.0 {
                    delta_height.min(self.sediment)
                } else {
                    (self.sediment - capacity) * params.deposit_speed
                };
                self.sediment -= amount;
                // Deposits go to one node so small pits can be filled exactly.
                map.data[cell + size + 1] += amount;
                trace.deposited += amount as f64;
            } else {
                let amount = ((capacity - self.sediment) * params.erode_speed).min(-delta_height);
                for (index, weight) in brush.entry(cell).iter() {
                    // Clamp against max(h, 0) rather than h: a cell already below
                    // zero must not be raised by a negative removal.
                    let removed = (amount * weight).min(map.data[index].max(0.0));
                    map.data[index] -= removed;
                    self.sediment += removed;
                    trace.eroded += removed as f64;
                }
            }

            self.speed = (self.speed * self.speed + delta_height * params.gravity).sqrt();
            if self.speed.is_nan() {
                log::trace!("droplet speed went NaN at ({:.2}, {:.2}); reset to 0", self.x, self.y);
                self.speed = 0.0;
                trace.speed_resets += 1;
            }
            self.water *= 1.0 - params.evaporate_speed;
        }

        trace
    }
}
