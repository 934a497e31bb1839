//! Precomputed erosion brush.
//!
//! For every cell the cache stores the flat indices of all cells inside a
//! circular radius around it, with linear radial falloff weights normalized to
//! sum to one. Cells near the map edge keep only their in-bounds neighbours and
//! are renormalized over those, so erosion is never attributed off-map.

/// Neighbours of one cell and their share of an erosion event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrushEntry {
    pub indices: Vec<usize>,
    pub weights: Vec<f32>,
}

impl BrushEntry {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices.iter().copied().zip(self.weights.iter().copied())
    }
}

/// Per-cell brush table, keyed by the `(map_size, radius)` it was built for.
#[derive(Debug, Clone, Default)]
pub struct BrushCache {
    entries: Vec<BrushEntry>,
    map_size: usize,
    radius: usize,
}

impl BrushCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table unless it already matches `(map_size, radius)`.
    ///
    /// Returns `true` when a rebuild happened.
    pub fn ensure(&mut self, map_size: usize, radius: usize) -> bool {
        if !self.entries.is_empty() && self.map_size == map_size && self.radius == radius {
            return false;
        }
        log::debug!("building erosion brush: map_size={map_size} radius={radius}");
        self.entries = build_entries(map_size, radius);
        self.map_size = map_size;
        self.radius = radius;
        true
    }

    pub fn map_size(&self) -> usize {
        self.map_size
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entry(&self, cell: usize) -> &BrushEntry {
        &self.entries[cell]
    }
}

/// Circular mask offsets `dx² + dy² < r²` with weight `1 − dist / r`.
fn brush_offsets(radius: usize) -> Vec<(isize, isize, f32)> {
    let r = radius as isize;
    let r_sq = (r * r) as f32;
    let mut offsets = Vec::with_capacity(radius * radius * 4);
    for dy in -r..=r {
        for dx in -r..=r {
            let sqr_dst = (dx * dx + dy * dy) as f32;
            if sqr_dst < r_sq {
                offsets.push((dx, dy, 1.0 - sqr_dst.sqrt() / radius as f32));
            }
        }
    }
    offsets
}

fn build_entries(map_size: usize, radius: usize) -> Vec<BrushEntry> {
    let offsets = brush_offsets(radius);
    let n = map_size as isize;
    let mut entries = Vec::with_capacity(map_size * map_size);

    for cy in 0..n {
        for cx in 0..n {
            let mut indices = Vec::with_capacity(offsets.len());
            let mut weights = Vec::with_capacity(offsets.len());
            let mut weight_sum = 0.0f32;
            for &(dx, dy, w) in &offsets {
                let x = cx + dx;
                let y = cy + dy;
                if x < 0 || y < 0 || x >= n || y >= n {
                    continue;
                }
                indices.push((y * n + x) as usize);
                weights.push(w);
                weight_sum += w;
            }
            if weight_sum > 0.0 {
                for w in &mut weights {
                    *w /= weight_sum;
                }
            }
            entries.push(BrushEntry { indices, weights });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn weights_sum_to_one_everywhere() {
        let mut cache = BrushCache::new();
        cache.ensure(24, 6);
        assert_eq!(cache.len(), 24 * 24);
        for cell in 0..cache.len() {
            let entry = cache.entry(cell);
            assert!(!entry.is_empty(), "cell {cell} has an empty brush");
            let sum: f32 = entry.weights.iter().sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);
            assert!(entry.weights.iter().all(|&w| w >= 0.0));
            assert!(entry.indices.iter().all(|&i| i < 24 * 24));
        }
    }

    #[test]
    fn interior_cell_has_full_disc() {
        let mut cache = BrushCache::new();
        cache.ensure(32, 3);
        // Offsets with dx² + dy² < 9: 1 + 4 (dist 1) + 4 (dist √2) + 4 (dist 2) + 8 (dist √5) + 4 (dist √8) = 25.
        let entry = cache.entry(16 * 32 + 16);
        assert_eq!(entry.len(), 25);

        let centre_pos = entry.indices.iter().position(|&i| i == 16 * 32 + 16).unwrap();
        let peak = entry.weights[centre_pos];
        assert!(entry.weights.iter().all(|&w| w <= peak));
    }

    #[test]
    fn corner_cell_is_clipped_and_renormalized() {
        let mut cache = BrushCache::new();
        cache.ensure(16, 3);
        let corner = cache.entry(0);
        let interior = cache.entry(8 * 16 + 8);
        assert!(corner.len() < interior.len());
        // Quarter disc including the axes: every dx, dy ∈ [0, 2] satisfies dx² + dy² < 9.
        assert_eq!(corner.len(), 9);
        let sum: f32 = corner.weights.iter().sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn ensure_is_idempotent_until_key_changes() {
        let mut cache = BrushCache::new();
        assert!(cache.ensure(16, 4));
        assert!(!cache.ensure(16, 4));
        assert!(cache.ensure(16, 3));
        assert!(cache.ensure(20, 3));
        assert_eq!(cache.map_size(), 20);
        assert_eq!(cache.radius(), 3);
        assert_eq!(cache.len(), 400);
    }

    #[test]
    fn radius_one_brush_is_the_cell_itself() {
        let mut cache = BrushCache::new();
        cache.ensure(8, 1);
        let entry = cache.entry(27);
        assert_eq!(entry.indices, vec![27]);
        assert_eq!(entry.weights, vec![1.0]);
    }
}
