//! Sobel surface normals.
//!
//! ```text
//!   tl  t  tr        dX = (tr + 2r + br) − (tl + 2l + bl)
//!   l   *  r         dY = (bl + 2b + br) − (tl + 2t + tr)
//!   bl  b  br
//! ```
//!
//! The normal is `normalize(−dX, 1 / strength, −dY)` with y up. Lookups past
//! the edge replicate the border cell.
use crate::heightmap::HeightMap;

/// Vertical exaggeration of the terrain relative to one cell spacing.
pub const NORMAL_STRENGTH: f32 = 20.0;

#[inline]
fn clamp_to(v: isize, max: usize) -> usize {
    v.clamp(0, max as isize) as usize
}

/// Unit normal at cell `(x, y)`.
pub fn get_normal(map: &HeightMap, x: usize, y: usize) -> [f32; 3] {
    let n = map.size;
    let last = n - 1;
    let (x, y) = (x as isize, y as isize);
    let at = |u: isize, v: isize| map.data[clamp_to(v, last) * n + clamp_to(u, last)];

    let tl = at(x - 1, y - 1);
    let t = at(x, y - 1);
    let tr = at(x + 1, y - 1);
    let l = at(x - 1, y);
    // The right neighbour's row is clamped against `n`, not `n − 1`.
    let r = map.data[clamp_to(y, n) * n + clamp_to(x + 1, last)];
    let bl = at(x - 1, y + 1);
    let b = at(x, y + 1);
    let br = at(x + 1, y + 1);

    let d_x = tr + 2.0 * r + br - tl - 2.0 * l - bl;
    let d_y = bl + 2.0 * b + br - tl - 2.0 * t - tr;

    normalize([-d_x, 1.0 / NORMAL_STRENGTH, -d_y])
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}
