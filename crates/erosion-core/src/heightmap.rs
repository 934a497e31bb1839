use serde::{Deserialize, Serialize};

use crate::error::{ErosionError, Result};

/// A square heightmap stored row-major as `f32`, nominally in `[0, 1]`.
///
/// Erosion and deposition may push values slightly outside the unit range;
/// consumers clamp before display. Cell accessors take `(row, col)`; the
/// sampler takes continuous `(x, y)` with `x` along a row.
///
/// Deserialization goes through [`HeightMap::from_vec`], so a document with
/// a degenerate size or a mismatched buffer is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHeightMap")]
pub struct HeightMap {
    /// Row-major elevation values, `size * size` long.
    pub data: Vec<f32>,
    pub size: usize,
}

#[derive(Deserialize)]
struct RawHeightMap {
    data: Vec<f32>,
    size: usize,
}

impl TryFrom<RawHeightMap> for HeightMap {
    type Error = ErosionError;

    fn try_from(raw: RawHeightMap) -> Result<Self> {
        HeightMap::from_vec(raw.data, raw.size)
    }
}

/// Height and slope at a sub-cell position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightAndGradient {
    pub height: f32,
    pub gradient_x: f32,
    pub gradient_y: f32,
}

/// Summary of the value range of a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl HeightMap {
    /// Create a `size × size` map filled with `fill`.
    pub fn new(size: usize, fill: f32) -> Result<Self> {
        if size < 2 {
            return Err(ErosionError::InvalidDimension { map_size: size, radius: 0 });
        }
        Ok(Self { data: vec![fill; size * size], size })
    }

    /// Wrap an existing row-major buffer. The length must be exactly `size²`.
    pub fn from_vec(data: Vec<f32>, size: usize) -> Result<Self> {
        if size < 2 {
            return Err(ErosionError::InvalidDimension { map_size: size, radius: 0 });
        }
        let expected = size * size;
        if data.len() != expected {
            return Err(ErosionError::DataLength { size, expected, actual: data.len() });
        }
        Ok(Self { data, size })
    }

    /// Build a map by evaluating `f(row, col)` at every cell.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> f32) -> Result<Self> {
        let mut map = Self::new(size, 0.0)?;
        for r in 0..size {
            for c in 0..size {
                map.data[r * size + c] = f(r, c);
            }
        }
        Ok(map)
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.size + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f32) {
        self.data[row * self.size + col] = val;
    }

    /// Bilinear height and gradient at the continuous position `(x, y)`.
    ///
    /// The four corners of the enclosing cell are NW `(x0, y0)`, NE `(x0+1, y0)`,
    /// SW `(x0, y0+1)` and SE `(x0+1, y0+1)`. With `(u, v)` the offset inside the
    /// cell:
    ///
    /// ```text
    /// gradient_x = (NE − NW)(1 − v) + (SE − SW) v
    /// gradient_y = (SW − NW)(1 − u) + (SE − NE) u
    /// ```
    ///
    /// Caller must ensure `0 ≤ x, y < size − 1`; the droplet loop checks this
    /// before every call.
    pub fn sample(&self, x: f32, y: f32) -> HeightAndGradient {
        let x0 = x as usize;
        let y0 = y as usize;
        let u = x - x0 as f32;
        let v = y - y0 as f32;

        let nw_index = y0 * self.size + x0;
        let nw = self.data[nw_index];
        let ne = self.data[nw_index + 1];
        let sw = self.data[nw_index + self.size];
        let se = self.data[nw_index + self.size + 1];

        let gradient_x = (ne - nw) * (1.0 - v) + (se - sw) * v;
        let gradient_y = (sw - nw) * (1.0 - u) + (se - ne) * u;

        let height = nw * (1.0 - u) * (1.0 - v)
            + ne * u * (1.0 - v)
            + sw * (1.0 - u) * v
            + se * u * v;

        HeightAndGradient { height, gradient_x, gradient_y }
    }

    pub fn min_height(&self) -> f32 {
        self.data.iter().cloned().fold(f32::INFINITY, f32::min)
    }

    pub fn max_height(&self) -> f32 {
        self.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn stats(&self) -> HeightStats {
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        HeightStats {
            min: self.min_height(),
            max: self.max_height(),
            mean: (sum / self.data.len() as f64) as f32,
        }
    }
}
