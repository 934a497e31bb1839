//! Radial border falloff.
//!
//! Every height is multiplied by `1 − g`, where `g ∈ [0, 1]` grows with the
//! distance from the map centre. The shape of the resulting island depends on
//! the metric:
//!
//! | type    | g                                              |
//! |---------|------------------------------------------------|
//! | Square  | Chebyshev / r                                  |
//! | Circle  | min(Euclidean² / r², 1)                        |
//! | Diamond | min(Manhattan / r, 1)                          |
//! | Star    | lerp(Diamond, Square, 0.7)                     |
//!
//! with `r = size / 2` and the centre at `(r, r)`.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::heightmap::HeightMap;
use super::{for_each_row, lerp};

/// Share of the Chebyshev term in the star blend.
const STAR_SQUARE_MIX: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientType {
    #[default]
    Square,
    Circle,
    Diamond,
    Star,
}

impl GradientType {
    pub fn all() -> [Self; 4] {
        [Self::Square, Self::Circle, Self::Diamond, Self::Star]
    }
}

impl fmt::Display for GradientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Square => write!(f, "square"),
            Self::Circle => write!(f, "circle"),
            Self::Diamond => write!(f, "diamond"),
            Self::Star => write!(f, "star"),
        }
    }
}

impl FromStr for GradientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "circle" => Ok(Self::Circle),
            "diamond" => Ok(Self::Diamond),
            "star" => Ok(Self::Star),
            other => Err(format!("unknown gradient type `{other}` (square, circle, diamond, star)")),
        }
    }
}

/// Falloff at cell `(x, y)` for a map whose half-width is `radius`.
pub fn gradient_value(kind: GradientType, x: usize, y: usize, radius: f32) -> f32 {
    let dx = (x as f32 - radius).abs();
    let dy = (y as f32 - radius).abs();
    let square = || dx.max(dy) / radius;
    let diamond = || ((dx + dy) / radius).min(1.0);
    match kind {
        GradientType::Square => square(),
        GradientType::Circle => ((dx * dx + dy * dy) / (radius * radius)).min(1.0),
        GradientType::Diamond => diamond(),
        GradientType::Star => lerp(diamond(), square(), STAR_SQUARE_MIX),
    }
}

/// Taper `map` towards its edges with the chosen falloff.
///
/// `_normalized_offset` is kept for callers that pass an island offset; it has
/// no effect on the result.
pub fn apply_gradient(map: &mut HeightMap, _normalized_offset: f32, kind: GradientType) {
    let size = map.size;
    let radius = size as f32 / 2.0;
    for_each_row(&mut map.data, size, |y, row| {
        for (x, v) in row.iter_mut().enumerate() {
            *v *= 1.0 - gradient_value(kind, x, y, radius);
        }
    });
}
