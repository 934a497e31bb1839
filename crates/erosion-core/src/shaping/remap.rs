//! Beach-flattening remap curve.
use crate::heightmap::HeightMap;
use super::{for_each_row, lerp};

/// Control points `(input, output)`; the flat segment between 0.15 and 0.2
/// produces the beach band.
const BEACH_CURVE: [(f32, f32); 4] = [(0.0, 0.0), (0.15, 0.16), (0.2, 0.16), (1.0, 1.0)];

/// Map one height through the beach curve.
///
/// Negative values and values at or above the last control point pass
/// through unchanged.
pub fn remap_value(value: f32) -> f32 {
    if value < 0.0 {
        return value;
    }
    for pair in BEACH_CURVE.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if value < x1 {
            return lerp(y0, y1, (value - x0) / (x1 - x0));
        }
    }
    value
}

pub fn remap(map: &mut HeightMap) {
    let size = map.size;
    for_each_row(&mut map.data, size, |_, row| {
        for v in row.iter_mut() {
            *v = remap_value(*v);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn endpoints_are_preserved() {
        let mut zeros = HeightMap::new(8, 0.0).unwrap();
        let mut ones = HeightMap::new(8, 1.0).unwrap();
        remap(&mut zeros);
        remap(&mut ones);
        assert!(zeros.data.iter().all(|&v| v == 0.0));
        assert!(ones.data.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn beach_band_is_flat() {
        assert_abs_diff_eq!(remap_value(0.15), 0.16, epsilon = 1e-6);
        assert_abs_diff_eq!(remap_value(0.175), 0.16, epsilon = 1e-6);
        assert_abs_diff_eq!(remap_value(0.1999), 0.16, epsilon = 1e-6);
    }

    #[test]
    fn segments_interpolate_linearly() {
        assert_abs_diff_eq!(remap_value(0.075), 0.08, epsilon = 1e-6);
        assert_abs_diff_eq!(remap_value(0.6), 0.58, epsilon = 1e-6);
    }

    #[test]
    fn out_of_range_values_pass_through() {
        assert_eq!(remap_value(-0.25), -0.25);
        assert_eq!(remap_value(1.3), 1.3);
    }

    #[test]
    fn remap_is_not_a_projection() {
        let once = remap_value(0.1);
        assert!((remap_value(once) - once).abs() > 1e-4);
    }
}
