//! Elementwise pre-passes run before erosion: island border falloff and the
//! beach-flattening remap. Both are row-parallel under the `threading` feature.
pub mod border;
pub mod remap;

pub use border::{apply_gradient, gradient_value, GradientType};
pub use remap::{remap, remap_value};

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Run `f(y, row)` over every row of a row-major buffer `width` cells wide.
pub(crate) fn for_each_row(data: &mut [f32], width: usize, f: impl Fn(usize, &mut [f32]) + Sync + Send) {
    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;
        data.par_chunks_mut(width).enumerate().for_each(|(y, row)| f(y, row));
    }
    #[cfg(not(feature = "threading"))]
    {
        data.chunks_mut(width).enumerate().for_each(|(y, row)| f(y, row));
    }
}
