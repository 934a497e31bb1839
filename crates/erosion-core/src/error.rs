use thiserror::Error;

/// Errors surfaced by the erosion core.
///
/// Numeric trouble inside a droplet (a NaN speed) is never reported here; the
/// simulator recovers from it in place.
#[derive(Debug, Error)]
pub enum ErosionError {
    #[error("invalid dimension: map size {map_size} with erosion radius {radius}")]
    InvalidDimension { map_size: usize, radius: usize },

    #[error("heightmap buffer holds {actual} values, expected {expected} ({size}×{size})")]
    DataLength {
        size: usize,
        expected: usize,
        actual: usize,
    },

    #[error("parameter `{name}` = {value} is out of range ({expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ErosionError>;
