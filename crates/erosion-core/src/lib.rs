//! Droplet hydraulic erosion for square island heightmaps.
//!
//! The map is a row-major `size × size` `f32` buffer owned by the caller.
//! Typical use: shape the borders, flatten the beaches, then erode in batches.
//!
//! ```no_run
//! use erosion_core::{apply_gradient, remap, Eroder, ErosionParams, GradientType, HeightMap};
//!
//! let mut map = HeightMap::new(256, 1.0)?;
//! apply_gradient(&mut map, 0.5, GradientType::Circle);
//! remap(&mut map);
//! let mut eroder = Eroder::with_seed(ErosionParams::default(), 7)?;
//! eroder.erode(&mut map, 0, true)?;
//! eroder.erode(&mut map, 500, false)?;
//! # Ok::<(), erosion_core::ErosionError>(())
//! ```
pub mod erosion;
pub mod error;
pub mod heightmap;
pub mod island;
pub mod noise;
pub mod normal;
pub mod placement;
pub mod shaping;

pub use erosion::{Eroder, ErosionParams, ErosionSummary};
pub use error::{ErosionError, Result};
pub use heightmap::{HeightAndGradient, HeightMap, HeightStats};
pub use island::{Island, IslandParams};
pub use normal::get_normal;
pub use placement::{find_tree_sites, SiteFilter, TreeSite};
pub use shaping::{apply_gradient, remap, remap_value, GradientType};
