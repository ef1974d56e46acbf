//! # Glass Primitives
//!
//! The algorithms behind the glass-lens effect:
//!
//! - [`blob`]: greedy square-growing clustering of the sample grid
//! - [`refract`]: lens layout with dynamic edge padding, lens compositing, markers
//! - [`warp`]: tiled-shuffle domain warp for the full-bleed blurred backdrop

pub mod blob;
pub mod refract;
pub mod warp;

pub use blob::{Blob, cluster, similarity_threshold};
pub use refract::{Lens, LensLayout, composite, refract_scale};
pub use warp::synthesize_warped_background;
