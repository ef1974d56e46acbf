//! # Shader Primitives
//!
//! Small building blocks shared by the renderers. These mirror common
//! fragment-shader operations and are composed per effect.
//!
//! ## Categories
//!
//! - [`blend`]: Linear interpolation, overlay blending, 8-bit channel mixing
//! - [`distance`]: Euclidean point and RGB color distances

pub mod blend;
pub mod distance;

pub use blend::*;
pub use distance::*;
