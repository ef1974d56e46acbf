//! # Grid Sampling
//!
//! Shared by every renderer: pick the source sub-rectangle ([`crop`]) and
//! downsample it into a grid of RGB samples ([`grid`]).

pub mod crop;
pub mod grid;

pub use crop::{CropWindow, DragState, SourceRect};
pub use grid::{SampleGrid, grid_dimensions, sample};
