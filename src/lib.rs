//! # Dotmatrix - Raster to Dot-Matrix Synthesis
//!
//! Dotmatrix turns a source image into stylized dot-matrix art. It provides:
//!
//! - **Sampling**: aspect-preserving crop windows and nearest-neighbour grids
//! - **Effects**: halftone dots, aliased silhouettes, glass lenses, round widgets
//! - **Glass**: greedy blob clustering, refraction compositing, warped backdrops
//! - **History**: snapshot-based undo/redo over serializable configs
//!
//! ## Quick Start
//!
//! ```no_run
//! use dotmatrix::{EffectConfig, Session};
//!
//! let source = image::open("photo.jpg")?.to_rgba8();
//!
//! let mut session = Session::new(EffectConfig::by_name("glass").unwrap());
//! session.load_image(source);
//! session.set_param("ior", "80")?;
//!
//! if let Some(out) = session.render(1024, 1024) {
//!     out.save("glass.png")?;
//! }
//!
//! # Ok::<(), dotmatrix::DotmatrixError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`sample`] | Crop windows, pan gestures, grid sampling |
//! | [`attribute`] | Brightness adjustments and size multipliers |
//! | [`coverage`] | Supersampled disk coverage masks |
//! | [`glass`] | Blob clustering, lens refraction, background warp |
//! | [`grain`] | Film grain overlay |
//! | [`effects`] | The four effect renderers |
//! | [`config`] | Serializable effect configs |
//! | [`history`] | Undo/redo snapshots |
//! | [`session`] | One editing session (image + history + pan) |
//! | [`error`] | Error types |
//!
//! Rendering itself never fails: degenerate geometry (zero resolution, empty
//! crops) yields a plain background. Errors only come from the host surface:
//! files, JSON and parameter names.

pub mod attribute;
pub mod config;
pub mod coverage;
pub mod effects;
pub mod error;
pub mod glass;
pub mod grain;
pub mod history;
pub mod raster;
pub mod sample;
pub mod session;
pub mod shader;

pub use config::EffectConfig;
pub use error::DotmatrixError;
pub use history::History;
pub use raster::Raster;
pub use session::Session;
