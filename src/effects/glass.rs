//! # Glass
//!
//! Glass-lens dots. The sampled grid is clustered into square blobs, each
//! surviving blob becomes a circular lens over a blurred backdrop, and the
//! largest few blobs can carry a cross marker.
//!
//! ## Pipeline
//!
//! ```text
//! source ─┬─ crop+resize ── blur or warp ──────────────┐ backdrop
//!         └─ sample grid ── cluster ── filter/markers ─┴─ lenses ── grain
//! ```
//!
//! With `background_blur` on, the warped backdrop fills the whole frame and
//! grain covers everything; otherwise lenses sit on black and grain stays
//! inside them.

use super::Effect;
use crate::config::GlassConfig;
use crate::glass::blob::{Blob, cluster, filter_small, select_markers, similarity_threshold};
use crate::glass::refract::{LensLayout, composite, markers_visible};
use crate::glass::warp::synthesize_warped_background;
use crate::grain::add_grain;
use crate::raster::{BLACK, Raster, crop_to_target, footprint_mask, gaussian_blur, solid};
use crate::sample::{grid_dimensions, sample};

/// Plain backdrop blur sigma at `blur = 100`, as a fraction of the larger side.
pub const BACKDROP_BLUR_FRACTION: f32 = 0.03;

/// Gaussian sigma for the plain (non-warped) backdrop.
#[inline]
pub fn backdrop_sigma(blur: f32, width: u32, height: u32) -> f32 {
    blur.clamp(0.0, 100.0) / 100.0 * BACKDROP_BLUR_FRACTION * width.max(height) as f32
}

/// Blurred (or warped) backdrop at target size.
pub fn backdrop(source: &Raster, cfg: &GlassConfig, width: u32, height: u32) -> Raster {
    let base = crop_to_target(source, &cfg.crop, width, height);
    if cfg.background_blur {
        synthesize_warped_background(&base, cfg.blur, cfg.seed)
    } else {
        gaussian_blur(&base, backdrop_sigma(cfg.blur, width, height))
    }
}

/// Clustering of one glass render.
#[derive(Debug, Clone, PartialEq)]
pub struct LensBlobs {
    /// Every blob, before size filtering.
    pub all: Vec<Blob>,
    /// Surviving `(blob, is_marker)` pairs.
    pub kept: Vec<(Blob, bool)>,
    pub grid_w: usize,
    pub grid_h: usize,
}

/// Cluster the source and split the blobs into survivors and markers.
pub fn lens_blobs(source: &Raster, cfg: &GlassConfig, width: u32, height: u32) -> LensBlobs {
    let (gw, gh) = grid_dimensions(cfg.resolution, width, height);
    let grid = sample(source, &cfg.crop, width, height, gw, gh);
    let all = cluster(&grid, similarity_threshold(cfg.sensitivity));
    let markers = select_markers(&all);
    let kept = filter_small(&all, cfg.lower_limit)
        .into_iter()
        .map(|i| (all[i], markers[i]))
        .collect::<Vec<_>>();
    log::debug!(
        "glass: {}x{} grid -> {} blobs, {} kept",
        gw,
        gh,
        all.len(),
        kept.len()
    );
    LensBlobs {
        all,
        kept,
        grid_w: gw,
        grid_h: gh,
    }
}

/// Render glass lenses.
pub fn render(source: &Raster, cfg: &GlassConfig, width: u32, height: u32) -> Raster {
    let backdrop = backdrop(source, cfg, width, height);
    let mut out = if cfg.background_blur {
        backdrop.clone()
    } else {
        solid(width, height, BLACK)
    };

    let blobs = lens_blobs(source, cfg, width, height);
    let layout = LensLayout {
        grid_w: blobs.grid_w,
        grid_h: blobs.grid_h,
        out_w: width,
        out_h: height,
        ior: cfg.ior,
        gap: cfg.gap,
    };

    let mut mask = footprint_mask(&out);
    let padding = layout.edge_padding(&blobs.all);
    if let Some(lenses) = layout.lenses(&blobs.kept, padding) {
        composite(
            &mut out,
            &lenses,
            &backdrop,
            cfg.ior,
            markers_visible(cfg.markers, cfg.blur),
            Some(&mut mask),
        );
    }

    let grain_mask = if cfg.background_blur { None } else { Some(&mask) };
    add_grain(&mut out, &cfg.grain, grain_mask, cfg.seed.wrapping_add(1));
    out
}

impl Effect for GlassConfig {
    fn name(&self) -> &'static str {
        "glass"
    }

    fn render(&self, source: &Raster, width: u32, height: u32) -> Raster {
        render(source, self, width, height)
    }
}
