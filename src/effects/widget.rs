//! # Widget
//!
//! Round dot-matrix badge for home-screen widgets. A disk [`CoverageMask`]
//! decides which lattice cells exist; each existing cell draws one dot sized
//! by both the image and the mask:
//!
//! ```text
//! radius = cell / 2 * (1 - gap / 100) * coverage^0.35 * multiplier
//! ```
//!
//! The lattice is square and centred in the target, so wide widgets keep a
//! round badge with paper on either side.

use super::{Effect, palette};
use crate::attribute::{Ink, Policy};
use crate::config::WidgetConfig;
use crate::coverage::CoverageMask;
use crate::grain::add_grain;
use crate::raster::{Raster, fill_disc, footprint_mask, solid};
use crate::sample::sample;

/// Standard widget footprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetSize {
    Small,
    Medium,
    Large,
}

impl WidgetSize {
    /// Output dimensions in pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            WidgetSize::Small => (512, 512),
            WidgetSize::Medium => (1024, 480),
            WidgetSize::Large => (1024, 1024),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "small" => Some(WidgetSize::Small),
            "medium" => Some(WidgetSize::Medium),
            "large" => Some(WidgetSize::Large),
            _ => None,
        }
    }
}

/// Render with a freshly built mask.
pub fn render(source: &Raster, cfg: &WidgetConfig, width: u32, height: u32) -> Raster {
    let mask = CoverageMask::build(cfg.resolution as usize, cfg.anti_aliased);
    render_with_mask(source, cfg, width, height, &mask)
}

/// Render with a prebuilt mask; its diameter sets the lattice size.
pub fn render_with_mask(
    source: &Raster,
    cfg: &WidgetConfig,
    width: u32,
    height: u32,
    mask: &CoverageMask,
) -> Raster {
    let (ink, paper) = palette(cfg.invert);
    let mut out = solid(width, height, paper);
    let d = mask.diameter();
    let side = width.min(height);
    if d == 0 || side == 0 {
        return out;
    }

    let cell = side as f32 / d as f32;
    let origin_x = (width - side) as f32 / 2.0;
    let origin_y = (height - side) as f32 / 2.0;
    let base_radius = cell / 2.0 * (1.0 - cfg.gap / 100.0);

    let grid = sample(source, &cfg.crop, side, side, d, d);
    let policy = Policy::scaled(Ink::from_invert(cfg.invert), cfg.lower_limit);
    let mut footprint = footprint_mask(&out);

    for (gx, gy, s) in grid.iter() {
        if mask.coverage(gx, gy) <= 0.0 {
            continue;
        }
        let Some(m) = policy.attribute(s, &cfg.adjust) else {
            continue;
        };
        fill_disc(
            &mut out,
            origin_x + (gx as f32 + 0.5) * cell,
            origin_y + (gy as f32 + 0.5) * cell,
            base_radius * mask.size_factor(gx, gy) * m,
            ink,
            Some(&mut footprint),
        );
    }

    add_grain(&mut out, &cfg.grain, Some(&footprint), cfg.seed);
    out
}

impl Effect for WidgetConfig {
    fn name(&self) -> &'static str {
        "widget"
    }

    fn render(&self, source: &Raster, width: u32, height: u32) -> Raster {
        render(source, self, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn white(w: u32, h: u32) -> Raster {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_badge_is_round() {
        let cfg = WidgetConfig {
            resolution: 10,
            gap: 0.0,
            ..Default::default()
        };
        let out = render(&white(50, 50), &cfg, 100, 100);
        // Centre dot lit, lattice corner outside the disk stays paper
        assert_eq!(out.get_pixel(55, 55).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(5, 5).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_wide_target_centres_lattice() {
        let cfg = WidgetConfig {
            resolution: 4,
            gap: 0.0,
            ..Default::default()
        };
        let out = render(&white(10, 10), &cfg, 200, 100);
        assert_eq!(out.dimensions(), (200, 100));
        // Side margins are untouched paper
        assert!((0..100).all(|y| out.get_pixel(10, y).0 == [0, 0, 0, 255]));
        // Centre of lattice cell (1, 1)
        assert_eq!(out.get_pixel(87, 37).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_cached_mask_matches_fresh_render() {
        let cfg = WidgetConfig::default();
        let src = white(30, 30);
        let mask = CoverageMask::build(cfg.resolution as usize, cfg.anti_aliased);
        assert_eq!(render(&src, &cfg, 90, 90), render_with_mask(&src, &cfg, 90, 90, &mask));
    }

    #[test]
    fn test_zero_resolution() {
        let cfg = WidgetConfig {
            resolution: 0,
            ..Default::default()
        };
        let out = render(&white(10, 10), &cfg, 20, 20);
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_widget_sizes() {
        assert_eq!(WidgetSize::by_name("Medium"), Some(WidgetSize::Medium));
        assert_eq!(WidgetSize::Medium.dimensions(), (1024, 480));
        assert_eq!(WidgetSize::by_name("huge"), None);
    }
}
