//! # Dots
//!
//! Halftone dot grid. Each grid cell becomes one anti-aliased disc whose
//! radius follows the cell's size multiplier:
//!
//! ```text
//! radius = min(cell_w, cell_h) / 2 * (1 - gap / 100) * multiplier
//! ```
//!
//! Grain, when enabled, is confined to the dots.

use super::{Effect, palette};
use crate::attribute::{Ink, Policy};
use crate::config::DotsConfig;
use crate::grain::add_grain;
use crate::raster::{Raster, fill_disc, footprint_mask, solid};
use crate::sample::{grid_dimensions, sample};

/// Render the dot grid.
pub fn render(source: &Raster, cfg: &DotsConfig, width: u32, height: u32) -> Raster {
    let (ink, paper) = palette(cfg.invert);
    let mut out = solid(width, height, paper);
    let (gw, gh) = grid_dimensions(cfg.resolution, width, height);
    if gw == 0 || gh == 0 {
        log::debug!("dots: empty grid at resolution {}", cfg.resolution);
        return out;
    }

    let grid = sample(source, &cfg.crop, width, height, gw, gh);
    let policy = Policy::scaled(Ink::from_invert(cfg.invert), cfg.lower_limit);
    let cell_w = width as f32 / gw as f32;
    let cell_h = height as f32 / gh as f32;
    let base_radius = cell_w.min(cell_h) / 2.0 * (1.0 - cfg.gap / 100.0);

    let mut mask = footprint_mask(&out);
    for (gx, gy, s) in grid.iter() {
        let Some(m) = policy.attribute(s, &cfg.adjust) else {
            continue;
        };
        let color = if cfg.color { s } else { ink };
        fill_disc(
            &mut out,
            (gx as f32 + 0.5) * cell_w,
            (gy as f32 + 0.5) * cell_h,
            base_radius * m,
            color,
            Some(&mut mask),
        );
    }

    add_grain(&mut out, &cfg.grain, Some(&mask), cfg.seed);
    out
}

impl Effect for DotsConfig {
    fn name(&self) -> &'static str {
        "dots"
    }

    fn render(&self, source: &Raster, width: u32, height: u32) -> Raster {
        render(source, self, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{BLACK, WHITE};
    use image::{Rgba, RgbaImage};

    fn half_dark(w: u32, h: u32) -> Raster {
        RgbaImage::from_fn(w, h, |x, _| {
            if x < w / 2 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }
        })
    }

    #[test]
    fn test_dark_half_gets_dots() {
        let cfg = DotsConfig {
            resolution: 10,
            gap: 0.0,
            ..Default::default()
        };
        let out = render(&half_dark(100, 100), &cfg, 100, 100);
        assert_eq!(out.dimensions(), (100, 100));
        // Centre of a dark cell is inked, centre of a light cell is paper
        assert_eq!(out.get_pixel(5, 5).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(95, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_gap_is_fraction_of_cell() {
        let cfg = DotsConfig {
            resolution: 1,
            gap: 50.0,
            ..Default::default()
        };
        let out = render(&RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])), &cfg, 100, 100);
        // One 100px cell, half of it gap: radius 25
        assert_eq!(out.get_pixel(50, 30).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(50, 22).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_invert_flips_palette() {
        let cfg = DotsConfig {
            resolution: 10,
            invert: true,
            ..Default::default()
        };
        let out = render(&half_dark(100, 100), &cfg, 100, 100);
        // Dark source cells draw nothing on black paper
        assert_eq!(&out.get_pixel(5, 5).0[..3], &BLACK);
        assert_eq!(&out.get_pixel(95, 5).0[..3], &WHITE);
    }

    #[test]
    fn test_zero_resolution_is_blank() {
        let cfg = DotsConfig {
            resolution: 0,
            ..Default::default()
        };
        let out = render(&half_dark(40, 40), &cfg, 60, 30);
        assert_eq!(out.dimensions(), (60, 30));
        assert!(out.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_color_mode_uses_samples() {
        let src = RgbaImage::from_pixel(20, 20, Rgba([10, 40, 20, 255]));
        let cfg = DotsConfig {
            resolution: 2,
            gap: 0.0,
            color: true,
            ..Default::default()
        };
        let out = render(&src, &cfg, 20, 20);
        assert_eq!(out.get_pixel(5, 5).0, [10, 40, 20, 255]);
    }
}
