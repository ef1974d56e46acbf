//! # Alias
//!
//! Hard-edged silhouette: each grid cell is either fully inked or empty,
//! with integer-aligned cell edges and no anti-aliasing.

use super::{Effect, palette};
use crate::attribute::{Ink, Policy};
use crate::config::AliasConfig;
use crate::grain::add_grain;
use crate::raster::{Raster, fill_rect, footprint_mask, solid};
use crate::sample::{grid_dimensions, sample};

/// Pixel edge of grid line `i` out of `cells` spanning `extent` pixels.
#[inline]
fn edge(i: usize, cells: usize, extent: u32) -> u32 {
    (i as u64 * extent as u64 / cells as u64) as u32
}

/// Render the silhouette.
pub fn render(source: &Raster, cfg: &AliasConfig, width: u32, height: u32) -> Raster {
    let (ink, paper) = palette(cfg.invert);
    let mut out = solid(width, height, paper);
    let (gw, gh) = grid_dimensions(cfg.resolution, width, height);
    if gw == 0 || gh == 0 {
        return out;
    }

    let grid = sample(source, &cfg.crop, width, height, gw, gh);
    let policy = Policy::binary(Ink::from_invert(cfg.invert), cfg.threshold);
    let mut mask = footprint_mask(&out);

    for (gx, gy, s) in grid.iter() {
        if policy.attribute(s, &cfg.adjust).is_some() {
            fill_rect(
                &mut out,
                edge(gx, gw, width),
                edge(gy, gh, height),
                edge(gx + 1, gw, width),
                edge(gy + 1, gh, height),
                ink,
                Some(&mut mask),
            );
        }
    }

    add_grain(&mut out, &cfg.grain, Some(&mask), cfg.seed);
    out
}

impl Effect for AliasConfig {
    fn name(&self) -> &'static str {
        "alias"
    }

    fn render(&self, source: &Raster, width: u32, height: u32) -> Raster {
        render(source, self, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_edges_partition_extent() {
        assert_eq!(edge(0, 3, 10), 0);
        assert_eq!(edge(1, 3, 10), 3);
        assert_eq!(edge(2, 3, 10), 6);
        assert_eq!(edge(3, 3, 10), 10);
    }

    #[test]
    fn test_output_is_two_tone() {
        let src = RgbaImage::from_fn(64, 64, |x, y| {
            let v = ((x * 4 + y * 2) % 256) as u8;
            Rgba([v, v, v, 255])
        });
        let cfg = AliasConfig {
            resolution: 16,
            ..Default::default()
        };
        let out = render(&src, &cfg, 50, 50);
        assert!(
            out.pixels()
                .all(|p| p.0 == [0, 0, 0, 255] || p.0 == [255, 255, 255, 255])
        );
        assert!(out.pixels().any(|p| p.0 == [0, 0, 0, 255]));
        assert!(out.pixels().any(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_threshold_extremes() {
        let src = RgbaImage::from_pixel(10, 10, Rgba([120, 120, 120, 255]));
        let all_on = AliasConfig {
            resolution: 5,
            threshold: 0.0,
            ..Default::default()
        };
        assert!(render(&src, &all_on, 10, 10).pixels().all(|p| p.0 == [0, 0, 0, 255]));
        let all_off = AliasConfig {
            threshold: 100.0,
            ..all_on
        };
        assert!(render(&src, &all_off, 10, 10).pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }
}
