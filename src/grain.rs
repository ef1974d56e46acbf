//! # Film Grain
//!
//! Procedural blocky grain, overlay-blended onto a finished raster.
//!
//! A low-resolution noise buffer (downscaled by `1 + size * 7 / 100`) holds
//! texels `128 + (rand - 0.5) * contrast_factor`, with `contrast_factor` in
//! [128, 255]. It is upscaled nearest-neighbour, so grain stays blocky, and
//! blended with overlay at `alpha = amount * 0.35 / 100`.
//!
//! An optional footprint mask restricts grain to drawn shapes so empty
//! background stays clean.

use image::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::raster::{Raster, mask_coverage};
use crate::shader::overlay_u8;

/// Opacity at `amount = 100`.
pub const MAX_ALPHA: f32 = 0.35;

/// Grain sliders, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrainParams {
    pub amount: f32,
    pub size: f32,
    pub contrast: f32,
}

impl Default for GrainParams {
    fn default() -> Self {
        Self {
            amount: 0.0,
            size: 20.0,
            contrast: 50.0,
        }
    }
}

impl GrainParams {
    /// Downscale factor of the noise buffer.
    #[inline]
    pub fn scale(&self) -> f32 {
        1.0 + self.size.clamp(0.0, 100.0) * 7.0 / 100.0
    }

    /// Texel spread around mid-gray, in [128, 255].
    #[inline]
    pub fn contrast_factor(&self) -> f32 {
        128.0 + self.contrast.clamp(0.0, 100.0) / 100.0 * 127.0
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.amount.clamp(0.0, 100.0) * MAX_ALPHA / 100.0
    }
}

/// Build the low-resolution noise buffer covering a `width x height` raster.
pub fn noise_field(width: u32, height: u32, params: &GrainParams, seed: u64) -> GrayImage {
    let scale = params.scale();
    let nw = (width as f32 / scale).ceil().max(1.0) as u32;
    let nh = (height as f32 / scale).ceil().max(1.0) as u32;
    let spread = params.contrast_factor();
    let mut rng = StdRng::seed_from_u64(seed);
    GrayImage::from_fn(nw, nh, |_, _| {
        let r: f32 = rng.random();
        let v = 128.0 + (r - 0.5) * spread;
        image::Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

/// Overlay grain onto `raster` in place.
///
/// With a mask, each pixel's grain opacity is scaled by its footprint
/// coverage; without one, grain covers the whole frame.
pub fn add_grain(raster: &mut Raster, params: &GrainParams, mask: Option<&GrayImage>, seed: u64) {
    let alpha = params.alpha();
    let (w, h) = raster.dimensions();
    if alpha <= 0.0 || w == 0 || h == 0 {
        return;
    }
    let noise = noise_field(w, h, params, seed);
    let scale = params.scale();
    let (nw, nh) = noise.dimensions();

    for (x, y, px) in raster.enumerate_pixels_mut() {
        let a = alpha * mask_coverage(mask, x, y);
        if a <= 0.0 {
            continue;
        }
        let nx = ((x as f32 / scale) as u32).min(nw - 1);
        let ny = ((y as f32 / scale) as u32).min(nh - 1);
        let g = noise.get_pixel(nx, ny)[0];
        for c in 0..3 {
            px[c] = overlay_u8(px[c], g, a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::solid;

    #[test]
    fn test_param_ranges() {
        let p = GrainParams {
            amount: 100.0,
            size: 100.0,
            contrast: 0.0,
        };
        assert!((p.scale() - 8.0).abs() < 1e-6);
        assert!((p.contrast_factor() - 128.0).abs() < 1e-6);
        assert!((p.alpha() - 0.35).abs() < 1e-6);
        let p = GrainParams {
            contrast: 100.0,
            size: 0.0,
            ..p
        };
        assert!((p.contrast_factor() - 255.0).abs() < 1e-6);
        assert!((p.scale() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_noise_field_is_low_res_and_bounded() {
        let p = GrainParams {
            amount: 50.0,
            size: 100.0,
            contrast: 0.0,
        };
        let n = noise_field(80, 41, &p, 9);
        assert_eq!(n.dimensions(), (10, 6));
        // contrast 0 -> spread 128 -> texels within [64, 192]
        assert!(n.pixels().all(|p| (64..=192).contains(&p[0])));
    }

    #[test]
    fn test_zero_amount_is_noop() {
        let mut r = solid(16, 16, [90, 120, 150]);
        let before = r.clone();
        add_grain(&mut r, &GrainParams::default(), None, 1);
        assert_eq!(r, before);
    }

    #[test]
    fn test_grain_changes_unmasked_pixels() {
        let mut r = solid(32, 32, [90, 120, 150]);
        let before = r.clone();
        let p = GrainParams {
            amount: 100.0,
            size: 0.0,
            contrast: 100.0,
        };
        add_grain(&mut r, &p, None, 4);
        assert_ne!(r, before);
    }

    #[test]
    fn test_mask_keeps_background_clean() {
        let mut r = solid(32, 32, [90, 120, 150]);
        let mut mask = GrayImage::new(32, 32);
        for y in 0..16 {
            for x in 0..32 {
                mask.put_pixel(x, y, image::Luma([255]));
            }
        }
        let p = GrainParams {
            amount: 100.0,
            size: 0.0,
            contrast: 100.0,
        };
        add_grain(&mut r, &p, Some(&mask), 4);
        for y in 16..32 {
            for x in 0..32 {
                assert_eq!(r.get_pixel(x, y).0, [90, 120, 150, 255]);
            }
        }
        assert!((0..16).any(|y| (0..32).any(|x| r.get_pixel(x, y).0 != [90, 120, 150, 255])));
    }

    #[test]
    fn test_deterministic_per_seed() {
        let p = GrainParams {
            amount: 80.0,
            size: 30.0,
            contrast: 70.0,
        };
        assert_eq!(noise_field(50, 50, &p, 5), noise_field(50, 50, &p, 5));
    }
}
