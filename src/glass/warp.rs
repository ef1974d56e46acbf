//! # Background Warp
//!
//! Seamless, distorted backdrop for the "background blur" mode, built from
//! tiled shuffles instead of a real gradient-domain blur.
//!
//! 1. Mirror-tile the source into a canvas with a 20% bleed on every side.
//! 2. Run 4 passes. Each pass cuts the canvas into square tiles and fills every
//!    tile from a randomly offset tile of the previous pass. Tiles halve each
//!    pass (never below 5px, starting near `width / 20`) and offsets halve
//!    with them, so the warp coarsens first and refines after.
//! 3. Blur twice with a sigma proportional to `intensity`, then crop the
//!    centre back to the source size.
//!
//! Randomness comes from a seeded [`StdRng`], so the output is a pure
//! function of `(source, intensity, seed)`.

use image::{RgbaImage, imageops};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::raster::{Raster, gaussian_blur};

/// Bleed margin on each side, as a fraction of the source size.
pub const BLEED: f32 = 0.2;

/// Number of shuffle passes.
pub const PASSES: usize = 4;

/// Smallest tile edge in pixels.
pub const MIN_TILE: u32 = 5;

/// Initial tile size divisor: the first pass uses `width / 20`.
pub const TILE_DIVISOR: u32 = 20;

/// Final blur sigma at `intensity = 100`, as a fraction of the larger side.
pub const BLUR_FRACTION: f32 = 0.02;

/// Tile sizes for every pass, starting at `max(5, width / 20)` and halving.
pub fn tile_schedule(width: u32) -> [u32; PASSES] {
    let mut sizes = [0; PASSES];
    let mut tile = (width / TILE_DIVISOR).max(MIN_TILE);
    for size in sizes.iter_mut() {
        *size = tile;
        tile = (tile / 2).max(MIN_TILE);
    }
    sizes
}

/// Offset magnitude for pass `i`: `initial * 0.5^i`.
#[inline]
pub fn distortion_for_pass(initial: f32, pass: usize) -> f32 {
    initial * 0.5f32.powi(pass as i32)
}

/// Reflect `v` into `[0, n)` so tiles meet their mirror image seamlessly.
#[inline]
fn mirror(v: i64, n: i64) -> u32 {
    let period = 2 * n;
    let m = v.rem_euclid(period);
    (if m < n { m } else { period - 1 - m }) as u32
}

/// Mirror-tile `source` into a canvas with `bleed_x`/`bleed_y` pixels of
/// margin on each side.
fn bleed_canvas(source: &Raster, bleed_x: u32, bleed_y: u32) -> RgbaImage {
    let (w, h) = source.dimensions();
    RgbaImage::from_fn(w + 2 * bleed_x, h + 2 * bleed_y, |x, y| {
        let sx = mirror(x as i64 - bleed_x as i64, w as i64);
        let sy = mirror(y as i64 - bleed_y as i64, h as i64);
        *source.get_pixel(sx, sy)
    })
}

/// One shuffle pass: every `tile x tile` block of the output copies the block
/// of `prev` displaced by a random offset in `[-distortion, distortion]`,
/// clamped to stay inside the canvas.
fn shuffle_pass(prev: &RgbaImage, tile: u32, distortion: f32, rng: &mut StdRng) -> RgbaImage {
    let (cw, ch) = prev.dimensions();
    let mut next = prev.clone();
    let reach = distortion.round().max(0.0) as i64;

    let mut ty = 0;
    while ty < ch {
        let mut tx = 0;
        while tx < cw {
            let (dx, dy) = if reach > 0 {
                (rng.random_range(-reach..=reach), rng.random_range(-reach..=reach))
            } else {
                (0, 0)
            };
            let tw = tile.min(cw - tx);
            let th = tile.min(ch - ty);
            let sx = (tx as i64 + dx).clamp(0, (cw - tw) as i64) as u32;
            let sy = (ty as i64 + dy).clamp(0, (ch - th) as i64) as u32;
            for y in 0..th {
                for x in 0..tw {
                    next.put_pixel(tx + x, ty + y, *prev.get_pixel(sx + x, sy + y));
                }
            }
            tx += tile;
        }
        ty += tile;
    }
    next
}

/// Synthesize a warped backdrop with the same dimensions as `source`.
///
/// `intensity` is the [0, 100] glass blur slider; it scales both the initial
/// tile displacement and the final blur. Empty sources are returned as-is.
pub fn synthesize_warped_background(source: &Raster, intensity: f32, seed: u64) -> Raster {
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 {
        return source.clone();
    }
    let strength = intensity.clamp(0.0, 100.0) / 100.0;
    let bleed_x = (w as f32 * BLEED).round() as u32;
    let bleed_y = (h as f32 * BLEED).round() as u32;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut canvas = bleed_canvas(source, bleed_x, bleed_y);

    let schedule = tile_schedule(w);
    let initial = schedule[0] as f32 * 2.0 * strength;
    for (pass, &tile) in schedule.iter().enumerate() {
        canvas = shuffle_pass(&canvas, tile, distortion_for_pass(initial, pass), &mut rng);
    }

    let sigma = strength * BLUR_FRACTION * w.max(h) as f32;
    let canvas = gaussian_blur(&gaussian_blur(&canvas, sigma), sigma);

    imageops::crop_imm(&canvas, bleed_x, bleed_y, w, h).to_image()
}
