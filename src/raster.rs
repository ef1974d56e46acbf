//! # Raster Buffers
//!
//! Source images and output rasters are plain `image::RgbaImage` buffers.
//! The helpers here are the drawing vocabulary every effect shares: solid
//! fills, anti-aliased discs, aligned rectangles, and filtered lookups.
//!
//! Shapes can optionally record their footprint into a `GrayImage` mask, which
//! the grain pass later uses to keep empty background clean.

use image::{GrayImage, Luma, Rgba, RgbaImage, imageops};

use crate::sample::crop::CropWindow;
use crate::shader::{dist, mix_u8};

/// RGBA raster owned by the caller. Sources are read-only; outputs are
/// created fresh by every render.
pub type Raster = RgbaImage;

/// One RGB sample.
pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];
pub const WHITE: Rgb = [255, 255, 255];

/// Create an opaque raster filled with one color.
pub fn solid(width: u32, height: u32, color: Rgb) -> Raster {
    RgbaImage::from_pixel(width, height, Rgba([color[0], color[1], color[2], 255]))
}

/// Create an empty footprint mask matching a raster.
pub fn footprint_mask(raster: &Raster) -> GrayImage {
    GrayImage::new(raster.width(), raster.height())
}

/// Blend `color` into one pixel with coverage `alpha`, recording coverage in
/// the mask if one is given.
#[inline]
fn blend_pixel(
    raster: &mut Raster,
    x: u32,
    y: u32,
    color: Rgb,
    alpha: f32,
    mask: &mut Option<&mut GrayImage>,
) {
    let px = raster.get_pixel_mut(x, y);
    for c in 0..3 {
        px[c] = mix_u8(px[c], color[c], alpha);
    }
    px[3] = 255;
    if let Some(m) = mask.as_deref_mut() {
        let cov = (alpha * 255.0).round() as u8;
        let cell = m.get_pixel_mut(x, y);
        cell[0] = cell[0].max(cov);
    }
}

/// Fill an anti-aliased disc centred at `(cx, cy)` in pixel space.
///
/// Coverage per pixel is `clamp(r - d + 0.5, 0, 1)` with `d` measured from the
/// pixel centre. Non-positive radii draw nothing.
pub fn fill_disc(
    raster: &mut Raster,
    cx: f32,
    cy: f32,
    r: f32,
    color: Rgb,
    mut mask: Option<&mut GrayImage>,
) {
    if !(r > 0.0) {
        return;
    }
    let (w, h) = raster.dimensions();
    let x0 = (cx - r - 1.0).floor().max(0.0) as u32;
    let y0 = (cy - r - 1.0).floor().max(0.0) as u32;
    let x1 = ((cx + r + 1.0).ceil().max(0.0) as u32).min(w);
    let y1 = ((cy + r + 1.0).ceil().max(0.0) as u32).min(h);

    for y in y0..y1 {
        for x in x0..x1 {
            let d = dist(x as f32 + 0.5, y as f32 + 0.5, cx, cy);
            let alpha = (r - d + 0.5).clamp(0.0, 1.0);
            if alpha > 0.0 {
                blend_pixel(raster, x, y, color, alpha, &mut mask);
            }
        }
    }
}

/// Fill the half-open rectangle `[x0, x1) x [y0, y1)` with no anti-aliasing.
pub fn fill_rect(
    raster: &mut Raster,
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    color: Rgb,
    mut mask: Option<&mut GrayImage>,
) {
    let x1 = x1.min(raster.width());
    let y1 = y1.min(raster.height());
    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(raster, x, y, color, 1.0, &mut mask);
        }
    }
}

/// Bilinear lookup at continuous pixel coordinates (pixel centres sit on
/// integers), clamped to the edge.
pub fn sample_bilinear(raster: &Raster, x: f32, y: f32) -> [f32; 4] {
    let (w, h) = raster.dimensions();
    if w == 0 || h == 0 {
        return [0.0; 4];
    }
    let x = x.clamp(0.0, (w - 1) as f32);
    let y = y.clamp(0.0, (h - 1) as f32);
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = raster.get_pixel(x0, y0);
    let p10 = raster.get_pixel(x1, y0);
    let p01 = raster.get_pixel(x0, y1);
    let p11 = raster.get_pixel(x1, y1);

    let mut out = [0.0f32; 4];
    for (c, o) in out.iter_mut().enumerate() {
        let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
        let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
        *o = top * (1.0 - fy) + bottom * fy;
    }
    out
}

/// Rec. 601 luma of a raster pixel in [0, 255]. Out-of-bounds reads clamp.
pub fn luma_at(raster: &Raster, x: f32, y: f32) -> f32 {
    let p = sample_bilinear(raster, x, y);
    0.299 * p[0] + 0.587 * p[1] + 0.114 * p[2]
}

/// Crop the source through `crop` and resize it to exactly `width x height`.
///
/// This is the full-resolution counterpart of grid sampling, used to build
/// backdrops. Degenerate geometry yields an opaque black raster.
pub fn crop_to_target(source: &Raster, crop: &CropWindow, width: u32, height: u32) -> Raster {
    let Some(rect) = crop.source_rect(source.width(), source.height(), width, height) else {
        return solid(width, height, BLACK);
    };
    let cropped = imageops::crop_imm(source, rect.x, rect.y, rect.width, rect.height).to_image();
    imageops::resize(&cropped, width, height, imageops::FilterType::Triangle)
}

/// Gaussian blur; a non-positive sigma returns an unchanged copy.
pub fn gaussian_blur(raster: &Raster, sigma: f32) -> Raster {
    if sigma > 0.0 && raster.width() > 0 && raster.height() > 0 {
        imageops::blur(raster, sigma)
    } else {
        raster.clone()
    }
}

/// Read a mask coverage as [0, 1]. Missing masks count as full coverage.
#[inline]
pub fn mask_coverage(mask: Option<&GrayImage>, x: u32, y: u32) -> f32 {
    match mask {
        Some(m) => {
            let Luma([v]) = *m.get_pixel(x, y);
            v as f32 / 255.0
        }
        None => 1.0,
    }
}
