//! # Refraction Compositing
//!
//! Turns blobs into circular lenses and composites a scaled view of the
//! blurred backdrop through each one. This is a single-sample lens
//! approximation, not ray tracing: every lens pixel reads the backdrop at
//! `center + (p - center) * refract_scale`.
//!
//! ## Edge Padding
//!
//! Lenses on the border would read past the backdrop. Before layout, the
//! largest blob touching any grid edge sets a uniform inset:
//!
//! ```text
//! refract_scale = 1 + (ior / 100) * 0.4
//! padding       = edge_blob_px * (refract_scale - 1) / 2      (per axis)
//! ```
//!
//! If the inset leaves no drawable area, composition is skipped.

use image::GrayImage;

use super::blob::Blob;
use crate::raster::{Raster, luma_at, sample_bilinear};
use crate::shader::{dist, mix_u8, overlay_u8};

/// Lens scale added at `ior = 100`.
pub const MAX_REFRACTION: f32 = 0.4;

/// Below this glass blur intensity markers are switched off.
pub const MARKER_BLUR_FLOOR: f32 = 20.0;

/// Backdrop sampling scale for an index-of-refraction slider in [0, 100].
#[inline]
pub fn refract_scale(ior: f32) -> f32 {
    1.0 + (ior / 100.0) * MAX_REFRACTION
}

/// Whether markers should be drawn at a given glass blur intensity.
#[inline]
pub fn markers_visible(requested: bool, blur: f32) -> bool {
    requested && blur >= MARKER_BLUR_FLOOR
}

/// One lens in output pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub marker: bool,
}

/// Geometry inputs shared by padding and layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensLayout {
    pub grid_w: usize,
    pub grid_h: usize,
    pub out_w: u32,
    pub out_h: u32,
    /// Index of refraction slider in [0, 100].
    pub ior: f32,
    /// Gap slider in [0, 100], as a percentage of one cell.
    pub gap: f32,
}

impl LensLayout {
    /// Inset per axis that keeps edge lenses sampling inside the backdrop.
    ///
    /// `blobs` is the full clustering, before any size filtering, so the
    /// inset does not move when small blobs are dropped.
    pub fn edge_padding(&self, blobs: &[Blob]) -> (f32, f32) {
        if self.grid_w == 0 || self.grid_h == 0 {
            return (0.0, 0.0);
        }
        let edge_size = blobs
            .iter()
            .filter(|b| b.touches_edge(self.grid_w, self.grid_h))
            .map(|b| b.size)
            .max()
            .unwrap_or(0) as f32;
        let excess = (refract_scale(self.ior) - 1.0) / 2.0;
        let cell_w = self.out_w as f32 / self.grid_w as f32;
        let cell_h = self.out_h as f32 / self.grid_h as f32;
        (edge_size * cell_w * excess, edge_size * cell_h * excess)
    }

    /// Lay out lenses for the given `(blob, is_marker)` pairs inside a
    /// `padding` inset (see [`LensLayout::edge_padding`]).
    ///
    /// Returns `None` when the padded drawable area is non-positive. Lenses
    /// whose radius collapses under the gap are dropped.
    pub fn lenses(&self, blobs: &[(Blob, bool)], padding: (f32, f32)) -> Option<Vec<Lens>> {
        if self.grid_w == 0 || self.grid_h == 0 {
            return None;
        }
        let (pad_x, pad_y) = padding;
        let draw_w = self.out_w as f32 - 2.0 * pad_x;
        let draw_h = self.out_h as f32 - 2.0 * pad_y;
        if draw_w <= 0.0 || draw_h <= 0.0 {
            log::debug!("drawable area {}x{} after padding, skipping lenses", draw_w, draw_h);
            return None;
        }

        let cell_w = draw_w / self.grid_w as f32;
        let cell_h = draw_h / self.grid_h as f32;
        let gap_px = self.gap.clamp(0.0, 100.0) / 100.0 * cell_w.min(cell_h);

        let lenses = blobs
            .iter()
            .filter_map(|&(b, marker)| {
                let half = b.size as f32 / 2.0;
                let radius = (b.size as f32 * cell_w).min(b.size as f32 * cell_h) / 2.0 - gap_px / 2.0;
                (radius > 0.0).then(|| Lens {
                    cx: pad_x + (b.x as f32 + half) * cell_w,
                    cy: pad_y + (b.y as f32 + half) * cell_h,
                    radius,
                    marker,
                })
            })
            .collect();
        Some(lenses)
    }
}

/// Draw every lens into `output`, sampling `backdrop` (same dimensions).
///
/// Lens footprints are recorded into `mask` when given. Markers are drawn
/// only when `show_markers` is set.
pub fn composite(
    output: &mut Raster,
    lenses: &[Lens],
    backdrop: &Raster,
    ior: f32,
    show_markers: bool,
    mut mask: Option<&mut GrayImage>,
) {
    let scale = refract_scale(ior);
    for lens in lenses {
        draw_lens(output, lens, backdrop, scale, mask.as_deref_mut());
        if show_markers && lens.marker {
            draw_marker(output, lens, backdrop);
        }
    }
}

fn draw_lens(
    output: &mut Raster,
    lens: &Lens,
    backdrop: &Raster,
    scale: f32,
    mut mask: Option<&mut GrayImage>,
) {
    let (w, h) = output.dimensions();
    let r = lens.radius;
    let x0 = (lens.cx - r - 1.0).floor().max(0.0) as u32;
    let y0 = (lens.cy - r - 1.0).floor().max(0.0) as u32;
    let x1 = ((lens.cx + r + 1.0).ceil().max(0.0) as u32).min(w);
    let y1 = ((lens.cy + r + 1.0).ceil().max(0.0) as u32).min(h);

    for y in y0..y1 {
        for x in x0..x1 {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let alpha = (r - dist(px, py, lens.cx, lens.cy) + 0.5).clamp(0.0, 1.0);
            if alpha <= 0.0 {
                continue;
            }
            let sx = lens.cx + (px - lens.cx) * scale;
            let sy = lens.cy + (py - lens.cy) * scale;
            let s = sample_bilinear(backdrop, sx - 0.5, sy - 0.5);

            let out = output.get_pixel_mut(x, y);
            for c in 0..3 {
                out[c] = mix_u8(out[c], s[c].round().clamp(0.0, 255.0) as u8, alpha);
            }
            out[3] = 255;
            if let Some(m) = mask.as_deref_mut() {
                let cell = m.get_pixel_mut(x, y);
                cell[0] = cell[0].max((alpha * 255.0).round() as u8);
            }
        }
    }
}

/// Plus-sign marker, overlay-blended toward the tone opposite the backdrop's
/// brightness at the lens centre.
fn draw_marker(output: &mut Raster, lens: &Lens, backdrop: &Raster) {
    let arm = (lens.radius * 0.35).max(1.0);
    let half_stroke = (lens.radius * 0.06).max(0.5);
    let tone = if luma_at(backdrop, lens.cx - 0.5, lens.cy - 0.5) < 128.0 { 255 } else { 0 };

    let (w, h) = output.dimensions();
    let x0 = (lens.cx - arm).floor().max(0.0) as u32;
    let y0 = (lens.cy - arm).floor().max(0.0) as u32;
    let x1 = ((lens.cx + arm).ceil().max(0.0) as u32).min(w);
    let y1 = ((lens.cy + arm).ceil().max(0.0) as u32).min(h);

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = (x as f32 + 0.5 - lens.cx).abs();
            let dy = (y as f32 + 0.5 - lens.cy).abs();
            let on_bar = (dx <= half_stroke && dy <= arm) || (dy <= half_stroke && dx <= arm);
            if on_bar {
                let out = output.get_pixel_mut(x, y);
                for c in 0..3 {
                    out[c] = overlay_u8(out[c], tone, 1.0);
                }
            }
        }
    }
}
