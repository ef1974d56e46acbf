//! Distance functions for spatial and color calculations.

use crate::raster::Rgb;

/// Euclidean distance between two points.
#[inline]
pub fn dist(x: f32, y: f32, cx: f32, cy: f32) -> f32 {
    let dx = x - cx;
    let dy = y - cy;
    (dx * dx + dy * dy).sqrt()
}

/// Squared Euclidean distance (avoids sqrt for comparisons).
#[inline]
pub fn dist_sq(x: f32, y: f32, cx: f32, cy: f32) -> f32 {
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy
}

/// Euclidean distance between two RGB colors.
///
/// Ranges from 0 (identical) to ~441.7 (black vs white).
#[inline]
pub fn color_dist(a: Rgb, b: Rgb) -> f32 {
    let dr = a[0] as f32 - b[0] as f32;
    let dg = a[1] as f32 - b[1] as f32;
    let db = a[2] as f32 - b[2] as f32;
    (dr * dr + dg * dg + db * db).sqrt()
}
