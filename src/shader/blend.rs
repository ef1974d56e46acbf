//! Blending and interpolation functions.
//!
//! Channel values are normalized floats in [0, 1] unless noted.

/// Linear interpolation between two values.
///
/// Returns `a` when `t=0`, `b` when `t=1`, and linear blend in between.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Overlay blend mode.
///
/// Combines multiply and screen based on base value: dark bases get darker,
/// light bases get lighter, mid-gray blends leave the base untouched.
#[inline]
pub fn blend_overlay(base: f32, blend: f32) -> f32 {
    if base < 0.5 {
        2.0 * base * blend
    } else {
        1.0 - 2.0 * (1.0 - base) * (1.0 - blend)
    }
}

/// Overlay-blend an 8-bit channel with an 8-bit blend value at `alpha` opacity.
#[inline]
pub fn overlay_u8(base: u8, blend: u8, alpha: f32) -> u8 {
    let b = base as f32 / 255.0;
    let o = blend_overlay(b, blend as f32 / 255.0);
    to_u8(lerp(b, o, alpha))
}

/// Mix two 8-bit channels with coverage `t` in [0, 1].
#[inline]
pub fn mix_u8(a: u8, b: u8, t: f32) -> u8 {
    lerp(a as f32, b as f32, t.clamp(0.0, 1.0)).round().clamp(0.0, 255.0) as u8
}

/// Convert a normalized value to an 8-bit channel, clamped and rounded.
#[inline]
pub fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
