//! # Attribute Mapping
//!
//! One shared mapping from a raw grid sample to a renderable attribute, used
//! by every effect. Effects differ only in their [`Policy`]: which extreme is
//! "ink", how the multiplier becomes a size, and where cells are cut off.
//!
//! ## Brightness
//!
//! ```text
//! gray0          = 0.299 r + 0.587 g + 0.114 b
//! exposureShift  = (exposure - 50) * 2                    // 50 is neutral
//! contrastFactor = contrast / 50                          if contrast <= 50
//!                = 1 + (contrast - 50) / 50 * 2           otherwise
//! adjusted       = ((gray0/255 - 0.5) * contrastFactor + 0.5) * 255 + exposureShift
//! ```
//!
//! `adjusted` is clamped to [0, 255] and rounded. Both sliders live in [0, 100].

use serde::{Deserialize, Serialize};

use crate::raster::Rgb;

/// Global exposure/contrast sliders, both in [0, 100] with 50 neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub exposure: f32,
    pub contrast: f32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            exposure: 50.0,
            contrast: 50.0,
        }
    }
}

/// Rec. 601 luma in [0, 255].
#[inline]
pub fn luma(sample: Rgb) -> f32 {
    0.299 * sample[0] as f32 + 0.587 * sample[1] as f32 + 0.114 * sample[2] as f32
}

/// Additive exposure shift; maps [0, 100] to [-100, 100].
#[inline]
pub fn exposure_shift(exposure: f32) -> f32 {
    (exposure - 50.0) * 2.0
}

/// Piecewise contrast factor: compresses below 50, expands (twice as far)
/// above it.
#[inline]
pub fn contrast_factor(contrast: f32) -> f32 {
    if contrast <= 50.0 {
        contrast / 50.0
    } else {
        1.0 + (contrast - 50.0) / 50.0 * 2.0
    }
}

/// Adjusted gray level of a sample.
pub fn map_brightness(sample: Rgb, exposure: f32, contrast: f32) -> u8 {
    map_gray(luma(sample), exposure, contrast)
}

/// Adjusted gray level of a precomputed luma value.
pub fn map_gray(gray0: f32, exposure: f32, contrast: f32) -> u8 {
    let adjusted =
        ((gray0 / 255.0 - 0.5) * contrast_factor(contrast) + 0.5) * 255.0 + exposure_shift(exposure);
    adjusted.clamp(0.0, 255.0).round() as u8
}

/// Which end of the gray range is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ink {
    /// Dark shapes on a light background: darker cells draw larger.
    #[default]
    Dark,
    /// Light shapes on a dark background: brighter cells draw larger.
    Light,
}

impl Ink {
    pub fn from_invert(invert: bool) -> Self {
        if invert { Ink::Light } else { Ink::Dark }
    }
}

/// Size multiplier in [0, 1] for a final gray level.
#[inline]
pub fn size_multiplier(gray: u8, ink: Ink) -> f32 {
    match ink {
        Ink::Dark => (255 - gray) as f32 / 255.0,
        Ink::Light => gray as f32 / 255.0,
    }
}

/// How a multiplier turns into a drawn attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    /// Draw at the multiplier's scale.
    Scaled,
    /// Draw full-size when the multiplier reaches `threshold` in [0, 1],
    /// otherwise not at all.
    Binary { threshold: f32 },
}

/// Effect-specific mapping policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    pub ink: Ink,
    /// Cells whose multiplier falls below this fraction in [0, 1] are not drawn.
    pub lower_limit: f32,
    pub response: Response,
}

impl Policy {
    /// Policy for dot-scaling effects. `lower_limit` is a [0, 100] slider.
    pub fn scaled(ink: Ink, lower_limit: f32) -> Self {
        Self {
            ink,
            lower_limit: lower_limit / 100.0,
            response: Response::Scaled,
        }
    }

    /// Policy for on/off effects. `threshold` is a [0, 100] slider.
    pub fn binary(ink: Ink, threshold: f32) -> Self {
        Self {
            ink,
            lower_limit: 0.0,
            response: Response::Binary {
                threshold: threshold / 100.0,
            },
        }
    }

    /// Attribute of one sample: `None` when suppressed, otherwise a size
    /// factor in (0, 1].
    pub fn attribute(&self, sample: Rgb, adjust: &Adjustments) -> Option<f32> {
        let gray = map_brightness(sample, adjust.exposure, adjust.contrast);
        let m = size_multiplier(gray, self.ink);
        match self.response {
            Response::Scaled => {
                if m <= 0.0 || m < self.lower_limit {
                    None
                } else {
                    Some(m)
                }
            }
            Response::Binary { threshold } => {
                if m > 0.0 && m >= threshold && m >= self.lower_limit {
                    Some(1.0)
                } else {
                    None
                }
            }
        }
    }
}
