//! # Effects
//!
//! Every effect is a pure function from `(source, config, width, height)` to a
//! fresh raster. Each config type implements [`Effect`], and
//! [`EffectConfig`] dispatches to the right one.
//!
//! ## Adding a New Effect
//!
//! 1. Add its config struct and enum variant in [`crate::config`]
//! 2. Create `src/effects/myeffect.rs` with a `render` function
//! 3. Implement [`Effect`] for the config and add it to [`EFFECTS`]

pub mod alias;
pub mod dots;
pub mod glass;
pub mod widget;

use crate::config::EffectConfig;
use crate::coverage::CoverageCache;
use crate::raster::{BLACK, Raster, Rgb, WHITE};

/// All available effects, in display order.
pub const EFFECTS: &[&str] = &["dots", "glass", "alias", "widget"];

/// Trait for effect renderers.
pub trait Effect {
    /// Effect name (lowercase, e.g., "glass").
    fn name(&self) -> &'static str;

    /// Render the source into a `width x height` raster.
    fn render(&self, source: &Raster, width: u32, height: u32) -> Raster;
}

impl EffectConfig {
    /// The renderer behind this config.
    pub fn effect(&self) -> &dyn Effect {
        match self {
            EffectConfig::Dots(c) => c,
            EffectConfig::Alias(c) => c,
            EffectConfig::Glass(c) => c,
            EffectConfig::Widget(c) => c,
        }
    }

    /// Render with this config.
    pub fn render(&self, source: &Raster, width: u32, height: u32) -> Raster {
        self.effect().render(source, width, height)
    }

    /// Render, reusing memoized geometry from `cache` where the effect has any.
    pub fn render_cached(
        &self,
        source: &Raster,
        width: u32,
        height: u32,
        cache: &mut CoverageCache,
    ) -> Raster {
        match self {
            EffectConfig::Widget(c) => {
                let mask = cache.get(c.resolution as usize, c.anti_aliased);
                widget::render_with_mask(source, c, width, height, mask)
            }
            other => other.render(source, width, height),
        }
    }
}

/// Get the default config for an effect by name.
pub fn by_name(name: &str) -> Option<EffectConfig> {
    EffectConfig::by_name(name)
}

/// `(ink, paper)` colors for an ink direction.
pub(crate) fn palette(invert: bool) -> (Rgb, Rgb) {
    if invert { (WHITE, BLACK) } else { (BLACK, WHITE) }
}
