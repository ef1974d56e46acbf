//! # Effect Configuration
//!
//! Immutable, serializable parameter records, one per effect, wrapped in the
//! tagged [`EffectConfig`] enum:
//!
//! ```json
//! { "effect": "glass", "resolution": 40, "sensitivity": 40, "ior": 50, ... }
//! ```
//!
//! Sliders are floats in [0, 100]; `resolution` is a grid column count (or
//! lattice diameter for widgets). The core does not re-validate ranges, so
//! hosts call [`EffectConfig::clamped`] at the boundary.
//!
//! Two configs are equal exactly when their canonical JSON is equal; the
//! history relies on this.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attribute::Adjustments;
use crate::error::DotmatrixError;
use crate::grain::GrainParams;
use crate::sample::CropWindow;

/// Largest accepted grid resolution.
pub const MAX_RESOLUTION: u32 = 400;

#[inline]
fn slider(v: &mut f32) {
    *v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) };
}

fn clamp_common(adjust: Option<&mut Adjustments>, crop: &mut CropWindow, grain: &mut GrainParams) {
    if let Some(a) = adjust {
        slider(&mut a.exposure);
        slider(&mut a.contrast);
    }
    *crop = CropWindow::new(crop.offset_x, crop.offset_y);
    slider(&mut grain.amount);
    slider(&mut grain.size);
    slider(&mut grain.contrast);
}

/// Halftone dot grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotsConfig {
    /// Grid columns.
    pub resolution: u32,
    /// Space between dots, % of a cell.
    pub gap: f32,
    pub adjust: Adjustments,
    /// Cells with a size multiplier below this % are not drawn.
    pub lower_limit: f32,
    /// Light dots on black instead of dark dots on white.
    pub invert: bool,
    /// Paint dots in their sampled color.
    pub color: bool,
    pub crop: CropWindow,
    pub grain: GrainParams,
    pub seed: u64,
}

impl Default for DotsConfig {
    fn default() -> Self {
        Self {
            resolution: 48,
            gap: 10.0,
            adjust: Adjustments::default(),
            lower_limit: 5.0,
            invert: false,
            color: false,
            crop: CropWindow::centered(),
            grain: GrainParams::default(),
            seed: 42,
        }
    }
}

/// Aliased on/off silhouette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasConfig {
    pub resolution: u32,
    pub adjust: Adjustments,
    /// Cells at or above this % multiplier are on.
    pub threshold: f32,
    pub invert: bool,
    pub crop: CropWindow,
    pub grain: GrainParams,
    pub seed: u64,
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            resolution: 64,
            adjust: Adjustments::default(),
            threshold: 50.0,
            invert: false,
            crop: CropWindow::centered(),
            grain: GrainParams::default(),
            seed: 42,
        }
    }
}

/// Glass lenses over clustered blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassConfig {
    pub resolution: u32,
    pub gap: f32,
    /// Clustering tolerance; maps linearly to a [0, 120] RGB distance.
    pub sensitivity: f32,
    /// Blobs smaller than this % of the largest blob are dropped.
    pub lower_limit: f32,
    /// Lens strength.
    pub ior: f32,
    /// Backdrop blur intensity.
    pub blur: f32,
    /// Fill the frame with the warped backdrop instead of black.
    pub background_blur: bool,
    /// Cross markers on the largest blobs.
    pub markers: bool,
    pub crop: CropWindow,
    pub grain: GrainParams,
    pub seed: u64,
}

impl Default for GlassConfig {
    fn default() -> Self {
        Self {
            resolution: 40,
            gap: 8.0,
            sensitivity: 40.0,
            lower_limit: 0.0,
            ior: 50.0,
            blur: 60.0,
            background_blur: false,
            markers: true,
            crop: CropWindow::centered(),
            grain: GrainParams::default(),
            seed: 42,
        }
    }
}

/// Circular dot-matrix home-screen widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Lattice diameter in cells.
    pub resolution: u32,
    pub anti_aliased: bool,
    pub gap: f32,
    pub adjust: Adjustments,
    pub lower_limit: f32,
    pub invert: bool,
    pub crop: CropWindow,
    pub grain: GrainParams,
    pub seed: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            resolution: 21,
            anti_aliased: true,
            gap: 10.0,
            adjust: Adjustments::default(),
            lower_limit: 5.0,
            invert: true,
            crop: CropWindow::centered(),
            grain: GrainParams::default(),
            seed: 42,
        }
    }
}

/// Configuration for any effect, tagged by effect name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EffectConfig {
    Dots(DotsConfig),
    Alias(AliasConfig),
    Glass(GlassConfig),
    Widget(WidgetConfig),
}

impl Default for EffectConfig {
    fn default() -> Self {
        EffectConfig::Dots(DotsConfig::default())
    }
}

impl EffectConfig {
    /// Default config for an effect name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dots" => Some(EffectConfig::Dots(DotsConfig::default())),
            "alias" => Some(EffectConfig::Alias(AliasConfig::default())),
            "glass" => Some(EffectConfig::Glass(GlassConfig::default())),
            "widget" => Some(EffectConfig::Widget(WidgetConfig::default())),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EffectConfig::Dots(_) => "dots",
            EffectConfig::Alias(_) => "alias",
            EffectConfig::Glass(_) => "glass",
            EffectConfig::Widget(_) => "widget",
        }
    }

    pub fn crop(&self) -> CropWindow {
        match self {
            EffectConfig::Dots(c) => c.crop,
            EffectConfig::Alias(c) => c.crop,
            EffectConfig::Glass(c) => c.crop,
            EffectConfig::Widget(c) => c.crop,
        }
    }

    pub fn set_crop(&mut self, crop: CropWindow) {
        let crop = CropWindow::new(crop.offset_x, crop.offset_y);
        match self {
            EffectConfig::Dots(c) => c.crop = crop,
            EffectConfig::Alias(c) => c.crop = crop,
            EffectConfig::Glass(c) => c.crop = crop,
            EffectConfig::Widget(c) => c.crop = crop,
        }
    }

    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, DotmatrixError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Canonical JSON (sorted keys). Equal configs have equal canonical forms.
    pub fn canonical(&self) -> String {
        serde_json::to_value(self)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// A copy with every slider in [0, 100], offsets in [0, 1] and resolution
    /// at most [`MAX_RESOLUTION`].
    pub fn clamped(&self) -> Self {
        let mut out = self.clone();
        match &mut out {
            EffectConfig::Dots(c) => {
                c.resolution = c.resolution.min(MAX_RESOLUTION);
                slider(&mut c.gap);
                slider(&mut c.lower_limit);
                clamp_common(Some(&mut c.adjust), &mut c.crop, &mut c.grain);
            }
            EffectConfig::Alias(c) => {
                c.resolution = c.resolution.min(MAX_RESOLUTION);
                slider(&mut c.threshold);
                clamp_common(Some(&mut c.adjust), &mut c.crop, &mut c.grain);
            }
            EffectConfig::Glass(c) => {
                c.resolution = c.resolution.min(MAX_RESOLUTION);
                for v in [
                    &mut c.gap,
                    &mut c.sensitivity,
                    &mut c.lower_limit,
                    &mut c.ior,
                    &mut c.blur,
                ] {
                    slider(v);
                }
                clamp_common(None, &mut c.crop, &mut c.grain);
            }
            EffectConfig::Widget(c) => {
                c.resolution = c.resolution.min(MAX_RESOLUTION);
                slider(&mut c.gap);
                slider(&mut c.lower_limit);
                clamp_common(Some(&mut c.adjust), &mut c.crop, &mut c.grain);
            }
        }
        out
    }

    /// Set one parameter by (dotted) name, e.g. `ior`, `adjust.exposure`,
    /// `crop.offset_x`. The raw value is parsed as JSON, falling back to a
    /// plain string.
    pub fn set_param(&mut self, name: &str, raw: &str) -> Result<(), DotmatrixError> {
        let unknown = || DotmatrixError::UnknownParam {
            effect: self.name().to_string(),
            name: name.to_string(),
        };
        if name == "effect" {
            return Err(unknown());
        }
        let mut tree = serde_json::to_value(&*self)?;
        let slot = name
            .split('.')
            .try_fold(&mut tree, |node, key| node.get_mut(key))
            .ok_or_else(unknown)?;
        *slot = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

        *self = serde_json::from_value(tree).map_err(|e| DotmatrixError::InvalidParam {
            name: name.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// All parameters as `(dotted name, value)` pairs, sorted by name.
    pub fn list_params(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Ok(Value::Object(map)) = serde_json::to_value(self) {
            for (k, v) in &map {
                if k != "effect" {
                    flatten_param(k, v, &mut out);
                }
            }
        }
        out
    }
}

fn flatten_param(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten_param(&format!("{}.{}", prefix, k), v, out);
            }
        }
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        for name in ["dots", "alias", "glass", "widget", "GLASS"] {
            let cfg = EffectConfig::by_name(name).unwrap();
            assert_eq!(cfg.name(), name.to_lowercase());
        }
        assert!(EffectConfig::by_name("sepia").is_none());
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let cfg = EffectConfig::from_json(r#"{"effect":"glass","ior":80}"#).unwrap();
        let EffectConfig::Glass(g) = cfg else {
            panic!("expected glass");
        };
        assert_eq!(g.ior, 80.0);
        assert_eq!(g.resolution, GlassConfig::default().resolution);
    }

    #[test]
    fn test_canonical_stable() {
        let a = EffectConfig::by_name("dots").unwrap();
        let b = EffectConfig::from_json(&a.canonical()).unwrap();
        assert_eq!(a.canonical(), b.canonical());
        assert!(a.canonical().starts_with(r#"{"adjust":"#));
    }

    #[test]
    fn test_set_param() {
        let mut cfg = EffectConfig::by_name("dots").unwrap();
        cfg.set_param("gap", "25").unwrap();
        cfg.set_param("adjust.exposure", "70").unwrap();
        cfg.set_param("invert", "true").unwrap();
        let EffectConfig::Dots(d) = &cfg else {
            panic!("expected dots");
        };
        assert_eq!(d.gap, 25.0);
        assert_eq!(d.adjust.exposure, 70.0);
        assert!(d.invert);
    }

    #[test]
    fn test_set_param_errors() {
        let mut cfg = EffectConfig::by_name("glass").unwrap();
        let before = cfg.clone();
        assert!(matches!(
            cfg.set_param("nope", "1"),
            Err(DotmatrixError::UnknownParam { .. })
        ));
        assert!(matches!(
            cfg.set_param("effect", "dots"),
            Err(DotmatrixError::UnknownParam { .. })
        ));
        assert!(matches!(
            cfg.set_param("resolution", "many"),
            Err(DotmatrixError::InvalidParam { .. })
        ));
        assert_eq!(cfg, before);
    }

    #[test]
    fn test_clamped() {
        let mut cfg = EffectConfig::by_name("glass").unwrap();
        cfg.set_param("ior", "250").unwrap();
        cfg.set_param("blur", "-4").unwrap();
        cfg.set_param("resolution", "9000").unwrap();
        cfg.set_param("crop.offset_x", "3").unwrap();
        let EffectConfig::Glass(g) = cfg.clamped() else {
            panic!("expected glass");
        };
        assert_eq!(g.ior, 100.0);
        assert_eq!(g.blur, 0.0);
        assert_eq!(g.resolution, MAX_RESOLUTION);
        assert_eq!(g.crop.offset_x, 1.0);
    }

    #[test]
    fn test_list_params_dotted() {
        let params = EffectConfig::by_name("widget").unwrap().list_params();
        let names: Vec<&str> = params.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"adjust.exposure"));
        assert!(names.contains(&"crop.offset_y"));
        assert!(names.contains(&"anti_aliased"));
        assert!(!names.contains(&"effect"));
    }

    #[test]
    fn test_crop_accessors() {
        let mut cfg = EffectConfig::by_name("alias").unwrap();
        cfg.set_crop(CropWindow::new(0.2, 0.9));
        assert_eq!(cfg.crop(), CropWindow::new(0.2, 0.9));
    }
}
