//! # Crop Window
//!
//! A normalized pan offset that decides which sub-rectangle of the source is
//! sampled when the source and target aspect ratios differ.
//!
//! ```text
//!  source wider than target          source taller than target
//!  ┌────┬──────────┬────┐            ┌──────────┐
//!  │    │  window  │    │            ├──────────┤ ← offset_y picks
//!  │    │          │    │            │  window  │   the vertical band
//!  └────┴──────────┴────┘            ├──────────┤
//!    ↑ offset_x slides horizontally  └──────────┘
//! ```
//!
//! Offsets are always clamped into [0, 1]. When the aspect ratios match within
//! [`ASPECT_TOLERANCE`] the full source is used and panning does nothing.

use serde::{Deserialize, Serialize};

/// Aspect ratios closer than this are treated as equal.
pub const ASPECT_TOLERANCE: f32 = 0.01;

/// Normalized pan offsets into the croppable excess of the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropWindow {
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for CropWindow {
    fn default() -> Self {
        Self::centered()
    }
}

/// Source sub-rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Which axis of the source has excess to crop away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropAxis {
    None,
    Horizontal,
    Vertical,
}

/// Classify the crop axis for a source/target pair.
pub fn crop_axis(source_w: u32, source_h: u32, target_w: u32, target_h: u32) -> CropAxis {
    if source_w == 0 || source_h == 0 || target_w == 0 || target_h == 0 {
        return CropAxis::None;
    }
    classify(source_w as f32 / source_h as f32, target_w as f32 / target_h as f32)
}

fn classify(source_aspect: f32, target_aspect: f32) -> CropAxis {
    if (source_aspect - target_aspect).abs() <= ASPECT_TOLERANCE {
        CropAxis::None
    } else if source_aspect > target_aspect {
        CropAxis::Horizontal
    } else {
        CropAxis::Vertical
    }
}

impl CropWindow {
    /// Create a window with both offsets clamped into [0, 1].
    pub fn new(offset_x: f32, offset_y: f32) -> Self {
        Self {
            offset_x: clamp_offset(offset_x),
            offset_y: clamp_offset(offset_y),
        }
    }

    pub fn centered() -> Self {
        Self {
            offset_x: 0.5,
            offset_y: 0.5,
        }
    }

    /// Compute the sampled source rectangle.
    ///
    /// Returns `None` when any dimension resolves to zero.
    pub fn source_rect(
        &self,
        source_w: u32,
        source_h: u32,
        target_w: u32,
        target_h: u32,
    ) -> Option<SourceRect> {
        if source_w == 0 || source_h == 0 || target_w == 0 || target_h == 0 {
            return None;
        }
        let target_aspect = target_w as f32 / target_h as f32;
        let rect = match crop_axis(source_w, source_h, target_w, target_h) {
            CropAxis::None => SourceRect {
                x: 0,
                y: 0,
                width: source_w,
                height: source_h,
            },
            CropAxis::Horizontal => {
                let width = ((source_h as f32 * target_aspect).round() as u32).min(source_w);
                let excess = (source_w - width) as f32;
                SourceRect {
                    x: (excess * clamp_offset(self.offset_x)).round() as u32,
                    y: 0,
                    width,
                    height: source_h,
                }
            }
            CropAxis::Vertical => {
                let height = ((source_w as f32 / target_aspect).round() as u32).min(source_h);
                let excess = (source_h - height) as f32;
                SourceRect {
                    x: 0,
                    y: (excess * clamp_offset(self.offset_y)).round() as u32,
                    width: source_w,
                    height,
                }
            }
        };
        if rect.width == 0 || rect.height == 0 {
            None
        } else {
            Some(rect)
        }
    }

    /// Apply a pointer delta (in display pixels) to a starting window.
    ///
    /// `pan_range` is the croppable excess expressed in the same display
    /// pixels per axis. Dragging right reveals content to the left, so the
    /// offset moves against the delta. Axes with no excess keep their offset.
    pub fn panned(&self, delta: (f32, f32), pan_range: (f32, f32)) -> Self {
        let step = |offset: f32, d: f32, range: f32| {
            if range > 0.0 {
                clamp_offset(offset - d / range)
            } else {
                offset
            }
        };
        Self {
            offset_x: step(self.offset_x, delta.0, pan_range.0),
            offset_y: step(self.offset_y, delta.1, pan_range.1),
        }
    }
}

/// Croppable excess per axis when the source is displayed to cover a
/// `display_w x display_h` viewport.
///
/// Aspects within [`ASPECT_TOLERANCE`] have nothing to pan, matching
/// [`CropWindow::source_rect`], which ignores the offsets there.
pub fn pan_range(
    source_w: u32,
    source_h: u32,
    display_w: f32,
    display_h: f32,
) -> (f32, f32) {
    if source_w == 0 || source_h == 0 || display_w <= 0.0 || display_h <= 0.0 {
        return (0.0, 0.0);
    }
    if classify(source_w as f32 / source_h as f32, display_w / display_h) == CropAxis::None {
        return (0.0, 0.0);
    }
    let scale = (display_w / source_w as f32).max(display_h / source_h as f32);
    let shown_w = source_w as f32 * scale;
    let shown_h = source_h as f32 * scale;
    ((shown_w - display_w).max(0.0), (shown_h - display_h).max(0.0))
}

#[inline]
fn clamp_offset(v: f32) -> f32 {
    if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) }
}

/// Pointer-drag panning as an explicit state machine.
///
/// `Idle → Dragging → Idle`. Moves are a pure function of the drag start, so
/// no intermediate offsets accumulate rounding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        start: (f32, f32),
        start_offset: CropWindow,
    },
}

impl DragState {
    /// Start a drag at `point` from the window currently applied.
    pub fn begin(point: (f32, f32), current: CropWindow) -> Self {
        DragState::Dragging {
            start: point,
            start_offset: current,
        }
    }

    /// Window for the pointer at `point`; `None` when not dragging.
    pub fn update(&self, point: (f32, f32), pan_range: (f32, f32)) -> Option<CropWindow> {
        match *self {
            DragState::Idle => None,
            DragState::Dragging {
                start,
                start_offset,
            } => Some(start_offset.panned((point.0 - start.0, point.1 - start.1), pan_range)),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        let c = CropWindow::new(-1.0, 3.0);
        assert_eq!(c.offset_x, 0.0);
        assert_eq!(c.offset_y, 1.0);
    }

    #[test]
    fn test_matching_aspect_uses_full_source() {
        let rect = CropWindow::new(0.0, 1.0).source_rect(200, 100, 400, 200);
        assert_eq!(
            rect,
            Some(SourceRect {
                x: 0,
                y: 0,
                width: 200,
                height: 100
            })
        );
    }

    #[test]
    fn test_wide_source_crops_horizontally() {
        // 300x100 into a square: 100px window sliding over 200px of excess
        let left = CropWindow::new(0.0, 0.5).source_rect(300, 100, 50, 50).unwrap();
        let right = CropWindow::new(1.0, 0.5).source_rect(300, 100, 50, 50).unwrap();
        assert_eq!((left.x, left.width, left.height), (0, 100, 100));
        assert_eq!((right.x, right.width), (200, 100));
        // offset_y has no effect on a horizontal crop
        let other = CropWindow::new(0.0, 0.0).source_rect(300, 100, 50, 50).unwrap();
        assert_eq!(left, other);
    }

    #[test]
    fn test_tall_source_crops_vertically() {
        let mid = CropWindow::centered().source_rect(100, 300, 50, 50).unwrap();
        assert_eq!((mid.x, mid.y, mid.width, mid.height), (0, 100, 100, 100));
    }

    #[test]
    fn test_degenerate_rect() {
        assert_eq!(CropWindow::centered().source_rect(0, 10, 10, 10), None);
        assert_eq!(CropWindow::centered().source_rect(10, 10, 0, 10), None);
    }

    #[test]
    fn test_panned_moves_against_delta() {
        let c = CropWindow::centered().panned((50.0, 0.0), (100.0, 0.0));
        assert!((c.offset_x - 0.0).abs() < 1e-6);
        assert!((c.offset_y - 0.5).abs() < 1e-6);
        let c = CropWindow::centered().panned((-500.0, 0.0), (100.0, 0.0));
        assert_eq!(c.offset_x, 1.0);
    }

    #[test]
    fn test_pan_range() {
        // 200x100 covering a 100x100 viewport: 100px horizontal excess
        assert_eq!(pan_range(200, 100, 100.0, 100.0), (100.0, 0.0));
        assert_eq!(pan_range(100, 100, 50.0, 50.0), (0.0, 0.0));
    }

    #[test]
    fn test_pan_range_within_aspect_tolerance() {
        // 2.0 vs 1.99: same crop axis decision as source_rect
        assert_eq!(crop_axis(1000, 500, 199, 100), CropAxis::None);
        assert_eq!(pan_range(1000, 500, 199.0, 100.0), (0.0, 0.0));
        assert!(pan_range(1000, 500, 190.0, 100.0).0 > 0.0);
    }

    #[test]
    fn test_drag_state_machine() {
        let idle = DragState::Idle;
        assert_eq!(idle.update((5.0, 5.0), (10.0, 10.0)), None);

        let drag = DragState::begin((10.0, 10.0), CropWindow::centered());
        assert!(drag.is_dragging());
        let c = drag.update((5.0, 10.0), (10.0, 10.0)).unwrap();
        assert!((c.offset_x - 1.0).abs() < 1e-6);
        assert!((c.offset_y - 0.5).abs() < 1e-6);
    }
}
