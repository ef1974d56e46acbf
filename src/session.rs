//! # Editing Session
//!
//! What a host holds for one open document: the source image, the config
//! history, the pan gesture in progress, and memoized render geometry.
//!
//! Every config change goes through the history. Pan drags preview their
//! offsets without touching history and commit a single snapshot on release,
//! so one drag is one undo step.

use serde_json::Value;

use crate::config::EffectConfig;
use crate::coverage::CoverageCache;
use crate::error::DotmatrixError;
use crate::history::History;
use crate::raster::Raster;
use crate::sample::crop::{CropWindow, DragState, pan_range};

/// One editing session.
#[derive(Debug)]
pub struct Session {
    source: Option<Raster>,
    history: History<EffectConfig>,
    drag: DragState,
    preview: Option<CropWindow>,
    coverage: CoverageCache,
}

impl Session {
    pub fn new(initial: EffectConfig) -> Self {
        Self {
            source: None,
            history: History::new(initial.clamped()),
            drag: DragState::Idle,
            preview: None,
            coverage: CoverageCache::new(),
        }
    }

    /// Ingest a decoded image.
    pub fn load_image(&mut self, image: Raster) {
        self.source = Some(image);
    }

    /// Swap in a new image and re-centre the crop (recorded in history).
    pub fn replace_image(&mut self, image: Raster) {
        self.cancel_pan();
        self.source = Some(image);
        self.history.update(|c| c.set_crop(CropWindow::centered()));
    }

    /// Drop the image. History is kept.
    pub fn clear_image(&mut self) {
        self.cancel_pan();
        self.source = None;
    }

    pub fn source(&self) -> Option<&Raster> {
        self.source.as_ref()
    }

    pub fn config(&self) -> &EffectConfig {
        self.history.current()
    }

    pub fn history(&self) -> &History<EffectConfig> {
        &self.history
    }

    /// Apply a mutation to a copy of the current config, clamp it, and record
    /// it. Returns whether history changed.
    pub fn update(&mut self, f: impl FnOnce(&mut EffectConfig)) -> bool {
        let mut next = self.config().clone();
        f(&mut next);
        self.history.write(next.clamped())
    }

    /// Set one parameter by name (see [`EffectConfig::set_param`]).
    pub fn set_param(&mut self, name: &str, raw: &str) -> Result<bool, DotmatrixError> {
        let mut next = self.config().clone();
        next.set_param(name, raw)?;
        Ok(self.history.write(next.clamped()))
    }

    /// Switch to another effect, keeping the current crop.
    pub fn switch_effect(&mut self, name: &str) -> Result<bool, DotmatrixError> {
        let mut next =
            EffectConfig::by_name(name).ok_or_else(|| DotmatrixError::UnknownEffect(name.to_string()))?;
        next.set_crop(self.config().crop());
        Ok(self.history.write(next))
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_pan();
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_pan();
        self.history.redo()
    }

    /// Reset to the initial config, optionally merged with JSON overrides.
    pub fn reset(&mut self, overrides: Option<&Value>) -> bool {
        self.cancel_pan();
        match overrides {
            Some(o) => self.history.reset_with(o),
            None => self.history.reset(),
        }
    }

    /// Start a pan drag at `point` (display pixels).
    pub fn begin_pan(&mut self, point: (f32, f32)) {
        let current = self.config().crop();
        self.drag = DragState::begin(point, current);
        self.preview = Some(current);
    }

    /// Move the drag to `point` over a `display` viewport. Returns the preview
    /// window, or `None` when no drag is active or there is no image.
    pub fn pan_to(&mut self, point: (f32, f32), display: (f32, f32)) -> Option<CropWindow> {
        let source = self.source.as_ref()?;
        let range = pan_range(source.width(), source.height(), display.0, display.1);
        let window = self.drag.update(point, range)?;
        self.preview = Some(window);
        Some(window)
    }

    /// Finish the drag, committing the previewed window to history.
    pub fn end_pan(&mut self) -> bool {
        let committed = match (self.drag, self.preview.take()) {
            (DragState::Dragging { .. }, Some(window)) => {
                self.history.update(|c| c.set_crop(window))
            }
            _ => false,
        };
        self.drag = DragState::Idle;
        committed
    }

    fn cancel_pan(&mut self) {
        self.drag = DragState::Idle;
        self.preview = None;
    }

    /// Render the current config (with any in-progress pan applied).
    /// Returns `None` when no image is loaded.
    pub fn render(&mut self, width: u32, height: u32) -> Option<Raster> {
        let source = self.source.as_ref()?;
        let mut config = self.history.current().clone();
        if let Some(window) = self.preview {
            config.set_crop(window);
        }
        Some(config.render_cached(source, width, height, &mut self.coverage))
    }
}
