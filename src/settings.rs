// Settings file (JSON). Every field has a default, so a missing or partial file is fine.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::brush::DabStrategy;
use crate::error::Error;
use crate::stroke::DEFAULT_SPACING;

pub const DEFAULT_PATH: &str = "dab_canvas.json";
/// Environment variable that overrides `DEFAULT_PATH`.
pub const PATH_ENV: &str = "DAB_CANVAS_SETTINGS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub dab_diameter: u32,
    pub dab_spacing: f32,
    /// Scale applied per wheel notch when zooming out; zooming in uses the reciprocal.
    pub zoom_step: f32,
    pub stroke_alpha: u8,
    pub parallel_dabs: bool,
    /// 0x00RRGGBB shown beneath the canvas.
    pub paper_color: u32,
    /// 0x00RRGGBB shown around the canvas.
    pub backdrop_color: u32,
    pub window_width: usize,
    pub window_height: usize,
    pub target_fps: usize,
    /// Fixed seed for stroke colors; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 1000,
            canvas_height: 1000,
            dab_diameter: 25,
            dab_spacing: DEFAULT_SPACING,
            zoom_step: 0.8,
            stroke_alpha: 16,
            parallel_dabs: true,
            paper_color: 0x00FF_FFFF,
            backdrop_color: 0x00F0_F0F0,
            window_width: 1280,
            window_height: 800,
            target_fps: 60,
            seed: None,
            debug: false,
        }
    }
}

impl Settings {
    /// Read settings from `path`. A missing or empty file yields the defaults; a file that
    /// exists but can't be read (permissions, a directory, non-UTF-8 bytes) is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file; using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::Settings(format!("{}: {e}", path.display()))),
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_json::from_str(&content)
            .map_err(|e| Error::Settings(format!("{}: {e}", path.display())))?;
        Ok(settings.validated())
    }

    /// Load from `$DAB_CANVAS_SETTINGS`, falling back to `dab_canvas.json`.
    pub fn load_default() -> Result<Self, Error> {
        let path = std::env::var(PATH_ENV).unwrap_or_else(|_| DEFAULT_PATH.to_string());
        Self::load(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Settings(format!("serialize: {e}")))?;
        std::fs::write(path, json).map_err(|e| Error::Settings(format!("{}: {e}", path.display())))?;
        Ok(())
    }

    /// Replace values the painter can't work with by their defaults.
    pub fn validated(mut self) -> Self {
        let d = Settings::default();
        if self.canvas_width == 0 || self.canvas_height == 0 {
            warn!(width = self.canvas_width, height = self.canvas_height, "canvas size must be non-zero; using default");
            self.canvas_width = d.canvas_width;
            self.canvas_height = d.canvas_height;
        }
        if self.dab_diameter == 0 {
            warn!("dab diameter must be non-zero; using default");
            self.dab_diameter = d.dab_diameter;
        }
        if !(self.dab_spacing.is_finite() && self.dab_spacing > 0.0) {
            warn!(spacing = self.dab_spacing, "dab spacing must be positive; using default");
            self.dab_spacing = d.dab_spacing;
        }
        if !(self.zoom_step > 0.0 && self.zoom_step < 1.0) {
            warn!(step = self.zoom_step, "zoom step must be in (0, 1); using default");
            self.zoom_step = d.zoom_step;
        }
        if self.window_width == 0 || self.window_height == 0 {
            warn!("window size must be non-zero; using default");
            self.window_width = d.window_width;
            self.window_height = d.window_height;
        }
        self
    }

    pub fn dab_strategy(&self) -> DabStrategy {
        if self.parallel_dabs { DabStrategy::Parallel } else { DabStrategy::Sequential }
    }
}
