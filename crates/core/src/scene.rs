//! Reproducible description of a background render.
//!
//! A [`Scene`] captures everything needed to replay an animation offline:
//! which animation, the viewport, the theme, the PRNG seed, how many frames
//! to run, where the cursor rests, and any parameter overrides.

use crate::animation::{Theme, Viewport};
use crate::error::BackdropError;
use serde::{Deserialize, Serialize};

fn default_frames() -> usize {
    120
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Reproducible render description, loadable from JSON.
///
/// Only `animation`, `width` and `height` are required; everything else has
/// a default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub animation: String,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_frames")]
    pub frames: usize,
    /// Resting cursor position; `None` leaves the cursor at the center.
    #[serde(default)]
    pub pointer: Option<[f64; 2]>,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
}

impl Scene {
    pub fn new(animation: &str, width: usize, height: usize) -> Self {
        Self {
            animation: animation.to_string(),
            width,
            height,
            theme: Theme::default(),
            seed: 0,
            frames: default_frames(),
            pointer: None,
            params: empty_params(),
        }
    }

    /// Parses a scene from JSON text and validates it.
    pub fn from_json_str(text: &str) -> Result<Self, BackdropError> {
        let scene: Scene = serde_json::from_str(text)
            .map_err(|e| BackdropError::InvalidConfig(format!("scene: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Rejects zero or overflowing dimensions and non-object params.
    pub fn validate(&self) -> Result<(), BackdropError> {
        if self.width == 0 || self.height == 0 {
            return Err(BackdropError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(BackdropError::InvalidDimensions)?;
        if !self.params.is_object() {
            return Err(BackdropError::InvalidConfig(
                "params must be a JSON object".to_string(),
            ));
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f64, self.height as f64)
    }
}
