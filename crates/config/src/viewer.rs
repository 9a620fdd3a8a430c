#![forbid(unsafe_code)]

use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::{path::PathBuf, time::Duration};

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Viewer {
    /// Binary scene (GLB) shown by the viewer. Prefetched at startup.
    pub asset_path: PathBuf,

    /// Uniform scale applied to the loaded scene.
    pub model_scale: f32,

    pub environment: Environment,

    /// Clear colour behind the scene, `#rrggbb`.
    pub background: String,

    /// Ambient light intensity of the environment preset.
    pub light_intensity: f32,

    pub auto_rotate: bool,

    /// Auto-rotation speed; 1.0 is one revolution per minute.
    pub auto_rotate_speed: f32,

    pub enable_zoom: bool,
    pub enable_pan: bool,

    /// Closest and farthest camera distance allowed by zooming.
    pub min_distance: f32,
    pub max_distance: f32,

    /// Frame pacing of the headless render loop.
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub frame_interval: Duration,

    /// Output frame size in pixels.
    pub width: u32,
    pub height: u32,
}

impl Default for Viewer {
    fn default() -> Self {
        Self {
            asset_path: PathBuf::from("public/pony_cartoon.glb"),
            model_scale: 1.5,
            environment: Environment::default(),
            background: "#0f0f0f".into(),
            light_intensity: 0.3,
            auto_rotate: true,
            auto_rotate_speed: 1.5,
            enable_zoom: true,
            enable_pan: true,
            min_distance: 0.5,
            max_distance: 50.0,
            frame_interval: Duration::from_millis(16),
            width: 640,
            height: 360,
        }
    }
}

impl Viewer {
    /// Normalize values that would break the camera or the render loop.
    /// Non-finite numbers fall back to their defaults.
    pub fn sanitize(mut self) -> Self {
        let defaults = Self::default();
        for (value, fallback) in [
            (&mut self.model_scale, defaults.model_scale),
            (&mut self.light_intensity, defaults.light_intensity),
            (&mut self.auto_rotate_speed, defaults.auto_rotate_speed),
            (&mut self.min_distance, defaults.min_distance),
            (&mut self.max_distance, defaults.max_distance),
        ] {
            if !value.is_finite() {
                *value = fallback;
            }
        }

        self.min_distance = self.min_distance.max(f32::EPSILON);
        if self.max_distance < self.min_distance {
            self.max_distance = self.min_distance;
        }
        if self.frame_interval.is_zero() {
            self.frame_interval = Duration::from_millis(1);
        }
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        self
    }
}
