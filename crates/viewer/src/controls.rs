#![forbid(unsafe_code)]

use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

/// Keeps the camera off the poles, where the up vector degenerates.
const POLAR_MARGIN: f32 = 0.01;
const START_RADIUS: f32 = 5.0;

/// Camera placement handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

/// Orbit camera around a target point, y-up.
///
/// `azimuth` is measured around the y axis, `polar` from +y. Auto-rotation
/// turns the camera clockwise seen from above, one revolution per minute at
/// speed 1.0.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    azimuth: f32,
    polar: f32,

    pub auto_rotate: bool,
    auto_rotate_speed: f32,
    enable_zoom: bool,
    enable_pan: bool,
    min_distance: f32,
    max_distance: f32,

    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl OrbitControls {
    pub fn new(viewer: &config::Viewer) -> Self {
        Self {
            target: Vec3::ZERO,
            radius: START_RADIUS.clamp(viewer.min_distance, viewer.max_distance),
            azimuth: TAU - FRAC_PI_4,
            polar: FRAC_PI_2 - FRAC_PI_4 / 2.0,
            auto_rotate: viewer.auto_rotate,
            auto_rotate_speed: viewer.auto_rotate_speed,
            enable_zoom: viewer.enable_zoom,
            enable_pan: viewer.enable_pan,
            min_distance: viewer.min_distance,
            max_distance: viewer.max_distance,
            rotate_speed: 0.01,
            pan_speed: 0.01,
            zoom_speed: 0.05,
        }
    }

    /// Advance auto-rotation by `dt` seconds. Returns whether the camera moved.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.auto_rotate || dt <= 0.0 || self.auto_rotate_speed == 0.0 {
            return false;
        }
        let step = TAU / 60.0 * self.auto_rotate_speed * dt;
        self.azimuth = (self.azimuth - step).rem_euclid(TAU);
        true
    }

    /// Drag rotation, in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.azimuth = (self.azimuth - delta.x * self.rotate_speed).rem_euclid(TAU);
        self.polar = (self.polar - delta.y * self.rotate_speed)
            .clamp(POLAR_MARGIN, std::f32::consts::PI - POLAR_MARGIN);
    }

    /// Positive `delta` moves closer. Ignored when zoom is disabled.
    pub fn zoom(&mut self, delta: f32) {
        if !self.enable_zoom {
            return;
        }
        self.radius = (self.radius * (1.0 - delta * self.zoom_speed))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Move the target in the view plane. Ignored when pan is disabled.
    pub fn pan(&mut self, delta: Vec2) {
        if !self.enable_pan {
            return;
        }
        let forward = (self.target - self.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let scale = self.pan_speed * self.radius;
        self.target += right * (-delta.x * scale) + up * (delta.y * scale);
    }

    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.auto_rotate = !self.auto_rotate;
        self.auto_rotate
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.radius
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            eye: self.eye(),
            target: self.target,
            up: Vec3::Y,
        }
    }
}
