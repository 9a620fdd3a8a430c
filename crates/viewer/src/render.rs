#![forbid(unsafe_code)]

use crate::controls::CameraPose;
use crate::error::Error;
use crate::glb::SceneAsset;
use crate::post_process::{Frame, Rgba};
use glam::{Mat4, Vec3};

/// Parse a `#rrggbb` colour into opaque RGBA.
pub fn parse_hex_color(text: &str) -> Result<Rgba, Error> {
    let invalid = || Error::InvalidColor(text.to_owned());
    let hex = text.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?, 255])
}

/// Draws one frame of the scene. The viewer only depends on this seam.
pub trait Rasterizer: Send + Sync {
    fn draw(&self, frame: &mut Frame, pose: &CameraPose, asset: Option<&SceneAsset>);
}

/// Minimal software rasterizer: clears to the background and marks the
/// projected scene origin with a lit square sized by model scale.
#[derive(Debug, Clone)]
pub struct BackdropRasterizer {
    background: Rgba,
    light: f32,
    model_scale: f32,
}

impl BackdropRasterizer {
    pub fn new(viewer: &config::Viewer) -> Result<Self, Error> {
        Ok(Self {
            background: parse_hex_color(&viewer.background)?,
            light: viewer.light_intensity.clamp(0.0, 1.0),
            model_scale: viewer.model_scale,
        })
    }
}

impl Rasterizer for BackdropRasterizer {
    fn draw(&self, frame: &mut Frame, pose: &CameraPose, asset: Option<&SceneAsset>) {
        *frame = Frame::filled(frame.width(), frame.height(), self.background);
        if asset.is_none() {
            return;
        }

        let (w, h) = (frame.width() as f32, frame.height() as f32);
        let view = Mat4::look_at_rh(pose.eye, pose.target, pose.up);
        let proj = Mat4::perspective_rh(45f32.to_radians(), w / h, 0.1, 1000.0);
        let clip = proj * view * Vec3::ZERO.extend(1.0);
        if clip.w <= 0.0 {
            return;
        }
        let ndc = clip.truncate() / clip.w;
        let cx = (ndc.x + 1.0) * 0.5 * w;
        let cy = (1.0 - ndc.y) * 0.5 * h;

        let distance = (pose.eye - Vec3::ZERO).length().max(f32::EPSILON);
        let half = (self.model_scale * h / (2.0 * distance)).max(1.0);
        let shade = (255.0 * (0.5 + 0.5 * self.light)) as u8;

        let x0 = (cx - half).max(0.0) as u32;
        let y0 = (cy - half).max(0.0) as u32;
        let x1 = (cx + half).max(0.0) as u32;
        let y1 = (cy + half).max(0.0) as u32;
        for y in y0..y1.min(frame.height()) {
            for x in x0..x1.min(frame.width()) {
                frame.set(x, y, [shade, shade, shade, 255]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::OrbitControls;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn parses_hex_colours() {
        assert_eq!(parse_hex_color("#0f0f0f").unwrap(), [15, 15, 15, 255]);
        assert_eq!(parse_hex_color("#FFa000").unwrap(), [255, 160, 0, 255]);
        for bad in ["0f0f0f", "#fff", "#gggggg", "#0f0f0f0f", "#é0000"] {
            assert!(matches!(parse_hex_color(bad), Err(Error::InvalidColor(_))), "{bad}");
        }
    }

    #[test]
    fn draws_backdrop_and_scene_marker() {
        let viewer = config::Viewer::default();
        let raster = BackdropRasterizer::new(&viewer).unwrap();
        let pose = OrbitControls::new(&viewer).pose();
        let mut frame = Frame::new(64, 36);

        raster.draw(&mut frame, &pose, None);
        assert!(frame.pixels().iter().all(|px| *px == [15, 15, 15, 255]));

        let asset = SceneAsset {
            path: PathBuf::from("car.glb"),
            version: 2,
            document: json!({}),
            binary: Vec::new(),
        };
        raster.draw(&mut frame, &pose, Some(&asset));
        // the origin projects to the centre of the frame
        assert_ne!(frame.get(32, 18), Some([15, 15, 15, 255]));
        assert_eq!(frame.get(0, 0), Some([15, 15, 15, 255]));
    }
}
