#![forbid(unsafe_code)]

use crate::asset::{AssetCache, AssetState};
use crate::controls::{CameraPose, OrbitControls};
use crate::error::Error;
use crate::glb::SceneAsset;
use crate::lifecycle::Readiness;
use crate::post_process::{Frame, PixelationFilter};
use crate::render::{BackdropRasterizer, Rasterizer};
use config::Config;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const LOADING_PLACEHOLDER: &str = "Loading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    ToggleAutoRotate,
    DumpState,
}

/// Output of one render call.
#[derive(Debug, Clone)]
pub enum ViewerFrame {
    /// Not mounted yet; only the placeholder text is shown.
    Loading,
    Rendered {
        pose: CameraPose,
        /// `None` while the asset loads, or when it failed.
        asset: Option<Arc<SceneAsset>>,
        image: Frame,
    },
}

#[derive(Debug, Clone)]
pub struct ViewerStatus {
    pub readiness: Readiness,
    pub auto_rotate: bool,
    pub pose: CameraPose,
    pub asset_path: PathBuf,
    pub asset: &'static str,
    pub frames: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunReport {
    pub frames: u64,
    pub toggles: u64,
}

pub struct SceneViewer {
    readiness: Readiness,
    controls: OrbitControls,
    cache: AssetCache,
    asset_path: PathBuf,
    rasterizer: Box<dyn Rasterizer>,
    filter: PixelationFilter,
    frame_interval: Duration,
    size: (u32, u32),
    frames: u64,
    failure_logged: bool,
}

impl SceneViewer {
    pub fn new(config: &Config, cache: AssetCache) -> Result<Self, Error> {
        let rasterizer = BackdropRasterizer::new(&config.viewer)?;
        Ok(Self::with_rasterizer(config, cache, Box::new(rasterizer)))
    }

    pub fn with_rasterizer(
        config: &Config,
        cache: AssetCache,
        rasterizer: Box<dyn Rasterizer>,
    ) -> Self {
        Self {
            readiness: Readiness::default(),
            controls: OrbitControls::new(&config.viewer),
            cache,
            asset_path: config.viewer.asset_path.clone(),
            rasterizer,
            filter: PixelationFilter::from_config(&config.post_processing),
            frame_interval: config.viewer.frame_interval,
            size: (config.viewer.width, config.viewer.height),
            frames: 0,
            failure_logged: false,
        }
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    /// Leave the uninitialized state. Repeated calls are no-ops.
    pub fn mount(&mut self) {
        if self.readiness.mark_ready() {
            info!(asset = %self.asset_path.display(), "viewer mounted");
        }
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn toggle_auto_rotate(&mut self) -> bool {
        let on = self.controls.toggle_auto_rotate();
        info!(auto_rotate = on, "auto-rotation toggled");
        on
    }

    pub fn advance(&mut self, dt: Duration) -> bool {
        self.controls.update(dt.as_secs_f32())
    }

    fn scene_asset(&mut self) -> Option<Arc<SceneAsset>> {
        match self.cache.status(&self.asset_path) {
            AssetState::Ready(asset) => Some(asset),
            AssetState::Loading => None,
            AssetState::NotRequested => {
                if let Err(err) = self.cache.prefetch(&self.asset_path) {
                    warn!(%err, "could not start asset load");
                }
                None
            }
            AssetState::Failed(reason) => {
                if !self.failure_logged {
                    warn!(asset = %self.asset_path.display(), %reason, "rendering without asset");
                    self.failure_logged = true;
                }
                None
            }
        }
    }

    pub fn render(&mut self) -> ViewerFrame {
        if !self.readiness.is_ready() {
            return ViewerFrame::Loading;
        }

        let asset = self.scene_asset();
        let pose = self.controls.pose();
        let mut image = Frame::new(self.size.0, self.size.1);
        self.rasterizer.draw(&mut image, &pose, asset.as_deref());
        self.filter.apply(&mut image);
        self.frames += 1;

        ViewerFrame::Rendered { pose, asset, image }
    }

    pub fn status(&self) -> ViewerStatus {
        let asset = match self.cache.status(&self.asset_path) {
            AssetState::NotRequested => "not requested",
            AssetState::Loading => "loading",
            AssetState::Ready(_) => "ready",
            AssetState::Failed(_) => "failed",
        };
        ViewerStatus {
            readiness: self.readiness,
            auto_rotate: self.controls.auto_rotate,
            pose: self.controls.pose(),
            asset_path: self.asset_path.clone(),
            asset,
            frames: self.frames,
        }
    }

    /// Render frames at the configured interval until cancelled.
    pub async fn run_until(
        &mut self,
        cancel: CancellationToken,
        mut commands: mpsc::UnboundedReceiver<ViewerCommand>,
    ) -> RunReport {
        self.mount();
        let mut report = RunReport::default();
        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last = tokio::time::Instant::now();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(frames = report.frames, "viewer stopping");
                    break;
                }
                Some(command) = commands.recv() => match command {
                    ViewerCommand::ToggleAutoRotate => {
                        self.toggle_auto_rotate();
                        report.toggles += 1;
                    }
                    ViewerCommand::DumpState => {
                        let status = self.status();
                        info!(
                            readiness = ?status.readiness,
                            auto_rotate = status.auto_rotate,
                            eye = ?status.pose.eye,
                            asset = status.asset,
                            frames = status.frames,
                            "viewer state"
                        );
                    }
                },
                now = ticker.tick() => {
                    self.advance(now - last);
                    last = now;
                    if let ViewerFrame::Rendered { asset, .. } = self.render() {
                        report.frames += 1;
                        debug!(frame = report.frames, has_asset = asset.is_some(), "frame");
                    }
                }
            }
        }

        report
    }
}
