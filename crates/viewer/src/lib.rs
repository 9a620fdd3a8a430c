#![forbid(unsafe_code)]

//! Headless scene viewer: asset prefetch cache, GLB decoding, orbit camera
//! and a pixelation post-process over a software-rendered frame.

pub mod asset;
pub mod controls;
mod error;
pub mod glb;
pub mod lifecycle;
pub mod post_process;
pub mod render;
mod viewer;

pub use asset::{AssetCache, AssetLoader, AssetState, FsAssetLoader};
pub use controls::{CameraPose, OrbitControls};
pub use error::Error;
pub use glb::SceneAsset;
pub use lifecycle::Readiness;
pub use post_process::{Frame, PixelationFilter};
pub use viewer::{
    LOADING_PLACEHOLDER, RunReport, SceneViewer, ViewerCommand, ViewerFrame, ViewerStatus,
};
