#![forbid(unsafe_code)]

use crate::glb::DecodeError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode scene: {0}")]
    Decode(#[from] DecodeError),

    #[error("asset load task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("no async runtime to load {0}")]
    NoRuntime(PathBuf),

    #[error("invalid colour `{0}`, expected #rrggbb")]
    InvalidColor(String),
}
