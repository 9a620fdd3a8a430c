#![forbid(unsafe_code)]

mod cache;
mod loader;

pub use cache::{AssetCache, AssetState};
pub use loader::{AssetLoader, FsAssetLoader};
