#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Image-based lighting preset surrounding the scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Apartment,
    #[default]
    City,
    Dawn,
    Forest,
    Lobby,
    Night,
    Park,
    Studio,
    Sunset,
    Warehouse,
}
