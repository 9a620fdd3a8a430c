#![forbid(unsafe_code)]

//! Configuration for the EV prediction client and the scene viewer.
//!
//! Values are layered with [`figment`]: built-in defaults first, then an
//! optional TOML file. Every section is `#[serde(default)]`, so a file only
//! needs to mention what it overrides.

mod api;
mod environment;
mod error;
mod post_processing;
mod viewer;

pub use api::Api;
pub use environment::Environment;
pub use error::Error;
pub use post_processing::PostProcessing;
pub use viewer::Viewer;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: Api,
    pub viewer: Viewer,
    pub post_processing: PostProcessing,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file on top of the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::InvalidPath(path.to_owned()));
        }
        Self::from_figment(Self::defaults().merge(Toml::file(path)))
    }

    /// Parse TOML text on top of the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Self::from_figment(Self::defaults().merge(Toml::string(text)))
    }

    /// Render the configuration as a TOML document.
    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml_edit::ser::to_string_pretty(self)?)
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    fn from_figment(figment: Figment) -> Result<Self, Error> {
        let config: Config = figment.extract()?;
        config.api.validate()?;
        Ok(Self {
            viewer: config.viewer.sanitize(),
            post_processing: config.post_processing.clamp(),
            ..config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            [api]
            base_url = "http://127.0.0.1:5000"
            timeout = 30

            [viewer]
            auto_rotate = false
            environment = "sunset"

            [post_processing]
            grid_size = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.api.predict_path, "/api/predict");
        assert_eq!(config.api.timeout, Some(Duration::from_secs(30)));
        assert!(!config.viewer.auto_rotate);
        assert_eq!(config.viewer.environment, Environment::Sunset);
        assert_eq!(config.viewer.auto_rotate_speed, 1.5);
        assert_eq!(config.post_processing.grid_size, 1);
    }

    #[test]
    fn non_finite_viewer_numbers_fall_back_to_defaults() {
        let config = Config::from_toml_str(
            r#"
            [viewer]
            max_distance = nan
            min_distance = inf
            auto_rotate_speed = -inf
            model_scale = nan
            light_intensity = inf
            "#,
        )
        .unwrap();

        let defaults = Viewer::default();
        assert_eq!(config.viewer.max_distance, defaults.max_distance);
        assert_eq!(config.viewer.min_distance, defaults.min_distance);
        assert_eq!(config.viewer.auto_rotate_speed, defaults.auto_rotate_speed);
        assert_eq!(config.viewer.model_scale, defaults.model_scale);
        assert_eq!(config.viewer.light_intensity, defaults.light_intensity);
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = Config::from_toml_str("[api]\nbase_url = \"localhost\"").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn load_reads_file_and_rejects_missing_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[viewer]\nmodel_scale = 2.0").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.viewer.model_scale, 2.0);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            Config::load(&missing),
            Err(Error::InvalidPath(p)) if p == missing
        ));
    }

    #[test]
    fn toml_output_parses_back() {
        let mut config = Config::default();
        config.api.timeout = Some(Duration::from_secs(5));
        config.viewer.enable_pan = false;
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
