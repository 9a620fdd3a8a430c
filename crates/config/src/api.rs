#![forbid(unsafe_code)]

use crate::Error;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::time::Duration;

/// Where the prediction service lives and how to reach it.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Api {
    /// Scheme, host and port of the prediction service.
    pub base_url: String,

    /// Path of the prediction endpoint (POST).
    pub predict_path: String,

    /// Path of the health probe (GET).
    pub health_path: String,

    /// Path of the model description probe (GET).
    pub model_info_path: String,

    /// Overall request timeout in seconds. Unset means the transport default.
    #[serde_as(as = "Option<serde_with::DurationSeconds>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
            predict_path: "/api/predict".into(),
            health_path: "/api/health".into(),
            model_info_path: "/api/model-info".into(),
            timeout: None,
        }
    }
}

impl Api {
    /// Join `base_url` and an endpoint path without doubling the slash.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    pub fn predict_url(&self) -> String {
        self.url(&self.predict_path)
    }

    pub fn health_url(&self) -> String {
        self.url(&self.health_path)
    }

    pub fn model_info_url(&self) -> String {
        self.url(&self.model_info_path)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        let url = &self.base_url;
        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(Error::InvalidUrl {
                url: url.clone(),
                reason: "missing scheme",
            });
        };
        if scheme != "http" && scheme != "https" {
            return Err(Error::InvalidUrl {
                url: url.clone(),
                reason: "scheme must be http or https",
            });
        }
        if rest.trim_end_matches('/').is_empty() {
            return Err(Error::InvalidUrl {
                url: url.clone(),
                reason: "missing host",
            });
        }
        Ok(())
    }
}
