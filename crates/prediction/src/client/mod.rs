#![forbid(unsafe_code)]

mod http;

pub use http::HttpClient;

use crate::error::Error;
use crate::wire::{HealthStatus, HttpReply, ModelInfo, PredictionRequest};
use async_trait::async_trait;

#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Send one prediction request. Any HTTP status is a successful reply;
    /// only transport failures are errors.
    async fn predict(&self, request: &PredictionRequest) -> Result<HttpReply, Error>;

    /// Probe the service's health endpoint.
    async fn health(&self) -> Result<HealthStatus, Error>;

    /// Describe the model behind the service.
    async fn model_info(&self) -> Result<ModelInfo, Error>;
}
