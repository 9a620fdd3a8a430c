#![forbid(unsafe_code)]

use crate::client::PredictionClient;
use crate::error::Error;
use crate::wire::{self, HealthStatus, HttpReply, ModelInfo, PredictionRequest};
use async_trait::async_trait;
use config::Api;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use ureq::Agent;

/// Blocking `ureq` agent driven from tokio's blocking pool.
#[derive(Clone)]
pub struct HttpClient {
    agent: Agent,
    api: Api,
}

impl HttpClient {
    pub fn new(api: &Api) -> Self {
        let agent: Agent = Agent::config_builder()
            // non-2xx replies carry the service's error message
            .http_status_as_error(false)
            .timeout_global(api.timeout)
            .build()
            .into();
        Self {
            agent,
            api: api.clone(),
        }
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    async fn get(&self, url: String) -> Result<HttpReply, Error> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || {
            let mut response = agent.get(&url).call()?;
            let status = response.status().as_u16();
            let body = response.body_mut().read_to_string()?;
            trace!(%url, status, "GET finished");
            Ok::<_, Error>(HttpReply { status, body })
        })
        .await?
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, Error> {
        let reply = self.get(url).await?;
        if !reply.is_success() {
            return Err(Error::Service {
                status: reply.status,
                message: wire::error_message(&reply.body)
                    .unwrap_or_else(|| wire::DEFAULT_REJECTION.to_owned()),
            });
        }
        Ok(serde_json::from_str(&reply.body)?)
    }
}

#[async_trait]
impl PredictionClient for HttpClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<HttpReply, Error> {
        let body = serde_json::to_string(request)?;
        let url = self.api.predict_url();
        let agent = self.agent.clone();
        debug!(%url, "sending prediction request");

        tokio::task::spawn_blocking(move || {
            let mut response = agent
                .post(&url)
                .header("Content-Type", "application/json")
                .send(body)?;
            let status = response.status().as_u16();
            let body = response.body_mut().read_to_string()?;
            trace!(%url, status, "POST finished");
            Ok::<_, Error>(HttpReply { status, body })
        })
        .await?
    }

    async fn health(&self) -> Result<HealthStatus, Error> {
        self.get_json(self.api.health_url()).await
    }

    async fn model_info(&self) -> Result<ModelInfo, Error> {
        self.get_json(self.api.model_info_url()).await
    }
}
