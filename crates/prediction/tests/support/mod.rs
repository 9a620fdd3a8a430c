#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use prediction::wire::{HealthStatus, HttpReply, ModelInfo, PredictionRequest};
use prediction::{Error, Field, Notifier, PredictionClient};
use std::collections::VecDeque;
use std::time::Duration;

pub enum Scripted {
    Reply(HttpReply),
    TransportError,
}

/// Client that answers from a script, in call order, after an optional delay.
#[derive(Default)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<(Duration, Scripted)>>,
    pub requests: Mutex<Vec<serde_json::Value>>,
}

impl ScriptedClient {
    pub fn reply(self, status: u16, body: &str) -> Self {
        self.delayed_reply(Duration::ZERO, status, body)
    }

    pub fn delayed_reply(self, delay: Duration, status: u16, body: &str) -> Self {
        self.script
            .lock()
            .push_back((delay, Scripted::Reply(HttpReply::new(status, body))));
        self
    }

    pub fn transport_error(self) -> Self {
        self.script
            .lock()
            .push_back((Duration::ZERO, Scripted::TransportError));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl PredictionClient for ScriptedClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<HttpReply, Error> {
        self.requests
            .lock()
            .push(serde_json::to_value(request).unwrap());
        let (delay, step) = self
            .script
            .lock()
            .pop_front()
            .expect("unscripted prediction request");
        tokio::time::sleep(delay).await;
        match step {
            Scripted::Reply(reply) => Ok(reply),
            Scripted::TransportError => Err(Error::Service {
                status: 0,
                message: "connection refused".into(),
            }),
        }
    }

    async fn health(&self) -> Result<HealthStatus, Error> {
        unimplemented!("not scripted")
    }

    async fn model_info(&self) -> Result<ModelInfo, Error> {
        unimplemented!("not scripted")
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().push(message.to_owned());
    }
}

pub fn filled_form() -> [(Field, &'static str); 8] {
    [
        (Field::County, "King"),
        (Field::City, "Seattle"),
        (Field::ModelYear, "2024"),
        (Field::Make, "TESLA"),
        (Field::Model, "MODEL 3"),
        (Field::EvType, "Battery Electric Vehicle (BEV)"),
        (Field::CafvEligibility, "Clean Alternative Fuel Vehicle Eligible"),
        (Field::ElectricUtility, "CITY OF SEATTLE - (WA)"),
    ]
}

pub fn success_body(range: f64) -> String {
    format!(r#"{{"success":true,"prediction":{{"electricRange":{range},"unit":"miles"}}}}"#)
}
