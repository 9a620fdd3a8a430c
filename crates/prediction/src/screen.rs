#![forbid(unsafe_code)]

use crate::client::PredictionClient;
use crate::form::{Field, FieldErrors, FormInput, validate};
use crate::metrics::PredictionMetrics;
use crate::notify::{Notifier, TRANSPORT_FAILURE};
use crate::wire::{MalformedReason, PredictionRequest, Reply, interpret};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct ScreenInner {
    input: FormInput,
    errors: FieldErrors,
    result: Option<PredictionMetrics>,
    requests_sent: u64,
}

impl ScreenInner {
    fn edit(&mut self, field: Field, value: String) {
        self.input.set(field, value);
        if self.errors.clear(field).is_some() {
            debug!(?field, "cleared field error on edit");
        }
    }

    fn validate(&mut self) -> bool {
        self.errors = validate(&self.input);
        self.errors.is_empty()
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The displayed result was replaced.
    Updated(PredictionMetrics),
    /// The service answered non-2xx; the alert text is attached.
    Rejected(String),
    /// The service answered 2xx without a usable prediction.
    Malformed(MalformedReason),
    /// No answer at all, or a 2xx body that is not JSON.
    TransportFailed,
}

/// State of the prediction form: inputs, field errors and the last result.
///
/// Clones share the same state, so overlapping submissions race on the
/// result and the last reply to arrive wins.
#[derive(Clone)]
pub struct PredictionScreen {
    inner: Arc<Mutex<ScreenInner>>,
    client: Arc<dyn PredictionClient>,
    notifier: Arc<dyn Notifier>,
}

impl PredictionScreen {
    pub fn new(client: Arc<dyn PredictionClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::default(),
            client,
            notifier,
        }
    }

    /// Store a new value for `field` and drop its error, if any.
    pub fn edit(&self, field: Field, value: impl Into<String>) {
        self.inner.lock().edit(field, value.into());
    }

    /// Re-check every field, replacing the displayed errors.
    pub fn validate(&self) -> bool {
        self.inner.lock().validate()
    }

    pub fn input(&self) -> FormInput {
        self.inner.lock().input.clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.inner.lock().errors.clone()
    }

    pub fn result(&self) -> Option<PredictionMetrics> {
        self.inner.lock().result
    }

    pub fn requests_sent(&self) -> u64 {
        self.inner.lock().requests_sent
    }

    /// Validate, send one request and apply the reply.
    pub async fn submit(&self) -> SubmitOutcome {
        let request = {
            let mut inner = self.inner.lock();
            if !inner.validate() {
                debug!(errors = inner.errors.len(), "form invalid, not submitting");
                return SubmitOutcome::Invalid(inner.errors.clone());
            }
            inner.requests_sent += 1;
            PredictionRequest::from_form(&inner.input)
        };

        let reply = match self.client.predict(&request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(%err, "prediction request failed");
                self.notifier.notify(TRANSPORT_FAILURE);
                return SubmitOutcome::TransportFailed;
            }
        };

        match interpret(&reply) {
            Reply::Prediction { metrics, unit } => {
                info!(range = metrics.range, ?unit, "prediction received");
                self.inner.lock().result = Some(metrics);
                SubmitOutcome::Updated(metrics)
            }
            Reply::Rejected(message) => {
                warn!(status = reply.status, %message, "prediction rejected");
                self.notifier.notify(&format!("Error: {message}"));
                SubmitOutcome::Rejected(message)
            }
            Reply::Unreadable => {
                warn!(status = reply.status, body = %reply.body, "prediction reply is not JSON");
                self.notifier.notify(TRANSPORT_FAILURE);
                SubmitOutcome::TransportFailed
            }
            Reply::Malformed(reason) => {
                warn!(status = reply.status, ?reason, body = %reply.body, "ignoring malformed prediction reply");
                SubmitOutcome::Malformed(reason)
            }
        }
    }
}
