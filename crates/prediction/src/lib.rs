#![forbid(unsafe_code)]

//! Prediction form: field validation, the request/response mapping of the
//! EV range service and the screen state that ties them together.

pub mod client;
mod error;
pub mod form;
pub mod metrics;
pub mod notify;
pub mod screen;
pub mod wire;

pub use client::{HttpClient, PredictionClient};
pub use error::Error;
pub use form::{Field, FieldErrors, FormInput};
pub use metrics::PredictionMetrics;
pub use notify::{LogNotifier, Notifier};
pub use screen::{PredictionScreen, SubmitOutcome};
