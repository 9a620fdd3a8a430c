#![forbid(unsafe_code)]

use tracing::error;

/// Fixed message for a request that never got an answer.
pub const TRANSPORT_FAILURE: &str =
    "Failed to get prediction. Make sure the prediction API is running.";

/// Blocking, user-facing alert.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Sends alerts to the log only.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        error!(message, "prediction alert");
    }
}
