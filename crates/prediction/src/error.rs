#![forbid(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prediction service answered {status}: {message}")]
    Service { status: u16, message: String },

    #[error("request task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
