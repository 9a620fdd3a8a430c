#![forbid(unsafe_code)]

use crate::signals::SignalEvent;
use flume::SendError;
use std::io;
use thiserror::Error;

/// Failures of the signal plumbing around the viewer loop.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to install signal handler: {0}")]
    SignalHandler(#[source] io::Error),

    #[error("failed to forward signal event: {0}")]
    SendSignal(#[from] SendError<SignalEvent>),

    #[error("viewer stopped before handling {0:?}")]
    ViewerGone(SignalEvent),
}
