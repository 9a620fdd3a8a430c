#![forbid(unsafe_code)]

use crate::error::Error;
use flume::Sender;
use tokio::task::JoinError;
use tokio::signal::unix::{SignalKind, signal};
use tracing::warn;
use viewer::ViewerCommand;

/// Indefinitely listens to signals and sends signal events to the provided channel.
pub async fn wait_for_signal(signal_event: &Sender<SignalEvent>) -> Result<(), Error> {
    let mut sigusr1 = signal(SignalKind::user_defined1()).map_err(Error::SignalHandler)?;
    let mut sigusr2 = signal(SignalKind::user_defined2()).map_err(Error::SignalHandler)?;

    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res.map_err(Error::SignalHandler)?;
                signal_event.send_async(SignalEvent::Interrupt).await?;
            }
            _ = sigusr1.recv() => {
                signal_event.send_async(SignalEvent::SigUSR1).await?;
            }
            _ = sigusr2.recv() => {
                signal_event.send_async(SignalEvent::SigUSR2).await?;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    Interrupt,
    SigUSR1,
    SigUSR2,
}

impl SignalEvent {
    /// Viewer command bound to this signal. `Interrupt` stops the viewer instead.
    pub fn command(self) -> Option<ViewerCommand> {
        match self {
            SignalEvent::Interrupt => None,
            SignalEvent::SigUSR1 => Some(ViewerCommand::ToggleAutoRotate),
            SignalEvent::SigUSR2 => Some(ViewerCommand::DumpState),
        }
    }
}

/// Log a helper task that panicked or was cancelled. Returns whether it finished cleanly.
pub fn report_task(task: &str, result: Result<(), JoinError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(task, %err, "helper task failed");
            false
        }
    }
}
