//! OS signals mapped onto engine messages
//!
//! SIGINT and SIGTERM (Ctrl+C on Windows) stop the engine. SIGHUP asks for a
//! config reload, so a running recognizer can pick up edits without `--watch`.

use tokio::sync::mpsc;

use crate::message::Message;
use swipenav_core::prelude::*;

/// Signals the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessSignal {
    Interrupt,
    Terminate,
    Hangup,
}

impl ProcessSignal {
    /// Message posted to the engine for this signal
    pub fn message(self) -> Message {
        match self {
            ProcessSignal::Hangup => Message::ReloadConfig,
            ProcessSignal::Interrupt | ProcessSignal::Terminate => Message::Quit,
        }
    }

    fn ends_run(self) -> bool {
        !matches!(self, ProcessSignal::Hangup)
    }
}

/// Spawn the OS listener and the task forwarding its signals to `tx`
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) {
    let (signal_tx, signal_rx) = mpsc::channel(4);

    tokio::spawn(async move {
        if let Err(e) = listen(signal_tx).await {
            warn!("Signal handling disabled: {}", e);
        }
    });
    tokio::spawn(forward_signals(signal_rx, tx));
}

/// Post one message per signal until a stop signal or a closed queue
async fn forward_signals(mut signals: mpsc::Receiver<ProcessSignal>, tx: mpsc::Sender<Message>) {
    while let Some(signal) = signals.recv().await {
        info!("Received {:?}", signal);
        if tx.send(signal.message()).await.is_err() || signal.ends_run() {
            break;
        }
    }
}

#[cfg(unix)]
async fn listen(out: mpsc::Sender<ProcessSignal>) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| Error::signal(format!("Failed to create SIGINT handler: {}", e)))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| Error::signal(format!("Failed to create SIGTERM handler: {}", e)))?;
    let mut sighup = signal(SignalKind::hangup())
        .map_err(|e| Error::signal(format!("Failed to create SIGHUP handler: {}", e)))?;

    loop {
        let received = tokio::select! {
            _ = sigint.recv() => ProcessSignal::Interrupt,
            _ = sigterm.recv() => ProcessSignal::Terminate,
            _ = sighup.recv() => ProcessSignal::Hangup,
        };
        if out.send(received).await.is_err() {
            return Ok(());
        }
    }
}

#[cfg(windows)]
async fn listen(out: mpsc::Sender<ProcessSignal>) -> Result<()> {
    loop {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| Error::signal(format!("Failed to listen for Ctrl+C: {}", e)))?;
        if out.send(ProcessSignal::Interrupt).await.is_err() {
            return Ok(());
        }
    }
}
