//! Periodic liveness messages

use super::output::OutputSink;
use crate::protocol::ServerMessage;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Emit a heartbeat every `interval` until `token` is cancelled
///
/// The first heartbeat follows one full interval after start.
pub fn spawn(interval: Duration, sink: OutputSink, token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {
                    if token.is_cancelled() {
                        break;
                    }
                    debug!("Sending heartbeat");
                    sink.send(ServerMessage::Heartbeat);
                }
            }
        }
    })
}
