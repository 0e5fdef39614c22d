//! Single-writer output sink
//!
//! Workers and the heartbeat task never touch the output stream directly.
//! They hand messages to an [`OutputSink`]; one writer task serializes them
//! and writes whole lines, so lines from concurrent producers cannot
//! interleave.

use crate::protocol::ServerMessage;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::error;

/// Cloneable handle for queueing protocol messages
#[derive(Clone)]
pub struct OutputSink {
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl OutputSink {
    /// Start the writer task; it returns `output` once every sink is dropped
    pub fn spawn<W>(output: W) -> (Self, JoinHandle<W>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(write_messages(output, rx));
        (Self { tx }, handle)
    }

    pub fn send(&self, message: ServerMessage) {
        if self.tx.send(message).is_err() {
            error!("Output writer has stopped; message dropped");
        }
    }
}

async fn write_messages<W>(mut output: W, mut rx: mpsc::UnboundedReceiver<ServerMessage>) -> W
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let mut line = match message.to_line() {
            Ok(line) => line,
            Err(e) => {
                error!("Error sending message: {}", e);
                continue;
            }
        };
        line.push('\n');

        if let Err(e) = output.write_all(line.as_bytes()).await {
            error!("Error sending message: {}", e);
            continue;
        }
        if let Err(e) = output.flush().await {
            error!("Error flushing output: {}", e);
        }
    }
    output
}
