//! Request-processing server loop
//!
//! `Starting → Ready → ShuttingDown → Stopped`:
//! - **Starting**: output writer and worker pool come up
//! - **Ready**: `{"type":"ready"}` is sent, heartbeats start, and every
//!   non-blank input line is queued for the pool without waiting for it to
//!   finish
//! - **ShuttingDown**: entered on end of input or on the shutdown token;
//!   no more lines are read, heartbeats stop, queued lines are drained
//! - **Stopped**: all responses are written and the output is handed back

pub mod heartbeat;
pub mod output;
pub mod pool;

use crate::config::ServerConfig;
use crate::dispatcher;
use crate::protocol::ServerMessage;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub use output::OutputSink;
pub use pool::{LineHandler, WorkerPool};

/// Lifecycle of a [`Server`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Starting,
    Ready,
    ShuttingDown,
    Stopped,
}

/// Line-delimited JSON key tagging server
pub struct Server {
    config: ServerConfig,
    handler: LineHandler,
    shutdown: CancellationToken,
    state: watch::Sender<ServerState>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_handler(config, Arc::new(dispatcher::handle_line))
    }

    /// Server running `handler` instead of the tag dispatcher
    pub fn with_handler(config: ServerConfig, handler: LineHandler) -> Self {
        let (state, _) = watch::channel(ServerState::Starting);
        Self {
            config,
            handler,
            shutdown: CancellationToken::new(),
            state,
        }
    }

    /// Cancelling this token stops input reading and shuts the server down
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// Serve requests from `input` until it ends or shutdown is requested
    ///
    /// Returns `output` after every response has been written to it.
    pub async fn run<R, W>(&self, input: R, output: W) -> anyhow::Result<W>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        self.set_state(ServerState::Starting);
        info!("Server configuration:");
        info!("  Workers: {}", self.config.workers);
        info!("  Heartbeat interval: {:?}", self.config.heartbeat_interval);

        let (sink, writer) = OutputSink::spawn(output);
        let pool = WorkerPool::start(
            self.config.workers,
            self.config.queue_capacity,
            Arc::clone(&self.handler),
            sink.clone(),
        );

        sink.send(ServerMessage::Ready);
        self.set_state(ServerState::Ready);
        info!("Server ready, waiting for requests...");

        let heartbeat_token = self.shutdown.child_token();
        let heartbeat = heartbeat::spawn(
            self.config.heartbeat_interval,
            sink.clone(),
            heartbeat_token.clone(),
        );

        self.read_requests(input, &pool).await;

        self.set_state(ServerState::ShuttingDown);
        heartbeat_token.cancel();
        if let Err(e) = heartbeat.await {
            error!("Heartbeat task failed: {}", e);
        }
        pool.shutdown().await;
        drop(sink);

        let output = writer.await?;
        self.set_state(ServerState::Stopped);
        info!("Server stopped");
        Ok(output)
    }

    async fn read_requests<R>(&self, input: R, pool: &WorkerPool)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.split(b'\n');
        loop {
            let segment = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("Shutting down...");
                    return;
                }
                segment = lines.next_segment() => segment,
            };

            match segment {
                Ok(Some(raw)) => {
                    let line = raw.trim_ascii();
                    if line.is_empty() {
                        continue;
                    }
                    if !pool.submit(line.to_vec()).await {
                        error!("Worker pool closed; no longer accepting requests");
                        return;
                    }
                }
                Ok(None) => {
                    info!("Input closed, shutting down...");
                    return;
                }
                Err(e) => {
                    error!("Error reading input: {}", e);
                    return;
                }
            }
        }
    }

    fn set_state(&self, state: ServerState) {
        self.state.send_replace(state);
    }
}
