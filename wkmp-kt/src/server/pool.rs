//! Fixed-size worker pool
//!
//! Input lines go into a bounded queue; `size` worker tasks pull from it and
//! run the line handler on the blocking thread pool. Each worker writes its
//! own response, so completion order is independent of submission order.

use super::output::OutputSink;
use crate::protocol::ServerMessage;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Turns one raw input line into at most one response (blocking)
pub type LineHandler = Arc<dyn Fn(&[u8]) -> Option<ServerMessage> + Send + Sync>;

pub struct WorkerPool {
    queue: mpsc::Sender<Vec<u8>>,
    workers: JoinSet<()>,
}

impl WorkerPool {
    pub fn start(size: usize, capacity: usize, handler: LineHandler, sink: OutputSink) -> Self {
        let (queue, rx) = mpsc::channel::<Vec<u8>>(capacity);
        let rx = Arc::new(Mutex::new(rx));

        let mut workers = JoinSet::new();
        for worker_id in 0..size {
            workers.spawn(run_worker(
                worker_id,
                Arc::clone(&rx),
                Arc::clone(&handler),
                sink.clone(),
            ));
        }

        Self { queue, workers }
    }

    /// Queue one line; waits only while the queue is full
    ///
    /// Returns `false` if no worker is left to take it.
    pub async fn submit(&self, line: Vec<u8>) -> bool {
        self.queue.send(line).await.is_ok()
    }

    /// Close the queue and wait until every queued line has been handled
    pub async fn shutdown(self) {
        let WorkerPool { queue, mut workers } = self;
        drop(queue);
        while let Some(result) = workers.join_next().await {
            if let Err(e) = result {
                error!("Worker task failed: {}", e);
            }
        }
    }
}

async fn run_worker(
    worker_id: usize,
    queue: Arc<Mutex<mpsc::Receiver<Vec<u8>>>>,
    handler: LineHandler,
    sink: OutputSink,
) {
    loop {
        let next = { queue.lock().await.recv().await };
        let Some(line) = next else {
            break;
        };

        let handler = Arc::clone(&handler);
        match tokio::task::spawn_blocking(move || handler(&line)).await {
            Ok(Some(message)) => sink.send(message),
            Ok(None) => {}
            Err(e) => error!(worker_id, "Error handling request: {}", e),
        }
    }
    debug!(worker_id, "Worker stopped");
}
