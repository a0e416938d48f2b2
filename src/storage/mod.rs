//! Storage worker.
//!
//! All persistence runs inside one dedicated task that owns the storage
//! engine; the front end reaches it exclusively through the message
//! protocol over a pair of ordered channels. The worker answers every
//! request with exactly one response and never dies on an operation
//! fault.

pub mod engine;
pub mod protocol;

pub use engine::{EngineError, StorageEngine};
pub use protocol::{StorageRequest, StorageResponse};

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Notify;

/// Front-end handle to the storage worker.
#[derive(Clone)]
pub struct StorageHandle {
    requests: UnboundedSender<StorageRequest>,
    version_change: Arc<Notify>,
}

impl StorageHandle {
    /// Queues a request for the worker. Delivery is ordered; the
    /// matching response arrives on the response channel.
    pub fn send(&self, request: StorageRequest) {
        if self.requests.send(request).is_err() {
            tracing::warn!("Storage worker is gone; request dropped");
        }
    }

    /// Signals that another execution context invalidated the open
    /// record store. The worker closes its connection and reopens on
    /// the next operation.
    pub fn notify_version_change(&self) {
        self.version_change.notify_one();
    }
}

/// Spawns the storage worker and returns its handle plus the response
/// channel.
pub fn spawn(
    db_path: PathBuf,
    data_dir: PathBuf,
) -> (StorageHandle, UnboundedReceiver<StorageResponse>) {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (response_tx, response_rx) = mpsc::unbounded_channel();
    let version_change = Arc::new(Notify::new());

    let engine = StorageEngine::new(db_path, data_dir);
    tokio::spawn(run(engine, request_rx, response_tx, version_change.clone()));

    let handle = StorageHandle {
        requests: request_tx,
        version_change,
    };
    (handle, response_rx)
}

async fn run(
    engine: StorageEngine,
    mut requests: UnboundedReceiver<StorageRequest>,
    responses: UnboundedSender<StorageResponse>,
    version_change: Arc<Notify>,
) {
    loop {
        tokio::select! {
            // Invalidation takes priority over queued requests.
            biased;
            _ = version_change.notified() => {
                tracing::info!("Record store invalidated; connection will reopen");
                engine.invalidate().await;
            }
            request = requests.recv() => {
                let Some(request) = request else { break };
                let response = handle_request(&engine, request).await;
                if responses.send(response).is_err() {
                    break;
                }
            }
        }
    }
}

async fn handle_request(engine: &StorageEngine, request: StorageRequest) -> StorageResponse {
    match request {
        StorageRequest::SaveMeal { entry } => match engine.save(&entry).await {
            Ok(()) => StorageResponse::SaveSuccess { entry },
            Err(e) => {
                tracing::error!("Save failed: {}", e);
                StorageResponse::SaveError {
                    error: e.to_string(),
                }
            }
        },
        StorageRequest::LoadMeals { date } => match engine.load_by_date(date).await {
            Ok(entries) => StorageResponse::LoadSuccess { entries },
            Err(e) => {
                tracing::error!("Load for {} failed: {}", date, e);
                StorageResponse::LoadError {
                    error: e.to_string(),
                }
            }
        },
        StorageRequest::DeleteAllData => match engine.delete_all().await {
            Ok(()) => StorageResponse::DeleteAllDataSuccess,
            Err(e) => {
                tracing::error!("Delete all failed: {}", e);
                StorageResponse::DeleteAllDataError {
                    error: e.to_string(),
                }
            }
        },
    }
}
