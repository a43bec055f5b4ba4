//! Background writer for match records

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::game::MatchRecord;

use super::{MatchStore, StoreError};

/// Pending records before `submit` starts refusing
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Handle for queueing records to a store off the frame loop.
///
/// The task drains the queue until every handle is dropped.
#[derive(Debug, Clone)]
pub struct RecordWriter {
    tx: mpsc::Sender<MatchRecord>,
}

impl RecordWriter {
    /// Spawn the writer task on the current runtime
    pub fn spawn(store: Arc<dyn MatchStore>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run(store, rx));
        (Self { tx }, handle)
    }

    /// Queue a record without waiting
    pub fn submit(&self, record: MatchRecord) -> Result<(), StoreError> {
        self.tx.try_send(record).map_err(|e| match e {
            mpsc::error::TrySendError::Full(record) => {
                warn!(match_id = %record.match_id, "Record queue full, dropping match record");
                StoreError::QueueFull
            }
            mpsc::error::TrySendError::Closed(_) => StoreError::WriterClosed,
        })
    }
}

async fn run(store: Arc<dyn MatchStore>, mut rx: mpsc::Receiver<MatchRecord>) {
    while let Some(record) = rx.recv().await {
        let match_id = record.match_id;
        let store = store.clone();
        match tokio::task::spawn_blocking(move || store.save_match(&record)).await {
            Ok(Ok(())) => info!(match_id = %match_id, "Match record saved"),
            Ok(Err(e)) => warn!(match_id = %match_id, error = %e, "Failed to save match record"),
            Err(e) => error!(match_id = %match_id, error = %e, "Record save task failed"),
        }
    }
    info!("Record writer stopped");
}
