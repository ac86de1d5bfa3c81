//! Background recompute worker.
//!
//! Receives record snapshots over an mpsc channel, runs the pure recompute on the blocking
//! pool and answers each request on its own oneshot channel. The worker holds no state between
//! jobs; every job carries the full record set it is computed from.

use chrono::NaiveDate;
use log::{debug, error};
use tokio::sync::{mpsc, oneshot};

use super::derived_state_model::FullDerivedState;
use super::recompute_service::recompute;
use crate::errors::{CalculatorError, Result};
use crate::records::RecordSet;

const DEFAULT_QUEUE_CAPACITY: usize = 32;

struct RecomputeJob {
    records: RecordSet,
    today: NaiveDate,
    reply: oneshot::Sender<Result<FullDerivedState>>,
}

/// Cloneable handle to a running recompute worker.
#[derive(Debug, Clone)]
pub struct RecomputeWorker {
    tx: mpsc::Sender<RecomputeJob>,
}

impl RecomputeWorker {
    /// Spawns the worker on the current tokio runtime.
    pub fn spawn() -> Self {
        Self::spawn_with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn spawn_with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        tokio::spawn(run_worker(rx));
        RecomputeWorker { tx }
    }

    pub async fn submit(&self, records: RecordSet, today: NaiveDate) -> Result<FullDerivedState> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(RecomputeJob {
                records,
                today,
                reply,
            })
            .await
            .map_err(|_| CalculatorError::WorkerUnavailable)?;
        response
            .await
            .map_err(|_| CalculatorError::WorkerUnavailable)?
    }
}

async fn run_worker(mut rx: mpsc::Receiver<RecomputeJob>) {
    debug!("Recompute worker started");
    while let Some(job) = rx.recv().await {
        let RecomputeJob {
            records,
            today,
            reply,
        } = job;
        let result = match tokio::task::spawn_blocking(move || recompute(&records, today)).await {
            Ok(result) => result,
            Err(e) => {
                error!("Recompute task panicked or was cancelled: {}", e);
                Err(CalculatorError::Calculation(format!("recompute task failed: {}", e)).into())
            }
        };
        if reply.send(result).is_err() {
            debug!("Recompute requester went away before the result was ready");
        }
    }
    debug!("Recompute worker stopped");
}
