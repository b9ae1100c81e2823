use crate::simulation::error::{SimulationError, SimulationResult};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::warn;

/// Bounded pool running CPU-bound jobs on the blocking thread pool.
///
/// Results travel back over a channel and are returned in submission
/// order. The first failing job fails the whole batch.
#[derive(Debug, Clone)]
pub struct TrialPool {
    workers: usize,
}

impl TrialPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn run<T, F>(&self, jobs: Vec<F>) -> SimulationResult<Vec<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> SimulationResult<T> + Send + 'static,
    {
        let total = jobs.len();
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel();
        let mut pending = jobs.into_iter().enumerate();
        let mut next = pending.next();
        let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
        let mut received = 0;

        // Results are drained while submitting so a failure stops the batch
        // before the remaining jobs are started
        while received < total {
            tokio::select! {
                permit = Arc::clone(&semaphore).acquire_owned(), if next.is_some() => {
                    let permit = permit.map_err(|e| SimulationError::WorkerFailed(e.to_string()))?;
                    if let Some((index, job)) = next.take() {
                        let result_tx = result_tx.clone();
                        tokio::spawn(async move {
                            let result = match tokio::task::spawn_blocking(job).await {
                                Ok(result) => result,
                                Err(e) => Err(SimulationError::WorkerFailed(e.to_string())),
                            };
                            drop(permit);
                            // Receiver is gone once the batch already failed
                            let _ = result_tx.send((index, result));
                        });
                    }
                    next = pending.next();
                }
                Some((index, result)) = result_rx.recv() => {
                    received += 1;
                    match result {
                        Ok(value) => slots[index] = Some(value),
                        Err(e) => {
                            warn!("Trial {} failed, aborting batch: {}", index, e);
                            return Err(e);
                        }
                    }
                }
                else => break,
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    SimulationError::WorkerFailed(format!("trial {index} produced no result"))
                })
            })
            .collect()
    }
}
