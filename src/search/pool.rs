use std::time::Instant;

use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, warn};

use super::types::{Discovery, ResultSlot, WorkerEvent, WorkerExit};
use crate::archive::{PasswordTarget, TargetOpener};
use crate::keyspace::Batch;
use crate::parallel::{CancellationToken, SearchStats};

/// Progress callback: `(candidates tested so far, keyspace size)`
pub type ProgressFn = dyn Fn(u64, u64) + Send + Sync;

/// Context for worker threads to avoid too many function parameters
pub(crate) struct WorkerContext<'a, O> {
    pub worker_id: usize,
    pub opener: &'a O,
    pub batches: Receiver<Batch>,
    pub events: Sender<WorkerEvent>,
    pub cancel: CancellationToken,
    pub slot: &'a ResultSlot,
    pub stats: &'a SearchStats,
    pub progress: Option<&'a ProgressFn>,
    pub keyspace_size: u64,
}

impl<O: TargetOpener> WorkerContext<'_, O> {
    /// Pull batches until the queue closes, the token is raised, this worker
    /// wins, or its archive handle faults.
    ///
    /// The handle is opened here and dropped on return, so it never outlives
    /// the worker.
    pub fn run(self) -> WorkerExit {
        let mut target = match self.opener.open() {
            Ok(target) => target,
            Err(error) => {
                warn!("Worker {} could not open target: {}", self.worker_id, error);
                self.report_fault(error);
                return WorkerExit::Faulted;
            }
        };
        debug!("Worker {} started", self.worker_id);

        loop {
            if self.cancel.is_cancelled() {
                debug!("Worker {} stopping: cancelled", self.worker_id);
                return WorkerExit::Cancelled;
            }

            let batch = match self.batches.recv() {
                Ok(batch) => batch,
                Err(_) => {
                    debug!("Worker {} stopping: queue closed", self.worker_id);
                    return WorkerExit::Drained;
                }
            };

            if let Some(exit) = self.verify_batch(&mut target, &batch) {
                return exit;
            }
        }
    }

    /// Test every candidate in `batch`; `None` means keep pulling
    fn verify_batch(&self, target: &mut O::Target, batch: &Batch) -> Option<WorkerExit> {
        let mut tested: u64 = 0;
        let mut exit = None;

        for (index, candidate) in batch.indexed() {
            if self.cancel.is_cancelled() {
                exit = Some(WorkerExit::Cancelled);
                break;
            }

            tested += 1;
            match target.attempt(candidate) {
                Ok(false) => continue,
                Ok(true) => {
                    exit = Some(self.claim(candidate, index));
                    break;
                }
                Err(error) => {
                    warn!(
                        "Worker {} hit an archive fault at index {}: {}",
                        self.worker_id, index, error
                    );
                    self.report_fault(error);
                    exit = Some(WorkerExit::Faulted);
                    break;
                }
            }
        }

        let total = self.stats.record_batch(tested);
        if let Some(progress) = self.progress {
            progress(total, self.keyspace_size);
        }
        exit
    }

    fn claim(&self, candidate: &str, index: u64) -> WorkerExit {
        let discovery = Discovery {
            password: candidate.to_string(),
            index,
            worker_id: self.worker_id,
            found_at: Instant::now(),
        };

        if !self.slot.claim(discovery) {
            debug!(
                "Worker {} matched '{}' but another worker already won",
                self.worker_id, candidate
            );
            return WorkerExit::Cancelled;
        }

        self.cancel.cancel();
        debug!("Worker {} found the password at index {}", self.worker_id, index);
        let _ = self.events.send(WorkerEvent::Found {
            worker_id: self.worker_id,
        });
        WorkerExit::Found
    }

    fn report_fault(&self, error: crate::archive::ArchiveError) {
        let _ = self.events.send(WorkerEvent::Fault {
            worker_id: self.worker_id,
            error,
        });
    }
}
