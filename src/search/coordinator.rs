use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, anyhow};
use crossbeam::channel::{Receiver, bounded, unbounded};
use tracing::{debug, info, warn};

use super::pool::{ProgressFn, WorkerContext};
use super::types::{
    ResultSlot, SearchConfig, SearchOutcome, SearchReport, WorkerEvent, WorkerExit,
};
use crate::archive::{ArchiveError, TargetOpener};
use crate::keyspace::{CandidateGenerator, GeneratorExit, Keyspace};
use crate::parallel::{CancellationToken, SearchStats};

/// One brute-force run over a keyspace against a target archive
///
/// ```rust,no_run
/// use zipsweep::archive::ZipOpener;
/// use zipsweep::keyspace::Keyspace;
/// use zipsweep::search::{Search, SearchConfig};
///
/// let keyspace = Keyspace::new("abcdefghijklmnopqrstuvwxyz0123456789", 6)?;
/// let opener = ZipOpener::new("emergency_storage_key.zip", None);
/// let report = Search::new(opener, keyspace, SearchConfig::default()).run()?;
/// println!("{}: {:?}", report.outcome.label(), report.outcome.password());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct Search<O> {
    opener: O,
    keyspace: Keyspace,
    config: SearchConfig,
    cancel: CancellationToken,
    progress: Option<Arc<ProgressFn>>,
}

impl<O: TargetOpener> Search<O> {
    pub fn new(opener: O, keyspace: Keyspace, config: SearchConfig) -> Self {
        Self {
            opener,
            keyspace,
            config,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    /// Use an externally owned token, e.g. one raised by a signal handler
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Called after every batch with `(tested so far, keyspace size)`
    pub fn with_progress<P>(mut self, progress: P) -> Self
    where
        P: Fn(u64, u64) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(progress));
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run generator and verifier pool to a terminal state
    ///
    /// Blocks until every participant has been joined. The only error is a
    /// panicked thread; archive faults are reported as
    /// [`SearchOutcome::Faulted`].
    pub fn run(&self) -> Result<SearchReport> {
        let start = Instant::now();
        let workers = self.config.workers.max(1);
        let generator = CandidateGenerator::new(self.keyspace.clone(), self.config.batch_size);

        let (batch_tx, batch_rx) = bounded(self.config.queue_capacity());
        let (event_tx, event_rx) = unbounded();
        let slot = ResultSlot::new();
        let stats = SearchStats::new();

        info!(
            "Searching {} candidates with {} workers (batch size {})",
            self.keyspace.size(),
            workers,
            generator.batch_size()
        );

        let (generator_exit, worker_exits, faults) =
            crossbeam::thread::scope(|s| -> Result<_> {
                let cancel = &self.cancel;
                let generator = &generator;
                let producer = s.spawn(move |_| generator.run(batch_tx, cancel));

                let mut handles = Vec::with_capacity(workers);
                for worker_id in 0..workers {
                    let ctx = WorkerContext {
                        worker_id,
                        opener: &self.opener,
                        batches: batch_rx.clone(),
                        events: event_tx.clone(),
                        cancel: self.cancel.clone(),
                        slot: &slot,
                        stats: &stats,
                        progress: self.progress.as_deref(),
                        keyspace_size: self.keyspace.size(),
                    };
                    handles.push(s.spawn(move |_| ctx.run()));
                }

                // Only workers hold these now: the queue closes when the
                // generator returns, the event channel when the last worker does
                drop(batch_rx);
                drop(event_tx);

                let faults = self.await_events(&event_rx);

                let generator_exit = producer
                    .join()
                    .map_err(|_| anyhow!("Generator thread panicked"))?;
                let worker_exits = handles
                    .into_iter()
                    .map(|handle| handle.join().map_err(|_| anyhow!("Worker thread panicked")))
                    .collect::<Result<Vec<WorkerExit>>>()?;

                Ok((generator_exit, worker_exits, faults))
            })
            .map_err(|_| anyhow!("Thread panic occurred during search"))??;

        let outcome = Self::resolve(start, slot, faults, generator_exit, &worker_exits);
        let report = SearchReport {
            outcome,
            attempts: stats.attempts(),
            batches: stats.batches(),
            elapsed: start.elapsed(),
            workers,
            batch_size: generator.batch_size(),
            keyspace_size: self.keyspace.size(),
        };

        info!(
            "Search {} after {} attempts in {:.2}s",
            report.outcome.label(),
            report.attempts,
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }

    /// Block on worker events until every worker has hung up
    ///
    /// A find or a fault raises the token so the generator and the remaining
    /// workers wind down; an external cancel closes the channel the same way.
    fn await_events(&self, events: &Receiver<WorkerEvent>) -> Vec<(usize, ArchiveError)> {
        let mut faults = Vec::new();

        while let Ok(event) = events.recv() {
            match event {
                WorkerEvent::Found { worker_id } => {
                    debug!("Worker {} reported a find; cancelling the run", worker_id);
                    self.cancel.cancel();
                }
                WorkerEvent::Fault { worker_id, error } => {
                    warn!("Worker {} faulted: {}", worker_id, error);
                    self.cancel.cancel();
                    faults.push((worker_id, error));
                }
            }
        }

        faults
    }

    fn resolve(
        start: Instant,
        slot: ResultSlot,
        faults: Vec<(usize, ArchiveError)>,
        generator_exit: GeneratorExit,
        worker_exits: &[WorkerExit],
    ) -> SearchOutcome {
        if let Some(discovery) = slot.into_inner() {
            return SearchOutcome::Found {
                elapsed: discovery.found_at.saturating_duration_since(start),
                password: discovery.password,
                index: discovery.index,
                worker_id: discovery.worker_id,
            };
        }

        if let Some((worker_id, error)) = faults.into_iter().next() {
            return SearchOutcome::Faulted { worker_id, error };
        }

        let fully_drained = worker_exits.iter().all(|exit| *exit == WorkerExit::Drained);
        if generator_exit == GeneratorExit::Exhausted && fully_drained {
            SearchOutcome::Exhausted
        } else {
            SearchOutcome::Interrupted
        }
    }
}
