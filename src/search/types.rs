use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::archive::ArchiveError;

/// Runtime settings for one search run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Candidates per batch
    pub batch_size: usize,
    /// Worker threads in the verifier pool
    pub workers: usize,
    /// Batch queue capacity = workers * queue_multiplier
    pub queue_multiplier: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            batch_size: 100_000,
            workers: crate::parallel::calculate_optimal_workers(0, 100),
            queue_multiplier: 2,
        }
    }
}

impl SearchConfig {
    pub fn queue_capacity(&self) -> usize {
        (self.workers.max(1) * self.queue_multiplier).max(1)
    }
}

/// A candidate that decrypted the target, as claimed by the winning worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub password: String,
    pub index: u64,
    pub worker_id: usize,
    pub found_at: Instant,
}

/// Single-assignment cell for the run's result
///
/// The first claim wins; every later claim is a silent no-op, so at most one
/// [`Discovery`] is ever observable even if two workers succeed at once.
#[derive(Debug, Default)]
pub struct ResultSlot {
    cell: OnceLock<Discovery>,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this call stored `discovery`
    pub fn claim(&self, discovery: Discovery) -> bool {
        self.cell.set(discovery).is_ok()
    }

    pub fn into_inner(self) -> Option<Discovery> {
        self.cell.into_inner()
    }
}

/// Messages from workers to the coordinator
#[derive(Debug)]
pub(crate) enum WorkerEvent {
    /// This worker's claim on the result slot succeeded
    Found { worker_id: usize },
    /// The worker's archive handle failed; the worker has exited
    Fault {
        worker_id: usize,
        error: ArchiveError,
    },
}

/// How a worker's pull loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerExit {
    /// Queue closed and every received batch was fully tested
    Drained,
    /// Stopped early on the cancellation token or lost a result race
    Cancelled,
    /// Won the result slot
    Found,
    /// Archive fault
    Faulted,
}

/// Terminal state of a search run
#[derive(Debug)]
pub enum SearchOutcome {
    /// A candidate decrypted the target
    Found {
        password: String,
        index: u64,
        worker_id: usize,
        /// Time from run start to the winning claim
        elapsed: Duration,
    },
    /// The whole keyspace was tested without a match
    Exhausted,
    /// Stopped by an external cancellation before a determination
    Interrupted,
    /// The archive could not be opened or read
    Faulted {
        worker_id: usize,
        error: ArchiveError,
    },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn password(&self) -> Option<&str> {
        match self {
            SearchOutcome::Found { password, .. } => Some(password),
            _ => None,
        }
    }

    /// Short state label: found, exhausted, interrupted or faulted
    pub fn label(&self) -> &'static str {
        match self {
            SearchOutcome::Found { .. } => "found",
            SearchOutcome::Exhausted => "exhausted",
            SearchOutcome::Interrupted => "interrupted",
            SearchOutcome::Faulted { .. } => "faulted",
        }
    }
}

/// Outcome of a run plus its statistics
#[derive(Debug)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Candidates actually tested across all workers
    pub attempts: u64,
    /// Batches fully or partially tested
    pub batches: u64,
    /// Wall-clock time until every participant was joined
    pub elapsed: Duration,
    pub workers: usize,
    pub batch_size: usize,
    pub keyspace_size: u64,
}

impl SearchReport {
    /// Candidates tested per second over the whole run
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts as f64 / secs
        } else {
            0.0
        }
    }
}
