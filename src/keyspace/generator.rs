use crossbeam::channel::Sender;
use tracing::debug;

use super::Keyspace;
use crate::parallel::CancellationToken;

/// A contiguous, non-empty run of candidates starting at keyspace index `start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    start: u64,
    candidates: Vec<String>,
}

impl Batch {
    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Candidates paired with their keyspace index
    pub fn indexed(&self) -> impl Iterator<Item = (u64, &str)> {
        self.candidates
            .iter()
            .enumerate()
            .map(move |(offset, candidate)| (self.start + offset as u64, candidate.as_str()))
    }
}

/// How the generator stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorExit {
    /// Every index in the keyspace was enqueued
    Exhausted,
    /// The cancellation token was raised first
    Cancelled,
    /// Every consumer hung up before the keyspace was covered
    Abandoned,
}

/// Splits a keyspace into batches of at most `batch_size` candidates
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    keyspace: Keyspace,
    batch_size: usize,
}

impl CandidateGenerator {
    /// `batch_size` is clamped to at least 1
    pub fn new(keyspace: Keyspace, batch_size: usize) -> Self {
        Self {
            keyspace,
            batch_size: batch_size.max(1),
        }
    }

    pub fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches needed to cover the keyspace
    pub fn batch_count(&self) -> u64 {
        self.keyspace.size().div_ceil(self.batch_size as u64)
    }

    /// Lazy batch sequence from index 0; each call starts over
    pub fn batches(&self) -> Batches<'_> {
        Batches {
            generator: self,
            next_start: 0,
        }
    }

    /// Feed batches into `sender` until the keyspace is covered, the token is
    /// raised, or every receiver is gone.
    ///
    /// The sender is dropped on return, which closes the queue: workers drain
    /// whatever is still buffered and then see a disconnected channel.
    pub fn run(&self, sender: Sender<Batch>, cancel: &CancellationToken) -> GeneratorExit {
        let mut sent: u64 = 0;
        let mut batches = self.batches();

        loop {
            if cancel.is_cancelled() {
                debug!("Generator cancelled after {} batches", sent);
                return GeneratorExit::Cancelled;
            }
            let Some(batch) = batches.next() else {
                break;
            };
            if sender.send(batch).is_err() {
                debug!("Generator abandoned after {} batches: no workers left", sent);
                return GeneratorExit::Abandoned;
            }
            sent += 1;
        }

        debug!("Generator exhausted keyspace in {} batches", sent);
        GeneratorExit::Exhausted
    }
}

/// Iterator over the batches of a [`CandidateGenerator`]
#[derive(Debug)]
pub struct Batches<'a> {
    generator: &'a CandidateGenerator,
    next_start: u64,
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        let size = self.generator.keyspace.size();
        if self.next_start >= size {
            return None;
        }

        let start = self.next_start;
        let end = start
            .saturating_add(self.generator.batch_size as u64)
            .min(size);
        let candidates: Vec<String> = self
            .generator
            .keyspace
            .candidates_from(start)
            .take((end - start) as usize)
            .collect();

        self.next_start = end;
        Some(Batch { start, candidates })
    }
}
