use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Search statistics tracked atomically across worker threads
#[derive(Debug, Default)]
pub struct SearchStats {
    attempts: AtomicU64,
    batches: AtomicU64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `attempts` candidates tested from one batch; returns the new
    /// attempt total
    pub fn record_batch(&self, attempts: u64) -> u64 {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.attempts.fetch_add(attempts, Ordering::Relaxed) + attempts
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn batches(&self) -> u64 {
        self.batches.load(Ordering::Relaxed)
    }
}

/// Progress bar over the keyspace, fed with attempt totals from workers
///
/// Cloning is cheap; clones drive the same bar.
#[derive(Clone)]
pub struct SearchProgress {
    bar: ProgressBar,
}

impl SearchProgress {
    /// A visible bar over `total` candidates
    pub fn new(total: u64) -> Self {
        let style = ProgressStyle::with_template(
            "🔑 [{elapsed_precise}] {bar:40.cyan/blue} {human_pos}/{human_len} ({percent}%) {per_sec} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        let bar = ProgressBar::new(total);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar }
    }

    /// A bar that never draws
    pub fn hidden(total: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total);
        Self { bar }
    }

    /// Visible or hidden depending on `enabled`
    pub fn for_run(total: u64, enabled: bool) -> Self {
        if enabled {
            Self::new(total)
        } else {
            Self::hidden(total)
        }
    }

    pub fn update(&self, tested: u64) {
        self.bar.set_position(tested);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Stop ticking and clear the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_stats_accumulate_across_threads() {
        let stats = Arc::new(SearchStats::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = stats.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        stats.record_batch(5);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(stats.attempts(), 200);
        assert_eq!(stats.batches(), 40);
    }

    #[test]
    fn test_record_batch_returns_running_total() {
        let stats = SearchStats::new();
        assert_eq!(stats.record_batch(3), 3);
        assert_eq!(stats.record_batch(4), 7);
    }

    #[test]
    fn test_hidden_progress_tracks_position() {
        let progress = SearchProgress::for_run(100, false);
        progress.update(42);
        assert_eq!(progress.position(), 42);
        progress.finish();
    }

    #[test]
    fn test_visible_progress_lifecycle() {
        let progress = SearchProgress::new(1_000);
        let worker_view = progress.clone();
        worker_view.update(500);
        assert_eq!(progress.position(), 500);
        progress.finish();
    }
}
