use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Calculate the worker count from system resources and configuration
///
/// # Parameters
/// - `max_threads_config`: Explicit worker count (0 = derive from CPU cores)
/// - `thread_percentage`: Percentage of CPU cores to use when deriving (e.g. 100)
///
/// # Algorithm
/// ```text
/// 1. Explicit count wins: max_threads_config if > 0
/// 2. Otherwise detect cores: num_cpus::get()
/// 3. Apply percentage: cores * thread_percentage / 100
/// 4. Ensure minimum: max(1, result)
/// ```
///
/// An explicit count is used as-is, even above the core count.
pub fn calculate_optimal_workers(max_threads_config: usize, thread_percentage: u8) -> usize {
    if max_threads_config > 0 {
        return max_threads_config;
    }

    let available_cores = num_cpus::get();
    std::cmp::max(1, (available_cores * thread_percentage as usize) / 100)
}

/// Shared stop signal for one search run
///
/// Starts clear and flips to set at most once; it never resets. Clones share
/// the same flag, so the token is handed to the generator and every worker at
/// construction time.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Returns `true` only for the call that performed the
    /// false→true transition; later calls are no-ops.
    pub fn cancel(&self) -> bool {
        !self.flag.swap(true, Ordering::AcqRel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_explicit_workers_honoured() {
        assert_eq!(calculate_optimal_workers(3, 100), 3);
        assert_eq!(calculate_optimal_workers(1, 10), 1);
    }

    #[test]
    fn test_derived_workers_at_least_one() {
        assert!(calculate_optimal_workers(0, 100) >= 1);
        assert!(calculate_optimal_workers(0, 1) >= 1);
        assert!(calculate_optimal_workers(0, 50) <= calculate_optimal_workers(0, 100));
    }

    #[test]
    fn test_token_starts_clear() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_monotonic_and_idempotent() {
        let token = CancellationToken::new();
        let clone = token.clone();

        assert!(clone.cancel());
        assert!(token.is_cancelled());
        assert!(!token.cancel());
        assert!(!clone.cancel());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_exactly_one_racing_cancel_wins() {
        let token = CancellationToken::new();
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let token = token.clone();
                let barrier = barrier.clone();
                let winners = winners.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    if token.cancel() {
                        winners.fetch_add(1, Ordering::Relaxed);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(winners.load(Ordering::Relaxed), 1);
    }
}
