//! Parallel execution primitives
//!
//! This module provides the resource and coordination pieces the search is
//! built from. It knows nothing about archives or candidates.
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Resource Discovery**: Detects available CPU cores using `num_cpus::get()`
//! - **Resource Calculation**: Applies user configuration (explicit worker count or
//!   thread percentage) to available resources
//! - **Cancellation**: Provides a shared, monotonic stop signal that producers and
//!   workers poll cooperatively
//! - **Progress**: Atomic counters and an `indicatif` progress bar fed from workers
//!
//! ## What This Module Does NOT Do:
//! - **Domain Logic**: Does not know what a candidate, batch or archive is
//! - **Thread Ownership**: Threads are spawned and joined by the search coordinator
//!
//! # Example Usage
//!
//! ```rust
//! use zipsweep::parallel::{CancellationToken, calculate_optimal_workers};
//!
//! // 0 = derive the worker count from CPU cores
//! let workers = calculate_optimal_workers(0, 100);
//! assert!(workers >= 1);
//!
//! let token = CancellationToken::new();
//! let observer = token.clone();
//! assert!(token.cancel());      // performed the transition
//! assert!(!token.cancel());     // already set, no-op
//! assert!(observer.is_cancelled());
//! ```

pub mod core;
pub mod progress;

// Re-export main types for easier access
pub use self::core::{CancellationToken, calculate_optimal_workers};
pub use self::progress::{SearchProgress, SearchStats};
