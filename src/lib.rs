//! # zipsweep - Parallel Password Recovery for Encrypted ZIP Archives
//!
//! Enumerates a fixed-length keyspace over a configurable alphabet and tests
//! every candidate against one encrypted archive entry, spread across a pool
//! of verifier threads.
//!
//! ## Features
//!
//! - **Deterministic keyspace**: every candidate has a stable index, so runs
//!   are reproducible and partial ranges are easy to reason about
//! - **Bounded memory**: batches flow through a bounded queue with backpressure
//! - **First win stops everyone**: a single-assignment result slot plus a
//!   shared cancellation token end the run promptly
//! - **Clear outcomes**: found, exhausted, interrupted or faulted
//!
//! ## Quick Start
//!
//! ```bash
//! # Recover the password of the default archive (a-z0-9, length 6)
//! zipsweep crack
//!
//! # Smaller keyspace, explicit archive and entry
//! zipsweep crack vault.zip --entry secret.txt --alphabet abc123 --length 4
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod keyspace;
pub mod parallel;
pub mod search;

pub use cli::{Cli, Output};
pub use config::ZipsweepConfig;

/// Result type alias for zipsweep operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
