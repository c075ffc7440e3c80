//! Search coordination
//!
//! Wires the candidate generator to a pool of verifier workers:
//!
//! ```text
//! ┌─────────────┐  bounded   ┌──────────────┐  result slot  ┌─────────────┐
//! │  Generator  │──────────▶│  Worker pool  │─────────────▶│ Coordinator │
//! │ (1 thread)  │  batches   │ (W threads)   │  + events     │ (caller)    │
//! └─────────────┘            └──────────────┘               └─────────────┘
//!        ▲                          ▲                              │
//!        └──────────── CancellationToken (polled) ◀────────────────┘
//! ```
//!
//! The queue holds `W * queue_multiplier` batches, so the generator blocks
//! when workers fall behind. Closing the queue (dropping the only sender) is
//! the end-of-work signal. The first worker to claim the [`ResultSlot`] wins
//! and raises the token; everyone else stops at their next poll.

pub mod coordinator;
pub mod pool;
pub mod types;

pub use coordinator::Search;
pub use pool::ProgressFn;
pub use types::{Discovery, ResultSlot, SearchConfig, SearchOutcome, SearchReport};
