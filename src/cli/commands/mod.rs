//! Command implementations for the zipsweep CLI
//!
//! Each command is organized into its own module.

pub mod config;
pub mod crack;
pub mod keyspace;
pub mod version;
