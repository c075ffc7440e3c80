//! Configuration management for zipsweep
//!
//! Settings are layered with figment (see `config::core`): embedded defaults, the
//! user config, the project config (or an explicit `--config` file),
//! `ZIPSWEEP_*` environment variables, then command-line flags.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::keyspace::Keyspace;
use crate::parallel::calculate_optimal_workers;
use crate::search::SearchConfig;

pub mod core;
pub mod overrides;
pub mod smart_load;

pub use overrides::ConfigOverrides;

/// Lowercase ASCII letters followed by digits
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Main configuration structure for zipsweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ZipsweepConfig {
    /// Keyspace and worker pool settings
    pub search: SearchSettings,

    /// Target archive settings
    pub archive: ArchiveSettings,

    /// Result and progress output settings
    pub output: OutputSettings,
}

/// Keyspace and worker pool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Characters candidates are drawn from, in enumeration order
    pub alphabet: String,

    /// Fixed candidate length
    pub length: usize,

    /// Candidates per batch
    pub batch_size: usize,

    /// Worker threads (0 = derive from CPU cores)
    pub workers: usize,

    /// Percentage of CPU cores used when `workers` is 0
    pub thread_percentage: u8,

    /// Batch queue capacity multiplier (capacity = workers * multiplier)
    pub queue_multiplier: usize,
}

/// Target archive configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    /// Archive used when none is given on the command line
    pub path: PathBuf,

    /// Entry to test; empty selects the first entry
    pub entry: String,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// File the recovered password is written to
    pub result_file: PathBuf,

    /// Show a progress bar while searching
    pub progress: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.to_string(),
            length: 6,
            batch_size: 100_000,
            workers: 0,
            thread_percentage: 100,
            queue_multiplier: 2,
        }
    }
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("emergency_storage_key.zip"),
            entry: String::new(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            result_file: PathBuf::from("password.txt"),
            progress: true,
        }
    }
}

impl ArchiveSettings {
    /// Configured entry name, `None` meaning "first entry"
    pub fn entry_name(&self) -> Option<String> {
        let entry = self.entry.trim();
        (!entry.is_empty()).then(|| entry.to_string())
    }
}

impl ZipsweepConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.keyspace()?;

        if self.search.batch_size == 0 {
            bail!("search.batch_size must be at least 1");
        }
        if self.search.queue_multiplier == 0 {
            bail!("search.queue_multiplier must be at least 1");
        }
        if !(1..=100).contains(&self.search.thread_percentage) {
            bail!(
                "search.thread_percentage must be between 1 and 100, got {}",
                self.search.thread_percentage
            );
        }
        if self.output.result_file.as_os_str().is_empty() {
            bail!("output.result_file cannot be empty");
        }

        Ok(())
    }

    /// Keyspace described by the search settings
    pub fn keyspace(&self) -> Result<Keyspace> {
        Keyspace::new(&self.search.alphabet, self.search.length)
    }

    /// Runtime pool settings with the worker count resolved
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            batch_size: self.search.batch_size,
            workers: calculate_optimal_workers(self.search.workers, self.search.thread_percentage),
            queue_multiplier: self.search.queue_multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ZipsweepConfig::default();
        config.validate().unwrap();
        assert_eq!(config.keyspace().unwrap().size(), 36u64.pow(6));
        assert_eq!(config.archive.entry_name(), None);
    }

    #[test]
    fn test_explicit_workers_pass_through() {
        let mut config = ZipsweepConfig::default();
        config.search.workers = 3;
        config.search.batch_size = 7;

        let search = config.search_config();
        assert_eq!(search.workers, 3);
        assert_eq!(search.batch_size, 7);
        assert_eq!(search.queue_capacity(), 6);
    }

    #[test]
    fn test_validation_failures() {
        let invalid: [fn(&mut ZipsweepConfig); 9] = [
            |c: &mut ZipsweepConfig| c.search.alphabet = String::new(),
            |c: &mut ZipsweepConfig| c.search.alphabet = "abca".to_string(),
            |c: &mut ZipsweepConfig| c.search.length = 0,
            |c: &mut ZipsweepConfig| c.search.length = 40,
            |c: &mut ZipsweepConfig| c.search.batch_size = 0,
            |c: &mut ZipsweepConfig| c.search.queue_multiplier = 0,
            |c: &mut ZipsweepConfig| c.search.thread_percentage = 0,
            |c: &mut ZipsweepConfig| c.search.thread_percentage = 101,
            |c: &mut ZipsweepConfig| c.output.result_file = PathBuf::new(),
        ];

        for (case, mutate) in invalid.iter().enumerate() {
            let mut config = ZipsweepConfig::default();
            mutate(&mut config);
            assert!(config.validate().is_err(), "case {case} should be rejected");
        }
    }

    #[test]
    fn test_entry_name_trims_blank() {
        let mut archive = ArchiveSettings::default();
        archive.entry = "  ".to_string();
        assert_eq!(archive.entry_name(), None);
        archive.entry = "secret.txt".to_string();
        assert_eq!(archive.entry_name().as_deref(), Some("secret.txt"));
    }
}
