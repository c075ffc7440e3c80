//! Target archive access
//!
//! The search only needs one capability from an archive: "try password P
//! against the designated entry". [`PasswordTarget`] is that capability and
//! [`TargetOpener`] creates one handle per worker, so handles are never shared
//! across threads and each is closed when its worker exits.
//!
//! A wrong password is the expected case and is reported as `Ok(false)`.
//! `Err` is reserved for faults in the archive itself.

use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

pub mod zip_target;

pub use zip_target::{ZipOpener, ZipTarget};

/// Faults in opening or reading the target archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a readable ZIP archive: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("archive {path} contains no entries")]
    EmptyArchive { path: PathBuf },

    #[error("entry '{entry}' not found in {path}")]
    EntryNotFound { path: PathBuf, entry: String },

    #[error("entry '{entry}' in {path} is not password protected")]
    NotEncrypted { path: PathBuf, entry: String },

    #[error("failed to read entry '{entry}': {source}")]
    Read {
        entry: String,
        #[source]
        source: ZipError,
    },
}

/// One open handle on the target entry
pub trait PasswordTarget {
    /// Try `candidate` as the password. `Ok(true)` when it decrypts the entry,
    /// `Ok(false)` for a wrong password.
    fn attempt(&mut self, candidate: &str) -> Result<bool, ArchiveError>;
}

/// Opens independent [`PasswordTarget`] handles, one per worker
pub trait TargetOpener: Sync {
    type Target: PasswordTarget;

    fn open(&self) -> Result<Self::Target, ArchiveError>;
}
