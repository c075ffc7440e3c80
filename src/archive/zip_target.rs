use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use super::{ArchiveError, PasswordTarget, TargetOpener};

/// Opens handles on one encrypted entry of a ZIP file
///
/// With no entry name the first entry in the archive is the target.
#[derive(Debug, Clone)]
pub struct ZipOpener {
    path: PathBuf,
    entry: Option<String>,
}

impl ZipOpener {
    pub fn new(path: impl Into<PathBuf>, entry: Option<String>) -> Self {
        Self {
            path: path.into(),
            entry,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn find_entry(
        &self,
        archive: &mut ZipArchive<BufReader<File>>,
        name: &str,
    ) -> Result<usize, ArchiveError> {
        for index in 0..archive.len() {
            let raw = archive.by_index_raw(index).map_err(|source| ArchiveError::Read {
                entry: format!("#{index}"),
                source,
            })?;
            if raw.name() == name {
                return Ok(index);
            }
        }

        Err(ArchiveError::EntryNotFound {
            path: self.path.clone(),
            entry: name.to_string(),
        })
    }
}

impl TargetOpener for ZipOpener {
    type Target = ZipTarget;

    fn open(&self) -> Result<ZipTarget, ArchiveError> {
        let file = File::open(&self.path).map_err(|source| ArchiveError::Open {
            path: self.path.clone(),
            source,
        })?;
        let mut archive =
            ZipArchive::new(BufReader::new(file)).map_err(|source| ArchiveError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        if archive.len() == 0 {
            return Err(ArchiveError::EmptyArchive {
                path: self.path.clone(),
            });
        }

        let index = match &self.entry {
            Some(name) => self.find_entry(&mut archive, name)?,
            None => 0,
        };

        let (entry, encrypted) = {
            let raw = archive.by_index_raw(index).map_err(|source| ArchiveError::Read {
                entry: format!("#{index}"),
                source,
            })?;
            (raw.name().to_string(), raw.encrypted())
        };

        if !encrypted {
            return Err(ArchiveError::NotEncrypted {
                path: self.path.clone(),
                entry,
            });
        }

        debug!("Opened {} targeting entry '{}'", self.path.display(), entry);
        Ok(ZipTarget {
            archive,
            index,
            entry,
            buffer: Vec::new(),
        })
    }
}

/// An open archive positioned on the target entry
pub struct ZipTarget {
    archive: ZipArchive<BufReader<File>>,
    index: usize,
    entry: String,
    buffer: Vec<u8>,
}

impl ZipTarget {
    /// Name of the entry being tested
    pub fn entry_name(&self) -> &str {
        &self.entry
    }

    /// Number of entries in the archive
    pub fn entry_count(&self) -> usize {
        self.archive.len()
    }
}

impl PasswordTarget for ZipTarget {
    fn attempt(&mut self, candidate: &str) -> Result<bool, ArchiveError> {
        let mut file = match self.archive.by_index_decrypt(self.index, candidate.as_bytes()) {
            Ok(file) => file,
            Err(ZipError::InvalidPassword) => return Ok(false),
            Err(source) => {
                return Err(ArchiveError::Read {
                    entry: self.entry.clone(),
                    source,
                });
            }
        };

        // The ZipCrypto header check lets roughly 1 in 256 wrong passwords
        // through; only a full read with CRC/HMAC verification confirms a hit.
        self.buffer.clear();
        Ok(file.read_to_end(&mut self.buffer).is_ok())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::keyspace::Keyspace;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::AesMode;
    use zip::unstable::write::FileOptionsExt;
    use zip::write::SimpleFileOptions;

    /// Write a ZIP whose entries are `(name, contents, password)`
    pub(crate) fn write_zip(path: &Path, entries: &[(&str, &[u8], Option<&str>)]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, contents, password) in entries {
            let options = match password {
                Some(password) => {
                    SimpleFileOptions::default().with_aes_encryption(AesMode::Aes256, password)
                }
                None => SimpleFileOptions::default(),
            };
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
        writer.finish().unwrap();
    }

    /// Write a single-entry ZIP using legacy ZipCrypto encryption
    pub(crate) fn write_zipcrypto(path: &Path, name: &str, contents: &[u8], password: &'static str) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default().with_deprecated_encryption(password.as_bytes());
        writer.start_file(name, options).unwrap();
        writer.write_all(contents).unwrap();
        writer.finish().unwrap();
    }

    fn secret_zip(dir: &TempDir, password: &str) -> PathBuf {
        let path = dir.path().join("secret.zip");
        write_zip(
            &path,
            &[
                ("key.txt", b"the vault code is 0451", Some(password)),
                ("notes.txt", b"plain notes", None),
            ],
        );
        path
    }

    #[test]
    fn test_attempt_accepts_only_the_password() {
        let dir = TempDir::new().unwrap();
        let path = secret_zip(&dir, "ba1");
        let mut target = ZipOpener::new(&path, None).open().unwrap();

        assert_eq!(target.entry_name(), "key.txt");
        assert_eq!(target.entry_count(), 2);
        assert!(!target.attempt("aaa").unwrap());
        assert!(!target.attempt("ba2").unwrap());
        assert!(target.attempt("ba1").unwrap());
        // Handle state is not consumed by a success
        assert!(target.attempt("ba1").unwrap());
    }

    #[test]
    fn test_named_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("multi.zip");
        write_zip(
            &path,
            &[
                ("first.txt", b"one", Some("aa")),
                ("second.txt", b"two", Some("bb")),
            ],
        );

        let mut target = ZipOpener::new(&path, Some("second.txt".to_string()))
            .open()
            .unwrap();
        assert_eq!(target.entry_name(), "second.txt");
        assert!(!target.attempt("aa").unwrap());
        assert!(target.attempt("bb").unwrap());
    }

    #[test]
    fn test_missing_entry_is_a_fault() {
        let dir = TempDir::new().unwrap();
        let path = secret_zip(&dir, "abc");
        let err = ZipOpener::new(&path, Some("nope.txt".to_string()))
            .open()
            .err()
            .unwrap();
        assert!(matches!(err, ArchiveError::EntryNotFound { ref entry, .. } if entry == "nope.txt"));
    }

    #[test]
    fn test_unencrypted_entry_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = secret_zip(&dir, "abc");
        let err = ZipOpener::new(&path, Some("notes.txt".to_string()))
            .open()
            .err()
            .unwrap();
        assert!(matches!(err, ArchiveError::NotEncrypted { .. }));
    }

    #[test]
    fn test_missing_file_is_a_fault() {
        let dir = TempDir::new().unwrap();
        let err = ZipOpener::new(dir.path().join("absent.zip"), None)
            .open()
            .err()
            .unwrap();
        assert!(matches!(err, ArchiveError::Open { .. }));
        assert!(err.to_string().contains("failed to open archive"));
    }

    #[test]
    fn test_garbage_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.zip");
        std::fs::write(&path, b"this is not a zip archive at all").unwrap();

        let err = ZipOpener::new(&path, None).open().err().unwrap();
        assert!(matches!(err, ArchiveError::Malformed { .. }));
    }

    #[test]
    fn test_empty_archive_is_a_fault() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.zip");
        write_zip(&path, &[]);

        let err = ZipOpener::new(&path, None).open().err().unwrap();
        assert!(matches!(err, ArchiveError::EmptyArchive { .. }));
    }

    #[test]
    fn test_zipcrypto_header_collisions_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.zip");
        write_zipcrypto(&path, "key.txt", b"emergency storage access code 7731", "q7");

        let keyspace = Keyspace::new(crate::config::DEFAULT_ALPHABET, 2).unwrap();
        let mut target = ZipOpener::new(&path, None).open().unwrap();

        // Roughly 1 in 256 wrong passwords pass the header byte check, so a
        // full sweep exercises the CRC rejection path several times
        let hits: Vec<String> = keyspace
            .candidates_from(0)
            .filter(|candidate| target.attempt(candidate).unwrap())
            .collect();
        assert_eq!(keyspace.size(), 1296);
        assert_eq!(hits, vec!["q7".to_string()]);
    }
}
