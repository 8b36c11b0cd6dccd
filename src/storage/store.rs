use std::collections::HashSet;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::domain::Ledger;

use super::DEFAULT_DATA_FILE;
use super::fs::write_atomic;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Data file {} is corrupted: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to serialize ledger: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// File-backed persistence for the ledger.
///
/// The whole ledger is read on every load and rewritten on every save.
/// There is no locking: two processes saving at the same time race and the
/// last write wins.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Create a store backed by the JSON document at `path`.
    /// Nothing is touched on disk until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `data/transactions.json` next to the installed executable.
    pub fn default_path() -> PathBuf {
        let install_root = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        install_root.join(DEFAULT_DATA_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the first unparseable document is copied before it can be replaced.
    /// Later, different corruptions go to `<file>.corrupt.2`, `<file>.corrupt.3`, ...
    pub fn corrupt_backup_path(&self) -> PathBuf {
        self.numbered_backup_path(1)
    }

    fn numbered_backup_path(&self, n: u32) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|file_name| file_name.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        if n > 1 {
            name.push(format!(".{}", n));
        }
        self.path.with_file_name(name)
    }

    /// Copy the current document to the first free backup slot, unless an
    /// existing backup already holds the same bytes.
    /// Returns the path written, or `None` when nothing new had to be kept.
    fn preserve_corrupt(&self) -> io::Result<Option<PathBuf>> {
        let contents = fs::read(&self.path)?;
        let mut n = 1;
        loop {
            let backup = self.numbered_backup_path(n);
            match fs::read(&backup) {
                Ok(existing) if existing == contents => return Ok(None),
                Ok(_) => n += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    fs::write(&backup, &contents)?;
                    return Ok(Some(backup));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Read the ledger, reporting unreadable or unparseable files as errors.
    /// A missing or blank file is an empty ledger.
    pub fn try_load(&self) -> Result<Ledger, StoreError> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No data file at {}, starting empty", self.path.display());
                return Ok(Ledger::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if contents.iter().all(u8::is_ascii_whitespace) {
            return Ok(Ledger::new());
        }

        // Invalid UTF-8 surfaces here too, as a parse error.
        let ledger: Ledger =
            serde_json::from_slice(&contents).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            "Loaded {} transactions from {}",
            ledger.transactions.len(),
            self.path.display()
        );
        Ok(ledger)
    }

    /// Read the ledger, never failing.
    ///
    /// Unreadable files yield an empty ledger with a warning. Corrupted files
    /// additionally get copied next to the data file (see
    /// `corrupt_backup_path()`) so a later save cannot silently discard them.
    pub fn load(&self) -> Ledger {
        match self.try_load() {
            Ok(ledger) => {
                warn_on_duplicate_ids(&ledger);
                ledger
            }
            Err(e @ StoreError::Corrupt { .. }) => {
                warn!("{}; continuing with an empty ledger", e);
                match self.preserve_corrupt() {
                    Ok(Some(backup)) => {
                        warn!("Corrupted data preserved at {}", backup.display())
                    }
                    Ok(None) => debug!("Corrupted data already preserved"),
                    Err(copy_err) => warn!(
                        "Could not preserve corrupted data from {}: {}",
                        self.path.display(),
                        copy_err
                    ),
                }
                Ledger::new()
            }
            Err(e) => {
                warn!("{}; continuing with an empty ledger", e);
                Ledger::new()
            }
        }
    }

    /// Replace the backing document with `ledger`.
    /// Parent directories are created on first use.
    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(ledger).map_err(StoreError::Serialize)?;

        write_atomic(&self.path, json.as_bytes()).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(
            "Saved {} transactions to {}",
            ledger.transactions.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn warn_on_duplicate_ids(ledger: &Ledger) {
    let mut seen = HashSet::new();
    for transaction in ledger.iter() {
        if !seen.insert(transaction.id) {
            warn!("Duplicate transaction id {} in data file", transaction.id);
        }
    }
}
