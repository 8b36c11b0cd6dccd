//! Filesystem helpers for replacing the data file in one step.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Sibling path used while a new document is being written.
pub(crate) fn temp_path_for(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    destination.with_file_name(name)
}

/// Write `contents` to a temporary sibling of `destination`, then rename it into place.
///
/// Readers see either the previous document or the new one, never a truncated file.
/// If any step fails the temporary file is removed and `destination` is left untouched.
pub(crate) fn write_atomic(destination: &Path, contents: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(destination);

    let written = fs::File::create(&temp_path).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    rename_with_fallback(&temp_path, destination)
}

/// Rename a file, with fallback for platforms where rename fails if the target exists.
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_new_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("transactions.json");

        write_atomic(&dest, b"{}").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "{}");
        assert!(!temp_path_for(&dest).exists());
    }

    #[test]
    fn test_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("transactions.json");
        fs::write(&dest, "old").unwrap();

        write_atomic(&dest, b"new").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_failed_write_leaves_destination_alone() {
        let dir = tempdir().unwrap();
        // Destination inside a directory that does not exist: creating the temp file fails.
        let dest = dir.path().join("missing").join("transactions.json");

        assert!(write_atomic(&dest, b"new").is_err());
        assert!(!dest.exists());
        assert!(!temp_path_for(&dest).exists());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let dest = Path::new("/data/transactions.json");
        assert_eq!(
            temp_path_for(dest),
            PathBuf::from("/data/transactions.json.tmp")
        );
    }
}
