//! File helpers: owner-only writes, plain copies, and the bootstrap lock.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{HostcertError, Result};

/// Create `path` and all its parents if missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| HostcertError::io(path, e))
}

/// Write a public artifact (certificates, descriptors), truncating any
/// existing file.
pub fn write_public(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|e| HostcertError::io(path, e))?;
    debug!(path = %path.display(), "wrote file");
    Ok(())
}

/// Write a private key readable by the owner only, truncating any existing
/// file.
pub fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| HostcertError::io(path, e))?;
    file.write_all(contents)
        .map_err(|e| HostcertError::io(path, e))?;
    file.sync_all().map_err(|e| HostcertError::io(path, e))?;
    drop(file);

    // `mode` only applies on creation; tighten pre-existing files as well.
    restrict_to_owner(path)?;
    debug!(path = %path.display(), "wrote private key");
    Ok(())
}

/// Copy `src` to `dst`, overwriting `dst`.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst).map_err(|e| HostcertError::io(src, e))?;
    debug!(from = %src.display(), to = %dst.display(), "copied file");
    Ok(())
}

/// Copy a private key, leaving the copy owner-only.
pub fn copy_private(src: &Path, dst: &Path) -> Result<()> {
    copy_file(src, dst)?;
    restrict_to_owner(dst)
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| HostcertError::io(path, e))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> Result<()> {
    Ok(())
}

/// Exclusive lock held for the duration of a CA bootstrap.
///
/// Acquired with an atomic create-if-absent; removed on drop.
#[derive(Debug)]
pub struct BootstrapLock {
    path: PathBuf,
}

impl BootstrapLock {
    /// Take the lock, failing with [`HostcertError::BootstrapLocked`] if
    /// another bootstrap holds it.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                // Best effort: the pid only helps a human clean up a stale lock.
                let _ = writeln!(file, "{}", std::process::id());
                debug!(path = %path.display(), "acquired bootstrap lock");
                Ok(Self { path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(HostcertError::BootstrapLocked { path })
            }
            Err(e) => Err(HostcertError::io(path, e)),
        }
    }

    /// Location of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BootstrapLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove bootstrap lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_is_exclusive_and_released() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join(".lock");

        let lock = BootstrapLock::acquire(&lock_path).unwrap();
        assert!(lock.path().exists());
        assert!(matches!(
            BootstrapLock::acquire(&lock_path),
            Err(HostcertError::BootstrapLocked { .. })
        ));

        drop(lock);
        assert!(!lock_path.exists());
        assert!(BootstrapLock::acquire(&lock_path).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_private_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("key.pem");
        fs::write(&key, "old").unwrap();
        fs::set_permissions(&key, fs::Permissions::from_mode(0o644)).unwrap();

        write_private(&key, b"secret").unwrap();
        let mode = fs::metadata(&key).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&key).unwrap(), "secret");

        let copy = dir.path().join("copy.pem");
        copy_private(&key, &copy).unwrap();
        let mode = fs::metadata(&copy).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_copy_missing_source_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = copy_file(&missing, &dir.path().join("dst")).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
