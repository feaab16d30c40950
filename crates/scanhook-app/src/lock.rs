use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use scanhook_config::Workspace;

use crate::error::RunError;

/// Locks older than this are left over from a crashed run
const STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// RAII guard for the run-level lock file
///
/// Keeps a second invocation from picking and moving the same capture.
/// The lock file is removed when the guard is dropped.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(workspace: &Workspace) -> Result<Self, RunError> {
        let path = workspace.lock_path();

        if let Err(e) = create_exclusive(&path) {
            if e.kind() != io::ErrorKind::AlreadyExists {
                return Err(RunError::Lock { path, source: e });
            }
            if !is_stale(&path) {
                return Err(RunError::Busy { path });
            }

            tracing::warn!("Removing stale lock {}", path.display());
            if let Err(e) = fs::remove_file(&path) {
                tracing::debug!("Failed to remove stale lock {}: {}", path.display(), e);
            }
            if let Err(e) = create_exclusive(&path) {
                return Err(match e.kind() {
                    io::ErrorKind::AlreadyExists => RunError::Busy { path },
                    _ => RunError::Lock { path, source: e },
                });
            }
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::debug!("Failed to remove lock {}: {}", self.path.display(), e);
        }
    }
}

fn create_exclusive(path: &Path) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    writeln!(file, "{}", std::process::id())
}

fn is_stale(path: &Path) -> bool {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age > STALE_AFTER)
}
