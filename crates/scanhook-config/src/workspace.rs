use std::env;
use std::io;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.ini";
const LOG_FILE: &str = "ocr.log";
const ARCHIVE_DIR: &str = "scanned";
const LOCK_FILE: &str = "scanhook.lock";

/// The program directory and every path derived from it.
///
/// Built once at startup and handed to each component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace rooted at the directory holding the running executable
    pub fn from_current_exe() -> io::Result<Self> {
        let exe = env::current_exe()?;
        let root = exe.parent().map(Path::to_path_buf).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "executable path has no parent directory",
            )
        })?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.root.join(ARCHIVE_DIR)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }
}
