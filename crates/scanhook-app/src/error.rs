use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use scanhook_config::ConfigError;
use scanhook_ocr::{CaptureError, OcrError};

/// Fatal conditions that end a run early
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("another run holds {}", path.display())]
    Busy { path: PathBuf },

    #[error("failed to acquire run lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("recognition failed: {0}")]
    Recognition(#[from] OcrError),

    #[error("failed to archive {} to {}: {source}", from.display(), to.display())]
    Archive {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Config(ConfigError::Missing { .. }) => 2,
            RunError::Config(ConfigError::Unreadable { .. }) => 3,
            RunError::Config(ConfigError::LicenseMissing { .. }) => 4,
            RunError::Busy { .. } | RunError::Lock { .. } => 5,
            RunError::Capture(CaptureError::NotFound { .. }) => 6,
            RunError::Capture(CaptureError::InvalidName { .. }) => 7,
            RunError::Capture(CaptureError::Scan { .. }) => 8,
            RunError::Recognition(_) => 9,
            RunError::Archive { .. } => 10,
        }
    }
}

impl From<&RunError> for ExitCode {
    fn from(err: &RunError) -> Self {
        ExitCode::from(err.exit_code())
    }
}
