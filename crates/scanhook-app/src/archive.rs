use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use scanhook_config::Workspace;

use crate::error::RunError;

/// Move a processed capture into `scanned/`, keeping its file name.
///
/// A file of the same name already in `scanned/` is replaced.
pub fn archive_capture(workspace: &Workspace, image: &Path) -> Result<PathBuf, RunError> {
    let archive_dir = workspace.archive_dir();
    let target = match image.file_name() {
        Some(name) => archive_dir.join(name),
        None => {
            return Err(RunError::Archive {
                from: image.to_path_buf(),
                to: archive_dir,
                source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            });
        }
    };

    let archive_err = |source| RunError::Archive {
        from: image.to_path_buf(),
        to: target.clone(),
        source,
    };

    fs::create_dir_all(&archive_dir).map_err(archive_err)?;
    move_file(image, &target).map_err(archive_err)?;

    tracing::debug!("Archived {} to {}", image.display(), target.display());
    Ok(target)
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_into_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path());
        let image = dir.path().join("shot_1_2_3_4.png");
        fs::write(&image, b"png").unwrap();

        let archived = archive_capture(&workspace, &image).unwrap();

        assert_eq!(archived, dir.path().join("scanned").join("shot_1_2_3_4.png"));
        assert!(!image.exists());
        assert_eq!(fs::read(&archived).unwrap(), b"png");
    }

    #[test]
    fn test_existing_archive_dir_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path());
        fs::create_dir(workspace.archive_dir()).unwrap();
        fs::write(workspace.archive_dir().join("shot_1_2_3_4.png"), b"old").unwrap();

        let image = dir.path().join("shot_1_2_3_4.png");
        fs::write(&image, b"new").unwrap();

        let archived = archive_capture(&workspace, &image).unwrap();
        assert_eq!(fs::read(archived).unwrap(), b"new");
        assert!(!image.exists());
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path());

        let err = archive_capture(&workspace, &dir.path().join("gone_1_1_1_1.png")).unwrap_err();
        assert!(matches!(err, RunError::Archive { .. }));
    }
}
