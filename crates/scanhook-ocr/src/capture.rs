use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use scanhook_types::CaptureRegion;

use crate::error::CaptureError;

const CAPTURE_EXTENSION: &str = "png";
const NAME_SEGMENTS: usize = 5;

/// A screenshot picked for recognition, with the region decoded from its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub path: PathBuf,
    pub region: CaptureRegion,
}

impl Capture {
    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }
}

/// Pick the newest capture in `dir` and decode its crop region
pub fn select_capture(dir: &Path) -> Result<Capture, CaptureError> {
    let path = find_newest_capture(dir)?;
    let region = parse_capture_name(&path)?;
    tracing::debug!("Selected {} ({})", path.display(), region);
    Ok(Capture { path, region })
}

/// Most recently modified PNG directly inside `dir`.
///
/// Equal timestamps fall back to the lexically smallest file name.
pub fn find_newest_capture(dir: &Path) -> Result<PathBuf, CaptureError> {
    let scan_err = |source| CaptureError::Scan {
        dir: dir.to_path_buf(),
        source,
    };

    let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(scan_err)? {
        let entry = entry.map_err(scan_err)?;
        let path = entry.path();
        if !is_capture_file(&path) {
            continue;
        }

        let metadata = entry.metadata().map_err(scan_err)?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().map_err(scan_err)?;
        candidates.push((modified, path));
    }

    candidates
        .into_iter()
        .max_by(|(a_time, a_path), (b_time, b_path)| {
            newest_first(a_time, a_path, b_time, b_path)
        })
        .map(|(_, path)| path)
        .ok_or_else(|| CaptureError::NotFound {
            dir: dir.to_path_buf(),
        })
}

// Later mtime is greater; on a tie the smaller name is greater.
fn newest_first(
    a_time: &SystemTime,
    a_path: &Path,
    b_time: &SystemTime,
    b_path: &Path,
) -> Ordering {
    a_time
        .cmp(b_time)
        .then_with(|| b_path.file_name().cmp(&a_path.file_name()))
}

fn is_capture_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CAPTURE_EXTENSION))
}

/// Decode `<label>_<x>_<y>_<width>_<height>.png` into a region
pub fn parse_capture_name(path: &Path) -> Result<CaptureRegion, CaptureError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let invalid = |reason: String| CaptureError::InvalidName {
        name: name.clone(),
        reason,
    };

    let stem = path
        .file_stem()
        .and_then(OsStr::to_str)
        .ok_or_else(|| invalid("file name is not valid UTF-8".to_string()))?;

    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() != NAME_SEGMENTS {
        return Err(invalid(format!(
            "expected {} underscore-separated segments, found {}",
            NAME_SEGMENTS,
            parts.len()
        )));
    }

    let field = |index: usize, label: &str| -> Result<u32, CaptureError> {
        parts[index]
            .parse::<u32>()
            .map_err(|e| invalid(format!("{} '{}': {}", label, parts[index], e)))
    };

    Ok(CaptureRegion {
        x: field(1, "x")?,
        y: field(2, "y")?,
        width: field(3, "width")?,
        height: field(4, "height")?,
    })
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::time::Duration;

    use super::*;

    fn touch(dir: &Path, name: &str, modified: SystemTime) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(modified).unwrap();
        path
    }

    #[test]
    fn test_parse_capture_name() {
        let region = parse_capture_name(Path::new("foo_10_20_300_400.png")).unwrap();
        assert_eq!(region, CaptureRegion::new(10, 20, 300, 400));
    }

    #[test]
    fn test_parse_capture_name_with_empty_label() {
        let region = parse_capture_name(Path::new("/tmp/_0_0_1_1.png")).unwrap();
        assert_eq!(region, CaptureRegion::new(0, 0, 1, 1));
    }

    #[test]
    fn test_parse_rejects_four_segments() {
        let err = parse_capture_name(Path::new("foo_10_20_300.png")).unwrap_err();
        match err {
            CaptureError::InvalidName { name, .. } => assert_eq!(name, "foo_10_20_300.png"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_extra_segments() {
        let err = parse_capture_name(Path::new("my_shot_10_20_300_400.png")).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidName { .. }));
    }

    #[test]
    fn test_parse_rejects_non_integer_fields() {
        for name in ["a_x_20_300_400.png", "a_10_-5_300_400.png", "a_10_20_3.5_400.png"] {
            let err = parse_capture_name(Path::new(name)).unwrap_err();
            assert!(
                matches!(err, CaptureError::InvalidName { .. }),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_newest_by_mtime_not_name() {
        let dir = tempfile::tempdir().unwrap();
        let base = SystemTime::now() - Duration::from_secs(600);

        touch(dir.path(), "z_0_0_1_1.png", base);
        let newest = touch(dir.path(), "a_0_0_1_1.png", base + Duration::from_secs(120));
        touch(dir.path(), "m_0_0_1_1.png", base + Duration::from_secs(60));

        assert_eq!(find_newest_capture(dir.path()).unwrap(), newest);
    }

    #[test]
    fn test_equal_mtime_prefers_smallest_name() {
        let dir = tempfile::tempdir().unwrap();
        let when = SystemTime::now() - Duration::from_secs(60);

        touch(dir.path(), "b_0_0_1_1.png", when);
        let first = touch(dir.path(), "a_0_0_1_1.png", when);

        assert_eq!(find_newest_capture(dir.path()).unwrap(), first);
    }

    #[test]
    fn test_ignores_other_files_and_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let old = SystemTime::now() - Duration::from_secs(600);

        let capture = touch(dir.path(), "shot_1_2_3_4.PNG", old);
        touch(dir.path(), "notes_1_2_3_4.txt", SystemTime::now());
        fs::create_dir(dir.path().join("scanned")).unwrap();
        touch(&dir.path().join("scanned"), "late_1_2_3_4.png", SystemTime::now());

        assert_eq!(find_newest_capture(dir.path()).unwrap(), capture);
    }

    #[test]
    fn test_no_captures() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "settings.ini", SystemTime::now());

        let err = find_newest_capture(dir.path()).unwrap_err();
        assert!(matches!(err, CaptureError::NotFound { .. }));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_newest_capture(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, CaptureError::Scan { .. }));
    }

    #[test]
    fn test_select_capture_decodes_newest() {
        let dir = tempfile::tempdir().unwrap();
        let base = SystemTime::now() - Duration::from_secs(600);
        touch(dir.path(), "old_1_1_1_1.png", base);
        let path = touch(dir.path(), "new_5_6_7_8.png", base + Duration::from_secs(1));

        let capture = select_capture(dir.path()).unwrap();
        assert_eq!(capture.path, path);
        assert_eq!(capture.region, CaptureRegion::new(5, 6, 7, 8));
        assert_eq!(capture.file_name(), "new_5_6_7_8.png");
    }

    #[test]
    fn test_select_capture_rejects_bad_newest_name() {
        let dir = tempfile::tempdir().unwrap();
        let base = SystemTime::now() - Duration::from_secs(600);
        touch(dir.path(), "good_1_1_1_1.png", base);
        touch(dir.path(), "bad_1_1_1.png", base + Duration::from_secs(1));

        let err = select_capture(dir.path()).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidName { .. }));
    }
}
