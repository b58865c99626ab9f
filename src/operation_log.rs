/// Persistence of the moves performed by one sort pass.
///
/// The log lives at `<root>/.sort_log`, one record per line:
///
/// ```text
/// /data/inbox/photo.png||/data/inbox/Images/photo.png
/// USER_FOLDERS:/data/inbox/MyProject||/data/inbox/Others/MyProject
/// ```
///
/// The `USER_FOLDERS:` prefix only exists in the file. In memory the two kinds
/// of record are the variants of [`Origin`].
use crate::error::{OrganizeError, OrganizeResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the log file, placed directly in the root.
pub const SORT_LOG_FILENAME: &str = ".sort_log";

/// Tag written in front of relocated user folders.
pub const USER_FOLDERS_KEY: &str = "USER_FOLDERS";

const FIELD_DELIMITER: &str = "||";

/// Where a moved item came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum Origin {
    /// A regular file moved into a generated folder.
    File(PathBuf),
    /// A pre-existing folder moved as a whole, contents untouched.
    RelocatedFolder(PathBuf),
}

impl Origin {
    pub fn path(&self) -> &Path {
        match self {
            Origin::File(path) | Origin::RelocatedFolder(path) => path,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Origin::RelocatedFolder(_))
    }

    fn encode(&self) -> String {
        match self {
            Origin::File(path) => path.to_string_lossy().into_owned(),
            Origin::RelocatedFolder(path) => {
                format!("{}:{}", USER_FOLDERS_KEY, path.to_string_lossy())
            }
        }
    }

    fn decode(field: &str) -> Self {
        match field
            .strip_prefix(USER_FOLDERS_KEY)
            .and_then(|rest| rest.strip_prefix(':'))
        {
            Some(path) => Origin::RelocatedFolder(PathBuf::from(path)),
            None => Origin::File(PathBuf::from(field)),
        }
    }
}

/// One relocation performed during a sort pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub origin: Origin,
    /// Location of the item right after the move.
    pub destination: PathBuf,
}

impl MoveRecord {
    #[cfg(test)]
    pub(crate) fn file(origin: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::File(origin.into()),
            destination: destination.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn folder(origin: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::RelocatedFolder(origin.into()),
            destination: destination.into(),
        }
    }

    fn to_line(&self) -> String {
        format!(
            "{}{}{}",
            self.origin.encode(),
            FIELD_DELIMITER,
            self.destination.to_string_lossy()
        )
    }

    fn parse_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        match parts.as_slice() {
            [origin, destination] => Some(Self {
                origin: Origin::decode(origin),
                destination: PathBuf::from(*destination),
            }),
            _ => None,
        }
    }
}

/// Parsed log plus the lines that had to be dropped.
#[derive(Debug, Default)]
pub struct LogContents {
    pub records: Vec<MoveRecord>,
    /// 1-based line numbers that did not split into exactly two fields.
    pub malformed_lines: Vec<usize>,
}

/// Returns the path of the log file for `root`.
pub fn log_path(root: &Path) -> PathBuf {
    root.join(SORT_LOG_FILENAME)
}

/// Writes `records` to the log, replacing any previous log for `root`.
pub fn write(root: &Path, records: &[MoveRecord]) -> OrganizeResult<()> {
    let path = log_path(root);
    let mut contents = String::new();
    for record in records {
        contents.push_str(&record.to_line());
        contents.push('\n');
    }

    fs::write(&path, contents).map_err(|e| OrganizeError::LogWriteFailed { path, source: e })
}

/// Reads the log for `root`. A missing log reads as empty; malformed lines are skipped.
pub fn read(root: &Path) -> OrganizeResult<Vec<MoveRecord>> {
    read_with_diagnostics(root).map(|contents| contents.records)
}

/// Like [`read`], but also reports which lines were dropped.
pub fn read_with_diagnostics(root: &Path) -> OrganizeResult<LogContents> {
    let path = log_path(root);
    if !path.exists() {
        return Ok(LogContents::default());
    }

    let text = fs::read_to_string(&path)
        .map_err(|e| OrganizeError::LogReadFailed { path: path.clone(), source: e })?;

    let mut contents = LogContents::default();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match MoveRecord::parse_line(line) {
            Some(record) => contents.records.push(record),
            None => {
                tracing::warn!(line = index + 1, "skipping malformed sort log entry");
                contents.malformed_lines.push(index + 1);
            }
        }
    }

    Ok(contents)
}

/// Removes the log for `root` if there is one.
pub fn delete(root: &Path) -> OrganizeResult<()> {
    let path = log_path(root);
    if path.exists() {
        fs::remove_file(&path).map_err(|e| OrganizeError::LogWriteFailed { path, source: e })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_log_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let records = read(temp_dir.path()).expect("read failed");
        assert!(records.is_empty());
    }

    #[test]
    fn test_write_format() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let records = vec![
            MoveRecord::file("/r/a.png", "/r/Images/a.png"),
            MoveRecord::folder("/r/MyProject", "/r/Others/MyProject"),
        ];
        write(root, &records).expect("write failed");

        let text = fs::read_to_string(root.join(".sort_log")).expect("read log");
        assert_eq!(
            text,
            "/r/a.png||/r/Images/a.png\nUSER_FOLDERS:/r/MyProject||/r/Others/MyProject\n"
        );
    }

    #[test]
    fn test_read_preserves_order_and_tags() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let records = vec![
            MoveRecord::file("/r/b.txt", "/r/Documents/b.txt"),
            MoveRecord::file("/r/a.mp3", "/r/Audio/a.mp3"),
            MoveRecord::folder("/r/Stuff", "/r/Others/Stuff"),
        ];
        write(root, &records).expect("write failed");

        let loaded = read(root).expect("read failed");
        assert_eq!(loaded, records);
        assert!(loaded[2].origin.is_folder());
        assert_eq!(loaded[2].origin.path(), Path::new("/r/Stuff"));
    }

    #[test]
    fn test_write_truncates_previous_log() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        write(root, &[MoveRecord::file("/r/old.txt", "/r/Documents/old.txt")]).unwrap();
        write(root, &[MoveRecord::file("/r/new.png", "/r/Images/new.png")]).unwrap();

        let loaded = read(root).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].destination, PathBuf::from("/r/Images/new.png"));
    }

    #[test]
    fn test_malformed_lines_are_dropped_and_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        fs::write(
            root.join(SORT_LOG_FILENAME),
            "/r/a.txt||/r/Documents/a.txt\nno delimiter here\n\n/r/x||/r/y||/r/z\n/r/b.png||/r/Images/b.png\n",
        )
        .unwrap();

        let contents = read_with_diagnostics(root).unwrap();
        assert_eq!(contents.records.len(), 2);
        assert_eq!(contents.malformed_lines, vec![2, 4]);
        assert_eq!(read(root).unwrap(), contents.records);
    }

    #[test]
    fn test_prefix_without_colon_is_a_plain_path() {
        assert_eq!(
            Origin::decode("USER_FOLDERSfoo"),
            Origin::File(PathBuf::from("USER_FOLDERSfoo"))
        );
        assert_eq!(
            Origin::decode("USER_FOLDERS:/r/foo"),
            Origin::RelocatedFolder(PathBuf::from("/r/foo"))
        );
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        // No-op without a log.
        delete(root).expect("delete without log");

        write(root, &[]).unwrap();
        assert!(log_path(root).exists());
        delete(root).unwrap();
        assert!(!log_path(root).exists());
    }
}
