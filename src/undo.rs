/// Reversing the most recent sort pass of a root directory.
///
/// The sort log is replayed newest-first in two passes: moved files go back
/// to their recorded origin, then relocated user folders go back to the root.
/// Afterwards every empty directory under the root is removed and the log is
/// deleted. Individual restorations that fail are reported, not raised.
use crate::error::OrganizeResult;
use crate::file_organizer::{ensure_dir, move_item, validate_root};
use crate::operation_log::{self, MoveRecord, Origin};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Represents the result of an undo operation.
#[derive(Debug, Default, Serialize)]
pub struct UndoReport {
    /// Whether a sort log existed for the root.
    pub log_found: bool,
    pub restored_files: usize,
    pub restored_folders: usize,
    /// Records whose destination no longer exists.
    pub skipped: Vec<(PathBuf, String)>,
    /// Records that could not be moved back.
    pub failed_restores: Vec<(PathBuf, String)>,
    /// Best-effort cleanup problems (nested flattening).
    pub warnings: Vec<String>,
    /// Line numbers of log entries that could not be parsed.
    pub malformed_lines: Vec<usize>,
    /// Empty directories removed after restoring.
    pub removed_dirs: usize,
}

impl UndoReport {
    /// Returns the total number of log records processed.
    pub fn total_processed(&self) -> usize {
        self.restored_files
            + self.restored_folders
            + self.failed_restores.len()
            + self.skipped.len()
    }

    /// Returns true if every record was restored and nothing was dropped.
    pub fn is_complete_success(&self) -> bool {
        self.failed_restores.is_empty()
            && self.skipped.is_empty()
            && self.warnings.is_empty()
            && self.malformed_lines.is_empty()
    }
}

/// Manages undo operations for sort passes.
pub struct UndoManager;

impl UndoManager {
    /// Undoes the most recent sort pass over `root`.
    ///
    /// # Returns
    ///
    /// An `UndoReport` describing what was restored, skipped and failed.
    /// A root without a log is not an error; the report has `log_found == false`
    /// and only the empty-directory cleanup runs.
    ///
    /// # Errors
    ///
    /// Fails if `root` is not a directory, or the log cannot be read or deleted.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foldersort::undo::UndoManager;
    /// use std::path::Path;
    ///
    /// match UndoManager::undo(Path::new("/path/to/directory")) {
    ///     Ok(report) => println!("Restored {} files", report.restored_files),
    ///     Err(e) => eprintln!("Undo failed: {}", e),
    /// }
    /// ```
    pub fn undo(root: &Path) -> OrganizeResult<UndoReport> {
        validate_root(root)?;

        let log_found = operation_log::log_path(root).exists();
        let contents = operation_log::read_with_diagnostics(root)?;
        let mut report = UndoReport {
            log_found,
            malformed_lines: contents.malformed_lines,
            ..UndoReport::default()
        };

        // Files first, so folders they were moved into can be emptied.
        for record in contents.records.iter().rev() {
            if let Origin::File(original) = &record.origin {
                Self::restore_file(original, record, &mut report);
            }
        }

        for record in contents.records.iter().rev() {
            if let Origin::RelocatedFolder(original) = &record.origin {
                Self::restore_folder(root, original, record, &mut report);
            }
        }

        report.removed_dirs = remove_empty_dirs(root);
        operation_log::delete(root)?;

        tracing::info!(
            root = %root.display(),
            files = report.restored_files,
            folders = report.restored_folders,
            failed = report.failed_restores.len(),
            "undo complete"
        );

        Ok(report)
    }

    fn restore_file(original: &Path, record: &MoveRecord, report: &mut UndoReport) {
        if !record.destination.exists() {
            report.skipped.push((
                record.destination.clone(),
                "File not found at expected location".to_string(),
            ));
            return;
        }

        let restored = original
            .parent()
            .map_or(Ok(()), ensure_dir)
            .and_then(|()| move_item(&record.destination, original));

        match restored {
            Ok(()) => {
                tracing::debug!(to = %original.display(), "restored file");
                report.restored_files += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not restore file");
                report
                    .failed_restores
                    .push((record.destination.clone(), e.to_string()));
            }
        }
    }

    fn restore_folder(root: &Path, original: &Path, record: &MoveRecord, report: &mut UndoReport) {
        let destination = &record.destination;

        if destination.exists() {
            let Some(name) = original.file_name() else {
                report.failed_restores.push((
                    destination.clone(),
                    format!("Recorded folder {} has no name", original.display()),
                ));
                return;
            };
            let target = root.join(name);

            if target != *destination {
                if target.exists() {
                    report.failed_restores.push((
                        destination.clone(),
                        format!("{} already exists", target.display()),
                    ));
                    return;
                }
                if let Err(e) = move_item(destination, &target) {
                    tracing::warn!(error = %e, "could not restore folder");
                    report
                        .failed_restores
                        .push((destination.clone(), e.to_string()));
                    return;
                }
            }

            tracing::debug!(to = %target.display(), "restored folder");
            report.restored_folders += 1;
        } else {
            report.skipped.push((
                destination.clone(),
                "Folder not found at expected location".to_string(),
            ));
        }

        if destination.is_dir() {
            flatten_nested(root, destination, report);
        }
    }
}

/// Moves every file found beneath the subdirectories of `former_destination`
/// directly into `root`. Only one level of subdirectories is inspected; below
/// that the search is recursive. Problems become warnings.
fn flatten_nested(root: &Path, former_destination: &Path, report: &mut UndoReport) {
    let entries = match fs::read_dir(former_destination) {
        Ok(entries) => entries,
        Err(e) => {
            warn(report, format!("Could not read {}: {}", former_destination.display(), e));
            return;
        }
    };

    let subdirs: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    for subdir in subdirs {
        let mut files = Vec::new();
        for entry in WalkDir::new(&subdir).min_depth(1) {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => warn(report, format!("Could not walk {}: {}", subdir.display(), e)),
            }
        }

        for file in files {
            let Some(name) = file.file_name() else {
                continue;
            };
            if let Err(e) = move_item(&file, &root.join(name)) {
                warn(report, e.to_string());
            }
        }
    }
}

fn warn(report: &mut UndoReport, message: String) {
    tracing::warn!("{}", message);
    report.warnings.push(message);
}

/// Removes empty directories under `root`, children before parents.
///
/// Directories that are not empty, or cannot be removed, are left alone.
/// `root` itself is kept. Returns how many directories were removed.
fn remove_empty_dirs(root: &Path) -> usize {
    let mut removed = 0;
    for entry in WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .flatten()
    {
        if entry.file_type().is_dir() && fs::remove_dir(entry.path()).is_ok() {
            removed += 1;
        }
    }
    removed
}

/// Undoes the most recent sort pass over `root`. See [`UndoManager::undo`].
pub fn undo_sort(root: impl AsRef<Path>) -> OrganizeResult<UndoReport> {
    UndoManager::undo(root.as_ref())
}
