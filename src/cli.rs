//! Command-line interface module for foldersort.
//!
//! This module is the boundary between the engines and the user:
//! - Configuration loading
//! - Dry-run planning
//! - Progress and summary output
//! - Turning engine errors into printable messages

use crate::config::FilterConfig;
use crate::error::{OrganizeError, OrganizeResult};
use crate::file_organizer::{FileOrganizer, SortMode};
use crate::output::OutputFormatter;
use crate::undo::{UndoManager, UndoReport};
use std::collections::BTreeMap;
use std::path::Path;

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCommand {
    /// Sort the directory in the given mode.
    Sort {
        mode: SortMode,
        /// If true, print the plan without moving anything.
        dry_run: bool,
        /// Print a JSON report instead of human-readable output.
        json: bool,
    },
    /// Undo the previous sort.
    Undo { json: bool },
}

/// Runs `command` against `dir_path` with the default configuration lookup.
///
/// # Examples
///
/// ```no_run
/// use foldersort::cli::{run_cli, SortCommand};
/// use foldersort::SortMode;
/// use std::path::Path;
///
/// let command = SortCommand::Sort { mode: SortMode::Type, dry_run: false, json: false };
/// if let Err(e) = run_cli(command, Path::new("/path/to/directory")) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: SortCommand, dir_path: &Path) -> Result<(), String> {
    run_cli_with_config(command, dir_path, None)
}

/// Runs `command` with an optional explicit configuration file.
pub fn run_cli_with_config(
    command: SortCommand,
    dir_path: &Path,
    config_path: Option<&Path>,
) -> Result<(), String> {
    match command {
        SortCommand::Sort {
            mode,
            dry_run: true,
            json,
        } => sort_directory_dry_run(dir_path, mode, config_path, json),
        SortCommand::Sort {
            mode,
            dry_run: false,
            json,
        } => sort_directory(dir_path, mode, config_path, json),
        SortCommand::Undo { json } => undo_sort_directory(dir_path, json),
    }
}

fn load_organizer(config_path: Option<&Path>) -> OrganizeResult<FileOrganizer> {
    let filters = FilterConfig::load(config_path)?.compile()?;
    Ok(FileOrganizer::new(filters))
}

fn config_failed(err: OrganizeError) -> String {
    format!("Error loading configuration: {}", err)
}

/// Sorts `base_path` and records the moves for undo.
pub fn sort_directory(
    base_path: &Path,
    mode: SortMode,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let organizer = load_organizer(config_path).map_err(config_failed)?;
    let plan = organizer.plan(base_path, mode).map_err(|e| e.to_string())?;

    if json {
        let report = organizer
            .execute(base_path, mode, plan, |_| {})
            .map_err(|e| e.to_string())?;
        return OutputFormatter::json(&report);
    }

    OutputFormatter::info(&format!(
        "Sorting contents of {} by {}",
        base_path.display(),
        mode.label()
    ));

    let pb = OutputFormatter::create_progress_bar(plan.len() as u64);
    let result = organizer.execute(base_path, mode, plan, |record| {
        if let Some(name) = record.destination.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        pb.inc(1);
    });
    pb.finish_and_clear();

    // The root may now be partially sorted, with no log for what already moved.
    let report = result.map_err(|e| e.to_string())?;

    if report.records.is_empty() {
        OutputFormatter::plain("Nothing to sort.");
        return Ok(());
    }

    OutputFormatter::summary_table(&report.folders);
    OutputFormatter::success(&format!("Sorted by {}.", mode.label()));
    OutputFormatter::plain(&format!(
        "Run 'foldersort undo {}' to revert changes.",
        base_path.display()
    ));
    Ok(())
}

/// Prints what a sort would do, without touching the directory or the log.
pub fn sort_directory_dry_run(
    base_path: &Path,
    mode: SortMode,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let organizer = load_organizer(config_path).map_err(config_failed)?;
    let plan = organizer.plan(base_path, mode).map_err(|e| e.to_string())?;

    if json {
        return OutputFormatter::json(&plan);
    }

    OutputFormatter::dry_run_notice(&format!(
        "Analyzing contents of {} by {}",
        base_path.display(),
        mode.label()
    ));

    if plan.is_empty() {
        OutputFormatter::plain("Nothing to sort.");
        return Ok(());
    }

    let mut counts = BTreeMap::new();
    for step in &plan {
        let name = step
            .destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        OutputFormatter::planned_move(&name, step.origin.is_folder(), &step.folder);
        *counts.entry(step.folder.clone()).or_insert(0) += 1;
    }

    OutputFormatter::summary_table(&counts);
    OutputFormatter::success("Dry run complete. No files were modified.");
    Ok(())
}

/// Undoes the previous sort of `base_path` and reports the outcome.
pub fn undo_sort_directory(base_path: &Path, json: bool) -> Result<(), String> {
    let report = UndoManager::undo(base_path).map_err(|e| format!("Error: {}", e))?;

    if json {
        return OutputFormatter::json(&report);
    }

    print_undo_report(&report);
    Ok(())
}

fn print_undo_report(report: &UndoReport) {
    if !report.log_found {
        OutputFormatter::warning("No sort log found; nothing to restore.");
        return;
    }

    OutputFormatter::success("Undo complete!");
    OutputFormatter::plain(&format!("  Restored files: {}", report.restored_files));
    OutputFormatter::plain(&format!("  Restored folders: {}", report.restored_folders));

    if !report.skipped.is_empty() {
        OutputFormatter::plain(&format!("  Skipped: {}", report.skipped.len()));
        for (path, reason) in &report.skipped {
            OutputFormatter::plain(&format!("    - {}: {}", path.display(), reason));
        }
    }

    if !report.failed_restores.is_empty() {
        OutputFormatter::warning(&format!("Failed: {}", report.failed_restores.len()));
        for (path, reason) in &report.failed_restores {
            OutputFormatter::error(&format!("    {}: {}", path.display(), reason));
        }
    }

    if !report.malformed_lines.is_empty() {
        OutputFormatter::warning(&format!(
            "Ignored unreadable sort log lines: {:?}",
            report.malformed_lines
        ));
    }

    for warning in &report.warnings {
        OutputFormatter::warning(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dry_run_leaves_directory_untouched() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("a.png"), "png").unwrap();

        let command = SortCommand::Sort {
            mode: SortMode::Type,
            dry_run: true,
            json: false,
        };
        run_cli(command, root).expect("dry run failed");

        assert!(root.join("a.png").is_file());
        assert!(!root.join("Images").exists());
        assert!(!root.join(".sort_log").exists());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let command = SortCommand::Sort {
            mode: SortMode::Date,
            dry_run: false,
            json: false,
        };

        let result = run_cli_with_config(
            command,
            temp_dir.path(),
            Some(Path::new("/non/existent/config.toml")),
        );

        let message = result.expect_err("missing config should fail");
        assert!(message.contains("configuration"));
    }

    #[test]
    fn test_sort_then_undo_through_cli() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("clip.mp4"), "mp4").unwrap();

        let sort = SortCommand::Sort {
            mode: SortMode::Type,
            dry_run: false,
            json: true,
        };
        run_cli(sort, root).expect("sort failed");
        assert!(root.join("Videos/clip.mp4").is_file());

        run_cli(SortCommand::Undo { json: true }, root).expect("undo failed");
        assert!(root.join("clip.mp4").is_file());
        assert!(!root.join("Videos").exists());
    }
}
